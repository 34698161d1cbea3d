use crate::nodes::{NodeData, SceneNode};
use prism_ids::NodeID;

struct Slot {
    generation: u32,
    node: Option<SceneNode>,
}

/// Generational storage for reconciled scene nodes.
///
/// Index 0 is the nil sentinel, so the first live node is `NodeID(1, 0)`. Removing a node bumps
/// its slot generation: handles captured before removal stop resolving even after the slot is
/// reused.
pub struct NodeArena {
    slots: Vec<Slot>,
    free: Vec<u32>,
    live: usize,
}

impl NodeArena {
    pub fn new() -> Self {
        Self {
            slots: vec![Slot {
                generation: 0,
                node: None,
            }],
            free: Vec::new(),
            live: 0,
        }
    }

    pub fn insert(&mut self, node: SceneNode) -> NodeID {
        self.live += 1;
        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.node = Some(node);
            return NodeID::from_parts(index, slot.generation);
        }
        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            node: Some(node),
        });
        NodeID::from_parts(index, 0)
    }

    fn slot(&self, id: NodeID) -> Option<&Slot> {
        if id.is_nil() || id.index() == 0 {
            return None;
        }
        self.slots
            .get(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }

    fn slot_mut(&mut self, id: NodeID) -> Option<&mut Slot> {
        if id.is_nil() || id.index() == 0 {
            return None;
        }
        self.slots
            .get_mut(id.index() as usize)
            .filter(|slot| slot.generation == id.generation())
    }

    #[inline]
    pub fn get(&self, id: NodeID) -> Option<&SceneNode> {
        self.slot(id)?.node.as_ref()
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeID) -> Option<&mut SceneNode> {
        self.slot_mut(id)?.node.as_mut()
    }

    #[inline]
    pub fn data_mut(&mut self, id: NodeID) -> Option<&mut NodeData> {
        self.get_mut(id).map(|node| &mut node.data)
    }

    pub fn remove(&mut self, id: NodeID) -> Option<SceneNode> {
        let index = id.index();
        let slot = self.slot_mut(id)?;
        let removed = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        self.free.push(index);
        self.live -= 1;
        Some(removed)
    }

    #[inline]
    pub fn contains(&self, id: NodeID) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeID, &SceneNode)> {
        self.slots.iter().enumerate().skip(1).filter_map(|(index, slot)| {
            slot.node
                .as_ref()
                .map(|node| (NodeID::from_parts(index as u32, slot.generation), node))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (NodeID, &mut SceneNode)> {
        self.slots
            .iter_mut()
            .enumerate()
            .skip(1)
            .filter_map(|(index, slot)| {
                let generation = slot.generation;
                slot.node
                    .as_mut()
                    .map(|node| (NodeID::from_parts(index as u32, generation), node))
            })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.live
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.live == 0
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}
