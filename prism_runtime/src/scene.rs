mod bridge_events;
mod handles;
mod reconcile;
#[cfg(test)]
mod test_support;

use crate::config::SyncConfig;
use crate::context::SyncContext;
use crate::desc::NodeDesc;
use crate::node_arena::NodeArena;
use crate::nodes::{NodeData, NodeKind, SceneNode};
use crate::scheduler::RenderScheduler;
use prism_bridge::{BridgeEvent, NativeBridge};
use prism_ids::{NodeID, NodeKey};

/// Outcome of one [`Scene::sync`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassReport {
    pub created: usize,
    pub destroyed: usize,
    /// Windows drawn when the pass flushed.
    pub renders: usize,
}

/// Keeps a tree of native rendering objects in step with successive declarative descriptions.
///
/// Each [`Scene::sync`] reconciles the description against the previous pass, pushes only the
/// differences through the bridge and draws every window whose scope changed exactly once.
/// Out-of-pass notifications from the bridge are handled by [`Scene::pump_events`].
pub struct Scene<B: NativeBridge> {
    bridge: B,
    nodes: NodeArena,
    roots: Vec<NodeID>,
    config: SyncConfig,
    scheduler: RenderScheduler,
    events: Vec<BridgeEvent>,
    passes: u64,
}

impl<B: NativeBridge> Scene<B> {
    pub fn new(bridge: B) -> Self {
        Self::with_config(bridge, SyncConfig::default())
    }

    pub fn with_config(bridge: B, config: SyncConfig) -> Self {
        Self {
            bridge,
            nodes: NodeArena::new(),
            roots: Vec::new(),
            config,
            scheduler: RenderScheduler::new(),
            events: Vec::new(),
            passes: 0,
        }
    }

    #[inline]
    pub fn bridge(&self) -> &B {
        &self.bridge
    }

    /// Host access to the native side, e.g. to create caller-owned objects.
    #[inline]
    pub fn bridge_mut(&mut self) -> &mut B {
        &mut self.bridge
    }

    #[inline]
    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    #[inline]
    pub fn nodes(&self) -> &NodeArena {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, id: NodeID) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    #[inline]
    pub fn roots(&self) -> &[NodeID] {
        &self.roots
    }

    #[inline]
    pub fn passes(&self) -> u64 {
        self.passes
    }

    /// Resolves a key path from a root, e.g. `["view", "renderer", "volume"]`.
    pub fn find(&self, path: &[NodeKey]) -> Option<NodeID> {
        let (first, rest) = path.split_first()?;
        let mut current = self.child_with_key(&self.roots, *first)?;
        for key in rest {
            let node = self.nodes.get(current)?;
            current = self.child_with_key(&node.children, *key)?;
        }
        Some(current)
    }

    fn child_with_key(&self, siblings: &[NodeID], key: NodeKey) -> Option<NodeID> {
        siblings
            .iter()
            .copied()
            .find(|id| self.nodes.get(*id).is_some_and(|node| node.key == key))
    }

    /// Reconciles the native tree against `descs` and flushes owed renders.
    pub fn sync(&mut self, descs: &[NodeDesc]) -> PassReport {
        self.passes += 1;
        self.drain_bridge_events();

        let mut report = PassReport::default();
        let previous = std::mem::take(&mut self.roots);
        self.roots =
            self.reconcile_children(NodeID::nil(), &previous, descs, SyncContext::root(), &mut report);

        self.drain_bridge_events();
        report.renders = self.flush();
        log::debug!(
            "pass {}: {} created, {} destroyed, {} render(s)",
            self.passes,
            report.created,
            report.destroyed,
            report.renders
        );
        report
    }

    /// Tears down every node. Caller-owned objects survive.
    pub fn clear(&mut self) -> PassReport {
        self.sync(&[])
    }

    /// Handles notifications that arrived outside a pass, then draws what they dirtied.
    /// Returns the number of windows drawn.
    pub fn pump_events(&mut self) -> usize {
        let handled = self.drain_bridge_events();
        if handled > 0 {
            log::trace!("handled {handled} bridge notification(s)");
        }
        self.flush()
    }

    /// Issues one draw per dirty view.
    pub fn flush(&mut self) -> usize {
        for (_, node) in self.nodes.iter_mut() {
            if let NodeData::View(view) = &mut node.data {
                if view.dirty.consume_and_reset() {
                    if let Some(window) = view.window() {
                        self.scheduler.request(window);
                    }
                }
            }
        }
        self.scheduler.flush(&mut self.bridge)
    }

    fn track_scope(&mut self, scope: Option<NodeID>, changed: bool) {
        if !changed {
            return;
        }
        if let Some(NodeData::View(view)) = scope.and_then(|id| self.nodes.data_mut(id)) {
            view.dirty.track(true);
        }
    }

    fn enclosing_view(&self, mut id: NodeID) -> Option<NodeID> {
        while let Some(node) = self.nodes.get(id) {
            if node.kind() == NodeKind::View {
                return Some(id);
            }
            id = node.parent;
        }
        None
    }
}
