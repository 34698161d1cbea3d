//! Headless native bridge: keeps every native object in memory and records each call the
//! synchronization engine makes, so passes can be inspected without a GPU.

mod store;

pub use store::{HeadlessObject, supported_keys};

use ahash::{AHashMap, AHashSet};
use prism_bridge::{
    ArrayExtent, BridgeError, BridgeEvent, DataRange, MAX_COMPONENT_SLOTS, NativeBridge,
    ObjectKind, SlotKind, SubObject,
};
use prism_ids::{NodeID, ObjectID, SubscriptionID};
use prism_variant::Variant;
use std::sync::Arc;
use store::{ObjectStore, expects_vec3, has_slots, is_mapper, property_kind_for};

/// Counts of calls received since construction or the last [`HeadlessBridge::reset_stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallStats {
    pub created: usize,
    pub destroyed: usize,
    pub property_sets: usize,
    pub slot_sets: usize,
    pub wiring: usize,
    pub inputs: usize,
    pub subscribed: usize,
    pub unsubscribed: usize,
    pub renders: usize,
}

impl CallStats {
    /// Every call that may mutate a native object.
    pub fn mutations(&self) -> usize {
        self.property_sets + self.slot_sets + self.wiring + self.inputs
    }
}

pub struct HeadlessBridge {
    store: ObjectStore,
    created_by_kind: AHashMap<ObjectKind, usize>,
    next_subscription: u32,
    subscriptions: AHashMap<SubscriptionID, (ObjectID, NodeID)>,
    events: Vec<BridgeEvent>,
    stats: CallStats,
    renders: Vec<ObjectID>,
}

impl HeadlessBridge {
    pub fn new() -> Self {
        Self {
            store: ObjectStore::new(),
            created_by_kind: AHashMap::default(),
            next_subscription: 1,
            subscriptions: AHashMap::default(),
            events: Vec::new(),
            stats: CallStats::default(),
            renders: Vec::new(),
        }
    }

    // ---- inspection ----

    #[inline]
    pub fn stats(&self) -> CallStats {
        self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = CallStats::default();
        self.renders.clear();
    }

    /// Windows drawn since the last stats reset, in order.
    #[inline]
    pub fn renders(&self) -> &[ObjectID] {
        &self.renders
    }

    #[inline]
    pub fn object(&self, id: ObjectID) -> Option<&HeadlessObject> {
        self.store.get(id)
    }

    pub fn live_objects(&self) -> usize {
        self.store.len()
    }

    pub fn created_of(&self, kind: ObjectKind) -> usize {
        self.created_by_kind.get(&kind).copied().unwrap_or(0)
    }

    pub fn live_subscriptions(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn subscriptions_on(&self, object: ObjectID) -> usize {
        self.subscriptions
            .values()
            .filter(|(target, _)| *target == object)
            .count()
    }

    // ---- host-side objects and mutations ----

    /// Creates a caller-owned scalar array.
    pub fn create_array(&mut self, values: Vec<f64>, components: usize) -> ObjectID {
        let mut object = HeadlessObject::new(ObjectKind::DataArray);
        object.values = values;
        object.components = components.max(1);
        self.store.insert(object)
    }

    /// Creates a caller-owned object (e.g. a transfer function shared between representations).
    pub fn create_external(&mut self, kind: ObjectKind) -> ObjectID {
        self.store.insert(HeadlessObject::new(kind))
    }

    /// Mutates a caller-owned object outside any synchronization pass and notifies subscribers.
    pub fn modify_external(&mut self, object: ObjectID, key: &str, value: Variant) -> bool {
        let Some(target) = self.store.get_mut(object) else {
            return false;
        };
        target.properties.insert(Arc::<str>::from(key), value);
        self.notify_modified(object);
        true
    }

    /// Replaces the values of a caller-owned array and notifies subscribers.
    pub fn replace_array_values(&mut self, array: ObjectID, values: Vec<f64>) -> bool {
        let Some(target) = self.store.get_mut(array) else {
            return false;
        };
        target.values = values;
        self.notify_modified(array);
        true
    }

    fn notify_modified(&mut self, object: ObjectID) {
        let mut fired: Vec<(SubscriptionID, NodeID)> = self
            .subscriptions
            .iter()
            .filter(|(_, (target, _))| *target == object)
            .map(|(id, (_, owner))| (*id, *owner))
            .collect();
        fired.sort_by_key(|(id, _)| *id);
        for (subscription, owner) in fired {
            self.events.push(BridgeEvent::Modified {
                subscription,
                owner,
                object,
            });
        }
    }

    fn attach(&mut self, parent: ObjectID, child: ObjectID) -> bool {
        self.stats.wiring += 1;
        if !self.store.contains(child) {
            return false;
        }
        let Some(parent) = self.store.get_mut(parent) else {
            return false;
        };
        if parent.children.contains(&child) {
            return false;
        }
        parent.children.push(child);
        true
    }

    fn detach(&mut self, parent: ObjectID, child: ObjectID) -> bool {
        self.stats.wiring += 1;
        let Some(parent) = self.store.get_mut(parent) else {
            return false;
        };
        let before = parent.children.len();
        parent.children.retain(|c| *c != child);
        before != parent.children.len()
    }
}

impl Default for HeadlessBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeBridge for HeadlessBridge {
    fn create(&mut self, kind: ObjectKind) -> ObjectID {
        self.stats.created += 1;
        *self.created_by_kind.entry(kind).or_insert(0) += 1;
        self.store.insert(HeadlessObject::new(kind))
    }

    fn destroy(&mut self, object: ObjectID) -> bool {
        let Some(removed) = self.store.remove(object) else {
            return false;
        };
        self.stats.destroyed += 1;
        if let Some(property) = removed.property {
            self.store.remove(property);
        }
        true
    }

    fn exists(&self, object: ObjectID) -> bool {
        self.store.contains(object)
    }

    fn kind_of(&self, object: ObjectID) -> Option<ObjectKind> {
        self.store.get(object).map(|o| o.kind)
    }

    fn set_property(
        &mut self,
        object: ObjectID,
        key: &str,
        value: &Variant,
    ) -> Result<bool, BridgeError> {
        self.stats.property_sets += 1;
        let target = self
            .store
            .get_mut(object)
            .ok_or(BridgeError::UnknownObject(object))?;
        if !supported_keys(target.kind).contains(&key) {
            return Err(BridgeError::UnsupportedProperty {
                kind: target.kind.name(),
                key: key.to_string(),
            });
        }
        if expects_vec3(target.kind, key) && value.as_vec3().is_none() {
            return Err(BridgeError::InvalidValue {
                kind: target.kind.name(),
                key: key.to_string(),
                expected: "a vector",
            });
        }
        if target.properties.get(key) == Some(value) {
            return Ok(false);
        }
        target
            .properties
            .insert(Arc::<str>::from(key), value.clone());
        Ok(true)
    }

    fn get_property(&self, object: ObjectID, key: &str) -> Option<Variant> {
        self.store.get(object)?.properties.get(key).cloned()
    }

    fn sub_object(&mut self, object: ObjectID, which: SubObject) -> Option<ObjectID> {
        let SubObject::Property = which;
        let target = self.store.get(object)?;
        if let Some(existing) = target.property {
            return Some(existing);
        }
        let kind = property_kind_for(target.kind)?;
        let property = self.store.insert(HeadlessObject::new(kind));
        if let Some(target) = self.store.get_mut(object) {
            target.property = Some(property);
        }
        Some(property)
    }

    fn set_mapper(&mut self, actor: ObjectID, mapper: ObjectID) -> bool {
        self.stats.wiring += 1;
        let Some(actor) = self.store.get_mut(actor) else {
            return false;
        };
        if actor.mapper == Some(mapper) {
            return false;
        }
        actor.mapper = Some(mapper);
        true
    }

    fn add_actor(&mut self, renderer: ObjectID, actor: ObjectID) -> bool {
        self.attach(renderer, actor)
    }

    fn remove_actor(&mut self, renderer: ObjectID, actor: ObjectID) -> bool {
        self.detach(renderer, actor)
    }

    fn add_renderer(&mut self, window: ObjectID, renderer: ObjectID) -> bool {
        self.attach(window, renderer)
    }

    fn remove_renderer(&mut self, window: ObjectID, renderer: ObjectID) -> bool {
        self.detach(window, renderer)
    }

    fn set_input_data(&mut self, mapper: ObjectID, data: ObjectID) -> bool {
        self.stats.inputs += 1;
        let Some(target) = self.store.get_mut(mapper) else {
            return false;
        };
        if !is_mapper(target.kind) || target.input == Some(data) {
            return false;
        }
        target.input = Some(data);
        target.connection = None;
        true
    }

    fn set_input_connection(&mut self, mapper: ObjectID, source: ObjectID) -> bool {
        self.stats.inputs += 1;
        let Some(target) = self.store.get_mut(mapper) else {
            return false;
        };
        if !is_mapper(target.kind) || target.connection == Some(source) {
            return false;
        }
        target.connection = Some(source);
        // A connection hands the mapper the producer's output.
        target.input = Some(source);
        true
    }

    fn input_data(&self, mapper: ObjectID) -> Option<ObjectID> {
        self.store.get(mapper)?.input
    }

    fn set_transfer_slot(
        &mut self,
        property: ObjectID,
        kind: SlotKind,
        index: usize,
        function: Option<ObjectID>,
    ) -> Result<bool, BridgeError> {
        self.stats.slot_sets += 1;
        let target = self
            .store
            .get_mut(property)
            .ok_or(BridgeError::UnknownObject(property))?;
        if !has_slots(target.kind) {
            return Err(BridgeError::NoSlots {
                kind: target.kind.name(),
                slot: kind,
            });
        }
        if index >= MAX_COMPONENT_SLOTS {
            return Err(BridgeError::SlotOutOfRange {
                index,
                max: MAX_COMPONENT_SLOTS,
            });
        }
        let slots = match kind {
            SlotKind::Color => &mut target.color_slots,
            SlotKind::Opacity => &mut target.opacity_slots,
        };
        if slots[index] == function {
            return Ok(false);
        }
        slots[index] = function;
        Ok(true)
    }

    fn transfer_slot(&self, property: ObjectID, kind: SlotKind, index: usize) -> Option<ObjectID> {
        let target = self.store.get(property)?;
        let slots = match kind {
            SlotKind::Color => &target.color_slots,
            SlotKind::Opacity => &target.opacity_slots,
        };
        slots.get(index).copied().flatten()
    }

    fn set_scalars(&mut self, data: ObjectID, array: Option<ObjectID>) -> bool {
        self.stats.inputs += 1;
        let Some(target) = self.store.get_mut(data) else {
            return false;
        };
        if target.scalars == array {
            return false;
        }
        target.scalars = array;
        true
    }

    fn scalars(&self, data: ObjectID) -> Option<ObjectID> {
        self.store.get(data)?.scalars
    }

    fn array_extent(&self, array: ObjectID) -> Option<ArrayExtent> {
        let array = self.store.get(array)?;
        Some(ArrayExtent {
            tuples: array.values.len() / array.components.max(1),
            components: array.components,
        })
    }

    fn array_range(&self, array: ObjectID, component: usize) -> Option<DataRange> {
        let array = self.store.get(array)?;
        if component >= array.components {
            return None;
        }
        let mut values = array
            .values
            .iter()
            .skip(component)
            .step_by(array.components.max(1))
            .copied();
        let first = values.next()?;
        let (min, max) = values.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));
        Some(DataRange::new(min, max))
    }

    fn subscribe_modified(&mut self, object: ObjectID, owner: NodeID) -> Option<SubscriptionID> {
        if !self.store.contains(object) {
            return None;
        }
        self.stats.subscribed += 1;
        let id = SubscriptionID::from_parts(self.next_subscription, 0);
        self.next_subscription = self.next_subscription.saturating_add(1);
        self.subscriptions.insert(id, (object, owner));
        Some(id)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionID) -> bool {
        let removed = self.subscriptions.remove(&subscription).is_some();
        if removed {
            self.stats.unsubscribed += 1;
        }
        removed
    }

    fn drain_events(&mut self, out: &mut Vec<BridgeEvent>) {
        out.append(&mut self.events);
    }

    fn render(&mut self, window: ObjectID) {
        self.stats.renders += 1;
        self.renders.push(window);
        log::trace!("headless draw of window {window}");
    }
}

/// Distinct windows drawn, handy for assertions about coalescing.
pub fn distinct_windows(renders: &[ObjectID]) -> usize {
    renders.iter().copied().collect::<AHashSet<_>>().len()
}
