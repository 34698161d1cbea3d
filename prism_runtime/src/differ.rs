use prism_bridge::{MAX_COMPONENT_SLOTS, NativeBridge, SlotKind};
use prism_ids::ObjectID;
use prism_variant::PropertyBag;

/// Pushes every key of `current` whose value differs from `previous` to `object`.
///
/// Keys present only in `previous` are left as they are on the native side. Returns whether
/// the native object reported any change.
pub fn apply_bag<B: NativeBridge + ?Sized>(
    bridge: &mut B,
    object: ObjectID,
    previous: Option<&PropertyBag>,
    current: &PropertyBag,
) -> bool {
    let mut changed = false;
    for (key, value) in current.iter() {
        if previous.is_some_and(|prev| prev.get(key) == Some(value)) {
            continue;
        }
        match bridge.set_property(object, key, value) {
            Ok(applied) => changed |= applied,
            Err(err) => log::warn!("skipping `{key}` on {object}: {err}"),
        }
    }
    changed
}

/// Last bag applied to one native object.
///
/// When the target object changes identity the previous bag no longer describes it, so the
/// next apply pushes every key again.
#[derive(Debug, Clone, Default)]
pub struct PropertyState {
    target: Option<ObjectID>,
    applied: Option<PropertyBag>,
}

impl PropertyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        object: ObjectID,
        current: &PropertyBag,
    ) -> bool {
        if self.target != Some(object) {
            self.target = Some(object);
            self.applied = None;
        } else if self.applied.as_ref() == Some(current) {
            return false;
        }
        let changed = apply_bag(bridge, object, self.applied.as_ref(), current);
        self.applied = Some(current.clone());
        changed
    }

    #[inline]
    pub fn applied(&self) -> Option<&PropertyBag> {
        self.applied.as_ref()
    }

    #[inline]
    pub fn target(&self) -> Option<ObjectID> {
        self.target
    }
}

/// Positional diff of one family of per-component transfer function slots.
#[derive(Debug, Clone)]
pub struct TransferSlots {
    kind: SlotKind,
    target: Option<ObjectID>,
    applied: Option<Vec<Option<ObjectID>>>,
}

impl TransferSlots {
    pub const fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            target: None,
            applied: None,
        }
    }

    #[inline]
    pub fn applied(&self) -> Option<&[Option<ObjectID>]> {
        self.applied.as_deref()
    }

    /// Rebinds slots of `property` so they mirror `current`.
    ///
    /// An empty list after a non-empty one clears all slots. Slots beyond `current.len()` are
    /// cleared when the previous list reached them.
    pub fn apply<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        property: ObjectID,
        current: &[Option<ObjectID>],
    ) -> bool {
        if self.target != Some(property) {
            self.target = Some(property);
            self.applied = None;
        }
        let current = if current.len() > MAX_COMPONENT_SLOTS {
            log::warn!(
                "{} {:?} functions given, only {MAX_COMPONENT_SLOTS} slots exist",
                current.len(),
                self.kind
            );
            &current[..MAX_COMPONENT_SLOTS]
        } else {
            current
        };

        let previous = self.applied.as_deref();
        let mut changed = false;
        match previous {
            None if current.is_empty() => {}
            None => {
                for (index, function) in current.iter().enumerate() {
                    changed |= self.set_slot(bridge, property, index, *function);
                }
            }
            Some(previous) if previous == current => return false,
            Some(previous) if current.is_empty() => {
                if !previous.is_empty() {
                    changed = bridge.clear_transfer_slots(property, self.kind);
                }
            }
            Some(previous) => {
                for index in 0..MAX_COMPONENT_SLOTS {
                    let was = previous.get(index).copied().flatten();
                    let now = current.get(index).copied().flatten();
                    let reached = index < previous.len() || index < current.len();
                    if reached && was != now {
                        changed |= self.set_slot(bridge, property, index, now);
                    }
                }
            }
        }
        self.applied = Some(current.to_vec());
        changed
    }

    fn set_slot<B: NativeBridge + ?Sized>(
        &self,
        bridge: &mut B,
        property: ObjectID,
        index: usize,
        function: Option<ObjectID>,
    ) -> bool {
        match bridge.set_transfer_slot(property, self.kind, index, function) {
            Ok(changed) => changed,
            Err(err) => {
                log::warn!("{:?} slot {index} on {property}: {err}", self.kind);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prism_bridge::{ObjectKind, SubObject};
    use prism_headless::HeadlessBridge;
    use prism_variant::Variant;

    fn volume_property(bridge: &mut HeadlessBridge) -> ObjectID {
        let volume = bridge.create(ObjectKind::Volume);
        bridge
            .sub_object(volume, SubObject::Property)
            .expect("volume has a property")
    }

    #[test]
    fn apply_bag_pushes_only_changed_keys() {
        let mut bridge = HeadlessBridge::new();
        let mapper = bridge.create(ObjectKind::VolumeMapper);
        let before = PropertyBag::new()
            .with("sampleDistance", 0.5f64)
            .with("blendMode", "composite");
        let after = before.clone().with("sampleDistance", 0.25f64);

        apply_bag(&mut bridge, mapper, None, &before);
        bridge.reset_stats();
        assert!(apply_bag(&mut bridge, mapper, Some(&before), &after));
        assert_eq!(bridge.stats().property_sets, 1);
        assert_eq!(
            bridge.get_property(mapper, "sampleDistance"),
            Some(Variant::from(0.25f64))
        );
    }

    #[test]
    fn dropped_keys_keep_their_native_value() {
        let mut bridge = HeadlessBridge::new();
        let mapper = bridge.create(ObjectKind::VolumeMapper);
        let mut state = PropertyState::new();
        state.apply(
            &mut bridge,
            mapper,
            &PropertyBag::new().with("sampleDistance", 0.5f64),
        );
        assert!(!state.apply(&mut bridge, mapper, &PropertyBag::new()));
        assert_eq!(
            bridge.get_property(mapper, "sampleDistance"),
            Some(Variant::from(0.5f64))
        );
    }

    #[test]
    fn unsupported_keys_are_skipped() {
        let mut bridge = HeadlessBridge::new();
        let mapper = bridge.create(ObjectKind::VolumeMapper);
        let bag = PropertyBag::new()
            .with("bogus", true)
            .with("sampleDistance", 1.0f64);
        let mut state = PropertyState::new();
        assert!(state.apply(&mut bridge, mapper, &bag));
        assert_eq!(bridge.get_property(mapper, "bogus"), None);
    }

    #[test]
    fn identical_bag_makes_no_calls() {
        let mut bridge = HeadlessBridge::new();
        let mapper = bridge.create(ObjectKind::VolumeMapper);
        let bag = PropertyBag::new().with("sampleDistance", 1.0f64);
        let mut state = PropertyState::new();
        state.apply(&mut bridge, mapper, &bag);
        bridge.reset_stats();
        assert!(!state.apply(&mut bridge, mapper, &bag.clone()));
        assert_eq!(bridge.stats().property_sets, 0);
    }

    #[test]
    fn new_target_receives_full_bag() {
        let mut bridge = HeadlessBridge::new();
        let first = bridge.create(ObjectKind::VolumeMapper);
        let second = bridge.create(ObjectKind::VolumeMapper);
        let bag = PropertyBag::new().with("sampleDistance", 1.0f64);
        let mut state = PropertyState::new();
        state.apply(&mut bridge, first, &bag);
        assert!(state.apply(&mut bridge, second, &bag));
        assert_eq!(state.target(), Some(second));
    }

    #[test]
    fn removing_every_function_clears_all_slots() {
        let mut bridge = HeadlessBridge::new();
        let property = volume_property(&mut bridge);
        let functions: Vec<Option<ObjectID>> = (0..4)
            .map(|_| Some(bridge.create_external(ObjectKind::ColorTransferFunction)))
            .collect();
        let mut slots = TransferSlots::new(SlotKind::Color);

        assert!(slots.apply(&mut bridge, property, &functions));
        for (index, function) in functions.iter().enumerate() {
            assert_eq!(bridge.transfer_slot(property, SlotKind::Color, index), *function);
        }

        assert!(slots.apply(&mut bridge, property, &[]));
        for index in 0..MAX_COMPONENT_SLOTS {
            assert_eq!(bridge.transfer_slot(property, SlotKind::Color, index), None);
        }
    }

    #[test]
    fn shrinking_list_clears_the_tail() {
        let mut bridge = HeadlessBridge::new();
        let property = volume_property(&mut bridge);
        let a = bridge.create_external(ObjectKind::PiecewiseFunction);
        let b = bridge.create_external(ObjectKind::PiecewiseFunction);
        let mut slots = TransferSlots::new(SlotKind::Opacity);

        slots.apply(&mut bridge, property, &[Some(a), Some(b)]);
        bridge.reset_stats();
        assert!(slots.apply(&mut bridge, property, &[Some(a)]));
        assert_eq!(bridge.stats().slot_sets, 1);
        assert_eq!(bridge.transfer_slot(property, SlotKind::Opacity, 0), Some(a));
        assert_eq!(bridge.transfer_slot(property, SlotKind::Opacity, 1), None);
    }

    #[test]
    fn unchanged_list_is_free() {
        let mut bridge = HeadlessBridge::new();
        let property = volume_property(&mut bridge);
        let a = bridge.create_external(ObjectKind::ColorTransferFunction);
        let mut slots = TransferSlots::new(SlotKind::Color);
        slots.apply(&mut bridge, property, &[Some(a)]);
        bridge.reset_stats();
        assert!(!slots.apply(&mut bridge, property, &[Some(a)]));
        assert_eq!(bridge.stats().slot_sets, 0);
    }

    #[test]
    fn overlong_list_is_truncated() {
        let mut bridge = HeadlessBridge::new();
        let property = volume_property(&mut bridge);
        let functions: Vec<Option<ObjectID>> = (0..6)
            .map(|_| Some(bridge.create_external(ObjectKind::ColorTransferFunction)))
            .collect();
        let mut slots = TransferSlots::new(SlotKind::Color);
        slots.apply(&mut bridge, property, &functions);
        assert_eq!(slots.applied().map(<[_]>::len), Some(MAX_COMPONENT_SLOTS));
        assert_eq!(
            bridge.transfer_slot(property, SlotKind::Color, 3),
            functions[3]
        );
    }
}
