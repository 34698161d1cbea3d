use prism_ids::{NodeID, ObjectID, SubscriptionID};
use prism_variant::Variant;
use thiserror::Error;

/// Color/opacity transfer functions are slotted per data component.
pub const MAX_COMPONENT_SLOTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    RenderWindow,
    Renderer,
    VolumeMapper,
    Volume,
    VolumeProperty,
    Mapper,
    Actor,
    ActorProperty,
    ColorTransferFunction,
    PiecewiseFunction,
    ImageData,
    DataArray,
}

impl ObjectKind {
    pub const fn name(self) -> &'static str {
        match self {
            ObjectKind::RenderWindow => "RenderWindow",
            ObjectKind::Renderer => "Renderer",
            ObjectKind::VolumeMapper => "VolumeMapper",
            ObjectKind::Volume => "Volume",
            ObjectKind::VolumeProperty => "VolumeProperty",
            ObjectKind::Mapper => "Mapper",
            ObjectKind::Actor => "Actor",
            ObjectKind::ActorProperty => "ActorProperty",
            ObjectKind::ColorTransferFunction => "ColorTransferFunction",
            ObjectKind::PiecewiseFunction => "PiecewiseFunction",
            ObjectKind::ImageData => "ImageData",
            ObjectKind::DataArray => "DataArray",
        }
    }
}

/// Which per-component function table of a property a slot call addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    Color,
    Opacity,
}

/// Dependent objects a native object owns and exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubObject {
    Property,
}

/// Closed `[min, max]` interval of scalar values.
///
/// Bounds compare by bit pattern, so a range over NaN data equals itself.
#[derive(Debug, Clone, Copy)]
pub struct DataRange {
    pub min: f64,
    pub max: f64,
}

impl DataRange {
    /// Sentinel for "no data bound yet". Inverted, so it never collides with a real range,
    /// including `[0, 0]` over all-zero data.
    pub const EMPTY: DataRange = DataRange {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };

    #[inline]
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.min > self.max
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 2] {
        [self.min, self.max]
    }

    #[inline]
    pub const fn to_variant(self) -> Variant {
        Variant::Range([self.min, self.max])
    }
}

impl PartialEq for DataRange {
    fn eq(&self, other: &Self) -> bool {
        self.min.to_bits() == other.min.to_bits() && self.max.to_bits() == other.max.to_bits()
    }
}

impl Default for DataRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<[f64; 2]> for DataRange {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

/// Identity-independent size of a data array, used to notice resizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ArrayExtent {
    pub tuples: usize,
    pub components: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BridgeEvent {
    /// An object with a live modified-subscription was mutated.
    Modified {
        subscription: SubscriptionID,
        owner: NodeID,
        object: ObjectID,
    },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum BridgeError {
    #[error("unknown native object {0}")]
    UnknownObject(ObjectID),
    #[error("{kind} does not support property `{key}`")]
    UnsupportedProperty { kind: &'static str, key: String },
    #[error("{kind} property `{key}` expects {expected}")]
    InvalidValue {
        kind: &'static str,
        key: String,
        expected: &'static str,
    },
    #[error("{kind} has no {slot:?} slots")]
    NoSlots { kind: &'static str, slot: SlotKind },
    #[error("slot index {index} out of range (max {max})")]
    SlotOutOfRange { index: usize, max: usize },
}

/// The narrow capability surface the synchronization engine drives.
///
/// Every mutating call reports whether the native state actually changed so callers can
/// accumulate dirtiness without guessing. Implementations must be idempotent: repeating a call
/// with the same arguments returns `false`.
pub trait NativeBridge {
    fn create(&mut self, kind: ObjectKind) -> ObjectID;
    fn destroy(&mut self, object: ObjectID) -> bool;
    fn exists(&self, object: ObjectID) -> bool;
    fn kind_of(&self, object: ObjectID) -> Option<ObjectKind>;

    fn set_property(
        &mut self,
        object: ObjectID,
        key: &str,
        value: &Variant,
    ) -> Result<bool, BridgeError>;
    fn get_property(&self, object: ObjectID, key: &str) -> Option<Variant>;
    fn sub_object(&mut self, object: ObjectID, which: SubObject) -> Option<ObjectID>;

    // ---- pipeline wiring ----
    fn set_mapper(&mut self, actor: ObjectID, mapper: ObjectID) -> bool;
    fn add_actor(&mut self, renderer: ObjectID, actor: ObjectID) -> bool;
    fn remove_actor(&mut self, renderer: ObjectID, actor: ObjectID) -> bool;
    fn add_renderer(&mut self, window: ObjectID, renderer: ObjectID) -> bool;
    fn remove_renderer(&mut self, window: ObjectID, renderer: ObjectID) -> bool;
    fn set_input_data(&mut self, mapper: ObjectID, data: ObjectID) -> bool;
    fn set_input_connection(&mut self, mapper: ObjectID, source: ObjectID) -> bool;
    fn input_data(&self, mapper: ObjectID) -> Option<ObjectID>;

    // ---- transfer functions ----
    fn set_transfer_slot(
        &mut self,
        property: ObjectID,
        kind: SlotKind,
        index: usize,
        function: Option<ObjectID>,
    ) -> Result<bool, BridgeError>;
    fn transfer_slot(&self, property: ObjectID, kind: SlotKind, index: usize) -> Option<ObjectID>;

    fn clear_transfer_slots(&mut self, property: ObjectID, kind: SlotKind) -> bool {
        let mut changed = false;
        for index in 0..MAX_COMPONENT_SLOTS {
            changed |= self
                .set_transfer_slot(property, kind, index, None)
                .unwrap_or(false);
        }
        changed
    }

    // ---- data ----
    fn set_scalars(&mut self, data: ObjectID, array: Option<ObjectID>) -> bool;
    fn scalars(&self, data: ObjectID) -> Option<ObjectID>;
    fn array_extent(&self, array: ObjectID) -> Option<ArrayExtent>;
    fn array_range(&self, array: ObjectID, component: usize) -> Option<DataRange>;

    // ---- notifications ----
    fn subscribe_modified(&mut self, object: ObjectID, owner: NodeID) -> Option<SubscriptionID>;
    /// Returns `false` when the subscription was already gone.
    fn unsubscribe(&mut self, subscription: SubscriptionID) -> bool;
    fn drain_events(&mut self, out: &mut Vec<BridgeEvent>);

    fn render(&mut self, window: ObjectID);
}
