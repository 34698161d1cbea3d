use prism_bridge::{NativeBridge, ObjectKind};
use prism_ids::ObjectID;

/// Lazily constructed native object owned by one scene node.
///
/// The object is built on the first [`ObjectSlot::get`] and reused on every later call until
/// [`ObjectSlot::release`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjectSlot {
    kind: ObjectKind,
    object: Option<ObjectID>,
}

impl ObjectSlot {
    pub const fn new(kind: ObjectKind) -> Self {
        Self { kind, object: None }
    }

    #[inline]
    pub const fn kind(&self) -> ObjectKind {
        self.kind
    }

    /// Existing object, if constructed.
    #[inline]
    pub const fn peek(&self) -> Option<ObjectID> {
        self.object
    }

    pub fn get<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> ObjectID {
        if let Some(object) = self.object {
            return object;
        }
        let object = bridge.create(self.kind);
        log::trace!("constructed {} {object}", self.kind.name());
        self.object = Some(object);
        object
    }

    /// A caller-supplied instance wins over the owned one and suppresses construction. An owned
    /// object built before the instance was supplied is destroyed.
    pub fn get_or_external<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        external: Option<ObjectID>,
    ) -> ObjectID {
        match external {
            Some(object) => {
                if self.object.is_some_and(|owned| owned != object) && self.release(bridge) {
                    log::debug!("released owned {} in favor of {object}", self.kind.name());
                }
                object
            }
            None => self.get(bridge),
        }
    }

    /// Destroys the owned object. External instances never pass through here.
    pub fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> bool {
        match self.object.take() {
            Some(object) => bridge.destroy(object),
            None => false,
        }
    }
}
