use prism_bridge::NativeBridge;
use prism_ids::{NodeID, ObjectID, SubscriptionID};

/// Modified-notification subscriptions one node holds on externally supplied objects.
///
/// Each distinct target holds exactly one subscription no matter how many times it is listed.
#[derive(Debug, Default)]
pub struct ModifiedSubscriptions {
    active: Vec<(ObjectID, SubscriptionID)>,
}

impl ModifiedSubscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the held set equal to `targets`.
    ///
    /// Subscriptions on objects no longer listed are cancelled before new ones are taken.
    /// Returns whether the set changed.
    pub fn sync<B: NativeBridge + ?Sized>(
        &mut self,
        bridge: &mut B,
        owner: NodeID,
        targets: &[ObjectID],
    ) -> bool {
        let mut changed = false;
        self.active.retain(|(object, subscription)| {
            if targets.contains(object) {
                return true;
            }
            bridge.unsubscribe(*subscription);
            changed = true;
            false
        });

        for &object in targets {
            if self.active.iter().any(|(held, _)| *held == object) {
                continue;
            }
            match bridge.subscribe_modified(object, owner) {
                Some(subscription) => {
                    self.active.push((object, subscription));
                    changed = true;
                }
                None => log::debug!("cannot watch {object} for {owner}: object is gone"),
            }
        }
        changed
    }

    #[inline]
    pub fn holds(&self, subscription: SubscriptionID) -> bool {
        self.active.iter().any(|(_, held)| *held == subscription)
    }

    pub fn objects(&self) -> impl Iterator<Item = ObjectID> + '_ {
        self.active.iter().map(|(object, _)| *object)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.active.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Cancels everything held. Safe to call repeatedly.
    pub fn release<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> usize {
        let count = self.active.len();
        for (_, subscription) in self.active.drain(..) {
            bridge.unsubscribe(subscription);
        }
        count
    }
}
