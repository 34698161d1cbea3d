use ahash::AHashSet;
use prism_bridge::NativeBridge;
use prism_ids::ObjectID;

/// Collects render requests for windows and issues one draw per window per flush.
#[derive(Default)]
pub struct RenderScheduler {
    queued: Vec<ObjectID>,
    queued_set: AHashSet<ObjectID>,
    issued: u64,
}

impl RenderScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the window already has a draw queued.
    pub fn request(&mut self, window: ObjectID) -> bool {
        if !self.queued_set.insert(window) {
            return false;
        }
        self.queued.push(window);
        true
    }

    #[inline]
    pub fn pending(&self) -> usize {
        self.queued.len()
    }

    /// Total draws issued over the scheduler's lifetime.
    #[inline]
    pub fn issued(&self) -> u64 {
        self.issued
    }

    pub fn flush<B: NativeBridge + ?Sized>(&mut self, bridge: &mut B) -> usize {
        let count = self.queued.len();
        for window in self.queued.drain(..) {
            bridge.render(window);
        }
        self.queued_set.clear();
        self.issued += count as u64;
        if count > 0 {
            log::debug!("flushed {count} render request(s)");
        }
        count
    }
}
