use prism_ids::{ListenerID, ObjectID};

/// Callback invoked with the representation's current input data object.
pub type DataListener = Box<dyn FnMut(Option<ObjectID>)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataEvent {
    /// Fired once each time data goes from absent to present.
    Available,
    /// Fired after every data update, including the one that made data available.
    Changed,
}

/// Listeners of one representation's data events. Ids are unique across both events.
///
/// When the index space runs out the generation advances, so a recycled index never matches
/// an id handed out earlier.
#[derive(Default)]
pub struct DataEventHub {
    next_index: u32,
    generation: u32,
    listeners: Vec<(ListenerID, DataEvent, DataListener)>,
}

impl DataEventHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, event: DataEvent, listener: DataListener) -> ListenerID {
        if self.next_index == u32::MAX {
            self.next_index = 0;
            self.generation = self.generation.wrapping_add(1);
        }
        self.next_index += 1;
        let id = ListenerID::from_parts(self.next_index, self.generation);
        self.listeners.push((id, event, listener));
        id
    }

    /// Returns `false` when `id` was not registered (or already removed).
    pub fn remove(&mut self, id: ListenerID) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(held, _, _)| *held != id);
        before != self.listeners.len()
    }

    /// Calls the listeners of `event` in registration order; returns how many ran.
    pub fn dispatch(&mut self, event: DataEvent, data: Option<ObjectID>) -> usize {
        let mut called = 0;
        for (_, _, listener) in self
            .listeners
            .iter_mut()
            .filter(|(_, wanted, _)| *wanted == event)
        {
            listener(data);
            called += 1;
        }
        called
    }

    pub fn count(&self, event: DataEvent) -> usize {
        self.listeners
            .iter()
            .filter(|(_, wanted, _)| *wanted == event)
            .count()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
