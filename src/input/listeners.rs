use crate::{
    input::events::{EventKind, NativeEvent},
    prelude::HashMap,
};
use std::rc::Rc;

/// Engine-side event listener
pub type Listener = Rc<dyn Fn(&NativeEvent)>;

/// Handle returned when a listener is registered, used to remove it again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Per-object listener bookkeeping for engine objects
#[derive(Default)]
pub struct ListenerRegistry {
    /// Event listeners by event kind, in registration order
    listeners: HashMap<EventKind, Vec<(ListenerId, Listener)>>,
    next_id: u64,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an event listener
    pub fn add(&mut self, kind: EventKind, listener: Listener) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.listeners.entry(kind).or_default().push((id, listener));
        id
    }

    /// Remove a listener; unknown or already removed ids are ignored
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for entries in self.listeners.values_mut() {
            if let Some(pos) = entries.iter().position(|(entry_id, _)| *entry_id == id) {
                entries.remove(pos);
                return true;
            }
        }
        false
    }

    /// Listeners for `kind` at this instant.
    ///
    /// Callers invoke the snapshot after releasing any borrow of the
    /// registry, so listeners may re-enter the emitting object.
    pub fn snapshot(&self, kind: EventKind) -> Vec<Listener> {
        self.listeners
            .get(&kind)
            .map(|entries| entries.iter().map(|(_, l)| Rc::clone(l)).collect())
            .unwrap_or_default()
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners.get(&kind).map(Vec::len).unwrap_or(0)
    }

    pub fn total_listeners(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }
}

/// Invokes every listener in `snapshot` with `event`.
pub fn dispatch(snapshot: Vec<Listener>, event: &NativeEvent) {
    for listener in snapshot {
        listener(event);
    }
}
