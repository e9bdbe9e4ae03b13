pub mod events;
pub mod listeners;

// Re-export the essential types
pub use events::{
    EventAction, EventKind, MarkerPressEvent, NativeEvent, PanDragEvent, RegionChangeDetails,
};
pub use listeners::{Listener, ListenerId, ListenerRegistry};
