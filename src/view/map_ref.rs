use std::{
    fmt,
    rc::{Rc, Weak},
};

/// Non-owning reference to a host's live map
///
/// Hosts hand these to their markers and to imperative handles. The map stays
/// owned by the host: once the host disposes it, every `MapRef` reads as
/// empty.
pub struct MapRef<M> {
    map: Weak<M>,
}

impl<M> MapRef<M> {
    pub fn new(map: &Rc<M>) -> Self {
        Self {
            map: Rc::downgrade(map),
        }
    }

    /// A reference to no map at all ("not ready yet")
    pub fn empty() -> Self {
        Self { map: Weak::new() }
    }

    /// The map, if it is still alive
    pub fn get(&self) -> Option<Rc<M>> {
        self.map.upgrade()
    }

    pub fn is_live(&self) -> bool {
        self.map.strong_count() > 0
    }

    /// Whether both references point at the same map instance
    pub fn same_map(&self, other: &MapRef<M>) -> bool {
        self.is_live() && Weak::ptr_eq(&self.map, &other.map)
    }
}

impl<M> Clone for MapRef<M> {
    fn clone(&self) -> Self {
        Self {
            map: Weak::clone(&self.map),
        }
    }
}

impl<M> Default for MapRef<M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<M> fmt::Debug for MapRef<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MapRef")
            .field("live", &self.is_live())
            .finish()
    }
}
