//! In-process engine with no rendering backend
//!
//! `HeadlessEngine` keeps a real viewport (center, zoom, container size, zoom
//! limits), computes Web Mercator bounds, dispatches events to registered
//! listeners and records every mutation in a shared [`Journal`]. It backs the
//! test suite and the demo binary, and can drive the adapter anywhere no
//! graphical engine is available.

use crate::{
    core::{
        constants::DEFAULT_CONTAINER_SIZE,
        geo::{LatLng, LatLngBounds, Point},
    },
    engine::{
        EngineMap, EngineMarker, Evented, Icon, MapEngine, MapOptions, MarkerOptions,
        TileLayerSpec,
    },
    input::{listeners::dispatch, EventKind, Listener, ListenerId, ListenerRegistry, NativeEvent},
    MapError, Result,
};
use std::{
    cell::{Cell, RefCell},
    rc::{Rc, Weak},
};

/// Identifies a marker in the journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// One state-changing call received by the engine
#[derive(Debug, Clone, PartialEq)]
pub enum EngineCall {
    CreateMap {
        center: LatLng,
        zoom: f64,
        min_zoom: Option<f64>,
        max_zoom: Option<f64>,
    },
    PanTo(LatLng),
    /// Zoom as requested by the caller, before the engine's own limits apply
    SetZoom(f64),
    RemoveMap,
    AddMarker {
        id: MarkerId,
        position: LatLng,
        options: MarkerOptions,
    },
    SetOpacity(MarkerId, f64),
    SetIcon(MarkerId, Icon),
    SetLatLng(MarkerId, LatLng),
    RemoveMarker(MarkerId),
}

impl EngineCall {
    pub fn is_pan(&self) -> bool {
        matches!(self, EngineCall::PanTo(_))
    }
}

/// Shared, append-only record of engine calls
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<EngineCall>>>);

impl Journal {
    fn record(&self, call: EngineCall) {
        log::trace!("engine call: {:?}", call);
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<EngineCall> {
        self.0.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub fn count<F>(&self, predicate: F) -> usize
    where
        F: Fn(&EngineCall) -> bool,
    {
        self.0.borrow().iter().filter(|call| predicate(call)).count()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }
}

/// Rendering surface for headless maps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadlessContainer {
    pub size: Point,
}

impl HeadlessContainer {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Point::new(width, height),
        }
    }
}

impl Default for HeadlessContainer {
    fn default() -> Self {
        Self::new(DEFAULT_CONTAINER_SIZE.0, DEFAULT_CONTAINER_SIZE.1)
    }
}

#[derive(Debug, Default)]
pub struct HeadlessEngine {
    journal: Journal,
    maps_created: Cell<usize>,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub fn maps_created(&self) -> usize {
        self.maps_created.get()
    }
}

impl MapEngine for HeadlessEngine {
    type Container = HeadlessContainer;
    type Map = HeadlessMap;

    fn create_map(&self, container: &HeadlessContainer, options: MapOptions) -> Result<HeadlessMap> {
        if container.size.x <= 0.0 || container.size.y <= 0.0 {
            return Err(MapError::Construction(format!(
                "container has no area ({}x{})",
                container.size.x, container.size.y
            ))
            .into());
        }

        self.journal.record(EngineCall::CreateMap {
            center: options.center,
            zoom: options.zoom,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
        });
        self.maps_created.set(self.maps_created.get() + 1);

        Ok(HeadlessMap::new(container.size, options, self.journal.clone()))
    }
}

/// The current view of a headless map
#[derive(Debug, Clone, PartialEq)]
struct Viewport {
    center: LatLng,
    zoom: f64,
    size: Point,
    min_zoom: Option<f64>,
    max_zoom: Option<f64>,
}

impl Viewport {
    fn limit_zoom(&self, zoom: f64) -> f64 {
        let zoom = self.max_zoom.map_or(zoom, |max| zoom.min(max));
        self.min_zoom.map_or(zoom, |min| zoom.max(min))
    }

    fn bounds(&self) -> LatLngBounds {
        let center = self.center.project(self.zoom);
        let half = Point::new(self.size.x / 2.0, self.size.y / 2.0);
        // Pixel y grows southwards.
        let south_west = LatLng::unproject(&Point::new(center.x - half.x, center.y + half.y), self.zoom);
        let north_east = LatLng::unproject(&Point::new(center.x + half.x, center.y - half.y), self.zoom);
        LatLngBounds::new(south_west, north_east)
    }

    fn container_point(&self, lat_lng: &LatLng) -> Point {
        let origin = self
            .center
            .project(self.zoom)
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0));
        lat_lng.project(self.zoom).subtract(&origin)
    }
}

struct MapState {
    viewport: Viewport,
    layers: Vec<TileLayerSpec>,
    listeners: ListenerRegistry,
    markers: Vec<Rc<RefCell<MarkerState>>>,
    next_marker_id: u64,
    loaded: bool,
    removed: bool,
}

pub struct HeadlessMap {
    state: Rc<RefCell<MapState>>,
    journal: Journal,
}

impl HeadlessMap {
    fn new(size: Point, options: MapOptions, journal: Journal) -> Self {
        let mut viewport = Viewport {
            center: options.center,
            zoom: options.zoom,
            size,
            min_zoom: options.min_zoom,
            max_zoom: options.max_zoom,
        };
        viewport.zoom = viewport.limit_zoom(viewport.zoom);

        Self {
            state: Rc::new(RefCell::new(MapState {
                viewport,
                layers: options.layers,
                listeners: ListenerRegistry::new(),
                markers: Vec::new(),
                next_marker_id: 0,
                loaded: false,
                removed: false,
            })),
            journal,
        }
    }

    fn emit(&self, event: NativeEvent) {
        let snapshot = self.state.borrow().listeners.snapshot(event.kind);
        dispatch(snapshot, &event);
    }

    fn is_live(&self) -> bool {
        !self.state.borrow().removed
    }

    /// Signals that the first view is ready, as a renderer would after its
    /// initial layout.
    pub fn fire_load(&self) {
        if !self.is_live() {
            return;
        }
        self.state.borrow_mut().loaded = true;
        self.emit(NativeEvent::new(EventKind::Load));
    }

    /// Simulates one step of a user drag that leaves the map centered on `center`.
    pub fn drag_to(&self, center: LatLng) {
        if !self.is_live() {
            return;
        }
        self.state.borrow_mut().viewport.center = center;
        self.emit(NativeEvent::new(EventKind::Drag));
        self.emit(NativeEvent::new(EventKind::Move));
    }

    /// Simulates releasing a drag.
    pub fn end_drag(&self) {
        if !self.is_live() {
            return;
        }
        self.emit(NativeEvent::new(EventKind::DragEnd));
        self.emit(NativeEvent::new(EventKind::MoveEnd));
    }

    pub fn is_loaded(&self) -> bool {
        self.state.borrow().loaded
    }

    pub fn is_removed(&self) -> bool {
        self.state.borrow().removed
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state.borrow().listeners.listener_count(kind)
    }

    pub fn total_listeners(&self) -> usize {
        self.state.borrow().listeners.total_listeners()
    }

    pub fn marker_count(&self) -> usize {
        self.state.borrow().markers.len()
    }

    pub fn tile_layers(&self) -> Vec<TileLayerSpec> {
        self.state.borrow().layers.clone()
    }

    pub fn min_zoom(&self) -> Option<f64> {
        self.state.borrow().viewport.min_zoom
    }

    pub fn max_zoom(&self) -> Option<f64> {
        self.state.borrow().viewport.max_zoom
    }
}

impl Evented for HeadlessMap {
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.state.borrow_mut().listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().listeners.remove(id)
    }
}

impl EngineMap for HeadlessMap {
    type Marker = HeadlessMarker;

    fn pan_to(&self, center: LatLng) {
        if !self.is_live() {
            return;
        }
        self.journal.record(EngineCall::PanTo(center));

        let changed = {
            let mut state = self.state.borrow_mut();
            let changed = state.viewport.center != center;
            state.viewport.center = center;
            changed
        };
        if changed {
            self.emit(NativeEvent::new(EventKind::Move));
            self.emit(NativeEvent::new(EventKind::MoveEnd));
        }
    }

    fn set_zoom(&self, zoom: f64) {
        if !self.is_live() {
            return;
        }
        self.journal.record(EngineCall::SetZoom(zoom));

        let changed = {
            let mut state = self.state.borrow_mut();
            let limited = state.viewport.limit_zoom(zoom);
            let changed = state.viewport.zoom != limited;
            state.viewport.zoom = limited;
            changed
        };
        if changed {
            self.emit(NativeEvent::new(EventKind::Move));
            self.emit(NativeEvent::new(EventKind::MoveEnd));
        }
    }

    fn zoom(&self) -> f64 {
        self.state.borrow().viewport.zoom
    }

    fn center(&self) -> LatLng {
        self.state.borrow().viewport.center
    }

    fn bounds(&self) -> LatLngBounds {
        self.state.borrow().viewport.bounds()
    }

    fn remove(&self) {
        let markers = {
            let mut state = self.state.borrow_mut();
            if state.removed {
                return;
            }
            state.removed = true;
            state.listeners.clear();
            std::mem::take(&mut state.markers)
        };

        for marker in markers {
            let mut marker = marker.borrow_mut();
            marker.removed = true;
            marker.listeners.clear();
        }
        self.journal.record(EngineCall::RemoveMap);
    }

    fn add_marker(&self, position: LatLng, options: MarkerOptions) -> HeadlessMarker {
        let mut state = self.state.borrow_mut();
        state.next_marker_id += 1;
        let id = MarkerId(state.next_marker_id);

        let marker = Rc::new(RefCell::new(MarkerState {
            id,
            position,
            title: options.title.clone(),
            opacity: options.opacity.unwrap_or(1.0),
            icon: options.icon.clone(),
            listeners: ListenerRegistry::new(),
            // A marker added to a removed map never shows up.
            removed: state.removed,
        }));

        if !state.removed {
            state.markers.push(Rc::clone(&marker));
            self.journal.record(EngineCall::AddMarker {
                id,
                position,
                options,
            });
        }

        HeadlessMarker {
            state: marker,
            map: Rc::downgrade(&self.state),
            journal: self.journal.clone(),
        }
    }
}

struct MarkerState {
    id: MarkerId,
    position: LatLng,
    title: String,
    opacity: f64,
    icon: Option<Icon>,
    listeners: ListenerRegistry,
    removed: bool,
}

pub struct HeadlessMarker {
    state: Rc<RefCell<MarkerState>>,
    map: Weak<RefCell<MapState>>,
    journal: Journal,
}

impl HeadlessMarker {
    fn is_live(&self) -> bool {
        !self.state.borrow().removed
    }

    pub fn id(&self) -> MarkerId {
        self.state.borrow().id
    }

    pub fn position(&self) -> LatLng {
        self.state.borrow().position
    }

    pub fn title(&self) -> String {
        self.state.borrow().title.clone()
    }

    pub fn opacity(&self) -> f64 {
        self.state.borrow().opacity
    }

    pub fn icon(&self) -> Option<Icon> {
        self.state.borrow().icon.clone()
    }

    pub fn is_removed(&self) -> bool {
        self.state.borrow().removed
    }

    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.state.borrow().listeners.listener_count(kind)
    }

    /// Simulates a pointer click on the marker.
    pub fn click(&self) {
        let (snapshot, position) = {
            let state = self.state.borrow();
            if state.removed {
                return;
            }
            (state.listeners.snapshot(EventKind::Click), state.position)
        };

        let container_point = self
            .map
            .upgrade()
            .map(|map| map.borrow().viewport.container_point(&position))
            .unwrap_or_default();

        let event = NativeEvent::new(EventKind::Click).with_position(position, container_point);
        dispatch(snapshot, &event);
    }
}

impl Evented for HeadlessMarker {
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.state.borrow_mut().listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.state.borrow_mut().listeners.remove(id)
    }
}

impl EngineMarker for HeadlessMarker {
    fn set_opacity(&self, opacity: f64) {
        if !self.is_live() {
            return;
        }
        let id = {
            let mut state = self.state.borrow_mut();
            state.opacity = opacity;
            state.id
        };
        self.journal.record(EngineCall::SetOpacity(id, opacity));
    }

    fn set_icon(&self, icon: Icon) {
        if !self.is_live() {
            return;
        }
        let id = {
            let mut state = self.state.borrow_mut();
            state.icon = Some(icon.clone());
            state.id
        };
        self.journal.record(EngineCall::SetIcon(id, icon));
    }

    fn set_lat_lng(&self, position: LatLng) {
        if !self.is_live() {
            return;
        }
        let id = {
            let mut state = self.state.borrow_mut();
            state.position = position;
            state.id
        };
        self.journal.record(EngineCall::SetLatLng(id, position));
    }

    fn remove(&self) {
        let id = {
            let mut state = self.state.borrow_mut();
            if state.removed {
                return;
            }
            state.removed = true;
            state.listeners.clear();
            state.id
        };

        if let Some(map) = self.map.upgrade() {
            map.borrow_mut()
                .markers
                .retain(|marker| !Rc::ptr_eq(marker, &self.state));
        }
        self.journal.record(EngineCall::RemoveMarker(id));
    }
}
