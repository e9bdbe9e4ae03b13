//! Declarative map view hosted on an imperative engine
//!
//! [`MapHost`] owns one engine map for its lifetime. Each `render` call:
//!
//! 1. builds the map the first time a container is available,
//! 2. pans to `region` when its center differs from the last one applied,
//! 3. (re)subscribes the engine events when the callback set changed,
//! 4. reconciles the keyed marker children against the live map.
//!
//! The last-applied center is only ever written from props, never from
//! engine events, so engine moves cannot echo back as pans.

use crate::{
    core::{
        config::MapViewOptions,
        convert::ZoomRange,
        region::{Boundaries, Camera, Coordinate, Region},
    },
    engine::{EngineMap, Evented, MapEngine, MapOptions, TileLayerSpec},
    input::{EventKind, Listener, NativeEvent, PanDragEvent, RegionChangeDetails},
    prelude::HashMap,
    view::{
        callback::Callback,
        effect::{Cleanup, Effect},
        map_ref::MapRef,
        marker::{MarkerAdapter, MarkerProps},
    },
};
use async_trait::async_trait;
use std::{
    cell::{Cell, RefCell},
    rc::Rc,
};

/// Region-change callback: the new region and whether a gesture caused it
pub type RegionCallback = Callback<(Region, RegionChangeDetails)>;

/// Props of the declarative map view
#[derive(Debug, Clone, Default)]
pub struct MapViewProps {
    pub region: Option<Region>,
    pub initial_region: Option<Region>,
    pub min_zoom_level: Option<f64>,
    pub max_zoom_level: Option<f64>,
    pub on_map_ready: Option<Callback<()>>,
    pub on_region_change: Option<RegionCallback>,
    pub on_region_change_complete: Option<RegionCallback>,
    pub on_pan_drag: Option<Callback<PanDragEvent>>,
    /// Keyed marker children, in declaration order
    pub markers: Vec<(String, MarkerProps)>,
}

impl MapViewProps {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_initial_region(mut self, region: Region) -> Self {
        self.initial_region = Some(region);
        self
    }

    pub fn with_zoom_levels(mut self, min: Option<f64>, max: Option<f64>) -> Self {
        self.min_zoom_level = min;
        self.max_zoom_level = max;
        self
    }

    pub fn on_map_ready(mut self, callback: impl Into<Callback<()>>) -> Self {
        self.on_map_ready = Some(callback.into());
        self
    }

    pub fn on_region_change(mut self, callback: impl Into<RegionCallback>) -> Self {
        self.on_region_change = Some(callback.into());
        self
    }

    pub fn on_region_change_complete(mut self, callback: impl Into<RegionCallback>) -> Self {
        self.on_region_change_complete = Some(callback.into());
        self
    }

    pub fn on_pan_drag(mut self, callback: impl Into<Callback<PanDragEvent>>) -> Self {
        self.on_pan_drag = Some(callback.into());
        self
    }

    pub fn with_marker(mut self, key: impl Into<String>, props: MarkerProps) -> Self {
        self.markers.push((key.into(), props));
        self
    }

    fn zoom_range(&self) -> ZoomRange {
        ZoomRange::new(self.min_zoom_level, self.max_zoom_level)
    }

    fn event_deps(&self) -> EventDeps {
        EventDeps {
            on_map_ready: self.on_map_ready.clone(),
            on_region_change: self.on_region_change.clone(),
            on_region_change_complete: self.on_region_change_complete.clone(),
            on_pan_drag: self.on_pan_drag.clone(),
        }
    }
}

/// Callback identities the engine subscriptions close over
#[derive(Debug, Clone, PartialEq)]
struct EventDeps {
    on_map_ready: Option<Callback<()>>,
    on_region_change: Option<RegionCallback>,
    on_region_change_complete: Option<RegionCallback>,
    on_pan_drag: Option<Callback<PanDragEvent>>,
}

pub struct MapHost<E: MapEngine> {
    engine: E,
    options: MapViewOptions,
    map: Option<Rc<E::Map>>,
    /// Center last applied from declarative props
    center: Option<Coordinate>,
    zoom_range: Rc<Cell<ZoomRange>>,
    /// Map slot shared with every handle, filled on construction
    shared_map: Rc<RefCell<MapRef<E::Map>>>,
    events: Effect<EventDeps>,
    /// Marker children indexed by key
    markers: HashMap<String, MarkerAdapter<E::Map>>,
    /// Keys in declaration order
    marker_order: Vec<String>,
}

impl<E: MapEngine> MapHost<E> {
    pub fn new(engine: E) -> Self {
        Self::with_options(engine, MapViewOptions::default())
    }

    pub fn with_options(engine: E, options: MapViewOptions) -> Self {
        Self {
            engine,
            options,
            map: None,
            center: None,
            zoom_range: Rc::new(Cell::new(ZoomRange::default())),
            shared_map: Rc::new(RefCell::new(MapRef::empty())),
            events: Effect::new(),
            markers: HashMap::default(),
            marker_order: Vec::new(),
        }
    }

    /// Reconciles `props` onto the engine. `container` is the rendering
    /// surface, once it exists.
    pub fn render(&mut self, props: &MapViewProps, container: Option<&E::Container>) {
        self.zoom_range.set(props.zoom_range());

        if self.center.is_none() {
            self.center = Some(initial_center(props));
        }

        if self.map.is_none() {
            if let Some(container) = container {
                self.construct(container, props.zoom_range());
            }
        }

        self.sync_region(props.region);

        if let Some(map) = &self.map {
            let map = Rc::clone(map);
            self.events
                .run(props.event_deps(), |deps| subscribe(&map, deps));
        }

        self.reconcile_markers(&props.markers);
    }

    fn construct(&mut self, container: &E::Container, zoom_range: ZoomRange) {
        let center = self.center.unwrap_or_default();
        let tile_layer = &self.options.tile_layer;
        let options = MapOptions {
            layers: vec![TileLayerSpec {
                url_template: tile_layer.url_template.clone(),
                attribution: tile_layer.attribution.clone(),
                subdomains: tile_layer.subdomains.clone(),
            }],
            center: center.into(),
            zoom: zoom_range.clamp(self.options.default_zoom),
            min_zoom: zoom_range.valid_min(),
            max_zoom: zoom_range.valid_max(),
        };

        match self.engine.create_map(container, options) {
            Ok(map) => {
                log::debug!(
                    "map constructed at ({}, {}) zoom {}",
                    center.latitude,
                    center.longitude,
                    map.zoom()
                );
                let map = Rc::new(map);
                *self.shared_map.borrow_mut() = MapRef::new(&map);
                self.map = Some(map);
            }
            Err(e) => {
                log::warn!("map construction failed, will retry on next render: {}", e);
            }
        }
    }

    fn sync_region(&mut self, region: Option<Region>) {
        let Some(region) = region else {
            return;
        };

        let next = region.center();
        if next.latitude.is_nan() || next.longitude.is_nan() {
            log::warn!("ignoring region with a NaN center");
            return;
        }
        if self.center == Some(next) {
            return;
        }

        self.center = Some(next);
        if let Some(map) = &self.map {
            log::debug!("panning to ({}, {})", next.latitude, next.longitude);
            map.pan_to(next.into());
        }
    }

    fn reconcile_markers(&mut self, children: &[(String, MarkerProps)]) {
        let map_ref = self.map_ref();
        let mut order = Vec::with_capacity(children.len());

        for (key, props) in children {
            if order.contains(key) {
                log::warn!("duplicate marker key {:?}; later entry ignored", key);
                continue;
            }
            self.markers
                .entry(key.clone())
                .or_default()
                .update(&map_ref, props);
            order.push(key.clone());
        }

        for key in &self.marker_order {
            if !order.contains(key) {
                if let Some(adapter) = self.markers.remove(key) {
                    adapter.unmount();
                }
            }
        }
        self.marker_order = order;
    }

    /// Non-owning reference to the live map, for marker children
    pub fn map_ref(&self) -> MapRef<E::Map> {
        self.map.as_ref().map(MapRef::new).unwrap_or_default()
    }

    /// Imperative handle for the parent of the view
    pub fn handle(&self) -> MapViewRef<E::Map> {
        MapViewRef {
            map: Rc::clone(&self.shared_map),
            zoom_range: Rc::clone(&self.zoom_range),
        }
    }

    pub fn is_constructed(&self) -> bool {
        self.map.is_some()
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn marker(&self, key: &str) -> Option<&MarkerAdapter<E::Map>> {
        self.markers.get(key)
    }

    /// Marker children in declaration order
    pub fn marker_keys(&self) -> &[String] {
        &self.marker_order
    }

    /// Tears the view down: markers first, then subscriptions, then the map.
    pub fn unmount(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        for key in std::mem::take(&mut self.marker_order) {
            if let Some(adapter) = self.markers.remove(&key) {
                adapter.unmount();
            }
        }
        self.markers.clear();
        self.events.dispose();
        *self.shared_map.borrow_mut() = MapRef::empty();

        if let Some(map) = self.map.take() {
            log::debug!("removing map");
            map.remove();
        }
    }
}

impl<E: MapEngine> Drop for MapHost<E> {
    fn drop(&mut self) {
        self.teardown();
    }
}

fn initial_center(props: &MapViewProps) -> Coordinate {
    match props.region.or(props.initial_region) {
        Some(region) => region.center(),
        None => {
            log::warn!("neither region nor initial_region given; centering on (0, 0)");
            Coordinate::default()
        }
    }
}

/// Attaches the engine listeners for one callback set.
fn subscribe<M: EngineMap + 'static>(map: &Rc<M>, deps: &EventDeps) -> Option<Cleanup> {
    log::debug!("subscribing map events");
    let weak = Rc::downgrade(map);
    let mut ids = Vec::with_capacity(5);

    let on_map_ready = deps.on_map_ready.clone();
    let load: Listener = Rc::new(move |_: &NativeEvent| {
        if let Some(on_map_ready) = &on_map_ready {
            on_map_ready.emit(());
        }
    });
    ids.push(map.add_listener(EventKind::Load, load));

    let on_move: Listener = {
        let weak = weak.clone();
        let on_pan_drag = deps.on_pan_drag.clone();
        let on_region_change = deps.on_region_change.clone();
        Rc::new(move |event: &NativeEvent| {
            let Some(map) = weak.upgrade() else {
                return;
            };
            let center: Coordinate = map.center().into();
            log::trace!("{} at ({}, {})", event.kind, center.latitude, center.longitude);

            if let Some(on_pan_drag) = &on_pan_drag {
                on_pan_drag.emit(PanDragEvent {
                    native: event.clone(),
                    coordinate: center,
                });
            }
            if let Some(on_region_change) = &on_region_change {
                on_region_change.emit((Region::from_center(center), event.kind.into()));
            }
        })
    };
    ids.push(map.add_listener(EventKind::Drag, Rc::clone(&on_move)));
    ids.push(map.add_listener(EventKind::Move, on_move));

    let on_move_end: Listener = {
        let weak = weak.clone();
        let on_complete = deps.on_region_change_complete.clone();
        Rc::new(move |event: &NativeEvent| {
            let Some(map) = weak.upgrade() else {
                return;
            };
            if let Some(on_complete) = &on_complete {
                let center: Coordinate = map.center().into();
                on_complete.emit((Region::from_center(center), event.kind.into()));
            }
        })
    };
    ids.push(map.add_listener(EventKind::DragEnd, Rc::clone(&on_move_end)));
    ids.push(map.add_listener(EventKind::MoveEnd, on_move_end));

    Some(Box::new(move || {
        if let Some(map) = weak.upgrade() {
            log::debug!("unsubscribing map events");
            for id in ids {
                map.remove_listener(id);
            }
        }
    }))
}

/// Imperative operations the parent of a map view may call
///
/// Queries are asynchronous to match a bridge-style calling convention; they
/// resolve immediately from the engine's current state.
#[async_trait(?Send)]
pub trait MapViewHandle {
    /// Visible area, or `None` before the map exists
    async fn get_map_boundaries(&self) -> Option<Boundaries>;

    /// Current camera, or `None` before the map exists
    async fn get_camera(&self) -> Option<Camera>;

    /// Applies the camera's zoom, clamped to the view's zoom levels.
    async fn set_camera(&self, camera: Camera);
}

/// Handle to a host's map, independent of re-renders
///
/// Handles taken before the map exists see it once the host builds it.
pub struct MapViewRef<M> {
    map: Rc<RefCell<MapRef<M>>>,
    zoom_range: Rc<Cell<ZoomRange>>,
}

impl<M: EngineMap> MapViewRef<M> {
    pub fn get_map(&self) -> MapRef<M> {
        self.map.borrow().clone()
    }

    fn live_map(&self) -> Option<Rc<M>> {
        self.map.borrow().get()
    }

    pub fn boundaries(&self) -> Option<Boundaries> {
        self.live_map().map(|map| map.bounds().into())
    }

    pub fn camera(&self) -> Option<Camera> {
        self.live_map()
            .map(|map| Camera::flat(map.center().into(), map.zoom()))
    }

    pub fn apply_camera(&self, camera: &Camera) {
        let Some(map) = self.live_map() else {
            return;
        };

        let zoom = self.zoom_range.get().clamp(camera.zoom);
        if zoom != map.zoom() {
            map.set_zoom(zoom);
        }
    }
}

impl<M> Clone for MapViewRef<M> {
    fn clone(&self) -> Self {
        Self {
            map: Rc::clone(&self.map),
            zoom_range: Rc::clone(&self.zoom_range),
        }
    }
}

#[async_trait(?Send)]
impl<M: EngineMap + 'static> MapViewHandle for MapViewRef<M> {
    async fn get_map_boundaries(&self) -> Option<Boundaries> {
        self.boundaries()
    }

    async fn get_camera(&self) -> Option<Camera> {
        self.camera()
    }

    async fn set_camera(&self, camera: Camera) {
        self.apply_camera(&camera)
    }
}
