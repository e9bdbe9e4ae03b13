//! Declarative marker reconciled onto an engine marker
//!
//! A [`MarkerAdapter`] owns at most one engine marker. It creates the marker
//! the first time both a live map and a coordinate are available, then only
//! forwards the props that changed since the last render: opacity, icon and
//! position. The click listener is an [`Effect`] keyed on everything the
//! press event closes over, so it is replaced rather than stacked.

use crate::{
    core::{
        constants::DEFAULT_MARKER_OPACITY,
        geo::Point,
        region::Coordinate,
    },
    engine::{EngineMap, EngineMarker, Evented, Icon, MarkerOptions},
    input::{EventAction, EventKind, Listener, MarkerPressEvent, NativeEvent},
    view::{
        callback::Callback,
        effect::{Cleanup, Effect},
        map_ref::MapRef,
    },
};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// Image prop: a bare URL or a structured image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImageSource {
    Uri(String),
    Image {
        #[serde(default)]
        uri: Option<String>,
        #[serde(default)]
        width: Option<f64>,
        #[serde(default)]
        height: Option<f64>,
    },
}

impl ImageSource {
    pub fn image(uri: impl Into<String>, width: f64, height: f64) -> Self {
        ImageSource::Image {
            uri: Some(uri.into()),
            width: Some(width),
            height: Some(height),
        }
    }

    /// URL of the image; a structured reference without one yields "".
    pub fn url(&self) -> &str {
        match self {
            ImageSource::Uri(uri) => uri,
            ImageSource::Image { uri, .. } => uri.as_deref().unwrap_or(""),
        }
    }

    /// Size declared on a structured reference. A missing or zero dimension
    /// on its own does not count as a declaration.
    pub fn explicit_size(&self) -> Option<Point> {
        match self {
            ImageSource::Image { width, height, .. } => {
                let declared = |v: &Option<f64>| v.is_some_and(|v| v != 0.0 && !v.is_nan());
                if declared(width) || declared(height) {
                    Some(Point::new(width.unwrap_or(0.0), height.unwrap_or(0.0)))
                } else {
                    None
                }
            }
            ImageSource::Uri(_) => None,
        }
    }
}

impl From<&str> for ImageSource {
    fn from(uri: &str) -> Self {
        ImageSource::Uri(uri.to_string())
    }
}

impl From<String> for ImageSource {
    fn from(uri: String) -> Self {
        ImageSource::Uri(uri)
    }
}

/// Icon size: `icon`'s declared size, else `image`'s, else engine default.
pub fn icon_size(icon: Option<&ImageSource>, image: Option<&ImageSource>) -> Option<Point> {
    icon.and_then(ImageSource::explicit_size)
        .or_else(|| image.and_then(ImageSource::explicit_size))
}

/// Icon URL: `icon` wins over `image`; neither gives "".
pub fn icon_url(icon: Option<&ImageSource>, image: Option<&ImageSource>) -> String {
    icon.or(image).map(|source| source.url().to_string()).unwrap_or_default()
}

/// Builds the custom icon, or `None` to keep the engine's default glyph.
pub fn resolve_icon(
    icon: Option<&ImageSource>,
    image: Option<&ImageSource>,
    anchor: Option<Point>,
) -> Option<Icon> {
    if icon.is_none() && image.is_none() {
        return None;
    }

    let url = icon_url(icon, image);
    Some(Icon {
        retina_url: url.clone(),
        url,
        size: icon_size(icon, image),
        anchor,
    })
}

/// Marker title: "title - description", whichever is present, or "".
pub fn marker_title(title: Option<&str>, description: Option<&str>) -> String {
    let title = title.filter(|s| !s.is_empty());
    let description = description.filter(|s| !s.is_empty());

    match (title, description) {
        (Some(title), Some(description)) => format!("{} - {}", title, description),
        (Some(only), None) | (None, Some(only)) => only.to_string(),
        (None, None) => String::new(),
    }
}

/// Props of one declarative marker
#[derive(Debug, Clone, Default)]
pub struct MarkerProps {
    pub identifier: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<ImageSource>,
    pub icon: Option<ImageSource>,
    pub opacity: Option<f64>,
    pub coordinate: Option<Coordinate>,
    pub anchor: Option<Point>,
    pub on_press: Option<Callback<MarkerPressEvent>>,
}

impl MarkerProps {
    pub fn new(coordinate: Coordinate) -> Self {
        Self {
            coordinate: Some(coordinate),
            ..Self::default()
        }
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<ImageSource>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn with_icon(mut self, icon: impl Into<ImageSource>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_anchor(mut self, anchor: Point) -> Self {
        self.anchor = Some(anchor);
        self
    }

    pub fn with_coordinate(mut self, coordinate: Coordinate) -> Self {
        self.coordinate = Some(coordinate);
        self
    }

    pub fn on_press(mut self, callback: impl Into<Callback<MarkerPressEvent>>) -> Self {
        self.on_press = Some(callback.into());
        self
    }

    fn title_text(&self) -> String {
        marker_title(self.title.as_deref(), self.description.as_deref())
    }

    fn icon_inputs(&self) -> IconInputs {
        IconInputs {
            icon: self.icon.clone(),
            image: self.image.clone(),
            anchor: self.anchor,
        }
    }
}

/// Everything icon resolution depends on
#[derive(Debug, Clone, PartialEq)]
struct IconInputs {
    icon: Option<ImageSource>,
    image: Option<ImageSource>,
    anchor: Option<Point>,
}

impl IconInputs {
    fn resolve(&self) -> Option<Icon> {
        resolve_icon(self.icon.as_ref(), self.image.as_ref(), self.anchor)
    }
}

/// Props as last pushed to the engine marker
#[derive(Debug, Clone, PartialEq)]
struct Applied {
    opacity: Option<f64>,
    icon: IconInputs,
    coordinate: Coordinate,
}

/// Values the click listener closes over
#[derive(Debug, Clone, PartialEq)]
struct PressDeps {
    coordinate: Coordinate,
    identifier: Option<String>,
    on_press: Option<Callback<MarkerPressEvent>>,
}

/// Opacity forwarded on updates. Zero counts as unset.
fn effective_opacity(opacity: Option<f64>) -> f64 {
    opacity
        .filter(|o| *o != 0.0 && !o.is_nan())
        .unwrap_or(DEFAULT_MARKER_OPACITY)
}

/// Opacity equality where two NaNs count as the same value
fn same_opacity(a: Option<f64>, b: Option<f64>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a == b || (a.is_nan() && b.is_nan()),
        (None, None) => true,
        _ => false,
    }
}

pub struct MarkerAdapter<M: EngineMap> {
    marker: Option<Rc<M::Marker>>,
    /// Map the current marker was created on
    owner: MapRef<M>,
    applied: Option<Applied>,
    press: Effect<PressDeps>,
}

impl<M: EngineMap> MarkerAdapter<M> {
    pub fn new() -> Self {
        Self {
            marker: None,
            owner: MapRef::empty(),
            applied: None,
            press: Effect::new(),
        }
    }

    /// Reconciles `props` against the engine reachable through `map`.
    pub fn update(&mut self, map: &MapRef<M>, props: &MarkerProps) {
        let Some(engine_map) = map.get() else {
            // The map is gone or not built yet; a held marker is stale.
            self.dispose();
            return;
        };

        if self.marker.is_some() && !self.owner.same_map(map) {
            log::debug!("marker {:?} moved to a new map instance", props.identifier);
            self.dispose();
        }

        let Some(coordinate) = props.coordinate else {
            return;
        };

        let marker = match self.marker.clone() {
            Some(marker) => {
                self.apply_changes(&marker, props, coordinate);
                marker
            }
            None => self.create(&engine_map, map, props, coordinate),
        };

        self.sync_press_listener(&marker, props);
    }

    fn create(
        &mut self,
        engine_map: &Rc<M>,
        map: &MapRef<M>,
        props: &MarkerProps,
        coordinate: Coordinate,
    ) -> Rc<M::Marker> {
        let icon = props.icon_inputs();
        let options = MarkerOptions {
            title: props.title_text(),
            opacity: props.opacity,
            icon: icon.resolve(),
        };

        log::debug!(
            "creating marker {:?} at ({}, {})",
            props.identifier,
            coordinate.latitude,
            coordinate.longitude
        );
        let marker = Rc::new(engine_map.add_marker(coordinate.into(), options));

        self.marker = Some(Rc::clone(&marker));
        self.owner = map.clone();
        self.applied = Some(Applied {
            opacity: props.opacity,
            icon,
            coordinate,
        });
        marker
    }

    fn apply_changes(&mut self, marker: &M::Marker, props: &MarkerProps, coordinate: Coordinate) {
        let Some(applied) = self.applied.as_mut() else {
            return;
        };

        if !same_opacity(props.opacity, applied.opacity) {
            marker.set_opacity(effective_opacity(props.opacity));
            applied.opacity = props.opacity;
        }

        let icon = props.icon_inputs();
        if icon != applied.icon {
            if let Some(resolved) = icon.resolve() {
                marker.set_icon(resolved);
            }
            applied.icon = icon;
        }

        if coordinate != applied.coordinate {
            marker.set_lat_lng(coordinate.into());
            applied.coordinate = coordinate;
        }
    }

    fn sync_press_listener(&mut self, marker: &Rc<M::Marker>, props: &MarkerProps) {
        let Some(coordinate) = self.applied.as_ref().map(|a| a.coordinate) else {
            return;
        };

        let deps = PressDeps {
            coordinate,
            identifier: props.identifier.clone(),
            on_press: props.on_press.clone(),
        };

        self.press.run(deps, |deps| {
            let captured = deps.clone();
            let listener: Listener = Rc::new(move |native: &NativeEvent| {
                if let Some(on_press) = &captured.on_press {
                    on_press.emit(MarkerPressEvent {
                        native: native.clone(),
                        action: EventAction::MarkerPress,
                        coordinate: captured.coordinate,
                        id: captured.identifier.clone(),
                    });
                }
            });

            let id = marker.add_listener(EventKind::Click, listener);
            let marker = Rc::downgrade(marker);
            let cleanup: Cleanup = Box::new(move || {
                if let Some(marker) = marker.upgrade() {
                    marker.remove_listener(id);
                }
            });
            Some(cleanup)
        });
    }

    /// Removes the listener and the engine marker. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        self.press.dispose();
        if let Some(marker) = self.marker.take() {
            log::debug!("removing marker");
            marker.remove();
        }
        self.owner = MapRef::empty();
        self.applied = None;
    }

    pub fn is_created(&self) -> bool {
        self.marker.is_some()
    }

    /// The engine marker, while one exists
    pub fn marker(&self) -> Option<&M::Marker> {
        self.marker.as_deref()
    }

    pub fn unmount(mut self) {
        self.dispose();
    }
}

impl<M: EngineMap> Default for MarkerAdapter<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: EngineMap> Drop for MarkerAdapter<M> {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::geo::LatLng,
        engine::{
            headless::{EngineCall, HeadlessContainer, HeadlessEngine, HeadlessMap},
            MapEngine, MapOptions,
        },
    };
    use std::cell::RefCell;

    fn live_map(engine: &HeadlessEngine) -> Rc<HeadlessMap> {
        let options = MapOptions {
            layers: Vec::new(),
            center: LatLng::new(0.0, 0.0),
            zoom: 10.0,
            min_zoom: None,
            max_zoom: None,
        };
        Rc::new(engine.create_map(&HeadlessContainer::default(), options).unwrap())
    }

    #[test]
    fn test_icon_prefers_icon_over_image() {
        let icon = ImageSource::image("a.png", 10.0, 20.0);
        let image = ImageSource::Image {
            uri: Some("b.png".to_string()),
            width: None,
            height: None,
        };

        let resolved = resolve_icon(Some(&icon), Some(&image), None).unwrap();
        assert_eq!(resolved.url, "a.png");
        assert_eq!(resolved.retina_url, "a.png");
        assert_eq!(resolved.size, Some(Point::new(10.0, 20.0)));
    }

    #[test]
    fn test_bare_image_has_no_size() {
        let image = ImageSource::from("b.png");
        let resolved = resolve_icon(None, Some(&image), None).unwrap();
        assert_eq!(resolved.url, "b.png");
        assert_eq!(resolved.size, None);
    }

    #[test]
    fn test_size_falls_back_to_image() {
        let icon = ImageSource::from("a.png");
        let image = ImageSource::image("b.png", 8.0, 0.0);

        assert_eq!(icon_size(Some(&icon), Some(&image)), Some(Point::new(8.0, 0.0)));
        assert_eq!(icon_url(Some(&icon), Some(&image)), "a.png");
    }

    #[test]
    fn test_missing_uri_degrades_to_empty() {
        let icon = ImageSource::Image {
            uri: None,
            width: Some(4.0),
            height: Some(4.0),
        };
        let resolved = resolve_icon(Some(&icon), None, Some(Point::new(2.0, 4.0))).unwrap();
        assert_eq!(resolved.url, "");
        assert_eq!(resolved.anchor, Some(Point::new(2.0, 4.0)));
    }

    #[test]
    fn test_no_sources_keeps_default_glyph() {
        assert_eq!(resolve_icon(None, None, Some(Point::new(1.0, 1.0))), None);
        assert_eq!(icon_url(None, None), "");
    }

    #[test]
    fn test_image_source_deserializes_both_shapes() {
        let bare: ImageSource = serde_json::from_str(r#""pin.png""#).unwrap();
        assert_eq!(bare, ImageSource::from("pin.png"));

        let structured: ImageSource =
            serde_json::from_str(r#"{ "uri": "pin.png", "width": 32 }"#).unwrap();
        assert_eq!(structured.explicit_size(), Some(Point::new(32.0, 0.0)));
    }

    #[test]
    fn test_marker_title() {
        assert_eq!(marker_title(Some("A"), Some("B")), "A - B");
        assert_eq!(marker_title(Some("A"), None), "A");
        assert_eq!(marker_title(None, Some("B")), "B");
        assert_eq!(marker_title(None, None), "");
        assert_eq!(marker_title(Some(""), Some("B")), "B");
    }

    #[test]
    fn test_effective_opacity() {
        assert_eq!(effective_opacity(Some(0.4)), 0.4);
        assert_eq!(effective_opacity(Some(0.0)), 1.0);
        assert_eq!(effective_opacity(None), 1.0);
    }

    #[test]
    fn test_waits_for_map_and_coordinate() {
        let engine = HeadlessEngine::new();
        let mut adapter: MarkerAdapter<HeadlessMap> = MarkerAdapter::new();

        adapter.update(&MapRef::empty(), &MarkerProps::new(Coordinate::new(1.0, 2.0)));
        assert!(!adapter.is_created());

        let map = live_map(&engine);
        adapter.update(&MapRef::new(&map), &MarkerProps::default());
        assert!(!adapter.is_created());

        adapter.update(&MapRef::new(&map), &MarkerProps::new(Coordinate::new(1.0, 2.0)));
        assert!(adapter.is_created());
        assert_eq!(map.marker_count(), 1);
    }

    #[test]
    fn test_created_once_with_options() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);
        let props = MarkerProps::new(Coordinate::new(1.0, 2.0))
            .with_title("Cafe")
            .with_description("Open late")
            .with_opacity(0.5)
            .with_icon(ImageSource::image("cafe.png", 16.0, 16.0));

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &props);
        adapter.update(&map_ref, &props);

        let calls = engine.journal().calls();
        let adds: Vec<_> = calls
            .iter()
            .filter_map(|call| match call {
                EngineCall::AddMarker { options, .. } => Some(options.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(adds.len(), 1);
        assert_eq!(adds[0].title, "Cafe - Open late");
        assert_eq!(adds[0].opacity, Some(0.5));
        assert_eq!(adds[0].icon.as_ref().map(|i| i.url.as_str()), Some("cafe.png"));

        // Unchanged props produce no further calls.
        assert_eq!(calls.len(), 2);
    }

    #[test]
    fn test_applies_only_changed_props() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);
        let base = MarkerProps::new(Coordinate::new(1.0, 2.0)).with_opacity(0.5);

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &base);
        engine.journal().clear();

        adapter.update(&map_ref, &base.clone().with_coordinate(Coordinate::new(3.0, 4.0)));
        adapter.update(
            &map_ref,
            &base
                .clone()
                .with_coordinate(Coordinate::new(3.0, 4.0))
                .with_opacity(0.0),
        );

        let calls = engine.journal().calls();
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], EngineCall::SetLatLng(_, p) if p == LatLng::new(3.0, 4.0)));
        assert!(matches!(calls[1], EngineCall::SetOpacity(_, o) if o == 1.0));
    }

    #[test]
    fn test_nan_opacity_applied_once() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);
        let base = MarkerProps::new(Coordinate::new(1.0, 2.0)).with_opacity(0.5);

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &base);
        engine.journal().clear();

        let nan = base.clone().with_opacity(f64::NAN);
        adapter.update(&map_ref, &nan);
        adapter.update(&map_ref, &nan);
        adapter.update(&map_ref, &nan);

        assert_eq!(engine.journal().calls().len(), 1);
        assert!(matches!(engine.journal().calls()[0], EngineCall::SetOpacity(_, o) if o == 1.0));
    }

    #[test]
    fn test_icon_change_reapplied() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);
        let base = MarkerProps::new(Coordinate::new(1.0, 2.0)).with_image("b.png");

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &base);
        adapter.update(&map_ref, &base.clone().with_icon(ImageSource::image("a.png", 10.0, 20.0)));

        let marker = adapter.marker().unwrap();
        let icon = marker.icon().unwrap();
        assert_eq!(icon.url, "a.png");
        assert_eq!(icon.size, Some(Point::new(10.0, 20.0)));

        // Dropping both sources resolves to nothing and leaves the icon alone.
        let before = engine.journal().len();
        adapter.update(&map_ref, &MarkerProps::new(Coordinate::new(1.0, 2.0)));
        assert_eq!(engine.journal().len(), before);
    }

    #[test]
    fn test_press_event_is_normalized() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);

        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pressed);
        let props = MarkerProps::new(Coordinate::new(1.0, 2.0))
            .with_identifier("m1")
            .on_press(move |event: MarkerPressEvent| sink.borrow_mut().push(event));

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &props);
        adapter.marker().unwrap().click();

        let events = pressed.borrow();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].action, EventAction::MarkerPress);
        assert_eq!(events[0].id.as_deref(), Some("m1"));
        assert_eq!(events[0].coordinate, Coordinate::new(1.0, 2.0));
        assert_eq!(events[0].native.kind, EventKind::Click);
    }

    #[test]
    fn test_identifier_change_replaces_listener() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);

        let pressed = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&pressed);
        let on_press = Callback::new(move |event: MarkerPressEvent| sink.borrow_mut().push(event.id));
        let props = MarkerProps::new(Coordinate::new(1.0, 2.0))
            .with_identifier("first")
            .on_press(on_press.clone());

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &props);
        adapter.update(&map_ref, &props.clone().with_identifier("second"));

        let marker = adapter.marker().unwrap();
        assert_eq!(marker.listener_count(EventKind::Click), 1);

        marker.click();
        assert_eq!(*pressed.borrow(), vec![Some("second".to_string())]);
    }

    #[test]
    fn test_disposed_when_map_goes_away() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let map_ref = MapRef::new(&map);
        let props = MarkerProps::new(Coordinate::new(1.0, 2.0));

        let mut adapter = MarkerAdapter::new();
        adapter.update(&map_ref, &props);
        assert!(adapter.is_created());

        map.remove();
        drop(map);
        let before = engine.journal().len();

        adapter.update(&map_ref, &props.clone().with_coordinate(Coordinate::new(9.0, 9.0)));
        assert!(!adapter.is_created());
        assert_eq!(engine.journal().len(), before);
    }

    #[test]
    fn test_new_map_gets_fresh_marker() {
        let engine = HeadlessEngine::new();
        let first = live_map(&engine);
        let second = live_map(&engine);
        let props = MarkerProps::new(Coordinate::new(1.0, 2.0));

        let mut adapter = MarkerAdapter::new();
        adapter.update(&MapRef::new(&first), &props);
        let first_id = adapter.marker().unwrap().id();

        adapter.update(&MapRef::new(&second), &props);
        assert_ne!(adapter.marker().unwrap().id(), first_id);
        assert_eq!(first.marker_count(), 0);
        assert_eq!(second.marker_count(), 1);
    }

    #[test]
    fn test_unmount_removes_marker_and_listener() {
        let engine = HeadlessEngine::new();
        let map = live_map(&engine);
        let mut adapter = MarkerAdapter::new();
        adapter.update(
            &MapRef::new(&map),
            &MarkerProps::new(Coordinate::new(1.0, 2.0)).on_press(|_: MarkerPressEvent| {}),
        );

        adapter.unmount();
        assert_eq!(map.marker_count(), 0);
        assert_eq!(
            engine
                .journal()
                .count(|call| matches!(call, EngineCall::RemoveMarker(_))),
            1
        );
    }
}
