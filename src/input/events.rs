use crate::core::{
    geo::{LatLng, Point},
    region::Coordinate,
};
use serde::{Deserialize, Serialize};

/// Engine-native event names the adapter subscribes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    /// Map finished its first view reset
    Load,
    /// User drag in progress
    Drag,
    /// Center changed (user drag or programmatic pan)
    Move,
    /// User drag finished
    DragEnd,
    /// Center change finished
    MoveEnd,
    /// Pointer click on a marker
    Click,
}

impl EventKind {
    /// Drag-family events come from a user gesture; move-family events may be
    /// programmatic.
    pub fn is_gesture(&self) -> bool {
        matches!(self, EventKind::Drag | EventKind::DragEnd)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventKind::Load => write!(f, "load"),
            EventKind::Drag => write!(f, "drag"),
            EventKind::Move => write!(f, "move"),
            EventKind::DragEnd => write!(f, "dragend"),
            EventKind::MoveEnd => write!(f, "moveend"),
            EventKind::Click => write!(f, "click"),
        }
    }
}

/// Event payload as the engine emits it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Geographic position attached to pointer events
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latlng: Option<LatLng>,
    /// Pixel position relative to the map container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_point: Option<Point>,
}

impl NativeEvent {
    pub fn new(kind: EventKind) -> Self {
        Self {
            kind,
            latlng: None,
            container_point: None,
        }
    }

    pub fn with_position(mut self, latlng: LatLng, container_point: Point) -> Self {
        self.latlng = Some(latlng);
        self.container_point = Some(container_point);
        self
    }
}

/// What a normalized press event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventAction {
    MarkerPress,
    PolygonPress,
    PolylinePress,
    CalloutPress,
    Press,
    LongPress,
    OverlayPress,
}

/// Payload of `on_pan_drag`: the native event plus the map center
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PanDragEvent {
    #[serde(flatten)]
    pub native: NativeEvent,
    pub coordinate: Coordinate,
}

/// Payload of a marker's `on_press`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerPressEvent {
    #[serde(flatten)]
    pub native: NativeEvent,
    pub action: EventAction,
    /// The marker's declared coordinate, not the pointer position
    pub coordinate: Coordinate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// Second argument of the region-change callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionChangeDetails {
    pub is_gesture: bool,
}

impl From<EventKind> for RegionChangeDetails {
    fn from(kind: EventKind) -> Self {
        Self {
            is_gesture: kind.is_gesture(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_names() {
        assert_eq!(EventKind::DragEnd.to_string(), "dragend");
        assert_eq!(EventKind::MoveEnd.to_string(), "moveend");
        assert_eq!(
            serde_json::to_value(EventKind::DragEnd).unwrap(),
            serde_json::json!("dragend")
        );
    }

    #[test]
    fn test_gesture_classification() {
        assert!(EventKind::Drag.is_gesture());
        assert!(EventKind::DragEnd.is_gesture());
        assert!(!EventKind::Move.is_gesture());
        assert!(!RegionChangeDetails::from(EventKind::MoveEnd).is_gesture);
    }

    #[test]
    fn test_marker_press_spreads_native_fields() {
        let event = MarkerPressEvent {
            native: NativeEvent::new(EventKind::Click)
                .with_position(LatLng::new(1.0, 2.0), Point::new(10.0, 20.0)),
            action: EventAction::MarkerPress,
            coordinate: Coordinate::new(1.0, 2.0),
            id: Some("home".to_string()),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "click");
        assert_eq!(json["action"], "marker-press");
        assert_eq!(json["id"], "home");
        assert_eq!(json["coordinate"]["latitude"], 1.0);
        assert_eq!(json["containerPoint"]["x"], 10.0);
    }

    #[test]
    fn test_pan_drag_without_position() {
        let event = PanDragEvent {
            native: NativeEvent::new(EventKind::Drag),
            coordinate: Coordinate::new(5.0, 6.0),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "drag");
        assert!(json.get("latlng").is_none());
        assert_eq!(json["coordinate"]["longitude"], 6.0);
    }
}
