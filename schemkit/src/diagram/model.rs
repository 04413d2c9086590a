//! Diagram data types
//!
//! These are the records that are persisted verbatim in a saved document, so
//! field names follow the document format (`type`, `componentId`, `pinId`).

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::ComponentKind;
use crate::geometry::{Point, Rect};
use crate::symbols::{self, ResolvedPin};

pub type ComponentId = u64;
pub type WireId = u64;

/// A property value that may be entered as text ("10k") or as a number
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Number(f64),
    Text(String),
}

impl std::fmt::Display for PropValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Text(s.to_string())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Text(s)
    }
}

impl From<f64> for PropValue {
    fn from(n: f64) -> Self {
        PropValue::Number(n)
    }
}

/// A logical pin owned by a component, before it is positioned
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinDescriptor {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl PinDescriptor {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

/// A placed symbol instance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Component {
    pub id: ComponentId,

    #[serde(rename = "type")]
    pub kind: ComponentKind,

    #[serde(default)]
    pub label: String,

    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,

    /// Degrees, one of 0, 90, 180, 270. Any JSON number is accepted on
    /// load and snapped to the nearest quarter turn.
    #[serde(default, deserialize_with = "deserialize_rotation")]
    pub rotation: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(default)]
    pub pins: Vec<PinDescriptor>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<PropValue>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub voltage: Option<PropValue>,
}

impl Component {
    /// Instantiate a catalog symbol at `(x, y)`. Returns `None` for kinds
    /// without a catalog entry.
    pub fn from_catalog(id: ComponentId, kind: ComponentKind, x: f64, y: f64) -> Option<Self> {
        let entry = kind.entry()?;
        Some(Self {
            id,
            label: entry.label.to_string(),
            x,
            y,
            width: entry.width,
            height: entry.height,
            rotation: 0,
            color: Some(entry.color.to_string()),
            pins: entry.pin_descriptors(),
            value: entry.value.map(PropValue::from),
            voltage: None,
            kind,
        })
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Absolute pin positions, see [`symbols::resolve_pins`]
    pub fn resolved_pins(&self) -> Vec<ResolvedPin> {
        symbols::resolve_pins(self)
    }

    pub fn resolve_pin(&self, pin_id: &str) -> Option<ResolvedPin> {
        self.resolved_pins().into_iter().find(|p| p.id == pin_id)
    }

    pub(crate) fn apply(&mut self, patch: &ComponentPatch) {
        if let Some(pos) = patch.position {
            self.x = pos.x;
            self.y = pos.y;
        }
        if let Some(ref value) = patch.value {
            self.value = Some(value.clone());
        }
        if let Some(rotation) = patch.rotation {
            self.rotation = normalize_rotation(rotation as i64);
        }
        if let Some(ref color) = patch.color {
            self.color = Some(color.clone());
        }
    }
}

/// Snap an angle in degrees onto the nearest quarter turn in `[0, 360)`
pub fn normalize_rotation(degrees: i64) -> u16 {
    snap_rotation(degrees as f64)
}

/// [`normalize_rotation`] for fractional angles. Non-finite input gives 0.
pub fn snap_rotation(degrees: f64) -> u16 {
    let quarters = (degrees / 90.0).round().rem_euclid(4.0);
    if quarters.is_finite() {
        quarters as u16 * 90
    } else {
        0
    }
}

fn deserialize_rotation<'de, D>(deserializer: D) -> Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    let degrees = Option::<f64>::deserialize(deserializer)?;
    Ok(degrees.map(snap_rotation).unwrap_or(0))
}

/// Partial update applied to a component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentPatch {
    #[serde(default)]
    pub position: Option<Point>,
    #[serde(default)]
    pub value: Option<PropValue>,
    #[serde(default)]
    pub rotation: Option<u16>,
    #[serde(default)]
    pub color: Option<String>,
}

impl ComponentPatch {
    pub fn position(x: f64, y: f64) -> Self {
        Self {
            position: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    pub fn with_value(mut self, value: impl Into<PropValue>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_rotation(mut self, rotation: u16) -> Self {
        self.rotation = Some(rotation);
        self
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none()
            && self.value.is_none()
            && self.rotation.is_none()
            && self.color.is_none()
    }
}

/// One end of a wire
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinRef {
    pub component_id: ComponentId,
    pub pin_id: String,
}

impl PinRef {
    pub fn new(component_id: ComponentId, pin_id: impl Into<String>) -> Self {
        Self {
            component_id,
            pin_id: pin_id.into(),
        }
    }
}

impl std::fmt::Display for PinRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.component_id, self.pin_id)
    }
}

/// A connection between two pins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wire {
    pub id: WireId,
    pub from: PinRef,
    pub to: PinRef,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Wire {
    pub fn touches(&self, component_id: ComponentId) -> bool {
        self.from.component_id == component_id || self.to.component_id == component_id
    }
}
