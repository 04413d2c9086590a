//! Symbol families: pin geometry and visual templates
//!
//! Every component kind maps onto one [`Symbol`] implementation. A symbol
//! knows two things about a placed component:
//! - where its pins sit on the canvas (pure, derived from type, position and
//!   size, never stored)
//! - how to draw its body into a [`Scene`]
//!
//! Rotation is stored on components but is not applied to pin coordinates or
//! to the body template. Pins of a rotated symbol stay where the unrotated
//! symbol has them.

mod shapes;

use serde::{Deserialize, Serialize};

use crate::catalog::{ComponentKind, ESP32_PINOUT};
use crate::diagram::Component;
use crate::geometry::Point;
use crate::render::Scene;

pub use shapes::{
    GroundSymbol, IcSymbol, MeterSymbol, ModuleSymbol, PolarizedSymbol, Side, TwoTerminalSymbol,
    UnknownSymbol,
};

/// Vertical distance from the top edge to the first IC pin
pub const PIN_OFFSET: f64 = 20.0;

/// Vertical distance between consecutive IC pins
pub const PIN_STEP: f64 = 20.0;

/// A pin with its absolute canvas position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedPin {
    pub id: String,
    pub x: f64,
    pub y: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ResolvedPin {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            x,
            y,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// Shared capability of every symbol family
pub trait Symbol: Send + Sync {
    /// Family name, used in logs and the catalog listing
    fn family(&self) -> &'static str;

    /// Pins in a fixed order, at absolute coordinates
    fn pins(&self, component: &Component) -> Vec<ResolvedPin>;

    /// Draw the symbol body (not its pins) into the scene
    fn draw(&self, component: &Component, scene: &mut Scene);
}

static ESP32_SYMBOL: IcSymbol = IcSymbol {
    per_side: 19,
    labels: Some(ESP32_PINOUT),
};

static RESISTOR_SYMBOL: TwoTerminalSymbol = TwoTerminalSymbol::Resistor;
static CAPACITOR_SYMBOL: TwoTerminalSymbol = TwoTerminalSymbol::Capacitor;
static THERMISTOR_SYMBOL: TwoTerminalSymbol = TwoTerminalSymbol::Thermistor;
static PIEZO_SYMBOL: TwoTerminalSymbol = TwoTerminalSymbol::Piezo;

static LED_SYMBOL: PolarizedSymbol = PolarizedSymbol::Led;
static BATTERY_SYMBOL: PolarizedSymbol = PolarizedSymbol::Battery;

static SENSOR_MODULE_PINS: &[(&str, Side, f64)] = &[
    ("VCC", Side::Left, 15.0),
    ("GND", Side::Left, 35.0),
    ("OUT", Side::Left, 55.0),
];

static ACS712_SYMBOL: ModuleSymbol = ModuleSymbol {
    pins: SENSOR_MODULE_PINS,
    caption: "I",
};

static ZMPT101B_SYMBOL: ModuleSymbol = ModuleSymbol {
    pins: SENSOR_MODULE_PINS,
    caption: "V~",
};

static RELAY_SYMBOL: ModuleSymbol = ModuleSymbol {
    pins: &[
        ("coil+", Side::Left, 20.0),
        ("coil-", Side::Left, 60.0),
        ("NO", Side::Right, 15.0),
        ("COM", Side::Right, 40.0),
        ("NC", Side::Right, 65.0),
    ],
    caption: "K",
};

static GROUND_SYMBOL: GroundSymbol = GroundSymbol;
static VOLTMETER_SYMBOL: MeterSymbol = MeterSymbol { glyph: "V" };
static AMMETER_SYMBOL: MeterSymbol = MeterSymbol { glyph: "A" };
static UNKNOWN_SYMBOL: UnknownSymbol = UnknownSymbol;

/// The symbol family drawing a kind. Custom kinds get a pinless box.
pub fn symbol_for(kind: &ComponentKind) -> &'static dyn Symbol {
    match kind {
        ComponentKind::Esp32 => &ESP32_SYMBOL,
        ComponentKind::Resistor => &RESISTOR_SYMBOL,
        ComponentKind::Capacitor => &CAPACITOR_SYMBOL,
        ComponentKind::Thermistor => &THERMISTOR_SYMBOL,
        ComponentKind::Piezo => &PIEZO_SYMBOL,
        ComponentKind::Led => &LED_SYMBOL,
        ComponentKind::Battery => &BATTERY_SYMBOL,
        ComponentKind::Acs712 => &ACS712_SYMBOL,
        ComponentKind::Zmpt101b => &ZMPT101B_SYMBOL,
        ComponentKind::Relay => &RELAY_SYMBOL,
        ComponentKind::Ground => &GROUND_SYMBOL,
        ComponentKind::Voltmeter => &VOLTMETER_SYMBOL,
        ComponentKind::Ammeter => &AMMETER_SYMBOL,
        ComponentKind::Custom(_) => &UNKNOWN_SYMBOL,
    }
}

/// Absolute pin positions of a component.
///
/// Pure and deterministic: the same kind, position and size always give the
/// same pins in the same order.
pub fn resolve_pins(component: &Component) -> Vec<ResolvedPin> {
    symbol_for(&component.kind).pins(component)
}
