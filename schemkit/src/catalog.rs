//! Component catalog
//!
//! The catalog is the fixed set of symbols a user can place. Each entry
//! carries the defaults a freshly placed component starts with: label, size,
//! color, value and its logical pins. Pins are given either as an explicit
//! id list or as a count that is split evenly into a left group `pL{i}` and a
//! right group `pR{i}`.

use serde::{Deserialize, Serialize};

use crate::diagram::PinDescriptor;

/// Type tag of a placed component.
///
/// Known tags map onto catalog entries. Anything else is carried through as
/// [`ComponentKind::Custom`] so documents from newer versions survive a round
/// trip, but such components have no pins and a generic body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Esp32,
    Resistor,
    Capacitor,
    Thermistor,
    Piezo,
    Led,
    Battery,
    Acs712,
    Zmpt101b,
    Relay,
    Ground,
    Voltmeter,
    Ammeter,
    Custom(String),
}

impl ComponentKind {
    /// All catalog kinds in palette order
    pub const CATALOG: [ComponentKind; 13] = [
        ComponentKind::Esp32,
        ComponentKind::Resistor,
        ComponentKind::Capacitor,
        ComponentKind::Thermistor,
        ComponentKind::Piezo,
        ComponentKind::Led,
        ComponentKind::Battery,
        ComponentKind::Acs712,
        ComponentKind::Zmpt101b,
        ComponentKind::Relay,
        ComponentKind::Ground,
        ComponentKind::Voltmeter,
        ComponentKind::Ammeter,
    ];

    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "esp32" => ComponentKind::Esp32,
            "resistor" => ComponentKind::Resistor,
            "capacitor" => ComponentKind::Capacitor,
            "thermistor" => ComponentKind::Thermistor,
            "piezo" => ComponentKind::Piezo,
            "led" => ComponentKind::Led,
            "battery" => ComponentKind::Battery,
            "acs712" => ComponentKind::Acs712,
            "zmpt101b" => ComponentKind::Zmpt101b,
            "relay" => ComponentKind::Relay,
            "ground" => ComponentKind::Ground,
            "voltmeter" => ComponentKind::Voltmeter,
            "ammeter" => ComponentKind::Ammeter,
            other => ComponentKind::Custom(other.to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            ComponentKind::Esp32 => "esp32",
            ComponentKind::Resistor => "resistor",
            ComponentKind::Capacitor => "capacitor",
            ComponentKind::Thermistor => "thermistor",
            ComponentKind::Piezo => "piezo",
            ComponentKind::Led => "led",
            ComponentKind::Battery => "battery",
            ComponentKind::Acs712 => "acs712",
            ComponentKind::Zmpt101b => "zmpt101b",
            ComponentKind::Relay => "relay",
            ComponentKind::Ground => "ground",
            ComponentKind::Voltmeter => "voltmeter",
            ComponentKind::Ammeter => "ammeter",
            ComponentKind::Custom(tag) => tag,
        }
    }

    pub fn is_custom(&self) -> bool {
        matches!(self, ComponentKind::Custom(_))
    }

    /// Catalog entry for this kind, `None` for custom tags
    pub fn entry(&self) -> Option<&'static CatalogEntry> {
        lookup(self)
    }
}

impl From<String> for ComponentKind {
    fn from(tag: String) -> Self {
        ComponentKind::from_tag(&tag)
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        kind.tag().to_string()
    }
}

impl std::fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// How a catalog entry declares its pins
#[derive(Debug, Clone, Copy)]
pub enum PinSpec {
    /// Explicit pin ids, used verbatim as ids and labels
    Named(&'static [&'static str]),
    /// Pin count split into `pL1..pLn` and `pR1..pRn`, with optional labels
    /// for the left group followed by the right group
    Count {
        count: usize,
        labels: Option<&'static [&'static str]>,
    },
}

/// Defaults for one placeable symbol
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub label: &'static str,
    pub width: f64,
    pub height: f64,
    pub color: &'static str,
    pub value: Option<&'static str>,
    pub pins: PinSpec,
}

impl CatalogEntry {
    /// Logical pins a new instance is seeded with
    pub fn pin_descriptors(&self) -> Vec<PinDescriptor> {
        match self.pins {
            PinSpec::Named(ids) => ids
                .iter()
                .map(|id| PinDescriptor::new(*id).with_label(*id))
                .collect(),
            PinSpec::Count { count, labels } => {
                let per_side = count / 2;
                let ids = (1..=per_side)
                    .map(|i| format!("pL{}", i))
                    .chain((1..=per_side).map(|i| format!("pR{}", i)));
                ids.enumerate()
                    .map(|(idx, id)| {
                        let label = labels.and_then(|l| l.get(idx)).copied();
                        match label {
                            Some(label) => PinDescriptor::new(id).with_label(label),
                            None => PinDescriptor::new(id),
                        }
                    })
                    .collect()
            }
        }
    }

    pub fn pin_count(&self) -> usize {
        match self.pins {
            PinSpec::Named(ids) => ids.len(),
            PinSpec::Count { count, .. } => count / 2 * 2,
        }
    }
}

/// ESP32 DevKitC 38-pin header, left column top to bottom then right column
pub(crate) const ESP32_PINOUT: &[&str] = &[
    "3V3", "EN", "GPIO36", "GPIO39", "GPIO34", "GPIO35", "GPIO32", "GPIO33", "GPIO25",
    "GPIO26", "GPIO27", "GPIO14", "GPIO12", "GND", "GPIO13", "SD2", "SD3", "CMD", "5V",
    "GND", "GPIO23", "GPIO22", "TX0", "RX0", "GPIO21", "GND", "GPIO19", "GPIO18", "GPIO5",
    "GPIO17", "GPIO16", "GPIO4", "GPIO0", "GPIO2", "GPIO15", "SD1", "SD0", "CLK",
];

const TWO_TERMINAL: &[&str] = &["1", "2"];
const SENSOR_MODULE: &[&str] = &["VCC", "GND", "OUT"];
const METER: &[&str] = &["+", "-"];

static ESP32: CatalogEntry = CatalogEntry {
    label: "ESP32 DevKit",
    width: 120.0,
    height: 400.0,
    color: "#1f2937",
    value: None,
    pins: PinSpec::Count {
        count: 38,
        labels: Some(ESP32_PINOUT),
    },
};

static RESISTOR: CatalogEntry = CatalogEntry {
    label: "Resistor",
    width: 80.0,
    height: 30.0,
    color: "#b45309",
    value: Some("1k"),
    pins: PinSpec::Named(TWO_TERMINAL),
};

static CAPACITOR: CatalogEntry = CatalogEntry {
    label: "Capacitor",
    width: 60.0,
    height: 40.0,
    color: "#2563eb",
    value: Some("100nF"),
    pins: PinSpec::Named(TWO_TERMINAL),
};

static THERMISTOR: CatalogEntry = CatalogEntry {
    label: "NTC Thermistor",
    width: 80.0,
    height: 30.0,
    color: "#dc2626",
    value: Some("10k"),
    pins: PinSpec::Named(TWO_TERMINAL),
};

static PIEZO: CatalogEntry = CatalogEntry {
    label: "Piezo Sensor",
    width: 60.0,
    height: 60.0,
    color: "#7c3aed",
    value: None,
    pins: PinSpec::Named(TWO_TERMINAL),
};

static LED: CatalogEntry = CatalogEntry {
    label: "LED",
    width: 40.0,
    height: 60.0,
    color: "#16a34a",
    value: None,
    pins: PinSpec::Named(&["anode", "cathode"]),
};

static BATTERY: CatalogEntry = CatalogEntry {
    label: "Battery",
    width: 40.0,
    height: 70.0,
    color: "#ca8a04",
    value: Some("9V"),
    pins: PinSpec::Named(&["+", "-"]),
};

static ACS712: CatalogEntry = CatalogEntry {
    label: "ACS712 Current",
    width: 90.0,
    height: 70.0,
    color: "#0891b2",
    value: None,
    pins: PinSpec::Named(SENSOR_MODULE),
};

static ZMPT101B: CatalogEntry = CatalogEntry {
    label: "ZMPT101B Voltage",
    width: 90.0,
    height: 70.0,
    color: "#0d9488",
    value: None,
    pins: PinSpec::Named(SENSOR_MODULE),
};

static RELAY: CatalogEntry = CatalogEntry {
    label: "Relay",
    width: 100.0,
    height: 80.0,
    color: "#4b5563",
    value: None,
    pins: PinSpec::Named(&["coil+", "coil-", "NO", "COM", "NC"]),
};

static GROUND: CatalogEntry = CatalogEntry {
    label: "Ground",
    width: 40.0,
    height: 30.0,
    color: "#111827",
    value: None,
    pins: PinSpec::Named(&["gnd"]),
};

static VOLTMETER: CatalogEntry = CatalogEntry {
    label: "Voltmeter",
    width: 60.0,
    height: 60.0,
    color: "#9333ea",
    value: None,
    pins: PinSpec::Named(METER),
};

static AMMETER: CatalogEntry = CatalogEntry {
    label: "Ammeter",
    width: 60.0,
    height: 60.0,
    color: "#e11d48",
    value: None,
    pins: PinSpec::Named(METER),
};

/// Look up the catalog entry for a kind. Custom kinds fail closed.
pub fn lookup(kind: &ComponentKind) -> Option<&'static CatalogEntry> {
    let entry = match kind {
        ComponentKind::Esp32 => &ESP32,
        ComponentKind::Resistor => &RESISTOR,
        ComponentKind::Capacitor => &CAPACITOR,
        ComponentKind::Thermistor => &THERMISTOR,
        ComponentKind::Piezo => &PIEZO,
        ComponentKind::Led => &LED,
        ComponentKind::Battery => &BATTERY,
        ComponentKind::Acs712 => &ACS712,
        ComponentKind::Zmpt101b => &ZMPT101B,
        ComponentKind::Relay => &RELAY,
        ComponentKind::Ground => &GROUND,
        ComponentKind::Voltmeter => &VOLTMETER,
        ComponentKind::Ammeter => &AMMETER,
        ComponentKind::Custom(_) => return None,
    };
    Some(entry)
}
