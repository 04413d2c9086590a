use serde::{Deserialize, Serialize};

use crate::catalog::ComponentKind;
use crate::diagram::{ComponentId, ComponentPatch, WireId};
use crate::geometry::Point;
use crate::simulation::SimulationTick;

/// Input to the editor state machine.
///
/// Pointer coordinates are canvas pixels. Events serialize with an `event`
/// tag so scripted sessions can be stored as JSON arrays, e.g.
/// `{"event": "click", "x": 120, "y": 40}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum EditorEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp,
    PointerLeave,
    Click { x: f64, y: f64 },
    ToggleWiring,
    Delete,
    Rotate,
    ToggleGrid,
    AddComponent { kind: ComponentKind, x: f64, y: f64 },
    UpdateSelected { patch: ComponentPatch },
    Clear,
    StartSimulation,
    StopSimulation,
    SimulationTick { tick: SimulationTick },
    Load { text: String },
}

impl EditorEvent {
    pub fn pointer_down(x: f64, y: f64) -> Self {
        EditorEvent::PointerDown { x, y }
    }

    pub fn pointer_move(x: f64, y: f64) -> Self {
        EditorEvent::PointerMove { x, y }
    }

    pub fn click(x: f64, y: f64) -> Self {
        EditorEvent::Click { x, y }
    }

    pub fn add(kind: ComponentKind, x: f64, y: f64) -> Self {
        EditorEvent::AddComponent { kind, x, y }
    }

    /// Pointer position carried by the event, if any
    pub fn point(&self) -> Option<Point> {
        match *self {
            EditorEvent::PointerDown { x, y }
            | EditorEvent::PointerMove { x, y }
            | EditorEvent::Click { x, y } => Some(Point::new(x, y)),
            _ => None,
        }
    }
}

/// What an event changed
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Selected(Option<ComponentId>),
    DragStarted(ComponentId),
    Moved(ComponentId),
    DragEnded(ComponentId),
    WiringToggled(bool),
    WireStarted { component_id: ComponentId, pin_id: String },
    WireAdded(WireId),
    /// The second pin was hit but the store refused the wire; wiring ended
    WireRejected,
    ComponentAdded(ComponentId),
    ComponentRemoved(ComponentId),
    ComponentUpdated(ComponentId),
    Cleared,
    GridToggled(bool),
    SimulationToggled(bool),
    MeasurementsUpdated,
    Loaded,
    /// A user-visible message; the diagram was left unchanged
    Notice(String),
}
