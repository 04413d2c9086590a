//! Interaction state machine
//!
//! [`EditorState`] owns the diagram together with all transient UI state:
//! the interaction mode, the selection, the last pointer position, grid
//! visibility and the simulation display data. Every change goes through
//! [`EditorState::apply`], one event at a time, so a recorded event list
//! replays to the same state.
//!
//! Modes:
//! - `Idle`: clicks select, pointer-down on the selection starts a drag
//! - `Dragging`: the selected component follows the pointer
//! - `WiringArmed`: waiting for the first pin
//! - `WiringPending`: first pin chosen, waiting for the second
//!
//! Wiring is single shot: completing one wire returns to `Idle`.

mod event;
pub mod hit;


use tracing::{debug, warn};

use crate::config::EditorConfig;
use crate::diagram::{normalize_rotation, Component, ComponentId, ComponentPatch, Diagram, PinRef};
use crate::document::{self, DocumentError};
use crate::geometry::Point;
use crate::simulation::{MeasurementMap, Readings, SimulationTick};

pub use event::{EditorEvent, Effect};
pub use hit::PIN_HIT_RADIUS;

/// An in-progress drag
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragState {
    pub component_id: ComponentId,
    /// Pointer position minus component position at pointer-down
    pub offset: Point,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Mode {
    #[default]
    Idle,
    Dragging(DragState),
    WiringArmed,
    WiringPending {
        start: PinRef,
    },
}

impl Mode {
    pub fn is_wiring(&self) -> bool {
        matches!(self, Mode::WiringArmed | Mode::WiringPending { .. })
    }

    pub fn wire_start(&self) -> Option<&PinRef> {
        match self {
            Mode::WiringPending { start } => Some(start),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EditorState {
    diagram: Diagram,
    mode: Mode,
    selection: Option<ComponentId>,
    pointer: Option<Point>,
    show_grid: bool,
    simulating: bool,
    measurements: MeasurementMap,
    readings: Option<Readings>,
    notice: Option<String>,
}

impl EditorState {
    pub fn new() -> Self {
        Self::with_diagram(Diagram::new())
    }

    pub fn with_diagram(diagram: Diagram) -> Self {
        Self {
            diagram,
            mode: Mode::Idle,
            selection: None,
            pointer: None,
            show_grid: true,
            simulating: false,
            measurements: MeasurementMap::new(),
            readings: None,
            notice: None,
        }
    }

    pub fn with_config(diagram: Diagram, config: &EditorConfig) -> Self {
        let mut state = Self::with_diagram(diagram);
        state.show_grid = config.show_grid;
        state
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn into_diagram(self) -> Diagram {
        self.diagram
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn pointer(&self) -> Option<Point> {
        self.pointer
    }

    pub fn show_grid(&self) -> bool {
        self.show_grid
    }

    pub fn is_simulating(&self) -> bool {
        self.simulating
    }

    pub fn measurements(&self) -> &MeasurementMap {
        &self.measurements
    }

    pub fn readings(&self) -> Option<Readings> {
        self.readings
    }

    /// Last user-visible message, e.g. a failed load
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Selected component id, re-checked against the live diagram
    pub fn selection(&self) -> Option<ComponentId> {
        self.selected().map(|c| c.id)
    }

    /// Selected component, `None` if nothing is selected or it is gone
    pub fn selected(&self) -> Option<&Component> {
        self.selection.and_then(|id| self.diagram.component(id))
    }

    /// Select a component by id, e.g. from a list view. Returns the id if it
    /// exists; otherwise the selection is left alone.
    pub fn select(&mut self, id: ComponentId) -> Option<ComponentId> {
        let found = self.diagram.component(id).map(|c| c.id)?;
        self.selection = Some(found);
        Some(found)
    }

    /// Replace the diagram from document text.
    ///
    /// On unparseable text the current diagram is kept and a notice is set.
    pub fn load_str(&mut self, text: &str) -> Result<(), DocumentError> {
        match document::deserialize(text) {
            Ok(diagram) => {
                self.diagram = diagram;
                self.mode = Mode::Idle;
                self.selection = None;
                self.measurements.clear();
                self.notice = None;
                Ok(())
            }
            Err(e) => {
                warn!("Load rejected: {}", e);
                self.notice = Some(format!("Could not load diagram: {}", e));
                Err(e)
            }
        }
    }

    /// Handle one event
    pub fn apply(&mut self, event: EditorEvent) -> Effect {
        if let Some(p) = event.point() {
            self.pointer = Some(p);
        }

        let effect = match event {
            EditorEvent::PointerDown { x, y } => self.pointer_down(Point::new(x, y)),
            EditorEvent::PointerMove { x, y } => self.pointer_move(Point::new(x, y)),
            EditorEvent::PointerUp => self.end_drag(),
            EditorEvent::PointerLeave => {
                self.pointer = None;
                self.end_drag()
            }
            EditorEvent::Click { x, y } => self.click(Point::new(x, y)),
            EditorEvent::ToggleWiring => self.toggle_wiring(),
            EditorEvent::Delete => self.delete_selected(),
            EditorEvent::Rotate => self.rotate_selected(),
            EditorEvent::ToggleGrid => {
                self.show_grid = !self.show_grid;
                Effect::GridToggled(self.show_grid)
            }
            EditorEvent::AddComponent { kind, x, y } => {
                self.end_drag();
                match self.diagram.add_component(kind, x, y) {
                    Some(id) => {
                        self.selection = Some(id);
                        Effect::ComponentAdded(id)
                    }
                    None => Effect::None,
                }
            }
            EditorEvent::UpdateSelected { patch } => self.update_selected(&patch),
            EditorEvent::Clear => {
                self.diagram.clear();
                self.mode = Mode::Idle;
                self.selection = None;
                self.measurements.clear();
                Effect::Cleared
            }
            EditorEvent::StartSimulation => {
                self.simulating = true;
                Effect::SimulationToggled(true)
            }
            EditorEvent::StopSimulation => {
                self.simulating = false;
                self.measurements.clear();
                self.readings = None;
                Effect::SimulationToggled(false)
            }
            EditorEvent::SimulationTick { tick } => self.simulation_tick(tick),
            EditorEvent::Load { text } => match self.load_str(&text) {
                Ok(()) => Effect::Loaded,
                Err(e) => Effect::Notice(format!("Could not load diagram: {}", e)),
            },
        };

        if effect != Effect::None {
            debug!("{:?}", effect);
        }
        effect
    }

    fn pointer_down(&mut self, p: Point) -> Effect {
        if self.mode.is_wiring() {
            return Effect::None;
        }
        let Some(component) = self.selected() else {
            return Effect::None;
        };
        if !component.bounds().contains(p) {
            return Effect::None;
        }
        let drag = DragState {
            component_id: component.id,
            offset: p - component.position(),
        };
        self.mode = Mode::Dragging(drag);
        Effect::DragStarted(drag.component_id)
    }

    fn pointer_move(&mut self, p: Point) -> Effect {
        let Mode::Dragging(drag) = self.mode else {
            return Effect::None;
        };
        let target = p - drag.offset;
        if self
            .diagram
            .update_component(drag.component_id, &ComponentPatch::position(target.x, target.y))
        {
            Effect::Moved(drag.component_id)
        } else {
            self.mode = Mode::Idle;
            Effect::None
        }
    }

    fn end_drag(&mut self) -> Effect {
        match self.mode {
            Mode::Dragging(drag) => {
                self.mode = Mode::Idle;
                Effect::DragEnded(drag.component_id)
            }
            _ => Effect::None,
        }
    }

    fn click(&mut self, p: Point) -> Effect {
        match self.mode.clone() {
            Mode::WiringArmed => match hit::pin_at(&self.diagram, p, PIN_HIT_RADIUS) {
                Some(pin) => {
                    let effect = Effect::WireStarted {
                        component_id: pin.component_id,
                        pin_id: pin.pin_id.clone(),
                    };
                    self.mode = Mode::WiringPending { start: pin };
                    effect
                }
                None => Effect::None,
            },
            Mode::WiringPending { start } => {
                let Some(end) = hit::pin_at(&self.diagram, p, PIN_HIT_RADIUS) else {
                    return Effect::None;
                };
                if end == start {
                    return Effect::None;
                }
                let added = self.diagram.add_wire(start.clone(), end.clone());
                self.mode = Mode::Idle;
                match added {
                    Some(id) => Effect::WireAdded(id),
                    None => {
                        debug!("Wire {} -> {} rejected by the store", start, end);
                        Effect::WireRejected
                    }
                }
            }
            Mode::Idle | Mode::Dragging(_) => {
                let hit = hit::component_at(&self.diagram, p);
                self.selection = hit;
                Effect::Selected(hit)
            }
        }
    }

    fn toggle_wiring(&mut self) -> Effect {
        if self.mode.is_wiring() {
            self.mode = Mode::Idle;
            Effect::WiringToggled(false)
        } else {
            self.mode = Mode::WiringArmed;
            Effect::WiringToggled(true)
        }
    }

    fn delete_selected(&mut self) -> Effect {
        let Some(id) = self.selection() else {
            return Effect::None;
        };
        self.diagram.remove_component(id);
        self.measurements.remove(&id);
        self.selection = None;
        if let Mode::Dragging(drag) = self.mode {
            if drag.component_id == id {
                self.mode = Mode::Idle;
            }
        }
        if let Mode::WiringPending { ref start } = self.mode {
            if start.component_id == id {
                self.mode = Mode::WiringArmed;
            }
        }
        Effect::ComponentRemoved(id)
    }

    fn rotate_selected(&mut self) -> Effect {
        let Some(component) = self.selected() else {
            return Effect::None;
        };
        let id = component.id;
        let next = normalize_rotation(i64::from(component.rotation) + 90);
        self.diagram
            .update_component(id, &ComponentPatch::default().with_rotation(next));
        Effect::ComponentUpdated(id)
    }

    fn update_selected(&mut self, patch: &ComponentPatch) -> Effect {
        match self.selection() {
            Some(id) if self.diagram.update_component(id, patch) => Effect::ComponentUpdated(id),
            _ => Effect::None,
        }
    }

    fn simulation_tick(&mut self, tick: SimulationTick) -> Effect {
        if !self.simulating {
            debug!("Ignoring tick while simulation is stopped");
            return Effect::None;
        }
        self.measurements = tick.measurements;
        self.readings = Some(tick.readings);
        Effect::MeasurementsUpdated
    }
}

impl Default for EditorState {
    fn default() -> Self {
        Self::new()
    }
}

/// Reducer form of [`EditorState::apply`]
pub fn reduce(mut state: EditorState, event: EditorEvent) -> EditorState {
    state.apply(event);
    state
}

/// Apply a sequence of events in order
pub fn replay<I>(state: EditorState, events: I) -> EditorState
where
    I: IntoIterator<Item = EditorEvent>,
{
    events.into_iter().fold(state, reduce)
}
