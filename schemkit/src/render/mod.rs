//! Renderer
//!
//! [`render`] turns an [`EditorState`] into a [`Scene`]: a flat, ordered list
//! of drawing primitives, each tagged with the [`Layer`] it belongs to. The
//! scene is backend neutral; [`svg::to_svg`] writes it out as an SVG
//! document.
//!
//! Draw order:
//! 1. grid
//! 2. wires (cubic curves between resolved pins)
//! 3. per component: body, selection outline, pins, pin labels, measurement
//! 4. wiring preview

pub mod panel;
pub mod svg;

use crate::config::EditorConfig;
use crate::diagram::{Component, ComponentId, WireId};
use crate::editor::{EditorState, Mode, PIN_HIT_RADIUS};
use crate::geometry::{Point, Rect};
use crate::symbols::{self, ResolvedPin};

pub const PIN_RADIUS: f64 = 4.0;
pub const SELECTION_PADDING: f64 = 4.0;

const GRID_COLOR: &str = "#e5e7eb";
const WIRE_COLOR: &str = "#2563eb";
const SELECTION_COLOR: &str = "#3b82f6";
const PIN_STROKE: &str = "#111827";
const PIN_FILL: &str = "#ffffff";
const PIN_HOVER_FILL: &str = "#f59e0b";
const PIN_LABEL_COLOR: &str = "#374151";
const MEASUREMENT_COLOR: &str = "#b91c1c";
const PREVIEW_COLOR: &str = "#6b7280";

/// What a scene item belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Grid,
    Wire(WireId),
    Body(ComponentId),
    Selection(ComponentId),
    Pin(ComponentId),
    PinLabel(ComponentId),
    Measurement(ComponentId),
    Preview,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        from: Point,
        to: Point,
        stroke: String,
        width: f64,
        dashed: bool,
    },
    Polyline {
        points: Vec<Point>,
        stroke: String,
        width: f64,
    },
    /// Cubic Bézier
    Curve {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        stroke: String,
        width: f64,
    },
    Rect {
        rect: Rect,
        stroke: String,
        fill: Option<String>,
        radius: f64,
        width: f64,
        dashed: bool,
    },
    Circle {
        center: Point,
        radius: f64,
        stroke: String,
        fill: Option<String>,
    },
    Text {
        at: Point,
        text: String,
        size: f64,
        color: String,
        anchor: TextAnchor,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    pub layer: Layer,
    pub primitive: Primitive,
}

/// An ordered display list
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub width: f64,
    pub height: f64,
    pub background: String,
    items: Vec<Item>,
    layer: Layer,
}

impl Scene {
    pub fn new(width: f64, height: f64, background: impl Into<String>) -> Self {
        Self {
            width,
            height,
            background: background.into(),
            items: Vec::new(),
            layer: Layer::Grid,
        }
    }

    /// Tag subsequently pushed primitives with `layer`
    pub fn set_layer(&mut self, layer: Layer) {
        self.layer = layer;
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items on layers matching `pred`, in draw order
    pub fn items_where<F>(&self, pred: F) -> impl Iterator<Item = &Item>
    where
        F: Fn(&Layer) -> bool,
    {
        self.items.iter().filter(move |item| pred(&item.layer))
    }

    pub fn push(&mut self, primitive: Primitive) {
        self.items.push(Item {
            layer: self.layer,
            primitive,
        });
    }

    pub fn line(&mut self, from: Point, to: Point, stroke: &str, width: f64) {
        self.push(Primitive::Line {
            from,
            to,
            stroke: stroke.to_string(),
            width,
            dashed: false,
        });
    }

    pub fn dashed_line(&mut self, from: Point, to: Point, stroke: &str, width: f64) {
        self.push(Primitive::Line {
            from,
            to,
            stroke: stroke.to_string(),
            width,
            dashed: true,
        });
    }

    pub fn polyline(&mut self, points: Vec<Point>, stroke: &str, width: f64) {
        self.push(Primitive::Polyline {
            points,
            stroke: stroke.to_string(),
            width,
        });
    }

    pub fn curve(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point, stroke: &str, width: f64) {
        self.push(Primitive::Curve {
            from,
            ctrl1,
            ctrl2,
            to,
            stroke: stroke.to_string(),
            width,
        });
    }

    pub fn rect(&mut self, rect: Rect, stroke: &str, fill: Option<&str>, radius: f64) {
        self.push(Primitive::Rect {
            rect,
            stroke: stroke.to_string(),
            fill: fill.map(str::to_string),
            radius,
            width: 2.0,
            dashed: false,
        });
    }

    pub fn dashed_rect(&mut self, rect: Rect, stroke: &str, width: f64) {
        self.push(Primitive::Rect {
            rect,
            stroke: stroke.to_string(),
            fill: None,
            radius: 0.0,
            width,
            dashed: true,
        });
    }

    pub fn circle(&mut self, center: Point, radius: f64, stroke: &str, fill: Option<&str>) {
        self.push(Primitive::Circle {
            center,
            radius,
            stroke: stroke.to_string(),
            fill: fill.map(str::to_string),
        });
    }

    pub fn text(&mut self, at: Point, text: impl Into<String>, size: f64, color: &str, anchor: TextAnchor) {
        self.push(Primitive::Text {
            at,
            text: text.into(),
            size,
            color: color.to_string(),
            anchor,
        });
    }
}

/// Canvas settings for one render
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub width: f64,
    pub height: f64,
    pub background: String,
    pub grid_size: f64,
    /// Grid is drawn only when both this and the editor's grid flag are set
    pub show_grid: bool,
}

impl RenderOptions {
    pub fn without_grid(mut self) -> Self {
        self.show_grid = false;
        self
    }
}

impl From<&EditorConfig> for RenderOptions {
    fn from(config: &EditorConfig) -> Self {
        Self {
            width: config.canvas_width,
            height: config.canvas_height,
            background: config.background.clone(),
            grid_size: config.grid_size,
            show_grid: config.show_grid,
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

/// Build the scene for the current editor state. Pure.
pub fn render(state: &EditorState, options: &RenderOptions) -> Scene {
    let mut scene = Scene::new(options.width, options.height, options.background.clone());

    if options.show_grid && state.show_grid() {
        draw_grid(&mut scene, options.grid_size);
    }

    let diagram = state.diagram();
    for wire in diagram.wires() {
        // unresolvable wires stay in the store but are not drawn
        let Some((from, to)) = diagram.resolve_wire(wire) else {
            continue;
        };
        scene.set_layer(Layer::Wire(wire.id));
        draw_wire(
            &mut scene,
            from.position(),
            to.position(),
            wire.color.as_deref().unwrap_or(WIRE_COLOR),
        );
    }

    let selection = state.selection();
    let pointer = state.pointer();
    for component in diagram.components() {
        draw_component(&mut scene, state, component, selection == Some(component.id), pointer);
    }

    if let (Mode::WiringPending { start }, Some(pointer)) = (state.mode(), pointer) {
        if let Some(pin) = diagram.resolve_pin(start) {
            scene.set_layer(Layer::Preview);
            scene.dashed_line(pin.position(), pointer, PREVIEW_COLOR, 2.0);
        }
    }

    scene
}

fn draw_grid(scene: &mut Scene, grid_size: f64) {
    if grid_size <= 0.0 {
        return;
    }
    scene.set_layer(Layer::Grid);
    let (width, height) = (scene.width, scene.height);
    let mut x = 0.0;
    while x <= width {
        scene.line(Point::new(x, 0.0), Point::new(x, height), GRID_COLOR, 1.0);
        x += grid_size;
    }
    let mut y = 0.0;
    while y <= height {
        scene.line(Point::new(0.0, y), Point::new(width, y), GRID_COLOR, 1.0);
        y += grid_size;
    }
}

/// Horizontal-tangent curve between two pins
fn draw_wire(scene: &mut Scene, from: Point, to: Point, color: &str) {
    let bend = ((to.x - from.x).abs() / 2.0).max(30.0);
    let dir = if to.x >= from.x { 1.0 } else { -1.0 };
    scene.curve(
        from,
        from.offset(bend * dir, 0.0),
        to.offset(-bend * dir, 0.0),
        to,
        color,
        2.0,
    );
}

fn draw_component(
    scene: &mut Scene,
    state: &EditorState,
    component: &Component,
    selected: bool,
    pointer: Option<Point>,
) {
    scene.set_layer(Layer::Body(component.id));
    symbols::symbol_for(&component.kind).draw(component, scene);

    if selected {
        scene.set_layer(Layer::Selection(component.id));
        scene.dashed_rect(component.bounds().inflate(SELECTION_PADDING), SELECTION_COLOR, 2.0);
    }

    let pins = component.resolved_pins();
    let hovered = |pin: &ResolvedPin| {
        pointer.is_some_and(|p| pin.position().distance_to(&p) <= PIN_HIT_RADIUS)
    };

    scene.set_layer(Layer::Pin(component.id));
    for pin in &pins {
        let fill = if hovered(pin) { PIN_HOVER_FILL } else { PIN_FILL };
        scene.circle(pin.position(), PIN_RADIUS, PIN_STROKE, Some(fill));
    }

    scene.set_layer(Layer::PinLabel(component.id));
    for pin in &pins {
        if selected || hovered(pin) {
            draw_pin_label(scene, component, pin);
        }
    }

    if let Some(text) = state.measurements().get(&component.id) {
        let b = component.bounds();
        scene.set_layer(Layer::Measurement(component.id));
        scene.text(
            Point::new(b.center().x, b.bottom() + 30.0),
            text.as_str(),
            13.0,
            MEASUREMENT_COLOR,
            TextAnchor::Middle,
        );
    }
}

/// Labels sit inside the body next to edge pins, above any other pin
fn draw_pin_label(scene: &mut Scene, component: &Component, pin: &ResolvedPin) {
    let text = pin.label.as_deref().unwrap_or(&pin.id);
    let (at, anchor) = if pin.x <= component.x {
        (pin.position().offset(PIN_RADIUS + 3.0, 3.0), TextAnchor::Start)
    } else if pin.x >= component.x + component.width {
        (pin.position().offset(-(PIN_RADIUS + 3.0), 3.0), TextAnchor::End)
    } else {
        (pin.position().offset(0.0, -(PIN_RADIUS + 4.0)), TextAnchor::Middle)
    };
    scene.text(at, text, 9.0, PIN_LABEL_COLOR, anchor);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::ComponentKind;
    use crate::editor::EditorEvent;
    use crate::simulation::{MeasurementMap, Readings, SimulationTick};

    fn count(scene: &Scene, pred: impl Fn(&Layer) -> bool) -> usize {
        scene.items_where(pred).count()
    }

    fn two_resistors_wired() -> EditorState {
        let mut state = EditorState::new();
        state.apply(EditorEvent::add(ComponentKind::Resistor, 0.0, 0.0));
        state.apply(EditorEvent::add(ComponentKind::Resistor, 200.0, 0.0));
        state.apply(EditorEvent::ToggleWiring);
        state.apply(EditorEvent::click(80.0, 15.0));
        state.apply(EditorEvent::click(200.0, 15.0));
        state.apply(EditorEvent::PointerLeave);
        state
    }

    #[test]
    fn test_render_is_idempotent() {
        let state = two_resistors_wired();
        let opts = RenderOptions::default();
        assert_eq!(render(&state, &opts), render(&state, &opts));
    }

    #[test]
    fn test_draw_order() {
        let state = two_resistors_wired();
        let scene = render(&state, &RenderOptions::default());
        let layers: Vec<Layer> = scene.items().iter().map(|i| i.layer).collect();

        let last_grid = layers.iter().rposition(|l| *l == Layer::Grid).unwrap();
        let first_wire = layers.iter().position(|l| matches!(l, Layer::Wire(_))).unwrap();
        let first_body = layers.iter().position(|l| matches!(l, Layer::Body(_))).unwrap();
        assert!(last_grid < first_wire);
        assert!(first_wire < first_body);
    }

    #[test]
    fn test_grid_can_be_disabled() {
        let mut state = two_resistors_wired();
        let opts = RenderOptions::default();
        assert!(count(&render(&state, &opts), |l| *l == Layer::Grid) > 0);
        assert_eq!(count(&render(&state, &opts.clone().without_grid()), |l| *l == Layer::Grid), 0);

        state.apply(EditorEvent::ToggleGrid);
        assert_eq!(count(&render(&state, &opts), |l| *l == Layer::Grid), 0);
    }

    #[test]
    fn test_wire_is_cubic_curve_between_pins() {
        let state = two_resistors_wired();
        let scene = render(&state, &RenderOptions::default().without_grid());
        let wire = scene
            .items_where(|l| matches!(l, Layer::Wire(_)))
            .next()
            .expect("wire item");
        match &wire.primitive {
            Primitive::Curve { from, to, .. } => {
                assert_eq!(*from, Point::new(80.0, 15.0));
                assert_eq!(*to, Point::new(200.0, 15.0));
            }
            other => panic!("expected curve, got {:?}", other),
        }
    }

    #[test]
    fn test_unresolvable_wire_is_skipped() {
        let mut state = two_resistors_wired();
        let mut diagram = state.diagram().clone();
        let id = diagram.components()[0].id;
        diagram.component_mut(id).unwrap().kind = ComponentKind::Custom("gone".into());
        state = EditorState::with_diagram(diagram);
        let scene = render(&state, &RenderOptions::default());
        assert_eq!(count(&scene, |l| matches!(l, Layer::Wire(_))), 0);
    }

    #[test]
    fn test_selection_outline_and_labels() {
        let mut state = EditorState::new();
        state.apply(EditorEvent::add(ComponentKind::Resistor, 100.0, 100.0));
        state.apply(EditorEvent::PointerLeave);
        let id = state.selection().unwrap();
        let scene = render(&state, &RenderOptions::default().without_grid());

        let outline = scene
            .items_where(|l| *l == Layer::Selection(id))
            .next()
            .expect("selection outline");
        match &outline.primitive {
            Primitive::Rect { rect, dashed, .. } => {
                assert!(*dashed);
                assert_eq!(*rect, Rect::new(96.0, 96.0, 88.0, 38.0));
            }
            other => panic!("expected rect, got {:?}", other),
        }
        assert_eq!(count(&scene, |l| *l == Layer::PinLabel(id)), 2);
        assert_eq!(count(&scene, |l| *l == Layer::Pin(id)), 2);
    }

    #[test]
    fn test_pin_label_only_on_hover_when_unselected() {
        let mut state = EditorState::new();
        state.apply(EditorEvent::add(ComponentKind::Resistor, 0.0, 0.0));
        state.apply(EditorEvent::click(500.0, 500.0));
        assert_eq!(state.selection(), None);

        let scene = render(&state, &RenderOptions::default());
        assert_eq!(count(&scene, |l| matches!(l, Layer::PinLabel(_))), 0);

        state.apply(EditorEvent::pointer_move(82.0, 17.0));
        let scene = render(&state, &RenderOptions::default());
        let labels: Vec<&Item> = scene.items_where(|l| matches!(l, Layer::PinLabel(_))).collect();
        assert_eq!(labels.len(), 1);
        match &labels[0].primitive {
            Primitive::Text { text, anchor, .. } => {
                assert_eq!(text, "2");
                assert_eq!(*anchor, TextAnchor::End);
            }
            other => panic!("expected text, got {:?}", other),
        }
    }

    #[test]
    fn test_measurement_text() {
        let mut state = EditorState::new();
        state.apply(EditorEvent::add(ComponentKind::Voltmeter, 0.0, 0.0));
        let id = state.selection().unwrap();
        let mut measurements = MeasurementMap::new();
        measurements.insert(id, "4.98V".to_string());
        state.apply(EditorEvent::StartSimulation);
        state.apply(EditorEvent::SimulationTick {
            tick: SimulationTick {
                readings: Readings {
                    voltage: 4.98,
                    current: 0.02,
                    power: 0.0996,
                },
                measurements,
            },
        });

        let scene = render(&state, &RenderOptions::default());
        let item = scene
            .items_where(|l| *l == Layer::Measurement(id))
            .next()
            .expect("measurement");
        assert!(matches!(&item.primitive, Primitive::Text { text, .. } if text == "4.98V"));
    }

    #[test]
    fn test_preview_only_while_pending() {
        let mut state = EditorState::new();
        state.apply(EditorEvent::add(ComponentKind::Resistor, 0.0, 0.0));
        state.apply(EditorEvent::ToggleWiring);
        state.apply(EditorEvent::pointer_move(40.0, 60.0));
        let scene = render(&state, &RenderOptions::default());
        assert_eq!(count(&scene, |l| *l == Layer::Preview), 0);

        state.apply(EditorEvent::click(0.0, 15.0));
        state.apply(EditorEvent::pointer_move(150.0, 90.0));
        let scene = render(&state, &RenderOptions::default());
        let preview = scene.items_where(|l| *l == Layer::Preview).next().expect("preview");
        assert_eq!(
            preview.primitive,
            Primitive::Line {
                from: Point::new(0.0, 15.0),
                to: Point::new(150.0, 90.0),
                stroke: PREVIEW_COLOR.to_string(),
                width: 2.0,
                dashed: true,
            }
        );
    }
}
