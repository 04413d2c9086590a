use crate::diagram::Component;
use crate::geometry::{Point, Rect};
use crate::render::{Scene, TextAnchor};

use super::{ResolvedPin, Symbol, PIN_OFFSET, PIN_STEP};

const DEFAULT_STROKE: &str = "#374151";
const BODY_FILL: &str = "#f9fafb";
const CAPTION_COLOR: &str = "#374151";

fn stroke_of(component: &Component) -> &str {
    component.color.as_deref().unwrap_or(DEFAULT_STROKE)
}

/// Label (and value, when set) centred under the body
fn draw_caption(component: &Component, scene: &mut Scene) {
    let b = component.bounds();
    let caption = match &component.value {
        Some(value) => format!("{} {}", component.label, value),
        None => component.label.clone(),
    };
    scene.text(
        Point::new(b.center().x, b.bottom() + 14.0),
        caption,
        11.0,
        CAPTION_COLOR,
        TextAnchor::Middle,
    );
}

/// Dual-column integrated circuit with counted pins
#[derive(Debug)]
pub struct IcSymbol {
    pub per_side: usize,
    /// Left column labels followed by right column labels
    pub labels: Option<&'static [&'static str]>,
}

impl IcSymbol {
    fn label(&self, index: usize) -> Option<&'static str> {
        self.labels.and_then(|l| l.get(index)).copied()
    }
}

impl Symbol for IcSymbol {
    fn family(&self) -> &'static str {
        "ic"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        let mut pins = Vec::with_capacity(self.per_side * 2);
        let columns = [("pL", c.x, 0), ("pR", c.x + c.width, self.per_side)];
        for (prefix, x, label_base) in columns {
            for i in 0..self.per_side {
                let y = c.y + PIN_OFFSET + i as f64 * PIN_STEP;
                let pin = ResolvedPin::new(format!("{}{}", prefix, i + 1), x, y);
                pins.push(match self.label(label_base + i) {
                    Some(label) => pin.with_label(label),
                    None => pin,
                });
            }
        }
        pins
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        scene.rect(b, stroke, Some(BODY_FILL), 4.0);
        // orientation notch
        scene.circle(Point::new(b.center().x, b.y), 8.0, stroke, Some("#ffffff"));
        scene.text(
            Point::new(b.center().x, b.y + 36.0),
            c.label.clone(),
            12.0,
            stroke,
            TextAnchor::Middle,
        );
    }
}

/// Horizontal two-terminal parts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwoTerminalSymbol {
    Resistor,
    Capacitor,
    Thermistor,
    Piezo,
}

impl Symbol for TwoTerminalSymbol {
    fn family(&self) -> &'static str {
        "two-terminal"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        let cy = c.y + c.height / 2.0;
        vec![
            ResolvedPin::new("1", c.x, cy).with_label("1"),
            ResolvedPin::new("2", c.x + c.width, cy).with_label("2"),
        ]
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        let cy = b.center().y;
        let inner_left = b.x + b.width * 0.2;
        let inner_right = b.x + b.width * 0.8;

        match self {
            TwoTerminalSymbol::Resistor => {
                scene.line(Point::new(b.x, cy), Point::new(inner_left, cy), stroke, 2.0);
                scene.line(Point::new(inner_right, cy), Point::new(b.right(), cy), stroke, 2.0);
                let amplitude = b.height * 0.3;
                let segments = 6;
                let step = (inner_right - inner_left) / segments as f64;
                let mut points = vec![Point::new(inner_left, cy)];
                for i in 1..segments {
                    let dy = if i % 2 == 1 { -amplitude } else { amplitude };
                    points.push(Point::new(inner_left + step * i as f64, cy + dy));
                }
                points.push(Point::new(inner_right, cy));
                scene.polyline(points, stroke, 2.0);
            }
            TwoTerminalSymbol::Capacitor => {
                let cx = b.center().x;
                let half = b.height * 0.4;
                scene.line(Point::new(b.x, cy), Point::new(cx - 4.0, cy), stroke, 2.0);
                scene.line(Point::new(cx + 4.0, cy), Point::new(b.right(), cy), stroke, 2.0);
                scene.line(Point::new(cx - 4.0, cy - half), Point::new(cx - 4.0, cy + half), stroke, 3.0);
                scene.line(Point::new(cx + 4.0, cy - half), Point::new(cx + 4.0, cy + half), stroke, 3.0);
            }
            TwoTerminalSymbol::Thermistor => {
                let body = Rect::new(inner_left, b.y + b.height * 0.2, inner_right - inner_left, b.height * 0.6);
                scene.line(Point::new(b.x, cy), Point::new(inner_left, cy), stroke, 2.0);
                scene.line(Point::new(inner_right, cy), Point::new(b.right(), cy), stroke, 2.0);
                scene.rect(body, stroke, Some(BODY_FILL), 0.0);
                scene.line(
                    Point::new(body.x - 4.0, body.bottom() + 4.0),
                    Point::new(body.right() + 4.0, body.y - 4.0),
                    stroke,
                    1.5,
                );
            }
            TwoTerminalSymbol::Piezo => {
                let center = b.center();
                let radius = b.width.min(b.height) * 0.3;
                scene.line(Point::new(b.x, cy), Point::new(center.x - radius, cy), stroke, 2.0);
                scene.line(Point::new(center.x + radius, cy), Point::new(b.right(), cy), stroke, 2.0);
                scene.circle(center, radius, stroke, Some(BODY_FILL));
                scene.rect(
                    Rect::new(center.x - radius * 0.5, center.y - radius * 0.3, radius, radius * 0.6),
                    stroke,
                    None,
                    0.0,
                );
            }
        }
        draw_caption(c, scene);
    }
}

/// Vertical parts with a positive top pin and a negative bottom pin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolarizedSymbol {
    Led,
    Battery,
}

impl PolarizedSymbol {
    fn pin_ids(&self) -> (&'static str, &'static str) {
        match self {
            PolarizedSymbol::Led => ("anode", "cathode"),
            PolarizedSymbol::Battery => ("+", "-"),
        }
    }
}

impl Symbol for PolarizedSymbol {
    fn family(&self) -> &'static str {
        "polarized"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        let cx = c.x + c.width / 2.0;
        let (top, bottom) = self.pin_ids();
        vec![
            ResolvedPin::new(top, cx, c.y).with_label(top),
            ResolvedPin::new(bottom, cx, c.y + c.height).with_label(bottom),
        ]
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        let cx = b.center().x;
        let cy = b.center().y;

        match self {
            PolarizedSymbol::Led => {
                let half = b.width * 0.35;
                let tip = cy + 8.0;
                scene.line(Point::new(cx, b.y), Point::new(cx, cy - 8.0), stroke, 2.0);
                scene.polyline(
                    vec![
                        Point::new(cx - half, cy - 8.0),
                        Point::new(cx + half, cy - 8.0),
                        Point::new(cx, tip),
                        Point::new(cx - half, cy - 8.0),
                    ],
                    stroke,
                    2.0,
                );
                scene.line(Point::new(cx - half, tip), Point::new(cx + half, tip), stroke, 2.0);
                scene.line(Point::new(cx, tip), Point::new(cx, b.bottom()), stroke, 2.0);
                // emission arrows
                scene.line(Point::new(cx + half, cy - 4.0), Point::new(cx + half + 8.0, cy - 12.0), stroke, 1.0);
                scene.line(Point::new(cx + half, cy + 2.0), Point::new(cx + half + 8.0, cy - 6.0), stroke, 1.0);
            }
            PolarizedSymbol::Battery => {
                let long = b.width * 0.45;
                let short = b.width * 0.25;
                scene.line(Point::new(cx, b.y), Point::new(cx, cy - 5.0), stroke, 2.0);
                scene.line(Point::new(cx - long, cy - 5.0), Point::new(cx + long, cy - 5.0), stroke, 2.0);
                scene.line(Point::new(cx - short, cy + 5.0), Point::new(cx + short, cy + 5.0), stroke, 4.0);
                scene.line(Point::new(cx, cy + 5.0), Point::new(cx, b.bottom()), stroke, 2.0);
                scene.text(Point::new(cx + long + 4.0, cy - 8.0), "+", 10.0, stroke, TextAnchor::Start);
            }
        }
        draw_caption(c, scene);
    }
}

/// Edge of a module body a pin sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Breakout modules with named pins at fixed offsets from the top edge
#[derive(Debug)]
pub struct ModuleSymbol {
    pub pins: &'static [(&'static str, Side, f64)],
    pub caption: &'static str,
}

impl Symbol for ModuleSymbol {
    fn family(&self) -> &'static str {
        "module"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        self.pins
            .iter()
            .map(|(id, side, dy)| {
                let x = match side {
                    Side::Left => c.x,
                    Side::Right => c.x + c.width,
                };
                ResolvedPin::new(*id, x, c.y + dy).with_label(*id)
            })
            .collect()
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        scene.rect(b, stroke, Some(BODY_FILL), 6.0);
        scene.text(b.center(), self.caption, 16.0, stroke, TextAnchor::Middle);
        draw_caption(c, scene);
    }
}

/// Ground reference with a single top pin
#[derive(Debug)]
pub struct GroundSymbol;

impl Symbol for GroundSymbol {
    fn family(&self) -> &'static str {
        "ground"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        vec![ResolvedPin::new("gnd", c.x + c.width / 2.0, c.y).with_label("gnd")]
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        let cx = b.center().x;
        let top_bar = b.y + b.height * 0.4;
        scene.line(Point::new(cx, b.y), Point::new(cx, top_bar), stroke, 2.0);
        for (i, scale) in [0.5, 0.32, 0.14].iter().enumerate() {
            let y = top_bar + i as f64 * 6.0;
            let half = b.width * scale;
            scene.line(Point::new(cx - half, y), Point::new(cx + half, y), stroke, 2.0);
        }
    }
}

/// Round meter face with `+` on the left and `-` on the right
#[derive(Debug)]
pub struct MeterSymbol {
    pub glyph: &'static str,
}

impl Symbol for MeterSymbol {
    fn family(&self) -> &'static str {
        "meter"
    }

    fn pins(&self, c: &Component) -> Vec<ResolvedPin> {
        let cy = c.y + c.height / 2.0;
        vec![
            ResolvedPin::new("+", c.x, cy).with_label("+"),
            ResolvedPin::new("-", c.x + c.width, cy).with_label("-"),
        ]
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        let stroke = stroke_of(c);
        let center = b.center();
        let radius = (b.width.min(b.height) / 2.0 - 4.0).max(1.0);
        scene.line(Point::new(b.x, center.y), Point::new(center.x - radius, center.y), stroke, 2.0);
        scene.line(Point::new(center.x + radius, center.y), Point::new(b.right(), center.y), stroke, 2.0);
        scene.circle(center, radius, stroke, Some("#ffffff"));
        scene.text(center, self.glyph, 18.0, stroke, TextAnchor::Middle);
        draw_caption(c, scene);
    }
}

/// Fallback for types outside the catalog
#[derive(Debug)]
pub struct UnknownSymbol;

impl Symbol for UnknownSymbol {
    fn family(&self) -> &'static str {
        "unknown"
    }

    fn pins(&self, _c: &Component) -> Vec<ResolvedPin> {
        Vec::new()
    }

    fn draw(&self, c: &Component, scene: &mut Scene) {
        let b = c.bounds();
        scene.dashed_rect(b, DEFAULT_STROKE, 1.5);
        scene.text(b.center(), "?", 16.0, DEFAULT_STROKE, TextAnchor::Middle);
        scene.text(
            Point::new(b.center().x, b.bottom() + 14.0),
            c.kind.tag(),
            11.0,
            CAPTION_COLOR,
            TextAnchor::Middle,
        );
    }
}
