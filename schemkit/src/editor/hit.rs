//! Hit-testing against the diagram.
//!
//! Both tests walk components from most to least recently added, which is
//! the reverse of draw order, so whatever is visually on top wins.

use crate::diagram::{ComponentId, Diagram, PinRef};
use crate::geometry::Point;

/// Fixed pointer-to-pin distance, in pixels, that counts as hitting a pin
pub const PIN_HIT_RADIUS: f64 = 10.0;

/// Topmost component whose bounding box contains `p`
pub fn component_at(diagram: &Diagram, p: Point) -> Option<ComponentId> {
    diagram
        .components()
        .iter()
        .rev()
        .find(|c| c.bounds().contains(p))
        .map(|c| c.id)
}

/// First pin within `radius` of `p`, topmost component first
pub fn pin_at(diagram: &Diagram, p: Point, radius: f64) -> Option<PinRef> {
    diagram.components().iter().rev().find_map(|c| {
        c.resolved_pins()
            .into_iter()
            .find(|pin| pin.position().distance_to(&p) <= radius)
            .map(|pin| PinRef::new(c.id, pin.id))
    })
}
