//! Diagram model: placed components, wires and the store that owns them

mod model;
mod store;

pub use model::{
    normalize_rotation, snap_rotation, Component, ComponentId, ComponentPatch, PinDescriptor,
    PinRef, PropValue, Wire, WireId,
};
pub use store::{Diagram, DiagramStats, InsertError};
