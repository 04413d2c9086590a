//! Schemkit - schematic editor core
//!
//! This library holds everything a schematic editor needs below the UI
//! toolkit: the diagram model, pin geometry for each symbol family, the
//! interaction state machine, a backend-neutral renderer, and the JSON
//! document format.
//!
//! # Quick Start
//!
//! ```
//! use schemkit::prelude::*;
//!
//! let mut editor = EditorState::new();
//! editor.apply(EditorEvent::add(ComponentKind::Battery, 40.0, 40.0));
//! editor.apply(EditorEvent::add(ComponentKind::Resistor, 160.0, 60.0));
//!
//! // wire battery "+" (top centre) to resistor pin "1" (left middle)
//! editor.apply(EditorEvent::ToggleWiring);
//! editor.apply(EditorEvent::click(60.0, 40.0));
//! editor.apply(EditorEvent::click(160.0, 75.0));
//! assert_eq!(editor.diagram().wires().len(), 1);
//!
//! let scene = render(&editor, &RenderOptions::default());
//! let svg = schemkit::render::svg::to_svg(&scene);
//! assert!(svg.contains("<path"));
//! ```
//!
//! # Features
//!
//! - **Catalog**: ESP32, passives, sensor modules, relay, meters, ground
//! - **Editing**: select, drag, wire, rotate, delete through [`EditorState::apply`]
//! - **Rendering**: ordered [`Scene`] display list with an SVG backend
//! - **Documents**: lenient JSON load, lossless save
//! - **Analysis**: netlist extraction and a mock measurement feed

pub mod catalog;
pub mod config;
pub mod core;
pub mod diagram;
pub mod document;
pub mod editor;
pub mod geometry;
pub mod netlist;
pub mod render;
pub mod simulation;
pub mod symbols;

// Re-export main types
pub use catalog::{CatalogEntry, ComponentKind};
pub use config::EditorConfig;
pub use crate::core::{RenderRequest, SchemCore, SchemError};
pub use diagram::{
    Component, ComponentId, ComponentPatch, Diagram, DiagramStats, InsertError, PinRef, Wire,
    WireId,
};
pub use document::DocumentError;
pub use editor::{EditorEvent, EditorState, Effect, Mode};
pub use geometry::{Point, Rect};
pub use netlist::{Net, Netlist};
pub use render::{render, RenderOptions, Scene};
pub use symbols::{resolve_pins, ResolvedPin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        render, resolve_pins, ComponentKind, Diagram, EditorConfig, EditorEvent, EditorState,
        Effect, PinRef, RenderOptions, SchemCore, SchemError,
    };
}
