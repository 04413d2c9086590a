//! Diagram documents
//!
//! Saved diagrams are JSON objects with a `components` array and a `wires`
//! array, each holding the store records verbatim (ids included).
//!
//! Loading is lenient. Text that does not parse as JSON is an error, but any
//! parseable document loads: a missing or non-array collection becomes
//! empty, entries that do not decode are skipped, and wires pointing at
//! components the document does not contain are dropped.

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use crate::diagram::{Component, Diagram, Wire};

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Document is not valid JSON: {0}")]
    Malformed(#[source] serde_json::Error),

    #[error("Failed to encode document: {0}")]
    Encode(#[source] serde_json::Error),
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    components: &'a [Component],
    wires: &'a [Wire],
}

/// Encode a diagram as pretty-printed JSON
pub fn serialize(diagram: &Diagram) -> Result<String, DocumentError> {
    let doc = DocumentRef {
        components: diagram.components(),
        wires: diagram.wires(),
    };
    serde_json::to_string_pretty(&doc).map_err(DocumentError::Encode)
}

/// Encode a diagram as a JSON value, for embedding in other output
pub fn to_value(diagram: &Diagram) -> Result<Value, DocumentError> {
    let doc = DocumentRef {
        components: diagram.components(),
        wires: diagram.wires(),
    };
    serde_json::to_value(&doc).map_err(DocumentError::Encode)
}

/// Decode a diagram. Only unparseable text is an error.
pub fn deserialize(text: &str) -> Result<Diagram, DocumentError> {
    let root: Value = serde_json::from_str(text).map_err(DocumentError::Malformed)?;
    Ok(from_value(root))
}

/// Decode a diagram from an already-parsed JSON value
pub fn from_value(root: Value) -> Diagram {
    let mut diagram = Diagram::new();

    let Value::Object(mut map) = root else {
        warn!("Document root is not an object, loading an empty diagram");
        return diagram;
    };

    for entry in take_array(&mut map, "components") {
        match serde_json::from_value::<Component>(entry) {
            Ok(component) => {
                if let Err(e) = diagram.insert_component(component) {
                    warn!("Skipping component entry: {}", e);
                }
            }
            Err(e) => warn!("Skipping undecodable component entry: {}", e),
        }
    }

    for entry in take_array(&mut map, "wires") {
        match serde_json::from_value::<Wire>(entry) {
            Ok(wire) => {
                let id = wire.id;
                if let Err(e) = diagram.insert_wire(wire) {
                    warn!("Skipping wire {}: {}", id, e);
                }
            }
            Err(e) => warn!("Skipping undecodable wire entry: {}", e),
        }
    }

    debug!(
        "Decoded document with {} component(s) and {} wire(s)",
        diagram.components().len(),
        diagram.wires().len()
    );
    diagram
}

fn take_array(map: &mut Map<String, Value>, key: &str) -> Vec<Value> {
    match map.remove(key) {
        Some(Value::Array(items)) => items,
        Some(_) => {
            warn!("Document field '{}' is not an array, treating as empty", key);
            Vec::new()
        }
        None => Vec::new(),
    }
}
