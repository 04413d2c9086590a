//! Property panel view model

use serde::Serialize;

use crate::diagram::{Component, ComponentId};
use crate::editor::EditorState;
use crate::simulation::Readings;

/// Editable and read-only fields shown for one component
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertySheet {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: String,
    pub label: String,
    pub value: Option<String>,
    pub rotation: u16,
    pub color: Option<String>,
    pub pin_count: usize,
    /// Live reading while simulation is on
    pub measurement: Option<String>,
    /// Supply voltage, current and power while simulation is on
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supply: Option<Readings>,
}

impl PropertySheet {
    /// Sheet for the current selection, if it still exists
    pub fn for_selection(state: &EditorState) -> Option<Self> {
        state.selected().map(|c| Self::for_component(state, c))
    }

    pub fn for_component(state: &EditorState, component: &Component) -> Self {
        Self {
            id: component.id,
            kind: component.kind.tag().to_string(),
            label: component.label.clone(),
            value: component.value.as_ref().map(|v| v.to_string()),
            rotation: component.rotation,
            color: component.color.clone(),
            pin_count: component.resolved_pins().len(),
            measurement: state.measurements().get(&component.id).cloned(),
            supply: state.readings(),
        }
    }

    /// Name/value pairs in display order, empty fields omitted
    pub fn rows(&self) -> Vec<(&'static str, String)> {
        let mut rows = vec![
            ("id", self.id.to_string()),
            ("type", self.kind.clone()),
            ("label", self.label.clone()),
        ];
        if let Some(value) = &self.value {
            rows.push(("value", value.clone()));
        }
        rows.push(("rotation", format!("{}°", self.rotation)));
        if let Some(color) = &self.color {
            rows.push(("color", color.clone()));
        }
        rows.push(("pins", self.pin_count.to_string()));
        if let Some(m) = &self.measurement {
            rows.push(("measurement", m.clone()));
        }
        if let Some(r) = &self.supply {
            rows.push((
                "supply",
                format!(
                    "{:.2} V, {:.1} mA, {:.3} W",
                    r.voltage,
                    r.current * 1000.0,
                    r.power
                ),
            ));
        }
        rows
    }
}
