//! Editor configuration
//!
//! Settings are read from an optional JSON file. Every field has a default,
//! so a partial file (or none at all) is fine.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::SchemError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub grid_size: f64,
    pub show_grid: bool,
    pub background: String,
    /// Period of the mock simulation timer in milliseconds
    pub simulation_period_ms: u64,
    /// Seed for the mock simulation. `None` seeds from the OS.
    pub simulation_seed: Option<u64>,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            canvas_height: 800.0,
            grid_size: 20.0,
            show_grid: true,
            background: "#ffffff".to_string(),
            simulation_period_ms: 100,
            simulation_seed: None,
        }
    }
}

impl EditorConfig {
    pub fn from_file(path: &Path) -> Result<Self, SchemError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SchemError> {
        serde_json::from_str(text).map_err(|e| SchemError::Config(e.to_string()))
    }

    pub fn simulation_period(&self) -> Duration {
        Duration::from_millis(self.simulation_period_ms.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let cfg = EditorConfig::from_json(r#"{"show_grid": false, "simulation_seed": 7}"#).unwrap();
        assert!(!cfg.show_grid);
        assert_eq!(cfg.simulation_seed, Some(7));
        assert_eq!(cfg.grid_size, 20.0);
        assert_eq!(cfg.simulation_period(), Duration::from_millis(100));
    }

    #[test]
    fn test_bad_config_is_error() {
        assert!(matches!(
            EditorConfig::from_json("{\"grid_size\": \"big\"}"),
            Err(SchemError::Config(_))
        ));
    }
}
