//! File-level operations shared by the CLI and embedding applications.
//! No terminal or UI dependencies.

use std::path::Path;

use tracing::{info, warn};

use crate::catalog::ComponentKind;
use crate::config::EditorConfig;
use crate::diagram::{ComponentId, Diagram};
use crate::document::{self, DocumentError};
use crate::editor::{self, EditorEvent, EditorState};
use crate::render::{self, RenderOptions};
use crate::simulation::{self, MockSimulator, SimulationDriver, SimulationTick};

#[derive(Debug, thiserror::Error)]
pub enum SchemError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Unknown component type: {0}")]
    UnknownKind(String),
    #[error("Simulation stopped after {0} ticks")]
    Simulation(usize),
}

/// Rendering switches beyond what [`EditorConfig`] holds
#[derive(Debug, Clone, Default)]
pub struct RenderRequest {
    pub hide_grid: bool,
    pub select: Option<ComponentId>,
}

pub struct SchemCore;

impl SchemCore {
    /// Read a diagram document from disk
    pub fn load_diagram(path: &Path) -> Result<Diagram, SchemError> {
        let text = std::fs::read_to_string(path)?;
        let diagram = document::deserialize(&text)?;
        info!(
            "Loaded {} ({} components, {} wires)",
            path.display(),
            diagram.components().len(),
            diagram.wires().len()
        );
        Ok(diagram)
    }

    /// Load `path`, or start an empty diagram if it does not exist yet
    pub fn load_or_new(path: &Path) -> Result<Diagram, SchemError> {
        if path.exists() {
            Self::load_diagram(path)
        } else {
            info!("{} does not exist, starting empty diagram", path.display());
            Ok(Diagram::new())
        }
    }

    pub fn save_diagram(path: &Path, diagram: &Diagram) -> Result<(), SchemError> {
        let text = document::serialize(diagram)?;
        std::fs::write(path, text)?;
        info!("Saved {}", path.display());
        Ok(())
    }

    /// Add a catalog component to the document at `path` and save it
    pub fn place(path: &Path, tag: &str, x: f64, y: f64) -> Result<ComponentId, SchemError> {
        let kind = ComponentKind::from_tag(tag);
        if kind.is_custom() {
            return Err(SchemError::UnknownKind(tag.to_string()));
        }
        let mut diagram = Self::load_or_new(path)?;
        let id = diagram
            .add_component(kind, x, y)
            .ok_or_else(|| SchemError::UnknownKind(tag.to_string()))?;
        Self::save_diagram(path, &diagram)?;
        Ok(id)
    }

    /// Parse a JSON array of editor events
    pub fn parse_script(text: &str) -> Result<Vec<EditorEvent>, SchemError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Run a scripted session against a diagram
    pub fn replay(diagram: Diagram, events: Vec<EditorEvent>) -> EditorState {
        let count = events.len();
        let state = editor::replay(EditorState::with_diagram(diagram), events);
        if let Some(notice) = state.notice() {
            warn!("{}", notice);
        }
        info!("Replayed {} events", count);
        state
    }

    pub fn render_svg(diagram: Diagram, config: &EditorConfig, request: &RenderRequest) -> String {
        let mut state = EditorState::with_config(diagram, config);
        if let Some(id) = request.select {
            if state.select(id).is_none() {
                warn!("Component {} not found, rendering without selection", id);
            }
        }
        let mut options = RenderOptions::from(config);
        if request.hide_grid {
            options = options.without_grid();
        }
        render::svg::to_svg(&render::render(&state, &options))
    }

    /// Drive the mock feed for `ticks` periods and fold each tick into an
    /// editor state, as a running editor would.
    pub async fn simulate(
        diagram: Diagram,
        config: &EditorConfig,
        ticks: usize,
        seed: Option<u64>,
    ) -> Result<(EditorState, Vec<SimulationTick>), SchemError> {
        let probes = simulation::probes(&diagram);
        let mut state = EditorState::with_config(diagram, config);
        state.apply(EditorEvent::StartSimulation);

        let source =
            MockSimulator::new(seed.or(config.simulation_seed)).with_step(config.simulation_period());
        let mut handle = SimulationDriver::spawn(source, probes, config.simulation_period());
        let mut collected = Vec::with_capacity(ticks);
        while collected.len() < ticks {
            let Some(tick) = handle.next_tick().await else {
                return Err(SchemError::Simulation(collected.len()));
            };
            state.apply(EditorEvent::SimulationTick { tick: tick.clone() });
            collected.push(tick);
        }
        handle.stop();
        Ok((state, collected))
    }
}
