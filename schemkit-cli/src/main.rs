//! Schemkit CLI - edit, render and inspect schematic diagrams from the command line.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use schemkit::catalog::ComponentKind;
use schemkit::{netlist, simulation};
use schemkit::render::panel::PropertySheet;
use schemkit::{Diagram, EditorConfig, EditorState, RenderRequest, SchemCore};
use std::path::{Path, PathBuf};
use std::process;
use tracing::Level;

#[derive(Parser)]
#[command(name = "schemkit")]
#[command(about = "Schematic diagram editing, rendering and inspection tool", long_about = None)]
#[command(version)]
struct Cli {
    /// Editor config file (JSON)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Debug logging on stderr; `catalog` also lists pins
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the placeable component types
    Catalog,

    /// Add a component to a diagram document (created if missing)
    Place {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Component type tag, e.g. resistor or esp32
        #[arg(value_name = "TYPE")]
        kind: String,

        #[arg(long, allow_hyphen_values = true)]
        x: f64,

        #[arg(long, allow_hyphen_values = true)]
        y: f64,
    },

    /// Apply a JSON array of editor events to a diagram
    Replay {
        /// Diagram document (an empty diagram is used if it does not exist)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Event script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Write the result here instead of back to FILE
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,
    },

    /// Render a diagram to SVG
    Render {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output file (stdout if omitted)
        #[arg(short, long, value_name = "OUT")]
        output: Option<PathBuf>,

        /// Do not draw the grid
        #[arg(long)]
        no_grid: bool,

        /// Render with this component selected
        #[arg(long, value_name = "ID")]
        select: Option<u64>,
    },

    /// Show counts, components and dangling wire references
    Info {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// List electrical nets
    Netlist {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Run the mock measurement feed and print meter readings
    Simulate {
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Number of timer ticks to collect
        #[arg(short, long, default_value_t = 5)]
        ticks: usize,

        /// RNG seed (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Also write a per-timestamp sensor log (JSON) here
        #[arg(long, value_name = "LOG")]
        log: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Catalog => {
            handle_catalog(cli.verbose);
            Ok(())
        }
        Commands::Place { file, kind, x, y } => handle_place(&file, &kind, x, y),
        Commands::Replay {
            file,
            script,
            output,
        } => handle_replay(&file, &script, output.as_deref()),
        Commands::Render {
            file,
            output,
            no_grid,
            select,
        } => handle_render(&file, output.as_deref(), no_grid, select, &config),
        Commands::Info { file, format } => handle_info(&file, format),
        Commands::Netlist { file, format } => handle_netlist(&file, format),
        Commands::Simulate {
            file,
            ticks,
            seed,
            log,
            format,
        } => handle_simulate(&file, ticks, seed, log.as_deref(), format, &config),
    };

    let exit_code = match result {
        Ok(()) => 0,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: Option<&Path>) -> Result<EditorConfig> {
    match path {
        Some(path) => EditorConfig::from_file(path)
            .with_context(|| format!("Failed to read config {}", path.display())),
        None => Ok(EditorConfig::default()),
    }
}

fn load(file: &Path) -> Result<Diagram> {
    SchemCore::load_diagram(file).with_context(|| format!("Failed to load {}", file.display()))
}

fn handle_catalog(verbose: bool) {
    println!("Available component types:\n");
    for kind in ComponentKind::CATALOG.iter() {
        let Some(entry) = kind.entry() else {
            continue;
        };
        println!(
            "  {:<12} {:<18} {:>4}x{:<4} {} pins",
            kind.tag(),
            entry.label,
            entry.width,
            entry.height,
            entry.pin_count()
        );
        if verbose {
            let pins: Vec<String> = entry
                .pin_descriptors()
                .into_iter()
                .map(|p| match p.label {
                    Some(label) if label != p.id => format!("{} ({})", p.id, label),
                    _ => p.id,
                })
                .collect();
            println!("      {}", pins.join(", "));
        }
    }
}

fn handle_place(file: &Path, kind: &str, x: f64, y: f64) -> Result<()> {
    let id = SchemCore::place(file, kind, x, y)
        .with_context(|| format!("Failed to place {} in {}", kind, file.display()))?;
    println!("Placed {} #{} at ({}, {}) in {}", kind, id, x, y, file.display());
    Ok(())
}

fn handle_replay(file: &Path, script: &Path, output: Option<&Path>) -> Result<()> {
    let diagram = SchemCore::load_or_new(file)
        .with_context(|| format!("Failed to load {}", file.display()))?;
    let text = std::fs::read_to_string(script)
        .with_context(|| format!("Failed to read script {}", script.display()))?;
    let events = SchemCore::parse_script(&text)
        .with_context(|| format!("Invalid event script {}", script.display()))?;
    let count = events.len();

    let state = SchemCore::replay(diagram, events);
    if let Some(notice) = state.notice() {
        eprintln!("Warning: {}", notice);
    }

    let target = output.unwrap_or(file);
    SchemCore::save_diagram(target, state.diagram())
        .with_context(|| format!("Failed to save {}", target.display()))?;
    println!(
        "Applied {} events: {} components, {} wires -> {}",
        count,
        state.diagram().components().len(),
        state.diagram().wires().len(),
        target.display()
    );
    Ok(())
}

fn handle_render(
    file: &Path,
    output: Option<&Path>,
    no_grid: bool,
    select: Option<u64>,
    config: &EditorConfig,
) -> Result<()> {
    let diagram = load(file)?;
    let request = RenderRequest {
        hide_grid: no_grid,
        select,
    };
    let svg = SchemCore::render_svg(diagram, config, &request);
    match output {
        Some(path) => {
            std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Rendered {}", path.display());
        }
        None => print!("{}", svg),
    }
    Ok(())
}

fn handle_info(file: &Path, format: OutputFormat) -> Result<()> {
    let diagram = load(file)?;
    let stats = diagram.stats();
    let dangling = diagram.dangling_wires();
    let state = EditorState::with_diagram(diagram.clone());
    let sheets: Vec<PropertySheet> = diagram
        .components()
        .iter()
        .map(|c| PropertySheet::for_component(&state, c))
        .collect();

    match format {
        OutputFormat::Human => {
            println!("\nFile: {}", file.display());
            println!("{}", "─".repeat(60));
            println!("  Components: {}", stats.component_count);
            println!("  Wires:      {}", stats.wire_count);
            println!("  Pins:       {}", stats.pin_count);
            println!("  Dangling:   {}", stats.dangling_wire_count);

            if !sheets.is_empty() {
                println!("\n  COMPONENTS:");
                for sheet in &sheets {
                    let line: Vec<String> = sheet
                        .rows()
                        .into_iter()
                        .skip(1)
                        .map(|(name, value)| format!("{}={}", name, value))
                        .collect();
                    println!("    #{} {}", sheet.id, line.join(" "));
                }
            }
            if !dangling.is_empty() {
                println!("\n  DANGLING WIRES:");
                for wire in &dangling {
                    println!("    - wire {}: {} -> {}", wire.id, wire.from, wire.to);
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "stats": stats,
                "components": sheets,
                "dangling_wires": dangling,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}

fn handle_netlist(file: &Path, format: OutputFormat) -> Result<()> {
    let diagram = load(file)?;
    let nets = netlist::extract(&diagram);

    match format {
        OutputFormat::Human => {
            if nets.is_empty() {
                println!("No connected pins");
            }
            for net in &nets.nets {
                let pins: Vec<String> = net.pins.iter().map(|p| p.to_string()).collect();
                println!("{}: {}", net.name, pins.join(", "));
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&nets)?),
    }
    Ok(())
}

fn handle_simulate(
    file: &Path,
    ticks: usize,
    seed: Option<u64>,
    log: Option<&Path>,
    format: OutputFormat,
    config: &EditorConfig,
) -> Result<()> {
    let diagram = load(file)?;
    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    let (state, collected) = runtime
        .block_on(SchemCore::simulate(diagram, config, ticks, seed))
        .context("Simulation failed")?;

    if let Some(path) = log {
        let rows = simulation::sensor_log(state.diagram(), &collected, config.simulation_period());
        std::fs::write(path, serde_json::to_string_pretty(&rows)?)
            .with_context(|| format!("Failed to write {}", path.display()))?;
    }

    match format {
        OutputFormat::Human => {
            for (i, tick) in collected.iter().enumerate() {
                println!(
                    "tick {:>3}: {:.2} V  {:.1} mA  {:.3} W",
                    i + 1,
                    tick.readings.voltage,
                    tick.readings.current * 1000.0,
                    tick.readings.power
                );
                for (id, text) in &tick.measurements {
                    let component = state.diagram().component(*id);
                    let label = component.map(|c| c.label.as_str()).unwrap_or("?");
                    match component.and_then(|c| simulation::adc_channel(&c.kind)) {
                        Some(channel) => println!("    #{} {} [{}]: {}", id, label, channel, text),
                        None => println!("    #{} {}: {}", id, label, text),
                    }
                }
            }
        }
        OutputFormat::Json => {
            let output = serde_json::json!({
                "file": file.display().to_string(),
                "ticks": collected,
                "final": state.measurements(),
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }
    Ok(())
}
