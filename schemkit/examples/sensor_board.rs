//! Example: build a small sensor board through editor events, then save it,
//! export an SVG and print its nets.
//! Run with: cargo run --example sensor_board [out_dir]

use schemkit::netlist;
use schemkit::prelude::*;
use std::path::PathBuf;

fn main() -> Result<(), SchemError> {
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(std::env::temp_dir);

    let mut editor = EditorState::new();
    editor.apply(EditorEvent::add(ComponentKind::Esp32, 400.0, 40.0));
    editor.apply(EditorEvent::add(ComponentKind::Zmpt101b, 120.0, 80.0));
    editor.apply(EditorEvent::add(ComponentKind::Ground, 160.0, 260.0));

    // ZMPT101B OUT -> GPIO34, GND -> ground symbol
    let links = [((120.0, 135.0), (400.0, 140.0)), ((120.0, 115.0), (180.0, 260.0))];
    for (from, to) in links {
        editor.apply(EditorEvent::ToggleWiring);
        editor.apply(EditorEvent::click(from.0, from.1));
        editor.apply(EditorEvent::click(to.0, to.1));
    }

    let doc_path = out_dir.join("sensor_board.json");
    SchemCore::save_diagram(&doc_path, editor.diagram())?;
    println!("Saved {}", doc_path.display());

    let svg_path = out_dir.join("sensor_board.svg");
    let scene = render(&editor, &RenderOptions::default());
    std::fs::write(&svg_path, schemkit::render::svg::to_svg(&scene))?;
    println!("Rendered {}", svg_path.display());

    for net in netlist::extract(editor.diagram()).nets {
        let pins: Vec<String> = net.pins.iter().map(|p| p.to_string()).collect();
        println!("{:>4}: {}", net.name, pins.join(", "));
    }
    Ok(())
}
