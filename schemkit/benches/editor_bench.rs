use criterion::{black_box, criterion_group, criterion_main, Criterion};
use schemkit::netlist;
use schemkit::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn sensor_board() -> Diagram {
    SchemCore::load_diagram(&fixture_path("sensor_board.json")).unwrap_or_default()
}

fn bench_resolve_pins(c: &mut Criterion) {
    let diagram = sensor_board();
    c.bench_function("resolve_pins", |b| {
        b.iter(|| {
            for component in diagram.components() {
                black_box(resolve_pins(black_box(component)));
            }
        });
    });
}

fn bench_render(c: &mut Criterion) {
    let state = EditorState::with_diagram(sensor_board());
    let options = RenderOptions::default();
    c.bench_function("render_scene", |b| {
        b.iter(|| render(black_box(&state), black_box(&options)));
    });
    c.bench_function("render_svg", |b| {
        b.iter(|| schemkit::render::svg::to_svg(&render(black_box(&state), &options)));
    });
}

fn bench_drag(c: &mut Criterion) {
    c.bench_function("drag_100_moves", |b| {
        b.iter(|| {
            let mut state = EditorState::with_diagram(sensor_board());
            state.apply(EditorEvent::click(160.0, 110.0));
            state.apply(EditorEvent::pointer_down(160.0, 110.0));
            for i in 0..100 {
                state.apply(EditorEvent::pointer_move(160.0 + i as f64, 110.0));
            }
            state.apply(EditorEvent::PointerUp);
            state
        });
    });
}

fn bench_netlist(c: &mut Criterion) {
    let diagram = sensor_board();
    c.bench_function("netlist_extract", |b| {
        b.iter(|| netlist::extract(black_box(&diagram)));
    });
}

criterion_group!(benches, bench_resolve_pins, bench_render, bench_drag, bench_netlist);
criterion_main!(benches);
