//! End-to-end interaction tests

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use schemkit::catalog::ComponentKind;
use schemkit::editor::{replay, Mode};
use schemkit::geometry::Point;
use schemkit::prelude::*;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn anchored(diagram: &Diagram) -> bool {
    diagram.wires().iter().all(|w| {
        diagram.component(w.from.component_id).is_some() && diagram.component(w.to.component_id).is_some()
    })
}

#[test]
fn test_scripted_session() {
    let text = std::fs::read_to_string(fixture_path("wire_script.json")).unwrap();
    let events = SchemCore::parse_script(&text).expect("script decodes");
    let state = SchemCore::replay(Diagram::new(), events);

    let diagram = state.diagram();
    assert_eq!(diagram.components().len(), 2);
    assert_eq!(diagram.wires().len(), 1);

    let resistor = &diagram.components()[1];
    assert_eq!(resistor.position(), Point::new(180.0, 80.0));
    assert_eq!(resistor.value.as_ref().map(|v| v.to_string()).as_deref(), Some("330"));
    assert_eq!(*state.mode(), Mode::Idle);

    // the wire still resolves after the drag: pins follow the component
    let (_, end) = diagram.resolve_wire(&diagram.wires()[0]).unwrap();
    assert_eq!(end.position(), Point::new(180.0, 95.0));
}

#[test]
fn test_random_edits_keep_wires_anchored() {
    let mut rng = StdRng::seed_from_u64(2024);
    let kinds = ComponentKind::CATALOG;
    let mut state = EditorState::new();
    let mut wires_added = 0;

    for step in 0..400 {
        let event = match rng.random_range(0..6) {
            0 | 1 => {
                let kind = kinds[rng.random_range(0..kinds.len())].clone();
                EditorEvent::add(kind, rng.random_range(0.0..800.0), rng.random_range(0.0..600.0))
            }
            2 => EditorEvent::ToggleWiring,
            3 => {
                // aim at a real pin most of the time
                let pins: Vec<Point> = state
                    .diagram()
                    .components()
                    .iter()
                    .flat_map(|c| c.resolved_pins())
                    .map(|p| p.position())
                    .collect();
                if pins.is_empty() {
                    EditorEvent::click(0.0, 0.0)
                } else {
                    let p = pins[rng.random_range(0..pins.len())];
                    EditorEvent::click(p.x, p.y)
                }
            }
            4 => EditorEvent::Delete,
            _ => EditorEvent::click(rng.random_range(0.0..800.0), rng.random_range(0.0..600.0)),
        };
        if let Effect::WireAdded(_) = state.apply(event) {
            wires_added += 1;
        }
        assert!(anchored(state.diagram()), "orphan wire after step {}", step);
    }
    assert!(wires_added > 0);
}

#[test]
fn test_delete_removes_exactly_attached_wires() {
    let mut state = EditorState::new();
    state.apply(EditorEvent::add(ComponentKind::Battery, 0.0, 0.0));
    state.apply(EditorEvent::add(ComponentKind::Resistor, 100.0, 0.0));
    state.apply(EditorEvent::add(ComponentKind::Led, 300.0, 0.0));

    let wire = |state: &mut EditorState, a: (f64, f64), b: (f64, f64)| {
        state.apply(EditorEvent::ToggleWiring);
        state.apply(EditorEvent::click(a.0, a.1));
        state.apply(EditorEvent::click(b.0, b.1));
    };
    wire(&mut state, (20.0, 0.0), (100.0, 15.0));
    wire(&mut state, (180.0, 15.0), (320.0, 0.0));
    wire(&mut state, (20.0, 70.0), (320.0, 60.0));
    assert_eq!(state.diagram().wires().len(), 3);

    // select and delete the resistor
    state.apply(EditorEvent::click(140.0, 15.0));
    state.apply(EditorEvent::Delete);

    let remaining: Vec<u64> = state.diagram().wires().iter().map(|w| w.id).collect();
    assert_eq!(remaining, vec![3]);
    assert_eq!(state.diagram().components().len(), 2);
}

#[test]
fn test_failed_load_event_keeps_diagram() {
    let mut state = EditorState::new();
    state.apply(EditorEvent::add(ComponentKind::Acs712, 0.0, 0.0));
    state.apply(EditorEvent::add(ComponentKind::Zmpt101b, 200.0, 0.0));

    let effect = state.apply(EditorEvent::Load {
        text: "<<not json>>".to_string(),
    });
    assert!(matches!(effect, Effect::Notice(_)));
    assert_eq!(state.diagram().components().len(), 2);
    assert!(state.notice().unwrap().contains("Could not load"));

    let good = std::fs::read_to_string(fixture_path("three_parts.json")).unwrap();
    assert_eq!(state.apply(EditorEvent::Load { text: good }), Effect::Loaded);
    assert_eq!(state.diagram().components().len(), 3);
    assert!(state.notice().is_none());
}

#[test]
fn test_replay_twice_gives_same_diagram() {
    let text = std::fs::read_to_string(fixture_path("wire_script.json")).unwrap();
    let events = SchemCore::parse_script(&text).unwrap();
    let a = replay(EditorState::new(), events.clone());
    let b = replay(EditorState::new(), events);
    assert_eq!(a.diagram(), b.diagram());
}
