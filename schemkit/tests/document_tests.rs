//! Document load/save tests against on-disk fixtures

use schemkit::catalog::ComponentKind;
use schemkit::diagram::{PinRef, PropValue};
use schemkit::document;
use schemkit::prelude::*;
use std::path::PathBuf;
use tempfile::TempDir;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn test_three_part_round_trip() {
    let original = SchemCore::load_diagram(&fixture_path("three_parts.json")).expect("fixture loads");
    assert_eq!(original.components().len(), 3);
    assert_eq!(original.wires().len(), 2);

    let pin_counts: Vec<usize> = original.components().iter().map(|c| c.pins.len()).collect();
    assert_eq!(pin_counts, vec![2, 5, 1]);

    let text = document::serialize(&original).unwrap();
    let reloaded = document::deserialize(&text).unwrap();
    assert_eq!(reloaded, original);

    // field-for-field, including optional ones
    let relay = reloaded.component(2).unwrap();
    assert_eq!(relay.rotation, 90);
    assert_eq!(relay.label, "K1");
    let ground = reloaded.component(3).unwrap();
    assert_eq!(ground.voltage, Some(PropValue::Number(0.0)));
    assert_eq!(reloaded.wire(2).unwrap().color.as_deref(), Some("#111827"));
    assert_eq!(reloaded.wire(1).unwrap().to, PinRef::new(2, "coil+"));
}

#[test]
fn test_serialized_text_matches_fixture() {
    let text = std::fs::read_to_string(fixture_path("three_parts.json")).unwrap();
    let diagram = document::deserialize(&text).unwrap();
    let expected: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(document::to_value(&diagram).unwrap(), expected);
}

#[test]
fn test_save_then_load_via_files() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("copy.json");
    let original = SchemCore::load_diagram(&fixture_path("three_parts.json")).unwrap();

    SchemCore::save_diagram(&path, &original).unwrap();
    let reloaded = SchemCore::load_diagram(&path).unwrap();
    assert_eq!(reloaded, original);
}

#[test]
fn test_non_array_components_load_empty() {
    let diagram = SchemCore::load_diagram(&fixture_path("not_an_array.json"))
        .expect("wrong shapes are not an error");
    assert!(diagram.components().is_empty());
    assert!(diagram.wires().is_empty());
}

#[test]
fn test_dangling_references_survive_load() {
    let diagram = SchemCore::load_diagram(&fixture_path("dangling_pin.json")).unwrap();

    assert_eq!(diagram.components().len(), 3);
    assert!(matches!(diagram.component(9).unwrap().kind, ComponentKind::Custom(ref t) if t == "flux_capacitor"));

    // wire 4 names a component that does not exist and is dropped
    let ids: Vec<u64> = diagram.wires().iter().map(|w| w.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    let dangling: Vec<u64> = diagram.dangling_wires().iter().map(|w| w.id).collect();
    assert_eq!(dangling, vec![2, 3]);

    let stats = diagram.stats();
    assert_eq!(stats.pin_count, 4);
    assert_eq!(stats.dangling_wire_count, 2);
}

#[test]
fn test_custom_type_round_trips() {
    let diagram = SchemCore::load_diagram(&fixture_path("dangling_pin.json")).unwrap();
    let value = document::to_value(&diagram).unwrap();
    assert_eq!(value["components"][2]["type"], "flux_capacitor");
}

#[test]
fn test_new_ids_follow_loaded_ones() {
    let mut diagram = SchemCore::load_diagram(&fixture_path("dangling_pin.json")).unwrap();
    let id = diagram.add_component(ComponentKind::Ground, 0.0, 200.0).unwrap();
    assert!(id > 9);
}

#[test]
fn test_out_of_range_values_load_without_panicking() {
    let diagram = SchemCore::load_diagram(&fixture_path("odd_values.json")).expect("fixture loads");

    let ids: Vec<u64> = diagram.components().iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![1, 2, 5, 6]);
    let rotations: Vec<u16> = diagram.components().iter().map(|c| c.rotation).collect();
    assert_eq!(rotations, vec![90, 270, 0, 90]);

    let wire_ids: Vec<u64> = diagram.wires().iter().map(|w| w.id).collect();
    assert_eq!(wire_ids, vec![1]);

    // counters stay usable after the rejected entries
    let mut state = EditorState::with_diagram(diagram);
    assert_eq!(
        state.apply(EditorEvent::add(ComponentKind::Ground, 0.0, 500.0)),
        Effect::ComponentAdded(7)
    );
    state.apply(EditorEvent::click(310.0, 310.0));
    state.apply(EditorEvent::Rotate);
    assert_eq!(state.diagram().component(6).unwrap().rotation, 180);

    let text = document::serialize(state.diagram()).unwrap();
    assert_eq!(document::deserialize(&text).unwrap(), *state.diagram());
}
