//! Netlist extraction
//!
//! Folds wires into electrical nets. Every wired pin becomes a node in an
//! undirected petgraph graph and every drawable wire an edge; each connected
//! component is one net. Pins of ground symbols are tied together, so all
//! ground-connected pins end up in the single `GND` net.

use std::collections::HashMap;

use petgraph::graph::{NodeIndex, UnGraph};
use petgraph::visit::Bfs;
use serde::Serialize;
use tracing::debug;

use crate::catalog::ComponentKind;
use crate::diagram::{Diagram, PinRef, WireId};

pub const GROUND_NET: &str = "GND";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Net {
    pub name: String,
    /// Pins in first-appearance order
    pub pins: Vec<PinRef>,
}

impl Net {
    pub fn is_ground(&self) -> bool {
        self.name == GROUND_NET
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Netlist {
    pub nets: Vec<Net>,
}

impl Netlist {
    pub fn len(&self) -> usize {
        self.nets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nets.is_empty()
    }

    pub fn net(&self, name: &str) -> Option<&Net> {
        self.nets.iter().find(|n| n.name == name)
    }

    /// The net a pin belongs to. Unwired pins belong to none.
    pub fn net_of(&self, pin: &PinRef) -> Option<&Net> {
        self.nets.iter().find(|n| n.pins.contains(pin))
    }
}

/// Edge weight: the wire, or `None` for an implicit ground tie
type PinGraph = UnGraph<PinRef, Option<WireId>>;

pub fn extract(diagram: &Diagram) -> Netlist {
    let mut graph = PinGraph::default();
    let mut indices: HashMap<PinRef, NodeIndex> = HashMap::new();

    for wire in diagram.wires() {
        if diagram.resolve_wire(wire).is_none() {
            debug!("Skipping unresolvable wire {}", wire.id);
            continue;
        }
        let a = pin_node(&mut graph, &mut indices, &wire.from);
        let b = pin_node(&mut graph, &mut indices, &wire.to);
        graph.add_edge(a, b, Some(wire.id));
    }

    let grounds: Vec<NodeIndex> = graph
        .node_indices()
        .filter(|&n| is_ground_pin(diagram, &graph[n]))
        .collect();
    for pair in grounds.windows(2) {
        graph.add_edge(pair[0], pair[1], None);
    }

    let mut visited = vec![false; graph.node_count()];
    let mut nets = Vec::new();
    let mut counter = 0;

    // node indices follow first appearance, so walking them in order keeps
    // both net numbering and pin order stable
    for start in graph.node_indices() {
        if visited[start.index()] {
            continue;
        }
        let mut members = Vec::new();
        let mut bfs = Bfs::new(&graph, start);
        while let Some(n) = bfs.next(&graph) {
            visited[n.index()] = true;
            members.push(n);
        }
        members.sort();

        let name = if members.iter().any(|n| grounds.contains(n)) {
            GROUND_NET.to_string()
        } else {
            counter += 1;
            format!("N{}", counter)
        };
        nets.push(Net {
            name,
            pins: members.into_iter().map(|n| graph[n].clone()).collect(),
        });
    }

    debug!("Extracted {} nets from {} wires", nets.len(), diagram.wires().len());
    Netlist { nets }
}

fn pin_node(graph: &mut PinGraph, indices: &mut HashMap<PinRef, NodeIndex>, pin: &PinRef) -> NodeIndex {
    *indices
        .entry(pin.clone())
        .or_insert_with(|| graph.add_node(pin.clone()))
}

fn is_ground_pin(diagram: &Diagram, pin: &PinRef) -> bool {
    diagram
        .component(pin.component_id)
        .is_some_and(|c| c.kind == ComponentKind::Ground)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// battery -> resistor -> led -> ground, battery- -> ground
    fn led_loop() -> (Diagram, [u64; 5]) {
        let mut d = Diagram::new();
        let bat = d.add_component(ComponentKind::Battery, 0.0, 0.0).unwrap();
        let r = d.add_component(ComponentKind::Resistor, 100.0, 0.0).unwrap();
        let led = d.add_component(ComponentKind::Led, 250.0, 0.0).unwrap();
        let g1 = d.add_component(ComponentKind::Ground, 250.0, 120.0).unwrap();
        let g2 = d.add_component(ComponentKind::Ground, 0.0, 120.0).unwrap();
        d.add_wire(PinRef::new(bat, "+"), PinRef::new(r, "1")).unwrap();
        d.add_wire(PinRef::new(r, "2"), PinRef::new(led, "anode")).unwrap();
        d.add_wire(PinRef::new(led, "cathode"), PinRef::new(g1, "gnd")).unwrap();
        d.add_wire(PinRef::new(bat, "-"), PinRef::new(g2, "gnd")).unwrap();
        (d, [bat, r, led, g1, g2])
    }

    #[test]
    fn test_nets_from_led_loop() {
        let (d, [bat, r, led, g1, g2]) = led_loop();
        let netlist = extract(&d);
        let names: Vec<&str> = netlist.nets.iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, vec!["N1", "N2", "GND"]);

        assert_eq!(
            netlist.net("N1").unwrap().pins,
            vec![PinRef::new(bat, "+"), PinRef::new(r, "1")]
        );
        let gnd = netlist.net(GROUND_NET).unwrap();
        assert!(gnd.is_ground());
        assert_eq!(gnd.pins.len(), 4);
        assert!(gnd.pins.contains(&PinRef::new(bat, "-")));
        assert!(gnd.pins.contains(&PinRef::new(g1, "gnd")));
        assert!(gnd.pins.contains(&PinRef::new(g2, "gnd")));
        assert_eq!(netlist.net_of(&PinRef::new(led, "anode")).unwrap().name, "N2");
    }

    #[test]
    fn test_unwired_pins_form_no_net() {
        let mut d = Diagram::new();
        d.add_component(ComponentKind::Relay, 0.0, 0.0).unwrap();
        let netlist = extract(&d);
        assert!(netlist.is_empty());
    }

    #[test]
    fn test_chained_wires_merge() {
        let mut d = Diagram::new();
        let a = d.add_component(ComponentKind::Resistor, 0.0, 0.0).unwrap();
        let b = d.add_component(ComponentKind::Resistor, 100.0, 0.0).unwrap();
        let c = d.add_component(ComponentKind::Capacitor, 200.0, 0.0).unwrap();
        d.add_wire(PinRef::new(a, "2"), PinRef::new(b, "1")).unwrap();
        d.add_wire(PinRef::new(c, "1"), PinRef::new(b, "1")).unwrap();
        let netlist = extract(&d);
        assert_eq!(netlist.len(), 1);
        assert_eq!(netlist.nets[0].name, "N1");
        assert_eq!(netlist.nets[0].pins.len(), 3);
    }

    #[test]
    fn test_dangling_wire_ignored() {
        let (mut d, [bat, ..]) = led_loop();
        let mut broken = d.components()[0].clone();
        broken.id = 99;
        broken.kind = ComponentKind::Custom("mystery".into());
        d.insert_component(broken).unwrap();
        d.insert_wire(crate::diagram::Wire {
            id: 500,
            from: PinRef::new(99, "x"),
            to: PinRef::new(bat, "+"),
            color: None,
        })
        .unwrap();
        let netlist = extract(&d);
        assert!(netlist.net_of(&PinRef::new(99, "x")).is_none());
        assert_eq!(netlist.len(), 3);
    }
}
