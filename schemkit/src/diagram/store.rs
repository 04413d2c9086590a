//! Diagram graph store
//!
//! The store holds the authoritative component and wire lists. Components
//! keep insertion order, which is also draw order: the last component is
//! drawn last and is therefore visually on top.
//!
//! Invariants upheld by every mutation:
//! - component ids are unique among live components
//! - wire ids are unique among live wires
//! - every live wire references live components on both ends

use thiserror::Error;
use tracing::{debug, warn};

use crate::catalog::ComponentKind;
use crate::symbols::ResolvedPin;

use super::model::{Component, ComponentId, ComponentPatch, PinRef, Wire, WireId};

/// Why a prebuilt record was not inserted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum InsertError {
    #[error("id {0} is already in use")]
    DuplicateId(u64),
    #[error("id {0} leaves no room for later ids")]
    IdOutOfRange(u64),
    #[error("component {0} does not exist")]
    MissingComponent(ComponentId),
}

#[derive(Debug, Clone)]
pub struct Diagram {
    components: Vec<Component>,
    wires: Vec<Wire>,
    next_component_id: ComponentId,
    next_wire_id: WireId,
}

impl Diagram {
    pub fn new() -> Self {
        Self {
            components: Vec::new(),
            wires: Vec::new(),
            next_component_id: 1,
            next_wire_id: 1,
        }
    }

    /// `None` once the id space is used up
    fn allocate_component_id(&mut self) -> Option<ComponentId> {
        let id = self.next_component_id;
        self.next_component_id = id.checked_add(1)?;
        Some(id)
    }

    fn allocate_wire_id(&mut self) -> Option<WireId> {
        let id = self.next_wire_id;
        self.next_wire_id = id.checked_add(1)?;
        Some(id)
    }

    /// Place a catalog symbol with its top-left corner at `(x, y)`.
    ///
    /// Kinds without a catalog entry are ignored and return `None`.
    pub fn add_component(&mut self, kind: ComponentKind, x: f64, y: f64) -> Option<ComponentId> {
        if kind.entry().is_none() {
            debug!("Ignoring placement of uncatalogued type '{}'", kind);
            return None;
        }
        let Some(id) = self.allocate_component_id() else {
            warn!("Component id space exhausted, ignoring placement");
            return None;
        };
        let component = Component::from_catalog(id, kind, x, y)?;
        debug!("Added component {} ({}) at ({}, {})", id, component.kind, x, y);
        self.components.push(component);
        Some(id)
    }

    /// Insert an already-built component, keeping its id.
    ///
    /// The store is left untouched if the id is taken, or if it is the
    /// largest representable id (nothing could be allocated after it).
    pub fn insert_component(&mut self, component: Component) -> Result<(), InsertError> {
        if self.component(component.id).is_some() {
            return Err(InsertError::DuplicateId(component.id));
        }
        let next = component
            .id
            .checked_add(1)
            .ok_or(InsertError::IdOutOfRange(component.id))?;
        self.next_component_id = self.next_component_id.max(next);
        self.components.push(component);
        Ok(())
    }

    /// Insert an already-built wire, keeping its id.
    ///
    /// Rejected when the id is taken or out of range, or either end names a
    /// missing component. Pin ids are not checked here; a wire whose pin no
    /// longer resolves is kept and simply not drawn.
    pub fn insert_wire(&mut self, wire: Wire) -> Result<(), InsertError> {
        if self.wires.iter().any(|w| w.id == wire.id) {
            return Err(InsertError::DuplicateId(wire.id));
        }
        for end in [&wire.from, &wire.to] {
            if self.component(end.component_id).is_none() {
                return Err(InsertError::MissingComponent(end.component_id));
            }
        }
        let next = wire
            .id
            .checked_add(1)
            .ok_or(InsertError::IdOutOfRange(wire.id))?;
        self.next_wire_id = self.next_wire_id.max(next);
        self.wires.push(wire);
        Ok(())
    }

    /// Remove a component and every wire attached to it
    pub fn remove_component(&mut self, id: ComponentId) -> Option<Component> {
        let index = self.components.iter().position(|c| c.id == id)?;
        let removed_wires = self.remove_wires_for(id);
        let component = self.components.remove(index);
        debug!("Removed component {} and {} wire(s)", id, removed_wires);
        Some(component)
    }

    /// Apply a partial update. Returns `false` for unknown ids.
    pub fn update_component(&mut self, id: ComponentId, patch: &ComponentPatch) -> bool {
        match self.component_mut(id) {
            Some(component) => {
                component.apply(patch);
                true
            }
            None => false,
        }
    }

    /// Connect two pins.
    ///
    /// Both ends must resolve to a real pin right now; otherwise the attempt
    /// is dropped and `None` is returned. Connecting a pin to itself is
    /// dropped as well.
    pub fn add_wire(&mut self, from: PinRef, to: PinRef) -> Option<WireId> {
        if from == to {
            debug!("Dropping wire from {} to itself", from);
            return None;
        }
        if self.resolve_pin(&from).is_none() || self.resolve_pin(&to).is_none() {
            debug!("Dropping wire {} -> {}: endpoint does not resolve", from, to);
            return None;
        }
        let Some(id) = self.allocate_wire_id() else {
            warn!("Wire id space exhausted, dropping wire {} -> {}", from, to);
            return None;
        };
        debug!("Added wire {}: {} -> {}", id, from, to);
        self.wires.push(Wire {
            id,
            from,
            to,
            color: None,
        });
        Some(id)
    }

    pub fn remove_wire(&mut self, id: WireId) -> Option<Wire> {
        let index = self.wires.iter().position(|w| w.id == id)?;
        Some(self.wires.remove(index))
    }

    /// Remove every wire with at least one end on `component_id`
    pub fn remove_wires_for(&mut self, component_id: ComponentId) -> usize {
        let before = self.wires.len();
        self.wires.retain(|w| !w.touches(component_id));
        before - self.wires.len()
    }

    /// Remove everything. Id counters keep running so ids are never reused
    /// within a session.
    pub fn clear(&mut self) {
        self.components.clear();
        self.wires.clear();
    }

    pub fn component(&self, id: ComponentId) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn component_mut(&mut self, id: ComponentId) -> Option<&mut Component> {
        self.components.iter_mut().find(|c| c.id == id)
    }

    /// Components in insertion (draw) order
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    pub fn wire(&self, id: WireId) -> Option<&Wire> {
        self.wires.iter().find(|w| w.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.wires.is_empty()
    }

    /// Position a pin reference, `None` if the component or pin is gone
    pub fn resolve_pin(&self, pin: &PinRef) -> Option<ResolvedPin> {
        self.component(pin.component_id)?.resolve_pin(&pin.pin_id)
    }

    /// Both ends of a wire, `None` if either fails to resolve
    pub fn resolve_wire(&self, wire: &Wire) -> Option<(ResolvedPin, ResolvedPin)> {
        Some((self.resolve_pin(&wire.from)?, self.resolve_pin(&wire.to)?))
    }

    /// Wires that currently fail to resolve at one or both ends
    pub fn dangling_wires(&self) -> Vec<&Wire> {
        self.wires
            .iter()
            .filter(|w| self.resolve_wire(w).is_none())
            .collect()
    }

    pub fn stats(&self) -> DiagramStats {
        DiagramStats {
            component_count: self.components.len(),
            wire_count: self.wires.len(),
            pin_count: self.components.iter().map(|c| c.resolved_pins().len()).sum(),
            dangling_wire_count: self.dangling_wires().len(),
        }
    }
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

/// Two diagrams are equal when their component and wire lists are equal.
/// Id counters are bookkeeping and do not take part.
impl PartialEq for Diagram {
    fn eq(&self, other: &Self) -> bool {
        self.components == other.components && self.wires == other.wires
    }
}

/// Summary counts for a diagram
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct DiagramStats {
    pub component_count: usize,
    pub wire_count: usize,
    pub pin_count: usize,
    pub dangling_wire_count: usize,
}
