//! Common test utilities for building synthetic catalogs.

use std::sync::Arc;

use starroute_lib::catalog::{
    Catalog, CatalogDocument, FactionId, FactionRecord, JumpPointKind, JumpPointRecord,
    JumpPointSize, SystemId, SystemRecord, SystemSize, SystemStatus,
};
use starroute_lib::CostModel;

/// Builder for small synthetic catalogs used across integration tests.
#[allow(dead_code)]
pub struct CatalogBuilder {
    factions: Vec<FactionRecord>,
    systems: Vec<SystemRecord>,
}

#[allow(dead_code)]
impl CatalogBuilder {
    pub fn new() -> Self {
        Self {
            factions: Vec::new(),
            systems: Vec::new(),
        }
    }

    /// Register a faction; `outlaw` marks the universally-hostile designation.
    pub fn faction(mut self, id: FactionId, name: &str, outlaw: bool) -> Self {
        self.factions.push(FactionRecord {
            id,
            name: name.to_string(),
            color: None,
            parent_faction: None,
            outlaw,
        });
        self
    }

    /// Register an unclaimed system at the given position.
    pub fn system(mut self, id: SystemId, name: &str, position: [f64; 3]) -> Self {
        self.systems.push(SystemRecord {
            id,
            name: name.to_string(),
            uuid: None,
            nickname: None,
            coordinates: position,
            faction: None,
            size: SystemSize::Medium,
            status: SystemStatus::Surveyed,
            is_off_limits: false,
            jump_points: Vec::new(),
        });
        self
    }

    /// Register a system claimed by `faction`.
    pub fn owned_system(
        self,
        id: SystemId,
        name: &str,
        position: [f64; 3],
        faction: FactionId,
    ) -> Self {
        let mut builder = self.system(id, name, position);
        if let Some(record) = builder.systems.last_mut() {
            record.faction = Some(faction);
        }
        builder
    }

    /// Mark a previously registered system as off-limits.
    pub fn off_limits(mut self, id: SystemId) -> Self {
        if let Some(record) = self.systems.iter_mut().find(|record| record.id == id) {
            record.is_off_limits = true;
        }
        self
    }

    /// Mark a previously registered system as unexplored.
    pub fn unknown_status(mut self, id: SystemId) -> Self {
        if let Some(record) = self.systems.iter_mut().find(|record| record.id == id) {
            record.status = SystemStatus::Unknown;
        }
        self
    }

    /// Add a confirmed directed jump point.
    pub fn link(self, from: SystemId, to: SystemId) -> Self {
        self.link_kind(from, to, JumpPointKind::Confirmed)
    }

    /// Add confirmed jump points in both directions.
    pub fn link_both(self, a: SystemId, b: SystemId) -> Self {
        self.link(a, b).link(b, a)
    }

    /// Add a directed jump point with an explicit classification.
    pub fn link_kind(mut self, from: SystemId, to: SystemId, kind: JumpPointKind) -> Self {
        if let Some(record) = self.systems.iter_mut().find(|record| record.id == from) {
            record.jump_points.push(JumpPointRecord {
                name: None,
                destination: to,
                kind,
                size: JumpPointSize::Medium,
                entry_au: None,
            });
        }
        self
    }

    pub fn build(self) -> Arc<Catalog> {
        let document = CatalogDocument {
            factions: self.factions,
            systems: self.systems,
        };
        Arc::new(Catalog::from_document(document).expect("synthetic catalog resolves"))
    }
}

/// Cost model where an edge costs exactly its length in light years: no
/// in-system transit time and a 1:1 jump scale. Keeps expected path costs
/// easy to state in tests.
#[allow(dead_code)]
pub fn unit_costs() -> CostModel {
    CostModel {
        seconds_per_au: 0.0,
        jump_seconds_per_ly: 1.0,
        first_hop_entry_au: 0.35,
        interchange_au: 0.7,
        hostile_penalty: 15.0,
    }
}

/// A straight-line catalog `1 - 2 - ... - n` with unit spacing and
/// bidirectional confirmed links between neighbours.
#[allow(dead_code)]
pub fn line_catalog(n: usize) -> Arc<Catalog> {
    let mut builder = CatalogBuilder::new();
    for id in 1..=n as SystemId {
        builder = builder.system(id, &format!("Node-{id}"), [id as f64, 0.0, 0.0]);
    }
    for id in 1..n as SystemId {
        builder = builder.link_both(id, id + 1);
    }
    builder.build()
}
