use std::collections::HashSet;

use crate::catalog::{Catalog, FactionId, JumpPoint, SystemId};

/// Avoidance configuration, immutable for the duration of a solve.
#[derive(Debug, Clone, Default)]
pub struct RoutingSettings {
    /// Refuse to route through territory hostile to the user's faction.
    pub avoid_hostile: bool,
    /// Refuse to traverse unconfirmed or undiscovered jump points.
    pub avoid_unknown_jump_points: bool,
    /// Refuse to route through off-limits systems.
    pub avoid_off_limits: bool,
    /// Faction of the acting user; required for hostility decisions.
    pub user_faction: Option<FactionId>,
    /// Systems the user explicitly wants to avoid.
    pub avoid_systems: HashSet<SystemId>,
}

/// Optimisation objective for a solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Priority {
    /// Minimise estimated travel time.
    #[default]
    Time,
    /// Minimise the number of jumps.
    Hops,
}

/// Tunable weight constants for the travel-time cost model.
///
/// These are empirical values with no canonical derivation; they are kept
/// configurable so behaviour can be adjusted without code changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostModel {
    /// Seconds to cross one AU in-system. 8m19s at lightspeed, at the 0.2c
    /// autopilot cruise this is five times that.
    pub seconds_per_au: f64,
    /// Seconds per light year of jump tunnel.
    pub jump_seconds_per_ly: f64,
    /// AU crossed to reach the first jump point out of the segment source.
    pub first_hop_entry_au: f64,
    /// AU crossed between arrival and departure jump points mid-route.
    pub interchange_au: f64,
    /// Multiplier applied to edges arriving in hostile territory.
    pub hostile_penalty: f64,
}

impl Default for CostModel {
    fn default() -> Self {
        Self {
            seconds_per_au: ((8 * 60) + 19) as f64 * 5.0,
            jump_seconds_per_ly: 4.0,
            first_hop_entry_au: 0.35,
            interchange_au: 0.7,
            hostile_penalty: 15.0,
        }
    }
}

impl CostModel {
    /// Time in seconds to cross `au` astronomical units in-system.
    pub fn transit_time(&self, au: f64) -> f64 {
        au * self.seconds_per_au
    }
}

/// Traversal context for one edge relaxation.
#[derive(Debug, Clone, Copy)]
pub struct EdgeContext {
    /// System the relaxation departs from.
    pub current: SystemId,
    /// Whether this is the first hop out of the segment source.
    pub first_hop: bool,
}

/// Decide whether `jump` may be traversed and at what cost.
///
/// Returns `None` to exclude the edge. `endpoints` are the segment's own
/// source and target; rules 2-4 never block travel into them, so a route can
/// always leave its origin and reach its destination. The avoid-list rule is
/// deliberately asymmetric: once a route is inside an avoided region,
/// travel onward (and out) is not re-blocked.
///
/// The returned cost is strictly positive for any traversed edge; the solver
/// never sees negative weights.
pub fn evaluate_edge(
    catalog: &Catalog,
    settings: &RoutingSettings,
    costs: &CostModel,
    priority: Priority,
    ctx: EdgeContext,
    jump: &JumpPoint,
    endpoints: (SystemId, SystemId),
) -> Option<f64> {
    if jump.is_unconfirmed() && settings.avoid_unknown_jump_points {
        return None;
    }

    let destination = catalog.system(jump.destination)?;
    let is_endpoint = jump.destination == endpoints.0 || jump.destination == endpoints.1;

    if !is_endpoint {
        if settings.avoid_hostile {
            if let Some(user) = settings.user_faction {
                let current_is_safe = catalog
                    .system(ctx.current)
                    .and_then(|system| system.faction)
                    .map(|faction| !catalog.hostile_between(faction, user))
                    .unwrap_or(false);
                if current_is_safe && destination_is_hostile(catalog, settings, destination.faction)
                {
                    return None;
                }
            }
        }

        if settings.avoid_off_limits && destination.off_limits {
            return None;
        }

        if settings.avoid_systems.contains(&jump.destination)
            && !settings.avoid_systems.contains(&ctx.current)
        {
            return None;
        }
    }

    let mut cost = match priority {
        Priority::Hops => 1.0,
        Priority::Time => {
            let jump_time = jump.length(catalog) * costs.jump_seconds_per_ly;
            let entry_au = if ctx.first_hop {
                costs.first_hop_entry_au
            } else {
                costs.interchange_au
            };
            jump_time + costs.transit_time(entry_au)
        }
    };

    // Hostile destinations stay traversable (the endpoints may force it) but
    // are heavily discouraged.
    if settings.avoid_hostile
        && settings.user_faction.is_some()
        && destination_is_hostile(catalog, settings, destination.faction)
    {
        cost *= costs.hostile_penalty;
    }

    Some(cost)
}

fn destination_is_hostile(
    catalog: &Catalog,
    settings: &RoutingSettings,
    faction: Option<FactionId>,
) -> bool {
    match (faction, settings.user_faction) {
        (Some(faction), Some(user)) => catalog.hostile_between(faction, user),
        _ => false,
    }
}
