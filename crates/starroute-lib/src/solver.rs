use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};
use std::sync::Arc;

use tracing::{debug, error};

use crate::catalog::{Catalog, SystemId};
use crate::error::{Error, Result};
use crate::policy::{evaluate_edge, CostModel, EdgeContext, Priority, RoutingSettings};

/// One step on a solved path: a system and the cumulative cost from the
/// solve source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathNode {
    pub system: SystemId,
    pub distance: f64,
}

/// Transient per-solve record, one per catalog system.
#[derive(Debug, Clone, Copy)]
struct SolverNode {
    system: SystemId,
    distance: f64,
    previous: Option<usize>,
}

/// Single-source shortest-path solver bound to one (source, target) pair.
///
/// A build is cached per (source, priority); repeating it is a no-op unless
/// forced. Tie-breaking between equal-cost paths is arbitrary and not part
/// of the contract.
#[derive(Debug, Clone)]
pub struct Solver {
    catalog: Arc<Catalog>,
    settings: RoutingSettings,
    costs: CostModel,
    source: SystemId,
    target: SystemId,
    nodes: Vec<SolverNode>,
    index: HashMap<SystemId, usize>,
    built: Option<(SystemId, Priority)>,
    builds: u32,
}

impl Solver {
    /// Create a solver over the given catalog.
    ///
    /// Fails when the catalog is empty or either endpoint does not resolve;
    /// the failure is also logged so misconfigured callers are visible.
    pub fn new(
        catalog: Arc<Catalog>,
        source: SystemId,
        target: SystemId,
        settings: RoutingSettings,
        costs: CostModel,
    ) -> Result<Self> {
        if catalog.is_empty() {
            error!("solver constructed over an empty catalog");
            return Err(Error::EmptyCatalog);
        }
        for endpoint in [source, target] {
            if catalog.system(endpoint).is_none() {
                error!(system = endpoint, "solver endpoint is not in the catalog");
                return Err(Error::SystemNotInCatalog { id: endpoint });
            }
        }

        let mut nodes = Vec::with_capacity(catalog.len());
        let mut index = HashMap::with_capacity(catalog.len());
        for system in catalog.systems() {
            index.insert(system.id, nodes.len());
            nodes.push(SolverNode {
                system: system.id,
                distance: f64::INFINITY,
                previous: None,
            });
        }

        Ok(Self {
            catalog,
            settings,
            costs,
            source,
            target,
            nodes,
            index,
            built: None,
            builds: 0,
        })
    }

    /// Source system of this solver.
    pub fn source(&self) -> SystemId {
        self.source
    }

    /// Target system of this solver.
    pub fn target(&self) -> SystemId {
        self.target
    }

    /// Number of times the graph has actually been walked. Cache hits leave
    /// this untouched, which makes build idempotence observable.
    pub fn builds(&self) -> u32 {
        self.builds
    }

    /// Rebind the solver to a new target, invalidating the cached build.
    ///
    /// The cache is keyed on (source, priority) only, so a target change
    /// must drop it explicitly or a later unforced build would reuse a tree
    /// computed for the old target's early exit.
    pub fn set_target(&mut self, target: SystemId) -> Result<()> {
        if self.catalog.system(target).is_none() {
            return Err(Error::SystemNotInCatalog { id: target });
        }
        if target != self.target {
            self.target = target;
            self.built = None;
        }
        Ok(())
    }

    /// Run the solve, unless a build for the same source and priority is
    /// already cached and `force` is false.
    ///
    /// Returns `true` when the graph was walked, `false` on a cache hit.
    pub fn build(&mut self, priority: Priority, force: bool) -> bool {
        if !force && self.built == Some((self.source, priority)) {
            return false;
        }

        for node in &mut self.nodes {
            node.distance = f64::INFINITY;
            node.previous = None;
        }

        let catalog = Arc::clone(&self.catalog);
        let source_index = self.index[&self.source];
        let target_index = self.index[&self.target];
        self.nodes[source_index].distance = 0.0;

        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry::new(source_index, 0.0));
        let mut settled = 0usize;

        while let Some(entry) = frontier.pop() {
            let index = entry.node;
            if entry.cost.0 > self.nodes[index].distance {
                // Stale entry superseded by a later relaxation.
                continue;
            }
            if index == target_index {
                break;
            }
            settled += 1;

            let current = self.nodes[index];
            let Some(system) = catalog.system(current.system) else {
                continue;
            };
            let context = EdgeContext {
                current: current.system,
                first_hop: current.previous.is_none(),
            };

            for jump in &system.jump_points {
                let Some(neighbour) = self.index.get(&jump.destination).copied() else {
                    continue;
                };
                let Some(cost) = evaluate_edge(
                    &catalog,
                    &self.settings,
                    &self.costs,
                    priority,
                    context,
                    jump,
                    (self.source, self.target),
                ) else {
                    continue;
                };

                let tentative = current.distance + cost;
                if tentative < self.nodes[neighbour].distance {
                    self.nodes[neighbour].distance = tentative;
                    self.nodes[neighbour].previous = Some(index);
                    frontier.push(FrontierEntry::new(neighbour, tentative));
                }
            }
        }

        self.builds += 1;
        self.built = Some((self.source, priority));
        debug!(
            source = self.source,
            target = self.target,
            settled,
            reached = !self.nodes[target_index].distance.is_infinite(),
            "solver build complete"
        );
        true
    }

    /// Force a rebuild with the previously used priority.
    pub fn rebuild(&mut self) -> bool {
        let priority = self
            .built
            .map(|(_, priority)| priority)
            .unwrap_or_default();
        self.build(priority, true)
    }

    /// Backtrack the best known path from the source to `destination`.
    ///
    /// Returns `None` when no build has happened yet or the destination was
    /// never reached.
    pub fn path_to(&self, destination: SystemId) -> Option<Vec<PathNode>> {
        self.built?;
        let mut index = self.index.get(&destination).copied()?;
        if self.nodes[index].distance.is_infinite() {
            return None;
        }

        let mut path = Vec::new();
        loop {
            let node = self.nodes[index];
            path.push(PathNode {
                system: node.system,
                distance: node.distance,
            });
            match node.previous {
                Some(previous) => index = previous,
                None => break,
            }
        }
        path.reverse();
        Some(path)
    }

    /// Backtrack the best known path to this solver's target.
    pub fn path(&self) -> Option<Vec<PathNode>> {
        self.path_to(self.target)
    }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq(&other.0)
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct FrontierEntry {
    node: usize,
    cost: FloatOrd,
}

impl FrontierEntry {
    fn new(node: usize, cost: f64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
        }
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frontier_orders_by_minimum_cost() {
        let mut heap = BinaryHeap::new();
        heap.push(FrontierEntry::new(0, 5.0));
        heap.push(FrontierEntry::new(1, 1.0));
        heap.push(FrontierEntry::new(2, 3.0));

        assert_eq!(heap.pop().map(|entry| entry.node), Some(1));
        assert_eq!(heap.pop().map(|entry| entry.node), Some(2));
        assert_eq!(heap.pop().map(|entry| entry.node), Some(0));
    }

    #[test]
    fn float_ord_total_ordering_handles_infinity() {
        assert!(FloatOrd(f64::INFINITY) > FloatOrd(1.0e18));
        assert_eq!(FloatOrd(0.0).cmp(&FloatOrd(0.0)), Ordering::Equal);
    }
}
