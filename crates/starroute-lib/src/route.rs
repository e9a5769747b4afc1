use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog::{Catalog, SystemId};
use crate::error::{Error, Result};
use crate::policy::{CostModel, Priority, RoutingSettings};
use crate::solver::{PathNode, Solver};

/// One step on a flattened route: a system and the cumulative travel time
/// in seconds from the route start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouteNode {
    pub system: SystemId,
    pub travel_time: f64,
}

/// One solver bound to a consecutive pair of route stops.
#[derive(Debug, Clone)]
pub struct Segment {
    solver: Solver,
}

impl Segment {
    fn new(
        catalog: Arc<Catalog>,
        source: SystemId,
        target: SystemId,
        settings: RoutingSettings,
        costs: CostModel,
    ) -> Result<Self> {
        Ok(Self {
            solver: Solver::new(catalog, source, target, settings, costs)?,
        })
    }

    /// Start system of this segment.
    pub fn source(&self) -> SystemId {
        self.solver.source()
    }

    /// End system of this segment.
    pub fn target(&self) -> SystemId {
        self.solver.target()
    }

    /// Solved path spanning this segment, when one exists.
    pub fn path(&self) -> Option<Vec<PathNode>> {
        self.solver.path()
    }
}

/// Persistable shape of a route: the start system and ordered waypoints.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RouteSnapshot {
    pub start: Option<SystemId>,
    pub waypoints: Vec<SystemId>,
}

/// An ordered multi-stop itinerary over the catalog graph.
///
/// The route owns one [`Segment`] per consecutive stop pair and keeps the
/// set consistent through its internal sync step: `segments[i]` always spans
/// `(stops[i], stops[i + 1])`. Structural edit failures are reported as a
/// `false` return and leave the route untouched; a segment with no
/// traversable path is recorded as the last error and truncates the route
/// to its valid prefix instead of keeping stale paths around.
#[derive(Debug)]
pub struct Route {
    catalog: Arc<Catalog>,
    settings: RoutingSettings,
    costs: CostModel,
    priority: Priority,
    start: Option<SystemId>,
    waypoints: Vec<SystemId>,
    segments: Vec<Segment>,
    last_error: Option<Error>,
}

impl Route {
    /// Create a route and solve its initial segments.
    ///
    /// Stops that do not resolve in the catalog are dropped with a warning.
    pub fn new(
        catalog: Arc<Catalog>,
        start: Option<SystemId>,
        waypoints: &[SystemId],
        settings: RoutingSettings,
        costs: CostModel,
    ) -> Self {
        let mut route = Self {
            start: start.filter(|&id| known_system(&catalog, id)),
            waypoints: waypoints
                .iter()
                .copied()
                .filter(|&id| known_system(&catalog, id))
                .collect(),
            segments: Vec::new(),
            last_error: None,
            priority: Priority::Time,
            catalog,
            settings,
            costs,
        };
        route.sync();
        route
    }

    /// Start system, if set.
    pub fn start(&self) -> Option<SystemId> {
        self.start
    }

    /// Waypoints following the start, in order.
    pub fn waypoints(&self) -> &[SystemId] {
        &self.waypoints
    }

    /// Segments spanning the consecutive stop pairs.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The last synchronization error, if the most recent sync failed.
    pub fn last_error(&self) -> Option<&Error> {
        self.last_error.as_ref()
    }

    /// Replace the whole stop sequence atomically and re-solve.
    pub fn set_route(&mut self, start: Option<SystemId>, waypoints: &[SystemId]) {
        self.start = start.filter(|&id| known_system(&self.catalog, id));
        self.waypoints = waypoints
            .iter()
            .copied()
            .filter(|&id| known_system(&self.catalog, id))
            .collect();
        self.sync();
    }

    /// Drop all stops, leaving the route unset.
    pub fn clear(&mut self) {
        self.start = None;
        self.waypoints.clear();
        self.sync();
    }

    /// Promote `location`, an interior node of exactly one segment's path,
    /// to a waypoint by splitting that segment in two.
    ///
    /// Fails when `location` is already a stop (segment endpoint) or when it
    /// appears in zero or more than one segment path.
    pub fn split_at(&mut self, location: SystemId) -> bool {
        if self
            .segments
            .iter()
            .any(|segment| segment.source() == location || segment.target() == location)
        {
            warn!(system = location, "cannot split: already a segment boundary");
            return false;
        }

        let mut found = None;
        for (index, segment) in self.segments.iter().enumerate() {
            let Some(path) = segment.path() else {
                continue;
            };
            if path.iter().any(|node| node.system == location) {
                if found.is_some() {
                    warn!(system = location, "cannot split: matches multiple segments");
                    return false;
                }
                found = Some(index);
            }
        }
        let Some(index) = found else {
            warn!(system = location, "cannot split: not on the current route");
            return false;
        };

        let old_end = self.segments[index].target();
        let tail = match Segment::new(
            Arc::clone(&self.catalog),
            location,
            old_end,
            self.settings.clone(),
            self.costs,
        ) {
            Ok(segment) => segment,
            Err(_) => return false,
        };
        if self.segments[index].solver.set_target(location).is_err() {
            return false;
        }
        self.segments.insert(index + 1, tail);
        // segments[index] spans (stops[index], stops[index + 1]); the new
        // stop therefore lands at waypoint position `index`.
        self.waypoints.insert(index, location);
        self.sync();
        true
    }

    /// Remove a waypoint that is the shared boundary of exactly two
    /// adjacent segments, merging them into one.
    pub fn remove_waypoint(&mut self, location: SystemId) -> bool {
        let Some(index) = self.waypoints.iter().position(|&stop| stop == location) else {
            return false;
        };
        if index + 1 >= self.segments.len() {
            return false;
        }
        if self.segments[index].target() != location
            || self.segments[index + 1].source() != location
        {
            return false;
        }

        let outer_end = self.segments[index + 1].target();
        if self.segments[index].solver.set_target(outer_end).is_err() {
            return false;
        }
        self.segments.remove(index + 1);
        self.waypoints.remove(index);
        self.sync();
        true
    }

    /// Replace the stop `from` with `to`.
    ///
    /// Rejects moves onto the current start, onto an existing waypoint, or
    /// onto `from` itself. When `from` is an interior path node rather than
    /// a stop, it is first split out implicitly.
    pub fn move_waypoint(&mut self, from: SystemId, to: SystemId) -> bool {
        if from == to || !known_system(&self.catalog, to) {
            return false;
        }
        if self.start == Some(to) || self.waypoints.contains(&to) {
            return false;
        }

        if self.start == Some(from) {
            self.start = Some(to);
            self.sync();
            return true;
        }

        if let Some(index) = self.waypoints.iter().position(|&stop| stop == from) {
            self.waypoints[index] = to;
            self.sync();
            return true;
        }

        // Not a stop; try promoting the path node to a waypoint first.
        if self.split_at(from) {
            if let Some(index) = self.waypoints.iter().position(|&stop| stop == from) {
                self.waypoints[index] = to;
                self.sync();
                return true;
            }
        }

        false
    }

    /// Force every segment to re-solve against the live catalog, then
    /// re-sync. Used after the underlying graph has changed.
    pub fn rebuild_current_route(&mut self) {
        for segment in &mut self.segments {
            segment.solver.rebuild();
        }
        self.sync();
    }

    /// The flattened route across all segments, with the duplicated
    /// boundary node between adjacent segments elided. A route with a start
    /// but no segments yields that single degenerate node.
    pub fn current_route(&self) -> Vec<RouteNode> {
        let mut route: Vec<RouteNode> = Vec::new();
        if self.segments.is_empty() {
            if let Some(start) = self.start {
                route.push(RouteNode {
                    system: start,
                    travel_time: 0.0,
                });
            }
            return route;
        }

        let mut offset = 0.0;
        for segment in &self.segments {
            let Some(path) = segment.path() else {
                continue;
            };
            let skip_first = match (route.last(), path.first()) {
                (Some(last), Some(first)) => last.system == first.system,
                _ => false,
            };
            for node in path.iter().skip(usize::from(skip_first)) {
                route.push(RouteNode {
                    system: node.system,
                    travel_time: offset + node.distance,
                });
            }
            offset += path.last().map(|node| node.distance).unwrap_or(0.0);
        }
        route
    }

    /// Whether the route currently spans more than one system.
    pub fn is_set(&self) -> bool {
        self.current_route().len() > 1
    }

    /// Cumulative travel time of the flattened route, in seconds.
    pub fn total_time(&self) -> f64 {
        self.current_route()
            .last()
            .map(|node| node.travel_time)
            .unwrap_or(0.0)
    }

    /// Capture the stop list for external persistence.
    pub fn snapshot(&self) -> RouteSnapshot {
        RouteSnapshot {
            start: self.start,
            waypoints: self.waypoints.clone(),
        }
    }

    /// Rehydrate the stop list from a snapshot, dropping ids that no longer
    /// resolve in the catalog, then re-solve.
    pub fn restore(&mut self, snapshot: RouteSnapshot) {
        self.start = snapshot.start.filter(|&id| known_system(&self.catalog, id));
        self.waypoints = snapshot
            .waypoints
            .into_iter()
            .filter(|&id| known_system(&self.catalog, id))
            .collect();
        self.sync();
    }

    /// Rehydrate from a persisted JSON snapshot.
    ///
    /// A corrupt document resets the route to empty rather than failing the
    /// restore; returns whether the snapshot decoded cleanly.
    pub fn restore_from_json(&mut self, raw: &str) -> bool {
        match serde_json::from_str::<RouteSnapshot>(raw) {
            Ok(snapshot) => {
                self.restore(snapshot);
                true
            }
            Err(cause) => {
                warn!(%cause, "discarding corrupt route snapshot");
                self.clear();
                false
            }
        }
    }

    /// The ordered stop list: start followed by waypoints.
    fn stops(&self) -> Vec<SystemId> {
        let mut stops = Vec::with_capacity(self.waypoints.len() + 1);
        if let Some(start) = self.start {
            stops.push(start);
        }
        stops.extend_from_slice(&self.waypoints);
        stops
    }

    /// Reconcile segments with the current stop list and re-solve.
    ///
    /// Segments whose endpoint pair is unchanged are carried over so their
    /// cached solve is reused; new or changed pairs are solved fresh. A
    /// segment whose path cannot connect its endpoints records the failure
    /// and truncates the route to the segments solved so far.
    fn sync(&mut self) {
        self.last_error = None;
        let stops = self.stops();

        if stops.len() < 2 {
            self.segments.clear();
            return;
        }

        let mut previous: Vec<Segment> = std::mem::take(&mut self.segments);
        let mut synced: Vec<Segment> = Vec::with_capacity(stops.len() - 1);

        for pair in stops.windows(2) {
            let (from, to) = (pair[0], pair[1]);

            let reused = previous
                .iter()
                .position(|segment| segment.source() == from && segment.target() == to)
                .map(|index| previous.remove(index));
            let mut segment = match reused {
                Some(segment) => segment,
                None => {
                    match Segment::new(
                        Arc::clone(&self.catalog),
                        from,
                        to,
                        self.settings.clone(),
                        self.costs,
                    ) {
                        Ok(segment) => segment,
                        Err(cause) => {
                            self.last_error = Some(cause);
                            self.segments = synced;
                            return;
                        }
                    }
                }
            };

            segment.solver.build(self.priority, false);

            let connected = segment
                .path()
                .map(|path| path.len() > 1)
                .unwrap_or(false);
            if !connected && from != to {
                warn!(
                    from = %self.system_name(from),
                    to = %self.system_name(to),
                    "no route between consecutive stops"
                );
                self.last_error = Some(Error::RouteSegmentFailed {
                    from: self.system_name(from),
                    to: self.system_name(to),
                });
                self.segments = synced;
                return;
            }

            synced.push(segment);
        }

        debug!(segments = synced.len(), "route synchronized");
        self.segments = synced;
    }

    fn system_name(&self, id: SystemId) -> String {
        self.catalog
            .system(id)
            .map(|system| system.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self.stops().iter().map(|&id| self.system_name(id)).collect();
        f.write_str(&names.join(" > "))
    }
}

fn known_system(catalog: &Catalog, id: SystemId) -> bool {
    let known = catalog.system(id).is_some();
    if !known {
        warn!(system = id, "unknown system dropped from route");
    }
    known
}
