//! Starroute library entry points.
//!
//! This crate loads a star map catalog into memory, applies user-configured
//! avoidance policy to its jump-point graph, and plans multi-stop routes
//! that stay consistent under incremental edits. Higher-level consumers
//! (CLI, UI layers) should only depend on the types exported here instead
//! of reimplementing behavior.

#![deny(warnings)]

pub mod catalog;
pub mod error;
pub mod output;
pub mod policy;
pub mod route;
pub mod solver;

pub use catalog::{load_catalog, Catalog, Faction, JumpPoint, StarSystem, SystemId};
pub use error::{Error, Result};
pub use output::{ItineraryRenderMode, ItinerarySummary};
pub use policy::{CostModel, Priority, RoutingSettings};
pub use route::{Route, RouteNode, RouteSnapshot, Segment};
pub use solver::{PathNode, Solver};
