//! Directed dependency graph with cycle rejection
//!
//! This module provides the graph engine: a set of nodes plus two mirrored
//! adjacency indexes (dependencies and dependents) kept in lock-step. It
//! enables:
//!
//! - Explicit dependency declaration between nodes, with self-loops and
//!   cycles rejected at insertion
//! - Transitive reachability queries in both directions
//! - Topological layering for batch ordering
//! - Removal policies modeled on package managers: safe remove, forced
//!   cascading remove, and autoremove of orphaned dependencies
//!
//! # Design Principles
//!
//! Following Parnas's information hiding principles:
//! - This module hides the adjacency representation (paired forward and
//!   reverse maps) and the invariant that keeps them exact inverses
//! - Exposes only abstract operations: add_dependency, depends_on, layers,
//!   remove, force_remove, auto_remove, etc.
//!
//! # Algorithm References
//!
//! Layering is Kahn's topological sort, phrased as repeated structural
//! leaf removal on a working copy instead of in-degree bookkeeping.

mod dep_graph;
mod error;

pub use dep_graph::{Graph, NodeSet};
pub use error::{GraphError, GraphResult};
