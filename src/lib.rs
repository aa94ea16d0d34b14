//! Desmos: In-Memory Dependency Graphs for Rust
//!
//! `desmos` (δεσμός, Greek for "bond") is a directed dependency graph that
//! tracks "depends-on" relationships between arbitrarily typed, hashable
//! nodes. It refuses edges that would create cycles or self-loops, so every
//! graph it hands back is a DAG by construction.
//!
//! # Features
//!
//! - **Generic nodes**: any `Clone + Eq + Hash` key works as a node
//! - **Cycle rejection**: illegal edges are rejected at insertion, never repaired
//! - **Transitive queries**: full dependency/dependent closures in both directions
//! - **Topological layers**: batches of mutually independent nodes, in order
//! - **Package-manager removals**: safe remove, forced cascading remove, and
//!   autoremove of orphaned dependencies
//!
//! # Quick Start
//!
//! ```
//! use desmos::Graph;
//!
//! # fn main() -> Result<(), desmos::GraphError<&'static str>> {
//! let mut graph = Graph::new();
//!
//! // "server" depends on "config" and "logger"
//! graph.add_dependency("server", "config")?;
//! graph.add_dependency("server", "logger")?;
//! graph.add_dependency("logger", "config")?;
//!
//! assert!(graph.depends_on(&"server", &"config"));
//!
//! // Layers give a valid bring-up order: config, then logger, then server.
//! let layers = graph.layers();
//! assert_eq!(layers.len(), 3);
//! assert!(layers[0].contains(&"config"));
//!
//! // Nothing depends on "server", so it can be removed safely.
//! graph.remove(&"server")?;
//!
//! // "logger" still has no dependents now; autoremove reclaims "config"
//! // with it, like a package manager would.
//! graph.auto_remove(&"logger");
//! assert!(graph.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! Following Parnas's information hiding principles, the [`graph`] module
//! hides the adjacency representation (two mirrored index maps) behind
//! abstract operations: `add_dependency`, `depends_on`, `layers`,
//! `auto_remove`, and friends. Callers can never touch one index without
//! the other.
//!
//! # Concurrency
//!
//! The graph is a plain mutable value: single-threaded and synchronous,
//! with no interior locking. Callers that share one across threads must
//! serialize access externally, or hand each consumer its own [`Graph::clone`].

pub mod graph;

pub use graph::{Graph, GraphError, GraphResult, NodeSet};
