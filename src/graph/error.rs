//! Error types for graph operations
//!
//! This module hides error representation details and provides a unified
//! error type for all graph operations. Every variant is deterministic and
//! locally detectable; none of them is transient, so callers should never
//! retry the same call expecting a different answer.

use thiserror::Error;

/// Result type for graph operations
pub type GraphResult<T, N> = Result<T, GraphError<N>>;

/// Errors that can occur during graph operations
///
/// Each variant carries the node(s) it refers to, so callers can report
/// which edge or node was rejected without re-deriving it from context.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GraphError<N> {
    /// A node tried to depend on itself
    #[error("node {node:?} cannot depend on itself")]
    SelfDependency {
        /// The node that referenced itself
        node: N,
    },

    /// Adding the edge would make the graph cyclic
    #[error("dependency {dependent:?} -> {dependency:?} would create a cycle")]
    CircularDependency {
        /// The node that would have gained a dependency
        dependent: N,
        /// The dependency that already (transitively) depends on `dependent`
        dependency: N,
    },

    /// A safe removal was attempted on a node that still has dependents
    #[error("node {node:?} still has dependents")]
    DependentExists {
        /// The node that could not be removed
        node: N,
    },

    /// Attempted to remove an edge that is not a direct dependency
    #[error("{dependent:?} does not directly depend on {dependency:?}")]
    NoSuchDependency {
        /// The alleged dependent
        dependent: N,
        /// The alleged direct dependency
        dependency: N,
    },
}

impl<N> GraphError<N> {
    /// Creates a self-dependency error
    pub fn self_dependency(node: N) -> Self {
        Self::SelfDependency { node }
    }

    /// Creates a circular-dependency error for the rejected edge
    pub fn circular(dependent: N, dependency: N) -> Self {
        Self::CircularDependency {
            dependent,
            dependency,
        }
    }

    /// Creates a dependent-exists error
    pub fn dependent_exists(node: N) -> Self {
        Self::DependentExists { node }
    }

    /// Creates a no-such-dependency error for the missing edge
    pub fn no_such_dependency(dependent: N, dependency: N) -> Self {
        Self::NoSuchDependency {
            dependent,
            dependency,
        }
    }
}
