//! Dependency graph engine
//!
//! This module provides the core data structure for tracking "depends-on"
//! relationships as a directed acyclic graph (DAG).
//!
//! # Design
//!
//! The graph uses a bidirectional adjacency representation:
//! - `dependencies`: for each node, the nodes it directly depends on
//! - `dependents`: for each node, the nodes that directly depend on it
//!
//! This allows O(1) access to direct neighbors in both directions, which is
//! needed for efficient leaf detection and for the cascading removal
//! policies. The two indexes are exact inverses of each other; every edge
//! mutation goes through paired insert/unlink sites so neither index can
//! drift. An index entry whose set empties is dropped entirely, so an
//! absent key always means "no edges", never "present with zero edges".
//!
//! Cycle rejection happens at insertion: `add_dependency` runs a full
//! reachability query from the proposed dependency and refuses the edge if
//! it would close a loop. The graph therefore never needs cycle repair.

use std::collections::{HashMap, HashSet, VecDeque};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{GraphError, GraphResult};

/// A set of nodes, as returned by the closure and leaf queries
pub type NodeSet<N> = HashSet<N>;

type DepMap<N> = HashMap<N, HashSet<N>>;

/// A directed dependency graph over nodes of type `N`
///
/// An edge records that a *dependent* requires a *dependency* to exist or
/// complete first. Nodes are created implicitly the first time they appear
/// in [`add_dependency`](Graph::add_dependency) (or explicitly via
/// [`add_node`](Graph::add_node)), and destroyed by the removal operations,
/// which also drop every edge touching them.
///
/// The graph never inspects node contents beyond identity: any
/// `Clone + Eq + Hash` type works as a node.
///
/// # Example
///
/// ```
/// use desmos::Graph;
///
/// let mut graph = Graph::new();
///
/// // "install" depends on "fetch", which depends on "resolve"
/// graph.add_dependency("install", "fetch").unwrap();
/// graph.add_dependency("fetch", "resolve").unwrap();
///
/// assert!(graph.depends_on(&"install", &"resolve"));
/// assert!(!graph.depends_on_directly(&"install", &"resolve"));
///
/// // A cycle is refused, the graph is left untouched.
/// assert!(graph.add_dependency("resolve", "install").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "N: Serialize + Eq + std::hash::Hash",
    deserialize = "N: Deserialize<'de> + Eq + std::hash::Hash"
))]
pub struct Graph<N> {
    /// All nodes currently tracked
    nodes: NodeSet<N>,
    /// node -> nodes it directly depends on
    dependencies: DepMap<N>,
    /// node -> nodes that directly depend on it
    dependents: DepMap<N>,
}

impl<N> Graph<N> {
    /// Creates a new empty graph
    pub fn new() -> Self {
        Self {
            nodes: HashSet::new(),
            dependencies: HashMap::new(),
            dependents: HashMap::new(),
        }
    }
}

impl<N> Default for Graph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Graph<N>
where
    N: Clone + Eq + std::hash::Hash,
{
    /// Returns the number of nodes in the graph
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns true if the node is in the graph
    pub fn contains(&self, node: &N) -> bool {
        self.nodes.contains(node)
    }

    /// Returns an iterator over all nodes, in no particular order
    pub fn nodes(&self) -> impl Iterator<Item = &N> {
        self.nodes.iter()
    }

    /// Returns the direct dependencies of a node, or `None` if the node has
    /// no outgoing edges (including when it is not in the graph at all)
    pub fn direct_dependencies(&self, node: &N) -> Option<&HashSet<N>> {
        self.dependencies.get(node)
    }

    /// Returns the direct dependents of a node, or `None` if the node has
    /// no incoming edges (including when it is not in the graph at all)
    pub fn direct_dependents(&self, node: &N) -> Option<&HashSet<N>> {
        self.dependents.get(node)
    }

    /// Inserts a standalone node with no edges
    ///
    /// Returns `true` if the node was newly inserted, `false` if it was
    /// already present. Idempotent: unlike edge insertion there is nothing
    /// to validate, so this never fails. Standalone nodes show up in
    /// [`leaves`](Graph::leaves) and in layer 0 of [`layers`](Graph::layers).
    pub fn add_node(&mut self, node: N) -> bool {
        self.nodes.insert(node)
    }

    /// Establishes the dependency relationship between two nodes
    ///
    /// Records that `dependent` directly depends on `dependency`, creating
    /// either node if it is not yet tracked. Re-adding an existing edge is
    /// a no-op.
    ///
    /// # Errors
    ///
    /// - [`GraphError::SelfDependency`] if both arguments are the same node
    /// - [`GraphError::CircularDependency`] if `dependency` already
    ///   transitively depends on `dependent`, so the edge would close a
    ///   cycle. The graph is left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use desmos::{Graph, GraphError};
    ///
    /// let mut graph = Graph::new();
    /// graph.add_dependency("b", "a").unwrap();
    /// graph.add_dependency("c", "b").unwrap();
    ///
    /// // a -> c would close the loop a -> c -> b -> a
    /// let err = graph.add_dependency("a", "c").unwrap_err();
    /// assert!(matches!(err, GraphError::CircularDependency { .. }));
    /// ```
    pub fn add_dependency(&mut self, dependent: N, dependency: N) -> GraphResult<(), N> {
        if dependent == dependency {
            return Err(GraphError::self_dependency(dependent));
        }

        // The edge is legal iff the dependency does not already reach the
        // dependent going forward.
        if self.depends_on(&dependency, &dependent) {
            return Err(GraphError::circular(dependent, dependency));
        }

        self.dependents
            .entry(dependency.clone())
            .or_default()
            .insert(dependent.clone());
        self.dependencies
            .entry(dependent.clone())
            .or_default()
            .insert(dependency.clone());

        self.nodes.insert(dependency);
        self.nodes.insert(dependent);

        Ok(())
    }

    /// Removes the single direct edge `dependent -> dependency`
    ///
    /// Other edges of both nodes are untouched, and the nodes themselves
    /// stay in the graph even if one ends up with no edges at all.
    ///
    /// # Errors
    ///
    /// [`GraphError::NoSuchDependency`] unless `dependent` *directly*
    /// depends on `dependency`. A relationship that only holds transitively
    /// is an error, not a no-op: severing it would require picking which
    /// intermediate edges to drop, and that choice belongs to the caller.
    pub fn remove_dependency(&mut self, dependent: &N, dependency: &N) -> GraphResult<(), N> {
        if !self.depends_on_directly(dependent, dependency) {
            return Err(GraphError::no_such_dependency(
                dependent.clone(),
                dependency.clone(),
            ));
        }

        Self::unlink(&mut self.dependencies, dependent, dependency);
        Self::unlink(&mut self.dependents, dependency, dependent);

        Ok(())
    }

    /// Returns true if `dependent` transitively depends on `dependency`
    ///
    /// Zero-or-more hops forward over direct-dependency edges. A node does
    /// not depend on itself unless an actual (illegal, and thus rejected)
    /// loop would say so; `depends_on(&x, &x)` is always false.
    pub fn depends_on(&self, dependent: &N, dependency: &N) -> bool {
        self.dependencies(dependent)
            .is_some_and(|deps| deps.contains(dependency))
    }

    /// Returns true if `dependent` depends on `dependency` through a direct
    /// edge. O(1), no traversal.
    pub fn depends_on_directly(&self, dependent: &N, dependency: &N) -> bool {
        self.dependencies
            .get(dependent)
            .is_some_and(|deps| deps.contains(dependency))
    }

    /// Returns the full transitive closure of the node's dependencies
    ///
    /// `None` when the node is not in the graph; `Some` of an empty set
    /// when it is tracked but depends on nothing. Callers can therefore
    /// tell "unknown node" apart from "known node without dependencies".
    pub fn dependencies(&self, node: &N) -> Option<NodeSet<N>> {
        if !self.nodes.contains(node) {
            return None;
        }

        Some(Self::closure(&self.dependencies, node))
    }

    /// Returns the full transitive closure of the node's dependents
    ///
    /// Symmetric to [`dependencies`](Graph::dependencies), walking the
    /// dependent index instead.
    pub fn dependents(&self, node: &N) -> Option<NodeSet<N>> {
        if !self.nodes.contains(node) {
            return None;
        }

        Some(Self::closure(&self.dependents, node))
    }

    /// Returns all nodes that depend on nothing
    pub fn leaves(&self) -> NodeSet<N> {
        self.nodes
            .iter()
            .filter(|node| !self.dependencies.contains_key(node))
            .cloned()
            .collect()
    }

    /// Returns the nodes grouped into topological layers
    ///
    /// Every node in layer `i` depends only on nodes in layers `0..i`;
    /// nodes sharing a layer are mutually independent and carry no implied
    /// order. This is Kahn's algorithm phrased as repeated leaf removal on
    /// a private working copy, so the graph itself is unaffected.
    ///
    /// # Example
    ///
    /// ```
    /// use desmos::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_dependency("b", "a").unwrap();
    /// graph.add_dependency("c", "a").unwrap();
    /// graph.add_dependency("d", "c").unwrap();
    ///
    /// let layers = graph.layers();
    /// assert_eq!(layers.len(), 3);
    /// assert!(layers[0].contains(&"a"));
    /// assert_eq!(layers[1].len(), 2); // b and c, in no implied order
    /// assert!(layers[2].contains(&"d"));
    /// ```
    pub fn layers(&self) -> Vec<NodeSet<N>> {
        let mut layers = Vec::new();
        let mut copied = self.clone();

        loop {
            let leaves = copied.leaves();
            if leaves.is_empty() {
                break;
            }

            for leaf in &leaves {
                copied.delete(leaf);
            }

            layers.push(leaves);
        }

        layers
    }

    /// Removes a node that nothing depends on
    ///
    /// The "safe" removal: it never leaves dangling references behind.
    /// Removing a node that is not in the graph is a successful no-op.
    ///
    /// # Errors
    ///
    /// [`GraphError::DependentExists`] if some node still depends on the
    /// target. Remove the dependents first, or use
    /// [`force_remove`](Graph::force_remove) /
    /// [`auto_remove`](Graph::auto_remove) to cascade.
    pub fn remove(&mut self, target: &N) -> GraphResult<(), N> {
        if self.dependents.contains_key(target) {
            return Err(GraphError::dependent_exists(target.clone()));
        }

        self.delete(target);

        Ok(())
    }

    /// Removes the target and, recursively, everything that depends on it
    ///
    /// The target's own dependencies are left in place even when the
    /// cascade turns them into leaves; only the downstream dependent
    /// subtree goes away. Never fails.
    ///
    /// # Example
    ///
    /// ```
    /// use desmos::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_dependency("b", "a").unwrap();
    /// graph.add_dependency("c", "b").unwrap();
    ///
    /// graph.force_remove(&"b");
    ///
    /// // c went down with b; a survives even though nothing needs it now
    /// assert!(graph.contains(&"a"));
    /// assert!(!graph.contains(&"b"));
    /// assert!(!graph.contains(&"c"));
    /// ```
    pub fn force_remove(&mut self, target: &N) {
        let mut queue = VecDeque::from([target.clone()]);
        let mut visited = NodeSet::new();
        let mut removed = 0_usize;

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            if let Some(dependents) = self.dependents.remove(&current) {
                for dependent in dependents {
                    Self::unlink(&mut self.dependencies, &dependent, &current);
                    queue.push_back(dependent);
                }
            }

            if let Some(dependencies) = self.dependencies.remove(&current) {
                for dependency in dependencies {
                    Self::unlink(&mut self.dependents, &dependency, &current);
                }
            }

            if self.nodes.remove(&current) {
                removed += 1;
            }
        }

        debug!(removed, "force-remove cascade complete");
    }

    /// Removes the target, its dependents, and any orphaned dependencies
    ///
    /// Like [`force_remove`](Graph::force_remove), but a dependency whose
    /// *only* remaining dependent is the node being removed is reclaimed as
    /// well, and the rule cascades to a fixed point. This mirrors the
    /// autoremove command of package managers such as APT or Homebrew.
    /// Discovery order does not affect the resulting node set.
    ///
    /// # Example
    ///
    /// ```
    /// use desmos::Graph;
    ///
    /// let mut graph = Graph::new();
    /// graph.add_dependency("app", "libssl").unwrap();
    /// graph.add_dependency("app", "libc").unwrap();
    /// graph.add_dependency("curl", "libssl").unwrap();
    ///
    /// graph.auto_remove(&"app");
    ///
    /// // libssl survives because curl still needs it; libc was only ever
    /// // needed by app, so it was reclaimed too.
    /// assert!(graph.contains(&"curl"));
    /// assert!(graph.contains(&"libssl"));
    /// assert!(!graph.contains(&"app"));
    /// assert!(!graph.contains(&"libc"));
    /// ```
    pub fn auto_remove(&mut self, target: &N) {
        let mut queue = VecDeque::from([target.clone()]);
        let mut visited = NodeSet::new();
        let mut removed = 0_usize;

        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.clone()) {
                continue;
            }

            if let Some(dependents) = self.dependents.remove(&current) {
                for dependent in dependents {
                    Self::unlink(&mut self.dependencies, &dependent, &current);
                    queue.push_back(dependent);
                }
            }

            if let Some(dependencies) = self.dependencies.remove(&current) {
                for dependency in dependencies {
                    // Inspect the dependency's dependent set before severing:
                    // if `current` is the only node that still needs it, the
                    // dependency is orphaned and gets removed as well.
                    let orphaned = self
                        .dependents
                        .get(&dependency)
                        .is_some_and(|siblings| siblings.len() == 1 && siblings.contains(&current));

                    Self::unlink(&mut self.dependents, &dependency, &current);

                    if orphaned {
                        queue.push_back(dependency);
                    }
                }
            }

            if self.nodes.remove(&current) {
                removed += 1;
            }
        }

        debug!(removed, "autoremove cascade complete");
    }

    /// Removes a node and every edge touching it, unconditionally
    ///
    /// The primitive excision underneath the removal policies: no
    /// preconditions, never fails, no cascade. Callers wanting "only if
    /// nothing depends on it" should use [`remove`](Graph::remove).
    pub fn delete(&mut self, node: &N) {
        if let Some(dependents) = self.dependents.remove(node) {
            for dependent in &dependents {
                Self::unlink(&mut self.dependencies, dependent, node);
            }
        }

        if let Some(dependencies) = self.dependencies.remove(node) {
            for dependency in &dependencies {
                Self::unlink(&mut self.dependents, dependency, node);
            }
        }

        self.nodes.remove(node);
    }

    /// Detects whether the graph contains a cycle, using DFS
    ///
    /// Three-color marking: white (unvisited), gray (`on_stack`), black
    /// (`visited` but no longer on the stack). Since every public mutation
    /// preserves acyclicity this always returns `false` on graphs built
    /// through the public API; it exists as an independent oracle for tests
    /// and audits, deliberately not sharing code with the BFS reachability
    /// check that guards insertion.
    pub fn has_cycle(&self) -> bool {
        let mut visited = HashSet::new();
        let mut on_stack = HashSet::new();

        for node in &self.nodes {
            if !visited.contains(node) && self.dfs_has_cycle(node, &mut visited, &mut on_stack) {
                return true;
            }
        }

        false
    }

    fn dfs_has_cycle<'a>(
        &'a self,
        node: &'a N,
        visited: &mut HashSet<&'a N>,
        on_stack: &mut HashSet<&'a N>,
    ) -> bool {
        visited.insert(node);
        on_stack.insert(node);

        if let Some(deps) = self.dependencies.get(node) {
            for dep in deps {
                if !visited.contains(dep) {
                    if self.dfs_has_cycle(dep, visited, on_stack) {
                        return true;
                    }
                } else if on_stack.contains(dep) {
                    // Back edge: `dep` is an ancestor of `node`
                    return true;
                }
            }
        }

        on_stack.remove(node);
        false
    }

    /// Verifies that the three maps are mutually consistent, panicking on
    /// any violation
    ///
    /// Checks that every key and set member of both indexes is a tracked
    /// node, that the indexes are exact inverses of each other, and that no
    /// entry holds an empty set. A failure here is a bug in the edge
    /// maintenance code, not a caller mistake, which is why this panics
    /// instead of returning an error. Intended for tests and debugging, not
    /// production hot paths.
    pub fn assert_relationships(&self)
    where
        N: fmt::Debug,
    {
        for (dependency, dependents) in &self.dependents {
            assert!(
                self.nodes.contains(dependency),
                "dangling node {dependency:?} keyed in dependent index"
            );
            assert!(
                !dependents.is_empty(),
                "empty dependent entry for {dependency:?}"
            );

            for dependent in dependents {
                assert!(
                    self.nodes.contains(dependent),
                    "dangling dependent {dependent:?} recorded for {dependency:?}"
                );
                assert!(
                    self.dependencies
                        .get(dependent)
                        .is_some_and(|deps| deps.contains(dependency)),
                    "dependent index records {dependent:?} -> {dependency:?} but the inverse entry is missing"
                );
            }
        }

        for (dependent, dependencies) in &self.dependencies {
            assert!(
                self.nodes.contains(dependent),
                "dangling node {dependent:?} keyed in dependency index"
            );
            assert!(
                !dependencies.is_empty(),
                "empty dependency entry for {dependent:?}"
            );

            for dependency in dependencies {
                assert!(
                    self.nodes.contains(dependency),
                    "dangling dependency {dependency:?} recorded for {dependent:?}"
                );
                assert!(
                    self.dependents
                        .get(dependency)
                        .is_some_and(|deps| deps.contains(dependent)),
                    "dependency index records {dependent:?} -> {dependency:?} but the inverse entry is missing"
                );
            }
        }
    }

    /// BFS transitive closure over one index, frontier by frontier
    ///
    /// The visited set doubles as the result and bounds the walk to
    /// O(nodes + edges).
    fn closure<'a>(index: &'a DepMap<N>, start: &'a N) -> NodeSet<N> {
        let mut reached = NodeSet::new();
        let mut queue: VecDeque<&N> = VecDeque::from([start]);

        while let Some(current) = queue.pop_front() {
            if let Some(next) = index.get(current) {
                for node in next {
                    if reached.insert(node.clone()) {
                        queue.push_back(node);
                    }
                }
            }
        }

        reached
    }

    /// Removes `node` from the set stored under `key`, dropping the whole
    /// entry when the set empties (invariant: no entry maps to an empty set)
    fn unlink(index: &mut DepMap<N>, key: &N, node: &N) {
        if let Some(set) = index.get_mut(key) {
            set.remove(node);
            if set.is_empty() {
                index.remove(key);
            }
        }
    }
}
