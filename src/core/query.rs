//! Graph queries over the catalog's adjacency index.
//!
//! Shortest path is unweighted breadth-first search; neighborhoods are
//! depth-bounded depth-first traversal with an explicit stack. Both are
//! guaranteed to terminate by construction (visited sets, depth bound) and
//! visit neighbors in adjacency insertion order so results are reproducible.

use crate::core::catalog::{TechGraph, TechNode};
use std::collections::{HashSet, VecDeque};
use uuid::Uuid;

/// Default hop bound for [`QueryEngine::related_technologies`].
pub const DEFAULT_RELATED_DEPTH: usize = 2;

/// Read-only query engine borrowing the catalog.
pub struct QueryEngine<'g> {
    graph: &'g TechGraph,
}

impl<'g> QueryEngine<'g> {
    /// Creates an engine over the given graph.
    #[must_use]
    pub fn new(graph: &'g TechGraph) -> Self {
        Self { graph }
    }

    /// Returns the node ids of an unweighted shortest path between two
    /// labels, endpoints included.
    ///
    /// Resolution and fallback policy:
    /// - either label unresolvable → empty vec;
    /// - start and end resolve to the same node → that single id;
    /// - no connecting path exists → a single-element vec containing only
    ///   the target id. This fallback is deliberate and load-bearing for
    ///   downstream callers that expect a non-empty result; a non-trivial
    ///   result therefore does NOT imply connectivity.
    #[must_use]
    pub fn shortest_path(&self, start_label: &str, end_label: &str) -> Vec<Uuid> {
        let Some(start) = self.graph.find_node_by_label(start_label) else {
            return Vec::new();
        };
        let Some(end) = self.graph.find_node_by_label(end_label) else {
            return Vec::new();
        };
        let (start, end) = (start.id, end.id);

        if start == end {
            return vec![start];
        }

        tracing::debug!(%start, %end, "shortest_path");

        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut queue: VecDeque<(Uuid, Vec<Uuid>)> = VecDeque::new();
        visited.insert(start);
        queue.push_back((start, vec![start]));

        while let Some((node, path)) = queue.pop_front() {
            for &neighbor in self.graph.neighbors(node) {
                if neighbor == end {
                    let mut found = path;
                    found.push(neighbor);
                    return found;
                }
                if visited.insert(neighbor) {
                    let mut next = path.clone();
                    next.push(neighbor);
                    queue.push_back((neighbor, next));
                }
            }
        }

        // Disconnected: documented single-element fallback.
        vec![end]
    }

    /// Collects every technology reachable from `node_id` within `depth`
    /// hops, excluding the seed, sorted by descending popularity.
    ///
    /// Visit order is deterministic (adjacency insertion order), and the
    /// popularity sort is stable, so equal-popularity results keep their
    /// discovery order.
    #[must_use]
    pub fn related_technologies(&self, node_id: Uuid, depth: usize) -> Vec<TechNode> {
        if self.graph.node(node_id).is_none() {
            return Vec::new();
        }

        let mut visited: HashSet<Uuid> = HashSet::new();
        let mut stack: Vec<(Uuid, usize)> = vec![(node_id, 0)];
        let mut found: Vec<TechNode> = Vec::new();
        visited.insert(node_id);

        while let Some((node, distance)) = stack.pop() {
            if distance >= depth {
                continue;
            }
            for &neighbor in self.graph.neighbors(node) {
                if visited.insert(neighbor) {
                    if let Some(tech) = self.graph.node(neighbor) {
                        found.push(tech.clone());
                    }
                    stack.push((neighbor, distance + 1));
                }
            }
        }

        found.sort_by(|a, b| b.popularity.cmp(&a.popularity));
        found
    }

    /// [`Self::related_technologies`] with the default depth of 2.
    #[must_use]
    pub fn related_technologies_default(&self, node_id: Uuid) -> Vec<TechNode> {
        self.related_technologies(node_id, DEFAULT_RELATED_DEPTH)
    }
}
