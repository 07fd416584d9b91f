//! The Wayfinder service facade.
//!
//! An explicit service object replacing the shared-singleton pattern: the
//! host constructs one `Wayfinder` (or several, e.g. one per test) and
//! passes it by reference. It wires the catalog, query engine, gap
//! analyzer, synthesizer, and path repository onto one event bus and one
//! id generator, and exposes the public API surface.

use crate::core::catalog::{
    EdgeKind, GraphExport, NodeFilter, TechGraph, TechNode, TechNodeSpec,
};
use crate::core::error::Result;
use crate::core::events::{EventBus, EventKind, EventSubscriber};
use crate::core::gaps::{GapAnalyzer, SkillGap};
use crate::core::ids::{IdGenerator, RandomIds};
use crate::core::paths::{LearningPath, PathFilter, PathRepository, PathStats, TagCount};
use crate::core::profile::UserProfile;
use crate::core::query::QueryEngine;
use crate::core::synthesis::PathSynthesizer;
use std::sync::Arc;
use uuid::Uuid;

/// The knowledge-graph and learning-path engine.
pub struct Wayfinder {
    bus: Arc<EventBus>,
    ids: Arc<dyn IdGenerator>,
    graph: TechGraph,
    repository: PathRepository,
}

impl Wayfinder {
    /// Creates an engine with random ids.
    #[must_use]
    pub fn new() -> Self {
        Self::with_ids(Arc::new(RandomIds))
    }

    /// Creates an engine with the given id generator.
    ///
    /// Tests inject [`crate::core::ids::SequentialIds`] to make synthesis
    /// output reproducible.
    #[must_use]
    pub fn with_ids(ids: Arc<dyn IdGenerator>) -> Self {
        let bus = Arc::new(EventBus::new());
        Self {
            graph: TechGraph::new(bus.clone(), ids.clone()),
            repository: PathRepository::new(bus.clone()),
            bus,
            ids,
        }
    }

    /// Registers an event subscriber, optionally restricted to one kind.
    pub fn subscribe(&self, filter: Option<EventKind>, subscriber: Arc<dyn EventSubscriber>) {
        self.bus.subscribe(filter, subscriber);
    }

    /// Read access to the catalog.
    #[must_use]
    pub fn graph(&self) -> &TechGraph {
        &self.graph
    }

    /// Read access to the path repository.
    #[must_use]
    pub fn repository(&self) -> &PathRepository {
        &self.repository
    }

    // --- Catalog -----------------------------------------------------------

    /// Registers a technology. See [`TechGraph::add_node`].
    pub fn add_node(&mut self, spec: TechNodeSpec) -> Uuid {
        self.graph.add_node(spec)
    }

    /// Inserts a relationship edge. See [`TechGraph::add_edge`].
    ///
    /// # Errors
    /// Returns a `not_found` error if either endpoint is missing.
    pub fn add_edge(&mut self, from: Uuid, to: Uuid, kind: EdgeKind) -> Result<Uuid> {
        self.graph.add_edge(from, to, kind)
    }

    /// Searches catalog nodes by query and filter.
    #[must_use]
    pub fn search_nodes(&self, query: &str, filter: &NodeFilter) -> Vec<TechNode> {
        self.graph
            .search_nodes(query, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Exports the full catalog with metadata.
    #[must_use]
    pub fn export_graph(&self) -> GraphExport {
        self.graph.export_graph()
    }

    // --- Queries -----------------------------------------------------------

    /// Unweighted shortest path between two labels. See
    /// [`QueryEngine::shortest_path`] for the resolution and fallback
    /// policy.
    #[must_use]
    pub fn shortest_path(&self, start_label: &str, end_label: &str) -> Vec<Uuid> {
        QueryEngine::new(&self.graph).shortest_path(start_label, end_label)
    }

    /// Technologies within `depth` hops, most popular first.
    #[must_use]
    pub fn related_technologies(&self, node_id: Uuid, depth: usize) -> Vec<TechNode> {
        QueryEngine::new(&self.graph).related_technologies(node_id, depth)
    }

    /// [`Self::related_technologies`] with the default depth of 2.
    #[must_use]
    pub fn related_technologies_default(&self, node_id: Uuid) -> Vec<TechNode> {
        QueryEngine::new(&self.graph).related_technologies_default(node_id)
    }

    // --- Analysis and synthesis -------------------------------------------

    /// Computes one skill gap per target.
    #[must_use]
    pub fn compute_skill_gaps(&self, current: &[String], targets: &[String]) -> Vec<SkillGap> {
        GapAnalyzer::new(&self.graph).compute_gaps(current, targets)
    }

    /// Synthesizes a learning path for the profile and targets.
    ///
    /// The path is returned, not stored; pass it to [`Self::add_path`] to
    /// make it searchable and trackable.
    #[must_use]
    pub fn synthesize_learning_path(
        &self,
        profile: &UserProfile,
        targets: &[String],
    ) -> LearningPath {
        PathSynthesizer::new(&self.graph, self.bus.clone(), self.ids.clone())
            .synthesize(profile, targets)
    }

    // --- Repository --------------------------------------------------------

    /// Stores a path. See [`PathRepository::add_path`].
    pub fn add_path(&mut self, path: LearningPath) {
        self.repository.add_path(path);
    }

    /// Searches stored paths by query and filter.
    #[must_use]
    pub fn search_paths(&self, query: &str, filter: &PathFilter) -> Vec<LearningPath> {
        self.repository
            .search_paths(query, filter)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Unfinished paths for the user, easiest first, truncated to `limit`.
    #[must_use]
    pub fn recommended_paths(&self, user_id: &str, limit: usize) -> Vec<LearningPath> {
        self.repository
            .recommended_paths(user_id, limit)
            .into_iter()
            .cloned()
            .collect()
    }

    /// Sets a user's progress on a path, clamped to [0, 100].
    pub fn update_user_progress(&mut self, user_id: &str, path_id: Uuid, percent: f64) {
        self.repository.update_user_progress(user_id, path_id, percent);
    }

    /// Marks one node completed and recomputes progress.
    pub fn mark_node_completed(&mut self, user_id: &str, path_id: Uuid, node_id: Uuid) {
        self.repository.mark_node_completed(user_id, path_id, node_id);
    }

    /// Returns a user's progress on a path; 0 when unknown.
    #[must_use]
    pub fn user_progress(&self, user_id: &str, path_id: Uuid) -> f64 {
        self.repository.user_progress(user_id, path_id)
    }

    /// Aggregate path statistics.
    #[must_use]
    pub fn path_stats(&self) -> PathStats {
        self.repository.path_stats()
    }

    /// Most used path tags.
    #[must_use]
    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        self.repository.popular_tags(limit)
    }
}

impl Default for Wayfinder {
    fn default() -> Self {
        Self::new()
    }
}
