//! Technology catalog: nodes, typed edges, and the adjacency index.
//!
//! The catalog owns its maps exclusively; all mutation goes through its
//! public operations, which announce themselves on the event bus. The
//! adjacency index is undirected and preserves insertion order per endpoint
//! so traversal tie-breaking stays deterministic.

use crate::core::error::{Result, WayfinderError};
use crate::core::events::{EventBus, EventPayload};
use crate::core::ids::{IdGenerator, RandomIds};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use uuid::Uuid;

/// Technology category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum TechCategory {
    ProgrammingLanguage,
    Framework,
    Library,
    Database,
    Tool,
    Platform,
    Service,
    Protocol,
    Standard,
}

impl std::fmt::Display for TechCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ProgrammingLanguage => write!(f, "programming-language"),
            Self::Framework => write!(f, "framework"),
            Self::Library => write!(f, "library"),
            Self::Database => write!(f, "database"),
            Self::Tool => write!(f, "tool"),
            Self::Platform => write!(f, "platform"),
            Self::Service => write!(f, "service"),
            Self::Protocol => write!(f, "protocol"),
            Self::Standard => write!(f, "standard"),
        }
    }
}

/// Learning-curve difficulty, totally ordered from beginner to expert.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Estimated hours of study for a skill at this difficulty.
    #[must_use]
    pub fn estimated_hours(self) -> u32 {
        match self {
            Self::Beginner => 20,
            Self::Intermediate => 40,
            Self::Advanced => 80,
            Self::Expert => 120,
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "beginner"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Advanced => write!(f, "advanced"),
            Self::Expert => write!(f, "expert"),
        }
    }
}

/// Relationship kind between two technologies.
///
/// The kind is directed semantically, but the adjacency index treats every
/// edge as undirected for connectivity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeKind {
    DependsOn,
    Extends,
    Uses,
    RelatedTo,
    AlternativeTo,
    PartOf,
    Implements,
    CreatedBy,
    MaintainedBy,
    Prerequisite,
}

impl EdgeKind {
    /// Informational ranking weight. Shortest path ignores weights entirely.
    #[must_use]
    pub fn weight(self) -> f64 {
        match self {
            Self::Prerequisite => 0.95,
            Self::DependsOn => 0.9,
            Self::Extends | Self::Implements => 0.8,
            Self::PartOf => 0.7,
            Self::Uses => 0.6,
            Self::RelatedTo => 0.5,
            Self::AlternativeTo => 0.4,
            Self::CreatedBy | Self::MaintainedBy => 0.3,
        }
    }
}

impl std::fmt::Display for EdgeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DependsOn => write!(f, "depends-on"),
            Self::Extends => write!(f, "extends"),
            Self::Uses => write!(f, "uses"),
            Self::RelatedTo => write!(f, "related-to"),
            Self::AlternativeTo => write!(f, "alternative-to"),
            Self::PartOf => write!(f, "part-of"),
            Self::Implements => write!(f, "implements"),
            Self::CreatedBy => write!(f, "created-by"),
            Self::MaintainedBy => write!(f, "maintained-by"),
            Self::Prerequisite => write!(f, "prerequisite"),
        }
    }
}

/// A catalog entry representing one technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechNode {
    /// Unique, stable id.
    pub id: Uuid,
    /// Display label. Duplicates are permitted; label lookup returns the
    /// first match in insertion order.
    pub label: String,
    /// Category.
    pub category: TechCategory,
    /// Free-text description.
    pub description: String,
    /// Popularity score, 0–100.
    pub popularity: u8,
    /// Learning-curve difficulty.
    pub difficulty: Difficulty,
    /// Tag set.
    pub tags: BTreeSet<String>,
}

/// Input data for registering a technology.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechNodeSpec {
    pub label: String,
    pub category: TechCategory,
    pub description: String,
    pub popularity: u8,
    pub difficulty: Difficulty,
    pub tags: BTreeSet<String>,
}

impl TechNodeSpec {
    /// Creates a spec with empty description, zero popularity, and beginner
    /// difficulty.
    #[must_use]
    pub fn new(label: impl Into<String>, category: TechCategory) -> Self {
        Self {
            label: label.into(),
            category,
            description: String::new(),
            popularity: 0,
            difficulty: Difficulty::Beginner,
            tags: BTreeSet::new(),
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the popularity score (clamped to 100 at insertion).
    #[must_use]
    pub fn with_popularity(mut self, popularity: u8) -> Self {
        self.popularity = popularity;
        self
    }

    /// Sets the difficulty.
    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Adds a tag.
    #[must_use]
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.insert(tag.into());
        self
    }
}

/// A typed relationship between two technologies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique id.
    pub id: Uuid,
    /// Source node id.
    pub source: Uuid,
    /// Target node id.
    pub target: Uuid,
    /// Relationship kind.
    pub kind: EdgeKind,
    /// Informational weight derived from the kind.
    pub weight: f64,
}

/// Search filter for catalog nodes. A default filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct NodeFilter {
    /// Keep only nodes of this category.
    #[serde(default)]
    pub category: Option<TechCategory>,
    /// Keep only nodes of this difficulty.
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    /// Keep only nodes at or above this popularity.
    #[serde(default)]
    pub min_popularity: Option<u8>,
    /// Keep nodes carrying any of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl NodeFilter {
    fn matches(&self, node: &TechNode) -> bool {
        if self.category.is_some_and(|c| node.category != c) {
            return false;
        }
        if self.difficulty.is_some_and(|d| node.difficulty != d) {
            return false;
        }
        if self.min_popularity.is_some_and(|p| node.popularity < p) {
            return false;
        }
        if !self.tags.is_empty() {
            let any = self
                .tags
                .iter()
                .any(|t| node.tags.iter().any(|tag| tag.eq_ignore_ascii_case(t)));
            if !any {
                return false;
            }
        }
        true
    }
}

/// Aggregate metadata for an exported graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphMetadata {
    pub node_count: usize,
    pub edge_count: usize,
    /// Distinct categories present, in first-seen order.
    pub categories: Vec<TechCategory>,
    /// Order-invariant SHA-256 digest of the node/edge listing.
    pub fingerprint: String,
}

/// Full catalog export: nodes and edges in insertion order plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport {
    pub nodes: Vec<TechNode>,
    pub edges: Vec<Edge>,
    pub metadata: GraphMetadata,
}

/// The technology knowledge graph store.
pub struct TechGraph {
    nodes: HashMap<Uuid, TechNode>,
    node_order: Vec<Uuid>,
    edges: HashMap<Uuid, Edge>,
    edge_order: Vec<Uuid>,
    adjacency: HashMap<Uuid, Vec<Uuid>>,
    bus: Arc<EventBus>,
    ids: Arc<dyn IdGenerator>,
}

impl TechGraph {
    /// Creates an empty graph wired to the given bus and id generator.
    #[must_use]
    pub fn new(bus: Arc<EventBus>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            nodes: HashMap::new(),
            node_order: Vec::new(),
            edges: HashMap::new(),
            edge_order: Vec::new(),
            adjacency: HashMap::new(),
            bus,
            ids,
        }
    }

    /// Creates an empty graph with a private bus and random ids.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(EventBus::new()), Arc::new(RandomIds))
    }

    /// Registers a technology and returns its assigned id.
    ///
    /// Popularity above 100 is clamped. Duplicate labels are permitted.
    pub fn add_node(&mut self, spec: TechNodeSpec) -> Uuid {
        let id = self.ids.next_id();
        let node = TechNode {
            id,
            label: spec.label,
            category: spec.category,
            description: spec.description,
            popularity: spec.popularity.min(100),
            difficulty: spec.difficulty,
            tags: spec.tags,
        };
        let label = node.label.clone();
        let category = node.category;
        self.adjacency.insert(id, Vec::new());
        self.node_order.push(id);
        self.nodes.insert(id, node);
        self.bus.emit(EventPayload::NodeAdded {
            node_id: id,
            label,
            category,
        });
        id
    }

    /// Inserts a typed edge and indexes both endpoints as mutually adjacent.
    ///
    /// # Errors
    /// Returns a `not_found` error if either endpoint is missing.
    pub fn add_edge(&mut self, from: Uuid, to: Uuid, kind: EdgeKind) -> Result<Uuid> {
        if !self.nodes.contains_key(&from) {
            return Err(WayfinderError::not_found(
                "edge_source_missing",
                format!("Source node {from} does not exist"),
                "catalog:add_edge",
            ));
        }
        if !self.nodes.contains_key(&to) {
            return Err(WayfinderError::not_found(
                "edge_target_missing",
                format!("Target node {to} does not exist"),
                "catalog:add_edge",
            ));
        }

        let id = self.ids.next_id();
        let edge = Edge {
            id,
            source: from,
            target: to,
            kind,
            weight: kind.weight(),
        };
        self.edges.insert(id, edge);
        self.edge_order.push(id);

        let forward = self.adjacency.entry(from).or_default();
        if !forward.contains(&to) {
            forward.push(to);
        }
        let backward = self.adjacency.entry(to).or_default();
        if !backward.contains(&from) {
            backward.push(from);
        }

        self.bus.emit(EventPayload::EdgeAdded {
            edge_id: id,
            source: from,
            target: to,
            edge_kind: kind,
        });
        Ok(id)
    }

    /// Looks up a node by id.
    #[must_use]
    pub fn node(&self, id: Uuid) -> Option<&TechNode> {
        self.nodes.get(&id)
    }

    /// Returns a node's neighbors in adjacency insertion order.
    #[must_use]
    pub fn neighbors(&self, id: Uuid) -> &[Uuid] {
        self.adjacency.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Iterates nodes in insertion order.
    pub fn iter_nodes(&self) -> impl Iterator<Item = &TechNode> {
        self.node_order.iter().filter_map(|id| self.nodes.get(id))
    }

    /// Iterates edges in insertion order.
    pub fn iter_edges(&self) -> impl Iterator<Item = &Edge> {
        self.edge_order.iter().filter_map(|id| self.edges.get(id))
    }

    /// Finds the first node (in insertion order) whose label matches,
    /// ignoring ASCII case.
    #[must_use]
    pub fn find_node_by_label(&self, label: &str) -> Option<&TechNode> {
        self.iter_nodes()
            .find(|node| node.label.eq_ignore_ascii_case(label))
    }

    /// Searches nodes by substring query and filter.
    ///
    /// An empty query passes every node to the filter stage. The query is
    /// matched case-insensitively against label, description, and tags.
    #[must_use]
    pub fn search_nodes(&self, query: &str, filter: &NodeFilter) -> Vec<&TechNode> {
        let needle = query.trim().to_lowercase();
        self.iter_nodes()
            .filter(|node| {
                if !needle.is_empty() {
                    let text_match = node.label.to_lowercase().contains(&needle)
                        || node.description.to_lowercase().contains(&needle)
                        || node.tags.iter().any(|t| t.to_lowercase().contains(&needle));
                    if !text_match {
                        return false;
                    }
                }
                filter.matches(node)
            })
            .collect()
    }

    /// Updates a node's popularity (clamped to 100). Unknown ids are a no-op.
    pub fn update_popularity(&mut self, id: Uuid, popularity: u8) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.popularity = popularity.min(100);
        }
    }

    /// Updates a node's description. Unknown ids are a no-op.
    pub fn update_description(&mut self, id: Uuid, description: impl Into<String>) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.description = description.into();
        }
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Exports the full catalog with metadata and a content fingerprint.
    #[must_use]
    pub fn export_graph(&self) -> GraphExport {
        let nodes: Vec<TechNode> = self.iter_nodes().cloned().collect();
        let edges: Vec<Edge> = self.iter_edges().cloned().collect();

        let mut categories = Vec::new();
        for node in &nodes {
            if !categories.contains(&node.category) {
                categories.push(node.category);
            }
        }

        let fingerprint = Self::fingerprint(&nodes, &edges);
        GraphExport {
            metadata: GraphMetadata {
                node_count: nodes.len(),
                edge_count: edges.len(),
                categories,
                fingerprint,
            },
            nodes,
            edges,
        }
    }

    fn fingerprint(nodes: &[TechNode], edges: &[Edge]) -> String {
        let mut lines: Vec<String> = nodes
            .iter()
            .map(|n| format!("node|{}|{}|{}", n.id, n.label, n.category))
            .chain(
                edges
                    .iter()
                    .map(|e| format!("edge|{}|{}|{}|{}", e.id, e.source, e.target, e.kind)),
            )
            .collect();
        lines.sort();

        let mut hasher = Sha256::new();
        hasher.update(lines.join("\n").as_bytes());
        let digest = hasher.finalize();
        format!("{digest:x}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::events::{EventKind, InMemoryEventLog};

    fn test_graph() -> TechGraph {
        TechGraph::with_defaults()
    }

    #[test]
    fn add_node_assigns_unique_ids() {
        let mut graph = test_graph();
        let a = graph.add_node(TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage));
        let b = graph.add_node(TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage));

        assert_ne!(a, b);
        assert_eq!(graph.node_count(), 2);
    }

    #[test]
    fn popularity_is_clamped() {
        let mut graph = test_graph();
        let id = graph.add_node(
            TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage).with_popularity(255),
        );
        assert_eq!(graph.node(id).unwrap().popularity, 100);

        graph.update_popularity(id, 130);
        assert_eq!(graph.node(id).unwrap().popularity, 100);
    }

    #[test]
    fn description_is_mutable_and_unknown_ids_are_ignored() {
        let mut graph = test_graph();
        let id = graph.add_node(TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage));

        graph.update_description(id, "Systems programming language");
        assert_eq!(
            graph.node(id).unwrap().description,
            "Systems programming language"
        );

        graph.update_description(Uuid::new_v4(), "ignored");
        graph.update_popularity(Uuid::new_v4(), 50);
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn add_edge_rejects_missing_endpoints() {
        let mut graph = test_graph();
        let a = graph.add_node(TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage));

        let err = graph
            .add_edge(a, Uuid::new_v4(), EdgeKind::Uses)
            .expect_err("missing target should fail");
        assert_eq!(err.code, "edge_target_missing");

        let err = graph
            .add_edge(Uuid::new_v4(), a, EdgeKind::Uses)
            .expect_err("missing source should fail");
        assert_eq!(err.code, "edge_source_missing");
    }

    #[test]
    fn adjacency_is_undirected_and_insertion_ordered() {
        let mut graph = test_graph();
        let a = graph.add_node(TechNodeSpec::new("A", TechCategory::Library));
        let b = graph.add_node(TechNodeSpec::new("B", TechCategory::Library));
        let c = graph.add_node(TechNodeSpec::new("C", TechCategory::Library));

        graph.add_edge(a, c, EdgeKind::Uses).unwrap();
        graph.add_edge(a, b, EdgeKind::Uses).unwrap();
        graph.add_edge(b, a, EdgeKind::RelatedTo).unwrap();

        assert_eq!(graph.neighbors(a), &[c, b]);
        assert_eq!(graph.neighbors(c), &[a]);
        assert_eq!(graph.neighbors(b), &[a]);
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn find_node_by_label_first_match_wins() {
        let mut graph = test_graph();
        let first = graph
            .add_node(TechNodeSpec::new("React", TechCategory::Framework).with_popularity(90));
        graph.add_node(TechNodeSpec::new("react", TechCategory::Library));

        assert_eq!(graph.find_node_by_label("REACT").unwrap().id, first);
        assert!(graph.find_node_by_label("Vue").is_none());
    }

    #[test]
    fn search_nodes_filters_are_anded() {
        let mut graph = test_graph();
        graph.add_node(
            TechNodeSpec::new("PostgreSQL", TechCategory::Database)
                .with_popularity(85)
                .with_tag("sql"),
        );
        graph.add_node(
            TechNodeSpec::new("SQLite", TechCategory::Database)
                .with_popularity(70)
                .with_tag("sql")
                .with_tag("embedded"),
        );
        graph.add_node(TechNodeSpec::new("Redis", TechCategory::Database).with_popularity(80));

        let filter = NodeFilter {
            min_popularity: Some(75),
            tags: vec!["sql".to_string()],
            ..NodeFilter::default()
        };
        let hits = graph.search_nodes("", &filter);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "PostgreSQL");

        let hits = graph.search_nodes("sqlite", &NodeFilter::default());
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].label, "SQLite");
    }

    #[test]
    fn export_includes_metadata_and_stable_fingerprint() {
        let mut graph = test_graph();
        let a = graph.add_node(TechNodeSpec::new("Rust", TechCategory::ProgrammingLanguage));
        let b = graph.add_node(TechNodeSpec::new("Tokio", TechCategory::Library));
        graph.add_edge(b, a, EdgeKind::DependsOn).unwrap();

        let export = graph.export_graph();
        assert_eq!(export.metadata.node_count, 2);
        assert_eq!(export.metadata.edge_count, 1);
        assert_eq!(
            export.metadata.categories,
            vec![TechCategory::ProgrammingLanguage, TechCategory::Library]
        );

        let again = graph.export_graph();
        assert_eq!(export.metadata.fingerprint, again.metadata.fingerprint);

        graph.add_node(TechNodeSpec::new("Serde", TechCategory::Library));
        let changed = graph.export_graph();
        assert_ne!(export.metadata.fingerprint, changed.metadata.fingerprint);
    }

    #[test]
    fn mutations_emit_events() {
        let bus = Arc::new(EventBus::new());
        let log = Arc::new(InMemoryEventLog::new());
        bus.subscribe(None, log.clone());

        let mut graph = TechGraph::new(bus, Arc::new(RandomIds));
        let a = graph.add_node(TechNodeSpec::new("A", TechCategory::Tool));
        let b = graph.add_node(TechNodeSpec::new("B", TechCategory::Tool));
        graph.add_edge(a, b, EdgeKind::RelatedTo).unwrap();

        let kinds: Vec<EventKind> = log.events().iter().map(|e| e.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::NodeAdded,
                EventKind::NodeAdded,
                EventKind::EdgeAdded
            ]
        );
    }
}
