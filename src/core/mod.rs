//! Core domain: catalog, queries, gaps, synthesis, paths, and events.
//!
//! The engine is a synchronous, in-memory library. State lives in keyed
//! maps owned exclusively by two components and every mutation goes through
//! their public operations, which announce themselves on the event bus.
//!
//! # Architecture
//!
//! ```text
//! catalog (nodes + edges + adjacency)
//!    ↑ reads                ↑ reads
//! query (BFS / DFS)  ←  gaps (nearest known skill)
//!                           ↑
//!                      synthesis (ordered curriculum)
//!                           ↓ stores
//!                      paths (search / recommend / progress)
//! ```
//!
//! # Key Concepts
//!
//! ## Catalog
//!
//! [`catalog::TechGraph`] owns the technology nodes, the typed edges, and
//! an undirected adjacency index with insertion-ordered neighbor lists so
//! traversal tie-breaking is deterministic.
//!
//! ## Queries
//!
//! [`query::QueryEngine`] runs unweighted BFS shortest paths and
//! depth-bounded DFS neighborhoods. A disconnected query falls back to a
//! single-element result holding the target id; see
//! [`query::QueryEngine::shortest_path`].
//!
//! ## Synthesis
//!
//! [`gaps::GapAnalyzer`] finds the closest known skill per target;
//! [`synthesis::PathSynthesizer`] turns gaps into a deduplicated,
//! prerequisite-respecting, difficulty-ordered [`paths::LearningPath`].
//!
//! ## Progress
//!
//! [`paths::PathRepository`] indexes stored paths and tracks per-user
//! completion; percent values are clamped to [0, 100] and node completion
//! is idempotent.
//!
//! ## Events and errors
//!
//! Mutations emit typed events through [`events::EventBus`]; a failing
//! subscriber is logged and never aborts the mutation. Structural
//! violations surface as [`error::WayfinderError`]; read paths degrade to
//! empty results instead of failing.
//!
//! # Modules
//!
//! - [`catalog`] - Node/edge store and adjacency index
//! - [`query`] - BFS shortest path and bounded DFS neighborhoods
//! - [`gaps`] - Skill gap analysis
//! - [`synthesis`] - Learning path synthesis and ordering
//! - [`paths`] - Path repository, search, recommendation, progress
//! - [`profile`] - Consumed learner profiles and audience tiers
//! - [`events`] - Event bus, payloads, and the in-memory log
//! - [`ids`] - Injectable id generation
//! - [`error`] - Structured error types
//! - [`engine`] - The `Wayfinder` service facade

pub mod catalog;
pub mod engine;
pub mod error;
pub mod events;
pub mod gaps;
pub mod ids;
pub mod paths;
pub mod profile;
pub mod query;
pub mod synthesis;
