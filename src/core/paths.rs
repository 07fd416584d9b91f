//! Learning paths and the path repository.
//!
//! A learning path is an ordered, prerequisite-respecting curriculum. The
//! repository owns path storage, tag and difficulty indexes, text search,
//! recommendation, and per-user progress tracking. Lookups degrade
//! permissively: unknown paths, nodes, and users produce no-ops or empty
//! results, never errors.

use crate::core::catalog::{Difficulty, TechCategory};
use crate::core::events::{EventBus, EventPayload};
use crate::core::profile::Audience;
use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;
use uuid::Uuid;

/// Kind of a scheduled study unit, derived from the technology category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum LearningNodeKind {
    Concept,
    Tutorial,
    Practice,
}

impl LearningNodeKind {
    /// Maps a technology category to a study-unit kind: languages and
    /// specifications are concepts, frameworks and platforms are tutorials,
    /// databases and tools are practice.
    #[must_use]
    pub fn for_category(category: TechCategory) -> Self {
        match category {
            TechCategory::ProgrammingLanguage
            | TechCategory::Protocol
            | TechCategory::Standard => Self::Concept,
            TechCategory::Framework
            | TechCategory::Library
            | TechCategory::Platform
            | TechCategory::Service => Self::Tutorial,
            TechCategory::Database | TechCategory::Tool => Self::Practice,
        }
    }
}

/// One scheduled unit of study inside a learning path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningNode {
    /// Unique id of this study unit.
    pub id: Uuid,
    /// The technology node this unit teaches.
    pub skill_id: Uuid,
    /// Display title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Study-unit kind.
    pub kind: LearningNodeKind,
    /// Estimated duration in hours.
    pub estimated_hours: u32,
    /// Difficulty of the underlying skill.
    pub difficulty: Difficulty,
    /// Prerequisite skill ids.
    pub prerequisites: Vec<Uuid>,
    /// 1-based position within the path.
    pub order: u32,
}

/// An ordered curriculum reaching a set of target skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningPath {
    /// Unique id.
    pub id: Uuid,
    /// Display title.
    pub title: String,
    /// Description.
    pub description: String,
    /// Learner tier this path is aimed at.
    pub target_audience: Audience,
    /// Sum of node durations.
    pub total_hours: u32,
    /// Maximum node difficulty.
    pub difficulty: Difficulty,
    /// Ordered study units. A node's in-path prerequisite always occupies
    /// a smaller `order`.
    pub nodes: Vec<LearningNode>,
    /// Display names of prerequisite skills referenced but not included.
    pub external_prerequisites: Vec<String>,
    /// Names of the skills this path produces.
    pub outcomes: Vec<String>,
    /// Dominant technology category of the included skills, when known.
    #[serde(default)]
    pub category: Option<String>,
    /// Author identifier.
    pub author: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Tag set.
    pub tags: BTreeSet<String>,
}

/// Search filter for learning paths. A default filter passes everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PathFilter {
    /// Keep paths at any of these difficulties.
    #[serde(default)]
    pub difficulty: Vec<Difficulty>,
    /// Keep paths carrying any of these tags.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Keep only paths aimed at this audience.
    #[serde(default)]
    pub target_audience: Option<Audience>,
}

/// Aggregate statistics over the stored paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathStats {
    pub total_paths: usize,
    pub by_difficulty: BTreeMap<Difficulty, usize>,
    pub by_category: BTreeMap<String, usize>,
    pub average_hours: f64,
}

/// One tag with its usage count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

#[derive(Debug, Default)]
struct PathProgress {
    percent: f64,
    completed: HashSet<Uuid>,
}

/// In-memory learning-path repository.
pub struct PathRepository {
    paths: HashMap<Uuid, LearningPath>,
    path_order: Vec<Uuid>,
    by_tag: HashMap<String, Vec<Uuid>>,
    by_difficulty: HashMap<Difficulty, Vec<Uuid>>,
    progress: HashMap<String, HashMap<Uuid, PathProgress>>,
    bus: Arc<EventBus>,
}

impl PathRepository {
    /// Creates an empty repository wired to the given bus.
    #[must_use]
    pub fn new(bus: Arc<EventBus>) -> Self {
        Self {
            paths: HashMap::new(),
            path_order: Vec::new(),
            by_tag: HashMap::new(),
            by_difficulty: HashMap::new(),
            progress: HashMap::new(),
            bus,
        }
    }

    /// Creates an empty repository with a private bus.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(Arc::new(EventBus::new()))
    }

    /// Stores a path, indexing it under each tag and its difficulty bucket.
    ///
    /// Re-adding an existing id replaces the stored path and its index
    /// entries.
    pub fn add_path(&mut self, path: LearningPath) {
        let id = path.id;
        if let Some(previous) = self.paths.remove(&id) {
            self.unindex(&previous);
        } else {
            self.path_order.push(id);
        }

        for tag in &path.tags {
            self.by_tag
                .entry(tag.to_lowercase())
                .or_default()
                .push(id);
        }
        self.by_difficulty.entry(path.difficulty).or_default().push(id);

        let title = path.title.clone();
        self.paths.insert(id, path);
        self.bus.emit(EventPayload::PathAdded { path_id: id, title });
    }

    fn unindex(&mut self, path: &LearningPath) {
        for tag in &path.tags {
            if let Some(ids) = self.by_tag.get_mut(&tag.to_lowercase()) {
                ids.retain(|id| *id != path.id);
            }
        }
        if let Some(ids) = self.by_difficulty.get_mut(&path.difficulty) {
            ids.retain(|id| *id != path.id);
        }
    }

    /// Looks up a path by id.
    #[must_use]
    pub fn path(&self, id: Uuid) -> Option<&LearningPath> {
        self.paths.get(&id)
    }

    /// Returns the number of stored paths.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.paths.len()
    }

    /// Searches paths by substring query and filter, in insertion order.
    ///
    /// The query matches case-insensitively against title, description,
    /// and tags when non-empty. Filter criteria are ANDed; the difficulty
    /// and tag criteria each match any-of.
    #[must_use]
    pub fn search_paths(&self, query: &str, filter: &PathFilter) -> Vec<&LearningPath> {
        let candidates = self.filter_candidates(filter);
        let needle = query.trim().to_lowercase();

        self.path_order
            .iter()
            .filter(|id| candidates.as_ref().is_none_or(|set| set.contains(*id)))
            .filter_map(|id| self.paths.get(id))
            .filter(|path| {
                if !needle.is_empty() {
                    let text_match = path.title.to_lowercase().contains(&needle)
                        || path.description.to_lowercase().contains(&needle)
                        || path.tags.iter().any(|t| t.to_lowercase().contains(&needle));
                    if !text_match {
                        return false;
                    }
                }
                filter
                    .target_audience
                    .is_none_or(|audience| path.target_audience == audience)
            })
            .collect()
    }

    /// Resolves the indexed filter criteria to a candidate id set.
    /// `None` means "no index restriction".
    fn filter_candidates(&self, filter: &PathFilter) -> Option<HashSet<Uuid>> {
        let mut candidates: Option<HashSet<Uuid>> = None;

        if !filter.difficulty.is_empty() {
            let set: HashSet<Uuid> = filter
                .difficulty
                .iter()
                .filter_map(|d| self.by_difficulty.get(d))
                .flatten()
                .copied()
                .collect();
            candidates = Some(set);
        }

        if !filter.tags.is_empty() {
            let set: HashSet<Uuid> = filter
                .tags
                .iter()
                .filter_map(|t| self.by_tag.get(&t.to_lowercase()))
                .flatten()
                .copied()
                .collect();
            candidates = Some(match candidates {
                Some(existing) => existing.intersection(&set).copied().collect(),
                None => set,
            });
        }

        candidates
    }

    /// Returns up to `limit` paths the user has not finished, easiest
    /// first.
    ///
    /// Paths at 100% progress for the user are excluded; the remaining
    /// paths sort by ascending difficulty with insertion order as the
    /// stable tie-break.
    #[must_use]
    pub fn recommended_paths(&self, user_id: &str, limit: usize) -> Vec<&LearningPath> {
        let mut remaining: Vec<&LearningPath> = self
            .path_order
            .iter()
            .filter_map(|id| self.paths.get(id))
            .filter(|path| self.user_progress(user_id, path.id) < 100.0)
            .collect();
        remaining.sort_by_key(|path| path.difficulty);
        remaining.truncate(limit);
        remaining
    }

    /// Sets a user's progress on a path, clamped to [0, 100].
    ///
    /// This primitive does not enforce monotonicity; callers own
    /// increase-only semantics where required.
    pub fn update_user_progress(&mut self, user_id: &str, path_id: Uuid, percent: f64) {
        let clamped = percent.clamp(0.0, 100.0);
        self.progress
            .entry(user_id.to_string())
            .or_default()
            .entry(path_id)
            .or_default()
            .percent = clamped;
        self.bus.emit(EventPayload::ProgressUpdated {
            user_id: user_id.to_string(),
            path_id,
            percent: clamped,
        });
    }

    /// Marks one node of a path completed for a user and recomputes the
    /// derived progress percentage.
    ///
    /// Unknown paths and nodes are no-ops; re-marking an already-completed
    /// node has no additional effect.
    pub fn mark_node_completed(&mut self, user_id: &str, path_id: Uuid, node_id: Uuid) {
        let Some(path) = self.paths.get(&path_id) else {
            return;
        };
        if !path.nodes.iter().any(|node| node.id == node_id) {
            return;
        }
        let total = path.nodes.len();

        let record = self
            .progress
            .entry(user_id.to_string())
            .or_default()
            .entry(path_id)
            .or_default();
        if !record.completed.insert(node_id) {
            return;
        }
        let completed = record.completed.len();

        self.bus.emit(EventPayload::NodeCompleted {
            user_id: user_id.to_string(),
            path_id,
            node_id,
        });

        let percent = 100.0 * completed as f64 / total as f64;
        self.update_user_progress(user_id, path_id, percent);
    }

    /// Returns a user's progress on a path; 0 when unknown.
    #[must_use]
    pub fn user_progress(&self, user_id: &str, path_id: Uuid) -> f64 {
        self.progress
            .get(user_id)
            .and_then(|paths| paths.get(&path_id))
            .map_or(0.0, |record| record.percent)
    }

    /// Returns the node ids a user has completed on a path, sorted for
    /// reproducibility.
    #[must_use]
    pub fn completed_nodes(&self, user_id: &str, path_id: Uuid) -> Vec<Uuid> {
        let mut nodes: Vec<Uuid> = self
            .progress
            .get(user_id)
            .and_then(|paths| paths.get(&path_id))
            .map(|record| record.completed.iter().copied().collect())
            .unwrap_or_default();
        nodes.sort();
        nodes
    }

    /// Aggregates statistics over the stored paths.
    #[must_use]
    pub fn path_stats(&self) -> PathStats {
        let mut by_difficulty: BTreeMap<Difficulty, usize> = BTreeMap::new();
        let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
        let mut total_hours: u64 = 0;

        for path in self.paths.values() {
            *by_difficulty.entry(path.difficulty).or_default() += 1;
            if let Some(category) = &path.category {
                *by_category.entry(category.clone()).or_default() += 1;
            }
            total_hours += u64::from(path.total_hours);
        }

        let average_hours = if self.paths.is_empty() {
            0.0
        } else {
            total_hours as f64 / self.paths.len() as f64
        };

        PathStats {
            total_paths: self.paths.len(),
            by_difficulty,
            by_category,
            average_hours,
        }
    }

    /// Returns the `limit` most used tags, most frequent first, ties
    /// alphabetical.
    #[must_use]
    pub fn popular_tags(&self, limit: usize) -> Vec<TagCount> {
        let mut counts: Vec<TagCount> = self
            .by_tag
            .iter()
            .filter(|(_, ids)| !ids.is_empty())
            .map(|(tag, ids)| TagCount {
                tag: tag.clone(),
                count: ids.len(),
            })
            .collect();
        counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.tag.cmp(&b.tag)));
        counts.truncate(limit);
        counts
    }
}
