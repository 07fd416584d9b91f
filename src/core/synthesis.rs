//! Learning path synthesis.
//!
//! Turns skill gaps into a deduplicated curriculum: shortest-path nodes
//! plus the direct prerequisites of every included node, ordered so that a
//! prerequisite always precedes its dependent, with ascending difficulty
//! deciding between unrelated nodes.

use crate::core::catalog::{Difficulty, EdgeKind, TechGraph};
use crate::core::events::{EventBus, EventPayload};
use crate::core::gaps::GapAnalyzer;
use crate::core::ids::IdGenerator;
use crate::core::paths::{LearningNode, LearningNodeKind, LearningPath};
use crate::core::profile::{Audience, UserProfile};
use crate::core::query::QueryEngine;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

/// Author recorded on synthesized paths.
const SYNTHESIZED_BY: &str = "wayfinder";

/// Synthesizes learning paths from skill gaps.
pub struct PathSynthesizer<'g> {
    graph: &'g TechGraph,
    bus: Arc<EventBus>,
    ids: Arc<dyn IdGenerator>,
}

impl<'g> PathSynthesizer<'g> {
    /// Creates a synthesizer over the given graph.
    #[must_use]
    pub fn new(graph: &'g TechGraph, bus: Arc<EventBus>, ids: Arc<dyn IdGenerator>) -> Self {
        Self { graph, bus, ids }
    }

    /// Builds an ordered curriculum that takes the learner from their
    /// current skills to the target skills.
    ///
    /// Given an unchanged graph and identical inputs, the node set and
    /// relative order are reproducible; only assigned ids differ between
    /// calls (and do not differ under a sequential generator).
    #[must_use]
    pub fn synthesize(&self, profile: &UserProfile, targets: &[String]) -> LearningPath {
        let gaps = GapAnalyzer::new(self.graph).compute_gaps(&profile.skill_names(), targets);
        let engine = QueryEngine::new(self.graph);

        // Collect the skill ids to teach, in discovery order.
        let mut included: Vec<Uuid> = Vec::new();
        let mut seen: HashSet<Uuid> = HashSet::new();
        for gap in &gaps {
            let mut path = engine.shortest_path(&gap.from, &gap.to);
            if path.is_empty() {
                // The gap's `from` did not resolve (baseline sentinel); the
                // target still enters the curriculum on its own.
                if let Some(target) = self.graph.find_node_by_label(&gap.to) {
                    path = vec![target.id];
                }
            }
            for id in path {
                if seen.insert(id) {
                    included.push(id);
                }
            }
        }

        // One level of prerequisite inclusion: every skill on a path brings
        // its direct prerequisites along. Deeper references stay external.
        for id in included.clone() {
            for prerequisite in self.prerequisites_of(id) {
                if seen.insert(prerequisite) {
                    included.push(prerequisite);
                }
            }
        }

        let nodes: Vec<LearningNode> = included
            .iter()
            .filter_map(|id| self.graph.node(*id))
            .map(|tech| LearningNode {
                id: self.ids.next_id(),
                skill_id: tech.id,
                title: format!("Learn {}", tech.label),
                description: tech.description.clone(),
                kind: LearningNodeKind::for_category(tech.category),
                estimated_hours: tech.difficulty.estimated_hours(),
                difficulty: tech.difficulty,
                prerequisites: self.prerequisites_of(tech.id),
                order: 0,
            })
            .collect();

        let mut nodes = order_nodes(nodes);
        for (i, node) in nodes.iter_mut().enumerate() {
            node.order = (i + 1) as u32;
        }

        let path = self.package(profile, targets, nodes);
        self.bus.emit(EventPayload::PathSynthesized {
            path_id: path.id,
            node_count: path.nodes.len(),
            total_hours: path.total_hours,
        });
        path
    }

    /// Direct prerequisites of a skill: targets of its outgoing depends-on
    /// edges plus sources of its incoming prerequisite edges.
    fn prerequisites_of(&self, skill_id: Uuid) -> Vec<Uuid> {
        let mut prerequisites = Vec::new();
        for edge in self.graph.iter_edges() {
            let prerequisite = match edge.kind {
                EdgeKind::DependsOn if edge.source == skill_id => Some(edge.target),
                EdgeKind::Prerequisite if edge.target == skill_id => Some(edge.source),
                _ => None,
            };
            if let Some(p) = prerequisite {
                if !prerequisites.contains(&p) {
                    prerequisites.push(p);
                }
            }
        }
        prerequisites
    }

    fn package(
        &self,
        profile: &UserProfile,
        targets: &[String],
        nodes: Vec<LearningNode>,
    ) -> LearningPath {
        let included: HashSet<Uuid> = nodes.iter().map(|n| n.skill_id).collect();

        let total_hours = nodes.iter().map(|n| n.estimated_hours).sum();
        let difficulty = nodes
            .iter()
            .map(|n| n.difficulty)
            .max()
            .unwrap_or(Difficulty::Beginner);

        let mut external_prerequisites = Vec::new();
        for node in &nodes {
            for prerequisite in &node.prerequisites {
                if included.contains(prerequisite) {
                    continue;
                }
                if let Some(tech) = self.graph.node(*prerequisite) {
                    if !external_prerequisites.contains(&tech.label) {
                        external_prerequisites.push(tech.label.clone());
                    }
                }
            }
        }

        let outcomes: Vec<String> = nodes
            .iter()
            .filter_map(|n| self.graph.node(n.skill_id))
            .map(|tech| tech.label.clone())
            .collect();

        let mut tags = std::collections::BTreeSet::new();
        for target in targets {
            if let Some(tech) = self.graph.find_node_by_label(target) {
                tags.extend(tech.tags.iter().cloned());
            }
        }

        let category = self.dominant_category(&nodes);

        let now = Utc::now();
        LearningPath {
            id: self.ids.next_id(),
            title: format!("Learning path to {}", targets.join(", ")),
            description: format!(
                "Covers {} in dependency order",
                if outcomes.is_empty() {
                    "no catalog skills".to_string()
                } else {
                    outcomes.join(", ")
                }
            ),
            target_audience: Audience::for_profile(profile),
            total_hours,
            difficulty,
            nodes,
            external_prerequisites,
            outcomes,
            category,
            author: SYNTHESIZED_BY.to_string(),
            created_at: now,
            updated_at: now,
            tags,
        }
    }

    /// Most frequent technology category among the included skills, ties
    /// broken by path order.
    fn dominant_category(&self, nodes: &[LearningNode]) -> Option<String> {
        let mut counts: Vec<(String, usize)> = Vec::new();
        for node in nodes {
            let Some(tech) = self.graph.node(node.skill_id) else {
                continue;
            };
            let name = tech.category.to_string();
            match counts.iter_mut().find(|(c, _)| *c == name) {
                Some((_, count)) => *count += 1,
                None => counts.push((name, 1)),
            }
        }
        counts
            .into_iter()
            .fold(None::<(String, usize)>, |best, candidate| match best {
                Some((_, count)) if count >= candidate.1 => best,
                _ => Some(candidate),
            })
            .map(|(name, _)| name)
    }
}

/// Orders learning nodes so every in-path prerequisite precedes its
/// dependent, with ascending difficulty deciding between ready nodes and
/// insertion order as the stable tie-break.
///
/// A deterministic selection loop rather than a comparator sort: the
/// pairwise "prerequisite after, otherwise difficulty" relation is not a
/// total order, which `sort_by` rejects. A prerequisite cycle (behavior
/// unspecified by design) degrades to emitting the earliest remaining node
/// so the pass always terminates with every node placed.
fn order_nodes(nodes: Vec<LearningNode>) -> Vec<LearningNode> {
    let in_path: HashSet<Uuid> = nodes.iter().map(|n| n.skill_id).collect();
    let mut remaining = nodes;
    let mut placed: HashSet<Uuid> = HashSet::new();
    let mut ordered = Vec::with_capacity(remaining.len());

    while !remaining.is_empty() {
        let mut best: Option<usize> = None;
        for (i, node) in remaining.iter().enumerate() {
            let ready = node
                .prerequisites
                .iter()
                .all(|p| !in_path.contains(p) || placed.contains(p));
            if ready && best.is_none_or(|b| node.difficulty < remaining[b].difficulty) {
                best = Some(i);
            }
        }
        let node = remaining.remove(best.unwrap_or(0));
        placed.insert(node.skill_id);
        ordered.push(node);
    }
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{TechCategory, TechNodeSpec};
    use crate::core::ids::{RandomIds, SequentialIds};
    use crate::core::profile::SkillLevel;

    fn synthesizer(graph: &TechGraph) -> PathSynthesizer<'_> {
        PathSynthesizer::new(graph, Arc::new(EventBus::new()), Arc::new(RandomIds))
    }

    /// Catalog from the worked example: TypeScript extends JavaScript,
    /// React depends on JavaScript.
    fn web_catalog() -> (TechGraph, Uuid, Uuid) {
        let mut graph = TechGraph::with_defaults();
        let js = graph.add_node(
            TechNodeSpec::new("JavaScript", TechCategory::ProgrammingLanguage)
                .with_popularity(95)
                .with_tag("web"),
        );
        let ts = graph.add_node(
            TechNodeSpec::new("TypeScript", TechCategory::ProgrammingLanguage)
                .with_popularity(85)
                .with_difficulty(Difficulty::Intermediate),
        );
        let react = graph.add_node(
            TechNodeSpec::new("React", TechCategory::Framework)
                .with_popularity(90)
                .with_difficulty(Difficulty::Intermediate)
                .with_tag("frontend"),
        );
        graph.add_edge(ts, js, EdgeKind::Extends).unwrap();
        graph.add_edge(react, js, EdgeKind::DependsOn).unwrap();
        (graph, js, react)
    }

    #[test]
    fn react_path_for_a_blank_profile_teaches_javascript_first() {
        let (graph, js, react) = web_catalog();
        let synth = synthesizer(&graph);

        let path = synth.synthesize(&UserProfile::new("u1"), &["React".to_string()]);

        let skills: Vec<Uuid> = path.nodes.iter().map(|n| n.skill_id).collect();
        let js_pos = skills.iter().position(|s| *s == js).expect("JavaScript node");
        let react_pos = skills.iter().position(|s| *s == react).expect("React node");
        assert!(js_pos < react_pos);

        assert_eq!(path.target_audience, Audience::Novice);
        assert_eq!(path.difficulty, Difficulty::Intermediate);
        assert!(path.external_prerequisites.is_empty());
        assert!(path.tags.contains("frontend"));
        assert_eq!(path.category.as_deref(), Some("programming-language"));
    }

    #[test]
    fn orders_are_renumbered_and_respect_prerequisites() {
        let (graph, _js, _react) = web_catalog();
        let synth = synthesizer(&graph);

        let path = synth.synthesize(
            &UserProfile::new("u1"),
            &["React".to_string(), "TypeScript".to_string()],
        );

        let orders: Vec<u32> = path.nodes.iter().map(|n| n.order).collect();
        assert_eq!(orders, (1..=path.nodes.len() as u32).collect::<Vec<_>>());

        for node in &path.nodes {
            for prerequisite in &node.prerequisites {
                if let Some(dep) = path.nodes.iter().find(|n| n.skill_id == *prerequisite) {
                    assert!(
                        dep.order < node.order,
                        "{} must precede {}",
                        dep.title,
                        node.title
                    );
                }
            }
        }
    }

    #[test]
    fn second_level_prerequisites_stay_external() {
        let mut graph = TechGraph::with_defaults();
        let js = graph.add_node(TechNodeSpec::new(
            "JavaScript",
            TechCategory::ProgrammingLanguage,
        ));
        let react = graph.add_node(
            TechNodeSpec::new("React", TechCategory::Framework)
                .with_difficulty(Difficulty::Intermediate),
        );
        let next = graph.add_node(
            TechNodeSpec::new("Next.js", TechCategory::Framework)
                .with_difficulty(Difficulty::Advanced),
        );
        graph.add_edge(react, js, EdgeKind::DependsOn).unwrap();
        graph.add_edge(next, react, EdgeKind::DependsOn).unwrap();

        let synth = synthesizer(&graph);
        let path = synth.synthesize(&UserProfile::new("u1"), &["Next.js".to_string()]);

        // Next.js brings React along; React's own prerequisite stays out.
        let skills: Vec<Uuid> = path.nodes.iter().map(|n| n.skill_id).collect();
        assert!(skills.contains(&next));
        assert!(skills.contains(&react));
        assert!(!skills.contains(&js));
        assert_eq!(path.external_prerequisites, vec!["JavaScript".to_string()]);
    }

    #[test]
    fn known_skill_path_walks_the_graph() {
        let mut graph = TechGraph::with_defaults();
        let js = graph.add_node(TechNodeSpec::new(
            "JavaScript",
            TechCategory::ProgrammingLanguage,
        ));
        let react = graph.add_node(
            TechNodeSpec::new("React", TechCategory::Framework)
                .with_difficulty(Difficulty::Intermediate),
        );
        let next = graph.add_node(
            TechNodeSpec::new("Next.js", TechCategory::Framework)
                .with_difficulty(Difficulty::Advanced),
        );
        graph.add_edge(react, js, EdgeKind::DependsOn).unwrap();
        graph.add_edge(next, react, EdgeKind::DependsOn).unwrap();

        let synth = synthesizer(&graph);
        let profile = UserProfile::new("u1").with_skill("JavaScript", SkillLevel::Advanced);
        let path = synth.synthesize(&profile, &["Next.js".to_string()]);

        let skills: Vec<Uuid> = path.nodes.iter().map(|n| n.skill_id).collect();
        assert_eq!(skills, vec![js, react, next]);
        assert_eq!(path.target_audience, Audience::Senior);
        assert_eq!(path.total_hours, 20 + 40 + 80);
        assert_eq!(path.difficulty, Difficulty::Advanced);
    }

    #[test]
    fn unresolvable_target_yields_an_empty_curriculum() {
        let (graph, _js, _react) = web_catalog();
        let synth = synthesizer(&graph);

        let path = synth.synthesize(&UserProfile::new("u1"), &["Quantum".to_string()]);
        assert!(path.nodes.is_empty());
        assert_eq!(path.total_hours, 0);
        assert_eq!(path.difficulty, Difficulty::Beginner);
    }

    #[test]
    fn synthesis_is_deterministic_under_sequential_ids() {
        let build = || {
            let bus = Arc::new(EventBus::new());
            let ids: Arc<dyn IdGenerator> = Arc::new(SequentialIds::new());
            let mut graph = TechGraph::new(bus.clone(), ids.clone());
            let js = graph.add_node(TechNodeSpec::new(
                "JavaScript",
                TechCategory::ProgrammingLanguage,
            ));
            let react = graph.add_node(
                TechNodeSpec::new("React", TechCategory::Framework)
                    .with_difficulty(Difficulty::Intermediate),
            );
            graph.add_edge(react, js, EdgeKind::DependsOn).unwrap();
            (graph, bus, ids)
        };

        let (graph_a, bus_a, ids_a) = build();
        let (graph_b, bus_b, ids_b) = build();
        let path_a = PathSynthesizer::new(&graph_a, bus_a, ids_a)
            .synthesize(&UserProfile::new("u1"), &["React".to_string()]);
        let path_b = PathSynthesizer::new(&graph_b, bus_b, ids_b)
            .synthesize(&UserProfile::new("u1"), &["React".to_string()]);

        // Timestamps aside, the two paths are structurally identical.
        assert_eq!(path_a.id, path_b.id);
        assert_eq!(path_a.nodes, path_b.nodes);
        assert_eq!(path_a.outcomes, path_b.outcomes);
    }
}
