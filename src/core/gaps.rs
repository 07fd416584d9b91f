//! Skill gap analysis.
//!
//! A gap measures the distance between what a learner already knows and a
//! target skill. Targets that the catalog has not modeled yet are treated
//! permissively: they get default difficulty and effort instead of an error.

use crate::core::catalog::{Difficulty, TechGraph};
use crate::core::query::QueryEngine;
use serde::{Deserialize, Serialize};

/// Sentinel `from` value when none of the learner's skills is close enough
/// to the target.
pub const BASELINE_SKILL: &str = "beginner";

/// Maximum shortest-path length (in nodes) for a known skill to count as
/// the starting point of a gap.
const MAX_GAP_PATH_LEN: usize = 3;

/// The computed distance and effort between a known skill and a target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillGap {
    /// Closest known skill, or [`BASELINE_SKILL`].
    pub from: String,
    /// Target skill name as requested.
    pub to: String,
    /// Learning-curve difficulty copied from the target node.
    pub difficulty: Difficulty,
    /// Estimated effort in hours, from the per-difficulty table.
    pub estimated_hours: u32,
}

/// Computes skill gaps against the catalog.
pub struct GapAnalyzer<'g> {
    graph: &'g TechGraph,
}

impl<'g> GapAnalyzer<'g> {
    /// Creates an analyzer over the given graph.
    #[must_use]
    pub fn new(graph: &'g TechGraph) -> Self {
        Self { graph }
    }

    /// Computes one gap per target skill.
    ///
    /// For each target, the learner's current skills are scanned in order
    /// and the first one whose shortest path to the target spans at most
    /// [`MAX_GAP_PATH_LEN`] nodes becomes the gap's `from`; otherwise the
    /// baseline sentinel is used. An unresolvable target never fails: it
    /// defaults to intermediate difficulty and its 40-hour estimate.
    #[must_use]
    pub fn compute_gaps(&self, current: &[String], targets: &[String]) -> Vec<SkillGap> {
        let engine = QueryEngine::new(self.graph);
        targets
            .iter()
            .map(|target| {
                let from = current
                    .iter()
                    .find(|skill| {
                        let path = engine.shortest_path(skill, target);
                        !path.is_empty() && path.len() <= MAX_GAP_PATH_LEN
                    })
                    .cloned()
                    .unwrap_or_else(|| BASELINE_SKILL.to_string());

                let difficulty = self
                    .graph
                    .find_node_by_label(target)
                    .map_or(Difficulty::Intermediate, |node| node.difficulty);

                tracing::debug!(%target, %from, %difficulty, "computed skill gap");
                SkillGap {
                    from,
                    to: target.clone(),
                    difficulty,
                    estimated_hours: difficulty.estimated_hours(),
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::{EdgeKind, TechCategory, TechNodeSpec};

    fn sample_graph() -> TechGraph {
        let mut graph = TechGraph::with_defaults();
        let js = graph.add_node(
            TechNodeSpec::new("JavaScript", TechCategory::ProgrammingLanguage)
                .with_difficulty(Difficulty::Beginner),
        );
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
        graph
    }

    #[test]
    fn close_known_skill_becomes_from() {
        let graph = sample_graph();
        let analyzer = GapAnalyzer::new(&graph);

        let gaps = analyzer.compute_gaps(
            &["JavaScript".to_string()],
            &["Next.js".to_string()],
        );
        assert_eq!(gaps.len(), 1);
        assert_eq!(gaps[0].from, "JavaScript");
        assert_eq!(gaps[0].to, "Next.js");
        assert_eq!(gaps[0].difficulty, Difficulty::Advanced);
        assert_eq!(gaps[0].estimated_hours, 80);
    }

    #[test]
    fn no_current_skills_falls_back_to_baseline() {
        let graph = sample_graph();
        let analyzer = GapAnalyzer::new(&graph);

        let gaps = analyzer.compute_gaps(&[], &["React".to_string()]);
        assert_eq!(gaps[0].from, BASELINE_SKILL);
        assert_eq!(gaps[0].estimated_hours, 40);
    }

    #[test]
    fn unknown_current_skill_falls_back_to_baseline() {
        let graph = sample_graph();
        let analyzer = GapAnalyzer::new(&graph);

        let gaps = analyzer.compute_gaps(&["Fortran".to_string()], &["React".to_string()]);
        assert_eq!(gaps[0].from, BASELINE_SKILL);
    }

    #[test]
    fn unresolvable_target_gets_permissive_defaults() {
        let graph = sample_graph();
        let analyzer = GapAnalyzer::new(&graph);

        let gaps = analyzer.compute_gaps(&["JavaScript".to_string()], &["Quantum".to_string()]);
        assert_eq!(gaps[0].difficulty, Difficulty::Intermediate);
        assert_eq!(gaps[0].estimated_hours, 40);
        // The target never resolved, so no current skill can reach it.
        assert_eq!(gaps[0].from, BASELINE_SKILL);
    }
}
