//! Learner profiles.
//!
//! Profiles are consumed, not owned: an external provider supplies the
//! learner id and a flat (skill, level) list, and this crate only reads it.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Self-assessed level for one skill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    None,
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    /// Ordinal score used for averaging: none=0 through expert=4.
    #[must_use]
    pub fn score(self) -> u32 {
        match self {
            Self::None => 0,
            Self::Beginner => 1,
            Self::Intermediate => 2,
            Self::Advanced => 3,
            Self::Expert => 4,
        }
    }
}

/// One (skill name, level) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSkill {
    pub name: String,
    pub level: SkillLevel,
}

impl UserSkill {
    /// Creates a skill entry.
    #[must_use]
    pub fn new(name: impl Into<String>, level: SkillLevel) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// A learner's profile as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub user_id: String,
    pub skills: Vec<UserSkill>,
}

impl UserProfile {
    /// Creates a profile with no recorded skills.
    #[must_use]
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            skills: Vec::new(),
        }
    }

    /// Adds a skill entry.
    #[must_use]
    pub fn with_skill(mut self, name: impl Into<String>, level: SkillLevel) -> Self {
        self.skills.push(UserSkill::new(name, level));
        self
    }

    /// Returns the skill names in profile order.
    #[must_use]
    pub fn skill_names(&self) -> Vec<String> {
        self.skills.iter().map(|s| s.name.clone()).collect()
    }

    /// Average ordinal skill score; 0.0 for an empty skill list.
    #[must_use]
    pub fn average_level(&self) -> f64 {
        if self.skills.is_empty() {
            return 0.0;
        }
        let total: u32 = self.skills.iter().map(|s| s.level.score()).sum();
        f64::from(total) / self.skills.len() as f64
    }
}

/// Four-tier target audience bucket for a synthesized path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Audience {
    Novice,
    Junior,
    Intermediate,
    Senior,
}

impl Audience {
    /// Buckets an average skill score: <1 novice, <2 junior, <3
    /// intermediate, otherwise senior.
    #[must_use]
    pub fn from_average(average: f64) -> Self {
        if average < 1.0 {
            Self::Novice
        } else if average < 2.0 {
            Self::Junior
        } else if average < 3.0 {
            Self::Intermediate
        } else {
            Self::Senior
        }
    }

    /// Buckets a learner profile via its average skill level.
    #[must_use]
    pub fn for_profile(profile: &UserProfile) -> Self {
        Self::from_average(profile.average_level())
    }
}

impl std::fmt::Display for Audience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Novice => write!(f, "novice"),
            Self::Junior => write!(f, "junior"),
            Self::Intermediate => write!(f, "intermediate"),
            Self::Senior => write!(f, "senior"),
        }
    }
}
