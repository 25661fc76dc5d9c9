use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ordinal exercise difficulty. Ordering follows the progression:
/// Beginner < Intermediate < Advanced < Elite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Elite,
}

impl SkillLevel {
    pub const ALL: [SkillLevel; 4] = [
        SkillLevel::Beginner,
        SkillLevel::Intermediate,
        SkillLevel::Advanced,
        SkillLevel::Elite,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Elite => "Elite",
        }
    }
}

impl fmt::Display for SkillLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "beginner" => Ok(SkillLevel::Beginner),
            "intermediate" => Ok(SkillLevel::Intermediate),
            "advanced" => Ok(SkillLevel::Advanced),
            "elite" => Ok(SkillLevel::Elite),
            other => Err(format!("unknown skill level: {}", other)),
        }
    }
}

/// A catalog exercise within a movement pillar.
///
/// Pillars are free-form strings on the wire ("Horizontal Pull", "Core", ...);
/// the authoritative list comes from `GET /api/exercises/pillars`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Exercise {
    pub id: String,
    pub name: String,
    pub pillar: String,
    pub skill_level: SkillLevel,
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub common_mistakes: Vec<String>,
    pub video_url: Option<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    pub progression_order: i32,
}

/// Server-side filter for the exercise catalog. Both fields are field-equality
/// filters applied by the backend; `None` means no filter.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    pub pillar: Option<String>,
    pub skill_level: Option<SkillLevel>,
}

impl ExerciseFilter {
    /// Query-string pairs for the `/api/exercises` request.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(ref pillar) = self.pillar {
            params.push(("pillar", pillar.clone()));
        }
        if let Some(level) = self.skill_level {
            params.push(("skill_level", level.as_str().to_string()));
        }
        params
    }
}
