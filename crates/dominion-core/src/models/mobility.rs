use serde::{Deserialize, Serialize};

/// A mobility exercise, assessment, or routine from the mobility catalog.
///
/// The backend stores all three under one collection; `kind` distinguishes
/// them ("exercise", "assessment", "routine") and is absent on older records.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct MobilityExercise {
    pub id: String,
    pub name: String,
    pub area: String,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub description: String,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub benefits: Vec<String>,
    pub video_url: Option<String>,
    pub hold_time: Option<String>,
}
