use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::timestamp;

/// A logged training entry for one exercise.
///
/// All measures are optional: a static hold has a duration but no reps, a
/// strength set has reps but no hold time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ProgressEntry {
    pub id: String,
    pub user_id: String,
    pub exercise_id: String,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub date: DateTime<Utc>,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub hold_time: Option<f64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

/// Client-side draft of a progress entry, before the server assigns the id
/// and timestamp.
#[derive(Debug, Clone, Default)]
pub struct ProgressDraft {
    pub exercise_id: String,
    pub reps: Option<u32>,
    pub sets: Option<u32>,
    pub hold_time: Option<f64>,
    pub weight: Option<f64>,
    pub notes: Option<String>,
}

impl ProgressDraft {
    pub fn new(exercise_id: impl Into<String>) -> Self {
        Self {
            exercise_id: exercise_id.into(),
            ..Default::default()
        }
    }
}

/// One exercise slot inside a planned workout.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct WorkoutExercise {
    pub exercise_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sets: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_time: Option<f64>,
}

/// A named workout: an ordered list of exercise slots plus scheduling info.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Workout {
    pub id: String,
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub exercises: Vec<WorkoutExercise>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub scheduled_date: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "timestamp::option")]
    pub completed_date: Option<DateTime<Utc>>,
    /// Duration in minutes.
    pub duration: Option<u32>,
    #[serde(deserialize_with = "timestamp::deserialize")]
    pub created_at: DateTime<Utc>,
}

/// Client-side draft of a workout.
#[derive(Debug, Clone, Default)]
pub struct WorkoutDraft {
    pub name: String,
    pub exercises: Vec<WorkoutExercise>,
    pub scheduled_date: Option<DateTime<Utc>>,
    pub duration: Option<u32>,
}

/// Thirty-day training summary from `GET /api/analytics/progress`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct ProgressAnalytics {
    #[serde(default)]
    pub total_workouts: u64,
    #[serde(default)]
    pub unique_workout_days: u64,
    /// `(exercise_id, times logged)` pairs, most practiced first.
    #[serde(default)]
    pub most_practiced_exercises: Vec<(String, u64)>,
    #[serde(default)]
    pub current_streak: i64,
    #[serde(default)]
    pub weekly_progress: u64,
}
