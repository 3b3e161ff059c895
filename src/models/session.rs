use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use super::FromSqliteRow;

/// User-declared emphasis for a single session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    TimeSaving,
    Weight,
    Volume,
    Form,
}

impl Intent {
    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::TimeSaving => "time_saving",
            Intent::Weight => "weight",
            Intent::Volume => "volume",
            Intent::Form => "form",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s {
            "time_saving" => Intent::TimeSaving,
            "weight" => Intent::Weight,
            "volume" => Intent::Volume,
            _ => Intent::Form,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
    pub date: NaiveDate,
    pub duration: i64,
    pub intent: Intent,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FromSqliteRow for Session {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let intent: String = row.get("intent")?;
        Ok(Self {
            id: row.get("id")?,
            user_id: row.get("user_id")?,
            date: row.get("date")?,
            duration: row.get("duration")?,
            intent: Intent::parse(&intent),
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
        })
    }
}

/// One line item of a session, joined with its exercise name. `is_plan=true`
/// rows carry the intended parameters and are immutable; completion appends
/// `is_plan=false` rows.
#[derive(Debug, Clone, Serialize)]
pub struct SessionExerciseWithName {
    pub id: String,
    pub session_id: String,
    pub exercise_id: String,
    pub exercise_name: String,
    pub order_index: i64,
    pub is_plan: bool,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub rest_seconds: i64,
    pub target_rpe: Option<i64>,
    pub actual_rpe: Option<i64>,
    pub notes: Option<String>,
}

impl FromSqliteRow for SessionExerciseWithName {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get("id")?,
            session_id: row.get("session_id")?,
            exercise_id: row.get("exercise_id")?,
            exercise_name: row.get("exercise_name")?,
            order_index: row.get("order_index")?,
            is_plan: row.get("is_plan")?,
            sets: row.get("sets")?,
            reps: row.get("reps")?,
            weight: row.get("weight")?,
            rest_seconds: row.get("rest_seconds")?,
            target_rpe: row.get("target_rpe")?,
            actual_rpe: row.get("actual_rpe")?,
            notes: row.get("notes")?,
        })
    }
}

/// Actual values submitted when a started session is completed, matched to
/// plan rows by `order_index`.
#[derive(Debug, Deserialize)]
pub struct CompletedExercise {
    pub order_index: i64,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub actual_rpe: Option<i64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CompleteSessionRequest {
    pub exercises: Vec<CompletedExercise>,
}
