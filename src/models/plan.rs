//! Generated workout plan: the shape the AI collaborator must return and
//! the constraint checks applied before a plan is shown or saved.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::profile::{RPE_MAX, RPE_MIN};
use super::session::Intent;

#[derive(Error, Debug)]
pub enum PlanError {
    #[error("response is not a valid plan: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("exercise '{name}' has target_rpe {value}, expected {RPE_MIN}..={RPE_MAX}")]
    RpeOutOfRange { name: String, value: i64 },

    #[error("exercise '{name}' has invalid {field}: {value}")]
    InvalidField {
        name: String,
        field: &'static str,
        value: i64,
    },

    #[error("exercise '{name}' has negative weight")]
    NegativeWeight { name: String },

    #[error("exercise '{0}' is not in the user's catalog")]
    UnknownExercise(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanExercise {
    pub exercise_name: String,
    pub sets: i64,
    pub reps: i64,
    pub weight: Option<f64>,
    pub rest_seconds: i64,
    pub target_rpe: i64,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutPlan {
    pub exercises: Vec<PlanExercise>,
    pub overall_notes: String,
}

impl WorkoutPlan {
    /// Parse the generator's raw reply and check numeric constraints.
    pub fn from_json(raw: &str) -> Result<Self, PlanError> {
        let plan: WorkoutPlan = serde_json::from_str(raw)?;
        plan.validate()?;
        Ok(plan)
    }

    /// Numeric sanity checks on every entry. The generator is instructed to
    /// respect these but its output is never trusted.
    pub fn validate(&self) -> Result<(), PlanError> {
        for ex in &self.exercises {
            if !(RPE_MIN..=RPE_MAX).contains(&ex.target_rpe) {
                return Err(PlanError::RpeOutOfRange {
                    name: ex.exercise_name.clone(),
                    value: ex.target_rpe,
                });
            }
            if ex.sets < 1 {
                return Err(PlanError::InvalidField {
                    name: ex.exercise_name.clone(),
                    field: "sets",
                    value: ex.sets,
                });
            }
            if ex.reps < 1 {
                return Err(PlanError::InvalidField {
                    name: ex.exercise_name.clone(),
                    field: "reps",
                    value: ex.reps,
                });
            }
            if ex.rest_seconds < 0 {
                return Err(PlanError::InvalidField {
                    name: ex.exercise_name.clone(),
                    field: "rest_seconds",
                    value: ex.rest_seconds,
                });
            }
            if ex.weight.is_some_and(|w| w < 0.0) {
                return Err(PlanError::NegativeWeight {
                    name: ex.exercise_name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Check every exercise name against the user's catalog. The generator is
    /// told to copy names verbatim; this verifies it. Skipped for an empty
    /// catalog, where saving creates the rows instead.
    pub fn require_known_exercises(&self, catalog: &[String]) -> Result<(), PlanError> {
        if catalog.is_empty() {
            return Ok(());
        }
        for ex in &self.exercises {
            if !catalog.iter().any(|name| name == &ex.exercise_name) {
                return Err(PlanError::UnknownExercise(ex.exercise_name.clone()));
            }
        }
        Ok(())
    }
}

/// An accepted plan held by the client between preview and save.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionDraft {
    pub duration: i64,
    pub intent: Intent,
    pub plan: WorkoutPlan,
}
