use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Intent, SessionDraft, WorkoutPlan};
use crate::plan::{
    build_plan_prompt, HistoryEntry, PlanGenerator, PlanPromptInput, SessionHistory,
    SYSTEM_PERSONA,
};
use crate::repositories::{ExerciseRepository, ProfileRepository, SessionRepository};

const HISTORY_SESSIONS: i64 = 3;

#[derive(Clone)]
pub struct PlanState {
    pub profile_repo: ProfileRepository,
    pub exercise_repo: ExerciseRepository,
    pub session_repo: SessionRepository,
    pub generator: Arc<dyn PlanGenerator>,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePlanRequest {
    pub duration: i64,
    pub intent: Intent,
}

/// Build the prompt from profile, history, and catalog; call the generator
/// once; validate the reply. Nothing is persisted here — the draft goes back
/// to the client, which saves it explicitly.
pub async fn generate(
    State(state): State<PlanState>,
    auth_user: AuthUser,
    Json(request): Json<GeneratePlanRequest>,
) -> Result<Json<SessionDraft>> {
    if request.duration <= 0 {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }

    let profile = state.profile_repo.find_or_create(&auth_user.id).await?;

    let catalog: Vec<String> = state
        .exercise_repo
        .find_by_user(&auth_user.id)
        .await?
        .into_iter()
        .map(|e| e.name)
        .collect();

    let mut recent_sessions = Vec::new();
    for session in state
        .session_repo
        .find_recent_by_user(&auth_user.id, HISTORY_SESSIONS)
        .await?
    {
        let entries = state
            .session_repo
            .find_exercises_by_session(&session.id)
            .await?
            .into_iter()
            .filter(|row| row.is_plan)
            .map(|row| HistoryEntry {
                name: row.exercise_name,
                sets: row.sets,
                reps: row.reps,
                weight: row.weight,
            })
            .collect();
        recent_sessions.push(SessionHistory {
            date: session.date,
            entries,
        });
    }

    let prompt = build_plan_prompt(&PlanPromptInput {
        goal: profile.goal,
        unit: profile.unit,
        duration: request.duration,
        intent: request.intent,
        recent_sessions: &recent_sessions,
        exercise_names: &catalog,
    });

    let raw = state.generator.generate(SYSTEM_PERSONA, &prompt).await?;

    let plan =
        WorkoutPlan::from_json(&raw).map_err(|e| AppError::MalformedPlan(e.to_string()))?;
    plan.require_known_exercises(&catalog)
        .map_err(|e| AppError::MalformedPlan(e.to_string()))?;

    tracing::info!(
        user_id = %auth_user.id,
        exercises = plan.exercises.len(),
        "Generated workout plan"
    );

    Ok(Json(SessionDraft {
        duration: request.duration,
        intent: request.intent,
        plan,
    }))
}
