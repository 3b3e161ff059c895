use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::profile::{RPE_MAX, RPE_MIN};
use crate::models::{CompleteSessionRequest, Session, SessionDraft, SessionExerciseWithName};
use crate::repositories::SessionRepository;

#[derive(Clone)]
pub struct SessionsState {
    pub session_repo: SessionRepository,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct SessionDetail {
    #[serde(flatten)]
    pub session: Session,
    pub exercises: Vec<SessionExerciseWithName>,
}

pub async fn list(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Session>>> {
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let sessions = state
        .session_repo
        .find_recent_by_user(&auth_user.id, limit)
        .await?;
    Ok(Json(sessions))
}

pub async fn show(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<SessionDetail>> {
    let session = state
        .session_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Session not found".to_string()))?;
    if session.user_id != auth_user.id {
        return Err(AppError::NotFound("Session not found".to_string()));
    }

    let exercises = state.session_repo.find_exercises_by_session(&id).await?;

    Ok(Json(SessionDetail { session, exercises }))
}

/// Persist a previewed draft (AI-generated or hand-built) as a session with
/// its plan rows, dated today.
pub async fn save(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Json(draft): Json<SessionDraft>,
) -> Result<Response> {
    if draft.duration <= 0 {
        return Err(AppError::BadRequest("duration must be positive".to_string()));
    }
    if draft.plan.exercises.is_empty() {
        return Err(AppError::BadRequest("plan has no exercises".to_string()));
    }
    draft
        .plan
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let date = Utc::now().date_naive();
    let session_id = state.session_repo.save_plan(&auth_user.id, date, draft).await?;

    tracing::info!(user_id = %auth_user.id, session_id = %session_id, "Saved session");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "session_id": session_id })),
    )
        .into_response())
}

/// Record performed values for a saved session. Appends one `is_plan=false`
/// row per submitted entry; plan rows stay as written.
pub async fn complete(
    State(state): State<SessionsState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(request): Json<CompleteSessionRequest>,
) -> Result<Response> {
    for actual in &request.exercises {
        if actual.sets < 1 || actual.reps < 1 {
            return Err(AppError::Validation(
                "sets and reps must be at least 1".to_string(),
            ));
        }
        if let Some(rpe) = actual.actual_rpe {
            if !(RPE_MIN..=RPE_MAX).contains(&rpe) {
                return Err(AppError::Validation(format!(
                    "actual_rpe must be between {} and {}",
                    RPE_MIN, RPE_MAX
                )));
            }
        }
        if actual.weight.is_some_and(|w| w < 0.0) {
            return Err(AppError::Validation(
                "weight must not be negative".to_string(),
            ));
        }
    }

    state
        .session_repo
        .complete_session(&id, &auth_user.id, request.exercises)
        .await?;

    Ok(StatusCode::NO_CONTENT.into_response())
}
