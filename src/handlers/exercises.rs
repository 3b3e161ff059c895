use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{CreateExercise, Exercise, UpdateExercise};
use crate::repositories::ExerciseRepository;

#[derive(Clone)]
pub struct ExercisesState {
    pub exercise_repo: ExerciseRepository,
}

pub async fn list(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
) -> Result<Json<Vec<Exercise>>> {
    let exercises = state.exercise_repo.find_by_user(&auth_user.id).await?;
    Ok(Json(exercises))
}

pub async fn create(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Json(form): Json<CreateExercise>,
) -> Result<Response> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Exercise name is required".to_string(),
        ));
    }
    if state
        .exercise_repo
        .find_by_name(&auth_user.id, &form.name)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "Exercise with this name already exists".to_string(),
        ));
    }

    let exercise = state
        .exercise_repo
        .create(
            &auth_user.id,
            &form.name,
            form.category.as_deref(),
            form.equipment.as_deref(),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(exercise)).into_response())
}

pub async fn update(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
    Json(form): Json<UpdateExercise>,
) -> Result<Json<Exercise>> {
    if form.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Exercise name is required".to_string(),
        ));
    }
    // Renaming onto another catalog entry would trip the unique index
    if let Some(existing) = state
        .exercise_repo
        .find_by_name(&auth_user.id, &form.name)
        .await?
    {
        if existing.id != id {
            return Err(AppError::BadRequest(
                "Exercise with this name already exists".to_string(),
            ));
        }
    }

    let updated = state
        .exercise_repo
        .update(
            &id,
            &auth_user.id,
            &form.name,
            form.category.as_deref(),
            form.equipment.as_deref(),
        )
        .await?;
    if !updated {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }

    let exercise = state
        .exercise_repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Exercise not found".to_string()))?;
    Ok(Json(exercise))
}

pub async fn delete(
    State(state): State<ExercisesState>,
    auth_user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response> {
    let deleted = state.exercise_repo.delete(&id, &auth_user.id).await?;
    if !deleted {
        return Err(AppError::NotFound("Exercise not found".to_string()));
    }

    Ok(StatusCode::NO_CONTENT.into_response())
}
