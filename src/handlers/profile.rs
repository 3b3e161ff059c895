use axum::{extract::State, Json};

use crate::error::{AppError, Result};
use crate::middleware::AuthUser;
use crate::models::{Profile, UpdateProfile};
use crate::repositories::ProfileRepository;

#[derive(Clone)]
pub struct ProfileState {
    pub profile_repo: ProfileRepository,
}

pub async fn show(
    State(state): State<ProfileState>,
    auth_user: AuthUser,
) -> Result<Json<Profile>> {
    let profile = state.profile_repo.find_or_create(&auth_user.id).await?;
    Ok(Json(profile))
}

pub async fn update(
    State(state): State<ProfileState>,
    auth_user: AuthUser,
    Json(form): Json<UpdateProfile>,
) -> Result<Json<Profile>> {
    form.validate().map_err(AppError::Validation)?;

    let profile = state.profile_repo.update(&auth_user.id, form).await?;
    Ok(Json(profile))
}
