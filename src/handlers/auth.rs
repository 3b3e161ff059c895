use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{CreateUser, LoginCredentials};
use crate::repositories::{AuthSessionRepository, UserRepository};
use crate::session::{create_session_cookie, get_session_token, remove_session_cookie};

#[derive(Clone)]
pub struct AuthState {
    pub user_repo: UserRepository,
    pub auth_session_repo: AuthSessionRepository,
}

pub async fn register(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(form): Json<CreateUser>,
) -> Result<Response> {
    if form.username.trim().is_empty() {
        return Err(AppError::BadRequest("Username is required".to_string()));
    }
    if form.password.len() < 6 {
        return Err(AppError::BadRequest(
            "Password must be at least 6 characters".to_string(),
        ));
    }
    if state
        .user_repo
        .find_by_username(&form.username)
        .await?
        .is_some()
    {
        return Err(AppError::BadRequest(
            "Username already exists".to_string(),
        ));
    }

    let user = state.user_repo.create(&form.username, &form.password).await?;

    // Auto login
    let token = state.auth_session_repo.create(&user.id).await?;
    let jar = jar.add(create_session_cookie(&token));

    Ok((
        StatusCode::CREATED,
        jar,
        Json(json!({ "id": user.id, "username": user.username })),
    )
        .into_response())
}

pub async fn login(
    State(state): State<AuthState>,
    jar: CookieJar,
    Json(credentials): Json<LoginCredentials>,
) -> Result<Response> {
    let user = state
        .user_repo
        .verify_password(&credentials.username, &credentials.password)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let token = state.auth_session_repo.create(&user.id).await?;
    let jar = jar.add(create_session_cookie(&token));

    Ok((
        jar,
        Json(json!({ "id": user.id, "username": user.username })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AuthState>, jar: CookieJar) -> Result<Response> {
    if let Some(token) = get_session_token(&jar) {
        state.auth_session_repo.delete(&token).await?;
    }
    let jar = jar.add(remove_session_cookie());

    Ok((StatusCode::NO_CONTENT, jar).into_response())
}
