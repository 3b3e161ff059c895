use axum::{extract::FromRequestParts, http::request::Parts, Extension, RequestPartsExt};
use axum_extra::extract::CookieJar;

use crate::error::AppError;
use crate::repositories::AuthSessionRepository;
use crate::session::get_session_token;

/// The authenticated caller, resolved from the session cookie against the
/// auth_sessions table. Every user-scoped query hangs off `id`.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: String,
    pub username: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Extension(repo) = parts
            .extract::<Extension<AuthSessionRepository>>()
            .await
            .map_err(|_| AppError::Internal("auth session repository missing".to_string()))?;

        let jar = CookieJar::from_headers(&parts.headers);
        let token = get_session_token(&jar).ok_or(AppError::Unauthorized)?;

        let (id, username) = repo
            .find_valid(&token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(AuthUser { id, username })
    }
}
