use axum::{
    routing::{get, post, put},
    Extension, Router,
};

use crate::handlers::{auth, exercises, health, plan, profile, sessions};
use crate::repositories::AuthSessionRepository;

pub fn create_router(
    auth_state: auth::AuthState,
    profile_state: profile::ProfileState,
    exercises_state: exercises::ExercisesState,
    plan_state: plan::PlanState,
    sessions_state: sessions::SessionsState,
    auth_session_repo: AuthSessionRepository,
) -> Router {
    Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Auth routes
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/logout", post(auth::logout))
        .with_state(auth_state)
        // Profile routes
        .route("/api/profile", get(profile::show).put(profile::update))
        .with_state(profile_state)
        // Exercise routes
        .route(
            "/api/exercises",
            get(exercises::list).post(exercises::create),
        )
        .route("/api/exercises/{id}", put(exercises::update).delete(exercises::delete))
        .with_state(exercises_state)
        // Plan generation
        .route("/api/ai/generate-plan", post(plan::generate))
        .with_state(plan_state)
        // Session routes
        .route("/api/sessions", get(sessions::list))
        .route("/api/sessions/save", post(sessions::save))
        .route("/api/sessions/{id}", get(sessions::show))
        .route("/api/sessions/{id}/complete", post(sessions::complete))
        .with_state(sessions_state)
        // Auth session repo for the AuthUser extractor
        .layer(Extension(auth_session_repo))
}
