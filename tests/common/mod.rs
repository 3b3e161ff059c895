#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;

use liftplan::db::{create_memory_pool, DbPool};
use liftplan::error::{AppError, Result};
use liftplan::handlers::{auth, exercises, plan, profile, sessions};
use liftplan::migrations::run_migrations_for_tests;
use liftplan::models::User;
use liftplan::plan::PlanGenerator;
use liftplan::repositories::{
    AuthSessionRepository, ExerciseRepository, ProfileRepository, SessionRepository,
    UserRepository,
};

pub fn setup_test_db() -> DbPool {
    let pool = create_memory_pool().expect("Failed to create test database");
    run_migrations_for_tests(&pool).expect("Failed to run migrations");
    pool
}

/// A generator that replies with a fixed string, standing in for the hosted
/// model.
pub struct ScriptedGenerator(pub String);

#[async_trait]
impl PlanGenerator for ScriptedGenerator {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// A generator whose call always fails, like a timed-out upstream.
pub struct FailingGenerator;

#[async_trait]
impl PlanGenerator for FailingGenerator {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String> {
        Err(AppError::PlanService("connection refused".to_string()))
    }
}

pub fn create_test_app(pool: DbPool) -> Router {
    create_test_app_with_generator(pool, Arc::new(ScriptedGenerator(String::new())))
}

pub fn create_test_app_with_generator(pool: DbPool, generator: Arc<dyn PlanGenerator>) -> Router {
    let user_repo = UserRepository::new(pool.clone());
    let auth_session_repo = AuthSessionRepository::new(pool.clone());
    let profile_repo = ProfileRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());

    let auth_state = auth::AuthState {
        user_repo: user_repo.clone(),
        auth_session_repo: auth_session_repo.clone(),
    };
    let profile_state = profile::ProfileState {
        profile_repo: profile_repo.clone(),
    };
    let exercises_state = exercises::ExercisesState {
        exercise_repo: exercise_repo.clone(),
    };
    let plan_state = plan::PlanState {
        profile_repo,
        exercise_repo,
        session_repo: session_repo.clone(),
        generator,
    };
    let sessions_state = sessions::SessionsState { session_repo };

    liftplan::routes::create_router(
        auth_state,
        profile_state,
        exercises_state,
        plan_state,
        sessions_state,
        auth_session_repo,
    )
}

pub async fn create_test_user(pool: &DbPool, username: &str, password: &str) -> User {
    let user_repo = UserRepository::new(pool.clone());
    user_repo.create(username, password).await.unwrap()
}

/// Log a user in directly against the token table and return a Cookie header
/// value.
pub async fn create_session_cookie(pool: &DbPool, user: &User) -> String {
    let auth_session_repo = AuthSessionRepository::new(pool.clone());
    let token = auth_session_repo.create(&user.id).await.unwrap();
    format!("session={}", token)
}

pub fn extract_cookie_header(set_cookie: &str) -> String {
    // Extract just the cookie name=value part for use in Cookie header
    set_cookie.split(';').next().unwrap_or("").to_string()
}

pub async fn create_test_exercise(
    pool: &DbPool,
    user_id: &str,
    name: &str,
    category: Option<&str>,
) -> liftplan::models::Exercise {
    let exercise_repo = ExerciseRepository::new(pool.clone());
    exercise_repo
        .create(user_id, name, category, None)
        .await
        .unwrap()
}

/// A well-formed generator reply naming the given exercises.
pub fn plan_reply(names: &[&str]) -> String {
    let exercises: Vec<serde_json::Value> = names
        .iter()
        .map(|name| {
            serde_json::json!({
                "exercise_name": name,
                "sets": 3,
                "reps": 10,
                "weight": 40.0,
                "rest_seconds": 90,
                "target_rpe": 8,
                "notes": "keep it controlled"
            })
        })
        .collect();
    serde_json::json!({
        "exercises": exercises,
        "overall_notes": "balanced full-body day"
    })
    .to_string()
}
