use std::sync::Arc;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use liftplan::config::Config;
use liftplan::handlers::{auth, exercises, plan, profile, sessions};
use liftplan::plan::OpenAiPlanGenerator;
use liftplan::repositories::{
    AuthSessionRepository, ExerciseRepository, ProfileRepository, SessionRepository,
    UserRepository,
};
use liftplan::{db, migrations, routes};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "liftplan=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    tracing::info!("Connecting to database: {}", config.database_url);

    // Create database pool
    let pool = db::create_pool(&config.database_url)?;

    // Run migrations
    migrations::run_migrations(&pool)?;

    // Create repositories
    let user_repo = UserRepository::new(pool.clone());
    let auth_session_repo = AuthSessionRepository::new(pool.clone());
    let profile_repo = ProfileRepository::new(pool.clone());
    let exercise_repo = ExerciseRepository::new(pool.clone());
    let session_repo = SessionRepository::new(pool.clone());

    // Plan generation collaborator
    let generator = Arc::new(OpenAiPlanGenerator::new(&config)?);

    // Create handler states
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

    // Build router
    let app = routes::create_router(
        auth_state,
        profile_state,
        exercises_state,
        plan_state,
        sessions_state,
        auth_session_repo,
    );

    // Start server
    let addr = config.server_addr();
    tracing::info!("Starting server at http://{}", addr);

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
