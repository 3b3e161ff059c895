pub mod auth_session_repo;
pub mod exercise_repo;
pub mod profile_repo;
pub mod session_repo;
pub mod user_repo;

pub use auth_session_repo::AuthSessionRepository;
pub use exercise_repo::ExerciseRepository;
pub use profile_repo::ProfileRepository;
pub use session_repo::SessionRepository;
pub use user_repo::UserRepository;
