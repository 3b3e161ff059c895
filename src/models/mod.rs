pub mod exercise;
pub mod from_row;
pub mod plan;
pub mod profile;
pub mod session;
pub mod user;

pub use exercise::{CreateExercise, Exercise, UpdateExercise};
pub use from_row::FromSqliteRow;
pub use plan::{PlanError, PlanExercise, SessionDraft, WorkoutPlan};
pub use profile::{Goal, Profile, RpeInputMode, Unit, UpdateProfile};
pub use session::{
    CompleteSessionRequest, CompletedExercise, Intent, Session, SessionExerciseWithName,
};
pub use user::{CreateUser, LoginCredentials, User};
