pub mod auth;
pub mod exercises;
pub mod health;
pub mod plan;
pub mod profile;
pub mod sessions;
