use chrono::Utc;
use rusqlite::OptionalExtension;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::profile::{DEFAULT_DURATION, DEFAULT_RPE_QUICK_CHIPS};
use crate::models::{FromSqliteRow, Profile, UpdateProfile};

#[derive(Clone)]
pub struct ProfileRepository {
    pool: DbPool,
}

impl ProfileRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    /// Load a user's profile, creating it with the documented defaults on
    /// first access. `INSERT OR IGNORE` keeps the creation idempotent.
    pub async fn find_or_create(&self, user_id: &str) -> Result<Profile> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            let existing = conn
                .prepare("SELECT * FROM profiles WHERE user_id = ?")?
                .query_row([&user_id], Profile::from_row)
                .optional()?;
            if let Some(profile) = existing {
                return Ok(profile);
            }

            let chips = serde_json::to_string(DEFAULT_RPE_QUICK_CHIPS)
                .map_err(|e| AppError::Internal(e.to_string()))?;
            conn.execute(
                "INSERT OR IGNORE INTO profiles
                     (user_id, default_duration, rpe_quick_chips, created_at, updated_at)
                 VALUES (?, ?, ?, ?, ?)",
                rusqlite::params![user_id, DEFAULT_DURATION, chips, now, now],
            )?;

            let profile = conn
                .prepare("SELECT * FROM profiles WHERE user_id = ?")?
                .query_row([&user_id], Profile::from_row)?;
            Ok(profile)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Apply a partial update, creating the profile first if it does not
    /// exist yet. Fields left out of the update keep their current value.
    pub async fn update(&self, user_id: &str, update: UpdateProfile) -> Result<Profile> {
        self.find_or_create(user_id).await?;

        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;

            let chips = match &update.rpe_quick_chips {
                Some(chips) => Some(
                    serde_json::to_string(chips)
                        .map_err(|e| AppError::Internal(e.to_string()))?,
                ),
                None => None,
            };

            conn.execute(
                "UPDATE profiles SET
                     unit = COALESCE(?, unit),
                     goal = COALESCE(?, goal),
                     default_duration = COALESCE(?, default_duration),
                     rpe_input_mode = COALESCE(?, rpe_input_mode),
                     rpe_quick_chips = COALESCE(?, rpe_quick_chips),
                     updated_at = ?
                 WHERE user_id = ?",
                rusqlite::params![
                    update.unit.map(|u| u.as_str()),
                    update.goal.map(|g| g.as_str()),
                    update.default_duration,
                    update.rpe_input_mode.map(|m| m.as_str()),
                    chips,
                    now,
                    user_id
                ],
            )?;

            let profile = conn
                .prepare("SELECT * FROM profiles WHERE user_id = ?")?
                .query_row([&user_id], Profile::from_row)?;
            Ok(profile)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_memory_pool;
    use crate::migrations::run_migrations_for_tests;
    use crate::models::{Goal, RpeInputMode, Unit};
    use crate::repositories::UserRepository;

    async fn setup() -> (DbPool, String) {
        let pool = create_memory_pool().expect("Failed to create test database");
        run_migrations_for_tests(&pool).expect("Failed to run migrations");
        let user = UserRepository::new(pool.clone())
            .create("alice", "password123")
            .await
            .unwrap();
        (pool, user.id)
    }

    #[tokio::test]
    async fn test_lazy_creation_uses_defaults() {
        let (pool, user_id) = setup().await;
        let repo = ProfileRepository::new(pool);

        let profile = repo.find_or_create(&user_id).await.unwrap();

        assert_eq!(profile.unit, Unit::Kg);
        assert_eq!(profile.goal, Goal::Hypertrophy);
        assert_eq!(profile.default_duration, 30);
        assert_eq!(profile.rpe_input_mode, RpeInputMode::AllSets);
        assert_eq!(profile.rpe_quick_chips, vec![3, 5, 7, 8, 9]);
    }

    #[tokio::test]
    async fn test_creation_happens_exactly_once() {
        let (pool, user_id) = setup().await;
        let repo = ProfileRepository::new(pool.clone());

        let first = repo.find_or_create(&user_id).await.unwrap();
        let second = repo.find_or_create(&user_id).await.unwrap();
        assert_eq!(first.created_at, second.created_at);

        let conn = pool.get().unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM profiles WHERE user_id = ?",
                [&user_id],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }

    #[tokio::test]
    async fn test_partial_update_keeps_other_fields() {
        let (pool, user_id) = setup().await;
        let repo = ProfileRepository::new(pool);

        let updated = repo
            .update(
                &user_id,
                UpdateProfile {
                    goal: Some(Goal::Strength),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.goal, Goal::Strength);
        assert_eq!(updated.unit, Unit::Kg);
        assert_eq!(updated.default_duration, 30);
        assert_eq!(updated.rpe_quick_chips, vec![3, 5, 7, 8, 9]);
    }

    #[tokio::test]
    async fn test_update_chips() {
        let (pool, user_id) = setup().await;
        let repo = ProfileRepository::new(pool);

        let updated = repo
            .update(
                &user_id,
                UpdateProfile {
                    rpe_quick_chips: Some(vec![6, 7, 8]),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.rpe_quick_chips, vec![6, 7, 8]);
    }
}
