use chrono::Utc;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{Exercise, FromSqliteRow};

#[derive(Clone)]
pub struct ExerciseRepository {
    pool: DbPool,
}

impl ExerciseRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE id = ?")?;
            let result = stmt.query_row([&id], Exercise::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// The user's catalog, most recently used first. Never-used entries sort
    /// last, alphabetically.
    pub async fn find_by_user(&self, user_id: &str) -> Result<Vec<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM exercises WHERE user_id = ?
                 ORDER BY last_used_at IS NULL, last_used_at DESC, name",
            )?;
            let exercises = stmt
                .query_map([&user_id], Exercise::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_by_name(&self, user_id: &str, name: &str) -> Result<Option<Exercise>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let name = name.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM exercises WHERE user_id = ? AND name = ?")?;
            let result = stmt
                .query_row([&user_id, &name], Exercise::from_row)
                .optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn create(
        &self,
        user_id: &str,
        name: &str,
        category: Option<&str>,
        equipment: Option<&str>,
    ) -> Result<Exercise> {
        let id = Uuid::new_v4().to_string();
        let exercise = Exercise {
            id: id.clone(),
            user_id: user_id.to_string(),
            name: name.to_string(),
            category: category.map(|s| s.to_string()),
            equipment: equipment.map(|s| s.to_string()),
            last_used_at: None,
            created_at: Utc::now(),
        };
        let exercise_clone = exercise.clone();

        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || -> Result<()> {
            let conn = pool.get()?;
            conn.execute(
                "INSERT INTO exercises (id, user_id, name, category, equipment, created_at)
                 VALUES (?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    exercise_clone.id,
                    exercise_clone.user_id,
                    exercise_clone.name,
                    exercise_clone.category,
                    exercise_clone.equipment,
                    exercise_clone.created_at
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

        Ok(exercise)
    }

    pub async fn update(
        &self,
        id: &str,
        user_id: &str,
        name: &str,
        category: Option<&str>,
        equipment: Option<&str>,
    ) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        let name = name.to_string();
        let category = category.map(|s| s.to_string());
        let equipment = equipment.map(|s| s.to_string());
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "UPDATE exercises SET name = ?, category = ?, equipment = ?
                 WHERE id = ? AND user_id = ?",
                rusqlite::params![name, category, equipment, id, user_id],
            )?;
            Ok(rows > 0)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn delete(&self, id: &str, user_id: &str) -> Result<bool> {
        let pool = self.pool.clone();
        let id = id.to_string();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let rows = conn.execute(
                "DELETE FROM exercises WHERE id = ? AND user_id = ?",
                rusqlite::params![id, user_id],
            )?;
            Ok(rows > 0)
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
    async fn test_create_exercise() {
        let (pool, user_id) = setup().await;
        let repo = ExerciseRepository::new(pool);

        let exercise = repo
            .create(&user_id, "Bench Press", Some("chest"), Some("barbell"))
            .await
            .unwrap();

        assert_eq!(exercise.name, "Bench Press");
        assert_eq!(exercise.category.as_deref(), Some("chest"));
        assert_eq!(exercise.equipment.as_deref(), Some("barbell"));
        assert!(exercise.last_used_at.is_none());
    }

    #[tokio::test]
    async fn test_find_by_name() {
        let (pool, user_id) = setup().await;
        let repo = ExerciseRepository::new(pool);

        repo.create(&user_id, "Squat", None, None).await.unwrap();

        let found = repo.find_by_name(&user_id, "Squat").await.unwrap();
        assert!(found.is_some());

        let missing = repo.find_by_name(&user_id, "squat").await.unwrap();
        assert!(missing.is_none(), "name match is exact");
    }

    #[tokio::test]
    async fn test_recency_ordering() {
        let (pool, user_id) = setup().await;
        let repo = ExerciseRepository::new(pool.clone());

        let a = repo.create(&user_id, "Deadlift", None, None).await.unwrap();
        let b = repo.create(&user_id, "Bench Press", None, None).await.unwrap();
        repo.create(&user_id, "Curl", None, None).await.unwrap();

        // Give Deadlift an older timestamp than Bench Press
        let conn = pool.get().unwrap();
        conn.execute(
            "UPDATE exercises SET last_used_at = ? WHERE id = ?",
            rusqlite::params![Utc::now() - chrono::Duration::days(2), a.id],
        )
        .unwrap();
        conn.execute(
            "UPDATE exercises SET last_used_at = ? WHERE id = ?",
            rusqlite::params![Utc::now(), b.id],
        )
        .unwrap();
        drop(conn);

        let names: Vec<String> = repo
            .find_by_user(&user_id)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.name)
            .collect();
        assert_eq!(names, vec!["Bench Press", "Deadlift", "Curl"]);
    }

    #[tokio::test]
    async fn test_update_and_delete_scoped_to_owner() {
        let (pool, user_id) = setup().await;
        let other = UserRepository::new(pool.clone())
            .create("bob", "password123")
            .await
            .unwrap();
        let repo = ExerciseRepository::new(pool);

        let exercise = repo.create(&user_id, "Row", None, None).await.unwrap();

        assert!(!repo
            .update(&exercise.id, &other.id, "Hacked", None, None)
            .await
            .unwrap());
        assert!(!repo.delete(&exercise.id, &other.id).await.unwrap());

        assert!(repo
            .update(&exercise.id, &user_id, "Barbell Row", Some("back"), None)
            .await
            .unwrap());
        assert!(repo.delete(&exercise.id, &user_id).await.unwrap());
    }
}
