use chrono::{NaiveDate, Utc};
use rusqlite::OptionalExtension;
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::{AppError, Result};
use crate::models::{
    CompletedExercise, FromSqliteRow, Session, SessionDraft, SessionExerciseWithName,
};

#[derive(Clone)]
pub struct SessionRepository {
    pool: DbPool,
}

impl SessionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: &str) -> Result<Option<Session>> {
        let pool = self.pool.clone();
        let id = id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare("SELECT * FROM sessions WHERE id = ?")?;
            let result = stmt.query_row([&id], Session::from_row).optional()?;
            Ok(result)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    pub async fn find_recent_by_user(&self, user_id: &str, limit: i64) -> Result<Vec<Session>> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT * FROM sessions WHERE user_id = ?
                 ORDER BY date DESC, created_at DESC LIMIT ?",
            )?;
            let sessions = stmt
                .query_map(rusqlite::params![user_id, limit], Session::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(sessions)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// All line items of a session with their exercise names, plan rows
    /// first, each group in plan order.
    pub async fn find_exercises_by_session(
        &self,
        session_id: &str,
    ) -> Result<Vec<SessionExerciseWithName>> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        tokio::task::spawn_blocking(move || {
            let conn = pool.get()?;
            let mut stmt = conn.prepare(
                "SELECT se.id, se.session_id, se.exercise_id, e.name AS exercise_name,
                        se.order_index, se.is_plan, se.sets, se.reps, se.weight,
                        se.rest_seconds, se.target_rpe, se.actual_rpe, se.notes
                 FROM session_exercises se
                 JOIN exercises e ON se.exercise_id = e.id
                 WHERE se.session_id = ?
                 ORDER BY se.is_plan DESC, se.order_index",
            )?;
            let exercises = stmt
                .query_map([&session_id], SessionExerciseWithName::from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(exercises)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Persist an accepted draft: one session row plus one `is_plan=true` row
    /// per exercise, resolving catalog entries by exact name and creating the
    /// missing ones. Runs as a single transaction so a failure leaves nothing
    /// behind. Returns the new session id.
    pub async fn save_plan(
        &self,
        user_id: &str,
        date: NaiveDate,
        draft: SessionDraft,
    ) -> Result<String> {
        let pool = self.pool.clone();
        let user_id = user_id.to_string();
        let session_id = Uuid::new_v4().to_string();
        let session_id_clone = session_id.clone();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || -> Result<String> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            tx.execute(
                "INSERT INTO sessions (id, user_id, date, duration, intent, notes, created_at)
                 VALUES (?, ?, ?, ?, ?, ?, ?)",
                rusqlite::params![
                    session_id_clone,
                    user_id,
                    date,
                    draft.duration,
                    draft.intent.as_str(),
                    draft.plan.overall_notes,
                    now
                ],
            )?;

            for (index, ex) in draft.plan.exercises.iter().enumerate() {
                let exercise_id: Option<String> = tx
                    .query_row(
                        "SELECT id FROM exercises WHERE user_id = ? AND name = ?",
                        rusqlite::params![user_id, ex.exercise_name],
                        |row| row.get(0),
                    )
                    .optional()?;

                let exercise_id = match exercise_id {
                    Some(id) => id,
                    None => {
                        let id = Uuid::new_v4().to_string();
                        tx.execute(
                            "INSERT INTO exercises (id, user_id, name, last_used_at, created_at)
                             VALUES (?, ?, ?, ?, ?)",
                            rusqlite::params![id, user_id, ex.exercise_name, now, now],
                        )?;
                        id
                    }
                };

                tx.execute(
                    "INSERT INTO session_exercises
                         (id, session_id, exercise_id, order_index, is_plan,
                          sets, reps, weight, rest_seconds, target_rpe, notes, created_at)
                     VALUES (?, ?, ?, ?, 1, ?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        Uuid::new_v4().to_string(),
                        session_id_clone,
                        exercise_id,
                        index as i64,
                        ex.sets,
                        ex.reps,
                        ex.weight,
                        ex.rest_seconds,
                        ex.target_rpe,
                        ex.notes,
                        now
                    ],
                )?;
            }

            tx.commit()?;
            Ok(session_id_clone)
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }

    /// Append actual rows to a saved session, matching plan rows by
    /// `order_index`, and bump each referenced exercise's recency timestamp.
    /// Plan rows are left untouched. One transaction, rejected if the session
    /// already has actual rows.
    pub async fn complete_session(
        &self,
        session_id: &str,
        user_id: &str,
        actuals: Vec<CompletedExercise>,
    ) -> Result<()> {
        let pool = self.pool.clone();
        let session_id = session_id.to_string();
        let user_id = user_id.to_string();
        let now = Utc::now();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let mut conn = pool.get()?;
            let tx = conn.transaction()?;

            let owner: Option<String> = tx
                .query_row(
                    "SELECT user_id FROM sessions WHERE id = ?",
                    [&session_id],
                    |row| row.get(0),
                )
                .optional()?;
            match owner {
                Some(owner) if owner == user_id => {}
                _ => return Err(AppError::NotFound("Session not found".to_string())),
            }

            // An empty completion would mark nothing while leaving the
            // session completable again
            if actuals.is_empty() {
                return Err(AppError::BadRequest(
                    "No exercises submitted".to_string(),
                ));
            }

            let already_completed: bool = tx.query_row(
                "SELECT COUNT(*) > 0 FROM session_exercises WHERE session_id = ? AND is_plan = 0",
                [&session_id],
                |row| row.get(0),
            )?;
            if already_completed {
                return Err(AppError::BadRequest(
                    "Session is already completed".to_string(),
                ));
            }

            for actual in &actuals {
                let plan_row: Option<(String, i64)> = tx
                    .query_row(
                        "SELECT exercise_id, rest_seconds FROM session_exercises
                         WHERE session_id = ? AND is_plan = 1 AND order_index = ?",
                        rusqlite::params![session_id, actual.order_index],
                        |row| Ok((row.get(0)?, row.get(1)?)),
                    )
                    .optional()?;

                let Some((exercise_id, rest_seconds)) = plan_row else {
                    return Err(AppError::BadRequest(format!(
                        "No planned exercise at index {}",
                        actual.order_index
                    )));
                };

                tx.execute(
                    "INSERT INTO session_exercises
                         (id, session_id, exercise_id, order_index, is_plan,
                          sets, reps, weight, rest_seconds, actual_rpe, notes, created_at)
                     VALUES (?, ?, ?, ?, 0, ?, ?, ?, ?, ?, ?, ?)",
                    rusqlite::params![
                        Uuid::new_v4().to_string(),
                        session_id,
                        exercise_id,
                        actual.order_index,
                        actual.sets,
                        actual.reps,
                        actual.weight,
                        rest_seconds,
                        actual.actual_rpe,
                        actual.notes,
                        now
                    ],
                )?;

                tx.execute(
                    "UPDATE exercises SET last_used_at = ? WHERE id = ?",
                    rusqlite::params![now, exercise_id],
                )?;
            }

            tx.commit()?;
            Ok(())
        })
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
    }
}
