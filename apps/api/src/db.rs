use anyhow::Result;
use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::attempt::{AttemptKey, AttemptRow, NewAttempt};
use crate::models::library::{LibraryBackup, PointsRecord, VocabularyEntry};

/// Creates and returns a PostgreSQL connection pool.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS practice_attempts (
        id                       UUID PRIMARY KEY,
        question_id              BIGINT NOT NULL,
        subtopic_id              TEXT NOT NULL,
        island_id                TEXT NOT NULL,
        user_id                  TEXT NOT NULL,
        user_answer              TEXT NOT NULL,
        score                    DOUBLE PRECISION NOT NULL DEFAULT 0,
        revised_polished_version TEXT NOT NULL DEFAULT '',
        natural_chunks           JSONB NOT NULL DEFAULT '[]',
        feedback                 TEXT NOT NULL DEFAULT '',
        improved_answer          TEXT NOT NULL DEFAULT '',
        strengths                TEXT[] NOT NULL DEFAULT '{}',
        improvements             TEXT[] NOT NULL DEFAULT '{}',
        is_text_input            BOOLEAN NOT NULL DEFAULT TRUE,
        created_at               TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )
    "#,
    r#"
    CREATE INDEX IF NOT EXISTS practice_attempts_lookup
        ON practice_attempts (question_id, subtopic_id, island_id, user_id)
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS library_backups (
        username    TEXT PRIMARY KEY,
        library     JSONB NOT NULL,
        points      JSONB NOT NULL DEFAULT '[]',
        last_backup TIMESTAMPTZ NOT NULL
    )
    "#,
];

/// Creates the tables if they are missing. Safe to run on every start.
pub async fn ensure_schema(pool: &PgPool) -> Result<()> {
    for statement in SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Document store schema ready");
    Ok(())
}

/// Persistence for practice attempts and library backups.
///
/// Carried in `AppState` as `Arc<dyn DocumentStore>`.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_attempt(&self, attempt: &NewAttempt) -> Result<Uuid, AppError>;

    /// Attempts for one learner and question, newest first.
    async fn list_attempts(&self, key: &AttemptKey) -> Result<Vec<AttemptRow>, AppError>;

    /// Replaces the user's previous backup.
    async fn put_backup(&self, backup: &LibraryBackup) -> Result<(), AppError>;

    async fn get_backup(&self, username: &str) -> Result<Option<LibraryBackup>, AppError>;
}

pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BackupRow {
    username: String,
    library: Json<Vec<VocabularyEntry>>,
    points: Json<Vec<PointsRecord>>,
    last_backup: chrono::DateTime<chrono::Utc>,
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn insert_attempt(&self, attempt: &NewAttempt) -> Result<Uuid, AppError> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO practice_attempts
                (id, question_id, subtopic_id, island_id, user_id, user_answer, score,
                 revised_polished_version, natural_chunks, feedback, improved_answer,
                 strengths, improvements, is_text_input)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(id)
        .bind(attempt.question_id)
        .bind(&attempt.subtopic_id)
        .bind(&attempt.island_id)
        .bind(&attempt.user_id)
        .bind(&attempt.user_answer)
        .bind(attempt.score)
        .bind(&attempt.revised_polished_version)
        .bind(Json(&attempt.natural_chunks))
        .bind(&attempt.feedback)
        .bind(&attempt.improved_answer)
        .bind(&attempt.strengths)
        .bind(&attempt.improvements)
        .bind(attempt.is_text_input)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn list_attempts(&self, key: &AttemptKey) -> Result<Vec<AttemptRow>, AppError> {
        let rows = sqlx::query_as::<_, AttemptRow>(
            r#"
            SELECT * FROM practice_attempts
            WHERE question_id = $1 AND subtopic_id = $2 AND island_id = $3 AND user_id = $4
            ORDER BY created_at DESC
            "#,
        )
        .bind(key.question_id)
        .bind(&key.subtopic_id)
        .bind(&key.island_id)
        .bind(&key.user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn put_backup(&self, backup: &LibraryBackup) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO library_backups (username, library, points, last_backup)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (username) DO UPDATE
            SET library = EXCLUDED.library,
                points = EXCLUDED.points,
                last_backup = EXCLUDED.last_backup
            "#,
        )
        .bind(&backup.username)
        .bind(Json(&backup.library))
        .bind(Json(&backup.points))
        .bind(backup.last_backup)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn get_backup(&self, username: &str) -> Result<Option<LibraryBackup>, AppError> {
        let row: Option<BackupRow> =
            sqlx::query_as("SELECT * FROM library_backups WHERE username = $1")
                .bind(username)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|r| LibraryBackup {
            username: r.username,
            library: r.library.0,
            points: r.points.0,
            last_backup: r.last_backup,
        }))
    }
}

#[cfg(test)]
pub mod memory {
    //! In-process `DocumentStore` for handler tests.

    use std::sync::Mutex;

    use chrono::Utc;

    use super::*;

    #[derive(Default)]
    pub struct MemoryStore {
        attempts: Mutex<Vec<AttemptRow>>,
        backups: Mutex<Vec<LibraryBackup>>,
    }

    #[async_trait]
    impl DocumentStore for MemoryStore {
        async fn insert_attempt(&self, attempt: &NewAttempt) -> Result<Uuid, AppError> {
            let id = Uuid::new_v4();
            let row = AttemptRow {
                id,
                question_id: attempt.question_id,
                subtopic_id: attempt.subtopic_id.clone(),
                island_id: attempt.island_id.clone(),
                user_id: attempt.user_id.clone(),
                user_answer: attempt.user_answer.clone(),
                score: attempt.score,
                revised_polished_version: attempt.revised_polished_version.clone(),
                natural_chunks: serde_json::Value::Array(attempt.natural_chunks.clone()),
                feedback: attempt.feedback.clone(),
                improved_answer: attempt.improved_answer.clone(),
                strengths: attempt.strengths.clone(),
                improvements: attempt.improvements.clone(),
                is_text_input: attempt.is_text_input,
                created_at: Utc::now(),
            };
            self.attempts.lock().unwrap().push(row);
            Ok(id)
        }

        async fn list_attempts(&self, key: &AttemptKey) -> Result<Vec<AttemptRow>, AppError> {
            let mut rows: Vec<AttemptRow> = self
                .attempts
                .lock()
                .unwrap()
                .iter()
                .filter(|r| {
                    r.question_id == key.question_id
                        && r.subtopic_id == key.subtopic_id
                        && r.island_id == key.island_id
                        && r.user_id == key.user_id
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(rows)
        }

        async fn put_backup(&self, backup: &LibraryBackup) -> Result<(), AppError> {
            let mut backups = self.backups.lock().unwrap();
            backups.retain(|b| b.username != backup.username);
            backups.push(backup.clone());
            Ok(())
        }

        async fn get_backup(&self, username: &str) -> Result<Option<LibraryBackup>, AppError> {
            Ok(self
                .backups
                .lock()
                .unwrap()
                .iter()
                .find(|b| b.username == username)
                .cloned())
        }
    }
}
