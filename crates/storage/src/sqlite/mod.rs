//! `SQLite` question bank.
//!
//! Questions live in a single `questions` table:
//!
//! | column       | type    | notes                                   |
//! |--------------|---------|-----------------------------------------|
//! | `id`         | INTEGER | primary key, the `QuestionId`           |
//! | `prompt`     | TEXT    | non-empty                               |
//! | `options`    | TEXT    | JSON array of option strings, in order  |
//! | `answer`     | TEXT    | one of `options`                        |
//! | `updated_at` | TEXT    | last upsert time (UTC)                  |
//!
//! Rows are validated through `Question::new` on read, so a hand-edited row
//! with an answer outside its options surfaces as `StorageError::InvalidRecord`.
//! Schema versions are tracked in `schema_migrations`.

use std::sync::Arc;
use std::time::Duration;

use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use thiserror::Error;

use crate::repository::{QuestionBank, Storage};

mod mapping;
mod migrate;
mod question_repo;

/// Pooled connection to a question bank database.
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteRepository {
    /// Open the bank at `database_url` with WAL journaling and a 5s busy timeout.
    ///
    /// Use `?mode=rwc` in the URL to create the file on first run.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the connection cannot be established.
    pub async fn connect(database_url: &str) -> Result<Self, SqliteInitError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(5))
            .after_connect(|conn, _meta| {
                Box::pin(async move {
                    sqlx::query("PRAGMA journal_mode = WAL;")
                        .execute(&mut *conn)
                        .await?;
                    sqlx::query("PRAGMA busy_timeout = 5000;")
                        .execute(&mut *conn)
                        .await?;
                    Ok(())
                })
            })
            .connect(database_url)
            .await?;
        tracing::debug!(url = database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Bring the `questions` table up to the latest schema version.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if migration queries fail.
    pub async fn migrate(&self) -> Result<(), SqliteInitError> {
        migrate::run_migrations(self.pool()).await
    }
}

impl Storage {
    /// Question bank read from `SQLite`, migrated before first use.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if connection or migrations cannot be
    /// completed.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let repo = SqliteRepository::connect(database_url).await?;
        repo.migrate().await?;
        let questions: Arc<dyn QuestionBank> = Arc::new(repo);
        Ok(Self { questions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repository_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SqliteRepository>();
    }
}
