//! Database connection and schema setup
//!
//! Opens the shared SQLite pool at process start and runs the embedded
//! schema migration. All consistency guarantees beyond per-statement
//! atomicity are delegated to the store.

use crate::error::AppError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;

/// Shared database handle
pub struct Database;

impl Database {
    /// Open the connection pool and run migrations
    ///
    /// # Arguments
    /// * `database_url` - SQLite URL or bare file path
    pub async fn connect(database_url: &str) -> Result<SqlitePool, AppError> {
        // SQLite connection string format: sqlite://path/to/db.db
        let connection_string = if database_url.starts_with("sqlite:") {
            database_url.to_string()
        } else {
            format!("sqlite:{}", database_url)
        };

        // Ensure parent directory exists for file-backed databases
        let path = connection_string
            .trim_start_matches("sqlite://")
            .trim_start_matches("sqlite:");
        if path != ":memory:" {
            if let Some(parent) = PathBuf::from(path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        AppError::Internal(anyhow::anyhow!(
                            "Failed to create db directory: {}",
                            e
                        ))
                    })?;
                }
            }
        }

        let options = SqliteConnectOptions::from_str(&connection_string)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database url: {}", e)))?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        info!("Connected to SQLite database at: {}", database_url);

        Self::run_migrations(&pool).await?;

        Ok(pool)
    }

    /// Open an in-memory pool for tests
    ///
    /// A single connection is used so every query sees the same in-memory
    /// database.
    pub async fn connect_in_memory() -> Result<SqlitePool, AppError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid database url: {}", e)))?
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::run_migrations(&pool).await?;

        Ok(pool)
    }

    /// Run database migrations
    async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
        info!("Running database migrations...");

        let migration_sql = include_str!("../migrations/001_create_properties.sql");

        // Strip comment lines and split into statements
        let mut cleaned_sql = String::new();
        for line in migration_sql.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with("--") {
                continue;
            }
            let without_comments = if let Some(comment_pos) = trimmed.find("--") {
                &trimmed[..comment_pos]
            } else {
                trimmed
            };
            cleaned_sql.push_str(without_comments.trim());
            cleaned_sql.push(' ');
        }

        let statements: Vec<&str> = cleaned_sql
            .split(';')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect();

        for statement in statements {
            sqlx::query(statement).execute(pool).await.map_err(|e| {
                AppError::Internal(anyhow::anyhow!(
                    "Migration failed: {} - Statement: {}",
                    e,
                    statement.chars().take(100).collect::<String>()
                ))
            })?;
        }

        info!("Database migrations completed successfully");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_in_memory_creates_schema() {
        let pool = Database::connect_in_memory().await.unwrap();
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM properties")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count.0, 0);
    }

    #[tokio::test]
    async fn test_connect_file_backed() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("nested").join("listings.db");
        let pool = Database::connect(db_path.to_str().unwrap()).await.unwrap();

        // Schema exists and the file was created under the nested directory
        sqlx::query("SELECT COUNT(*) FROM properties")
            .execute(&pool)
            .await
            .unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_migrations_are_idempotent() {
        let pool = Database::connect_in_memory().await.unwrap();
        Database::run_migrations(&pool).await.unwrap();
    }
}
