// store/mod.rs — Persistent task store.
//
// All task records live in a single SQLite table (WAL mode). Each row has:
//   - id: UUID v4 string, assigned here on creation, immutable
//   - name: non-empty display name
//   - description: free text, empty string when the client omits it
//   - due_date / created_date: RFC 3339 UTC text (lexicographic order is
//     chronological order, so ORDER BY works on the raw column)
//   - status: label derived from (due_date, created_date), recomputed on
//     every create and edit, never accepted from a client

use anyhow::{anyhow, Context as _, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{sqlite::SqliteConnectOptions, ConnectOptions, SqlitePool};
use std::{path::Path, str::FromStr};
use uuid::Uuid;

use crate::error::{TaskError, CREATE_FIELDS_REQUIRED, EDIT_FIELDS_REQUIRED};
use crate::status::compute_status;

/// Default timeout for individual SQLite queries.
/// Bounds every store call: a hung query fails the request instead of
/// blocking it indefinitely.
const QUERY_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Execute a future with the standard query timeout.
/// Returns a storage error if the operation takes longer than `QUERY_TIMEOUT`.
async fn with_timeout<T>(
    fut: impl std::future::Future<Output = Result<T, TaskError>>,
) -> Result<T, TaskError> {
    match tokio::time::timeout(QUERY_TIMEOUT, fut).await {
        Ok(result) => result,
        Err(_) => Err(TaskError::Storage(anyhow!(
            "database query timed out after {}s",
            QUERY_TIMEOUT.as_secs()
        ))),
    }
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: String,
    pub created_date: String,
    pub status: String,
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub async fn new(data_dir: &Path) -> Result<Self> {
        Self::new_with_slow_query(data_dir, 0).await
    }

    /// Open (creating if missing) the task database under `data_dir`.
    ///
    /// `slow_query_ms` is the threshold in milliseconds; queries exceeding
    /// it are logged at WARN level. Set to 0 to disable slow-query logging.
    pub async fn new_with_slow_query(data_dir: &Path, slow_query_ms: u64) -> Result<Self> {
        tokio::fs::create_dir_all(data_dir).await?;
        let db_path = data_dir.join("taskrd.db");
        let mut opts =
            SqliteConnectOptions::from_str(&format!("sqlite://{}?mode=rwc", db_path.display()))?
                .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
                .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
                .create_if_missing(true);

        if slow_query_ms > 0 {
            opts = opts.log_slow_statements(
                log::LevelFilter::Warn,
                std::time::Duration::from_millis(slow_query_ms),
            );
        }

        let pool = SqlitePool::connect_with(opts).await?;
        Self::migrate(&pool).await?;
        Ok(Self { pool })
    }

    /// Return a clone of the connection pool (cheap, Arc-backed).
    pub fn pool(&self) -> SqlitePool {
        self.pool.clone()
    }

    /// Create the tasks table and its indexes. Idempotent: every
    /// statement is IF NOT EXISTS, so startup can always run this.
    async fn migrate(pool: &SqlitePool) -> Result<()> {
        let stmts = [
            "CREATE TABLE IF NOT EXISTS tasks (
                id           TEXT PRIMARY KEY,
                name         TEXT NOT NULL,
                description  TEXT NOT NULL DEFAULT '',
                due_date     TEXT NOT NULL,
                created_date TEXT NOT NULL,
                status       TEXT NOT NULL
            )",
            "CREATE INDEX IF NOT EXISTS idx_tasks_created_date ON tasks(created_date DESC)",
            "CREATE INDEX IF NOT EXISTS idx_tasks_name ON tasks(name)",
        ];
        for stmt in stmts {
            sqlx::query(stmt)
                .execute(pool)
                .await
                .context("Failed to run task store migration")?;
        }
        Ok(())
    }

    // ─── Operations ──────────────────────────────────────────────────────────

    /// Every task, most recently created first. Equal timestamps tie-break
    /// on id so the order is deterministic.
    pub async fn list_tasks(&self) -> Result<Vec<TaskRow>, TaskError> {
        with_timeout(async {
            Ok(
                sqlx::query_as("SELECT * FROM tasks ORDER BY created_date DESC, id DESC")
                    .fetch_all(&self.pool)
                    .await?,
            )
        })
        .await
    }

    /// Insert a new task. The store assigns the id and creation time and
    /// derives the status; the caller supplies everything else.
    pub async fn create_task(
        &self,
        name: &str,
        description: &str,
        due_date: DateTime<Utc>,
    ) -> Result<TaskRow, TaskError> {
        if name.is_empty() {
            return Err(TaskError::validation(CREATE_FIELDS_REQUIRED));
        }
        with_timeout(async {
            let id = Uuid::new_v4().to_string();
            let created_date = Utc::now();
            let status = compute_status(due_date, created_date);
            sqlx::query(
                "INSERT INTO tasks (id, name, description, due_date, created_date, status)
                 VALUES (?, ?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(name)
            .bind(description)
            .bind(due_date.to_rfc3339())
            .bind(created_date.to_rfc3339())
            .bind(status.as_str())
            .execute(&self.pool)
            .await?;
            self.get_task(&id)
                .await?
                .ok_or_else(|| TaskError::Storage(anyhow!("task {id} not found after insert")))
        })
        .await
    }

    /// Update a task's name, description, and due date, re-deriving the
    /// status against the original creation date.
    ///
    /// The created-date read and the row update run in one transaction, so
    /// the read-modify-write is atomic under concurrent edits to the same
    /// id (last write wins; edits to different ids never interfere).
    pub async fn edit_task(
        &self,
        id: &str,
        name: &str,
        description: &str,
        due_date: DateTime<Utc>,
    ) -> Result<TaskRow, TaskError> {
        if id.is_empty() || name.is_empty() {
            return Err(TaskError::validation(EDIT_FIELDS_REQUIRED));
        }
        with_timeout(async {
            let mut tx = self.pool.begin().await?;

            let existing: Option<(String,)> =
                sqlx::query_as("SELECT created_date FROM tasks WHERE id = ?")
                    .bind(id)
                    .fetch_optional(&mut *tx)
                    .await?;
            let Some((created_raw,)) = existing else {
                return Err(TaskError::NotFound);
            };
            let created_date = parse_stored_timestamp(&created_raw)?;
            let status = compute_status(due_date, created_date);

            let result = sqlx::query(
                "UPDATE tasks SET name = ?, description = ?, due_date = ?, status = ? WHERE id = ?",
            )
            .bind(name)
            .bind(description)
            .bind(due_date.to_rfc3339())
            .bind(status.as_str())
            .bind(id)
            .execute(&mut *tx)
            .await?;
            // A concurrent delete between read and write leaves nothing to
            // update, so report the same not-found the read path does.
            if result.rows_affected() == 0 {
                return Err(TaskError::NotFound);
            }
            tx.commit().await?;

            self.get_task(id)
                .await?
                .ok_or_else(|| TaskError::Storage(anyhow!("task {id} not found after update")))
        })
        .await
    }

    /// All tasks whose name contains `pattern` as a substring, ordered by
    /// name ascending. Matching is case-insensitive (SQLite LIKE, ASCII);
    /// LIKE metacharacters in the pattern match literally. The empty
    /// pattern matches every task.
    pub async fn search_tasks(&self, pattern: &str) -> Result<Vec<TaskRow>, TaskError> {
        let like = format!("%{}%", escape_like(pattern));
        with_timeout(async {
            Ok(sqlx::query_as(
                "SELECT * FROM tasks WHERE name LIKE ? ESCAPE '\\' ORDER BY name ASC",
            )
            .bind(&like)
            .fetch_all(&self.pool)
            .await?)
        })
        .await
    }

    pub async fn count_tasks(&self) -> Result<u64, TaskError> {
        with_timeout(async {
            let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tasks")
                .fetch_one(&self.pool)
                .await?;
            Ok(row.0 as u64)
        })
        .await
    }

    async fn get_task(&self, id: &str) -> Result<Option<TaskRow>, TaskError> {
        Ok(sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?)
    }
}

/// Parse a timestamp this store wrote earlier. Failure means the row was
/// corrupted outside the API: a storage error, not client input.
fn parse_stored_timestamp(raw: &str) -> Result<DateTime<Utc>, TaskError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| TaskError::Storage(anyhow!("unparseable stored timestamp {raw:?}: {err}")))
}

/// Escape LIKE metacharacters so a search pattern matches literally.
fn escape_like(pattern: &str) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    for c in pattern.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
