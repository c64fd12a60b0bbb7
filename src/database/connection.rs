/*!
 * SQLite connection handling.
 *
 * A single connection guarded by a mutex, shared across tasks. Queries
 * run through `spawn_blocking` so rusqlite's synchronous API never
 * blocks the tokio runtime.
 */

use anyhow::{Context, Result};
use log::{debug, info};
use rusqlite::Connection;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use super::schema;

const DB_FILENAME: &str = "vocabforge.db";
const DB_DIRNAME: &str = "vocabforge";

/// Shared handle to the SQLite database
#[derive(Clone)]
pub struct DatabaseConnection {
    path: PathBuf,
    conn: Arc<Mutex<Connection>>,
}

impl DatabaseConnection {
    /// Open (or create) the database file and bring the schema up to date
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Cannot create database directory {:?}", parent))?;
        }

        info!("Opening database at {:?}", path);
        let conn = Connection::open(&path)
            .with_context(|| format!("Cannot open database {:?}", path))?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path,
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the database at the per-user default location
    pub fn new_default() -> Result<Self> {
        Self::new(Self::default_database_path()?)
    }

    /// Open a throwaway in-memory database (for testing)
    pub fn new_in_memory() -> Result<Self> {
        debug!("Opening in-memory database");

        let conn = Connection::open_in_memory().context("Cannot open in-memory database")?;
        schema::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Where the database lives when no path is configured
    pub fn default_database_path() -> Result<PathBuf> {
        let base = dirs::data_local_dir()
            .or_else(dirs::data_dir)
            .or_else(|| dirs::home_dir().map(|h| h.join(".local").join("share")))
            .ok_or_else(|| anyhow::anyhow!("No user data directory available"))?;

        Ok(base.join(DB_DIRNAME).join(DB_FILENAME))
    }

    /// The database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
        conn.lock()
            .map_err(|e| anyhow::anyhow!("Database lock poisoned: {}", e))
    }

    /// Run a closure against the connection on the current thread.
    /// Async code should prefer `execute_async`.
    pub fn execute<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let guard = Self::lock(&self.conn)?;
        f(&guard)
    }

    /// Run a closure against the connection on the blocking pool
    pub async fn execute_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let guard = Self::lock(&conn)?;
            f(&guard)
        })
        .await
        .context("Database task panicked")?
    }

    /// Run a closure inside a transaction; commit on Ok, roll back on Err
    pub fn transaction<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T>,
    {
        let mut guard = Self::lock(&self.conn)?;
        let tx = guard.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }

    /// Transactional variant of `execute_async`
    pub async fn transaction_async<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&rusqlite::Transaction) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);

        tokio::task::spawn_blocking(move || {
            let mut guard = Self::lock(&conn)?;
            let tx = guard.transaction()?;
            let value = f(&tx)?;
            tx.commit()?;
            Ok(value)
        })
        .await
        .context("Database task panicked")?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_newInMemory_shouldCreateValidConnection() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create in-memory DB");
        assert_eq!(db.path().to_string_lossy(), ":memory:");
    }

    #[test]
    fn test_execute_shouldRunOperation() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let result = db.execute(|conn| {
            let count: i64 = conn.query_row("SELECT 1 + 1", [], |row| row.get(0))?;
            Ok(count)
        });

        assert_eq!(result.unwrap(), 2);
    }

    #[test]
    fn test_transaction_shouldCommitOnSuccess() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        db.transaction(|tx| {
            tx.execute(
                "INSERT INTO topics (id, name, created_at, updated_at)
                 VALUES ('tx-test', 'Animals', datetime('now'), datetime('now'))",
                [],
            )?;
            Ok(())
        })
        .expect("Transaction failed");

        let count: i64 = db
            .execute(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM topics WHERE id = 'tx-test'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn test_transaction_shouldRollBackOnError() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let result: Result<()> = db.transaction(|tx| {
            tx.execute(
                "INSERT INTO topics (id, name, created_at, updated_at)
                 VALUES ('rollback-test', 'Animals', datetime('now'), datetime('now'))",
                [],
            )?;
            Err(anyhow::anyhow!("forced failure"))
        });
        assert!(result.is_err());

        let count: i64 = db
            .execute(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM topics WHERE id = 'rollback-test'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .unwrap();

        assert_eq!(count, 0, "Insert should have been rolled back");
    }

    #[tokio::test]
    async fn test_executeAsync_shouldRunInBlockingContext() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        let result = db
            .execute_async(|conn| {
                let count: i64 = conn.query_row("SELECT 42", [], |row| row.get(0))?;
                Ok(count)
            })
            .await;

        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_transactionAsync_shouldCommit() {
        let db = DatabaseConnection::new_in_memory().expect("Failed to create DB");

        db.transaction_async(|tx| {
            tx.execute(
                "INSERT INTO topics (id, name, created_at, updated_at)
                 VALUES ('async-tx-test', 'Colors', datetime('now'), datetime('now'))",
                [],
            )?;
            Ok(())
        })
        .await
        .expect("Async transaction failed");

        let count: i64 = db
            .execute_async(|conn| {
                Ok(conn.query_row(
                    "SELECT COUNT(*) FROM topics WHERE id = 'async-tx-test'",
                    [],
                    |row| row.get(0),
                )?)
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
    }
}
