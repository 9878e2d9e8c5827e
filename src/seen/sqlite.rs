use crate::seen::{Fingerprint, SeenError, SeenResult, SeenSet};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

/// Durable SQLite-backed seen-set
///
/// One row per fingerprint, keyed by the hex digest. `mark_seen` uses
/// `INSERT OR IGNORE`, so the first-seen timestamp is write-once.
pub struct SqliteSeenSet {
    conn: Mutex<Connection>,
}

impl SqliteSeenSet {
    /// Opens (or creates) a seen-set database at the given path
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the SQLite database file
    ///
    /// # Returns
    ///
    /// * `Ok(SqliteSeenSet)` - Database opened and schema ensured
    /// * `Err(SeenError)` - Failed to open or migrate
    pub fn open(path: &Path) -> SeenResult<Self> {
        let conn = Connection::open(path)?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Opens an in-memory database, useful for tests
    pub fn open_in_memory() -> SeenResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn init_schema(conn: &Connection) -> SeenResult<()> {
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS seen (
                fingerprint TEXT PRIMARY KEY,
                first_seen TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Returns the first-seen timestamp (RFC 3339) for a fingerprint
    pub fn first_seen(&self, fingerprint: &Fingerprint) -> SeenResult<Option<String>> {
        let conn = self.conn.lock().unwrap();
        let ts: Option<String> = conn
            .query_row(
                "SELECT first_seen FROM seen WHERE fingerprint = ?1",
                params![fingerprint.to_hex()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(ts)
    }
}

impl SeenSet for SqliteSeenSet {
    fn contains(&self, fingerprint: &Fingerprint) -> SeenResult<bool> {
        let conn = self.conn.lock().unwrap();
        let found: Option<i64> = conn
            .query_row(
                "SELECT 1 FROM seen WHERE fingerprint = ?1",
                params![fingerprint.to_hex()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn mark_seen(&self, fingerprint: &Fingerprint) -> SeenResult<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT OR IGNORE INTO seen (fingerprint, first_seen) VALUES (?1, ?2)",
            params![fingerprint.to_hex(), Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    fn len(&self) -> SeenResult<u64> {
        let conn = self.conn.lock().unwrap();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM seen", [], |row| row.get(0))?;
        u64::try_from(count).map_err(|_| SeenError::Corrupt("negative row count".to_string()))
    }
}
