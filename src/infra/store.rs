//! Embedded SQLite retention store.
//!
//! Holds collected command and process records under the agent directory and
//! implements the age-based cleanup the retention job runs. Timestamps are
//! stored as fixed-width RFC 3339 UTC strings so string comparison orders
//! them chronologically.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{Connection, params};

use crate::application::ports::RetentionStore;
use crate::domain::telemetry::{CommandRecord, ProcessRecord};

/// Database file name inside the agent directory.
pub const DB_FILE_NAME: &str = "oda.db";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS commands (
    id INTEGER PRIMARY KEY,
    command TEXT NOT NULL,
    directory TEXT NOT NULL DEFAULT '',
    recorded_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS processes (
    id INTEGER PRIMARY KEY,
    pid INTEGER NOT NULL,
    name TEXT NOT NULL,
    cpu REAL NOT NULL DEFAULT 0,
    memory REAL NOT NULL DEFAULT 0,
    recorded_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_commands_recorded ON commands(recorded_at);
CREATE INDEX IF NOT EXISTS idx_processes_recorded ON processes(recorded_at);
";

/// SQLite-backed implementation of [`RetentionStore`].
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Open (or create) the database at `path` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory or database cannot be
    /// created.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let conn = Connection::open(path)
            .with_context(|| format!("opening database {}", path.display()))?;
        conn.execute_batch(SCHEMA).context("applying schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("opening in-memory database")?;
        conn.execute_batch(SCHEMA).context("applying schema")?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| anyhow!("store mutex poisoned"))
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_command(
        &self,
        command: &str,
        directory: &str,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO commands (command, directory, recorded_at) VALUES (?1, ?2, ?3)",
            params![command, directory, ts(recorded_at)],
        )
        .context("inserting command")?;
        Ok(conn.last_insert_rowid())
    }

    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn insert_process(
        &self,
        pid: i64,
        name: &str,
        cpu: f64,
        memory: f64,
        recorded_at: DateTime<Utc>,
    ) -> Result<i64> {
        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO processes (pid, name, cpu, memory, recorded_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![pid, name, cpu, memory, ts(recorded_at)],
        )
        .context("inserting process")?;
        Ok(conn.last_insert_rowid())
    }

    /// Most recent commands, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_commands(&self, limit: u32) -> Result<Vec<CommandRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, command, directory, recorded_at FROM commands \
             ORDER BY recorded_at DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("reading commands")?;
        rows.into_iter().map(command_record).collect()
    }

    /// Most recent process samples, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn recent_processes(&self, limit: u32) -> Result<Vec<ProcessRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, pid, name, cpu, memory, recorded_at FROM processes \
             ORDER BY recorded_at DESC LIMIT ?1",
        )?;
        let rows = stmt
            .query_map([limit], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("reading processes")?;
        rows.into_iter().map(process_record).collect()
    }
}

impl RetentionStore for SqliteStore {
    fn commands_since(&self, since: DateTime<Utc>) -> Result<Vec<CommandRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, command, directory, recorded_at FROM commands \
             WHERE recorded_at > ?1 ORDER BY recorded_at ASC",
        )?;
        let rows = stmt
            .query_map([ts(since)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("reading commands")?;
        rows.into_iter().map(command_record).collect()
    }

    fn processes_since(&self, since: DateTime<Utc>) -> Result<Vec<ProcessRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, pid, name, cpu, memory, recorded_at FROM processes \
             WHERE recorded_at > ?1 ORDER BY recorded_at ASC",
        )?;
        let rows = stmt
            .query_map([ts(since)], |row| {
                Ok((
                    row.get::<_, i64>(0)?,
                    row.get::<_, i64>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, f64>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, String>(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()
            .context("reading processes")?;
        rows.into_iter().map(process_record).collect()
    }

    fn delete_commands_older_than(&self, days: u32) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM commands WHERE recorded_at < ?1",
            params![ts(cutoff)],
        )
        .context("deleting old commands")
    }

    fn delete_processes_older_than(&self, days: u32) -> Result<usize> {
        let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
        let conn = self.lock()?;
        conn.execute(
            "DELETE FROM processes WHERE recorded_at < ?1",
            params![ts(cutoff)],
        )
        .context("deleting old processes")
    }
}

/// Fixed-width RFC 3339 UTC, so lexicographic order is chronological order.
fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_ts(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("parsing stored timestamp {raw}"))
}

fn command_record(row: (i64, String, String, String)) -> Result<CommandRecord> {
    Ok(CommandRecord {
        id: row.0,
        command: row.1,
        directory: row.2,
        recorded_at: parse_ts(&row.3)?,
    })
}

fn process_record(row: (i64, i64, String, f64, f64, String)) -> Result<ProcessRecord> {
    Ok(ProcessRecord {
        id: row.0,
        pid: row.1,
        name: row.2,
        cpu: row.3,
        memory: row.4,
        recorded_at: parse_ts(&row.5)?,
    })
}

// ── Unit tests ───────────────────────────────────────────────────────────────
