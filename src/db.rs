use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use rusqlite::{Connection, ErrorCode, OpenFlags, OptionalExtension, Transaction, params};

use crate::storage::KeyValueStore;

const CURRENT_SCHEMA_VERSION: i64 = 1;

/// SQLite-backed key-value store. One row per collection key.
pub struct SqliteStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let conn = match open_migrated(&path) {
            Ok(conn) => conn,
            Err(err) if is_corruption_error(&err) => {
                tracing::error!(path = %path.display(), "database is corrupt, starting fresh: {err:#}");
                recreate_database(&path)?
            }
            Err(err) => return Err(err),
        };
        Ok(Self {
            conn,
            path: Some(path),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        apply_migrations(&mut conn)?;
        Ok(Self { conn, path: None })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn run_with_recovery<T, F>(&mut self, mut operation: F) -> Result<T>
    where
        F: FnMut(&Connection) -> Result<T>,
    {
        match operation(&self.conn) {
            Ok(value) => Ok(value),
            Err(err) if is_corruption_error(&err) => {
                let Some(path) = self.path.clone() else {
                    return Err(err);
                };
                tracing::error!(path = %path.display(), "database is corrupt, starting fresh: {err:#}");
                let old = std::mem::replace(&mut self.conn, Connection::open_in_memory()?);
                let _ = old.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);");
                drop(old);
                self.conn = recreate_database(&path)?;
                operation(&self.conn)
            }
            Err(err) => Err(err),
        }
    }
}

impl KeyValueStore for SqliteStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        get_entry(&self.conn, key)
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.run_with_recovery(|conn| set_entry(conn, key, value))
            .with_context(|| format!("failed to write entry '{key}'"))
    }
}

fn create_connection(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX,
    )?;
    conn.pragma_update(None, "journal_mode", &"WAL")?;
    conn.pragma_update(None, "synchronous", &"NORMAL")?;
    Ok(conn)
}

fn open_migrated(path: &Path) -> Result<Connection> {
    let mut conn = create_connection(path)?;
    apply_migrations(&mut conn)?;
    Ok(conn)
}

fn recreate_database(path: &Path) -> Result<Connection> {
    backup_corrupt_db_files(path)?;
    open_migrated(path)
}

fn backup_corrupt_db_files(db_file: &Path) -> Result<()> {
    let stamp = unix_timestamp();
    for file in [
        db_file.to_path_buf(),
        PathBuf::from(format!("{}-wal", db_file.display())),
        PathBuf::from(format!("{}-shm", db_file.display())),
    ] {
        if file.exists() {
            let backup = PathBuf::from(format!("{}.corrupt.{stamp}", file.display()));
            std::fs::rename(&file, &backup).with_context(|| {
                format!(
                    "failed to move corrupt database file from {} to {}",
                    file.display(),
                    backup.display()
                )
            })?;
        }
    }
    Ok(())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn is_corruption_error(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| {
        if let Some(sql_err) = cause.downcast_ref::<rusqlite::Error>() {
            return matches!(
                sql_err,
                rusqlite::Error::SqliteFailure(code, _)
                    if code.code == ErrorCode::DatabaseCorrupt
                        || code.code == ErrorCode::NotADatabase
            );
        }

        let msg = cause.to_string().to_lowercase();
        msg.contains("database disk image is malformed")
    })
}

fn apply_migrations(conn: &mut Connection) -> Result<()> {
    create_schema_version_table(conn)?;
    let mut version = get_schema_version(conn)?;

    while version < CURRENT_SCHEMA_VERSION {
        let target = version + 1;
        let tx = conn.transaction()?;
        match target {
            1 => migrate_to_v1(&tx)?,
            _ => unreachable!("unsupported schema version migration: {target}"),
        }
        set_schema_version(&tx, target)?;
        tx.commit()?;
        version = target;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS schema_version (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            version INTEGER NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i64> {
    Ok(conn
        .query_row(
            "SELECT version FROM schema_version WHERE id = 1",
            [],
            |row| row.get(0),
        )
        .optional()?
        .unwrap_or(0))
}

fn set_schema_version(tx: &Transaction<'_>, version: i64) -> Result<()> {
    tx.execute(
        "INSERT INTO schema_version(id, version) VALUES (1, ?1)
         ON CONFLICT(id) DO UPDATE SET version = excluded.version",
        [version],
    )?;
    Ok(())
}

fn migrate_to_v1(tx: &Transaction<'_>) -> Result<()> {
    tx.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
        );
        "#,
    )?;
    Ok(())
}

fn set_entry(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO entries(key, value, updated_at) VALUES (?1, ?2, strftime('%s', 'now'))
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        params![key, value],
    )?;
    Ok(())
}

fn get_entry(conn: &Connection, key: &str) -> Result<Option<String>> {
    Ok(conn
        .query_row("SELECT value FROM entries WHERE key = ?1", [key], |row| {
            row.get(0)
        })
        .optional()?)
}
