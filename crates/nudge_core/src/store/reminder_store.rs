//! Reminder store contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist the whole reminder list as one serialized snapshot.
//! - Load the last written snapshot, distinguishing "never written" from
//!   "written but unreadable".
//!
//! # Invariants
//! - The store holds exactly one named slot; it has no per-record write path
//!   and no independent mutation path outside `save`.
//! - `save` replaces the snapshot atomically (single upsert statement).
//! - Read paths reject corrupt persisted state instead of masking it; the
//!   caller decides how to degrade.

use crate::db::{current_user_version, latest_version, DbError};
use crate::model::reminder::{now_epoch_ms, Reminder};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key under which the reminder list snapshot is stored.
const SNAPSHOT_SLOT: &str = "reminders";

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence error for reminder snapshot operations.
#[derive(Debug)]
pub enum StoreError {
    Db(DbError),
    /// Connection was opened without running migrations first.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    /// Snapshot payload exists but cannot be decoded.
    InvalidSnapshot(String),
    /// The in-memory list could not be serialized.
    Serialize(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection not migrated: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table: {table}"),
            Self::InvalidSnapshot(message) => {
                write!(f, "invalid persisted reminder snapshot: {message}")
            }
            Self::Serialize(err) => write!(f, "failed to serialize reminder list: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::Serialize(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for StoreError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store interface for the persisted reminder list.
pub trait ReminderStore {
    /// Loads the last persisted list; empty when nothing was ever written.
    fn load(&self) -> StoreResult<Vec<Reminder>>;

    /// Replaces the persisted snapshot with the given list.
    fn save(&self, reminders: &[Reminder]) -> StoreResult<()>;
}

/// SQLite-backed reminder store.
///
/// The list is serialized as a JSON array into a single slot row, so a save
/// is one statement and restart recovery is one read.
pub struct SqliteReminderStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteReminderStore<'conn> {
    /// Wraps a migrated connection, validating the schema contract first.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations have not run.
    /// - `MissingRequiredTable` when the snapshot table is absent.
    pub fn try_new(conn: &'conn Connection) -> StoreResult<Self> {
        let expected_version = latest_version();
        let actual_version = current_user_version(conn)?;
        if actual_version != expected_version {
            return Err(StoreError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let table_exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'snapshots'
            );",
            [],
            |row| row.get(0),
        )?;
        if table_exists == 0 {
            return Err(StoreError::MissingRequiredTable("snapshots"));
        }

        Ok(Self { conn })
    }
}

impl ReminderStore for SqliteReminderStore<'_> {
    fn load(&self) -> StoreResult<Vec<Reminder>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM snapshots WHERE slot = ?1;",
                [SNAPSHOT_SLOT],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            None => Ok(Vec::new()),
            Some(json) => serde_json::from_str(&json)
                .map_err(|err| StoreError::InvalidSnapshot(err.to_string())),
        }
    }

    fn save(&self, reminders: &[Reminder]) -> StoreResult<()> {
        let payload = serde_json::to_string(reminders).map_err(StoreError::Serialize)?;
        self.conn.execute(
            "INSERT INTO snapshots (slot, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(slot) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![SNAPSHOT_SLOT, payload, now_epoch_ms()],
        )?;
        Ok(())
    }
}
