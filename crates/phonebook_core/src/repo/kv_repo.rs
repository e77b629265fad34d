//! Key-value slot storage contracts and implementations.
//!
//! # Responsibility
//! - Provide a string-in/string-out slot API (`get`/`set`) by key.
//! - Back it with SQLite for durable sessions and a map for ephemeral ones.
//!
//! # Invariants
//! - `set` replaces the whole value of a slot; there are no partial writes.
//! - SQLite adapters only accept connections with migrations applied.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use log::warn;
use rusqlite::types::ValueRef;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by slot storage adapters.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "storage connection is not initialized: expected schema version {expected_version}, found {actual_version}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Synchronous slot storage, modelled on browser local storage.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed slot storage over the `kv_entries` table.
pub struct SqliteKeyValueStorage<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStorage<'conn> {
    /// Wraps a connection returned by `db::open_db*`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not the latest.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStorage for SqliteKeyValueStorage<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| Ok(slot_text(key, row.get_ref(0)?)),
            )
            .optional()?;
        Ok(value.flatten())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}

// Slot values are opaque to storage: bytes that are not UTF-8 are decoded
// lossily and left for the payload parser to reject.
fn slot_text(key: &str, value: ValueRef<'_>) -> Option<String> {
    match value {
        ValueRef::Null => None,
        ValueRef::Integer(number) => Some(number.to_string()),
        ValueRef::Real(number) => Some(number.to_string()),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => match std::str::from_utf8(bytes) {
            Ok(text) => Some(text.to_string()),
            Err(err) => {
                warn!(
                    "event=kv_get module=repo status=lossy key={key} bytes={} error={err}",
                    bytes.len()
                );
                Some(String::from_utf8_lossy(bytes).into_owned())
            }
        },
    }
}

/// In-process slot storage.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStorage {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates storage with one slot pre-populated.
    pub fn with_entry(key: impl Into<String>, value: impl Into<String>) -> Self {
        let storage = Self::new();
        storage.entries.borrow_mut().insert(key.into(), value.into());
        storage
    }

    /// Returns a copy of the raw slot value, bypassing the trait.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl KeyValueStorage for MemoryKeyValueStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.raw(key))
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStorage, MemoryKeyValueStorage};

    #[test]
    fn memory_storage_overwrites_slot() {
        let storage = MemoryKeyValueStorage::new();
        assert_eq!(storage.get("contacts").unwrap(), None);

        storage.set("contacts", "[]").unwrap();
        storage.set("contacts", "[1]").unwrap();
        assert_eq!(storage.get("contacts").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn borrowed_storage_forwards_calls() {
        let storage = MemoryKeyValueStorage::with_entry("k", "v");
        let borrowed = &storage;
        borrowed.set("k", "w").unwrap();
        assert_eq!(storage.raw("k").as_deref(), Some("w"));
    }
}
