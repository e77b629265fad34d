//! FFI use-case API for UI-shell calls.
//!
//! # Responsibility
//! - Expose the phonebook form/list/filter flow as sync functions.
//! - Flatten core errors into envelopes the UI can show directly.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every call reopens the phonebook from storage, so the slot is the only
//!   state shared between calls.

use log::warn;
use phonebook_core::db::open_db;
use phonebook_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    ContactId, ContactRow, FormError, Phonebook, PhonebookConfig, SqliteKeyValueStorage,
    StoreError,
};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Health-check API for bridge smoke tests.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and the error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One contact row as rendered by the list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactItem {
    pub id: String,
    pub name: String,
    pub number: String,
    /// `"<name>: <number>"`.
    pub label: String,
}

impl From<ContactRow> for ContactItem {
    fn from(row: ContactRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            number: row.number,
            label: row.label,
        }
    }
}

/// Filtered list envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactListResponse {
    pub ok: bool,
    pub items: Vec<ContactItem>,
    /// Total contacts before filtering.
    pub total: u32,
    pub message: String,
}

/// Add/delete envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactActionResponse {
    pub ok: bool,
    /// Id of the created or removed contact.
    pub contact_id: Option<String>,
    /// `true` when the failure should be shown as a blocking alert.
    pub blocking: bool,
    pub message: String,
}

impl ContactActionResponse {
    fn success(message: impl Into<String>, contact_id: Option<String>) -> Self {
        Self {
            ok: true,
            contact_id,
            blocking: false,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>, blocking: bool) -> Self {
        Self {
            ok: false,
            contact_id: None,
            blocking,
            message: message.into(),
        }
    }
}

/// Lists contacts whose name contains `filter` (case-insensitive).
#[flutter_rust_bridge::frb(sync)]
pub fn contacts_list(filter: Option<String>) -> ContactListResponse {
    contacts_list_at(&resolve_db_path(), filter.unwrap_or_default())
}

/// Validates and adds a contact.
///
/// Fields are validated as typed; surrounding whitespace is not stripped.
/// A duplicate name returns `blocking = true` with the user-facing notice.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_add(name: String, number: String) -> ContactActionResponse {
    contact_add_at(&resolve_db_path(), name, number)
}

/// Deletes a contact by id. Unknown ids succeed without changes.
#[flutter_rust_bridge::frb(sync)]
pub fn contact_delete(id: String) -> ContactActionResponse {
    contact_delete_at(&resolve_db_path(), id)
}

fn contacts_list_at(db_path: &Path, filter: String) -> ContactListResponse {
    let result = with_phonebook(db_path, |phonebook| {
        phonebook.set_filter(filter);
        let total = u32::try_from(phonebook.store().len()).unwrap_or(u32::MAX);
        let items = phonebook
            .visible_rows()
            .into_iter()
            .map(ContactItem::from)
            .collect::<Vec<_>>();
        (total, items)
    });

    match result {
        Ok((total, items)) => {
            let message = if items.is_empty() {
                "No contacts.".to_string()
            } else {
                format!("Showing {} of {} contact(s).", items.len(), total)
            };
            ContactListResponse {
                ok: true,
                items,
                total,
                message,
            }
        }
        Err(err) => ContactListResponse {
            ok: false,
            items: Vec::new(),
            total: 0,
            message: format!("contacts_list failed: {err}"),
        },
    }
}

fn contact_add_at(db_path: &Path, name: String, number: String) -> ContactActionResponse {
    let result = with_phonebook(db_path, |phonebook| phonebook.add_contact(name, number));

    match result {
        Ok(Ok(contact)) => {
            ContactActionResponse::success("Contact added.", Some(contact.id.to_string()))
        }
        Ok(Err(FormError::Store(StoreError::DuplicateName(dup)))) => {
            ContactActionResponse::failure(dup.to_string(), true)
        }
        Ok(Err(err)) => ContactActionResponse::failure(err.to_string(), false),
        Err(err) => ContactActionResponse::failure(format!("contact_add failed: {err}"), false),
    }
}

fn contact_delete_at(db_path: &Path, id: String) -> ContactActionResponse {
    let id = ContactId::from(id);
    let result = with_phonebook(db_path, |phonebook| phonebook.delete_contact(&id));

    match result {
        Ok(Ok(Some(removed))) => {
            ContactActionResponse::success("Contact deleted.", Some(removed.id.to_string()))
        }
        Ok(Ok(None)) => ContactActionResponse::success("No matching contact.", None),
        Ok(Err(err)) => {
            ContactActionResponse::failure(format!("contact_delete failed: {err}"), false)
        }
        Err(err) => ContactActionResponse::failure(format!("contact_delete failed: {err}"), false),
    }
}

fn resolve_db_path() -> PathBuf {
    DB_PATH
        .get_or_init(|| PhonebookConfig::from_env().db_path)
        .clone()
}

fn with_phonebook<T>(
    db_path: &Path,
    f: impl FnOnce(&mut Phonebook<SqliteKeyValueStorage<'_>>) -> T,
) -> Result<T, String> {
    let conn = open_db(db_path).map_err(|err| {
        warn!("event=ffi_open module=ffi status=error error={err}");
        format!("phonebook DB open failed: {err}")
    })?;
    let storage = SqliteKeyValueStorage::try_new(&conn)
        .map_err(|err| format!("phonebook storage init failed: {err}"))?;
    let mut phonebook =
        Phonebook::open(storage).map_err(|err| format!("phonebook load failed: {err}"))?;
    Ok(f(&mut phonebook))
}

#[cfg(test)]
mod tests {
    use super::{contact_add_at, contact_delete_at, contacts_list_at, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn add_list_delete_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ffi.sqlite3");

        let added = contact_add_at(&db, "Rosie Simpson".into(), "459-12-56".into());
        assert!(added.ok, "{}", added.message);
        let id = added.contact_id.clone().unwrap();

        let listed = contacts_list_at(&db, "rosie".into());
        assert!(listed.ok);
        assert_eq!(listed.total, 1);
        assert_eq!(listed.items[0].label, "Rosie Simpson: 459-12-56");

        let deleted = contact_delete_at(&db, id.clone());
        assert!(deleted.ok);
        assert_eq!(deleted.contact_id, Some(id));
        assert!(contacts_list_at(&db, String::new()).items.is_empty());
    }

    #[test]
    fn duplicate_name_is_blocking_failure() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ffi.sqlite3");

        assert!(contact_add_at(&db, "Alice".into(), "555-1234".into()).ok);
        let dup = contact_add_at(&db, "alice".into(), "555-9999".into());
        assert!(!dup.ok);
        assert!(dup.blocking);
        assert_eq!(dup.message, "\"alice\" is already in contacts.");
    }

    #[test]
    fn invalid_input_is_not_blocking() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ffi.sqlite3");

        let invalid = contact_add_at(&db, "Alice".into(), "nope".into());
        assert!(!invalid.ok);
        assert!(!invalid.blocking);
        assert!(contacts_list_at(&db, String::new()).items.is_empty());
    }

    #[test]
    fn padded_fields_are_validated_as_typed() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ffi.sqlite3");

        let padded = contact_add_at(&db, " Adrian".into(), "459-12-56".into());
        assert!(!padded.ok);
        assert!(!padded.blocking);
        assert!(padded.message.starts_with("invalid name"));
        assert!(contacts_list_at(&db, String::new()).items.is_empty());
    }

    #[test]
    fn unknown_id_delete_succeeds_without_change() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ffi.sqlite3");

        let result = contact_delete_at(&db, "missing".into());
        assert!(result.ok);
        assert_eq!(result.contact_id, None);
    }
}
