//! Core domain logic for the phonebook.
//! This crate is the single source of truth for contact invariants.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::PhonebookConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::contact::{Contact, ContactId};
pub use repo::kv_repo::{
    KeyValueStorage, MemoryKeyValueStorage, SqliteKeyValueStorage, StorageError, StorageResult,
};
pub use service::contact_store::{
    ContactStore, DuplicateNameError, StoreError, StoreResult, SubscriptionId,
    CONTACTS_STORAGE_KEY,
};
pub use service::filter::{filter_contacts, ContactFilter};
pub use service::form::{is_valid_name, is_valid_number, ContactForm, FormError};
pub use service::phonebook::{ContactRow, Phonebook};

/// Minimal health-check API for front-end wiring.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
