//! Contact domain model.
//!
//! # Responsibility
//! - Define the persisted `{id, name, number}` record.
//! - Provide the case-folding rule used for duplicate detection and filtering.
//!
//! # Invariants
//! - `id` is assigned once at creation and never reused for another contact.
//! - Name comparisons go through `fold_name` so that every caller agrees on
//!   what "the same name" means.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Opaque contact identifier.
///
/// Generated ids are simple-format UUIDs, but any string loaded from a
/// snapshot is accepted verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(String);

impl ContactId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl From<String> for ContactId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for ContactId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl Display for ContactId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One phonebook entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    /// Display name; unique within a store after case folding.
    pub name: String,
    /// Free-form phone number, no uniqueness constraint.
    pub number: String,
}

impl Contact {
    /// Creates a contact with a generated id.
    pub fn new(name: impl Into<String>, number: impl Into<String>) -> Self {
        Self::with_id(ContactId::generate(), name, number)
    }

    /// Creates a contact with a caller-provided id.
    ///
    /// Used by snapshot loading where identity already exists.
    pub fn with_id(id: ContactId, name: impl Into<String>, number: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            number: number.into(),
        }
    }

    /// Returns whether `other` names the same person under case folding.
    pub fn has_name(&self, other: &str) -> bool {
        fold_name(&self.name) == fold_name(other)
    }
}

/// Case-folds a name for comparison.
pub fn fold_name(value: &str) -> String {
    value.to_lowercase()
}
