//! Filter view over the contact list.
//!
//! # Invariants
//! - Matching is a case-insensitive substring test on `name` only.
//! - Result order follows the input order.
//! - The query is used as typed; it is not trimmed.

use crate::model::contact::{fold_name, Contact};

/// Returns contacts whose name contains `query`, ignoring case.
pub fn filter_contacts<'a>(contacts: &'a [Contact], query: &str) -> Vec<&'a Contact> {
    let needle = fold_name(query);
    contacts
        .iter()
        .filter(|contact| fold_name(&contact.name).contains(needle.as_str()))
        .collect()
}

/// Ephemeral filter state. Never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFilter {
    query: String,
}

impl ContactFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn clear(&mut self) {
        self.query.clear();
    }

    /// Derives the visible subset; recomputed on every call.
    pub fn apply<'a>(&self, contacts: &'a [Contact]) -> Vec<&'a Contact> {
        filter_contacts(contacts, &self.query)
    }
}
