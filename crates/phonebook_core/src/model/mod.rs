//! Phonebook domain model.
//!
//! # Responsibility
//! - Define the canonical contact record shared by store, filter and form.
//!
//! # Invariants
//! - Every contact is identified by a stable `ContactId`.
//! - Deletion is a hard removal from the ordered sequence.

pub mod contact;
