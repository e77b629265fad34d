//! Persistence collaborators for the contact store.
//!
//! # Responsibility
//! - Define the key-value slot contract the store mirrors itself into.
//! - Isolate SQLite details from store orchestration.
//!
//! # Invariants
//! - Storage adapters never interpret slot values; they move opaque strings.

pub mod kv_repo;
