//! Phonebook use-case services.
//!
//! # Responsibility
//! - Orchestrate store, filter and form into front-end level APIs.
//! - Keep CLI/FFI layers decoupled from storage details.

pub mod contact_store;
pub mod filter;
pub mod form;
pub mod phonebook;
