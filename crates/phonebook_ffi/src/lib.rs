//! Sync FFI surface for embedding UI shells.

pub mod api;
