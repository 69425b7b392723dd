//! # Storage
//!
//! Disk-backed profile storage.
//!
//! Per the "redb compromise": redb provides ACID crash safety at runtime,
//! while the canonical snapshot bytes (see [`crate::formats`]) remain the
//! bit-exact source of truth for backup and verification.

mod redb_store;

pub use redb_store::RedbStore;
