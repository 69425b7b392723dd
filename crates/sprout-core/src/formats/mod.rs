//! # Formats
//!
//! Serialization formats for profile snapshots. File I/O lives in the app
//! layer; everything here is pure byte transformation.

pub mod persistence;

pub use persistence::{
    PersistenceHeader, profile_from_bytes, profile_to_bytes, snapshot_checksum,
};
