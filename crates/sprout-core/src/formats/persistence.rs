//! # Persistence Format
//!
//! Binary serialization for profile snapshots.
//!
//! Format: Header (5 bytes) + postcard-serialized profile data.
//! - 4 bytes: Magic ("SPRT")
//! - 1 byte: Version
//!
//! The same bytes back the redb store, file export/import (backup), and
//! the HTTP export endpoint, so save -> load -> save is bit-exact. All
//! pre-deserialization validation (size limits, header) happens before
//! the payload is parsed.

use crate::profile::Profile;
use crate::types::SproutError;

// =============================================================================
// FORMAT CONSTANTS
// =============================================================================

/// Magic bytes for the Sprout snapshot format header.
pub const MAGIC_BYTES: &[u8; 4] = b"SPRT";

/// Current serialization format version.
///
/// Increment this when making breaking changes to the snapshot format.
pub const FORMAT_VERSION: u8 = 1;

/// Maximum allowed snapshot payload size.
///
/// A profile is small (goals, inventory ids, themes); 16 MB is a generous
/// upper bound that still prevents allocation DoS from corrupted data.
pub const MAX_SNAPSHOT_SIZE: usize = 16 * 1024 * 1024;

/// Minimum valid snapshot size (header only).
const MIN_SNAPSHOT_SIZE: usize = 5;

// =============================================================================
// FILE HEADER
// =============================================================================

/// The snapshot header precedes all profile data.
#[derive(Debug, Clone, Copy)]
pub struct PersistenceHeader {
    pub magic: [u8; 4],
    pub version: u8,
}

impl PersistenceHeader {
    /// Create a new header with current format version.
    #[must_use]
    pub fn new() -> Self {
        Self {
            magic: *MAGIC_BYTES,
            version: FORMAT_VERSION,
        }
    }

    /// Validate the header.
    pub fn validate(&self) -> Result<(), SproutError> {
        if &self.magic != MAGIC_BYTES {
            return Err(SproutError::DeserializationError(
                "Invalid magic bytes".to_string(),
            ));
        }
        if self.version != FORMAT_VERSION {
            return Err(SproutError::DeserializationError(format!(
                "Unsupported version: {} (expected {})",
                self.version, FORMAT_VERSION
            )));
        }
        Ok(())
    }

    /// Write header to bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 5] {
        let mut bytes = [0u8; 5];
        bytes[0..4].copy_from_slice(&self.magic);
        bytes[4] = self.version;
        bytes
    }

    /// Read header from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SproutError> {
        if bytes.len() < MIN_SNAPSHOT_SIZE {
            return Err(SproutError::DeserializationError(
                "Header too short".to_string(),
            ));
        }
        let mut magic = [0u8; 4];
        magic.copy_from_slice(&bytes[0..4]);
        Ok(Self {
            magic,
            version: bytes[4],
        })
    }
}

impl Default for PersistenceHeader {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// SERIALIZATION FUNCTIONS
// =============================================================================

/// Serialize a profile to snapshot bytes (header + payload).
///
/// This is a pure transformation - no file I/O.
pub fn profile_to_bytes(profile: &Profile) -> Result<Vec<u8>, SproutError> {
    let header = PersistenceHeader::new();
    let payload =
        postcard::to_stdvec(profile).map_err(|e| SproutError::SerializationError(e.to_string()))?;

    let mut result = Vec::with_capacity(MIN_SNAPSHOT_SIZE + payload.len());
    result.extend_from_slice(&header.to_bytes());
    result.extend_from_slice(&payload);
    Ok(result)
}

/// Deserialize a profile from snapshot bytes.
///
/// Validates minimum size, maximum size, and the header — in that order —
/// before attempting payload deserialization.
pub fn profile_from_bytes(bytes: &[u8]) -> Result<Profile, SproutError> {
    if bytes.len() < MIN_SNAPSHOT_SIZE {
        return Err(SproutError::DeserializationError(
            "Data too short: minimum 5 bytes required".to_string(),
        ));
    }
    if bytes.len() > MAX_SNAPSHOT_SIZE {
        return Err(SproutError::DeserializationError(format!(
            "Data size {} bytes exceeds maximum allowed {} bytes",
            bytes.len(),
            MAX_SNAPSHOT_SIZE
        )));
    }

    let header = PersistenceHeader::from_bytes(bytes)?;
    header.validate()?;

    let payload = &bytes[MIN_SNAPSHOT_SIZE..];
    postcard::from_bytes(payload).map_err(|e| {
        SproutError::DeserializationError(format!("Failed to deserialize profile data: {}", e))
    })
}

/// Deterministic XOR/rotate checksum over snapshot bytes.
///
/// Not cryptographic — a cheap integrity check for backup files, stable
/// across platforms.
#[must_use]
pub fn snapshot_checksum(bytes: &[u8]) -> u64 {
    let mut checksum: u64 = 0xcbf2_9ce4_8422_2325;
    for &byte in bytes {
        checksum ^= u64::from(byte);
        checksum = checksum.rotate_left(7);
    }
    checksum
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{SavingsGoal, VisualKind};
    use chrono::NaiveDate;

    fn sample_profile() -> Profile {
        let mut profile = Profile::new();
        let mut goal = SavingsGoal::fixed("bike", "Bike", 300.0, VisualKind::Plant, None);
        goal.deposit(
            NaiveDate::from_ymd_opt(2025, 5, 5).expect("date"),
            120.0,
        )
        .expect("deposit");
        profile.add_goal(goal).expect("add");
        profile
    }

    #[test]
    fn header_roundtrip() {
        let header = PersistenceHeader::new();
        let bytes = header.to_bytes();
        let restored = PersistenceHeader::from_bytes(&bytes).expect("parse header");

        assert_eq!(restored.magic, *MAGIC_BYTES);
        assert_eq!(restored.version, FORMAT_VERSION);
    }

    #[test]
    fn bytes_roundtrip_bit_exact() {
        let profile = sample_profile();

        let bytes1 = profile_to_bytes(&profile).expect("first serialize");
        let restored = profile_from_bytes(&bytes1).expect("deserialize");
        let bytes2 = profile_to_bytes(&restored).expect("second serialize");

        assert_eq!(restored, profile);
        assert_eq!(
            bytes1, bytes2,
            "save -> load -> save must produce identical bytes"
        );
    }

    #[test]
    fn invalid_magic_rejected() {
        let mut bytes = profile_to_bytes(&Profile::new()).expect("serialize");
        bytes[0..4].copy_from_slice(b"XXXX");
        assert!(profile_from_bytes(&bytes).is_err());
    }

    #[test]
    fn wrong_version_rejected() {
        let mut bytes = profile_to_bytes(&Profile::new()).expect("serialize");
        bytes[4] = FORMAT_VERSION + 1;
        assert!(profile_from_bytes(&bytes).is_err());
    }

    #[test]
    fn truncated_data_rejected() {
        assert!(profile_from_bytes(&[]).is_err());
        assert!(profile_from_bytes(b"SPR").is_err());
    }

    #[test]
    fn checksum_is_stable_and_content_sensitive() {
        let bytes1 = profile_to_bytes(&sample_profile()).expect("serialize");
        let bytes2 = profile_to_bytes(&Profile::new()).expect("serialize");

        assert_eq!(snapshot_checksum(&bytes1), snapshot_checksum(&bytes1));
        assert_ne!(snapshot_checksum(&bytes1), snapshot_checksum(&bytes2));
    }
}
