// gov-circuit-core/src/core/hashing.rs
// ============================================================================
// Module: Canonical Hashing
// Description: RFC 8785 JSON canonicalization and content hashing utilities.
// Purpose: Provide deterministic, prefix-truncated hashes for every artifact
//          the circuit emits (threshold events, predictions, audit entries).
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Every artifact hash in the circuit (`event_hash`, `prediction_hash`,
//! `audit_hash`, `entry_hash`) is a hex-encoded prefix of a SHA-256 digest
//! over the RFC 8785 canonical JSON form of the artifact's hashed fields.
//! Canonicalization failure is fatal to the enclosing operation; there is no
//! partial hash.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when computing canonical hashes.
#[derive(Debug, Error)]
pub enum HashError {
    /// JSON canonicalization failed.
    #[error("failed to canonicalize json: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Canonical JSON
// ============================================================================

/// Returns canonical JSON bytes for a serializable value using RFC 8785.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_json_bytes<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(value).map_err(|err| HashError::Canonicalization(err.to_string()))
}

// ============================================================================
// SECTION: Hash Prefixes
// ============================================================================

/// Hashes canonical JSON and truncates to `hex_len` hex characters.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn hash_prefix<T: Serialize + ?Sized>(value: &T, hex_len: usize) -> Result<String, HashError> {
    let bytes = canonical_json_bytes(value)?;
    Ok(sha256_hex(&bytes, hex_len))
}

/// Hashes raw bytes and truncates to `hex_len` hex characters.
#[must_use]
pub fn sha256_hex(bytes: &[u8], hex_len: usize) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let full = hex_encode(&digest);
    full.chars().take(hex_len).collect()
}

/// Length in hex characters of an `event_hash`, `prediction_hash`, or
/// `audit_hash`.
pub const SHORT_HASH_LEN: usize = 16;

/// Length in hex characters of an `entry_hash` in the audit chain.
pub const CHAIN_HASH_LEN: usize = 32;

/// Length in hex characters of an event bus `event_id`.
pub const EVENT_ID_LEN: usize = 12;

// ============================================================================
// SECTION: Hex Encoding
// ============================================================================

/// Encodes bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use serde::Serialize;

    use super::hash_prefix;
    use super::sha256_hex;

    #[derive(Serialize)]
    struct Sample {
        a: u32,
        b: String,
    }

    #[test]
    fn identical_fields_hash_identically() {
        let one = Sample { a: 1, b: "x".to_string() };
        let two = Sample { a: 1, b: "x".to_string() };
        assert_eq!(hash_prefix(&one, 16).unwrap(), hash_prefix(&two, 16).unwrap());
    }

    #[test]
    fn prefix_length_is_honored() {
        let value = Sample { a: 7, b: "y".to_string() };
        assert_eq!(hash_prefix(&value, 16).unwrap().len(), 16);
        assert_eq!(hash_prefix(&value, 32).unwrap().len(), 32);
    }

    #[test]
    fn raw_bytes_hash_is_deterministic() {
        assert_eq!(sha256_hex(b"payload", 32), sha256_hex(b"payload", 32));
        assert_ne!(sha256_hex(b"payload", 32), sha256_hex(b"payload2", 32));
    }
}
