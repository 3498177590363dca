// gov-circuit-core/src/core/audit.rs
// ============================================================================
// Module: Hash Chain & Audit Entries
// Description: Content-addressed, prev-linked audit chain entries.
// Purpose: Tamper-evident record of every enforcement action.
// Dependencies: crate::core::{hashing, time}, serde
// ============================================================================

//! ## Overview
//! The hash chain is the Intervenor's audit trail. `first`/`append` build
//! entries; `verify` recomputes every `entry_hash` and checks
//! `previous_hash` linkage without mutating the chain. A verifier that
//! cannot reproduce a hash reports which entry broke first.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::hashing::CHAIN_HASH_LEN;
use crate::core::hashing::HashError;
use crate::core::hashing::canonical_json_bytes;
use crate::core::hashing::sha256_hex;
use crate::core::time::Timestamp;

/// `previous_hash` value of the first entry in any chain.
pub const GENESIS: &str = "genesis";

// ============================================================================
// SECTION: Audit Entry
// ============================================================================

/// One link in an enforcement audit chain.
///
/// # Invariants
/// - `previous_hash` is `"genesis"` for the first entry in a chain, else
///   the prior entry's `entry_hash`.
/// - `entry_hash` is a 32-hex SHA-256 prefix over
///   `previous_hash || canonical(action, actor, details, timestamp)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    /// UTC timestamp the entry was appended at.
    pub timestamp: Timestamp,
    /// Stable action label (e.g. `"gate_start"`, `"enforcement_applied"`).
    pub action: String,
    /// Identifier of the actor that produced this entry.
    pub actor: String,
    /// Free-form details for this entry.
    pub details: serde_json::Value,
    /// Hash of the previous entry, or `"genesis"` for the first entry.
    pub previous_hash: String,
    /// Thirty-two-hex-char SHA-256 prefix binding this entry to the chain.
    pub entry_hash: String,
}

/// Fields hashed (together with `previous_hash`) to produce
/// [`AuditEntry::entry_hash`].
#[derive(Serialize)]
struct HashedFields<'a> {
    action: &'a str,
    actor: &'a str,
    details: &'a serde_json::Value,
    timestamp: Timestamp,
}

/// Computes an entry hash from `previous_hash` and the entry's payload
/// fields: `sha256(previous_hash || canonical(fields))`.
fn entry_hash(
    previous_hash: &str,
    action: &str,
    actor: &str,
    details: &serde_json::Value,
    timestamp: Timestamp,
) -> Result<String, HashError> {
    let hashed = HashedFields { action, actor, details, timestamp };
    let mut bytes = previous_hash.as_bytes().to_vec();
    bytes.extend(canonical_json_bytes(&hashed)?);
    Ok(sha256_hex(&bytes, CHAIN_HASH_LEN))
}

/// Appends the first entry of a new chain (`previous_hash == "genesis"`).
///
/// # Errors
///
/// Returns [`HashError`] when canonicalization fails.
pub fn first(
    action: impl Into<String>,
    actor: impl Into<String>,
    details: serde_json::Value,
    timestamp: Timestamp,
) -> Result<AuditEntry, HashError> {
    let action = action.into();
    let actor = actor.into();
    let hash = entry_hash(GENESIS, &action, &actor, &details, timestamp)?;
    Ok(AuditEntry {
        timestamp,
        action,
        actor,
        details,
        previous_hash: GENESIS.to_string(),
        entry_hash: hash,
    })
}

/// Appends a new entry linked to `previous`.
///
/// # Errors
///
/// Returns [`HashError`] when canonicalization fails.
pub fn append(
    previous: &AuditEntry,
    action: impl Into<String>,
    actor: impl Into<String>,
    details: serde_json::Value,
    timestamp: Timestamp,
) -> Result<AuditEntry, HashError> {
    let action = action.into();
    let actor = actor.into();
    let hash = entry_hash(&previous.entry_hash, &action, &actor, &details, timestamp)?;
    Ok(AuditEntry {
        timestamp,
        action,
        actor,
        details,
        previous_hash: previous.entry_hash.clone(),
        entry_hash: hash,
    })
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Result of verifying a hash chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyResult {
    /// Every entry's hash and linkage was reproduced successfully.
    Valid,
    /// `chain[index]` was the first entry whose hash or linkage did not
    /// match; every subsequent entry is necessarily also invalid.
    Invalid {
        /// Index of the first broken entry.
        index: usize,
    },
}

impl VerifyResult {
    /// Returns true when the chain verified as [`VerifyResult::Valid`].
    #[must_use]
    pub const fn is_valid(self) -> bool {
        matches!(self, Self::Valid)
    }
}

/// Recomputes every `entry_hash` in `chain`, in order, and checks
/// `previous_hash` linkage. Never mutates `chain`.
///
/// # Errors
///
/// Returns [`HashError`] when canonicalization fails while recomputing a
/// hash; this is distinct from the chain itself being tampered with.
pub fn verify(chain: &[AuditEntry]) -> Result<VerifyResult, HashError> {
    let Some(first_entry) = chain.first() else {
        return Ok(VerifyResult::Valid);
    };
    if first_entry.previous_hash != GENESIS {
        return Ok(VerifyResult::Invalid { index: 0 });
    }
    let mut expected_previous = GENESIS.to_string();
    for (index, entry) in chain.iter().enumerate() {
        if entry.previous_hash != expected_previous {
            return Ok(VerifyResult::Invalid { index });
        }
        let recomputed =
            entry_hash(&entry.previous_hash, &entry.action, &entry.actor, &entry.details, entry.timestamp)?;
        if recomputed != entry.entry_hash {
            return Ok(VerifyResult::Invalid { index });
        }
        expected_previous = entry.entry_hash.clone();
    }
    Ok(VerifyResult::Valid)
}

/// Serializes `chain` as newline-delimited canonical JSON, one entry per
/// line.
///
/// # Errors
///
/// Returns [`HashError`] when canonicalization fails.
pub fn export_ndjson(chain: &[AuditEntry]) -> Result<String, HashError> {
    let mut out = String::new();
    for entry in chain {
        let bytes = canonical_json_bytes(entry)?;
        out.push_str(&String::from_utf8_lossy(&bytes));
        out.push('\n');
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, reason = "Test-only panics are permitted.")]

    use serde_json::json;
    use time::macros::datetime;

    use super::GENESIS;
    use super::VerifyResult;
    use super::append;
    use super::first;
    use super::verify;
    use crate::core::time::Timestamp;

    fn at() -> Timestamp {
        Timestamp::new(datetime!(2026-01-01 00:00:00 UTC))
    }

    #[test]
    fn first_entry_links_to_genesis() {
        let entry = first("enforcement_start", "intervenor", json!({}), at()).unwrap();
        assert_eq!(entry.previous_hash, GENESIS);
    }

    #[test]
    fn chain_of_three_entries_verifies() {
        let e1 = first("enforcement_start", "intervenor", json!({}), at()).unwrap();
        let e2 = append(&e1, "gate_start", "intervenor", json!({"gate": 0}), at()).unwrap();
        let e3 = append(&e2, "enforcement_applied", "intervenor", json!({}), at()).unwrap();
        assert_eq!(verify(&[e1, e2, e3]).unwrap(), VerifyResult::Valid);
    }

    #[test]
    fn tampering_with_an_entry_is_detected_and_propagates() {
        let e1 = first("enforcement_start", "intervenor", json!({}), at()).unwrap();
        let mut e2 = append(&e1, "gate_start", "intervenor", json!({"gate": 0}), at()).unwrap();
        let e3 = append(&e2, "enforcement_applied", "intervenor", json!({}), at()).unwrap();
        e2.details = json!({"gate": 999});
        let result = verify(&[e1, e2, e3]).unwrap();
        assert_eq!(result, VerifyResult::Invalid { index: 1 });
    }

    #[test]
    fn empty_chain_verifies_as_valid() {
        assert_eq!(verify(&[]).unwrap(), VerifyResult::Valid);
    }

    fn chain_of(actions: &[&str]) -> Vec<super::AuditEntry> {
        let mut chain = Vec::with_capacity(actions.len());
        for (index, action) in actions.iter().enumerate() {
            let entry = match chain.last() {
                None => first((*action).to_string(), "actor", json!({"index": index}), at()),
                Some(previous) => append(previous, (*action).to_string(), "actor", json!({"index": index}), at()),
            }
            .unwrap();
            chain.push(entry);
        }
        chain
    }

    proptest::proptest! {
        #[test]
        fn untampered_chains_of_any_length_verify_valid(len in 0_usize..12) {
            let actions: Vec<String> = (0..len).map(|i| format!("action-{i}")).collect();
            let refs: Vec<&str> = actions.iter().map(String::as_str).collect();
            let chain = chain_of(&refs);
            proptest::prop_assert_eq!(verify(&chain).unwrap(), VerifyResult::Valid);
        }

        #[test]
        fn tampering_any_single_entry_is_caught_no_later_than_that_entry(
            len in 1_usize..12,
            tamper_at in 0_usize..12,
        ) {
            let tamper_at = tamper_at % len;
            let actions: Vec<String> = (0..len).map(|i| format!("action-{i}")).collect();
            let refs: Vec<&str> = actions.iter().map(String::as_str).collect();
            let mut chain = chain_of(&refs);
            chain[tamper_at].details = json!({"tampered": true});

            let result = verify(&chain).unwrap();
            let VerifyResult::Invalid { index } = result else {
                panic!("a tampered chain must never verify as valid");
            };
            proptest::prop_assert!(index <= tamper_at);
        }
    }
}
