//! Password hashing and verification.
//!
//! A stored credential is either an adaptive (bcrypt-family) hash or a
//! legacy plaintext value written before hashing was enforced. Only the
//! orchestrator may compare legacy values; this module rejects anything
//! that is not hash-shaped.

use bcrypt::{hash, verify};
use plaza_core::{Error, Result};

/// Prefixes produced by the bcrypt family.
const HASH_MARKERS: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

/// Cost factor for new hashes.
pub const HASH_COST: u32 = 10;

/// Whether a stored credential is shaped like an adaptive hash. Anything
/// else is a legacy value eligible for one-time migration at login.
pub fn is_adaptive(stored: &str) -> bool {
    HASH_MARKERS.iter().any(|m| stored.starts_with(m))
}

/// Verify a presented secret against a stored hash.
///
/// A stored value that is not adaptive-hash-shaped is rejected outright —
/// including when it equals the presented secret byte-for-byte. Parse
/// failures are swallowed, so a malformed hash and a mismatch present
/// identically to the caller.
pub fn verify_secret(plain: &str, stored: &str) -> bool {
    if !is_adaptive(stored) {
        return false;
    }
    verify(plain, stored).unwrap_or(false)
}

/// Hash a secret with the adaptive algorithm.
pub fn hash_secret(plain: &str) -> Result<String> {
    hash(plain, HASH_COST).map_err(|e| Error::Internal(format!("Failed to hash secret: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plaintext_shaped_values_are_rejected_for_every_secret() {
        assert!(!verify_secret("Momantza", "Momantza"));
        assert!(!verify_secret("anything", "plaintext-not-a-hash"));
        assert!(!verify_secret("plaintext-not-a-hash", "plaintext-not-a-hash"));
        assert!(!verify_secret("", ""));
    }

    #[test]
    fn malformed_hashes_fail_closed() {
        // Marker but nothing parseable behind it.
        assert!(!verify_secret("secret", "$2b$garbage"));
    }

    #[test]
    fn hashed_secrets_round_trip() {
        let hashed = hash_secret("Momantza").unwrap();
        assert!(is_adaptive(&hashed));
        assert!(verify_secret("Momantza", &hashed));
        assert!(!verify_secret("momantza", &hashed));
    }

    #[test]
    fn legacy_values_are_not_adaptive() {
        assert!(!is_adaptive("Momantza"));
        assert!(!is_adaptive(""));
        assert!(is_adaptive("$2b$10$abcdefghijklmnopqrstuv"));
    }
}
