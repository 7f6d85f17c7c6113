//! Password hashing
//! Mission: Keep stored credentials expensive to brute-force

use anyhow::{Context, Result};
use tracing::warn;

/// Hash a plaintext password with bcrypt at the given cost
pub fn hash_password(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost).context("Failed to hash password")
}

/// Check a plaintext password against a stored bcrypt hash.
///
/// A stored hash bcrypt cannot parse counts as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match bcrypt::verify(password, stored_hash) {
        Ok(valid) => valid,
        Err(e) => {
            warn!("Stored password hash could not be checked: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_then_verify() {
        let hash = hash_password("@Doktari123", TEST_COST).unwrap();
        assert!(hash.starts_with("$2"));
        assert!(verify_password("@Doktari123", &hash));
        assert!(!verify_password("@doktari123", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same", TEST_COST).unwrap();
        let b = hash_password("same", TEST_COST).unwrap();
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_malformed_hash_is_rejected() {
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
        assert!(!verify_password("anything", ""));
    }

    #[test]
    fn test_invalid_cost_fails() {
        assert!(hash_password("pw", 2).is_err());
    }
}
