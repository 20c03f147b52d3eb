//! Password hashing and verification using bcrypt
//!
//! bcrypt embeds a fresh random salt in every hash, so the same plaintext
//! never produces the same hash twice, and its verification compares the
//! recomputed digest in constant time. The plaintext is never logged.

use crate::core::error::{LedgerError, Result};

/// Hash a password using bcrypt with the default work factor
pub fn hash_password(password: &str) -> Result<String> {
    hash_password_with_cost(password, bcrypt::DEFAULT_COST)
}

/// Hash a password using bcrypt with an explicit work factor
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String> {
    bcrypt::hash(password, cost)
        .map_err(|e| LedgerError::HashError(format!("Failed to hash password: {}", e)))
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    bcrypt::verify(password, hash)
        .map_err(|e| LedgerError::HashError(format!("Failed to verify password: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // Low cost keeps the tests fast; production uses the configured factor.
    const TEST_COST: u32 = 4;

    #[test]
    fn test_hash_is_not_plaintext() {
        let hash = hash_password_with_cost("secret1", TEST_COST).unwrap();
        assert_ne!(hash, "secret1");
        assert!(hash.starts_with("$2"));
    }

    #[test]
    fn test_repeated_hashes_differ() {
        let first = hash_password_with_cost("secret1", TEST_COST).unwrap();
        let second = hash_password_with_cost("secret1", TEST_COST).unwrap();
        assert_ne!(first, second);

        // Both still verify
        assert!(verify_password("secret1", &first).unwrap());
        assert!(verify_password("secret1", &second).unwrap());
    }

    #[test]
    fn test_wrong_password_fails_verification() {
        let hash = hash_password_with_cost("secret1", TEST_COST).unwrap();
        assert!(!verify_password("secret2", &hash).unwrap());
        assert!(!verify_password("", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        let result = verify_password("secret1", "not-a-bcrypt-hash");
        assert!(matches!(result, Err(LedgerError::HashError(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn prop_hash_verify_round_trip(password in "[a-zA-Z0-9!@#$%^&*]{1,40}") {
            let hash = hash_password_with_cost(&password, TEST_COST).unwrap();
            prop_assert!(verify_password(&password, &hash).unwrap());

            let other = format!("{}x", password);
            prop_assert!(!verify_password(&other, &hash).unwrap());
        }
    }
}
