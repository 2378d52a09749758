//! Password digest utilities
//!
//! The competition database stores a single-round, unsalted SHA-256 hex
//! digest in `users.password`. This mirrors what the platform's login check
//! computes; it is not a security-grade password scheme.

use sha2::{Digest, Sha256};

/// Hash a string using SHA-256
pub fn hash_string(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let result = hasher.finalize();
    hex::encode(result)
}

/// Verify a hash matches the input
pub fn verify_hash(input: &str, hash: &str) -> bool {
    hash_string(input).eq_ignore_ascii_case(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_string_is_deterministic() {
        let hash1 = hash_string("123456");
        let hash2 = hash_string("123456");
        let hash3 = hash_string("different");

        assert_eq!(hash1, hash2);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_known_digest() {
        assert_eq!(
            hash_string("123456"),
            "8d969eef6ecad3c29a3a629280e686cf0c3f5d5a86aff3ca12020c923adc6c92"
        );
    }

    #[test]
    fn test_verify_hash() {
        let hash = hash_string("123456");

        assert!(verify_hash("123456", &hash));
        assert!(verify_hash("123456", &hash.to_uppercase()));
        assert!(!verify_hash("654321", &hash));
    }
}
