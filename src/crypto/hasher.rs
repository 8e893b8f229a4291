//! Salted password digests
//!
//! Secrets are first reduced with SHA-256 and Base64-encoded, so every input
//! reaches the slow hash as a short fixed-length ASCII string. The result is
//! then hashed with Argon2id using a random salt and stored as a PHC string
//! (`$argon2id$v=19$m=...,t=...,p=...$salt$hash`).

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::error::{AbaError, AbaResult};

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashCost {
    /// Memory cost in KiB
    pub memory_kib: u32,
    /// Number of passes over memory
    pub iterations: u32,
    /// Degree of parallelism
    pub lanes: u32,
}

impl HashCost {
    /// The cost used for every stored credential (19 MiB, 2 passes, 1 lane)
    pub const DEFAULT: HashCost = HashCost {
        memory_kib: 19 * 1024,
        iterations: 2,
        lanes: 1,
    };

    #[cfg(test)]
    pub(crate) const FAST: HashCost = HashCost {
        memory_kib: 1024,
        iterations: 1,
        lanes: 1,
    };
}

impl Default for HashCost {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Computes and verifies salted password digests
#[derive(Clone)]
pub struct CredentialHasher {
    argon2: Argon2<'static>,
}

impl CredentialHasher {
    /// Create a hasher with the standard cost
    pub fn new() -> Self {
        // DEFAULT is within Argon2's documented bounds
        let params = Params::new(
            HashCost::DEFAULT.memory_kib,
            HashCost::DEFAULT.iterations,
            HashCost::DEFAULT.lanes,
            None,
        )
        .unwrap_or_default();
        Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Create a hasher with explicit cost parameters
    pub fn with_cost(cost: HashCost) -> AbaResult<Self> {
        let params = Params::new(cost.memory_kib, cost.iterations, cost.lanes, None)
            .map_err(|e| AbaError::Config(format!("Invalid Argon2 parameters: {}", e)))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }

    /// Hash a secret with a fresh random salt
    pub fn hash(&self, secret: &str) -> AbaResult<String> {
        let normalized = normalize(secret);
        let salt = SaltString::generate(&mut OsRng);

        let hash = self
            .argon2
            .hash_password(normalized.as_bytes(), &salt)
            .map_err(|e| AbaError::Storage(format!("Password hashing failed: {}", e)))?;

        Ok(hash.to_string())
    }

    /// Check a secret against a stored PHC string
    ///
    /// A stored value that does not parse as a password hash is a failed
    /// verification, never an error.
    pub fn verify(&self, secret: &str, stored: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored) else {
            tracing::warn!("Stored credential is not a valid password hash");
            return false;
        };

        let normalized = normalize(secret);
        self.argon2
            .verify_password(normalized.as_bytes(), &parsed)
            .is_ok()
    }
}

impl Default for CredentialHasher {
    fn default() -> Self {
        Self::new()
    }
}

/// SHA-256 then Base64, so the slow hash always sees 44 ASCII bytes
fn normalize(secret: &str) -> Zeroizing<String> {
    let digest = Sha256::digest(secret.as_bytes());
    Zeroizing::new(STANDARD.encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> CredentialHasher {
        CredentialHasher::with_cost(HashCost::FAST).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let stored = hasher.hash("TestPass123").unwrap();

        assert!(stored.starts_with("$argon2id$"));
        assert!(hasher.verify("TestPass123", &stored));
        assert!(!hasher.verify("TestPass124", &stored));
    }

    #[test]
    fn test_salted() {
        let hasher = hasher();
        let first = hasher.hash("TestPass123").unwrap();
        let second = hasher.hash("TestPass123").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_no_colon_in_hash() {
        // The account file uses ':' as its separator
        let stored = hasher().hash("TestPass123").unwrap();
        assert!(!stored.contains(':'));
    }

    #[test]
    fn test_garbage_hash_fails_verification() {
        let hasher = hasher();
        assert!(!hasher.verify("TestPass123", ""));
        assert!(!hasher.verify("TestPass123", "not-a-hash"));
        assert!(!hasher.verify("TestPass123", "$2b$12$abcdefghijklmnopqrstuv"));
    }

    #[test]
    fn test_verification_uses_stored_cost() {
        let cheap = hasher();
        let stored = cheap.hash("TestPass123").unwrap();

        let other = CredentialHasher::with_cost(HashCost {
            memory_kib: 2048,
            iterations: 2,
            lanes: 1,
        })
        .unwrap();
        assert!(other.verify("TestPass123", &stored));
    }

    #[test]
    fn test_normalize_is_fixed_length() {
        assert_eq!(normalize("a").len(), 44);
        assert_eq!(normalize(&"x".repeat(500)).len(), 44);
    }

    #[test]
    fn test_invalid_cost_rejected() {
        let result = CredentialHasher::with_cost(HashCost {
            memory_kib: 1,
            iterations: 0,
            lanes: 1,
        });
        assert!(matches!(result, Err(AbaError::Config(_))));
    }
}
