//! Key derivation using PBKDF2-HMAC-SHA256
//!
//! Derives a 256-bit AES key from a user password and a random salt.
//! A fresh salt is generated for every save, so identical passwords never
//! produce correlated key material across snapshots.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::crypto::secure_memory::Password;
use crate::error::{KoferError, KoferResult};

/// Size of the key-derivation salt in bytes (128 bits)
pub const SALT_SIZE: usize = 16;

/// Minimum permitted PBKDF2 iteration count (2^16)
pub const MIN_ITERATIONS: u32 = 65_536;

/// Parameters for key derivation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KdfParams {
    /// PBKDF2 iteration count
    pub iterations: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            iterations: MIN_ITERATIONS,
        }
    }
}

impl KdfParams {
    /// Create params with a custom iteration count
    ///
    /// Counts below [`MIN_ITERATIONS`] are rejected; lowering the work
    /// factor would make offline brute force cheap.
    pub fn with_iterations(iterations: u32) -> KoferResult<Self> {
        if iterations < MIN_ITERATIONS {
            return Err(KoferError::Validation(format!(
                "Iteration count must be at least {}",
                MIN_ITERATIONS
            )));
        }
        Ok(Self { iterations })
    }
}

/// A derived encryption key
///
/// Zeroed on drop so key material does not linger in memory.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct DerivedKey {
    /// The 32-byte key for AES-256
    key: [u8; 32],
}

impl DerivedKey {
    /// Get the key bytes
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.key
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DerivedKey").finish_non_exhaustive()
    }
}

/// Derive an encryption key from a password and salt
///
/// Deterministic: the same (password, salt, params) always yields the
/// same key. The empty password is rejected up front.
pub fn derive_key(
    password: &Password,
    salt: &[u8; SALT_SIZE],
    params: &KdfParams,
) -> KoferResult<DerivedKey> {
    if password.is_empty() {
        return Err(KoferError::Validation("Password must not be empty".into()));
    }

    let mut key = [0u8; 32];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, params.iterations, &mut key);

    Ok(DerivedKey { key })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_salt() -> [u8; SALT_SIZE] {
        [7u8; SALT_SIZE]
    }

    #[test]
    fn test_derive_key() {
        let key = derive_key(&Password::new("test_password"), &test_salt(), &KdfParams::default())
            .unwrap();
        assert_eq!(key.as_bytes().len(), 32);
    }

    #[test]
    fn test_same_inputs_same_key() {
        let params = KdfParams::default();
        let key1 = derive_key(&Password::new("test_password"), &test_salt(), &params).unwrap();
        let key2 = derive_key(&Password::new("test_password"), &test_salt(), &params).unwrap();
        assert_eq!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_password_different_key() {
        let params = KdfParams::default();
        let key1 = derive_key(&Password::new("password1"), &test_salt(), &params).unwrap();
        let key2 = derive_key(&Password::new("password2"), &test_salt(), &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_different_salt_different_key() {
        let params = KdfParams::default();
        let key1 = derive_key(&Password::new("same_password"), &[1u8; SALT_SIZE], &params).unwrap();
        let key2 = derive_key(&Password::new("same_password"), &[2u8; SALT_SIZE], &params).unwrap();
        assert_ne!(key1.as_bytes(), key2.as_bytes());
    }

    #[test]
    fn test_empty_password_rejected() {
        let result = derive_key(&Password::new(""), &test_salt(), &KdfParams::default());
        assert!(matches!(result, Err(KoferError::Validation(_))));
    }

    #[test]
    fn test_iteration_floor_enforced() {
        assert!(KdfParams::with_iterations(1_000).is_err());
        let params = KdfParams::with_iterations(100_000).unwrap();
        assert_eq!(params.iterations, 100_000);
    }

    #[test]
    fn test_key_debug_redacted() {
        let key = derive_key(&Password::new("test_password"), &test_salt(), &KdfParams::default())
            .unwrap();
        let debug = format!("{:?}", key);
        assert!(debug.contains("DerivedKey"));
        assert!(!debug.contains("key:"));
    }
}
