//! Cryptographic functions for kofer
//!
//! Provides AES-256-GCM authenticated encryption with PBKDF2-HMAC-SHA256
//! key derivation for at-rest encryption of the ledger snapshot.

pub mod encryption;
pub mod key_derivation;
pub mod secure_memory;

pub use encryption::{decrypt, encrypt, NONCE_SIZE};
pub use key_derivation::{derive_key, DerivedKey, KdfParams, SALT_SIZE};
pub use secure_memory::Password;
