//! AES-256-GCM encryption/decryption
//!
//! Provides authenticated encryption for the serialized snapshot. Each
//! encryption call generates a fresh random nonce; nonces are never
//! persisted for reuse, so nonce reuse under one key cannot occur by
//! construction.

use aes_gcm::{
    aead::{rand_core::RngCore, Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::crypto::key_derivation::DerivedKey;
use crate::error::{KoferError, KoferResult};

/// Size of the AES-GCM nonce in bytes (96 bits)
pub const NONCE_SIZE: usize = 12;

/// Encrypt plaintext using AES-256-GCM
///
/// Returns the freshly generated nonce alongside the ciphertext, which
/// carries the 128-bit authentication tag at its end.
pub fn encrypt(plaintext: &[u8], key: &DerivedKey) -> KoferResult<([u8; NONCE_SIZE], Vec<u8>)> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| KoferError::Persistence(format!("Failed to create cipher: {}", e)))?;

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| KoferError::Persistence(format!("Encryption failed: {}", e)))?;

    Ok((nonce_bytes, ciphertext))
}

/// Decrypt ciphertext using AES-256-GCM
///
/// Fails closed with [`KoferError::Authentication`] on any tag mismatch;
/// no partial plaintext is ever returned. A wrong password and a
/// tampered file are indistinguishable here, deliberately.
pub fn decrypt(
    nonce_bytes: &[u8; NONCE_SIZE],
    ciphertext: &[u8],
    key: &DerivedKey,
) -> KoferResult<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key.as_bytes())
        .map_err(|e| KoferError::Persistence(format!("Failed to create cipher: {}", e)))?;

    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| KoferError::Authentication)
}
