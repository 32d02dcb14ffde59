//! Encrypted single-file store
//!
//! On-disk format, bit-exact:
//!
//! ```text
//! [salt: 16 bytes][nonce: 12 bytes][ciphertext + tag]
//! ```
//!
//! The payload is the AES-256-GCM encryption of the JSON-serialized
//! snapshot. A fresh salt and nonce are generated on every save, so
//! saving identical content twice produces different bytes both times.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use aes_gcm::aead::{rand_core::RngCore, OsRng};

use crate::crypto::{self, KdfParams, Password, NONCE_SIZE, SALT_SIZE};
use crate::error::{KoferError, KoferResult};
use crate::models::Snapshot;
use crate::store::SnapshotStore;

/// Length of the plaintext header preceding the ciphertext
const HEADER_SIZE: usize = SALT_SIZE + NONCE_SIZE;

/// Encrypted snapshot store backed by a single file
#[derive(Debug, Clone)]
pub struct EncryptedStore {
    path: PathBuf,
    kdf: KdfParams,
}

impl EncryptedStore {
    /// Create a store over the given file path with default KDF parameters
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            kdf: KdfParams::default(),
        }
    }

    /// Create a store with custom KDF parameters
    pub fn with_kdf_params(path: impl Into<PathBuf>, kdf: KdfParams) -> Self {
        Self {
            path: path.into(),
            kdf,
        }
    }

    /// Path of the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Check whether a store file exists on disk
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Write `salt || nonce || ciphertext` to a temp file, sync it, and
    /// atomically install it over the final path.
    fn install_atomically(&self, salt: &[u8], nonce: &[u8], ciphertext: &[u8]) -> KoferResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| {
                    KoferError::Persistence(format!(
                        "Failed to create directory {}: {}",
                        parent.display(),
                        e
                    ))
                })?;
            }
        }

        // Temp file in the same directory, so the rename stays atomic
        let temp_path = self.path.with_extension("dat.tmp");

        let mut file = File::create(&temp_path)
            .map_err(|e| KoferError::Persistence(format!("Failed to create temp file: {}", e)))?;

        let write_result = file
            .write_all(salt)
            .and_then(|_| file.write_all(nonce))
            .and_then(|_| file.write_all(ciphertext))
            .and_then(|_| file.flush())
            .and_then(|_| file.sync_all());

        if let Err(e) = write_result {
            let _ = fs::remove_file(&temp_path);
            return Err(KoferError::Persistence(format!(
                "Failed to write store file: {}",
                e
            )));
        }

        fs::rename(&temp_path, &self.path).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            KoferError::Persistence(format!("Failed to rename temp file: {}", e))
        })?;

        Ok(())
    }
}

impl SnapshotStore for EncryptedStore {
    /// Load and decrypt the snapshot
    ///
    /// Fails with `NotFound` when no store file exists (first run) and
    /// with `Authentication` when the tag check fails, whether the
    /// password is wrong or the file was tampered with.
    fn load(&self, password: &Password) -> KoferResult<Snapshot> {
        if !self.path.exists() {
            return Err(KoferError::store_not_found(self.path.display().to_string()));
        }

        let contents = fs::read(&self.path)
            .map_err(|e| KoferError::Persistence(format!("Failed to read store file: {}", e)))?;

        if contents.len() < HEADER_SIZE {
            return Err(KoferError::Persistence(
                "Store file is too short to contain a header".into(),
            ));
        }

        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&contents[..SALT_SIZE]);
        let mut nonce = [0u8; NONCE_SIZE];
        nonce.copy_from_slice(&contents[SALT_SIZE..HEADER_SIZE]);

        let key = crypto::derive_key(password, &salt, &self.kdf)?;
        let plaintext = crypto::decrypt(&nonce, &contents[HEADER_SIZE..], &key)?;

        serde_json::from_slice(&plaintext)
            .map_err(|e| KoferError::Persistence(format!("Failed to decode snapshot: {}", e)))
    }

    /// Serialize, encrypt, and atomically install the snapshot
    ///
    /// A fresh random salt and nonce are generated for every call.
    fn save(&self, snapshot: &Snapshot, password: &Password) -> KoferResult<()> {
        let plaintext = serde_json::to_vec(snapshot)
            .map_err(|e| KoferError::Persistence(format!("Failed to serialize snapshot: {}", e)))?;

        let mut salt = [0u8; SALT_SIZE];
        OsRng.fill_bytes(&mut salt);

        let key = crypto::derive_key(password, &salt, &self.kdf)?;
        let (nonce, ciphertext) = crypto::encrypt(&plaintext, &key)?;

        self.install_atomically(&salt, &nonce, &ciphertext)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Loan, LoanId, Money, Transaction, TransactionId, TransactionType};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn sample_snapshot() -> Snapshot {
        let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.transactions.push(
            Transaction::new(
                TransactionId::new(),
                date,
                Money::from_cents(4200),
                TransactionType::Debit,
                "groceries",
                Some("market".into()),
            )
            .unwrap(),
        );
        snapshot.loans.push(
            Loan::new(
                LoanId::new(),
                "Carol",
                Money::from_cents(75_000),
                date,
                None,
            )
            .unwrap(),
        );
        snapshot
    }

    fn test_store(dir: &TempDir) -> EncryptedStore {
        EncryptedStore::new(dir.path().join("kofer.dat"))
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let password = Password::new("correct horse");
        let snapshot = sample_snapshot();

        store.save(&snapshot, &password).unwrap();
        let loaded = store.load(&password).unwrap();

        assert_eq!(snapshot, loaded);
    }

    #[test]
    fn test_load_missing_file_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let result = store.load(&Password::new("anything"));
        assert!(matches!(result, Err(KoferError::NotFound { .. })));
    }

    #[test]
    fn test_wrong_password_fails_authentication() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store
            .save(&sample_snapshot(), &Password::new("password-one"))
            .unwrap();

        let result = store.load(&Password::new("password-two"));
        assert!(matches!(result, Err(KoferError::Authentication)));
    }

    #[test]
    fn test_single_byte_flip_fails_authentication() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let password = Password::new("correct horse");

        store.save(&sample_snapshot(), &password).unwrap();
        let original = fs::read(store.path()).unwrap();

        // Flip one byte in each region: salt, nonce, ciphertext body, tag
        for &offset in &[0, SALT_SIZE, HEADER_SIZE + 1, original.len() - 1] {
            let mut tampered = original.clone();
            tampered[offset] ^= 0x01;
            fs::write(store.path(), &tampered).unwrap();

            let result = store.load(&password);
            assert!(
                matches!(result, Err(KoferError::Authentication)),
                "flipping byte {} did not fail authentication",
                offset
            );
        }
    }

    #[test]
    fn test_repeated_saves_produce_different_bytes() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let password = Password::new("correct horse");
        let snapshot = sample_snapshot();

        store.save(&snapshot, &password).unwrap();
        let first = fs::read(store.path()).unwrap();

        store.save(&snapshot, &password).unwrap();
        let second = fs::read(store.path()).unwrap();

        assert_ne!(first, second);
        assert_ne!(first[..SALT_SIZE], second[..SALT_SIZE]);
        assert_ne!(
            first[SALT_SIZE..HEADER_SIZE],
            second[SALT_SIZE..HEADER_SIZE]
        );

        // And both decrypt to the same snapshot
        assert_eq!(store.load(&password).unwrap(), snapshot);
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        store
            .save(&sample_snapshot(), &Password::new("correct horse"))
            .unwrap();

        assert!(store.path().exists());
        assert!(!store.path().with_extension("dat.tmp").exists());
    }

    #[test]
    fn test_truncated_file_is_persistence_error() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        fs::write(store.path(), [0u8; 10]).unwrap();

        let result = store.load(&Password::new("anything"));
        assert!(matches!(result, Err(KoferError::Persistence(_))));
    }

    #[test]
    fn test_empty_snapshot_round_trip() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);
        let password = Password::new("correct horse");

        store.save(&Snapshot::new(), &password).unwrap();
        let loaded = store.load(&password).unwrap();
        assert!(loaded.is_empty());
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let store = EncryptedStore::new(dir.path().join("nested").join("kofer.dat"));

        store
            .save(&Snapshot::new(), &Password::new("correct horse"))
            .unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_empty_password_rejected_on_save() {
        let dir = TempDir::new().unwrap();
        let store = test_store(&dir);

        let result = store.save(&Snapshot::new(), &Password::new(""));
        assert!(matches!(result, Err(KoferError::Validation(_))));
        assert!(!store.exists());
    }
}
