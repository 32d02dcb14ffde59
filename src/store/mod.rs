//! Storage layer for kofer
//!
//! A single encrypted file holds the whole snapshot. Writes go through a
//! temp file plus atomic rename so a crash mid-write never leaves a
//! truncated store.

pub mod encrypted_store;

pub use encrypted_store::EncryptedStore;

use crate::crypto::Password;
use crate::error::KoferResult;
use crate::models::Snapshot;

/// Persistence interface the ledger writes through
///
/// Abstracting over the concrete store lets tests drive the ledger with
/// an injected failing store to exercise the rollback path.
pub trait SnapshotStore {
    /// Load the snapshot, deriving the key from `password`
    fn load(&self, password: &Password) -> KoferResult<Snapshot>;

    /// Persist the snapshot, replacing any previous contents atomically
    fn save(&self, snapshot: &Snapshot, password: &Password) -> KoferResult<()>;
}
