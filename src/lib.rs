//! kofer - encrypted personal ledger
//!
//! This library persists a small financial domain model (transactions,
//! loans, repayments) to a single file, encrypted under a user-supplied
//! password. Front ends (CLI, TUI) interact only through [`Ledger`] and
//! [`store::EncryptedStore`]; the crypto modules are internal plumbing.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Store-file path resolution
//! - `error`: Custom error types
//! - `models`: Core data models (transactions, loans, repayments, snapshot)
//! - `crypto`: Key derivation and authenticated encryption
//! - `store`: Encrypted single-file storage layer
//! - `ledger`: The aggregate that enforces invariants and mediates persistence
//!
//! # Example
//!
//! ```rust,ignore
//! use kofer::config::KoferPaths;
//! use kofer::crypto::Password;
//! use kofer::ledger::Ledger;
//! use kofer::store::EncryptedStore;
//!
//! let paths = KoferPaths::new()?;
//! let store = EncryptedStore::new(paths.store_file());
//! let ledger = Ledger::open(store, Password::new("hunter2"))?;
//! ```

pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;

pub use error::{KoferError, KoferResult};
pub use ledger::Ledger;
