//! Custom error types for kofer
//!
//! This module defines the error hierarchy for the library using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for kofer operations
#[derive(Error, Debug)]
pub enum KoferError {
    /// Bad field value supplied by the caller; safe to retry with new input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found (missing loan id, or no store file on first run)
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Authentication tag check failed during decryption.
    ///
    /// Covers both a wrong password and a tampered/corrupt store file;
    /// an AEAD cannot distinguish the two, and neither can callers.
    #[error("authentication failed: wrong password or corrupted store")]
    Authentication,

    /// Disk write, sync, or rename failure during persistence
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Domain invariant violation (overpayment, mutating a closed loan)
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl KoferError {
    /// Create a "not found" error for loans
    pub fn loan_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Loan",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for the store file
    pub fn store_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Store",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this is an invariant violation
    pub fn is_invariant(&self) -> bool {
        matches!(self, Self::Invariant(_))
    }
}

/// Result type alias for kofer operations
pub type KoferResult<T> = Result<T, KoferError>;
