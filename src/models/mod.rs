//! Core data models for kofer
//!
//! This module contains the data structures of the lending/spending
//! domain: transactions, loans, repayments, and the snapshot that is the
//! unit of persistence.

pub mod ids;
pub mod loan;
pub mod money;
pub mod snapshot;
pub mod transaction;

pub use ids::{IdSource, LoanId, RandomIdSource, TransactionId};
pub use loan::{Loan, Repayment};
pub use money::Money;
pub use snapshot::Snapshot;
pub use transaction::{Transaction, TransactionType};
