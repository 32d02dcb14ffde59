//! Transaction model
//!
//! Represents a single credit or debit entry. Transactions are immutable
//! once created; the ledger only ever appends them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KoferError, KoferResult};

use super::ids::TransactionId;
use super::money::Money;

/// Direction of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money coming in
    Credit,
    /// Money going out
    Debit,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Credit => write!(f, "Credit"),
            Self::Debit => write!(f, "Debit"),
        }
    }
}

/// A financial transaction
///
/// All fields are read-only after construction; there are no mutators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier
    pub id: TransactionId,

    /// Transaction date
    pub date: NaiveDate,

    /// Amount as a non-negative magnitude; direction lives in `kind`
    pub amount: Money,

    /// Credit or debit
    pub kind: TransactionType,

    /// Category label (e.g. groceries, utilities)
    pub category: String,

    /// Optional free-form description
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Create a new transaction and validate its fields
    pub fn new(
        id: TransactionId,
        date: NaiveDate,
        amount: Money,
        kind: TransactionType,
        category: impl Into<String>,
        description: Option<String>,
    ) -> KoferResult<Self> {
        let tx = Self {
            id,
            date,
            amount,
            kind,
            category: category.into().trim().to_string(),
            description,
        };
        tx.validate()?;
        Ok(tx)
    }

    /// Validate field-level rules
    pub fn validate(&self) -> KoferResult<()> {
        if self.amount.is_negative() {
            return Err(KoferError::Validation(
                "Transaction amount must not be negative".into(),
            ));
        }
        if self.category.trim().is_empty() {
            return Err(KoferError::Validation(
                "Transaction category must not be empty".into(),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {} ({}) - {}",
            self.date.format("%Y-%m-%d"),
            self.kind,
            self.amount,
            self.category,
            self.description.as_deref().unwrap_or("")
        )
    }
}
