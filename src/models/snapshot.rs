//! Snapshot: the unit of persistence
//!
//! The whole domain state is serialized and encrypted as one value;
//! saves always replace the entire snapshot, never append deltas.

use serde::{Deserialize, Serialize};

use super::loan::Loan;
use super::transaction::Transaction;

/// The complete in-memory state of transactions and loans at one instant
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// All transactions, in append order
    #[serde(default)]
    pub transactions: Vec<Transaction>,

    /// All loans, in append order
    #[serde(default)]
    pub loans: Vec<Loan>,
}

impl Snapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether the snapshot holds no entities
    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty() && self.loans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{LoanId, Money, TransactionId, TransactionType};
    use chrono::NaiveDate;

    #[test]
    fn test_empty_snapshot() {
        let snapshot = Snapshot::new();
        assert!(snapshot.is_empty());
        assert_eq!(snapshot, Snapshot::default());
    }

    #[test]
    fn test_serialization_round_trip() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let mut snapshot = Snapshot::new();
        snapshot.transactions.push(
            crate::models::Transaction::new(
                TransactionId::new(),
                date,
                Money::from_cents(1200),
                TransactionType::Debit,
                "utilities",
                None,
            )
            .unwrap(),
        );
        snapshot.loans.push(
            crate::models::Loan::new(
                LoanId::new(),
                "Bob",
                Money::from_cents(50_000),
                date,
                Some("car repair".into()),
            )
            .unwrap(),
        );

        let json = serde_json::to_vec(&snapshot).unwrap();
        let deserialized: Snapshot = serde_json::from_slice(&json).unwrap();
        assert_eq!(snapshot, deserialized);
    }
}
