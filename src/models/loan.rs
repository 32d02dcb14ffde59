//! Loan and repayment models
//!
//! A loan tracks money borrowed from a lender and the ordered sequence of
//! repayments made against it. `amount_repaid` is kept equal to the sum
//! of the repayment amounts, and a loan closes automatically the moment
//! its remaining balance reaches zero. Closed loans accept no further
//! mutation.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{KoferError, KoferResult};

use super::ids::LoanId;
use super::money::Money;

/// A repayment made towards a loan
///
/// Immutable once created; repayments are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Repayment {
    /// Amount repaid (always positive)
    pub amount: Money,

    /// Date of the repayment
    pub date: NaiveDate,

    /// Optional note
    #[serde(default)]
    pub note: Option<String>,
}

impl Repayment {
    /// Create a new repayment
    pub fn new(amount: Money, date: NaiveDate, note: Option<String>) -> Self {
        Self { amount, date, note }
    }
}

impl fmt::Display for Repayment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Repayment] {} on {} - {}",
            self.amount,
            self.date.format("%Y-%m-%d"),
            self.note.as_deref().unwrap_or("")
        )
    }
}

/// A loan taken from a lender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier
    pub id: LoanId,

    /// Who the money was borrowed from
    pub lender_name: String,

    /// Total amount borrowed
    pub amount_borrowed: Money,

    /// Sum of all repayment amounts, maintained by `add_repayment`
    pub amount_repaid: Money,

    /// When the loan was taken
    pub date_borrowed: NaiveDate,

    /// Optional notes
    #[serde(default)]
    pub description: Option<String>,

    /// Repayments in append order
    #[serde(default)]
    pub repayments: Vec<Repayment>,

    /// Whether the loan is closed (fully repaid or explicitly closed)
    pub closed: bool,
}

impl Loan {
    /// Create a new open loan with no repayments
    ///
    /// Rejects an empty lender name and a non-positive amount.
    pub fn new(
        id: LoanId,
        lender_name: impl Into<String>,
        amount_borrowed: Money,
        date_borrowed: NaiveDate,
        description: Option<String>,
    ) -> KoferResult<Self> {
        let lender_name = lender_name.into().trim().to_string();
        if lender_name.is_empty() {
            return Err(KoferError::Validation(
                "Lender name must not be empty".into(),
            ));
        }
        if !amount_borrowed.is_positive() {
            return Err(KoferError::Validation(
                "Borrowed amount must be positive".into(),
            ));
        }

        Ok(Self {
            id,
            lender_name,
            amount_borrowed,
            amount_repaid: Money::zero(),
            date_borrowed,
            description,
            repayments: Vec::new(),
            closed: false,
        })
    }

    /// Remaining balance still owed
    pub fn remaining(&self) -> Money {
        self.amount_borrowed - self.amount_repaid
    }

    /// Append a repayment, updating the repaid total
    ///
    /// Auto-closes the loan when the remaining balance reaches zero; the
    /// append, the balance increment, and the close flag change as one
    /// step, so a caller that clones the loan before calling sees either
    /// all of them or none.
    pub fn add_repayment(&mut self, repayment: Repayment) -> KoferResult<()> {
        if self.closed {
            return Err(KoferError::Invariant(
                "Cannot add repayment to a closed loan".into(),
            ));
        }

        if !repayment.amount.is_positive() {
            return Err(KoferError::Invariant(
                "Repayment amount must be positive".into(),
            ));
        }

        if repayment.amount > self.remaining() {
            return Err(KoferError::Invariant(
                "Repayment exceeds remaining loan amount".into(),
            ));
        }

        if repayment.date < self.date_borrowed {
            return Err(KoferError::Validation(
                "Repayment date cannot be before the loan date".into(),
            ));
        }

        let today = Local::now().date_naive();
        if repayment.date > today {
            return Err(KoferError::Validation(
                "Repayment date cannot be in the future".into(),
            ));
        }

        self.amount_repaid += repayment.amount;
        self.repayments.push(repayment);
        if self.remaining().is_zero() {
            self.closed = true;
        }

        Ok(())
    }

    /// Close the loan explicitly (fully repaid or forgiven)
    pub fn mark_closed(&mut self) -> KoferResult<()> {
        if self.closed {
            return Err(KoferError::Invariant("Loan is already closed".into()));
        }
        self.closed = true;
        Ok(())
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[Loan] {}: {} borrowed from {} on {}. Repaid: {}. Remaining: {}",
            self.id,
            self.amount_borrowed,
            self.lender_name,
            self.date_borrowed.format("%Y-%m-%d"),
            self.amount_repaid,
            self.remaining()
        )
    }
}
