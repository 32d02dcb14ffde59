//! Ledger: the in-memory aggregate over the encrypted store
//!
//! Every mutating operation follows one contract: validate, apply the
//! change to a private candidate copy of the snapshot, persist the
//! candidate, and only then swap it in as the committed state. A failed
//! persist leaves the committed snapshot untouched, so callers never
//! observe a half-applied mutation and no manual undo is needed.
//!
//! The whole validate-mutate-persist sequence runs under one exclusive
//! lock; concurrent callers within the process cannot interleave two
//! mutations against the same snapshot.

use std::sync::Mutex;

use chrono::NaiveDate;

use crate::crypto::Password;
use crate::error::{KoferError, KoferResult};
use crate::models::{
    IdSource, Loan, LoanId, Money, RandomIdSource, Repayment, Snapshot, Transaction,
    TransactionType,
};
use crate::store::SnapshotStore;

/// Input for creating a new transaction
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionType,
    pub category: String,
    pub description: Option<String>,
}

/// Aggregate statistics over all loans
#[derive(Debug, Clone, PartialEq)]
pub struct LoanSummary {
    pub total_loans: usize,
    pub active_loans: usize,
    pub total_borrowed: Money,
    pub total_repaid: Money,
    /// Outstanding balance across active loans only
    pub total_remaining: Money,
}

/// State guarded by the ledger lock
struct Inner {
    snapshot: Snapshot,
    ids: Box<dyn IdSource + Send>,
}

/// The in-memory aggregate that enforces domain invariants and mediates
/// all persistence
///
/// The password is supplied once at construction and held for the life
/// of the ledger; it never appears in errors or formatting output.
pub struct Ledger<S: SnapshotStore> {
    store: S,
    password: Password,
    inner: Mutex<Inner>,
}

impl<S: SnapshotStore> Ledger<S> {
    /// Open the ledger, loading the snapshot from the store
    ///
    /// A missing store file means first run: the ledger starts empty and
    /// immediately persists an empty snapshot, which also verifies the
    /// store path is writable before any data accumulates.
    pub fn open(store: S, password: Password) -> KoferResult<Self> {
        Self::open_with_id_source(store, password, Box::new(RandomIdSource))
    }

    /// Open the ledger with an injected ID source (deterministic in tests)
    pub fn open_with_id_source(
        store: S,
        password: Password,
        ids: Box<dyn IdSource + Send>,
    ) -> KoferResult<Self> {
        let snapshot = match store.load(&password) {
            Ok(snapshot) => snapshot,
            Err(e) if e.is_not_found() => {
                let snapshot = Snapshot::new();
                store.save(&snapshot, &password)?;
                snapshot
            }
            Err(e) => return Err(e),
        };

        Ok(Self {
            store,
            password,
            inner: Mutex::new(Inner { snapshot, ids }),
        })
    }

    /// Run one mutation under the commit protocol
    ///
    /// The closure receives a candidate copy of the committed snapshot.
    /// The candidate only becomes visible after the store accepts it; on
    /// any error the committed snapshot is returned to callers unchanged.
    fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut Snapshot, &mut dyn IdSource) -> KoferResult<T>,
    ) -> KoferResult<T> {
        let mut inner = self.lock();

        let mut candidate = inner.snapshot.clone();
        let output = mutate(&mut candidate, inner.ids.as_mut())?;
        self.store.save(&candidate, &self.password)?;

        inner.snapshot = candidate;
        Ok(output)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A panicked writer can only have touched its private candidate,
        // so the committed snapshot behind a poisoned lock is still valid.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    // ---- Mutations ----

    /// Append a transaction
    pub fn add_transaction(&self, input: NewTransaction) -> KoferResult<Transaction> {
        self.commit(|snapshot, ids| {
            let tx = Transaction::new(
                ids.transaction_id(),
                input.date,
                input.amount,
                input.kind,
                input.category,
                input.description,
            )?;
            snapshot.transactions.push(tx.clone());
            Ok(tx)
        })
    }

    /// Create and append a loan
    pub fn add_loan(
        &self,
        lender_name: &str,
        amount: Money,
        date_borrowed: NaiveDate,
        description: Option<String>,
    ) -> KoferResult<Loan> {
        self.commit(|snapshot, ids| {
            let loan = Loan::new(ids.loan_id(), lender_name, amount, date_borrowed, description)?;
            snapshot.loans.push(loan.clone());
            Ok(loan)
        })
    }

    /// Record a repayment against a loan
    ///
    /// The repayment append, the balance increment, and any auto-close
    /// land in the same commit; a persistence failure rolls all of them
    /// back together. Returns the updated loan.
    pub fn add_repayment(
        &self,
        loan_id: LoanId,
        amount: Money,
        date: NaiveDate,
        note: Option<String>,
    ) -> KoferResult<Loan> {
        self.commit(|snapshot, _| {
            let loan = find_loan_mut(snapshot, loan_id)?;
            loan.add_repayment(Repayment::new(amount, date, note))?;
            Ok(loan.clone())
        })
    }

    /// Close a loan manually (fully repaid or forgiven)
    pub fn close_loan(&self, loan_id: LoanId) -> KoferResult<Loan> {
        self.commit(|snapshot, _| {
            let loan = find_loan_mut(snapshot, loan_id)?;
            loan.mark_closed()?;
            Ok(loan.clone())
        })
    }

    // ---- Read-only queries (committed snapshot only, never persist) ----

    /// All transactions, in append order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.lock().snapshot.transactions.clone()
    }

    /// Transactions of one type
    pub fn transactions_by_type(&self, kind: TransactionType) -> Vec<Transaction> {
        self.lock()
            .snapshot
            .transactions
            .iter()
            .filter(|tx| tx.kind == kind)
            .cloned()
            .collect()
    }

    /// Total amount across transactions of one type
    pub fn total_by_type(&self, kind: TransactionType) -> Money {
        self.lock()
            .snapshot
            .transactions
            .iter()
            .filter(|tx| tx.kind == kind)
            .map(|tx| tx.amount)
            .sum()
    }

    /// All loans, in append order
    pub fn loans(&self) -> Vec<Loan> {
        self.lock().snapshot.loans.clone()
    }

    /// Look up one loan by ID
    pub fn loan(&self, loan_id: LoanId) -> KoferResult<Loan> {
        self.lock()
            .snapshot
            .loans
            .iter()
            .find(|loan| loan.id == loan_id)
            .cloned()
            .ok_or_else(|| KoferError::loan_not_found(loan_id.to_string()))
    }

    /// Loans that are still open
    pub fn active_loans(&self) -> Vec<Loan> {
        self.lock()
            .snapshot
            .loans
            .iter()
            .filter(|loan| !loan.closed)
            .cloned()
            .collect()
    }

    /// Loans that have been closed
    pub fn closed_loans(&self) -> Vec<Loan> {
        self.lock()
            .snapshot
            .loans
            .iter()
            .filter(|loan| loan.closed)
            .cloned()
            .collect()
    }

    /// Loans from one lender, matched case-insensitively
    pub fn loans_by_lender(&self, lender_name: &str) -> Vec<Loan> {
        let needle = lender_name.trim();
        if needle.is_empty() {
            return Vec::new();
        }
        self.lock()
            .snapshot
            .loans
            .iter()
            .filter(|loan| loan.lender_name.eq_ignore_ascii_case(needle))
            .cloned()
            .collect()
    }

    /// Aggregate statistics over all loans
    pub fn loan_summary(&self) -> LoanSummary {
        let inner = self.lock();
        let loans = &inner.snapshot.loans;
        LoanSummary {
            total_loans: loans.len(),
            active_loans: loans.iter().filter(|l| !l.closed).count(),
            total_borrowed: loans.iter().map(|l| l.amount_borrowed).sum(),
            total_repaid: loans.iter().map(|l| l.amount_repaid).sum(),
            total_remaining: loans
                .iter()
                .filter(|l| !l.closed)
                .map(|l| l.remaining())
                .sum(),
        }
    }

    /// Clone of the committed snapshot
    pub fn snapshot(&self) -> Snapshot {
        self.lock().snapshot.clone()
    }
}

fn find_loan_mut(snapshot: &mut Snapshot, loan_id: LoanId) -> KoferResult<&mut Loan> {
    snapshot
        .loans
        .iter_mut()
        .find(|loan| loan.id == loan_id)
        .ok_or_else(|| KoferError::loan_not_found(loan_id.to_string()))
}
