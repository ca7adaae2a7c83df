//! In-memory loan store
//!
//! Implements the `LoanStore` port over a mutex-guarded map. Conditional
//! transitions happen under the lock, which gives the same check-then-set
//! atomicity the PostgreSQL adapter gets from conditional UPDATEs, so
//! concurrency tests exercise the real guard semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;

use core_kernel::{LoanId, StoreError};
use domain_lending::{Loan, LoanStatus, LoanStore, LoanWithValuation, Valuation};

#[derive(Default)]
struct State {
    loans: HashMap<LoanId, Loan>,
    valuations: HashMap<LoanId, Valuation>,
}

/// Mutex-guarded in-memory implementation of `LoanStore`
#[derive(Default)]
pub struct MemoryLoanStore {
    state: Mutex<State>,
    // None = healthy; Some(k) = allow k more transitions, then fail
    transition_fault: Mutex<Option<usize>>,
}

impl MemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arms a fault: the next `allowed` status transitions succeed, every
    /// one after that fails with an internal store error. Used to simulate
    /// a rollback write failing after a remote failure, which leaves a loan
    /// stuck in `PENDING_VALUATION`.
    pub fn inject_transition_fault_after(&self, allowed: usize) {
        *self.transition_fault.lock().expect("store lock poisoned") = Some(allowed);
    }

    /// Clears any armed transition fault
    pub fn clear_transition_fault(&self) {
        *self.transition_fault.lock().expect("store lock poisoned") = None;
    }

    /// Number of valuation records currently stored
    pub fn valuation_count(&self) -> usize {
        self.state.lock().expect("store lock poisoned").valuations.len()
    }
}

#[async_trait]
impl LoanStore for MemoryLoanStore {
    async fn insert_loan(&self, loan: &Loan) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        if state.loans.contains_key(&loan.id) {
            return Err(StoreError::conflict(format!("loan {} already exists", loan.id)));
        }
        state.loans.insert(loan.id, loan.clone());
        Ok(())
    }

    async fn fetch_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError> {
        let state = self.state.lock().expect("store lock poisoned");
        Ok(state.loans.get(&id).cloned())
    }

    async fn list_loans(&self) -> Result<Vec<LoanWithValuation>, StoreError> {
        let state = self.state.lock().expect("store lock poisoned");
        let mut entries: Vec<LoanWithValuation> = state
            .loans
            .values()
            .map(|loan| LoanWithValuation {
                loan: loan.clone(),
                valuation: state.valuations.get(&loan.id).cloned(),
            })
            .collect();
        entries.sort_by(|a, b| b.loan.created_at.cmp(&a.loan.created_at));
        Ok(entries)
    }

    async fn update_loan(&self, loan: &Loan) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        match state.loans.get_mut(&loan.id) {
            Some(existing) if existing.status == LoanStatus::Draft => {
                *existing = loan.clone();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(StoreError::not_found("Loan", loan.id)),
        }
    }

    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");
        match state.loans.get(&id).map(|loan| loan.status) {
            Some(LoanStatus::Draft) => {
                state.loans.remove(&id);
                state.valuations.remove(&id);
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(StoreError::not_found("Loan", id)),
        }
    }

    async fn transition_status(
        &self,
        id: LoanId,
        from: LoanStatus,
        to: LoanStatus,
    ) -> Result<bool, StoreError> {
        {
            let mut fault = self.transition_fault.lock().expect("store lock poisoned");
            match fault.as_mut() {
                Some(0) => return Err(StoreError::internal("injected transition fault")),
                Some(allowed) => *allowed -= 1,
                None => {}
            }
        }

        let mut state = self.state.lock().expect("store lock poisoned");
        match state.loans.get_mut(&id) {
            Some(loan) if loan.status == from => {
                loan.status = to;
                loan.updated_at = Utc::now();
                Ok(true)
            }
            Some(_) => Ok(false),
            None => Err(StoreError::not_found("Loan", id)),
        }
    }

    async fn finalize_valuation(
        &self,
        valuation: &Valuation,
        status: LoanStatus,
    ) -> Result<(), StoreError> {
        let mut state = self.state.lock().expect("store lock poisoned");

        if state.valuations.contains_key(&valuation.loan_id) {
            return Err(StoreError::conflict(format!(
                "valuation already recorded for loan {}",
                valuation.loan_id
            )));
        }

        let loan = state
            .loans
            .get_mut(&valuation.loan_id)
            .ok_or_else(|| StoreError::not_found("Loan", valuation.loan_id))?;
        if loan.status != LoanStatus::PendingValuation {
            return Err(StoreError::conflict(format!(
                "loan {} is not pending valuation",
                valuation.loan_id
            )));
        }

        loan.status = status;
        loan.updated_at = Utc::now();
        state.valuations.insert(valuation.loan_id, valuation.clone());
        Ok(())
    }

    async fn fetch_valuation(&self, loan_id: LoanId) -> Result<Option<Valuation>, StoreError> {
        let state = self.state.lock().expect("store lock poisoned");
        Ok(state.valuations.get(&loan_id).cloned())
    }
}
