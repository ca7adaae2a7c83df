//! Loan application service
//!
//! Plain CRUD over the loan store. The state-machine guards live in the
//! aggregate and the store's conditional writes; this service wires them to
//! the caller-facing operations.

use std::sync::Arc;

use core_kernel::LoanId;

use crate::error::LendingError;
use crate::loan::{Loan, LoanStatus, LoanUpdate, NewLoan};
use crate::ports::{LoanStore, LoanWithValuation};

pub struct LoanService {
    store: Arc<dyn LoanStore>,
}

impl LoanService {
    pub fn new(store: Arc<dyn LoanStore>) -> Self {
        Self { store }
    }

    /// Creates a new loan application in `DRAFT`
    pub async fn create(&self, new_loan: NewLoan) -> Result<Loan, LendingError> {
        let loan = Loan::create(new_loan)?;
        self.store.insert_loan(&loan).await?;
        tracing::info!(loan_id = %loan.id, "loan application created");
        Ok(loan)
    }

    /// Updates a draft loan's fields
    pub async fn update(&self, id: LoanId, update: LoanUpdate) -> Result<Loan, LendingError> {
        let mut loan = self
            .store
            .fetch_loan(id)
            .await?
            .ok_or(LendingError::NotFound(id))?;

        loan.apply_update(update)?;

        // The store re-checks the draft guard at write time; a false here
        // means a valuation request won the race since our read.
        if !self.store.update_loan(&loan).await? {
            return Err(LendingError::invalid_state(
                LoanStatus::PendingValuation,
                "only draft loans can be updated",
            ));
        }
        Ok(loan)
    }

    /// Deletes a draft loan
    pub async fn delete(&self, id: LoanId) -> Result<(), LendingError> {
        let loan = self
            .store
            .fetch_loan(id)
            .await?
            .ok_or(LendingError::NotFound(id))?;

        if loan.status != LoanStatus::Draft {
            return Err(LendingError::invalid_state(
                loan.status,
                "only draft loans can be deleted",
            ));
        }

        if !self.store.delete_loan(id).await? {
            return Err(LendingError::invalid_state(
                LoanStatus::PendingValuation,
                "only draft loans can be deleted",
            ));
        }
        tracing::info!(loan_id = %id, "loan application deleted");
        Ok(())
    }

    /// Fetches a loan with its valuation, if present
    pub async fn get(&self, id: LoanId) -> Result<LoanWithValuation, LendingError> {
        let loan = self
            .store
            .fetch_loan(id)
            .await?
            .ok_or(LendingError::NotFound(id))?;
        let valuation = self.store.fetch_valuation(id).await?;
        Ok(LoanWithValuation { loan, valuation })
    }

    /// Lists all loans with their valuations
    pub async fn list(&self) -> Result<Vec<LoanWithValuation>, LendingError> {
        Ok(self.store.list_loans().await?)
    }
}
