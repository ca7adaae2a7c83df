//! Valuation orchestrator
//!
//! The only stateful workflow in the system. Coordinates the record store,
//! the valuation port, and the LTV engine to carry a loan from `DRAFT`
//! through to a terminal decision:
//!
//! ```text
//!   DRAFT ──> PENDING_VALUATION ──> APPROVED | REJECTED
//!     ^               │
//!     └───────────────┘  (rollback on valuation failure)
//! ```
//!
//! `PENDING_VALUATION` is persisted before the remote call is made, so a
//! concurrent duplicate request fails the status guard instead of racing the
//! valuator. The store is never held locked across the remote call.

use std::sync::Arc;

use core_kernel::LoanId;

use crate::error::LendingError;
use crate::loan::{Loan, LoanStatus};
use crate::ltv::LtvEngine;
use crate::ports::{LoanStore, ValuationPort, ValuationRequest};
use crate::valuation::Valuation;

pub struct ValuationOrchestrator {
    store: Arc<dyn LoanStore>,
    valuator: Arc<dyn ValuationPort>,
    engine: LtvEngine,
}

impl ValuationOrchestrator {
    /// Creates an orchestrator over the given collaborators
    ///
    /// All three are stateless across requests; construct once at process
    /// start and share.
    pub fn new(store: Arc<dyn LoanStore>, valuator: Arc<dyn ValuationPort>, engine: LtvEngine) -> Self {
        Self {
            store,
            valuator,
            engine,
        }
    }

    /// Runs the valuation workflow for a draft loan
    ///
    /// On success the loan ends in `APPROVED` or `REJECTED` and exactly one
    /// valuation record exists. On remote or decision failure the loan is
    /// rolled back to `DRAFT` and the original failure is surfaced, which
    /// makes an immediate retry safe.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the loan id is unknown
    /// - `InvalidState` if the loan is not in `DRAFT`
    /// - `AlreadyValuated` if a valuation already exists for the loan
    /// - `ValuationService` wrapping the remote failure after rollback
    /// - `Ltv` if the calculator returned a non-positive value, after rollback
    pub async fn request_valuation(&self, loan_id: LoanId) -> Result<Valuation, LendingError> {
        let loan = self
            .store
            .fetch_loan(loan_id)
            .await?
            .ok_or(LendingError::NotFound(loan_id))?;

        match loan.status {
            LoanStatus::Draft => {}
            LoanStatus::PendingValuation => {
                return Err(LendingError::invalid_state(
                    loan.status,
                    "valuation already requested",
                ));
            }
            LoanStatus::Approved | LoanStatus::Rejected => {
                return Err(LendingError::invalid_state(
                    loan.status,
                    "valuation already completed",
                ));
            }
        }

        if self.store.fetch_valuation(loan_id).await?.is_some() {
            return Err(LendingError::AlreadyValuated(loan_id));
        }

        // Claim the loan before calling out. Of two concurrent requests,
        // exactly one wins this conditional write; the loser surfaces the
        // same error it would have seen had it read the status later.
        let claimed = self
            .store
            .transition_status(loan_id, LoanStatus::Draft, LoanStatus::PendingValuation)
            .await?;
        if !claimed {
            return Err(LendingError::invalid_state(
                LoanStatus::PendingValuation,
                "valuation already requested",
            ));
        }

        tracing::info!(loan_id = %loan_id, "loan entered pending valuation");

        let request = ValuationRequest {
            property_type: loan.property_type,
            size_sqft: loan.property_size_sqft,
            age_years: loan.property_age_years,
        };

        let estimate = match self.valuator.request_valuation(request).await {
            Ok(estimate) => estimate,
            Err(err) => {
                self.rollback(loan_id).await;
                return Err(LendingError::ValuationService(err));
            }
        };

        let assessment = match self.engine.decide(loan.loan_amount, estimate.estimated_value) {
            Ok(assessment) => assessment,
            Err(err) => {
                self.rollback(loan_id).await;
                return Err(err.into());
            }
        };

        let valuation = Valuation::record(loan_id, &estimate, &assessment);
        match self
            .store
            .finalize_valuation(&valuation, assessment.decision.terminal_status())
            .await
        {
            Ok(()) => {}
            Err(err) if err.is_conflict() => {
                return Err(LendingError::AlreadyValuated(loan_id));
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            loan_id = %loan_id,
            ltv_ratio = %valuation.ltv_ratio,
            decision = %valuation.decision,
            "valuation completed"
        );

        Ok(valuation)
    }

    /// Manually recovers a loan stuck in `PENDING_VALUATION`
    ///
    /// A loan ends up stuck when the rollback write itself failed after a
    /// remote failure, or when the process died between claiming the loan
    /// and finalizing. Recovery inspects what was persisted: if a valuation
    /// record exists the terminal status is completed from it, otherwise the
    /// loan reverts to `DRAFT`.
    pub async fn recover_stuck(&self, loan_id: LoanId) -> Result<Loan, LendingError> {
        let loan = self
            .store
            .fetch_loan(loan_id)
            .await?
            .ok_or(LendingError::NotFound(loan_id))?;

        if loan.status != LoanStatus::PendingValuation {
            return Err(LendingError::invalid_state(
                loan.status,
                "only loans pending valuation can be recovered",
            ));
        }

        let target = match self.store.fetch_valuation(loan_id).await? {
            Some(valuation) => valuation.decision.terminal_status(),
            None => LoanStatus::Draft,
        };

        let moved = self
            .store
            .transition_status(loan_id, LoanStatus::PendingValuation, target)
            .await?;
        if !moved {
            return Err(LendingError::invalid_state(
                loan.status,
                "loan is no longer pending valuation",
            ));
        }

        tracing::info!(loan_id = %loan_id, status = %target, "stuck loan recovered");

        self.store
            .fetch_loan(loan_id)
            .await?
            .ok_or(LendingError::NotFound(loan_id))
    }

    /// Best-effort compensating transition back to `DRAFT`
    ///
    /// A failed rollback write leaves the loan stuck in
    /// `PENDING_VALUATION`; `recover_stuck` is the manual way out.
    async fn rollback(&self, loan_id: LoanId) {
        match self
            .store
            .transition_status(loan_id, LoanStatus::PendingValuation, LoanStatus::Draft)
            .await
        {
            Ok(true) => {
                tracing::warn!(loan_id = %loan_id, "valuation failed, loan reverted to draft");
            }
            Ok(false) => {
                tracing::error!(
                    loan_id = %loan_id,
                    "rollback skipped: loan no longer pending valuation"
                );
            }
            Err(err) => {
                tracing::error!(
                    loan_id = %loan_id,
                    error = %err,
                    "rollback write failed, loan stuck in pending valuation"
                );
            }
        }
    }
}
