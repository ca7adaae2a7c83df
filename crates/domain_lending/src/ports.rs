//! Lending domain ports
//!
//! Port traits decouple the workflow from its collaborators: the record
//! store (PostgreSQL in production, in-memory in tests) and the external
//! valuation calculator (HTTP adapter in production, a stub in tests).
//! Application services receive these as `Arc<dyn ...>`, constructed once at
//! process start.

use async_trait::async_trait;
use thiserror::Error;

use core_kernel::{LoanId, StoreError};

use crate::loan::{Loan, LoanStatus, PropertyType};
use crate::valuation::{EstimatedValuation, Valuation};

/// Failure modes of the remote valuation call
///
/// The orchestrator treats all variants uniformly as "valuation failed";
/// callers may log and map them distinctly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    /// The call did not complete within the configured deadline
    #[error("valuation request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The calculator returned a non-success status
    #[error("valuation service rejected the request ({status}): {detail}")]
    Rejected { status: u16, detail: String },

    /// Connection-level failure
    #[error("valuation service unreachable: {0}")]
    Unreachable(String),

    /// Anything else
    #[error("valuation call failed: {0}")]
    Unknown(String),
}

impl ValuationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ValuationError::Timeout { .. })
    }
}

/// Input to one remote valuation call
///
/// Beyond type safety there is no client-side range re-validation; the
/// calculator is the validation authority for numeric ranges.
#[derive(Debug, Clone, Copy)]
pub struct ValuationRequest {
    pub property_type: PropertyType,
    pub size_sqft: i32,
    pub age_years: i32,
}

/// Port to the external property valuation calculator
#[async_trait]
pub trait ValuationPort: Send + Sync {
    /// Requests an estimate for the given property attributes
    async fn request_valuation(
        &self,
        request: ValuationRequest,
    ) -> Result<EstimatedValuation, ValuationError>;

    /// Non-throwing reachability probe, used only by operational tooling
    async fn health_check(&self) -> bool;
}

/// A loan together with its valuation, if one exists
#[derive(Debug, Clone)]
pub struct LoanWithValuation {
    pub loan: Loan,
    pub valuation: Option<Valuation>,
}

/// Port to the durable record store for loans and valuations
///
/// Reads return current persisted state with no caching; writes are
/// immediately visible to subsequent reads. `transition_status` must be
/// atomic with respect to concurrent transitions for the same loan (a
/// conditional compare-and-set), which is what keeps duplicate valuation
/// requests from racing past the orchestrator's guards.
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Inserts a new loan
    async fn insert_loan(&self, loan: &Loan) -> Result<(), StoreError>;

    /// Fetches a loan by id
    async fn fetch_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError>;

    /// Lists all loans with their valuations, newest first
    async fn list_loans(&self) -> Result<Vec<LoanWithValuation>, StoreError>;

    /// Writes the mutable fields of a draft loan; returns false if the loan
    /// is no longer in draft
    async fn update_loan(&self, loan: &Loan) -> Result<bool, StoreError>;

    /// Deletes a draft loan (cascading its valuation, necessarily absent);
    /// returns false if the loan is no longer in draft
    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError>;

    /// Conditionally moves a loan from `from` to `to`; returns false if the
    /// loan was not in `from` at write time
    async fn transition_status(
        &self,
        id: LoanId,
        from: LoanStatus,
        to: LoanStatus,
    ) -> Result<bool, StoreError>;

    /// Persists a valuation and the loan's terminal status as one logical
    /// unit; fails with a conflict if a valuation already exists for the
    /// loan or the loan is not pending valuation
    async fn finalize_valuation(
        &self,
        valuation: &Valuation,
        status: LoanStatus,
    ) -> Result<(), StoreError>;

    /// Fetches the valuation for a loan, if any
    async fn fetch_valuation(&self, loan_id: LoanId) -> Result<Option<Valuation>, StoreError>;
}
