//! Lending domain errors

use thiserror::Error;

use core_kernel::{LoanId, StoreError};

use crate::loan::LoanStatus;
use crate::ltv::LtvError;
use crate::ports::ValuationError;

/// Errors that can occur in the lending domain
#[derive(Debug, Error)]
pub enum LendingError {
    #[error("loan not found: {0}")]
    NotFound(LoanId),

    #[error("invalid loan state ({current}): {message}")]
    InvalidState {
        current: LoanStatus,
        message: String,
    },

    #[error("valuation already recorded for loan {0}")]
    AlreadyValuated(LoanId),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("valuation service failure: {0}")]
    ValuationService(#[from] ValuationError),

    #[error(transparent)]
    Ltv(#[from] LtvError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl LendingError {
    pub fn invalid_state(current: LoanStatus, message: impl Into<String>) -> Self {
        LendingError::InvalidState {
            current,
            message: message.into(),
        }
    }

    /// True for failures the caller can fix by retrying later rather than by
    /// changing the request
    pub fn is_service_failure(&self) -> bool {
        matches!(
            self,
            LendingError::ValuationService(_) | LendingError::Store(_)
        )
    }
}
