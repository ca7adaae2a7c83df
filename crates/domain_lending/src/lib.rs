//! Lending Domain
//!
//! This crate contains the commercial real-estate lending workflow:
//!
//! - The `Loan` aggregate and its status state machine
//! - The LTV decision engine (pure calculation)
//! - The valuation orchestrator that carries a loan from `DRAFT` to a
//!   terminal decision, with compensating rollback on failure
//! - Port traits for the record store and the external valuation calculator,
//!   plus the HTTP adapter for the latter

pub mod adapters;
pub mod error;
pub mod loan;
pub mod ltv;
pub mod orchestrator;
pub mod ports;
pub mod service;
pub mod validation;
pub mod valuation;

pub use adapters::{HttpValuationClient, ValuatorConfig, DEFAULT_VALUATION_TIMEOUT_MS};
pub use error::LendingError;
pub use loan::{Loan, LoanStatus, LoanUpdate, NewLoan, PropertyType};
pub use ltv::{LtvAssessment, LtvEngine, LtvError, DEFAULT_APPROVAL_THRESHOLD};
pub use orchestrator::ValuationOrchestrator;
pub use ports::{
    LoanStore, LoanWithValuation, ValuationError, ValuationPort, ValuationRequest,
};
pub use service::LoanService;
pub use valuation::{EstimatedValuation, LoanDecision, Valuation, ValuationBreakdown};
