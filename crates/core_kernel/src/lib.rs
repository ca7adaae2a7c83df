//! Core Kernel - Foundational types for the commercial lending system
//!
//! This crate provides the building blocks shared by every other crate:
//! - Strongly-typed entity identifiers
//! - The error taxonomy for store ports

pub mod error;
pub mod identifiers;

pub use error::StoreError;
pub use identifiers::{LoanId, ValuationId};
