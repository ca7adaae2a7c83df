//! Store port adapters

mod loan_store;

pub use loan_store::PgLoanStore;
