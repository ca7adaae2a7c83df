//! Infrastructure Database Layer
//!
//! PostgreSQL backing for the lending system. The `PgLoanStore` adapter
//! implements the domain's `LoanStore` port; the status-guard writes are
//! conditional UPDATEs and the valuation finalize is a single transaction,
//! which is what gives the orchestrator its check-then-set atomicity.

pub mod adapters;
pub mod error;
pub mod pool;

pub use adapters::PgLoanStore;
pub use error::DatabaseError;
pub use pool::{create_pool, DatabaseConfig, DatabasePool};
