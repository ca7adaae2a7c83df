//! PostgreSQL adapter for the `LoanStore` port
//!
//! Status guards are expressed as conditional UPDATEs (`... WHERE status =
//! $expected`), so the check-then-set is atomic per loan without holding any
//! lock across the remote valuation call. Valuation uniqueness is backed by
//! the `UNIQUE` constraint on `valuations.loan_id`; the finalize path writes
//! the valuation row and the terminal status inside one transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

use core_kernel::{LoanId, StoreError, ValuationId};
use domain_lending::{
    Loan, LoanStatus, LoanStore, LoanWithValuation, Valuation,
};

use crate::error::DatabaseError;
use crate::pool::DatabasePool;

/// PostgreSQL implementation of the loan store
#[derive(Debug, Clone)]
pub struct PgLoanStore {
    pool: DatabasePool,
}

impl PgLoanStore {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

fn db_err(error: sqlx::Error) -> StoreError {
    DatabaseError::classify(error).into()
}

const LOAN_COLUMNS: &str = "loan_id, borrower_name, borrower_email, borrower_phone, \
     property_type, property_size_sqft, property_age_years, property_address, \
     loan_amount, status, created_at, updated_at";

const VALUATION_COLUMNS: &str =
    "valuation_id, loan_id, estimated_value, ltv_ratio, decision, valuated_at, methodology";

#[async_trait]
impl LoanStore for PgLoanStore {
    async fn insert_loan(&self, loan: &Loan) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO loans (loan_id, borrower_name, borrower_email, borrower_phone, \
             property_type, property_size_sqft, property_age_years, property_address, \
             loan_amount, status, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)",
        )
        .bind(Uuid::from(loan.id))
        .bind(&loan.borrower_name)
        .bind(&loan.borrower_email)
        .bind(&loan.borrower_phone)
        .bind(loan.property_type.as_str())
        .bind(loan.property_size_sqft)
        .bind(loan.property_age_years)
        .bind(&loan.property_address)
        .bind(loan.loan_amount)
        .bind(loan.status.as_str())
        .bind(loan.created_at)
        .bind(loan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(())
    }

    async fn fetch_loan(&self, id: LoanId) -> Result<Option<Loan>, StoreError> {
        let row: Option<LoanRow> =
            sqlx::query_as(&format!("SELECT {LOAN_COLUMNS} FROM loans WHERE loan_id = $1"))
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(db_err)?;

        row.map(Loan::try_from).transpose()
    }

    async fn list_loans(&self) -> Result<Vec<LoanWithValuation>, StoreError> {
        let loan_rows: Vec<LoanRow> =
            sqlx::query_as(&format!("SELECT {LOAN_COLUMNS} FROM loans ORDER BY created_at DESC"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let valuation_rows: Vec<ValuationRow> =
            sqlx::query_as(&format!("SELECT {VALUATION_COLUMNS} FROM valuations"))
                .fetch_all(&self.pool)
                .await
                .map_err(db_err)?;

        let mut valuations = std::collections::HashMap::new();
        for row in valuation_rows {
            let valuation = Valuation::try_from(row)?;
            valuations.insert(valuation.loan_id, valuation);
        }

        loan_rows
            .into_iter()
            .map(|row| {
                let loan = Loan::try_from(row)?;
                let valuation = valuations.remove(&loan.id);
                Ok(LoanWithValuation { loan, valuation })
            })
            .collect()
    }

    async fn update_loan(&self, loan: &Loan) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE loans SET borrower_name = $2, borrower_email = $3, borrower_phone = $4, \
             property_type = $5, property_size_sqft = $6, property_age_years = $7, \
             property_address = $8, loan_amount = $9, updated_at = $10 \
             WHERE loan_id = $1 AND status = 'DRAFT'",
        )
        .bind(Uuid::from(loan.id))
        .bind(&loan.borrower_name)
        .bind(&loan.borrower_email)
        .bind(&loan.borrower_phone)
        .bind(loan.property_type.as_str())
        .bind(loan.property_size_sqft)
        .bind(loan.property_age_years)
        .bind(&loan.property_address)
        .bind(loan.loan_amount)
        .bind(loan.updated_at)
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn delete_loan(&self, id: LoanId) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM loans WHERE loan_id = $1 AND status = 'DRAFT'")
            .bind(Uuid::from(id))
            .execute(&self.pool)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn transition_status(
        &self,
        id: LoanId,
        from: LoanStatus,
        to: LoanStatus,
    ) -> Result<bool, StoreError> {
        let result = sqlx::query(
            "UPDATE loans SET status = $3, updated_at = $4 \
             WHERE loan_id = $1 AND status = $2",
        )
        .bind(Uuid::from(id))
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(db_err)?;

        Ok(result.rows_affected() == 1)
    }

    async fn finalize_valuation(
        &self,
        valuation: &Valuation,
        status: LoanStatus,
    ) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await.map_err(db_err)?;

        // Valuation first: a valuation without a terminal status is
        // detectable and repairable, the inverse is not.
        sqlx::query(
            "INSERT INTO valuations (valuation_id, loan_id, estimated_value, ltv_ratio, \
             decision, valuated_at, methodology) VALUES ($1, $2, $3, $4, $5, $6, $7)",
        )
        .bind(Uuid::from(valuation.id))
        .bind(Uuid::from(valuation.loan_id))
        .bind(valuation.estimated_value)
        .bind(valuation.ltv_ratio)
        .bind(valuation.decision.as_str())
        .bind(valuation.valuated_at)
        .bind(&valuation.methodology)
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        let result = sqlx::query(
            "UPDATE loans SET status = $2, updated_at = $3 \
             WHERE loan_id = $1 AND status = 'PENDING_VALUATION'",
        )
        .bind(Uuid::from(valuation.loan_id))
        .bind(status.as_str())
        .bind(Utc::now())
        .execute(&mut *tx)
        .await
        .map_err(db_err)?;

        if result.rows_affected() != 1 {
            tx.rollback().await.map_err(db_err)?;
            return Err(StoreError::conflict(format!(
                "loan {} is not pending valuation",
                valuation.loan_id
            )));
        }

        tx.commit().await.map_err(db_err)?;
        Ok(())
    }

    async fn fetch_valuation(&self, loan_id: LoanId) -> Result<Option<Valuation>, StoreError> {
        let row: Option<ValuationRow> = sqlx::query_as(&format!(
            "SELECT {VALUATION_COLUMNS} FROM valuations WHERE loan_id = $1"
        ))
        .bind(Uuid::from(loan_id))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_err)?;

        row.map(Valuation::try_from).transpose()
    }
}

/// Database row for a loan
#[derive(Debug, Clone, FromRow)]
struct LoanRow {
    loan_id: Uuid,
    borrower_name: String,
    borrower_email: String,
    borrower_phone: Option<String>,
    property_type: String,
    property_size_sqft: i32,
    property_age_years: i32,
    property_address: Option<String>,
    loan_amount: Decimal,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<LoanRow> for Loan {
    type Error = StoreError;

    fn try_from(row: LoanRow) -> Result<Self, Self::Error> {
        Ok(Loan {
            id: LoanId::from_uuid(row.loan_id),
            borrower_name: row.borrower_name,
            borrower_email: row.borrower_email,
            borrower_phone: row.borrower_phone,
            property_type: row
                .property_type
                .parse()
                .map_err(|e| StoreError::internal(format!("loan {}: {e}", row.loan_id)))?,
            property_size_sqft: row.property_size_sqft,
            property_age_years: row.property_age_years,
            property_address: row.property_address,
            loan_amount: row.loan_amount,
            status: row
                .status
                .parse()
                .map_err(|e| StoreError::internal(format!("loan {}: {e}", row.loan_id)))?,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Database row for a valuation
#[derive(Debug, Clone, FromRow)]
struct ValuationRow {
    valuation_id: Uuid,
    loan_id: Uuid,
    estimated_value: Decimal,
    ltv_ratio: Decimal,
    decision: String,
    valuated_at: DateTime<Utc>,
    methodology: Option<String>,
}

impl TryFrom<ValuationRow> for Valuation {
    type Error = StoreError;

    fn try_from(row: ValuationRow) -> Result<Self, Self::Error> {
        Ok(Valuation {
            id: ValuationId::from_uuid(row.valuation_id),
            loan_id: LoanId::from_uuid(row.loan_id),
            estimated_value: row.estimated_value,
            ltv_ratio: row.ltv_ratio,
            decision: row
                .decision
                .parse()
                .map_err(|e| StoreError::internal(format!("valuation {}: {e}", row.valuation_id)))?,
            valuated_at: row.valuated_at,
            methodology: row.methodology,
        })
    }
}
