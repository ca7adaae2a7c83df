//! Loan handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::LoanId;

use crate::dto::loans::{
    CreateLoanRequest, LoanResponse, LoanWithValuationResponse, UpdateLoanRequest,
    ValuationResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Creates a new loan application in draft
pub async fn create_loan(
    State(state): State<AppState>,
    Json(request): Json<CreateLoanRequest>,
) -> Result<(StatusCode, Json<LoanResponse>), ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let loan = state.loans.create(request.into()).await?;
    Ok((StatusCode::CREATED, Json(loan.into())))
}

/// Lists loans with their valuations
pub async fn list_loans(
    State(state): State<AppState>,
) -> Result<Json<Vec<LoanWithValuationResponse>>, ApiError> {
    let loans = state.loans.list().await?;
    Ok(Json(loans.into_iter().map(Into::into).collect()))
}

/// Gets a loan by id, including its valuation if present
pub async fn get_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanWithValuationResponse>, ApiError> {
    let entry = state.loans.get(LoanId::from_uuid(id)).await?;
    Ok(Json(entry.into()))
}

/// Updates a draft loan
pub async fn update_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateLoanRequest>,
) -> Result<Json<LoanResponse>, ApiError> {
    request
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let loan = state
        .loans
        .update(LoanId::from_uuid(id), request.into())
        .await?;
    Ok(Json(loan.into()))
}

/// Deletes a draft loan
pub async fn delete_loan(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state.loans.delete(LoanId::from_uuid(id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Runs the valuation workflow for a draft loan
pub async fn request_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ValuationResponse>, ApiError> {
    let valuation = state
        .orchestrator
        .request_valuation(LoanId::from_uuid(id))
        .await?;
    Ok(Json(valuation.into()))
}

/// Manually recovers a loan stuck in pending valuation
pub async fn recover_valuation(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<LoanResponse>, ApiError> {
    let loan = state
        .orchestrator
        .recover_stuck(LoanId::from_uuid(id))
        .await?;
    Ok(Json(loan.into()))
}
