//! HTTP API Layer
//!
//! REST interface for the lending system using Axum.
//!
//! # Architecture
//!
//! - **Handlers**: Request handlers for loans and health
//! - **DTOs**: Request/response data transfer objects
//! - **Error Handling**: Consistent error responses preserving the
//!   caller-fixable vs retry-later distinction
//!
//! # Example
//!
//! ```rust,ignore
//! use interface_api::{create_router, AppState};
//!
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use domain_lending::{LoanService, ValuationOrchestrator, ValuationPort};
use infra_db::DatabasePool;

use crate::handlers::{health, loans};

/// Application state shared across handlers
///
/// Services are stateless and constructed once at startup; handlers share
/// them through cheap `Arc` clones.
#[derive(Clone)]
pub struct AppState {
    pub pool: DatabasePool,
    pub loans: Arc<LoanService>,
    pub orchestrator: Arc<ValuationOrchestrator>,
    pub valuator: Arc<dyn ValuationPort>,
}

/// Creates the main API router
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check));

    let loan_routes = Router::new()
        .route("/", post(loans::create_loan))
        .route("/", get(loans::list_loans))
        .route("/:id", get(loans::get_loan))
        .route("/:id", put(loans::update_loan))
        .route("/:id", axum::routing::delete(loans::delete_loan))
        .route("/:id/valuation", post(loans::request_valuation))
        .route("/:id/valuation/recover", post(loans::recover_valuation));

    Router::new()
        .merge(public_routes)
        .nest("/api/v1/loans", loan_routes)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
