//! Scriptable valuation port stub
//!
//! By default answers every request with the calculator-formula fixture.
//! Failures can be queued up front; each queued failure is consumed by one
//! call, after which the stub succeeds again, which is the shape needed to
//! test rollback-then-retry.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use domain_lending::{EstimatedValuation, ValuationError, ValuationPort, ValuationRequest};

use crate::fixtures::calculator_valuation;

pub struct StubValuator {
    failures: Mutex<VecDeque<ValuationError>>,
    calls: AtomicUsize,
    healthy: AtomicBool,
}

impl Default for StubValuator {
    fn default() -> Self {
        Self::new()
    }
}

impl StubValuator {
    /// A stub that always succeeds via the calculator formula
    pub fn new() -> Self {
        Self {
            failures: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
            healthy: AtomicBool::new(true),
        }
    }

    /// A stub that fails the first `failures.len()` calls, then succeeds
    pub fn with_failures(failures: Vec<ValuationError>) -> Self {
        Self {
            failures: Mutex::new(failures.into()),
            calls: AtomicUsize::new(0),
            healthy: AtomicBool::new(true),
        }
    }

    /// Number of valuation requests received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }
}

#[async_trait]
impl ValuationPort for StubValuator {
    async fn request_valuation(
        &self,
        request: ValuationRequest,
    ) -> Result<EstimatedValuation, ValuationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(failure) = self.failures.lock().expect("stub lock poisoned").pop_front() {
            return Err(failure);
        }

        Ok(calculator_valuation(
            request.property_type,
            request.size_sqft,
            request.age_years,
        ))
    }

    async fn health_check(&self) -> bool {
        self.healthy.load(Ordering::SeqCst)
    }
}
