mod availability;
mod conflict;
mod error;
mod mutations;
mod queries;

pub use availability::{booked_times, compute_available_slots, SLOT_MINUTES};
pub use conflict::has_conflict;
pub use error::EngineError;

use std::sync::Arc;

use chrono::NaiveDate;
use ulid::Ulid;

use crate::backend::Backend;
use crate::model::Appointment;
use crate::retry::{with_retry, RetryPolicy};

/// Orchestrates the pure availability core against the persistence
/// collaborator. Stateless beyond the injected backend handle — every
/// operation fetches what it needs, so callers always see post-write state
/// when they re-query after a booking or cancellation.
pub struct Engine {
    backend: Arc<dyn Backend>,
    retry: RetryPolicy,
}

impl Engine {
    pub fn new(backend: Arc<dyn Backend>) -> Self {
        Self::with_retry_policy(backend, RetryPolicy::default())
    }

    pub fn with_retry_policy(backend: Arc<dyn Backend>, retry: RetryPolicy) -> Self {
        Self { backend, retry }
    }

    /// Read path shared by queries and the booking guard. Only reads go
    /// through the retry policy; writes are issued exactly once.
    pub(super) async fn day_appointments(
        &self,
        professional_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, EngineError> {
        let backend = &self.backend;
        with_retry(self.retry, || {
            backend.appointments_for_day(professional_id, date)
        })
        .await
        .map_err(EngineError::from)
    }

    pub(super) async fn fetch_appointment(&self, id: Ulid) -> Result<Appointment, EngineError> {
        let backend = &self.backend;
        with_retry(self.retry, || backend.appointment(id))
            .await
            .map_err(EngineError::from)
    }
}
