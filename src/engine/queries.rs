use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::debug;
use ulid::Ulid;

use crate::model::{Appointment, Settings, SlotTime};
use crate::observability;
use crate::retry::with_retry;

use super::availability::{booked_times, compute_available_slots};
use super::{Engine, EngineError};

impl Engine {
    /// The bookable slots for a professional on a calendar day.
    ///
    /// An unconfigured professional (no settings, or no work hours yet) is
    /// a normal state and yields an empty list. `now` is injected so the
    /// today-filter is the caller's clock, not ours.
    pub async fn available_slots(
        &self,
        professional_id: Ulid,
        date: NaiveDate,
        now: NaiveDateTime,
    ) -> Result<Vec<SlotTime>, EngineError> {
        let Some(settings) = self.settings(professional_id).await? else {
            debug!(professional = %professional_id, "no settings, no slots");
            return Ok(Vec::new());
        };

        let appointments = self.day_appointments(professional_id, date).await?;
        let booked = booked_times(&appointments);

        let started = Instant::now();
        let slots = compute_available_slots(date, &settings, &booked, now);
        metrics::histogram!(observability::AVAILABILITY_DURATION_SECONDS)
            .record(started.elapsed().as_secs_f64());
        metrics::histogram!(observability::AVAILABILITY_SLOTS_RETURNED)
            .record(slots.len() as f64);
        Ok(slots)
    }

    pub async fn settings(
        &self,
        professional_id: Ulid,
    ) -> Result<Option<Settings>, EngineError> {
        let backend = &self.backend;
        with_retry(self.retry, || backend.load_settings(professional_id))
            .await
            .map_err(EngineError::from)
    }

    /// A professional's day, every status included, ascending by time.
    pub async fn appointments_for_day(
        &self,
        professional_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, EngineError> {
        self.day_appointments(professional_id, date).await
    }

    /// Everything a client has booked, across professionals.
    pub async fn client_appointments(
        &self,
        client_id: Ulid,
    ) -> Result<Vec<Appointment>, EngineError> {
        let backend = &self.backend;
        with_retry(self.retry, || backend.client_appointments(client_id))
            .await
            .map_err(EngineError::from)
    }
}
