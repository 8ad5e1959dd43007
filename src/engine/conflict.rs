use chrono::NaiveDate;
use ulid::Ulid;

use crate::limits::*;
use crate::model::{Appointment, AppointmentStatus, BookingRequest, Settings};

use super::availability::SLOT_MINUTES;
use super::EngineError;

/// Duplicate-booking guard: a client may hold at most one upcoming
/// appointment with a given professional per calendar day.
///
/// Fast-path UX check only — it races against concurrent sessions. The
/// persistence layer's uniqueness backstop is the actual guarantee.
pub fn has_conflict(
    client_id: Ulid,
    professional_id: Ulid,
    date: NaiveDate,
    existing: &[Appointment],
) -> bool {
    existing.iter().any(|a| {
        a.client_id == client_id
            && a.professional_id == professional_id
            && a.date == date
            && a.status == AppointmentStatus::Upcoming
    })
}

pub(super) fn validate_request(request: &BookingRequest) -> Result<(), EngineError> {
    if request.service.trim().is_empty() {
        return Err(EngineError::Validation("service name is required"));
    }
    if request.service.len() > MAX_SERVICE_NAME_LEN {
        return Err(EngineError::LimitExceeded("service name too long"));
    }
    if request.time.minute() % SLOT_MINUTES != 0 {
        return Err(EngineError::Validation("time must fall on a 30-minute slot"));
    }
    if request.price_cents < 0 || request.price_cents > MAX_PRICE_CENTS {
        return Err(EngineError::Validation("price out of range"));
    }
    if let Some(notes) = &request.notes
        && notes.len() > MAX_NOTES_LEN
    {
        return Err(EngineError::LimitExceeded("notes too long"));
    }
    Ok(())
}

pub(super) fn validate_settings(settings: &Settings) -> Result<(), EngineError> {
    if let Some(hours) = settings.work_hours
        && hours.start >= hours.end
    {
        return Err(EngineError::Validation("work hours must start before they end"));
    }
    if settings.work_days.iter().any(|d| *d > 6) {
        return Err(EngineError::Validation("work days must be weekday indices 0-6"));
    }
    if settings.blocked_days.len() > MAX_BLOCKED_DAYS {
        return Err(EngineError::LimitExceeded("too many blocked days"));
    }
    if settings
        .blocked_slots
        .values()
        .any(|slots| slots.len() > MAX_BLOCKED_SLOTS_PER_DAY)
    {
        return Err(EngineError::LimitExceeded("too many blocked slots on one day"));
    }
    Ok(())
}
