use tracing::{debug, info, warn};
use ulid::Ulid;

use crate::model::{
    Actor, Appointment, AppointmentStatus, BookingRequest, Role, Settings,
};
use crate::observability;

use super::conflict::{has_conflict, validate_request, validate_settings};
use super::{Engine, EngineError};

impl Engine {
    /// Create an appointment in `Upcoming` status.
    ///
    /// Validation and the duplicate guard run before the write; the
    /// backend's uniqueness backstop closes the cross-session race the
    /// guard cannot see.
    pub async fn book(&self, request: BookingRequest) -> Result<Appointment, EngineError> {
        validate_request(&request)?;

        let existing = self
            .day_appointments(request.professional_id, request.date)
            .await?;
        if has_conflict(
            request.client_id,
            request.professional_id,
            request.date,
            &existing,
        ) {
            metrics::counter!(observability::BOOKINGS_REJECTED_TOTAL).increment(1);
            debug!(
                professional = %request.professional_id,
                client = %request.client_id,
                date = %request.date,
                "duplicate booking rejected by guard"
            );
            return Err(EngineError::DuplicateBooking {
                professional_id: request.professional_id,
                date: request.date,
            });
        }

        let appointment = request.into_appointment(Ulid::new());
        let created = self
            .backend
            .insert_appointment(appointment)
            .await
            .map_err(|e| {
                if matches!(e, crate::backend::BackendError::UniqueViolation { .. }) {
                    metrics::counter!(observability::BOOKINGS_REJECTED_TOTAL).increment(1);
                }
                EngineError::from(e)
            })?;

        metrics::counter!(observability::BOOKINGS_TOTAL).increment(1);
        info!(
            id = %created.id,
            professional = %created.professional_id,
            date = %created.date,
            time = %created.time,
            "appointment booked"
        );
        Ok(created)
    }

    /// Drive the status state machine: Upcoming → Completed | Cancelled,
    /// terminal states final.
    ///
    /// Requesting the status an appointment already has is a no-op success
    /// (double-click defence); requesting a different status from a
    /// terminal state is an `InvalidTransition`.
    pub async fn update_status(
        &self,
        actor: &Actor,
        appointment_id: Ulid,
        new_status: AppointmentStatus,
    ) -> Result<Appointment, EngineError> {
        let appointment = self.fetch_appointment(appointment_id).await?;
        authorize_transition(actor, &appointment, new_status)?;

        if appointment.status == new_status {
            debug!(id = %appointment_id, status = %new_status, "status unchanged, no-op");
            return Ok(appointment);
        }
        if appointment.status.is_terminal() || new_status == AppointmentStatus::Upcoming {
            warn!(
                id = %appointment_id,
                from = %appointment.status,
                to = %new_status,
                "rejected status transition"
            );
            return Err(EngineError::InvalidTransition {
                from: appointment.status,
                to: new_status,
            });
        }

        let updated = self
            .backend
            .update_status(appointment_id, new_status)
            .await?;
        metrics::counter!(
            observability::STATUS_TRANSITIONS_TOTAL,
            "status" => new_status.as_str()
        )
        .increment(1);
        info!(id = %appointment_id, status = %new_status, "appointment status updated");
        Ok(updated)
    }

    /// Replace a professional's settings aggregate wholesale.
    pub async fn save_settings(
        &self,
        professional_id: Ulid,
        settings: Settings,
    ) -> Result<(), EngineError> {
        validate_settings(&settings)?;
        self.backend
            .save_settings(professional_id, settings)
            .await?;
        info!(professional = %professional_id, "settings saved");
        Ok(())
    }
}

/// Completion is the owning professional's call; cancellation also belongs
/// to the booking client. Admins may do either.
fn authorize_transition(
    actor: &Actor,
    appointment: &Appointment,
    new_status: AppointmentStatus,
) -> Result<(), EngineError> {
    match actor.role {
        Role::Admin => Ok(()),
        Role::Professional if actor.id == appointment.professional_id => Ok(()),
        Role::Client if actor.id == appointment.client_id => match new_status {
            AppointmentStatus::Cancelled => Ok(()),
            _ => Err(EngineError::Forbidden(
                "clients may only cancel their own appointments",
            )),
        },
        _ => Err(EngineError::Forbidden(
            "only the owning professional or booking client may change this appointment",
        )),
    }
}
