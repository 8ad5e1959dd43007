use chrono::NaiveDate;
use ulid::Ulid;

use crate::backend::BackendError;
use crate::model::AppointmentStatus;

#[derive(Debug)]
pub enum EngineError {
    /// A required field is missing or malformed. Rejected before any write.
    Validation(&'static str),
    /// The client already holds an upcoming appointment with this
    /// professional on this date. Not retryable.
    DuplicateBooking {
        professional_id: Ulid,
        date: NaiveDate,
    },
    /// The appointment is in a terminal state and a different state was
    /// requested.
    InvalidTransition {
        from: AppointmentStatus,
        to: AppointmentStatus,
    },
    /// The actor is not allowed to perform this transition.
    Forbidden(&'static str),
    NotFound(Ulid),
    LimitExceeded(&'static str),
    /// Collaborator failure that survived the retry policy.
    Backend(BackendError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(msg) => write!(f, "validation failed: {msg}"),
            EngineError::DuplicateBooking {
                professional_id,
                date,
            } => write!(
                f,
                "an upcoming appointment with professional {professional_id} \
                 already exists on {date}"
            ),
            EngineError::InvalidTransition { from, to } => {
                write!(f, "cannot move appointment from {from} to {to}")
            }
            EngineError::Forbidden(msg) => write!(f, "not allowed: {msg}"),
            EngineError::NotFound(id) => write!(f, "not found: {id}"),
            EngineError::LimitExceeded(msg) => write!(f, "limit exceeded: {msg}"),
            EngineError::Backend(e) => write!(f, "backend error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Backend(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BackendError> for EngineError {
    fn from(e: BackendError) -> Self {
        match e {
            BackendError::UniqueViolation {
                professional_id,
                date,
                ..
            } => EngineError::DuplicateBooking {
                professional_id,
                date,
            },
            BackendError::NotFound(id) => EngineError::NotFound(id),
            other => EngineError::Backend(other),
        }
    }
}
