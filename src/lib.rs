//! slotbook — availability and booking core for a service-appointment
//! platform.
//!
//! The crate is built around one pure function,
//! [`engine::compute_available_slots`], which turns a professional's
//! configuration plus the day's bookings into the ordered 30-minute slot
//! grid a client can book from. Everything around it is thin: a
//! [`backend::Backend`] trait standing in for the hosted datastore, a
//! duplicate-booking guard backed by a uniqueness constraint, a small
//! status state machine, and bounded retries for transient collaborator
//! failures.

pub mod backend;
pub mod engine;
pub mod limits;
pub mod model;
pub mod observability;
pub mod retry;

pub use backend::{Backend, BackendError, MemoryBackend};
pub use engine::{Engine, EngineError};
pub use model::{
    Actor, Appointment, AppointmentStatus, BookingRequest, Role, Settings, SlotTime, WorkHours,
};
pub use retry::RetryPolicy;
