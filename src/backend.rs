use std::fmt;

use async_trait::async_trait;
use chrono::NaiveDate;
use dashmap::DashMap;
use ulid::Ulid;

use crate::model::{Appointment, AppointmentStatus, Settings};

#[derive(Debug)]
pub enum BackendError {
    /// Connectivity-class failure. The only retryable variant.
    Unavailable(String),
    NotFound(Ulid),
    /// The (professional, client, date, upcoming) uniqueness backstop fired.
    UniqueViolation {
        professional_id: Ulid,
        client_id: Ulid,
        date: NaiveDate,
    },
    Corrupt(String),
}

impl BackendError {
    pub fn is_transient(&self) -> bool {
        matches!(self, BackendError::Unavailable(_))
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Unavailable(msg) => write!(f, "backend unavailable: {msg}"),
            BackendError::NotFound(id) => write!(f, "record not found: {id}"),
            BackendError::UniqueViolation {
                professional_id,
                client_id,
                date,
            } => write!(
                f,
                "unique violation: client {client_id} already holds an upcoming \
                 appointment with professional {professional_id} on {date}"
            ),
            BackendError::Corrupt(msg) => write!(f, "corrupt record: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The persistence collaborator. Stands in for the hosted backend the
/// product runs against; the engine only ever talks to this trait.
#[async_trait]
pub trait Backend: Send + Sync {
    /// All appointments for one professional on one calendar day,
    /// ascending by time. Every status is included — callers filter.
    async fn appointments_for_day(
        &self,
        professional_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, BackendError>;

    /// Every appointment a client has booked, across professionals.
    async fn client_appointments(&self, client_id: Ulid)
        -> Result<Vec<Appointment>, BackendError>;

    async fn appointment(&self, id: Ulid) -> Result<Appointment, BackendError>;

    /// Persist a new appointment. Must refuse a second `upcoming` record for
    /// the same (professional, client, date) — this constraint, not the
    /// engine's pre-write guard, is the real duplicate protection.
    async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, BackendError>;

    /// Overwrite the status field. State-machine legality is the engine's
    /// job; the store applies what it is told, like any hosted datastore.
    async fn update_status(
        &self,
        id: Ulid,
        status: AppointmentStatus,
    ) -> Result<Appointment, BackendError>;

    async fn load_settings(&self, professional_id: Ulid)
        -> Result<Option<Settings>, BackendError>;

    /// Replace-on-save: the whole aggregate is written, never patched.
    async fn save_settings(
        &self,
        professional_id: Ulid,
        settings: Settings,
    ) -> Result<(), BackendError>;
}

/// In-memory `Backend` used by tests and as the reference implementation of
/// the uniqueness backstop.
pub struct MemoryBackend {
    appointments: DashMap<Ulid, Appointment>,
    /// (professional, date) → appointment ids, insertion-ordered.
    by_professional_day: DashMap<(Ulid, NaiveDate), Vec<Ulid>>,
    /// Settings rows are kept in their stored JSON form, exactly as the
    /// hosted datastore would hold them.
    settings: DashMap<Ulid, String>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            appointments: DashMap::new(),
            by_professional_day: DashMap::new(),
            settings: DashMap::new(),
        }
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.len()
    }
}

#[async_trait]
impl Backend for MemoryBackend {
    async fn appointments_for_day(
        &self,
        professional_id: Ulid,
        date: NaiveDate,
    ) -> Result<Vec<Appointment>, BackendError> {
        let ids = self
            .by_professional_day
            .get(&(professional_id, date))
            .map(|e| e.value().clone())
            .unwrap_or_default();
        let mut result: Vec<Appointment> = ids
            .iter()
            .filter_map(|id| self.appointments.get(id).map(|a| a.value().clone()))
            .collect();
        result.sort_by_key(|a| a.time);
        Ok(result)
    }

    async fn client_appointments(
        &self,
        client_id: Ulid,
    ) -> Result<Vec<Appointment>, BackendError> {
        let mut result: Vec<Appointment> = self
            .appointments
            .iter()
            .filter(|e| e.value().client_id == client_id)
            .map(|e| e.value().clone())
            .collect();
        result.sort_by_key(|a| (a.date, a.time));
        Ok(result)
    }

    async fn appointment(&self, id: Ulid) -> Result<Appointment, BackendError> {
        self.appointments
            .get(&id)
            .map(|e| e.value().clone())
            .ok_or(BackendError::NotFound(id))
    }

    async fn insert_appointment(
        &self,
        appointment: Appointment,
    ) -> Result<Appointment, BackendError> {
        let key = (appointment.professional_id, appointment.date);
        // The entry guard makes check + insert atomic per (professional, day),
        // closing the window the engine's pre-write guard leaves open.
        let mut ids = self.by_professional_day.entry(key).or_default();
        for id in ids.iter() {
            if let Some(existing) = self.appointments.get(id)
                && existing.client_id == appointment.client_id
                && existing.status == AppointmentStatus::Upcoming
            {
                return Err(BackendError::UniqueViolation {
                    professional_id: appointment.professional_id,
                    client_id: appointment.client_id,
                    date: appointment.date,
                });
            }
        }
        ids.push(appointment.id);
        self.appointments.insert(appointment.id, appointment.clone());
        Ok(appointment)
    }

    async fn update_status(
        &self,
        id: Ulid,
        status: AppointmentStatus,
    ) -> Result<Appointment, BackendError> {
        let mut entry = self
            .appointments
            .get_mut(&id)
            .ok_or(BackendError::NotFound(id))?;
        entry.value_mut().status = status;
        Ok(entry.value().clone())
    }

    async fn load_settings(
        &self,
        professional_id: Ulid,
    ) -> Result<Option<Settings>, BackendError> {
        match self.settings.get(&professional_id) {
            Some(row) => serde_json::from_str(row.value())
                .map(Some)
                .map_err(|e| BackendError::Corrupt(e.to_string())),
            None => Ok(None),
        }
    }

    async fn save_settings(
        &self,
        professional_id: Ulid,
        settings: Settings,
    ) -> Result<(), BackendError> {
        let row = serde_json::to_string(&settings)
            .map_err(|e| BackendError::Corrupt(e.to_string()))?;
        self.settings.insert(professional_id, row);
        Ok(())
    }
}
