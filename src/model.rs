use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Time-of-day at minute precision. Formats and parses as `HH:MM`.
///
/// Ordering is lexicographic on (hour, minute), so a sorted sequence of
/// `SlotTime`s is a chronologically ascending slot grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SlotTime {
    hour: u8,
    minute: u8,
}

impl SlotTime {
    pub fn new(hour: u8, minute: u8) -> Self {
        debug_assert!(hour < 24, "SlotTime hour out of range");
        debug_assert!(minute < 60, "SlotTime minute out of range");
        Self { hour, minute }
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotTimeError(String);

impl fmt::Display for ParseSlotTimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid time-of-day: {:?}", self.0)
    }
}

impl std::error::Error for ParseSlotTimeError {}

impl FromStr for SlotTime {
    type Err = ParseSlotTimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (h, m) = s
            .split_once(':')
            .ok_or_else(|| ParseSlotTimeError(s.to_string()))?;
        let hour: u8 = h.parse().map_err(|_| ParseSlotTimeError(s.to_string()))?;
        let minute: u8 = m.parse().map_err(|_| ParseSlotTimeError(s.to_string()))?;
        if hour > 23 || minute > 59 {
            return Err(ParseSlotTimeError(s.to_string()));
        }
        Ok(Self { hour, minute })
    }
}

impl TryFrom<String> for SlotTime {
    type Error = ParseSlotTimeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<SlotTime> for String {
    fn from(t: SlotTime) -> Self {
        t.to_string()
    }
}

/// Daily working window. The slot grid opens at `start`'s hour and closes at
/// `end`'s hour — minute components are carried for display but do not shift
/// the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkHours {
    pub start: SlotTime,
    pub end: SlotTime,
}

impl WorkHours {
    /// True when the window spans at least one whole hour.
    pub fn is_well_formed(&self) -> bool {
        self.start.hour() < self.end.hour()
    }
}

/// Weekday index with Sunday = 0 .. Saturday = 6.
pub fn weekday_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Per-professional scheduling configuration. Persisted wholesale
/// (replace-on-save) in the collaborator's record format, hence the
/// camelCase field names on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// `None` until the professional finishes onboarding. Not an error state.
    pub work_hours: Option<WorkHours>,
    /// Active weekdays, Sunday = 0.
    pub work_days: BTreeSet<u8>,
    /// Whole days off. Override `work_days`.
    pub blocked_days: BTreeSet<NaiveDate>,
    /// Individually closed times per date, independent of bookings.
    #[serde(rename = "blockedTimeSlots")]
    pub blocked_slots: HashMap<NaiveDate, BTreeSet<SlotTime>>,
}

impl Settings {
    pub fn is_work_day(&self, date: NaiveDate) -> bool {
        self.work_days.contains(&weekday_index(date))
    }

    pub fn is_blocked_day(&self, date: NaiveDate) -> bool {
        self.blocked_days.contains(&date)
    }

    pub fn blocked_slots_for(&self, date: NaiveDate) -> Option<&BTreeSet<SlotTime>> {
        self.blocked_slots.get(&date)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Upcoming,
    Completed,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Upcoming => "upcoming",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Completed and Cancelled are final — no transition leaves them.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, AppointmentStatus::Upcoming)
    }

    /// A slot is held by every appointment that was not cancelled.
    pub fn holds_slot(&self) -> bool {
        !matches!(self, AppointmentStatus::Cancelled)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A booked service occurrence. Owned by the professional who delivers it;
/// referenced by the client who requested it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Ulid,
    pub professional_id: Ulid,
    pub client_id: Ulid,
    pub service: String,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub price_cents: i64,
    pub status: AppointmentStatus,
    pub notes: Option<String>,
}

/// Input to a booking write. Becomes an `Appointment` in `Upcoming` status
/// once it clears validation and the duplicate guard.
#[derive(Debug, Clone)]
pub struct BookingRequest {
    pub professional_id: Ulid,
    pub client_id: Ulid,
    pub service: String,
    pub date: NaiveDate,
    pub time: SlotTime,
    pub price_cents: i64,
    pub notes: Option<String>,
}

impl BookingRequest {
    pub fn into_appointment(self, id: Ulid) -> Appointment {
        let notes = self
            .notes
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty());
        Appointment {
            id,
            professional_id: self.professional_id,
            client_id: self.client_id,
            service: self.service,
            date: self.date,
            time: self.time,
            price_cents: self.price_cents,
            status: AppointmentStatus::Upcoming,
            notes,
        }
    }
}

/// The authenticated actor, as supplied by the identity collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: Ulid,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Client,
    Professional,
    Admin,
}
