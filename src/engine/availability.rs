use std::collections::BTreeSet;

use chrono::{NaiveDate, NaiveDateTime, Timelike};

use crate::model::{Appointment, Settings, SlotTime};

/// Slot spacing is fixed — the grid does not widen for longer services.
pub const SLOT_MINUTES: u8 = 30;

// ── Availability Algorithm ────────────────────────────────────────

/// Compute the bookable slots for one professional on one calendar day.
///
/// A slot survives when it is inside the working window, on an active work
/// day that is not blocked, not already booked, not individually blocked,
/// and — when `date` is `now`'s own day — not earlier than the current time.
///
/// Pure: identical inputs (including `now`) give identical output. A
/// professional with no work hours yields an empty grid, never an error.
pub fn compute_available_slots(
    date: NaiveDate,
    settings: &Settings,
    booked: &BTreeSet<SlotTime>,
    now: NaiveDateTime,
) -> Vec<SlotTime> {
    let Some(hours) = settings.work_hours else {
        return Vec::new();
    };
    if !hours.is_well_formed() {
        return Vec::new();
    }
    if !settings.is_work_day(date) || settings.is_blocked_day(date) {
        return Vec::new();
    }

    let blocked = settings.blocked_slots_for(date);
    let today = date == now.date();

    let mut slots = Vec::new();
    for hour in hours.start.hour()..hours.end.hour() {
        for minute in (0u8..60).step_by(SLOT_MINUTES as usize) {
            let slot = SlotTime::new(hour, minute);
            if today && is_past(slot, now) {
                continue;
            }
            if booked.contains(&slot) || blocked.is_some_and(|b| b.contains(&slot)) {
                continue;
            }
            slots.push(slot);
        }
    }
    slots
}

/// A slot has passed once the wall clock moves beyond its opening minute:
/// at 14:05 the 14:00 slot is gone, 14:30 is still open.
fn is_past(slot: SlotTime, now: NaiveDateTime) -> bool {
    (slot.hour() as u32) < now.hour()
        || (slot.hour() as u32 == now.hour() && (slot.minute() as u32) < now.minute())
}

/// Reduce a day's appointments to the set of held times. Cancelled
/// appointments release their slot.
pub fn booked_times(appointments: &[Appointment]) -> BTreeSet<SlotTime> {
    appointments
        .iter()
        .filter(|a| a.status.holds_slot())
        .map(|a| a.time)
        .collect()
}
