// ── RED metrics (request-driven) ────────────────────────────────

/// Counter: appointments successfully booked.
pub const BOOKINGS_TOTAL: &str = "slotbook_bookings_total";

/// Counter: bookings rejected by the duplicate guard or the unique backstop.
pub const BOOKINGS_REJECTED_TOTAL: &str = "slotbook_bookings_rejected_total";

/// Counter: status transitions applied. Labels: status.
pub const STATUS_TRANSITIONS_TOTAL: &str = "slotbook_status_transitions_total";

/// Histogram: availability computation latency in seconds.
pub const AVAILABILITY_DURATION_SECONDS: &str = "slotbook_availability_duration_seconds";

/// Histogram: slots returned per availability query.
pub const AVAILABILITY_SLOTS_RETURNED: &str = "slotbook_availability_slots_returned";

// ── USE metrics (collaborator utilization) ──────────────────────

/// Counter: transient backend failures that triggered a retry.
pub const RETRY_ATTEMPTS_TOTAL: &str = "slotbook_retry_attempts_total";

/// Counter: operations that exhausted their retry budget.
pub const RETRY_EXHAUSTED_TOTAL: &str = "slotbook_retry_exhausted_total";
