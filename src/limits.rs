//! Input caps enforced at the validation layer.

pub const MAX_SERVICE_NAME_LEN: usize = 120;
pub const MAX_NOTES_LEN: usize = 1_000;

/// A day has at most 48 half-hour boundaries.
pub const MAX_BLOCKED_SLOTS_PER_DAY: usize = 48;
pub const MAX_BLOCKED_DAYS: usize = 366;

pub const MAX_PRICE_CENTS: i64 = 100_000_000;
