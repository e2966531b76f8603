//! # Expiration Rules
//!
//! The two time predicates every store must agree on.
//!
//! ```text
//!            now                      now + interval
//!  ───────────┼──────────────────────────────┼──────────────► time
//!   expired   │   expiring within window     │   not yet due
//!   (flag)    │   (lookahead query)          │
//! ```
//!
//! - Expired: `now > expiration_date`. A product expiring exactly at `now`
//!   is not expired yet, matching the SQL sweep predicate.
//! - Lookahead: `expiration_date <= now + interval`. This ignores the
//!   persisted flag, so already-expired products are included too. The
//!   interval is clamped to `[-MAX_LOOKBACK_DAYS, MAX_LOOKAHEAD_DAYS]` so
//!   the horizon stays inside the storable year range.

use chrono::{DateTime, Duration, Utc};

/// Earliest storable expiration year.
pub const MIN_EXPIRATION_YEAR: i32 = 0;

/// Latest storable expiration year.
pub const MAX_EXPIRATION_YEAR: i32 = 9999;

/// Largest forward lookahead, in days.
pub const MAX_LOOKAHEAD_DAYS: i64 = 365 * 7000;

/// Largest look-back (negative interval), in days.
pub const MAX_LOOKBACK_DAYS: i64 = 365 * 2000;

/// Returns true once `now` is strictly past `expiration_date`.
#[inline]
pub fn is_expired_at(expiration_date: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now > expiration_date
}

/// Limits a lookahead interval to the supported window.
pub fn clamp_lookahead(interval: Duration) -> Duration {
    interval.clamp(
        -Duration::days(MAX_LOOKBACK_DAYS),
        Duration::days(MAX_LOOKAHEAD_DAYS),
    )
}

/// The upper bound of a lookahead window opened at `now`.
///
/// The interval is clamped first; a `now` near the end of the calendar
/// saturates instead of overflowing.
pub fn lookahead_horizon(now: DateTime<Utc>, interval: Duration) -> DateTime<Utc> {
    let interval = clamp_lookahead(interval);

    now.checked_add_signed(interval).unwrap_or(if interval < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// Returns true if `expiration_date` falls at or before `now + interval`.
pub fn is_within_lookahead(
    expiration_date: DateTime<Utc>,
    now: DateTime<Utc>,
    interval: Duration,
) -> bool {
    expiration_date <= lookahead_horizon(now, interval)
}
