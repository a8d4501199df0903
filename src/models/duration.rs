//! Calendar-relative durations between two timestamps.
//!
//! Differences are expressed as "1 month and 3 days" rather than "33 days":
//! whole months are counted first (clamping the day to the length of the
//! target month), and only the remainder is broken into days and below.
//!
//! Every component carries the sign of the whole difference, down to the
//! microseconds: -1.5s is `seconds: -1, microseconds: -500000`, not the
//! `seconds: -2, microseconds: 500000` that a normalised relativedelta gives.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

const MICROS_PER_SECOND: i64 = 1_000_000;
const SECONDS_PER_DAY: i64 = 86_400;

/// Difference between two timestamps broken into calendar components.
///
/// All components share the sign of the overall difference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct CalendarDelta {
    pub years: i32,
    pub months: i32,
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    pub microseconds: i64,
}

impl CalendarDelta {
    /// Duration of something that started at `start` and ended at `end`.
    ///
    /// Returns `None` when there is no start; a missing end means "still
    /// running" and is measured against the current UTC time.
    pub fn elapsed(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Option<Self> {
        let start = start?;
        let end = end.unwrap_or_else(|| Utc::now().naive_utc());
        Some(Self::between(start, end))
    }

    /// Calendar difference `end - start`.
    pub fn between(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        let mut months = (end.year() - start.year()) * 12 + end.month() as i32 - start.month() as i32;

        // The naive month count can overshoot by one in either direction
        // (e.g. Jan 31 -> Feb 1 is zero whole months).
        if end >= start {
            while months > 0 && add_months(start, months) > end {
                months -= 1;
            }
        } else {
            while months < 0 && add_months(start, months) < end {
                months += 1;
            }
        }

        let remainder = end - add_months(start, months);
        let mut delta = Self::from_remainder(remainder);
        delta.years = months / 12;
        delta.months = months % 12;
        delta
    }

    /// Split a sub-month remainder into days, hours, minutes, seconds and microseconds.
    fn from_remainder(remainder: Duration) -> Self {
        let total_micros = remainder
            .num_microseconds()
            .unwrap_or_else(|| remainder.num_milliseconds().saturating_mul(1_000));
        let sign = total_micros.signum();
        let micros = total_micros.abs();

        let total_seconds = micros / MICROS_PER_SECOND;

        Self {
            years: 0,
            months: 0,
            days: sign * (total_seconds / SECONDS_PER_DAY),
            hours: sign * ((total_seconds % SECONDS_PER_DAY) / 3_600),
            minutes: sign * ((total_seconds % 3_600) / 60),
            seconds: sign * (total_seconds % 60),
            microseconds: sign * (micros % MICROS_PER_SECOND),
        }
    }
}

/// Shift a timestamp by whole months, clamping the day to the month's length.
fn add_months(dt: NaiveDateTime, months: i32) -> NaiveDateTime {
    let zero_based = dt.year() * 12 + dt.month0() as i32 + months;
    let year = zero_based.div_euclid(12);
    let month = zero_based.rem_euclid(12) as u32 + 1;
    let day = dt.day().min(days_in_month(year, month));

    NaiveDate::from_ymd_opt(year, month, day)
        .map(|date| date.and_time(dt.time()))
        .unwrap_or(dt)
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(28)
}
