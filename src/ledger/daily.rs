//! Calendar-day bookkeeping for the daily ceilings.
//!
//! Counters belong to the local date of the last recorded transaction. They
//! are reset lazily: the first operation whose local date is later than that
//! date starts a fresh window. Nothing here runs on a timer.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

pub fn local_date(instant: DateTime<Utc>, timezone: Tz) -> NaiveDate {
    instant.with_timezone(&timezone).date_naive()
}

/// True when `now` falls on a later local date than `last`.
pub fn has_rolled_over(last: Option<DateTime<Utc>>, now: DateTime<Utc>, timezone: Tz) -> bool {
    match last {
        Some(last) => local_date(now, timezone) > local_date(last, timezone),
        None => false,
    }
}

/// First instant of the local day following `instant`.
///
/// Zones that skip midnight on a DST change (São Paulo did until 2019) start
/// that day at the first valid local time instead.
pub fn next_local_midnight(instant: DateTime<Utc>, timezone: Tz) -> Option<DateTime<Utc>> {
    let next_day = local_date(instant, timezone).succ_opt()?;
    let midnight = next_day.and_time(NaiveTime::MIN);
    (0..=2)
        .find_map(|hours| {
            timezone
                .from_local_datetime(&(midnight + Duration::hours(hours)))
                .earliest()
        })
        .map(|local| local.with_timezone(&Utc))
}

/// Time left before the daily counters start over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResetCountdown {
    remaining: Duration,
}

impl ResetCountdown {
    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn hours(&self) -> i64 {
        self.remaining.num_hours()
    }

    /// Minutes past the whole hours.
    pub fn minutes(&self) -> i64 {
        self.remaining.num_minutes() % 60
    }
}

impl fmt::Display for ResetCountdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}min", self.hours(), self.minutes())
    }
}

/// Countdown to the reset of the window opened by `last`.
///
/// `None` when there is no open window: no transaction yet, or the day has
/// already rolled over.
pub fn time_until_reset(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    timezone: Tz,
) -> Option<ResetCountdown> {
    let last = last?;
    if has_rolled_over(Some(last), now, timezone) {
        return None;
    }
    let reset_at = next_local_midnight(last, timezone)?;
    Some(ResetCountdown {
        remaining: (reset_at - now).max(Duration::zero()),
    })
}
