//! Once-per-calendar-day usage gate over the persisted last-check timestamp.

use chrono::{DateTime, Datelike, Local, TimeZone, Utc};

/// Whether two instants fall on the same calendar day (year/month/day) of the
/// zone they are expressed in.
pub fn same_calendar_day<Tz: TimeZone>(a: &DateTime<Tz>, b: &DateTime<Tz>) -> bool {
    a.year() == b.year() && a.month() == b.month() && a.day() == b.day()
}

/// Whether the gate blocks a new check: the most recent check happened on
/// today's calendar day, compared in local time.
pub fn checked_today(last_checked_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_checked_at {
        Some(last) => same_calendar_day(&last.with_timezone(&Local), &now.with_timezone(&Local)),
        None => false,
    }
}
