//! Time windows bounding an activity fetch.

use chrono::{DateTime, Duration, TimeZone, Utc};

/// Half-open interval `[after, before)` of Unix timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub after: i64,
    pub before: i64,
}

impl FetchWindow {
    /// Window covering one calendar year: `[Jan 1 Y, Jan 1 Y+1)` UTC.
    pub fn for_year(year: i32) -> Result<Self, String> {
        let start = utc_year_start(year)?;
        let end = utc_year_start(year + 1)?;
        Ok(FetchWindow {
            after: start.timestamp(),
            before: end.timestamp(),
        })
    }

    /// Trailing week ending at `now`: `[now - 7d, now)`.
    pub fn last_7_days(now: DateTime<Utc>) -> Self {
        FetchWindow {
            after: (now - Duration::days(7)).timestamp(),
            before: now.timestamp(),
        }
    }
}

fn utc_year_start(year: i32) -> Result<DateTime<Utc>, String> {
    Utc.with_ymd_and_hms(year, 1, 1, 0, 0, 0)
        .single()
        .ok_or_else(|| format!("year {} is out of range", year))
}

/// Staging file name for a window: one convention per window type.
pub fn csv_file_name(year: Option<i32>) -> String {
    match year {
        Some(y) => format!("activities_{}.csv", y),
        None => "activities_last_7_days.csv".to_string(),
    }
}
