//! Request windows and the `YYYYMMDD` date boundary

use super::error::RateError;
use chrono::{Duration, NaiveDate};

/// Boundary format for dates in queries and shareable state.
pub const QUERY_DATE_FORMAT: &str = "%Y%m%d";

/// Lookback used by the trend chart.
pub const CHART_LOOKBACK_DAYS: u32 = 7;

/// Longest window a caller may request.
pub const MAX_LOOKBACK_DAYS: u32 = 31;

pub fn parse_query_date(value: &str) -> Result<NaiveDate, RateError> {
    let value = value.trim();
    if value.len() != 8 || !value.chars().all(|c| c.is_ascii_digit()) {
        return Err(RateError::InvalidDate(format!(
            "'{value}' is not in YYYYMMDD format"
        )));
    }
    NaiveDate::parse_from_str(value, QUERY_DATE_FORMAT)
        .map_err(|e| RateError::InvalidDate(format!("'{value}': {e}")))
}

pub fn format_query_date(date: NaiveDate) -> String {
    date.format(QUERY_DATE_FORMAT).to_string()
}

/// A trailing run of calendar days ending at, and including, `anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestWindow {
    anchor: NaiveDate,
    lookback_days: u32,
}

impl RequestWindow {
    pub fn new(anchor: NaiveDate, lookback_days: u32) -> Result<Self, RateError> {
        if lookback_days == 0 {
            return Err(RateError::InvalidWindow(
                "lookback must be at least one day".to_string(),
            ));
        }
        if lookback_days > MAX_LOOKBACK_DAYS {
            return Err(RateError::InvalidWindow(format!(
                "lookback of {lookback_days} days exceeds {MAX_LOOKBACK_DAYS}"
            )));
        }
        if anchor
            .checked_sub_signed(Duration::days(i64::from(lookback_days - 1)))
            .is_none()
        {
            return Err(RateError::InvalidWindow(format!(
                "window of {lookback_days} days ending {anchor} starts before the earliest date"
            )));
        }
        Ok(Self {
            anchor,
            lookback_days,
        })
    }

    /// Window for the point-in-time table.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            anchor: date,
            lookback_days: 1,
        }
    }

    /// Window for the trend chart.
    pub fn chart(anchor: NaiveDate) -> Self {
        Self {
            anchor,
            lookback_days: CHART_LOOKBACK_DAYS,
        }
    }

    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    pub fn lookback_days(&self) -> u32 {
        self.lookback_days
    }

    /// Dates in the window, oldest first. Days before the earliest
    /// representable date are skipped.
    pub fn dates(&self) -> Vec<NaiveDate> {
        (0..self.lookback_days)
            .rev()
            .filter_map(|offset| {
                self.anchor
                    .checked_sub_signed(Duration::days(i64::from(offset)))
            })
            .collect()
    }
}
