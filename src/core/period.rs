//! Date range parsing and NAV filtering

use chrono::NaiveDate;
use std::fmt::Display;
use thiserror::Error;
use tracing::debug;

use super::fund::NavPoint;

/// Date format used by upstream NAV points and by the `start`/`end` query values.
pub const NAV_DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("both start and end dates are required in the format dd-mm-yyyy")]
    Incomplete,
    #[error("invalid start date format. use dd-mm-yyyy")]
    InvalidStart,
    #[error("invalid end date format. use dd-mm-yyyy")]
    InvalidEnd,
    #[error("end date cannot be in the future")]
    EndInFuture,
    #[error("start date cannot be after end date")]
    StartAfterEnd,
}

/// Inclusive `[start, end]` window. Only built through [`DateRange::from_query`],
/// so `start <= end` always holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Validates the optional `start`/`end` values against `today`.
    ///
    /// Returns `Ok(None)` when neither bound is given, meaning no filtering.
    pub fn from_query(
        start: Option<&str>,
        end: Option<&str>,
        today: NaiveDate,
    ) -> Result<Option<Self>, PeriodError> {
        let (start, end) = match (start, end) {
            (None, None) => return Ok(None),
            (Some(start), Some(end)) => (start, end),
            _ => return Err(PeriodError::Incomplete),
        };

        let start = parse_nav_date(start).ok_or(PeriodError::InvalidStart)?;
        let end = parse_nav_date(end).ok_or(PeriodError::InvalidEnd)?;

        if end > today {
            return Err(PeriodError::EndInFuture);
        }
        if start > end {
            return Err(PeriodError::StartAfterEnd);
        }

        Ok(Some(Self { start, end }))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} to {}",
            self.start.format(NAV_DATE_FORMAT),
            self.end.format(NAV_DATE_FORMAT)
        )
    }
}

/// Parses a strict `dd-mm-yyyy` date: two digit day and month, four digit year.
pub fn parse_nav_date(value: &str) -> Option<NaiveDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            2 | 5 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    NaiveDate::parse_from_str(value, NAV_DATE_FORMAT).ok()
}

/// Keeps the points falling inside `range`, preserving upstream order.
///
/// Points with an unparseable date are skipped rather than failing the batch.
pub fn filter_nav(points: &[NavPoint], range: Option<&DateRange>) -> Vec<NavPoint> {
    points
        .iter()
        .filter(|point| {
            let Some(date) = parse_nav_date(&point.date) else {
                debug!(date = %point.date, "Skipping NAV point with unparseable date");
                return false;
            };
            range.is_none_or(|range| range.contains(date))
        })
        .cloned()
        .collect()
}
