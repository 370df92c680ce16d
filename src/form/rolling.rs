use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use std::fmt;

use super::models::RollingPattern;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RollingRangeError {
    /// `custom` needs both day offsets
    MissingOffsets,

    /// Day offset is not a day of month
    InvalidOffset(u32),

    /// Reference date has no representable window
    OutOfRange,
}

impl fmt::Display for RollingRangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RollingRangeError::MissingOffsets => {
                write!(f, "Custom rolling pattern requires both day offsets")
            }
            RollingRangeError::InvalidOffset(day) => {
                write!(f, "Day offset {} is not between 1 and 31", day)
            }
            RollingRangeError::OutOfRange => write!(f, "Reference date is out of range"),
        }
    }
}

impl std::error::Error for RollingRangeError {}

fn last_day_of_month(year: i32, month: u32) -> Option<u32> {
    let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)?
        .pred_opt()
        .map(|d| d.day())
}

/// `(year, month)` of the month before `date`
fn previous_month(date: NaiveDate) -> (i32, u32) {
    if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    }
}

/// Day `day` of a month, clamped to the month's last day
fn clamped_day(year: i32, month: u32, day: u32) -> Result<NaiveDate, RollingRangeError> {
    let last = last_day_of_month(year, month).ok_or(RollingRangeError::OutOfRange)?;
    NaiveDate::from_ymd_opt(year, month, day.min(last)).ok_or(RollingRangeError::OutOfRange)
}

fn start_of(date: NaiveDate) -> Result<NaiveDateTime, RollingRangeError> {
    date.and_hms_opt(0, 0, 0).ok_or(RollingRangeError::OutOfRange)
}

fn end_of(date: NaiveDate) -> Result<NaiveDateTime, RollingRangeError> {
    date.and_hms_opt(23, 59, 59).ok_or(RollingRangeError::OutOfRange)
}

fn check_offset(day: u32) -> Result<u32, RollingRangeError> {
    if (1..=31).contains(&day) {
        Ok(day)
    } else {
        Err(RollingRangeError::InvalidOffset(day))
    }
}

impl RollingPattern {
    /// Concrete window this pattern covers when a job runs at `reference`.
    ///
    /// The window starts at midnight and ends at 23:59:59. `offsets` are the
    /// previous-month and current-month days used by `custom`; other patterns
    /// ignore them.
    pub fn resolve(
        &self,
        reference: NaiveDateTime,
        offsets: Option<(u32, u32)>,
    ) -> Result<(NaiveDateTime, NaiveDateTime), RollingRangeError> {
        let today = reference.date();
        let (prev_year, prev_month) = previous_month(today);

        let (from, to) = match self {
            RollingPattern::PrevMonth26ToCurr25 => (
                clamped_day(prev_year, prev_month, 26)?,
                clamped_day(today.year(), today.month(), 25)?,
            ),
            RollingPattern::PrevMonthFull => {
                let last = last_day_of_month(prev_year, prev_month)
                    .ok_or(RollingRangeError::OutOfRange)?;
                (
                    clamped_day(prev_year, prev_month, 1)?,
                    clamped_day(prev_year, prev_month, last)?,
                )
            }
            RollingPattern::CurrMonth1To25 => (
                clamped_day(today.year(), today.month(), 1)?,
                clamped_day(today.year(), today.month(), 25)?,
            ),
            RollingPattern::Prev15Days => (days_before(today, 15)?, today),
            RollingPattern::Last30Days => (days_before(today, 30)?, today),
            RollingPattern::Custom => {
                let (from_day, to_day) = offsets.ok_or(RollingRangeError::MissingOffsets)?;
                (
                    clamped_day(prev_year, prev_month, check_offset(from_day)?)?,
                    clamped_day(today.year(), today.month(), check_offset(to_day)?)?,
                )
            }
        };

        Ok((start_of(from)?, end_of(to)?))
    }
}

fn days_before(date: NaiveDate, days: i64) -> Result<NaiveDate, RollingRangeError> {
    date.checked_sub_signed(Duration::days(days))
        .ok_or(RollingRangeError::OutOfRange)
}
