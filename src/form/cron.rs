use serde::Serialize;
use std::fmt;

/// Positions of a five-field cron expression
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CronField {
    Minute,
    Hour,
    DayOfMonth,
    Month,
    DayOfWeek,
}

impl CronField {
    pub const ALL: [CronField; 5] = [
        CronField::Minute,
        CronField::Hour,
        CronField::DayOfMonth,
        CronField::Month,
        CronField::DayOfWeek,
    ];

    /// Inclusive numeric bounds for the field
    pub fn bounds(&self) -> (u32, u32) {
        match self {
            CronField::Minute => (0, 59),
            CronField::Hour => (0, 23),
            CronField::DayOfMonth => (1, 31),
            CronField::Month => (1, 12),
            CronField::DayOfWeek => (0, 6),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CronField::Minute => "minute",
            CronField::Hour => "hour",
            CronField::DayOfMonth => "day of month",
            CronField::Month => "month",
            CronField::DayOfWeek => "day of week",
        }
    }
}

/// Why a cron expression was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CronError {
    /// Expression did not split into exactly five fields
    FieldCount(usize),

    /// A field is neither a wildcard, a value, a list nor a range
    Syntax { field: CronField, token: String },

    /// A numeric value falls outside the field's bounds
    OutOfRange { field: CronField, value: u32 },
}

impl fmt::Display for CronError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CronError::FieldCount(count) => {
                write!(f, "Expected 5 fields, found {}", count)
            }
            CronError::Syntax { field, token } => {
                write!(f, "Invalid {} field: '{}'", field.name(), token)
            }
            CronError::OutOfRange { field, value } => {
                let (min, max) = field.bounds();
                write!(
                    f,
                    "{} value {} is outside {}-{}",
                    field.name(),
                    value,
                    min,
                    max
                )
            }
        }
    }
}

impl std::error::Error for CronError {}

/// Check that `expression` is a five-field cron expression.
///
/// Each field is `*`, a single value, a comma-separated list of values, or
/// one `a-b` range. Lists and ranges never combine in one field, and a range
/// does not require `a <= b`.
pub fn validate_cron_expression(expression: &str) -> Result<(), CronError> {
    let parts: Vec<&str> = expression.split_whitespace().collect();
    if parts.len() != CronField::ALL.len() {
        return Err(CronError::FieldCount(parts.len()));
    }

    for (field, token) in CronField::ALL.into_iter().zip(parts) {
        validate_field(field, token)?;
    }

    Ok(())
}

fn validate_field(field: CronField, token: &str) -> Result<(), CronError> {
    if token == "*" {
        return Ok(());
    }

    if token.contains('-') {
        let mut ends = token.split('-');
        match (ends.next(), ends.next(), ends.next()) {
            (Some(start), Some(end), None) => {
                check_value(field, token, start)?;
                check_value(field, token, end)?;
            }
            _ => return Err(syntax(field, token)),
        }
        return Ok(());
    }

    // A single value is a one-item list
    for value in token.split(',') {
        check_value(field, token, value)?;
    }

    Ok(())
}

fn check_value(field: CronField, token: &str, raw: &str) -> Result<(), CronError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(syntax(field, token));
    }

    // Digits only, so parsing can only fail on overflow
    let value: u32 = raw.parse().map_err(|_| syntax(field, token))?;
    let (min, max) = field.bounds();
    if value < min || value > max {
        return Err(CronError::OutOfRange { field, value });
    }

    Ok(())
}

fn syntax(field: CronField, token: &str) -> CronError {
    CronError::Syntax {
        field,
        token: token.to_string(),
    }
}

/// Quick-pick schedule offered next to the cron input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CronPreset {
    pub name: &'static str,
    pub expression: &'static str,
}

pub const COMMON_CRON_EXPRESSIONS: [CronPreset; 7] = [
    CronPreset {
        name: "Every minute",
        expression: "* * * * *",
    },
    CronPreset {
        name: "Every hour",
        expression: "0 * * * *",
    },
    CronPreset {
        name: "Every day at midnight",
        expression: "0 0 * * *",
    },
    CronPreset {
        name: "Every day at 6 AM",
        expression: "0 6 * * *",
    },
    CronPreset {
        name: "Every Monday at 9 AM",
        expression: "0 9 * * 1",
    },
    CronPreset {
        name: "Every month on the 1st at midnight",
        expression: "0 0 1 * *",
    },
    CronPreset {
        name: "Every weekday at 9 AM",
        expression: "0 9 * * 1-5",
    },
];
