use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of transfer a job performs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    Download,
    Upload,
    Other,
}

impl JobType {
    /// Interpret a raw form value. Blank values have no job type.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim() {
            "" => None,
            "download" => Some(JobType::Download),
            "upload" => Some(JobType::Upload),
            _ => Some(JobType::Other),
        }
    }
}

/// How a job is scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleType {
    OneTime,
    Recurring,
}

impl ScheduleType {
    /// Interpret a raw form value. Unknown values carry no schedule rules.
    pub fn from_form_value(value: &str) -> Option<Self> {
        match value.trim() {
            "one_time" => Some(ScheduleType::OneTime),
            "recurring" => Some(ScheduleType::Recurring),
            _ => None,
        }
    }
}

/// Named date windows relative to the day a job runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RollingPattern {
    #[serde(rename = "prev_month_26_to_curr_25")]
    PrevMonth26ToCurr25,
    PrevMonthFull,
    #[serde(rename = "curr_month_1_to_25")]
    CurrMonth1To25,
    #[serde(rename = "prev_15_days")]
    Prev15Days,
    #[serde(rename = "last_30_days")]
    Last30Days,
    Custom,
}

impl RollingPattern {
    pub const ALL: [RollingPattern; 6] = [
        RollingPattern::PrevMonth26ToCurr25,
        RollingPattern::PrevMonthFull,
        RollingPattern::CurrMonth1To25,
        RollingPattern::Prev15Days,
        RollingPattern::Last30Days,
        RollingPattern::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RollingPattern::PrevMonth26ToCurr25 => "prev_month_26_to_curr_25",
            RollingPattern::PrevMonthFull => "prev_month_full",
            RollingPattern::CurrMonth1To25 => "curr_month_1_to_25",
            RollingPattern::Prev15Days => "prev_15_days",
            RollingPattern::Last30Days => "last_30_days",
            RollingPattern::Custom => "custom",
        }
    }
}

impl fmt::Display for RollingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known rolling pattern
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownRollingPattern(pub String);

impl fmt::Display for UnknownRollingPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown rolling pattern: {}", self.0)
    }
}

impl std::error::Error for UnknownRollingPattern {}

impl FromStr for RollingPattern {
    type Err = UnknownRollingPattern;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        RollingPattern::ALL
            .into_iter()
            .find(|pattern| pattern.as_str() == s)
            .ok_or_else(|| UnknownRollingPattern(s.to_string()))
    }
}

/// Snapshot of the job create/edit form as submitted
///
/// Field names match the form element ids. Values are kept raw; the
/// validator decides what counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct JobFormInput {
    pub name: String,
    pub site_id: String,
    pub job_type: String,
    pub target_site_id: Option<String>,
    pub schedule_type: String,
    pub schedule_datetime: Option<String>,
    pub cron_expression: Option<String>,
    pub use_date_range: bool,
    pub date_from: Option<String>,
    pub date_to: Option<String>,
    pub use_rolling_date_range: bool,
    pub rolling_pattern: Option<String>,
    pub date_offset_from: Option<String>,
    pub date_offset_to: Option<String>,
    pub download_all: bool,
}

/// Which date filter a job runs with once its option groups are resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DateSelection {
    /// Every file on the remote site
    DownloadAll,
    /// Window computed from a rolling pattern at run time
    Rolling { pattern: String },
    /// Fixed calendar window
    Static {
        date_from: Option<String>,
        date_to: Option<String>,
    },
    /// No date filter at all
    Unbounded,
}

/// Trimmed value of an optional field, `None` when blank
pub(crate) fn present(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl JobFormInput {
    pub fn job_type(&self) -> Option<JobType> {
        JobType::from_form_value(&self.job_type)
    }

    pub fn schedule_type(&self) -> Option<ScheduleType> {
        ScheduleType::from_form_value(&self.schedule_type)
    }

    /// Parsed rolling pattern; `None` when blank or unrecognised
    pub fn rolling_pattern(&self) -> Option<RollingPattern> {
        present(self.rolling_pattern.as_deref()).and_then(|p| p.parse().ok())
    }

    /// Resolve the date option groups.
    ///
    /// "Download all" wins over any date range, and a rolling range wins
    /// over a static one.
    pub fn date_selection(&self) -> DateSelection {
        if self.download_all {
            return DateSelection::DownloadAll;
        }

        if self.use_rolling_date_range {
            if let Some(pattern) = present(self.rolling_pattern.as_deref()) {
                return DateSelection::Rolling {
                    pattern: pattern.to_string(),
                };
            }
        }

        if self.use_date_range {
            return DateSelection::Static {
                date_from: present(self.date_from.as_deref()).map(String::from),
                date_to: present(self.date_to.as_deref()).map(String::from),
            };
        }

        DateSelection::Unbounded
    }
}
