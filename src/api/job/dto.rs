use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::form::{CronPreset, ValidationResult};

/// Response for a form that passed validation
#[derive(Serialize)]
pub struct FormValidResponse {
    pub message: String,
}

/// Verdict for one form of a bulk request
#[derive(Serialize)]
pub struct BulkFormResult {
    pub index: usize,
    pub name: String,
    pub result: ValidationResult,
}

/// Response for bulk form validation
#[derive(Serialize)]
pub struct BulkValidationResponse {
    pub message: String,
    pub valid: usize,
    pub invalid: usize,
    pub results: Vec<BulkFormResult>,
}

#[derive(Serialize)]
pub struct CronPresetsResponse {
    pub presets: Vec<CronPreset>,
}

/// Preview request for a rolling date window
#[derive(Debug, Deserialize)]
pub struct RollingRangeRequest {
    pub rolling_pattern: String,
    /// Run time to resolve against; defaults to now (UTC)
    #[serde(default)]
    pub reference: Option<NaiveDateTime>,
    #[serde(default)]
    pub date_offset_from: Option<u32>,
    #[serde(default)]
    pub date_offset_to: Option<u32>,
}

#[derive(Debug, Serialize)]
pub struct RollingRangeResponse {
    pub rolling_pattern: String,
    pub date_from: NaiveDateTime,
    pub date_to: NaiveDateTime,
}
