use chrono::NaiveDate;
use serde::Serialize;
use std::borrow::Cow;
use tracing::debug;
use validator::{Validate, ValidationError, ValidationErrors};

use super::cron::validate_cron_expression;
use super::models::{present, JobFormInput, JobType, RollingPattern, ScheduleType};

/// Fields that must be filled in on every job form
const REQUIRED_FIELDS: [&str; 4] = ["name", "site_id", "job_type", "schedule_type"];

/// `ValidationError` param holding an error's index in rule order
pub const POSITION_PARAM: &str = "position";

/// A single violation attached to a form field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Verdict for one form snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "errors", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    /// Violations in the order the rules run
    Invalid(Vec<FieldError>),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn errors(&self) -> &[FieldError] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(errors) => errors,
        }
    }

    /// Convert into the `validator` crate's error map.
    ///
    /// The map is keyed by field, so each error carries its rule-order index
    /// in the `position` param.
    pub fn into_validation_errors(self) -> Result<(), ValidationErrors> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(field_errors) => {
                let mut errors = ValidationErrors::new();
                for (position, FieldError { field, message }) in
                    field_errors.into_iter().enumerate()
                {
                    let mut error = ValidationError::new("job_form");
                    error.message = Some(Cow::Owned(message));
                    error.params.insert(
                        Cow::Borrowed(POSITION_PARAM),
                        serde_json::Value::from(position),
                    );
                    errors.add(field, error);
                }
                Err(errors)
            }
        }
    }
}

/// Collects violations while the rules run
#[derive(Default)]
struct Violations(Vec<FieldError>);

impl Violations {
    fn add(&mut self, field: &'static str, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    fn require(
        &mut self,
        field: &'static str,
        value: Option<&str>,
        message: &str,
    ) -> Option<String> {
        match present(value) {
            Some(v) => Some(v.to_string()),
            None => {
                self.add(field, message);
                None
            }
        }
    }
}

/// Human label for a form field: `site_id` becomes `Site id`
pub fn display_name(field: &str) -> String {
    let spaced = field.replace(['_', '-'], " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn parse_calendar_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Rules engine for the scheduled-job form
pub struct FormValidator;

impl FormValidator {
    /// Validate a form snapshot.
    ///
    /// Every rule runs; nothing short-circuits. Violations come back in rule
    /// order: required fields, schedule, upload target, static date range,
    /// rolling date range, then the date-range conflict check.
    pub fn validate(input: &JobFormInput) -> ValidationResult {
        let mut violations = Violations::default();

        let required = [
            input.name.as_str(),
            input.site_id.as_str(),
            input.job_type.as_str(),
            input.schedule_type.as_str(),
        ];
        for (field, value) in REQUIRED_FIELDS.into_iter().zip(required) {
            if value.trim().is_empty() {
                violations.add(field, format!("{} is required", display_name(field)));
            }
        }

        match input.schedule_type() {
            Some(ScheduleType::OneTime) => {
                violations.require(
                    "schedule_datetime",
                    input.schedule_datetime.as_deref(),
                    "Schedule date and time is required",
                );
            }
            Some(ScheduleType::Recurring) => {
                let expression = violations.require(
                    "cron_expression",
                    input.cron_expression.as_deref(),
                    "Cron expression is required",
                );
                if let Some(expression) = expression {
                    if let Err(err) = validate_cron_expression(&expression) {
                        debug!("Rejected cron expression '{}': {}", expression, err);
                        violations.add("cron_expression", "Invalid cron expression format");
                    }
                }
            }
            None => {}
        }

        if input.job_type() == Some(JobType::Upload) {
            violations.require(
                "target_site_id",
                input.target_site_id.as_deref(),
                "Target site is required for upload jobs",
            );
        }

        if input.use_date_range {
            let from = violations.require(
                "date_from",
                input.date_from.as_deref(),
                "From date is required",
            );
            let to = violations.require(
                "date_to",
                input.date_to.as_deref(),
                "To date is required",
            );

            let parsed = from
                .as_deref()
                .and_then(parse_calendar_date)
                .zip(to.as_deref().and_then(parse_calendar_date));
            if let Some((from, to)) = parsed {
                if from > to {
                    violations.add("date_to", "To date must be after from date");
                }
            }
        }

        if input.use_rolling_date_range {
            let pattern = violations.require(
                "rolling_pattern",
                input.rolling_pattern.as_deref(),
                "Rolling pattern is required",
            );
            let pattern = pattern.and_then(|p| p.parse::<RollingPattern>().ok());
            if pattern == Some(RollingPattern::Custom) {
                violations.require(
                    "date_offset_from",
                    input.date_offset_from.as_deref(),
                    "Previous month day is required",
                );
                violations.require(
                    "date_offset_to",
                    input.date_offset_to.as_deref(),
                    "Current month day is required",
                );
            }
        }

        if input.use_date_range && input.use_rolling_date_range {
            violations.add(
                "use_rolling_date_range",
                "Date range and rolling date range cannot be used together",
            );
        }

        if violations.0.is_empty() {
            debug!("Job form '{}' passed validation", input.name.trim());
            ValidationResult::Valid
        } else {
            debug!(
                "Job form '{}' failed validation with {} errors",
                input.name.trim(),
                violations.0.len()
            );
            ValidationResult::Invalid(violations.0)
        }
    }
}

impl Validate for JobFormInput {
    fn validate(&self) -> Result<(), ValidationErrors> {
        FormValidator::validate(self).into_validation_errors()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_one_time() -> JobFormInput {
        JobFormInput {
            name: "Nightly CDR pull".to_string(),
            site_id: "3".to_string(),
            job_type: "download".to_string(),
            schedule_type: "one_time".to_string(),
            schedule_datetime: Some("2024-03-01T02:00".to_string()),
            ..Default::default()
        }
    }

    fn recurring(cron: &str) -> JobFormInput {
        JobFormInput {
            schedule_type: "recurring".to_string(),
            schedule_datetime: None,
            cron_expression: Some(cron.to_string()),
            ..valid_one_time()
        }
    }

    fn fields(result: &ValidationResult) -> Vec<&'static str> {
        result.errors().iter().map(|e| e.field).collect()
    }

    fn error(field: &'static str, message: &str) -> FieldError {
        FieldError {
            field,
            message: message.to_string(),
        }
    }

    #[test]
    fn test_valid_form() {
        assert_eq!(
            FormValidator::validate(&valid_one_time()),
            ValidationResult::Valid
        );
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("name"), "Name");
        assert_eq!(display_name("site_id"), "Site id");
        assert_eq!(display_name("schedule_type"), "Schedule type");
        assert_eq!(display_name(""), "");
    }

    #[test]
    fn test_all_required_fields_missing() {
        let input = JobFormInput {
            name: "  ".to_string(),
            ..Default::default()
        };
        let result = FormValidator::validate(&input);
        assert_eq!(
            result,
            ValidationResult::Invalid(vec![
                error("name", "Name is required"),
                error("site_id", "Site id is required"),
                error("job_type", "Job type is required"),
                error("schedule_type", "Schedule type is required"),
            ])
        );
    }

    #[test]
    fn test_required_errors_not_suppressed_by_other_rules() {
        let input = JobFormInput {
            site_id: String::new(),
            job_type: "upload".to_string(),
            use_date_range: true,
            ..recurring("bad")
        };
        let result = FormValidator::validate(&input);
        assert_eq!(
            fields(&result),
            vec!["site_id", "cron_expression", "target_site_id", "date_from", "date_to"]
        );
    }

    #[test]
    fn test_one_time_requires_datetime() {
        let input = JobFormInput {
            schedule_datetime: Some("   ".to_string()),
            ..valid_one_time()
        };
        assert_eq!(
            FormValidator::validate(&input),
            ValidationResult::Invalid(vec![error(
                "schedule_datetime",
                "Schedule date and time is required"
            )])
        );
    }

    #[test]
    fn test_recurring_cron_checks() {
        assert!(FormValidator::validate(&recurring("* * * * *")).is_valid());
        assert!(FormValidator::validate(&recurring("0 9 * * 1-5")).is_valid());

        let out_of_range = FormValidator::validate(&recurring("99 * * * *"));
        assert_eq!(
            out_of_range.errors(),
            &[error("cron_expression", "Invalid cron expression format")]
        );

        let short = FormValidator::validate(&recurring("0 9 * *"));
        assert_eq!(
            short.errors(),
            &[error("cron_expression", "Invalid cron expression format")]
        );
    }

    #[test]
    fn test_recurring_requires_cron() {
        let mut input = recurring("");
        assert_eq!(
            FormValidator::validate(&input).errors(),
            &[error("cron_expression", "Cron expression is required")]
        );
        input.cron_expression = None;
        assert_eq!(
            FormValidator::validate(&input).errors(),
            &[error("cron_expression", "Cron expression is required")]
        );
    }

    #[test]
    fn test_recurring_ignores_schedule_datetime() {
        let input = recurring("0 0 * * *");
        assert_eq!(input.schedule_datetime, None);
        assert!(FormValidator::validate(&input).is_valid());
    }

    #[test]
    fn test_upload_requires_target_site() {
        let upload = JobFormInput {
            job_type: "upload".to_string(),
            target_site_id: Some(String::new()),
            ..valid_one_time()
        };
        assert_eq!(
            FormValidator::validate(&upload).errors(),
            &[error("target_site_id", "Target site is required for upload jobs")]
        );

        let download = JobFormInput {
            target_site_id: Some(String::new()),
            ..valid_one_time()
        };
        assert!(FormValidator::validate(&download).is_valid());
    }

    #[test]
    fn test_date_range_ordering() {
        let mut input = JobFormInput {
            use_date_range: true,
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-02-01".to_string()),
            ..valid_one_time()
        };
        assert_eq!(
            FormValidator::validate(&input).errors(),
            &[error("date_to", "To date must be after from date")]
        );

        input.date_to = Some("2024-03-01".to_string());
        assert!(FormValidator::validate(&input).is_valid());
    }

    #[test]
    fn test_date_range_unparsable_skips_ordering() {
        let input = JobFormInput {
            use_date_range: true,
            date_from: Some("2024-13-45".to_string()),
            date_to: Some("2024-02-01".to_string()),
            ..valid_one_time()
        };
        assert!(FormValidator::validate(&input).is_valid());
    }

    #[test]
    fn test_date_range_unparsable_to_skips_ordering() {
        let input = JobFormInput {
            use_date_range: true,
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("not-a-date".to_string()),
            ..valid_one_time()
        };
        assert_eq!(FormValidator::validate(&input), ValidationResult::Valid);
    }

    #[test]
    fn test_date_range_ignored_when_disabled() {
        let input = JobFormInput {
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-02-01".to_string()),
            ..valid_one_time()
        };
        assert!(FormValidator::validate(&input).is_valid());
    }

    #[test]
    fn test_rolling_custom_requires_offsets() {
        let input = JobFormInput {
            use_rolling_date_range: true,
            rolling_pattern: Some("custom".to_string()),
            ..valid_one_time()
        };
        assert_eq!(
            FormValidator::validate(&input),
            ValidationResult::Invalid(vec![
                error("date_offset_from", "Previous month day is required"),
                error("date_offset_to", "Current month day is required"),
            ])
        );
    }

    #[test]
    fn test_rolling_requires_pattern() {
        let input = JobFormInput {
            use_rolling_date_range: true,
            date_offset_from: None,
            ..valid_one_time()
        };
        assert_eq!(
            FormValidator::validate(&input).errors(),
            &[error("rolling_pattern", "Rolling pattern is required")]
        );
    }

    #[test]
    fn test_rolling_named_pattern_needs_no_offsets() {
        let input = JobFormInput {
            use_rolling_date_range: true,
            rolling_pattern: Some("prev_month_26_to_curr_25".to_string()),
            ..valid_one_time()
        };
        assert!(FormValidator::validate(&input).is_valid());
    }

    #[test]
    fn test_rolling_unknown_pattern_counts_as_present() {
        let input = JobFormInput {
            use_rolling_date_range: true,
            rolling_pattern: Some("fortnight".to_string()),
            ..valid_one_time()
        };
        assert_eq!(input.rolling_pattern(), None);
        assert_eq!(FormValidator::validate(&input), ValidationResult::Valid);
    }

    #[test]
    fn test_both_date_flags_flagged_after_branches() {
        let input = JobFormInput {
            use_date_range: true,
            use_rolling_date_range: true,
            rolling_pattern: Some("custom".to_string()),
            ..valid_one_time()
        };
        assert_eq!(
            fields(&FormValidator::validate(&input)),
            vec![
                "date_from",
                "date_to",
                "date_offset_from",
                "date_offset_to",
                "use_rolling_date_range"
            ]
        );
    }

    #[test]
    fn test_validate_is_idempotent() {
        let input = JobFormInput {
            use_rolling_date_range: true,
            rolling_pattern: Some("custom".to_string()),
            ..recurring("61 * * * *")
        };
        assert_eq!(
            FormValidator::validate(&input),
            FormValidator::validate(&input)
        );
    }

    #[test]
    fn test_validate_trait_maps_field_errors() {
        let input = JobFormInput {
            use_date_range: true,
            date_from: Some("2024-03-01".to_string()),
            date_to: Some("2024-02-01".to_string()),
            ..recurring("")
        };
        let errors = Validate::validate(&input).unwrap_err();
        let field_errors = errors.field_errors();
        assert_eq!(field_errors.len(), 2);
        assert_eq!(
            field_errors["date_to"][0].message.as_deref(),
            Some("To date must be after from date")
        );
        assert_eq!(
            field_errors["cron_expression"][0].message.as_deref(),
            Some("Cron expression is required")
        );
        assert_eq!(field_errors["cron_expression"][0].params[POSITION_PARAM], 0);
        assert_eq!(field_errors["date_to"][0].params[POSITION_PARAM], 1);
        assert!(Validate::validate(&valid_one_time()).is_ok());
    }

    #[test]
    fn test_result_serialization() {
        let valid = serde_json::to_value(ValidationResult::Valid).unwrap();
        assert_eq!(valid, serde_json::json!({"status": "valid"}));

        let invalid = serde_json::to_value(ValidationResult::Invalid(vec![error(
            "name",
            "Name is required",
        )]))
        .unwrap();
        assert_eq!(
            invalid,
            serde_json::json!({
                "status": "invalid",
                "errors": [{"field": "name", "message": "Name is required"}]
            })
        );
    }
}
