use actix_web::{HttpResponse, ResponseError};
use chrono::Utc;
use std::fmt;
use tracing::{info, warn};

use crate::api::validation::ErrorResponse;
use crate::form::{FormValidator, JobFormInput, RollingPattern, RollingRangeError};
use super::dto::{BulkFormResult, BulkValidationResponse, RollingRangeRequest, RollingRangeResponse};

/// Service-level errors
#[derive(Debug)]
pub enum ServiceError {
    /// Request is well-formed but cannot be processed
    ValidationError(String),

    /// Rolling window could not be resolved
    RollingRange(RollingRangeError),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ServiceError::RollingRange(e) => write!(f, "Rolling range error: {}", e),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<RollingRangeError> for ServiceError {
    fn from(err: RollingRangeError) -> Self {
        ServiceError::RollingRange(err)
    }
}

impl ResponseError for ServiceError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServiceError::ValidationError(msg) => {
                warn!("Validation error: {}", msg);
                HttpResponse::BadRequest().json(ErrorResponse::new(
                    "Validation failed",
                    serde_json::json!({"message": msg}),
                ))
            }
            ServiceError::RollingRange(e) => {
                warn!("Rolling range error: {}", e);
                HttpResponse::BadRequest().json(ErrorResponse::new(
                    "Invalid rolling date range",
                    serde_json::json!({"message": e.to_string()}),
                ))
            }
        }
    }
}

/// Job form service wrapping the validation rules
pub struct JobFormService {
    max_bulk_forms: usize,
}

impl JobFormService {
    pub fn new(max_bulk_forms: usize) -> Self {
        Self { max_bulk_forms }
    }

    /// Validate a batch of forms
    ///
    /// # Business Logic
    /// - Rejects batches larger than the configured limit
    /// - Validates each form independently
    /// - Keeps every form's ordered violations
    ///
    /// # Returns
    /// - `Ok(BulkValidationResponse)` - All forms processed (some may be invalid)
    /// - `Err(ServiceError)` - Batch rejected
    pub fn validate_bulk(
        &self,
        forms: Vec<JobFormInput>,
    ) -> Result<BulkValidationResponse, ServiceError> {
        info!("Service: Validating {} job forms", forms.len());

        if forms.is_empty() {
            return Err(ServiceError::ValidationError(
                "At least one job form is required".to_string(),
            ));
        }
        if forms.len() > self.max_bulk_forms {
            return Err(ServiceError::ValidationError(format!(
                "At most {} job forms can be validated per request",
                self.max_bulk_forms
            )));
        }

        let results: Vec<BulkFormResult> = forms
            .iter()
            .enumerate()
            .map(|(index, form)| BulkFormResult {
                index,
                name: form.name.trim().to_string(),
                result: FormValidator::validate(form),
            })
            .collect();

        let valid = results.iter().filter(|r| r.result.is_valid()).count();
        let invalid = results.len() - valid;

        if invalid == 0 {
            info!("Service: All {} job forms are valid", valid);
        } else {
            warn!(
                "Service: {} of {} job forms failed validation",
                invalid,
                results.len()
            );
        }

        Ok(BulkValidationResponse {
            message: format!(
                "Bulk validation completed. {} valid, {} invalid",
                valid, invalid
            ),
            valid,
            invalid,
            results,
        })
    }

    /// Resolve the window a rolling pattern covers
    pub fn rolling_range(
        &self,
        request: &RollingRangeRequest,
    ) -> Result<RollingRangeResponse, ServiceError> {
        let pattern = request
            .rolling_pattern
            .parse::<RollingPattern>()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let reference = request.reference.unwrap_or_else(|| Utc::now().naive_utc());
        let offsets = request.date_offset_from.zip(request.date_offset_to);
        let (date_from, date_to) = pattern.resolve(reference, offsets)?;

        info!(
            "Service: Resolved {} at {} to {} .. {}",
            pattern, reference, date_from, date_to
        );

        Ok(RollingRangeResponse {
            rolling_pattern: pattern.to_string(),
            date_from,
            date_to,
        })
    }
}
