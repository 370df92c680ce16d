use actix_web::{error::InternalError, HttpResponse};
use serde::Serialize;
use validator::{ValidationError, ValidationErrors};

use crate::form::rules::POSITION_PARAM;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub fields: serde_json::Value,
    /// Same violations as `fields`, in the order the rules ran
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error: &str, fields: serde_json::Value) -> Self {
        ErrorResponse {
            error: error.to_string(),
            fields,
            errors: Vec::new(),
        }
    }

    /// Response for a body that failed `Validate`
    pub fn from_validation(validation_errors: &ValidationErrors) -> Self {
        ErrorResponse {
            errors: ordered_errors_json(validation_errors),
            ..ErrorResponse::new("Validation failed", field_errors_json(validation_errors))
        }
    }
}

fn error_message(field: &str, error: &ValidationError) -> String {
    error
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| format!("Validation error in field: {}", field))
}

/// `{field: {"errors": [...]}}` for every field with a violation
pub fn field_errors_json(validation_errors: &ValidationErrors) -> serde_json::Value {
    let mut fields = serde_json::Map::new();

    for (field, errors) in validation_errors.field_errors() {
        let messages: Vec<String> = errors.iter().map(|e| error_message(&field, e)).collect();
        fields.insert(field.to_string(), serde_json::json!({"errors": messages}));
    }

    serde_json::Value::Object(fields)
}

/// `[{field, message}]` sorted by the `position` param.
/// Errors without one go last, by field name.
pub fn ordered_errors_json(validation_errors: &ValidationErrors) -> Vec<serde_json::Value> {
    let mut entries: Vec<(u64, String, String)> = Vec::new();

    for (field, errors) in validation_errors.field_errors() {
        for error in errors.iter() {
            let position = error
                .params
                .get(POSITION_PARAM)
                .and_then(serde_json::Value::as_u64)
                .unwrap_or(u64::MAX);
            entries.push((position, field.to_string(), error_message(&field, error)));
        }
    }
    entries.sort();

    entries
        .into_iter()
        .map(|(_, field, message)| serde_json::json!({"field": field, "message": message}))
        .collect()
}

/// Client-facing explanation of a JSON body that failed to deserialize
fn deserialize_message(err_string: &str) -> &'static str {
    if err_string.contains("EOF while parsing") {
        "Request body is empty. Expected JSON payload"
    } else if err_string.contains("invalid type") {
        "Invalid field type. Check the expected type for each field"
    } else {
        "Invalid JSON format"
    }
}

fn bad_request(response: ErrorResponse) -> actix_web::Error {
    InternalError::from_response("", HttpResponse::BadRequest().json(response)).into()
}

fn request_validation_failed(err_string: &str) -> actix_web::Error {
    bad_request(ErrorResponse::new(
        "Request validation failed",
        serde_json::json!({"message": deserialize_message(err_string)}),
    ))
}

/// JsonConfig for extractors that run `Validate` on the body
pub fn json_config(limit: usize) -> actix_web_validator::JsonConfig {
    actix_web_validator::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| match err {
            actix_web_validator::Error::Validate(validation_errors) => {
                bad_request(ErrorResponse::from_validation(&validation_errors))
            }
            actix_web_validator::Error::Deserialize(de_err) => {
                request_validation_failed(&de_err.to_string())
            }
            // Payload and encoding errors carry the serde message in their Display
            other => request_validation_failed(&other.to_string()),
        })
}

/// JsonConfig for plain `web::Json` bodies, sharing the same error shape
pub fn plain_json_config(limit: usize) -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default()
        .limit(limit)
        .error_handler(|err, _req| request_validation_failed(&err.to_string()))
}
