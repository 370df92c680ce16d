pub mod cron;
pub mod models;
pub mod rolling;
pub mod rules;

// Re-export commonly used types
pub use cron::{validate_cron_expression, CronError, CronPreset, COMMON_CRON_EXPRESSIONS};
pub use models::{DateSelection, JobFormInput, JobType, RollingPattern, ScheduleType};
pub use rolling::RollingRangeError;
pub use rules::{FieldError, FormValidator, ValidationResult};
