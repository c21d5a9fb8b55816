//! HTTP middleware components
//!
//! Cross-cutting concerns: request logging and input validation.

pub mod request_logger;
pub mod validation;

pub use request_logger::RequestLoggerLayer;
pub use validation::{FieldViolation, ValidatedJson, ValidatedPath, ValidatedQuery};
