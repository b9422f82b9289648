//! Validators for typed field values.
//!
//! Every validator treats an unset value as valid: the absence of input is
//! not a format error. Only [`NotNullValidator`] rejects unset values.
//!
//! Validators are pure. They never modify the value and carry a message the
//! caller surfaces when validation fails.

mod error;
mod not_null;
mod pattern;
mod range;

pub use error::{ValidatorError, ValidatorResult};
pub use not_null::NotNullValidator;
pub use pattern::RegExValidator;
pub use range::{NumberRangeValidator, StringRangeValidator, TemporalRangeValidator};

use mdrt_types::TypedValue;

/// A predicate over a typed value.
pub trait Validator: Send + Sync {
    /// Short name of the validator kind (e.g. `"RegExValidator"`).
    fn kind(&self) -> &'static str;

    /// Message to show when the value is rejected.
    fn message(&self) -> &str;

    /// Returns true if `value` passes this validator.
    fn is_valid(&self, value: &TypedValue) -> bool;
}

/// Runs every validator, collecting the messages of those that fail, in order.
pub fn validate_all(validators: &[Box<dyn Validator>], value: &TypedValue) -> Result<(), Vec<String>> {
    let failures: Vec<String> = validators
        .iter()
        .filter(|v| !v.is_valid(value))
        .map(|v| v.message().to_string())
        .collect();
    if failures.is_empty() {
        Ok(())
    } else {
        Err(failures)
    }
}
