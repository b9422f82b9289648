use crate::Validator;
use mdrt_types::TypedValue;

const DEFAULT_MESSAGE: &str = "This field is mandatory!";

/// Rejects unset values and empty strings.
#[derive(Debug, Clone)]
pub struct NotNullValidator {
    message: String,
}

impl NotNullValidator {
    pub fn new(message: Option<&str>) -> Self {
        Self {
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
        }
    }
}

impl Default for NotNullValidator {
    fn default() -> Self {
        Self::new(None)
    }
}

impl Validator for NotNullValidator {
    fn kind(&self) -> &'static str {
        "NotNullValidator"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &TypedValue) -> bool {
        value.is_set()
    }
}
