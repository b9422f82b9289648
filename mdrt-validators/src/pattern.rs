use crate::{Validator, ValidatorResult};
use mdrt_types::TypedValue;
use regex::Regex;

const DEFAULT_MESSAGE: &str = "The input format is invalid!";

/// Matches the text form of a value against a regular expression.
///
/// Applicable to fields of any datatype. The pattern must match the whole
/// text, so `\d+` accepts `"42"` but not `"42a"`.
#[derive(Debug, Clone)]
pub struct RegExValidator {
    regex: Regex,
    message: String,
}

impl RegExValidator {
    pub fn new(pattern: &str, message: Option<&str>) -> ValidatorResult<Self> {
        let regex = Regex::new(&format!("^(?:{pattern})$"))?;
        Ok(Self {
            regex,
            message: message.unwrap_or(DEFAULT_MESSAGE).to_string(),
        })
    }
}

impl Validator for RegExValidator {
    fn kind(&self) -> &'static str {
        "RegExValidator"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &TypedValue) -> bool {
        !value.is_set() || self.regex.is_match(&value.to_string())
    }
}
