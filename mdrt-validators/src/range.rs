//! Range validators.
//!
//! All bounds are inclusive and optional. A value of an unexpected datatype
//! is rejected rather than coerced.

use crate::{Validator, ValidatorResult};
use mdrt_types::{Datatype, TypedValue};

/// Accepts integer and float values within `[min, max]`.
#[derive(Debug, Clone)]
pub struct NumberRangeValidator {
    min: Option<f64>,
    max: Option<f64>,
    message: String,
}

impl NumberRangeValidator {
    pub fn new(min: Option<f64>, max: Option<f64>, message: Option<&str>) -> Self {
        let message = message
            .map(str::to_string)
            .unwrap_or_else(|| bounds_message("The number must be", min, max));
        Self { min, max, message }
    }
}

impl Validator for NumberRangeValidator {
    fn kind(&self) -> &'static str {
        "NumberRangeValidator"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &TypedValue) -> bool {
        if !value.is_set() {
            return true;
        }
        if !value.datatype().is_numeric() {
            return false;
        }
        value.as_f64().is_some_and(|n| {
            self.min.is_none_or(|min| n >= min) && self.max.is_none_or(|max| n <= max)
        })
    }
}

/// Accepts values whose text form has between `min_len` and `max_len`
/// characters.
#[derive(Debug, Clone)]
pub struct StringRangeValidator {
    min_len: Option<usize>,
    max_len: Option<usize>,
    message: String,
}

impl StringRangeValidator {
    pub fn new(min_len: Option<usize>, max_len: Option<usize>, message: Option<&str>) -> Self {
        let message = message.map(str::to_string).unwrap_or_else(|| {
            bounds_message(
                "The text length must be",
                min_len.map(|n| n as f64),
                max_len.map(|n| n as f64),
            )
        });
        Self {
            min_len,
            max_len,
            message,
        }
    }
}

impl Validator for StringRangeValidator {
    fn kind(&self) -> &'static str {
        "StringRangeValidator"
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &TypedValue) -> bool {
        if !value.is_set() {
            return true;
        }
        let len = value.to_string().chars().count();
        self.min_len.is_none_or(|min| len >= min) && self.max_len.is_none_or(|max| len <= max)
    }
}

/// Accepts date, time or datetime values within `[min, max]`.
#[derive(Debug, Clone)]
pub struct TemporalRangeValidator {
    datatype: Datatype,
    min: Option<TypedValue>,
    max: Option<TypedValue>,
    message: String,
}

impl TemporalRangeValidator {
    /// Builds a validator for `datatype` with bounds given in text form.
    pub fn new(
        datatype: Datatype,
        min: Option<&str>,
        max: Option<&str>,
        message: Option<&str>,
    ) -> ValidatorResult<Self> {
        let parse = |raw: Option<&str>| -> ValidatorResult<Option<TypedValue>> {
            raw.map(|r| TypedValue::from_string(datatype, r))
                .transpose()
                .map_err(Into::into)
        };
        let min = parse(min)?;
        let max = parse(max)?;
        let message = message.map(str::to_string).unwrap_or_else(|| {
            match (&min, &max) {
                (Some(lo), Some(hi)) => format!("The {datatype} must be between {lo} and {hi}!"),
                (Some(lo), None) => format!("The {datatype} must not be before {lo}!"),
                (None, Some(hi)) => format!("The {datatype} must not be after {hi}!"),
                (None, None) => format!("The {datatype} is out of range!"),
            }
        });
        Ok(Self {
            datatype,
            min,
            max,
            message,
        })
    }

    pub fn date(min: Option<&str>, max: Option<&str>, message: Option<&str>) -> ValidatorResult<Self> {
        Self::new(Datatype::Date, min, max, message)
    }

    pub fn time(min: Option<&str>, max: Option<&str>, message: Option<&str>) -> ValidatorResult<Self> {
        Self::new(Datatype::Time, min, max, message)
    }

    pub fn datetime(
        min: Option<&str>,
        max: Option<&str>,
        message: Option<&str>,
    ) -> ValidatorResult<Self> {
        Self::new(Datatype::DateTime, min, max, message)
    }
}

impl Validator for TemporalRangeValidator {
    fn kind(&self) -> &'static str {
        match self.datatype {
            Datatype::Date => "DateRangeValidator",
            Datatype::Time => "TimeRangeValidator",
            Datatype::DateTime => "DateTimeRangeValidator",
            _ => "RangeValidator",
        }
    }

    fn message(&self) -> &str {
        &self.message
    }

    fn is_valid(&self, value: &TypedValue) -> bool {
        if !value.is_set() {
            return true;
        }
        let above_min = match &self.min {
            Some(min) => value.gte(min).unwrap_or(false),
            None => value.datatype() == self.datatype,
        };
        let below_max = match &self.max {
            Some(max) => value.lte(max).unwrap_or(false),
            None => value.datatype() == self.datatype,
        };
        above_min && below_max
    }
}

fn bounds_message(prefix: &str, min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(lo), Some(hi)) => format!("{prefix} between {lo} and {hi}!"),
        (Some(lo), None) => format!("{prefix} at least {lo}!"),
        (None, Some(hi)) => format!("{prefix} at most {hi}!"),
        (None, None) => format!("{prefix} in range!"),
    }
}
