//! Platform values and typed values.
//!
//! A [`TypedValue`] pairs a [`Datatype`] with an optional [`PlatformValue`].
//! An absent platform value means the value is unset (the user has not
//! entered anything). Unset values are ordered before every set value of the
//! same datatype, which keeps comparison total within a datatype.

use crate::cast;
use crate::{Datatype, TypeError, TypeResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// The native representation of a value, as seen by UI fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PlatformValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Date(NaiveDate),
    Time(NaiveTime),
    DateTime(NaiveDateTime),
}

impl PlatformValue {
    /// The datatype this native value belongs to without any casting.
    #[must_use]
    pub const fn natural_datatype(&self) -> Datatype {
        match self {
            PlatformValue::Bool(_) => Datatype::Boolean,
            PlatformValue::Integer(_) => Datatype::Integer,
            PlatformValue::Float(_) => Datatype::Float,
            PlatformValue::String(_) => Datatype::String,
            PlatformValue::Date(_) => Datatype::Date,
            PlatformValue::Time(_) => Datatype::Time,
            PlatformValue::DateTime(_) => Datatype::DateTime,
        }
    }
}

impl fmt::Display for PlatformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformValue::Bool(b) => write!(f, "{b}"),
            PlatformValue::Integer(i) => write!(f, "{i}"),
            PlatformValue::Float(x) => write!(f, "{x}"),
            PlatformValue::String(s) => f.write_str(s),
            PlatformValue::Date(d) => write!(f, "{}", d.format(cast::DATE_FORMAT)),
            PlatformValue::Time(t) => write!(f, "{}", t.format(cast::TIME_FORMAT)),
            PlatformValue::DateTime(dt) => write!(f, "{}", dt.format(cast::DATETIME_FORMAT)),
        }
    }
}

impl From<bool> for PlatformValue {
    fn from(value: bool) -> Self {
        PlatformValue::Bool(value)
    }
}

impl From<i64> for PlatformValue {
    fn from(value: i64) -> Self {
        PlatformValue::Integer(value)
    }
}

impl From<i32> for PlatformValue {
    fn from(value: i32) -> Self {
        PlatformValue::Integer(i64::from(value))
    }
}

impl From<f64> for PlatformValue {
    fn from(value: f64) -> Self {
        PlatformValue::Float(value)
    }
}

impl From<&str> for PlatformValue {
    fn from(value: &str) -> Self {
        PlatformValue::String(value.to_string())
    }
}

impl From<String> for PlatformValue {
    fn from(value: String) -> Self {
        PlatformValue::String(value)
    }
}

impl From<NaiveDate> for PlatformValue {
    fn from(value: NaiveDate) -> Self {
        PlatformValue::Date(value)
    }
}

impl From<NaiveTime> for PlatformValue {
    fn from(value: NaiveTime) -> Self {
        PlatformValue::Time(value)
    }
}

impl From<NaiveDateTime> for PlatformValue {
    fn from(value: NaiveDateTime) -> Self {
        PlatformValue::DateTime(value)
    }
}

/// An immutable value tagged with its datatype.
///
/// Construct through [`TypedValue::new`], [`TypedValue::unset`] or one of the
/// casting constructors. All of them normalise the platform value so that
/// structural equality agrees with [`TypedValue::equals`]: floats are finite
/// with `-0.0` folded into `0.0`, and temporal values carry no sub-second part.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawTypedValue")]
pub struct TypedValue {
    datatype: Datatype,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    value: Option<PlatformValue>,
}

/// Wire form of [`TypedValue`], checked through [`TypedValue::new`] on the way in.
#[derive(Deserialize)]
struct RawTypedValue {
    datatype: Datatype,
    #[serde(default)]
    value: Option<PlatformValue>,
}

impl TryFrom<RawTypedValue> for TypedValue {
    type Error = TypeError;

    fn try_from(raw: RawTypedValue) -> TypeResult<Self> {
        match raw.value {
            Some(value) => Self::new(raw.datatype, value),
            None => Ok(Self::unset(raw.datatype)),
        }
    }
}

impl TypedValue {
    /// Creates an unset value of the given datatype.
    #[must_use]
    pub const fn unset(datatype: Datatype) -> Self {
        Self {
            datatype,
            value: None,
        }
    }

    /// Wraps a platform value whose kind already matches `datatype`.
    ///
    /// Use [`TypedValue::cast`] when the native value may be of another kind.
    pub fn new(datatype: Datatype, value: PlatformValue) -> TypeResult<Self> {
        let found = value.natural_datatype();
        if found != datatype {
            return Err(TypeError::PlatformKind { datatype, found });
        }
        Ok(Self {
            datatype,
            value: Some(cast::normalize(datatype, value)?),
        })
    }

    /// Parses text into a value of `datatype`.
    ///
    /// Blank text yields an unset value for every datatype except string.
    pub fn from_string(datatype: Datatype, raw: &str) -> TypeResult<Self> {
        Ok(Self {
            datatype,
            value: cast::from_string(datatype, raw)?,
        })
    }

    /// Converts a number into a value of `datatype`.
    ///
    /// Temporal datatypes read the number as milliseconds since the Unix epoch (UTC).
    pub fn from_number(datatype: Datatype, raw: f64) -> TypeResult<Self> {
        Ok(Self {
            datatype,
            value: Some(cast::from_number(datatype, raw)?),
        })
    }

    /// Converts a boolean into a value of `datatype`.
    pub fn from_bool(datatype: Datatype, raw: bool) -> TypeResult<Self> {
        Ok(Self {
            datatype,
            value: Some(cast::from_bool(datatype, raw)?),
        })
    }

    /// Casts any native value into `datatype`.
    pub fn cast(datatype: Datatype, raw: &PlatformValue) -> TypeResult<Self> {
        Ok(Self {
            datatype,
            value: cast::cast(datatype, raw)?,
        })
    }

    /// Re-types this value, keeping it unset if it is unset.
    pub fn convert(&self, datatype: Datatype) -> TypeResult<Self> {
        if datatype == self.datatype {
            return Ok(self.clone());
        }
        match &self.value {
            Some(v) => Self::cast(datatype, v),
            None => Ok(Self::unset(datatype)),
        }
    }

    /// Returns the datatype tag.
    #[must_use]
    pub const fn datatype(&self) -> Datatype {
        self.datatype
    }

    /// Returns the native value, or `None` if unset.
    #[must_use]
    pub fn platform_value(&self) -> Option<&PlatformValue> {
        self.value.as_ref()
    }

    /// Consumes the value, returning the native value.
    #[must_use]
    pub fn into_platform_value(self) -> Option<PlatformValue> {
        self.value
    }

    /// Returns false for unset values and for the empty string.
    #[must_use]
    pub fn is_set(&self) -> bool {
        match &self.value {
            None => false,
            Some(PlatformValue::String(s)) => !s.is_empty(),
            Some(_) => true,
        }
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self.value {
            Some(PlatformValue::Bool(b)) => Some(b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self.value {
            Some(PlatformValue::Integer(i)) => Some(i),
            _ => None,
        }
    }

    /// Returns the numeric value of an integer or float.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self.value {
            Some(PlatformValue::Float(x)) => Some(x),
            Some(PlatformValue::Integer(i)) => Some(i as f64),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match &self.value {
            Some(PlatformValue::String(s)) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_date(&self) -> Option<NaiveDate> {
        match self.value {
            Some(PlatformValue::Date(d)) => Some(d),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_time(&self) -> Option<NaiveTime> {
        match self.value {
            Some(PlatformValue::Time(t)) => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self.value {
            Some(PlatformValue::DateTime(dt)) => Some(dt),
            _ => None,
        }
    }

    /// Compares two values of the same datatype.
    ///
    /// Fails with [`TypeError::TypeMismatch`] if the datatypes differ; values
    /// are never coerced for comparison.
    pub fn compare(&self, other: &Self) -> TypeResult<Ordering> {
        if self.datatype != other.datatype {
            return Err(TypeError::TypeMismatch {
                expected: self.datatype,
                found: other.datatype,
            });
        }
        Ok(match (&self.value, &other.value) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a), Some(b)) => cmp_platform(a, b),
        })
    }

    pub fn equals(&self, other: &Self) -> TypeResult<bool> {
        Ok(self.compare(other)? == Ordering::Equal)
    }

    pub fn gt(&self, other: &Self) -> TypeResult<bool> {
        Ok(self.compare(other)? == Ordering::Greater)
    }

    pub fn gte(&self, other: &Self) -> TypeResult<bool> {
        Ok(self.compare(other)? != Ordering::Less)
    }

    pub fn lt(&self, other: &Self) -> TypeResult<bool> {
        Ok(self.compare(other)? == Ordering::Less)
    }

    pub fn lte(&self, other: &Self) -> TypeResult<bool> {
        Ok(self.compare(other)? != Ordering::Greater)
    }
}

/// Canonical text form. Unset values render as the empty string.
impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(v) => v.fmt(f),
            None => Ok(()),
        }
    }
}

fn cmp_platform(a: &PlatformValue, b: &PlatformValue) -> Ordering {
    match (a, b) {
        (PlatformValue::Bool(x), PlatformValue::Bool(y)) => x.cmp(y),
        (PlatformValue::Integer(x), PlatformValue::Integer(y)) => x.cmp(y),
        (PlatformValue::Float(x), PlatformValue::Float(y)) => x.total_cmp(y),
        (PlatformValue::String(x), PlatformValue::String(y)) => x.cmp(y),
        (PlatformValue::Date(x), PlatformValue::Date(y)) => x.cmp(y),
        (PlatformValue::Time(x), PlatformValue::Time(y)) => x.cmp(y),
        (PlatformValue::DateTime(x), PlatformValue::DateTime(y)) => x.cmp(y),
        // Unreachable through the public constructors, which keep the kind in
        // line with the datatype.
        _ => a.natural_datatype().cmp(&b.natural_datatype()),
    }
}
