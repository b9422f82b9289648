//! Datatype tags.

use crate::TypeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The datatype of a [`TypedValue`](crate::TypedValue).
///
/// The serialized form is the lowercase tag used in entity schemas and
/// application manifests (`"boolean"`, `"datetime"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Datatype {
    Boolean,
    Integer,
    Float,
    String,
    Date,
    Time,
    DateTime,
}

impl Datatype {
    /// Every built-in datatype, in declaration order.
    pub const ALL: [Datatype; 7] = [
        Datatype::Boolean,
        Datatype::Integer,
        Datatype::Float,
        Datatype::String,
        Datatype::Date,
        Datatype::Time,
        Datatype::DateTime,
    ];

    /// Returns the canonical tag for this datatype.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Datatype::Boolean => "boolean",
            Datatype::Integer => "integer",
            Datatype::Float => "float",
            Datatype::String => "string",
            Datatype::Date => "date",
            Datatype::Time => "time",
            Datatype::DateTime => "datetime",
        }
    }

    /// Looks up a datatype by its canonical tag (case-insensitive).
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|dt| dt.tag().eq_ignore_ascii_case(tag.trim()))
    }

    /// Returns true for datatypes whose values are points on a timeline.
    #[must_use]
    pub const fn is_temporal(self) -> bool {
        matches!(self, Datatype::Date | Datatype::Time | Datatype::DateTime)
    }

    /// Returns true for integer and float.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(self, Datatype::Integer | Datatype::Float)
    }
}

impl fmt::Display for Datatype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Datatype {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s).ok_or_else(|| TypeError::UnknownDatatype(s.to_string()))
    }
}
