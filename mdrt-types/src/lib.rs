//! Typed values for the mdrt runtime.
//!
//! This crate defines the value layer every other mdrt crate builds on:
//! - [`Datatype`]: the closed set of built-in datatypes (boolean, integer,
//!   float, string, date, time, datetime)
//! - [`PlatformValue`]: the native value handed to and received from UI fields
//! - [`TypedValue`]: an immutable platform value tagged with its datatype,
//!   with comparison and casting semantics
//!
//! Values never change in place. Updating an attribute means constructing a
//! new `TypedValue` and replacing the old one.

mod cast;
mod datatype;
mod value;

pub use datatype::Datatype;
pub use value::{PlatformValue, TypedValue};

/// Result type alias using the crate's error type.
pub type TypeResult<T> = std::result::Result<T, TypeError>;

/// Errors that can occur when creating, casting or comparing typed values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TypeError {
    #[error("unknown datatype: {0}")]
    UnknownDatatype(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: Datatype, found: Datatype },

    #[error("cannot cast {input:?} to {datatype}")]
    InvalidCast { datatype: Datatype, input: String },

    #[error("platform value of kind {found} does not fit datatype {datatype}")]
    PlatformKind { datatype: Datatype, found: Datatype },
}
