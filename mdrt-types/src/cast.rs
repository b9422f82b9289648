//! Casting rules between native values and datatypes.
//!
//! Every function here returns an already-normalised platform value: floats
//! are finite with no negative zero, and temporal values are truncated to
//! whole seconds. That keeps `from_string(v.to_string()) == v` for all
//! datatypes.

use crate::{Datatype, PlatformValue, TypeError, TypeResult};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
pub(crate) const TIME_FORMAT: &str = "%H:%M:%S";
pub(crate) const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const TIME_INPUTS: [&str; 2] = ["%H:%M:%S%.f", "%H:%M"];
const DATETIME_INPUTS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

// i64::MIN is exactly -2^63; i64::MAX rounds up to 2^63 as f64.
const I64_LOWER: f64 = -9.223_372_036_854_775_808e18;
const I64_UPPER: f64 = 9.223_372_036_854_775_808e18;

fn fits_i64(x: f64) -> bool {
    (I64_LOWER..I64_UPPER).contains(&x)
}

fn invalid(datatype: Datatype, input: impl ToString) -> TypeError {
    TypeError::InvalidCast {
        datatype,
        input: input.to_string(),
    }
}

pub(crate) fn normalize(datatype: Datatype, value: PlatformValue) -> TypeResult<PlatformValue> {
    Ok(match value {
        PlatformValue::Float(x) => PlatformValue::Float(finite(datatype, x)?),
        PlatformValue::Time(t) => PlatformValue::Time(trunc_time(t)),
        PlatformValue::DateTime(dt) => PlatformValue::DateTime(trunc_datetime(dt)),
        other => other,
    })
}

fn finite(datatype: Datatype, x: f64) -> TypeResult<f64> {
    if !x.is_finite() {
        return Err(invalid(datatype, x));
    }
    // fold -0.0 into 0.0
    Ok(if x == 0.0 { 0.0 } else { x })
}

fn trunc_time(t: NaiveTime) -> NaiveTime {
    t.with_nanosecond(0).unwrap_or(t)
}

fn trunc_datetime(dt: NaiveDateTime) -> NaiveDateTime {
    dt.with_nanosecond(0).unwrap_or(dt)
}

fn epoch_millis(dt: NaiveDateTime) -> i64 {
    dt.and_utc().timestamp_millis()
}

fn from_epoch_millis(datatype: Datatype, ms: f64) -> TypeResult<NaiveDateTime> {
    if !fits_i64(ms) {
        return Err(invalid(datatype, ms));
    }
    DateTime::from_timestamp_millis(ms.trunc() as i64)
        .map(|dt| trunc_datetime(dt.naive_utc()))
        .ok_or_else(|| invalid(datatype, ms))
}

fn parse_datetime(raw: &str) -> Option<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_utc());
    }
    DATETIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .ok()
        .or_else(|| parse_datetime(raw).map(|dt| dt.date()))
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    let bare = raw.strip_prefix('T').unwrap_or(raw);
    let bare = bare.strip_suffix('Z').unwrap_or(bare);
    TIME_INPUTS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(bare, fmt).ok())
        .or_else(|| parse_datetime(raw).map(|dt| dt.time()))
}

pub(crate) fn from_string(datatype: Datatype, raw: &str) -> TypeResult<Option<PlatformValue>> {
    if datatype == Datatype::String {
        return Ok(Some(PlatformValue::String(raw.to_string())));
    }
    let text = raw.trim();
    if text.is_empty() {
        return Ok(None);
    }
    let value = match datatype {
        Datatype::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" | "1" => PlatformValue::Bool(true),
            "false" | "0" => PlatformValue::Bool(false),
            _ => return Err(invalid(datatype, raw)),
        },
        Datatype::Integer => PlatformValue::Integer(
            text.parse::<i64>().map_err(|_| invalid(datatype, raw))?,
        ),
        Datatype::Float => {
            let x = text.parse::<f64>().map_err(|_| invalid(datatype, raw))?;
            PlatformValue::Float(finite(datatype, x)?)
        }
        Datatype::Date => PlatformValue::Date(parse_date(text).ok_or_else(|| invalid(datatype, raw))?),
        Datatype::Time => PlatformValue::Time(trunc_time(
            parse_time(text).ok_or_else(|| invalid(datatype, raw))?,
        )),
        Datatype::DateTime => {
            let dt = parse_datetime(text)
                .or_else(|| {
                    NaiveDate::parse_from_str(text, DATE_FORMAT)
                        .ok()
                        .map(|d| d.and_time(NaiveTime::MIN))
                })
                .ok_or_else(|| invalid(datatype, raw))?;
            PlatformValue::DateTime(trunc_datetime(dt))
        }
        Datatype::String => PlatformValue::String(raw.to_string()),
    };
    Ok(Some(value))
}

pub(crate) fn from_number(datatype: Datatype, raw: f64) -> TypeResult<PlatformValue> {
    let x = finite(datatype, raw)?;
    Ok(match datatype {
        Datatype::Boolean => PlatformValue::Bool(x != 0.0),
        Datatype::Integer => {
            if !fits_i64(x) {
                return Err(invalid(datatype, raw));
            }
            PlatformValue::Integer(x.trunc() as i64)
        }
        Datatype::Float => PlatformValue::Float(x),
        Datatype::String => PlatformValue::String(x.to_string()),
        Datatype::Date => PlatformValue::Date(from_epoch_millis(datatype, x)?.date()),
        Datatype::Time => PlatformValue::Time(from_epoch_millis(datatype, x)?.time()),
        Datatype::DateTime => PlatformValue::DateTime(from_epoch_millis(datatype, x)?),
    })
}

pub(crate) fn from_bool(datatype: Datatype, raw: bool) -> TypeResult<PlatformValue> {
    Ok(match datatype {
        Datatype::Boolean => PlatformValue::Bool(raw),
        Datatype::Integer => PlatformValue::Integer(i64::from(raw)),
        Datatype::Float => PlatformValue::Float(if raw { 1.0 } else { 0.0 }),
        Datatype::String => PlatformValue::String(raw.to_string()),
        Datatype::Date | Datatype::Time | Datatype::DateTime => {
            return Err(invalid(datatype, raw));
        }
    })
}

pub(crate) fn cast(datatype: Datatype, raw: &PlatformValue) -> TypeResult<Option<PlatformValue>> {
    if raw.natural_datatype() == datatype {
        return normalize(datatype, raw.clone()).map(Some);
    }
    match raw {
        PlatformValue::String(s) => from_string(datatype, s),
        PlatformValue::Bool(b) => from_bool(datatype, *b).map(Some),
        PlatformValue::Integer(i) => match datatype {
            Datatype::String => Ok(Some(PlatformValue::String(i.to_string()))),
            _ => from_number(datatype, *i as f64).map(Some),
        },
        PlatformValue::Float(x) => from_number(datatype, *x).map(Some),
        PlatformValue::Date(d) => {
            let midnight = d.and_time(NaiveTime::MIN);
            temporal(datatype, raw, midnight, true)
        }
        PlatformValue::Time(t) => {
            let epoch_day = NaiveDate::default().and_time(*t);
            temporal(datatype, raw, epoch_day, false)
        }
        PlatformValue::DateTime(dt) => temporal(datatype, raw, *dt, true),
    }
}

/// Casts a temporal native value. `dated` is false for a bare time of day,
/// which cannot become a date.
fn temporal(
    datatype: Datatype,
    raw: &PlatformValue,
    at: NaiveDateTime,
    dated: bool,
) -> TypeResult<Option<PlatformValue>> {
    let value = match datatype {
        Datatype::String => PlatformValue::String(raw.to_string()),
        Datatype::Integer => PlatformValue::Integer(epoch_millis(at)),
        Datatype::Float => PlatformValue::Float(epoch_millis(at) as f64),
        Datatype::Date if dated => PlatformValue::Date(at.date()),
        Datatype::DateTime if dated => PlatformValue::DateTime(trunc_datetime(at)),
        Datatype::Time => PlatformValue::Time(trunc_time(at.time())),
        _ => return Err(invalid(datatype, raw)),
    };
    Ok(Some(value))
}
