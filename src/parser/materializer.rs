//! Argument materializer
//!
//! Turns the raw argument text of a shell call into a list of [`TypedValue`]s:
//!
//! 1. normalize the shell dialect into strict JSON text
//! 2. parse `[<text>]` with `serde_json`, so zero, one or many arguments are
//!    handled the same way
//! 3. resolve single-key tagged objects (`$oid`, `$date`, `$numberLong`,
//!    `$numberInt`) into native values, recursing into everything else
//!
//! [`try_materialize`] reports failures as errors. [`materialize`] never
//! fails: on any error it returns the trimmed input as a single `Text`
//! argument, which the dispatcher later rejects as unsupported.

use bson::oid::ObjectId;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

use crate::error::{ParseError, Result};
use crate::parser::normalizer::normalize_checked;
use crate::parser::value::TypedValue;

const TAG_OID: &str = "$oid";
const TAG_DATE: &str = "$date";
const TAG_NUMBER_LONG: &str = "$numberLong";
const TAG_NUMBER_INT: &str = "$numberInt";

/// Zoned ISO-8601 layouts not covered by RFC 3339: offsets without a colon
/// (`+0000`), hour-only offsets, and minute precision. `%#z` also takes `Z`.
const ZONED_DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M%#z"];

/// Naive date-time layouts accepted for `$date`, interpreted as UTC.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Materialize shell argument text, falling back to the raw text on failure
///
/// # Arguments
/// * `input` - Text between the parentheses of a shell call
///
/// # Returns
/// * `Vec<TypedValue>` - One value per top-level argument, or a single
///   `Text` holding the trimmed input if it could not be materialized
pub fn materialize(input: &str) -> Vec<TypedValue> {
    match try_materialize(input) {
        Ok(values) => values,
        Err(e) => {
            tracing::debug!(error = %e, input = %input, "falling back to raw argument text");
            vec![TypedValue::Text(input.trim().to_string())]
        }
    }
}

/// Materialize shell argument text
///
/// # Arguments
/// * `input` - Text between the parentheses of a shell call
///
/// # Returns
/// * `Result<Vec<TypedValue>>` - One value per top-level argument
pub fn try_materialize(input: &str) -> Result<Vec<TypedValue>> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }

    let normalized = normalize_checked(input);
    if !normalized.balanced {
        return Err(ParseError::InvalidJson(format!(
            "unbalanced brackets or quotes in '{}'",
            input.trim()
        ))
        .into());
    }

    let values: Vec<Value> = serde_json::from_str(&format!("[{}]", normalized.text))?;
    values.into_iter().map(resolve).collect()
}

/// Resolve a parsed JSON value into a typed value
fn resolve(value: Value) -> Result<TypedValue> {
    match value {
        Value::Null => Ok(TypedValue::Null),
        Value::Bool(b) => Ok(TypedValue::Bool(b)),
        Value::Number(n) => Ok(TypedValue::Number(n)),
        Value::String(s) => Ok(TypedValue::Text(s)),
        Value::Array(items) => items
            .into_iter()
            .map(resolve)
            .collect::<Result<Vec<_>>>()
            .map(TypedValue::Array),
        Value::Object(map) => {
            if map.len() == 1
                && let Some((key, inner)) = map.iter().next()
                && is_tag(key)
            {
                return resolve_tag(key, inner);
            }

            map.into_iter()
                .map(|(key, value)| Ok((key, resolve(value)?)))
                .collect::<Result<Vec<_>>>()
                .map(TypedValue::Object)
        }
    }
}

fn is_tag(key: &str) -> bool {
    matches!(
        key,
        TAG_OID | TAG_DATE | TAG_NUMBER_LONG | TAG_NUMBER_INT
    )
}

fn resolve_tag(tag: &str, value: &Value) -> Result<TypedValue> {
    match tag {
        TAG_OID => {
            let hex = value
                .as_str()
                .ok_or_else(|| invalid(tag, "expected a hex string"))?;
            let oid = ObjectId::parse_str(hex).map_err(|e| invalid(tag, e))?;
            Ok(TypedValue::Identifier(oid))
        }
        TAG_DATE => parse_instant(value).map(TypedValue::Instant),
        TAG_NUMBER_LONG => parse_integer::<i64>(tag, value).map(TypedValue::Int64),
        TAG_NUMBER_INT => {
            parse_integer::<i32>(tag, value).map(|n| TypedValue::Number(n.into()))
        }
        _ => Err(invalid(tag, "unknown tag")),
    }
}

/// Parse a `$date` payload
///
/// Accepts an ISO-8601 string, an integer number of milliseconds since the
/// epoch, or a canonical `{"$numberLong": "<millis>"}` object.
fn parse_instant(value: &Value) -> Result<DateTime<Utc>> {
    let millis = match value {
        Value::String(s) => parse_iso_date(s)?.timestamp_millis(),
        Value::Object(map) if map.len() == 1 => match map.get(TAG_NUMBER_LONG) {
            Some(inner) => parse_integer::<i64>(TAG_DATE, inner)?,
            None => return Err(invalid(TAG_DATE, "expected a date string")),
        },
        _ => parse_integer::<i64>(TAG_DATE, value)?,
    };

    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| invalid(TAG_DATE, format!("{millis} is out of range")))
}

fn parse_iso_date(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ZONED_DATETIME_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, format) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| invalid(TAG_DATE, format!("'{s}' is not an ISO-8601 date")))
}

/// Parse an integer given either as a decimal string or as a JSON number
fn parse_integer<T>(tag: &str, value: &Value) -> Result<T>
where
    T: std::str::FromStr + TryFrom<i64>,
{
    let parsed = match value {
        Value::String(s) => s.parse::<T>().ok(),
        Value::Number(n) => n.as_i64().and_then(|i| T::try_from(i).ok()),
        _ => None,
    };

    parsed.ok_or_else(|| invalid(tag, format!("{value} is not a valid integer")))
}

fn invalid(tag: &str, reason: impl ToString) -> crate::error::MongoqError {
    ParseError::InvalidLiteral {
        tag: tag.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
