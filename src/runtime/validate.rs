use crate::constraint::ConstraintSet;
use http::StatusCode;
use std::collections::HashMap;
use std::str::FromStr;
use thiserror::Error;
use tracing::debug;

/// Raw external parameter values for one request, keyed by lookup key.
pub type ParamValues = HashMap<String, String>;

/// A parameter that failed validation.
///
/// Carries the transport status and the message placed in the envelope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ParamRejection {
    pub status: StatusCode,
    pub message: String,
}

impl ParamRejection {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

fn reject<T>(key: &str, message: String) -> Result<T, ParamRejection> {
    debug!(key, %message, "parameter rejected");
    Err(ParamRejection::bad_request(message))
}

fn byte_len(value: &str) -> i64 {
    i64::try_from(value.len()).unwrap_or(i64::MAX)
}

/// Validate a string field.
///
/// Steps run in a fixed order and the first failure wins:
/// required, standalone default, max length, min length, enum membership.
/// An empty value on an enum field resolves to the enum default.
pub fn validate_str(
    field: &str,
    constraints: &ConstraintSet,
    values: &ParamValues,
) -> Result<String, ParamRejection> {
    let key = constraints.lookup_key(field);
    let mut value = values.get(key.as_ref()).cloned().unwrap_or_default();

    if constraints.required && value.is_empty() {
        return reject(&key, format!("{key} must me not empty"));
    }
    if value.is_empty() {
        if let Some(default) = &constraints.default {
            value.clone_from(default);
        }
    }
    if let Some(max) = constraints.max {
        if byte_len(&value) > max {
            return reject(&key, format!("{key} len must be <= {max}"));
        }
    }
    if let Some(min) = constraints.min {
        if byte_len(&value) < min {
            return reject(&key, format!("{key} len must be >= {min}"));
        }
    }
    if let Some(allowed) = &constraints.enumeration {
        if value.is_empty() {
            return Ok(allowed.default.clone().unwrap_or_default());
        }
        if !allowed.contains(&value) {
            return reject(
                &key,
                format!("{key} must be one of [{}]", allowed.values.join(", ")),
            );
        }
    }
    Ok(value)
}

/// Validate an integer field.
///
/// An empty, non-required value falls back to the declared default, or to
/// zero when there is none. Bounds compare the parsed number.
pub fn validate_int<T>(
    field: &str,
    constraints: &ConstraintSet,
    values: &ParamValues,
) -> Result<T, ParamRejection>
where
    T: FromStr + Into<i64> + Copy + Default,
{
    let key = constraints.lookup_key(field);
    let raw = values.get(key.as_ref()).map(String::as_str).unwrap_or_default();

    if constraints.required && raw.is_empty() {
        return reject(&key, format!("{key} must me not empty"));
    }

    let parsed = match (raw.is_empty(), constraints.fallback()) {
        (false, _) => raw.parse::<T>(),
        (true, Some(default)) => default.parse::<T>(),
        (true, None) => Ok(T::default()),
    };
    let Ok(num) = parsed else {
        return reject(&key, format!("{key} must be int"));
    };

    let n: i64 = num.into();
    if let Some(max) = constraints.max {
        if n > max {
            return reject(&key, format!("{key} must be <= {max}"));
        }
    }
    if let Some(min) = constraints.min {
        if n < min {
            return reject(&key, format!("{key} must be >= {min}"));
        }
    }
    Ok(num)
}
