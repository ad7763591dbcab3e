//! Query parameter parsing helpers
//!
//! The random endpoints take their criteria as query parameters, with
//! repeated keys for multi-valued criteria. Parsing is strict: unknown keys
//! and unrecognized enumerated values are rejected, as is repeating a
//! single-valued key.

use crate::error::{ApiError, ApiResult};

/// Parse one enumerated query value, rejecting anything outside the closed set
pub(super) fn parse_value<T>(
    name: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> ApiResult<T> {
    parse(value).ok_or_else(|| {
        ApiError::BadRequest(format!("invalid value {:?} for parameter {:?}", value, name))
    })
}

/// Store a single-valued parameter, rejecting a repeated key
pub(super) fn set_single<T>(
    slot: &mut Option<T>,
    name: &str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> ApiResult<()> {
    if slot.is_some() {
        return Err(ApiError::BadRequest(format!(
            "parameter {:?} given more than once",
            name
        )));
    }
    *slot = Some(parse_value(name, value, parse)?);
    Ok(())
}

pub(super) fn unknown_param(key: &str) -> ApiError {
    ApiError::BadRequest(format!("unknown query parameter {:?}", key))
}
