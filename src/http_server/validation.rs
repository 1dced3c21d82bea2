//! Request field checks shared by the routers
//!
//! Everything here runs before any store call, so a value that could not be
//! echoed back in a header or path never reaches a committed write.

use super::errors::{ApiError, ApiResult};

pub(super) fn required<T>(value: Option<T>, field: &str) -> ApiResult<T> {
    value.ok_or_else(|| ApiError::Validation(format!("{} is required", field)))
}

/// Present, non-blank after trimming, free of control characters
pub(super) fn non_empty(value: Option<String>, field: &str) -> ApiResult<String> {
    let value = required(value, field)?;
    text(&value, field)
}

/// A senate division short name: also a path segment, so no `/`
pub(super) fn division_name(value: &str, field: &str) -> ApiResult<String> {
    let name = text(value, field)?;
    if name.contains('/') {
        return Err(ApiError::Validation(format!(
            "{} must not contain '/'",
            field
        )));
    }
    Ok(name)
}

fn text(value: &str, field: &str) -> ApiResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApiError::Validation(format!("{} must not be empty", field)));
    }
    if trimmed.chars().any(char::is_control) {
        return Err(ApiError::Validation(format!(
            "{} must not contain control characters",
            field
        )));
    }
    Ok(trimmed.to_string())
}
