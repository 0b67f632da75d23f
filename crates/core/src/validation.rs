//! Required-field validation shared by every submission form.
//!
//! Forms derive [`validator::Validate`]; [`check`] runs the derived rules and
//! converts failures into [`CoreError::InvalidFields`] so callers can reject a
//! submission before any network call is made.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{10}$").unwrap_or_else(|e| panic!("invalid phone pattern: {e}"))
});

/// Run the derived validation rules for `value`.
pub fn check<T: Validate>(value: &T) -> Result<(), CoreError> {
    value
        .validate()
        .map_err(|errors| CoreError::InvalidFields(field_messages(&errors)))
}

/// Flatten validator errors into one message per field.
///
/// The first error's message wins; errors without a message fall back to
/// `"<field> is invalid"`.
pub fn field_messages(errors: &ValidationErrors) -> BTreeMap<String, String> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let message = errs
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| format!("{field} is invalid"));
            (field.to_string(), message)
        })
        .collect()
}

/// A phone number must be exactly ten digits.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    if PHONE_RE.is_match(phone) {
        return Ok(());
    }
    let mut error = ValidationError::new("phone");
    error.message = Some(Cow::Borrowed("Enter a valid 10-digit phone number"));
    Err(error)
}

/// Reject strings that are empty once surrounding whitespace is removed.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("required");
        error.message = Some(Cow::Borrowed("This field is required"));
        return Err(error);
    }
    Ok(())
}
