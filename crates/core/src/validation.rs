//! Local form validation run before a draft is sent to the API.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;
use crate::resource::Resource;

/// Run the draft's `validator` rules and its cross-field checks.
pub fn validate_draft<R: Resource>(draft: &R::Draft) -> Result<(), CoreError> {
    draft.validate().map_err(to_core_error)?;
    R::check(draft)
}

/// Flatten `validator` errors into one message, fields sorted by name.
pub fn to_core_error(errors: ValidationErrors) -> CoreError {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    parts.sort();
    CoreError::Validation(parts.join("; "))
}
