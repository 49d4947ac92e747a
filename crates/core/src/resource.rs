//! Resource metadata shared by the REST client and the console panels.
//!
//! Each of the five server collections (teachers, subjects, classes, time
//! slots, timetable entries) is described by a zero-sized marker type that
//! implements [`Resource`]. The client derives request paths from it and the
//! console drives forms and list panels through it, so the five CRUD flows
//! share one implementation.

use std::fmt::Debug;

use serde::de::DeserializeOwned;
use serde::Serialize;
use validator::Validate;

use crate::error::CoreError;
use crate::types::DbId;

/// A server collection with a record shape, a create/update body and a
/// list query.
pub trait Resource: Send + Sync + 'static {
    /// Record as returned by the API.
    type Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;
    /// Body of `POST` and `PUT` requests.
    type Draft: Clone + Debug + Default + Serialize + Validate + Send + Sync + 'static;
    /// Parameters for the list request.
    type Query: QueryParams + Clone + Debug + Default + Send + Sync + 'static;

    /// Path segment under `/api/`.
    const COLLECTION: &'static str;
    /// Singular display name, used in form titles and prompts.
    const NOUN: &'static str;
    /// Field names accepted by [`Resource::set_field`], in display order.
    const FIELDS: &'static [&'static str];

    fn id(record: &Self::Record) -> DbId;

    /// Prefill a draft from an existing record (edit form).
    fn draft_of(record: &Self::Record) -> Self::Draft;

    /// Assign one field of a draft from user text.
    fn set_field(draft: &mut Self::Draft, field: &str, value: &str) -> Result<(), CoreError>;

    /// Current draft values as display text, one pair per field.
    fn describe(draft: &Self::Draft) -> Vec<(&'static str, String)>;

    /// Cross-field checks that `validator` attributes cannot express.
    fn check(_draft: &Self::Draft) -> Result<(), CoreError> {
        Ok(())
    }
}

/// List query parameters. Only parameters that are set are emitted.
pub trait QueryParams {
    fn query_pairs(&self) -> Vec<(&'static str, String)>;
}

/// Collections listed without parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoQuery;

impl QueryParams for NoQuery {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

// ---------------------------------------------------------------------------
// Field parsing helpers
// ---------------------------------------------------------------------------

/// Blank input clears an optional field instead of sending `""`.
pub fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parse a positive identifier; blank input yields `None`.
pub fn optional_id(field: &str, value: &str) -> Result<Option<DbId>, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<DbId>() {
        Ok(id) if id > 0 => Ok(Some(id)),
        _ => Err(CoreError::Validation(format!(
            "{field} must be a positive integer, got '{trimmed}'"
        ))),
    }
}

pub fn parse_flag(field: &str, value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" => Ok(true),
        "false" | "no" | "n" | "0" | "" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "{field} must be yes or no, got '{other}'"
        ))),
    }
}

pub fn unknown_field<R: Resource>(field: &str) -> CoreError {
    CoreError::Validation(format!(
        "Unknown {} field '{field}'. Expected one of: {}",
        R::NOUN.to_lowercase(),
        R::FIELDS.join(", ")
    ))
}

/// Display text for an optional value (`-` when absent).
pub fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| "-".to_string())
}
