//! Subject record and draft.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::resource::{optional_text, or_dash, unknown_field, NoQuery, Resource};
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct SubjectDraft {
    #[validate(length(min = 1, max = 20, message = "must be 1-20 characters"))]
    pub code: String,
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    pub description: Option<String>,
}

/// Marker for the `/api/subjects` collection.
#[derive(Debug, Clone, Copy)]
pub struct Subjects;

impl Resource for Subjects {
    type Record = Subject;
    type Draft = SubjectDraft;
    type Query = NoQuery;

    const COLLECTION: &'static str = "subjects";
    const NOUN: &'static str = "Subject";
    const FIELDS: &'static [&'static str] = &["code", "name", "description"];

    fn id(record: &Subject) -> DbId {
        record.id
    }

    fn draft_of(record: &Subject) -> SubjectDraft {
        SubjectDraft {
            code: record.code.clone(),
            name: record.name.clone(),
            description: record.description.clone(),
        }
    }

    fn set_field(draft: &mut SubjectDraft, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "code" => draft.code = value.trim().to_string(),
            "name" => draft.name = value.trim().to_string(),
            "description" => draft.description = optional_text(value),
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn describe(draft: &SubjectDraft) -> Vec<(&'static str, String)> {
        vec![
            ("code", draft.code.clone()),
            ("name", draft.name.clone()),
            ("description", or_dash(draft.description.as_deref())),
        ]
    }
}
