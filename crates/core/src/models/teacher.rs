//! Teacher record and draft.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::resource::{optional_text, or_dash, unknown_field, NoQuery, Resource};
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub department: Option<String>,
}

/// Body for creating or updating a teacher.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct TeacherDraft {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(email(message = "must be a valid email address"))]
    pub email: Option<String>,
    #[validate(length(max = 20, message = "must be at most 20 characters"))]
    pub phone: Option<String>,
    #[validate(length(max = 100, message = "must be at most 100 characters"))]
    pub department: Option<String>,
}

/// Marker for the `/api/teachers` collection.
#[derive(Debug, Clone, Copy)]
pub struct Teachers;

impl Resource for Teachers {
    type Record = Teacher;
    type Draft = TeacherDraft;
    type Query = NoQuery;

    const COLLECTION: &'static str = "teachers";
    const NOUN: &'static str = "Teacher";
    const FIELDS: &'static [&'static str] = &["name", "email", "phone", "department"];

    fn id(record: &Teacher) -> DbId {
        record.id
    }

    fn draft_of(record: &Teacher) -> TeacherDraft {
        TeacherDraft {
            name: record.name.clone(),
            email: record.email.clone(),
            phone: record.phone.clone(),
            department: record.department.clone(),
        }
    }

    fn set_field(draft: &mut TeacherDraft, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "name" => draft.name = value.trim().to_string(),
            "email" => draft.email = optional_text(value),
            "phone" => draft.phone = optional_text(value),
            "department" => draft.department = optional_text(value),
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn describe(draft: &TeacherDraft) -> Vec<(&'static str, String)> {
        vec![
            ("name", draft.name.clone()),
            ("email", or_dash(draft.email.as_deref())),
            ("phone", or_dash(draft.phone.as_deref())),
            ("department", or_dash(draft.department.as_deref())),
        ]
    }
}
