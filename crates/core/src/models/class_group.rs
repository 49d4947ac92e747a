//! Class (teaching group) record and draft.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;
use crate::resource::{optional_text, or_dash, unknown_field, NoQuery, Resource};
use crate::types::DbId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassGroup {
    pub id: DbId,
    pub name: String,
    pub section: Option<String>,
    pub room: Option<String>,
    pub capacity: Option<i32>,
}

impl ClassGroup {
    /// `"Grade 10 A"`, or just the name when there is no section.
    pub fn label(&self) -> String {
        match &self.section {
            Some(section) => format!("{} {section}", self.name),
            None => self.name.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct ClassGroupDraft {
    #[validate(length(min = 1, max = 100, message = "must be 1-100 characters"))]
    pub name: String,
    #[validate(length(max = 10, message = "must be at most 10 characters"))]
    pub section: Option<String>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub room: Option<String>,
    #[validate(range(min = 1, message = "must be a positive number"))]
    pub capacity: Option<i32>,
}

/// Marker for the `/api/classes` collection.
#[derive(Debug, Clone, Copy)]
pub struct Classes;

impl Resource for Classes {
    type Record = ClassGroup;
    type Draft = ClassGroupDraft;
    type Query = NoQuery;

    const COLLECTION: &'static str = "classes";
    const NOUN: &'static str = "Class";
    const FIELDS: &'static [&'static str] = &["name", "section", "room", "capacity"];

    fn id(record: &ClassGroup) -> DbId {
        record.id
    }

    fn draft_of(record: &ClassGroup) -> ClassGroupDraft {
        ClassGroupDraft {
            name: record.name.clone(),
            section: record.section.clone(),
            room: record.room.clone(),
            capacity: record.capacity,
        }
    }

    fn set_field(draft: &mut ClassGroupDraft, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "name" => draft.name = value.trim().to_string(),
            "section" => draft.section = optional_text(value),
            "room" => draft.room = optional_text(value),
            "capacity" => {
                draft.capacity = match optional_text(value) {
                    None => None,
                    Some(raw) => Some(raw.parse::<i32>().map_err(|_| {
                        CoreError::Validation(format!("capacity must be a number, got '{raw}'"))
                    })?),
                }
            }
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn describe(draft: &ClassGroupDraft) -> Vec<(&'static str, String)> {
        vec![
            ("name", draft.name.clone()),
            ("section", or_dash(draft.section.as_deref())),
            ("room", or_dash(draft.room.as_deref())),
            ("capacity", or_dash(draft.capacity)),
        ]
    }
}
