//! Timetable entry record and draft.
//!
//! Entries reference their teacher, subject, class and slot by id and carry
//! display fields denormalized by the server. Those display fields are
//! required: a response without them fails to decode instead of rendering
//! blanks.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clock;
use crate::error::CoreError;
use crate::filter::EntryFilter;
use crate::resource::{optional_id, or_dash, unknown_field, Resource};
use crate::types::DbId;
use crate::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimetableEntry {
    pub id: DbId,
    pub teacher_id: DbId,
    pub subject_id: DbId,
    pub class_id: DbId,
    pub timeslot_id: DbId,

    pub teacher_name: String,
    pub subject_name: String,
    pub subject_code: String,
    pub class_name: String,
    pub room: Option<String>,

    pub day: Weekday,
    #[serde(default, with = "clock::hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "clock::hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    #[serde(default)]
    pub period_name: Option<String>,
}

impl TimetableEntry {
    /// `"MATH101 - Mathematics"`.
    pub fn subject_label(&self) -> String {
        format!("{} - {}", self.subject_code, self.subject_name)
    }

    /// `"Grade 10 A (Room 101)"`, with `N/A` when the class has no room.
    pub fn class_room_label(&self) -> String {
        format!(
            "{} ({})",
            self.class_name,
            self.room.as_deref().unwrap_or("N/A")
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct EntryDraft {
    #[validate(required(message = "is required"))]
    pub teacher_id: Option<DbId>,
    #[validate(required(message = "is required"))]
    pub subject_id: Option<DbId>,
    #[validate(required(message = "is required"))]
    pub class_id: Option<DbId>,
    #[validate(required(message = "is required"))]
    pub timeslot_id: Option<DbId>,
}

/// Marker for the `/api/timetable` collection.
#[derive(Debug, Clone, Copy)]
pub struct Entries;

impl Resource for Entries {
    type Record = TimetableEntry;
    type Draft = EntryDraft;
    type Query = EntryFilter;

    const COLLECTION: &'static str = "timetable";
    const NOUN: &'static str = "Timetable Entry";
    const FIELDS: &'static [&'static str] = &["class", "teacher", "subject", "slot"];

    fn id(record: &TimetableEntry) -> DbId {
        record.id
    }

    fn draft_of(record: &TimetableEntry) -> EntryDraft {
        EntryDraft {
            teacher_id: Some(record.teacher_id),
            subject_id: Some(record.subject_id),
            class_id: Some(record.class_id),
            timeslot_id: Some(record.timeslot_id),
        }
    }

    fn set_field(draft: &mut EntryDraft, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "class" | "class_id" => draft.class_id = optional_id("class", value)?,
            "teacher" | "teacher_id" => draft.teacher_id = optional_id("teacher", value)?,
            "subject" | "subject_id" => draft.subject_id = optional_id("subject", value)?,
            "slot" | "timeslot" | "timeslot_id" => {
                draft.timeslot_id = optional_id("slot", value)?
            }
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn describe(draft: &EntryDraft) -> Vec<(&'static str, String)> {
        vec![
            ("class", or_dash(draft.class_id)),
            ("teacher", or_dash(draft.teacher_id)),
            ("subject", or_dash(draft.subject_id)),
            ("slot", or_dash(draft.timeslot_id)),
        ]
    }
}
