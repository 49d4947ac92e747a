//! Entry filter composition for `GET /api/timetable`.
//!
//! The three filters are independent and optional. Only filters that are set
//! become query parameters; the server ANDs whatever it receives. An empty
//! filter produces no parameters at all, never `class_id=` style blanks.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::resource::{optional_id, optional_text, QueryParams};
use crate::types::DbId;
use crate::weekday::Weekday;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryFilter {
    pub class_id: Option<DbId>,
    pub teacher_id: Option<DbId>,
    pub day: Option<Weekday>,
}

impl EntryFilter {
    pub fn is_empty(&self) -> bool {
        self.class_id.is_none() && self.teacher_id.is_none() && self.day.is_none()
    }

    /// Set one filter from user text. Blank text clears it.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), CoreError> {
        match key {
            "class" | "class_id" => self.class_id = optional_id("class", value)?,
            "teacher" | "teacher_id" => self.teacher_id = optional_id("teacher", value)?,
            "day" => {
                self.day = optional_text(value)
                    .map(|v| v.parse::<Weekday>())
                    .transpose()?
            }
            other => {
                return Err(CoreError::Validation(format!(
                    "Unknown filter '{other}'. Expected one of: class, teacher, day"
                )))
            }
        }
        Ok(())
    }
}

impl QueryParams for EntryFilter {
    fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(class_id) = self.class_id {
            pairs.push(("class_id", class_id.to_string()));
        }
        if let Some(teacher_id) = self.teacher_id {
            pairs.push(("teacher_id", teacher_id.to_string()));
        }
        if let Some(day) = self.day {
            pairs.push(("day", day.as_str().to_string()));
        }
        pairs
    }
}
