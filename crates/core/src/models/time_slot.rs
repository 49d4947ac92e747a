//! Time slot record and draft.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::clock::{self, format_clock, parse_clock};
use crate::error::CoreError;
use crate::resource::{optional_text, or_dash, parse_flag, unknown_field, NoQuery, Resource};
use crate::types::DbId;
use crate::weekday::Weekday;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: DbId,
    pub day: Weekday,
    #[serde(with = "clock::hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "clock::hhmm")]
    pub end_time: NaiveTime,
    pub period_name: Option<String>,
    #[serde(default)]
    pub is_break: bool,
}

impl TimeSlot {
    /// `"09:00 - 09:45"`.
    pub fn span_label(&self) -> String {
        format!(
            "{} - {}",
            format_clock(self.start_time),
            format_clock(self.end_time)
        )
    }
}

/// Slots an entry may be assigned to on `day`: non-break, in input order.
pub fn assignable_on(slots: &[TimeSlot], day: Weekday) -> Vec<&TimeSlot> {
    slots
        .iter()
        .filter(|slot| slot.day == day && !slot.is_break)
        .collect()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Validate)]
pub struct TimeSlotDraft {
    #[validate(required(message = "is required"))]
    pub day: Option<Weekday>,
    #[validate(length(max = 50, message = "must be at most 50 characters"))]
    pub period_name: Option<String>,
    #[validate(required(message = "is required"))]
    #[serde(with = "clock::hhmm_opt")]
    pub start_time: Option<NaiveTime>,
    #[validate(required(message = "is required"))]
    #[serde(with = "clock::hhmm_opt")]
    pub end_time: Option<NaiveTime>,
    pub is_break: bool,
}

/// Marker for the `/api/timeslots` collection.
#[derive(Debug, Clone, Copy)]
pub struct TimeSlots;

impl Resource for TimeSlots {
    type Record = TimeSlot;
    type Draft = TimeSlotDraft;
    type Query = NoQuery;

    const COLLECTION: &'static str = "timeslots";
    const NOUN: &'static str = "Time Slot";
    const FIELDS: &'static [&'static str] = &["day", "period", "start", "end", "break"];

    fn id(record: &TimeSlot) -> DbId {
        record.id
    }

    fn draft_of(record: &TimeSlot) -> TimeSlotDraft {
        TimeSlotDraft {
            day: Some(record.day),
            period_name: record.period_name.clone(),
            start_time: Some(record.start_time),
            end_time: Some(record.end_time),
            is_break: record.is_break,
        }
    }

    fn set_field(draft: &mut TimeSlotDraft, field: &str, value: &str) -> Result<(), CoreError> {
        match field {
            "day" => {
                draft.day = optional_text(value)
                    .map(|v| v.parse::<Weekday>())
                    .transpose()?
            }
            "period" | "period_name" => draft.period_name = optional_text(value),
            "start" | "start_time" => {
                draft.start_time = optional_text(value).map(|v| parse_clock(&v)).transpose()?
            }
            "end" | "end_time" => {
                draft.end_time = optional_text(value).map(|v| parse_clock(&v)).transpose()?
            }
            "break" | "is_break" => draft.is_break = parse_flag("break", value)?,
            other => return Err(unknown_field::<Self>(other)),
        }
        Ok(())
    }

    fn describe(draft: &TimeSlotDraft) -> Vec<(&'static str, String)> {
        vec![
            ("day", or_dash(draft.day)),
            ("period", or_dash(draft.period_name.as_deref())),
            ("start", or_dash(draft.start_time.map(format_clock))),
            ("end", or_dash(draft.end_time.map(format_clock))),
            ("break", if draft.is_break { "Yes" } else { "No" }.to_string()),
        ]
    }

    fn check(draft: &TimeSlotDraft) -> Result<(), CoreError> {
        if let (Some(start), Some(end)) = (draft.start_time, draft.end_time) {
            if end <= start {
                return Err(CoreError::Validation(format!(
                    "end ({}) must be after start ({})",
                    format_clock(end),
                    format_clock(start)
                )));
            }
        }
        Ok(())
    }
}
