//! Day × period grid construction.
//!
//! Rows are the distinct start times of non-break slots. The first slot seen
//! for a start time is the row's canonical period and supplies its header
//! (start, end, period name). Columns are a fixed weekday sequence. Each cell
//! resolves the slot for (day, start time) and collects every entry
//! referencing that slot.
//!
//! Building is pure: inputs are borrowed and the grid owns copies of the
//! entries it displays.

use std::collections::HashSet;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::Serialize;

use crate::clock::format_clock;
use crate::error::CoreError;
use crate::models::{TimeSlot, TimetableEntry};
use crate::types::DbId;
use crate::weekday::Weekday;

/// How grid rows are ordered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RowOrder {
    /// Ascending start time.
    #[default]
    StartTime,
    /// Order in which each start time first appears in the slot list.
    FirstAppearance,
}

impl FromStr for RowOrder {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start_time" | "start-time" | "time" => Ok(RowOrder::StartTime),
            "first_appearance" | "first-appearance" | "input" => Ok(RowOrder::FirstAppearance),
            other => Err(CoreError::Validation(format!(
                "Unknown row order '{other}'. Expected start_time or first_appearance"
            ))),
        }
    }
}

/// Content of one (period, day) cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Cell {
    /// No slot exists for this day at the row's start time.
    Empty,
    /// The slot exists; `entries` may be empty, or hold more than one entry
    /// if the server ever lets a clash through.
    Slot {
        slot_id: DbId,
        is_break: bool,
        entries: Vec<TimetableEntry>,
    },
}

impl Cell {
    pub fn entries(&self) -> &[TimetableEntry] {
        match self {
            Cell::Empty => &[],
            Cell::Slot { entries, .. } => entries,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridRow {
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub period_name: Option<String>,
    /// One cell per grid day, in column order.
    pub cells: Vec<Cell>,
}

impl GridRow {
    /// `"09:00 - 09:45"`.
    pub fn span_label(&self) -> String {
        format!(
            "{} - {}",
            format_clock(self.start_time),
            format_clock(self.end_time)
        )
    }
}

/// Export is offered only for a single class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExportLink {
    pub class_id: DbId,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimetableGrid {
    pub days: Vec<Weekday>,
    pub rows: Vec<GridRow>,
    pub export: Option<ExportLink>,
}

impl TimetableGrid {
    /// Build the grid from slots (any days, breaks included) and entries
    /// already filtered by the caller.
    pub fn build(
        slots: &[TimeSlot],
        entries: &[TimetableEntry],
        days: &[Weekday],
        order: RowOrder,
    ) -> Self {
        let mut seen = HashSet::new();
        let mut periods: Vec<&TimeSlot> = slots
            .iter()
            .filter(|slot| !slot.is_break)
            .filter(|slot| seen.insert(slot.start_time))
            .collect();

        if order == RowOrder::StartTime {
            periods.sort_by_key(|slot| slot.start_time);
        }

        let rows = periods
            .into_iter()
            .map(|period| GridRow {
                start_time: period.start_time,
                end_time: period.end_time,
                period_name: period.period_name.clone(),
                cells: days
                    .iter()
                    .map(|day| resolve_cell(slots, entries, *day, period.start_time))
                    .collect(),
            })
            .collect();

        Self {
            days: days.to_vec(),
            rows,
            export: None,
        }
    }

    /// Attach the export affordance when a class filter is active.
    pub fn with_export_for(mut self, class_id: Option<DbId>) -> Self {
        self.export = class_id.map(|class_id| ExportLink { class_id });
        self
    }

    /// Cell at (`row`, `day`), if both exist.
    pub fn cell(&self, row: usize, day: Weekday) -> Option<&Cell> {
        let column = self.days.iter().position(|d| *d == day)?;
        self.rows.get(row)?.cells.get(column)
    }

    /// Number of entries placed in the grid.
    pub fn entry_count(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .map(|cell| cell.entries().len())
            .sum()
    }
}

/// Find the first slot for (`day`, `start`) and gather its entries.
fn resolve_cell(
    slots: &[TimeSlot],
    entries: &[TimetableEntry],
    day: Weekday,
    start: NaiveTime,
) -> Cell {
    match slots
        .iter()
        .find(|slot| slot.day == day && slot.start_time == start)
    {
        None => Cell::Empty,
        Some(slot) => Cell::Slot {
            slot_id: slot.id,
            is_break: slot.is_break,
            entries: entries
                .iter()
                .filter(|entry| entry.timeslot_id == slot.id)
                .cloned()
                .collect(),
        },
    }
}
