//! Plain-text rendering of panels, forms and the timetable grid.

use std::fmt::Write as _;

use timetable_core::clock::format_clock;
use timetable_core::grid::{Cell, TimetableGrid};
use timetable_core::models::{ClassGroup, Subject, Teacher, TimeSlot, TimetableEntry};
use timetable_core::resource::{or_dash, Resource};
use timetable_core::weekday::Weekday;

use crate::dashboard::DashboardCounts;
use crate::panels::EntityForm;
use crate::timetable::EntryFormOptions;

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Render a bordered table. Cells may span several lines.
pub fn table(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (column, cell) in row.iter().enumerate() {
            let widest = cell.lines().map(|l| l.chars().count()).max().unwrap_or(0);
            if let Some(width) = widths.get_mut(column) {
                *width = (*width).max(widest);
            }
        }
    }

    let border = {
        let mut line = String::from("+");
        for width in &widths {
            line.push_str(&"-".repeat(width + 2));
            line.push('+');
        }
        line
    };

    let mut out = String::new();
    out.push_str(&border);
    out.push('\n');
    let header_cells: Vec<String> = headers.iter().map(|h| h.to_string()).collect();
    push_row(&mut out, &header_cells, &widths);
    out.push_str(&border);
    out.push('\n');
    for row in rows {
        push_row(&mut out, row, &widths);
    }
    if !rows.is_empty() {
        out.push_str(&border);
        out.push('\n');
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let split: Vec<Vec<&str>> = cells.iter().map(|c| c.lines().collect()).collect();
    let height = split.iter().map(Vec::len).max().unwrap_or(0).max(1);

    for line in 0..height {
        out.push('|');
        for (column, width) in widths.iter().enumerate() {
            let text = split
                .get(column)
                .and_then(|lines| lines.get(line))
                .copied()
                .unwrap_or("");
            let pad = width - text.chars().count();
            let _ = write!(out, " {text}{} |", " ".repeat(pad));
        }
        out.push('\n');
    }
}

/// A record that renders as one table row.
pub trait Tabular {
    const HEADERS: &'static [&'static str];
    fn row(&self) -> Vec<String>;
}

impl Tabular for Teacher {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Email", "Phone", "Department"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.email.as_deref()),
            or_dash(self.phone.as_deref()),
            or_dash(self.department.as_deref()),
        ]
    }
}

impl Tabular for Subject {
    const HEADERS: &'static [&'static str] = &["ID", "Code", "Name", "Description"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.code.clone(),
            self.name.clone(),
            or_dash(self.description.as_deref()),
        ]
    }
}

impl Tabular for ClassGroup {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Section", "Room", "Capacity"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            or_dash(self.section.as_deref()),
            or_dash(self.room.as_deref()),
            or_dash(self.capacity),
        ]
    }
}

impl Tabular for TimeSlot {
    const HEADERS: &'static [&'static str] = &["ID", "Day", "Time", "Period", "Break"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.day.to_string(),
            self.span_label(),
            or_dash(self.period_name.as_deref()),
            yes_no(self.is_break).to_string(),
        ]
    }
}

impl Tabular for TimetableEntry {
    const HEADERS: &'static [&'static str] =
        &["ID", "Day", "Time", "Class", "Subject", "Teacher", "Room"];

    fn row(&self) -> Vec<String> {
        let time = match (self.start_time, self.end_time) {
            (Some(start), Some(end)) => format!("{} - {}", format_clock(start), format_clock(end)),
            _ => "-".to_string(),
        };
        vec![
            self.id.to_string(),
            self.day.to_string(),
            time,
            self.class_name.clone(),
            self.subject_label(),
            self.teacher_name.clone(),
            or_dash(self.room.as_deref()),
        ]
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Render a list panel, or `empty` when there is nothing to show.
pub fn records<T: Tabular>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        return format!("{empty}\n");
    }
    let rows: Vec<Vec<String>> = items.iter().map(Tabular::row).collect();
    table(T::HEADERS, &rows)
}

// ---------------------------------------------------------------------------
// Timetable grid
// ---------------------------------------------------------------------------

pub fn grid(grid: &TimetableGrid) -> String {
    if grid.rows.is_empty() {
        return "No time slots defined\n".to_string();
    }

    let mut headers = vec!["Time"];
    headers.extend(grid.days.iter().map(|day| day.as_str()));

    let rows: Vec<Vec<String>> = grid
        .rows
        .iter()
        .map(|row| {
            let mut time = row.span_label();
            if let Some(period) = &row.period_name {
                time.push('\n');
                time.push_str(period);
            }
            let mut cells = vec![time];
            cells.extend(row.cells.iter().map(grid_cell));
            cells
        })
        .collect();

    let mut out = table(&headers, &rows);
    if let Some(link) = grid.export {
        let _ = writeln!(out, "Export available: export {}", link.class_id);
    }
    out
}

fn grid_cell(cell: &Cell) -> String {
    match cell {
        Cell::Empty => "-".to_string(),
        Cell::Slot {
            is_break: true,
            entries,
            ..
        } if entries.is_empty() => "Break".to_string(),
        Cell::Slot { entries, .. } => entries
            .iter()
            .map(|entry| {
                format!(
                    "{}\n{}\n{}\n#{}",
                    entry.subject_label(),
                    entry.teacher_name,
                    entry.class_room_label(),
                    entry.id
                )
            })
            .collect::<Vec<_>>()
            .join("\n\n"),
    }
}

// ---------------------------------------------------------------------------
// Forms, dashboard, slot picker
// ---------------------------------------------------------------------------

pub fn form<R: Resource>(form: &EntityForm<R>) -> String {
    let mut out = format!("{}\n", form.title());
    let fields = form.fields();
    let width = fields.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, value) in fields {
        let _ = writeln!(out, "  {name:<width$}  {value}");
    }
    if let Some(alert) = form.alert() {
        let _ = writeln!(out, "! {alert}");
    }
    out
}

pub fn counts(counts: &DashboardCounts) -> String {
    table(
        &["Teachers", "Subjects", "Classes", "Timetable Entries"],
        &[vec![
            counts.teachers.to_string(),
            counts.subjects.to_string(),
            counts.classes.to_string(),
            counts.entries.to_string(),
        ]],
    )
}

/// Teachers, subjects and classes an entry form can refer to.
pub fn entry_choices(options: &EntryFormOptions) -> String {
    let mut out = String::new();
    let teachers: Vec<Vec<String>> = options
        .teachers()
        .iter()
        .map(|teacher| vec![teacher.id.to_string(), teacher.name.clone()])
        .collect();
    let subjects: Vec<Vec<String>> = options
        .subjects()
        .iter()
        .map(|subject| {
            vec![
                subject.id.to_string(),
                format!("{} - {}", subject.code, subject.name),
            ]
        })
        .collect();
    let classes: Vec<Vec<String>> = options
        .classes()
        .iter()
        .map(|class| vec![class.id.to_string(), class.label()])
        .collect();

    for (header, plural, rows) in [
        ("Teacher", "teachers", teachers),
        ("Subject", "subjects", subjects),
        ("Class", "classes", classes),
    ] {
        if rows.is_empty() {
            let _ = writeln!(out, "No {plural} to choose from");
        } else {
            out.push_str(&table(&["ID", header], &rows));
        }
    }
    out
}

/// Slots an entry can be placed in on `day`.
pub fn slot_choices(day: Weekday, slots: &[&TimeSlot]) -> String {
    if slots.is_empty() {
        return format!("No assignable slots on {day}\n");
    }
    let rows: Vec<Vec<String>> = slots
        .iter()
        .map(|slot| {
            vec![
                slot.id.to_string(),
                slot.span_label(),
                or_dash(slot.period_name.as_deref()),
            ]
        })
        .collect();
    table(&["ID", "Time", "Period"], &rows)
}
