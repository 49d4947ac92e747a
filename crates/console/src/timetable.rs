//! Timetable view: filter coordination and grid snapshots.
//!
//! Entering the view fetches every list; a filter change re-fetches only the
//! entries. Either way the grid is rebuilt. Each
//! refresh takes a ticket from a [`RequestSequencer`] before its requests go
//! out and publishes only if that ticket is still the latest one, so a slow
//! response for an old filter can never replace a newer grid. Published
//! state is an immutable [`TimetableSnapshot`] swapped in whole.

use std::sync::Arc;

use tokio::sync::{Mutex, RwLock};

use timetable_client::{RequestSequencer, Ticket, TimetableApi};
use timetable_core::filter::EntryFilter;
use timetable_core::grid::{RowOrder, TimetableGrid};
use timetable_core::models::time_slot::assignable_on;
use timetable_core::models::{
    ClassGroup, Classes, Entries, Subject, Subjects, Teacher, Teachers, TimeSlot, TimeSlots,
    TimetableEntry,
};
use timetable_core::resource::NoQuery;
use timetable_core::types::DbId;
use timetable_core::weekday::Weekday;

use crate::error::ConsoleResult;
use crate::panels::{remove, submit, DeleteOutcome, EntityForm, SaveOutcome};
use crate::prompt::Confirm;

/// Everything the timetable screen shows, as of one refresh.
#[derive(Debug, Clone, Default)]
pub struct TimetableSnapshot {
    /// Ticket value of the refresh that produced this snapshot (0 before
    /// the first load).
    pub generation: u64,
    pub filter: EntryFilter,
    pub teachers: Vec<Teacher>,
    pub subjects: Vec<Subject>,
    pub classes: Vec<ClassGroup>,
    pub timeslots: Vec<TimeSlot>,
    pub entries: Vec<TimetableEntry>,
    pub grid: TimetableGrid,
}

impl TimetableSnapshot {
    pub fn is_loaded(&self) -> bool {
        self.generation > 0
    }

    fn slot(&self, id: DbId) -> Option<&TimeSlot> {
        self.timeslots.iter().find(|slot| slot.id == id)
    }
}

/// What happened to a refresh.
#[derive(Debug, Clone)]
pub enum Refresh {
    Applied(Arc<TimetableSnapshot>),
    /// A newer refresh was issued while this one was in flight; its result
    /// was dropped.
    Stale,
}

/// Choices offered by the entry form.
#[derive(Debug, Clone)]
pub struct EntryFormOptions {
    snapshot: Arc<TimetableSnapshot>,
}

impl EntryFormOptions {
    pub fn teachers(&self) -> &[Teacher] {
        &self.snapshot.teachers
    }

    pub fn subjects(&self) -> &[Subject] {
        &self.snapshot.subjects
    }

    pub fn classes(&self) -> &[ClassGroup] {
        &self.snapshot.classes
    }

    /// Non-break slots of `day`, in list order.
    pub fn slots_for(&self, day: Weekday) -> Vec<&TimeSlot> {
        assignable_on(&self.snapshot.timeslots, day)
    }
}

pub struct TimetableView {
    api: TimetableApi,
    days: Vec<Weekday>,
    row_order: RowOrder,
    sequencer: RequestSequencer,
    /// Filter of the latest issued refresh, which may not be published yet.
    requested: Mutex<EntryFilter>,
    current: RwLock<Arc<TimetableSnapshot>>,
}

impl TimetableView {
    pub fn new(api: TimetableApi, days: &[Weekday], row_order: RowOrder) -> Self {
        Self {
            api,
            days: days.to_vec(),
            row_order,
            sequencer: RequestSequencer::new(),
            requested: Mutex::new(EntryFilter::default()),
            current: RwLock::new(Arc::new(TimetableSnapshot::default())),
        }
    }

    /// The most recently published snapshot.
    pub async fn snapshot(&self) -> Arc<TimetableSnapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// The filter the next reload will use.
    pub async fn requested_filter(&self) -> EntryFilter {
        *self.requested.lock().await
    }

    /// Fetch reference data and the entries matching `filter` concurrently,
    /// then rebuild the grid.
    pub async fn load(&self, filter: EntryFilter) -> ConsoleResult<Refresh> {
        let ticket = self.issue(filter).await;
        tracing::debug!(ticket = ticket.value(), ?filter, "Loading timetable");

        let (teachers, subjects, classes, timeslots, entries) = tokio::try_join!(
            self.api.list::<Teachers>(&NoQuery),
            self.api.list::<Subjects>(&NoQuery),
            self.api.list::<Classes>(&NoQuery),
            self.api.list::<TimeSlots>(&NoQuery),
            self.api.list::<Entries>(&filter),
        )?;

        let snapshot = TimetableSnapshot {
            generation: ticket.value(),
            filter,
            teachers,
            subjects,
            classes,
            timeslots,
            entries,
            grid: TimetableGrid::default(),
        };
        Ok(self.publish(ticket, snapshot).await)
    }

    /// Replace the filter and refresh the entries and grid.
    pub async fn set_filter(&self, filter: EntryFilter) -> ConsoleResult<Refresh> {
        let base = self.snapshot().await;
        if !base.is_loaded() {
            return self.load(filter).await;
        }

        let ticket = self.issue(filter).await;
        tracing::debug!(ticket = ticket.value(), ?filter, "Refreshing entries");
        let entries = self.api.list::<Entries>(&filter).await?;

        let snapshot = TimetableSnapshot {
            generation: ticket.value(),
            filter,
            entries,
            grid: TimetableGrid::default(),
            ..(*base).clone()
        };
        Ok(self.publish(ticket, snapshot).await)
    }

    /// Re-fetch everything with the most recently requested filter.
    pub async fn reload(&self) -> ConsoleResult<Refresh> {
        let filter = self.requested_filter().await;
        self.load(filter).await
    }

    /// Refresh the entries with the most recently requested filter.
    pub async fn reload_entries(&self) -> ConsoleResult<Refresh> {
        let filter = self.requested_filter().await;
        self.set_filter(filter).await
    }

    async fn issue(&self, filter: EntryFilter) -> Ticket {
        let mut requested = self.requested.lock().await;
        *requested = filter;
        self.sequencer.issue()
    }

    pub async fn entry_options(&self) -> EntryFormOptions {
        EntryFormOptions {
            snapshot: self.snapshot().await,
        }
    }

    pub fn open_create_entry(&self) -> EntityForm<Entries> {
        EntityForm::blank()
    }

    /// Prefilled form for an entry in the current snapshot.
    pub async fn open_edit_entry(&self, id: DbId) -> Option<EntityForm<Entries>> {
        let snapshot = self.snapshot().await;
        snapshot
            .entries
            .iter()
            .find(|entry| entry.id == id)
            .map(EntityForm::edit)
    }

    /// Submit an entry form and reload entries after a successful save.
    ///
    /// A slot known to be a break is refused before any request is sent.
    pub async fn save_entry(
        &self,
        form: &mut EntityForm<Entries>,
    ) -> ConsoleResult<SaveOutcome<Entries>> {
        if let Some(slot_id) = form.draft().timeslot_id {
            let snapshot = self.snapshot().await;
            if let Some(slot) = snapshot.slot(slot_id).filter(|slot| slot.is_break) {
                let message = format!(
                    "{} on {} is a break and cannot be assigned",
                    slot.period_name.as_deref().unwrap_or("Slot"),
                    slot.day
                );
                form.set_alert(message.clone());
                return Ok(SaveOutcome::Invalid(message));
            }
        }

        let outcome = submit(&self.api, form).await?;
        if matches!(outcome, SaveOutcome::Saved(_)) {
            self.reload_after_change().await;
        }
        Ok(outcome)
    }

    pub async fn delete_entry(
        &self,
        id: DbId,
        confirm: &mut dyn Confirm,
    ) -> ConsoleResult<DeleteOutcome> {
        let outcome = remove::<Entries>(&self.api, id, confirm).await?;
        if outcome == DeleteOutcome::Deleted {
            self.reload_after_change().await;
        }
        Ok(outcome)
    }

    async fn reload_after_change(&self) {
        if let Err(e) = self.reload_entries().await {
            tracing::error!(error = %e, "Failed to reload timetable");
        }
    }

    /// Build the grid and swap the snapshot in, unless a newer refresh was
    /// issued. The check happens under the write lock.
    async fn publish(&self, ticket: Ticket, mut snapshot: TimetableSnapshot) -> Refresh {
        let mut current = self.current.write().await;
        if !self.sequencer.is_current(ticket) || ticket.value() <= current.generation {
            tracing::debug!(ticket = ticket.value(), "Discarding stale timetable response");
            return Refresh::Stale;
        }

        snapshot.grid = TimetableGrid::build(
            &snapshot.timeslots,
            &snapshot.entries,
            &self.days,
            self.row_order,
        )
        .with_export_for(snapshot.filter.class_id);

        tracing::debug!(
            ticket = ticket.value(),
            rows = snapshot.grid.rows.len(),
            entries = snapshot.entries.len(),
            "Timetable refreshed"
        );
        let snapshot = Arc::new(snapshot);
        *current = Arc::clone(&snapshot);
        Refresh::Applied(snapshot)
    }
}
