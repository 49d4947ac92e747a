//! Dashboard counts and sample-data seeding.

use timetable_client::TimetableApi;
use timetable_core::filter::EntryFilter;
use timetable_core::models::{Classes, Entries, Subjects, Teachers};
use timetable_core::resource::NoQuery;

use crate::error::ConsoleResult;
use crate::prompt::Confirm;

const SEED_QUESTION: &str = "This will initialize sample data. Continue?";
const SEED_FAILED: &str = "Error initializing sample data";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DashboardCounts {
    pub teachers: usize,
    pub subjects: usize,
    pub classes: usize,
    pub entries: usize,
}

impl DashboardCounts {
    /// Fetch the four collections concurrently and count them.
    pub async fn load(api: &TimetableApi) -> ConsoleResult<Self> {
        let unfiltered = EntryFilter::default();
        let (teachers, subjects, classes, entries) = tokio::try_join!(
            api.list::<Teachers>(&NoQuery),
            api.list::<Subjects>(&NoQuery),
            api.list::<Classes>(&NoQuery),
            api.list::<Entries>(&unfiltered),
        )?;

        Ok(Self {
            teachers: teachers.len(),
            subjects: subjects.len(),
            classes: classes.len(),
            entries: entries.len(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    /// Server message on success.
    Seeded(String),
    Declined,
    /// Generic alert text; the cause is logged.
    Failed(String),
}

/// Confirm, then ask the server to load its sample data set.
pub async fn seed(api: &TimetableApi, confirm: &mut dyn Confirm) -> SeedOutcome {
    if !confirm.confirm(SEED_QUESTION) {
        return SeedOutcome::Declined;
    }

    match api.seed_sample_data().await {
        Ok(message) => {
            tracing::info!(%message, "Sample data initialized");
            SeedOutcome::Seeded(message)
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize sample data");
            SeedOutcome::Failed(SEED_FAILED.to_string())
        }
    }
}
