//! CRUD panels for the five collections.
//!
//! A [`Panel`] owns the cached list of one collection and the query it was
//! loaded with. Saving and deleting go through [`submit`] and [`remove`],
//! which the timetable view shares for entries.

pub mod form;

use std::sync::Arc;

use timetable_client::{ApiError, TimetableApi};
use timetable_core::error::CoreError;
use timetable_core::resource::Resource;
use timetable_core::types::DbId;
use timetable_core::validation::validate_draft;

use crate::error::ConsoleResult;
use crate::prompt::Confirm;

pub use form::EntityForm;

/// Result of submitting a form.
#[derive(Debug)]
pub enum SaveOutcome<R: Resource> {
    /// Stored by the server; the form is closed.
    Saved(R::Record),
    /// Rejected locally before any request; the form stays open.
    Invalid(String),
    /// Rejected by the server with 409; the form stays open.
    Conflict(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    Declined,
}

/// Validate the form and send it: `PUT` when it carries an id, `POST`
/// otherwise.
///
/// Validation failures and conflicts are returned as outcomes with the
/// message set as the form's alert. Any other failure is an error and the
/// form is left open.
pub async fn submit<R: Resource>(
    api: &TimetableApi,
    form: &mut EntityForm<R>,
) -> ConsoleResult<SaveOutcome<R>> {
    if let Err(e) = validate_draft::<R>(form.draft()) {
        return match e {
            CoreError::Validation(message) => {
                form.set_alert(message.clone());
                Ok(SaveOutcome::Invalid(message))
            }
            other => Err(other.into()),
        };
    }

    let result = match form.id() {
        Some(id) => api.update::<R>(id, form.draft()).await,
        None => api.create::<R>(form.draft()).await,
    };

    match result {
        Ok(record) => {
            tracing::info!(
                collection = R::COLLECTION,
                id = R::id(&record),
                "Saved {}",
                R::NOUN.to_lowercase()
            );
            form.close();
            Ok(SaveOutcome::Saved(record))
        }
        Err(ApiError::Conflict { message, kind }) => {
            tracing::warn!(collection = R::COLLECTION, ?kind, %message, "Save rejected");
            form.set_alert(message.clone());
            Ok(SaveOutcome::Conflict(message))
        }
        Err(e) => Err(e.into()),
    }
}

/// Ask for confirmation, then delete. Declining sends nothing.
pub async fn remove<R: Resource>(
    api: &TimetableApi,
    id: DbId,
    confirm: &mut dyn Confirm,
) -> ConsoleResult<DeleteOutcome> {
    let question = format!(
        "Are you sure you want to delete this {}?",
        R::NOUN.to_lowercase()
    );
    if !confirm.confirm(&question) {
        return Ok(DeleteOutcome::Declined);
    }

    api.delete::<R>(id).await?;
    tracing::info!(collection = R::COLLECTION, id, "Deleted");
    Ok(DeleteOutcome::Deleted)
}

/// Cached list of one collection.
pub struct Panel<R: Resource> {
    api: TimetableApi,
    query: R::Query,
    records: Arc<Vec<R::Record>>,
}

impl<R: Resource> Panel<R> {
    pub fn new(api: TimetableApi) -> Self {
        Self {
            api,
            query: R::Query::default(),
            records: Arc::new(Vec::new()),
        }
    }

    /// Query used by the next [`Panel::load`].
    pub fn set_query(&mut self, query: R::Query) {
        self.query = query;
    }

    pub fn query(&self) -> &R::Query {
        &self.query
    }

    pub fn records(&self) -> &[R::Record] {
        &self.records
    }

    pub fn snapshot(&self) -> Arc<Vec<R::Record>> {
        Arc::clone(&self.records)
    }

    pub fn find(&self, id: DbId) -> Option<&R::Record> {
        self.records.iter().find(|record| R::id(record) == id)
    }

    /// Fetch the collection and replace the cache.
    pub async fn load(&mut self) -> ConsoleResult<Arc<Vec<R::Record>>> {
        let records = self.api.list::<R>(&self.query).await?;
        tracing::debug!(collection = R::COLLECTION, count = records.len(), "Loaded");
        self.records = Arc::new(records);
        Ok(self.snapshot())
    }

    pub fn open_create(&self) -> EntityForm<R> {
        EntityForm::blank()
    }

    /// Prefilled form for a cached record; `None` when the id is not in the
    /// cache.
    pub fn open_edit(&self, id: DbId) -> Option<EntityForm<R>> {
        self.find(id).map(EntityForm::edit)
    }

    /// Submit the form and reload the list after a successful save.
    pub async fn save(&mut self, form: &mut EntityForm<R>) -> ConsoleResult<SaveOutcome<R>> {
        let outcome = submit(&self.api, form).await?;
        if matches!(outcome, SaveOutcome::Saved(_)) {
            self.reload().await;
        }
        Ok(outcome)
    }

    /// Confirm and delete, then reload the list.
    pub async fn delete(
        &mut self,
        id: DbId,
        confirm: &mut dyn Confirm,
    ) -> ConsoleResult<DeleteOutcome> {
        let outcome = remove::<R>(&self.api, id, confirm).await?;
        if outcome == DeleteOutcome::Deleted {
            self.reload().await;
        }
        Ok(outcome)
    }

    async fn reload(&mut self) {
        if let Err(e) = self.load().await {
            tracing::error!(collection = R::COLLECTION, error = %e, "Failed to reload list");
        }
    }
}
