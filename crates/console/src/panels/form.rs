//! Create/edit forms.
//!
//! A form is blank for create and prefilled for edit. It carries the target
//! id when editing, which decides between `POST` and `PUT` on submit. A
//! rejected save leaves the form open with an alert for the user to correct.

use timetable_core::error::CoreError;
use timetable_core::resource::Resource;
use timetable_core::types::DbId;

pub struct EntityForm<R: Resource> {
    id: Option<DbId>,
    draft: R::Draft,
    alert: Option<String>,
    open: bool,
}

impl<R: Resource> EntityForm<R> {
    pub fn blank() -> Self {
        Self {
            id: None,
            draft: R::Draft::default(),
            alert: None,
            open: true,
        }
    }

    pub fn edit(record: &R::Record) -> Self {
        Self {
            id: Some(R::id(record)),
            draft: R::draft_of(record),
            alert: None,
            open: true,
        }
    }

    /// `"Add Teacher"` or `"Edit Teacher"`.
    pub fn title(&self) -> String {
        match self.id {
            Some(_) => format!("Edit {}", R::NOUN),
            None => format!("Add {}", R::NOUN),
        }
    }

    pub fn id(&self) -> Option<DbId> {
        self.id
    }

    pub fn draft(&self) -> &R::Draft {
        &self.draft
    }

    pub fn set(&mut self, field: &str, value: &str) -> Result<(), CoreError> {
        R::set_field(&mut self.draft, field, value)
    }

    pub fn fields(&self) -> Vec<(&'static str, String)> {
        R::describe(&self.draft)
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    pub fn set_alert(&mut self, message: impl Into<String>) {
        self.alert = Some(message.into());
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn close(&mut self) {
        self.open = false;
        self.alert = None;
    }
}
