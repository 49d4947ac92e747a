//! Entity records, drafts and their [`Resource`](crate::resource::Resource)
//! markers.

pub mod class_group;
pub mod entry;
pub mod subject;
pub mod teacher;
pub mod time_slot;

pub use class_group::{ClassGroup, ClassGroupDraft, Classes};
pub use entry::{Entries, EntryDraft, TimetableEntry};
pub use subject::{Subject, SubjectDraft, Subjects};
pub use teacher::{Teacher, TeacherDraft, Teachers};
pub use time_slot::{TimeSlot, TimeSlotDraft, TimeSlots};
