//! REST client for the timetable API.
//!
//! Provides typed CRUD over the five resource collections, the sample-data
//! and export endpoints, an error taxonomy that singles out scheduling
//! conflicts (HTTP 409), and a request sequencer used to discard stale
//! responses when refreshes overlap.

pub mod api;
pub mod sequence;

pub use api::{ApiError, ClashKind, TimetableApi};
pub use sequence::{RequestSequencer, Ticket};
