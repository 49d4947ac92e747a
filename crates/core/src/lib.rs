//! Domain types and pure logic for the timetable console.
//!
//! This crate has no internal dependencies and performs no I/O: entity
//! models and drafts, the weekday enumeration, entry filter composition and
//! the day × period grid builder all live here so they can be tested in
//! isolation from the REST client and the console.

pub mod clock;
pub mod error;
pub mod filter;
pub mod grid;
pub mod models;
pub mod resource;
pub mod types;
pub mod validation;
pub mod weekday;
