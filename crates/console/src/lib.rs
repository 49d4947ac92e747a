pub mod config;
pub mod dashboard;
pub mod error;
pub mod export;
pub mod panels;
pub mod prompt;
pub mod render;
pub mod shell;
pub mod timetable;
