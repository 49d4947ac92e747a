/// Primary keys assigned by the timetable API (integer serials).
pub type DbId = i64;
