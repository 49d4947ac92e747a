//! In-process fake of the timetable REST API.
//!
//! Holds records in memory, denormalizes timetable entries, detects teacher
//! and class clashes (409), applies list filters, seeds sample data and
//! serves a stand-in export document. Every request is recorded.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Router;
use serde_json::{json, Value};

use timetable_client::TimetableApi;

const COLLECTIONS: [&str; 5] = ["teachers", "subjects", "classes", "timeslots", "timetable"];

#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
}

#[derive(Default)]
struct Store {
    records: HashMap<&'static str, Vec<Value>>,
    next_id: i64,
    requests: Vec<Recorded>,
    delays: Vec<(String, Duration)>,
    fail_seed: bool,
}

#[derive(Clone)]
pub struct FakeApi {
    pub base_url: String,
    store: Arc<Mutex<Store>>,
}

impl FakeApi {
    /// Bind an ephemeral port and serve in the background.
    pub async fn start() -> Self {
        let store = Arc::new(Mutex::new(Store::default()));
        let app = Router::new().fallback(handle).with_state(Arc::clone(&store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("fake api server");
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
        }
    }

    pub fn client(&self) -> TimetableApi {
        TimetableApi::new(&self.base_url, Duration::from_secs(5)).expect("valid base url")
    }

    /// Store a record directly, without going through HTTP. Returns its id.
    pub fn insert(&self, collection: &str, record: Value) -> i64 {
        self.store.lock().unwrap().insert(collection, record)
    }

    pub fn records(&self, collection: &str) -> Vec<Value> {
        let store = self.store.lock().unwrap();
        key(collection)
            .and_then(|k| store.records.get(k).cloned())
            .unwrap_or_default()
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.store.lock().unwrap().requests.clone()
    }

    /// Requests with `method` whose path starts with `prefix`.
    pub fn count(&self, method: &str, prefix: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path.starts_with(prefix))
            .count()
    }

    pub fn clear_requests(&self) {
        self.store.lock().unwrap().requests.clear();
    }

    /// Hold back responses to requests whose query string contains `needle`.
    pub fn delay_query(&self, needle: &str, delay: Duration) {
        self.store
            .lock()
            .unwrap()
            .delays
            .push((needle.to_string(), delay));
    }

    pub fn fail_seeding(&self) {
        self.store.lock().unwrap().fail_seed = true;
    }

    /// One teacher, subject and class, plus Monday and Tuesday 09:00-09:45
    /// periods and a Monday break. Returns the Monday period id.
    pub fn small_school(&self) -> i64 {
        self.insert(
            "teachers",
            json!({"name": "Dr. John Smith", "email": "john@school.edu",
                   "phone": null, "department": "Mathematics"}),
        );
        self.insert(
            "subjects",
            json!({"name": "Mathematics", "code": "MATH101", "description": null}),
        );
        self.insert(
            "classes",
            json!({"name": "Grade 10", "section": "A", "room": "Room 101", "capacity": 30}),
        );
        let monday = self.insert("timeslots", slot("Monday", "09:00", "09:45", "Period 1", false));
        self.insert("timeslots", slot("Tuesday", "09:00", "09:45", "Period 1", false));
        self.insert("timeslots", slot("Monday", "10:30", "10:45", "Break", true));
        monday
    }
}

pub fn slot(day: &str, start: &str, end: &str, period: &str, is_break: bool) -> Value {
    json!({"day": day, "start_time": start, "end_time": end,
           "period_name": period, "is_break": is_break})
}

pub fn entry(teacher_id: i64, subject_id: i64, class_id: i64, timeslot_id: i64) -> Value {
    json!({"teacher_id": teacher_id, "subject_id": subject_id,
           "class_id": class_id, "timeslot_id": timeslot_id})
}

fn key(collection: &str) -> Option<&'static str> {
    COLLECTIONS.iter().copied().find(|c| *c == collection)
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

impl Store {
    fn insert(&mut self, collection: &str, mut record: Value) -> i64 {
        self.next_id += 1;
        let id = self.next_id;
        record["id"] = json!(id);
        if let Some(k) = key(collection) {
            self.records.entry(k).or_default().push(record);
        }
        id
    }

    fn find(&self, collection: &str, id: i64) -> Option<&Value> {
        self.records
            .get(collection)?
            .iter()
            .find(|r| r["id"].as_i64() == Some(id))
    }

    fn list(&self, collection: &str) -> Vec<Value> {
        self.records.get(collection).cloned().unwrap_or_default()
    }

    fn present(&self, collection: &str, record: &Value) -> Value {
        if collection != "timetable" {
            return record.clone();
        }
        let lookup = |c: &str, field: &str| {
            record[field]
                .as_i64()
                .and_then(|id| self.find(c, id))
                .cloned()
                .unwrap_or(Value::Null)
        };
        let teacher = lookup("teachers", "teacher_id");
        let subject = lookup("subjects", "subject_id");
        let class = lookup("classes", "class_id");
        let slot = lookup("timeslots", "timeslot_id");

        let class_name = match class["section"].as_str() {
            Some(section) => format!("{} {}", class["name"].as_str().unwrap_or(""), section),
            None => class["name"].as_str().unwrap_or("").to_string(),
        };
        json!({
            "id": record["id"],
            "teacher_id": record["teacher_id"],
            "teacher_name": teacher["name"],
            "subject_id": record["subject_id"],
            "subject_name": subject["name"],
            "subject_code": subject["code"],
            "class_id": record["class_id"],
            "class_name": class_name,
            "room": class["room"],
            "timeslot_id": record["timeslot_id"],
            "day": slot["day"],
            "start_time": slot["start_time"],
            "end_time": slot["end_time"],
            "period_name": slot["period_name"],
        })
    }

    fn clash(&self, body: &Value, exclude: Option<i64>) -> Option<Value> {
        let others: Vec<&Value> = self
            .records
            .get("timetable")
            .map(|entries| {
                entries
                    .iter()
                    .filter(|e| e["id"].as_i64() != exclude)
                    .filter(|e| e["timeslot_id"] == body["timeslot_id"])
                    .collect()
            })
            .unwrap_or_default();

        if others.iter().any(|e| e["teacher_id"] == body["teacher_id"]) {
            return Some(json!({"clash": true, "type": "teacher",
                "message": "Teacher is already assigned at this time slot"}));
        }
        if others.iter().any(|e| e["class_id"] == body["class_id"]) {
            return Some(json!({"clash": true, "type": "room",
                "message": "This class already has a subject scheduled at this time slot"}));
        }
        None
    }

    fn filtered_entries(&self, query: Option<&str>) -> Vec<Value> {
        let params: HashMap<&str, &str> = query
            .unwrap_or("")
            .split('&')
            .filter_map(|pair| pair.split_once('='))
            .collect();

        self.list("timetable")
            .iter()
            .map(|e| self.present("timetable", e))
            .filter(|e| match params.get("class_id") {
                Some(v) => e["class_id"].to_string() == *v,
                None => true,
            })
            .filter(|e| match params.get("teacher_id") {
                Some(v) => e["teacher_id"].to_string() == *v,
                None => true,
            })
            .filter(|e| match params.get("day") {
                Some(v) => e["day"].as_str() == Some(*v),
                None => true,
            })
            .collect()
    }

    fn seed(&mut self) -> Response {
        if self.fail_seed {
            return (StatusCode::INTERNAL_SERVER_ERROR, "database is locked").into_response();
        }
        for (name, email, dept) in [
            ("Dr. John Smith", "john@school.edu", "Mathematics"),
            ("Prof. Sarah Johnson", "sarah@school.edu", "Science"),
            ("Ms. Emily Davis", "emily@school.edu", "English"),
            ("Mr. Michael Brown", "michael@school.edu", "History"),
        ] {
            self.insert(
                "teachers",
                json!({"name": name, "email": email, "phone": null, "department": dept}),
            );
        }
        for (name, code) in [
            ("Mathematics", "MATH101"),
            ("Physics", "PHY101"),
            ("Chemistry", "CHEM101"),
            ("English", "ENG101"),
            ("History", "HIST101"),
        ] {
            self.insert(
                "subjects",
                json!({"name": name, "code": code, "description": null}),
            );
        }
        for (name, section, room, capacity) in [
            ("Grade 10", "A", "Room 101", 30),
            ("Grade 10", "B", "Room 102", 30),
            ("Grade 11", "A", "Room 201", 35),
        ] {
            self.insert(
                "classes",
                json!({"name": name, "section": section, "room": room, "capacity": capacity}),
            );
        }
        for day in ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"] {
            for (start, end, period, is_break) in [
                ("09:00", "10:00", "Period 1", false),
                ("10:00", "11:00", "Period 2", false),
                ("11:00", "11:15", "Break", true),
                ("11:15", "12:15", "Period 3", false),
                ("12:15", "13:15", "Period 4", false),
                ("13:15", "14:00", "Lunch", true),
                ("14:00", "15:00", "Period 5", false),
            ] {
                self.insert("timeslots", slot(day, start, end, period, is_break));
            }
        }
        json_response(
            StatusCode::CREATED,
            json!({"message": "Sample data initialized successfully"}),
        )
    }

    fn route(&mut self, method: &Method, path: &str, query: Option<&str>, body: &[u8]) -> Response {
        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
        match (method.as_str(), segments.as_slice()) {
            ("POST", ["api", "init-sample-data"]) => self.seed(),
            ("GET", ["api", "timetable", "export", id]) => {
                match id.parse::<i64>().ok().and_then(|id| self.find("classes", id)) {
                    Some(class) => (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "application/pdf")],
                        format!("%PDF-1.4 {}", class["name"].as_str().unwrap_or("")).into_bytes(),
                    )
                        .into_response(),
                    None => not_found(),
                }
            }
            ("GET", ["api", "timetable"]) => {
                json_response(StatusCode::OK, Value::Array(self.filtered_entries(query)))
            }
            (_, ["api", collection]) => {
                let Some(collection) = key(collection) else {
                    return not_found();
                };
                match method.as_str() {
                    "GET" => {
                        let records = self
                            .list(collection)
                            .iter()
                            .map(|r| self.present(collection, r))
                            .collect();
                        json_response(StatusCode::OK, Value::Array(records))
                    }
                    "POST" => {
                        let Ok(body) = serde_json::from_slice::<Value>(body) else {
                            return (StatusCode::BAD_REQUEST, "invalid json").into_response();
                        };
                        if collection == "timetable" {
                            if let Some(clash) = self.clash(&body, None) {
                                return json_response(StatusCode::CONFLICT, clash);
                            }
                        }
                        let id = self.insert(collection, body);
                        let stored = self.find(collection, id).cloned().unwrap_or(Value::Null);
                        json_response(StatusCode::CREATED, self.present(collection, &stored))
                    }
                    _ => (StatusCode::METHOD_NOT_ALLOWED, "").into_response(),
                }
            }
            (_, ["api", collection, id]) => {
                let (Some(collection), Ok(id)) = (key(collection), id.parse::<i64>()) else {
                    return not_found();
                };
                if self.find(collection, id).is_none() {
                    return not_found();
                }
                match method.as_str() {
                    "GET" => {
                        let stored = self.find(collection, id).cloned().unwrap_or(Value::Null);
                        json_response(StatusCode::OK, self.present(collection, &stored))
                    }
                    "PUT" => {
                        let Ok(mut body) = serde_json::from_slice::<Value>(body) else {
                            return (StatusCode::BAD_REQUEST, "invalid json").into_response();
                        };
                        if collection == "timetable" {
                            if let Some(clash) = self.clash(&body, Some(id)) {
                                return json_response(StatusCode::CONFLICT, clash);
                            }
                        }
                        body["id"] = json!(id);
                        let records = self.records.entry(collection).or_default();
                        if let Some(slot) = records.iter_mut().find(|r| r["id"].as_i64() == Some(id)) {
                            *slot = body.clone();
                        }
                        json_response(StatusCode::OK, self.present(collection, &body))
                    }
                    "DELETE" => {
                        if let Some(records) = self.records.get_mut(collection) {
                            records.retain(|r| r["id"].as_i64() != Some(id));
                        }
                        StatusCode::NO_CONTENT.into_response()
                    }
                    _ => (StatusCode::METHOD_NOT_ALLOWED, "").into_response(),
                }
            }
            _ => not_found(),
        }
    }
}

fn json_response(status: StatusCode, body: Value) -> Response {
    (status, axum::Json(body)).into_response()
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "not found").into_response()
}

async fn handle(
    State(store): State<Arc<Mutex<Store>>>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let delay = {
        let mut store = store.lock().unwrap();
        store.requests.push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
        });
        uri.query().and_then(|query| {
            store
                .delays
                .iter()
                .find(|(needle, _)| query.contains(needle.as_str()))
                .map(|(_, delay)| *delay)
        })
    };

    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }

    let mut store = store.lock().unwrap();
    store.route(&method, uri.path(), uri.query(), &body)
}

// ---------------------------------------------------------------------------
// Confirmation double
// ---------------------------------------------------------------------------

/// Gives a fixed answer and remembers the questions asked.
pub struct Answer {
    reply: bool,
    pub asked: Vec<String>,
}

impl Answer {
    pub fn yes() -> Self {
        Self {
            reply: true,
            asked: Vec::new(),
        }
    }

    pub fn no() -> Self {
        Self {
            reply: false,
            asked: Vec::new(),
        }
    }
}

impl timetable_console::prompt::Confirm for Answer {
    fn confirm(&mut self, question: &str) -> bool {
        self.asked.push(question.to_string());
        self.reply
    }
}
