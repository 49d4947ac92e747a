//! Wire-level tests for [`TimetableApi`] against a scripted server.

mod common;

use assert_matches::assert_matches;
use serde_json::json;

use timetable_client::{ApiError, ClashKind};
use timetable_core::filter::EntryFilter;
use timetable_core::models::{Entries, EntryDraft, TeacherDraft, Teachers, TimeSlots};
use timetable_core::resource::NoQuery;
use timetable_core::weekday::Weekday;

use common::ScriptedApi;

fn entry_json(id: i64, timeslot_id: i64) -> serde_json::Value {
    json!({
        "id": id, "teacher_id": 1, "teacher_name": "Dr. John Smith",
        "subject_id": 1, "subject_name": "Mathematics", "subject_code": "MATH101",
        "class_id": 2, "class_name": "Grade 10 B", "room": "Room 102",
        "timeslot_id": timeslot_id, "day": "Monday",
        "start_time": "09:00", "end_time": "10:00", "period_name": "Period 1"
    })
}

// ---------------------------------------------------------------------------
// Listing and filters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unfiltered_entry_list_sends_no_query_string() {
    let server = ScriptedApi::start().await;
    server.respond("GET", "/api/timetable", 200, json!([entry_json(1, 1)]));

    let entries = server
        .client()
        .list::<Entries>(&EntryFilter::default())
        .await
        .unwrap();

    assert_eq!(entries.len(), 1);
    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query, None);
}

#[tokio::test]
async fn filtered_entry_list_sends_only_set_parameters() {
    let server = ScriptedApi::start().await;
    server.respond("GET", "/api/timetable", 200, json!([]));

    let filter = EntryFilter {
        class_id: Some(2),
        teacher_id: None,
        day: Some(Weekday::Tuesday),
    };
    server.client().list::<Entries>(&filter).await.unwrap();

    let query = server.requests()[0].query.clone().unwrap();
    assert_eq!(query, "class_id=2&day=Tuesday");
}

#[tokio::test]
async fn time_slots_decode_from_wire_shape() {
    let server = ScriptedApi::start().await;
    server.respond(
        "GET",
        "/api/timeslots",
        200,
        json!([
            {"id": 1, "day": "Monday", "start_time": "09:00", "end_time": "10:00",
             "period_name": "Period 1", "is_break": false},
            {"id": 2, "day": "Monday", "start_time": "11:00", "end_time": "11:15",
             "period_name": "Break", "is_break": true}
        ]),
    );

    let slots = server.client().list::<TimeSlots>(&NoQuery).await.unwrap();
    assert_eq!(slots.len(), 2);
    assert!(slots[1].is_break);
}

#[tokio::test]
async fn entry_missing_display_field_is_a_schema_error() {
    let server = ScriptedApi::start().await;
    let mut broken = entry_json(1, 1);
    broken.as_object_mut().unwrap().remove("teacher_name");
    server.respond("GET", "/api/timetable", 200, json!([broken]));

    let err = server
        .client()
        .list::<Entries>(&EntryFilter::default())
        .await
        .unwrap_err();

    assert_matches!(&err, ApiError::Schema { path, .. } if path == "/api/timetable");
    assert!(err.to_string().contains("teacher_name"));
}

// ---------------------------------------------------------------------------
// Create / update / delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_posts_draft_body() {
    let server = ScriptedApi::start().await;
    server.respond(
        "POST",
        "/api/teachers",
        201,
        json!({"id": 9, "name": "Ms. Emily Davis", "email": null, "phone": null,
               "department": "English"}),
    );

    let draft = TeacherDraft {
        name: "Ms. Emily Davis".into(),
        department: Some("English".into()),
        ..Default::default()
    };
    let created = server.client().create::<Teachers>(&draft).await.unwrap();
    assert_eq!(created.id, 9);

    let sent: serde_json::Value = serde_json::from_str(&server.requests()[0].body).unwrap();
    assert_eq!(sent["name"], "Ms. Emily Davis");
    assert!(sent["email"].is_null());
}

#[tokio::test]
async fn update_puts_to_item_path() {
    let server = ScriptedApi::start().await;
    server.respond("PUT", "/api/timetable/4", 200, entry_json(4, 2));

    let draft = EntryDraft {
        teacher_id: Some(1),
        subject_id: Some(1),
        class_id: Some(2),
        timeslot_id: Some(2),
    };
    let updated = server.client().update::<Entries>(4, &draft).await.unwrap();
    assert_eq!(updated.timeslot_id, 2);
    assert_eq!(server.requests()[0].method, "PUT");
}

#[tokio::test]
async fn conflict_surfaces_server_message() {
    let server = ScriptedApi::start().await;
    server.respond(
        "POST",
        "/api/timetable",
        409,
        json!({"clash": true, "type": "teacher",
               "message": "Teacher is already assigned at this time slot"}),
    );

    let err = server
        .client()
        .create::<Entries>(&EntryDraft::default())
        .await
        .unwrap_err();

    assert_matches!(
        &err,
        ApiError::Conflict { kind: Some(ClashKind::Teacher), .. }
    );
    assert_eq!(
        err.conflict_message(),
        Some("Teacher is already assigned at this time slot")
    );
}

#[tokio::test]
async fn conflict_without_json_body_keeps_raw_text() {
    let server = ScriptedApi::start().await;
    server.respond_raw(
        "PUT",
        "/api/timetable/1",
        409,
        "text/plain",
        b"slot taken".to_vec(),
    );

    let err = server
        .client()
        .update::<Entries>(1, &EntryDraft::default())
        .await
        .unwrap_err();
    assert_eq!(err.conflict_message(), Some("slot taken"));
}

#[tokio::test]
async fn other_failures_carry_status_and_body() {
    let server = ScriptedApi::start().await;
    server.respond("DELETE", "/api/subjects/3", 500, json!({"error": "boom"}));

    let err = server
        .client()
        .delete::<timetable_core::models::Subjects>(3)
        .await
        .unwrap_err();
    assert_matches!(err, ApiError::Status { status: 500, .. });
}

#[tokio::test]
async fn missing_record_is_a_plain_status_error() {
    let server = ScriptedApi::start().await;
    let err = server.client().delete::<Teachers>(42).await.unwrap_err();
    assert_matches!(err, ApiError::Status { status: 404, .. });
    assert!(err.conflict_message().is_none());
}

#[tokio::test]
async fn delete_accepts_empty_no_content() {
    let server = ScriptedApi::start().await;
    server.respond_raw("DELETE", "/api/teachers/5", 204, "text/plain", Vec::new());

    server.client().delete::<Teachers>(5).await.unwrap();
    assert_eq!(server.requests()[0].path, "/api/teachers/5");
}

// ---------------------------------------------------------------------------
// Seeding and export
// ---------------------------------------------------------------------------

#[tokio::test]
async fn seeding_returns_server_message() {
    let server = ScriptedApi::start().await;
    server.respond(
        "POST",
        "/api/init-sample-data",
        201,
        json!({"message": "Sample data initialized successfully"}),
    );

    let message = server.client().seed_sample_data().await.unwrap();
    assert_eq!(message, "Sample data initialized successfully");
}

#[tokio::test]
async fn export_downloads_raw_bytes() {
    let server = ScriptedApi::start().await;
    server.respond_raw(
        "GET",
        "/api/timetable/export/2",
        200,
        "application/pdf",
        b"%PDF-1.4 fake".to_vec(),
    );

    let bytes = server.client().download_export(2).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn unreachable_server_is_a_request_error() {
    let api = timetable_client::TimetableApi::new(
        "http://127.0.0.1:9",
        std::time::Duration::from_secs(2),
    )
    .unwrap();
    let err = api.list::<Teachers>(&NoQuery).await.unwrap_err();
    assert_matches!(err, ApiError::Request(_));
}
