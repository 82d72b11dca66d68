mod common;

use axum::http::{Method, StatusCode};
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::{json, Value};
use uuid::Uuid;

use checkwatch_server::db::entities::prelude::*;
use checkwatch_server::db::enums::CheckStatus;
use checkwatch_server::db::services::{self, NewMaintenanceWindow};

use common::{setup, TestApp};

const URL: &str = "/api/v1/maintenance/";

fn ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn window_body(title: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Value {
    json!({"title": title, "start_time": ts(start), "end_time": ts(end)})
}

async fn seed_window(app: &TestApp, project_id: i32, start: DateTime<Utc>, end: DateTime<Utc>) {
    services::create_window(
        &app.db,
        project_id,
        NewMaintenanceWindow {
            title: Some("Seeded".to_string()),
            start_time: start,
            end_time: end,
        },
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn create_returns_the_serialized_window() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);
    let end = start + Duration::hours(2);

    let (status, body) = app
        .send(Method::POST, URL, Some(window_body("Database upgrade", start, end)))
        .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["title"], "Database upgrade");
    assert!(Uuid::parse_str(body["uuid"].as_str().unwrap()).is_ok());
    let start_back: DateTime<Utc> = body["start_time"].as_str().unwrap().parse().unwrap();
    assert_eq!(start_back.timestamp(), start.timestamp());
    assert!(body.get("created").is_some());
    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn api_key_may_travel_in_the_body() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);
    let mut body = window_body("Body key", start, start + Duration::hours(1));
    body["api_key"] = json!(common::API_KEY);

    let (status, _) = app.send_with_key(Method::POST, URL, None, Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn invalid_windows_are_rejected() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);

    let cases = [
        (window_body("", start, start + Duration::hours(1)), "title is required"),
        (
            window_body(&"x".repeat(101), start, start + Duration::hours(1)),
            "title is too long (max 100 characters)",
        ),
        (window_body("Backwards", start, start - Duration::hours(1)), "start_time must be before end_time"),
        (window_body("Empty", start, start), "start_time must be before end_time"),
        (
            window_body("Too long", start, start + Duration::days(7) + Duration::seconds(1)),
            "maintenance window cannot be longer than 7 days",
        ),
        (
            json!({"title": "Bad", "start_time": "tomorrow", "end_time": ts(start)}),
            "invalid start_time",
        ),
        (json!({"title": "Bad", "start_time": ts(start)}), "invalid end_time"),
    ];

    for (payload, message) in cases {
        let (status, body) = app.send(Method::POST, URL, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(body["error"], message);
    }
    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn exactly_seven_days_is_allowed() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);
    let (status, _) = app
        .send(Method::POST, URL, Some(window_body("Week", start, start + Duration::days(7))))
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn overlapping_windows_are_rejected_but_adjacent_ones_are_not() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);
    let end = start + Duration::hours(2);

    let (status, _) = app.send(Method::POST, URL, Some(window_body("First", start, end))).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = app.send(Method::POST, URL, Some(window_body("Same", start, end))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "overlapping maintenance window");

    let (status, _) = app
        .send(
            Method::POST,
            URL,
            Some(window_body("Partial", start + Duration::hours(1), end + Duration::hours(1))),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::POST, URL, Some(window_body("After", end, end + Duration::hours(1))))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    // Another project's windows never conflict.
    let (status, _) = app
        .send_with_key(
            Method::POST,
            URL,
            Some(common::OTHER_API_KEY),
            Some(window_body("Theirs", start, end)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn fifty_first_window_is_forbidden() {
    let app = setup().await;
    let base = Utc::now() + Duration::days(1);
    for i in 0..50 {
        let start = base + Duration::hours(i * 2);
        seed_window(&app, app.project.id, start, start + Duration::hours(1)).await;
    }

    let start = base + Duration::hours(200);
    let (status, body) = app
        .send(Method::POST, URL, Some(window_body("One too many", start, start + Duration::hours(1))))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "too many maintenance windows (max 50)");
}

#[tokio::test]
async fn list_is_ordered_and_filters_active_windows() {
    let app = setup().await;
    let now = Utc::now();
    let later = now + Duration::days(1);
    seed_window(&app, app.project.id, later, later + Duration::hours(1)).await;
    seed_window(&app, app.project.id, now - Duration::hours(1), now + Duration::hours(1)).await;
    seed_window(&app, app.other_project.id, now - Duration::hours(1), now + Duration::hours(1))
        .await;

    let (status, body) = app.send(Method::GET, URL, None).await;
    assert_eq!(status, StatusCode::OK);
    let windows = body["windows"].as_array().unwrap();
    assert_eq!(windows.len(), 2);
    let first: DateTime<Utc> = windows[0]["start_time"].as_str().unwrap().parse().unwrap();
    let second: DateTime<Utc> = windows[1]["start_time"].as_str().unwrap().parse().unwrap();
    assert!(first < second);

    let (status, body) = app.send(Method::GET, &format!("{URL}?active=true"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["windows"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn delete_respects_ownership() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);
    let (_, created) = app
        .send_with_key(
            Method::POST,
            URL,
            Some(common::OTHER_API_KEY),
            Some(window_body("Theirs", start, start + Duration::hours(1))),
        )
        .await;
    let code = created["uuid"].as_str().unwrap().to_string();

    let (status, body) = app.send(Method::DELETE, &format!("{URL}{code}/"), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "maintenance window does not belong to this project");

    let (status, _) = app.send(Method::DELETE, &format!("{URL}{}/", Uuid::new_v4()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send_with_key(Method::DELETE, &format!("{URL}{code}/"), Some(common::OTHER_API_KEY), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn active_window_puts_checks_into_maintenance() {
    let app = setup().await;
    let down = app.check("down", "", CheckStatus::Down).await;
    let paused = app.check("paused", "", CheckStatus::Paused).await;
    let new = app.check("new", "", CheckStatus::New).await;

    let (_, body) = app.send(Method::GET, &format!("/api/v1/checks/{}/", down.code), None).await;
    assert_eq!(body["status"], "down");
    assert_eq!(body["in_maintenance"], false);

    let now = Utc::now();
    seed_window(&app, app.project.id, now - Duration::minutes(5), now + Duration::hours(1)).await;

    let (status, body) = app.send(Method::GET, "/api/v1/checks/", None).await;
    assert_eq!(status, StatusCode::OK);
    let by_uuid = |code: Uuid| {
        body["checks"]
            .as_array()
            .unwrap()
            .iter()
            .find(|c| c["uuid"] == code.to_string())
            .cloned()
            .unwrap()
    };

    let down_json = by_uuid(down.code);
    assert_eq!(down_json["status"], "maintenance");
    assert_eq!(down_json["in_maintenance"], true);

    let paused_json = by_uuid(paused.code);
    assert_eq!(paused_json["status"], "paused");
    assert_eq!(paused_json["in_maintenance"], true);

    let new_json = by_uuid(new.code);
    assert_eq!(new_json["status"], "new");
    assert_eq!(new_json["in_maintenance"], true);

    // Stored status is never rewritten.
    assert_eq!(app.reload(&down).await.unwrap().status, CheckStatus::Down);
}

#[tokio::test]
async fn deleting_a_project_removes_its_windows_and_checks() {
    let app = setup().await;
    let now = Utc::now();
    seed_window(&app, app.project.id, now, now + Duration::hours(1)).await;
    seed_window(&app, app.other_project.id, now, now + Duration::hours(1)).await;
    app.check("mine", "", CheckStatus::Up).await;

    services::delete_project(&app.db, app.project.id).await.unwrap();

    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 1);
    assert_eq!(Check::find().count(&app.db).await.unwrap(), 0);
    assert_eq!(Project::find().count(&app.db).await.unwrap(), 1);
}

#[tokio::test]
async fn wrongly_typed_fields_are_bad_requests() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);

    let cases = [
        (
            json!({"title": 123, "start_time": ts(start), "end_time": ts(start + Duration::hours(1))}),
            "title must be a string",
        ),
        (
            json!({"title": "Deploy", "start_time": 1_760_000_000, "end_time": ts(start)}),
            "invalid start_time",
        ),
        (json!({"start_time": "garbage"}), "title is required"),
        (json!(["not", "an", "object"]), "title is required"),
    ];

    for (payload, message) in cases {
        let (status, body) = app.send(Method::POST, URL, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{message}");
        assert_eq!(body["error"], message);
    }
    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 0);
}

#[tokio::test]
async fn creating_for_an_unknown_project_writes_nothing() {
    let app = setup().await;
    let start = Utc::now() + Duration::hours(1);

    let result = services::create_window(
        &app.db,
        app.other_project.id + 100,
        NewMaintenanceWindow {
            title: Some("Orphan".to_string()),
            start_time: start,
            end_time: start + Duration::hours(1),
        },
    )
    .await;

    assert!(result.is_err());
    assert_eq!(MaintenanceWindow::find().count(&app.db).await.unwrap(), 0);
}
