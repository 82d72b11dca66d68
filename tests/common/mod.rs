#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, ConnectOptions, Database, DatabaseConnection, Set};
use serde_json::Value;
use tower::ServiceExt;

use checkwatch_server::db::entities::{check, project};
use checkwatch_server::db::enums::CheckStatus;
use checkwatch_server::db::schema::create_schema;
use checkwatch_server::db::services::{self, NewCheck};
use checkwatch_server::web::create_axum_router;

pub const API_KEY: &str = "XXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX";
pub const OTHER_API_KEY: &str = "YYYYYYYYYYYYYYYYYYYYYYYYYYYYYYYY";

pub struct TestApp {
    pub db: DatabaseConnection,
    pub router: Router,
    pub project: project::Model,
    pub other_project: project::Model,
}

/// In-memory SQLite pinned to one connection so every query sees the same database.
pub async fn setup() -> TestApp {
    let mut opt = ConnectOptions::new("sqlite::memory:".to_owned());
    opt.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    create_schema(&db).await.unwrap();

    let project = services::create_project(&db, "Alices Project", API_KEY).await.unwrap();
    let other_project = services::create_project(&db, "Bobs Project", OTHER_API_KEY)
        .await
        .unwrap();

    let router = create_axum_router(db.clone());

    TestApp {
        db,
        router,
        project,
        other_project,
    }
}

impl TestApp {
    pub async fn check(&self, name: &str, tags: &str, status: CheckStatus) -> check::Model {
        self.check_in(self.project.id, name, tags, status).await
    }

    pub async fn check_in(
        &self,
        project_id: i32,
        name: &str,
        tags: &str,
        status: CheckStatus,
    ) -> check::Model {
        services::create_check(
            &self.db,
            project_id,
            NewCheck {
                name: name.to_string(),
                tags: tags.to_string(),
                status,
            },
        )
        .await
        .unwrap()
    }

    /// Sets the timing fields that pause and resume are expected to clear.
    pub async fn mark_running(&self, check: &check::Model, at: DateTime<Utc>) -> check::Model {
        let mut active: check::ActiveModel = check.clone().into();
        active.last_ping = Set(Some(at));
        active.last_start = Set(Some(at));
        active.alert_after = Set(Some(at + chrono::Duration::hours(1)));
        active.update(&self.db).await.unwrap()
    }

    pub async fn reload(&self, check: &check::Model) -> Option<check::Model> {
        services::find_check_by_code(&self.db, check.code).await.unwrap()
    }

    /// Sends a request with the api key in the `X-Api-Key` header.
    pub async fn send(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        self.send_with_key(method, uri, Some(API_KEY), body).await
    }

    pub async fn send_with_key(
        &self,
        method: Method,
        uri: &str,
        api_key: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(key) = api_key {
            builder = builder.header("x-api-key", key);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.raw(request).await
    }

    pub async fn raw(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }
}
