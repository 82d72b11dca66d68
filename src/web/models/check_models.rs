use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::checks::status::{EffectiveStatus, StatusView};
use crate::db::entities::check;

#[derive(Debug, Clone, Serialize)]
pub struct CheckDetails {
    pub uuid: Uuid,
    pub name: String,
    pub tags: Vec<String>,
    pub status: EffectiveStatus,
    pub in_maintenance: bool,
    pub started: bool,
    pub last_ping: Option<DateTime<Utc>>,
    pub alert_after: Option<DateTime<Utc>>,
}

impl CheckDetails {
    pub fn from_model(check: check::Model, active_window_exists: bool) -> Self {
        let view = StatusView::of(&check, active_window_exists);
        CheckDetails {
            uuid: check.code,
            tags: check.clean_tags(),
            name: check.name,
            status: view.status,
            in_maintenance: view.in_maintenance,
            started: check.last_start.is_some(),
            last_ping: check.last_ping,
            alert_after: check.alert_after,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CheckListResponse {
    pub checks: Vec<CheckDetails>,
}

#[derive(Debug, Serialize)]
pub struct CheckTagsResponse {
    pub tags: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct AddTagResponse {
    pub added: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub name: String,
    pub count: u64,
}

#[derive(Debug, Serialize)]
pub struct ProjectTagsResponse {
    pub tags: Vec<TagCount>,
}

#[derive(Debug, Deserialize)]
pub struct ProjectTagsQuery {
    pub prefix: Option<String>,
}
