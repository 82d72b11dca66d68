use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::db::entities::maintenance_window;
use crate::db::services::maintenance_service::{
    validate_title, MaintenanceError, NewMaintenanceWindow,
};

/// Loosely typed so that a wrong JSON type surfaces as the field's own error.
#[derive(Debug, Clone, Default)]
pub struct CreateMaintenanceWindowRequest {
    pub title: Option<Value>,
    pub start_time: Option<Value>,
    pub end_time: Option<Value>,
}

impl From<Value> for CreateMaintenanceWindowRequest {
    fn from(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => CreateMaintenanceWindowRequest {
                title: fields.remove("title"),
                start_time: fields.remove("start_time"),
                end_time: fields.remove("end_time"),
            },
            _ => CreateMaintenanceWindowRequest::default(),
        }
    }
}

/// RFC 3339, or an ISO 8601 timestamp without offset which is taken as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

impl CreateMaintenanceWindowRequest {
    /// The title is checked first, then the timestamps are parsed. The remaining
    /// rules need the project's windows and run in the service.
    pub fn into_new_window(self) -> Result<NewMaintenanceWindow, MaintenanceError> {
        let title = match self.title {
            None | Some(Value::Null) => None,
            Some(Value::String(title)) => Some(title),
            Some(_) => return Err(MaintenanceError::InvalidTitle("title must be a string")),
        };
        validate_title(title.as_deref())?;

        let start_time = timestamp_field(self.start_time.as_ref())
            .ok_or(MaintenanceError::InvalidTimestamp("start_time"))?;
        let end_time = timestamp_field(self.end_time.as_ref())
            .ok_or(MaintenanceError::InvalidTimestamp("end_time"))?;

        Ok(NewMaintenanceWindow {
            title,
            start_time,
            end_time,
        })
    }
}

fn timestamp_field(value: Option<&Value>) -> Option<DateTime<Utc>> {
    value.and_then(Value::as_str).and_then(parse_timestamp)
}

#[derive(Debug, Clone, Serialize)]
pub struct MaintenanceWindowDetails {
    pub uuid: Uuid,
    pub title: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub created: DateTime<Utc>,
}

impl From<maintenance_window::Model> for MaintenanceWindowDetails {
    fn from(window: maintenance_window::Model) -> Self {
        MaintenanceWindowDetails {
            uuid: window.code,
            title: window.title,
            start_time: window.start_time,
            end_time: window.end_time,
            created: window.created,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaintenanceWindowListResponse {
    pub windows: Vec<MaintenanceWindowDetails>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListMaintenanceWindowsQuery {
    pub active: Option<String>,
}

impl ListMaintenanceWindowsQuery {
    pub fn active_only(&self) -> bool {
        matches!(
            self.active.as_deref().map(str::to_ascii_lowercase).as_deref(),
            Some("true" | "1" | "yes")
        )
    }
}
