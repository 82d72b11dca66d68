use serde::Serialize;

use crate::db::entities::check;
use crate::db::enums::CheckStatus;

/// Status as shown to API clients. `Maintenance` only exists here, never in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    New,
    Up,
    Down,
    Paused,
    Maintenance,
}

impl From<CheckStatus> for EffectiveStatus {
    fn from(status: CheckStatus) -> Self {
        match status {
            CheckStatus::New => EffectiveStatus::New,
            CheckStatus::Up => EffectiveStatus::Up,
            CheckStatus::Down => EffectiveStatus::Down,
            CheckStatus::Paused => EffectiveStatus::Paused,
        }
    }
}

pub fn resolve_status(stored: CheckStatus, active_window_exists: bool) -> EffectiveStatus {
    match stored {
        CheckStatus::Paused | CheckStatus::New => stored.into(),
        CheckStatus::Up | CheckStatus::Down if active_window_exists => EffectiveStatus::Maintenance,
        CheckStatus::Up | CheckStatus::Down => stored.into(),
    }
}

pub fn effective_status(check: &check::Model, active_window_exists: bool) -> EffectiveStatus {
    resolve_status(check.status, active_window_exists)
}

/// The pair every serialized check carries. `in_maintenance` is reported
/// even when the status itself is not suppressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusView {
    pub status: EffectiveStatus,
    pub in_maintenance: bool,
}

impl StatusView {
    pub fn of(check: &check::Model, active_window_exists: bool) -> Self {
        StatusView {
            status: effective_status(check, active_window_exists),
            in_maintenance: active_window_exists,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maintenance_suppresses_up_and_down() {
        assert_eq!(resolve_status(CheckStatus::Up, true), EffectiveStatus::Maintenance);
        assert_eq!(resolve_status(CheckStatus::Down, true), EffectiveStatus::Maintenance);
    }

    #[test]
    fn paused_and_new_are_never_overridden() {
        assert_eq!(resolve_status(CheckStatus::Paused, true), EffectiveStatus::Paused);
        assert_eq!(resolve_status(CheckStatus::New, true), EffectiveStatus::New);
    }

    #[test]
    fn without_window_stored_status_passes_through() {
        for status in [CheckStatus::New, CheckStatus::Up, CheckStatus::Down, CheckStatus::Paused] {
            assert_eq!(resolve_status(status, false), EffectiveStatus::from(status));
        }
    }

    #[test]
    fn in_maintenance_is_independent_of_status() {
        let now = chrono::Utc::now();
        let mut check = check::Model {
            id: 1,
            code: uuid::Uuid::new_v4(),
            project_id: 1,
            name: "db backup".to_string(),
            tags: String::new(),
            status: CheckStatus::Down,
            last_ping: Some(now),
            last_start: None,
            alert_after: None,
            created_at: now,
        };
        let view = StatusView::of(&check, true);
        assert_eq!(view.status, EffectiveStatus::Maintenance);
        assert!(view.in_maintenance);

        check.status = CheckStatus::Paused;
        let view = StatusView::of(&check, true);
        assert_eq!(view.status, EffectiveStatus::Paused);
        assert!(view.in_maintenance);

        assert!(!StatusView::of(&check, false).in_maintenance);
    }

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&EffectiveStatus::Maintenance).unwrap(),
            "\"maintenance\""
        );
    }
}
