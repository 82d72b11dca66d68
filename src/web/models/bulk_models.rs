use serde::Serialize;
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::checks::tag_set;
use crate::db::services::bulk_action_service::BulkActionError;

pub const MAX_BULK_CHECKS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkAction {
    Pause,
    Resume,
    Delete,
    AddTags,
    RemoveTags,
}

impl BulkAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            BulkAction::Pause => "pause",
            BulkAction::Resume => "resume",
            BulkAction::Delete => "delete",
            BulkAction::AddTags => "add_tags",
            BulkAction::RemoveTags => "remove_tags",
        }
    }

    pub fn needs_tags(&self) -> bool {
        matches!(self, BulkAction::AddTags | BulkAction::RemoveTags)
    }
}

impl FromStr for BulkAction {
    type Err = BulkActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pause" => Ok(BulkAction::Pause),
            "resume" => Ok(BulkAction::Resume),
            "delete" => Ok(BulkAction::Delete),
            "add_tags" => Ok(BulkAction::AddTags),
            "remove_tags" => Ok(BulkAction::RemoveTags),
            _ => Err(BulkActionError::InvalidAction),
        }
    }
}

impl fmt::Display for BulkAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw bulk request body. Fields stay loosely typed so that every malformed
/// shape maps to its own validation error instead of a generic rejection.
#[derive(Debug, Clone, Default)]
pub struct BulkActionRequest {
    pub action: Option<Value>,
    pub checks: Option<Value>,
    pub tags: Option<Value>,
}

/// A body that is not a JSON object carries no fields at all.
impl From<Value> for BulkActionRequest {
    fn from(body: Value) -> Self {
        match body {
            Value::Object(mut fields) => BulkActionRequest {
                action: fields.remove("action"),
                checks: fields.remove("checks"),
                tags: fields.remove("tags"),
            },
            _ => BulkActionRequest::default(),
        }
    }
}

/// A bulk request that passed every check not requiring the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkCommand {
    pub action: BulkAction,
    /// Deduplicated, in request order.
    pub checks: Vec<Uuid>,
    /// Whitespace separated tokens of `tags`; empty for non-tag actions.
    pub tags: Vec<String>,
}

impl BulkActionRequest {
    pub fn validate(self) -> Result<BulkCommand, BulkActionError> {
        let action: BulkAction = self
            .action
            .as_ref()
            .and_then(Value::as_str)
            .ok_or(BulkActionError::InvalidAction)?
            .parse()?;

        let entries = match self.checks {
            Some(Value::Array(entries)) => entries,
            _ => return Err(BulkActionError::ChecksNotList),
        };
        if entries.is_empty() {
            return Err(BulkActionError::EmptyChecks);
        }
        if entries.len() > MAX_BULK_CHECKS {
            return Err(BulkActionError::TooManyChecks);
        }

        let mut checks: Vec<Uuid> = Vec::with_capacity(entries.len());
        for entry in &entries {
            let code = entry
                .as_str()
                .and_then(|s| Uuid::parse_str(s).ok())
                .ok_or(BulkActionError::InvalidCheckId)?;
            if !checks.contains(&code) {
                checks.push(code);
            }
        }

        let tags = if action.needs_tags() {
            let raw = self
                .tags
                .as_ref()
                .and_then(Value::as_str)
                .map(str::trim)
                .unwrap_or_default();
            if raw.is_empty() {
                return Err(BulkActionError::TagsRequired);
            }
            let mut tokens = Vec::new();
            for token in raw.split_whitespace() {
                tag_set::validate_tag(token)?;
                tokens.push(token.to_string());
            }
            tokens
        } else {
            Vec::new()
        };

        Ok(BulkCommand { action, checks, tags })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BulkActionResponse {
    pub action: BulkAction,
    pub applied: u64,
}
