use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stored state-machine value of a check. Never holds "maintenance";
/// see [`crate::checks::status::EffectiveStatus`] for the derived view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Text", enum_name = "check_status_enum")]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    #[sea_orm(string_value = "new")]
    New,
    #[sea_orm(string_value = "up")]
    Up,
    #[sea_orm(string_value = "down")]
    Down,
    #[sea_orm(string_value = "paused")]
    Paused,
}

impl CheckStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::New => "new",
            CheckStatus::Up => "up",
            CheckStatus::Down => "down",
            CheckStatus::Paused => "paused",
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
