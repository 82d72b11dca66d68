use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,

    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_max_db_connections")]
    pub max_db_connections: u32,
}

// Every field optional so a file and the environment can each supply a subset.
#[derive(Deserialize, Default, Debug)]
struct PartialServerConfig {
    database_url: Option<String>,
    bind_address: Option<String>,
    log_dir: Option<String>,
    max_db_connections: Option<u32>,
}

fn default_bind_address() -> String {
    "0.0.0.0:8000".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_max_db_connections() -> u32 {
    10
}

impl PartialServerConfig {
    fn from_file(config_path: Option<&str>) -> Result<Self, String> {
        let Some(path_str) = config_path else {
            return Ok(PartialServerConfig::default());
        };
        let path = Path::new(path_str);
        if !path.exists() {
            return Ok(PartialServerConfig::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
    }

    /// Fields set on `self` win over those on `fallback`.
    fn layered_over(self, fallback: PartialServerConfig) -> Result<ServerConfig, String> {
        Ok(ServerConfig {
            database_url: self
                .database_url
                .or(fallback.database_url)
                .ok_or("DATABASE_URL is required")?,
            bind_address: self
                .bind_address
                .or(fallback.bind_address)
                .unwrap_or_else(default_bind_address),
            log_dir: self.log_dir.or(fallback.log_dir).unwrap_or_else(default_log_dir),
            max_db_connections: self
                .max_db_connections
                .or(fallback.max_db_connections)
                .unwrap_or_else(default_max_db_connections),
        })
    }
}

impl ServerConfig {
    /// Reads the optional TOML file, then lets environment variables (and `.env`) override it.
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        let file_config = PartialServerConfig::from_file(config_path)?;
        let env_config: PartialServerConfig = envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))?;

        env_config.layered_over(file_config)
    }
}
