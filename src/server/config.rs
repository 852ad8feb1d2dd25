use serde::Deserialize;
use std::fs;
use std::path::Path;

#[derive(Deserialize, Debug, Clone)]
pub struct ServerConfig {
    pub db_dsn: String,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_db_max_connections")]
    pub db_max_connections: u32,
}

// Partial config for layering
#[derive(Deserialize, Default, Debug, PartialEq, Eq)]
pub struct PartialServerConfig {
    pub db_dsn: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_dir: Option<String>,
    pub db_max_connections: Option<u32>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_db_max_connections() -> u32 {
    10
}

impl PartialServerConfig {
    pub fn from_file(path: &Path) -> Result<Self, String> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file at {path:?}: {e}"))?;
        toml::from_str(&contents)
            .map_err(|e| format!("Failed to parse TOML from config file at {path:?}: {e}"))
    }

    /// Reads `DB_DSN`, `HOST`, `PORT`, `LOG_DIR` and `DB_MAX_CONNECTIONS`
    /// from the process environment.
    pub fn from_env() -> Result<Self, String> {
        envy::from_env::<PartialServerConfig>()
            .map_err(|e| format!("Failed to load config from environment: {e}"))
    }
}

impl ServerConfig {
    pub fn load(config_path: Option<&str>) -> Result<Self, String> {
        dotenv::dotenv().ok();

        // 1. Load from file (optional)
        let file_config = match config_path {
            Some(path_str) => PartialServerConfig::from_file(Path::new(path_str))?,
            None => PartialServerConfig::default(),
        };

        // 2. Load from environment variables
        let env_config = PartialServerConfig::from_env()?;

        // 3. Merge: environment overrides file
        Self::merge(env_config, file_config)
    }

    pub fn merge(
        env_config: PartialServerConfig,
        file_config: PartialServerConfig,
    ) -> Result<Self, String> {
        Ok(ServerConfig {
            db_dsn: env_config
                .db_dsn
                .or(file_config.db_dsn)
                .ok_or("DB_DSN is required")?,
            host: env_config
                .host
                .or(file_config.host)
                .unwrap_or_else(default_host),
            port: env_config
                .port
                .or(file_config.port)
                .unwrap_or_else(default_port),
            log_dir: env_config
                .log_dir
                .or(file_config.log_dir)
                .unwrap_or_else(default_log_dir),
            db_max_connections: env_config
                .db_max_connections
                .or(file_config.db_max_connections)
                .unwrap_or_else(default_db_max_connections),
        })
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
