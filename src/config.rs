use crate::components::scheduler::{
    BusinessHours, DEFAULT_BUSINESS_END, DEFAULT_BUSINESS_START,
};
use crate::components::scheduler::models::DEFAULT_DURATION_MINUTES;
use crate::error::{config_error, env_error, TempoResult};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Default config file location, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config/tempo.toml";

/// File name of the persisted task list inside the data directory
pub const TASKS_FILE: &str = "tasks.json";

/// File name of the persisted calendar events inside the data directory
pub const EVENTS_FILE: &str = "calendar_events.json";

/// Main configuration structure for the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address to bind the HTTP server to
    pub host: String,
    /// Port to bind the HTTP server to
    pub port: u16,
    /// Directory holding the task and event JSON files
    pub data_dir: PathBuf,
    /// Start of business hours (HH:MM)
    pub business_start: String,
    /// End of business hours (HH:MM)
    pub business_end: String,
    /// Slot length used when a request does not name one
    pub default_slot_minutes: i64,
    /// Skip stored events with malformed timestamps instead of failing
    pub lenient_timestamps: bool,
}

/// Optional overrides read from the TOML config file
#[derive(Debug, Default, Deserialize)]
struct FileConfig {
    host: Option<String>,
    port: Option<u16>,
    data_dir: Option<PathBuf>,
    business_start: Option<String>,
    business_end: Option<String>,
    default_slot_minutes: Option<i64>,
    lenient_timestamps: Option<bool>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            data_dir: PathBuf::from("./data"),
            business_start: DEFAULT_BUSINESS_START.to_string(),
            business_end: DEFAULT_BUSINESS_END.to_string(),
            default_slot_minutes: DEFAULT_DURATION_MINUTES,
            lenient_timestamps: false,
        }
    }
}

impl Config {
    /// Load configuration from defaults, the config file and the environment,
    /// in increasing order of precedence
    pub fn load() -> TempoResult<Self> {
        // Load .env file if it exists
        dotenv().ok();

        let path = env::var("TEMPO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());

        let mut config = Config::default();
        if Path::new(&path).exists() {
            info!("Loading config file {}", path);
            let content = fs::read_to_string(&path)?;
            config.apply_file(&content)?;
        }

        config.apply_env()?;
        config.validate()?;

        Ok(config)
    }

    /// Merge values from TOML text over the current values
    pub fn apply_file(&mut self, content: &str) -> TempoResult<()> {
        let file: FileConfig = toml::from_str(content)?;

        if let Some(host) = file.host {
            self.host = host;
        }
        if let Some(port) = file.port {
            self.port = port;
        }
        if let Some(data_dir) = file.data_dir {
            self.data_dir = data_dir;
        }
        if let Some(start) = file.business_start {
            self.business_start = start;
        }
        if let Some(end) = file.business_end {
            self.business_end = end;
        }
        if let Some(minutes) = file.default_slot_minutes {
            self.default_slot_minutes = minutes;
        }
        if let Some(lenient) = file.lenient_timestamps {
            self.lenient_timestamps = lenient;
        }

        Ok(())
    }

    fn apply_env(&mut self) -> TempoResult<()> {
        if let Ok(host) = env::var("TEMPO_HOST") {
            self.host = host;
        }
        if let Ok(port) = env::var("PORT") {
            self.port = port.parse::<u16>().map_err(|_| env_error("PORT"))?;
        }
        if let Ok(data_dir) = env::var("DATA_DIR") {
            self.data_dir = PathBuf::from(data_dir);
        }
        if let Ok(start) = env::var("BUSINESS_START") {
            self.business_start = start;
        }
        if let Ok(end) = env::var("BUSINESS_END") {
            self.business_end = end;
        }
        if let Ok(minutes) = env::var("DEFAULT_SLOT_MINUTES") {
            self.default_slot_minutes = minutes
                .parse::<i64>()
                .map_err(|_| env_error("DEFAULT_SLOT_MINUTES"))?;
        }
        if let Ok(lenient) = env::var("LENIENT_TIMESTAMPS") {
            self.lenient_timestamps = parse_flag(&lenient).ok_or_else(|| env_error("LENIENT_TIMESTAMPS"))?;
        }

        Ok(())
    }

    /// Check that the values can actually be used
    pub fn validate(&self) -> TempoResult<()> {
        BusinessHours::parse(&self.business_start, &self.business_end)?;
        if self.default_slot_minutes <= 0 {
            return Err(config_error("default_slot_minutes must be positive"));
        }
        Ok(())
    }

    /// Path of the persisted task list
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// Path of the persisted calendar events
    pub fn events_path(&self) -> PathBuf {
        self.data_dir.join(EVENTS_FILE)
    }

    /// Socket address string for the HTTP listener
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bind_address(), "127.0.0.1:8000");
        assert_eq!(config.events_path(), PathBuf::from("./data").join(EVENTS_FILE));
    }

    #[test]
    fn test_file_overrides() {
        let mut config = Config::default();
        config
            .apply_file(
                r#"
                port = 9090
                data_dir = "/var/lib/tempo"
                business_start = "08:30"
                lenient_timestamps = true
                "#,
            )
            .unwrap();

        assert_eq!(config.port, 9090);
        assert_eq!(config.data_dir, PathBuf::from("/var/lib/tempo"));
        assert_eq!(config.business_start, "08:30");
        assert_eq!(config.business_end, DEFAULT_BUSINESS_END);
        assert!(config.lenient_timestamps);
    }

    #[test]
    fn test_bad_file_is_a_config_error() {
        let mut config = Config::default();
        assert!(matches!(config.apply_file("port = \"eighty\""), Err(Error::Config(_))));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = Config {
            business_start: "18:00".to_string(),
            ..Config::default()
        };
        assert!(config.validate().is_err());

        let config = Config {
            default_slot_minutes: 0,
            ..Config::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("TRUE"), Some(true));
        assert_eq!(parse_flag("off"), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
