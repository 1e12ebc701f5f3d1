use crate::error::ConfigError;
use serde::Deserialize;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Ten years; anything larger is almost certainly a typo.
const MAX_WINDOW_HOURS: i64 = 24 * 365 * 10;

/// The root configuration structure for the entire application.
///
/// Built once at startup and handed to the server; nothing reads the
/// environment after that.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string. Absence is reported per request, not at load time.
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub cors: CorsSettings,
    #[serde(default)]
    pub database: DatabaseSettings,
    #[serde(default)]
    pub readings: ReadingsSettings,
    #[serde(default)]
    pub errors: ErrorSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: IpAddr,
    pub port: u16,
}

/// Origins allowed to call the API from a browser.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CorsSettings {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Upper bound on connection acquisition plus query execution, per call.
    pub query_timeout_secs: u64,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReadingsSettings {
    /// How far back `/readings` looks when the client gives no `start`.
    pub default_window_hours: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorSettings {
    #[serde(default)]
    pub envelope: ErrorEnvelope,
}

/// How `/db` and `/zones` report database failures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum ErrorEnvelope {
    /// `200 {"ok": false, "error": ...}`, what existing dashboard clients expect.
    #[default]
    Legacy,
    /// Same body, but with a 5xx status.
    Status,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: IpAddr::from([127, 0, 0, 1]),
            port: 8000,
        }
    }
}

impl Default for CorsSettings {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:5173".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            query_timeout_secs: 5,
            max_connections: 5,
        }
    }
}

impl Default for ReadingsSettings {
    fn default() -> Self {
        Self { default_window_hours: 24 }
    }
}

impl AppConfig {
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.server.host, self.server.port)
    }

    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.database.query_timeout_secs)
    }

    pub fn default_window(&self) -> chrono::Duration {
        chrono::Duration::hours(self.readings.default_window_hours)
    }

    /// Rejects values that would make the server misbehave rather than fail loudly.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.database.query_timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "database.query_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.database.max_connections == 0 {
            return Err(ConfigError::ValidationError(
                "database.max_connections must be greater than zero".to_string(),
            ));
        }
        if !(1..=MAX_WINDOW_HOURS).contains(&self.readings.default_window_hours) {
            return Err(ConfigError::ValidationError(format!(
                "readings.default_window_hours must be between 1 and {}",
                MAX_WINDOW_HOURS
            )));
        }
        for origin in &self.cors.allowed_origins {
            let valid = (origin.starts_with("http://") || origin.starts_with("https://"))
                && !origin.ends_with('/')
                && !origin.contains(char::is_whitespace);
            if !valid {
                return Err(ConfigError::ValidationError(format!(
                    "cors.allowed_origins entry '{}' is not a valid origin",
                    origin
                )));
            }
        }
        Ok(())
    }
}
