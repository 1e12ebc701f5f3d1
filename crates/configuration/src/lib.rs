use crate::error::ConfigError;
use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use settings::{
    AppConfig, CorsSettings, DatabaseSettings, ErrorEnvelope, ErrorSettings, ReadingsSettings,
    ServerSettings,
};

/// The optional config file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "nexus.toml";

/// Loads the application configuration from `nexus.toml` and the process environment.
///
/// This function is the primary entry point for this crate. Call it once at
/// startup, after `.env` has been loaded.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let vars: config::Map<String, String> = std::env::vars().collect();
    load_config_from(Some(Path::new(DEFAULT_CONFIG_FILE)), vars)
}

/// Builds the configuration from an optional TOML file and an explicit set of variables.
///
/// Precedence, lowest first: built-in defaults, the file, `NEXUS_*` variables
/// (`__` separates nesting, e.g. `NEXUS_SERVER__PORT`), then `DATABASE_URL`.
pub fn load_config_from(
    file: Option<&Path>,
    vars: config::Map<String, String>,
) -> Result<AppConfig, ConfigError> {
    let database_url = vars
        .get("DATABASE_URL")
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty());

    let mut builder = config::Config::builder();
    if let Some(path) = file {
        builder = builder.add_source(config::File::from(path).required(false));
    }

    let settings = builder
        .add_source(
            config::Environment::with_prefix("NEXUS")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("cors.allowed_origins")
                .try_parsing(true)
                .source(Some(vars)),
        )
        .set_override_option("database_url", database_url)?
        .build()?;

    let config = settings.try_deserialize::<AppConfig>()?;
    config.validate()?;

    tracing::debug!(
        bind = %config.bind_addr(),
        origins = ?config.cors.allowed_origins,
        has_database_url = config.database_url.is_some(),
        "Configuration loaded."
    );

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> config::Map<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let config = load_config_from(None, vars(&[])).unwrap();
        assert_eq!(config.database_url, None);
        assert_eq!(config.bind_addr().to_string(), "127.0.0.1:8000");
        assert_eq!(
            config.cors.allowed_origins,
            vec!["http://localhost:5173", "http://127.0.0.1:5173"]
        );
        assert_eq!(config.query_timeout().as_secs(), 5);
        assert_eq!(config.default_window(), chrono::Duration::hours(24));
        assert_eq!(config.errors.envelope, ErrorEnvelope::Legacy);
    }

    #[test]
    fn database_url_is_read_from_environment() {
        let config = load_config_from(
            None,
            vars(&[("DATABASE_URL", "postgres://nexus@localhost/nexus")]),
        )
        .unwrap();
        assert_eq!(
            config.database_url.as_deref(),
            Some("postgres://nexus@localhost/nexus")
        );
    }

    #[test]
    fn blank_database_url_counts_as_missing() {
        let config = load_config_from(None, vars(&[("DATABASE_URL", "  ")])).unwrap();
        assert_eq!(config.database_url, None);
    }

    #[test]
    fn nested_environment_overrides() {
        let config = load_config_from(
            None,
            vars(&[
                ("NEXUS_SERVER__PORT", "9100"),
                ("NEXUS_ERRORS__ENVELOPE", "status"),
                ("NEXUS_CORS__ALLOWED_ORIGINS", "https://a.example,https://b.example"),
            ]),
        )
        .unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.errors.envelope, ErrorEnvelope::Status);
        assert_eq!(
            config.cors.allowed_origins,
            vec!["https://a.example", "https://b.example"]
        );
    }

    #[test]
    fn file_values_are_overridden_by_environment() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "database_url = \"postgres://from-file/nexus\"\n\n\
             [database]\nquery_timeout_secs = 2\n\n\
             [server]\nport = 8080"
        )
        .unwrap();

        let config = load_config_from(
            Some(file.path()),
            vars(&[("NEXUS_SERVER__PORT", "8081")]),
        )
        .unwrap();
        assert_eq!(config.database_url.as_deref(), Some("postgres://from-file/nexus"));
        assert_eq!(config.database.query_timeout_secs, 2);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.server.port, 8081);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let result = load_config_from(
            None,
            vars(&[("NEXUS_DATABASE__QUERY_TIMEOUT_SECS", "0")]),
        );
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn origin_with_trailing_slash_is_rejected() {
        let mut config = AppConfig::default();
        config.cors.allowed_origins = vec!["http://localhost:5173/".to_string()];
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }
}
