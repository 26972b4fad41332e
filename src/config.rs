use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    #[serde(default)]
    pub search: SearchSettings,
    #[serde(default)]
    pub seed: SeedSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: String,
    pub max_connections: Option<u32>,
    pub min_connections: Option<u32>,
    pub acquire_timeout_secs: Option<u64>,
    pub idle_timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthSettings {
    pub jwt_secret: String,
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Admin account created at startup when absent
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
    #[serde(default = "default_admin_name")]
    pub admin_name: String,
}

fn default_token_ttl_minutes() -> i64 { 30 }
fn default_bcrypt_cost() -> u32 { bcrypt::DEFAULT_COST }
fn default_admin_name() -> String { "Admin User".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct SearchSettings {
    #[serde(default = "default_result_limit")]
    pub result_limit: usize,
    #[serde(default = "default_candidate_limit")]
    pub candidate_limit: usize,
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            result_limit: default_result_limit(),
            candidate_limit: default_candidate_limit(),
            cache_ttl_secs: default_cache_ttl_secs(),
        }
    }
}

fn default_result_limit() -> usize { crate::core::DEFAULT_RESULT_LIMIT }
fn default_candidate_limit() -> usize { 100 }
fn default_cache_ttl_secs() -> u64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct SeedSettings {
    #[serde(default = "default_mentor_password")]
    pub mentor_password: String,
}

impl Default for SeedSettings {
    fn default() -> Self {
        Self {
            mentor_password: default_mentor_password(),
        }
    }
}

fn default_mentor_password() -> String { "mentor123".to_string() }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with MENTORLINK__)
    /// 5. `DATABASE_URL` and `JWT_SECRET`
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., MENTORLINK__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("MENTORLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        apply_env_overrides(settings)?.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("MENTORLINK")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Conventional unprefixed variables win over everything else
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("DATABASE_URL") {
        builder = builder.set_override("database.url", url)?;
    }
    if let Ok(secret) = env::var("JWT_SECRET") {
        builder = builder.set_override("auth.jwt_secret", secret)?;
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    #[test]
    fn test_default_search_settings() {
        let search = SearchSettings::default();
        assert_eq!(search.result_limit, 10);
        assert_eq!(search.candidate_limit, 100);
        assert_eq!(search.cache_ttl_secs, 30);
    }

    #[test]
    fn test_default_logging() {
        let logging = LoggingSettings::default();
        assert_eq!(logging.level, "info");
        assert_eq!(logging.format, "compact");
    }

    #[test]
    fn test_minimal_toml_fills_defaults() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 8001

            [database]
            url = "postgres://localhost/mentorlink"

            [auth]
            jwt_secret = "s3cret"
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 8001);
        assert_eq!(settings.auth.token_ttl_minutes, 30);
        assert_eq!(settings.auth.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert!(settings.auth.admin_email.is_none());
        assert_eq!(settings.seed.mentor_password, "mentor123");
        assert_eq!(settings.search.result_limit, 10);
    }
}
