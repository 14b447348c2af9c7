//! Application configuration management.
//!
//! Configuration is loaded from a YAML file with environment variable overrides. The configuration
//! file path defaults to `config.yaml` but can be specified via `-f` flag or `CITYCTL_CONFIG`
//! environment variable. A missing file is fine: every field has a default.
//!
//! ## Loading Priority
//!
//! Configuration sources are merged in the following order (later sources override earlier ones):
//!
//! 1. **YAML config file** - Base configuration (default: `config.yaml`)
//! 2. **Environment variables** - Variables prefixed with `CITYCTL_` override YAML values
//! 3. **DATABASE_URL** - Special case: overrides `database.url` if set
//!
//! For nested config values, use double underscores in environment variables. For example,
//! `CITYCTL_DATABASE__POOL__MAX_CONNECTIONS=20` sets `database.pool.max_connections`.
//!
//! ## Usage
//!
//! ```no_run
//! use clap::Parser;
//! use cityctl::config::{Args, Config};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let args = Args::parse();
//! let config = Config::load(&args)?;
//!
//! println!("Server will bind to {}", config.bind_address());
//! # Ok(())
//! # }
//! ```
//!
//! ## Environment Variable Examples
//!
//! ```bash
//! CITYCTL_PORT=8080
//! DATABASE_URL="sqlite://cities.db"
//! CITYCTL_ENABLE_METRICS=true
//! ```

use clap::Parser;
use figment::{
    Figment,
    providers::{Env, Format, Yaml},
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

use crate::errors::Error;

/// Simple CLI args - just for specifying config file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to configuration file
    #[arg(short = 'f', long, env = "CITYCTL_CONFIG", default_value = "config.yaml")]
    pub config: String,

    /// Validate configuration and exit without starting the server.
    #[arg(long)]
    pub validate: bool,
}

/// Main application configuration.
///
/// All fields have defaults defined in the `Default` implementation.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// HTTP server host to bind to (e.g., "0.0.0.0" for all interfaces)
    pub host: String,
    /// HTTP server port to bind to
    pub port: u16,
    /// Set from the raw `DATABASE_URL` variable and folded into `database.url` on load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    pub database: DatabaseConfig,
    /// Threshold in milliseconds for logging slow SQL statements (default: 1000ms)
    pub slow_statement_threshold_ms: u64,
    /// Enable Prometheus metrics endpoint at `/internal/metrics`
    pub enable_metrics: bool,
    /// Enable OpenTelemetry OTLP export for distributed tracing
    pub enable_otel_export: bool,
    pub cors: CorsConfig,
}

/// SQLite database location and pool settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection URL, e.g. `sqlite://cityctl.db` or `sqlite::memory:`
    pub url: String,
    pub pool: PoolSettings,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://cityctl.db".to_string(),
            pool: PoolSettings::default(),
        }
    }
}

/// Individual pool configuration with all SQLx parameters.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolSettings {
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of idle connections to maintain
    pub min_connections: u32,
    /// Maximum time to wait for a connection (seconds)
    pub acquire_timeout_secs: u64,
    /// Time before idle connections are closed (seconds, 0 = never)
    pub idle_timeout_secs: u64,
    /// Maximum lifetime of a connection (seconds, 0 = never)
    pub max_lifetime_secs: u64,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 0,
            acquire_timeout_secs: 30,
            idle_timeout_secs: 600,  // 10 minutes
            max_lifetime_secs: 1800, // 30 minutes
        }
    }
}

impl PoolSettings {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_secs(self.acquire_timeout_secs)
    }

    /// `None` when set to 0
    pub fn idle_timeout(&self) -> Option<Duration> {
        (self.idle_timeout_secs > 0).then(|| Duration::from_secs(self.idle_timeout_secs))
    }

    /// `None` when set to 0
    pub fn max_lifetime(&self) -> Option<Duration> {
        (self.max_lifetime_secs > 0).then(|| Duration::from_secs(self.max_lifetime_secs))
    }
}

/// CORS (Cross-Origin Resource Sharing) configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins for CORS requests
    pub allowed_origins: Vec<CorsOrigin>,
    /// Cache preflight requests for this many seconds
    pub max_age: Option<u64>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![CorsOrigin::Wildcard],
            max_age: Some(3600),
        }
    }
}

/// CORS origin specification.
///
/// Can be either a wildcard (`*`) to allow all origins, or a specific URL.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum CorsOrigin {
    /// Allow all origins (`*`)
    #[serde(deserialize_with = "parse_wildcard")]
    Wildcard,
    /// Specific origin URL (e.g., `https://app.example.com`)
    #[serde(deserialize_with = "parse_url")]
    Url(Url),
}

fn parse_wildcard<'de, D>(deserializer: D) -> Result<(), D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    if s == "*" {
        Ok(())
    } else {
        Err(serde::de::Error::custom("Expected '*'"))
    }
}

fn parse_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    Url::parse(&s).map_err(serde::de::Error::custom)
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3001,
            database_url: None,
            database: DatabaseConfig::default(),
            slow_statement_threshold_ms: 1000,
            enable_metrics: false,
            enable_otel_export: false,
            cors: CorsConfig::default(),
        }
    }
}

impl Config {
    #[allow(clippy::result_large_err)]
    pub fn load(args: &Args) -> Result<Self, figment::Error> {
        let mut config: Self = Self::figment(args).extract()?;

        // DATABASE_URL wins over the file, keeping the configured pool settings
        if let Some(url) = config.database_url.take() {
            config.database.url = url;
        }

        config.validate().map_err(|e| figment::Error::from(e.to_string()))?;
        Ok(config)
    }

    /// Validate the configuration for consistency and required fields
    pub fn validate(&self) -> Result<(), Error> {
        let pool = &self.database.pool;
        if pool.max_connections == 0 {
            return Err(Error::BadRequest {
                message: "Config validation: database.pool.max_connections must be at least 1".to_string(),
            });
        }
        if pool.min_connections > pool.max_connections {
            return Err(Error::BadRequest {
                message: format!(
                    "Config validation: database.pool.min_connections ({}) cannot be greater than max_connections ({})",
                    pool.min_connections, pool.max_connections
                ),
            });
        }

        let url = self.database.url.trim();
        if url.is_empty() {
            return Err(Error::BadRequest {
                message: "Config validation: database.url is empty. Set DATABASE_URL or database.url in the config file."
                    .to_string(),
            });
        }
        if !url.starts_with("sqlite:") {
            return Err(Error::BadRequest {
                message: format!("Config validation: database.url must use the sqlite: scheme, got '{url}'"),
            });
        }

        if self.cors.allowed_origins.is_empty() {
            return Err(Error::BadRequest {
                message: "Config validation: cors.allowed_origins must list at least one origin (or '*')".to_string(),
            });
        }

        Ok(())
    }

    pub fn figment(args: &Args) -> Figment {
        Figment::new()
            // Load base config file
            .merge(Yaml::file(&args.config))
            // Environment variables can still override specific values
            .merge(Env::prefixed("CITYCTL_").ignore(&["config"]).split("__"))
            // Common DATABASE_URL pattern
            .merge(Env::raw().only(&["DATABASE_URL"]))
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    fn args(config: &str) -> Args {
        Args {
            config: config.to_string(),
            validate: false,
        }
    }

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            let config = Config::load(&args("missing.yaml"))?;

            assert_eq!(config.host, "0.0.0.0");
            assert_eq!(config.port, 3001);
            assert_eq!(config.database.url, "sqlite://cityctl.db");
            assert_eq!(config.database.pool.max_connections, 10);
            assert_eq!(config.slow_statement_threshold_ms, 1000);
            assert!(!config.enable_metrics);
            assert!(matches!(config.cors.allowed_origins[..], [CorsOrigin::Wildcard]));
            Ok(())
        });
    }

    #[test]
    fn test_yaml_and_env_override() {
        Jail::expect_with(|jail| {
            jail.clear_env();
            jail.create_file(
                "test.yaml",
                r#"
port: 4000
database:
  url: sqlite://from-file.db
  pool:
    max_connections: 4
cors:
  allowed_origins:
    - https://cities.example.com
  max_age: 60
"#,
            )?;

            jail.set_env("CITYCTL_HOST", "127.0.0.1");
            jail.set_env("CITYCTL_DATABASE__POOL__MIN_CONNECTIONS", "2");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.host, "127.0.0.1");
            assert_eq!(config.port, 4000);
            assert_eq!(config.bind_address(), "127.0.0.1:4000");
            assert_eq!(config.database.url, "sqlite://from-file.db");
            assert_eq!(config.database.pool.max_connections, 4);
            assert_eq!(config.database.pool.min_connections, 2);
            assert_eq!(config.cors.max_age, Some(60));
            match &config.cors.allowed_origins[..] {
                [CorsOrigin::Url(url)] => assert_eq!(url.as_str(), "https://cities.example.com/"),
                other => panic!("unexpected origins: {other:?}"),
            }
            Ok(())
        });
    }

    #[test]
    fn test_database_url_env_takes_precedence() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "test.yaml",
                r#"
database:
  url: sqlite://from-file.db
  pool:
    max_connections: 3
"#,
            )?;
            jail.set_env("DATABASE_URL", "sqlite://from-env.db");

            let config = Config::load(&args("test.yaml"))?;

            assert_eq!(config.database.url, "sqlite://from-env.db");
            assert_eq!(config.database.pool.max_connections, 3);
            assert!(config.database_url.is_none());
            Ok(())
        });
    }

    #[test]
    fn test_validation_rejects_bad_config() {
        Jail::expect_with(|jail| {
            jail.create_file("pool.yaml", "database:\n  pool:\n    min_connections: 20\n    max_connections: 5\n")?;
            let err = Config::load(&args("pool.yaml")).unwrap_err();
            assert!(err.to_string().contains("min_connections"));

            jail.create_file("scheme.yaml", "database:\n  url: postgres://localhost/cities\n")?;
            let err = Config::load(&args("scheme.yaml")).unwrap_err();
            assert!(err.to_string().contains("sqlite:"));

            jail.create_file("cors.yaml", "cors:\n  allowed_origins: []\n")?;
            let err = Config::load(&args("cors.yaml")).unwrap_err();
            assert!(err.to_string().contains("allowed_origins"));

            Ok(())
        });
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        Jail::expect_with(|jail| {
            jail.create_file("test.yaml", "prot: 8080\n")?;
            assert!(Config::load(&args("test.yaml")).is_err());
            Ok(())
        });
    }

    #[test]
    fn test_pool_durations() {
        let pool = PoolSettings {
            idle_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(pool.idle_timeout(), None);
        assert_eq!(pool.max_lifetime(), Some(Duration::from_secs(1800)));
        assert_eq!(pool.acquire_timeout(), Duration::from_secs(30));
    }
}
