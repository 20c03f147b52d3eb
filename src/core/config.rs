//! Configuration management

use clap::Parser;
use config::{Config as ConfigBuilder, ConfigError as BuilderError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid server configuration: {0}")]
    InvalidServer(String),

    #[error("Invalid database configuration: {0}")]
    InvalidDatabase(String),

    #[error("Invalid session configuration: {0}")]
    InvalidSession(String),

    #[error("Invalid logging configuration: {0}")]
    InvalidLogging(String),

    #[error("Invalid security configuration: {0}")]
    InvalidSecurity(String),

    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Configuration file not found: {0}")]
    FileNotFound(String),
}

impl From<BuilderError> for ConfigError {
    fn from(err: BuilderError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub session: SessionConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration with precedence: CLI args > Environment variables > Config file > Defaults
    pub fn load() -> Result<Self, ConfigError> {
        let cli_args = CliArgs::parse();
        Self::load_with_args(cli_args)
    }

    fn load_with_args(cli_args: CliArgs) -> Result<Self, ConfigError> {
        let mut builder = Self::default_builder()?;

        // Load from config file if specified (medium priority)
        if let Some(config_path) = &cli_args.config {
            if !config_path.exists() {
                return Err(ConfigError::FileNotFound(
                    config_path.display().to_string(),
                ));
            }
            builder = builder.add_source(File::from(config_path.as_path()));
        }

        // Override with environment variables (higher priority).
        // Variables are prefixed with FIN and use __ for nesting,
        // e.g. FIN_SERVER__PORT=8080
        builder = builder.add_source(
            Environment::with_prefix("FIN")
                .separator("__")
                .try_parsing(true),
        );

        // Override with CLI arguments (highest priority)
        if let Some(host) = &cli_args.host {
            builder = builder.set_override("server.host", host.clone())?;
        }
        if let Some(port) = cli_args.port {
            builder = builder.set_override("server.port", port)?;
        }
        if let Some(db_path) = &cli_args.database {
            builder = builder.set_override("database.path", db_path.display().to_string())?;
        }
        if let Some(log_level) = &cli_args.log_level {
            builder = builder.set_override("logging.level", log_level.clone())?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::FileNotFound(path.display().to_string()));
        }

        let config: Config = Self::default_builder()?
            .add_source(File::from(path))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Default configuration (no file, no environment, no CLI)
    pub fn defaults() -> Result<Self, ConfigError> {
        let config: Config = Self::default_builder()?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn default_builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError>
    {
        let builder = ConfigBuilder::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 3000)?
            .set_default("server.request_timeout", 30)?
            .set_default("database.path", "./data/fin-ledger.db")?
            .set_default("database.connection_pool_size", 10)?
            .set_default("database.busy_timeout", 5000)?
            .set_default("session.cookie_name", "session_id")?
            .set_default("session.ttl_secs", 86400)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "text")?
            .set_default("logging.output", "stdout")?
            .set_default("security.allowed_origins", vec!["*"])?
            .set_default("security.bcrypt_cost", 12)?;
        Ok(builder)
    }

    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.session.validate()?;
        self.logging.validate()?;
        self.security.validate()?;
        Ok(())
    }
}

/// Command-line arguments for configuration override
#[derive(Debug, Parser)]
#[command(name = "fin-ledger")]
#[command(about = "FinLedger personal finance backend", long_about = None)]
pub struct CliArgs {
    /// Path to configuration file (TOML format)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Server host address
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Server port
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Database file path
    #[arg(short, long, value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout: u64, // seconds
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.is_empty() {
            return Err(ConfigError::InvalidServer("host cannot be empty".to_string()));
        }

        if self.port == 0 {
            return Err(ConfigError::InvalidServer(
                "port must be greater than 0".to_string(),
            ));
        }

        if self.request_timeout == 0 {
            return Err(ConfigError::InvalidServer(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub connection_pool_size: usize,
    pub busy_timeout: u64, // milliseconds
}

impl DatabaseConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::InvalidDatabase("path cannot be empty".to_string()));
        }

        if self.connection_pool_size == 0 {
            return Err(ConfigError::InvalidDatabase(
                "connection_pool_size must be greater than 0".to_string(),
            ));
        }

        if self.busy_timeout == 0 {
            return Err(ConfigError::InvalidDatabase(
                "busy_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Name of the cookie carrying the session token
    pub cookie_name: String,
    /// Session time-to-live in seconds
    pub ttl_secs: u64,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cookie_name.is_empty() {
            return Err(ConfigError::InvalidSession(
                "cookie_name cannot be empty".to_string(),
            ));
        }

        if self.ttl_secs == 0 {
            return Err(ConfigError::InvalidSession(
                "ttl_secs must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
    pub output: String,
    pub log_file: Option<PathBuf>,
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let valid_levels = ["debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.level.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "level must be one of: {:?}",
                valid_levels
            )));
        }

        let valid_formats = ["json", "text"];
        if !valid_formats.contains(&self.format.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "format must be one of: {:?}",
                valid_formats
            )));
        }

        let valid_outputs = ["stdout", "file"];
        if !valid_outputs.contains(&self.output.as_str()) {
            return Err(ConfigError::InvalidLogging(format!(
                "output must be one of: {:?}",
                valid_outputs
            )));
        }

        if self.output == "file" && self.log_file.is_none() {
            return Err(ConfigError::InvalidLogging(
                "log_file must be specified when output is 'file'".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
    /// bcrypt work factor for password hashing
    pub bcrypt_cost: u32,
}

impl SecurityConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.allowed_origins.is_empty() {
            return Err(ConfigError::InvalidSecurity(
                "allowed_origins cannot be empty".to_string(),
            ));
        }

        // bcrypt rejects costs outside 4..=31
        if !(4..=31).contains(&self.bcrypt_cost) {
            return Err(ConfigError::InvalidSecurity(
                "bcrypt_cost must be between 4 and 31".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = Config::defaults().unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.session.cookie_name, "session_id");
        assert_eq!(config.session.ttl_secs, 86400);
        assert_eq!(config.security.bcrypt_cost, 12);
    }

    #[test]
    fn test_server_validation_rejects_zero_port() {
        let server = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            request_timeout: 30,
        };
        assert!(server.validate().is_err());
    }

    #[test]
    fn test_session_validation_rejects_empty_cookie_name() {
        let session = SessionConfig {
            cookie_name: String::new(),
            ttl_secs: 3600,
        };
        assert!(session.validate().is_err());
    }

    #[test]
    fn test_security_validation_rejects_out_of_range_cost() {
        let security = SecurityConfig {
            allowed_origins: vec!["*".to_string()],
            bcrypt_cost: 2,
        };
        assert!(security.validate().is_err());
    }

    #[test]
    fn test_logging_file_output_requires_path() {
        let logging = LoggingConfig {
            level: "info".to_string(),
            format: "text".to_string(),
            output: "file".to_string(),
            log_file: None,
        };
        assert!(logging.validate().is_err());
    }

    #[test]
    fn test_from_file_missing_path() {
        let result = Config::from_file(Path::new("/nonexistent/config.toml"));
        assert!(matches!(result, Err(ConfigError::FileNotFound(_))));
    }
}
