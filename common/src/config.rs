// Configuration management with layered configuration (defaults, .env file, process env)

use crate::errors::SettingsError;
use config::{Config, Environment, Map};
use serde::Deserialize;
use sqlx::postgres::PgConnectOptions;
use sqlx::ConnectOptions;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::Path;

/// Default location of the optional env file, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Main settings structure, read once at process start.
///
/// Keys are the lowercased environment variable names (`PGHOST` -> `pghost`).
#[derive(Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "pghost")]
    pub db_host: String,
    #[serde(rename = "pgdatabase")]
    pub db_name: String,
    #[serde(rename = "pguser")]
    pub db_user: String,
    #[serde(rename = "pgpassword")]
    pub db_password: String,
    #[serde(rename = "pgport")]
    pub db_port: u16,
    /// Enables SQL statement logging
    pub debug: bool,
    pub app_host: String,
    pub app_port: u16,
    pub db_max_connections: u32,
    pub log_format: LogFormat,
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("db_host", &self.db_host)
            .field("db_name", &self.db_name)
            .field("db_user", &self.db_user)
            .field("db_password", &"***")
            .field("db_port", &self.db_port)
            .field("debug", &self.debug)
            .field("app_host", &self.app_host)
            .field("app_port", &self.app_port)
            .field("db_max_connections", &self.db_max_connections)
            .field("log_format", &self.log_format)
            .finish()
    }
}

impl Settings {
    /// Load configuration with layered precedence: defaults -> `.env` -> process env
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(Some(Path::new(DEFAULT_ENV_FILE)), None)
    }

    /// Load configuration from an explicit env file and environment map.
    ///
    /// `env: None` reads the process environment. A missing env file is not an error.
    pub fn load_from(
        env_file: Option<&Path>,
        env: Option<Map<String, String>>,
    ) -> Result<Self, SettingsError> {
        let file_vars = match env_file {
            Some(path) if path.exists() => Some(read_env_file(path)?),
            _ => None,
        };

        let mut builder = Config::builder()
            .set_default("pgport", 5432)?
            .set_default("debug", false)?
            .set_default("app_host", "0.0.0.0")?
            .set_default("app_port", 8000)?
            .set_default("db_max_connections", 10)?
            .set_default("log_format", "text")?;

        if let Some(vars) = file_vars {
            builder = builder.add_source(Environment::default().source(Some(vars)));
        }

        let settings: Settings = builder
            .add_source(Environment::default().source(env))
            .build()?
            .try_deserialize()?;

        settings.validate()?;
        Ok(settings)
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.db_host.trim().is_empty() {
            return Err(SettingsError::Invalid("PGHOST cannot be empty".to_string()));
        }
        if self.db_name.trim().is_empty() {
            return Err(SettingsError::Invalid("PGDATABASE cannot be empty".to_string()));
        }
        if self.db_user.trim().is_empty() {
            return Err(SettingsError::Invalid("PGUSER cannot be empty".to_string()));
        }
        if self.db_port == 0 {
            return Err(SettingsError::Invalid(
                "PGPORT must be greater than 0".to_string(),
            ));
        }
        if self.db_max_connections == 0 {
            return Err(SettingsError::Invalid(
                "DB_MAX_CONNECTIONS must be greater than 0".to_string(),
            ));
        }
        self.app_host.parse::<IpAddr>().map_err(|e| {
            SettingsError::Invalid(format!("APP_HOST '{}' is not an IP address: {}", self.app_host, e))
        })?;
        Ok(())
    }

    /// Connection URL derived from the typed fields, with user, password and
    /// database name percent-encoded
    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            urlencoding::encode(&self.db_user),
            urlencoding::encode(&self.db_password),
            self.db_host,
            self.db_port,
            urlencoding::encode(&self.db_name)
        )
    }

    /// Same as [`Settings::database_url`] with the password masked, for logs
    pub fn redacted_database_url(&self) -> String {
        format!(
            "postgres://{}:***@{}:{}/{}",
            urlencoding::encode(&self.db_user),
            self.db_host,
            self.db_port,
            urlencoding::encode(&self.db_name)
        )
    }

    /// Typed connection options; statements are logged only in debug mode
    pub fn connect_options(&self) -> PgConnectOptions {
        let options = PgConnectOptions::new()
            .host(&self.db_host)
            .port(self.db_port)
            .username(&self.db_user)
            .password(&self.db_password)
            .database(&self.db_name);

        if self.debug {
            options.log_statements(log::LevelFilter::Info)
        } else {
            options.disable_statement_logging()
        }
    }

    /// Address the HTTP server binds to
    pub fn listen_addr(&self) -> Result<SocketAddr, SettingsError> {
        let ip = self
            .app_host
            .parse::<IpAddr>()
            .map_err(|e| SettingsError::Invalid(format!("Invalid APP_HOST: {}", e)))?;
        Ok(SocketAddr::new(ip, self.app_port))
    }

    /// Default tracing filter when `RUST_LOG` is unset
    pub fn default_log_filter(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

fn read_env_file(path: &Path) -> Result<Map<String, String>, SettingsError> {
    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| SettingsError::EnvFile(format!("{}: {}", path.display(), e)))?;

    let mut vars = Map::new();
    for item in iter {
        let (key, value) =
            item.map_err(|e| SettingsError::EnvFile(format!("{}: {}", path.display(), e)))?;
        vars.insert(key, value);
    }
    Ok(vars)
}
