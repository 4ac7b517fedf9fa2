use std::borrow::Cow;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_FEED_EXTENSION, DEFAULT_INTERVAL_SECS, DEFAULT_PRODUCT_ID, DEFAULT_SERVER_PORT,
};
use crate::error::{CoreError, CoreResult};

/// Prefix of the environment variables read into [`Settings`].
pub const ENV_PREFIX: &str = "ICSFEED";

/// Connection string variable read by existing deployments. Used for
/// `database.url` when no other source sets it.
pub const LEGACY_DATABASE_URL_ENV: &str = "MYSQL_URL";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database: DatabaseConfig,
    pub feed: FeedConfig,
    pub schedule: ScheduleConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u8,
}

/// Database engine, chosen by the scheme of `database.url`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseBackend {
    /// `postgres://` or `postgresql://`
    Postgres,
    /// `mysql://`
    Mysql,
}

impl DatabaseBackend {
    /// ## Summary
    /// Picks the backend from the scheme of a connection URL.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` if the scheme is missing or
    /// not supported.
    pub fn from_url(url: &str) -> CoreResult<Self> {
        let scheme = url
            .split_once("://")
            .map(|(scheme, _)| scheme.to_ascii_lowercase());

        match scheme.as_deref() {
            Some("postgres" | "postgresql") => Ok(Self::Postgres),
            Some("mysql") => Ok(Self::Mysql),
            _ => Err(invalid(
                "database.url must start with postgres://, postgresql:// or mysql://",
            )),
        }
    }
}

impl DatabaseConfig {
    /// ## Summary
    /// Returns the backend selected by `url`.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` for an unsupported scheme.
    pub fn backend(&self) -> CoreResult<DatabaseBackend> {
        DatabaseBackend::from_url(&self.url)
    }

    /// ## Summary
    /// Returns `url` with the password replaced by `***`.
    #[must_use]
    pub fn redacted_url(&self) -> Cow<'_, str> {
        redact_password(&self.url)
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.redacted_url())
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

fn redact_password(url: &str) -> Cow<'_, str> {
    let Some((scheme, rest)) = url.split_once("://") else {
        return Cow::Borrowed(url);
    };
    let authority_end = rest.find('/').unwrap_or(rest.len());
    let Some(at) = rest[..authority_end].rfind('@') else {
        return Cow::Borrowed(url);
    };
    let Some((user, _)) = rest[..at].split_once(':') else {
        return Cow::Borrowed(url);
    };

    Cow::Owned(format!("{scheme}://{user}:***{}", &rest[at..]))
}

/// Where feeds come from and where they go.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// Entry template, read once per cycle.
    pub template: PathBuf,
    /// Directory the feed files are written to and published from.
    pub destination: PathBuf,
    /// Text placed between `PRODID:-//` and `//EN`.
    pub product_id: String,
    /// Extension of each `<category id>.<extension>` file.
    pub extension: String,
}

impl FeedConfig {
    /// ## Summary
    /// Returns the output path of the feed for `category_id`.
    #[must_use]
    pub fn feed_path(&self, category_id: i64) -> PathBuf {
        self.destination
            .join(format!("{category_id}.{}", self.extension))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleConfig {
    pub interval_secs: u64,
}

impl ScheduleConfig {
    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    /// ## Summary
    /// Returns the server address as a string in the format "host:port".
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Values given on the command line. They win over every other source.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Explicit configuration file. When set the file must exist.
    pub config_file: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub destination: Option<PathBuf>,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from environment variables, an optional TOML file
    /// and the command line overrides, then validates it.
    ///
    /// File values take precedence over environment variables; overrides take
    /// precedence over both. `MYSQL_URL` supplies `database.url` when nothing
    /// else does.
    ///
    /// ## Errors
    /// Returns an error if building the configuration, deserializing it, or
    /// validating it fails.
    pub fn load(overrides: &ConfigOverrides) -> Result<Self> {
        let file = overrides.config_file.as_ref().map_or_else(
            || File::with_name("config.toml").required(false),
            |path| File::from(path.as_path()).required(true),
        );

        let builder = with_defaults(Config::builder())?;
        let builder = with_database_url_fallback(
            builder,
            std::env::var(LEGACY_DATABASE_URL_ENV).ok(),
        )?
            // Env variables, e.g. ICSFEED_DATABASE__URL
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            // TOML file
            .add_source(file);

        Self::build(builder, overrides)
    }

    /// ## Summary
    /// Builds settings from an inline TOML document instead of the process
    /// environment.
    ///
    /// ## Errors
    /// Returns an error if the document cannot be parsed or the resulting
    /// settings are invalid.
    pub fn from_toml(source: &str, overrides: &ConfigOverrides) -> Result<Self> {
        let builder = with_defaults(Config::builder())?
            .add_source(File::from_str(source, FileFormat::Toml));

        Self::build(builder, overrides)
    }

    fn build(builder: ConfigBuilder<DefaultState>, overrides: &ConfigOverrides) -> Result<Self> {
        let settings = builder
            .set_override_option("feed.template", path_value(overrides.template.as_ref()))?
            .set_override_option(
                "feed.destination",
                path_value(overrides.destination.as_ref()),
            )?
            .build()?
            .try_deserialize::<Self>()?;

        settings.validate()?;

        Ok(settings)
    }

    /// ## Summary
    /// Checks values the deserializer cannot check on its own.
    ///
    /// ## Errors
    /// Returns `CoreError::InvalidConfiguration` naming the first offending key.
    pub fn validate(&self) -> CoreResult<()> {
        if self.database.url.trim().is_empty() {
            return Err(invalid("database.url must not be empty"));
        }
        self.database.backend()?;
        if self.database.max_connections == 0 {
            return Err(invalid("database.max_connections must be at least 1"));
        }
        if self.feed.template.as_os_str().is_empty() {
            return Err(invalid("feed.template is mandatory (-t flag)"));
        }
        if self.feed.destination.as_os_str().is_empty() {
            return Err(invalid("feed.destination is mandatory (-d flag)"));
        }
        if self.feed.product_id.is_empty() {
            return Err(invalid("feed.product_id must not be empty"));
        }
        if self.feed.extension.is_empty()
            || self.feed.extension.contains(['/', '\\', '.'])
        {
            return Err(invalid(
                "feed.extension must be a non-empty name without separators or dots",
            ));
        }
        if self.schedule.interval_secs == 0 {
            return Err(invalid("schedule.interval_secs must be at least 1"));
        }
        Ok(())
    }
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config(overrides: &ConfigOverrides) -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load(overrides)
}

fn with_defaults(
    builder: ConfigBuilder<DefaultState>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    builder
        .set_default("database.max_connections", 2)?
        .set_default("feed.product_id", DEFAULT_PRODUCT_ID)?
        .set_default("feed.extension", DEFAULT_FEED_EXTENSION)?
        .set_default("schedule.interval_secs", DEFAULT_INTERVAL_SECS)?
        .set_default("server.host", "0.0.0.0")?
        .set_default("server.port", i64::from(DEFAULT_SERVER_PORT))?
        .set_default("logging.level", "debug")
}

/// Lowest-priority `database.url`, taken from the legacy variable.
fn with_database_url_fallback(
    builder: ConfigBuilder<DefaultState>,
    url: Option<String>,
) -> Result<ConfigBuilder<DefaultState>, config::ConfigError> {
    match url.filter(|url| !url.trim().is_empty()) {
        Some(url) => builder.set_default("database.url", url),
        None => Ok(builder),
    }
}

fn path_value(path: Option<&PathBuf>) -> Option<String> {
    path.map(|p| p.to_string_lossy().into_owned())
}

fn invalid(message: &str) -> CoreError {
    CoreError::InvalidConfiguration(message.to_string())
}
