use std::time::Duration;

use anyhow::Result;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder};
use serde::{Deserialize, Deserializer};

use crate::catalog::{AppointmentType, Location};
use crate::error::{CoreError, CoreResult};

/// Longest accepted tick interval: one week.
pub const MAX_INTERVAL_MINS: u64 = 7 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub monitor: MonitorConfig,
    pub database: DatabaseConfig,
    pub browser: BrowserConfig,
    pub notify: NotifyConfig,
    pub logging: LoggingConfig,
}

/// What to watch and how often.
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    pub appointment_type: AppointmentType,
    #[serde(deserialize_with = "deserialize_locations")]
    pub locations: Vec<Location>,
    /// Hard deadline for scraping every tracked location in one tick.
    pub timeout_secs: u64,
    pub interval_mins: u64,
    pub stop_on_failure: bool,
    pub notify_unavailable: bool,
    pub max_transient_retries: u32,
    pub transient_backoff_secs: u64,
    /// Run a single tick and exit instead of looping.
    pub run_once: bool,
}

impl MonitorConfig {
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    #[must_use]
    pub const fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_mins.saturating_mul(60))
    }

    #[must_use]
    pub const fn transient_backoff(&self) -> Duration {
        Duration::from_secs(self.transient_backoff_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` URL. Without one the monitor keeps its state in memory.
    pub url: Option<String>,
    pub max_connections: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BrowserConfig {
    pub webdriver_url: String,
    pub headless: bool,
    pub disable_gpu: bool,
    /// Deadline of the short waits whose expiry means "nothing on the page".
    pub wait_timeout_secs: u64,
}

impl BrowserConfig {
    #[must_use]
    pub const fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NotifyConfig {
    pub discord_webhook: Option<String>,
    pub username: String,
    /// Pause between two location messages.
    pub pacing_millis: u64,
}

impl NotifyConfig {
    #[must_use]
    pub const fn pacing(&self) -> Duration {
        Duration::from_millis(self.pacing_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Settings {
    /// ## Summary
    /// Loads configuration from `config.toml` and `SLOTWATCH__*` environment variables into a
    /// `Settings`. Environment variables take precedence over the file.
    ///
    /// ## Errors
    /// Returns an error if building, deserializing or validating the configuration fails.
    pub fn load() -> Result<Self> {
        let settings = Self::builder()?
            .add_source(config::File::with_name("config.toml").required(false))
            .add_source(
                config::Environment::with_prefix("SLOTWATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("monitor.locations")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize::<Self>()?;
        settings.validate()?;
        Ok(settings)
    }

    /// ## Summary
    /// Returns a builder pre-populated with every default, ready for more sources.
    ///
    /// ## Errors
    /// Returns an error if a default cannot be set.
    pub fn builder() -> Result<ConfigBuilder<DefaultState>> {
        Ok(Config::builder()
            .set_default("monitor.appointment_type", "permit")?
            .set_default("monitor.locations", "cary,durham-east,durham-south")?
            .set_default("monitor.timeout_secs", 120)?
            .set_default("monitor.interval_mins", 30)?
            .set_default("monitor.stop_on_failure", false)?
            .set_default("monitor.notify_unavailable", true)?
            .set_default("monitor.max_transient_retries", 3)?
            .set_default("monitor.transient_backoff_secs", 5)?
            .set_default("monitor.run_once", false)?
            .set_default("database.max_connections", 4)?
            .set_default("browser.webdriver_url", "http://localhost:9515")?
            .set_default("browser.headless", true)?
            .set_default("browser.disable_gpu", false)?
            .set_default("browser.wait_timeout_secs", 30)?
            .set_default("notify.username", "slotwatch-bot")?
            .set_default("notify.pacing_millis", 1000)?
            .set_default("logging.level", "info")?)
    }

    /// ## Summary
    /// Checks the invariants deserialization cannot express.
    ///
    /// ## Errors
    /// Returns `CoreError::ValidationError` describing the first violated rule.
    pub fn validate(&self) -> CoreResult<()> {
        if self.monitor.locations.is_empty() {
            return Err(CoreError::ValidationError(
                "monitor.locations must name at least one location".to_owned(),
            ));
        }
        if self.monitor.timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "monitor.timeout_secs must be positive".to_owned(),
            ));
        }
        if self.monitor.interval_mins == 0 {
            return Err(CoreError::ValidationError(
                "monitor.interval_mins must be positive".to_owned(),
            ));
        }
        if self.monitor.interval_mins > MAX_INTERVAL_MINS {
            return Err(CoreError::ValidationError(format!(
                "monitor.interval_mins must be at most {MAX_INTERVAL_MINS}"
            )));
        }
        if self.browser.wait_timeout_secs == 0 {
            return Err(CoreError::ValidationError(
                "browser.wait_timeout_secs must be positive".to_owned(),
            ));
        }
        if self
            .notify
            .discord_webhook
            .as_deref()
            .is_some_and(|url| !url.starts_with("http"))
        {
            return Err(CoreError::ValidationError(
                "notify.discord_webhook must be an http(s) URL".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    List(Vec<String>),
    Joined(String),
}

/// Accepts either a list of names or one comma-separated string.
fn deserialize_locations<'de, D>(deserializer: D) -> Result<Vec<Location>, D::Error>
where
    D: Deserializer<'de>,
{
    let names = match NameList::deserialize(deserializer)? {
        NameList::List(names) => names,
        NameList::Joined(joined) => joined
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_owned)
            .collect(),
    };

    let mut locations = Vec::with_capacity(names.len());
    for name in names {
        let location = name
            .trim()
            .parse::<Location>()
            .map_err(serde::de::Error::custom)?;
        if !locations.contains(&location) {
            locations.push(location);
        }
    }
    Ok(locations)
}

/// ## Summary
/// Loads configuration from environment variables and `.env` file.
///
/// ## Errors
/// Returns an error if loading or deserializing the configuration fails.
pub fn load_config() -> Result<Settings> {
    dotenvy::dotenv().ok();

    Settings::load()
}
