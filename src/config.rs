//! Application configuration.
//!
//! Values are merged from built-in defaults, an optional `bindays.toml` in the
//! working directory, then `BINDAYS_*` environment variables (e.g.
//! `BINDAYS_REQUEST_TIMEOUT=10s`).

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use figment::Figment;
use figment::providers::{Env, Format, Toml};
use fundu::DurationParser;
use serde::{Deserialize, Deserializer};
use url::Url;

use crate::council::{FormConfig, FormPageClient, HttpSettings};

pub const CONFIG_FILE: &str = "bindays.toml";
pub const ENV_PREFIX: &str = "BINDAYS_";

fn default_base_url() -> Url {
    Url::parse("https://www.guildford.gov.uk").expect("static URL is valid")
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_slow_request_threshold() -> Duration {
    Duration::from_secs(5)
}

fn default_port() -> u16 {
    8080
}

fn default_user_agent() -> String {
    format!("bindays/{}", env!("CARGO_PKG_VERSION"))
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Council site root; every form endpoint is derived from it.
    #[serde(default = "default_base_url")]
    pub base_url: Url,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound for each HTTP round trip.
    #[serde(
        default = "default_request_timeout",
        deserialize_with = "deserialize_duration"
    )]
    pub request_timeout: Duration,
    #[serde(
        default = "default_slow_request_threshold",
        deserialize_with = "deserialize_duration"
    )]
    pub slow_request_threshold: Duration,
    /// Address cache root; `~/.bin_days` when unset.
    #[serde(default)]
    pub cache_dir: Option<PathBuf>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            log_level: default_log_level(),
            request_timeout: default_request_timeout(),
            slow_request_threshold: default_slow_request_threshold(),
            cache_dir: None,
            port: default_port(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load from `bindays.toml` (if present) and the environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::figment()
            .extract()
            .context("Failed to load config")
    }

    pub fn figment() -> Figment {
        Figment::new()
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX))
    }

    pub fn http_settings(&self) -> HttpSettings {
        HttpSettings {
            timeout: self.request_timeout,
            slow_threshold: self.slow_request_threshold,
            user_agent: self.user_agent.clone(),
        }
    }

    /// Form client for the configured site.
    pub fn form_client(&self) -> anyhow::Result<FormPageClient> {
        let form = FormConfig::for_site(&self.base_url)
            .with_context(|| format!("invalid base URL {}", self.base_url))?;
        Ok(FormPageClient::new(form, self.http_settings()))
    }
}

/// Accepts human durations such as `"30s"`, `"1.5m"` or a bare number of seconds.
fn deserialize_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Seconds(secs) => Ok(Duration::from_secs(secs)),
        Raw::Text(text) => {
            let parsed = DurationParser::with_all_time_units()
                .parse(text.trim())
                .map_err(|e| serde::de::Error::custom(format!("invalid duration {text:?}: {e}")))?;
            Duration::try_from(parsed)
                .map_err(|e| serde::de::Error::custom(format!("invalid duration {text:?}: {e}")))
        }
    }
}
