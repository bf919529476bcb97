//! Application configuration.
//!
//! Loaded from a TOML file naming the route pages, the target stations and
//! their directions, plus optional overrides for the normalizer literals,
//! table selectors, fetch behaviour and output time zone. Secrets (the LINE
//! channel token) come from the environment, not from this file.
//!
//! ```toml
//! time_zone = "Asia/Taipei"
//!
//! [[routes]]
//! url = "https://ebus.example/route/307"
//! label = "307"
//!
//! [[targets]]
//! key = "cks"
//! name = "中正紀念堂"
//! direction = "inbound"
//! ```

use std::collections::HashSet;
use std::path::Path;

use chrono::format::{Item, StrftimeItems};
use chrono_tz::Tz;
use serde::Deserialize;

use crate::domain::{Direction, DomainError, RouteSource, StationTarget};
use crate::fetch::{FetchError, FetcherConfig};
use crate::normalize::{AmbiguousLiteral, ArrivalTextNormalizer, NormalizerConfig};
use crate::parser::TableSelector;
use crate::report::DEFAULT_TIMESTAMP_FORMAT;

/// Default output time zone.
pub const DEFAULT_TIME_ZONE: &str = "Asia/Taipei";

/// Default word that triggers a run from a chat message.
pub const DEFAULT_TRIGGER_WORD: &str = "公車";

/// Errors from loading or validating configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("no routes configured")]
    NoRoutes,

    #[error("no station targets configured")]
    NoTargets,

    #[error("duplicate station target key {0:?}")]
    DuplicateTargetKey(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("unknown time zone {0:?}")]
    UnknownTimeZone(String),

    #[error(transparent)]
    Literal(#[from] AmbiguousLiteral),

    #[error("no table selectors configured")]
    NoTableSelectors,

    #[error("no trigger words configured")]
    NoTriggerWords,

    #[error("invalid timestamp format {0:?}")]
    TimestampFormat(String),

    #[error("invalid fetch settings: {0}")]
    Fetch(#[from] FetchError),
}

/// One `[[routes]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteEntry {
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
}

/// One `[[targets]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TargetEntry {
    pub key: String,
    pub name: String,
    pub direction: Direction,
}

/// The configuration file as written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub routes: Vec<RouteEntry>,

    #[serde(default)]
    pub targets: Vec<TargetEntry>,

    #[serde(default)]
    pub normalizer: NormalizerConfig,

    /// Table selectors, tried in order.
    #[serde(default = "TableSelector::defaults")]
    pub tables: Vec<TableSelector>,

    #[serde(default)]
    pub fetch: FetcherConfig,

    /// IANA zone name for report timestamps.
    #[serde(default = "default_time_zone")]
    pub time_zone: String,

    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,

    /// A chat message containing any of these words starts a run.
    #[serde(default = "default_trigger_words")]
    pub trigger_words: Vec<String>,
}

fn default_time_zone() -> String {
    DEFAULT_TIME_ZONE.to_string()
}

fn default_timestamp_format() -> String {
    DEFAULT_TIMESTAMP_FORMAT.to_string()
}

fn default_trigger_words() -> Vec<String> {
    vec![DEFAULT_TRIGGER_WORD.to_string()]
}

/// Configuration after validation, with domain values built.
#[derive(Debug, Clone)]
pub struct Settings {
    pub routes: Vec<RouteSource>,
    pub targets: Vec<StationTarget>,
    pub normalizer: ArrivalTextNormalizer,
    pub tables: Vec<TableSelector>,
    pub fetch: FetcherConfig,
    pub time_zone: Tz,
    pub timestamp_format: String,
    pub trigger_words: Vec<String>,
}

impl AppConfig {
    /// Read and validate the file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Settings, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)?.validate()
    }

    /// Parse without validating.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Check the configuration and build its domain values.
    pub fn validate(&self) -> Result<Settings, ConfigError> {
        if self.routes.is_empty() {
            return Err(ConfigError::NoRoutes);
        }
        if self.targets.is_empty() {
            return Err(ConfigError::NoTargets);
        }
        if self.tables.is_empty() {
            return Err(ConfigError::NoTableSelectors);
        }

        let routes = self
            .routes
            .iter()
            .map(|r| RouteSource::new(r.url.clone(), r.label.clone()))
            .collect::<Result<Vec<_>, _>>()?;

        let mut seen = HashSet::new();
        let mut targets = Vec::with_capacity(self.targets.len());
        for entry in &self.targets {
            let target = StationTarget::new(&entry.key, &entry.name, entry.direction)?;
            if !seen.insert(target.key.clone()) {
                return Err(ConfigError::DuplicateTargetKey(target.key));
            }
            targets.push(target);
        }

        let time_zone: Tz = self
            .time_zone
            .parse()
            .map_err(|_| ConfigError::UnknownTimeZone(self.time_zone.clone()))?;

        let trigger_words: Vec<String> = self
            .trigger_words
            .iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
        if trigger_words.is_empty() {
            return Err(ConfigError::NoTriggerWords);
        }

        if StrftimeItems::new(&self.timestamp_format).any(|item| matches!(item, Item::Error)) {
            return Err(ConfigError::TimestampFormat(self.timestamp_format.clone()));
        }
        self.fetch.readiness.validate()?;

        Ok(Settings {
            routes,
            targets,
            normalizer: ArrivalTextNormalizer::new(&self.normalizer)?,
            tables: self.tables.clone(),
            fetch: self.fetch.clone(),
            time_zone,
            timestamp_format: self.timestamp_format.clone(),
            trigger_words,
        })
    }
}
