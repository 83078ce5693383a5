// Application configuration, loaded from environment variables and CLI flags.

use std::str::FromStr;
use thiserror::Error;

use crate::event::DEFAULT_CHANNEL_CAPACITY;
use crate::leaderboard::{ScoringConfig, ScoringConfigPatch, VisibilityMode};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("Invalid SCORING_CONFIG: {0}")]
    Scoring(#[from] serde_json::Error),
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Port to bind the HTTP server to.
    pub port: u16,
    /// Scoring defaults for newly created games.
    pub scoring: ScoringConfig,
    /// Visibility mode for newly created games.
    pub default_visibility: VisibilityMode,
    /// Per-game event buffer size.
    pub event_channel_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 3000,
            scoring: ScoringConfig::default(),
            default_visibility: VisibilityMode::default(),
            event_channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl Config {
    /// Load configuration from the process environment and CLI arguments.
    ///
    /// Environment variables:
    /// - `PORT` - HTTP server port (default: 3000)
    /// - `SCORING_CONFIG` - JSON object of scoring overrides, e.g. `{"speedBonusMax": 60}`
    /// - `DEFAULT_VISIBILITY` - `always_on`, `hidden` or `reveal_at_end` (default: `always_on`)
    /// - `EVENT_CHANNEL_CAPACITY` - per-game event buffer (default: 100)
    ///
    /// CLI flags:
    /// - `--port <PORT>` - Override the port
    pub fn load() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_sources(&args, |name| std::env::var(name).ok())
    }

    /// Builds the config from explicit arguments and an environment lookup.
    pub fn from_sources(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        // Port: CLI flag --port takes precedence, then env var, then default
        let port = match Self::parse_cli_value(args, "--port").or_else(|| env("PORT")) {
            Some(value) => parse_value("PORT", &value)?,
            None => defaults.port,
        };

        let scoring = match env("SCORING_CONFIG") {
            Some(json) if !json.trim().is_empty() => {
                let patch: ScoringConfigPatch = serde_json::from_str(&json)?;
                defaults.scoring.merged(&patch)
            }
            _ => defaults.scoring,
        };

        let default_visibility = match env("DEFAULT_VISIBILITY") {
            Some(value) => parse_value("DEFAULT_VISIBILITY", &value)?,
            None => defaults.default_visibility,
        };

        let event_channel_capacity = match env("EVENT_CHANNEL_CAPACITY") {
            Some(value) => parse_value("EVENT_CHANNEL_CAPACITY", &value)?,
            None => defaults.event_channel_capacity,
        };

        Ok(Config {
            port,
            scoring,
            default_visibility,
            event_channel_capacity,
        })
    }

    /// Parse a CLI flag value like `--port 8080`.
    fn parse_cli_value(args: &[String], flag: &str) -> Option<String> {
        args.windows(2).find_map(|pair| {
            if pair[0] == flag {
                Some(pair[1].clone())
            } else {
                None
            }
        })
    }
}

fn parse_value<T: FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        name,
        value: value.to_string(),
    })
}
