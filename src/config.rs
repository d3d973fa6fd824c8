//! Engine configuration.
//!
//! The platform's 48-hour scheduling horizon and the 6-month default
//! expansion window are policy, not architecture, so they live here as
//! named, overridable values rather than hard-coded constants.

use std::path::PathBuf;
use std::time::Duration;

use config::{Config, File};
use serde::{Deserialize, Deserializer};

use crate::error::{CalarmError, CalarmResult};
use crate::expand::ExpandOptions;
use crate::time::CanonicalTime;

/// Furthest ahead the platform timer accepts a registration.
pub const DEFAULT_MAX_FORWARD_WINDOW: Duration = Duration::from_secs(48 * 60 * 60);

/// Expansion window applied when a pass names no max date.
pub const DEFAULT_EXPANSION_WINDOW: Duration = Duration::from_secs(180 * 24 * 60 * 60);

/// Occurrences emitted per expansion pass before the cursor takes over.
pub const DEFAULT_EXPANSION_LIMIT: usize = 100;

/// Tunable engine policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    #[serde(deserialize_with = "duration_from_str")]
    pub max_forward_window: Duration,
    #[serde(deserialize_with = "duration_from_str")]
    pub default_expansion_window: Duration,
    pub expansion_limit: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            max_forward_window: DEFAULT_MAX_FORWARD_WINDOW,
            default_expansion_window: DEFAULT_EXPANSION_WINDOW,
            expansion_limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

impl EngineConfig {
    /// Load configuration from an optional TOML file, falling back to the
    /// defaults for anything unset.
    pub fn load(path: impl Into<PathBuf>) -> CalarmResult<Self> {
        Config::builder()
            .add_source(File::from(path.into()).required(false))
            .build()
            .map_err(|e| CalarmError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| CalarmError::Config(e.to_string()))
    }

    /// Expansion options for one pass starting at `now`, windowed and
    /// capped by this configuration.
    pub fn expand_options(&self, now: CanonicalTime) -> ExpandOptions {
        let max_date = now.shifted_by_seconds(self.default_expansion_window.as_secs() as i64);
        let mut options = ExpandOptions::new(now);
        options.max_date = Some(max_date);
        options.limit = self.expansion_limit;
        options
    }
}

/// Accept durations in humantime form ("48h", "180days").
fn duration_from_str<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
}
