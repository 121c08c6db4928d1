//! Session and watcher settings.

use mediation_core::{DecodeConfig, Density};
use mediation_fill::DEFAULT_LANGUAGE;
use std::time::Duration;

/// Reload watcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WatchConfig {
    /// Quiet time after the last event before a change is reported.
    pub debounce: Duration,
    /// Capacity of the raw and debounced notification channels.
    pub channel_capacity: usize,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            channel_capacity: 64,
        }
    }
}

/// Everything a [`Session`](crate::Session) needs besides its page path and
/// renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionConfig {
    pub decode: DecodeConfig,
    pub watch: WatchConfig,
    pub density: Density,
    /// Active content language when the session starts.
    pub initial_lang: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            decode: DecodeConfig::default(),
            watch: WatchConfig::default(),
            density: Density::default(),
            initial_lang: DEFAULT_LANGUAGE.to_string(),
        }
    }
}
