use game_core::Params;
use worker::Env;

/// Runtime settings for one match actor, read from worker vars
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub tick_interval_ms: u64,
    /// Send a snapshot every N ticks
    pub snapshot_stride: u32,
    pub idle_timeout_secs: u64,
    /// Match API endpoint; results are not persisted without it
    pub recorder_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: Params::TICK_INTERVAL_MS,
            snapshot_stride: 1,
            idle_timeout_secs: 60,
            recorder_url: None,
        }
    }
}

impl ServerConfig {
    pub fn from_env(env: &Env) -> Self {
        Self::from_lookup(|key| env.var(key).ok().map(|var| var.to_string()))
    }

    /// Build from a key lookup. Missing or unparsable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let parse_u64 = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse::<u64>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(default)
        };

        Self {
            tick_interval_ms: parse_u64("TICK_INTERVAL_MS", defaults.tick_interval_ms),
            snapshot_stride: lookup("SNAPSHOT_STRIDE")
                .and_then(|v| v.trim().parse::<u32>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(defaults.snapshot_stride),
            idle_timeout_secs: parse_u64("IDLE_TIMEOUT_SECS", defaults.idle_timeout_secs),
            recorder_url: lookup("MATCH_API_URL").filter(|url| !url.trim().is_empty()),
        }
    }
}
