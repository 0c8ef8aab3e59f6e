/// Service configuration, loaded from `rockmon.toml`.
///
/// A missing config file is not an error — the daemon runs fine on
/// defaults — but a file that exists and fails to parse aborts startup,
/// since silently ignoring a typo'd tick interval would be worse.
///
/// ```toml
/// tick_interval_secs = 3
/// # rng_seed = 42        # pin the jitter stream for reproducible demos
///
/// [logging]
/// level = "info"
/// # file = "rockmon.log"
/// ```

use serde::Deserialize;
use std::fmt;
use std::path::Path;

/// Default path probed when no explicit config path is given.
pub const DEFAULT_CONFIG_PATH: &str = "rockmon.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServiceConfig {
    /// Background drift-and-evaluate cadence, seconds.
    pub tick_interval_secs: u64,
    /// Optional fixed RNG seed. Unset means entropy-seeded.
    pub rng_seed: Option<u64>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// Minimum level: "debug", "info", "warn", "error".
    pub level: String,
    /// Optional log file; console output happens regardless.
    pub file: Option<String>,
    /// Include timestamps in console output.
    pub console_timestamps: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        ServiceConfig {
            tick_interval_secs: 3,
            rng_seed: None,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "info".to_string(),
            file: None,
            console_timestamps: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "Config read error: {}", e),
            ConfigError::Parse(e) => write!(f, "Config parse error: {}", e),
        }
    }
}

impl std::error::Error for ConfigError {}

impl ServiceConfig {
    /// Loads the config from `path`, or returns defaults if the file does
    /// not exist.
    pub fn load(path: &Path) -> Result<ServiceConfig, ConfigError> {
        if !path.exists() {
            return Ok(ServiceConfig::default());
        }
        let raw = std::fs::read_to_string(path).map_err(ConfigError::Io)?;
        toml::from_str(&raw).map_err(ConfigError::Parse)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_cadence() {
        let config = ServiceConfig::default();
        assert_eq!(config.tick_interval_secs, 3);
        assert!(config.rng_seed.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_toml_fills_in_defaults() {
        let config: ServiceConfig = toml::from_str("tick_interval_secs = 10\n")
            .expect("partial config should parse");
        assert_eq!(config.tick_interval_secs, 10);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_full_toml_roundtrip() {
        let config: ServiceConfig = toml::from_str(
            "tick_interval_secs = 5\nrng_seed = 42\n\n[logging]\nlevel = \"debug\"\nfile = \"rockmon.log\"\n",
        )
        .expect("full config should parse");
        assert_eq!(config.tick_interval_secs, 5);
        assert_eq!(config.rng_seed, Some(42));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file.as_deref(), Some("rockmon.log"));
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<ServiceConfig, _> = toml::from_str("tick_interval = 3\n");
        assert!(result.is_err(), "misspelled key must not be silently dropped");
    }
}
