//! Engine settings honored from the environment.
//!
//! The engine reads three environment variables as configuration
//! defaults: `MAX_CONCURRENT_WORLDS`, `DEFAULT_POPULATION_SIZE`, and
//! `SIMULATION_TICK_MS`. Unset or unparseable values leave the built-in
//! defaults untouched.

use std::str::FromStr;

use tracing::warn;

/// Engine-level settings applied as defaults for new worlds and the
/// manager cap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
    /// Maximum number of worlds the manager will hold at once.
    pub max_concurrent_worlds: usize,
    /// Population size used when a world config omits one.
    pub default_population_size: u32,
    /// Tick interval in milliseconds used when a world config omits one.
    pub simulation_tick_ms: u64,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            max_concurrent_worlds: 10,
            default_population_size: 10_000,
            simulation_tick_ms: 100,
        }
    }
}

impl EngineSettings {
    /// Build settings from the defaults, overridden by the environment
    /// where set.
    pub fn from_env() -> Self {
        let mut settings = Self::default();
        settings.apply_env_overrides();
        settings
    }

    /// Override settings with environment variables when set.
    pub fn apply_env_overrides(&mut self) {
        if let Some(value) = env_value("MAX_CONCURRENT_WORLDS") {
            self.max_concurrent_worlds = value;
        }
        if let Some(value) = env_value("DEFAULT_POPULATION_SIZE") {
            self.default_population_size = value;
        }
        if let Some(value) = env_value("SIMULATION_TICK_MS") {
            self.simulation_tick_ms = value;
        }
    }
}

/// Read and parse one environment variable, warning on garbage.
fn env_value<T: FromStr>(name: &str) -> Option<T> {
    let raw = std::env::var(name).ok()?;
    match parse_value(&raw) {
        Some(value) => Some(value),
        None => {
            warn!(var = name, value = raw, "Ignoring unparseable setting");
            None
        }
    }
}

/// Parse a trimmed setting value.
fn parse_value<T: FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let settings = EngineSettings::default();
        assert_eq!(settings.max_concurrent_worlds, 10);
        assert_eq!(settings.default_population_size, 10_000);
        assert_eq!(settings.simulation_tick_ms, 100);
    }

    #[test]
    fn values_parse_with_whitespace() {
        assert_eq!(parse_value::<usize>(" 25 "), Some(25));
        assert_eq!(parse_value::<u64>("500"), Some(500));
    }

    #[test]
    fn garbage_values_are_ignored() {
        assert_eq!(parse_value::<u32>("lots"), None);
        assert_eq!(parse_value::<u32>(""), None);
        assert_eq!(parse_value::<u32>("-3"), None);
    }
}
