//! Configuration loading and typed config structures for the Ascension simulation.
//!
//! The canonical configuration lives in `ascension-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads the file. Every loaded
//! configuration should pass [`SimulationConfig::validate`] before a world is
//! built from it, so that missing or out-of-range values fail at startup and
//! never mid-tick.

use std::path::Path;
use std::time::Duration;

use ascension_types::{CalendarError, Month, MonthStamp};
use serde::Deserialize;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is outside its allowed range.
    #[error("invalid config value for {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The configured start date is not a valid calendar date.
    #[error("invalid start date: {source}")]
    Calendar {
        /// The underlying calendar error.
        #[from]
        source: CalendarError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
///
/// Mirrors the structure of `ascension-config.yaml`. All fields have
/// defaults, so an empty file is a valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// World-level settings (name, seed, start date).
    #[serde(default)]
    pub world: WorldConfig,

    /// Population parameters.
    #[serde(default)]
    pub population: PopulationConfig,

    /// Social parameters.
    #[serde(default)]
    pub social: SocialConfig,

    /// Action execution and external call budgets.
    #[serde(default)]
    pub execution: ExecutionConfig,

    /// Fortune and misfortune rates.
    #[serde(default)]
    pub encounters: EncounterConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Simulation boundary parameters.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yml::from_str(yaml)?;
        Ok(config)
    }

    /// Check every value that has a restricted range.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] for the first offending field, or
    /// [`ConfigError::Calendar`] if the start month is not 1 to 12.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.world.start_stamp()?;
        check_probability(
            "population.awakening_rate_per_month",
            self.population.awakening_rate_per_month,
        )?;
        if self.population.awakening_min_age > self.population.awakening_max_age {
            return Err(ConfigError::Invalid {
                field: "population.awakening_min_age",
                reason: format!(
                    "must not exceed awakening_max_age ({})",
                    self.population.awakening_max_age
                ),
            });
        }
        if self.social.relation_check_threshold == 0 {
            return Err(ConfigError::Invalid {
                field: "social.relation_check_threshold",
                reason: String::from("must be at least 1"),
            });
        }
        if self.execution.max_local_rounds == 0 {
            return Err(ConfigError::Invalid {
                field: "execution.max_local_rounds",
                reason: String::from("must be at least 1"),
            });
        }
        for (field, value) in [
            ("execution.decision_timeout_ms", self.execution.decision_timeout_ms),
            ("execution.executor_timeout_ms", self.execution.executor_timeout_ms),
            ("execution.resolver_timeout_ms", self.execution.resolver_timeout_ms),
            ("execution.gathering_timeout_ms", self.execution.gathering_timeout_ms),
            ("execution.service_timeout_ms", self.execution.service_timeout_ms),
        ] {
            if value == 0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: String::from("timeout must be greater than zero"),
                });
            }
        }
        check_probability("encounters.fortune_rate", self.encounters.fortune_rate)?;
        check_probability("encounters.misfortune_rate", self.encounters.misfortune_rate)?;
        Ok(())
    }
}

fn check_probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is not a probability in [0, 1]"),
        })
    }
}

/// World-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorldConfig {
    /// Human-readable world name.
    #[serde(default = "default_world_name")]
    pub name: String,

    /// Random seed for reproducibility.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Calendar year of the first month.
    #[serde(default = "default_start_year")]
    pub start_year: u64,

    /// Month of year (1 to 12) of the first month.
    #[serde(default = "default_start_month")]
    pub start_month: u8,
}

impl WorldConfig {
    /// The [`MonthStamp`] of the first simulated month.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Calendar`] if the month or year is out of range.
    pub fn start_stamp(&self) -> Result<MonthStamp, ConfigError> {
        let month = Month::from_number(self.start_month)?;
        Ok(MonthStamp::from_year_month(self.start_year, month)?)
    }
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            name: default_world_name(),
            seed: default_seed(),
            start_year: default_start_year(),
            start_month: default_start_month(),
        }
    }
}

/// Population configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents to spawn at simulation start.
    #[serde(default = "default_initial_agents")]
    pub initial_agents: u32,

    /// Probability per month that one mortal awakens as a cultivator.
    #[serde(default = "default_awakening_rate")]
    pub awakening_rate_per_month: f64,

    /// Youngest awakening age in years.
    #[serde(default = "default_awakening_min_age")]
    pub awakening_min_age: u32,

    /// Oldest awakening age in years.
    #[serde(default = "default_awakening_max_age")]
    pub awakening_max_age: u32,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            initial_agents: default_initial_agents(),
            awakening_rate_per_month: default_awakening_rate(),
            awakening_min_age: default_awakening_min_age(),
            awakening_max_age: default_awakening_max_age(),
        }
    }
}

/// Social configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SocialConfig {
    /// Interactions needed before a pair is submitted for relation changes.
    #[serde(default = "default_relation_check_threshold")]
    pub relation_check_threshold: u32,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            relation_check_threshold: default_relation_check_threshold(),
        }
    }
}

/// Action execution and external call budgets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecutionConfig {
    /// Maximum executor rounds per month, including the first.
    #[serde(default = "default_max_local_rounds")]
    pub max_local_rounds: u32,

    /// Budget for one decision service batch call.
    #[serde(default = "default_decision_timeout_ms")]
    pub decision_timeout_ms: u64,

    /// Budget for one action executor step.
    #[serde(default = "default_executor_timeout_ms")]
    pub executor_timeout_ms: u64,

    /// Budget for one relationship resolver batch call.
    #[serde(default = "default_resolver_timeout_ms")]
    pub resolver_timeout_ms: u64,

    /// Budget for one gathering manager call.
    #[serde(default = "default_gathering_timeout_ms")]
    pub gathering_timeout_ms: u64,

    /// Budget for one encounter or persona call.
    #[serde(default = "default_service_timeout_ms")]
    pub service_timeout_ms: u64,
}

impl ExecutionConfig {
    /// Decision call budget as a [`Duration`].
    pub const fn decision_timeout(&self) -> Duration {
        Duration::from_millis(self.decision_timeout_ms)
    }

    /// Executor step budget as a [`Duration`].
    pub const fn executor_timeout(&self) -> Duration {
        Duration::from_millis(self.executor_timeout_ms)
    }

    /// Resolver call budget as a [`Duration`].
    pub const fn resolver_timeout(&self) -> Duration {
        Duration::from_millis(self.resolver_timeout_ms)
    }

    /// Gathering call budget as a [`Duration`].
    pub const fn gathering_timeout(&self) -> Duration {
        Duration::from_millis(self.gathering_timeout_ms)
    }

    /// Encounter and persona call budget as a [`Duration`].
    pub const fn service_timeout(&self) -> Duration {
        Duration::from_millis(self.service_timeout_ms)
    }
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            max_local_rounds: default_max_local_rounds(),
            decision_timeout_ms: default_decision_timeout_ms(),
            executor_timeout_ms: default_executor_timeout_ms(),
            resolver_timeout_ms: default_resolver_timeout_ms(),
            gathering_timeout_ms: default_gathering_timeout_ms(),
            service_timeout_ms: default_service_timeout_ms(),
        }
    }
}

/// Fortune and misfortune rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct EncounterConfig {
    /// Base probability per agent per month of a fortunate encounter.
    #[serde(default = "default_fortune_rate")]
    pub fortune_rate: f64,

    /// Base probability per agent per month of a misfortune.
    #[serde(default = "default_misfortune_rate")]
    pub misfortune_rate: f64,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            fortune_rate: default_fortune_rate(),
            misfortune_rate: default_misfortune_rate(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes
    /// precedence when set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Simulation boundary parameters.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many months. Zero runs until extinction.
    #[serde(default)]
    pub max_months: u64,

    /// Real-time milliseconds to wait between months.
    #[serde(default)]
    pub tick_interval_ms: u64,
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_months: 0,
            tick_interval_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions
// ---------------------------------------------------------------------------

fn default_world_name() -> String {
    "Azure Continent".to_owned()
}

const fn default_seed() -> u64 {
    42
}

const fn default_start_year() -> u64 {
    100
}

const fn default_start_month() -> u8 {
    1
}

const fn default_initial_agents() -> u32 {
    8
}

const fn default_awakening_rate() -> f64 {
    0.05
}

const fn default_awakening_min_age() -> u32 {
    16
}

const fn default_awakening_max_age() -> u32 {
    60
}

const fn default_relation_check_threshold() -> u32 {
    3
}

const fn default_max_local_rounds() -> u32 {
    3
}

const fn default_decision_timeout_ms() -> u64 {
    30_000
}

const fn default_executor_timeout_ms() -> u64 {
    5_000
}

const fn default_resolver_timeout_ms() -> u64 {
    30_000
}

const fn default_gathering_timeout_ms() -> u64 {
    30_000
}

const fn default_service_timeout_ms() -> u64 {
    10_000
}

const fn default_fortune_rate() -> f64 {
    0.02
}

const fn default_misfortune_rate() -> f64 {
    0.02
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.seed, 42);
        assert_eq!(config.world.start_year, 100);
        assert_eq!(config.population.initial_agents, 8);
        assert_eq!(config.social.relation_check_threshold, 3);
        assert_eq!(config.execution.max_local_rounds, 3);
        assert_eq!(config.simulation.max_months, 0);
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
world:
  name: "Test Continent"
  seed: 123
  start_year: 250
  start_month: 6

population:
  initial_agents: 4
  awakening_rate_per_month: 0.5
  awakening_min_age: 18
  awakening_max_age: 30

social:
  relation_check_threshold: 5

execution:
  max_local_rounds: 2
  decision_timeout_ms: 1000
  executor_timeout_ms: 200
  resolver_timeout_ms: 1000
  gathering_timeout_ms: 1000
  service_timeout_ms: 300

encounters:
  fortune_rate: 0.1
  misfortune_rate: 0.0

logging:
  level: "debug"

simulation:
  max_months: 120
  tick_interval_ms: 50
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.world.name, "Test Continent");
        assert_eq!(config.world.seed, 123);
        assert_eq!(
            config.world.start_stamp().unwrap(),
            MonthStamp::from_year_month(250, Month::June).unwrap()
        );
        assert_eq!(config.population.awakening_min_age, 18);
        assert_eq!(config.social.relation_check_threshold, 5);
        assert_eq!(config.execution.executor_timeout(), Duration::from_millis(200));
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.simulation.max_months, 120);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("world:\n  seed: 7\n").unwrap();
        assert_eq!(config.world.seed, 7);
        assert_eq!(config.population.initial_agents, 8);
        assert_eq!(config.execution.service_timeout_ms, 10_000);
    }

    #[test]
    fn parse_empty_yaml() {
        assert!(SimulationConfig::parse("").is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn zero_threshold_rejected() {
        let config = SimulationConfig::parse("social:\n  relation_check_threshold: 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "social.relation_check_threshold",
                ..
            })
        ));
    }

    #[test]
    fn rate_out_of_range_rejected() {
        let config =
            SimulationConfig::parse("population:\n  awakening_rate_per_month: 1.5\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SimulationConfig::parse("execution:\n  executor_timeout_ms: 0\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid {
                field: "execution.executor_timeout_ms",
                ..
            })
        ));
    }

    #[test]
    fn bad_start_month_rejected() {
        let config = SimulationConfig::parse("world:\n  start_month: 13\n").unwrap();
        assert!(matches!(config.validate(), Err(ConfigError::Calendar { .. })));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("ascension-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
            assert!(config.unwrap().validate().is_ok());
        }
    }
}
