//! # Application Configuration
//!
//! Settings for the `figures-store` binary.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FIGURES_DB_PATH=/var/lib/figures/figures.db                        │
//! │     FIGURES_LOG=info,figures=trace                                     │
//! │     FIGURES_SQUARE_MULTIPLIER_BPS=11000                                │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, else                                              │
//! │     ~/.config/figures-store/figures.toml (Linux)                       │
//! │     ~/Library/Application Support/com.figures.figures-store/figures.toml │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [database]
//! path = "/var/lib/figures/figures.db"
//! max_connections = 5
//!
//! [pricing]          # kind → multiplier in basis points (10000 = ×1.0)
//! Triangle = 12000
//! Square = 10000
//! Circle = 9000
//!
//! [inventory]        # initial levels for kinds with no stored level
//! Circle = 50
//!
//! [limits]
//! max_cart_lines = 100
//!
//! [logging]
//! filter = "info,figures=debug,sqlx=warn"
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, info, warn};

use figures_core::pricing::{CIRCLE_MULTIPLIER_BPS, SQUARE_MULTIPLIER_BPS, TRIANGLE_MULTIPLIER_BPS};
use figures_core::{FigureKind, PriceMultiplier, PricingPolicy, MAX_CART_LINES};

use crate::telemetry::DEFAULT_LOG_FILTER;

// =============================================================================
// Errors
// =============================================================================

/// Configuration load/save failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("No config path available")]
    NoPath,

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// Sections
// =============================================================================

/// `[database]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// SQLite file path.
    #[serde(default = "default_db_path")]
    pub path: PathBuf,

    /// Pool size.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_db_path() -> PathBuf {
    directories::ProjectDirs::from("com", "figures", "figures-store")
        .map(|dirs| dirs.data_dir().join("figures.db"))
        .unwrap_or_else(|| PathBuf::from("figures.db"))
}

fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        DatabaseSettings {
            path: default_db_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// `[limits]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitSettings {
    #[serde(default = "default_max_cart_lines")]
    pub max_cart_lines: usize,
}

fn default_max_cart_lines() -> usize {
    MAX_CART_LINES
}

impl Default for LimitSettings {
    fn default() -> Self {
        LimitSettings {
            max_cart_lines: default_max_cart_lines(),
        }
    }
}

/// `[logging]`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive string, used when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    DEFAULT_LOG_FILTER.to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        LoggingSettings {
            filter: default_log_filter(),
        }
    }
}

fn default_pricing() -> BTreeMap<String, u32> {
    BTreeMap::from([
        (figures_core::figure::TRIANGLE.to_string(), TRIANGLE_MULTIPLIER_BPS),
        (figures_core::figure::SQUARE.to_string(), SQUARE_MULTIPLIER_BPS),
        (figures_core::figure::CIRCLE.to_string(), CIRCLE_MULTIPLIER_BPS),
    ])
}

// =============================================================================
// AppConfig
// =============================================================================

/// Complete application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub database: DatabaseSettings,

    /// Kind → multiplier in basis points. Merged over the built-in rules.
    #[serde(default = "default_pricing")]
    pub pricing: BTreeMap<String, u32>,

    /// Kind → initial stock level.
    #[serde(default)]
    pub inventory: BTreeMap<String, u32>,

    #[serde(default)]
    pub limits: LimitSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database: DatabaseSettings::default(),
            pricing: default_pricing(),
            inventory: BTreeMap::new(),
            limits: LimitSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (figures.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid(
                "database.max_connections must be greater than 0".into(),
            ));
        }

        if self.limits.max_cart_lines == 0 {
            return Err(ConfigError::Invalid(
                "limits.max_cart_lines must be greater than 0".into(),
            ));
        }

        for (kind, bps) in &self.pricing {
            FigureKind::parse(kind)
                .map_err(|e| ConfigError::Invalid(format!("pricing: {e}")))?;
            if *bps == 0 {
                return Err(ConfigError::Invalid(format!(
                    "pricing.{kind} must be greater than 0"
                )));
            }
        }

        for kind in self.inventory.keys() {
            FigureKind::parse(kind)
                .map_err(|e| ConfigError::Invalid(format!("inventory: {e}")))?;
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FIGURES_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database.path = PathBuf::from(path);
        }

        if let Ok(filter) = std::env::var("FIGURES_LOG") {
            self.logging.filter = filter;
        }

        if let Ok(bps) = std::env::var("FIGURES_SQUARE_MULTIPLIER_BPS") {
            match bps.parse::<u32>() {
                Ok(bps) => {
                    debug!(bps, "Overriding Square multiplier from environment");
                    self.pricing
                        .insert(figures_core::figure::SQUARE.to_string(), bps);
                }
                Err(_) => warn!(value = %bps, "Ignoring unparsable FIGURES_SQUARE_MULTIPLIER_BPS"),
            }
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "figures", "figures-store")
            .map(|dirs| dirs.config_dir().join("figures.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Built-in rules with the `[pricing]` table applied on top.
    pub fn pricing_policy(&self) -> PricingPolicy {
        self.pricing
            .iter()
            .fold(PricingPolicy::standard(), |policy, (kind, bps)| {
                policy.with_rule(FigureKind::new(kind.trim()), PriceMultiplier::from_bps(*bps))
            })
    }

    /// `[inventory]` as typed levels.
    pub fn initial_levels(&self) -> Vec<(FigureKind, u32)> {
        self.inventory
            .iter()
            .map(|(kind, count)| (FigureKind::new(kind.trim()), *count))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figures_core::{FigureFactory, FigureKind};

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.limits.max_cart_lines, 100);
        assert_eq!(config.pricing.get("Square"), Some(&10_000));
        assert_eq!(config.logging.filter, DEFAULT_LOG_FILTER);
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.database.max_connections = 0;
        assert!(config.validate().is_err());

        config.database.max_connections = 1;
        config.limits.max_cart_lines = 0;
        assert!(config.validate().is_err());

        config.limits.max_cart_lines = 10;
        config.pricing.insert("Circle".into(), 0);
        assert!(config.validate().is_err());

        config.pricing.insert("Circle".into(), 9_000);
        config.inventory.insert("   ".into(), 3);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [limits]
            max_cart_lines = 5

            [inventory]
            Circle = 7
            "#,
        )
        .unwrap();

        assert_eq!(config.limits.max_cart_lines, 5);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.pricing.len(), 3);
        assert_eq!(config.initial_levels(), vec![(FigureKind::circle(), 7)]);
    }

    #[test]
    fn test_pricing_overrides_merge_over_standard() {
        let config: AppConfig = toml::from_str(
            r#"
            [pricing]
            Square = 15000
            Hexagon = 20000
            "#,
        )
        .unwrap();

        let policy = config.pricing_policy();
        assert_eq!(policy.multiplier(&FigureKind::square()).unwrap().bps(), 15_000);
        assert_eq!(policy.multiplier(&FigureKind::triangle()).unwrap().bps(), 12_000);
        assert_eq!(policy.multiplier(&FigureKind::new("Hexagon")).unwrap().bps(), 20_000);

        let factory = FigureFactory::standard();
        assert!(policy.missing_rules(&factory.kinds()).is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("figures.toml");

        let mut config = AppConfig::default();
        config.database.path = dir.path().join("figures.db");
        config.inventory.insert("Triangle".into(), 12);
        config.save(Some(path.clone())).unwrap();

        let loaded = AppConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.inventory.get("Triangle"), Some(&12));
        assert_eq!(loaded.limits, config.limits);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("figures.toml");
        std::fs::write(&path, "[limits]\nmax_cart_lines = 0\n").unwrap();

        assert!(AppConfig::load(Some(path.clone())).is_err());

        let config = AppConfig::load_or_default(Some(path));
        assert_eq!(config.limits.max_cart_lines, 100);
    }

    #[test]
    fn test_toml_serialization() {
        let toml_str = toml::to_string_pretty(&AppConfig::default()).unwrap();
        assert!(toml_str.contains("[database]"));
        assert!(toml_str.contains("[pricing]"));
        assert!(toml_str.contains("[limits]"));
    }
}
