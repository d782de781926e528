//! YAML configuration loading.

use std::fs;
use std::path::Path;
use studio_core::StudioConfig;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Parse a YAML document into a config. Missing keys take their defaults.
pub fn parse_config(text: &str) -> Result<StudioConfig, ConfigError> {
    let config: StudioConfig = serde_yaml::from_str(text)?;
    if config.script_market_size == 0 {
        return Err(ConfigError::Invalid("script_market_size must be > 0".into()));
    }
    if config.max_cast == 0 {
        return Err(ConfigError::Invalid("max_cast must be > 0".into()));
    }
    // NaN fails the range check too.
    if !(0.0..=10.0).contains(&config.min_script_quality) {
        return Err(ConfigError::Invalid(
            "min_script_quality must be within [0, 10]".into(),
        ));
    }
    if !(0.0..=1.0).contains(&config.crisis_chance) || !(0.0..=1.0).contains(&config.decision_chance)
    {
        return Err(ConfigError::Invalid(
            "event chances must be within [0, 1]".into(),
        ));
    }
    if config.bankruptcy_floor > config.starting_cash {
        return Err(ConfigError::Invalid(
            "bankruptcy floor above starting cash".into(),
        ));
    }
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<StudioConfig, ConfigError> {
    info!("Loading config: {}", path.display());
    parse_config(&fs::read_to_string(path)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config = parse_config(
            "studio_name: Harbor Films\nrng_seed: 7\nstarting_cash: \"5000000\"\ndurations:\n  production: 8\n",
        )
        .unwrap();
        assert_eq!(config.studio_name, "Harbor Films");
        assert_eq!(config.rng_seed, 7);
        assert_eq!(config.starting_cash, Decimal::new(5_000_000, 0));
        assert_eq!(config.durations.production, 8);
        assert_eq!(config.durations.pre_production, 3);
        assert_eq!(config.max_cast, StudioConfig::default().max_cast);
    }

    #[test]
    fn out_of_range_chance_is_rejected() {
        assert!(matches!(
            parse_config("crisis_chance: 1.5\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(parse_config("rng_seed: [1"), Err(ConfigError::Yaml(_))));
    }

    #[test]
    fn gates_that_block_every_project_are_rejected() {
        for yaml in [
            "max_cast: 0\n",
            "min_script_quality: 10.5\n",
            "min_script_quality: -1.0\n",
            "min_script_quality: .nan\n",
        ] {
            assert!(
                matches!(parse_config(yaml), Err(ConfigError::Invalid(_))),
                "{yaml}"
            );
        }
        assert_eq!(
            parse_config("min_script_quality: 10.0\n")
                .unwrap()
                .min_script_quality,
            10.0
        );
    }
}
