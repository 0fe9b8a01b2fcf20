use anyhow::{Context, Result, bail};
use rust_decimal::Decimal;
use storage::TrainingSettings;
use storage::services::one_rep_max::OneRepMaxFormula;
use storage::settings::DEFAULT_PLATE_WEIGHT_KG;

const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_max_connections: u32,
    pub training: TrainingSettings,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let database_max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(value) => value
                .trim()
                .parse()
                .context("DATABASE_MAX_CONNECTIONS must be a positive number")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        if database_max_connections == 0 {
            bail!("DATABASE_MAX_CONNECTIONS must be a positive number");
        }

        let plate_weight = match lookup("PLATE_WEIGHT_KG") {
            Some(value) => value
                .trim()
                .parse::<Decimal>()
                .context("PLATE_WEIGHT_KG must be a decimal number")?,
            None => DEFAULT_PLATE_WEIGHT_KG,
        };
        if plate_weight <= Decimal::ZERO {
            bail!("PLATE_WEIGHT_KG must be greater than 0");
        }

        let formula = match lookup("ONE_RM_FORMULA") {
            Some(value) => value
                .parse::<OneRepMaxFormula>()
                .map_err(anyhow::Error::msg)
                .context("Cannot load ONE_RM_FORMULA env variable")?,
            None => OneRepMaxFormula::DEFAULT,
        };

        Ok(Self {
            database_max_connections,
            training: TrainingSettings {
                formula,
                plate_weight,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.database_max_connections, 5);
        assert_eq!(config.training, TrainingSettings::default());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[
            ("DATABASE_MAX_CONNECTIONS", "2"),
            ("PLATE_WEIGHT_KG", "2.5"),
            ("ONE_RM_FORMULA", "epley"),
        ])
        .unwrap();
        assert_eq!(config.database_max_connections, 2);
        assert_eq!(config.training.plate_weight, Decimal::new(25, 1));
        assert_eq!(config.training.formula, OneRepMaxFormula::Epley);
    }

    #[test]
    fn test_invalid_values() {
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "0")]).is_err());
        assert!(load(&[("DATABASE_MAX_CONNECTIONS", "many")]).is_err());
        assert!(load(&[("PLATE_WEIGHT_KG", "-1")]).is_err());
        assert!(load(&[("ONE_RM_FORMULA", "lombardi")]).is_err());
    }
}
