use crate::domain::Decimal;
use crate::recalc::{default_tolerance, RecalcMode, DEFAULT_CONCURRENCY};
use std::collections::HashMap;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub bind_addr: IpAddr,
    pub database_path: String,
    /// Default tolerance for runs that do not specify one.
    pub drift_tolerance: Decimal,
    /// Default mode for runs that do not specify one.
    pub recalc_mode: RecalcMode,
    pub recalc_concurrency: usize,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let bind_addr = env_map
            .get("BIND_ADDR")
            .map(|s| s.as_str())
            .unwrap_or("127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "BIND_ADDR".to_string(),
                    "must be an IP address".to_string(),
                )
            })?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?;

        let drift_tolerance = match env_map.get("DRIFT_TOLERANCE") {
            None => default_tolerance(),
            Some(raw) => {
                let parsed = Decimal::from_str_canonical(raw).map_err(|_| {
                    ConfigError::InvalidValue(
                        "DRIFT_TOLERANCE".to_string(),
                        format!("must be a decimal number, got {}", raw),
                    )
                })?;
                if parsed.is_negative() {
                    return Err(ConfigError::InvalidValue(
                        "DRIFT_TOLERANCE".to_string(),
                        "must be non-negative".to_string(),
                    ));
                }
                parsed
            }
        };

        let recalc_mode = match env_map
            .get("RECALC_MODE")
            .map(|s| s.as_str())
            .unwrap_or("report")
        {
            "report" => RecalcMode::Report,
            "correct" => RecalcMode::Correct,
            other => {
                return Err(ConfigError::InvalidValue(
                    "RECALC_MODE".to_string(),
                    format!("must be report or correct, got {}", other),
                ))
            }
        };

        let recalc_concurrency = match env_map.get("RECALC_CONCURRENCY") {
            None => DEFAULT_CONCURRENCY,
            Some(raw) => match raw.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(ConfigError::InvalidValue(
                        "RECALC_CONCURRENCY".to_string(),
                        "must be a positive integer".to_string(),
                    ))
                }
            },
        };

        Ok(Config {
            port,
            bind_addr,
            database_path,
            drift_tolerance,
            recalc_mode,
            recalc_concurrency,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn setup_required_env() -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("DATABASE_PATH".to_string(), "/tmp/ledger.db".to_string());
        map
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_env_map(setup_required_env()).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.bind_addr, IpAddr::from([127, 0, 0, 1]));
        assert_eq!(config.drift_tolerance, Decimal::from_str("0.0001").unwrap());
        assert_eq!(config.recalc_mode, RecalcMode::Report);
        assert_eq!(config.recalc_concurrency, DEFAULT_CONCURRENCY);
    }

    #[test]
    fn test_overrides() {
        let mut env_map = setup_required_env();
        env_map.insert("DRIFT_TOLERANCE".to_string(), "0.01".to_string());
        env_map.insert("RECALC_MODE".to_string(), "correct".to_string());
        env_map.insert("RECALC_CONCURRENCY".to_string(), "16".to_string());
        env_map.insert("BIND_ADDR".to_string(), "0.0.0.0".to_string());

        let config = Config::from_env_map(env_map).unwrap();
        assert_eq!(config.drift_tolerance, Decimal::from_str("0.01").unwrap());
        assert_eq!(config.recalc_mode, RecalcMode::Correct);
        assert_eq!(config.recalc_concurrency, 16);
        assert_eq!(config.bind_addr, IpAddr::from([0, 0, 0, 0]));
    }

    #[test]
    fn test_missing_database_path() {
        let mut env_map = setup_required_env();
        env_map.remove("DATABASE_PATH");
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::MissingEnv(s)) => assert_eq!(s, "DATABASE_PATH"),
            _ => panic!("Expected MissingEnv error"),
        }
    }

    #[test]
    fn test_invalid_port() {
        let mut env_map = setup_required_env();
        env_map.insert("PORT".to_string(), "not_a_number".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "PORT"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_invalid_tolerance() {
        for raw in ["abc", "-0.5", "NaN"] {
            let mut env_map = setup_required_env();
            env_map.insert("DRIFT_TOLERANCE".to_string(), raw.to_string());
            match Config::from_env_map(env_map) {
                Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "DRIFT_TOLERANCE"),
                _ => panic!("Expected InvalidValue error for {}", raw),
            }
        }
    }

    #[test]
    fn test_invalid_recalc_mode() {
        let mut env_map = setup_required_env();
        env_map.insert("RECALC_MODE".to_string(), "fix".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "RECALC_MODE"),
            _ => panic!("Expected InvalidValue error"),
        }
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        let mut env_map = setup_required_env();
        env_map.insert("RECALC_CONCURRENCY".to_string(), "0".to_string());
        let result = Config::from_env_map(env_map);
        match result {
            Err(ConfigError::InvalidValue(k, _)) => assert_eq!(k, "RECALC_CONCURRENCY"),
            _ => panic!("Expected InvalidValue error"),
        }
    }
}
