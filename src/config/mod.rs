//! Configuration module for the flashcard backend.
//!
//! All configuration is loaded from environment variables with sensible
//! defaults, optionally seeded from a local `.env` file. The signing secret
//! has no default.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

/// Longest accepted token lifetime, in hours.
pub const MAX_TOKEN_HOURS: i64 = 24 * 365;

/// Bound applied to the initial store connection only.
pub const STORE_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// MongoDB connection string
    pub mongo_uri: String,
    /// MongoDB database name
    pub mongo_db: String,
    /// HMAC secret used to sign and verify tokens
    pub jwt_secret: String,
    /// Access token lifetime in hours
    pub access_token_hours: i64,
    /// Refresh token lifetime in hours
    pub refresh_token_hours: i64,
    /// bcrypt work factor
    pub bcrypt_cost: u32,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

/// Startup configuration failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid { key, value } => write!(f, "invalid {} value: {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = lookup("PORT").unwrap_or_else(|| "8004".to_string());
        let bind_addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .map_err(|_| ConfigError::Invalid {
                key: "HOST/PORT",
                value: format!("{}:{}", host, port),
            })?;

        let mongo_uri =
            lookup("MONGO_URI").unwrap_or_else(|| "mongodb://localhost:27011".to_string());
        let mongo_db = lookup("MONGO_DB").unwrap_or_else(|| "flash-cards".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let access_token_hours = token_hours("ACCESS_TOKEN_HOURS", &lookup, 8)?;
        let refresh_token_hours = token_hours("REFRESH_TOKEN_HOURS", &lookup, 24)?;

        let bcrypt_cost: u32 = parse_or("BCRYPT_COST", &lookup, 14)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::Invalid {
                key: "BCRYPT_COST",
                value: bcrypt_cost.to_string(),
            });
        }

        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        Ok(Self {
            bind_addr,
            mongo_uri,
            mongo_db,
            jwt_secret,
            access_token_hours,
            refresh_token_hours,
            bcrypt_cost,
            log_level,
        })
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with a fixed secret and the cheapest bcrypt cost.
    pub fn for_tests() -> Self {
        Self::from_lookup(|key| match key {
            "JWT_SECRET" => Some("test-secret".to_string()),
            "BCRYPT_COST" => Some("4".to_string()),
            _ => None,
        })
        .expect("test configuration is valid")
    }
}

/// Token lifetime in whole hours, between 1 and `MAX_TOKEN_HOURS`.
fn token_hours<F>(key: &'static str, lookup: &F, default: i64) -> Result<i64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let hours = parse_or(key, lookup, default)?;
    if !(1..=MAX_TOKEN_HOURS).contains(&hours) {
        return Err(ConfigError::Invalid {
            key,
            value: hours.to_string(),
        });
    }
    Ok(hours)
}

fn parse_or<T, F>(key: &'static str, lookup: &F, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { key, value }),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s3cret")])).unwrap();

        assert_eq!(config.bind_addr.to_string(), "0.0.0.0:8004");
        assert_eq!(config.mongo_uri, "mongodb://localhost:27011");
        assert_eq!(config.mongo_db, "flash-cards");
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_token_hours, 8);
        assert_eq!(config.refresh_token_hours, 24);
        assert_eq!(config.bcrypt_cost, 14);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s3cret"),
            ("HOST", "127.0.0.1"),
            ("PORT", "9000"),
            ("MONGO_URI", "mongodb://db:27017"),
            ("MONGO_DB", "cards"),
            ("BCRYPT_COST", "10"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.mongo_uri, "mongodb://db:27017");
        assert_eq!(config.mongo_db, "cards");
        assert_eq!(config.bcrypt_cost, 10);
    }

    #[test]
    fn test_missing_secret() {
        let err = Config::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));

        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("JWT_SECRET"));
    }

    #[test]
    fn test_invalid_values() {
        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "HOST/PORT", .. }));

        let err = Config::from_lookup(lookup_from(&[("JWT_SECRET", "s"), ("BCRYPT_COST", "2")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "BCRYPT_COST", .. }));
    }

    #[test]
    fn test_token_lifetimes_are_bounded() {
        for value in ["0", "-1", "9223372036854775807"] {
            let err = Config::from_lookup(lookup_from(&[
                ("JWT_SECRET", "s"),
                ("ACCESS_TOKEN_HOURS", value),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "ACCESS_TOKEN_HOURS", .. }));

            let err = Config::from_lookup(lookup_from(&[
                ("JWT_SECRET", "s"),
                ("REFRESH_TOKEN_HOURS", value),
            ]))
            .unwrap_err();
            assert!(matches!(err, ConfigError::Invalid { key: "REFRESH_TOKEN_HOURS", .. }));
        }

        let config = Config::from_lookup(lookup_from(&[
            ("JWT_SECRET", "s"),
            ("ACCESS_TOKEN_HOURS", "1"),
            ("REFRESH_TOKEN_HOURS", "8760"),
        ]))
        .unwrap();
        assert_eq!(config.access_token_hours, 1);
        assert_eq!(config.refresh_token_hours, MAX_TOKEN_HOURS);
    }
}
