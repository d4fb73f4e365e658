use std::{
    fmt,
    net::{Ipv4Addr, SocketAddr, SocketAddrV4},
    str::FromStr,
    time::Duration,
};

use base64::{engine::general_purpose, Engine};
use ring::rand::{SecureRandom, SystemRandom};

const DEFAULT_DATABASE_URL: &str = "sqlite://todo.db";
const DEFAULT_BIND_ADDR: SocketAddr = SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 3000));
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_TOKEN_MINUTES: u64 = 30;
const DEFAULT_MAX_CONNECTIONS: u32 = 10;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },

    #[error("BCRYPT_COST must be between 4 and 31, got {0}")]
    BcryptCost(u32),

    #[error("failed to generate a random secret key")]
    Random,
}

/// Settings read once at startup and shared through `AppState`.
#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub database_max_connections: u32,
    pub secret_key: String,
    pub access_token_ttl: Duration,
    pub bcrypt_cost: u32,
    pub bind_addr: SocketAddr,
    pub cors_origin: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("database_url", &self.database_url)
            .field("database_max_connections", &self.database_max_connections)
            .field("secret_key", &"<redacted>")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("bind_addr", &self.bind_addr)
            .field("cors_origin", &self.cors_origin)
            .finish()
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into());
        let database_max_connections =
            parse_or(&lookup, "DATABASE_MAX_CONNECTIONS", DEFAULT_MAX_CONNECTIONS)?;

        let secret_key = match lookup("SECRET_KEY").filter(|s| !s.is_empty()) {
            Some(secret) => secret,
            None => {
                tracing::warn!(
                    "SECRET_KEY is not set, using a random key; tokens will not survive a restart"
                );
                random_secret()?
            }
        };

        let minutes = parse_or(&lookup, "ACCESS_TOKEN_EXPIRE_MINUTES", DEFAULT_TOKEN_MINUTES)?;
        let ttl_secs = minutes.checked_mul(60).ok_or(ConfigError::Invalid {
            name: "ACCESS_TOKEN_EXPIRE_MINUTES",
            value: minutes.to_string(),
        })?;

        let bcrypt_cost = parse_or(&lookup, "BCRYPT_COST", bcrypt::DEFAULT_COST)?;
        if !(4..=31).contains(&bcrypt_cost) {
            return Err(ConfigError::BcryptCost(bcrypt_cost));
        }

        let bind_addr = parse_or(&lookup, "BIND_ADDR", DEFAULT_BIND_ADDR)?;

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| DEFAULT_CORS_ORIGIN.into());

        Ok(Config {
            database_url,
            database_max_connections,
            secret_key,
            access_token_ttl: Duration::from_secs(ttl_secs),
            bcrypt_cost,
            bind_addr,
            cors_origin,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
    }
}

fn random_secret() -> Result<String, ConfigError> {
    let mut bytes = [0u8; 32];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| ConfigError::Random)?;
    Ok(general_purpose::STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let config = config_from(&[("SECRET_KEY", "s3cret")]).unwrap();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.access_token_ttl, Duration::from_secs(30 * 60));
        assert_eq!(config.bcrypt_cost, bcrypt::DEFAULT_COST);
        assert_eq!(config.bind_addr.port(), 3000);
        assert_eq!(config.secret_key, "s3cret");
        assert!(!format!("{config:?}").contains("s3cret"));
    }

    #[test]
    fn missing_secret_is_generated() {
        let a = config_from(&[]).unwrap();
        let b = config_from(&[]).unwrap();
        assert!(!a.secret_key.is_empty());
        assert_ne!(a.secret_key, b.secret_key);
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("SECRET_KEY", "k"),
            ("ACCESS_TOKEN_EXPIRE_MINUTES", "5"),
            ("BCRYPT_COST", "4"),
            ("BIND_ADDR", "0.0.0.0:8080"),
        ])
        .unwrap();
        assert_eq!(config.access_token_ttl, Duration::from_secs(300));
        assert_eq!(config.bcrypt_cost, 4);
        assert_eq!(config.bind_addr.port(), 8080);
    }

    #[test]
    fn malformed_values_name_the_variable() {
        let err = config_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", "soon")]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "ACCESS_TOKEN_EXPIRE_MINUTES", .. }
        ));

        let huge = u64::MAX.to_string();
        let err = config_from(&[("ACCESS_TOKEN_EXPIRE_MINUTES", huge.as_str())]).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid { name: "ACCESS_TOKEN_EXPIRE_MINUTES", .. }
        ));

        let err = config_from(&[("BCRYPT_COST", "2")]).unwrap_err();
        assert!(matches!(err, ConfigError::BcryptCost(2)));
    }
}
