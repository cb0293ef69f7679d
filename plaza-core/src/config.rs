//! Environment-driven configuration with fail-fast validation.
//!
//! Keys follow the `PLAZA__SECTION__KEY` double-underscore convention so
//! deployments can override any value without a config file:
//!
//! ```bash
//! export PLAZA__DATABASE_URL=postgres://localhost/plaza
//! export PLAZA__JWT__SECRET=...
//! ```
//!
//! There is deliberately no fallback signing secret: a deployment that does
//! not configure one refuses to start instead of minting forgeable tokens.

use std::time::Duration;

use crate::errors::{Error, Result};

const ENV_DATABASE_URL: &str = "PLAZA__DATABASE_URL";
const ENV_MAX_CONNECTIONS: &str = "PLAZA__DB__MAX_CONNECTIONS";
const ENV_MIN_CONNECTIONS: &str = "PLAZA__DB__MIN_CONNECTIONS";
const ENV_JWT_SECRET: &str = "PLAZA__JWT__SECRET";
const ENV_JWT_ISSUER: &str = "PLAZA__JWT__ISSUER";
const ENV_JWT_AUDIENCE: &str = "PLAZA__JWT__AUDIENCE";
const ENV_JWT_TTL_SECS: &str = "PLAZA__JWT__ACCESS_TOKEN_TTL_SECS";

/// Token signing configuration.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Symmetric signing secret. Required; validation fails without it.
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    /// Access token lifetime. Defaults to seven days.
    pub access_token_ttl: Duration,
}

impl JwtConfig {
    pub const DEFAULT_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    pub fn new<S: Into<String>>(secret: S) -> Self {
        Self {
            secret: secret.into(),
            issuer: "plaza-auth".to_string(),
            audience: "plaza-api".to_string(),
            access_token_ttl: Self::DEFAULT_TTL,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.secret.trim().is_empty() {
            return Err(Error::ConfigurationMissing(ENV_JWT_SECRET));
        }
        if self.issuer.is_empty() {
            return Err(Error::ConfigurationMissing(ENV_JWT_ISSUER));
        }
        if self.audience.is_empty() {
            return Err(Error::ConfigurationMissing(ENV_JWT_AUDIENCE));
        }
        if self.access_token_ttl.as_secs() == 0 {
            return Err(Error::ConfigurationMissing(ENV_JWT_TTL_SECS));
        }
        Ok(())
    }
}

/// Top-level configuration for the persistence and auth cores.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub jwt: JwtConfig,
}

impl Config {
    pub fn new<D: Into<String>, S: Into<String>>(database_url: D, jwt_secret: S) -> Self {
        Self {
            database_url: database_url.into(),
            max_connections: 10,
            min_connections: 1,
            jwt: JwtConfig::new(jwt_secret),
        }
    }

    /// Load from environment variables and validate, failing fast on a
    /// missing database URL or signing secret.
    pub fn from_env() -> Result<Self> {
        let database_url =
            std::env::var(ENV_DATABASE_URL).map_err(|_| Error::ConfigurationMissing(ENV_DATABASE_URL))?;
        let secret =
            std::env::var(ENV_JWT_SECRET).map_err(|_| Error::ConfigurationMissing(ENV_JWT_SECRET))?;

        let mut config = Self::new(database_url, secret);

        if let Some(n) = env_parse::<u32>(ENV_MAX_CONNECTIONS) {
            config.max_connections = n;
        }
        if let Some(n) = env_parse::<u32>(ENV_MIN_CONNECTIONS) {
            config.min_connections = n;
        }
        if let Ok(issuer) = std::env::var(ENV_JWT_ISSUER) {
            config.jwt.issuer = issuer;
        }
        if let Ok(audience) = std::env::var(ENV_JWT_AUDIENCE) {
            config.jwt.audience = audience;
        }
        if let Some(secs) = env_parse::<u64>(ENV_JWT_TTL_SECS) {
            config.jwt.access_token_ttl = Duration::from_secs(secs);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.database_url.trim().is_empty() {
            return Err(Error::ConfigurationMissing(ENV_DATABASE_URL));
        }
        self.jwt.validate()
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_secret_fails_validation() {
        let config = Config::new("postgres://localhost/plaza", "");
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigurationMissing(key)) if key == ENV_JWT_SECRET
        ));
    }

    #[test]
    fn empty_database_url_fails_validation() {
        let config = Config::new("", "secret");
        assert!(matches!(
            config.validate(),
            Err(Error::ConfigurationMissing(key)) if key == ENV_DATABASE_URL
        ));
    }

    #[test]
    fn default_ttl_is_seven_days() {
        let config = Config::new("postgres://localhost/plaza", "secret");
        assert_eq!(config.jwt.access_token_ttl.as_secs(), 7 * 24 * 60 * 60);
        assert!(config.validate().is_ok());
    }
}
