//! Process configuration read from the environment.

use chrono::Duration;
use thiserror::Error;
use tracing::warn;

use rainforest_infra::AdminSeed;

const DEV_JWT_SECRET: &str = "dev-secret";
/// One year; keeps `now + ttl` far from chrono's range limits.
const MAX_TOKEN_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}={value:?} is invalid: {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// Runtime settings for the API binary.
#[derive(Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs against in-memory stores.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    pub admin: AdminSeed,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let admin = AdminSeed {
            username: var("ADMIN_USERNAME").unwrap_or_else(|| "admin".to_string()),
            email: var("ADMIN_EMAIL").unwrap_or_else(|| "admin@rainforestexotics.com".to_string()),
            password: var("ADMIN_PASSWORD").unwrap_or_else(|| {
                warn!("ADMIN_PASSWORD not set; the bootstrap admin gets the default password");
                "admin123".to_string()
            }),
        };

        let ttl_minutes: i64 = parse_or("TOKEN_TTL_MINUTES", var("TOKEN_TTL_MINUTES"), 1440)?;
        if !(1..=MAX_TOKEN_TTL_MINUTES).contains(&ttl_minutes) {
            return Err(ConfigError::Invalid {
                var: "TOKEN_TTL_MINUTES",
                value: ttl_minutes.to_string(),
                reason: format!("must be between 1 and {MAX_TOKEN_TTL_MINUTES}"),
            });
        }

        Ok(Self {
            host: var("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or("PORT", var("PORT"), 3000)?,
            database_url: var("DATABASE_URL"),
            database_max_connections: parse_or("DATABASE_MAX_CONNECTIONS", var("DATABASE_MAX_CONNECTIONS"), 5)?,
            jwt_secret,
            token_ttl: Duration::minutes(ttl_minutes),
            admin,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl core::fmt::Debug for ApiConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ApiConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl", &self.token_ttl)
            .field("admin", &self.admin)
            .finish()
    }
}

fn parse_or<T>(var: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let map: HashMap<String, String> = vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ApiConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.bind_addr(), "0.0.0.0:3000");
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.database_max_connections, 5);
        assert_eq!(cfg.token_ttl, Duration::minutes(1440));
        assert_eq!(cfg.admin.username, "admin");
        assert_eq!(cfg.admin.email, "admin@rainforestexotics.com");
    }

    #[test]
    fn overrides_are_read() {
        let cfg = config(&[
            ("PORT", "8081"),
            ("DATABASE_URL", "postgres://localhost/species"),
            ("JWT_SECRET", "s3cret"),
            ("TOKEN_TTL_MINUTES", "30"),
            ("ADMIN_USERNAME", "root"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8081);
        assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/species"));
        assert_eq!(cfg.jwt_secret, "s3cret");
        assert_eq!(cfg.token_ttl, Duration::minutes(30));
        assert_eq!(cfg.admin.username, "root");
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = config(&[("DATABASE_URL", ""), ("PORT", " ")]).unwrap();
        assert_eq!(cfg.database_url, None);
        assert_eq!(cfg.port, 3000);
    }

    #[test]
    fn bad_numbers_are_errors() {
        assert!(matches!(config(&[("PORT", "eighty")]), Err(ConfigError::Invalid { var: "PORT", .. })));
        assert!(matches!(
            config(&[("TOKEN_TTL_MINUTES", "0")]),
            Err(ConfigError::Invalid { var: "TOKEN_TTL_MINUTES", .. })
        ));
    }

    #[test]
    fn token_ttl_is_capped_at_one_year() {
        assert!(config(&[("TOKEN_TTL_MINUTES", "525600")]).is_ok());
        assert!(matches!(
            config(&[("TOKEN_TTL_MINUTES", "525601")]),
            Err(ConfigError::Invalid { var: "TOKEN_TTL_MINUTES", .. })
        ));
        assert!(matches!(
            config(&[("TOKEN_TTL_MINUTES", "9223372036854775807")]),
            Err(ConfigError::Invalid { var: "TOKEN_TTL_MINUTES", .. })
        ));
    }

    #[test]
    fn debug_hides_secrets() {
        let cfg = config(&[("JWT_SECRET", "s3cret"), ("DATABASE_URL", "postgres://u:pw@db/x")]).unwrap();
        let shown = format!("{cfg:?}");
        assert!(!shown.contains("s3cret"));
        assert!(!shown.contains("pw@db"));
    }
}
