//! Process configuration read from environment variables.
//!
//! `main` loads `.env` through `dotenvy` first, so every key here may also
//! come from that file.

use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;

use crate::app::auth::DEFAULT_TOKEN_TTL_SECS;
use crate::domain::ConfigError;
use crate::infra::LogFormat;

pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_BANK_API_URL: &str =
    "https://687bb1fab4bc7cfbda86d9e3.mockapi.io/bank/bankTransactions";
pub const DEFAULT_EXCHANGE_RATE_API_URL: &str = "https://v6.exchangerate-api.com/v6";
pub const DEFAULT_GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1/models/gemini-1.5-flash:generateContent";

/// Everything `main` needs to build the application state.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub jwt_secret: SecretString,
    pub jwt_ttl_secs: u64,
    pub host: String,
    pub port: u16,
    /// Allowed CORS origin; any origin when unset.
    pub frontend_url: Option<String>,
    pub bank_api_url: String,
    pub exchange_rate_api_url: String,
    pub exchange_rate_api_key: SecretString,
    pub gemini_api_url: String,
    pub gemini_api_key: SecretString,
    pub external_timeout: Duration,
    pub rate_limit_rps: u32,
    pub rate_limit_burst: u32,
    pub log_format: LogFormat,
}

impl AppConfig {
    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()));

        Ok(Self {
            database_url: SecretString::from(required("DATABASE_URL")?),
            jwt_secret: SecretString::from(required("JWT_SECRET")?),
            jwt_ttl_secs: parse_or(get("JWT_TTL_SECS"), "JWT_TTL_SECS", DEFAULT_TOKEN_TTL_SECS)?,
            host: get("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: parse_or(get("PORT"), "PORT", DEFAULT_PORT)?,
            frontend_url: get("FRONTEND_URL"),
            bank_api_url: get("BANK_API_URL").unwrap_or_else(|| DEFAULT_BANK_API_URL.to_string()),
            exchange_rate_api_url: get("EXCHANGE_RATE_API_URL")
                .unwrap_or_else(|| DEFAULT_EXCHANGE_RATE_API_URL.to_string()),
            exchange_rate_api_key: SecretString::from(
                get("EXCHANGE_RATE_API_KEY").unwrap_or_default(),
            ),
            gemini_api_url: get("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_API_URL.to_string()),
            gemini_api_key: SecretString::from(get("GEMINI_API_KEY").unwrap_or_default()),
            external_timeout: Duration::from_secs(parse_or(
                get("EXTERNAL_TIMEOUT_SECS"),
                "EXTERNAL_TIMEOUT_SECS",
                10,
            )?),
            rate_limit_rps: parse_positive(get("RATE_LIMIT_RPS"), "RATE_LIMIT_RPS", 10)?,
            rate_limit_burst: parse_positive(get("RATE_LIMIT_BURST"), "RATE_LIMIT_BURST", 20)?,
            log_format: get("LOG_FORMAT")
                .map(|v| v.parse::<LogFormat>())
                .transpose()?
                .unwrap_or_default(),
        })
    }

    /// `host:port` for the listener.
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr>(value: Option<String>, key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match value {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        }),
    }
}

fn parse_positive(value: Option<String>, key: &str, default: u32) -> Result<u32, ConfigError> {
    let parsed = parse_or(value, key, default)?;
    if parsed == 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: "must be greater than zero".to_string(),
        });
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use secrecy::ExposeSecret;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 2] = [
        ("DATABASE_URL", "postgres://localhost/finance"),
        ("JWT_SECRET", "secret"),
    ];

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&REQUIRED)).unwrap();
        assert_eq!(config.port, 3001);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.jwt_ttl_secs, 3600);
        assert_eq!(config.rate_limit_rps, 10);
        assert_eq!(config.rate_limit_burst, 20);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert_eq!(config.bank_api_url, DEFAULT_BANK_API_URL);
        assert!(config.frontend_url.is_none());
        assert_eq!(config.bind_address(), "0.0.0.0:3001");
        assert_eq!(config.jwt_secret.expose_secret(), "secret");
    }

    #[test]
    fn test_missing_required_keys() {
        let err = AppConfig::from_lookup(lookup(&[("JWT_SECRET", "s")])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "DATABASE_URL"));

        let err = AppConfig::from_lookup(lookup(&[
            ("DATABASE_URL", "postgres://x"),
            ("JWT_SECRET", "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "JWT_SECRET"));
    }

    #[test]
    fn test_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "8080"),
            ("JWT_TTL_SECS", "60"),
            ("LOG_FORMAT", "json"),
            ("FRONTEND_URL", "http://localhost:5173"),
            ("RATE_LIMIT_RPS", "5"),
        ]);
        let config = AppConfig::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.jwt_ttl_secs, 60);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.frontend_url.as_deref(), Some("http://localhost:5173"));
        assert_eq!(config.rate_limit_rps, 5);
    }

    #[test]
    fn test_invalid_values() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));
        let err = AppConfig::from_lookup(lookup(&pairs)).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "PORT"));

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("RATE_LIMIT_BURST", "0"));
        assert!(AppConfig::from_lookup(lookup(&pairs)).is_err());
    }
}
