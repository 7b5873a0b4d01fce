use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use application::auth::use_cases::AuthConfig;
use infrastructure::ipfs::PinPolicy;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub jwt_expiration: i64,
    pub server_host: String,
    pub server_port: u16,
    pub media_root: String,
    pub max_upload_bytes: usize,
    /// Pinning is disabled when unset.
    pub ipfs_api_url: Option<String>,
    pub ipfs_timeout_secs: u64,
    pub ipfs_max_attempts: u32,
    pub rate_limit_per_minute: u32,
    pub run_migrations: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let required = |key: &str| get(key).with_context(|| format!("{} must be set", key));

        fn parsed<T>(value: Option<String>, key: &str, default: T) -> anyhow::Result<T>
        where
            T: FromStr,
            T::Err: std::error::Error + Send + Sync + 'static,
        {
            match value {
                Some(raw) => raw
                    .trim()
                    .parse()
                    .with_context(|| format!("{} has an invalid value", key)),
                None => Ok(default),
            }
        }

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,
            jwt_expiration: parsed(get("JWT_EXPIRATION"), "JWT_EXPIRATION", 86_400)?,
            server_host: get("SERVER_HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            server_port: parsed(get("SERVER_PORT"), "SERVER_PORT", 8080)?,
            media_root: get("MEDIA_ROOT").unwrap_or_else(|| "./media".to_string()),
            max_upload_bytes: parsed(get("MAX_UPLOAD_BYTES"), "MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES)?,
            ipfs_api_url: get("IPFS_API_URL"),
            ipfs_timeout_secs: parsed(get("IPFS_TIMEOUT_SECS"), "IPFS_TIMEOUT_SECS", 30)?,
            ipfs_max_attempts: parsed(get("IPFS_MAX_ATTEMPTS"), "IPFS_MAX_ATTEMPTS", 1)?,
            rate_limit_per_minute: parsed(get("RATE_LIMIT_PER_MINUTE"), "RATE_LIMIT_PER_MINUTE", 100)?,
            run_migrations: parsed(get("RUN_MIGRATIONS"), "RUN_MIGRATIONS", true)?,
        })
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.jwt_secret.clone(),
            jwt_expiration: self.jwt_expiration,
        }
    }

    pub fn pin_policy(&self) -> PinPolicy {
        PinPolicy {
            timeout: Duration::from_secs(self.ipfs_timeout_secs),
            max_attempts: self.ipfs_max_attempts.max(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from_map(pairs: &[(&str, &str)]) -> anyhow::Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = from_map(&[
            ("DATABASE_URL", "postgres://terra@localhost/terra"),
            ("JWT_SECRET", "secret"),
        ])
        .unwrap();

        assert_eq!(config.jwt_expiration, 86_400);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.media_root, "./media");
        assert_eq!(config.max_upload_bytes, 10 * 1024 * 1024);
        assert!(config.ipfs_api_url.is_none());
        assert_eq!(config.pin_policy().timeout, Duration::from_secs(30));
        assert_eq!(config.pin_policy().max_attempts, 1);
        assert_eq!(config.rate_limit_per_minute, 100);
        assert!(config.run_migrations);
    }

    #[test]
    fn test_overrides() {
        let config = from_map(&[
            ("DATABASE_URL", "postgres://terra@db/terra"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "9000"),
            ("IPFS_API_URL", "http://ipfs:5001"),
            ("IPFS_MAX_ATTEMPTS", "3"),
            ("RUN_MIGRATIONS", "false"),
        ])
        .unwrap();

        assert_eq!(config.server_port, 9000);
        assert_eq!(config.ipfs_api_url.as_deref(), Some("http://ipfs:5001"));
        assert_eq!(config.pin_policy().max_attempts, 3);
        assert!(!config.run_migrations);
    }

    #[test]
    fn test_missing_or_invalid() {
        assert!(from_map(&[("JWT_SECRET", "secret")]).is_err());
        assert!(from_map(&[
            ("DATABASE_URL", "postgres://terra@localhost/terra"),
            ("JWT_SECRET", "secret"),
            ("SERVER_PORT", "eighty"),
        ])
        .is_err());
    }
}
