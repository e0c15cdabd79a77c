use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;

/// Placeholder JWT secret used when none is configured.
pub const DEV_JWT_SECRET: &str = "dev-secret-change-me";

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub db_path: PathBuf,
    pub app_url: String,
    pub jwt_secret: String,
    pub cron_secret: Option<String>,
    pub clock_offset: FixedOffset,
    pub push_timeout: Duration,
    pub scheduler: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup so tests need not touch the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let host = var("STILLWATER_HOST", "0.0.0.0");
        let port: u16 = var("STILLWATER_PORT", "3000")
            .parse()
            .context("STILLWATER_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

        let offset_minutes: i32 = var("STILLWATER_UTC_OFFSET_MINUTES", "0")
            .parse()
            .context("STILLWATER_UTC_OFFSET_MINUTES must be an integer")?;
        let clock_offset = FixedOffset::east_opt(offset_minutes * 60)
            .ok_or_else(|| anyhow!("UTC offset out of range: {} minutes", offset_minutes))?;

        let push_timeout_secs: u64 = var("STILLWATER_PUSH_TIMEOUT_SECS", "10")
            .parse()
            .context("STILLWATER_PUSH_TIMEOUT_SECS must be a number of seconds")?;

        let scheduler = matches!(
            var("STILLWATER_SCHEDULER", "false").to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );

        Ok(Self {
            addr,
            db_path: var("STILLWATER_DB_PATH", "stillwater.db").into(),
            app_url: var("STILLWATER_APP_URL", "/"),
            jwt_secret: var("STILLWATER_JWT_SECRET", DEV_JWT_SECRET),
            cron_secret: lookup("STILLWATER_CRON_SECRET").filter(|s| !s.is_empty()),
            clock_offset,
            push_timeout: Duration::from_secs(push_timeout_secs),
            scheduler,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.db_path, PathBuf::from("stillwater.db"));
        assert_eq!(cfg.jwt_secret, DEV_JWT_SECRET);
        assert!(cfg.cron_secret.is_none());
        assert_eq!(cfg.clock_offset.local_minus_utc(), 0);
        assert_eq!(cfg.push_timeout, Duration::from_secs(10));
        assert!(!cfg.scheduler);
    }

    #[test]
    fn overrides() {
        let cfg = config(&[
            ("STILLWATER_HOST", "127.0.0.1"),
            ("STILLWATER_PORT", "8080"),
            ("STILLWATER_CRON_SECRET", "s3cret"),
            ("STILLWATER_UTC_OFFSET_MINUTES", "-300"),
            ("STILLWATER_SCHEDULER", "TRUE"),
        ])
        .unwrap();
        assert_eq!(cfg.addr.to_string(), "127.0.0.1:8080");
        assert_eq!(cfg.cron_secret.as_deref(), Some("s3cret"));
        assert_eq!(cfg.clock_offset.local_minus_utc(), -300 * 60);
        assert!(cfg.scheduler);
    }

    #[test]
    fn rejects_bad_numbers() {
        assert!(config(&[("STILLWATER_PORT", "http")]).is_err());
        assert!(config(&[("STILLWATER_UTC_OFFSET_MINUTES", "100000")]).is_err());
    }

    #[test]
    fn empty_cron_secret_means_unguarded() {
        assert!(config(&[("STILLWATER_CRON_SECRET", "")]).unwrap().cron_secret.is_none());
    }
}
