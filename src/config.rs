use std::{env, path::PathBuf, str::FromStr};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    pub server: ServerConfig,
    pub session: SessionConfig,
    pub subscription: SubscriptionConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionConfig {
    /// Directory for the file-backed store. `None` keeps the session in memory.
    pub store_dir: Option<PathBuf>,
    pub recheck_interval_secs: u64,
}

/// Rules of the trial/premium lifecycle.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
pub struct SubscriptionConfig {
    pub trial_days: i64,
    pub premium_days: i64,
    pub min_mobile_length: usize,
}

/// Upper bound for trial and premium windows, roughly a century.
pub const MAX_WINDOW_DAYS: i64 = 36_500;

impl SubscriptionConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=MAX_WINDOW_DAYS).contains(&self.trial_days) {
            anyhow::bail!(
                "TRIAL_DAYS must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.trial_days
            );
        }
        if !(1..=MAX_WINDOW_DAYS).contains(&self.premium_days) {
            anyhow::bail!(
                "PREMIUM_DAYS must be between 1 and {}, got {}",
                MAX_WINDOW_DAYS,
                self.premium_days
            );
        }
        if self.min_mobile_length == 0 {
            anyhow::bail!("MIN_MOBILE_LENGTH must be at least 1");
        }
        Ok(())
    }
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            trial_days: 7,
            premium_days: 30,
            min_mobile_length: 10,
        }
    }
}

impl GlobalConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = SubscriptionConfig::default();

        let config = GlobalConfig {
            server: ServerConfig {
                host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: env::var("PORT")
                    .or_else(|_| env::var("SERVER_PORT"))
                    .unwrap_or_else(|_| "8080".to_string())
                    .parse()
                    .unwrap_or(8080),
                cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                    .unwrap_or_else(|_| "http://localhost:3000".to_string())
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect(),
            },
            session: SessionConfig {
                store_dir: env::var("SESSION_STORE_DIR")
                    .ok()
                    .map(|dir| dir.trim().to_string())
                    .filter(|dir| !dir.is_empty())
                    .map(PathBuf::from),
                recheck_interval_secs: env_or("SESSION_RECHECK_INTERVAL_SECS", 60),
            },
            subscription: SubscriptionConfig {
                trial_days: env_or("TRIAL_DAYS", defaults.trial_days),
                premium_days: env_or("PREMIUM_DAYS", defaults.premium_days),
                min_mobile_length: env_or("MIN_MOBILE_LENGTH", defaults.min_mobile_length),
            },
        };

        config.subscription.validate()?;
        Ok(config)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}
