use crate::existence::filter::{DEFAULT_CAPACITY, DEFAULT_ERROR_RATE, FilterConfig};
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::time::Duration;

pub const DEFAULT_JWT_LEEWAY_SECS: u64 = 30;
pub const DEFAULT_STORE_TIMEOUT_MS: u64 = 2_000;
pub const MAX_FILTER_GROWTH: u64 = 16;

// Agency configuration sourced from environment variables.
#[derive(Clone)]
pub struct AgencyConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub jwt_secret: String,
    pub jwt_leeway_secs: u64,
    pub store_timeout: Duration,
    pub filter: FilterConfig,
    pub seed_path: Option<String>,
}

impl std::fmt::Debug for AgencyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgencyConfig")
            .field("bind_addr", &self.bind_addr)
            .field("metrics_bind", &self.metrics_bind)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .field("store_timeout", &self.store_timeout)
            .field("filter", &self.filter)
            .field("seed_path", &self.seed_path)
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct AgencyConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    jwt_secret: Option<String>,
    jwt_leeway_secs: Option<u64>,
    store_timeout_ms: Option<u64>,
    filter_capacity: Option<u64>,
    filter_error_rate: Option<f64>,
    filter_growth: Option<u64>,
    filter_tightening_ratio: Option<f64>,
    seed_path: Option<String>,
}

fn env_parse<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value.parse().with_context(|| format!("parse {key}")),
        Err(_) => Ok(default),
    }
}

impl AgencyConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("COMPASS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()
            .with_context(|| "parse COMPASS_BIND")?;
        let metrics_bind = std::env::var("COMPASS_METRICS_BIND")
            .unwrap_or_else(|_| "0.0.0.0:9090".to_string())
            .parse()
            .with_context(|| "parse COMPASS_METRICS_BIND")?;
        let jwt_secret = std::env::var("COMPASS_JWT_SECRET").unwrap_or_default();
        let filter = FilterConfig {
            initial_capacity: env_parse("COMPASS_FILTER_CAPACITY", DEFAULT_CAPACITY)?,
            error_rate: env_parse("COMPASS_FILTER_ERROR_RATE", DEFAULT_ERROR_RATE)?,
            ..FilterConfig::default()
        };
        Ok(Self {
            bind_addr,
            metrics_bind,
            jwt_secret,
            jwt_leeway_secs: env_parse("COMPASS_JWT_LEEWAY_SECS", DEFAULT_JWT_LEEWAY_SECS)?,
            store_timeout: Duration::from_millis(env_parse(
                "COMPASS_STORE_TIMEOUT_MS",
                DEFAULT_STORE_TIMEOUT_MS,
            )?),
            filter,
            seed_path: std::env::var("COMPASS_SEED").ok(),
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("COMPASS_CONFIG") {
            let contents =
                fs::read_to_string(&path).with_context(|| format!("read COMPASS_CONFIG: {path}"))?;
            let override_cfg: AgencyConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse agency config yaml")?;
            config.apply(override_cfg)?;
        }
        config.validate()?;
        Ok(config)
    }

    fn apply(&mut self, override_cfg: AgencyConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(value) = override_cfg.jwt_secret {
            self.jwt_secret = value;
        }
        if let Some(value) = override_cfg.jwt_leeway_secs {
            self.jwt_leeway_secs = value;
        }
        if let Some(value) = override_cfg.store_timeout_ms {
            self.store_timeout = Duration::from_millis(value);
        }
        if let Some(value) = override_cfg.filter_capacity {
            self.filter.initial_capacity = value;
        }
        if let Some(value) = override_cfg.filter_error_rate {
            self.filter.error_rate = value;
        }
        if let Some(value) = override_cfg.filter_growth {
            self.filter.growth = value;
        }
        if let Some(value) = override_cfg.filter_tightening_ratio {
            self.filter.tightening_ratio = value;
        }
        if let Some(value) = override_cfg.seed_path {
            self.seed_path = Some(value);
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.jwt_secret.is_empty() {
            bail!("COMPASS_JWT_SECRET is required");
        }
        if self.filter.initial_capacity == 0 {
            bail!("filter capacity must be positive");
        }
        if !(self.filter.error_rate > 0.0 && self.filter.error_rate < 1.0) {
            bail!("filter error rate must be in (0, 1)");
        }
        if self.filter.growth == 0 || self.filter.growth > MAX_FILTER_GROWTH {
            bail!("filter growth must be in 1..={MAX_FILTER_GROWTH}");
        }
        if !(self.filter.tightening_ratio > 0.0 && self.filter.tightening_ratio <= 1.0) {
            bail!("filter tightening ratio must be in (0, 1]");
        }
        if self.store_timeout.is_zero() {
            bail!("store timeout must be positive");
        }
        Ok(())
    }
}
