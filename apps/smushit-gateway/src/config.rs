//! Gateway configuration
//!
//! Read once at startup from the process environment (after `.env` has been
//! loaded) and split into the per-component configs.

use anyhow::{Context, Result};
use chrono::Utc;
use smushit_domain::{BundleConfig, CoordinatorConfig, PublisherConfig};
use smushit_fetch::FetcherConfig;
use smushit_s3::infrastructure::{S3Config, MAX_PRESIGN_TTL};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Plain,
    Json,
}

/// Everything the gateway needs to start
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub host: String,
    pub port: u16,
    pub log_format: LogFormat,
    pub s3: S3Config,
    pub publisher: PublisherConfig,
    pub fetcher: FetcherConfig,
    pub coordinator: CoordinatorConfig,
    pub bundle: BundleConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_format: LogFormat::default(),
            s3: S3Config::default(),
            publisher: PublisherConfig::default(),
            fetcher: FetcherConfig::default(),
            coordinator: CoordinatorConfig::default(),
            bundle: BundleConfig::default(),
        }
    }
}

impl GatewayConfig {
    /// Load the configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load the configuration from an arbitrary variable source
    ///
    /// Blank values count as unset. A value that does not parse is an error
    /// naming the variable.
    pub fn from_lookup<L>(lookup: L) -> Result<Self>
    where
        L: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let mut config = Self::default();

        if let Some(host) = var("SMUSHIT_HOST") {
            config.host = host;
        }
        if let Some(port) = parse(&var, "SMUSHIT_PORT")? {
            config.port = port;
        }
        if let Some(format) = var("SMUSHIT_LOG_FORMAT") {
            config.log_format = if format.eq_ignore_ascii_case("json") {
                LogFormat::Json
            } else {
                LogFormat::Plain
            };
        }

        if let Some(bucket) = var("SMUSHIT_BUCKET") {
            config.s3.bucket = bucket;
        }
        if let Some(region) = var("SMUSHIT_REGION") {
            config.s3.region = region;
        }
        config.s3.endpoint = var("SMUSHIT_S3_ENDPOINT");

        if let Some(secs) = parse::<u64, _>(&var, "SMUSHIT_LINK_TTL_SECS")? {
            config.publisher.link_ttl = Duration::from_secs(secs);
        }
        if let Some(secs) = parse::<u64, _>(&var, "SMUSHIT_EXPIRY_HINT_SECS")? {
            config.publisher.expiry_hint = Duration::from_secs(secs);
        }
        if config.publisher.link_ttl.is_zero() || config.publisher.link_ttl > MAX_PRESIGN_TTL {
            anyhow::bail!(
                "SMUSHIT_LINK_TTL_SECS must be between 1 and {}",
                MAX_PRESIGN_TTL.as_secs()
            );
        }
        let hint_fits = chrono::Duration::from_std(config.publisher.expiry_hint)
            .ok()
            .and_then(|hint| Utc::now().checked_add_signed(hint))
            .is_some();
        if !hint_fits {
            anyhow::bail!("SMUSHIT_EXPIRY_HINT_SECS is too large to express as a date");
        }

        if let Some(dir) = var("SMUSHIT_SCRATCH_DIR") {
            config.bundle.scratch_dir = PathBuf::from(dir);
        }
        if let Some(secs) = parse::<u64, _>(&var, "SMUSHIT_FETCH_TIMEOUT_SECS")? {
            config.fetcher.timeout = Duration::from_secs(secs);
        }
        if let Some(user_agent) = var("SMUSHIT_USER_AGENT") {
            config.fetcher.user_agent = user_agent;
        }

        config.coordinator.max_concurrent_fetches =
            parse::<usize, _>(&var, "SMUSHIT_MAX_CONCURRENT_FETCHES")?;
        if config.coordinator.max_concurrent_fetches == Some(0) {
            anyhow::bail!("SMUSHIT_MAX_CONCURRENT_FETCHES must be at least 1");
        }

        Ok(config)
    }

    /// `host:port` to bind the HTTP listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse<T, V>(var: &V, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
    V: Fn(&str) -> Option<String>,
{
    var(key)
        .map(|value| {
            value
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: '{}'", key, value))
        })
        .transpose()
}
