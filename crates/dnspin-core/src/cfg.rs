//! Environment configuration
//!
//! All settings come from environment variables; there is no config file.
//! `CF_API_TOKEN`, `CF_ZONE_ID` and `CF_DNS_NAME` are required, the rest
//! have defaults.

use crate::{
    discover::{IpEndpoint, IpProvider},
    error::ConfigError,
    scheduler::normalize_cron,
};
use config::{Config, Environment};
use cron::Schedule;
use serde::Deserialize;
use std::{fmt, str::FromStr};
use validator::Validate;

/*──────── raw environment view ────────*/

#[derive(Debug, Deserialize, Validate)]
struct RawConfig {
    #[validate(length(min = 1))]
    cf_api_token: String,
    #[validate(length(min = 1))]
    cf_zone_id: String,
    #[validate(length(min = 1))]
    cf_dns_name: String,

    #[serde(default = "default_provider")]
    ip_provider: String,
    #[serde(default = "default_schedule")]
    cron_schedule: String,
    #[serde(default)]
    proxy: bool,
    #[serde(default = "default_ttl")]
    ttl: String,
}

fn default_provider() -> String {
    "ipify".into()
}
fn default_schedule() -> String {
    "*/5 * * * *".into()
}
fn default_ttl() -> String {
    "3600".into()
}

/*──────── TTL ────────*/

/// Record time-to-live: a positive number of seconds, or `auto` which maps
/// to the provider sentinel value `1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    Auto,
    Seconds(u32),
}

impl Ttl {
    pub fn seconds(self) -> u32 {
        match self {
            Ttl::Auto => 1,
            Ttl::Seconds(n) => n,
        }
    }
}

impl fmt::Display for Ttl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ttl::Auto => f.write_str("auto"),
            Ttl::Seconds(n) => write!(f, "{n}"),
        }
    }
}

fn parse_ttl(raw: &str) -> Result<Ttl, ConfigError> {
    if raw.eq_ignore_ascii_case("auto") {
        return Ok(Ttl::Auto);
    }
    match raw.trim().parse::<u32>() {
        Ok(n) if n > 0 => Ok(Ttl::Seconds(n)),
        _ => Err(ConfigError::InvalidTtl(raw.to_owned())),
    }
}

/*──────── AppConfig ────────*/

/// Validated, immutable configuration; loaded once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_token: String,
    pub zone_id: String,
    pub record_name: String,
    pub ip_source: IpEndpoint,
    pub schedule: String,
    pub proxied: bool,
    pub ttl: Ttl,
}

/// Load and validate configuration from the process environment.
///
/// Required: `CF_API_TOKEN`, `CF_ZONE_ID`, `CF_DNS_NAME`.
/// Optional: `IP_PROVIDER` (ipify), `CRON_SCHEDULE` (`*/5 * * * *`),
/// `PROXY` (false), `TTL` (3600, or `auto`).
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let raw: RawConfig = Config::builder()
        .add_source(Environment::default())
        .build()?
        .try_deserialize()?;
    finish(raw)
}

fn finish(raw: RawConfig) -> Result<AppConfig, ConfigError> {
    raw.validate()?;

    let provider = IpProvider::from_name(&raw.ip_provider)
        .map_err(|_| ConfigError::UnknownIpProvider(raw.ip_provider.clone()))?;
    let ttl = parse_ttl(&raw.ttl)?;

    Schedule::from_str(&normalize_cron(&raw.cron_schedule)).map_err(|e| {
        ConfigError::InvalidSchedule {
            expr: raw.cron_schedule.clone(),
            source: e,
        }
    })?;

    Ok(AppConfig {
        api_token: raw.cf_api_token,
        zone_id: raw.cf_zone_id,
        record_name: raw.cf_dns_name,
        ip_source: provider.endpoint(),
        schedule: raw.cron_schedule,
        proxied: raw.proxy,
        ttl,
    })
}

/*──────── tests ────────*/
