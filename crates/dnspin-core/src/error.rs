use dnspin_provider::ProviderError;
use thiserror::Error;

/// Fatal configuration problems; the process refuses to start.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Load(#[from] config::ConfigError),

    #[error("validation failed: {0}")]
    Validate(#[from] validator::ValidationErrors),

    #[error("unsupported IP provider `{0}`; expected one of: ipify, icanhazip, myip")]
    UnknownIpProvider(String),

    #[error("invalid TTL `{0}`; expected a positive number of seconds or `auto`")]
    InvalidTtl(String),

    #[error("invalid cron schedule `{expr}`: {source}")]
    InvalidSchedule {
        expr: String,
        #[source]
        source: cron::error::Error,
    },
}

/// Public-IP lookup failed; the cycle is abandoned until the next tick.
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("unknown IP provider `{0}`")]
    UnknownProvider(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("`{provider}` response `{body}` is not an IPv4 address")]
    Parse {
        provider: &'static str,
        body: String,
    },
}

#[derive(Error, Debug)]
#[error("record lookup failed: {0}")]
pub struct LookupError(#[from] ProviderError);

#[derive(Error, Debug)]
#[error("record write failed: {0}")]
pub struct ReconcileError(#[from] ProviderError);

/// Everything a single reconciliation cycle can fail with. Returned by the
/// cycle, logged and discarded at the scheduler boundary; never fatal.
#[derive(Error, Debug)]
pub enum CycleError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error(transparent)]
    Lookup(#[from] LookupError),

    #[error(transparent)]
    Reconcile(#[from] ReconcileError),
}
