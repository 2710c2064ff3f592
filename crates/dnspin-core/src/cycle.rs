//! One reconciliation cycle: look up the record, discover the address,
//! write the desired state.

use crate::{
    cfg::AppConfig,
    discover::discover_ip,
    error::{CycleError, LookupError},
    reconcile::{Action, reconcile},
};
use dnspin_provider::{DnsProvider, DnsRecord, RecordPayload};
use reqwest::Client;
use std::net::Ipv4Addr;
use tracing::{debug, info};

/// Outcome of a successful cycle.
#[derive(Debug, Clone)]
pub struct CycleReport {
    pub ip: Ipv4Addr,
    pub action: Action,
    pub record: DnsRecord,
}

/// Run a single cycle. Failures are returned, never panicked, so the
/// scheduler can log them and carry on with the next tick.
pub async fn run_cycle(
    cfg: &AppConfig,
    client: &Client,
    provider: &dyn DnsProvider,
) -> Result<CycleReport, CycleError> {
    debug!("starting reconciliation cycle for `{}`", cfg.record_name);

    let existing = provider
        .find_record(&cfg.record_name)
        .await
        .map_err(LookupError::from)?;
    match &existing {
        Some(record) => debug!("existing record id={} content={}", record.id, record.content),
        None => debug!("no existing record for `{}`", cfg.record_name),
    }

    let ip = discover_ip(client, &cfg.ip_source).await?;

    let desired = RecordPayload::a(&cfg.record_name, ip, cfg.ttl.seconds(), cfg.proxied);
    let (action, record) = reconcile(provider, existing.as_ref(), &desired).await?;

    info!("record `{}` {action}: {ip}", cfg.record_name);
    Ok(CycleReport { ip, action, record })
}

/*──────── tests ────────*/
