//! Scheduler: run reconciliation cycles on a cron schedule, forever.

use crate::{
    cfg::AppConfig,
    cycle::{CycleReport, run_cycle},
    discover::http_client,
    error::{CycleError, DiscoveryError},
};
use anyhow::Result;
use chrono::Utc;
use cron::Schedule;
use dnspin_provider::DnsProvider;
use std::{str::FromStr, sync::Arc};
use tokio::sync::{Mutex, Notify};
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, error, info, warn};

/// The cron crate wants a seconds field; the configuration uses the common
/// 5-field form, so prepend `0` when needed.
pub(crate) fn normalize_cron(expr: &str) -> String {
    let expr = expr.trim();
    if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_owned()
    }
}

fn log_startup(cfg: &AppConfig) {
    info!(
        "managing `{}` via IP provider `{}`, schedule `{}`",
        cfg.record_name,
        cfg.ip_source.provider.name(),
        cfg.schedule
    );
    info!("proxied: {}, ttl: {}", cfg.proxied, cfg.ttl);
}

fn report(cfg: &AppConfig, outcome: &Result<CycleReport, CycleError>) {
    match outcome {
        Ok(rep) => info!(
            "DNS record {} (id={}): {} -> {}; ttl={}, proxied={}",
            rep.action, rep.record.id, cfg.record_name, rep.ip, cfg.ttl, cfg.proxied
        ),
        Err(err) => error!("cycle failed: {err}"),
    }
}

/// Run exactly one cycle and return its outcome.
pub async fn run_once(
    cfg: AppConfig,
    provider: Arc<dyn DnsProvider>,
) -> Result<CycleReport, CycleError> {
    log_startup(&cfg);
    let client = http_client().map_err(DiscoveryError::from)?;
    let outcome = run_cycle(&cfg, &client, provider.as_ref()).await;
    report(&cfg, &outcome);
    outcome
}

/// Fire a cycle at every tick of the configured schedule until the process
/// is terminated. Cycle failures are logged and swallowed; only scheduler
/// setup can fail.
pub async fn run_scheduler(cfg: AppConfig, provider: Arc<dyn DnsProvider>) -> Result<()> {
    log_startup(&cfg);

    let expr = normalize_cron(&cfg.schedule);
    let ticks = Arc::new(Schedule::from_str(&expr)?);
    let client = http_client()?;
    // held for the duration of a cycle; a tick that finds it taken is skipped
    let running = Arc::new(Mutex::new(()));

    let sch = JobScheduler::new().await?;
    let job = Job::new_async(expr.as_str(), move |_, _| {
        let cfg = cfg.clone();
        let provider = provider.clone();
        let client = client.clone();
        let running = running.clone();
        let ticks = ticks.clone();
        Box::pin(async move {
            let Ok(_guard) = running.try_lock() else {
                warn!("previous cycle still running; skipping this tick");
                return;
            };
            let outcome = run_cycle(&cfg, &client, provider.as_ref()).await;
            report(&cfg, &outcome);
            if let Some(next) = ticks.after(&Utc::now()).next() {
                debug!("next cycle at {next}");
            }
        })
    })?;
    sch.add(job).await?;
    sch.start().await?;
    info!("cron started: {expr}");

    Notify::new().notified().await; // suspend forever
    Ok(())
}

/*──────── tests ────────*/

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn five_field_expressions_gain_a_seconds_field() {
        assert_eq!(normalize_cron("*/5 * * * *"), "0 */5 * * * *");
    }

    #[test]
    fn six_field_expressions_pass_through() {
        assert_eq!(normalize_cron("30 */5 * * * *"), "30 */5 * * * *");
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        assert_eq!(normalize_cron("  */5 * * * *  "), "0 */5 * * * *");
    }
}
