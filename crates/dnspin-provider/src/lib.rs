use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::net::Ipv4Addr;
use thiserror::Error;

/// A DNS record as it exists at the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DnsRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    #[serde(default)]
    pub proxied: bool,
}

/// Desired state for a single `A` record, sent verbatim as the write body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordPayload {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

impl RecordPayload {
    pub fn a(name: &str, ip: Ipv4Addr, ttl: u32, proxied: bool) -> Self {
        Self {
            record_type: "A".to_owned(),
            name: name.to_owned(),
            content: ip.to_string(),
            ttl,
            proxied,
        }
    }
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[async_trait]
pub trait DnsProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// First record matching `name`, or `None` when the zone has no such
    /// record. Same-name duplicates past the first are ignored.
    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>, ProviderError>;

    async fn create_record(&self, payload: &RecordPayload) -> Result<DnsRecord, ProviderError>;

    async fn update_record(
        &self,
        id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord, ProviderError>;
}
