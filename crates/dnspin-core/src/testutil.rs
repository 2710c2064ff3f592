//! Shared fakes for unit tests.

use crate::cfg::{AppConfig, Ttl};
use crate::discover::{IpEndpoint, IpProvider, ResponseShape};
use async_trait::async_trait;
use dnspin_provider::{DnsProvider, DnsRecord, ProviderError, RecordPayload};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteCall {
    Create(RecordPayload),
    Update { id: String, payload: RecordPayload },
}

/// In-memory provider recording every write it receives.
#[derive(Default)]
pub struct FakeProvider {
    pub existing: Option<DnsRecord>,
    pub fail_lookup: bool,
    pub fail_write: bool,
    pub(crate) calls: Mutex<Vec<WriteCall>>,
}

impl FakeProvider {
    pub fn with_existing(record: DnsRecord) -> Self {
        Self {
            existing: Some(record),
            ..Self::default()
        }
    }

    pub fn writes(&self) -> Vec<WriteCall> {
        self.calls.lock().unwrap().clone()
    }

    fn materialize(&self, id: &str, payload: &RecordPayload) -> DnsRecord {
        DnsRecord {
            id: id.to_owned(),
            record_type: payload.record_type.clone(),
            name: payload.name.clone(),
            content: payload.content.clone(),
            ttl: payload.ttl,
            proxied: payload.proxied,
        }
    }
}

#[async_trait]
impl DnsProvider for FakeProvider {
    fn name(&self) -> &'static str {
        "fake"
    }

    async fn find_record(&self, _name: &str) -> Result<Option<DnsRecord>, ProviderError> {
        if self.fail_lookup {
            return Err(ProviderError::Api("lookup exploded".into()));
        }
        Ok(self.existing.clone())
    }

    async fn create_record(&self, payload: &RecordPayload) -> Result<DnsRecord, ProviderError> {
        if self.fail_write {
            return Err(ProviderError::Api("write exploded".into()));
        }
        self.calls
            .lock()
            .unwrap()
            .push(WriteCall::Create(payload.clone()));
        Ok(self.materialize("new-record", payload))
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord, ProviderError> {
        if self.fail_write {
            return Err(ProviderError::Api("write exploded".into()));
        }
        self.calls.lock().unwrap().push(WriteCall::Update {
            id: id.to_owned(),
            payload: payload.clone(),
        });
        Ok(self.materialize(id, payload))
    }
}

pub fn existing_record(id: &str, content: &str) -> DnsRecord {
    DnsRecord {
        id: id.to_owned(),
        record_type: "A".to_owned(),
        name: "home.example.com".to_owned(),
        content: content.to_owned(),
        ttl: 3600,
        proxied: false,
    }
}

pub fn test_config(ip_url: &str) -> AppConfig {
    AppConfig {
        api_token: "test-token".to_owned(),
        zone_id: "zone123".to_owned(),
        record_name: "home.example.com".to_owned(),
        ip_source: IpEndpoint {
            provider: IpProvider::Ipify,
            url: ip_url.to_owned(),
            shape: ResponseShape::JsonIp,
        },
        schedule: "*/5 * * * *".to_owned(),
        proxied: false,
        ttl: Ttl::Seconds(3600),
    }
}
