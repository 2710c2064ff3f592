//! Cloudflare DNS provider
//!
//! * `A` record lookup, create and update inside a single zone.
//! * Auth via **API Token** – needs `Zone:Read` and `DNS:Edit`.
//! * The zone id comes from configuration and no record id is cached
//!   between calls; every cycle re-reads the record from the API.
//! * All business errors are mapped to [`dnspin_provider::ProviderError`].

use async_trait::async_trait;
use dnspin_provider::{DnsProvider, DnsRecord, ProviderError, RecordPayload};
use reqwest::{
    Client, Response,
    header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue, USER_AGENT},
};
use serde::{Deserialize, de::DeserializeOwned};
use std::time::Duration;
use tracing::{debug, info};

const API_ROOT: &str = "https://api.cloudflare.com/client/v4";

// Bounded so a hung API call cannot outlive the next scheduled tick.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/*──────── response envelope ────────*/

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiError>,
    result: Option<T>,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

async fn check<T: DeserializeOwned>(resp: Response) -> Result<T, ProviderError> {
    let status = resp.status();
    let env: Envelope<T> = resp.json().await?;
    if status.is_success() && env.success {
        env.result
            .ok_or_else(|| ProviderError::Api("response missing `result`".into()))
    } else {
        let msg = env
            .errors
            .first()
            .map(|e| e.message.clone())
            .unwrap_or_else(|| format!("unexpected status {status}"));
        Err(ProviderError::Api(msg))
    }
}

/*──────── provider struct ────────*/

pub struct CloudflareProvider {
    zone_id: String,
    base_url: String,
    client: Client,
}

impl CloudflareProvider {
    pub fn new(token: &str, zone_id: &str) -> anyhow::Result<Self> {
        Self::with_base_url(token, zone_id, API_ROOT)
    }

    /// Point the provider at a different API root, e.g. a mock server.
    pub fn with_base_url(token: &str, zone_id: &str, base_url: &str) -> anyhow::Result<Self> {
        let mut hdr = HeaderMap::new();
        hdr.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}"))?,
        );
        hdr.insert(USER_AGENT, HeaderValue::from_static("dnspin (+github)"));
        hdr.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        Ok(Self {
            zone_id: zone_id.to_owned(),
            base_url: base_url.trim_end_matches('/').to_owned(),
            client: Client::builder()
                .default_headers(hdr)
                .timeout(REQUEST_TIMEOUT)
                .build()?,
        })
    }

    /*──────── tiny HTTP wrapper ────────*/

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        check(
            self.client
                .get(format!("{}{path}", self.base_url))
                .send()
                .await?,
        )
        .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &RecordPayload,
    ) -> Result<T, ProviderError> {
        check(
            self.client
                .post(format!("{}{path}", self.base_url))
                .json(body)
                .send()
                .await?,
        )
        .await
    }

    async fn put<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &RecordPayload,
    ) -> Result<T, ProviderError> {
        check(
            self.client
                .put(format!("{}{path}", self.base_url))
                .json(body)
                .send()
                .await?,
        )
        .await
    }
}

/*──────── DnsProvider impl ────────*/

#[async_trait]
impl DnsProvider for CloudflareProvider {
    fn name(&self) -> &'static str {
        "Cloudflare"
    }

    async fn find_record(&self, name: &str) -> Result<Option<DnsRecord>, ProviderError> {
        let records: Vec<DnsRecord> = self
            .get(&format!("/zones/{}/dns_records?name={name}", self.zone_id))
            .await?;
        debug!(
            "zone {} has {} record(s) named `{name}`",
            self.zone_id,
            records.len()
        );
        Ok(records.into_iter().next())
    }

    async fn create_record(&self, payload: &RecordPayload) -> Result<DnsRecord, ProviderError> {
        let record: DnsRecord = self
            .post(&format!("/zones/{}/dns_records", self.zone_id), payload)
            .await?;
        info!("Cloudflare created record id={}", record.id);
        Ok(record)
    }

    async fn update_record(
        &self,
        id: &str,
        payload: &RecordPayload,
    ) -> Result<DnsRecord, ProviderError> {
        let record: DnsRecord = self
            .put(
                &format!("/zones/{}/dns_records/{id}", self.zone_id),
                payload,
            )
            .await?;
        info!("Cloudflare updated record id={id}");
        Ok(record)
    }
}

/*──────── tests ────────*/
