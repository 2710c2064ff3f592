//! Public-IP discovery via external echo services.
//!
//! Each supported service is a fixed endpoint plus a response-shape hint:
//! some reply with JSON carrying an `ip` field, others with a bare text body.

use crate::error::DiscoveryError;
use reqwest::Client;
use serde_json::Value;
use std::{net::Ipv4Addr, time::Duration};
use tracing::info;

// Bounded so a hung echo service cannot outlive the next scheduled tick.
pub(crate) const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

pub fn http_client() -> reqwest::Result<Client> {
    Client::builder().timeout(HTTP_TIMEOUT).build()
}

/*──────── provider registry ────────*/

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpProvider {
    Ipify,
    Icanhazip,
    MyIp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// JSON body carrying the address in an `ip` field.
    JsonIp,
    /// Bare address in the body, possibly with surrounding whitespace.
    Text,
}

/// One selected entry of the provider registry, fixed for the process
/// lifetime.
#[derive(Debug, Clone)]
pub struct IpEndpoint {
    pub provider: IpProvider,
    pub url: String,
    pub shape: ResponseShape,
}

impl IpProvider {
    /// Resolve a configured provider name. Fails without any network call.
    pub fn from_name(name: &str) -> Result<Self, DiscoveryError> {
        match name {
            "ipify" => Ok(Self::Ipify),
            "icanhazip" => Ok(Self::Icanhazip),
            "myip" => Ok(Self::MyIp),
            other => Err(DiscoveryError::UnknownProvider(other.to_owned())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Ipify => "ipify",
            Self::Icanhazip => "icanhazip",
            Self::MyIp => "myip",
        }
    }

    pub fn endpoint(self) -> IpEndpoint {
        let (url, shape) = match self {
            Self::Ipify => ("https://api.ipify.org?format=json", ResponseShape::JsonIp),
            Self::Icanhazip => ("https://ipv4.icanhazip.com", ResponseShape::Text),
            Self::MyIp => ("https://api.myip.com", ResponseShape::JsonIp),
        };
        IpEndpoint {
            provider: self,
            url: url.to_owned(),
            shape,
        }
    }
}

/*──────── discovery ────────*/

/// Fetch the caller's current public IPv4 address from `source`.
///
/// No retry here; a failed lookup fails the cycle and the next scheduled
/// tick tries again.
pub async fn discover_ip(client: &Client, source: &IpEndpoint) -> Result<Ipv4Addr, DiscoveryError> {
    let body = client
        .get(&source.url)
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    let raw = match source.shape {
        ResponseShape::JsonIp => json_ip_field(&body).unwrap_or_else(|| body.trim().to_owned()),
        ResponseShape::Text => body.trim().to_owned(),
    };

    let ip = raw.parse::<Ipv4Addr>().map_err(|_| DiscoveryError::Parse {
        provider: source.provider.name(),
        body: raw,
    })?;
    info!("detected public IP {ip} via {}", source.provider.name());
    Ok(ip)
}

fn json_ip_field(body: &str) -> Option<String> {
    let v: Value = serde_json::from_str(body).ok()?;
    Some(v.get("ip")?.as_str()?.to_owned())
}

/*──────── tests ────────*/
