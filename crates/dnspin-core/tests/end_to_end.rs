//! Full-cycle scenarios against mocked IP-echo and DNS-provider endpoints.

use dnspin_core::{
    Action, AppConfig, IpEndpoint, IpProvider, ResponseShape, Ttl, http_client, run_cycle,
};
use dnspin_provider_cloudflare::CloudflareProvider;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config(ip_url: String) -> AppConfig {
    AppConfig {
        api_token: "test-token".into(),
        zone_id: "zone123".into(),
        record_name: "home.example.com".into(),
        ip_source: IpEndpoint {
            provider: IpProvider::Ipify,
            url: ip_url,
            shape: ResponseShape::JsonIp,
        },
        schedule: "*/5 * * * *".into(),
        proxied: false,
        ttl: Ttl::Seconds(3600),
    }
}

fn desired_body() -> serde_json::Value {
    json!({
        "type": "A",
        "name": "home.example.com",
        "content": "203.0.113.7",
        "ttl": 3600,
        "proxied": false
    })
}

async fn mount_ipify(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/ip"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ip": "203.0.113.7"})))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn a_missing_record_is_created() {
    let server = MockServer::start().await;
    mount_ipify(&server).await;

    Mock::given(method("GET"))
        .and(path("/zones/zone123/dns_records"))
        .and(query_param("name", "home.example.com"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/zones/zone123/dns_records"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(desired_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": {
                "id": "new123",
                "type": "A",
                "name": "home.example.com",
                "content": "203.0.113.7",
                "ttl": 3600,
                "proxied": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(format!("{}/ip", server.uri()));
    let provider = CloudflareProvider::with_base_url("test-token", "zone123", &server.uri()).unwrap();

    let report = run_cycle(&cfg, &http_client().unwrap(), &provider)
        .await
        .unwrap();
    assert_eq!(report.action, Action::Created);
    assert_eq!(report.ip.to_string(), "203.0.113.7");
    assert_eq!(report.record.id, "new123");
}

#[tokio::test]
async fn a_stale_record_is_updated_in_place() {
    let server = MockServer::start().await;
    mount_ipify(&server).await;

    Mock::given(method("GET"))
        .and(path("/zones/zone123/dns_records"))
        .and(query_param("name", "home.example.com"))
        .and(header("Authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": [{
                "id": "abc123",
                "type": "A",
                "name": "home.example.com",
                "content": "203.0.113.1",
                "ttl": 3600,
                "proxied": false
            }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/zones/zone123/dns_records/abc123"))
        .and(header("Authorization", "Bearer test-token"))
        .and(body_json(desired_body()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "errors": [],
            "result": {
                "id": "abc123",
                "type": "A",
                "name": "home.example.com",
                "content": "203.0.113.7",
                "ttl": 3600,
                "proxied": false
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let cfg = config(format!("{}/ip", server.uri()));
    let provider = CloudflareProvider::with_base_url("test-token", "zone123", &server.uri()).unwrap();

    let report = run_cycle(&cfg, &http_client().unwrap(), &provider)
        .await
        .unwrap();
    assert_eq!(report.action, Action::Updated);
    assert_eq!(report.record.id, "abc123");
    assert_eq!(report.record.content, "203.0.113.7");
}
