//! Shared wiremock helpers for the integration tests.

#![allow(dead_code)]

use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zaptecapi::{ClientConfig, Credentials, ZaptecClient};

pub const INSTALLATION_ID: &str = "inst-1";

pub fn config(server: &MockServer) -> ClientConfig {
    let credentials = Credentials::new("user@example.com", "secret", INSTALLATION_ID).unwrap();
    ClientConfig::new(credentials).with_base_url(server.uri())
}

pub fn client(server: &MockServer) -> ZaptecClient {
    ZaptecClient::new(config(server)).unwrap()
}

pub fn token_body(token: &str, expires_in: u64) -> Value {
    json!({
        "access_token": token,
        "token_type": "Bearer",
        "expires_in": expires_in
    })
}

/// Mount a token endpoint answering `token`, expected `times` times.
pub async fn mount_token(server: &MockServer, token: &str, expires_in: u64, times: u64) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(token, expires_in)))
        .expect(times)
        .mount(server)
        .await;
}

/// A raw charge-history item as the API returns it.
pub fn session_json(id: usize) -> Value {
    json!({
        "Id": format!("session-{id}"),
        "UserUserName": "anna",
        "DeviceId": "ZAP000123",
        "StartDateTime": "2024-02-10T18:00:00.000",
        "EndDateTime": "2024-02-10T20:30:00.000",
        "Energy": 12.5,
        "CommitMetadata": 5,
        "CommitEndDateTime": "2024-02-10T20:30:01.000",
        "UserFullName": "Anna Andersson",
        "ChargerId": "c-1",
        "DeviceName": "Plats 12",
        "UserEmail": "anna@example.com",
        "UserId": "u-1",
        "ExternallyEnded": false,
        "SignedSession": "OCMF|{}",
        "ChargerFirmwareVersion": {
            "Major": 3, "Minor": 2, "Build": 0, "Revision": 1,
            "MajorRevision": 0, "MinorRevision": 1
        }
    })
}

/// A list envelope with `count` sessions numbered from `first`.
pub fn session_page(first: usize, count: usize, pages: u32) -> Value {
    json!({
        "Pages": pages,
        "Data": (first..first + count).map(session_json).collect::<Vec<_>>()
    })
}
