//! Charge history listing: pagination, validation and error mapping.

mod common;

use std::time::Duration;

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zaptecapi::{
    CancelFlag, ChargeHistoryQuery, ChargingSession, DateRange, List, ZaptecClient, ZaptecError,
};

use common::{client, config, mount_token, session_json, session_page, INSTALLATION_ID};

fn february() -> DateRange {
    DateRange::previous_month(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
}

async fn mount_page(server: &MockServer, index: u32, body: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/api/chargehistory"))
        .and(query_param("pageIndex", index.to_string()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_sends_history_query_parameters() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/chargehistory"))
        .and(query_param("installationId", INSTALLATION_ID))
        .and(query_param("From", "2024-02-01T00:00:00.001Z"))
        .and(query_param("To", "2024-02-29T23:59:59.999Z"))
        .and(query_param("DetailLevel", "0"))
        .and(query_param("pageIndex", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_page(0, 2, 1)))
        .expect(1)
        .mount(&server)
        .await;

    let range = february();
    let sessions = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap();

    assert_eq!(sessions.len(), 2);
    assert_eq!(sessions[0].id, "session-0");
    assert_eq!(sessions[0].energy, 12.5);
}

#[tokio::test]
async fn test_fetches_every_page_in_order() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 10, 3)).await;
    mount_page(&server, 1, session_page(10, 10, 3)).await;
    mount_page(&server, 2, session_page(20, 4, 3)).await;

    let range = february();
    let sessions = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap();

    assert_eq!(sessions.len(), 24);
    let ids: Vec<_> = sessions.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(ids.first(), Some(&"session-0"));
    assert_eq!(ids.get(10), Some(&"session-10"));
    assert_eq!(ids.last(), Some(&"session-23"));
}

#[tokio::test]
async fn test_empty_first_page_returns_empty() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, json!({"Pages": 1, "Data": []})).await;

    let range = february();
    let sessions = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap();

    assert!(sessions.is_empty());
}

#[tokio::test]
async fn test_stops_at_first_empty_page() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 10, 5)).await;
    mount_page(&server, 1, json!({"Pages": 5, "Data": []})).await;

    let range = february();
    let sessions = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap();

    assert_eq!(sessions.len(), 10);
}

#[tokio::test]
async fn test_page_total_above_limit_is_pagination_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 1, 20_000)).await;

    let range = february();
    let err = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaptecError::Pagination(_)));
}

#[tokio::test]
async fn test_lowered_page_limit() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 10, 3)).await;

    let client = client(&server).with_max_pages(2);
    let range = february();
    let err = client
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaptecError::Pagination(_)));
}

#[tokio::test]
async fn test_zero_pages_with_items_is_pagination_error() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 2, 0)).await;

    let range = february();
    let err = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaptecError::Pagination(_)));
}

#[tokio::test]
async fn test_cancelled_before_next_page() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, session_page(0, 10, 3)).await;

    let cancel = CancelFlag::new();
    cancel.cancel();

    let client = client(&server).with_cancel_flag(cancel);
    let range = february();
    let err = client
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaptecError::Cancelled));
}

#[tokio::test]
async fn test_missing_energy_is_schema_validation() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    let mut broken = session_json(1);
    broken.as_object_mut().unwrap().remove("Energy");
    mount_page(
        &server,
        0,
        json!({"Pages": 1, "Data": [session_json(0), broken]}),
    )
    .await;

    let range = february();
    match client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err()
    {
        ZaptecError::SchemaValidation {
            schema,
            missing_fields,
            ..
        } => {
            assert_eq!(schema, "ChargingSession");
            assert_eq!(missing_fields, vec!["Data[1].Energy".to_string()]);
        }
        other => panic!("expected SchemaValidation, got {other:?}"),
    }
}

#[tokio::test]
async fn test_wrong_type_is_schema_validation() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    let mut broken = session_json(0);
    broken["Energy"] = json!("12.5 kWh");
    mount_page(&server, 0, json!({"Pages": 1, "Data": [broken]})).await;

    let range = february();
    let err = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(err.is_contract_change());
    assert!(err.to_string().contains("Energy"));
}

#[tokio::test]
async fn test_missing_envelope_is_schema_validation() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 0, json!({"Data": []})).await;

    let range = february();
    let err = client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(err.is_contract_change());
}

#[tokio::test]
async fn test_server_error_not_retried() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/chargehistory"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let range = february();
    match client(&server)
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err()
    {
        ZaptecError::Http { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "maintenance");
        }
        other => panic!("expected Http, got {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_is_timeout() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    Mock::given(method("GET"))
        .and(path("/api/chargehistory"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(session_page(0, 1, 1))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let client =
        ZaptecClient::new(config(&server).with_timeout(Duration::from_millis(200))).unwrap();
    let range = february();
    let err = client
        .charging_sessions(range.from(), range.to())
        .await
        .unwrap_err();

    assert!(matches!(err, ZaptecError::Timeout));
}

#[tokio::test]
async fn test_reversed_range_makes_no_requests() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 0).await;

    let from = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
    let to = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

    let client = client(&server);
    let err = client.charging_sessions(from, to).await.unwrap_err();

    assert!(matches!(err, ZaptecError::InvalidArgument(_)));
    assert_eq!(client.http().authentications(), 0);
}

#[tokio::test]
async fn test_list_page_through_trait() {
    let server = MockServer::start().await;
    mount_token(&server, "tok-1", 86400, 1).await;

    mount_page(&server, 1, session_page(10, 10, 3)).await;

    let client = client(&server);
    let query = ChargeHistoryQuery::new(INSTALLATION_ID, february());
    let page = ChargingSession::list_page(client.http(), &query, 1)
        .await
        .unwrap();

    assert_eq!(page.index, 1);
    assert_eq!(page.total_pages, 3);
    assert_eq!(page.len(), 10);
    assert!(page.has_more());
}
