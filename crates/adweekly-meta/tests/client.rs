//! Integration tests for `MetaClient` using wiremock HTTP mocks.

use adweekly_core::{Dimension, ReportWindow};
use adweekly_meta::{MetaClient, MetaClientConfig, MetaError};
use adweekly_report::InsightSource;
use chrono::NaiveDate;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const INSIGHTS_PATH: &str = "/v21.0/act_998877/insights";

fn test_client(base_url: &str, max_retries: u32) -> MetaClient {
    MetaClient::new(&MetaClientConfig {
        access_token: "test-token".to_owned(),
        ad_account_id: "998877".to_owned(),
        api_version: "v21.0".to_owned(),
        base_url: base_url.to_owned(),
        timeout_secs: 30,
        max_retries,
        retry_backoff_base_ms: 0,
    })
    .expect("client construction should not fail")
}

fn window() -> ReportWindow {
    ReportWindow::new(
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
    )
    .unwrap()
}

#[tokio::test]
async fn campaign_insights_follow_paging_cursor() {
    let server = MockServer::start().await;

    let next = format!("{}{INSIGHTS_PATH}?level=campaign&after=cursor2", server.uri());
    let first = serde_json::json!({
        "data": [{
            "campaign_id": "c1",
            "campaign_name": "Spring Sale",
            "date_start": "2025-03-03",
            "date_stop": "2025-03-03",
            "spend": "10.50",
            "impressions": "1000",
            "clicks": "20",
            "actions": [{ "action_type": "purchase", "value": "2" }],
            "action_values": [{ "action_type": "omni_purchase", "value": "42.00" }]
        }],
        "paging": { "cursors": { "after": "cursor2" }, "next": next }
    });
    let second = serde_json::json!({
        "data": [{
            "campaign_id": "c1",
            "campaign_name": "Spring Sale",
            "date_start": "2025-03-04",
            "date_stop": "2025-03-04",
            "spend": "5",
            "impressions": "400",
            "clicks": "4"
        }],
        "paging": { "cursors": { "before": "cursor2" } }
    });

    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .and(query_param("after", "cursor2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&second))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .and(query_param("level", "campaign"))
        .and(query_param("time_increment", "1"))
        .and(query_param("access_token", "test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&first))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let rows = client
        .fetch_insights(&window())
        .await
        .expect("should fetch both pages");

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].conversions, 2);
    assert_eq!(rows[0].revenue, 42.0);
    assert_eq!(rows[1].date, NaiveDate::from_ymd_opt(2025, 3, 4).unwrap());
    assert_eq!(rows[1].spend, 5.0);
}

#[tokio::test]
async fn demographics_query_every_dimension() {
    let server = MockServer::start().await;

    for (dimension, bucket) in [("age", "25-34"), ("gender", "female"), ("region", "Seoul")] {
        let body = serde_json::json!({
            "data": [{ dimension: bucket, "impressions": "100", "clicks": "3", "spend": "7.5" }]
        });
        Mock::given(method("GET"))
            .and(path(INSIGHTS_PATH))
            .and(query_param("level", "account"))
            .and(query_param("breakdowns", dimension))
            .respond_with(ResponseTemplate::new(200).set_body_json(&body))
            .expect(1)
            .mount(&server)
            .await;
    }

    let client = test_client(&server.uri(), 0);
    let rows = client
        .fetch_demographics(&window())
        .await
        .expect("should fetch all breakdowns");

    assert_eq!(rows.len(), 3);
    let region = rows
        .iter()
        .find(|r| r.dimension == Dimension::Region)
        .expect("region row present");
    assert_eq!(region.bucket, "Seoul");
    assert_eq!(region.spend, 7.5);
}

#[tokio::test]
async fn auth_error_surfaces_graph_message_without_retry() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "error": {
                "message": "Invalid OAuth access token.",
                "type": "OAuthException",
                "code": 190
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 3);
    let err = client.campaign_insights(&window()).await.unwrap_err();

    match err {
        MetaError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 400);
            assert_eq!(code, Some(190));
            assert!(message.contains("Invalid OAuth"));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_retried_then_succeeds() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": [] })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 2);
    let rows = client
        .campaign_insights(&window())
        .await
        .expect("retry should recover");
    assert!(rows.is_empty());
}

#[tokio::test]
async fn malformed_number_is_a_normalization_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(INSIGHTS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{
                "campaign_id": "c1",
                "campaign_name": "Broken",
                "date_start": "2025-03-03",
                "impressions": "lots"
            }]
        })))
        .mount(&server)
        .await;

    let client = test_client(&server.uri(), 0);
    let err = client.campaign_insights(&window()).await.unwrap_err();
    assert!(matches!(err, MetaError::Normalization { ref field, .. } if field == "impressions"));
}
