use chrono::NaiveDate;

use super::*;

fn config(base_url: &str) -> MetaClientConfig {
    MetaClientConfig {
        access_token: "secret-token".to_owned(),
        ad_account_id: "12345".to_owned(),
        api_version: "v21.0".to_owned(),
        base_url: base_url.to_owned(),
        timeout_secs: 30,
        max_retries: 0,
        retry_backoff_base_ms: 0,
    }
}

fn window() -> ReportWindow {
    ReportWindow::new(
        NaiveDate::from_ymd_opt(2025, 3, 3).unwrap(),
        NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
    )
    .unwrap()
}

fn query_value(url: &Url, key: &str) -> Option<String> {
    url.query_pairs()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.into_owned())
}

#[test]
fn insights_path_includes_version_and_prefixed_account() {
    let client = MetaClient::new(&config("https://graph.facebook.com")).unwrap();
    assert_eq!(
        client.insights_url.as_str(),
        "https://graph.facebook.com/v21.0/act_12345/insights"
    );
}

#[test]
fn trailing_slash_on_base_url_is_tolerated() {
    let client = MetaClient::new(&config("https://graph.facebook.com/")).unwrap();
    assert_eq!(client.insights_url.path(), "/v21.0/act_12345/insights");
}

#[test]
fn build_url_encodes_time_range_and_token() {
    let client = MetaClient::new(&config("https://graph.facebook.com")).unwrap();
    let url = client.build_url(&window(), &[("level", "campaign")]);
    assert_eq!(query_value(&url, "level").as_deref(), Some("campaign"));
    assert_eq!(
        query_value(&url, "time_range").as_deref(),
        Some(r#"{"since":"2025-03-03","until":"2025-03-09"}"#)
    );
    assert_eq!(
        query_value(&url, "access_token").as_deref(),
        Some("secret-token")
    );
}

#[test]
fn empty_account_id_is_rejected() {
    let mut cfg = config("https://graph.facebook.com");
    cfg.ad_account_id = "  ".to_owned();
    assert!(matches!(
        MetaClient::new(&cfg),
        Err(MetaError::InvalidConfig(_))
    ));
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(matches!(
        MetaClient::new(&config("not a url")),
        Err(MetaError::InvalidConfig(_))
    ));
}

#[test]
fn api_error_reads_graph_envelope() {
    let err = api_error(
        400,
        r#"{"error":{"message":"User request limit reached","type":"OAuthException","code":17}}"#,
    );
    assert!(err.is_rate_limited());
    assert!(matches!(err, MetaError::Api { status: 400, code: Some(17), .. }));
}

#[test]
fn api_error_tolerates_plain_text_body() {
    let err = api_error(502, "Bad Gateway");
    match err {
        MetaError::Api {
            status,
            code,
            message,
        } => {
            assert_eq!(status, 502);
            assert_eq!(code, None);
            assert_eq!(message, "Bad Gateway");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn config_debug_redacts_token() {
    let rendered = format!("{:?}", config("https://graph.facebook.com"));
    assert!(!rendered.contains("secret-token"));
}
