use std::sync::Arc;

use board_core::RankedPageRecord;
use board_engine::{
    EnrichmentSource, FailureKind, FetchSettings, Fetcher, HttpEnrichmentSource,
    HttpRankedSource, RankedPagesSource, ReqwestFetcher,
};
use pretty_assertions::assert_eq;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> Arc<dyn Fetcher> {
    Arc::new(ReqwestFetcher::new(FetchSettings::default()).unwrap())
}

#[tokio::test]
async fn ranked_source_sends_host_key_and_limit() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/toppages/"))
        .and(query_param("host", "ted.com"))
        .and(query_param("apikey", "secret"))
        .and(query_param("limit", "30"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"path": "/talks/a.html", "visitors": 120, "i": "A"},
            {"path": "/", "visitors": 90},
            {"visitors": 4}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpRankedSource::new(
        fetcher(),
        &format!("{}/toppages/", server.uri()),
        "ted.com",
        "secret",
        30,
    )
    .unwrap();

    let ranked = source.fetch_ranked().await.unwrap();
    assert_eq!(
        ranked,
        vec![
            RankedPageRecord::new("/talks/a.html", 120),
            RankedPageRecord::new("/", 90),
        ]
    );
}

#[tokio::test]
async fn ranked_source_reports_null_payload_as_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/toppages/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .mount(&server)
        .await;

    let source = HttpRankedSource::new(
        fetcher(),
        &format!("{}/toppages/", server.uri()),
        "ted.com",
        "",
        30,
    )
    .unwrap();

    let err = source.fetch_ranked().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::EmptyResponse);
}

#[tokio::test]
async fn enrichment_source_joins_urls_with_literal_commas() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1/oembed"))
        .and(query_param("key", "embed-key"))
        .and(query_param(
            "urls",
            "http://ted.com/a.html,http://ted.com/b,c.html",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"url": "http://ted.com/a.html", "title": "A", "thumbnail_url": "http://i/a.jpg", "html": "<a/>"},
            {"url": "http://ted.com/b,c.html", "title": "B"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpEnrichmentSource::new(
        fetcher(),
        &format!("{}/1/oembed", server.uri()),
        "embed-key",
    )
    .unwrap();
    let urls = vec![
        "http://ted.com/a.html".to_string(),
        "http://ted.com/b,c.html".to_string(),
    ];

    let query = source.batch_url(&urls).query().unwrap().to_string();
    assert!(query.ends_with("urls=http%3A%2F%2Fted.com%2Fa.html,http%3A%2F%2Fted.com%2Fb%2Cc.html"));

    let records = source.fetch_batch(&urls).await.unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].title, "A");
    assert_eq!(records[0].embed_html.as_deref(), Some("<a/>"));
    assert!(records[0].is_usable());
    assert!(!records[1].is_usable());
}
