use std::time::Duration;

use board_engine::{FailureKind, FetchSettings, Fetcher, ReqwestFetcher};
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn url(server: &MockServer, route: &str) -> Url {
    Url::parse(&format!("{}{}", server.uri(), route)).unwrap()
}

#[tokio::test]
async fn fetcher_returns_json_body_and_metadata() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/toppages/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"path": "/a.html", "visitors": 3}
        ])))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let target = url(&server, "/toppages/");

    let output = fetcher.get(&target).await.expect("fetch ok");
    assert_eq!(output.metadata.status, 200);
    assert_eq!(output.metadata.url, target.to_string());
    assert!(output
        .metadata
        .content_type
        .unwrap()
        .starts_with("application/json"));
    assert_eq!(output.metadata.byte_len, output.bytes.len() as u64);
}

#[tokio::test]
async fn fetcher_fails_on_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher.get(&url(&server, "/missing")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(404));
}

#[tokio::test]
async fn fetcher_treats_blank_body_as_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/blank"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("  \n", "application/json"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher.get(&url(&server, "/blank")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::EmptyResponse);
}

#[tokio::test]
async fn fetcher_times_out_on_slow_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_string("[]"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        request_timeout: Duration::from_millis(50),
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();

    let err = fetcher.get(&url(&server, "/slow")).await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[tokio::test]
async fn fetcher_rejects_too_large_response() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/large"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Content-Type", "application/json")
                .insert_header("Content-Length", "11")
                .set_body_string("01234567890"),
        )
        .mount(&server)
        .await;

    let settings = FetchSettings {
        max_bytes: 10,
        ..FetchSettings::default()
    };
    let fetcher = ReqwestFetcher::new(settings).unwrap();

    let err = fetcher.get(&url(&server, "/large")).await.unwrap_err();
    assert_eq!(
        err.kind,
        FailureKind::TooLarge {
            max_bytes: 10,
            actual: Some(11)
        }
    );
}

#[tokio::test]
async fn fetcher_rejects_html_pages() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("<html></html>", "text/html"))
        .mount(&server)
        .await;

    let fetcher = ReqwestFetcher::new(FetchSettings::default()).unwrap();
    let err = fetcher.get(&url(&server, "/login")).await.unwrap_err();
    assert!(matches!(
        err.kind,
        FailureKind::UnsupportedContentType { .. }
    ));
}
