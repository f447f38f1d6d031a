//! Mock-based client tests using wiremock.
//!
//! These tests verify the Google Scholar client by serving results pages from a
//! mock server.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use futures::TryStreamExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use scholar_api::client::{GoogleScholarClient, SearchCapability};
use scholar_api::config::Config;
use scholar_api::error::ClientError;
use scholar_api::models::{Authors, PubYear};
use scholar_api::papers::fetch_papers;
use scholar_api::server::create_router;

fn setup_client(mock_server: &MockServer) -> GoogleScholarClient {
    let config = Config::for_testing(&mock_server.uri());
    GoogleScholarClient::new(config).unwrap()
}

/// One `gs_ri` result block.
fn result_html(n: usize) -> String {
    format!(
        r#"<div class="gs_r gs_or gs_scl"><div class="gs_ri">
          <h3 class="gs_rt"><a href="https://example.org/paper/{n}">Paper {n}</a></h3>
          <div class="gs_a">A Author, B Author - Journal of Tests, 2020 - example.org</div>
          <div class="gs_rs">Snippet {n}</div>
          <div class="gs_fl"><a href="/scholar?cites={n}">Cited by {citations}</a></div>
        </div></div>"#,
        citations = n * 3
    )
}

/// A results page holding `range` results, optionally linking to a next page.
fn results_page(range: std::ops::Range<usize>, has_next: bool) -> String {
    let results: String = range.map(result_html).collect();
    let nav = if has_next {
        r#"<td align="left"><a href="/scholar?start=10"><span class="gs_ico gs_ico_nav_next"></span><b>Next</b></a></td>"#
    } else {
        ""
    };
    format!(
        r#"<html><body><div id="gs_res_ccl"><div id="gs_res_ccl_mid">{results}</div></div>
        <div id="gs_n"><table><tr>{nav}</tr></table></div></body></html>"#
    )
}

fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=UTF-8")
}

// =============================================================================
// Search and parsing
// =============================================================================

#[tokio::test]
async fn test_search_first_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("q", "machine learning"))
        .and(query_param("hl", "en"))
        .and(query_param_is_missing("start"))
        .respond_with(html(results_page(0..2, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let publications: Vec<_> =
        client.search_pubs("machine learning").await.unwrap().try_collect().await.unwrap();

    assert_eq!(publications.len(), 2);
    let first = &publications[0];
    assert_eq!(first.bib.title.as_deref(), Some("Paper 0"));
    assert_eq!(
        first.bib.author,
        Some(Authors::List(vec!["A Author".to_string(), "B Author".to_string()]))
    );
    assert_eq!(first.bib.pub_year, Some(PubYear::from("2020")));
    assert_eq!(first.pub_url.as_deref(), Some("https://example.org/paper/0"));
    assert_eq!(publications[1].num_citations, Some(3));
}

#[tokio::test]
async fn test_pagination_follows_next_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param_is_missing("start"))
        .respond_with(html(results_page(0..3, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("start", "3"))
        .respond_with(html(results_page(3..6, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let papers = fetch_papers(&client, "graphs").await.unwrap();

    let titles: Vec<&str> = papers.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Paper 0", "Paper 1", "Paper 2", "Paper 3", "Paper 4"]);
}

#[tokio::test]
async fn test_full_first_page_does_not_fetch_second() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param_is_missing("start"))
        .respond_with(html(results_page(0..10, true)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("start", "10"))
        .respond_with(html(results_page(10..20, true)))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let papers = fetch_papers(&client, "optics").await.unwrap();

    assert_eq!(papers.len(), 5);
    assert_eq!(papers[4].title, "Paper 4");
}

#[tokio::test]
async fn test_last_page_ends_stream() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(html(results_page(0..2, false)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let papers = fetch_papers(&client, "rare topic").await.unwrap();
    assert_eq!(papers.len(), 2);
}

#[tokio::test]
async fn test_no_results_page() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(html(results_page(0..0, false)))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let papers = fetch_papers(&client, "qwertyuiop").await.unwrap();
    assert!(papers.is_empty());
}

// =============================================================================
// Upstream failures
// =============================================================================

#[tokio::test]
async fn test_rate_limit_429() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.search_pubs("test").await.err().unwrap();

    assert!(matches!(err, ClientError::RateLimited { .. }), "got {err:?}");
    assert_eq!(err.retry_after(), Some(std::time::Duration::from_secs(30)));
}

#[tokio::test]
async fn test_forbidden_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.search_pubs("test").await.err().unwrap();
    assert!(matches!(err, ClientError::Blocked { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_server_error_500() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.search_pubs("test").await.err().unwrap();

    assert!(matches!(err, ClientError::Server { status: 500, .. }), "got {err:?}");
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_captcha_page_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(html(
            r#"<html><body><div id="gs_captcha_ccl"><form id="gs_captcha_f"></form></div></body></html>"#
                .to_string(),
        ))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.search_pubs("test").await.err().unwrap();
    assert!(matches!(err, ClientError::Blocked { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_sorry_redirect_is_blocked() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(
            ResponseTemplate::new(302)
                .insert_header("Location", format!("{}/sorry/index", mock_server.uri())),
        )
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/sorry/index"))
        .respond_with(html("<html><body>Our systems have detected unusual traffic</body></html>".to_string()))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let err = client.search_pubs("test").await.err().unwrap();
    assert!(matches!(err, ClientError::Blocked { .. }), "got {err:?}");
}

#[tokio::test]
async fn test_failure_on_second_page_fails_lookup() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param_is_missing("start"))
        .respond_with(html(results_page(0..2, true)))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("start", "2"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let client = setup_client(&mock_server);
    let result = fetch_papers(&client, "test").await;
    assert!(matches!(result, Err(ClientError::Server { status: 503, .. })));
}

// =============================================================================
// End to end through the router
// =============================================================================

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app.oneshot(Request::get(uri).body(Body::empty()).unwrap()).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_router_maps_scraped_results() {
    let mock_server = MockServer::start().await;

    let citation_only = r#"<div class="gs_r gs_or gs_scl"><div class="gs_ri">
        <h3 class="gs_rt"><span class="gs_ct1">[CITATION]</span><span class="gs_ct2">[C]</span> Notes on things</h3>
        <div class="gs_a">J Doe - example.org</div>
        <div class="gs_fl"><a href="javascript:void(0)">Save</a></div></div></div>"#;
    let page = format!(
        r#"<html><body><div id="gs_res_ccl">{}{}</div></body></html>"#,
        result_html(1),
        citation_only
    );

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .and(query_param("q", "machine learning"))
        .respond_with(html(page))
        .mount(&mock_server)
        .await;

    let app = create_router(Arc::new(setup_client(&mock_server)));
    let (status, body) = get_json(app, "/api/scholar?field=machine+learning").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "papers": [
                {
                    "title": "Paper 1",
                    "authors": ["A Author", "B Author"],
                    "year": "2020",
                    "link": "https://example.org/paper/1",
                    "citations": 3
                },
                {
                    "title": "Notes on things",
                    "authors": ["J Doe"],
                    "year": "Unknown",
                    "link": "No link",
                    "citations": 0
                }
            ]
        })
    );
}

#[tokio::test]
async fn test_router_upstream_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scholar"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&mock_server)
        .await;

    let app = create_router(Arc::new(setup_client(&mock_server)));
    let (status, body) = get_json(app, "/api/scholar?field=biology").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Failed to fetch Google Scholar data"}));
}
