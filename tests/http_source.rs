mod support;

use std::{sync::Arc, time::Duration};

use httpmock::MockServer;
use quillpost::{
    application::content::{ContentClient, ContentClientConfig, FetchError, PostSource},
    infra::upstream::{HttpPostSource, HttpSourceConfig},
};
use serde_json::json;
use support::post_json;
use url::Url;

const CONTENT_PATH: &str = "/api/content.json";

fn source_for(server: &MockServer, cache_busting: bool) -> HttpPostSource {
    let endpoint = Url::parse(&server.url(CONTENT_PATH)).expect("mock url");
    HttpPostSource::new(HttpSourceConfig {
        endpoint,
        request_timeout: Duration::from_secs(5),
        cache_busting,
    })
    .expect("http source")
}

#[tokio::test]
async fn fetch_sends_identifying_headers_and_decodes_list() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path(CONTENT_PATH)
                .header("accept", "application/json")
                .header("user-agent", HttpPostSource::user_agent());
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    post_json("first", "published", "2024-01-01"),
                    post_json("second", "draft", "2024-02-01"),
                ]));
        })
        .await;

    let posts = source_for(&server, false)
        .fetch()
        .await
        .expect("fetch succeeds");

    mock.assert_async().await;
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].slug, "first");
    assert_eq!(posts[0].featured_image_url, None);
}

#[tokio::test]
async fn cache_busting_adds_cache_control_header() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET")
                .path(CONTENT_PATH)
                .header("cache-control", "no-cache, no-store, must-revalidate");
            then.status(200)
                .header("content-type", "application/json")
                .body("[]");
        })
        .await;

    let posts = source_for(&server, true)
        .fetch()
        .await
        .expect("fetch succeeds");

    mock.assert_async().await;
    assert!(posts.is_empty());
}

#[tokio::test]
async fn client_serves_repeat_queries_from_one_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method("GET").path(CONTENT_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([
                    {"slug": "a", "status": "published", "publishDate": "2024-01-02"},
                    {"slug": "b", "status": "draft", "publishDate": "2024-01-03"}
                ]));
        })
        .await;

    let client = ContentClient::new(
        ContentClientConfig {
            revalidate: Duration::from_secs(60),
        },
        Arc::new(source_for(&server, true)),
    );

    let listed = client.list_published().await;
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slug, "a");
    assert_eq!(client.get_by_slug("b").await, None);
    assert_eq!(client.list_slugs().await, vec!["a"]);

    mock.assert_async().await;
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path(CONTENT_PATH);
            then.status(500).body("upstream exploded");
        })
        .await;

    let err = source_for(&server, true)
        .fetch()
        .await
        .expect_err("500 is an error");

    assert_eq!(
        err,
        FetchError::Status {
            status: 500,
            body: "upstream exploded".to_string(),
        }
    );
}

#[tokio::test]
async fn object_payload_degrades_all_queries() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path(CONTENT_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({"posts": [post_json("a", "published", "2024-01-01")]}));
        })
        .await;

    let source = source_for(&server, true);
    let err = source.fetch().await.expect_err("object is not a list");
    assert_eq!(err, FetchError::NotAList { found: "object" });

    let client = ContentClient::new(ContentClientConfig::default(), Arc::new(source));
    assert!(client.list_published().await.is_empty());
    assert_eq!(client.get_by_slug("a").await, None);
    assert!(client.list_slugs().await.is_empty());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path(CONTENT_PATH);
            then.status(200)
                .header("content-type", "text/html")
                .body("<html><body>maintenance</body></html>");
        })
        .await;

    let err = source_for(&server, true)
        .fetch()
        .await
        .expect_err("html is not json");
    assert_eq!(err.reason(), "malformed");
}

#[tokio::test]
async fn element_without_slug_is_a_shape_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method("GET").path(CONTENT_PATH);
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!([{"title": "no slug", "status": "published", "publishDate": "2024-01-01"}]));
        })
        .await;

    let err = source_for(&server, true)
        .fetch()
        .await
        .expect_err("slug is required");
    assert_eq!(err.reason(), "shape");
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let source = HttpPostSource::new(HttpSourceConfig {
        endpoint: Url::parse("http://127.0.0.1:1/content.json").expect("url"),
        request_timeout: Duration::from_secs(2),
        cache_busting: true,
    })
    .expect("http source");

    let err = source.fetch().await.expect_err("nothing listens on port 1");
    assert_eq!(err.reason(), "transport");

    let client = ContentClient::new(ContentClientConfig::default(), Arc::new(source));
    assert!(client.list_published().await.is_empty());
    assert_eq!(client.get_by_slug("anything").await, None);
}
