//! ReqwestTransport against a wiremock server, alone and inside a pipeline.

use std::time::Duration;

use http::StatusCode;
use http::header::{AUTHORIZATION, ETAG, IF_NONE_MATCH};
use reports::prelude::*;
use reports::{CacheStatus, Error};
use reports_moka::MokaStore;
use reports_reqwest::ReqwestTransport;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_status_headers_and_body_are_preserved() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("X-Custom-Header", "custom-value")
                .set_body_string("response body content"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new();
    let request = RequestContext::get(format!("{}/users/octocat", server.uri())).unwrap();
    let response = transport.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.header_str("x-custom-header"), Some("custom-value"));
    assert_eq!(response.body().as_ref(), b"response body content");
    assert!(response.cache_status().is_none());
}

#[tokio::test]
async fn test_method_headers_and_body_are_sent() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/gists"))
        .and(header("authorization", "token abc"))
        .and(header("user-agent", "reports-test"))
        .and(body_json(serde_json::json!({"public": false})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::builder()
        .user_agent("reports-test")
        .timeout(Duration::from_secs(5))
        .build()
        .unwrap();
    let request = RequestContext::new(http::Method::POST, format!("{}/gists", server.uri()))
        .unwrap()
        .with_header(AUTHORIZATION, "token abc")
        .unwrap()
        .with_json(&serde_json::json!({"public": false}))
        .unwrap();

    let response = transport.call(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_connection_failure_is_a_transport_error() {
    let transport = ReqwestTransport::new();
    let result = transport
        .call(RequestContext::get("http://127.0.0.1:1/gone").unwrap())
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::builder()
        .timeout(Duration::from_millis(50))
        .build()
        .unwrap();
    let result = transport
        .call(RequestContext::get(server.uri()).unwrap())
        .await;

    assert!(matches!(result, Err(Error::Transport(_))));
}

#[tokio::test]
async fn test_pipeline_serves_second_get_from_cache() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/octocat"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Cache-Control", "public, max-age=60")
                .set_body_json(serde_json::json!({"login": "octocat"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::builder()
        .stage(StatusCheckStage::default())
        .stage(JsonDecodingStage)
        .stage(CacheStage::new(MokaStore::builder().max_entries(100).build()))
        .build(ReqwestTransport::new());
    let url = format!("{}/users/octocat", server.uri());

    let first = pipeline.call(RequestContext::get(&url).unwrap()).await.unwrap();
    let second = pipeline.call(RequestContext::get(&url).unwrap()).await.unwrap();

    assert_eq!(first.cache_status(), Some(CacheStatus::Miss));
    assert_eq!(second.cache_status(), Some(CacheStatus::Hit));
    assert_eq!(second.decoded().unwrap()["login"], "octocat");
}

#[tokio::test]
async fn test_pipeline_revalidates_with_etag() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/repos"))
        .and(header(IF_NONE_MATCH.as_str(), "\"abc123\""))
        .respond_with(ResponseTemplate::new(304))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/repos"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Cache-Control", "private, no-cache")
                .insert_header(ETAG.as_str(), "\"abc123\"")
                .set_body_json(serde_json::json!([{"full_name": "octocat/hello"}])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let pipeline = Pipeline::builder()
        .stage(StatusCheckStage::default())
        .stage(JsonDecodingStage)
        .stage(CacheStage::new(MokaStore::builder().max_entries(100).build()))
        .build(ReqwestTransport::new());
    let url = format!("{}/repos", server.uri());

    let first = pipeline.call(RequestContext::get(&url).unwrap()).await.unwrap();
    let second = pipeline.call(RequestContext::get(&url).unwrap()).await.unwrap();

    assert_eq!(second.status(), StatusCode::OK);
    assert_eq!(second.cache_status(), Some(CacheStatus::Revalidated));
    assert_eq!(second.body(), first.body());
    assert_eq!(second.decoded().unwrap()[0]["full_name"], "octocat/hello");
}
