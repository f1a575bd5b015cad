//! Authentication, status check, JSON decoding and logging stages.

use http::header::{AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE, DATE};
use http::StatusCode;
use reports::prelude::*;
use reports::{CacheStatus, Error};
use reports_core::headers::http_date;
use reports_test::clock::t0;
use reports_test::{ManualClock, MockStore, MockTransport};
use tracing::Level;

const URL: &str = "https://api.github.com/users/octocat";

fn json(status: StatusCode, body: &'static str) -> ResponseRecord {
    ResponseRecord::new(status)
        .with_header(CONTENT_TYPE, "application/json; charset=utf-8")
        .with_body(body)
}

#[tokio::test]
async fn test_authentication_adds_token_header() {
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let pipeline = Pipeline::builder()
        .stage(AuthenticationStage::new(StaticToken::new("s3cr3t").unwrap()))
        .build(transport.clone());

    pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers().get(AUTHORIZATION).unwrap(), "token s3cr3t");
}

#[tokio::test]
async fn test_authentication_keeps_existing_header() {
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let pipeline = Pipeline::builder()
        .stage(AuthenticationStage::new(StaticToken::new("s3cr3t").unwrap()))
        .build(transport.clone());
    let request = RequestContext::get(URL)
        .unwrap()
        .with_header(AUTHORIZATION, "Bearer other")
        .unwrap();

    pipeline.call(request).await.unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers().get(AUTHORIZATION).unwrap(), "Bearer other");
}

#[tokio::test]
async fn test_status_check_reports_json_message() {
    let transport = MockTransport::new().respond(json(
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"message":"Server Error"}"#,
    ));
    let pipeline = Pipeline::builder()
        .stage(StatusCheckStage::default())
        .build(transport);

    let error = pipeline
        .call(RequestContext::get(URL).unwrap())
        .await
        .unwrap_err();

    match error {
        Error::RequestFailure { status, message } => {
            assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
            assert_eq!(message, "Server Error");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_status_check_accepts_whitelisted_statuses() {
    let transport = MockTransport::new().respond(json(
        StatusCode::NOT_FOUND,
        r#"{"message":"Not Found"}"#,
    ));
    let pipeline = Pipeline::builder()
        .stage(StatusCheckStage::default())
        .build(transport);

    let response = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_custom_whitelist() {
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::NOT_FOUND));
    let pipeline = Pipeline::builder()
        .stage(StatusCheckStage::new([StatusCode::OK]))
        .build(transport);

    let result = pipeline.call(RequestContext::get(URL).unwrap()).await;

    assert!(matches!(
        result,
        Err(Error::RequestFailure { status, .. }) if status == StatusCode::NOT_FOUND
    ));
}

#[tokio::test]
async fn test_json_decoding_keeps_raw_body() {
    let transport =
        MockTransport::new().respond(json(StatusCode::OK, r#"{"name":"The Octocat"}"#));
    let pipeline = Pipeline::builder()
        .stage(JsonDecodingStage)
        .build(transport);

    let response = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    assert_eq!(response.decoded().unwrap()["name"], "The Octocat");
    assert_eq!(response.body().as_ref(), br#"{"name":"The Octocat"}"#);
}

#[tokio::test]
async fn test_json_decoding_skips_empty_and_non_json_bodies() {
    let transport = MockTransport::new()
        .respond(ResponseRecord::new(StatusCode::NO_CONTENT).with_header(CONTENT_TYPE, "application/json"))
        .respond(ResponseRecord::new(StatusCode::OK).with_header(CONTENT_TYPE, "text/html").with_body("<p>"));
    let pipeline = Pipeline::builder()
        .stage(JsonDecodingStage)
        .build(transport);

    let empty = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();
    let html = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    assert!(empty.decoded().is_none());
    assert!(html.decoded().is_none());
}

#[tokio::test]
async fn test_json_decoding_fails_on_malformed_body() {
    let transport = MockTransport::new().respond(json(StatusCode::OK, "{not json"));
    let pipeline = Pipeline::builder()
        .stage(JsonDecodingStage)
        .build(transport);

    let result = pipeline.call(RequestContext::get(URL).unwrap()).await;

    assert!(matches!(result, Err(Error::Decode(_))));
}

#[tokio::test]
async fn test_logging_emits_one_line_per_request() {
    let (events, _guard) = reports_test::tracing::capture();
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let pipeline = Pipeline::builder()
        .stage(LoggingStage::new(Level::INFO))
        .build(transport);

    pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    let logged = events.from_target("reports::stages::logging");
    assert_eq!(logged.len(), 1);
    let event = &logged[0];
    assert_eq!(event.level, Level::INFO);
    assert!(
        event.message.starts_with(&format!("-> {URL} GET 200 (")),
        "unexpected message: {}",
        event.message
    );
    assert!(event.message.ends_with(" s)"));
    assert_eq!(event.field("status"), Some("200"));
    assert_eq!(event.field("method"), Some("GET"));
    assert_eq!(event.field("cache"), Some("none"));
}

#[tokio::test]
async fn test_logging_reports_failures() {
    let (events, _guard) = reports_test::tracing::capture();
    let pipeline = Pipeline::builder()
        .stage(LoggingStage::default())
        .build(MockTransport::new().fail("timed out"));

    let result = pipeline.call(RequestContext::get(URL).unwrap()).await;

    assert!(result.is_err());
    let logged = events.from_target("reports::stages::logging");
    assert_eq!(logged.len(), 1);
    assert_eq!(logged[0].level, Level::DEBUG);
    assert!(logged[0].message.contains("GET failed"));
}

/// The stack used by API clients: a cache hit still gets decoded, a 304
/// never reaches the status check and credentials never reach the store.
#[tokio::test]
async fn test_full_stack_order() {
    let (events, _guard) = reports_test::tracing::capture();
    let store = MockStore::new();
    let clock = ManualClock::at_t0();
    let transport = MockTransport::new();
    let pipeline = Pipeline::builder()
        .stage(LoggingStage::default())
        .stage(StatusCheckStage::default())
        .stage(JsonDecodingStage)
        .stage(CacheStage::new(store.clone()).with_clock(clock.clone()))
        .stage(AuthenticationStage::new(StaticToken::new("s3cr3t").unwrap()))
        .build(transport.clone());
    transport.push(
        json(StatusCode::OK, r#"{"login":"octocat"}"#)
            .with_header(CACHE_CONTROL, "private, max-age=60")
            .with_header(DATE, http_date(t0()))
            .with_header(http::header::ETAG, "\"abc\""),
    );

    let first = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();
    let second = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();

    assert_eq!(first.decoded().unwrap()["login"], "octocat");
    assert_eq!(second.decoded().unwrap()["login"], "octocat");
    assert_eq!(second.cache_status(), Some(CacheStatus::Hit));
    assert_eq!(transport.call_count(), 1);

    let stored = store.get(URL).unwrap();
    assert!(stored.decoded().is_none());

    clock.advance(chrono::Duration::seconds(300));
    transport.push(ResponseRecord::new(StatusCode::NOT_MODIFIED));
    let third = pipeline.call(RequestContext::get(URL).unwrap()).await.unwrap();
    assert_eq!(third.status(), StatusCode::OK);
    assert_eq!(third.cache_status(), Some(CacheStatus::Revalidated));
    assert_eq!(
        transport.last_request().unwrap().headers().get(AUTHORIZATION).unwrap(),
        "token s3cr3t"
    );

    let caches: Vec<_> = events
        .from_target("reports::stages::logging")
        .iter()
        .filter_map(|event| event.field("cache").map(str::to_owned))
        .collect();
    assert_eq!(caches, vec!["miss", "hit", "revalidated"]);
}
