//! Composition order and short-circuiting of pipelines.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use http::StatusCode;
use reports::{Next, Pipeline, RequestContext, ResponseRecord, Result, Stage};
use reports_test::MockTransport;

type Journal = Arc<Mutex<Vec<String>>>;

struct Recording {
    label: &'static str,
    journal: Journal,
}

#[async_trait]
impl Stage for Recording {
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        self.journal.lock().unwrap().push(format!("{} in", self.label));
        let response = next.run(request).await;
        self.journal.lock().unwrap().push(format!("{} out", self.label));
        response
    }

    fn name(&self) -> &'static str {
        self.label
    }
}

struct ShortCircuit;

#[async_trait]
impl Stage for ShortCircuit {
    async fn handle(&self, _request: RequestContext, _next: Next<'_>) -> Result<ResponseRecord> {
        Ok(ResponseRecord::new(StatusCode::IM_A_TEAPOT))
    }
}

struct TagRequest(&'static str);

#[async_trait]
impl Stage for TagRequest {
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        let request = request.with_header("x-stage", self.0)?;
        next.run(request).await
    }
}

fn recording(label: &'static str, journal: &Journal) -> Recording {
    Recording {
        label,
        journal: journal.clone(),
    }
}

fn request() -> RequestContext {
    RequestContext::get("https://api.github.com/").unwrap()
}

#[tokio::test]
async fn test_stages_run_outermost_first_and_unwind_in_reverse() {
    let journal = Journal::default();
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let pipeline = Pipeline::builder()
        .stage(recording("s1", &journal))
        .stage(recording("s2", &journal))
        .stage(recording("s3", &journal))
        .build(transport.clone());

    pipeline.call(request()).await.unwrap();

    assert_eq!(
        *journal.lock().unwrap(),
        vec!["s1 in", "s2 in", "s3 in", "s3 out", "s2 out", "s1 out"]
    );
    assert_eq!(transport.call_count(), 1);
    assert_eq!(pipeline.stage_names(), vec!["s1", "s2", "s3"]);
}

#[tokio::test]
async fn test_short_circuit_skips_deeper_stages_and_transport() {
    let journal = Journal::default();
    let transport = MockTransport::new();
    let pipeline = Pipeline::builder()
        .stage(recording("outer", &journal))
        .stage(ShortCircuit)
        .stage(recording("inner", &journal))
        .build(transport.clone());

    let response = pipeline.call(request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    assert_eq!(*journal.lock().unwrap(), vec!["outer in", "outer out"]);
    assert_eq!(transport.call_count(), 0);
}

#[tokio::test]
async fn test_empty_pipeline_calls_transport_directly() {
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::NO_CONTENT));
    let pipeline = Pipeline::builder().build(transport.clone());

    let response = pipeline.call(request()).await.unwrap();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(transport.call_count(), 1);
}

#[tokio::test]
async fn test_inner_stage_sees_outer_mutations() {
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let pipeline = Pipeline::builder()
        .stage(TagRequest("outer"))
        .stage(TagRequest("inner"))
        .build(transport.clone());

    pipeline.call(request()).await.unwrap();

    let sent = transport.last_request().unwrap();
    assert_eq!(sent.headers().get("x-stage").unwrap(), "inner");
}

#[tokio::test]
async fn test_errors_unwind_through_outer_stages() {
    let journal = Journal::default();
    let transport = MockTransport::new().fail("connection refused");
    let pipeline = Pipeline::builder()
        .stage(recording("outer", &journal))
        .build(transport);

    let result = pipeline.call(request()).await;

    assert!(matches!(result, Err(reports::Error::Transport(_))));
    assert_eq!(*journal.lock().unwrap(), vec!["outer in", "outer out"]);
}

#[tokio::test]
async fn test_pipelines_nest_as_transports() {
    let journal = Journal::default();
    let transport = MockTransport::new().respond(ResponseRecord::new(StatusCode::OK));
    let inner = Pipeline::builder()
        .stage(recording("inner", &journal))
        .build(transport.clone());
    let outer = Pipeline::builder()
        .stage(recording("outer", &journal))
        .optional_stage(None::<ShortCircuit>)
        .build(inner);

    outer.call(request()).await.unwrap();

    assert_eq!(
        *journal.lock().unwrap(),
        vec!["outer in", "inner in", "inner out", "outer out"]
    );
}
