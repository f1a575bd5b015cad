//! Pipeline stages and the continuation handed to them.
//!
//! A [`Stage`] wraps everything deeper in the pipeline. It receives the
//! request together with a [`Next`] continuation, may change the request,
//! decides whether to call `next.run(request)`, and may change the response
//! on its way back out:
//!
//! ```text
//!  request ─▶ S1 ─▶ S2 ─▶ ... ─▶ Sn ─▶ transport
//! response ◀─ S1 ◀─ S2 ◀─ ... ◀─ Sn ◀─┘
//! ```
//!
//! A stage that returns without calling `next` short-circuits the pipeline:
//! no deeper stage and no transport runs for that request.

use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::Result;
use crate::request::RequestContext;
use crate::response::ResponseRecord;
use crate::transport::Transport;

/// A unit of request/response processing.
///
/// # Example
///
/// ```rust,ignore
/// use async_trait::async_trait;
/// use reports_core::{Next, RequestContext, ResponseRecord, Result, Stage};
///
/// struct UserAgent;
///
/// #[async_trait]
/// impl Stage for UserAgent {
///     async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
///         let request = request.with_header("user-agent", "reports/0.1")?;
///         next.run(request).await
///     }
/// }
/// ```
#[async_trait]
pub trait Stage: Send + Sync + 'static {
    /// Processes one request, usually by delegating to `next`.
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord>;

    /// Short name used in debug output.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

#[async_trait]
impl<S> Stage for Arc<S>
where
    S: Stage + ?Sized,
{
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        (**self).handle(request, next).await
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The rest of the pipeline, as seen from inside a stage.
///
/// `Next` borrows the remaining stages and the transport. Running it consumes
/// it, so a stage forwards a request at most once.
#[derive(Clone)]
pub struct Next<'a> {
    transport: &'a dyn Transport,
    stages: &'a [Arc<dyn Stage>],
}

impl<'a> Next<'a> {
    /// Creates a continuation over `stages` ending in `transport`.
    pub fn new(transport: &'a dyn Transport, stages: &'a [Arc<dyn Stage>]) -> Self {
        Self { transport, stages }
    }

    /// Runs the next stage, or the transport once no stages remain.
    pub fn run(mut self, request: RequestContext) -> BoxFuture<'a, Result<ResponseRecord>> {
        if let Some((current, rest)) = self.stages.split_first() {
            self.stages = rest;
            current.handle(request, self)
        } else {
            self.transport.call(request)
        }
    }

    /// Number of stages still ahead of the transport.
    pub fn remaining(&self) -> usize {
        self.stages.len()
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Next")
            .field(
                "stages",
                &self.stages.iter().map(|stage| stage.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}
