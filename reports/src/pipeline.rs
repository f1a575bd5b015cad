use std::sync::Arc;

use async_trait::async_trait;
use reports_core::{Next, RequestContext, ResponseRecord, Result, Stage, Transport};

/// An ordered list of stages wrapped around a transport.
///
/// For stages `[S1, .., Sn]` and transport `T` a call behaves like
/// `S1(S2(..Sn(T)))`: requests travel `S1..Sn` then `T`, responses travel
/// back `Sn..S1`. The order is fixed once the pipeline is built.
///
/// A pipeline is itself a [`Transport`], so pipelines nest.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Stage>]>,
    transport: Arc<dyn Transport>,
}

impl Pipeline {
    /// Creates a new builder with no stages.
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Runs `request` through every stage and the transport.
    pub async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        Next::new(self.transport.as_ref(), &self.stages)
            .run(request)
            .await
    }

    /// Names of the stages, outermost first.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|stage| stage.name()).collect()
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("stages", &self.stage_names())
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl Transport for Pipeline {
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        Pipeline::call(self, request).await
    }
}

/// Builder for [`Pipeline`]. Stages are added outermost first.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl PipelineBuilder {
    /// Appends a stage inside the ones added so far.
    pub fn stage<S>(mut self, stage: S) -> Self
    where
        S: Stage,
    {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Appends a shared stage.
    pub fn stage_arc(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Appends a stage only when `stage` is `Some`.
    pub fn optional_stage<S>(self, stage: Option<S>) -> Self
    where
        S: Stage,
    {
        match stage {
            Some(stage) => self.stage(stage),
            None => self,
        }
    }

    /// Number of stages added so far.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether no stage was added yet.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Finishes the pipeline with its terminal transport.
    pub fn build<T>(self, transport: T) -> Pipeline
    where
        T: Transport + 'static,
    {
        Pipeline {
            stages: self.stages.into(),
            transport: Arc::new(transport),
        }
    }
}
