use async_trait::async_trait;
use reports_core::{Next, RequestContext, ResponseRecord, Result, Stage};
use tracing::trace;

/// Parses JSON response bodies into the record's decoded body.
///
/// Applies when `Content-Type` is `application/json` (or `+json`) and the body
/// is not empty. The raw body is kept so the record can still be stored.
/// A malformed body fails the request with [`Error::Decode`].
///
/// [`Error::Decode`]: reports_core::Error::Decode
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonDecodingStage;

#[async_trait]
impl Stage for JsonDecodingStage {
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        let mut response = next.run(request).await?;
        if response.is_json() && !response.body().is_empty() {
            let value = serde_json::from_slice(response.body())?;
            trace!(bytes = response.body().len(), "decoded json body");
            response.set_decoded(value);
        }
        Ok(response)
    }

    fn name(&self) -> &'static str {
        "json-decoding"
    }
}
