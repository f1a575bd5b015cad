use async_trait::async_trait;
use http::StatusCode;
use reports_core::{Error, Next, RequestContext, ResponseRecord, Result, Stage};

/// Statuses accepted by [`StatusCheckStage::default`].
///
/// `401`, `403`, `404` and `422` are accepted so callers can map them to
/// their own errors.
pub const DEFAULT_ACCEPTED_STATUSES: [u16; 8] = [200, 201, 204, 302, 401, 403, 404, 422];

/// Fails requests whose response status is not on a whitelist.
///
/// The failure carries the JSON body's `message` field when there is one,
/// otherwise the status' canonical reason.
#[derive(Debug, Clone)]
pub struct StatusCheckStage {
    accepted: Vec<StatusCode>,
}

impl StatusCheckStage {
    /// Accepts exactly the given statuses.
    pub fn new<I>(accepted: I) -> Self
    where
        I: IntoIterator<Item = StatusCode>,
    {
        Self {
            accepted: accepted.into_iter().collect(),
        }
    }

    /// Whether `status` passes the check.
    pub fn accepts(&self, status: StatusCode) -> bool {
        self.accepted.contains(&status)
    }
}

impl Default for StatusCheckStage {
    fn default() -> Self {
        Self::new(
            DEFAULT_ACCEPTED_STATUSES
                .iter()
                .filter_map(|code| StatusCode::from_u16(*code).ok()),
        )
    }
}

fn failure_message(response: &ResponseRecord) -> String {
    let from_body = match response.decoded() {
        Some(decoded) => decoded.get("message").and_then(|m| m.as_str()).map(str::to_owned),
        None => serde_json::from_slice::<serde_json::Value>(response.body())
            .ok()
            .and_then(|value| value.get("message")?.as_str().map(str::to_owned)),
    };
    from_body.unwrap_or_else(|| {
        response
            .status()
            .canonical_reason()
            .unwrap_or("unexpected status")
            .to_owned()
    })
}

#[async_trait]
impl Stage for StatusCheckStage {
    async fn handle(&self, request: RequestContext, next: Next<'_>) -> Result<ResponseRecord> {
        let response = next.run(request).await?;
        if self.accepts(response.status()) {
            Ok(response)
        } else {
            Err(Error::RequestFailure {
                status: response.status(),
                message: failure_message(&response),
            })
        }
    }

    fn name(&self) -> &'static str {
        "status-check"
    }
}
