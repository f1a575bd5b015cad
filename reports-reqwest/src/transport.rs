use std::time::Duration;

use async_trait::async_trait;
use reports_core::{Error, RequestContext, ResponseRecord, Result, Transport};
use tracing::trace;

/// Transport performing requests with a [`reqwest::Client`].
///
/// Cloning is cheap; clones share the client's connection pool.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Transport over a default client.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transport over an existing client.
    pub fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Creates a builder for a transport with its own client.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// The underlying client.
    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Builder for [`ReqwestTransport`].
#[derive(Debug, Default)]
pub struct ReqwestTransportBuilder {
    user_agent: Option<String>,
    timeout: Option<Duration>,
    client: Option<reqwest::Client>,
}

impl ReqwestTransportBuilder {
    /// `User-Agent` sent with every request. Ignored with [`client`](Self::client).
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Total timeout of one request. Ignored with [`client`](Self::client).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Uses a preconfigured client instead of building one.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Builds the transport. Fails when reqwest cannot create the client.
    pub fn build(self) -> Result<ReqwestTransport> {
        if let Some(client) = self.client {
            return Ok(ReqwestTransport::from_client(client));
        }
        let mut builder = reqwest::Client::builder();
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::transport)?;
        Ok(ReqwestTransport::from_client(client))
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn call(&self, request: RequestContext) -> Result<ResponseRecord> {
        let (method, url, headers, body) = request.into_parts();
        trace!(%method, %url, "sending request");

        let mut builder = self
            .client
            .request(method, url.to_string())
            .headers(headers);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(Error::transport)?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(Error::transport)?;
        trace!(%status, bytes = body.len(), "received response");

        Ok(ResponseRecord::from_parts(status, headers, body))
    }
}
