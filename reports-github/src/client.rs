//! The GitHub resource layer.

use std::sync::Arc;

use http::header::ACCEPT;
use http::{Method, StatusCode};
use reports::Pipeline;
use reports::stages::{
    AuthenticationStage, CacheStage, JsonDecodingStage, LoggingStage, StaticToken,
    StatusCheckStage,
};
use reports_backend::CacheStore;
use reports_core::{RequestContext, ResponseRecord};
use reports_reqwest::ReqwestTransport;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::link;
use crate::models::{Event, Gist, Repository, User};

const GITHUB_JSON: &str = "application/vnd.github+json";

/// Client for the handful of GitHub endpoints reports needs.
///
/// Every call goes through a [`Pipeline`]; see [`GitHubClient::pipeline`]
/// for the stage order.
#[derive(Debug, Clone)]
pub struct GitHubClient {
    api_url: String,
    pipeline: Pipeline,
}

impl GitHubClient {
    /// Builds the client, its cache store and its reqwest transport.
    pub fn new(config: &Config) -> Result<Self> {
        let store = config.cache.clone().into_store()?;
        let transport = ReqwestTransport::builder()
            .user_agent(config.user_agent.clone())
            .timeout(config.timeout)
            .build()?;
        let token = config.token.as_deref().map(StaticToken::new).transpose()?;

        let pipeline = Self::pipeline(store, token).build(transport);
        Ok(Self::with_pipeline(&config.api_url, pipeline))
    }

    /// The standard stage order, outermost first:
    /// `Logging, StatusCheck, JsonDecoding, Cache, Authentication`.
    ///
    /// The cache stage is left out when `store` is `None`.
    pub fn pipeline(
        store: Option<Arc<dyn CacheStore>>,
        token: Option<StaticToken>,
    ) -> reports::PipelineBuilder {
        Pipeline::builder()
            .stage(LoggingStage::default())
            .stage(StatusCheckStage::default())
            .stage(JsonDecodingStage)
            .optional_stage(store.map(CacheStage::from_arc))
            .stage(AuthenticationStage::new(token))
    }

    /// Wraps an already built pipeline.
    pub fn with_pipeline(api_url: &str, pipeline: Pipeline) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_owned(),
            pipeline,
        }
    }

    /// Profile of `username`.
    pub async fn user_info(&self, username: &str) -> Result<User> {
        let response = self.get(&self.url(&format!("/users/{username}"))).await?;
        match response.status() {
            StatusCode::NOT_FOUND => Err(Error::NonexistentUser(username.to_owned())),
            _ => decode(&expect(response, &[StatusCode::OK])?),
        }
    }

    /// Every public repository of `username`, across all pages.
    pub async fn repositories(&self, username: &str) -> Result<Vec<Repository>> {
        self.collect_pages(username, &self.url(&format!("/users/{username}/repos")))
            .await
    }

    /// Recent public events of `username`, across all pages.
    pub async fn activity(&self, username: &str) -> Result<Vec<Event>> {
        self.collect_pages(
            username,
            &self.url(&format!("/users/{username}/events/public")),
        )
        .await
    }

    /// Creates a private gist holding one file and returns it.
    pub async fn create_private_gist(
        &self,
        description: &str,
        filename: &str,
        content: &str,
    ) -> Result<Gist> {
        let payload = serde_json::json!({
            "description": description,
            "public": false,
            "files": { filename: { "content": content } },
        });
        let request = self
            .request(Method::POST, &self.url("/gists"))?
            .with_json(&payload)?;
        let response = self.pipeline.call(request).await?;

        match response.status() {
            StatusCode::CREATED => decode(&response),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::Unauthorized(message(&response)))
            }
            _ => Err(Error::GistCreationFailure(message(&response))),
        }
    }

    /// Whether the authenticated user starred `full_name` (`owner/repo`).
    pub async fn repo_starred(&self, full_name: &str) -> Result<bool> {
        let response = self
            .get(&self.url(&format!("/user/starred/{full_name}")))
            .await?;
        match response.status() {
            StatusCode::NO_CONTENT => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            _ => expect(response, &[]).map(|_| false),
        }
    }

    /// Stars `full_name` for the authenticated user.
    pub async fn star_repo(&self, full_name: &str) -> Result<()> {
        self.starring(Method::PUT, full_name).await
    }

    /// Removes the authenticated user's star from `full_name`.
    pub async fn unstar_repo(&self, full_name: &str) -> Result<()> {
        self.starring(Method::DELETE, full_name).await
    }

    async fn starring(&self, method: Method, full_name: &str) -> Result<()> {
        let request = self.request(method, &self.url(&format!("/user/starred/{full_name}")))?;
        let response = self.pipeline.call(request).await?;
        expect(response, &[StatusCode::NO_CONTENT]).map(|_| ())
    }

    async fn collect_pages<T>(&self, username: &str, first: &str) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut next = Some(first.to_owned());
        while let Some(url) = next {
            let response = self.get(&url).await?;
            if response.status() == StatusCode::NOT_FOUND {
                return Err(Error::NonexistentUser(username.to_owned()));
            }
            let response = expect(response, &[StatusCode::OK])?;
            let page: Vec<T> = decode(&response)?;
            debug!(%url, items = page.len(), "fetched page");
            items.extend(page);
            next = link::next_page(response.headers());
        }
        Ok(items)
    }

    async fn get(&self, url: &str) -> Result<ResponseRecord> {
        let request = self.request(Method::GET, url)?;
        Ok(self.pipeline.call(request).await?)
    }

    fn request(&self, method: Method, url: &str) -> Result<RequestContext> {
        Ok(RequestContext::new(method, url)?.with_header(ACCEPT, GITHUB_JSON)?)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.api_url)
    }
}

/// Passes `response` through when its status is one of `expected`.
fn expect(response: ResponseRecord, expected: &[StatusCode]) -> Result<ResponseRecord> {
    let status = response.status();
    if expected.contains(&status) {
        return Ok(response);
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(Error::Unauthorized(message(&response)))
        }
        _ => Err(Error::UnexpectedResponse {
            status,
            message: message(&response),
        }),
    }
}

fn decode<T: DeserializeOwned>(response: &ResponseRecord) -> Result<T> {
    match response.decoded() {
        Some(value) => Ok(T::deserialize(value)?),
        None => Ok(serde_json::from_slice(response.body())?),
    }
}

fn message(response: &ResponseRecord) -> String {
    response
        .decoded()
        .and_then(|value| value.get("message"))
        .and_then(|message| message.as_str())
        .map(str::to_owned)
        .unwrap_or_else(|| {
            response
                .status()
                .canonical_reason()
                .unwrap_or("unexpected status")
                .to_owned()
        })
}
