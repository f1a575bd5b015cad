//! Redis store implementation.

use async_trait::async_trait;
use bytes::Bytes;
use redis::{AsyncCommands, Client, aio::ConnectionManager};
use reports_backend::{BackendError, BackendResult, CacheStore, CachedResponse, Format, JsonFormat};
use reports_core::{CacheKey, ResponseRecord};
use tokio::sync::OnceCell;
use tracing::trace;

use crate::error::Error;

/// Redis cache store based on the redis-rs crate.
///
/// Uses a [`ConnectionManager`] created on first use, so building the store
/// never touches the network.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisStore<S = JsonFormat>
where
    S: Format,
{
    client: Client,
    connection: OnceCell<ConnectionManager>,
    serializer: S,
    prefix: Option<String>,
    label: String,
}

impl<S: Format> std::fmt::Debug for RedisStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisStore")
            .field("serializer", &self.serializer)
            .field("prefix", &self.prefix)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl RedisStore<JsonFormat> {
    /// Creates a store for `redis://127.0.0.1/` with default settings.
    pub fn new() -> Result<Self, Error> {
        Self::builder().build()
    }

    /// Creates a new builder with default settings.
    #[must_use]
    pub fn builder() -> RedisStoreBuilder<JsonFormat> {
        RedisStoreBuilder::default()
    }
}

impl<S> RedisStore<S>
where
    S: Format,
{
    /// Lazily connects to Redis through a [`ConnectionManager`].
    pub async fn connection(&self) -> Result<&ConnectionManager, BackendError> {
        let manager = self
            .connection
            .get_or_try_init(|| {
                trace!("Initialize new redis connection manager");
                self.client.get_connection_manager()
            })
            .await
            .map_err(Error::from)?;
        Ok(manager)
    }

    /// The Redis key an entry is stored under.
    pub fn redis_key(&self, key: &CacheKey) -> String {
        match &self.prefix {
            Some(prefix) => format!("{prefix}:{key}"),
            None => key.to_string(),
        }
    }
}

/// Builder for [`RedisStore`].
pub struct RedisStoreBuilder<S = JsonFormat>
where
    S: Format,
{
    connection_info: String,
    serializer: S,
    prefix: Option<String>,
    label: String,
}

impl Default for RedisStoreBuilder<JsonFormat> {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
            serializer: JsonFormat,
            prefix: None,
            label: "redis".to_owned(),
        }
    }
}

impl<S> RedisStoreBuilder<S>
where
    S: Format,
{
    /// Sets connection info (host, port, database, etc.).
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Namespaces every key as `{prefix}:{url}`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Sets the value serialization format.
    pub fn value_format<NewS>(self, serializer: NewS) -> RedisStoreBuilder<NewS>
    where
        NewS: Format,
    {
        RedisStoreBuilder {
            connection_info: self.connection_info,
            serializer,
            prefix: self.prefix,
            label: self.label,
        }
    }

    /// Sets the label used in logs and metrics. Defaults to `"redis"`.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Creates the store. Fails only when the connection info is malformed.
    pub fn build(self) -> Result<RedisStore<S>, Error> {
        Ok(RedisStore {
            client: Client::open(self.connection_info)?,
            connection: OnceCell::new(),
            serializer: self.serializer,
            prefix: self.prefix,
            label: self.label,
        })
    }
}

#[async_trait]
impl<S> CacheStore for RedisStore<S>
where
    S: Format,
{
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<ResponseRecord>> {
        let mut con = self.connection().await?.clone();
        let redis_key = self.redis_key(key);

        let data: Option<Vec<u8>> = con.get(&redis_key).await.map_err(Error::from)?;
        trace!(key = %redis_key, found = data.is_some(), "redis read");

        match data {
            Some(data) => {
                let cached = self.serializer.deserialize(&data)?;
                Ok(Some(ResponseRecord::from(cached)))
            }
            None => Ok(None),
        }
    }

    async fn write(&self, key: &CacheKey, record: &ResponseRecord) -> BackendResult<()> {
        let mut con = self.connection().await?.clone();
        let redis_key = self.redis_key(key);
        let data: Bytes = self.serializer.serialize(&CachedResponse::from(record))?;

        con.set::<_, _, ()>(&redis_key, data.as_ref())
            .await
            .map_err(Error::from)?;
        trace!(key = %redis_key, "redis write");
        Ok(())
    }

    fn label(&self) -> &str {
        &self.label
    }
}
