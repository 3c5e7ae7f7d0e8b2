//! HTTP adapter for the upstream content endpoint.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{
    Client, Url,
    header::{ACCEPT, CACHE_CONTROL},
};
use serde_json::Value;
use tracing::debug;

use crate::{
    application::content::{FetchError, PostSource},
    domain::posts::Post,
};

use super::error::InfraError;

const CACHE_BUSTING_DIRECTIVES: &str = "no-cache, no-store, must-revalidate";
const ERROR_BODY_EXCERPT_CHARS: usize = 256;

#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    pub endpoint: Url,
    pub request_timeout: Duration,
    /// Ask intermediaries not to serve a cached copy of the collection.
    pub cache_busting: bool,
}

impl From<&crate::config::ContentSettings> for HttpSourceConfig {
    fn from(settings: &crate::config::ContentSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            request_timeout: settings.request_timeout,
            cache_busting: settings.cache_busting,
        }
    }
}

/// Fetches the post collection with a single `GET` of the configured endpoint.
#[derive(Clone, Debug)]
pub struct HttpPostSource {
    client: Client,
    endpoint: Url,
    cache_busting: bool,
}

impl HttpPostSource {
    pub fn new(config: HttpSourceConfig) -> Result<Self, InfraError> {
        let client = Client::builder()
            .user_agent(Self::user_agent())
            .timeout(config.request_timeout)
            .build()
            .map_err(InfraError::http_client)?;

        Ok(Self {
            client,
            endpoint: config.endpoint,
            cache_busting: config.cache_busting,
        })
    }

    pub fn user_agent() -> &'static str {
        concat!("quillpost/", env!("CARGO_PKG_VERSION"))
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PostSource for HttpPostSource {
    async fn fetch(&self) -> Result<Vec<Post>, FetchError> {
        debug!(
            target = "quillpost::infra::upstream",
            endpoint = %self.endpoint,
            "fetching post collection"
        );

        let mut request = self
            .client
            .get(self.endpoint.clone())
            .header(ACCEPT, "application/json");
        if self.cache_busting {
            request = request.header(CACHE_CONTROL, CACHE_BUSTING_DIRECTIVES);
        }

        let response = request.send().await.map_err(FetchError::transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(FetchError::transport)?;

        debug!(
            target = "quillpost::infra::upstream",
            status = status.as_u16(),
            bytes = bytes.len(),
            "upstream responded"
        );

        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: excerpt(&bytes),
            });
        }

        decode_posts(&bytes)
    }
}

/// Decode an upstream body. Anything other than a JSON list of posts is an error.
pub fn decode_posts(bytes: &[u8]) -> Result<Vec<Post>, FetchError> {
    let value: Value = serde_json::from_slice(bytes).map_err(FetchError::malformed)?;
    if !value.is_array() {
        return Err(FetchError::NotAList {
            found: json_kind(&value),
        });
    }
    serde_json::from_value(value).map_err(FetchError::shape)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn excerpt(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .take(ERROR_BODY_EXCERPT_CHARS)
        .collect()
}
