//! Shared HTTP client and request plumbing for Katello endpoints.

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{ApiError, ApiResult};

/// Default server location used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://localhost/katello/";
/// Header carrying the per-invocation trace identifier.
pub const HEADER_REQUEST_ID: &str = "x-request-id";

/// Basic-auth credentials for the Katello server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account login.
    pub username: String,
    /// Account password.
    pub password: String,
}

/// Client for the Katello REST API rooted at a base URL.
#[derive(Debug, Clone)]
pub struct KatelloClient {
    http: Client,
    base_url: Url,
    credentials: Option<Credentials>,
}

impl KatelloClient {
    /// Wrap a configured HTTP client.
    #[must_use]
    pub const fn new(http: Client, base_url: Url, credentials: Option<Credentials>) -> Self {
        Self {
            http,
            base_url,
            credentials,
        }
    }

    fn url(&self, segments: &[&str]) -> ApiResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidBaseUrl {
                base: self.base_url.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ApiResult<RequestBuilder> {
        let mut url = self.url(segments)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        tracing::debug!(method = %method, url = %url, "katello request");
        let builder = self.http.request(method, url);
        Ok(match &self.credentials {
            Some(creds) => builder.basic_auth(&creds.username, Some(&creds.password)),
            None => builder,
        })
    }

    async fn execute(&self, builder: RequestBuilder, path: &str) -> ApiResult<Response> {
        let response = builder.send().await.map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })?;
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(classify_failure(path, response).await)
        }
    }

    /// GET a record or list and decode it.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let path = segments.join("/");
        let builder = self.request(Method::GET, segments, query)?;
        let response = self.execute(builder, &path).await?;
        decode(&path, response).await
    }

    /// GET a record or list, mapping a 404 to `None`.
    pub(crate) async fn get_optional<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> ApiResult<Option<T>> {
        match self.get_json(segments, query).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.status() == Some(StatusCode::NOT_FOUND) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Send a request with an optional JSON body and decode the response.
    pub(crate) async fn send_json<B, T>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let path = segments.join("/");
        let mut builder = self.request(method, segments, &[])?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(builder, &path).await?;
        decode(&path, response).await
    }

    /// Send a request whose response is a human-readable confirmation.
    pub(crate) async fn send_message<B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
    ) -> ApiResult<String>
    where
        B: Serialize + ?Sized,
    {
        let path = segments.join("/");
        let mut builder = self.request(method, segments, &[])?;
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = self.execute(builder, &path).await?;
        let bytes = read_body(&path, response).await?;
        Ok(message_from_body(&bytes))
    }
}

async fn read_body(path: &str, response: Response) -> ApiResult<Vec<u8>> {
    response
        .bytes()
        .await
        .map(|bytes| bytes.to_vec())
        .map_err(|source| ApiError::Transport {
            path: path.to_string(),
            source,
        })
}

async fn decode<T: DeserializeOwned>(path: &str, response: Response) -> ApiResult<T> {
    let bytes = read_body(path, response).await?;
    serde_json::from_slice(&bytes).map_err(|source| ApiError::Decode {
        path: path.to_string(),
        source,
    })
}

/// Text of a confirmation body, which Katello sends either as a JSON string or raw text.
pub(crate) fn message_from_body(bytes: &[u8]) -> String {
    serde_json::from_slice::<String>(bytes)
        .unwrap_or_else(|_| String::from_utf8_lossy(bytes).trim().to_string())
}

async fn classify_failure(path: &str, response: Response) -> ApiError {
    let status = response.status();
    let bytes = response.bytes().await.unwrap_or_default();
    let message = error_message(&bytes).unwrap_or_else(|| {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    });
    tracing::debug!(path, status = %status, message = %message, "katello request rejected");
    ApiError::Status {
        path: path.to_string(),
        status,
        message,
    }
}

/// Extract the message from a Katello error body (`displayMessage`, then `errors`).
fn error_message(bytes: &[u8]) -> Option<String> {
    if let Ok(body) = serde_json::from_slice::<Value>(bytes) {
        if let Some(message) = body.get("displayMessage").and_then(Value::as_str) {
            return Some(message.to_string());
        }
        if let Some(errors) = body.get("errors").and_then(Value::as_array) {
            let joined = errors
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join("; ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }
    }
    let text = String::from_utf8_lossy(bytes).trim().to_string();
    (!text.is_empty()).then_some(text)
}
