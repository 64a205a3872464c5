use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use tudu_core::{AppError, AppResult};
use url::Url;

/// Header carrying the total size of a paged collection.
pub const TOTAL_COUNT_HEADER: &str = "x-total-count";

/// Shared HTTP plumbing for the backend's `/api` resources.
#[derive(Debug, Clone)]
pub struct RestClient {
    http_client: Client,
    base_url: Url,
    api_token: Option<String>,
}

impl RestClient {
    /// Creates a client for a backend base URL such as `http://127.0.0.1:8080`.
    pub fn new(base_url: &str, api_token: Option<String>, timeout: Duration) -> AppResult<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/')).map_err(|error| {
            AppError::Validation(format!("invalid backend base url '{base_url}': {error}"))
        })?;
        if base_url.cannot_be_a_base() {
            return Err(AppError::Validation(format!(
                "backend base url '{base_url}' cannot carry paths"
            )));
        }

        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|error| AppError::Internal(format!("failed to build HTTP client: {error}")))?;

        Ok(Self {
            http_client,
            base_url,
            api_token: api_token.filter(|token| !token.trim().is_empty()),
        })
    }

    /// Returns `<base>/api/<segments...>` with the given query pairs.
    pub fn api_url(&self, segments: &[&str], query: &[(&str, String)]) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut path = url.path_segments_mut().map_err(|_| {
                AppError::Internal(format!("backend base url '{}' cannot carry paths", self.base_url))
            })?;
            path.pop_if_empty().push("api");
            path.extend(segments);
        }

        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Starts a request with authentication applied.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let builder = self.http_client.request(method, url);
        match &self.api_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// Sends a request and turns non-success statuses into application errors.
    pub async fn send(&self, builder: RequestBuilder, action: &str) -> AppResult<Response> {
        let response = builder
            .send()
            .await
            .map_err(|error| AppError::Transport(format!("failed to {action}: {error}")))?;

        let status = response.status();
        debug!(action, status = status.as_u16(), "backend responded");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(error_from_response(status, body.as_str(), action))
    }

    /// Sends a request and decodes the JSON body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        action: &str,
    ) -> AppResult<(HeaderMap, T)> {
        let response = self.send(builder, action).await?;
        let headers = response.headers().clone();
        let body = response.json::<T>().await.map_err(|error| {
            AppError::Internal(format!("failed to parse response body of {action}: {error}"))
        })?;
        Ok((headers, body))
    }
}

/// Reads the total count header, if present and numeric.
#[must_use]
pub fn total_count(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(TOTAL_COUNT_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}

/// Maps a failed response onto the application error taxonomy.
#[must_use]
pub fn error_from_response(status: StatusCode, body: &str, action: &str) -> AppError {
    let detail = problem_detail(body)
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_owned())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_owned()
        });
    let message = format!("{action}: {detail}");

    match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => AppError::Validation(message),
        StatusCode::UNAUTHORIZED => AppError::Unauthorized(message),
        StatusCode::FORBIDDEN => AppError::Forbidden(message),
        StatusCode::NOT_FOUND => AppError::NotFound(message),
        StatusCode::CONFLICT => AppError::Conflict(message),
        _ => AppError::Server {
            status: status.as_u16(),
            message,
        },
    }
}

fn problem_detail(body: &str) -> Option<String> {
    let value = serde_json::from_str::<Value>(body).ok()?;
    ["detail", "title", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .map(str::to_owned)
}
