//! Upstream HTTP client
//!
//! One shared client for every provider. A global semaphore bounds the number
//! of in-flight requests; each call has a hard deadline. The client never
//! retries: retry policy belongs to the caller (in practice, the TTL cache
//! serving stale data on failure).

use crate::config::UpstreamConfig;
use crate::rate_limit::RateLimiter;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Upstream fetch failure
///
/// `Clone` so that a single in-flight result can be handed to every waiter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("Upstream timed out after {after_ms}ms")]
    Timeout { after_ms: u64 },

    #[error("Upstream returned HTTP {status}")]
    HttpStatus { status: u16 },

    #[error("Malformed upstream payload: {0}")]
    MalformedPayload(String),

    #[error("Upstream transport error: {0}")]
    Transport(String),
}

impl FetchError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, FetchError::Timeout { .. })
    }
}

/// A remote data provider
#[derive(Debug, Clone)]
pub struct Provider {
    pub name: &'static str,
    pub base_url: String,
    limiter: Option<Arc<RateLimiter>>,
}

impl Provider {
    pub fn new(name: &'static str, base_url: impl Into<String>) -> Self {
        Self {
            name,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: None,
        }
    }

    /// Route every request to this provider through `limiter`
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = Some(limiter);
        self
    }

    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint.trim_start_matches('/'))
    }
}

/// Concurrency-limited upstream client
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    permits: Arc<Semaphore>,
    max_concurrency: usize,
    timeout: Duration,
}

impl UpstreamClient {
    pub fn new(config: &UpstreamConfig) -> Result<Self, FetchError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            permits: Arc::new(Semaphore::new(config.max_concurrency)),
            max_concurrency: config.max_concurrency,
            timeout: config.request_timeout,
        })
    }

    /// Number of requests currently holding a permit
    pub fn in_flight(&self) -> usize {
        self.max_concurrency - self.permits.available_permits()
    }

    /// Fetch `endpoint` from `provider` and decode the JSON body as `T`.
    ///
    /// ## Errors
    /// * `Timeout` - no complete response within the configured deadline
    /// * `HttpStatus` - non-2xx status
    /// * `MalformedPayload` - body is not valid JSON for `T`
    /// * `Transport` - connection-level failure
    pub async fn fetch<T>(
        &self,
        provider: &Provider,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError>
    where
        T: DeserializeOwned,
    {
        let body = self.fetch_text(provider, endpoint, params).await?;
        serde_json::from_str(&body).map_err(|e| FetchError::MalformedPayload(e.to_string()))
    }

    /// Fetch the raw response body.
    pub async fn fetch_text(
        &self,
        provider: &Provider,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<String, FetchError> {
        // Quota waits happen before taking a permit so a throttled provider
        // cannot starve the others.
        if let Some(limiter) = &provider.limiter {
            limiter.acquire().await;
        }

        let _permit = self
            .permits
            .acquire()
            .await
            .map_err(|_| FetchError::Transport("upstream client is shut down".to_string()))?;

        let url = provider.url(endpoint);
        let request = self.http.get(&url).query(params);
        let started = Instant::now();

        let outcome = tokio::time::timeout(self.timeout, async {
            let response = request.send().await.map_err(transport_error)?;
            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::HttpStatus {
                    status: status.as_u16(),
                });
            }
            response.text().await.map_err(transport_error)
        })
        .await;

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match outcome {
            Ok(Ok(body)) => {
                tracing::debug!(
                    provider = provider.name,
                    endpoint,
                    elapsed_ms,
                    bytes = body.len(),
                    "Upstream fetch ok"
                );
                Ok(body)
            }
            Ok(Err(err)) => {
                tracing::debug!(provider = provider.name, endpoint, error = %err, "Upstream fetch failed");
                Err(err)
            }
            Err(_) => {
                tracing::debug!(provider = provider.name, endpoint, elapsed_ms, "Upstream fetch timed out");
                Err(FetchError::Timeout {
                    after_ms: self.timeout.as_millis() as u64,
                })
            }
        }
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout { after_ms: 0 }
    } else if err.is_decode() {
        FetchError::MalformedPayload(err.to_string())
    } else {
        FetchError::Transport(err.to_string())
    }
}
