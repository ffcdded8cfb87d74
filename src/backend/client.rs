//! Resilient HTTP client for the upstream employee service.
//!
//! Every call goes through the same loop: send, classify the failure, ask the
//! [`RetryPolicy`] whether to back off and try again. Rate-limited reads fall
//! back to the [`ResponseCache`] once retries run out; mutations clear the
//! cache before they start and never fall back.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use super::model::{DeleteByName, EmployeeCollection, EmployeeRecord, Envelope, NewEmployee};
use super::EmployeeBackend;
use crate::cache::ResponseCache;
use crate::config::BackendConfig;
use crate::error::{AttemptFailure, FailureKind, UpstreamError, UpstreamResult};
use crate::retry::{RetryDecision, RetryPolicy};

/// Client for the upstream employee service.
///
/// The response cache is owned by whoever constructs the client, so several
/// clients (or a test) can share or inspect it.
pub struct BackendClient {
    /// HTTP client for upstream requests
    http: Client,
    /// Address of the employee collection, e.g. `http://localhost:8112/api/v1/employee`
    base_url: Url,
    policy: RetryPolicy,
    cache: Arc<dyn ResponseCache>,
}

impl BackendClient {
    /// Create a client for the collection at `base_url`.
    pub fn new(
        base_url: &str,
        policy: RetryPolicy,
        cache: Arc<dyn ResponseCache>,
    ) -> UpstreamResult<Self> {
        Self::build(base_url, policy, cache, None)
    }

    /// Create a client from loaded configuration.
    pub fn from_config(
        config: &BackendConfig,
        cache: Arc<dyn ResponseCache>,
    ) -> UpstreamResult<Self> {
        Self::build(
            &config.url,
            config.retry_policy(),
            cache,
            Some(config.request_timeout()),
        )
    }

    fn build(
        base_url: &str,
        policy: RetryPolicy,
        cache: Arc<dyn ResponseCache>,
        timeout: Option<Duration>,
    ) -> UpstreamResult<Self> {
        let base_url = parse_base_url(base_url)?;

        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            UpstreamError::with_source(FailureKind::Unexpected, "failed to create HTTP client", e)
        })?;

        Ok(Self {
            http,
            base_url,
            policy,
            cache,
        })
    }

    /// The retry policy applied to every call.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// The cache this client populates and invalidates.
    pub fn cache(&self) -> &Arc<dyn ResponseCache> {
        &self.cache
    }

    fn employee_url(&self, id: &str) -> Url {
        let mut url = self.base_url.clone();
        // parse_base_url only accepts http(s) URLs, which always have path segments
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id);
        }
        url
    }

    /// Clear the cache ahead of a mutation, whatever its outcome.
    fn invalidate(&self, operation: &'static str) {
        self.cache.clear();
        debug!(operation, "Cleared employee cache before mutation");
    }

    /// Issue one request and decode the JSON body.
    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, AttemptFailure> {
        let response = request.send().await.map_err(AttemptFailure::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AttemptFailure::Status { status, body });
        }

        response.json::<T>().await.map_err(AttemptFailure::Decode)
    }

    /// Run `send` until it succeeds, fails with a non-retryable error, or the
    /// retry budget is spent. Retries are sequential.
    async fn with_retry<T, F, Fut>(&self, operation: &'static str, mut send: F) -> UpstreamResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptFailure>>,
    {
        let mut retries = 0;
        let mut waited = Duration::ZERO;
        loop {
            let failure = match send().await {
                Ok(value) => {
                    debug!(operation, retries, "Upstream request completed");
                    return Ok(value);
                }
                Err(failure) => failure,
            };

            match self.policy.decide(retries, failure.kind()) {
                RetryDecision::Retry { attempt, delay } => {
                    info!(
                        operation,
                        attempt,
                        delay_ms = as_millis(delay),
                        "Retrying due to rate limiting"
                    );
                    retries = attempt;
                    waited = waited.saturating_add(delay);
                    tokio::time::sleep(delay).await;
                }
                RetryDecision::Exhausted => {
                    warn!(
                        operation,
                        retries,
                        waited_ms = as_millis(waited),
                        "Retries exhausted on rate-limited upstream"
                    );
                    return Err(failure.into_exhausted());
                }
                RetryDecision::GiveUp => return Err(failure.into_upstream_error()),
            }
        }
    }
}

fn as_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

fn parse_base_url(raw: &str) -> UpstreamResult<Url> {
    let url = Url::parse(raw).map_err(|e| {
        UpstreamError::with_source(
            FailureKind::Unexpected,
            format!("invalid upstream URL {raw:?}"),
            e,
        )
    })?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(UpstreamError::new(
            FailureKind::Unexpected,
            format!("upstream URL must be http or https, got {raw:?}"),
        ));
    }
    Ok(url)
}

#[async_trait]
impl EmployeeBackend for BackendClient {
    async fn list_all(&self) -> UpstreamResult<EmployeeCollection> {
        let url = self.base_url.clone();
        let result = self
            .with_retry("list_all", || {
                Self::send::<Envelope<EmployeeCollection>>(self.http.get(url.clone()))
            })
            .await;

        match result {
            Ok(envelope) => {
                let employees = envelope.data;
                self.cache.write(employees.clone());
                info!(count = employees.len(), "Updated employee cache");
                Ok(employees)
            }
            Err(err) if err.is_rate_limited() => match self.cache.read() {
                Some(snapshot) => {
                    info!(
                        count = snapshot.len(),
                        "Rate limited, serving cached employee listing"
                    );
                    Ok(snapshot.as_ref().clone())
                }
                None => Err(err),
            },
            Err(err) => Err(err),
        }
    }

    async fn find_by_id(&self, id: &str) -> UpstreamResult<Option<EmployeeRecord>> {
        let url = self.employee_url(id);
        let result = self
            .with_retry("find_by_id", || {
                Self::send::<Envelope<Option<EmployeeRecord>>>(self.http.get(url.clone()))
            })
            .await;

        match result {
            Ok(envelope) => Ok(envelope.data),
            Err(err) => match err.kind() {
                FailureKind::NotFound => {
                    debug!(id, "Upstream has no employee with this id");
                    Ok(None)
                }
                FailureKind::RateLimited => match self.cache.read() {
                    Some(snapshot) => {
                        debug!(id, "Rate limited, checking cache for employee");
                        Ok(snapshot.iter().find(|employee| employee.id == id).cloned())
                    }
                    None => Err(err),
                },
                FailureKind::Malformed | FailureKind::Unexpected => Err(err),
            },
        }
    }

    async fn create(&self, input: &NewEmployee) -> UpstreamResult<EmployeeRecord> {
        self.invalidate("create");

        let url = self.base_url.clone();
        let envelope = self
            .with_retry("create", || {
                Self::send::<Envelope<EmployeeRecord>>(self.http.post(url.clone()).json(input))
            })
            .await?;

        info!(id = %envelope.data.id, name = %envelope.data.name, "Created employee");
        Ok(envelope.data)
    }

    async fn delete(&self, name: &str) -> UpstreamResult<bool> {
        self.invalidate("delete");

        let url = self.base_url.clone();
        let body = DeleteByName {
            name: name.to_string(),
        };
        let envelope = self
            .with_retry("delete", || {
                Self::send::<Envelope<bool>>(self.http.delete(url.clone()).json(&body))
            })
            .await?;

        debug!(name, deleted = envelope.data, "Delete request completed");
        Ok(envelope.data)
    }
}
