//! Explorer Activity Oracle Adapter
//!
//! Implements `ActivityOracle` over the explorer's `POST /addresses/used`
//! endpoint: JSON array of addresses in, JSON array of booleans out.

use async_trait::async_trait;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::{Client, StatusCode, Url};
use std::num::NonZeroU32;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::ExplorerConfig;
use crate::domain::{invariant_aligned_results, AddressHash, DiscoveryError};
use crate::ports::ActivityOracle;

/// Path of the activity endpoint, relative to the explorer base URL.
const ADDRESSES_USED_PATH: &str = "addresses/used";

/// Failure of a single HTTP attempt.
#[derive(Debug)]
enum AttemptError {
    /// Worth retrying (transport, 429, 5xx).
    Transient(String),
    /// Retrying cannot help (other 4xx, malformed body).
    Fatal(DiscoveryError),
}

/// HTTP-based activity oracle backed by the block explorer.
///
/// Requests are throttled client-side and transient failures are retried
/// with exponential backoff. The discovery core never retries on its own.
pub struct ExplorerActivityOracle {
    /// HTTP client with the configured timeout.
    http_client: Client,
    /// Full URL of the activity endpoint.
    endpoint: Url,
    /// Client-side request throttle.
    limiter: DefaultDirectRateLimiter,
    /// Configuration.
    config: ExplorerConfig,
}

impl ExplorerActivityOracle {
    /// Create an oracle for the explorer at `config.base_url`.
    pub fn new(config: ExplorerConfig) -> Result<Self, DiscoveryError> {
        let http_client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| DiscoveryError::InvalidConfig(format!("HTTP client: {}", e)))?;

        Self::with_client(http_client, config)
    }

    /// Create an oracle with an existing HTTP client.
    pub fn with_client(
        http_client: Client,
        config: ExplorerConfig,
    ) -> Result<Self, DiscoveryError> {
        let base = format!("{}/", config.base_url.trim_end_matches('/'));
        let endpoint = Url::parse(&base)
            .and_then(|base| base.join(ADDRESSES_USED_PATH))
            .map_err(|e| {
                DiscoveryError::InvalidConfig(format!("explorer URL {}: {}", config.base_url, e))
            })?;

        let rate = NonZeroU32::new(config.requests_per_second).unwrap_or(NonZeroU32::MIN);
        let limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            http_client,
            endpoint,
            limiter,
            config,
        })
    }

    /// Full URL of the activity endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Delay before retry number `attempt` (1-based).
    fn backoff(&self, attempt: u32) -> Duration {
        let factor = 1u64 << (attempt - 1).min(16);
        Duration::from_millis(self.config.retry_backoff_ms.saturating_mul(factor))
    }

    /// One throttled HTTP round-trip.
    async fn post_once(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, AttemptError> {
        self.limiter.until_ready().await;

        let response = self
            .http_client
            .post(self.endpoint.clone())
            .json(addresses)
            .send()
            .await
            .map_err(|e| AttemptError::Transient(format!("HTTP error: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let message = format!("explorer returned HTTP {}", status.as_u16());
            return if status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error() {
                Err(AttemptError::Transient(message))
            } else {
                Err(AttemptError::Fatal(DiscoveryError::OracleRequestFailed(message)))
            };
        }

        let results: Vec<bool> = response
            .json()
            .await
            .map_err(|e| {
                AttemptError::Fatal(DiscoveryError::OracleRequestFailed(format!(
                    "malformed response body: {}",
                    e
                )))
            })?;

        invariant_aligned_results(addresses.len(), results.len()).map_err(AttemptError::Fatal)?;

        Ok(results)
    }
}

#[async_trait]
impl ActivityOracle for ExplorerActivityOracle {
    async fn addresses_used(&self, addresses: &[AddressHash]) -> Result<Vec<bool>, DiscoveryError> {
        debug!(
            "[discovery] POST {} with {} addresses",
            self.endpoint,
            addresses.len()
        );

        let mut attempt = 0;
        loop {
            match self.post_once(addresses).await {
                Ok(results) => return Ok(results),
                Err(AttemptError::Fatal(e)) => return Err(e),
                Err(AttemptError::Transient(reason)) => {
                    if attempt >= self.config.max_retries {
                        return Err(DiscoveryError::OracleRequestFailed(format!(
                            "{} (after {} attempts)",
                            reason,
                            attempt + 1
                        )));
                    }
                    attempt += 1;
                    let delay = self.backoff(attempt);
                    warn!(
                        "[discovery] Explorer request failed ({}), retry {}/{} in {:?}",
                        reason, attempt, self.config.max_retries, delay
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }

    fn oracle_id(&self) -> &str {
        &self.config.base_url
    }
}
