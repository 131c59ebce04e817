//! Trusted public-key acquisition and caching.
//!
//! A static key is returned as-is. A remote key is fetched from the
//! configured endpoint and cached in memory; the grace period doubles as
//! the cache TTL. The cache is fail-closed: any fetch failure clears it,
//! so a stale key is never trusted past its TTL and every subsequent
//! verification re-attempts the fetch until one succeeds.

use crate::clock::Clock;
use crate::config::KeySource;
use crate::crypto::verify::decode_public_key;
use crate::SigwardError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// Fetches key material from a remote endpoint.
///
/// The default implementation is [`HttpKeyFetcher`]; embedders with their
/// own transport (or tests) can substitute one.
#[async_trait]
pub trait KeyFetcher: Send + Sync {
    /// Fetch the current key material from `url`.
    ///
    /// The response body is the PEM key verbatim; surrounding whitespace
    /// is tolerated. Non-success statuses are errors.
    async fn fetch_key(&self, url: &str) -> Result<String, SigwardError>;
}

/// Reqwest-backed [`KeyFetcher`] with a 30 second timeout.
pub struct HttpKeyFetcher {
    client: reqwest::Client,
}

impl HttpKeyFetcher {
    /// Build the default HTTP fetcher.
    pub fn new() -> Result<Self, SigwardError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| SigwardError::Transport(format!("Failed to create client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl KeyFetcher for HttpKeyFetcher {
    async fn fetch_key(&self, url: &str) -> Result<String, SigwardError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SigwardError::Transport(format!("Key fetch failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SigwardError::Transport(format!(
                "Key endpoint returned status {}",
                status.as_u16()
            )));
        }

        response
            .text()
            .await
            .map_err(|e| SigwardError::Transport(format!("Failed to read key body: {}", e)))
    }
}

/// The cached key material plus the instant of its last successful fetch.
///
/// Replaced wholesale on every successful fetch, cleared on any failure;
/// never partially updated.
#[derive(Debug, Clone)]
struct CachedKey {
    material: String,
    fetched_at: DateTime<Utc>,
}

/// Supplies the currently trusted public key.
pub struct KeyProvider {
    source: KeySource,
    grace: Duration,
    clock: Arc<dyn Clock>,
    fetcher: Box<dyn KeyFetcher>,
    cache: RwLock<Option<CachedKey>>,
}

impl KeyProvider {
    /// Create a provider for the given source.
    ///
    /// The cache starts empty; for a static source it is never consulted.
    pub fn new(
        source: KeySource,
        grace: Duration,
        clock: Arc<dyn Clock>,
        fetcher: Box<dyn KeyFetcher>,
    ) -> Self {
        Self {
            source,
            grace,
            clock,
            fetcher,
            cache: RwLock::new(None),
        }
    }

    /// Return the trusted key PEM, or `KeyUnavailable` when it cannot be
    /// obtained.
    ///
    /// A cached key younger than the grace period is reused without a
    /// network call. The cache lock is never held across the fetch, so
    /// concurrent refreshes race last-writer-wins; fetching the same key
    /// twice is idempotent and the redundant request is accepted.
    pub async fn current_key(&self) -> Result<String, SigwardError> {
        let url = match &self.source {
            KeySource::Static(pem) => return Ok(pem.clone()),
            KeySource::Endpoint(url) => url.clone(),
        };

        let now = self.clock.now_utc();
        {
            let guard = self.cache.read().await;
            if let Some(cached) = guard.as_ref() {
                let age = now.signed_duration_since(cached.fetched_at);
                if age.num_milliseconds() <= self.grace.as_millis() as i64 {
                    debug!(fingerprint = %fingerprint(&cached.material), "key cache hit");
                    return Ok(cached.material.clone());
                }
            }
        }

        match self.fetcher.fetch_key(&url).await {
            Ok(material) => {
                // An endpoint body that is not a parseable key counts as a
                // failed fetch, not a trusted key.
                if let Err(e) = decode_public_key(&material) {
                    self.invalidate().await;
                    warn!(error = %e, "key endpoint returned unparseable key material");
                    return Err(SigwardError::KeyUnavailable(e.to_string()));
                }

                debug!(fingerprint = %fingerprint(&material), "key cache refreshed");
                let mut guard = self.cache.write().await;
                *guard = Some(CachedKey {
                    material: material.clone(),
                    fetched_at: now,
                });
                Ok(material)
            }
            Err(e) => {
                self.invalidate().await;
                warn!(error = %e, "key fetch failed, cache cleared");
                Err(SigwardError::KeyUnavailable(e.to_string()))
            }
        }
    }

    /// Clear the cache (fail-closed on fetch failure).
    async fn invalidate(&self) {
        let mut guard = self.cache.write().await;
        *guard = None;
    }

    /// Whether a key is currently cached (test observability).
    #[cfg(any(test, feature = "test-seams"))]
    pub async fn has_cached_key(&self) -> bool {
        self.cache.read().await.is_some()
    }
}

/// Short hex fingerprint of key material for log lines.
fn fingerprint(material: &str) -> String {
    let hash = Sha256::digest(material.trim().as_bytes());
    hex::encode(&hash[..8])
}
