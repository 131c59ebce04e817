//! Request verifier - the main public API.
//!
//! [`RequestVerifier`] sequences the verification gates in strict order,
//! short-circuits on the first failure, writes a structured JSON denial to
//! the response, and returns a boolean verdict:
//!
//! 1. Bypass check
//! 2. Key acquisition
//! 3. Required-header presence and shape
//! 4. Canonicalization + hashing
//! 5. Freshness
//! 6. Hash match
//! 7. Signature verification

use crate::canonical::canonical_string;
use crate::clock::{Clock, SystemClock};
use crate::config::{KeySource, VerifierConfig};
use crate::crypto::digest::sha256_b64;
use crate::crypto::freshness::{is_fresh, parse_time_header};
use crate::crypto::verify::{decode_public_key, verify_rsa_sha256};
use crate::errors::{Denial, DenialKind};
use crate::http::{IncomingRequest, ResponseSink};
use crate::provider::{HttpKeyFetcher, KeyFetcher, KeyProvider};
use crate::SigwardError;
use base64::{engine::general_purpose::STANDARD, Engine};
use std::sync::Arc;
use tracing::{debug, warn};

/// Response header disclosing that verification was bypassed.
const BYPASS_HEADER: &str = "x-signature-verification";

/// Verifies that requests were signed by the trusted gateway.
///
/// Create one instance at startup and reuse it for every request; the
/// key cache is shared process-wide through it. Verification calls are
/// independent and may run concurrently.
pub struct RequestVerifier {
    config: VerifierConfig,
    clock: Arc<dyn Clock>,
    keys: KeyProvider,
}

impl RequestVerifier {
    /// Create a verifier with the given configuration.
    ///
    /// Fails fast on invalid configuration, including a static key that
    /// is not parseable PEM.
    pub fn new(config: VerifierConfig) -> Result<Self, SigwardError> {
        let fetcher = Box::new(HttpKeyFetcher::new()?);
        Self::with_parts(config, Arc::new(SystemClock), fetcher)
    }

    /// Create a verifier with a custom clock and key fetcher (for tests).
    #[cfg(any(test, feature = "test-seams"))]
    pub fn with_clock_and_fetcher(
        config: VerifierConfig,
        clock: Arc<dyn Clock>,
        fetcher: Box<dyn KeyFetcher>,
    ) -> Result<Self, SigwardError> {
        Self::with_parts(config, clock, fetcher)
    }

    fn with_parts(
        config: VerifierConfig,
        clock: Arc<dyn Clock>,
        fetcher: Box<dyn KeyFetcher>,
    ) -> Result<Self, SigwardError> {
        config.validate()?;
        if let KeySource::Static(pem) = &config.key_source {
            decode_public_key(pem)?;
        }

        let keys = KeyProvider::new(
            config.key_source.clone(),
            config.grace,
            clock.clone(),
            fetcher,
        );

        Ok(Self {
            config,
            clock,
            keys,
        })
    }

    /// Verify a request against the trusted gateway key.
    ///
    /// Returns `true` when the request is trusted; the response is left
    /// unmodified and the caller proceeds. Returns `false` when any gate
    /// fails; the denial has then been fully written to `response`
    /// (status, `content-type: application/json`, JSON body) and the
    /// caller must not write it again.
    pub async fn verify(
        &self,
        request: &IncomingRequest,
        response: &mut dyn ResponseSink,
    ) -> bool {
        if self.config.bypass {
            warn!(
                method = %request.method,
                url = %request.url,
                "signature verification BYPASSED; never enable bypass in production"
            );
            response.set_header(BYPASS_HEADER, "bypassed");
            return true;
        }

        match self.check(request).await {
            Ok(()) => true,
            Err(denial) => {
                debug!(
                    method = %request.method,
                    url = %request.url,
                    kind = denial.kind.as_str(),
                    "request verification failed"
                );
                self.write_denial(response, &denial);
                false
            }
        }
    }

    /// Run gates 2-7; the first failure is terminal.
    async fn check(&self, request: &IncomingRequest) -> Result<(), Denial> {
        // 2. Key acquisition. Fetch failures are the one server-side fault.
        let pem = self
            .keys
            .current_key()
            .await
            .map_err(|_| DenialKind::MissingPublicKey)?;
        let key = decode_public_key(&pem).map_err(|_| DenialKind::MissingPublicKey)?;

        // 3. Required headers, each with its own error kind.
        let supplied_hash = request
            .header(&self.config.hash_header)
            .filter(|v| well_formed_b64(v))
            .ok_or(DenialKind::MissingRequestHash)?;

        let signature = request
            .header(&self.config.signature_header)
            .filter(|v| well_formed_b64(v))
            .ok_or(DenialKind::MissingSignature)?;

        // 4. Canonicalization + hashing (pure, cannot fail).
        let canonical = canonical_string(
            &request.method,
            &request.url,
            &request.headers,
            &self.config.selection,
            &self.config.hash_header,
            &self.config.signature_header,
        );
        let computed_hash = sha256_b64(&canonical);

        // 5. Freshness. A signing time that cannot be established is not
        // demonstrably fresh.
        let declared_ms = request
            .header(&self.config.time_header)
            .and_then(parse_time_header)
            .ok_or(DenialKind::ExpiredRequest)?;
        if !is_fresh(declared_ms, self.config.grace, self.clock.as_ref()) {
            return Err(DenialKind::ExpiredRequest.into());
        }

        // 6. Exact, case-sensitive digest compare.
        if computed_hash != supplied_hash {
            return Err(DenialKind::HashMismatch.into());
        }

        // 7. Signature over the digest string.
        if !verify_rsa_sha256(signature, &computed_hash, &key) {
            return Err(DenialKind::SignatureInvalid.into());
        }

        Ok(())
    }

    /// Write the structured denial; after this the response is terminal.
    fn write_denial(&self, response: &mut dyn ResponseSink, denial: &Denial) {
        response.set_status(denial.kind.status());
        response.set_header("content-type", "application/json");
        response.write_body(&denial.body());
    }

    /// Get the current configuration.
    pub fn config(&self) -> &VerifierConfig {
        &self.config
    }
}

/// Header-shape check: present values must be non-empty, decodable base64.
fn well_formed_b64(value: &str) -> bool {
    !value.is_empty() && STANDARD.decode(value).is_ok()
}
