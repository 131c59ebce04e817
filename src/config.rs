//! Sigward configuration.

use crate::SigwardError;
use std::time::Duration;

/// Default header carrying the signing time (epoch milliseconds).
pub const DEFAULT_TIME_HEADER: &str = "x-micro-api-gateway-signature-time";

/// Default header carrying the canonical-request digest.
pub const DEFAULT_HASH_HEADER: &str = "x-micro-api-gateway-request-hash";

/// Default header carrying the digest's signature.
pub const DEFAULT_SIGNATURE_HEADER: &str = "x-micro-api-gateway-signature";

/// Default grace period: key-cache TTL and replay window (5 minutes).
pub const DEFAULT_GRACE: Duration = Duration::from_secs(5 * 60);

/// Where the trusted public key comes from. Exactly one source exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeySource {
    /// A fixed PEM-encoded RSA public key configured in the application.
    Static(String),
    /// URL of an endpoint that serves the current PEM key; fetched on
    /// demand and cached for the grace period.
    Endpoint(String),
}

/// Which request headers participate in the canonical string.
///
/// The two strategies are mutually exclusive; pick one at configuration
/// time to match what the gateway's signer was configured with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeaderSelection {
    /// Include only the named headers, and only when present on the
    /// request. Absent names are omitted, not treated as empty.
    Whitelist(Vec<String>),
    /// Include every header on the request except the hash and signature
    /// headers, transport-framing headers (`connection`,
    /// `transfer-encoding`), and the extra names listed here.
    AllExceptBlacklist(Vec<String>),
}

/// Configuration for a [`RequestVerifier`](crate::RequestVerifier).
///
/// All fields except the key source are defaulted by
/// [`VerifierConfig::new`]. Validation runs once at verifier construction
/// and fails fast on nonsense values.
#[derive(Debug, Clone)]
pub struct VerifierConfig {
    /// Header carrying the signing time (epoch milliseconds).
    pub time_header: String,

    /// Header carrying the canonical-request digest (base64 SHA-256).
    pub hash_header: String,

    /// Header carrying the RSA signature over the digest (base64).
    pub signature_header: String,

    /// Header-selection policy shared with the gateway's signer.
    pub selection: HeaderSelection,

    /// Trust root for signature verification.
    pub key_source: KeySource,

    /// Dual-purpose window: maximum cached-key age before refetch, and
    /// maximum allowed age of a request's declared signing time.
    pub grace: Duration,

    /// Skip all verification. Strictly for local/offline development;
    /// enabling it is loudly logged and disclosed on the response.
    pub bypass: bool,
}

impl VerifierConfig {
    /// Build a configuration with defaults for everything but the key
    /// source.
    pub fn new(key_source: KeySource) -> Self {
        Self {
            time_header: DEFAULT_TIME_HEADER.to_string(),
            hash_header: DEFAULT_HASH_HEADER.to_string(),
            signature_header: DEFAULT_SIGNATURE_HEADER.to_string(),
            selection: HeaderSelection::AllExceptBlacklist(Vec::new()),
            key_source,
            grace: DEFAULT_GRACE,
            bypass: false,
        }
    }

    /// Validate configuration for obvious errors.
    pub fn validate(&self) -> Result<(), SigwardError> {
        match &self.key_source {
            KeySource::Static(pem) if pem.trim().is_empty() => {
                return Err(SigwardError::ConfigError(
                    "static public key cannot be empty".to_string(),
                ));
            }
            KeySource::Endpoint(url) if !url.starts_with("http") => {
                return Err(SigwardError::ConfigError(format!(
                    "key endpoint must be an http(s) URL, got {:?}",
                    url
                )));
            }
            _ => {}
        }
        if self.grace.is_zero() {
            return Err(SigwardError::ConfigError(
                "grace period must be a positive duration".to_string(),
            ));
        }
        for (name, value) in [
            ("time_header", &self.time_header),
            ("hash_header", &self.hash_header),
            ("signature_header", &self.signature_header),
        ] {
            if value.trim().is_empty() {
                return Err(SigwardError::ConfigError(format!(
                    "{} cannot be empty",
                    name
                )));
            }
        }
        Ok(())
    }
}
