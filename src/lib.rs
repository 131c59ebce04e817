//! # Sigward
//!
//! **Gateway request-signature verification for Rust backends.**
//!
//! Sigward verifies that an HTTP request reaching your service was
//! actually forwarded by the trusted front-door gateway, by checking the
//! RSA-SHA256 signature the gateway computed over a canonical
//! representation of the request.
//!
//! ## Features
//!
//! - **RSA-SHA256 signature verification** — requests are signed by the
//!   gateway's private key and verified against a trusted public key
//! - **Canonical request hashing** — method, URL, and selected headers are
//!   serialized deterministically, so header reordering cannot change the
//!   digest
//! - **Replay window** — requests whose declared signing time is older
//!   than the grace period are rejected
//! - **Time-bounded key cache** — a remotely fetched key is reused within
//!   the grace period and cleared on any fetch failure (fail-closed)
//! - **Structured denials** — every failure writes one JSON error body
//!   with a status code separating infrastructure faults (500) from
//!   untrusted requests (400)
//!
//! ## Quickstart
//!
//! ```no_run
//! use sigward::{BufferedResponse, IncomingRequest, KeySource, RequestVerifier, VerifierConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), sigward::SigwardError> {
//!     let config = VerifierConfig::new(KeySource::Endpoint(
//!         "https://gateway.internal/public-key".to_string(),
//!     ));
//!     let verifier = RequestVerifier::new(config)?;
//!
//!     // Per inbound request, adapt your framework's types:
//!     let request = IncomingRequest::new("GET", "/orders")
//!         .with_header("x-micro-api-gateway-signature-time", "1700000000000")
//!         .with_header("x-micro-api-gateway-request-hash", "...")
//!         .with_header("x-micro-api-gateway-signature", "...");
//!     let mut response = BufferedResponse::new();
//!
//!     if verifier.verify(&request, &mut response).await {
//!         // Trusted: continue handling the request.
//!     } else {
//!         // Denied: the response has been fully written; send it as-is.
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Threat model
//!
//! Sigward answers one question: *did this request come through the
//! trusted gateway unmodified?* It is not an authorization system, does
//! not issue or rotate signatures, and trusts whatever key the configured
//! source supplies. Run it behind TLS; the signature scheme does not
//! replace transport security.
//!
//! The freshness check has no lower bound: a future-dated signing time is
//! accepted. This mirrors the gateway's signer and is documented in
//! [`crypto::freshness`].

#![deny(warnings)]
#![deny(missing_docs)]

// Core modules
pub mod clock;
pub mod config;
pub mod errors;

// Canonical request form
pub mod canonical;

// Crypto layer
pub mod crypto;

// Framework boundary
pub mod http;

// Key acquisition
pub mod provider;

// Orchestrator (main public API)
pub mod verifier;

// Re-exports for public API
pub use clock::{Clock, SystemClock};
pub use config::{HeaderSelection, KeySource, VerifierConfig};
pub use errors::{Denial, DenialKind, SigwardError};
pub use http::{BufferedResponse, IncomingRequest, ResponseSink};
pub use provider::{HttpKeyFetcher, KeyFetcher, KeyProvider};
pub use verifier::RequestVerifier;

#[cfg(any(test, feature = "test-seams"))]
pub use clock::MockClock;
