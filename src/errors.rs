//! Sigward error and denial types.

use serde::Serialize;
use thiserror::Error;

/// Errors surfaced to the embedding application.
///
/// These never occur mid-verification: a running verifier translates every
/// runtime failure into a [`Denial`] written to the response. `SigwardError`
/// covers construction-time problems and internal key-fetch plumbing.
#[derive(Debug, Error)]
pub enum SigwardError {
    /// Configuration is invalid (raised at construction, fail fast).
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The trusted public key could not be obtained.
    #[error("Public key unavailable: {0}")]
    KeyUnavailable(String),

    /// HTTP transport error while fetching the key.
    #[error("Key endpoint transport error: {0}")]
    Transport(String),
}

/// Machine-readable failure kinds, one per verification gate.
///
/// The wire string for each kind is part of the protocol and shared with
/// the gateway's operators; see [`DenialKind::as_str`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialKind {
    /// No trusted key could be obtained (infrastructure fault, 500).
    MissingPublicKey,
    /// Hash header absent or not valid base64.
    MissingRequestHash,
    /// Signature header absent or not valid base64.
    MissingSignature,
    /// Declared signing time is older than the grace period.
    ExpiredRequest,
    /// Computed digest does not match the header-supplied digest.
    HashMismatch,
    /// Signature does not verify against the trusted key.
    SignatureInvalid,
}

impl DenialKind {
    /// Wire name carried in the JSON `error` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialKind::MissingPublicKey => "missing public key",
            DenialKind::MissingRequestHash => "missing or malformed request hash",
            DenialKind::MissingSignature => "missing or malformed request hash signature",
            DenialKind::ExpiredRequest => "expired request",
            DenialKind::HashMismatch => "invalid request hash",
            DenialKind::SignatureInvalid => "invalid request hash signature",
        }
    }

    /// HTTP status written with this kind.
    ///
    /// Only `missing public key` is a server-side fault; every other kind
    /// is attributable to the caller or an intermediary.
    pub fn status(&self) -> u16 {
        match self {
            DenialKind::MissingPublicKey => 500,
            _ => 400,
        }
    }

    /// Default human-readable message for the JSON `message` field.
    pub fn message(&self) -> &'static str {
        match self {
            DenialKind::MissingPublicKey => {
                "the trusted gateway public key is not available; try again later"
            }
            DenialKind::MissingRequestHash => {
                "the request hash header is missing or not valid base64"
            }
            DenialKind::MissingSignature => {
                "the request hash signature header is missing or not valid base64"
            }
            DenialKind::ExpiredRequest => {
                "the declared signing time is outside the allowed window"
            }
            DenialKind::HashMismatch => {
                "the request hash does not match the canonical request"
            }
            DenialKind::SignatureInvalid => {
                "the request hash signature does not verify against the trusted key"
            }
        }
    }
}

/// A failed verification verdict, ready to be written to the response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Denial {
    /// Failure kind (fixes the wire name and status).
    pub kind: DenialKind,
}

impl Denial {
    /// Build a denial for the given kind.
    pub fn new(kind: DenialKind) -> Self {
        Self { kind }
    }

    /// JSON body written to the response: `{"error": ..., "message": ...}`.
    pub fn body(&self) -> String {
        #[derive(Serialize)]
        struct Body<'a> {
            error: &'a str,
            message: &'a str,
        }

        let body = Body {
            error: self.kind.as_str(),
            message: self.kind.message(),
        };
        // Two borrowed string fields cannot fail to serialize.
        serde_json::to_string(&body).unwrap_or_else(|_| {
            format!(r#"{{"error":"{}","message":""}}"#, self.kind.as_str())
        })
    }
}

impl From<DenialKind> for Denial {
    fn from(kind: DenialKind) -> Self {
        Denial::new(kind)
    }
}
