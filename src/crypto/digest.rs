//! SHA-256 digest of the canonical string.

use base64::{engine::general_purpose::STANDARD, Engine};
use sha2::{Digest, Sha256};

/// Compute the SHA-256 digest of a canonical string and return it
/// base64-encoded (standard alphabet, padded).
///
/// This is the value the gateway places in the request-hash header;
/// comparison against it is an exact, case-sensitive string compare.
pub fn sha256_b64(canonical: &str) -> String {
    let hash = Sha256::digest(canonical.as_bytes());
    STANDARD.encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        assert_eq!(
            sha256_b64(""),
            "47DEQpj8HBSa+/TImW+5JCeuQeRkm5NMpJWZG3hSuFU="
        );
    }

    #[test]
    fn known_canonical_digest() {
        // Precomputed: SHA-256("GET:::/orders:::{}") in base64.
        assert_eq!(
            sha256_b64("GET:::/orders:::{}"),
            "nuurUZjz0CZI8KO05DYNys8SR9PYyambn2Mm1CDfxYU="
        );
    }

    #[test]
    fn digest_is_deterministic() {
        let a = sha256_b64("POST:::/x:::{\"h\":\"v\"}");
        let b = sha256_b64("POST:::/x:::{\"h\":\"v\"}");
        assert_eq!(a, b);
    }

    #[test]
    fn digest_changes_with_input() {
        assert_ne!(sha256_b64("GET:::/a:::{}"), sha256_b64("GET:::/b:::{}"));
    }
}
