//! Canonical request-string construction.
//!
//! The canonical string is the exact byte sequence the gateway signed:
//!
//! ```text
//! METHOD:::URL:::{"header-a":"1","header-b":"2"}
//! ```
//!
//! Selected headers are lowercased by name, sorted, and serialized as a
//! JSON object, so two requests carrying the same headers in different
//! insertion order canonicalize identically. An empty selection serializes
//! as `{}`.

use crate::config::HeaderSelection;
use std::collections::{BTreeMap, HashMap};

/// Separator between the method, URL, and header segments. Shared with
/// the gateway's signer; must match bit-for-bit.
pub const SEGMENT_SEPARATOR: &str = ":::";

/// Headers a gateway or proxy may inject for transport framing; never part
/// of the signed set in blacklist mode.
const FRAMING_HEADERS: [&str; 2] = ["connection", "transfer-encoding"];

/// Select the headers that participate in the canonical string.
///
/// Returns a sorted name-to-value map with lowercased names. The hash and
/// signature header names are passed in so blacklist mode can exclude the
/// protocol's own envelope.
pub fn select_headers(
    headers: &HashMap<String, String>,
    selection: &HeaderSelection,
    hash_header: &str,
    signature_header: &str,
) -> BTreeMap<String, String> {
    let mut selected = BTreeMap::new();

    match selection {
        HeaderSelection::Whitelist(names) => {
            for name in names {
                let wanted = name.to_ascii_lowercase();
                for (k, v) in headers {
                    if k.eq_ignore_ascii_case(&wanted) {
                        selected.insert(wanted.clone(), v.clone());
                    }
                }
            }
        }
        HeaderSelection::AllExceptBlacklist(extra) => {
            for (k, v) in headers {
                let name = k.to_ascii_lowercase();
                let excluded = name.eq_ignore_ascii_case(hash_header)
                    || name.eq_ignore_ascii_case(signature_header)
                    || FRAMING_HEADERS.contains(&name.as_str())
                    || extra.iter().any(|e| e.eq_ignore_ascii_case(&name));
                if !excluded {
                    selected.insert(name, v.clone());
                }
            }
        }
    }

    selected
}

/// Serialize selected headers deterministically.
///
/// A `BTreeMap` iterates in key order, so `serde_json` emits sorted keys
/// with JSON string escaping. Serializing a string map is infallible.
pub fn serialize_headers(selected: &BTreeMap<String, String>) -> String {
    serde_json::to_string(selected).unwrap_or_else(|_| "{}".to_string())
}

/// Build the full canonical string for a request.
pub fn canonical_string(
    method: &str,
    url: &str,
    headers: &HashMap<String, String>,
    selection: &HeaderSelection,
    hash_header: &str,
    signature_header: &str,
) -> String {
    let selected = select_headers(headers, selection, hash_header, signature_header);
    format!(
        "{}{sep}{}{sep}{}",
        method,
        url,
        serialize_headers(&selected),
        sep = SEGMENT_SEPARATOR
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "x-micro-api-gateway-request-hash";
    const SIG: &str = "x-micro-api-gateway-signature";

    fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn empty_selection_serializes_as_empty_object() {
        let canonical = canonical_string(
            "GET",
            "/orders",
            &HashMap::new(),
            &HeaderSelection::AllExceptBlacklist(Vec::new()),
            HASH,
            SIG,
        );
        assert_eq!(canonical, "GET:::/orders:::{}");
    }

    #[test]
    fn header_order_does_not_matter() {
        let a = headers(&[("b-header", "2"), ("a-header", "1"), ("c-header", "3")]);
        let b = headers(&[("c-header", "3"), ("a-header", "1"), ("b-header", "2")]);
        let selection = HeaderSelection::AllExceptBlacklist(Vec::new());

        let ca = canonical_string("POST", "/x", &a, &selection, HASH, SIG);
        let cb = canonical_string("POST", "/x", &b, &selection, HASH, SIG);
        assert_eq!(ca, cb);
        assert_eq!(ca, r#"POST:::/x:::{"a-header":"1","b-header":"2","c-header":"3"}"#);
    }

    #[test]
    fn whitelist_takes_only_listed_present_headers() {
        let map = headers(&[("x-tenant", "acme"), ("x-other", "ignored")]);
        let selection = HeaderSelection::Whitelist(vec![
            "X-Tenant".to_string(),
            "x-absent".to_string(),
        ]);

        let selected = select_headers(&map, &selection, HASH, SIG);
        assert_eq!(selected.len(), 1);
        assert_eq!(selected.get("x-tenant").map(String::as_str), Some("acme"));
        // Absent whitelisted header is omitted, not an empty string.
        assert!(!selected.contains_key("x-absent"));
    }

    #[test]
    fn blacklist_drops_envelope_and_framing_headers() {
        let map = headers(&[
            ("x-tenant", "acme"),
            (HASH, "h"),
            (SIG, "s"),
            ("Connection", "keep-alive"),
            ("Transfer-Encoding", "chunked"),
        ]);
        let selection = HeaderSelection::AllExceptBlacklist(Vec::new());

        let selected = select_headers(&map, &selection, HASH, SIG);
        assert_eq!(selected.len(), 1);
        assert!(selected.contains_key("x-tenant"));
    }

    #[test]
    fn blacklist_honors_extra_names() {
        let map = headers(&[("x-tenant", "acme"), ("x-trace-id", "abc123")]);
        let selection =
            HeaderSelection::AllExceptBlacklist(vec!["X-Trace-Id".to_string()]);

        let selected = select_headers(&map, &selection, HASH, SIG);
        assert_eq!(selected.len(), 1);
        assert!(!selected.contains_key("x-trace-id"));
    }

    #[test]
    fn header_names_are_lowercased_in_output() {
        let map = headers(&[("X-Tenant", "acme")]);
        let selection = HeaderSelection::AllExceptBlacklist(Vec::new());
        let canonical = canonical_string("GET", "/", &map, &selection, HASH, SIG);
        assert_eq!(canonical, r#"GET:::/:::{"x-tenant":"acme"}"#);
    }

    #[test]
    fn values_are_json_escaped() {
        let map = headers(&[("x-note", "say \"hi\"")]);
        let selection = HeaderSelection::AllExceptBlacklist(Vec::new());
        let selected = select_headers(&map, &selection, HASH, SIG);
        assert_eq!(
            serialize_headers(&selected),
            r#"{"x-note":"say \"hi\""}"#
        );
    }

    #[test]
    fn canonicalization_is_idempotent() {
        let map = headers(&[("x-tenant", "acme")]);
        let selection = HeaderSelection::AllExceptBlacklist(Vec::new());
        let first = canonical_string("GET", "/orders", &map, &selection, HASH, SIG);
        let second = canonical_string("GET", "/orders", &map, &selection, HASH, SIG);
        assert_eq!(first, second);
    }
}
