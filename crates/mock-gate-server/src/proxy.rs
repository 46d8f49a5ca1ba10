// crates/mock-gate-server/src/proxy.rs
// ============================================================================
// Module: Proxy Transport Context
// Description: Client-certificate facts forwarded by the TLS front proxy.
// Purpose: Build the per-request transport context from trusted headers.
// Dependencies: axum, mock-gate-core
// ============================================================================

//! ## Overview
//! Mutual TLS is terminated by a front proxy that verifies the client
//! certificate and forwards the result in request headers. These headers are
//! trusted only because the proxy overwrites them; the server must not be
//! exposed directly when secure transport is enabled.

// ============================================================================
// SECTION: Imports
// ============================================================================

use axum::http::HeaderMap;
use mock_gate_core::CertificateInfo;
use mock_gate_core::TransportContext;

// ============================================================================
// SECTION: Headers
// ============================================================================

/// Verification result (`true` or `SUCCESS` means authorized).
pub const CLIENT_VERIFIED_HEADER: &str = "x-mock-gate-client-verified";
/// Certificate subject common name.
pub const CLIENT_SUBJECT_CN_HEADER: &str = "x-mock-gate-client-subject-cn";
/// Certificate issuer common name.
pub const CLIENT_ISSUER_CN_HEADER: &str = "x-mock-gate-client-issuer-cn";

// ============================================================================
// SECTION: Extraction
// ============================================================================

/// Builds the transport context for a request.
#[must_use]
pub fn transport_context(headers: &HeaderMap) -> TransportContext {
    let authorized = header_value(headers, CLIENT_VERIFIED_HEADER)
        .is_some_and(|value| value.eq_ignore_ascii_case("true") || value == "SUCCESS");
    let subject_cn = header_value(headers, CLIENT_SUBJECT_CN_HEADER);
    let issuer_cn = header_value(headers, CLIENT_ISSUER_CN_HEADER);
    // A certificate without a subject is treated as no certificate.
    let peer_certificate = subject_cn.is_some().then(|| CertificateInfo {
        subject_cn,
        issuer_cn,
    });
    TransportContext {
        authorized,
        peer_certificate,
    }
}

/// Returns a trimmed, non-empty header value.
fn header_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    #![allow(
        clippy::panic,
        clippy::unwrap_used,
        clippy::expect_used,
        reason = "Test-only assertions use unwrap for clarity."
    )]

    use axum::http::HeaderMap;
    use axum::http::HeaderValue;

    use super::CLIENT_ISSUER_CN_HEADER;
    use super::CLIENT_SUBJECT_CN_HEADER;
    use super::CLIENT_VERIFIED_HEADER;
    use super::transport_context;

    #[test]
    fn no_headers_means_unauthorized_without_certificate() {
        let context = transport_context(&HeaderMap::new());
        assert!(!context.authorized);
        assert!(context.peer_certificate.is_none());
    }

    #[test]
    fn nginx_success_value_authorizes() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_VERIFIED_HEADER, HeaderValue::from_static("SUCCESS"));
        headers.insert(CLIENT_SUBJECT_CN_HEADER, HeaderValue::from_static("GoodClient"));
        let context = transport_context(&headers);
        assert!(context.authorized);
        assert_eq!(
            context.peer_certificate.unwrap().subject_cn.as_deref(),
            Some("GoodClient")
        );
    }

    #[test]
    fn failed_verification_keeps_certificate_names() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_VERIFIED_HEADER, HeaderValue::from_static("FAILED:unknown ca"));
        headers.insert(CLIENT_SUBJECT_CN_HEADER, HeaderValue::from_static("BadClient"));
        headers.insert(CLIENT_ISSUER_CN_HEADER, HeaderValue::from_static("Rogue CA"));
        let context = transport_context(&headers);
        assert!(!context.authorized);
        let certificate = context.peer_certificate.unwrap();
        assert_eq!(certificate.subject_cn.as_deref(), Some("BadClient"));
        assert_eq!(certificate.issuer_cn.as_deref(), Some("Rogue CA"));
    }

    #[test]
    fn issuer_without_subject_is_no_certificate() {
        let mut headers = HeaderMap::new();
        headers.insert(CLIENT_VERIFIED_HEADER, HeaderValue::from_static("FAILED:unknown ca"));
        headers.insert(CLIENT_ISSUER_CN_HEADER, HeaderValue::from_static("Rogue CA"));
        let context = transport_context(&headers);
        assert!(!context.authorized);
        assert!(context.peer_certificate.is_none());
    }
}
