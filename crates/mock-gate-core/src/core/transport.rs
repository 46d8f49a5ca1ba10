// crates/mock-gate-core/src/core/transport.rs
// ============================================================================
// Module: Transport Identity
// Description: Client-certificate authorization supplied by the transport layer.
// Purpose: Reject unauthorized peers before any other check runs.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! The transport layer (TLS terminator or trusted proxy) reports whether the
//! peer certificate was authorized and, when present, the certificate's
//! subject and issuer common names. Unlike claim validators this check
//! short-circuits: a rejection ends the request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde_json::Value;
use serde_json::json;

use crate::core::status;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Peer certificate names reported by the transport layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificateInfo {
    /// Subject common name.
    pub subject_cn: Option<String>,
    /// Issuer common name.
    pub issuer_cn: Option<String>,
}

/// Per-request transport facts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportContext {
    /// Whether the transport authorized the peer certificate.
    pub authorized: bool,
    /// Peer certificate, when one was presented.
    pub peer_certificate: Option<CertificateInfo>,
}

impl TransportContext {
    /// Context for a peer whose certificate was authorized.
    #[must_use]
    pub fn authorized(peer_certificate: Option<CertificateInfo>) -> Self {
        Self {
            authorized: true,
            peer_certificate,
        }
    }

    /// Context for a peer that was not authorized.
    #[must_use]
    pub const fn unauthorized(peer_certificate: Option<CertificateInfo>) -> Self {
        Self {
            authorized: false,
            peer_certificate,
        }
    }
}

/// Terminal rejection produced by the transport identity check.
#[derive(Debug, Clone, PartialEq)]
pub struct TransportRejection {
    /// Response status code (401 or 403).
    pub status: u16,
    /// Response payload.
    pub body: Value,
}

impl TransportRejection {
    /// Failure details recorded against the transport check.
    #[must_use]
    pub fn details(&self) -> String {
        format!("Request failed with status {}: {}", self.status, self.body)
    }
}

// ============================================================================
// SECTION: Check
// ============================================================================

/// Evaluates the transport identity rule.
///
/// # Errors
///
/// Returns a [`TransportRejection`] with 403 when a certificate was presented
/// but not authorized, or 401 when no certificate was presented.
pub fn check_transport_identity(context: &TransportContext) -> Result<(), TransportRejection> {
    if context.authorized {
        return Ok(());
    }
    match &context.peer_certificate {
        Some(certificate) => Err(TransportRejection {
            status: status::FORBIDDEN,
            body: json!({
                "certificate": {
                    "subject": certificate.subject_cn,
                    "issuer": certificate.issuer_cn,
                },
                "message": "Unauthorized client certificate",
            }),
        }),
        None => Err(TransportRejection {
            status: status::UNAUTHORIZED,
            body: json!({
                "certificate": null,
                "message": "No client certificate",
            }),
        }),
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
