// crates/mock-gate-core/tests/common/mod.rs
// ============================================================================
// Module: Common Test Fixtures
// Description: Token builders and in-memory collaborators for core tests.
// Purpose: Keep adjudication tests deterministic and free of I/O.
// Dependencies: base64, jsonwebtoken, mock-gate-core, serde_json
// ============================================================================

//! ## Overview
//! Shared fixtures: unsigned and HS256 token builders, a claim set that
//! passes every rule at a fixed instant, a recording responder, an
//! in-memory file resolver, and a recording log sink.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use mock_gate_core::Adjudicator;
use mock_gate_core::AdjudicatorConfig;
use mock_gate_core::BearerHeaderValidator;
use mock_gate_core::ClaimValidator;
use mock_gate_core::FileResolver;
use mock_gate_core::FixedClock;
use mock_gate_core::IncomingRequest;
use mock_gate_core::JwtValidator;
use mock_gate_core::JwtVerification;
use mock_gate_core::LogSink;
use mock_gate_core::RequestLogEntry;
use mock_gate_core::ResolvedFile;
use mock_gate_core::Responder;
use mock_gate_core::TransportContext;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Fixed "now" used across tests (2020-09-13T12:26:40Z).
pub const NOW: i64 = 1_600_000_000;

/// Endpoint key used by the resolver fixtures.
pub const PROVIDER_URL: &str = "https://provider.test/documents/1";

/// `PROVIDER_URL` percent-encoded as a single path segment.
pub const ENCODED_PROVIDER_URL: &str = "https%3A%2F%2Fprovider.test%2Fdocuments%2F1";

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Claims that satisfy every rule at `now`.
pub fn valid_claims(now: i64) -> Value {
    json!({
        "iss": "https://consumer.test",
        "sub": "https://fhir.nhs.uk/Id/sds-role-profile-id|fakeRoleId",
        "aud": "https://provider.test",
        "exp": now + 60,
        "iat": now,
        "reason_for_request": "directcare",
        "scope": "patient/*.read",
        "requesting_system": "https://fhir.nhs.uk/Id/accredited-system|200000000359",
        "requesting_organization": "https://fhir.nhs.uk/Id/ods-organization-code|GPC001",
        "requesting_user": "https://fhir.nhs.uk/Id/sds-role-profile-id|fakeRoleId",
    })
}

/// Returns `valid_claims(now)` with `name` removed.
pub fn claims_without(now: i64, name: &str) -> Value {
    let mut claims = valid_claims(now);
    claims.as_object_mut().unwrap().remove(name);
    claims
}

/// Returns `valid_claims(now)` with `name` replaced by `value`.
pub fn claims_with(now: i64, name: &str, value: Value) -> Value {
    let mut claims = valid_claims(now);
    claims.as_object_mut().unwrap().insert(name.to_string(), value);
    claims
}

/// Builds an unsecured (`alg: none`) token.
pub fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.")
}

/// Builds an HS256 token signed with `secret`.
pub fn hs256_token(claims: &Value, secret: &str) -> String {
    jsonwebtoken::encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .unwrap()
}

/// Formats a bearer Authorization header.
pub fn bearer(token: &str) -> Option<String> {
    Some(format!("Bearer {token}"))
}

// ============================================================================
// SECTION: Requests
// ============================================================================

/// GET request for `raw_target` carrying `authorization`.
pub fn get(raw_target: &str, authorization: Option<String>) -> IncomingRequest {
    IncomingRequest {
        method: "GET".to_string(),
        raw_target: raw_target.to_string(),
        authorization,
        transport: TransportContext::authorized(None),
        peer_ip: Some("127.0.0.1".to_string()),
    }
}

/// Valid local-mode GET for the fixture endpoint.
pub fn valid_local_request() -> IncomingRequest {
    get(&format!("/{ENCODED_PROVIDER_URL}"), bearer(&unsigned_token(&valid_claims(NOW))))
}

// ============================================================================
// SECTION: Collaborators
// ============================================================================

/// Response captured by [`RecordingResponder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    /// JSON body with status.
    Json(u16, Value),
    /// File send.
    File(ResolvedFile),
}

/// Responder that records every send.
#[derive(Debug, Default)]
pub struct RecordingResponder {
    /// Sends in order.
    pub sent: Vec<Sent>,
    /// Reports headers as sent before any send happens.
    pub preset_headers_sent: bool,
}

impl RecordingResponder {
    /// Returns the single JSON response, panicking otherwise.
    pub fn json(&self) -> (u16, Value) {
        match self.sent.as_slice() {
            [Sent::Json(status, body)] => (*status, body.clone()),
            other => panic!("expected one JSON response, got {other:?}"),
        }
    }

    /// Final status and serialized body, as a server would report them.
    pub fn status_and_body(&self) -> (u16, Option<String>) {
        match self.sent.last() {
            Some(Sent::Json(status, body)) => (*status, Some(body.to_string())),
            Some(Sent::File(_)) => (200, None),
            None => (500, None),
        }
    }
}

impl Responder for RecordingResponder {
    fn headers_sent(&self) -> bool {
        self.preset_headers_sent || !self.sent.is_empty()
    }

    fn send_json(&mut self, status: u16, body: Value) {
        self.sent.push(Sent::Json(status, body));
    }

    fn send_file(&mut self, file: &ResolvedFile) {
        self.sent.push(Sent::File(file.clone()));
    }
}

/// Resolver backed by in-memory tables.
#[derive(Debug, Default)]
pub struct MemoryResolver {
    /// Endpoint to file name.
    pub mapping: BTreeMap<String, String>,
    /// File names that exist.
    pub files: BTreeSet<String>,
}

impl MemoryResolver {
    /// Resolver mapping `PROVIDER_URL` to an existing `document.pdf`.
    pub fn with_fixture() -> Self {
        let mut resolver = Self::default();
        resolver.mapping.insert(PROVIDER_URL.to_string(), "document.pdf".to_string());
        resolver.files.insert("document.pdf".to_string());
        resolver
    }
}

impl FileResolver for MemoryResolver {
    fn file_for_endpoint(&self, endpoint: &str) -> Option<String> {
        self.mapping.get(endpoint).cloned()
    }

    fn resolve_file(&self, file_name: &str) -> Option<ResolvedFile> {
        self.files.contains(file_name).then(|| ResolvedFile {
            file_name: file_name.to_string(),
            path: PathBuf::from("responses").join(file_name),
        })
    }
}

/// Sink that keeps every entry.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Entries in order.
    pub entries: Mutex<Vec<RequestLogEntry>>,
}

impl LogSink for RecordingSink {
    fn record(&self, entry: &RequestLogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// SECTION: Adjudicators
// ============================================================================

/// Bearer and unsigned-JWT validators at the fixed instant.
pub fn default_validators() -> Vec<Box<dyn ClaimValidator>> {
    vec![
        Box::new(BearerHeaderValidator),
        Box::new(JwtValidator::with_clock(JwtVerification::Unsigned, Arc::new(FixedClock(NOW)))),
    ]
}

/// Adjudicator over the fixture resolver.
pub fn adjudicator(config: AdjudicatorConfig) -> Adjudicator {
    Adjudicator::new(config, default_validators(), Arc::new(MemoryResolver::with_fixture()))
}
