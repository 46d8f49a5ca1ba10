// crates/mock-gate-server/tests/common/mod.rs
// ============================================================================
// Module: Common Server Test Fixtures
// Description: Temporary response trees, token builders, and a spawned server.
// Purpose: Drive the real axum router over loopback HTTP.
// Dependencies: axum, base64, mock-gate-config, mock-gate-server, tempfile, tokio
// ============================================================================

//! ## Overview
//! Each test gets its own temporary directory holding a mapping table and
//! response files, a server bound to `127.0.0.1:0`, and a recording log sink.

#![allow(dead_code, reason = "Shared test helpers may be unused in some cases.")]
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::unwrap_in_result,
    reason = "Test fixtures favor direct unwraps for setup clarity."
)]

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use mock_gate_config::MockGateConfig;
use mock_gate_core::LogSink;
use mock_gate_core::RequestLogEntry;
use mock_gate_server::MockServer;
use serde_json::Value;
use serde_json::json;
use tempfile::TempDir;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Percent-encoded provider URL mapped to `document.pdf`.
pub const ENCODED_DOCUMENT: &str = "https%3A%2F%2Fprovider.test%2Fdocuments%2F1";

/// Percent-encoded provider URL mapped to `bundle.json`.
pub const ENCODED_BUNDLE: &str = "https%3A%2F%2Fprovider.test%2Fbundle";

/// Bytes served for `document.pdf`.
pub const PDF_BYTES: &[u8] = b"%PDF-1.4 mock";

// ============================================================================
// SECTION: Log Sink
// ============================================================================

/// Sink that keeps every entry.
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// Entries in order.
    pub entries: Mutex<Vec<RequestLogEntry>>,
}

impl RecordingSink {
    /// Returns a copy of the recorded entries.
    pub fn snapshot(&self) -> Vec<RequestLogEntry> {
        self.entries.lock().unwrap().clone()
    }
}

impl LogSink for RecordingSink {
    fn record(&self, entry: &RequestLogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// SECTION: Tokens
// ============================================================================

/// Current Unix time in seconds.
pub fn now() -> i64 {
    let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    i64::try_from(secs).unwrap()
}

/// Claims that satisfy every rule right now.
pub fn valid_claims() -> Value {
    let now = now();
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

/// Builds an unsecured (`alg: none`) token.
pub fn unsigned_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(serde_json::to_vec(claims).unwrap());
    format!("{header}.{payload}.")
}

/// Bearer header value for a valid token.
pub fn valid_bearer() -> String {
    format!("Bearer {}", unsigned_token(&valid_claims()))
}

// ============================================================================
// SECTION: Fixture Tree
// ============================================================================

/// Writes the mapping table and response files, returning TOML for the
/// `[endpoints]` table.
pub fn write_fixture_tree(dir: &TempDir, mapping: &str) -> String {
    let responses = dir.path().join("responses");
    fs::create_dir_all(&responses).unwrap();
    fs::write(responses.join("document.pdf"), PDF_BYTES).unwrap();
    fs::write(responses.join("bundle.json"), br#"{"resourceType":"Bundle"}"#).unwrap();
    let mapping_path = dir.path().join("file-endpoint-mapping.tsv");
    fs::write(&mapping_path, mapping).unwrap();
    format!(
        "mapping_path = '{}'\nresponses_dir = '{}'\n",
        mapping_path.display(),
        responses.display()
    )
}

/// Default mapping table for local mode.
pub const LOCAL_MAPPING: &str = "endpoint\tfile\n\
                                 https://provider.test/documents/1\tdocument.pdf\n\
                                 https://provider.test/bundle\tbundle.json\n\
                                 https://provider.test/gone\tgone.pdf\n";

/// Mapping table for integration mode.
pub const INTEGRATION_MAPPING: &str = "/documents/1\tdocument.pdf\n";

// ============================================================================
// SECTION: Server
// ============================================================================

/// Running server bound to loopback.
pub struct TestServer {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Recorded request log entries.
    pub sink: Arc<RecordingSink>,
    /// Keeps the fixture tree alive.
    _dir: TempDir,
}

impl TestServer {
    /// URL for a raw request target (with leading `/`).
    pub fn url(&self, target: &str) -> String {
        format!("{}{target}", self.base_url)
    }
}

/// Builds a config from a mapping table, top-level TOML, `[endpoints]`
/// extras, and other tables.
pub fn fixture_config(
    dir: &TempDir,
    mapping: &str,
    top: &str,
    endpoints: &str,
    tables: &str,
) -> MockGateConfig {
    let endpoint_paths = write_fixture_tree(dir, mapping);
    let toml = format!(
        "{top}\n[logging]\nstdout = false\n\n[endpoints]\n{endpoint_paths}{endpoints}\n{tables}\n"
    );
    MockGateConfig::from_toml(&toml).unwrap()
}

/// Spawns a server for `config` on `127.0.0.1:0`.
pub async fn spawn_with(dir: TempDir, config: MockGateConfig) -> TestServer {
    let sink = Arc::new(RecordingSink::default());
    let server = MockServer::from_config(config).unwrap().with_log_sink(sink.clone());
    let router = server.router();
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router.into_make_service_with_connect_info::<SocketAddr>())
            .await;
    });
    TestServer {
        base_url: format!("http://{addr}"),
        sink,
        _dir: dir,
    }
}

/// Spawns a server over the local-mode mapping.
pub async fn spawn(top: &str, endpoints: &str, tables: &str) -> TestServer {
    spawn_with_mapping(LOCAL_MAPPING, top, endpoints, tables).await
}

/// Spawns a server over `mapping`.
pub async fn spawn_with_mapping(
    mapping: &str,
    top: &str,
    endpoints: &str,
    tables: &str,
) -> TestServer {
    let dir = TempDir::new().unwrap();
    let config = fixture_config(&dir, mapping, top, endpoints, tables);
    spawn_with(dir, config).await
}
