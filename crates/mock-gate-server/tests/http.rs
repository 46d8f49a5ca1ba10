// crates/mock-gate-server/tests/http.rs
// ============================================================================
// Module: HTTP Endpoint Tests
// Description: End-to-end requests against the mock gate router.
// Purpose: Verify status codes, bodies, media types, and request logging.
// Dependencies: mock-gate-server, reqwest, serde_json, tokio
// ============================================================================

//! Loopback HTTP tests for the mock gate server.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions use unwrap for clarity."
)]

mod common;

use common::ENCODED_BUNDLE;
use common::ENCODED_DOCUMENT;
use common::INTEGRATION_MAPPING;
use common::PDF_BYTES;
use common::TestServer;
use common::unsigned_token;
use common::valid_bearer;
use common::valid_claims;
use mock_gate_core::ids;
use mock_gate_core::validators::jwt;
use mock_gate_server::proxy::CLIENT_ISSUER_CN_HEADER;
use mock_gate_server::proxy::CLIENT_SUBJECT_CN_HEADER;
use mock_gate_server::proxy::CLIENT_VERIFIED_HEADER;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;
use serde_json::json;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Sends an authorized GET for `target`.
async fn get_authorized(server: &TestServer, target: &str) -> reqwest::Response {
    Client::new()
        .get(server.url(target))
        .header(AUTHORIZATION, valid_bearer())
        .send()
        .await
        .unwrap()
}

/// Collects failed check ids from a 400 body.
fn failure_ids(body: &Value) -> Vec<String> {
    body["failures"]
        .as_array()
        .unwrap()
        .iter()
        .map(|failure| failure["validationId"].as_str().unwrap().to_string())
        .collect()
}

// ============================================================================
// SECTION: Serving
// ============================================================================

#[tokio::test]
async fn valid_request_serves_mapped_file() {
    let server = common::spawn("", "", "").await;
    let response = get_authorized(&server, &format!("/{ENCODED_DOCUMENT}")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/pdf");
    assert_eq!(response.bytes().await.unwrap().as_ref(), PDF_BYTES);

    let entries = server.sink.snapshot();
    assert_eq!(entries.len(), 1);
    let entry = &entries[0];
    assert_eq!(entry.status, 200);
    assert_eq!(entry.method, "GET");
    assert_eq!(entry.response_body, None);
    assert_eq!(entry.peer_ip.as_deref(), Some("127.0.0.1"));
    assert!(
        entry
            .validations
            .iter()
            .filter(|summary| summary.validation_id != ids::TRANSPORT_IDENTITY)
            .all(|summary| summary.success == Some(true))
    );
}

#[tokio::test]
async fn json_files_use_fhir_media_type_when_enabled() {
    let plain = common::spawn("", "", "").await;
    let response = get_authorized(&plain, &format!("/{ENCODED_BUNDLE}")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/json");

    let fhir = common::spawn("", "use_fhir_mime_types = true", "").await;
    let response = get_authorized(&fhir, &format!("/{ENCODED_BUNDLE}")).await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[CONTENT_TYPE], "application/fhir+json");
}

#[tokio::test]
async fn integration_mode_uses_raw_path() {
    let server =
        common::spawn_with_mapping(INTEGRATION_MAPPING, "", "format = \"integration\"", "").await;
    let response = get_authorized(&server, "/documents/1").await;
    assert_eq!(response.status(), 200);
    assert_eq!(response.bytes().await.unwrap().as_ref(), PDF_BYTES);
}

// ============================================================================
// SECTION: Rejections
// ============================================================================

#[tokio::test]
async fn invalid_claims_return_aggregated_failures() {
    let server = common::spawn("", "", "").await;
    let mut claims = valid_claims();
    claims["reason_for_request"] = json!("secondary");
    claims["scope"] = json!("patient/*.write");
    let response = Client::new()
        .get(server.url(&format!("/{ENCODED_DOCUMENT}")))
        .header(AUTHORIZATION, format!("Bearer {}", unsigned_token(&claims)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(failure_ids(&body), vec![jwt::REASON_FOR_REQUEST_VALUE, jwt::SCOPE_VALUE]);

    let entries = server.sink.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, 400);
    let response_code = entries[0]
        .validations
        .iter()
        .find(|summary| summary.validation_id == ids::RESPONSE_CODE)
        .unwrap();
    assert_eq!(response_code.success, Some(false));
    assert!(
        response_code
            .details
            .as_deref()
            .unwrap()
            .starts_with("Request failed with status 400: ")
    );
}

#[tokio::test]
async fn missing_authorization_fails_header_and_token_checks() {
    let server = common::spawn("", "", "").await;
    let response =
        Client::new().get(server.url(&format!("/{ENCODED_DOCUMENT}"))).send().await.unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(failure_ids(&body), vec![ids::AUTHORIZATION_HEADER, jwt::PARSABLE]);
}

#[tokio::test]
async fn unescaped_slash_is_rejected_before_claims() {
    let server = common::spawn("", "", "").await;
    let response = Client::new()
        .get(server.url("/https://provider.test/documents/1"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(failure_ids(&body), vec![ids::REQUEST_PATH]);
}

#[tokio::test]
async fn unmapped_endpoint_returns_not_found() {
    let server = common::spawn("", "", "").await;
    let response =
        get_authorized(&server, "/https%3A%2F%2Fprovider.test%2Fdocuments%2F404").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["message"],
        "A filename corresponding to endpoint https://provider.test/documents/404 must exist in \
         the endpoint mapping"
    );
    assert_eq!(server.sink.snapshot()[0].status, 404);
}

#[tokio::test]
async fn mapped_but_missing_file_returns_not_found() {
    let server = common::spawn("", "", "").await;
    let response = get_authorized(&server, "/https%3A%2F%2Fprovider.test%2Fgone").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "fileName gone.pdf must exist as a file in the responses folder");
}

#[tokio::test]
async fn suppressed_checks_allow_serving() {
    let server = common::spawn(
        "",
        "",
        "[validation]\nsuppressed = [\"authorization-header\", \"jwt-parsable\"]\n",
    )
    .await;
    let response =
        Client::new().get(server.url(&format!("/{ENCODED_DOCUMENT}"))).send().await.unwrap();
    assert_eq!(response.status(), 200);
}

// ============================================================================
// SECTION: Transport Identity
// ============================================================================

#[tokio::test]
async fn secure_transport_rejects_missing_certificate() {
    let server = common::spawn("", "", "[server]\nsecure_transport = true\n").await;
    let response = get_authorized(&server, &format!("/{ENCODED_DOCUMENT}")).await;
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "certificate": null, "message": "No client certificate" }));
}

#[tokio::test]
async fn secure_transport_rejects_unauthorized_certificate() {
    let server = common::spawn("", "", "[server]\nsecure_transport = true\n").await;
    let response = Client::new()
        .get(server.url(&format!("/{ENCODED_DOCUMENT}")))
        .header(AUTHORIZATION, valid_bearer())
        .header(CLIENT_VERIFIED_HEADER, "false")
        .header(CLIENT_SUBJECT_CN_HEADER, "client.test")
        .header(CLIENT_ISSUER_CN_HEADER, "Rogue CA")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "certificate": { "subject": "client.test", "issuer": "Rogue CA" },
            "message": "Unauthorized client certificate",
        })
    );
    let entries = server.sink.snapshot();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].status, 403);
}

#[tokio::test]
async fn secure_transport_treats_issuer_only_as_missing_certificate() {
    let server = common::spawn("", "", "[server]\nsecure_transport = true\n").await;
    let response = Client::new()
        .get(server.url(&format!("/{ENCODED_DOCUMENT}")))
        .header(AUTHORIZATION, valid_bearer())
        .header(CLIENT_VERIFIED_HEADER, "FAILED:unknown ca")
        .header(CLIENT_ISSUER_CN_HEADER, "Rogue CA")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
}

#[tokio::test]
async fn secure_transport_serves_verified_client() {
    let server = common::spawn("", "", "[server]\nsecure_transport = true\n").await;
    let response = Client::new()
        .get(server.url(&format!("/{ENCODED_DOCUMENT}")))
        .header(AUTHORIZATION, valid_bearer())
        .header(CLIENT_VERIFIED_HEADER, "SUCCESS")
        .header(CLIENT_SUBJECT_CN_HEADER, "client.test")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

// ============================================================================
// SECTION: Guided Mode
// ============================================================================

#[tokio::test]
async fn guided_mode_serves_plan_at_root() {
    let server = common::spawn("mode = \"guided\"", "", "").await;
    let response = Client::new().get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body[0]["endpoint"], "https://provider.test/documents/1");
    assert_eq!(body[0]["expect"]["responseCode"], 200);
    assert_eq!(body[1]["expect"]["responseCode"], 404);
    assert!(server.sink.snapshot().is_empty());
}

#[tokio::test]
async fn exploratory_mode_has_no_plan() {
    let server = common::spawn("", "", "").await;
    let response = Client::new().get(server.url("/")).send().await.unwrap();
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Not found" }));
}
