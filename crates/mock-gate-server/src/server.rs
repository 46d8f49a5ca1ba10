// crates/mock-gate-server/src/server.rs
// ============================================================================
// Module: Mock Gate Server
// Description: axum listener that adjudicates and serves mock endpoints.
// Purpose: Bridge HTTP requests into the adjudication pipeline.
// Dependencies: axum, axum-server, mock-gate-config, mock-gate-core, rustls, tokio
// ============================================================================

//! ## Overview
//! Every `GET` to a non-root path is adjudicated. The handler collects the
//! request facts, lets the adjudicator choose a response through a
//! single-shot responder, renders that response (reading the file if one was
//! chosen), and only then completes the adjudication so the log entry carries
//! the final status. `GET /` returns the guided test plan in guided mode.
//!
//! Plain HTTP is served with `axum::serve`; when `[server.tls]` is configured
//! the listener is `axum-server` with a rustls acceptor.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Write;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use axum::Json;
use axum::Router;
use axum::extract::ConnectInfo;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::Method;
use axum::http::StatusCode;
use axum::http::Uri;
use axum::http::header::AUTHORIZATION;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::routing::get;
use axum_server::tls_rustls::RustlsConfig;
use mock_gate_config::EndpointMapping;
use mock_gate_config::MockGateConfig;
use mock_gate_config::RunMode;
use mock_gate_core::AdjudicationError;
use mock_gate_core::Adjudicator;
use mock_gate_core::BearerHeaderValidator;
use mock_gate_core::ClaimValidator;
use mock_gate_core::EndpointMode;
use mock_gate_core::IncomingRequest;
use mock_gate_core::JwtValidator;
use mock_gate_core::LogSink;
use mock_gate_core::RequestLogEntry;
use mock_gate_core::ResolvedFile;
use mock_gate_core::Responder;
use mock_gate_core::ValidationSummary;
use mock_gate_core::ids::RESPONSE_CODE;
use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::audit::build_log_sink;
use crate::files::DirectoryFileResolver;
use crate::guided::GuidedPlan;
use crate::mime::content_type;
use crate::proxy::transport_context;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Server errors.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),
    /// Initialization failure.
    #[error("init error: {0}")]
    Init(String),
    /// Listener failure.
    #[error("transport error: {0}")]
    Transport(String),
}

// ============================================================================
// SECTION: Server
// ============================================================================

/// Mock Gate server instance.
pub struct MockServer {
    /// Server configuration.
    config: MockGateConfig,
    /// Shared handler state.
    state: ServerState,
}

/// State shared by request handlers.
#[derive(Clone)]
struct ServerState {
    /// Request pipeline.
    adjudicator: Arc<Adjudicator>,
    /// Request log sink.
    sink: Arc<dyn LogSink>,
    /// Maximum logged body length.
    body_max_length: usize,
    /// Serve JSON and XML with FHIR media types.
    use_fhir_mime_types: bool,
    /// Guided test plan, present in guided mode.
    guided_plan: Option<Arc<Value>>,
}

impl MockServer {
    /// Builds a server from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when configuration is invalid or the mapping
    /// table, guided plan, or log sink cannot be prepared.
    pub fn from_config(config: MockGateConfig) -> Result<Self, ServerError> {
        config.validate().map_err(|err| ServerError::Config(err.to_string()))?;
        let mapping = EndpointMapping::load(Path::new(&config.endpoints.mapping_path))
            .map_err(|err| ServerError::Init(err.to_string()))?;
        let guided_plan = match config.mode {
            RunMode::Guided => {
                let plan = GuidedPlan::from_mapping(&mapping)
                    .map_err(|err| ServerError::Init(err.to_string()))?;
                let value = serde_json::to_value(&plan)
                    .map_err(|err| ServerError::Init(err.to_string()))?;
                Some(Arc::new(value))
            }
            RunMode::Exploratory => None,
        };
        let resolver = DirectoryFileResolver::new(mapping, &config.endpoints.responses_dir);
        let validators: Vec<Box<dyn ClaimValidator>> = vec![
            Box::new(BearerHeaderValidator),
            Box::new(JwtValidator::new(config.validation.jwt.verification())),
        ];
        let adjudicator =
            Adjudicator::new(config.adjudicator_config(), validators, Arc::new(resolver));
        let sink = build_log_sink(&config.logging)?;
        let state = ServerState {
            adjudicator: Arc::new(adjudicator),
            sink,
            body_max_length: config.logging.body_max_length,
            use_fhir_mime_types: config.endpoints.use_fhir_mime_types,
            guided_plan,
        };
        Ok(Self {
            config,
            state,
        })
    }

    /// Replaces the request log sink.
    #[must_use]
    pub fn with_log_sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.state.sink = sink;
        self
    }

    /// Builds the axum router. Serve it with connect info for `SocketAddr`.
    #[must_use]
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(handle_root))
            .route("/{*path}", get(handle_endpoint))
            .with_state(self.state.clone())
    }

    /// Serves requests until the listener fails.
    ///
    /// # Errors
    ///
    /// Returns [`ServerError`] when binding or serving fails.
    pub async fn serve(self) -> Result<(), ServerError> {
        let addr =
            self.config.server.bind_addr().map_err(|err| ServerError::Config(err.to_string()))?;
        let app = self.router().into_make_service_with_connect_info::<SocketAddr>();
        match &self.config.server.tls {
            Some(tls) => {
                let _ = rustls::crypto::aws_lc_rs::default_provider().install_default();
                let tls_config = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path)
                    .await
                    .map_err(|err| ServerError::Init(format!("tls config failed: {err}")))?;
                emit_startup(&self.config, addr, "https");
                axum_server::bind_rustls(addr, tls_config)
                    .serve(app)
                    .await
                    .map_err(|err| ServerError::Transport(format!("https server failed: {err}")))
            }
            None => {
                let listener = tokio::net::TcpListener::bind(addr)
                    .await
                    .map_err(|err| ServerError::Transport(format!("http bind failed: {err}")))?;
                emit_startup(&self.config, addr, "http");
                axum::serve(listener, app)
                    .await
                    .map_err(|err| ServerError::Transport(format!("http server failed: {err}")))
            }
        }
    }
}

/// Writes the startup line and configuration warnings to stderr.
fn emit_startup(config: &MockGateConfig, addr: SocketAddr, scheme: &str) {
    let mut stderr = std::io::stderr();
    let mode = match config.mode {
        RunMode::Guided => "guided",
        RunMode::Exploratory => "exploratory",
    };
    let format = match config.endpoints.format {
        EndpointMode::Local => "local",
        EndpointMode::Integration => "integration",
    };
    let _ = writeln!(
        stderr,
        "mock-gate: listening on {scheme}://{addr} (mode: {mode}, endpoints: {format})"
    );
    if config.server.secure_transport && config.server.tls.is_some() {
        let _ = writeln!(
            stderr,
            "mock-gate: WARNING: secure_transport reads client identity from proxy headers; the \
             built-in TLS listener does not verify client certificates"
        );
    }
}

// ============================================================================
// SECTION: Handlers
// ============================================================================

/// Serves the guided test plan, or 404 outside guided mode.
async fn handle_root(State(state): State<ServerState>) -> Response {
    match &state.guided_plan {
        Some(plan) => Json(plan.as_ref().clone()).into_response(),
        None => json_response(StatusCode::NOT_FOUND, &json!({ "message": "Not found" })),
    }
}

/// Adjudicates a mock endpoint request.
async fn handle_endpoint(
    State(state): State<ServerState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Response {
    let request = IncomingRequest {
        method: method.to_string(),
        raw_target: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |target| target.as_str().to_string()),
        authorization: headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string),
        transport: transport_context(&headers),
        peer_ip: Some(peer.ip().to_string()),
    };
    let mut responder = PendingResponder::default();
    let adjudication = match state.adjudicator.adjudicate(&request, &mut responder) {
        Ok(adjudication) => adjudication,
        Err(err) => {
            let _ = writeln!(std::io::stderr(), "mock-gate: {err}");
            let body = json!({ "message": err.to_string() });
            let text = body.to_string();
            let status = StatusCode::INTERNAL_SERVER_ERROR.as_u16();
            let entry = RequestLogEntry::new(
                &request,
                status,
                Some(&text),
                state.body_max_length,
                aborted_validations(&err, status, &text),
            );
            state.sink.record(&entry);
            return json_response(StatusCode::INTERNAL_SERVER_ERROR, &body);
        }
    };
    let (response, logged_body) = responder.render(state.use_fhir_mime_types).await;
    let _entry = adjudication.complete(
        response.status().as_u16(),
        logged_body.as_deref(),
        state.body_max_length,
        state.sink.as_ref(),
    );
    response
}

/// Returns the checks registered before an aborted adjudication, with a
/// recorded `response-code` outcome reflecting the error response.
fn aborted_validations(
    err: &AdjudicationError,
    status: u16,
    body: &str,
) -> Vec<ValidationSummary> {
    let mut validations = err.validations().to_vec();
    for summary in validations
        .iter_mut()
        .filter(|summary| summary.has_run && summary.validation_id == RESPONSE_CODE)
    {
        summary.success = Some(false);
        summary.details = Some(format!("Request failed with status {status}: {body}"));
    }
    validations
}

// ============================================================================
// SECTION: Responder
// ============================================================================

/// Response chosen by the adjudicator.
enum PendingResponse {
    /// JSON body with status.
    Json(u16, Value),
    /// File to stream back.
    File(ResolvedFile),
}

/// Single-shot responder that records the first send.
#[derive(Default)]
struct PendingResponder {
    /// First response sent, if any.
    pending: Option<PendingResponse>,
}

impl Responder for PendingResponder {
    fn headers_sent(&self) -> bool {
        self.pending.is_some()
    }

    fn send_json(&mut self, status: u16, body: Value) {
        if self.pending.is_none() {
            self.pending = Some(PendingResponse::Json(status, body));
        }
    }

    fn send_file(&mut self, file: &ResolvedFile) {
        if self.pending.is_none() {
            self.pending = Some(PendingResponse::File(file.clone()));
        }
    }
}

impl PendingResponder {
    /// Renders the pending response and returns the body text to log.
    async fn render(self, use_fhir_mime_types: bool) -> (Response, Option<String>) {
        match self.pending {
            Some(PendingResponse::Json(status, body)) => {
                let status =
                    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                let text = body.to_string();
                (json_response(status, &body), Some(text))
            }
            Some(PendingResponse::File(file)) => match tokio::fs::read(&file.path).await {
                Ok(bytes) => {
                    let mime = content_type(&file.file_name, use_fhir_mime_types);
                    ((StatusCode::OK, [(CONTENT_TYPE, mime)], bytes).into_response(), None)
                }
                Err(err) => {
                    let body = json!({
                        "message": format!("fileName {} could not be read: {err}", file.file_name),
                    });
                    let text = body.to_string();
                    (json_response(StatusCode::INTERNAL_SERVER_ERROR, &body), Some(text))
                }
            },
            None => {
                let body = json!({ "message": "no response was produced" });
                let text = body.to_string();
                (json_response(StatusCode::INTERNAL_SERVER_ERROR, &body), Some(text))
            }
        }
    }
}

/// Builds a JSON response.
fn json_response(status: StatusCode, body: &Value) -> Response {
    (status, Json(body.clone())).into_response()
}

// ============================================================================
// SECTION: Tests
// ============================================================================
