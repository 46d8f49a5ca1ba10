// crates/mock-gate-core/src/runtime/adjudicator.rs
// ============================================================================
// Module: Adjudicator
// Description: Per-request orchestration of checks, verdict, and response.
// Purpose: Run every check for a request and send exactly one response.
// Dependencies: crate::core, crate::interfaces, crate::validators, serde_json
// ============================================================================

//! ## Overview
//! For each request the adjudicator builds a fresh [`ValidationRegistry`],
//! then:
//! 1. registers `response-code` pre-set to failing;
//! 2. runs the transport identity check when secure transport is on, ending
//!    the request with 401/403 on rejection;
//! 3. applies the endpoint path rules, ending the request with 400 on
//!    violation;
//! 4. runs every claim validator in order;
//! 5. responds 400 with the failed checks, or hands the request to the file
//!    resolver (200 or 404).
//!
//! The returned [`Adjudication`] is consumed by [`Adjudication::complete`]
//! once the final status is known, which resolves `response-code` and emits
//! the log entry. Consuming `self` makes the log write happen exactly once.
//!
//! Invariants:
//! - Nothing is sent when the responder reports headers already sent.
//! - `response-code` never contributes to the verdict or the failure list.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use serde_json::Value;
use serde_json::json;
use thiserror::Error;

use crate::core::EndpointMode;
use crate::core::Outcome;
use crate::core::RegistryError;
use crate::core::SuppressionPolicy;
use crate::core::TransportContext;
use crate::core::ValidationRegistry;
use crate::core::ValidationSummary;
use crate::core::check_transport_identity;
use crate::core::ids::REQUEST_PATH;
use crate::core::ids::RESPONSE_CODE;
use crate::core::ids::TRANSPORT_IDENTITY;
use crate::core::normalize_endpoint;
use crate::core::status;
use crate::interfaces::FileResolver;
use crate::interfaces::LogSink;
use crate::interfaces::Responder;
use crate::runtime::log::RequestLogEntry;
use crate::validators::ClaimValidator;
use crate::validators::RequestMaterial;

// ============================================================================
// SECTION: Configuration
// ============================================================================

/// Process-wide adjudication settings, read-only after startup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdjudicatorConfig {
    /// How request targets map onto endpoint keys.
    pub endpoint_mode: EndpointMode,
    /// Whether the transport identity check runs.
    pub secure_transport: bool,
    /// Checks whose outcomes are not recorded.
    pub suppression: SuppressionPolicy,
}

// ============================================================================
// SECTION: Request
// ============================================================================

/// Request facts the adjudicator inspects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncomingRequest {
    /// HTTP method.
    pub method: String,
    /// Request target as received, including the leading `/` and query.
    pub raw_target: String,
    /// Raw Authorization header value.
    pub authorization: Option<String>,
    /// Transport-layer identity facts.
    pub transport: TransportContext,
    /// Peer address, when known.
    pub peer_ip: Option<String>,
}

impl IncomingRequest {
    /// Returns the request target without its leading `/`.
    fn target_without_root(&self) -> &str {
        self.raw_target.strip_prefix('/').unwrap_or(&self.raw_target)
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Fatal adjudication errors caused by validator wiring defects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdjudicationError {
    /// A validator misused the registry.
    #[error("internal validation error: {error}")]
    Registry {
        /// Registry contract violation.
        error: RegistryError,
        /// Summaries of every check registered before the failure.
        validations: Vec<ValidationSummary>,
    },
}

impl AdjudicationError {
    /// Returns the checks registered before adjudication aborted.
    #[must_use]
    pub fn validations(&self) -> &[ValidationSummary] {
        match self {
            Self::Registry {
                validations, ..
            } => validations,
        }
    }
}

// ============================================================================
// SECTION: Verdict
// ============================================================================

/// Aggregate result of the checks run for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// No non-suppressed check failed.
    Pass,
    /// At least one check failed.
    Fail,
}

/// Description of the `response-code` check.
const RESPONSE_CODE_DESCRIPTION: &str = "Request returns 2XX response code";

/// Outcome of adjudicating one request, awaiting completion.
#[derive(Debug)]
#[must_use = "an adjudication must be completed to emit its log entry"]
pub struct Adjudication {
    /// Request as received.
    request: IncomingRequest,
    /// Normalized endpoint key, when the path rules passed.
    endpoint: Option<String>,
    /// Registry holding every check for the request.
    registry: ValidationRegistry,
    /// Aggregate verdict.
    verdict: Verdict,
}

impl Adjudication {
    /// Returns the aggregate verdict.
    #[must_use]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Returns the normalized endpoint key, if the path rules passed.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Returns the registry for inspection.
    #[must_use]
    pub const fn registry(&self) -> &ValidationRegistry {
        &self.registry
    }

    /// Resolves `response-code` from the final status, then records one log
    /// entry and returns it.
    pub fn complete(
        mut self,
        status: u16,
        body: Option<&str>,
        body_max_length: usize,
        sink: &dyn LogSink,
    ) -> RequestLogEntry {
        let outcome = if status::is_success(status) {
            Outcome::Pass
        } else {
            Outcome::Fail(format!(
                "Request failed with status {status}: {}",
                body.unwrap_or_default()
            ))
        };
        self.registry.resolve_or_register(RESPONSE_CODE, RESPONSE_CODE_DESCRIPTION, outcome);
        let entry = RequestLogEntry::new(
            &self.request,
            status,
            body,
            body_max_length,
            self.registry.list_summary(),
        );
        sink.record(&entry);
        entry
    }
}

// ============================================================================
// SECTION: Adjudicator
// ============================================================================

/// Runs the request pipeline.
pub struct Adjudicator {
    /// Process-wide settings.
    config: AdjudicatorConfig,
    /// Claim validators, run in order.
    validators: Vec<Box<dyn ClaimValidator>>,
    /// Endpoint-to-file collaborator.
    resolver: Arc<dyn FileResolver>,
}

impl Adjudicator {
    /// Creates an adjudicator.
    #[must_use]
    pub fn new(
        config: AdjudicatorConfig,
        validators: Vec<Box<dyn ClaimValidator>>,
        resolver: Arc<dyn FileResolver>,
    ) -> Self {
        Self {
            config,
            validators,
            resolver,
        }
    }

    /// Returns the adjudicator settings.
    #[must_use]
    pub const fn config(&self) -> &AdjudicatorConfig {
        &self.config
    }

    /// Runs every check for `request` and sends at most one response.
    ///
    /// # Errors
    ///
    /// Returns [`AdjudicationError`] when a validator misuses the registry.
    /// Nothing has been sent in that case; the error carries the checks
    /// registered so far.
    pub fn adjudicate(
        &self,
        request: &IncomingRequest,
        responder: &mut dyn Responder,
    ) -> Result<Adjudication, AdjudicationError> {
        let mut registry = ValidationRegistry::new(self.config.suppression.clone());
        match self.run_checks(request, responder, &mut registry) {
            Ok((endpoint, verdict)) => Ok(finish(request, endpoint, registry, verdict)),
            Err(error) => Err(AdjudicationError::Registry {
                error,
                validations: registry.list_summary(),
            }),
        }
    }

    /// Runs the pipeline against `registry`, returning the endpoint key (when
    /// the path rules passed) and the verdict.
    fn run_checks(
        &self,
        request: &IncomingRequest,
        responder: &mut dyn Responder,
        registry: &mut ValidationRegistry,
    ) -> Result<(Option<String>, Verdict), RegistryError> {
        registry.register(RESPONSE_CODE, RESPONSE_CODE_DESCRIPTION)?;
        registry.resolve(RESPONSE_CODE, Outcome::Fail("no response has been sent".to_string()))?;

        if self.config.secure_transport {
            registry.register(
                TRANSPORT_IDENTITY,
                "Client must present a certificate authorized by the transport layer",
            )?;
            if let Err(rejection) = check_transport_identity(&request.transport) {
                registry.resolve(TRANSPORT_IDENTITY, Outcome::Fail(rejection.details()))?;
                send_json(responder, rejection.status, rejection.body);
                return Ok((None, Verdict::Fail));
            }
            registry.resolve(TRANSPORT_IDENTITY, Outcome::Pass)?;
        }

        registry.register(REQUEST_PATH, "Request path must satisfy the endpoint format rules")?;
        let endpoint =
            match normalize_endpoint(request.target_without_root(), self.config.endpoint_mode) {
                Ok(endpoint) => {
                    registry.resolve(REQUEST_PATH, Outcome::Pass)?;
                    endpoint
                }
                Err(err) => {
                    registry.resolve(REQUEST_PATH, Outcome::Fail(err.to_string()))?;
                    send_json(responder, status::BAD_REQUEST, failures_body(registry));
                    return Ok((None, Verdict::Fail));
                }
            };

        let material = RequestMaterial::new(request.authorization.clone());
        for validator in &self.validators {
            validator.validate(registry, &material)?;
        }

        let verdict = if registry.has_failures_excluding(RESPONSE_CODE) {
            Verdict::Fail
        } else {
            Verdict::Pass
        };
        if responder.headers_sent() {
            return Ok((Some(endpoint), verdict));
        }
        if verdict == Verdict::Fail {
            send_json(responder, status::BAD_REQUEST, failures_body(registry));
            return Ok((Some(endpoint), verdict));
        }

        self.serve_endpoint(&endpoint, responder);
        Ok((Some(endpoint), verdict))
    }

    /// Sends the mapped file for `endpoint`, or a 404 naming what is missing.
    fn serve_endpoint(&self, endpoint: &str, responder: &mut dyn Responder) {
        let Some(file_name) = self.resolver.file_for_endpoint(endpoint) else {
            send_json(
                responder,
                status::NOT_FOUND,
                json!({
                    "message": format!(
                        "A filename corresponding to endpoint {endpoint} must exist in the \
                         endpoint mapping"
                    ),
                }),
            );
            return;
        };
        match self.resolver.resolve_file(&file_name) {
            Some(file) => responder.send_file(&file),
            None => send_json(
                responder,
                status::NOT_FOUND,
                json!({
                    "message": format!(
                        "fileName {file_name} must exist as a file in the responses folder"
                    ),
                }),
            ),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Sends a JSON response unless one was already sent.
fn send_json(responder: &mut dyn Responder, status: u16, body: Value) {
    if !responder.headers_sent() {
        responder.send_json(status, body);
    }
}

/// Builds the `{"failures": [...]}` payload.
fn failures_body(registry: &ValidationRegistry) -> Value {
    json!({ "failures": registry.failed_summaries_excluding(RESPONSE_CODE) })
}

/// Packages the request state for completion.
fn finish(
    request: &IncomingRequest,
    endpoint: Option<String>,
    registry: ValidationRegistry,
    verdict: Verdict,
) -> Adjudication {
    Adjudication {
        request: request.clone(),
        endpoint,
        registry,
        verdict,
    }
}
