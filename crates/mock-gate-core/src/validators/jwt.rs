// crates/mock-gate-core/src/validators/jwt.rs
// ============================================================================
// Module: JWT Claim Validator
// Description: Parses the bearer JWT and cross-validates its claims.
// Purpose: Report every claim violation of a request in one response.
// Dependencies: base64, jsonwebtoken, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The validator registers ten checks, then parses the token. A parse
//! failure resolves only the parsability check; the claim checks stay
//! registered but unrun because there are no claim values to inspect.
//! Otherwise each claim rule is evaluated independently.
//!
//! Time rules use a fixed clock-skew tolerance on the upper bounds an
//! operator actually observes (`iat` in the future, `exp` too far out).
//! `iat > exp` is checked without tolerance.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;
use jsonwebtoken::errors::ErrorKind;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use thiserror::Error;

use crate::core::Clock;
use crate::core::Outcome;
use crate::core::RegistryError;
use crate::core::SystemClock;
use crate::core::ValidationRegistry;
use crate::validators::ClaimValidator;
use crate::validators::RequestMaterial;
use crate::validators::patterns::is_requesting_organization;
use crate::validators::patterns::is_requesting_system;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Clock-skew tolerance applied to upper-bound time checks.
pub const TOLERANCE_SECONDS: i64 = 30;
/// Maximum distance of `exp` from now.
pub const MAX_EXPIRY_SECONDS: i64 = 5 * 60;
/// Required `reason_for_request` value.
pub const REASON_FOR_REQUEST: &str = "directcare";
/// Required `scope` value.
pub const SCOPE: &str = "patient/*.read";

/// Claims that must be present and non-empty.
pub const MANDATORY_CLAIMS: [&str; 10] = [
    "iss",
    "sub",
    "aud",
    "exp",
    "iat",
    "reason_for_request",
    "scope",
    "requesting_system",
    "requesting_organization",
    "requesting_user",
];

/// Token must parse and verify.
pub const PARSABLE: &str = "jwt-parsable";
/// Mandatory claims present.
pub const MANDATORY_CLAIMS_PRESENT: &str = "jwt-mandatory-claims";
/// `iat` not in the future.
pub const ISSUED_IN_FUTURE: &str = "jwt-issued-in-future";
/// `exp` not more than five minutes out.
pub const EXPIRY_OVER_5_MINUTES: &str = "jwt-expiry-over-5-minutes";
/// `iat` not after `exp`.
pub const ISSUED_AFTER_EXPIRY: &str = "jwt-issued-after-expiry";
/// `sub` equals `requesting_user`.
pub const SUB_NOT_REQUESTING_USER: &str = "jwt-sub-not-requesting-user";
/// `reason_for_request` value.
pub const REASON_FOR_REQUEST_VALUE: &str = "jwt-reason-for-request";
/// `scope` value.
pub const SCOPE_VALUE: &str = "jwt-scope";
/// `requesting_system` format.
pub const REQUESTING_SYSTEM_FORMAT: &str = "jwt-requesting-system-format";
/// `requesting_organization` format.
pub const REQUESTING_ORGANIZATION_FORMAT: &str = "jwt-requesting-organization-format";

/// Every check this validator registers, in registration order.
pub const JWT_VALIDATION_IDS: [&str; 10] = [
    PARSABLE,
    MANDATORY_CLAIMS_PRESENT,
    ISSUED_IN_FUTURE,
    EXPIRY_OVER_5_MINUTES,
    ISSUED_AFTER_EXPIRY,
    SUB_NOT_REQUESTING_USER,
    REASON_FOR_REQUEST_VALUE,
    SCOPE_VALUE,
    REQUESTING_SYSTEM_FORMAT,
    REQUESTING_ORGANIZATION_FORMAT,
];

/// Check descriptions, index-aligned with [`JWT_VALIDATION_IDS`].
const DESCRIPTIONS: [&str; 10] = [
    "JWT must be parsable",
    "The following mandatory JWT claims must all be present: [ iss, sub, aud, exp, iat, \
     reason_for_request, scope, requesting_system, requesting_organization, requesting_user ]",
    "The JWT iat (issued at) claim cannot be in the future",
    "The JWT exp (expiration time) claim cannot be more than 5 minutes in the future",
    "The JWT iat (issued at) time cannot be after the exp (expiration time) time",
    "The JWT sub (subject) claim must be the same as the requesting_user",
    "The JWT reason_for_request claim must be set to \"directcare\"",
    "The JWT scope claim must be set to \"patient/*.read\"",
    "The JWT requesting_system claim must be in the format \
     https://fhir.nhs.uk/Id/accredited-system|[ASID]",
    "The JWT requesting_organization claim must be in the format \
     https://fhir.nhs.uk/Id/ods-organization-code|[ODSCode]",
];

// ============================================================================
// SECTION: Verification Mode
// ============================================================================

/// How the token signature is verified.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum JwtVerification {
    /// Unsecured tokens: `alg` must be `none` and the signature empty.
    #[default]
    Unsigned,
    /// HMAC-SHA256 signature against a shared secret.
    Hs256 {
        /// Shared secret.
        secret: String,
    },
}

// ============================================================================
// SECTION: Parse Errors
// ============================================================================

/// Reason a token could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{name}: {message}")]
pub struct JwtParseError {
    /// Error class (`JsonWebTokenError`, `TokenExpiredError`, `NotBeforeError`).
    pub name: &'static str,
    /// Human-readable message.
    pub message: String,
}

impl JwtParseError {
    /// Generic token error.
    fn invalid(message: &str) -> Self {
        Self {
            name: "JsonWebTokenError",
            message: message.to_string(),
        }
    }

    /// Failure details recorded against the parsability check.
    #[must_use]
    pub fn details(&self) -> String {
        let payload = serde_json::to_string(self).unwrap_or_else(|_| self.to_string());
        format!("JWT parsing error: {payload}")
    }
}

// ============================================================================
// SECTION: Validator
// ============================================================================

/// Validator for the bearer JWT and its claims.
#[derive(Clone)]
pub struct JwtValidator {
    /// Signature verification mode.
    verification: JwtVerification,
    /// Time source for claim checks.
    clock: Arc<dyn Clock>,
}

impl JwtValidator {
    /// Creates a validator using the system clock.
    #[must_use]
    pub fn new(verification: JwtVerification) -> Self {
        Self::with_clock(verification, Arc::new(SystemClock))
    }

    /// Creates a validator with an explicit clock.
    #[must_use]
    pub fn with_clock(verification: JwtVerification, clock: Arc<dyn Clock>) -> Self {
        Self {
            verification,
            clock,
        }
    }
}

impl ClaimValidator for JwtValidator {
    fn name(&self) -> &'static str {
        "jwt"
    }

    fn validate(
        &self,
        registry: &mut ValidationRegistry,
        material: &RequestMaterial,
    ) -> Result<(), RegistryError> {
        for (validation_id, description) in JWT_VALIDATION_IDS.into_iter().zip(DESCRIPTIONS) {
            registry.register(validation_id, description)?;
        }
        let token = material.bearer_token().unwrap_or_default();
        let now = self.clock.now_unix_seconds();
        let claims = match decode_token(token, &self.verification, now) {
            Ok(claims) => {
                registry.resolve(PARSABLE, Outcome::Pass)?;
                claims
            }
            Err(err) => {
                return registry.resolve(PARSABLE, Outcome::Fail(err.details()));
            }
        };
        for (validation_id, outcome) in evaluate_claims(&claims, now) {
            registry.resolve(validation_id, outcome)?;
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Claim Rules
// ============================================================================

/// Evaluates every claim rule against decoded claims at time `now`.
#[must_use]
pub fn evaluate_claims(claims: &Map<String, Value>, now: i64) -> Vec<(&'static str, Outcome)> {
    let missing: Vec<&str> = MANDATORY_CLAIMS
        .into_iter()
        .filter(|claim| !claims.get(*claim).is_some_and(is_truthy))
        .collect();
    let missing_outcome = if missing.is_empty() {
        Outcome::Pass
    } else {
        Outcome::Fail(format!(
            "The following mandatory JWT claims are missing or empty: [ {} ]",
            missing.join(", ")
        ))
    };

    let iat = claims.get("iat").and_then(numeric_time);
    let exp = claims.get("exp").and_then(numeric_time);
    let issued_limit = as_seconds(now.saturating_add(TOLERANCE_SECONDS));
    let expiry_limit =
        as_seconds(now.saturating_add(MAX_EXPIRY_SECONDS).saturating_add(TOLERANCE_SECONDS));
    let issued_in_future = iat.is_some_and(|iat| iat > issued_limit);
    let expiry_over_limit = exp.is_some_and(|exp| exp > expiry_limit);
    let issued_after_expiry = matches!((iat, exp), (Some(iat), Some(exp)) if iat > exp);

    let string_claim = |name: &str| claims.get(name).and_then(Value::as_str);

    vec![
        (MANDATORY_CLAIMS_PRESENT, missing_outcome),
        (
            ISSUED_IN_FUTURE,
            Outcome::fail_if(issued_in_future, "The JWT iat (issued at) claim is in the future"),
        ),
        (
            EXPIRY_OVER_5_MINUTES,
            Outcome::fail_if(
                expiry_over_limit,
                "The JWT exp (expiration time) claim is more than 5 minutes in the future",
            ),
        ),
        (
            ISSUED_AFTER_EXPIRY,
            Outcome::fail_if(
                issued_after_expiry,
                "The JWT iat (issued at) time is after the exp (expiration time) time",
            ),
        ),
        (
            SUB_NOT_REQUESTING_USER,
            Outcome::fail_if(
                claims.get("sub") != claims.get("requesting_user"),
                "The sub (subject) claim is different from requesting_user",
            ),
        ),
        (
            REASON_FOR_REQUEST_VALUE,
            Outcome::fail_if(
                string_claim("reason_for_request") != Some(REASON_FOR_REQUEST),
                "The JWT reason_for_request claim is not set to \"directcare\"",
            ),
        ),
        (
            SCOPE_VALUE,
            Outcome::fail_if(
                string_claim("scope") != Some(SCOPE),
                "The JWT scope claim is not set to \"patient/*.read\"",
            ),
        ),
        (
            REQUESTING_SYSTEM_FORMAT,
            Outcome::fail_if(
                !string_claim("requesting_system").is_some_and(is_requesting_system),
                "The JWT requesting_system claim is not in the format \
                 https://fhir.nhs.uk/Id/accredited-system|[ASID]",
            ),
        ),
        (
            REQUESTING_ORGANIZATION_FORMAT,
            Outcome::fail_if(
                !string_claim("requesting_organization").is_some_and(is_requesting_organization),
                "The JWT requesting_organization claim is not in the format \
                 https://fhir.nhs.uk/Id/ods-organization-code|[ODSCode]",
            ),
        ),
    ]
}

/// Returns false for null, false, zero, and the empty string.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().is_some_and(|n| n != 0.0 && !n.is_nan()),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Reads a time claim as seconds. Numbers and numeric strings compare;
/// any other value is incomparable and never trips a time rule.
fn numeric_time(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => {
            text.trim().parse::<f64>().ok().filter(|seconds| seconds.is_finite())
        }
        _ => None,
    }
}

/// Converts Unix seconds for comparison against numeric claims.
#[allow(clippy::cast_precision_loss, reason = "Unix seconds fit exactly in an f64 mantissa.")]
const fn as_seconds(value: i64) -> f64 {
    value as f64
}

// ============================================================================
// SECTION: Token Decoding
// ============================================================================

/// Decodes and verifies a token, returning its claims.
///
/// # Errors
///
/// Returns [`JwtParseError`] when the token is missing, malformed, fails
/// verification, is expired, or is not yet active.
pub fn decode_token(
    token: &str,
    verification: &JwtVerification,
    now: i64,
) -> Result<Map<String, Value>, JwtParseError> {
    let token = token.trim();
    if token.is_empty() {
        return Err(JwtParseError::invalid("jwt must be provided"));
    }
    let segments: Vec<&str> = token.split('.').collect();
    let [header, payload, signature] = segments.as_slice() else {
        return Err(JwtParseError::invalid("jwt malformed"));
    };
    let claims = match verification {
        JwtVerification::Unsigned => decode_unsigned(header, payload, signature)?,
        JwtVerification::Hs256 {
            secret,
        } => decode_hs256(token, secret)?,
    };
    check_registered_times(&claims, now)?;
    Ok(claims)
}

/// Decodes an unsecured (`alg: none`) token.
fn decode_unsigned(
    header: &str,
    payload: &str,
    signature: &str,
) -> Result<Map<String, Value>, JwtParseError> {
    let header = decode_segment(header)?;
    if !signature.is_empty() {
        return Err(JwtParseError::invalid("secret or public key must be provided"));
    }
    if header.get("alg").and_then(Value::as_str) != Some("none") {
        return Err(JwtParseError::invalid("invalid algorithm"));
    }
    decode_segment(payload)
}

/// Decodes and verifies an HS256 token.
fn decode_hs256(token: &str, secret: &str) -> Result<Map<String, Value>, JwtParseError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();
    validation.validate_exp = false;
    validation.validate_aud = false;
    jsonwebtoken::decode::<Map<String, Value>>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|err| {
        let message = match err.kind() {
            ErrorKind::InvalidSignature => "invalid signature",
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => "invalid algorithm",
            _ => "jwt malformed",
        };
        JwtParseError::invalid(message)
    })
}

/// Decodes one base64url JSON object segment.
fn decode_segment(segment: &str) -> Result<Map<String, Value>, JwtParseError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment.trim_end_matches('='))
        .map_err(|_| JwtParseError::invalid("invalid token"))?;
    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(JwtParseError::invalid("invalid token")),
    }
}

/// Enforces `exp` and `nbf` at parse time, without tolerance.
fn check_registered_times(claims: &Map<String, Value>, now: i64) -> Result<(), JwtParseError> {
    let now = as_seconds(now);
    if let Some(nbf) = claims.get("nbf") {
        let nbf = nbf.as_f64().ok_or_else(|| JwtParseError::invalid("invalid nbf value"))?;
        if nbf > now {
            return Err(JwtParseError {
                name: "NotBeforeError",
                message: "jwt not active".to_string(),
            });
        }
    }
    if let Some(exp) = claims.get("exp") {
        let exp = exp.as_f64().ok_or_else(|| JwtParseError::invalid("invalid exp value"))?;
        if now >= exp {
            return Err(JwtParseError {
                name: "TokenExpiredError",
                message: "jwt expired".to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================
