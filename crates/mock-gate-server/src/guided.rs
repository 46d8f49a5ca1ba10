// crates/mock-gate-server/src/guided.rs
// ============================================================================
// Module: Guided Test Plan
// Description: Ordered test cases a client walks through in guided mode.
// Purpose: Tell conformance testers which endpoints to call and what to expect.
// Dependencies: mock-gate-config, serde, thiserror
// ============================================================================

//! ## Overview
//! The plan is derived from the endpoint mapping: a document retrieval that
//! must succeed with every check passing, then a request for an endpoint
//! that can never be mapped, which must produce 404 with no checks expected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use mock_gate_config::EndpointMapping;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Endpoint that is never mapped (a percent-encoded unicorn).
pub const NOT_FOUND_ENDPOINT: &str = "%F0%9F%A6%84";

// ============================================================================
// SECTION: Types
// ============================================================================

/// Guided test plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GuidedPlan {
    /// Cases in the order they should be run.
    cases: Vec<TestCase>,
}

/// One guided test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TestCase {
    /// Display name.
    pub name: String,
    /// Endpoint to request.
    pub endpoint: String,
    /// Expected result.
    pub expect: Expectation,
}

/// Expected result of a test case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expectation {
    /// Expected response status.
    pub response_code: u16,
    /// Checks expected to run.
    pub validations: ExpectedValidations,
}

/// Which checks a case expects to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ExpectedValidations {
    /// `true` means every check.
    All(bool),
    /// The listed checks only; empty means none.
    Ids(Vec<String>),
}

/// Guided plan construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GuidedPlanError {
    /// No mapped file has the required extension.
    #[error("endpoint mapping must contain an endpoint for {0} filetype")]
    MissingFileType(String),
}

// ============================================================================
// SECTION: Construction
// ============================================================================

impl GuidedPlan {
    /// Builds the plan from the endpoint mapping.
    ///
    /// # Errors
    ///
    /// Returns [`GuidedPlanError::MissingFileType`] when no endpoint maps to
    /// a PDF file.
    pub fn from_mapping(mapping: &EndpointMapping) -> Result<Self, GuidedPlanError> {
        let pdf_endpoint = success_endpoint_for(mapping, "pdf")?;
        Ok(Self {
            cases: vec![
                TestCase {
                    name: "PDF retrieval".to_string(),
                    endpoint: pdf_endpoint,
                    expect: Expectation {
                        response_code: 200,
                        validations: ExpectedValidations::All(true),
                    },
                },
                TestCase {
                    name: "Not found".to_string(),
                    endpoint: NOT_FOUND_ENDPOINT.to_string(),
                    expect: Expectation {
                        response_code: 404,
                        validations: ExpectedValidations::Ids(Vec::new()),
                    },
                },
            ],
        })
    }

    /// Returns the cases in order.
    #[must_use]
    pub fn cases(&self) -> &[TestCase] {
        &self.cases
    }
}

/// Returns the first endpoint whose file has `extension`.
fn success_endpoint_for(
    mapping: &EndpointMapping,
    extension: &str,
) -> Result<String, GuidedPlanError> {
    let suffix = format!(".{extension}");
    mapping
        .entries()
        .iter()
        .find(|entry| entry.file.ends_with(&suffix))
        .map(|entry| entry.endpoint.clone())
        .ok_or_else(|| GuidedPlanError::MissingFileType(extension.to_string()))
}

// ============================================================================
// SECTION: Tests
// ============================================================================
