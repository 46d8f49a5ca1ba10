// crates/mock-gate-core/src/core/record.rs
// ============================================================================
// Module: Validation Records
// Description: A single named check and its mutable outcome state.
// Purpose: Track whether a check ran and how it resolved for one request.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ValidationRecord`] is created only through
//! [`crate::core::ValidationRegistry::register`] and mutated only through the
//! registry, which enforces the suppression policy. Once a record has run it
//! never returns to the "not run" state.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::outcome::Outcome;

// ============================================================================
// SECTION: Record
// ============================================================================

/// One named check and its outcome state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRecord {
    /// Identifier, unique within a registry.
    validation_id: String,
    /// Statement of what the check asserts.
    description: String,
    /// Whether an outcome has been recorded.
    has_run: bool,
    /// Recorded pass/fail flag.
    success: Option<bool>,
    /// Failure reason, present only on failure.
    details: Option<String>,
}

impl ValidationRecord {
    /// Creates a record in the "not run" state.
    pub(crate) fn new(validation_id: String, description: String) -> Self {
        Self {
            validation_id,
            description,
            has_run: false,
            success: None,
            details: None,
        }
    }

    /// Returns the check identifier.
    #[must_use]
    pub fn validation_id(&self) -> &str {
        &self.validation_id
    }

    /// Returns the check description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns true once an outcome has been recorded.
    #[must_use]
    pub const fn has_run(&self) -> bool {
        self.has_run
    }

    /// Returns the recorded pass/fail flag, if any.
    #[must_use]
    pub const fn success(&self) -> Option<bool> {
        self.success
    }

    /// Returns the failure reason, if any.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }

    /// Returns true when the record resolved to a failure.
    #[must_use]
    pub fn is_failure(&self) -> bool {
        self.success == Some(false)
    }

    /// Stores an outcome. Suppression is applied by the registry.
    pub(crate) fn apply(&mut self, outcome: Outcome) {
        let (success, details) = outcome.into_parts();
        self.has_run = true;
        self.success = Some(success);
        self.details = details;
    }

    /// Projects the record into its serializable summary.
    #[must_use]
    pub fn summary(&self) -> ValidationSummary {
        ValidationSummary {
            validation_id: self.validation_id.clone(),
            description: self.description.clone(),
            has_run: self.has_run,
            success: self.success,
            details: self.details.clone(),
        }
    }
}

// ============================================================================
// SECTION: Summary
// ============================================================================

/// Serializable projection of a record, safe for logs and response bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationSummary {
    /// Check identifier.
    pub validation_id: String,
    /// Statement of what the check asserts.
    pub description: String,
    /// Whether an outcome has been recorded.
    pub has_run: bool,
    /// Recorded pass/fail flag; omitted when the check has not run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    /// Failure reason; omitted unless the check failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}
