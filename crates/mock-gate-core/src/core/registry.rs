// crates/mock-gate-core/src/core/registry.rs
// ============================================================================
// Module: Validation Registry
// Description: Ordered, request-scoped collection of named checks.
// Purpose: Own check registration, lookup, suppression, and summaries.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`ValidationRegistry`] is created fresh for every request and never
//! shared. Registration order is preserved. Identifiers are unique: a second
//! registration of the same id is a wiring defect and fails loudly with
//! [`RegistryError::DuplicateCheck`].
//!
//! Suppressed checks are still registered so lookups succeed, but outcome
//! writes to them are no-ops and they keep their "not run" defaults.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use thiserror::Error;

use crate::core::outcome::Outcome;
use crate::core::record::ValidationRecord;
use crate::core::record::ValidationSummary;

// ============================================================================
// SECTION: Suppression Policy
// ============================================================================

/// Operator policy for silencing check outcomes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SuppressionPolicy {
    /// No checks are suppressed.
    #[default]
    None,
    /// Every check is suppressed.
    All,
    /// Only the listed check identifiers are suppressed.
    Ids(BTreeSet<String>),
}

impl SuppressionPolicy {
    /// Builds an id-list policy from any iterator of identifiers.
    #[must_use]
    pub fn ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Ids(ids.into_iter().map(Into::into).collect())
    }

    /// Returns true when outcomes for `validation_id` must not be recorded.
    #[must_use]
    pub fn suppresses(&self, validation_id: &str) -> bool {
        match self {
            Self::None => false,
            Self::All => true,
            Self::Ids(ids) => ids.contains(validation_id),
        }
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Programming-contract errors raised by registry misuse.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A check with the same identifier is already registered.
    #[error("duplicate validationId: {0}")]
    DuplicateCheck(String),
    /// No check with the identifier has been registered.
    #[error("validationId not found: {0}")]
    UnknownCheck(String),
}

// ============================================================================
// SECTION: Registry
// ============================================================================

/// Ordered collection of checks for one request/response pair.
#[derive(Debug, Clone, Default)]
pub struct ValidationRegistry {
    /// Registered records in registration order.
    records: Vec<ValidationRecord>,
    /// Suppression policy captured at construction.
    suppression: SuppressionPolicy,
}

impl ValidationRegistry {
    /// Creates an empty registry with the given suppression policy.
    #[must_use]
    pub const fn new(suppression: SuppressionPolicy) -> Self {
        Self {
            records: Vec::new(),
            suppression,
        }
    }

    /// Registers a new check and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateCheck`] when the id is already present.
    pub fn register(
        &mut self,
        validation_id: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<&ValidationRecord, RegistryError> {
        let validation_id = validation_id.into();
        if self.position(&validation_id).is_some() {
            return Err(RegistryError::DuplicateCheck(validation_id));
        }
        self.records.push(ValidationRecord::new(validation_id, description.into()));
        let index = self.records.len() - 1;
        Ok(&self.records[index])
    }

    /// Finds a registered check by id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCheck`] when the id was never registered.
    pub fn find(&self, validation_id: &str) -> Result<&ValidationRecord, RegistryError> {
        self.position(validation_id)
            .map(|index| &self.records[index])
            .ok_or_else(|| RegistryError::UnknownCheck(validation_id.to_string()))
    }

    /// Records an outcome for a check, honoring the suppression policy.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCheck`] when the id was never registered.
    pub fn resolve(&mut self, validation_id: &str, outcome: Outcome) -> Result<(), RegistryError> {
        let index = self
            .position(validation_id)
            .ok_or_else(|| RegistryError::UnknownCheck(validation_id.to_string()))?;
        if self.suppression.suppresses(validation_id) {
            return Ok(());
        }
        self.records[index].apply(outcome);
        Ok(())
    }

    /// Records an explicit `(success, details)` pair for a check.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCheck`] when the id was never registered.
    pub fn set_outcome(
        &mut self,
        validation_id: &str,
        success: bool,
        details: Option<String>,
    ) -> Result<(), RegistryError> {
        let outcome = if success {
            Outcome::Pass
        } else {
            Outcome::Fail(details.unwrap_or_default())
        };
        self.resolve(validation_id, outcome)
    }

    /// Records a failure state: `None` or an empty string passes, any other
    /// string fails with that string as the details.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCheck`] when the id was never registered.
    pub fn set_failure_state(
        &mut self,
        validation_id: &str,
        failure: Option<impl Into<String>>,
    ) -> Result<(), RegistryError> {
        self.resolve(validation_id, Outcome::from_failure_state(failure))
    }

    /// Resolves a check, registering it first when it is absent.
    ///
    /// Used for checks whose outcome is only known once the response is
    /// final, where a missing registration must not lose the outcome.
    pub fn resolve_or_register(
        &mut self,
        validation_id: &str,
        description: &str,
        outcome: Outcome,
    ) {
        let index = self.position(validation_id).unwrap_or_else(|| {
            self.records.push(ValidationRecord::new(
                validation_id.to_string(),
                description.to_string(),
            ));
            self.records.len() - 1
        });
        if !self.suppression.suppresses(validation_id) {
            self.records[index].apply(outcome);
        }
    }

    /// Returns every record in registration order.
    #[must_use]
    pub fn list(&self) -> &[ValidationRecord] {
        &self.records
    }

    /// Returns serializable summaries of every record in registration order.
    #[must_use]
    pub fn list_summary(&self) -> Vec<ValidationSummary> {
        self.records.iter().map(ValidationRecord::summary).collect()
    }

    /// Returns true when any record other than `excluded` resolved to failure.
    #[must_use]
    pub fn has_failures_excluding(&self, excluded: &str) -> bool {
        self.records.iter().any(|record| record.validation_id() != excluded && record.is_failure())
    }

    /// Returns summaries of failed records, skipping `excluded`.
    #[must_use]
    pub fn failed_summaries_excluding(&self, excluded: &str) -> Vec<ValidationSummary> {
        self.records
            .iter()
            .filter(|record| record.validation_id() != excluded && record.is_failure())
            .map(ValidationRecord::summary)
            .collect()
    }

    /// Returns the suppression policy in effect.
    #[must_use]
    pub const fn suppression(&self) -> &SuppressionPolicy {
        &self.suppression
    }

    /// Returns the index of a registered id.
    fn position(&self, validation_id: &str) -> Option<usize> {
        self.records.iter().position(|record| record.validation_id() == validation_id)
    }
}
