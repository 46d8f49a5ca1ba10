// crates/mock-gate-core/src/runtime/mod.rs
// ============================================================================
// Module: Mock Gate Runtime
// Description: Request adjudication and structured completion logging.
// Purpose: Group the per-request pipeline and its log entry type.
// Dependencies: crate::core, crate::interfaces, crate::validators
// ============================================================================

//! Runtime pipeline for adjudicating requests.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod adjudicator;
pub mod log;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use adjudicator::Adjudication;
pub use adjudicator::AdjudicationError;
pub use adjudicator::Adjudicator;
pub use adjudicator::AdjudicatorConfig;
pub use adjudicator::IncomingRequest;
pub use adjudicator::Verdict;
pub use log::RequestLogEntry;
