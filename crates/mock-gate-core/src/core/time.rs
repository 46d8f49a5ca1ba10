// crates/mock-gate-core/src/core/time.rs
// ============================================================================
// Module: Clock
// Description: Injectable source of the current Unix time.
// Purpose: Make time-dependent claim checks deterministic under test.
// Dependencies: none
// ============================================================================

//! ## Overview
//! Claim validators never read the system clock directly; they ask a
//! [`Clock`]. Production wiring uses [`SystemClock`], tests use [`FixedClock`].

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::SystemTime;
use std::time::UNIX_EPOCH;

// ============================================================================
// SECTION: Clock
// ============================================================================

/// Source of the current time in whole Unix seconds.
pub trait Clock: Send + Sync {
    /// Returns the current Unix time in seconds.
    fn now_unix_seconds(&self) -> i64;
}

/// Clock backed by the system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_unix_seconds(&self) -> i64 {
        let secs = SystemTime::now().duration_since(UNIX_EPOCH).unwrap_or_default().as_secs();
        i64::try_from(secs).unwrap_or(i64::MAX)
    }
}

/// Clock frozen at a fixed instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_unix_seconds(&self) -> i64 {
        self.0
    }
}
