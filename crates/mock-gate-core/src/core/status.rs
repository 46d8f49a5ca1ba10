// crates/mock-gate-core/src/core/status.rs
// ============================================================================
// Module: Response Status Codes
// Description: HTTP status codes used by the adjudicator.
// Purpose: Keep the core free of HTTP framework dependencies.
// Dependencies: none
// ============================================================================

//! Status codes emitted by the adjudicator.

/// Successful file response.
pub const OK: u16 = 200;
/// Validation or format failure.
pub const BAD_REQUEST: u16 = 400;
/// No client certificate presented.
pub const UNAUTHORIZED: u16 = 401;
/// Client certificate presented but not authorized.
pub const FORBIDDEN: u16 = 403;
/// No file mapping or missing file.
pub const NOT_FOUND: u16 = 404;
/// Validator wiring defect.
pub const INTERNAL_SERVER_ERROR: u16 = 500;

/// Returns true for 2XX status codes.
#[must_use]
pub const fn is_success(status: u16) -> bool {
    status >= 200 && status < 300
}
