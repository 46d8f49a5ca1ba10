// crates/mock-gate-config/src/mapping.rs
// ============================================================================
// Module: Endpoint Mapping Table
// Description: Parser for the endpoint-to-file TSV table.
// Purpose: Map endpoint keys onto response file names.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! The table is UTF-8 with one `endpoint<TAB>file` row per line. Blank lines
//! and `#` comments are skipped, as is an optional `endpoint<TAB>file` header.
//! Malformed rows and duplicate endpoints are rejected with their line
//! number. Lookup is exact-match on the endpoint key.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::MAX_CONFIG_FILE_SIZE;

// ============================================================================
// SECTION: Types
// ============================================================================

/// One endpoint row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingEntry {
    /// Endpoint key.
    pub endpoint: String,
    /// Response file name.
    pub file: String,
}

/// Parsed endpoint mapping table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EndpointMapping {
    /// Rows in file order.
    entries: Vec<MappingEntry>,
    /// Endpoint key to row index.
    index: BTreeMap<String, usize>,
}

/// Mapping table errors.
#[derive(Debug, Error)]
pub enum MappingError {
    /// I/O failure while reading the table.
    #[error("mapping io error: {0}")]
    Io(String),
    /// Table exceeds the size limit or is not UTF-8.
    #[error("invalid mapping file: {0}")]
    Invalid(String),
    /// A row is malformed.
    #[error("mapping line {line}: {message}")]
    Row {
        /// One-based line number.
        line: usize,
        /// Problem description.
        message: String,
    },
    /// An endpoint appears twice.
    #[error("mapping line {line}: duplicate endpoint {endpoint}")]
    DuplicateEndpoint {
        /// One-based line number of the second occurrence.
        line: usize,
        /// Repeated endpoint key.
        endpoint: String,
    },
}

// ============================================================================
// SECTION: Parsing
// ============================================================================

impl EndpointMapping {
    /// Loads the table from disk.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, MappingError> {
        let bytes = fs::read(path)
            .map_err(|err| MappingError::Io(format!("{}: {err}", path.display())))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(MappingError::Invalid("mapping file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| MappingError::Invalid("mapping file must be utf-8".to_string()))?;
        Self::parse(content)
    }

    /// Parses table text.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError`] for malformed rows or duplicate endpoints.
    pub fn parse(content: &str) -> Result<Self, MappingError> {
        let mut mapping = Self::default();
        for (offset, raw_line) in content.lines().enumerate() {
            let line = offset + 1;
            let text = raw_line.trim_end_matches('\r');
            if text.trim().is_empty() || text.trim_start().starts_with('#') {
                continue;
            }
            let columns: Vec<&str> = text.split('\t').map(str::trim).collect();
            let [endpoint, file] = columns.as_slice() else {
                return Err(MappingError::Row {
                    line,
                    message: format!("expected 2 tab-separated columns, found {}", columns.len()),
                });
            };
            if mapping.entries.is_empty() && *endpoint == "endpoint" && *file == "file" {
                continue;
            }
            if endpoint.is_empty() || file.is_empty() {
                return Err(MappingError::Row {
                    line,
                    message: "endpoint and file must be non-empty".to_string(),
                });
            }
            if mapping.index.contains_key(*endpoint) {
                return Err(MappingError::DuplicateEndpoint {
                    line,
                    endpoint: (*endpoint).to_string(),
                });
            }
            mapping.index.insert((*endpoint).to_string(), mapping.entries.len());
            mapping.entries.push(MappingEntry {
                endpoint: (*endpoint).to_string(),
                file: (*file).to_string(),
            });
        }
        Ok(mapping)
    }

    /// Returns the file mapped to `endpoint`.
    #[must_use]
    pub fn file_for(&self, endpoint: &str) -> Option<&str> {
        self.index.get(endpoint).map(|index| self.entries[*index].file.as_str())
    }

    /// Returns every row in file order.
    #[must_use]
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
