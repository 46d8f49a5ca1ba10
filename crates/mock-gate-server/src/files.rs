// crates/mock-gate-server/src/files.rs
// ============================================================================
// Module: Directory File Resolver
// Description: Endpoint mapping backed by a responses directory.
// Purpose: Resolve endpoint keys to response files on disk.
// Dependencies: mock-gate-config, mock-gate-core
// ============================================================================

//! ## Overview
//! Pairs the parsed endpoint mapping table with the responses directory.
//! Mapped file names must be plain names: anything with a path separator or
//! a `..` component is treated as missing so the mapping cannot reach
//! outside the directory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;

use mock_gate_config::EndpointMapping;
use mock_gate_core::FileResolver;
use mock_gate_core::ResolvedFile;

// ============================================================================
// SECTION: Resolver
// ============================================================================

/// File resolver over a mapping table and a responses directory.
#[derive(Debug, Clone)]
pub struct DirectoryFileResolver {
    /// Endpoint-to-file table.
    mapping: EndpointMapping,
    /// Directory holding response files.
    root: PathBuf,
}

impl DirectoryFileResolver {
    /// Creates a resolver.
    #[must_use]
    pub fn new(mapping: EndpointMapping, root: impl Into<PathBuf>) -> Self {
        Self {
            mapping,
            root: root.into(),
        }
    }

    /// Returns the responses directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl FileResolver for DirectoryFileResolver {
    fn file_for_endpoint(&self, endpoint: &str) -> Option<String> {
        self.mapping.file_for(endpoint).map(str::to_string)
    }

    fn resolve_file(&self, file_name: &str) -> Option<ResolvedFile> {
        if !is_plain_file_name(file_name) {
            return None;
        }
        let path = self.root.join(file_name);
        path.is_file().then(|| ResolvedFile {
            file_name: file_name.to_string(),
            path,
        })
    }
}

/// Returns true for a single, non-traversing file name.
fn is_plain_file_name(file_name: &str) -> bool {
    !file_name.is_empty()
        && file_name != "."
        && !file_name.contains("..")
        && !file_name.contains(['/', '\\'])
}

// ============================================================================
// SECTION: Tests
// ============================================================================
