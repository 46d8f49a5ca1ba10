// crates/mock-gate-server/src/mime.rs
// ============================================================================
// Module: MIME Resolution
// Description: Content-Type lookup by response file extension.
// Purpose: Label served files, optionally with FHIR media types.
// Dependencies: none
// ============================================================================

//! Content-Type resolution for response files.

use std::path::Path;

/// Fallback for unknown extensions.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// Returns the Content-Type for `file_name`.
#[must_use]
pub fn content_type(file_name: &str, use_fhir_mime_types: bool) -> &'static str {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match extension.as_str() {
        "json" if use_fhir_mime_types => "application/fhir+json",
        "xml" if use_fhir_mime_types => "application/fhir+xml",
        "json" => "application/json",
        "xml" => "application/xml",
        "pdf" => "application/pdf",
        "html" | "htm" => "text/html",
        "txt" => "text/plain",
        "rtf" => "application/rtf",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "tif" | "tiff" => "image/tiff",
        _ => OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::OCTET_STREAM;
    use super::content_type;

    #[test]
    fn resolves_common_document_types() {
        assert_eq!(content_type("letter.PDF", false), "application/pdf");
        assert_eq!(content_type("page.htm", false), "text/html");
        assert_eq!(content_type("scan.tiff", false), "image/tiff");
        assert_eq!(content_type("archive.zip", false), OCTET_STREAM);
        assert_eq!(content_type("README", false), OCTET_STREAM);
    }

    #[test]
    fn fhir_types_apply_to_json_and_xml_only() {
        assert_eq!(content_type("bundle.json", true), "application/fhir+json");
        assert_eq!(content_type("bundle.xml", true), "application/fhir+xml");
        assert_eq!(content_type("bundle.json", false), "application/json");
        assert_eq!(content_type("letter.pdf", true), "application/pdf");
    }
}
