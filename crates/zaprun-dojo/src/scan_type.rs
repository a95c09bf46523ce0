//! Report file name to DefectDojo scan type mapping.

use std::path::Path;

/// Keyword found in a report file name, and the DefectDojo parser it selects.
///
/// Checked in order; the first keyword contained in the lower-cased file name
/// wins.
const SCAN_TYPES: &[(&str, &str)] = &[
    ("gitleaks", "Gitleaks Scan"),
    ("trivy", "Trivy Scan"),
    ("snyk", "Snyk Scan"),
    ("zap", "OWASP ZAP Scan"),
];

/// Scan type used when no keyword matches.
pub const GENERIC_SCAN_TYPE: &str = "Generic Scan";

/// Pick the DefectDojo scan type for a report based on its file name.
#[must_use]
pub fn determine_scan_type(path: &Path) -> &'static str {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    SCAN_TYPES
        .iter()
        .find(|(keyword, _)| file_name.contains(keyword))
        .map_or(GENERIC_SCAN_TYPE, |&(_, scan_type)| scan_type)
}
