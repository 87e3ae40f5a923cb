//! JSON license list

use license_core::LicenseEntry;

/// Render payloads as a pretty-printed JSON array
pub fn render(entries: &[LicenseEntry]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(entries)
}
