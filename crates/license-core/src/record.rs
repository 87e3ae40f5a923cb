//! License metadata for one dependency.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::identity::ArtifactId;

pub const PLACEHOLDER_NAME: &str = "#NAME#";
pub const PLACEHOLDER_COPYRIGHT_HOLDER: &str = "#COPYRIGHT_HOLDER#";
pub const PLACEHOLDER_YEAR: &str = "#YEAR#";
pub const PLACEHOLDER_LICENSE: &str = "#LICENSE#";
pub const PLACEHOLDER_LICENSE_URL: &str = "#LICENSEURL#";
pub const PLACEHOLDER_URL: &str = "#URL#";

const PLACEHOLDERS: &[&str] = &[
    PLACEHOLDER_NAME,
    PLACEHOLDER_COPYRIGHT_HOLDER,
    PLACEHOLDER_YEAR,
    PLACEHOLDER_LICENSE,
    PLACEHOLDER_LICENSE_URL,
    PLACEHOLDER_URL,
];

/// True if `value` is one of the "needs human input" tokens written into
/// freshly appended manifest entries.
pub fn is_placeholder(value: &str) -> bool {
    PLACEHOLDERS.contains(&value.trim())
}

/// A field's value if it carries real information: not blank, not a placeholder.
fn filled(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty() && !is_placeholder(v))
}

/// Field a record needs before it may appear in a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingField {
    License,
    CopyrightHolder,
    Year,
}

impl MissingField {
    pub fn placeholder(&self) -> &'static str {
        match self {
            MissingField::License => PLACEHOLDER_LICENSE,
            MissingField::CopyrightHolder => PLACEHOLDER_COPYRIGHT_HOLDER,
            MissingField::Year => PLACEHOLDER_YEAR,
        }
    }
}

/// License metadata of a single library, from the manifest or from resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LibraryRecord {
    /// Sole identity key
    pub artifact_id: ArtifactId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub copyright_holder: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,

    /// Excluded from reports and from the sufficiency check
    #[serde(default)]
    pub skip: bool,

    /// Local file of the resolved artifact (informational)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<PathBuf>,
}

impl LibraryRecord {
    /// Empty record for `artifact_id`.
    pub fn new(artifact_id: ArtifactId) -> Self {
        Self {
            artifact_id,
            library_name: None,
            copyright_holder: None,
            year: None,
            license: None,
            license_url: None,
            url: None,
            notice: None,
            skip: false,
            filename: None,
        }
    }

    /// Display name: the explicit name, else the artifact name.
    pub fn display_name(&self) -> &str {
        filled(&self.library_name).unwrap_or(&self.artifact_id.name)
    }

    /// HTML-safe form of [`display_name`](Self::display_name).
    pub fn escaped_name(&self) -> String {
        escape_html(self.display_name())
    }

    pub fn license_value(&self) -> Option<&str> {
        filled(&self.license)
    }

    pub fn license_url_value(&self) -> Option<&str> {
        filled(&self.license_url)
    }

    pub fn url_value(&self) -> Option<&str> {
        filled(&self.url)
    }

    pub fn copyright_holder_value(&self) -> Option<&str> {
        filled(&self.copyright_holder)
    }

    pub fn year_value(&self) -> Option<&str> {
        filled(&self.year)
    }

    pub fn notice_value(&self) -> Option<&str> {
        filled(&self.notice)
    }

    /// Synthesized attribution line. A holder without a year still yields
    /// a statement; a year without a holder does not.
    pub fn copyright_statement(&self) -> Option<String> {
        let holder = self.copyright_holder_value()?;
        Some(match self.year_value() {
            Some(year) => format!("Copyright © {} {}. All rights reserved.", year, holder),
            None => format!("Copyright © {}. All rights reserved.", holder),
        })
    }

    /// Grouping key for the license, see [`normalize_license`].
    pub fn normalized_license(&self) -> Option<String> {
        self.license_value().map(normalize_license)
    }

    /// Fields that keep this record out of a report, empty when sufficient.
    pub fn missing_fields(&self) -> Vec<MissingField> {
        let mut missing = Vec::new();
        if self.license_value().is_none() {
            missing.push(MissingField::License);
        }
        if self.copyright_statement().is_none() {
            missing.push(MissingField::CopyrightHolder);
            if self.year_value().is_none() {
                missing.push(MissingField::Year);
            }
        }
        missing
    }

    /// License present and a copyright statement can be synthesized.
    pub fn is_sufficient(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// Map a free-form license name to a stable lower-case key.
///
/// Common spellings collapse onto SPDX-like identifiers; anything else is
/// lower-cased with whitespace runs replaced by `-`.
pub fn normalize_license(license: &str) -> String {
    let key = license
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let normalized = match key.as_str() {
        "apache 2" | "apache 2.0" | "apache-2.0" | "apache2" | "apache license 2.0"
        | "apache license, version 2.0" | "apache license version 2.0"
        | "the apache license, version 2.0" | "the apache software license, version 2.0"
        | "asl 2.0" | "asl2" => "apache-2.0",
        "mit" | "mit license" | "the mit license" | "the mit license (mit)" | "expat" => "mit",
        "bsd 3-clause" | "bsd-3-clause" | "bsd 3-clause license" | "the bsd 3-clause license"
        | "new bsd license" | "modified bsd license" | "revised bsd license" => "bsd-3-clause",
        "bsd 2-clause" | "bsd-2-clause" | "bsd 2-clause license" | "the bsd 2-clause license"
        | "simplified bsd license" | "freebsd license" => "bsd-2-clause",
        "isc" | "isc license" => "isc",
        "epl-1.0" | "epl 1.0" | "eclipse public license 1.0"
        | "eclipse public license - v 1.0" => "epl-1.0",
        "epl-2.0" | "epl 2.0" | "eclipse public license 2.0"
        | "eclipse public license - v 2.0" => "epl-2.0",
        "lgpl-2.1" | "lgpl 2.1" | "gnu lesser general public license, version 2.1" => "lgpl-2.1",
        "gpl-2.0" | "gpl 2.0" | "gnu general public license, version 2" => "gpl-2.0",
        "gpl-3.0" | "gpl 3.0" | "gnu general public license, version 3" => "gpl-3.0",
        "mpl-2.0" | "mpl 2.0" | "mozilla public license 2.0"
        | "mozilla public license, version 2.0" => "mpl-2.0",
        "cc0" | "cc0-1.0" | "cc0 1.0 universal" => "cc0-1.0",
        other => return other.replace(' ', "-"),
    };
    normalized.to_string()
}

/// Escape text for inclusion in HTML element content or attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
