//! HTML license page
//!
//! A self-contained page with a per-license summary followed by one section
//! per library, in manifest order.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use license_core::{escape_html, LicenseEntry};

const STYLE: &str = "body{font-family:sans-serif;margin:2em;line-height:1.4}\
section{border-top:1px solid #ccc;padding:0.5em 0}\
h2{font-size:1.1em;margin:0.2em 0}\
.license,.notice{color:#444}\
pre.notice{white-space:pre-wrap}";

/// Render the license page
pub fn render(entries: &[LicenseEntry], generated_at: DateTime<Utc>) -> String {
    let mut html = String::with_capacity(1024 + entries.len() * 512);

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<title>Open Source Licenses</title>\n");
    html.push_str(&format!("<style>{}</style>\n", STYLE));
    html.push_str("</head>\n<body>\n");
    html.push_str("<h1>Open Source Licenses</h1>\n");
    html.push_str(&format!(
        "<p>This software uses {} third-party librar{}. Generated {}.</p>\n",
        entries.len(),
        if entries.len() == 1 { "y" } else { "ies" },
        generated_at.format("%Y-%m-%d")
    ));

    // Summary by license
    let mut by_license: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
        let key = entry.normalized_license.as_deref().unwrap_or("unknown");
        *by_license.entry(key).or_default() += 1;
    }
    if !by_license.is_empty() {
        html.push_str("<ul class=\"summary\">\n");
        for (license, count) in &by_license {
            html.push_str(&format!(
                "<li><code>{}</code>: {}</li>\n",
                escape_html(license),
                count
            ));
        }
        html.push_str("</ul>\n");
    }

    for entry in entries {
        render_entry(&mut html, entry);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_entry(html: &mut String, entry: &LicenseEntry) {
    let anchor = format!("{}:{}", entry.artifact_id.group, entry.artifact_id.name);
    html.push_str(&format!("<section id=\"{}\">\n", escape_html(&anchor)));

    let name = escape_html(&entry.library_name);
    match &entry.url {
        Some(url) => html.push_str(&format!(
            "<h2><a href=\"{}\">{}</a></h2>\n",
            escape_html(url),
            name
        )),
        None => html.push_str(&format!("<h2>{}</h2>\n", name)),
    }

    if let Some(statement) = &entry.copyright_statement {
        html.push_str(&format!("<p class=\"copyright\">{}</p>\n", escape_html(statement)));
    }

    if let Some(license) = &entry.license {
        let license = escape_html(license);
        match &entry.license_url {
            Some(url) => html.push_str(&format!(
                "<p class=\"license\">License: <a href=\"{}\">{}</a></p>\n",
                escape_html(url),
                license
            )),
            None => html.push_str(&format!("<p class=\"license\">License: {}</p>\n", license)),
        }
    }

    if let Some(notice) = &entry.notice {
        html.push_str(&format!("<pre class=\"notice\">{}</pre>\n", escape_html(notice)));
    }

    html.push_str("</section>\n");
}
