pub mod report;

use serde::Serialize;

use crate::report::{display_path, format_score, Report};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
    Html,
}

impl OutputFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "text" | "txt" => Some(Self::Text),
            "json" => Some(Self::Json),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }
}

pub fn infer_format_from_path(path: &str) -> Option<OutputFormat> {
    let lower = path.trim().to_lowercase();
    if lower.ends_with(".json") {
        return Some(OutputFormat::Json);
    }
    if lower.ends_with(".html") || lower.ends_with(".htm") {
        return Some(OutputFormat::Html);
    }
    if lower.ends_with(".txt") {
        return Some(OutputFormat::Text);
    }
    None
}

/// One rendered card, ready for any output format. Paths are already
/// truncated for display and scores formatted; escaping is left to the
/// individual renderers.
#[derive(Clone, Debug, Serialize)]
pub struct CardRecord {
    pub id: String,
    pub title: String,
    pub domain: String,
    pub updated_at: String,
    pub gate_passed: bool,
    pub gate_label: String,
    pub score: String,
    pub threshold: String,
    pub law_file: String,
    pub qspec_file: String,
    pub qevr_file: String,
    pub report_html: Option<String>,
}

pub fn build_records(reports: &[&Report]) -> Vec<CardRecord> {
    reports
        .iter()
        .map(|r| {
            let outcome = r.gate_outcome();
            CardRecord {
                id: r.id.clone(),
                title: r.display_title().to_string(),
                domain: r.domain.clone().unwrap_or_else(|| "-".to_string()),
                updated_at: r.updated_at.clone().unwrap_or_else(|| "-".to_string()),
                gate_passed: outcome.is_pass(),
                gate_label: outcome.label().to_string(),
                score: format_score(r.overall_score),
                threshold: format_score(r.threshold),
                law_file: display_path(r.law_file.as_deref()),
                qspec_file: display_path(r.qspec_file.as_deref()),
                qevr_file: display_path(r.qevr_file.as_deref()),
                report_html: r.report_html.clone(),
            }
        })
        .collect()
}

pub fn render_text(records: &[CardRecord]) -> Vec<u8> {
    let mut out = String::new();
    for r in records {
        out.push_str(&format!("{} [{}]\n", r.title, r.gate_label));
        out.push_str(&format!(
            "  domain: {}  version: {}  updated: {}\n",
            r.domain, r.id, r.updated_at
        ));
        out.push_str(&format!("  score: {} / {}\n", r.score, r.threshold));
        out.push_str(&format!(
            "  law: {}  qspec: {}  qevr: {}\n",
            r.law_file, r.qspec_file, r.qevr_file
        ));
        if let Some(url) = r.report_html.as_deref() {
            out.push_str(&format!("  report: {url}\n"));
        }
        out.push('\n');
    }
    out.into_bytes()
}

pub fn render_json(records: &[CardRecord]) -> Vec<u8> {
    serde_json::to_vec_pretty(records).unwrap_or_else(|_| b"[]\n".to_vec())
}

/// Feed content is untrusted; everything interpolated into HTML goes
/// through here first.
pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

pub fn render_html(records: &[CardRecord]) -> Vec<u8> {
    report::render_html(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Report;

    #[test]
    fn format_parsing_and_inference() {
        assert_eq!(OutputFormat::parse("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("bogus"), None);
        assert_eq!(
            infer_format_from_path("cards.html"),
            Some(OutputFormat::Html)
        );
        assert_eq!(infer_format_from_path("cards.dat"), None);
    }

    #[test]
    fn records_carry_display_values() {
        let report = Report {
            id: "v1".to_string(),
            law_file: Some("/ci/SS/billing/law.yml".to_string()),
            overall_score: Some(0.92),
            threshold: Some(0.8),
            gate_status: Some("pass".to_string()),
            ..Report::default()
        };
        let records = build_records(&[&report]);
        assert_eq!(records[0].title, "v1");
        assert_eq!(records[0].law_file, "SS/billing/law.yml");
        assert_eq!(records[0].score, "0.92");
        assert_eq!(records[0].qevr_file, "-");
        assert!(records[0].gate_passed);
    }

    #[test]
    fn escape_html_neutralizes_markup() {
        assert_eq!(
            escape_html("<img src=x onerror=alert(1)>"),
            "&lt;img src=x onerror=alert(1)&gt;"
        );
        assert_eq!(escape_html(r#"a"b'c&d"#), "a&quot;b&#39;c&amp;d");
    }
}
