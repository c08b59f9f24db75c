//! In-app report viewer. Linked reports are HTML documents; the overlay
//! shows them reduced to text. When the viewer cannot handle a link at all,
//! the caller opens it with the system opener instead.

use std::process::{Command, Stdio};

use regex::Regex;

use crate::feed::ReportLocation;

/// A loaded report document, reduced to something a text viewport can show.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PreviewDocument {
    pub title: Option<String>,
    pub lines: Vec<String>,
}

pub async fn fetch_document(
    client: &reqwest::Client,
    location: &ReportLocation,
) -> Result<PreviewDocument, String> {
    let body = match location {
        ReportLocation::Url(url) => {
            let resp = client
                .get(url.clone())
                .send()
                .await
                .map_err(|e| format!("failed to fetch report: {e}"))?;
            let status = resp.status();
            if !status.is_success() {
                return Err(format!("report returned HTTP {}", status.as_u16()));
            }
            resp.text()
                .await
                .map_err(|e| format!("failed to read report body: {e}"))?
        }
        ReportLocation::File(path) => tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("failed to read report '{}': {e}", path.display()))?,
    };
    Ok(document_from_html(&body))
}

pub fn document_from_html(html: &str) -> PreviewDocument {
    PreviewDocument {
        title: extract_title(html),
        lines: html_to_text(html),
    }
}

fn extract_title(html: &str) -> Option<String> {
    let re = Regex::new(r"(?is)<title[^>]*>(.*?)</title>").ok()?;
    let raw = re.captures(html).map(|cap| cap[1].to_string())?;
    let title = decode_entities(raw.trim());
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

/// Strip an HTML document down to display text: script/style subtrees and
/// comments dropped, block-level closers become line breaks, remaining tags
/// removed, common entities decoded, runs of blank lines collapsed.
pub fn html_to_text(html: &str) -> Vec<String> {
    let without_blocks = Regex::new(r"(?is)<(script|style)[^>]*>.*?</(script|style)>")
        .map(|re| re.replace_all(html, "").into_owned())
        .unwrap_or_else(|_| html.to_string());
    let without_comments = Regex::new(r"(?s)<!--.*?-->")
        .map(|re| re.replace_all(&without_blocks, "").into_owned())
        .unwrap_or(without_blocks);
    let with_breaks = Regex::new(r"(?i)<(br\s*/?|/p|/div|/li|/tr|/h[1-6]|/section|/article)>")
        .map(|re| re.replace_all(&without_comments, "\n").into_owned())
        .unwrap_or(without_comments);
    let without_tags = Regex::new(r"(?s)<[^>]*>")
        .map(|re| re.replace_all(&with_breaks, "").into_owned())
        .unwrap_or(with_breaks);

    let mut lines = Vec::new();
    let mut blank_run = 0usize;
    for raw in without_tags.lines() {
        let line = decode_entities(raw.trim_end());
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 || lines.is_empty() {
                continue;
            }
            lines.push(String::new());
        } else {
            blank_run = 0;
            lines.push(line);
        }
    }
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines
}

fn decode_entities(value: &str) -> String {
    value
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&middot;", "\u{b7}")
        .replace("&amp;", "&")
}

/// Hand a report link to the platform opener in a detached process. Used
/// when the in-app viewer is disabled or cannot resolve the link.
pub fn open_external(target: &str) -> Result<(), String> {
    #[cfg(target_os = "macos")]
    let (program, args) = ("open", vec![target]);
    #[cfg(target_os = "windows")]
    let (program, args) = ("cmd", vec!["/C", "start", "", target]);
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let (program, args) = ("xdg-open", vec![target]);

    Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .map_err(|e| format!("failed to launch {program}: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_keeps_text() {
        let html = "<html><head><title>Billing r1</title>\
                    <style>body { color: red; }</style></head>\
                    <body><h1>Gate result</h1><p>score 0.92</p>\
                    <script>alert(1)</script></body></html>";
        let doc = document_from_html(html);
        assert_eq!(doc.title.as_deref(), Some("Billing r1"));
        assert!(doc.lines.iter().any(|l| l.contains("Gate result")));
        assert!(doc.lines.iter().any(|l| l.contains("score 0.92")));
        assert!(!doc.lines.iter().any(|l| l.contains("alert(1)")));
        assert!(!doc.lines.iter().any(|l| l.contains("color: red")));
    }

    #[test]
    fn decodes_common_entities() {
        let doc = document_from_html("<p>a &amp; b &lt;c&gt;</p>");
        assert_eq!(doc.lines, vec!["a & b <c>"]);
    }

    #[test]
    fn collapses_blank_runs() {
        let doc = document_from_html("<p>one</p>\n\n\n\n<p>two</p>");
        assert_eq!(doc.lines, vec!["one", "", "two"]);
    }

    #[test]
    fn untitled_documents_have_no_title() {
        assert_eq!(document_from_html("<p>body only</p>").title, None);
        assert_eq!(document_from_html("<title>  </title>").title, None);
    }
}
