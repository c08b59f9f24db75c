//! One-shot feed loading. The feed is a JSON array of report records served
//! from a URL or written to a local file by the report generator.

use std::path::{Path, PathBuf};

use chrono::Utc;
use thiserror::Error;

use crate::report::Report;

#[derive(Debug, Error)]
pub enum FeedError {
    #[error("feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("feed returned HTTP {0}")]
    Status(u16),
    #[error("failed to read feed '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("feed is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where the feed document lives. Anything that parses as an http(s) URL is
/// fetched; everything else is treated as a local path.
#[derive(Clone, Debug)]
pub enum FeedSource {
    Url(reqwest::Url),
    File(PathBuf),
}

/// A resolved location for one report document linked from a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReportLocation {
    Url(reqwest::Url),
    File(PathBuf),
}

impl FeedSource {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            if let Ok(url) = reqwest::Url::parse(raw) {
                return FeedSource::Url(url);
            }
        }
        FeedSource::File(PathBuf::from(raw))
    }

    pub fn describe(&self) -> String {
        match self {
            FeedSource::Url(url) => url.to_string(),
            FeedSource::File(path) => path.display().to_string(),
        }
    }

    /// Resolve a record's `report_html` against the feed location, the way
    /// a page resolves a relative link against its own URL. Returns `None`
    /// for schemes the in-app viewer cannot fetch; the caller falls back to
    /// the system opener.
    pub fn resolve_report(&self, report_html: &str) -> Option<ReportLocation> {
        let target = report_html.trim();
        if target.is_empty() {
            return None;
        }
        if let Ok(url) = reqwest::Url::parse(target) {
            return match url.scheme() {
                "http" | "https" => Some(ReportLocation::Url(url)),
                "file" => url.to_file_path().ok().map(ReportLocation::File),
                _ => None,
            };
        }
        match self {
            FeedSource::Url(base) => base.join(target).ok().map(ReportLocation::Url),
            FeedSource::File(path) => {
                let dir = path.parent().unwrap_or_else(|| Path::new("."));
                Some(ReportLocation::File(dir.join(target)))
            }
        }
    }
}

/// Parse the feed body. A payload that is valid JSON but not an array loads
/// as the empty list, matching the feed contract.
pub fn parse_reports(body: &str) -> Result<Vec<Report>, serde_json::Error> {
    let value: serde_json::Value = serde_json::from_str(body)?;
    if !value.is_array() {
        return Ok(Vec::new());
    }
    serde_json::from_value(value)
}

/// Fetch the feed once. HTTP requests carry a cache-busting `_` parameter so
/// intermediate caches never serve a stale listing.
pub async fn load_reports(
    client: &reqwest::Client,
    source: &FeedSource,
) -> Result<Vec<Report>, FeedError> {
    let body = match source {
        FeedSource::Url(url) => {
            let mut url = url.clone();
            url.query_pairs_mut()
                .append_pair("_", &Utc::now().timestamp_millis().to_string());
            let resp = client.get(url).send().await?;
            let status = resp.status();
            if !status.is_success() {
                return Err(FeedError::Status(status.as_u16()));
            }
            resp.text().await?
        }
        FeedSource::File(path) => {
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| FeedError::Io {
                    path: path.display().to_string(),
                    source,
                })?
        }
    };
    Ok(parse_reports(&body)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn source_classifies_urls_and_paths() {
        assert!(matches!(
            FeedSource::parse("https://atlas.example/data/reports.json"),
            FeedSource::Url(_)
        ));
        assert!(matches!(
            FeedSource::parse("data/reports.json"),
            FeedSource::File(_)
        ));
        // A scheme-less host string is still a path, not a URL.
        assert!(matches!(
            FeedSource::parse("atlas.example/reports.json"),
            FeedSource::File(_)
        ));
    }

    #[test]
    fn parse_accepts_array_payloads() {
        let reports =
            parse_reports(r#"[{"id":"v1","domain":"billing"},{"id":"v2"}]"#).unwrap();
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].domain.as_deref(), Some("billing"));
    }

    #[test]
    fn parse_treats_non_array_payload_as_empty() {
        assert!(parse_reports(r#"{"reports":[]}"#).unwrap().is_empty());
        assert!(parse_reports("42").unwrap().is_empty());
    }

    #[test]
    fn parse_rejects_malformed_json() {
        assert!(parse_reports("[{").is_err());
    }

    #[test]
    fn relative_reports_resolve_against_the_feed() {
        let feed = FeedSource::parse("https://atlas.example/data/reports.json");
        assert_eq!(
            feed.resolve_report("reports/r1.html"),
            Some(ReportLocation::Url(
                reqwest::Url::parse("https://atlas.example/data/reports/r1.html").unwrap()
            ))
        );

        let feed = FeedSource::parse("/srv/atlas/reports.json");
        assert_eq!(
            feed.resolve_report("reports/r1.html"),
            Some(ReportLocation::File(PathBuf::from(
                "/srv/atlas/reports/r1.html"
            )))
        );
    }

    #[test]
    fn absolute_report_urls_bypass_the_feed_base() {
        let feed = FeedSource::parse("/srv/atlas/reports.json");
        assert_eq!(
            feed.resolve_report("https://cdn.example/r1.html"),
            Some(ReportLocation::Url(
                reqwest::Url::parse("https://cdn.example/r1.html").unwrap()
            ))
        );
        // Unsupported scheme: the caller must fall back to the system opener.
        assert_eq!(feed.resolve_report("mailto:ops@example.com"), None);
    }

    #[tokio::test]
    async fn file_feed_loads_and_replaces_nothing_on_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"[{{"id":"v1"}}]"#).unwrap();

        let client = reqwest::Client::new();
        let source = FeedSource::File(file.path().to_path_buf());
        let reports = load_reports(&client, &source).await.unwrap();
        assert_eq!(reports.len(), 1);

        let missing = FeedSource::File(PathBuf::from("/nonexistent/reports.json"));
        let err = load_reports(&client, &missing).await.unwrap_err();
        assert!(matches!(err, FeedError::Io { .. }));
    }
}
