//! Draft upload stub. The endpoint is an unconfigured placeholder: the
//! confirmation is shown before the request resolves, and the network
//! outcome is only ever logged. This is a reserved integration point, not a
//! finished feature.

use std::path::{Path, PathBuf};

use log::{error, info};
use thiserror::Error;

use crate::report::Report;

/// Extensions the draft picker accepts by default.
pub const DEFAULT_ALLOWED_EXTENSIONS: &[&str] = &["txt", "md", "json", "csv", "log", "yaml", "yml"];

/// Placeholder endpoint used when none is configured.
pub const PLACEHOLDER_ENDPOINT: &str = "http://localhost:0/api/evolution/drafts";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("failed to read draft '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("upload request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upload endpoint returned HTTP {0}")]
    Status(u16),
}

/// The record an upload was armed for. Only the correlation fields travel
/// with the draft.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadTarget {
    pub report_id: String,
    pub domain: String,
    pub title: String,
}

impl UploadTarget {
    pub fn from_report(report: &Report) -> Self {
        Self {
            report_id: report.id.clone(),
            domain: report.domain.clone().unwrap_or_default(),
            title: report.display_title().to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadRequest {
    pub endpoint: String,
    pub file: PathBuf,
    pub target: UploadTarget,
}

pub fn extension_allowed(path: &Path, allowed: &[String]) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => allowed.iter().any(|a| a.eq_ignore_ascii_case(ext)),
        None => false,
    }
}

/// The confirmation shown the moment a draft is chosen, before any network
/// activity.
pub fn confirmation_line(request: &UploadRequest) -> String {
    let file = request
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| request.file.display().to_string());
    format!(
        "uploading draft '{}' for {} ({})",
        file, request.target.report_id, request.target.title
    )
}

async fn send_draft(client: &reqwest::Client, request: &UploadRequest) -> Result<(), UploadError> {
    let bytes = tokio::fs::read(&request.file)
        .await
        .map_err(|source| UploadError::Io {
            path: request.file.display().to_string(),
            source,
        })?;
    let file_name = request
        .file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "draft".to_string());

    let form = reqwest::multipart::Form::new()
        .part(
            "file",
            reqwest::multipart::Part::bytes(bytes).file_name(file_name),
        )
        .text("report_id", request.target.report_id.clone())
        .text("domain", request.target.domain.clone())
        .text("title", request.target.title.clone());

    let resp = client
        .post(&request.endpoint)
        .multipart(form)
        .send()
        .await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(UploadError::Status(status.as_u16()));
    }
    if let Ok(body) = resp.text().await {
        if !body.trim().is_empty() {
            info!("upload endpoint responded: {}", body.trim());
        }
    }
    Ok(())
}

/// Fire-and-forget POST. The caller has already shown the confirmation;
/// whatever happens on the wire ends up in the log and nowhere else.
pub fn spawn_upload(
    handle: &tokio::runtime::Handle,
    client: reqwest::Client,
    request: UploadRequest,
) {
    handle.spawn(async move {
        match send_draft(&client, &request).await {
            Ok(()) => info!(
                "uploaded draft '{}' for report {}",
                request.file.display(),
                request.target.report_id
            ),
            // Expected while the endpoint is a placeholder.
            Err(e) => error!(
                "draft upload for report {} failed: {e}",
                request.target.report_id
            ),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allowed() -> Vec<String> {
        DEFAULT_ALLOWED_EXTENSIONS
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    #[test]
    fn allowlist_is_case_insensitive_and_requires_extension() {
        assert!(extension_allowed(Path::new("draft.txt"), &allowed()));
        assert!(extension_allowed(Path::new("draft.YAML"), &allowed()));
        assert!(!extension_allowed(Path::new("draft.exe"), &allowed()));
        assert!(!extension_allowed(Path::new("draft"), &allowed()));
    }

    #[test]
    fn target_carries_correlation_fields() {
        let report = Report {
            id: "v2".to_string(),
            domain: Some("auth".to_string()),
            ..Report::default()
        };
        let target = UploadTarget::from_report(&report);
        assert_eq!(target.report_id, "v2");
        assert_eq!(target.domain, "auth");
        // Title falls back to the id when the record has none.
        assert_eq!(target.title, "v2");
    }

    #[test]
    fn confirmation_mentions_file_and_target() {
        let request = UploadRequest {
            endpoint: PLACEHOLDER_ENDPOINT.to_string(),
            file: PathBuf::from("/tmp/drafts/next.md"),
            target: UploadTarget {
                report_id: "v1".to_string(),
                domain: "billing".to_string(),
                title: "Billing evolution".to_string(),
            },
        };
        let line = confirmation_line(&request);
        assert!(line.contains("next.md"));
        assert!(line.contains("v1"));
        assert!(line.contains("Billing evolution"));
    }
}
