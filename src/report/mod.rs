use serde::{Deserialize, Serialize};

/// One evolution-report record from the feed. Everything except `id` is
/// optional; absent fields render as `-` and never exclude a record on
/// their own.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Report {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub domain: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub gate_status: Option<String>,
    #[serde(default)]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub law_file: Option<String>,
    #[serde(default)]
    pub qspec_file: Option<String>,
    #[serde(default)]
    pub qevr_file: Option<String>,
    #[serde(default)]
    pub report_html: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Pass,
    Fail,
}

impl GateOutcome {
    pub fn label(self) -> &'static str {
        match self {
            GateOutcome::Pass => "passed",
            GateOutcome::Fail => "not passed",
        }
    }

    pub fn is_pass(self) -> bool {
        matches!(self, GateOutcome::Pass)
    }
}

impl Report {
    /// Single source of truth for pass/fail. An explicit `gate_status` of
    /// "pass" or "fail" is authoritative; the score-vs-threshold comparison
    /// only decides when the status field is absent or unrecognized. Both
    /// the filter engine and the badge renderer go through here.
    pub fn gate_outcome(&self) -> GateOutcome {
        match self.gate_status.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("pass") => GateOutcome::Pass,
            Some(s) if s.eq_ignore_ascii_case("fail") => GateOutcome::Fail,
            _ => match (self.overall_score, self.threshold) {
                (Some(score), Some(threshold)) if score >= threshold => GateOutcome::Pass,
                _ => GateOutcome::Fail,
            },
        }
    }

    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(t) if !t.is_empty() => t,
            _ => self.id.as_str(),
        }
    }

    pub fn score_badge(&self) -> String {
        format!(
            "{} / {}",
            format_score(self.overall_score),
            format_score(self.threshold)
        )
    }
}

pub fn format_score(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => "-".to_string(),
    }
}

/// Report artifact paths are long absolute paths on the generator host;
/// only the suffix from the last `SS/` segment is meaningful for display.
pub fn display_path(path: Option<&str>) -> String {
    let Some(path) = path else {
        return "-".to_string();
    };
    if path.is_empty() {
        return "-".to_string();
    }
    match path.rfind("SS/") {
        Some(pos) => path[pos..].to_string(),
        None => path.to_string(),
    }
}

/// The in-memory report list. Replaced wholesale on a successful load;
/// a failed load leaves the previous contents untouched.
#[derive(Clone, Debug, Default)]
pub struct ReportStore {
    reports: Vec<Report>,
}

impl ReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace(&mut self, reports: Vec<Report>) {
        self.reports = reports;
    }

    pub fn reports(&self) -> &[Report] {
        &self.reports
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}
