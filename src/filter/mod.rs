use crate::report::Report;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum GateFilter {
    #[default]
    All,
    Pass,
    Fail,
}

impl GateFilter {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "" | "all" => Some(Self::All),
            "pass" | "passed" => Some(Self::Pass),
            "fail" | "failed" => Some(Self::Fail),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Pass => "pass",
            Self::Fail => "fail",
        }
    }

    /// Cycle order for the gate control: all -> pass -> fail -> all.
    pub fn next(self) -> Self {
        match self {
            Self::All => Self::Pass,
            Self::Pass => Self::Fail,
            Self::Fail => Self::All,
        }
    }
}

/// Current filter control state. Derived values only; resetting restores
/// `FilterCriteria::default()`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub gate: GateFilter,
    pub min_score: f64,
}

impl FilterCriteria {
    pub fn is_default(&self) -> bool {
        self.query.is_empty() && self.gate == GateFilter::All && self.min_score == 0.0
    }

    /// Total predicate over a single record. Absent optional fields are
    /// treated as the most permissive value, so this never panics on a
    /// sparse record.
    pub fn matches(&self, report: &Report) -> bool {
        let query = self.query.trim().to_lowercase();
        if !query.is_empty() {
            let haystacks = [
                report.domain.as_deref().unwrap_or(""),
                report.title.as_deref().unwrap_or(""),
                report.id.as_str(),
            ];
            if !haystacks.iter().any(|h| h.to_lowercase().contains(&query)) {
                return false;
            }
        }

        match self.gate {
            GateFilter::All => {}
            GateFilter::Pass => {
                if !report.gate_outcome().is_pass() {
                    return false;
                }
            }
            GateFilter::Fail => {
                if report.gate_outcome().is_pass() {
                    return false;
                }
            }
        }

        if let Some(score) = report.overall_score {
            if score < self.min_score {
                return false;
            }
        }

        true
    }

    /// Indices into `reports` of the records matching the criteria, in
    /// original order. Rendering works from the indices so the filtered
    /// view is always an order-preserving subset of the store.
    pub fn apply(&self, reports: &[Report]) -> Vec<usize> {
        reports
            .iter()
            .enumerate()
            .filter(|(_, r)| self.matches(r))
            .map(|(i, _)| i)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed() -> Vec<Report> {
        vec![
            Report {
                id: "v1".to_string(),
                domain: Some("billing".to_string()),
                gate_status: Some("pass".to_string()),
                overall_score: Some(0.92),
                threshold: Some(0.8),
                report_html: Some("r1.html".to_string()),
                ..Report::default()
            },
            Report {
                id: "v2".to_string(),
                domain: Some("auth".to_string()),
                gate_status: Some("fail".to_string()),
                overall_score: Some(0.5),
                threshold: Some(0.8),
                ..Report::default()
            },
        ]
    }

    #[test]
    fn default_criteria_match_everything() {
        let reports = feed();
        assert_eq!(FilterCriteria::default().apply(&reports), vec![0, 1]);
    }

    #[test]
    fn gate_fail_keeps_only_failing_records() {
        let reports = feed();
        let criteria = FilterCriteria {
            gate: GateFilter::Fail,
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&reports), vec![1]);
    }

    #[test]
    fn min_score_excludes_scored_records_below_it() {
        let reports = feed();
        let criteria = FilterCriteria {
            min_score: 0.6,
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&reports), vec![0]);
    }

    #[test]
    fn unscored_records_survive_min_score() {
        let reports = vec![Report {
            id: "v3".to_string(),
            ..Report::default()
        }];
        let criteria = FilterCriteria {
            min_score: 0.9,
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&reports), vec![0]);
    }

    #[test]
    fn query_matches_domain_title_and_id() {
        let mut reports = feed();
        reports[1].title = Some("Billing rework".to_string());

        let criteria = FilterCriteria {
            query: "bill".to_string(),
            ..FilterCriteria::default()
        };
        // v1 by domain, v2 by title.
        assert_eq!(criteria.apply(&reports), vec![0, 1]);

        let criteria = FilterCriteria {
            query: "V2".to_string(),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.apply(&reports), vec![1]);
    }

    #[test]
    fn filtering_is_idempotent_and_order_preserving() {
        let reports = feed();
        let criteria = FilterCriteria {
            query: String::new(),
            gate: GateFilter::All,
            min_score: 0.0,
        };
        let first = criteria.apply(&reports);
        let second = criteria.apply(&reports);
        assert_eq!(first, second);
        assert!(first.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn filter_and_badge_agree_on_pass_fail() {
        let reports = feed();
        let pass = FilterCriteria {
            gate: GateFilter::Pass,
            ..FilterCriteria::default()
        };
        for idx in pass.apply(&reports) {
            assert!(reports[idx].gate_outcome().is_pass());
        }
        let fail = FilterCriteria {
            gate: GateFilter::Fail,
            ..FilterCriteria::default()
        };
        for idx in fail.apply(&reports) {
            assert!(!reports[idx].gate_outcome().is_pass());
        }
    }
}
