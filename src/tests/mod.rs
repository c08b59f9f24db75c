use std::io::Write;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::feed::{self, FeedSource};
use crate::filter::{FilterCriteria, GateFilter};
use crate::report::Report;
use crate::ui::app::{AppOptions, DashboardApp, LoadState, Mode};

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

const SCENARIO_FEED: &str = r#"[
  {"id":"v1","domain":"billing","gate_status":"pass","overall_score":0.92,"threshold":0.8,"report_html":"r1.html"},
  {"id":"v2","domain":"auth","gate_status":"fail","overall_score":0.5,"threshold":0.8}
]"#;

#[test]
fn feed_scenario_filters_as_expected() {
    let reports = feed::parse_reports(SCENARIO_FEED).unwrap();
    assert_eq!(reports.len(), 2);

    let fail_only = FilterCriteria {
        gate: GateFilter::Fail,
        ..FilterCriteria::default()
    };
    let hits = fail_only.apply(&reports);
    assert_eq!(hits.len(), 1);
    assert_eq!(reports[hits[0]].id, "v2");

    let scored = FilterCriteria {
        gate: GateFilter::All,
        min_score: 0.6,
        ..FilterCriteria::default()
    };
    let hits = scored.apply(&reports);
    assert_eq!(hits.len(), 1);
    assert_eq!(reports[hits[0]].id, "v1");
}

#[test]
fn filtered_view_is_an_ordered_subset_for_any_criteria() {
    let reports: Vec<Report> = (0..20)
        .map(|i| Report {
            id: format!("v{i}"),
            domain: Some(if i % 2 == 0 { "billing" } else { "auth" }.to_string()),
            gate_status: Some(if i % 3 == 0 { "pass" } else { "fail" }.to_string()),
            overall_score: if i % 5 == 0 { None } else { Some(i as f64 / 20.0) },
            threshold: Some(0.5),
            ..Report::default()
        })
        .collect();

    let criteria_grid = [
        FilterCriteria::default(),
        FilterCriteria {
            query: "bill".to_string(),
            ..FilterCriteria::default()
        },
        FilterCriteria {
            gate: GateFilter::Pass,
            min_score: 0.3,
            ..FilterCriteria::default()
        },
        FilterCriteria {
            query: "auth".to_string(),
            gate: GateFilter::Fail,
            min_score: 0.7,
            ..FilterCriteria::default()
        },
    ];

    for criteria in criteria_grid {
        let first = criteria.apply(&reports);
        // Order-preserving subset of the store.
        assert!(first.windows(2).all(|w| w[0] < w[1]));
        assert!(first.iter().all(|&i| i < reports.len()));
        // Idempotent for fixed criteria.
        assert_eq!(first, criteria.apply(&reports));
        // Filter decisions agree with the badge computation.
        for &i in &first {
            match criteria.gate {
                GateFilter::All => {}
                GateFilter::Pass => assert!(reports[i].gate_outcome().is_pass()),
                GateFilter::Fail => assert!(!reports[i].gate_outcome().is_pass()),
            }
        }
    }
}

#[tokio::test]
async fn dashboard_loads_a_file_feed_end_to_end() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(file, "{SCENARIO_FEED}").unwrap();

    let client = reqwest::Client::new();
    let source = FeedSource::File(file.path().to_path_buf());
    let loaded = feed::load_reports(&client, &source).await;

    let mut app = DashboardApp::new(AppOptions::default());
    app.apply_load(loaded);
    assert_eq!(app.load_state(), &LoadState::Loaded);
    assert_eq!(app.summary_line(), "showing 2 of 2 evolution reports");
}

#[tokio::test]
async fn failed_feed_load_preserves_the_previous_view() {
    let mut app = DashboardApp::new(AppOptions::default());
    app.apply_load(Ok(feed::parse_reports(SCENARIO_FEED).unwrap()));
    assert_eq!(app.store().len(), 2);

    let client = reqwest::Client::new();
    let missing = FeedSource::parse("/nonexistent/reports.json");
    let failed = feed::load_reports(&client, &missing).await;
    assert!(failed.is_err());
    app.apply_load(failed);

    // Error indicator raised, previous list untouched.
    assert!(matches!(app.load_state(), LoadState::Failed(_)));
    assert_eq!(app.store().len(), 2);
}

#[test]
fn preview_cycle_sets_and_clears_the_overlay() {
    let mut app = DashboardApp::new(AppOptions::default());
    app.apply_load(Ok(feed::parse_reports(SCENARIO_FEED).unwrap()));

    let action = app.handle_key(key(KeyCode::Enter)).unwrap();
    match action {
        crate::ui::app::UiAction::OpenPreview { url, .. } => assert_eq!(url, "r1.html"),
        other => panic!("expected a preview action, got {other:?}"),
    }

    let document =
        crate::preview::document_from_html("<html><title>r1</title><p>gate passed</p></html>");
    app.preview_opened("r1.html".to_string(), "v1".to_string(), Ok(document));
    match app.mode() {
        Mode::Preview(state) => {
            assert_eq!(state.url, "r1.html");
            assert_eq!(state.document.title.as_deref(), Some("r1"));
        }
        other => panic!("expected the preview overlay, got {other:?}"),
    }

    app.handle_key(key(KeyCode::Esc));
    assert_eq!(app.mode(), &Mode::Browse);
}

#[test]
fn reset_control_restores_the_unfiltered_view() {
    let mut app = DashboardApp::new(AppOptions {
        initial_criteria: FilterCriteria::default(),
        ..AppOptions::default()
    });
    app.apply_load(Ok(feed::parse_reports(SCENARIO_FEED).unwrap()));

    app.handle_key(key(KeyCode::Char('g')));
    app.handle_key(key(KeyCode::Char('s')));
    for c in "0.9".chars() {
        app.handle_key(key(KeyCode::Char(c)));
    }
    app.handle_key(key(KeyCode::Esc));
    assert!(app.filtered().len() < 2);

    app.handle_key(key(KeyCode::Char('r')));
    assert!(app.criteria().is_default());
    assert_eq!(app.min_score_input(), "");
    assert_eq!(app.filtered().len(), 2);
    assert_eq!(app.summary_line(), "showing 2 of 2 evolution reports");
}

#[test]
fn hostile_feed_content_stays_inert_in_the_html_export() {
    let reports = feed::parse_reports(
        r#"[{"id":"v1","title":"<img src=x onerror=alert(1)>","domain":"a&b"}]"#,
    )
    .unwrap();
    let refs: Vec<&Report> = reports.iter().collect();
    let records = crate::output::build_records(&refs);
    let html = String::from_utf8(crate::output::render_html(&records)).unwrap();
    assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
    assert!(html.contains("a&amp;b"));
    assert!(!html.contains("<img src=x"));
}
