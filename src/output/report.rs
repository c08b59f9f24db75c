use super::{escape_html, CardRecord};

// Static card grid, no scripts. Every interpolated value is escaped so a
// hostile feed renders as literal text.
pub fn render_html(records: &[CardRecord]) -> Vec<u8> {
    let mut cards = String::new();
    for r in records {
        let badge_class = if r.gate_passed { "pass" } else { "fail" };
        let badge_text = if r.gate_passed {
            "Gate: passed"
        } else {
            "Gate: not passed"
        };
        let view_link = match r.report_html.as_deref() {
            Some(url) => format!(
                r#"<a class="view" href="{}" target="_blank" rel="noopener">View HTML report</a>"#,
                escape_html(url)
            ),
            None => String::new(),
        };
        cards.push_str(&format!(
            r#"    <article class="card">
      <h3>{title}</h3>
      <p class="meta">domain: <code>{domain}</code> &middot; version: <code>{id}</code> &middot; updated: {updated}</p>
      <p class="tags"><span class="tag {badge_class}">{badge_text}</span> <span class="tag">Score: {score} / {threshold}</span></p>
      <p class="files">Law: <code>{law}</code><br/>QSPEC: <code>{qspec}</code><br/>QEVR: <code>{qevr}</code></p>
      {view_link}
    </article>
"#,
            title = escape_html(&r.title),
            domain = escape_html(&r.domain),
            id = escape_html(&r.id),
            updated = escape_html(&r.updated_at),
            badge_class = badge_class,
            badge_text = badge_text,
            score = escape_html(&r.score),
            threshold = escape_html(&r.threshold),
            law = escape_html(&r.law_file),
            qspec = escape_html(&r.qspec_file),
            qevr = escape_html(&r.qevr_file),
            view_link = view_link,
        ));
    }

    let summary = if records.is_empty() {
        "no evolution reports match the current filters".to_string()
    } else {
        format!("{} evolution reports", records.len())
    };

    let html = format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8"/>
  <meta content="width=device-width, initial-scale=1.0" name="viewport"/>
  <title>Evodash Report Cards</title>
  <style>
    body {{ font-family: system-ui, sans-serif; background: #0f172a; color: #e2e8f0; margin: 2rem; }}
    .summary {{ color: #94a3b8; margin-bottom: 1.5rem; }}
    .card {{ background: #1e293b; border: 1px solid #334155; border-radius: 0.5rem; padding: 1rem 1.25rem; margin-bottom: 1rem; }}
    .card h3 {{ margin: 0 0 0.5rem 0; }}
    .meta, .files {{ color: #94a3b8; font-size: 0.9rem; }}
    .tag {{ display: inline-block; border-radius: 9999px; padding: 0.1rem 0.75rem; font-size: 0.8rem; background: #334155; }}
    .tag.pass {{ background: #14532d; color: #86efac; }}
    .tag.fail {{ background: #7f1d1d; color: #fca5a5; }}
    .view {{ color: #7dd3fc; font-size: 0.9rem; }}
    code {{ color: #cbd5e1; }}
  </style>
</head>
<body>
  <h1>Evolution Reports</h1>
  <p class="summary">{summary}</p>
  <main>
{cards}  </main>
</body>
</html>
"#,
        summary = escape_html(&summary),
        cards = cards,
    );
    html.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::build_records;
    use crate::report::Report;

    #[test]
    fn hostile_titles_render_as_literal_text() {
        let report = Report {
            id: "v1".to_string(),
            title: Some("<img src=x onerror=alert(1)>".to_string()),
            ..Report::default()
        };
        let records = build_records(&[&report]);
        let html = String::from_utf8(render_html(&records)).unwrap();
        assert!(html.contains("&lt;img src=x onerror=alert(1)&gt;"));
        assert!(!html.contains("<img src=x"));
    }

    #[test]
    fn view_link_only_rendered_when_report_exists() {
        let with = Report {
            id: "v1".to_string(),
            report_html: Some("r1.html".to_string()),
            ..Report::default()
        };
        let without = Report {
            id: "v2".to_string(),
            ..Report::default()
        };
        let html =
            String::from_utf8(render_html(&build_records(&[&with, &without]))).unwrap();
        assert_eq!(html.matches("View HTML report").count(), 1);
    }

    #[test]
    fn empty_view_uses_the_zero_results_wording() {
        let html = String::from_utf8(render_html(&[])).unwrap();
        assert!(html.contains("no evolution reports match the current filters"));
    }
}
