//! Card list rendering. The whole view is rebuilt from the store and the
//! current criteria on every draw; at this scale a full replace is cheaper
//! than tracking what changed.

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::report::{display_path, Report};
use crate::ui::app::{DashboardApp, Focus, LoadState, Mode};
use crate::ui::controls;

const CARD_HEIGHT: u16 = 8;

pub fn render(frame: &mut Frame<'_>, app: &mut DashboardApp) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(1),
        ])
        .split(area);

    render_header(frame, app, chunks[0]);
    render_filter_bar(frame, app, chunks[1]);
    render_list(frame, app, chunks[2]);
    render_footer(frame, app, chunks[3]);

    match app.mode().clone() {
        Mode::Preview(state) => render_preview_overlay(frame, &state, area),
        Mode::PickDraft(prompt) => render_draft_overlay(frame, app, &prompt, area),
        Mode::Browse => {}
    }
}

fn render_header(frame: &mut Frame<'_>, app: &DashboardApp, area: Rect) {
    let summary = match app.load_state() {
        LoadState::Failed(_) => Line::from(Span::styled(
            "failed to load the reports feed",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        LoadState::Loading => Line::from(Span::styled(
            app.summary_line(),
            Style::default().fg(Color::Yellow),
        )),
        LoadState::Loaded => Line::from(Span::raw(app.summary_line())),
    };
    let header = Paragraph::new(Text::from(summary)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" evodash \u{b7} evolution reports ")
            .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(header, area);
}

fn control_block(title: &'static str, focused: bool) -> Block<'static> {
    let border = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::Gray)
    };
    Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(border)
}

fn render_filter_bar(frame: &mut Frame<'_>, app: &DashboardApp, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(24),
            Constraint::Length(10),
            Constraint::Length(14),
        ])
        .split(area);

    let query = Paragraph::new(app.criteria().query.clone())
        .block(control_block(" search ", app.focus() == Focus::Query));
    frame.render_widget(query, chunks[0]);

    let gate = Paragraph::new(app.gate_filter_label()).block(control_block(" gate ", false));
    frame.render_widget(gate, chunks[1]);

    let min_score = Paragraph::new(app.min_score_input().to_string()).block(control_block(
        " min score ",
        app.focus() == Focus::MinScore,
    ));
    frame.render_widget(min_score, chunks[2]);
}

fn render_list(frame: &mut Frame<'_>, app: &mut DashboardApp, area: Rect) {
    if let LoadState::Failed(_) = app.load_state() {
        let error = Paragraph::new("could not load reports; check the log and the feed location")
            .style(Style::default().fg(Color::Red))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(error, area);
        return;
    }

    let filtered = app.filtered();
    if filtered.is_empty() {
        let empty = Paragraph::new(app.summary_line())
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let capacity = (area.height / CARD_HEIGHT).max(1) as usize;
    if app.selected() < app.scroll {
        app.scroll = app.selected();
    } else if app.selected() >= app.scroll + capacity {
        app.scroll = app.selected() + 1 - capacity;
    }

    for (slot, position) in (app.scroll..filtered.len()).take(capacity).enumerate() {
        let rect = Rect {
            x: area.x,
            y: area.y + (slot as u16) * CARD_HEIGHT,
            width: area.width,
            height: CARD_HEIGHT.min(area.height - (slot as u16) * CARD_HEIGHT),
        };
        let report = &app.store().reports()[filtered[position]];
        render_card(frame, report, position == app.selected(), rect);
    }
}

fn render_card(frame: &mut Frame<'_>, report: &Report, selected: bool, area: Rect) {
    let border = if selected {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Gray)
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(format!(" {} ", report.display_title()));

    let outcome = report.gate_outcome();
    let badge_style = if outcome.is_pass() {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    };

    let meta_style = Style::default().fg(Color::Gray);
    let lines = vec![
        Line::from(vec![
            Span::styled(format!(" {} ", outcome.label()), badge_style),
            Span::raw("  "),
            Span::raw(format!("Score: {}", report.score_badge())),
        ]),
        Line::from(Span::styled(
            format!(
                "domain: {}  version: {}  updated: {}",
                report.domain.as_deref().unwrap_or("-"),
                report.id,
                report.updated_at.as_deref().unwrap_or("-"),
            ),
            meta_style,
        )),
        Line::from(Span::styled(
            format!("Law:   {}", display_path(report.law_file.as_deref())),
            meta_style,
        )),
        Line::from(Span::styled(
            format!("QSPEC: {}", display_path(report.qspec_file.as_deref())),
            meta_style,
        )),
        Line::from(Span::styled(
            format!("QEVR:  {}", display_path(report.qevr_file.as_deref())),
            meta_style,
        )),
        Line::from(match report.report_html.as_deref() {
            Some(url) => Span::styled(
                format!("report: {url}"),
                Style::default().fg(Color::Cyan),
            ),
            None => Span::styled("report: -", meta_style),
        }),
    ];

    let card = Paragraph::new(Text::from(lines)).block(block);
    frame.render_widget(card, area);
}

fn render_footer(frame: &mut Frame<'_>, app: &DashboardApp, area: Rect) {
    let footer = match app.status_line() {
        Some(status) => Paragraph::new(status.to_string())
            .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        None => {
            Paragraph::new(controls::hint_line()).style(Style::default().fg(Color::Gray))
        }
    };
    frame.render_widget(footer, area);
}

fn render_preview_overlay(
    frame: &mut Frame<'_>,
    state: &crate::ui::app::PreviewState,
    area: Rect,
) {
    let overlay = centered_rect(area, 84, 80);
    frame.render_widget(Clear, overlay);

    let heading = state
        .document
        .title
        .clone()
        .unwrap_or_else(|| state.title.clone());
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {heading} "))
        .title_bottom(Line::from(Span::styled(
            format!(" {} \u{b7} esc close ", state.url),
            Style::default().fg(Color::Gray),
        )));

    let body = match &state.error {
        Some(error) => Text::from(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        ))),
        None => Text::from(
            state
                .document
                .lines
                .iter()
                .map(|l| Line::from(l.clone()))
                .collect::<Vec<_>>(),
        ),
    };

    let max_scroll = state.document.lines.len().saturating_sub(1);
    let scroll = state.scroll.min(max_scroll) as u16;
    let paragraph = Paragraph::new(body)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(paragraph, overlay);
}

fn render_draft_overlay(
    frame: &mut Frame<'_>,
    app: &DashboardApp,
    prompt: &crate::ui::app::DraftPrompt,
    area: Rect,
) {
    let overlay = centered_rect(area, 60, 28);
    frame.render_widget(Clear, overlay);

    let target = app
        .upload_target()
        .map(|t| format!("{} ({})", t.report_id, t.title))
        .unwrap_or_else(|| "-".to_string());

    let mut lines = vec![
        Line::from(Span::raw(format!("target: {target}"))),
        Line::from(Span::raw(format!("path:   {}_", prompt.input))),
        Line::from(Span::styled(
            "enter confirm \u{b7} esc cancel",
            Style::default().fg(Color::Gray),
        )),
    ];
    if let Some(error) = &prompt.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" upload draft ");
    frame.render_widget(
        Paragraph::new(Text::from(lines))
            .block(block)
            .wrap(Wrap { trim: true }),
        overlay,
    );
}

fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
