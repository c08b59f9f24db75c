pub mod app;
pub mod cards;
pub mod controls;

use std::io::{stdout, Stdout};
use std::time::Duration;

use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use log::{info, warn};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::feed::FeedSource;
use crate::preview;
use crate::ui::app::{DashboardApp, UiAction};
use crate::upload;

/// Everything the event loop needs to act on a [`UiAction`]: the shared
/// HTTP client, the runtime the fire-and-forget work runs on, and the feed
/// location relative report links resolve against.
pub struct UiContext {
    pub client: reqwest::Client,
    pub handle: tokio::runtime::Handle,
    pub feed: FeedSource,
}

pub fn run(app: &mut DashboardApp, ctx: &UiContext) -> Result<(), String> {
    let mut terminal = setup_terminal()?;
    let result = event_loop(&mut terminal, app, ctx);
    restore_terminal(terminal);
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, String> {
    enable_raw_mode().map_err(|e| format!("failed to enable raw mode: {e}"))?;
    let mut out = stdout();
    if let Err(e) = execute!(out, EnterAlternateScreen) {
        let _ = disable_raw_mode();
        return Err(format!("failed to enter alternate screen: {e}"));
    }
    Terminal::new(CrosstermBackend::new(out))
        .map_err(|e| format!("failed to initialize terminal: {e}"))
}

fn restore_terminal(mut terminal: Terminal<CrosstermBackend<Stdout>>) {
    let _ = disable_raw_mode();
    let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
    let _ = terminal.show_cursor();
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut DashboardApp,
    ctx: &UiContext,
) -> Result<(), String> {
    loop {
        terminal
            .draw(|frame| cards::render(frame, app))
            .map_err(|e| format!("failed to draw dashboard: {e}"))?;

        let ready = event::poll(Duration::from_millis(200))
            .map_err(|e| format!("failed to poll input: {e}"))?;
        if ready {
            let input = event::read().map_err(|e| format!("failed to read input: {e}"))?;
            if let Event::Key(key) = input {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = app.handle_key(key) {
                        dispatch(action, app, ctx);
                    }
                }
            }
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

fn dispatch(action: UiAction, app: &mut DashboardApp, ctx: &UiContext) {
    match action {
        UiAction::OpenPreview { url, title } => match ctx.feed.resolve_report(&url) {
            Some(location) => {
                let result = ctx
                    .handle
                    .block_on(preview::fetch_document(&ctx.client, &location));
                if let Err(e) = &result {
                    warn!("preview of '{url}' failed: {e}");
                }
                app.preview_opened(url, title, result);
            }
            // The in-app viewer cannot fetch this link; hand it to the
            // system opener instead.
            None => open_external(&url, app),
        },
        UiAction::OpenExternal { url } => {
            let target = match ctx.feed.resolve_report(&url) {
                Some(crate::feed::ReportLocation::Url(resolved)) => resolved.to_string(),
                Some(crate::feed::ReportLocation::File(path)) => path.display().to_string(),
                None => url,
            };
            open_external(&target, app);
        }
        UiAction::SubmitDraft(request) => {
            info!(
                "submitting draft '{}' for report {}",
                request.file.display(),
                request.target.report_id
            );
            upload::spawn_upload(&ctx.handle, ctx.client.clone(), request);
        }
    }
}

fn open_external(target: &str, app: &mut DashboardApp) {
    match preview::open_external(target) {
        Ok(()) => app.set_status(format!("opened {target} in the system viewer")),
        Err(e) => {
            warn!("external open of '{target}' failed: {e}");
            app.set_status("could not open the report externally");
        }
    }
}
