//! Dashboard state. All shared mutable state (the report store, the filter
//! controls, the armed upload slot, the overlay) lives in [`DashboardApp`],
//! and its methods are the only write points. Key handling is pure:
//! anything that needs the network comes back to the event loop as a
//! [`UiAction`].

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::feed::FeedError;
use crate::filter::FilterCriteria;
use crate::preview::PreviewDocument;
use crate::report::{Report, ReportStore};
use crate::ui::controls::{self, ControlId};
use crate::upload::{self, UploadRequest, UploadTarget};
use crate::utils;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Loaded,
    Failed(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Focus {
    Cards,
    Query,
    MinScore,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PreviewState {
    pub url: String,
    pub title: String,
    pub document: PreviewDocument,
    pub error: Option<String>,
    pub scroll: usize,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DraftPrompt {
    pub input: String,
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Mode {
    Browse,
    Preview(PreviewState),
    PickDraft(DraftPrompt),
}

/// Work the event loop must perform on behalf of a key press.
#[derive(Clone, Debug, PartialEq)]
pub enum UiAction {
    OpenPreview { url: String, title: String },
    OpenExternal { url: String },
    SubmitDraft(UploadRequest),
}

#[derive(Clone, Debug)]
pub struct AppOptions {
    pub upload_endpoint: String,
    pub allowed_extensions: Vec<String>,
    pub preview_enabled: bool,
    pub initial_criteria: FilterCriteria,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            upload_endpoint: upload::PLACEHOLDER_ENDPOINT.to_string(),
            allowed_extensions: upload::DEFAULT_ALLOWED_EXTENSIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            preview_enabled: true,
            initial_criteria: FilterCriteria::default(),
        }
    }
}

pub struct DashboardApp {
    store: ReportStore,
    criteria: FilterCriteria,
    min_score_input: String,
    load: LoadState,
    focus: Focus,
    mode: Mode,
    selected: usize,
    pub scroll: usize,
    upload_target: Option<UploadTarget>,
    status: Option<String>,
    should_quit: bool,
    upload_endpoint: String,
    allowed_extensions: Vec<String>,
    preview_enabled: bool,
}

impl DashboardApp {
    pub fn new(options: AppOptions) -> Self {
        let min_score_input = if options.initial_criteria.min_score != 0.0 {
            format!("{:.2}", options.initial_criteria.min_score)
        } else {
            String::new()
        };
        Self {
            store: ReportStore::new(),
            criteria: options.initial_criteria,
            min_score_input,
            load: LoadState::Loading,
            focus: Focus::Cards,
            mode: Mode::Browse,
            selected: 0,
            scroll: 0,
            upload_target: None,
            status: None,
            should_quit: false,
            upload_endpoint: options.upload_endpoint,
            allowed_extensions: options.allowed_extensions,
            preview_enabled: options.preview_enabled,
        }
    }

    pub fn store(&self) -> &ReportStore {
        &self.store
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn min_score_input(&self) -> &str {
        &self.min_score_input
    }

    pub fn load_state(&self) -> &LoadState {
        &self.load
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn upload_target(&self) -> Option<&UploadTarget> {
        self.upload_target.as_ref()
    }

    pub fn status_line(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(message.into());
    }

    /// One-shot load result. Success replaces the store wholesale; failure
    /// leaves whatever was rendered before untouched and raises the error
    /// indicator.
    pub fn apply_load(&mut self, result: Result<Vec<Report>, FeedError>) {
        match result {
            Ok(reports) => {
                self.store.replace(reports);
                self.load = LoadState::Loaded;
                self.selected = 0;
                self.scroll = 0;
            }
            Err(e) => {
                self.load = LoadState::Failed(e.to_string());
            }
        }
    }

    /// Indices of the records matching the current criteria, in store order.
    pub fn filtered(&self) -> Vec<usize> {
        self.criteria.apply(self.store.reports())
    }

    pub fn selected_report(&self) -> Option<&Report> {
        let filtered = self.filtered();
        let idx = *filtered.get(self.selected)?;
        self.store.reports().get(idx)
    }

    /// The summary counter, with distinct wording for the zero case.
    pub fn summary_line(&self) -> String {
        match &self.load {
            LoadState::Loading => "loading evolution reports...".to_string(),
            LoadState::Failed(_) => String::new(),
            LoadState::Loaded => {
                let total = self.store.len();
                let shown = self.filtered().len();
                if shown == 0 {
                    "no evolution reports match the current filters".to_string()
                } else {
                    format!("showing {shown} of {total} evolution reports")
                }
            }
        }
    }

    pub fn reset_filters(&mut self) {
        self.criteria = FilterCriteria::default();
        self.min_score_input.clear();
        self.selected = 0;
        self.scroll = 0;
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered().len();
        if len == 0 {
            self.selected = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
    }

    fn recompute_min_score(&mut self) {
        // Mirrors the number control contract: anything unparseable is the
        // most permissive value, never an error.
        self.criteria.min_score =
            utils::parse_min_score(&self.min_score_input).unwrap_or(0.0);
        self.clamp_selection();
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        self.status = None;

        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        match self.mode {
            Mode::Preview(_) => self.handle_preview_key(key),
            Mode::PickDraft(_) => self.handle_draft_key(key),
            Mode::Browse => self.handle_browse_key(key),
        }
    }

    fn handle_preview_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            self.close_preview();
            return None;
        }
        if let Mode::Preview(state) = &mut self.mode {
            match key.code {
                KeyCode::Up => state.scroll = state.scroll.saturating_sub(1),
                KeyCode::Down => state.scroll = state.scroll.saturating_add(1),
                KeyCode::PageUp => state.scroll = state.scroll.saturating_sub(10),
                KeyCode::PageDown => state.scroll = state.scroll.saturating_add(10),
                _ => {}
            }
        }
        None
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        match self.focus {
            Focus::Query => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Cards,
                    KeyCode::Tab => self.focus = Focus::MinScore,
                    KeyCode::Backspace => {
                        self.criteria.query.pop();
                        self.clamp_selection();
                    }
                    KeyCode::Char(c) => {
                        self.criteria.query.push(c);
                        self.clamp_selection();
                    }
                    _ => {}
                }
                None
            }
            Focus::MinScore => {
                match key.code {
                    KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Cards,
                    KeyCode::Tab => self.focus = Focus::Cards,
                    KeyCode::Backspace => {
                        self.min_score_input.pop();
                        self.recompute_min_score();
                    }
                    KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => {
                        self.min_score_input.push(c);
                        self.recompute_min_score();
                    }
                    _ => {}
                }
                None
            }
            Focus::Cards => match controls::lookup(key.code) {
                Some(ControlId::Quit) => {
                    self.should_quit = true;
                    None
                }
                Some(ControlId::CycleFocus) | Some(ControlId::FocusQuery) => {
                    self.focus = Focus::Query;
                    None
                }
                Some(ControlId::FocusMinScore) => {
                    self.focus = Focus::MinScore;
                    None
                }
                Some(ControlId::CycleGate) => {
                    self.criteria.gate = self.criteria.gate.next();
                    self.clamp_selection();
                    None
                }
                Some(ControlId::ResetFilters) => {
                    self.reset_filters();
                    None
                }
                Some(ControlId::SelectPrev) => {
                    self.selected = self.selected.saturating_sub(1);
                    None
                }
                Some(ControlId::SelectNext) => {
                    let len = self.filtered().len();
                    if len > 0 && self.selected < len - 1 {
                        self.selected += 1;
                    }
                    None
                }
                Some(ControlId::ViewReport) => self.view_selected(),
                Some(ControlId::UploadDraft) => {
                    self.arm_selected();
                    None
                }
                Some(ControlId::CloseOverlay) | None => None,
            },
        }
    }

    fn view_selected(&mut self) -> Option<UiAction> {
        let (url, title) = {
            let report = self.selected_report()?;
            (
                report.report_html.clone(),
                report.display_title().to_string(),
            )
        };
        let Some(url) = url else {
            self.set_status("this record has no HTML report");
            return None;
        };
        if self.preview_enabled {
            Some(UiAction::OpenPreview { url, title })
        } else {
            Some(UiAction::OpenExternal { url })
        }
    }

    /// Arm the single upload slot for the selected record and open the
    /// draft prompt. Arming a second record simply replaces the slot.
    fn arm_selected(&mut self) {
        let Some(target) = self.selected_report().map(UploadTarget::from_report) else {
            return;
        };
        self.upload_target = Some(target);
        self.mode = Mode::PickDraft(DraftPrompt::default());
    }

    fn handle_draft_key(&mut self, key: KeyEvent) -> Option<UiAction> {
        if key.code == KeyCode::Esc {
            self.upload_target = None;
            self.mode = Mode::Browse;
            return None;
        }
        if key.code == KeyCode::Enter {
            return self.submit_draft();
        }
        if let Mode::PickDraft(prompt) = &mut self.mode {
            match key.code {
                KeyCode::Backspace => {
                    prompt.input.pop();
                    prompt.error = None;
                }
                KeyCode::Char(c) => {
                    prompt.input.push(c);
                    prompt.error = None;
                }
                _ => {}
            }
        }
        None
    }

    fn submit_draft(&mut self) -> Option<UiAction> {
        let Mode::PickDraft(prompt) = &mut self.mode else {
            return None;
        };
        let path = std::path::PathBuf::from(prompt.input.trim());
        if prompt.input.trim().is_empty() {
            prompt.error = Some("enter a draft file path".to_string());
            return None;
        }
        if !upload::extension_allowed(&path, &self.allowed_extensions) {
            prompt.error = Some(format!(
                "draft must be one of: {}",
                self.allowed_extensions.join(", ")
            ));
            return None;
        }
        let Some(target) = self.upload_target.take() else {
            self.mode = Mode::Browse;
            return None;
        };
        let request = UploadRequest {
            endpoint: self.upload_endpoint.clone(),
            file: path,
            target,
        };
        // Confirmation is shown now, before the request resolves.
        self.status = Some(upload::confirmation_line(&request));
        self.mode = Mode::Browse;
        Some(UiAction::SubmitDraft(request))
    }

    /// Overlay transition after the document fetch settles. A fetch error
    /// is shown inside the overlay body, never as a crash.
    pub fn preview_opened(
        &mut self,
        url: String,
        title: String,
        result: Result<PreviewDocument, String>,
    ) {
        let (document, error) = match result {
            Ok(document) => (document, None),
            Err(e) => (PreviewDocument::default(), Some(e)),
        };
        self.mode = Mode::Preview(PreviewState {
            url,
            title,
            document,
            error,
            scroll: 0,
        });
    }

    /// Close discards the loaded document (the viewer goes back to blank)
    /// and hides the overlay.
    pub fn close_preview(&mut self) {
        self.mode = Mode::Browse;
    }

    pub fn gate_filter_label(&self) -> &'static str {
        self.criteria.gate.label()
    }
}
