//! The control surface in one place. Every logical control maps to exactly
//! one key binding here; dispatch, the footer hint line, and startup
//! validation all read this table instead of scattering key checks through
//! the event loop.

use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlId {
    Quit,
    CycleFocus,
    FocusQuery,
    CycleGate,
    FocusMinScore,
    ResetFilters,
    SelectPrev,
    SelectNext,
    ViewReport,
    UploadDraft,
    CloseOverlay,
}

pub struct Control {
    pub id: ControlId,
    pub key: KeyCode,
    pub hint: &'static str,
}

pub const CONTROLS: &[Control] = &[
    Control {
        id: ControlId::Quit,
        key: KeyCode::Char('q'),
        hint: "q quit",
    },
    Control {
        id: ControlId::CycleFocus,
        key: KeyCode::Tab,
        hint: "tab focus",
    },
    Control {
        id: ControlId::FocusQuery,
        key: KeyCode::Char('/'),
        hint: "/ search",
    },
    Control {
        id: ControlId::CycleGate,
        key: KeyCode::Char('g'),
        hint: "g gate",
    },
    Control {
        id: ControlId::FocusMinScore,
        key: KeyCode::Char('s'),
        hint: "s min score",
    },
    Control {
        id: ControlId::ResetFilters,
        key: KeyCode::Char('r'),
        hint: "r reset",
    },
    Control {
        id: ControlId::SelectPrev,
        key: KeyCode::Up,
        hint: "",
    },
    Control {
        id: ControlId::SelectNext,
        key: KeyCode::Down,
        hint: "\u{2191}\u{2193} select",
    },
    Control {
        id: ControlId::ViewReport,
        key: KeyCode::Enter,
        hint: "enter view",
    },
    Control {
        id: ControlId::UploadDraft,
        key: KeyCode::Char('u'),
        hint: "u upload",
    },
    Control {
        id: ControlId::CloseOverlay,
        key: KeyCode::Esc,
        hint: "esc close",
    },
];

/// Resolve a key press to its logical control, if any.
pub fn lookup(key: KeyCode) -> Option<ControlId> {
    CONTROLS.iter().find(|c| c.key == key).map(|c| c.id)
}

/// Reject duplicate bindings once at startup instead of letting a later
/// table edit shadow an earlier control silently.
pub fn validate() -> Result<(), String> {
    for (i, control) in CONTROLS.iter().enumerate() {
        if let Some(dup) = CONTROLS[i + 1..].iter().find(|c| c.key == control.key) {
            return Err(format!(
                "duplicate key binding: {:?} is mapped to both {:?} and {:?}",
                control.key, control.id, dup.id
            ));
        }
    }
    Ok(())
}

pub fn hint_line() -> String {
    CONTROLS
        .iter()
        .filter(|c| !c.hint.is_empty())
        .map(|c| c.hint)
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_has_no_duplicate_bindings() {
        validate().unwrap();
    }

    #[test]
    fn lookup_resolves_bound_keys_only() {
        assert_eq!(lookup(KeyCode::Char('g')), Some(ControlId::CycleGate));
        assert_eq!(lookup(KeyCode::Char('x')), None);
    }

    #[test]
    fn hint_line_mentions_the_filter_controls() {
        let hints = hint_line();
        assert!(hints.contains("g gate"));
        assert!(hints.contains("r reset"));
        assert!(hints.contains("u upload"));
    }
}
