//! Shortcut table connecting key sequences with UI actions.
//!
//! The same table drives both the dispatcher bindings and the help overlay.

use crate::keyboard::{sequence, BindError, KeyLabel, KeySequenceDispatcher, Sequence};
use crate::search::LinkTarget;
use crate::tui::form::Field;

/// Every action reachable through a key sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // === FORM ===
    /// Leave the focused field
    Unfocus,
    /// Focus a form field
    Focus(Field),
    /// Flip case-insensitive matching
    ToggleCaseInsensitive,
    /// Flip the test-file exclusion filter
    ToggleTestFiles,
    /// Run the search with the current form values
    Search,

    // === NAVIGATION ===
    /// Select the previous hit
    SelectPrevious,
    /// Select the next hit
    SelectNext,
    /// Return to the search page
    GoToSearch,

    // === LINKS ===
    /// Open a link of the selected hit in place
    OpenLink(LinkTarget),
    /// Copy the absolute URL of a link of the selected hit
    CopyLink(LinkTarget),

    // === HELP ===
    /// Show or hide the help overlay
    ToggleHelp,
}

impl Action {
    /// Short description shown in the help overlay.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Unfocus => "Leave the focused field".to_string(),
            Self::Focus(field) => format!("Focus {}", field.label().to_lowercase()),
            Self::ToggleCaseInsensitive => "Toggle case insensitivity".to_string(),
            Self::ToggleTestFiles => "Toggle test file exclusion".to_string(),
            Self::Search => "Search".to_string(),
            Self::SelectPrevious => "Select previous hit".to_string(),
            Self::SelectNext => "Select next hit".to_string(),
            Self::GoToSearch => "Go to search page".to_string(),
            Self::OpenLink(target) => format!("Open {target}"),
            Self::CopyLink(target) => format!("Copy {target} URL"),
            Self::ToggleHelp => "Toggle this help".to_string(),
        }
    }
}

/// Default key sequences, in help order.
#[must_use]
pub fn default_bindings() -> Vec<(Sequence, Action)> {
    let mut bindings: Vec<(Sequence, Action)> = vec![
        ([sequence::ESCAPE].into(), Action::Unfocus),
        ("q".into(), Action::Focus(Field::Query)),
        ("f".into(), Action::Focus(Field::File)),
        ("x".into(), Action::Focus(Field::ExcludeFile)),
        ("cb".into(), Action::Focus(Field::LinesBefore)),
        ("ca".into(), Action::Focus(Field::LinesAfter)),
        ("i".into(), Action::ToggleCaseInsensitive),
        ("t".into(), Action::ToggleTestFiles),
        ("s".into(), Action::Search),
        ("k".into(), Action::SelectPrevious),
        ([sequence::ARROW_UP].into(), Action::SelectPrevious),
        ("j".into(), Action::SelectNext),
        ([sequence::ARROW_DOWN].into(), Action::SelectNext),
        ("r".into(), Action::GoToSearch),
        ("?".into(), Action::ToggleHelp),
    ];
    for target in LinkTarget::ALL {
        let key = target.key();
        bindings.push((KeyLabel::from(key).into(), Action::OpenLink(target)));
        bindings.push((
            KeyLabel::from(key.to_ascii_uppercase()).into(),
            Action::CopyLink(target),
        ));
    }
    bindings
}

/// Binds every default sequence, stopping at the first conflict.
pub fn install(dispatcher: &mut KeySequenceDispatcher<Action>) -> Result<(), BindError> {
    for (sequence, action) in default_bindings() {
        dispatcher.bind(sequence, action)?;
    }
    tracing::debug!(bindings = dispatcher.bindings().len(), "shortcuts installed");
    Ok(())
}

/// One titled group of help entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpSection {
    /// Section heading
    pub title: &'static str,
    /// `(keys, description)` pairs
    pub entries: Vec<(String, String)>,
}

/// Help overlay content derived from the default bindings.
///
/// Sequences bound to the same action are listed together.
#[must_use]
pub fn help_sections() -> Vec<HelpSection> {
    let mut form = HelpSection {
        title: "SEARCH FORM",
        entries: Vec::new(),
    };
    let mut navigation = HelpSection {
        title: "NAVIGATION",
        entries: Vec::new(),
    };
    let mut links = HelpSection {
        title: "LINKS (lowercase opens, uppercase copies URL)",
        entries: Vec::new(),
    };

    let mut grouped: Vec<(Action, Vec<String>)> = Vec::new();
    for (sequence, action) in default_bindings() {
        let keys = display_keys(&sequence);
        match grouped.iter_mut().find(|(existing, _)| *existing == action) {
            Some((_, all)) => all.push(keys),
            None => grouped.push((action, vec![keys])),
        }
    }

    for (action, keys) in grouped {
        let section = match action {
            Action::OpenLink(_) | Action::CopyLink(_) => &mut links,
            Action::SelectPrevious | Action::SelectNext | Action::GoToSearch | Action::ToggleHelp => {
                &mut navigation
            }
            _ => &mut form,
        };
        section.entries.push((keys.join(" / "), action.description()));
    }

    let mut sections = vec![form, navigation, links];
    sections.push(HelpSection {
        title: "GENERAL",
        entries: vec![
            ("Tab / Shift+Tab".to_string(), "Cycle form fields".to_string()),
            ("Enter".to_string(), "Search from a form field".to_string()),
            ("Ctrl+C / Ctrl+Q".to_string(), "Quit".to_string()),
        ],
    });
    sections
}

fn display_keys(sequence: &Sequence) -> String {
    sequence
        .labels()
        .iter()
        .map(|label| match label.as_str() {
            sequence::ARROW_UP => "↑".to_string(),
            sequence::ARROW_DOWN => "↓".to_string(),
            sequence::ESCAPE => "Esc".to_string(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(" ")
}
