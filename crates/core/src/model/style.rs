//! Presentation hints derived from session state.
//!
//! These functions decide *what* an option or button should look like; how the
//! tags are drawn is up to the front-end.

use crate::model::session::{SessionState, SlotState};

/// How much the quiz reveals once a question is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeedbackMode {
    /// Only the picked option is highlighted.
    #[default]
    SelectionOnly,
    /// The correct option and a wrong pick are marked after answering.
    RevealAnswer,
}

/// Visual state of a single option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionStyle {
    /// Clickable, nothing picked yet.
    Idle,
    /// The option the user picked.
    Selected,
    /// Not picked, and no longer clickable.
    Locked,
    Correct,
    Incorrect,
    Dimmed,
}

/// Derive the style of `option` on a slot.
#[must_use]
pub fn style_for(
    slot: SlotState,
    option: &str,
    selected: Option<&str>,
    answer: &str,
    mode: FeedbackMode,
) -> OptionStyle {
    let is_selected = selected == Some(option);

    match (slot, mode) {
        (SlotState::Unanswered, _) => {
            if is_selected {
                OptionStyle::Selected
            } else {
                OptionStyle::Idle
            }
        }
        (SlotState::Answered, FeedbackMode::SelectionOnly) => {
            if is_selected {
                OptionStyle::Selected
            } else {
                OptionStyle::Locked
            }
        }
        (SlotState::Answered, FeedbackMode::RevealAnswer) => {
            if option == answer {
                OptionStyle::Correct
            } else if is_selected {
                OptionStyle::Incorrect
            } else {
                OptionStyle::Dimmed
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextLabel {
    Next,
    ShowResult,
}

/// State of the navigation button below the options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextButton {
    pub label: NextLabel,
    pub enabled: bool,
}

#[must_use]
pub fn next_button(state: &SessionState) -> NextButton {
    let enabled = state.is_locked() && !state.is_complete();
    let label = if state.is_last_question() && state.is_locked() {
        NextLabel::ShowResult
    } else {
        NextLabel::Next
    };
    NextButton { label, enabled }
}
