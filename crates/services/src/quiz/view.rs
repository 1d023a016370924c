use quiz_core::model::{
    FeedbackMode, NextButton, OptionStyle, Progress, QuizSession, next_button, style_for,
};

/// One option as the front-end should draw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    pub index: usize,
    pub text: String,
    pub style: OptionStyle,
    pub interactive: bool,
}

/// Presentation-agnostic snapshot of the current question.
///
/// Carries no formatting or localisation; the front-end decides how to render
/// progress, styles and button labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizView {
    pub progress: Progress,
    pub prompt: String,
    pub options: Vec<OptionView>,
    pub locked: bool,
    pub is_last_question: bool,
    pub next: NextButton,
    pub completed: bool,
}

impl QuizView {
    #[must_use]
    pub fn from_session(session: &QuizSession, mode: FeedbackMode) -> Self {
        let state = session.state();
        let slot_index = state.current_index();
        let slot = state.slot_state(slot_index);
        let selected = state.selection_for(slot_index);
        let question = session.current_question();
        let locked = state.is_locked();

        let options = question
            .options()
            .iter()
            .enumerate()
            .map(|(index, text)| OptionView {
                index,
                text: text.clone(),
                style: style_for(slot, text, selected, question.answer(), mode),
                interactive: !locked,
            })
            .collect();

        Self {
            progress: state.progress(),
            prompt: question.prompt().to_owned(),
            options,
            locked,
            is_last_question: state.is_last_question(),
            next: next_button(state),
            completed: state.is_complete(),
        }
    }
}
