use crate::model::quiz_set::QuizSet;
use crate::model::session::SessionState;

/// Score of a quiz, derived on demand from the recorded selections.
///
/// Nothing here is persisted; it backs the "show result" screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuizOutcome {
    pub total: usize,
    pub answered: usize,
    pub correct: usize,
}

impl QuizOutcome {
    #[must_use]
    pub fn from_state(set: &QuizSet, state: &SessionState) -> Self {
        let correct = set
            .iter()
            .enumerate()
            .filter(|(index, question)| {
                state
                    .selection_for(*index)
                    .is_some_and(|selected| question.is_correct(selected))
            })
            .count();

        Self {
            total: set.questions().len(),
            answered: state.answered_count(),
            correct,
        }
    }

    /// Percentage of correct answers over the whole quiz.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f32 / self.total as f32 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quiz_set::fixtures::quiz_set;

    #[test]
    fn counts_only_answered_slots() {
        let set = quiz_set();
        let (state, _) = SessionState::new().select(&set.questions()[0], "B");
        let (state, _) = state.advance();
        let (state, _) = state.select(&set.questions()[1], "A");

        let outcome = QuizOutcome::from_state(&set, &state);
        assert_eq!(outcome.total, 10);
        assert_eq!(outcome.answered, 2);
        assert_eq!(outcome.correct, 1);
        assert!((outcome.percent() - 10.0).abs() < f32::EPSILON);
    }
}
