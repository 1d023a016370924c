use chrono::{DateTime, Utc};

use crate::model::ids::SessionId;
use crate::model::outcome::QuizOutcome;
use crate::model::question::Question;
use crate::model::quiz_set::{QUIZ_SIZE, QuizSet};
use crate::time::Clock;

//
// ─── SLOT / EVENTS ─────────────────────────────────────────────────────────────
//

/// Answer state of one position in the quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Unanswered,
    Answered,
}

/// Why a transition request left the state untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoredReason {
    /// The current slot already holds a selection.
    AlreadyAnswered,
    /// The option is not offered by the current question.
    UnknownOption,
    /// `advance` was requested before the current slot was answered.
    NotAnswered,
    /// The quiz has already been completed.
    AlreadyCompleted,
}

/// Observable result of a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Selected { slot: usize, option: String },
    Advanced { from: usize, to: usize },
    /// The last question was answered and the user asked to move on.
    Completed,
    Ignored(IgnoredReason),
}

impl SessionEvent {
    #[must_use]
    pub fn is_ignored(&self) -> bool {
        matches!(self, SessionEvent::Ignored(_))
    }
}

/// One-based position in the quiz, e.g. `3 / 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub position: usize,
    pub total: usize,
}

//
// ─── STATE ─────────────────────────────────────────────────────────────────────
//

/// Selection and navigation state for a quiz, independent of the questions.
///
/// Transitions are pure: `select` and `advance` consume the state and return the
/// next one together with the event they produced. Requests that violate a
/// precondition are ignored rather than treated as errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    current_index: usize,
    selections: Vec<Option<String>>,
    completed: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    #[must_use]
    pub fn new() -> Self {
        Self {
            current_index: 0,
            selections: vec![None; QUIZ_SIZE],
            completed: false,
        }
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// The recorded option for slot `index`, if any.
    #[must_use]
    pub fn selection_for(&self, index: usize) -> Option<&str> {
        self.selections.get(index).and_then(Option::as_deref)
    }

    #[must_use]
    pub fn slot_state(&self, index: usize) -> SlotState {
        if self.selection_for(index).is_some() {
            SlotState::Answered
        } else {
            SlotState::Unanswered
        }
    }

    /// True once the current slot has a selection.
    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.slot_state(self.current_index) == SlotState::Answered
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index == QUIZ_SIZE - 1
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completed
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.selections.iter().filter(|s| s.is_some()).count()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        Progress {
            position: self.current_index + 1,
            total: QUIZ_SIZE,
        }
    }

    /// Record `option` for the current slot.
    ///
    /// `question` is the one shown at the current slot; options it does not
    /// offer are ignored.
    #[must_use]
    pub fn select(mut self, question: &Question, option: &str) -> (Self, SessionEvent) {
        if self.is_locked() {
            return (self, SessionEvent::Ignored(IgnoredReason::AlreadyAnswered));
        }
        if !question.has_option(option) {
            return (self, SessionEvent::Ignored(IgnoredReason::UnknownOption));
        }

        let slot = self.current_index;
        self.selections[slot] = Some(option.to_owned());
        (
            self,
            SessionEvent::Selected {
                slot,
                option: option.to_owned(),
            },
        )
    }

    /// Move to the next slot, or complete the quiz from the last one.
    #[must_use]
    pub fn advance(mut self) -> (Self, SessionEvent) {
        if self.completed {
            return (self, SessionEvent::Ignored(IgnoredReason::AlreadyCompleted));
        }
        if !self.is_locked() {
            return (self, SessionEvent::Ignored(IgnoredReason::NotAnswered));
        }
        if self.is_last_question() {
            self.completed = true;
            return (self, SessionEvent::Completed);
        }

        let from = self.current_index;
        self.current_index += 1;
        let to = self.current_index;
        (
            self,
            SessionEvent::Advanced { from, to },
        )
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// A running quiz: the drawn questions plus their selection state.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: SessionId,
    set: QuizSet,
    state: SessionState,
    clock: Clock,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl QuizSession {
    /// Start a session over `set`; `clock` stamps start and completion times.
    #[must_use]
    pub fn start(set: QuizSet, clock: Clock) -> Self {
        Self {
            id: SessionId::new_v4(),
            set,
            state: SessionState::new(),
            clock,
            started_at: clock.now(),
            completed_at: None,
        }
    }

    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    #[must_use]
    pub fn quiz_set(&self) -> &QuizSet {
        &self.set
    }

    #[must_use]
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    #[must_use]
    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.state.current_index()
    }

    #[must_use]
    pub fn current_question(&self) -> &Question {
        // current_index is bounded by QUIZ_SIZE - 1 and the set always holds QUIZ_SIZE questions.
        &self.set.questions()[self.state.current_index()]
    }

    #[must_use]
    pub fn selection_for(&self, index: usize) -> Option<&str> {
        self.state.selection_for(index)
    }

    #[must_use]
    pub fn slot_state(&self, index: usize) -> SlotState {
        self.state.slot_state(index)
    }

    #[must_use]
    pub fn is_locked(&self) -> bool {
        self.state.is_locked()
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.state.is_last_question()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.state.is_complete()
    }

    #[must_use]
    pub fn progress(&self) -> Progress {
        self.state.progress()
    }

    pub fn select(&mut self, option: &str) -> SessionEvent {
        let question = &self.set.questions()[self.state.current_index()];
        let (state, event) = std::mem::take(&mut self.state).select(question, option);
        self.state = state;
        event
    }

    pub fn advance(&mut self) -> SessionEvent {
        let (state, event) = std::mem::take(&mut self.state).advance();
        self.state = state;
        if event == SessionEvent::Completed {
            self.completed_at = Some(self.clock.now());
        }
        event
    }

    /// Tally of the selections made so far.
    #[must_use]
    pub fn outcome(&self) -> QuizOutcome {
        QuizOutcome::from_state(&self.set, &self.state)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::quiz_set::fixtures::{question, quiz_set};
    use crate::time::{fixed_clock, fixed_now};

    fn shown_question() -> Question {
        question(0)
    }

    fn answer_and_advance(state: SessionState, option: &str) -> SessionState {
        let (state, _) = state.select(&shown_question(), option);
        state.advance().0
    }

    #[test]
    fn new_state_starts_unanswered_at_first_slot() {
        let state = SessionState::new();
        assert_eq!(state.current_index(), 0);
        assert!(!state.is_locked());
        assert!(!state.is_complete());
        assert_eq!(state.progress(), Progress { position: 1, total: 10 });
        for i in 0..QUIZ_SIZE {
            assert_eq!(state.slot_state(i), SlotState::Unanswered);
        }
    }

    #[test]
    fn second_select_keeps_first_choice() {
        let (state, first) = SessionState::new().select(&shown_question(), "B");
        assert_eq!(
            first,
            SessionEvent::Selected {
                slot: 0,
                option: "B".into()
            }
        );

        let (state, second) = state.select(&shown_question(), "C");
        assert_eq!(second, SessionEvent::Ignored(IgnoredReason::AlreadyAnswered));
        assert_eq!(state.selection_for(0), Some("B"));
        assert!(state.is_locked());
    }

    #[test]
    fn select_ignores_option_not_shown_question() {
        let (state, event) = SessionState::new().select(&shown_question(), "Z");
        assert_eq!(event, SessionEvent::Ignored(IgnoredReason::UnknownOption));
        assert!(!state.is_locked());
    }

    #[test]
    fn select_checks_against_the_shown_question() {
        let yes_no = Question::new(
            crate::model::QuestionId::new(42),
            "Stop at amber?",
            vec!["Yes".into(), "No".into()],
            "Yes",
        )
        .unwrap();

        let (state, event) = SessionState::new().select(&yes_no, "B");
        assert_eq!(event, SessionEvent::Ignored(IgnoredReason::UnknownOption));
        assert_eq!(state.answered_count(), 0);

        let (state, event) = state.select(&yes_no, "No");
        assert!(!event.is_ignored());
        assert_eq!(state.answered_count(), 1);
    }

    #[test]
    fn advance_requires_answer() {
        let (state, event) = SessionState::new().advance();
        assert_eq!(event, SessionEvent::Ignored(IgnoredReason::NotAnswered));
        assert_eq!(state.current_index(), 0);
    }

    #[test]
    fn advance_moves_one_slot_and_unlocks() {
        let (state, _) = SessionState::new().select(&shown_question(), "A");
        let (state, event) = state.advance();
        assert_eq!(event, SessionEvent::Advanced { from: 0, to: 1 });
        assert_eq!(state.current_index(), 1);
        assert!(!state.is_locked());
        assert_eq!(state.slot_state(0), SlotState::Answered);
        assert_eq!(state.slot_state(1), SlotState::Unanswered);
    }

    #[test]
    fn last_slot_completes_without_wrapping() {
        let mut state = SessionState::new();
        for _ in 0..QUIZ_SIZE - 1 {
            state = answer_and_advance(state, "A");
        }
        assert!(state.is_last_question());
        assert_eq!(state.current_index(), 9);

        let (state, _) = state.select(&shown_question(), "D");
        let (state, event) = state.advance();
        assert_eq!(event, SessionEvent::Completed);
        assert!(state.is_complete());
        assert_eq!(state.current_index(), 9);

        let (state, again) = state.advance();
        assert_eq!(again, SessionEvent::Ignored(IgnoredReason::AlreadyCompleted));
        assert_eq!(state.current_index(), 9);
        assert_eq!(state.answered_count(), QUIZ_SIZE);
    }

    #[test]
    fn selection_for_out_of_range_is_absent() {
        let state = SessionState::new();
        assert_eq!(state.selection_for(QUIZ_SIZE), None);
        assert_eq!(state.slot_state(QUIZ_SIZE + 3), SlotState::Unanswered);
    }

    #[test]
    fn session_runs_to_completion_and_stamps_time() {
        let mut session = QuizSession::start(quiz_set(), fixed_clock());
        assert_eq!(session.started_at(), fixed_now());
        assert_eq!(session.current_question().prompt(), "Question 0");

        for i in 0..QUIZ_SIZE {
            assert!(!session.select(if i % 2 == 0 { "B" } else { "C" }).is_ignored());
            assert!(session.is_locked());
            session.advance();
        }

        assert!(session.is_complete());
        assert_eq!(session.completed_at(), Some(fixed_now()));
        assert_eq!(session.current_index(), 9);

        let outcome = session.outcome();
        assert_eq!(outcome.answered, 10);
        assert_eq!(outcome.correct, 5);
    }

    #[test]
    fn session_select_uses_current_question_options() {
        let mut session = QuizSession::start(quiz_set(), fixed_clock());
        assert_eq!(
            session.select("E"),
            SessionEvent::Ignored(IgnoredReason::UnknownOption)
        );
        assert_eq!(session.selection_for(0), None);
        assert_eq!(session.advance(), SessionEvent::Ignored(IgnoredReason::NotAnswered));
        assert!(session.completed_at().is_none());
    }
}
