use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;
use crate::model::question::Question;

/// Number of questions in every quiz.
pub const QUIZ_SIZE: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizSetError {
    #[error("a quiz needs exactly {expected} questions, got {actual}")]
    WrongSize { expected: usize, actual: usize },

    #[error("question {0} appears more than once in the quiz")]
    DuplicateQuestion(QuestionId),
}

/// The ordered questions drawn for one quiz session.
///
/// Always holds exactly [`QUIZ_SIZE`] questions with distinct ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizSet {
    questions: Vec<Question>,
}

impl QuizSet {
    /// # Errors
    ///
    /// Returns `QuizSetError::WrongSize` unless exactly `QUIZ_SIZE` questions are given,
    /// and `QuizSetError::DuplicateQuestion` if any id repeats.
    pub fn new(questions: Vec<Question>) -> Result<Self, QuizSetError> {
        if questions.len() != QUIZ_SIZE {
            return Err(QuizSetError::WrongSize {
                expected: QUIZ_SIZE,
                actual: questions.len(),
            });
        }

        let mut seen = HashSet::with_capacity(QUIZ_SIZE);
        for question in &questions {
            if !seen.insert(question.id()) {
                return Err(QuizSetError::DuplicateQuestion(question.id()));
            }
        }

        Ok(Self { questions })
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}
