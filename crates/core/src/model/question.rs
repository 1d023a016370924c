use std::collections::HashSet;

use thiserror::Error;

use crate::model::ids::QuestionId;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question prompt cannot be empty")]
    EmptyPrompt,

    #[error("a question needs at least {min} options, got {actual}")]
    TooFewOptions { min: usize, actual: usize },

    #[error("option #{index} is empty")]
    EmptyOption { index: usize },

    #[error("option '{0}' appears more than once")]
    DuplicateOption(String),

    #[error("answer '{0}' is not one of the options")]
    AnswerNotInOptions(String),
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A multiple-choice question as held by the question bank.
///
/// The answer is stored as option text and always matches one of `options`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    prompt: String,
    options: Vec<String>,
    answer: String,
}

impl Question {
    pub const MIN_OPTIONS: usize = 2;

    /// Build a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the prompt or any option is blank, options
    /// repeat, there are fewer than two options, or the answer is not an option.
    pub fn new(
        id: QuestionId,
        prompt: impl Into<String>,
        options: Vec<String>,
        answer: impl Into<String>,
    ) -> Result<Self, QuestionError> {
        let prompt = prompt.into();
        let answer = answer.into();

        if prompt.trim().is_empty() {
            return Err(QuestionError::EmptyPrompt);
        }
        if options.len() < Self::MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                min: Self::MIN_OPTIONS,
                actual: options.len(),
            });
        }

        let mut seen = HashSet::with_capacity(options.len());
        for (index, option) in options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(QuestionError::EmptyOption { index });
            }
            if !seen.insert(option.as_str()) {
                return Err(QuestionError::DuplicateOption(option.clone()));
            }
        }

        if !seen.contains(answer.as_str()) {
            return Err(QuestionError::AnswerNotInOptions(answer));
        }

        Ok(Self {
            id,
            prompt,
            options,
            answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> QuestionId {
        self.id
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    #[must_use]
    pub fn answer(&self) -> &str {
        &self.answer
    }

    /// Returns true if `option` is one of this question's choices.
    #[must_use]
    pub fn has_option(&self, option: &str) -> bool {
        self.options.iter().any(|o| o == option)
    }

    #[must_use]
    pub fn is_correct(&self, option: &str) -> bool {
        self.answer == option
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn valid_question_exposes_fields() {
        let q = Question::new(
            QuestionId::new(7),
            "What does a red octagon mean?",
            opts(&["Yield", "Stop", "Merge", "No entry"]),
            "Stop",
        )
        .unwrap();

        assert_eq!(q.id(), QuestionId::new(7));
        assert_eq!(q.options().len(), 4);
        assert!(q.has_option("Merge"));
        assert!(q.is_correct("Stop"));
        assert!(!q.is_correct("Yield"));
    }

    #[test]
    fn rejects_blank_prompt() {
        let err = Question::new(QuestionId::new(1), "  ", opts(&["A", "B"]), "A").unwrap_err();
        assert_eq!(err, QuestionError::EmptyPrompt);
    }

    #[test]
    fn rejects_single_option() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A"]), "A").unwrap_err();
        assert_eq!(err, QuestionError::TooFewOptions { min: 2, actual: 1 });
    }

    #[test]
    fn rejects_blank_and_duplicate_options() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A", " "]), "A").unwrap_err();
        assert_eq!(err, QuestionError::EmptyOption { index: 1 });

        let err = Question::new(QuestionId::new(1), "Q", opts(&["A", "B", "A"]), "A").unwrap_err();
        assert_eq!(err, QuestionError::DuplicateOption("A".into()));
    }

    #[test]
    fn rejects_answer_outside_options() {
        let err = Question::new(QuestionId::new(1), "Q", opts(&["A", "B"]), "C").unwrap_err();
        assert_eq!(err, QuestionError::AnswerNotInOptions("C".into()));
    }
}
