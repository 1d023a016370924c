use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, QuestionId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use thiserror::Error;

use crate::json::JsonQuestionBank;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("question {id} is invalid: {source}")]
    InvalidRecord {
        id: u64,
        #[source]
        source: QuestionError,
    },
}

/// Persisted shape of a question.
///
/// Field names follow the bank's JSON format (`question` holds the prompt), so
/// the same record is used for JSON files and `SQLite` rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u64,
    pub question: String,
    pub options: Vec<String>,
    pub answer: String,
}

impl QuestionRecord {
    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidRecord` if the record fails question validation.
    pub fn into_question(self) -> Result<Question, StorageError> {
        let id = self.id;
        Question::new(QuestionId::new(id), self.question, self.options, self.answer)
            .map_err(|source| StorageError::InvalidRecord { id, source })
    }
}

/// Read side of the question bank: the only thing a quiz needs.
#[async_trait]
pub trait QuestionBank: Send + Sync {
    /// Load every question in the bank.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read or holds invalid questions.
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError>;
}

/// Write side used by seeding and tests.
#[async_trait]
pub trait QuestionStore: QuestionBank {
    /// Persist or update a question.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the question cannot be stored.
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError>;

    /// # Errors
    ///
    /// Returns `StorageError` if the bank cannot be read.
    async fn count_questions(&self) -> Result<u64, StorageError>;
}

/// Simple in-memory bank for testing and prototyping. Questions come back ordered by id.
#[derive(Clone, Default)]
pub struct InMemoryQuestionBank {
    questions: Arc<Mutex<BTreeMap<QuestionId, Question>>>,
}

impl InMemoryQuestionBank {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_questions(questions: impl IntoIterator<Item = Question>) -> Self {
        let map = questions.into_iter().map(|q| (q.id(), q)).collect();
        Self {
            questions: Arc::new(Mutex::new(map)),
        }
    }
}

#[async_trait]
impl QuestionBank for InMemoryQuestionBank {
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.values().cloned().collect())
    }
}

#[async_trait]
impl QuestionStore for InMemoryQuestionBank {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        let mut guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(question.id(), question.clone());
        Ok(())
    }

    async fn count_questions(&self) -> Result<u64, StorageError> {
        let guard = self
            .questions
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.len() as u64)
    }
}

/// Holds the question bank behind a trait object for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionBank>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: impl IntoIterator<Item = Question>) -> Self {
        let bank: Arc<dyn QuestionBank> = Arc::new(InMemoryQuestionBank::with_questions(questions));
        Self { questions: bank }
    }

    /// Bank read from a JSON file on every load.
    #[must_use]
    pub fn json(path: impl Into<PathBuf>) -> Self {
        let bank: Arc<dyn QuestionBank> = Arc::new(JsonQuestionBank::new(path));
        Self { questions: bank }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["A".into(), "B".into()],
            "A",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn in_memory_bank_orders_by_id_and_upserts() {
        let bank = InMemoryQuestionBank::with_questions([build_question(3), build_question(1)]);
        bank.upsert_question(&build_question(2)).await.unwrap();
        bank.upsert_question(&build_question(1)).await.unwrap();

        let all = bank.all_questions().await.unwrap();
        let ids: Vec<u64> = all.iter().map(|q| q.id().value()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(bank.count_questions().await.unwrap(), 3);
    }

    #[test]
    fn valid_record_becomes_question() {
        let record = QuestionRecord {
            id: 9,
            question: "Q9".into(),
            options: vec!["A".into(), "B".into()],
            answer: "A".into(),
        };
        assert_eq!(record.into_question().unwrap(), build_question(9));
    }

    #[test]
    fn invalid_record_reports_id() {
        let record = QuestionRecord {
            id: 4,
            question: "Q".into(),
            options: vec!["A".into(), "B".into()],
            answer: "C".into(),
        };
        let err = record.into_question().unwrap_err();
        assert!(matches!(err, StorageError::InvalidRecord { id: 4, .. }));
    }
}
