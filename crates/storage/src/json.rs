use std::path::PathBuf;

use async_trait::async_trait;
use quiz_core::model::Question;

use crate::repository::{QuestionBank, QuestionRecord, StorageError};

/// Question bank stored as a JSON array of `{ id, question, options, answer }` objects.
#[derive(Debug, Clone)]
pub struct JsonQuestionBank {
    path: PathBuf,
}

impl JsonQuestionBank {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Parse a JSON question bank.
///
/// # Errors
///
/// Returns `StorageError::Serialization` for malformed JSON and
/// `StorageError::InvalidRecord` for questions that fail validation.
pub fn parse_questions(bytes: &[u8]) -> Result<Vec<Question>, StorageError> {
    let records: Vec<QuestionRecord> =
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))?;
    records
        .into_iter()
        .map(QuestionRecord::into_question)
        .collect()
}

#[async_trait]
impl QuestionBank for JsonQuestionBank {
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::NotFound
            } else {
                StorageError::Io(e)
            }
        })?;
        let questions = parse_questions(&bytes)?;
        tracing::debug!(
            path = %self.path.display(),
            count = questions.len(),
            "loaded question bank"
        );
        Ok(questions)
    }
}
