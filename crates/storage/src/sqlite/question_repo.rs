use chrono::Utc;
use quiz_core::model::Question;

use super::SqliteRepository;
use super::mapping::{encode_options, map_question_row, question_id_to_i64, ser};
use crate::repository::{QuestionBank, QuestionStore, StorageError};

#[async_trait::async_trait]
impl QuestionBank for SqliteRepository {
    async fn all_questions(&self) -> Result<Vec<Question>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, prompt, options, answer
            FROM questions
            ORDER BY id ASC
            ",
        )
        .fetch_all(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let questions = rows
            .iter()
            .map(map_question_row)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(count = questions.len(), "loaded questions from sqlite");
        Ok(questions)
    }
}

#[async_trait::async_trait]
impl QuestionStore for SqliteRepository {
    async fn upsert_question(&self, question: &Question) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO questions (id, prompt, options, answer, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                prompt = excluded.prompt,
                options = excluded.options,
                answer = excluded.answer,
                updated_at = excluded.updated_at
            ",
        )
        .bind(question_id_to_i64(question.id())?)
        .bind(question.prompt())
        .bind(encode_options(question.options())?)
        .bind(question.answer())
        .bind(Utc::now())
        .execute(self.pool())
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(())
    }

    async fn count_questions(&self) -> Result<u64, StorageError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM questions")
            .fetch_one(self.pool())
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        u64::try_from(count).map_err(ser)
    }
}
