use quiz_core::model::{Question, QuestionId};
use sqlx::Row;

use crate::repository::{QuestionRecord, StorageError};

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn question_id_from_i64(v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization("question id sign overflow".into()))
}

pub(crate) fn question_id_to_i64(id: QuestionId) -> Result<i64, StorageError> {
    i64::try_from(id.value()).map_err(|_| StorageError::Serialization("question id overflow".into()))
}

pub(crate) fn encode_options(options: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

pub(crate) fn map_question_row(row: &sqlx::sqlite::SqliteRow) -> Result<Question, StorageError> {
    let id = question_id_from_i64(row.try_get("id").map_err(ser)?)?;
    let options_raw: String = row.try_get("options").map_err(ser)?;
    let options: Vec<String> = serde_json::from_str(&options_raw).map_err(ser)?;

    QuestionRecord {
        id,
        question: row.try_get("prompt").map_err(ser)?,
        options,
        answer: row.try_get("answer").map_err(ser)?,
    }
    .into_question()
}
