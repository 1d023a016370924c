//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuizSetError;
use storage::StorageError;

/// Errors emitted by `QuestionSampler`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SamplerError {
    #[error("question pool is empty")]
    EmptyPool,
    #[error("cannot draw {required} questions from a pool of {available}")]
    PoolTooSmall { available: usize, required: usize },
    #[error(transparent)]
    QuizSet(#[from] QuizSetError),
}

/// Why the question pool could not be used.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PoolLoadReason {
    #[error("the question bank is empty")]
    Empty,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted while starting a quiz.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizError {
    #[error("no questions available: {0}")]
    PoolLoad(#[source] PoolLoadReason),
    #[error("cannot draw {required} questions from a pool of {available}")]
    SamplingImpossible { available: usize, required: usize },
    #[error(transparent)]
    QuizSet(#[from] QuizSetError),
    #[error("quiz load was cancelled")]
    Cancelled,
}

impl From<SamplerError> for QuizError {
    fn from(err: SamplerError) -> Self {
        match err {
            SamplerError::EmptyPool => QuizError::PoolLoad(PoolLoadReason::Empty),
            SamplerError::PoolTooSmall {
                available,
                required,
            } => QuizError::SamplingImpossible {
                available,
                required,
            },
            SamplerError::QuizSet(e) => QuizError::QuizSet(e),
        }
    }
}
