#![forbid(unsafe_code)]

pub mod error;
pub mod quiz;

pub use quiz_core::Clock;

pub use error::{PoolLoadReason, QuizError, SamplerError};
pub use quiz::{LoadState, OptionView, QuestionSampler, QuizLoopService, QuizView, SamplerSeed};
