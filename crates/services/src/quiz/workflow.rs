use std::sync::Arc;

use quiz_core::model::{Question, QuizSession, SessionEvent};
use storage::QuestionBank;
use tokio_util::sync::CancellationToken;

use super::sampler::{QuestionSampler, SamplerSeed};
use crate::Clock;
use crate::error::{PoolLoadReason, QuizError};

/// What the front-end should show while and after the pool loads.
#[derive(Debug)]
pub enum LoadState {
    Loading,
    Ready(QuizSession),
    /// Terminal state; the quiz does not start and nothing is retried.
    Unavailable(QuizError),
    /// The load was abandoned before it resolved.
    Cancelled,
}

impl LoadState {
    #[must_use]
    pub fn from_result(result: Result<QuizSession, QuizError>) -> Self {
        match result {
            Ok(session) => LoadState::Ready(session),
            Err(QuizError::Cancelled) => LoadState::Cancelled,
            Err(err) => LoadState::Unavailable(err),
        }
    }
}

/// Orchestrates loading the pool, drawing a quiz and driving it.
#[derive(Clone)]
pub struct QuizLoopService {
    clock: Clock,
    bank: Arc<dyn QuestionBank>,
    sampler: QuestionSampler,
}

impl QuizLoopService {
    #[must_use]
    pub fn new(clock: Clock, bank: Arc<dyn QuestionBank>) -> Self {
        Self {
            clock,
            bank,
            sampler: QuestionSampler::default(),
        }
    }

    #[must_use]
    pub fn with_seed(mut self, seed: SamplerSeed) -> Self {
        self.sampler = QuestionSampler::new(seed);
        self
    }

    /// Load the pool once and start a quiz over a fresh sample.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::PoolLoad` if the bank fails or is empty (the sampler is not run),
    /// and `QuizError::SamplingImpossible` if the pool is smaller than a quiz.
    pub async fn start_quiz(&self) -> Result<QuizSession, QuizError> {
        let pool = self.load_pool().await?;
        self.build_session(&pool)
    }

    /// Like [`QuizLoopService::start_quiz`], but gives up as soon as `token` is cancelled.
    ///
    /// A pool that arrives after cancellation is dropped without being sampled.
    ///
    /// # Errors
    ///
    /// Returns `QuizError::Cancelled` on cancellation, otherwise as `start_quiz`.
    pub async fn start_quiz_cancellable(
        &self,
        token: &CancellationToken,
    ) -> Result<QuizSession, QuizError> {
        let pool = tokio::select! {
            biased;
            () = token.cancelled() => None,
            pool = self.load_pool() => Some(pool),
        };

        match pool {
            Some(pool) if !token.is_cancelled() => self.build_session(&pool?),
            _ => {
                tracing::info!("quiz load cancelled; discarding result");
                Err(QuizError::Cancelled)
            }
        }
    }

    /// Record `option` for the current question.
    pub fn select(&self, session: &mut QuizSession, option: &str) -> SessionEvent {
        let event = session.select(option);
        tracing::debug!(
            session_id = %session.id(),
            slot = session.current_index(),
            ?event,
            "select"
        );
        event
    }

    /// Move to the next question, completing the quiz from the last one.
    pub fn advance(&self, session: &mut QuizSession) -> SessionEvent {
        let event = session.advance();
        tracing::debug!(
            session_id = %session.id(),
            slot = session.current_index(),
            ?event,
            "advance"
        );
        if event == SessionEvent::Completed {
            let outcome = session.outcome();
            tracing::info!(
                session_id = %session.id(),
                correct = outcome.correct,
                total = outcome.total,
                "quiz completed"
            );
        }
        event
    }

    async fn load_pool(&self) -> Result<Vec<Question>, QuizError> {
        let pool = self.bank.all_questions().await.map_err(|err| {
            tracing::warn!(error = %err, "question bank failed to load");
            QuizError::PoolLoad(PoolLoadReason::Storage(err))
        })?;

        if pool.is_empty() {
            tracing::warn!("question bank is empty");
            return Err(QuizError::PoolLoad(PoolLoadReason::Empty));
        }

        tracing::info!(count = pool.len(), "question pool loaded");
        Ok(pool)
    }

    fn build_session(&self, pool: &[Question]) -> Result<QuizSession, QuizError> {
        let set = self.sampler.sample(pool)?;
        let session = QuizSession::start(set, self.clock);
        tracing::info!(
            session_id = %session.id(),
            started_at = %session.started_at(),
            "quiz started"
        );
        Ok(session)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{QUIZ_SIZE, QuestionId};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryQuestionBank;

    fn build_question(id: u64) -> Question {
        Question::new(
            QuestionId::new(id),
            format!("Q{id}"),
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            "B",
        )
        .unwrap()
    }

    fn service(n: u64) -> QuizLoopService {
        let bank = InMemoryQuestionBank::with_questions((0..n).map(build_question));
        QuizLoopService::new(fixed_clock(), Arc::new(bank)).with_seed(SamplerSeed::Fixed(3))
    }

    #[tokio::test]
    async fn starts_quiz_from_pool() {
        let session = service(15).start_quiz().await.unwrap();
        assert_eq!(session.quiz_set().questions().len(), QUIZ_SIZE);
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_locked());
    }

    #[tokio::test]
    async fn empty_bank_is_pool_load_error() {
        let err = service(0).start_quiz().await.unwrap_err();
        assert!(matches!(err, QuizError::PoolLoad(PoolLoadReason::Empty)));
    }

    #[tokio::test]
    async fn small_bank_is_sampling_impossible() {
        let err = service(4).start_quiz().await.unwrap_err();
        assert!(matches!(
            err,
            QuizError::SamplingImpossible {
                available: 4,
                required: 10
            }
        ));
    }

    #[tokio::test]
    async fn pre_cancelled_token_discards_load() {
        let token = CancellationToken::new();
        token.cancel();
        let err = service(15).start_quiz_cancellable(&token).await.unwrap_err();
        assert!(matches!(err, QuizError::Cancelled));
    }

    #[test]
    fn load_state_maps_results() {
        assert!(matches!(
            LoadState::from_result(Err(QuizError::Cancelled)),
            LoadState::Cancelled
        ));
        assert!(matches!(
            LoadState::from_result(Err(QuizError::PoolLoad(PoolLoadReason::Empty))),
            LoadState::Unavailable(QuizError::PoolLoad(PoolLoadReason::Empty))
        ));
    }
}
