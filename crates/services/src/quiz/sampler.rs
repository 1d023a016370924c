use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::seq::index;
use rand::{Rng, SeedableRng};

use quiz_core::model::{QUIZ_SIZE, Question, QuizSet};

use crate::error::SamplerError;

/// Source of randomness for sampling, fixed in tests the same way `Clock` is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SamplerSeed {
    #[default]
    Entropy,
    Fixed(u64),
}

impl SamplerSeed {
    fn rng(self) -> StdRng {
        match self {
            SamplerSeed::Entropy => StdRng::from_os_rng(),
            SamplerSeed::Fixed(seed) => StdRng::seed_from_u64(seed),
        }
    }
}

/// Draws the questions of a quiz from the full pool.
///
/// Indices are drawn uniformly without replacement, so sampling always
/// terminates; pools with fewer than `QUIZ_SIZE` distinct questions are rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionSampler {
    seed: SamplerSeed,
}

impl QuestionSampler {
    #[must_use]
    pub fn new(seed: SamplerSeed) -> Self {
        Self { seed }
    }

    /// Draw a quiz using this sampler's seed.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::EmptyPool` for an empty pool and
    /// `SamplerError::PoolTooSmall` when fewer than `QUIZ_SIZE` distinct questions exist.
    pub fn sample(&self, pool: &[Question]) -> Result<QuizSet, SamplerError> {
        let mut rng = self.seed.rng();
        Self::sample_with(pool, &mut rng)
    }

    /// Draw a quiz with a caller-provided RNG.
    ///
    /// # Errors
    ///
    /// Same as [`QuestionSampler::sample`].
    pub fn sample_with<R: Rng + ?Sized>(
        pool: &[Question],
        rng: &mut R,
    ) -> Result<QuizSet, SamplerError> {
        if pool.is_empty() {
            return Err(SamplerError::EmptyPool);
        }

        let mut seen = HashSet::with_capacity(pool.len());
        let distinct: Vec<&Question> = pool.iter().filter(|q| seen.insert(q.id())).collect();
        if distinct.len() < pool.len() {
            tracing::warn!(
                pool = pool.len(),
                distinct = distinct.len(),
                "question pool has repeated ids; keeping first occurrence"
            );
        }

        if distinct.len() < QUIZ_SIZE {
            return Err(SamplerError::PoolTooSmall {
                available: distinct.len(),
                required: QUIZ_SIZE,
            });
        }

        let picked = index::sample(rng, distinct.len(), QUIZ_SIZE);
        let questions = picked.iter().map(|i| distinct[i].clone()).collect();
        Ok(QuizSet::new(questions)?)
    }
}
