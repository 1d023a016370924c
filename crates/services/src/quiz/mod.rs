mod sampler;
mod view;
mod workflow;

// Public API of the quiz subsystem.
pub use sampler::{QuestionSampler, SamplerSeed};
pub use view::{OptionView, QuizView};
pub use workflow::{LoadState, QuizLoopService};
