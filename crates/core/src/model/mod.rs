mod ids;
mod outcome;
mod question;
mod quiz_set;
mod session;
pub mod style;

pub use ids::{QuestionId, SessionId};
pub use outcome::QuizOutcome;
pub use question::{Question, QuestionError};
pub use quiz_set::{QUIZ_SIZE, QuizSet, QuizSetError};
pub use session::{IgnoredReason, Progress, QuizSession, SessionEvent, SessionState, SlotState};
pub use style::{FeedbackMode, NextButton, NextLabel, OptionStyle, next_button, style_for};
