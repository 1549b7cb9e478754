pub mod flow;
pub mod input;
pub mod question;
pub mod questions;

use thiserror::Error;

pub use flow::{FlowOutcome, QuizFlow};
pub use question::{progress_percent, selection_hint, QuestionState, ToggleOutcome};

#[derive(Debug, Error)]
pub enum QuizError {
    #[error("the questionnaire has no questions")]
    NoQuestions,
    #[error("question id {0} is used more than once")]
    DuplicateId(String),
    #[error("question {0} has no options to choose from")]
    MissingOptions(String),
    #[error("question {0} has a minimum above its maximum")]
    InvalidBounds(String),
    #[error("question {0} needs a positive step")]
    InvalidStep(String),
    #[error("question {0} must allow at least one selection")]
    InvalidMaxSelections(String),
    #[error("failed to read questions: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse questions: {0}")]
    Parse(#[from] serde_json::Error),
}
