pub mod config;
pub mod helpers;
pub mod jwtoken;
pub mod registry;
pub mod server_messages;

pub mod handlers {
    pub mod command_handler;
    pub mod connection_handler;
    pub mod session_handler;
    pub mod timeout_handler;
}

pub mod loggers {
    pub mod file_logger;
}

pub mod models {
    pub mod analysis;
    pub mod communication;
    pub mod quiz;
}

pub mod quiz {
    pub mod error;
    pub mod scoring;
    pub mod session;
    pub mod validator;

    #[cfg(test)]
    pub(crate) mod fixtures;
}

pub mod storage {
    pub mod result_store;
}

pub use models::analysis::{AnalysisResult, PassStatus, PerformanceBand, QuestionResult};
pub use models::quiz::{AnswerMap, Question, QuestionId, QuestionSet, OPTION_COUNT, QUIZ_LENGTH};
pub use quiz::error::{SessionError, ValidationError};
pub use quiz::session::{QuizSession, SessionStatus, DEFAULT_TIME_LIMIT_SECS};
pub use quiz::validator::{validate, validate_text};
