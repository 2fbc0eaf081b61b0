use serde::{Deserialize, Serialize};

use super::analysis::AnalysisResult;
use crate::quiz::session::SessionStatus;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "response", content = "data", rename_all = "camelCase")]
pub enum Response {
    #[serde(rename_all = "camelCase")]
    QuizStarted {
        token: String,
        session_id: String,
        total_questions: usize,
        time_limit: u32,
    },
    #[serde(rename_all = "camelCase")]
    QuestionResponse {
        index: usize,
        prompt: String,
        options: Vec<String>,
        selected: Option<usize>,
    },
    #[serde(rename_all = "camelCase")]
    AnswerRecorded {
        question_index: usize,
        option_index: usize,
        answered_count: usize,
    },
    #[serde(rename_all = "camelCase")]
    StateResponse {
        status: SessionStatus,
        current_index: usize,
        remaining_seconds: u32,
        answered_count: usize,
        total_questions: usize,
    },
    #[serde(rename_all = "camelCase")]
    TimerResponse { remaining_seconds: u32 },
    AnalysisResponse { analysis: Box<AnalysisResult> },
    #[serde(rename_all = "camelCase")]
    ErrorResponse { error_text: String },
}

/// Commands anyone may send; they open a new session.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum UnauthorizedCommand {
    StartQuiz {
        #[serde(default)]
        topic: Option<String>,
        /// A question list, or the raw text a model produced for one.
        questions: serde_json::Value,
    },
    /// Names a pack file in the server's pack directory, with or without
    /// its `.json` extension.
    #[serde(rename_all = "camelCase")]
    StartQuizFromPack { pack_name: String },
}

/// Commands acting on the session named by the accompanying token.
#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum SessionCommand {
    #[serde(rename_all = "camelCase")]
    SelectAnswer {
        question_index: usize,
        option_index: usize,
    },
    Next {},
    Previous {},
    #[serde(rename_all = "camelCase")]
    GoTo { question_index: usize },
    GetState {},
    Submit {},
    Resume {},
    GetResult {},
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
pub struct CommandTokenPair {
    #[serde(flatten)]
    pub command: SessionCommand,
    pub token: String,
}

#[derive(Serialize, Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Command {
    CommandTokenPair(CommandTokenPair),
    UnauthorizedCommand(UnauthorizedCommand),
}
