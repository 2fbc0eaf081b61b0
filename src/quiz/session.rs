use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use super::{
    error::{SessionError, SessionResult},
    scoring::score,
};
use crate::models::{
    analysis::AnalysisResult,
    quiz::{AnswerMap, Question, QuestionSet, OPTION_COUNT, QUIZ_LENGTH},
};

/// Ten minutes, one tick per second.
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 600;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Active,
    Submitting,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SessionStatus::NotStarted => "not started",
            SessionStatus::Active => "active",
            SessionStatus::Submitting => "submitting",
            SessionStatus::Completed => "completed",
        };
        f.write_str(name)
    }
}

/// A single timed run over one question set.
///
/// The session goes `NotStarted -> Active -> Submitting -> Completed` and
/// never back. Every mutating call takes `&mut self`, so whoever shares a
/// session (the command handler and the timer task in the server) has to
/// serialize access; the `Active -> Submitting` step then decides which of
/// two competing submissions wins.
#[derive(Debug)]
pub struct QuizSession {
    question_set: Option<QuestionSet>,
    answers: AnswerMap,
    current_index: usize,
    time_limit: u32,
    remaining_seconds: u32,
    status: SessionStatus,
}

impl Default for QuizSession {
    fn default() -> Self {
        QuizSession::new()
    }
}

impl QuizSession {
    pub fn new() -> QuizSession {
        QuizSession::with_time_limit(DEFAULT_TIME_LIMIT_SECS)
    }

    pub fn with_time_limit(time_limit: u32) -> QuizSession {
        QuizSession {
            question_set: None,
            answers: AnswerMap::new(),
            current_index: 0,
            time_limit,
            remaining_seconds: time_limit,
            status: SessionStatus::NotStarted,
        }
    }

    /// Activates the session. A zero time limit is refused, since such a
    /// session would be out of time before its first tick.
    pub fn start(&mut self, question_set: QuestionSet) -> SessionResult<()> {
        self.require(SessionStatus::NotStarted, "start")?;
        if self.time_limit == 0 {
            return Err(SessionError::ZeroTimeLimit);
        }

        self.question_set = Some(question_set);
        self.answers = AnswerMap::new();
        self.current_index = 0;
        self.remaining_seconds = self.time_limit;
        self.status = SessionStatus::Active;
        Ok(())
    }

    /// Advances the clock by one second. Returns the analysis when this tick
    /// ran the clock out and submitted the quiz.
    pub fn tick(&mut self) -> SessionResult<Option<AnalysisResult>> {
        self.require(SessionStatus::Active, "tick")?;

        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds > 0 {
            return Ok(None);
        }

        info!("Time limit reached, submitting quiz");
        self.submit().map(Some)
    }

    pub fn select_answer(
        &mut self,
        question_index: usize,
        option_index: usize,
    ) -> SessionResult<()> {
        self.require(SessionStatus::Active, "select an answer")?;
        check_range("question index", question_index, self.question_count())?;
        check_range("option index", option_index, OPTION_COUNT)?;

        self.answers.record(question_index, option_index);
        Ok(())
    }

    pub fn go_to(&mut self, question_index: usize) -> SessionResult<()> {
        self.require(SessionStatus::Active, "navigate")?;
        self.current_index = question_index.min(self.last_index());
        Ok(())
    }

    pub fn next(&mut self) -> SessionResult<()> {
        self.require(SessionStatus::Active, "navigate")?;
        if self.current_index < self.last_index() {
            self.current_index += 1;
        }
        Ok(())
    }

    pub fn previous(&mut self) -> SessionResult<()> {
        self.require(SessionStatus::Active, "navigate")?;
        self.current_index = self.current_index.saturating_sub(1);
        Ok(())
    }

    /// Scores the quiz. Unanswered questions count as wrong.
    pub fn submit(&mut self) -> SessionResult<AnalysisResult> {
        self.require(SessionStatus::Active, "submit")?;
        let question_set = self
            .question_set
            .as_ref()
            .ok_or(SessionError::InvalidState {
                operation: "submit",
                status: SessionStatus::NotStarted,
            })?;
        self.status = SessionStatus::Submitting;

        let analysis = score(question_set, &self.answers);

        self.status = SessionStatus::Completed;
        Ok(analysis)
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn time_limit(&self) -> u32 {
        self.time_limit
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn question_set(&self) -> Option<&QuestionSet> {
        self.question_set.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.question_set
            .as_ref()
            .and_then(|question_set| question_set.get(self.current_index))
    }

    pub fn question_count(&self) -> usize {
        self.question_set
            .as_ref()
            .map_or(QUIZ_LENGTH, QuestionSet::len)
    }

    fn last_index(&self) -> usize {
        self.question_count().saturating_sub(1)
    }

    fn require(&self, expected: SessionStatus, operation: &'static str) -> SessionResult<()> {
        if self.status == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                status: self.status,
            })
        }
    }
}

fn check_range(what: &'static str, value: usize, bound: usize) -> SessionResult<()> {
    if value < bound {
        Ok(())
    } else {
        Err(SessionError::Range { what, value, bound })
    }
}
