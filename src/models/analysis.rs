use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::quiz::QuestionId;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerformanceBand {
    Excellent,
    #[serde(rename = "Very Good")]
    VeryGood,
    Good,
    Average,
    #[serde(rename = "Needs Improvement")]
    NeedsImprovement,
}

impl PerformanceBand {
    /// Thresholds are checked from the top; the first match wins.
    pub fn from_percentage(percentage: u32) -> PerformanceBand {
        if percentage >= 90 {
            PerformanceBand::Excellent
        } else if percentage >= 80 {
            PerformanceBand::VeryGood
        } else if percentage >= 70 {
            PerformanceBand::Good
        } else if percentage >= 60 {
            PerformanceBand::Average
        } else {
            PerformanceBand::NeedsImprovement
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PerformanceBand::Excellent => "Excellent",
            PerformanceBand::VeryGood => "Very Good",
            PerformanceBand::Good => "Good",
            PerformanceBand::Average => "Average",
            PerformanceBand::NeedsImprovement => "Needs Improvement",
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Minimum percentage for a passing grade.
pub const PASS_MARK: u32 = 70;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassStatus {
    Passed,
    Failed,
}

impl PassStatus {
    pub fn from_percentage(percentage: u32) -> PassStatus {
        if percentage >= PASS_MARK {
            PassStatus::Passed
        } else {
            PassStatus::Failed
        }
    }
}

impl fmt::Display for PassStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PassStatus::Passed => f.write_str("Passed"),
            PassStatus::Failed => f.write_str("Failed"),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuestionResult {
    pub question_id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub user_index: Option<usize>,
    pub correct_index: usize,
    pub is_correct: bool,
    pub explanation: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    pub results: Vec<QuestionResult>,
    pub correct_count: usize,
    pub total_questions: usize,
    pub percentage: u32,
    pub score_exact: f64,
    pub performance_band: PerformanceBand,
    pub pass_status: PassStatus,
    pub completed_at: DateTime<Utc>,
    pub topic: String,
}
