use chrono::{DateTime, Utc};

use crate::models::{
    analysis::{AnalysisResult, PassStatus, PerformanceBand, QuestionResult},
    quiz::{AnswerMap, QuestionSet},
};

const UNKNOWN_TOPIC: &str = "Unknown";

/// Grades a finished quiz, stamping the result with the current time.
pub fn score(question_set: &QuestionSet, answers: &AnswerMap) -> AnalysisResult {
    score_at(question_set, answers, Utc::now())
}

/// Same as [`score`] with an explicit completion time.
pub fn score_at(
    question_set: &QuestionSet,
    answers: &AnswerMap,
    completed_at: DateTime<Utc>,
) -> AnalysisResult {
    let total_questions = question_set.len();
    let submission = answers.to_submission(total_questions);

    let results: Vec<QuestionResult> = question_set
        .questions()
        .iter()
        .zip(submission)
        .map(|(question, user_index)| QuestionResult {
            question_id: question.id.clone(),
            prompt: question.prompt.clone(),
            options: question.options.clone(),
            user_index,
            correct_index: question.correct_option_index,
            is_correct: user_index == Some(question.correct_option_index),
            explanation: question.explanation.clone(),
        })
        .collect();

    let correct_count = results.iter().filter(|result| result.is_correct).count();
    let percentage = rounded_percentage(correct_count, total_questions);

    AnalysisResult {
        results,
        correct_count,
        total_questions,
        percentage,
        score_exact: exact_score(correct_count, total_questions),
        performance_band: PerformanceBand::from_percentage(percentage),
        pass_status: PassStatus::from_percentage(percentage),
        completed_at,
        topic: question_set
            .topic()
            .unwrap_or(UNKNOWN_TOPIC)
            .to_string(),
    }
}

/// `correct / total * 100` rounded half up, in integer arithmetic.
fn rounded_percentage(correct: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((correct * 200 + total) / (2 * total)) as u32
}

fn exact_score(correct: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let score = correct as f64 / total as f64 * 100.0;
    (score * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::fixtures::question_set;
    use chrono::TimeZone;

    #[test]
    fn nine_of_ten_is_excellent() {
        let answers: AnswerMap = (0..9).map(|q| (q, q % 4)).collect();
        let completed_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
        let analysis = score_at(&question_set(), &answers, completed_at);

        assert_eq!(analysis.correct_count, 9);
        assert_eq!(analysis.percentage, 90);
        assert_eq!(analysis.performance_band, PerformanceBand::Excellent);
        assert_eq!(analysis.pass_status, PassStatus::Passed);
        assert_eq!(analysis.completed_at, completed_at);
        assert!(analysis.results[..9].iter().all(|result| result.is_correct));
        assert_eq!(analysis.results[9].user_index, None);
    }

    #[test]
    fn wrong_answers_score_zero() {
        let answers: AnswerMap = (0..10).map(|q| (q, (q + 2) % 4)).collect();
        let analysis = score(&question_set(), &answers);
        assert_eq!(analysis.correct_count, 0);
        assert_eq!(analysis.percentage, 0);
        assert_eq!(analysis.score_exact, 0.0);
        assert_eq!(analysis.pass_status, PassStatus::Failed);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(rounded_percentage(7, 10), 70);
        assert_eq!(rounded_percentage(0, 10), 0);
        assert_eq!(rounded_percentage(10, 10), 100);
        assert_eq!(rounded_percentage(1, 8), 13);
        assert_eq!(rounded_percentage(1, 3), 33);
        assert_eq!(rounded_percentage(2, 3), 67);
        assert_eq!(rounded_percentage(0, 0), 0);
    }

    #[test]
    fn exact_score_keeps_two_decimals() {
        assert_eq!(exact_score(7, 10), 70.0);
        assert_eq!(exact_score(1, 3), 33.33);
        assert_eq!(exact_score(2, 3), 66.67);
    }
}
