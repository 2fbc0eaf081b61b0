use serde_json::{json, Value};

use super::validator::validate;
use crate::models::quiz::{QuestionSet, OPTION_COUNT, QUIZ_LENGTH};

/// Ten questions whose correct options cycle 0, 1, 2, 3, 0, 1, ...
pub(crate) fn payload() -> Value {
    let items: Vec<Value> = (0..QUIZ_LENGTH)
        .map(|i| {
            json!({
                "id": i + 1,
                "question": format!("Question {}?", i + 1),
                "options": ["Alpha", "Beta", "Gamma", "Delta"],
                "correctAnswer": i % OPTION_COUNT,
                "explanation": format!("Explanation {}", i + 1),
            })
        })
        .collect();
    Value::Array(items)
}

pub(crate) fn question_set() -> QuestionSet {
    match validate(&payload()) {
        Ok(question_set) => question_set,
        Err(error) => panic!("fixture payload is invalid: {}", error),
    }
}
