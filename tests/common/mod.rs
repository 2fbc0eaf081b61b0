#![allow(dead_code)]

use quiz_engine_rust::{validate, QuestionSet, OPTION_COUNT, QUIZ_LENGTH};
use serde_json::{json, Value};

/// Ten questions whose correct options are 0, 1, 2, 3, 0, 1, 2, 3, 0, 1.
pub fn payload() -> Value {
    let items: Vec<Value> = (0..QUIZ_LENGTH)
        .map(|i| {
            json!({
                "id": format!("q{}", i),
                "question": format!("What is item {}?", i),
                "options": ["North", "East", "South", "West"],
                "correctAnswer": i % OPTION_COUNT,
                "explanation": format!("Item {} points that way", i),
            })
        })
        .collect();
    Value::Array(items)
}

pub fn question_set() -> QuestionSet {
    validate(&payload()).expect("fixture payload validates")
}

pub fn correct_index(question: usize) -> usize {
    question % OPTION_COUNT
}

pub fn wrong_index(question: usize) -> usize {
    (question + 1) % OPTION_COUNT
}
