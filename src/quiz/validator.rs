//! Gatekeeper between untrusted question payloads and a runnable quiz.
//!
//! Payloads usually come straight out of a text generation model, so the
//! field names it emits (`question`, `correctAnswer`) are accepted next to
//! the internal ones (`prompt`, `correctOptionIndex`).

use std::collections::HashSet;

use serde_json::{Map, Value};

use super::error::{ValidationError, ValidationResult};
use crate::models::quiz::{Question, QuestionId, QuestionSet, OPTION_COUNT, QUIZ_LENGTH};

const PROMPT_FIELDS: [&str; 2] = ["question", "prompt"];
const CORRECT_INDEX_FIELDS: [&str; 2] = ["correctAnswer", "correctOptionIndex"];

/// Validates a parsed payload. The first bad question aborts the whole set.
pub fn validate(raw: &Value) -> ValidationResult<QuestionSet> {
    let items = raw.as_array().ok_or_else(|| ValidationError::Shape {
        expected: QUIZ_LENGTH,
        found: describe(raw).to_string(),
    })?;

    if items.len() != QUIZ_LENGTH {
        return Err(ValidationError::Shape {
            expected: QUIZ_LENGTH,
            found: format!("{} items", items.len()),
        });
    }

    let mut questions = Vec::with_capacity(QUIZ_LENGTH);
    let mut seen_ids = HashSet::new();
    for (index, item) in items.iter().enumerate() {
        let question = validate_question(index, item)?;
        if !seen_ids.insert(question.id.clone()) {
            return Err(ValidationError::DuplicateId { index });
        }
        questions.push(question);
    }

    Ok(QuestionSet::new(questions))
}

/// Validates raw model output, tolerating a surrounding markdown code fence.
pub fn validate_text(text: &str) -> ValidationResult<QuestionSet> {
    let raw: Value = serde_json::from_str(strip_code_fences(text))?;
    validate(&raw)
}

fn validate_question(index: usize, item: &Value) -> ValidationResult<Question> {
    let object = item.as_object().ok_or(ValidationError::MissingField {
        index,
        field: "question object",
    })?;

    let id = field(object, &["id"])
        .and_then(as_question_id)
        .ok_or(ValidationError::MissingField { index, field: "id" })?;

    let prompt = field(object, &PROMPT_FIELDS)
        .and_then(non_empty_str)
        .ok_or(ValidationError::MissingField {
            index,
            field: "question",
        })?;

    let raw_options = match field(object, &["options"]).and_then(Value::as_array) {
        Some(options) => options,
        None => {
            return Err(ValidationError::OptionCount {
                index,
                expected: OPTION_COUNT,
                found: 0,
            })
        }
    };
    if raw_options.len() != OPTION_COUNT {
        return Err(ValidationError::OptionCount {
            index,
            expected: OPTION_COUNT,
            found: raw_options.len(),
        });
    }

    let mut options = Vec::with_capacity(OPTION_COUNT);
    for option in raw_options {
        let text = option.as_str().ok_or(ValidationError::MissingField {
            index,
            field: "options",
        })?;
        if options.iter().any(|existing: &String| existing == text) {
            return Err(ValidationError::DuplicateOption { index });
        }
        options.push(text.to_string());
    }

    let correct_option_index = field(object, &CORRECT_INDEX_FIELDS)
        .and_then(as_index)
        .filter(|correct| *correct < OPTION_COUNT)
        .ok_or(ValidationError::IndexRange {
            index,
            max: OPTION_COUNT - 1,
        })?;

    let explanation = field(object, &["explanation"])
        .and_then(non_empty_str)
        .ok_or(ValidationError::MissingField {
            index,
            field: "explanation",
        })?;

    Ok(Question {
        id,
        prompt: prompt.to_string(),
        options,
        correct_option_index,
        explanation: explanation.to_string(),
    })
}

fn field<'a>(object: &'a Map<String, Value>, names: &[&str]) -> Option<&'a Value> {
    names
        .iter()
        .filter_map(|name| object.get(*name))
        .find(|value| !value.is_null())
}

fn non_empty_str(value: &Value) -> Option<&str> {
    value.as_str().filter(|text| !text.is_empty())
}

fn as_question_id(value: &Value) -> Option<QuestionId> {
    match value {
        Value::Number(_) => as_integer(value).map(QuestionId::Number),
        Value::String(text) if !text.is_empty() => Some(QuestionId::Text(text.clone())),
        _ => None,
    }
}

fn as_integer(value: &Value) -> Option<i64> {
    if let Some(number) = value.as_i64() {
        return Some(number);
    }
    value
        .as_f64()
        .filter(|number| number.fract() == 0.0 && number.abs() < i64::MAX as f64)
        .map(|number| number as i64)
}

fn as_index(value: &Value) -> Option<usize> {
    as_integer(value).and_then(|number| usize::try_from(number).ok())
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

fn strip_code_fences(text: &str) -> &str {
    let trimmed = text.trim();
    let body = if let Some(rest) = trimmed.strip_prefix("```json") {
        rest
    } else if let Some(rest) = trimmed.strip_prefix("```") {
        rest
    } else {
        return trimmed;
    };

    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.strip_suffix("```").unwrap_or(body);
    body.strip_suffix('\n').unwrap_or(body)
}
