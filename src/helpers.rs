use serde_json::Value;
use tungstenite::Message;

use crate::{
    models::{communication::Command, quiz::QuestionSet},
    quiz::{
        error::ValidationResult,
        validator::{validate, validate_text},
    },
};

pub fn parse_command(msg: &Message) -> Result<Command, serde_json::Error> {
    serde_json::from_str(&msg.to_string())
}

/// Accepts either a question list or the raw model text that should contain one.
pub fn question_set_from_payload(
    topic: Option<String>,
    questions: &Value,
) -> ValidationResult<QuestionSet> {
    let question_set = match questions {
        Value::String(text) => validate_text(text)?,
        other => validate(other)?,
    };

    Ok(match topic {
        Some(topic) => question_set.with_topic(topic),
        None => question_set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::communication::UnauthorizedCommand, quiz::fixtures::payload};

    #[test]
    fn parse_command_reads_text_frames() {
        let msg = Message::Text(r#"{"startQuizFromPack": {"packName": "rust_basics"}}"#.to_string());
        match parse_command(&msg).unwrap() {
            Command::UnauthorizedCommand(UnauthorizedCommand::StartQuizFromPack { pack_name }) => {
                assert_eq!(pack_name, "rust_basics")
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_command_rejects_garbage() {
        assert!(parse_command(&Message::Text("hello".to_string())).is_err());
    }

    #[test]
    fn payload_may_be_model_text() {
        let text = format!("```json\n{}\n```", payload());
        let question_set =
            question_set_from_payload(Some("Rust".to_string()), &Value::String(text)).unwrap();
        assert_eq!(question_set.topic(), Some("Rust"));
        assert_eq!(question_set.len(), 10);

        let untagged = question_set_from_payload(None, &payload()).unwrap();
        assert_eq!(untagged.topic(), None);
    }
}
