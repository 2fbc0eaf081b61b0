use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Number of questions in every quiz.
pub const QUIZ_LENGTH: usize = 10;
/// Number of options offered per question.
pub const OPTION_COUNT: usize = 4;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum QuestionId {
    Number(i64),
    Text(String),
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionId::Number(id) => write!(f, "{}", id),
            QuestionId::Text(id) => write!(f, "{}", id),
        }
    }
}

#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: QuestionId,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option_index: usize,
    pub explanation: String,
}

/// A validated, read-only list of questions. Only the validator builds one.
#[derive(Clone, Debug)]
pub struct QuestionSet {
    questions: Vec<Question>,
    topic: Option<String>,
}

impl QuestionSet {
    pub(crate) fn new(questions: Vec<Question>) -> QuestionSet {
        QuestionSet {
            questions,
            topic: None,
        }
    }

    pub fn with_topic(mut self, topic: impl Into<String>) -> QuestionSet {
        self.topic = Some(topic.into());
        self
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn topic(&self) -> Option<&str> {
        self.topic.as_deref()
    }
}

/// Pack file as read from disk: a topic label and an unvalidated payload.
#[derive(Serialize, Deserialize, Debug)]
pub struct QuestionPack {
    #[serde(default)]
    pub topic: Option<String>,
    pub questions: serde_json::Value,
}

/// Selected option per question index. Last selection wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnswerMap {
    answers: BTreeMap<usize, usize>,
}

impl AnswerMap {
    pub fn new() -> AnswerMap {
        AnswerMap::default()
    }

    /// Records `option_index` for `question_index`, returning the replaced answer.
    pub fn record(&mut self, question_index: usize, option_index: usize) -> Option<usize> {
        self.answers.insert(question_index, option_index)
    }

    pub fn get(&self, question_index: usize) -> Option<usize> {
        self.answers.get(&question_index).copied()
    }

    pub fn len(&self) -> usize {
        self.answers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.answers.iter().map(|(q, o)| (*q, *o))
    }

    /// One slot per question; unanswered questions hold `None`.
    pub fn to_submission(&self, total: usize) -> Vec<Option<usize>> {
        (0..total).map(|index| self.get(index)).collect()
    }
}

impl FromIterator<(usize, usize)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (usize, usize)>>(iter: I) -> AnswerMap {
        let mut map = AnswerMap::new();
        for (question_index, option_index) in iter {
            map.record(question_index, option_index);
        }
        map
    }
}
