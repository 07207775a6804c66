use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RequiredFields, ValidationError};
use crate::wire;

/// Highest star rating a rating question accepts.
pub const MAX_RATING: u8 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionKind {
    Choice,
    Comment,
    Rating,
    Other(i64),
}

impl QuestionKind {
    #[must_use]
    pub fn from_type_id(id: Option<i64>) -> Self {
        match id {
            Some(1) => QuestionKind::Choice,
            Some(2) => QuestionKind::Comment,
            Some(3) => QuestionKind::Rating,
            Some(other) => QuestionKind::Other(other),
            None => QuestionKind::Other(0),
        }
    }

    /// Comment questions are optional; every other kind needs an answer.
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, QuestionKind::Comment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackQuestion {
    pub id: u64,
    #[serde(default, deserialize_with = "wire::text")]
    pub name: String,
    #[serde(rename = "master_question_type_id", default, deserialize_with = "wire::opt_int")]
    pub type_id: Option<i64>,
    /// Comma-separated option ids, as sent by the backend.
    #[serde(
        rename = "master_course_feedback_answer_ids",
        default,
        deserialize_with = "wire::opt_text"
    )]
    pub answer_ids: Option<String>,
}

impl FeedbackQuestion {
    #[must_use]
    pub fn kind(&self) -> QuestionKind {
        QuestionKind::from_type_id(self.type_id)
    }

    fn allowed_option_ids(&self) -> Vec<u64> {
        self.answer_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .filter_map(|raw| raw.trim().parse().ok())
            .collect()
    }

    /// Options this question offers, in the order of `options`.
    #[must_use]
    pub fn options_for<'a>(&self, options: &'a [FeedbackOption]) -> Vec<&'a FeedbackOption> {
        let allowed = self.allowed_option_ids();
        options
            .iter()
            .filter(|option| allowed.contains(&option.id))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackOption {
    pub id: u64,
    #[serde(default, deserialize_with = "wire::text")]
    pub name: String,
}

/// Answers keyed by question id, stored the way the backend receives them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FeedbackAnswers {
    answers: BTreeMap<u64, String>,
}

impl FeedbackAnswers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_choice(&mut self, question_id: u64, option_id: u64) {
        self.answers.insert(question_id, option_id.to_string());
    }

    pub fn set_comment(&mut self, question_id: u64, text: impl Into<String>) {
        self.answers.insert(question_id, text.into());
    }

    /// Stores a star rating clamped to `1..=MAX_RATING`.
    pub fn set_rating(&mut self, question_id: u64, stars: u8) {
        let stars = stars.clamp(1, MAX_RATING);
        self.answers.insert(question_id, stars.to_string());
    }

    #[must_use]
    pub fn get(&self, question_id: u64) -> Option<&str> {
        self.answers.get(&question_id).map(String::as_str)
    }

    #[must_use]
    pub fn rating(&self, question_id: u64) -> Option<u8> {
        self.get(question_id).and_then(|raw| raw.parse().ok())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.answers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &str)> {
        self.answers.iter().map(|(id, value)| (*id, value.as_str()))
    }

    /// # Errors
    ///
    /// Returns `ValidationError` naming every required question without a non-blank answer.
    pub fn validate(&self, questions: &[FeedbackQuestion]) -> Result<(), ValidationError> {
        questions
            .iter()
            .filter(|question| question.kind().is_required())
            .fold(RequiredFields::new(), |fields, question| {
                fields.text(&question.name, self.get(question.id).unwrap_or_default())
            })
            .finish()
    }
}
