// src/models/question.rs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

/// Question type, stored as `typeid` in the `triviaquestions` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Text,
    Image,
    Flag,
    Map,
}

impl QuestionType {
    pub fn id(self) -> i32 {
        match self {
            QuestionType::Text => 1,
            QuestionType::Image => 2,
            QuestionType::Flag => 3,
            QuestionType::Map => 4,
        }
    }
}

impl TryFrom<i32> for QuestionType {
    type Error = AppError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            1 => Ok(QuestionType::Text),
            2 => Ok(QuestionType::Image),
            3 => Ok(QuestionType::Flag),
            4 => Ok(QuestionType::Map),
            other => Err(AppError::PersistenceFailure(format!(
                "unknown question type id {}",
                other
            ))),
        }
    }
}

/// A question about to be written for a quiz.
/// Optional media fields are `None` when the question does not use them.
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuestion {
    pub question_type: QuestionType,
    pub question: String,
    pub map: Option<String>,
    pub highlighted: Option<String>,
    pub flag_code: Option<String>,
    pub image_url: Option<String>,
    pub image_attribute_name: Option<String>,
    pub image_attribute_url: Option<String>,
    pub image_width: i32,
    pub image_height: i32,
    pub image_alt: Option<String>,
    pub explainer: Option<String>,
}

impl NewQuestion {
    /// A question highlighting `highlighted` on the named map.
    pub fn map(prompt: impl Into<String>, map: &str, highlighted: impl Into<String>) -> Self {
        Self {
            map: Some(map.to_string()),
            highlighted: Some(highlighted.into()),
            ..Self::blank(QuestionType::Map, prompt)
        }
    }

    /// A question showing the flag with the given code.
    pub fn flag(prompt: impl Into<String>, flag_code: impl Into<String>) -> Self {
        Self {
            flag_code: Some(flag_code.into()),
            ..Self::blank(QuestionType::Flag, prompt)
        }
    }

    fn blank(question_type: QuestionType, prompt: impl Into<String>) -> Self {
        Self {
            question_type,
            question: prompt.into(),
            map: None,
            highlighted: None,
            flag_code: None,
            image_url: None,
            image_attribute_name: None,
            image_attribute_url: None,
            image_width: 0,
            image_height: 0,
            image_alt: None,
            explainer: None,
        }
    }
}

/// An answer about to be written for a question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAnswer {
    pub text: String,
    pub is_correct: bool,
    pub flag_code: Option<String>,
}

impl NewAnswer {
    pub fn correct(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: true,
            flag_code: None,
        }
    }

    pub fn incorrect(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            is_correct: false,
            flag_code: None,
        }
    }
}

/// Checks the answer-set invariant: 2 to 4 answers, exactly one correct,
/// no duplicate text.
pub fn validate_answers(answers: &[NewAnswer]) -> Result<(), String> {
    if !(2..=4).contains(&answers.len()) {
        return Err(format!("expected 2 to 4 answers, got {}", answers.len()));
    }

    let correct = answers.iter().filter(|a| a.is_correct).count();
    if correct != 1 {
        return Err(format!("expected exactly one correct answer, got {}", correct));
    }

    let mut seen = std::collections::HashSet::new();
    for answer in answers {
        if !seen.insert(answer.text.as_str()) {
            return Err(format!("duplicate answer text '{}'", answer.text));
        }
    }

    Ok(())
}
