// src/models/manual.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::question::{NewAnswer, NewQuestion, QuestionType};

/// Represents the 'manualtriviaquestions' table.
/// A pre-authored question that can be copied into a quiz.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualQuestion {
    pub id: i32,
    pub question_type: QuestionType,
    pub category_id: i32,
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

    /// Date the question was last copied into a quiz. Drives the cooldown.
    pub last_used: Option<NaiveDate>,

    /// Date the question is scheduled for. `None` means it is in the general pool.
    pub quiz_date: Option<NaiveDate>,
}

impl ManualQuestion {
    /// Copies every field into a quiz question.
    pub fn to_new_question(&self) -> NewQuestion {
        NewQuestion {
            question_type: self.question_type,
            question: self.question.clone(),
            map: self.map.clone(),
            highlighted: self.highlighted.clone(),
            flag_code: self.flag_code.clone(),
            image_url: self.image_url.clone(),
            image_attribute_name: self.image_attribute_name.clone(),
            image_attribute_url: self.image_attribute_url.clone(),
            image_width: self.image_width,
            image_height: self.image_height,
            image_alt: self.image_alt.clone(),
            explainer: self.explainer.clone(),
        }
    }
}

/// Represents the 'manualtriviaanswers' table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualAnswer {
    pub id: i32,
    pub manual_question_id: i32,
    pub text: String,
    pub is_correct: bool,
    pub flag_code: Option<String>,
}

impl From<&ManualAnswer> for NewAnswer {
    fn from(answer: &ManualAnswer) -> Self {
        NewAnswer {
            text: answer.text.clone(),
            is_correct: answer.is_correct,
            flag_code: answer.flag_code.clone(),
        }
    }
}

/// Represents the 'triviaquestioncategory' table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct QuestionCategory {
    pub id: i32,
    pub name: String,
    pub is_active: bool,

    /// Image-only categories never feed the text bucket.
    pub image_only: bool,
}
