// src/models/quiz.rs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::question::QuestionType;

/// Represents the 'trivia' table together with its questions and answers.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quiz {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub max_score: i32,
    pub questions: Vec<QuizQuestion>,
}

/// A stored question, with flag URLs resolved from `flagentries`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: i32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    pub map_name: Option<String>,
    pub highlighted: Option<String>,
    pub flag_code: Option<String>,
    pub flag_url: Option<String>,
    pub image_url: Option<String>,
    pub image_attribute_name: Option<String>,
    pub image_attribute_url: Option<String>,
    pub image_width: i32,
    pub image_height: i32,
    pub image_alt: Option<String>,
    pub explainer: Option<String>,
    pub answers: Vec<QuizAnswer>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct QuizAnswer {
    pub text: String,
    pub is_correct: bool,
    pub flag_code: Option<String>,
    pub flag_url: Option<String>,
}

/// Result of one generation run, returned by the create/regenerate endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerationSummary {
    pub quiz_id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub max_score: i32,
}
