// src/store/mod.rs

//! Data access for the generator.
//!
//! `TriviaStore` is the only seam between the quiz-assembly logic and
//! persistence. `PgStore` backs the running service; `InMemoryStore` backs the
//! tests and local experiments.
//!
//! A missing row is `Ok(None)` (or an empty list), never an error.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppError,
    models::{
        manual::{ManualAnswer, ManualQuestion, QuestionCategory},
        question::{NewAnswer, NewQuestion, QuestionType},
        quiz::Quiz,
        reference::{ReferenceEntry, ReferenceGroup},
    },
};

pub use memory::InMemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait TriviaStore: Send + Sync {
    async fn get_reference_entries(
        &self,
        group: ReferenceGroup,
    ) -> Result<Vec<ReferenceEntry>, AppError>;

    /// Manual questions whose quiz date is `today`.
    async fn get_manual_questions_scheduled_today(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ManualQuestion>, AppError>;

    async fn get_active_categories(
        &self,
        only_active: bool,
    ) -> Result<Vec<QuestionCategory>, AppError>;

    /// Unscheduled manual questions of `question_type` that were never used or
    /// last used before `last_used_before`, at most one per allowed category.
    async fn get_manual_questions(
        &self,
        question_type: QuestionType,
        last_used_before: NaiveDate,
        allowed_categories: &[i32],
    ) -> Result<Vec<ManualQuestion>, AppError>;

    async fn get_manual_answers(
        &self,
        manual_question_id: i32,
    ) -> Result<Vec<ManualAnswer>, AppError>;

    async fn create_question(&self, quiz_id: i32, question: &NewQuestion)
    -> Result<i32, AppError>;

    async fn create_answer(&self, question_id: i32, answer: &NewAnswer) -> Result<(), AppError>;

    async fn mark_manual_question_used(&self, id: i32, date: NaiveDate) -> Result<(), AppError>;

    async fn quiz_exists(&self, date: NaiveDate) -> Result<bool, AppError>;

    async fn create_quiz_row(&self, name: &str, date: NaiveDate) -> Result<i32, AppError>;

    async fn set_quiz_max_score(&self, quiz_id: i32, max_score: i32) -> Result<(), AppError>;

    async fn get_quiz(&self, date: NaiveDate) -> Result<Option<Quiz>, AppError>;

    /// Removes the quiz, its questions and answers, and detaches play sessions.
    async fn delete_quiz(&self, quiz: &Quiz) -> Result<(), AppError>;
}
