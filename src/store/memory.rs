// src/store/memory.rs

use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::{
    error::AppError,
    models::{
        manual::{ManualAnswer, ManualQuestion, QuestionCategory},
        question::{NewAnswer, NewQuestion, QuestionType},
        quiz::{Quiz, QuizAnswer, QuizQuestion},
        reference::{ReferenceEntry, ReferenceGroup},
    },
};

use super::TriviaStore;

#[derive(Debug, Clone)]
struct QuizRow {
    id: i32,
    name: String,
    date: NaiveDate,
    max_score: i32,
}

#[derive(Debug, Clone)]
struct QuestionRow {
    id: i32,
    quiz_id: i32,
    question: NewQuestion,
}

#[derive(Debug, Clone)]
struct AnswerRow {
    question_id: i32,
    answer: NewAnswer,
}

#[derive(Debug, Default)]
struct MemoryState {
    next_id: i32,
    reference: HashMap<ReferenceGroup, Vec<ReferenceEntry>>,
    categories: Vec<QuestionCategory>,
    manual_questions: Vec<ManualQuestion>,
    manual_answers: Vec<ManualAnswer>,
    quizzes: Vec<QuizRow>,
    questions: Vec<QuestionRow>,
    answers: Vec<AnswerRow>,
    /// Play sessions: (play id, quiz id).
    plays: Vec<(i32, Option<i32>)>,
    /// Question and answer inserts still allowed before writes start failing.
    writes_left: Option<usize>,
}

impl MemoryState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn consume_write(&mut self) -> Result<(), AppError> {
        match self.writes_left.as_mut() {
            Some(0) => Err(AppError::PersistenceFailure(
                "simulated write failure".to_string(),
            )),
            Some(left) => {
                *left -= 1;
                Ok(())
            }
            None => Ok(()),
        }
    }

    fn flag_url(&self, code: Option<&str>) -> Option<String> {
        let code = code?;
        self.reference
            .get(&ReferenceGroup::WorldCountries)?
            .iter()
            .find(|e| e.code == code)
            .and_then(|e| e.flag_url.clone())
    }
}

/// `TriviaStore` keeping every table in memory.
///
/// Mirrors the filtering of `PgStore` so the generator behaves the same on
/// both. Seed it with the builder methods, then inspect what a run wrote.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: Mutex<MemoryState>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> Result<MutexGuard<'_, MemoryState>, AppError> {
        self.state
            .lock()
            .map_err(|_| AppError::PersistenceFailure("in-memory store poisoned".to_string()))
    }

    fn seed(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn with_reference(self, group: ReferenceGroup, entries: Vec<ReferenceEntry>) -> Self {
        self.seed().reference.insert(group, entries);
        self
    }

    pub fn add_category(&self, name: &str, is_active: bool, image_only: bool) -> i32 {
        let mut state = self.seed();
        let id = state.next_id();
        state.categories.push(QuestionCategory {
            id,
            name: name.to_string(),
            is_active,
            image_only,
        });
        id
    }

    /// Stores a manual question with its answers. The question id is assigned
    /// here; any id on `question` is ignored.
    pub fn add_manual_question(&self, mut question: ManualQuestion, answers: Vec<NewAnswer>) -> i32 {
        let mut state = self.seed();
        let id = state.next_id();
        question.id = id;
        state.manual_questions.push(question);

        for answer in answers {
            let answer_id = state.next_id();
            state.manual_answers.push(ManualAnswer {
                id: answer_id,
                manual_question_id: id,
                text: answer.text,
                is_correct: answer.is_correct,
                flag_code: answer.flag_code,
            });
        }
        id
    }

    /// Records a play session attached to a quiz.
    pub fn add_play(&self, quiz_id: i32) -> i32 {
        let mut state = self.seed();
        let id = state.next_id();
        state.plays.push((id, Some(quiz_id)));
        id
    }

    pub fn play_quiz_id(&self, play_id: i32) -> Option<i32> {
        self.seed()
            .plays
            .iter()
            .find(|(id, _)| *id == play_id)
            .and_then(|(_, quiz_id)| *quiz_id)
    }

    pub fn manual_question(&self, id: i32) -> Option<ManualQuestion> {
        self.seed()
            .manual_questions
            .iter()
            .find(|q| q.id == id)
            .cloned()
    }

    /// Allows `writes` more question/answer inserts, then fails every insert.
    pub fn fail_writes_after(&self, writes: usize) {
        self.seed().writes_left = Some(writes);
    }

    /// Total question rows across every quiz.
    pub fn question_count(&self) -> usize {
        self.seed().questions.len()
    }

    /// Total answer rows across every question.
    pub fn answer_count(&self) -> usize {
        self.seed().answers.len()
    }
}

#[async_trait]
impl TriviaStore for InMemoryStore {
    async fn get_reference_entries(
        &self,
        group: ReferenceGroup,
    ) -> Result<Vec<ReferenceEntry>, AppError> {
        Ok(self.state()?.reference.get(&group).cloned().unwrap_or_default())
    }

    async fn get_manual_questions_scheduled_today(
        &self,
        today: NaiveDate,
    ) -> Result<Vec<ManualQuestion>, AppError> {
        Ok(self
            .state()?
            .manual_questions
            .iter()
            .filter(|q| q.quiz_date == Some(today))
            .cloned()
            .collect())
    }

    async fn get_active_categories(
        &self,
        only_active: bool,
    ) -> Result<Vec<QuestionCategory>, AppError> {
        Ok(self
            .state()?
            .categories
            .iter()
            .filter(|c| !only_active || c.is_active)
            .cloned()
            .collect())
    }

    async fn get_manual_questions(
        &self,
        question_type: QuestionType,
        last_used_before: NaiveDate,
        allowed_categories: &[i32],
    ) -> Result<Vec<ManualQuestion>, AppError> {
        let mut candidates: Vec<ManualQuestion> = self
            .state()?
            .manual_questions
            .iter()
            .filter(|q| {
                q.question_type == question_type
                    && q.quiz_date.is_none()
                    && q.last_used.is_none_or(|used| used < last_used_before)
                    && allowed_categories.contains(&q.category_id)
            })
            .cloned()
            .collect();

        // Same ordering as the DISTINCT ON query: never used first, then stalest.
        candidates.sort_by_key(|q| (q.category_id, q.last_used, q.id));
        candidates.dedup_by_key(|q| q.category_id);

        Ok(candidates)
    }

    async fn get_manual_answers(
        &self,
        manual_question_id: i32,
    ) -> Result<Vec<ManualAnswer>, AppError> {
        Ok(self
            .state()?
            .manual_answers
            .iter()
            .filter(|a| a.manual_question_id == manual_question_id)
            .cloned()
            .collect())
    }

    async fn create_question(
        &self,
        quiz_id: i32,
        question: &NewQuestion,
    ) -> Result<i32, AppError> {
        let mut state = self.state()?;
        state.consume_write()?;

        if !state.quizzes.iter().any(|q| q.id == quiz_id) {
            return Err(AppError::PersistenceFailure(format!(
                "trivia {} does not exist",
                quiz_id
            )));
        }

        let id = state.next_id();
        state.questions.push(QuestionRow {
            id,
            quiz_id,
            question: question.clone(),
        });
        Ok(id)
    }

    async fn create_answer(&self, question_id: i32, answer: &NewAnswer) -> Result<(), AppError> {
        let mut state = self.state()?;
        state.consume_write()?;

        if !state.questions.iter().any(|q| q.id == question_id) {
            return Err(AppError::PersistenceFailure(format!(
                "trivia question {} does not exist",
                question_id
            )));
        }

        state.answers.push(AnswerRow {
            question_id,
            answer: answer.clone(),
        });
        Ok(())
    }

    async fn mark_manual_question_used(&self, id: i32, date: NaiveDate) -> Result<(), AppError> {
        let mut state = self.state()?;
        let question = state
            .manual_questions
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| AppError::NotFound(format!("manual question {} not found", id)))?;
        question.last_used = Some(date);
        Ok(())
    }

    async fn quiz_exists(&self, date: NaiveDate) -> Result<bool, AppError> {
        Ok(self.state()?.quizzes.iter().any(|q| q.date == date))
    }

    async fn create_quiz_row(&self, name: &str, date: NaiveDate) -> Result<i32, AppError> {
        let mut state = self.state()?;
        if state.quizzes.iter().any(|q| q.date == date) {
            return Err(AppError::AlreadyExists(format!(
                "trivia for {} already created",
                date
            )));
        }

        let id = state.next_id();
        state.quizzes.push(QuizRow {
            id,
            name: name.to_string(),
            date,
            max_score: 0,
        });
        Ok(id)
    }

    async fn set_quiz_max_score(&self, quiz_id: i32, max_score: i32) -> Result<(), AppError> {
        let mut state = self.state()?;
        let quiz = state
            .quizzes
            .iter_mut()
            .find(|q| q.id == quiz_id)
            .ok_or_else(|| AppError::NotFound(format!("trivia {} not found", quiz_id)))?;
        quiz.max_score = max_score;
        Ok(())
    }

    async fn get_quiz(&self, date: NaiveDate) -> Result<Option<Quiz>, AppError> {
        let state = self.state()?;
        let Some(row) = state.quizzes.iter().find(|q| q.date == date) else {
            return Ok(None);
        };

        let questions = state
            .questions
            .iter()
            .filter(|q| q.quiz_id == row.id)
            .map(|q| {
                let answers = state
                    .answers
                    .iter()
                    .filter(|a| a.question_id == q.id)
                    .map(|a| QuizAnswer {
                        text: a.answer.text.clone(),
                        is_correct: a.answer.is_correct,
                        flag_code: a.answer.flag_code.clone(),
                        flag_url: state.flag_url(a.answer.flag_code.as_deref()),
                    })
                    .collect();

                let question = &q.question;
                QuizQuestion {
                    id: q.id,
                    question_type: question.question_type,
                    question: question.question.clone(),
                    map_name: question.map.clone(),
                    highlighted: question.highlighted.clone(),
                    flag_code: question.flag_code.clone(),
                    flag_url: state.flag_url(question.flag_code.as_deref()),
                    image_url: question.image_url.clone(),
                    image_attribute_name: question.image_attribute_name.clone(),
                    image_attribute_url: question.image_attribute_url.clone(),
                    image_width: question.image_width,
                    image_height: question.image_height,
                    image_alt: question.image_alt.clone(),
                    explainer: question.explainer.clone(),
                    answers,
                }
            })
            .collect();

        Ok(Some(Quiz {
            id: row.id,
            name: row.name.clone(),
            date: row.date,
            max_score: row.max_score,
            questions,
        }))
    }

    async fn delete_quiz(&self, quiz: &Quiz) -> Result<(), AppError> {
        let mut state = self.state()?;

        for play in state.plays.iter_mut().filter(|(_, q)| *q == Some(quiz.id)) {
            play.1 = None;
        }

        for question in &quiz.questions {
            state.answers.retain(|a| a.question_id != question.id);
            state.questions.retain(|q| q.id != question.id);
        }

        state.quizzes.retain(|q| q.id != quiz.id);
        Ok(())
    }
}
