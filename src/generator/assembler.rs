// src/generator/assembler.rs

use std::sync::Arc;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use tokio::sync::Mutex;

use crate::{
    config::{Config, PROCEDURAL_QUESTION_COUNT},
    error::AppError,
    models::{
        question::QuestionType,
        quiz::{GenerationSummary, Quiz},
        reference::ReferenceGroup,
    },
    store::TriviaStore,
    utils::date::{parse_quiz_date, quiz_name, today},
};

use super::{
    balancer::balance_categories,
    manual::ManualSelector,
    procedural::{self, persist_plan},
};

/// Tunables for one quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Total questions a quiz aims for.
    pub max_questions: usize,

    /// Days a manual question rests after being used.
    pub cooldown_days: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_questions: 10,
            cooldown_days: 7,
        }
    }
}

impl From<&Config> for GenerationSettings {
    fn from(config: &Config) -> Self {
        Self {
            max_questions: config.max_questions,
            cooldown_days: config.cooldown_days,
        }
    }
}

/// Progress of one generation run. Logged when a run fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    NotStarted,
    RowCreated,
    ProceduralFilled,
    ScheduledFilled,
    BalancedFilled,
    ScoreFinalized,
    Done,
}

/// Builds the daily quiz.
///
/// The RNG sits behind an async mutex held for a whole run, including the
/// delete step of a regeneration, so runs within one process never
/// interleave. Runs in separate processes rely on the unique date constraint
/// of the `trivia` table.
pub struct QuizAssembler {
    store: Arc<dyn TriviaStore>,
    settings: GenerationSettings,
    rng: Mutex<StdRng>,
}

impl QuizAssembler {
    pub fn new(store: Arc<dyn TriviaStore>, settings: GenerationSettings, rng: StdRng) -> Self {
        Self {
            store,
            settings,
            rng: Mutex::new(rng),
        }
    }

    pub fn settings(&self) -> GenerationSettings {
        self.settings
    }

    /// Creates tomorrow's quiz.
    pub async fn create_next(&self) -> Result<GenerationSummary, AppError> {
        let date = today()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::InvalidInput("date out of range".to_string()))?;
        self.create_for_date(date).await
    }

    /// Creates the quiz for `date`. Fails with `AlreadyExists` if one is there.
    pub async fn create_for_date(&self, date: NaiveDate) -> Result<GenerationSummary, AppError> {
        let mut rng = self.rng.lock().await;
        self.run(date, &mut rng).await
    }

    /// Deletes any quiz stored for `date_string` and generates it again.
    /// An invalid date fails before anything is touched.
    pub async fn regenerate_for_date(
        &self,
        date_string: &str,
    ) -> Result<GenerationSummary, AppError> {
        let date = parse_quiz_date(date_string)?;

        // Held across delete and create so regenerations cannot interleave.
        let mut rng = self.rng.lock().await;

        match self.store.get_quiz(date).await? {
            Some(existing) => {
                tracing::info!("Regenerating trivia {} for {}", existing.id, date);
                self.store.delete_quiz(&existing).await?;
            }
            None => tracing::info!("No trivia stored for {}, generating", date),
        }

        self.run(date, &mut rng).await
    }

    /// Looks up the stored quiz for `date_string`.
    pub async fn find_for_date(&self, date_string: &str) -> Result<Quiz, AppError> {
        let date = parse_quiz_date(date_string)?;
        self.store
            .get_quiz(date)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("no trivia for {}", date)))
    }

    async fn run(&self, date: NaiveDate, rng: &mut StdRng) -> Result<GenerationSummary, AppError> {
        let mut stage = AssemblyStage::NotStarted;

        match self.assemble(date, rng, &mut stage).await {
            Ok(summary) => {
                tracing::info!(
                    "Created trivia {} '{}' with {} questions",
                    summary.quiz_id,
                    summary.name,
                    summary.max_score
                );
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("Trivia generation for {} failed at {:?}: {}", date, stage, e);
                Err(e)
            }
        }
    }

    async fn assemble(
        &self,
        date: NaiveDate,
        rng: &mut StdRng,
        stage: &mut AssemblyStage,
    ) -> Result<GenerationSummary, AppError> {
        let store = self.store.as_ref();
        let max = self.settings.max_questions;

        if store.quiz_exists(date).await? {
            return Err(AppError::AlreadyExists(format!(
                "trivia for {} already created",
                date
            )));
        }

        let name = quiz_name(date);
        let quiz_id = store.create_quiz_row(&name, date).await?;
        advance(stage, AssemblyStage::RowCreated);

        let mut count = self.fill_procedural(quiz_id, rng).await?;
        advance(stage, AssemblyStage::ProceduralFilled);

        let today = today();
        let mut selector = ManualSelector::new(store, quiz_id, today);

        let scheduled = store.get_manual_questions_scheduled_today(today).await?;
        count += selector
            .select_and_assign(rng, scheduled, max.saturating_sub(count))
            .await?;
        advance(stage, AssemblyStage::ScheduledFilled);

        if count < max {
            count += self
                .fill_balanced(&mut selector, rng, today, max - count)
                .await?;
        }
        advance(stage, AssemblyStage::BalancedFilled);

        let max_score = i32::try_from(count)
            .map_err(|_| AppError::InvalidInput(format!("question count {} too large", count)))?;
        store.set_quiz_max_score(quiz_id, max_score).await?;
        advance(stage, AssemblyStage::ScoreFinalized);

        advance(stage, AssemblyStage::Done);
        Ok(GenerationSummary {
            quiz_id,
            name,
            date,
            max_score,
        })
    }

    /// Runs the four procedural generators in a fixed order.
    async fn fill_procedural(&self, quiz_id: i32, rng: &mut StdRng) -> Result<usize, AppError> {
        let store = self.store.as_ref();
        let countries = store
            .get_reference_entries(ReferenceGroup::WorldCountries)
            .await?;
        let capitals = store
            .get_reference_entries(ReferenceGroup::WorldCapitals)
            .await?;
        let states = store.get_reference_entries(ReferenceGroup::UsStates).await?;

        let plan = procedural::country_by_map(rng, &countries)?;
        persist_plan(store, quiz_id, &plan).await?;

        let plan = procedural::capital_by_map(rng, &countries, &capitals)?;
        persist_plan(store, quiz_id, &plan).await?;

        let plan = procedural::state_by_map(rng, &states)?;
        persist_plan(store, quiz_id, &plan).await?;

        let plan = procedural::country_by_flag(rng, &countries)?;
        persist_plan(store, quiz_id, &plan).await?;

        Ok(PROCEDURAL_QUESTION_COUNT)
    }

    /// Fills `remainder` slots from randomly chosen active categories,
    /// text questions first.
    async fn fill_balanced(
        &self,
        selector: &mut ManualSelector<'_>,
        rng: &mut StdRng,
        today: NaiveDate,
        remainder: usize,
    ) -> Result<usize, AppError> {
        let store = self.store.as_ref();
        let categories = store.get_active_categories(true).await?;
        let allocation = balance_categories(rng, &categories, remainder);

        let cutoff = today
            .checked_sub_days(Days::new(u64::from(self.settings.cooldown_days)))
            .unwrap_or(NaiveDate::MIN);

        let mut text_filled = 0;
        if !allocation.text_categories.is_empty() {
            let pool = store
                .get_manual_questions(QuestionType::Text, cutoff, &allocation.text_categories)
                .await?;
            text_filled = selector
                .select_and_assign(rng, pool, allocation.max_text_count)
                .await?;
        }

        let mut image_filled = 0;
        if !allocation.image_categories.is_empty() {
            let pool = store
                .get_manual_questions(QuestionType::Image, cutoff, &allocation.image_categories)
                .await?;
            image_filled = selector
                .select_and_assign(rng, pool, remainder - text_filled)
                .await?;
        }

        tracing::debug!(
            "Balanced fill: {} text, {} image of {} open slots",
            text_filled,
            image_filled,
            remainder
        );

        Ok(text_filled + image_filled)
    }
}

fn advance(stage: &mut AssemblyStage, next: AssemblyStage) {
    tracing::debug!("Trivia generation {:?} -> {:?}", stage, next);
    *stage = next;
}
