// src/generator/manual.rs

use std::collections::HashSet;

use chrono::NaiveDate;
use rand::{Rng, rngs::StdRng};

use crate::{
    error::AppError,
    models::{
        manual::ManualQuestion,
        question::{NewAnswer, validate_answers},
    },
    store::TriviaStore,
};

use super::procedural::{QuestionPlan, persist_plan};

/// Copies manual questions into one quiz.
///
/// Tracks every manual question assigned during the run so the same question
/// cannot land in the quiz twice, whichever pool it comes from.
pub struct ManualSelector<'a> {
    store: &'a dyn TriviaStore,
    quiz_id: i32,
    today: NaiveDate,
    assigned: HashSet<i32>,
}

impl<'a> ManualSelector<'a> {
    pub fn new(store: &'a dyn TriviaStore, quiz_id: i32, today: NaiveDate) -> Self {
        Self {
            store,
            quiz_id,
            today,
            assigned: HashSet::new(),
        }
    }

    /// Draws up to `quantity` questions from `pool` and writes them to the quiz.
    ///
    /// Each written question has its last-used date set to today, which keeps
    /// it out of the pool for the cooldown period. Returns how many were
    /// written; this is lower than `quantity` when the pool runs out.
    pub async fn select_and_assign(
        &mut self,
        rng: &mut StdRng,
        pool: Vec<ManualQuestion>,
        quantity: usize,
    ) -> Result<usize, AppError> {
        let mut pool: Vec<ManualQuestion> = pool
            .into_iter()
            .filter(|q| !self.assigned.contains(&q.id))
            .collect();
        let mut count = 0;

        while count < quantity && !pool.is_empty() {
            let index = rng.gen_range(0..pool.len());
            let manual = pool.swap_remove(index);
            if self.assigned.contains(&manual.id) {
                continue;
            }

            let answers: Vec<NewAnswer> = self
                .store
                .get_manual_answers(manual.id)
                .await?
                .iter()
                .map(NewAnswer::from)
                .collect();

            if let Err(reason) = validate_answers(&answers) {
                tracing::warn!("Skipping manual question {}: {}", manual.id, reason);
                continue;
            }

            let plan = QuestionPlan {
                question: manual.to_new_question(),
                answers,
            };
            persist_plan(self.store, self.quiz_id, &plan).await?;

            self.store
                .mark_manual_question_used(manual.id, self.today)
                .await?;
            self.assigned.insert(manual.id);
            count += 1;

            tracing::debug!(
                "Assigned manual question {} (category {}) to trivia {}",
                manual.id,
                manual.category_id,
                self.quiz_id
            );
        }

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::question::QuestionType, store::InMemoryStore};
    use rand::SeedableRng;

    fn text_question(store: &InMemoryStore, prompt: &str) -> ManualQuestion {
        let question = ManualQuestion {
            id: 0,
            question_type: QuestionType::Text,
            category_id: 1,
            question: prompt.to_string(),
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
            last_used: None,
            quiz_date: None,
        };
        let answers = vec![
            NewAnswer::correct(format!("{prompt} answer")),
            NewAnswer::incorrect("wrong a"),
            NewAnswer::incorrect("wrong b"),
        ];
        let id = store.add_manual_question(question, answers);
        store.manual_question(id).expect("just added")
    }

    async fn setup() -> (InMemoryStore, i32, NaiveDate) {
        let store = InMemoryStore::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let quiz_id = store.create_quiz_row("Friday, March 1", date).await.unwrap();
        (store, quiz_id, date)
    }

    #[tokio::test]
    async fn repeated_id_in_pool_is_assigned_once() {
        let (store, quiz_id, today) = setup().await;
        let question = text_question(&store, "Longest river");
        let mut selector = ManualSelector::new(&store, quiz_id, today);

        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let pool = vec![question.clone(), question.clone(), question.clone()];
            let written = selector.select_and_assign(&mut rng, pool, 3).await.unwrap();

            assert_eq!(written, if seed == 0 { 1 } else { 0 });
        }

        assert_eq!(store.question_count(), 1);
        assert_eq!(store.answer_count(), 3);
        assert_eq!(
            store.manual_question(question.id).unwrap().last_used,
            Some(today)
        );
    }

    #[tokio::test]
    async fn calls_sharing_a_pool_never_reuse_a_question() {
        let (store, quiz_id, today) = setup().await;
        let pool = vec![
            text_question(&store, "Highest peak"),
            text_question(&store, "Largest desert"),
        ];
        let mut selector = ManualSelector::new(&store, quiz_id, today);
        let mut rng = StdRng::seed_from_u64(3);

        let first = selector
            .select_and_assign(&mut rng, pool.clone(), 1)
            .await
            .unwrap();
        let second = selector
            .select_and_assign(&mut rng, pool.clone(), 2)
            .await
            .unwrap();
        let third = selector.select_and_assign(&mut rng, pool, 2).await.unwrap();

        assert_eq!((first, second, third), (1, 1, 0));
        assert_eq!(store.question_count(), 2);
    }

    #[tokio::test]
    async fn short_pool_returns_short_count() {
        let (store, quiz_id, today) = setup().await;
        let pool = vec![
            text_question(&store, "Deepest lake"),
            text_question(&store, "Smallest country"),
        ];
        let mut selector = ManualSelector::new(&store, quiz_id, today);

        let written = selector
            .select_and_assign(&mut StdRng::seed_from_u64(8), pool, 5)
            .await
            .unwrap();

        assert_eq!(written, 2);
        assert_eq!(store.question_count(), 2);
    }
}
