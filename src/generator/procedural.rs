// src/generator/procedural.rs

//! Questions derived from reference data, needing no authoring.
//!
//! Each planner draws every random value up front and returns a
//! `QuestionPlan`; `persist_plan` writes it. The correct answer is always the
//! first answer of a plan, followed by the distractors in draw order.

use rand::{Rng, seq::SliceRandom};

use crate::{
    error::AppError,
    models::{
        question::{NewAnswer, NewQuestion},
        reference::ReferenceEntry,
    },
    store::TriviaStore,
};

use super::{landmass::TOP_LANDMASS, sampler::sample_without_replacement};

pub const DISTRACTOR_COUNT: usize = 3;

pub const WORLD_COUNTRIES_MAP: &str = "WorldCountries";
pub const WORLD_CAPITALS_MAP: &str = "WorldCapitals";
pub const US_STATES_MAP: &str = "UsStates";

/// A question and its answers, ready to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionPlan {
    pub question: NewQuestion,
    pub answers: Vec<NewAnswer>,
}

impl QuestionPlan {
    fn new(question: NewQuestion, correct: &str, distractors: Vec<&ReferenceEntry>) -> Self {
        let answers = std::iter::once(NewAnswer::correct(correct))
            .chain(distractors.into_iter().map(|e| NewAnswer::incorrect(&e.svg_name)))
            .collect();
        Self { question, answers }
    }
}

fn svg_name(entry: &ReferenceEntry) -> &str {
    &entry.svg_name
}

fn pick_landmass<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    TOP_LANDMASS[rng.gen_range(0..TOP_LANDMASS.len())]
}

fn pick_entry<'a, R: Rng + ?Sized>(
    rng: &mut R,
    entries: &'a [ReferenceEntry],
    what: &str,
) -> Result<&'a ReferenceEntry, AppError> {
    entries
        .choose(rng)
        .ok_or_else(|| AppError::PoolExhausted(format!("no {} to choose from", what)))
}

/// "Which country is highlighted above?" on the world map.
pub fn country_by_map<R: Rng + ?Sized>(
    rng: &mut R,
    countries: &[ReferenceEntry],
) -> Result<QuestionPlan, AppError> {
    let country = pick_landmass(rng);
    let distractors =
        sample_without_replacement(rng, countries, svg_name, country, DISTRACTOR_COUNT)?;

    Ok(QuestionPlan::new(
        NewQuestion::map("Which country is highlighted above?", WORLD_COUNTRIES_MAP, country),
        country,
        distractors,
    ))
}

/// "What is the capital city of X?" with the capital highlighted.
///
/// The capital is found by matching the country's code against the capitals
/// group. A country without a matching capital fails the generator.
pub fn capital_by_map<R: Rng + ?Sized>(
    rng: &mut R,
    countries: &[ReferenceEntry],
    capitals: &[ReferenceEntry],
) -> Result<QuestionPlan, AppError> {
    let country = pick_landmass(rng);

    let capital = countries
        .iter()
        .find(|c| c.svg_name == country)
        .and_then(|c| capitals.iter().find(|cap| cap.code == c.code))
        .map(|cap| cap.svg_name.as_str())
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            AppError::MissingReference(format!("no capital found for country '{}'", country))
        })?;

    let distractors =
        sample_without_replacement(rng, capitals, svg_name, capital, DISTRACTOR_COUNT)?;

    Ok(QuestionPlan::new(
        NewQuestion::map(
            format!("What is the capital city of {}?", country),
            WORLD_CAPITALS_MAP,
            capital,
        ),
        capital,
        distractors,
    ))
}

/// "Which US state is highlighted above?" on the US map.
pub fn state_by_map<R: Rng + ?Sized>(
    rng: &mut R,
    states: &[ReferenceEntry],
) -> Result<QuestionPlan, AppError> {
    let state = pick_entry(rng, states, "US states")?;
    let distractors =
        sample_without_replacement(rng, states, svg_name, &state.svg_name, DISTRACTOR_COUNT)?;

    Ok(QuestionPlan::new(
        NewQuestion::map("Which US state is highlighted above?", US_STATES_MAP, &state.svg_name),
        &state.svg_name,
        distractors,
    ))
}

/// "Which country has this flag?" for any country.
pub fn country_by_flag<R: Rng + ?Sized>(
    rng: &mut R,
    countries: &[ReferenceEntry],
) -> Result<QuestionPlan, AppError> {
    let country = pick_entry(rng, countries, "countries")?;
    let distractors =
        sample_without_replacement(rng, countries, svg_name, &country.svg_name, DISTRACTOR_COUNT)?;

    Ok(QuestionPlan::new(
        NewQuestion::flag("Which country has this flag?", &country.code),
        &country.svg_name,
        distractors,
    ))
}

/// Writes the question, then each answer in plan order.
/// Stops at the first failure; rows already written stay.
pub async fn persist_plan(
    store: &dyn TriviaStore,
    quiz_id: i32,
    plan: &QuestionPlan,
) -> Result<i32, AppError> {
    let question_id = store.create_question(quiz_id, &plan.question).await?;
    for answer in &plan.answers {
        store.create_answer(question_id, answer).await?;
    }
    Ok(question_id)
}
