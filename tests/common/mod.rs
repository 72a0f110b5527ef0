// tests/common/mod.rs

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use trivia_generator::{
    generator::{GenerationSettings, QuizAssembler},
    models::{
        manual::ManualQuestion,
        question::{NewAnswer, QuestionType},
        quiz::Quiz,
        reference::{ReferenceEntry, ReferenceGroup},
    },
    store::{InMemoryStore, TriviaStore},
};

/// (country, ISO code, capital) for the landmass countries plus a few others.
const COUNTRIES: &[(&str, &str, &str)] = &[
    ("Russia", "ru", "Moscow"),
    ("Canada", "ca", "Ottawa"),
    ("China", "cn", "Beijing"),
    ("United States", "us", "Washington D.C."),
    ("Brazil", "br", "Brasília"),
    ("Australia", "au", "Canberra"),
    ("India", "in", "New Delhi"),
    ("Argentina", "ar", "Buenos Aires"),
    ("Kazakhstan", "kz", "Astana"),
    ("Algeria", "dz", "Algiers"),
    ("Democratic Republic of the Congo", "cd", "Kinshasa"),
    ("Denmark", "dk", "Copenhagen"),
    ("Saudi Arabia", "sa", "Riyadh"),
    ("Mexico", "mx", "Mexico City"),
    ("Indonesia", "id", "Jakarta"),
    ("Sudan", "sd", "Khartoum"),
    ("Libya", "ly", "Tripoli"),
    ("Iran", "ir", "Tehran"),
    ("Mongolia", "mn", "Ulaanbaatar"),
    ("Peru", "pe", "Lima"),
    ("Chad", "td", "N'Djamena"),
    ("Niger", "ne", "Niamey"),
    ("Angola", "ao", "Luanda"),
    ("Mali", "ml", "Bamako"),
    ("South Africa", "za", "Pretoria"),
    ("Colombia", "co", "Bogotá"),
    ("Ethiopia", "et", "Addis Ababa"),
    ("Bolivia", "bo", "Sucre"),
    ("Mauritania", "mr", "Nouakchott"),
    ("Egypt", "eg", "Cairo"),
    ("Tanzania", "tz", "Dodoma"),
    ("Nigeria", "ng", "Abuja"),
    ("Venezuela", "ve", "Caracas"),
    ("Pakistan", "pk", "Islamabad"),
    ("Namibia", "na", "Windhoek"),
    ("Mozambique", "mz", "Maputo"),
    ("Turkey", "tr", "Ankara"),
    ("Chile", "cl", "Santiago"),
    ("Zambia", "zm", "Lusaka"),
    ("Myanmar", "mm", "Naypyidaw"),
    ("Afghanistan", "af", "Kabul"),
    ("Somalia", "so", "Mogadishu"),
    ("Central African Republic", "cf", "Bangui"),
    ("South Sudan", "ss", "Juba"),
    ("Ukraine", "ua", "Kyiv"),
    ("Madagascar", "mg", "Antananarivo"),
    ("Botswana", "bw", "Gaborone"),
    ("Kenya", "ke", "Nairobi"),
    ("France", "fr", "Paris"),
    ("Yemen", "ye", "Sana'a"),
    ("New Zealand", "nz", "Wellington"),
    ("Portugal", "pt", "Lisbon"),
    ("Japan", "jp", "Tokyo"),
    ("Iceland", "is", "Reykjavík"),
];

const STATES: &[(&str, &str)] = &[
    ("Texas", "us-tx"),
    ("Ohio", "us-oh"),
    ("Utah", "us-ut"),
    ("Iowa", "us-ia"),
    ("Maine", "us-me"),
    ("Idaho", "us-id"),
    ("Nevada", "us-nv"),
    ("Oregon", "us-or"),
];

pub fn countries() -> Vec<ReferenceEntry> {
    COUNTRIES
        .iter()
        .map(|(name, code, _)| ReferenceEntry {
            flag_url: Some(format!("https://flags.test/{code}.svg")),
            ..ReferenceEntry::new(code, name)
        })
        .collect()
}

pub fn capitals() -> Vec<ReferenceEntry> {
    COUNTRIES
        .iter()
        .map(|(_, code, capital)| ReferenceEntry::new(code, capital))
        .collect()
}

pub fn states() -> Vec<ReferenceEntry> {
    STATES
        .iter()
        .map(|(name, code)| ReferenceEntry::new(code, name))
        .collect()
}

/// A store holding full reference data and no manual questions.
pub fn reference_store() -> InMemoryStore {
    InMemoryStore::new()
        .with_reference(ReferenceGroup::WorldCountries, countries())
        .with_reference(ReferenceGroup::WorldCapitals, capitals())
        .with_reference(ReferenceGroup::UsStates, states())
}

pub fn manual_question(question_type: QuestionType, category_id: i32, prompt: &str) -> ManualQuestion {
    ManualQuestion {
        id: 0,
        question_type,
        category_id,
        question: prompt.to_string(),
        map: None,
        highlighted: None,
        flag_code: None,
        image_url: (question_type == QuestionType::Image)
            .then(|| format!("https://images.test/{category_id}.jpg")),
        image_attribute_name: None,
        image_attribute_url: None,
        image_width: 0,
        image_height: 0,
        image_alt: None,
        explainer: Some(format!("About {prompt}")),
        last_used: None,
        quiz_date: None,
    }
}

pub fn answers(correct: &str, wrong: &[&str]) -> Vec<NewAnswer> {
    std::iter::once(NewAnswer::correct(correct))
        .chain(wrong.iter().map(|w| NewAnswer::incorrect(*w)))
        .collect()
}

/// Adds a well-formed manual question and returns its id.
pub fn add_manual(store: &InMemoryStore, question: ManualQuestion) -> i32 {
    let prompt = question.question.clone();
    store.add_manual_question(
        question,
        answers(&format!("{prompt} answer"), &["wrong a", "wrong b", "wrong c"]),
    )
}

pub fn assembler(store: Arc<InMemoryStore>, seed: u64) -> QuizAssembler {
    QuizAssembler::new(
        store as Arc<dyn TriviaStore>,
        GenerationSettings::default(),
        StdRng::seed_from_u64(seed),
    )
}

/// Checks the structural invariants every generated quiz must satisfy.
pub fn assert_valid_quiz(quiz: &Quiz, quota: usize) {
    assert!(quiz.questions.len() <= quota, "too many questions");
    assert_eq!(quiz.max_score as usize, quiz.questions.len());

    for question in &quiz.questions {
        let correct = question.answers.iter().filter(|a| a.is_correct).count();
        assert_eq!(correct, 1, "question '{}' needs one correct answer", question.question);
        assert!(
            (2..=4).contains(&question.answers.len()),
            "question '{}' has {} answers",
            question.question,
            question.answers.len()
        );

        let texts: HashSet<_> = question.answers.iter().map(|a| a.text.as_str()).collect();
        assert_eq!(texts.len(), question.answers.len(), "duplicate answer text");
    }
}

pub fn count_of(quiz: &Quiz, question_type: QuestionType) -> usize {
    quiz.questions
        .iter()
        .filter(|q| q.question_type == question_type)
        .count()
}
