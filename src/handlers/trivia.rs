// src/handlers/trivia.rs

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use rand::seq::SliceRandom;

use crate::{
    error::AppError,
    generator::QuizAssembler,
    models::quiz::{GenerationSummary, Quiz},
};

/// Liveness probe.
#[utoipa::path(get, path = "/", responses((status = 200, description = "Service is up")))]
pub async fn ping() -> &'static str {
    "PING SUCCESSFUL"
}

/// Generates the quiz for tomorrow.
///
/// * Fails with 409 if tomorrow's quiz already exists.
/// * The summary's `maxScore` is the number of questions actually created.
#[utoipa::path(
    post,
    path = "/api/trivia",
    responses(
        (status = 201, description = "Trivia created", body = GenerationSummary),
        (status = 409, description = "Trivia already exists for tomorrow"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn create_trivia(
    State(assembler): State<Arc<QuizAssembler>>,
) -> Result<impl IntoResponse, AppError> {
    let summary = assembler.create_next().await?;
    Ok((StatusCode::CREATED, Json(summary)))
}

/// Deletes and regenerates the quiz for a date (YYYY-MM-DD).
#[utoipa::path(
    put,
    path = "/api/trivia/{date}",
    params(("date" = String, Path, description = "Quiz date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Trivia regenerated", body = GenerationSummary),
        (status = 400, description = "Invalid date"),
        (status = 500, description = "Generation failed")
    )
)]
pub async fn regenerate_trivia(
    State(assembler): State<Arc<QuizAssembler>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let summary = assembler.regenerate_for_date(&date).await?;
    Ok(Json(summary))
}

/// Returns the stored quiz for a date.
///
/// Question order is shuffled on every call; answers too, when a question has
/// more than two of them.
#[utoipa::path(
    get,
    path = "/api/trivia/{date}",
    params(("date" = String, Path, description = "Quiz date, YYYY-MM-DD")),
    responses(
        (status = 200, description = "Stored trivia", body = Quiz),
        (status = 400, description = "Invalid date"),
        (status = 404, description = "No trivia for that date")
    )
)]
pub async fn get_trivia(
    State(assembler): State<Arc<QuizAssembler>>,
    Path(date): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let mut quiz = assembler.find_for_date(&date).await?;
    shuffle_for_display(&mut quiz);
    Ok(Json(quiz))
}

fn shuffle_for_display(quiz: &mut Quiz) {
    let mut rng = rand::thread_rng();
    quiz.questions.shuffle(&mut rng);
    for question in &mut quiz.questions {
        if question.answers.len() > 2 {
            question.answers.shuffle(&mut rng);
        }
    }
}
