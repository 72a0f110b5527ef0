// src/routes.rs

use std::sync::Arc;

use axum::{
    Json, Router,
    http::{HeaderValue, Method, header},
    routing::{get, post},
};
use tower_governor::{GovernorLayer, governor::GovernorConfigBuilder};
use tower_http::{
    cors::{AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;

use crate::{
    config::Config,
    handlers::trivia,
    models::{
        question::QuestionType,
        quiz::{GenerationSummary, Quiz, QuizAnswer, QuizQuestion},
    },
    state::AppState,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        trivia::ping,
        trivia::create_trivia,
        trivia::regenerate_trivia,
        trivia::get_trivia
    ),
    components(schemas(GenerationSummary, Quiz, QuizQuestion, QuizAnswer, QuestionType))
)]
pub struct ApiDoc;

/// Assembles the main application router.
///
/// * Mounts the ping, trivia and OpenAPI routes.
/// * Applies global middleware (Trace, CORS, and rate limiting when enabled).
/// * Injects global state (the quiz assembler).
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let trivia_routes = Router::new()
        .route("/", post(trivia::create_trivia))
        .route(
            "/{date}",
            get(trivia::get_trivia).put(trivia::regenerate_trivia),
        );

    let mut router = Router::new()
        .route("/", get(trivia::ping))
        .route(
            "/api-docs/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        )
        .nest("/api/trivia", trivia_routes);

    // Per-IP limit; requires serving with connect info.
    if let Some(interval_ms) = replenish_interval_ms(state.config.rate_limit_per_second) {
        let governor_conf = GovernorConfigBuilder::default()
            .per_millisecond(interval_ms)
            .burst_size(state.config.rate_limit_burst.max(1))
            .finish();

        match governor_conf {
            Some(conf) => router = router.layer(GovernorLayer::new(Arc::new(conf))),
            None => tracing::warn!("Invalid rate limit settings, rate limiting disabled"),
        }
    }

    router
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Milliseconds between quota refills for a limit of `per_second` requests
/// per second. `None` when rate limiting is off.
fn replenish_interval_ms(per_second: u64) -> Option<u64> {
    (per_second > 0).then(|| (1000 / per_second).max(1))
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allow_origin = if config.cors_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        AllowOrigin::list(parse_origins(config))
    };

    let methods: Vec<Method> = config
        .cors_methods
        .iter()
        .filter_map(|method| method.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(AllowMethods::list(methods))
        .allow_headers([header::CONTENT_TYPE])
}

fn parse_origins(config: &Config) -> Vec<HeaderValue> {
    config
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect()
}
