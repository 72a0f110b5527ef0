// src/config.rs

use std::env;
use dotenvy::dotenv;

/// Questions produced by the procedural generators on every quiz.
pub const PROCEDURAL_QUESTION_COUNT: usize = 4;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub rust_log: String,
    pub listen_addr: String,
    pub cors_origins: Vec<String>,
    pub cors_methods: Vec<String>,
    /// Requests per second per client IP. Zero disables rate limiting.
    pub rate_limit_per_second: u64,
    pub rate_limit_burst: u32,
    pub max_questions: usize,
    pub cooldown_days: u32,
    /// Problems found while loading. Logged by `main` once tracing is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let database_url = get("DATABASE_URL")
            .expect("DATABASE_URL must be set");

        let rust_log = get("RUST_LOG")
            .unwrap_or_else(|| "info".to_string());

        let listen_addr = get("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:8081".to_string());

        let cors_origins = split_list(&get("CORS_ORIGINS").unwrap_or_default());

        let cors_methods = split_list(
            &get("CORS_METHODS").unwrap_or_else(|| "GET,POST,PUT".to_string()),
        );

        let rate_limit_per_second = parse_or(&get, &mut warnings, "RATE_LIMIT_PER_SECOND", 1);
        let rate_limit_burst = parse_or(&get, &mut warnings, "RATE_LIMIT_BURST", 5);

        let mut max_questions = parse_or(&get, &mut warnings, "TRIVIA_MAX_QUESTIONS", 10);
        if max_questions < PROCEDURAL_QUESTION_COUNT {
            warnings.push(format!(
                "TRIVIA_MAX_QUESTIONS={} is below the procedural count, using {}",
                max_questions, PROCEDURAL_QUESTION_COUNT
            ));
            max_questions = PROCEDURAL_QUESTION_COUNT;
        }

        let cooldown_days = parse_or(&get, &mut warnings, "MANUAL_COOLDOWN_DAYS", 7);

        Self {
            database_url,
            rust_log,
            listen_addr,
            cors_origins,
            cors_methods,
            rate_limit_per_second,
            rate_limit_burst,
            max_questions,
            cooldown_days,
            warnings,
        }
    }
}

/// Splits a comma separated env value, dropping blanks.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_or<T: std::str::FromStr>(
    get: &impl Fn(&str) -> Option<String>,
    warnings: &mut Vec<String>,
    key: &str,
    default: T,
) -> T {
    match get(key) {
        Some(raw) => raw.parse().unwrap_or_else(|_| {
            warnings.push(format!("Invalid {} value '{}', using default", key, raw));
            default
        }),
        None => default,
    }
}
