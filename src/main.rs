// src/main.rs

use dotenvy::dotenv;
use rand::{SeedableRng, rngs::StdRng};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use trivia_generator::config::Config;
use trivia_generator::generator::{GenerationSettings, QuizAssembler};
use trivia_generator::routes;
use trivia_generator::state::AppState;
use trivia_generator::store::PgStore;

#[tokio::main]
async fn main() {
    // Load .env file (if present)
    dotenv().ok();

    // Load configuration from environment
    let config = Config::from_env();

    let file_appender = tracing_appender::rolling::daily("logs", "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = EnvFilter::new(&config.rust_log);
    let stdout_layer = fmt::layer().with_writer(std::io::stdout).with_target(false);
    let file_layer = fmt::layer().with_writer(non_blocking).with_ansi(false);

    // Initialize Tracing (Logging)
    tracing_subscriber::registry()
        .with(env_filter)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    for warning in &config.warnings {
        tracing::warn!("{}", warning);
    }

    // Initialize Database Pool with Retry
    let mut retry_count = 0;
    let pool = loop {
        match PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
        {
            Ok(pool) => break pool,
            Err(e) => {
                retry_count += 1;
                if retry_count > 5 {
                    panic!("Failed to connect to database after 5 retries: {}", e);
                }
                tracing::warn!("Database not ready, retrying in 2s... (Attempt {})", retry_count);
                tokio::time::sleep(Duration::from_secs(2)).await;
            }
        }
    };

    tracing::info!("Database connected...");

    let settings = GenerationSettings::from(&config);
    tracing::info!(
        "Generating up to {} questions per trivia, {} day cooldown",
        settings.max_questions,
        settings.cooldown_days
    );

    let assembler = QuizAssembler::new(
        Arc::new(PgStore::new(pool)),
        settings,
        StdRng::from_entropy(),
    );

    // Create AppState
    let state = AppState {
        assembler: Arc::new(assembler),
        config: config.clone(),
    };

    // Create the Axum application router
    let app = routes::create_router(state);

    let addr: SocketAddr = config
        .listen_addr
        .parse()
        .expect("LISTEN_ADDR must be a socket address");
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();

    // Peer addresses feed the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .unwrap();
}
