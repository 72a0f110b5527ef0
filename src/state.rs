use std::sync::Arc;

use crate::config::Config;
use crate::generator::QuizAssembler;
use axum::extract::FromRef;

#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<QuizAssembler>,
    pub config: Config,
}

impl FromRef<AppState> for Arc<QuizAssembler> {
    fn from_ref(state: &AppState) -> Self {
        state.assembler.clone()
    }
}
