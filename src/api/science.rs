use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{param_or, AppState};
use crate::error::AppResult;
use crate::models::payloads::{ScienceFact, ScienceQuiz};

/// GET /api/science/fact
pub async fn fact(State(state): State<AppState>) -> AppResult<Json<ScienceFact>> {
    Ok(Json(state.practice.science_fact().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct QuizQuery {
    pub topic: Option<String>,
}

/// GET /api/science/quiz
pub async fn quiz(
    State(state): State<AppState>,
    Query(query): Query<QuizQuery>,
) -> AppResult<Json<ScienceQuiz>> {
    let topic = param_or(&query.topic, "animals");
    Ok(Json(state.practice.science_quiz(topic).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/science/fact", get(fact))
        .route("/api/science/quiz", get(quiz))
}
