use axum::{extract::State, routing::get, Json, Router};

use super::AppState;
use crate::error::AppResult;
use crate::models::payloads::CapitalQuestion;

/// GET /api/geography/capital
pub async fn capital(State(state): State<AppState>) -> AppResult<Json<CapitalQuestion>> {
    Ok(Json(state.practice.capital().await?))
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/api/geography/capital", get(capital))
}
