//! 英语（ELA）练习路由

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::Value;

use super::{param_or, AppState};
use crate::clients::JokeKind;
use crate::error::AppResult;
use crate::models::payloads::{
    Joke, ParagraphFeedback, ReadingQuestionView, SpellingWord, WordAnnotation,
};

/// 从 JSON 请求体中取字符串字段；请求体不是 JSON 时视为缺失
fn string_field(body: Result<Json<Value>, JsonRejection>, field: &str) -> Option<String> {
    let Json(value) = body.ok()?;
    value.get(field)?.as_str().map(str::to_string)
}

/// POST /api/ela/paragraph-review
pub async fn paragraph_review(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<ParagraphFeedback>> {
    let paragraph = string_field(body, "paragraph");
    Ok(Json(
        state
            .practice
            .paragraph_review(paragraph.as_deref())
            .await?,
    ))
}

/// POST /api/ela/spelling-annotation
pub async fn spelling_annotation(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> AppResult<Json<WordAnnotation>> {
    let word = string_field(body, "word");
    Ok(Json(
        state
            .practice
            .spelling_annotation(word.as_deref())
            .await?,
    ))
}

/// GET /api/ela/reading-comprehension
pub async fn reading_comprehension(
    State(state): State<AppState>,
) -> AppResult<Json<ReadingQuestionView>> {
    Ok(Json(state.practice.reading_comprehension().await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct SpellingQuery {
    pub difficulty: Option<String>,
}

/// GET /api/ela/spelling-test
///
/// 无法识别的难度只使用本地词库（混合难度），本接口不会失败
pub async fn spelling_test(
    State(state): State<AppState>,
    Query(query): Query<SpellingQuery>,
) -> Json<SpellingWord> {
    Json(state.practice.spelling_word(query.difficulty.as_deref()).await)
}

#[derive(Debug, Default, Deserialize)]
pub struct JokeQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/ela/joke
pub async fn joke(
    State(state): State<AppState>,
    Query(query): Query<JokeQuery>,
) -> AppResult<Json<Joke>> {
    let kind = JokeKind::parse(param_or(&query.kind, "chuck-norris"))?;
    Ok(Json(state.practice.joke(kind).await?))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/ela/paragraph-review", post(paragraph_review))
        .route("/api/ela/spelling-annotation", post(spelling_annotation))
        .route("/api/ela/reading-comprehension", get(reading_comprehension))
        .route("/api/ela/spelling-test", get(spelling_test))
        .route("/api/ela/joke", get(joke))
}
