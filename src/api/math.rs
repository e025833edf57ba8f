//! 数学练习路由

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use super::{param_or, parse_param, AppState};
use crate::error::{AppError, AppResult};
use crate::generators::RangeProfile;
use crate::models::payloads::{
    MeasurementProblem, MoneyProblem, PatternProblem, TimeProblem, WordProblem,
};
use crate::models::{ArithmeticQuestion, AreaQuestion, Difficulty, LengthUnit, Operation};

const DIFFICULTY_MESSAGE: &str = "Difficulty must be 'easy', 'medium', or 'hard'.";

#[derive(Debug, Default, Deserialize)]
pub struct ArithmeticQuery {
    pub operation: Option<String>,
    pub difficulty: Option<String>,
    pub profile: Option<String>,
}

/// GET /api/math/arithmetic
pub async fn arithmetic(
    State(state): State<AppState>,
    Query(query): Query<ArithmeticQuery>,
) -> AppResult<Json<ArithmeticQuestion>> {
    let operation: Operation = match query.operation.as_deref().map(str::trim) {
        None | Some("") => return Err(AppError::invalid_input("Operation parameter is required.")),
        Some(raw) => raw.parse().map_err(|_| {
            AppError::invalid_input(
                "Operation must be 'addition', 'subtraction', 'multiplication', or 'division'.",
            )
        })?,
    };
    let difficulty: Difficulty = parse_param(&query.difficulty, DIFFICULTY_MESSAGE)?;
    let profile: RangeProfile =
        parse_param(&query.profile, "Profile must be 'race' or 'homework'.")?;

    Ok(Json(state.practice.arithmetic(operation, difficulty, profile)))
}

#[derive(Debug, Default, Deserialize)]
pub struct AreaQuery {
    pub difficulty: Option<String>,
    pub unit: Option<String>,
}

/// GET /api/math/area
pub async fn area(
    State(state): State<AppState>,
    Query(query): Query<AreaQuery>,
) -> AppResult<Json<AreaQuestion>> {
    let difficulty: Difficulty = parse_param(&query.difficulty, DIFFICULTY_MESSAGE)?;
    let unit: LengthUnit = parse_param(
        &query.unit,
        "Unit must be 'cm', 'feet', 'inches', or 'meters'.",
    )?;
    Ok(Json(state.practice.area(difficulty, unit)))
}

#[derive(Debug, Default, Deserialize)]
pub struct WordProblemQuery {
    pub grade: Option<String>,
    pub difficulty: Option<String>,
}

/// GET /api/math/word-problem
///
/// 参数校验先于配置检查
pub async fn word_problem(
    State(state): State<AppState>,
    Query(query): Query<WordProblemQuery>,
) -> AppResult<Json<WordProblem>> {
    let grade = match query.grade.as_deref().map(str::trim) {
        None | Some("") => return Err(AppError::invalid_input("Grade parameter is required.")),
        Some(raw) => raw
            .parse::<u8>()
            .ok()
            .filter(|g| (1..=12).contains(g))
            .ok_or_else(|| AppError::invalid_input("Grade must be a number between 1 and 12."))?,
    };
    let difficulty: Difficulty = parse_param(&query.difficulty, DIFFICULTY_MESSAGE)?;

    Ok(Json(state.practice.word_problem(grade, difficulty).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct KindQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

/// GET /api/math/pattern
pub async fn pattern(
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> AppResult<Json<PatternProblem>> {
    let kind = param_or(&query.kind, "number");
    Ok(Json(state.practice.pattern(kind).await?))
}

/// GET /api/math/time
pub async fn time(
    State(state): State<AppState>,
    Query(query): Query<KindQuery>,
) -> AppResult<Json<TimeProblem>> {
    let kind = param_or(&query.kind, "read");
    Ok(Json(state.practice.time(kind).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct MoneyQuery {
    pub operation: Option<String>,
}

/// GET /api/math/money
pub async fn money(
    State(state): State<AppState>,
    Query(query): Query<MoneyQuery>,
) -> AppResult<Json<MoneyProblem>> {
    let operation = param_or(&query.operation, "count");
    Ok(Json(state.practice.money(operation).await?))
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    pub from_unit: Option<String>,
    pub to_unit: Option<String>,
    pub value: Option<String>,
}

/// GET /api/measurement/convert
pub async fn convert(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> AppResult<Json<MeasurementProblem>> {
    let problem = state
        .practice
        .measurement(
            query.from_unit.as_deref(),
            query.to_unit.as_deref(),
            query.value.as_deref(),
        )
        .await?;
    Ok(Json(problem))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/math/arithmetic", get(arithmetic))
        .route("/api/math/area", get(area))
        .route("/api/math/word-problem", get(word_problem))
        .route("/api/math/pattern", get(pattern))
        .route("/api/math/time", get(time))
        .route("/api/math/money", get(money))
        .route("/api/measurement/convert", get(convert))
}
