//! API 模块
//!
//! 负责 HTTP 路由与参数解析，业务逻辑都在 services 中

pub mod blog;
pub mod ela;
pub mod geography;
pub mod health;
pub mod math;
pub mod science;

use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::{AppError, AppResult};
use crate::services::{BlogService, PracticeService};

/// 所有路由共享的状态
#[derive(Clone)]
pub struct AppState {
    pub practice: Arc<PracticeService>,
    pub blog: Arc<BlogService>,
}

/// 组装完整路由
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(math::routes())
        .merge(science::routes())
        .merge(geography::routes())
        .merge(ela::routes())
        .merge(blog::routes())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// 查询参数为空时使用默认值
pub(crate) fn param_or<'a>(value: &'a Option<String>, default: &'a str) -> &'a str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
}

/// 解析可选参数，缺省时使用默认值，非法时返回 400
pub(crate) fn parse_param<T: std::str::FromStr + Default>(
    value: &Option<String>,
    message: &str,
) -> AppResult<T> {
    match value.as_deref().map(str::trim).filter(|v| !v.is_empty()) {
        None => Ok(T::default()),
        Some(raw) => raw.parse().map_err(|_| AppError::invalid_input(message)),
    }
}
