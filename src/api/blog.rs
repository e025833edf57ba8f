//! 博客路由
//!
//! 调用方身份来自前置认证层设置的 `x-user-id` 请求头；没有该头视为匿名访客。

use axum::{
    extract::{rejection::JsonRejection, FromRequestParts, Path, State},
    http::{request::Parts, StatusCode},
    routing::{get, post},
    Json, Router,
};
use std::convert::Infallible;

use super::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{NewPost, Post, PostUpdate, Viewer};

/// 用户身份请求头
pub const USER_ID_HEADER: &str = "x-user-id";

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string);
        Ok(Viewer { user_id })
    }
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> AppResult<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::invalid_input(rejection.body_text()))
}

/// GET /api/blog/posts
pub async fn list_posts(State(state): State<AppState>, viewer: Viewer) -> Json<Vec<Post>> {
    Json(state.blog.list(&viewer).await)
}

/// POST /api/blog/posts
pub async fn create_post(
    State(state): State<AppState>,
    viewer: Viewer,
    body: Result<Json<NewPost>, JsonRejection>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let post = state.blog.create(&viewer, json_body(body)?).await?;
    Ok((StatusCode::CREATED, Json(post)))
}

/// GET /api/blog/posts/{slug}
pub async fn get_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
) -> AppResult<Json<Post>> {
    Ok(Json(state.blog.get(&viewer, &slug).await?))
}

/// PATCH /api/blog/posts/{slug}
pub async fn update_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
    body: Result<Json<PostUpdate>, JsonRejection>,
) -> AppResult<Json<Post>> {
    let update = json_body(body)?;
    Ok(Json(state.blog.update(&viewer, &slug, update).await?))
}

/// DELETE /api/blog/posts/{slug}
pub async fn delete_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
) -> AppResult<StatusCode> {
    state.blog.delete(&viewer, &slug).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/blog/posts/{slug}/enhance
///
/// 立即返回 202，润色在后台完成
pub async fn enhance_post(
    State(state): State<AppState>,
    viewer: Viewer,
    Path(slug): Path<String>,
) -> AppResult<(StatusCode, Json<Post>)> {
    let ticket = state.blog.start_enhancement(&viewer, &slug).await?;
    Ok((StatusCode::ACCEPTED, Json(ticket.post)))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/blog/posts", get(list_posts).post(create_post))
        .route(
            "/api/blog/posts/{slug}",
            get(get_post).patch(update_post).delete(delete_post),
        )
        .route("/api/blog/posts/{slug}/enhance", post(enhance_post))
}
