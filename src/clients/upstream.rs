//! 上游响应的公共处理：状态码检查 → JSON 解析 → 校验 → 去信封

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::{AppError, AppResult, UpstreamError, UpstreamSource};
use crate::models::{PayloadIssues, Validate};
use crate::services::envelope::unwrap_envelope;

/// 创建共享的 HTTP 客户端
///
/// # 参数
/// - `timeout_secs`: 单次请求超时
/// - `follow_redirects`: 为 false 时由调用方自己处理 3xx
pub fn build_http_client(timeout_secs: u64, follow_redirects: bool) -> AppResult<reqwest::Client> {
    let policy = if follow_redirects {
        reqwest::redirect::Policy::default()
    } else {
        reqwest::redirect::Policy::none()
    };
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(policy)
        .user_agent(concat!("homework_hub/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AppError::config_invalid(format!("无法创建 HTTP 客户端: {}", e)))
}

/// 读取上游响应并解析为 `T`
///
/// # 返回
/// - 非 2xx：`UpstreamError::Status`，附带上游响应体
/// - 不是 JSON 或校验失败：`UpstreamError::InvalidPayload`
pub async fn read_payload<T>(response: reqwest::Response, source: UpstreamSource) -> AppResult<T>
where
    T: DeserializeOwned + Validate,
{
    let status = response.status();
    if !status.is_success() {
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let body = response.text().await.ok();
        warn!(
            "⚠️ {} 返回错误状态 {}: {}",
            source.label(),
            status.as_u16(),
            crate::utils::truncate_text(body.as_deref().unwrap_or_default(), 200)
        );
        return Err(AppError::Upstream(UpstreamError::Status {
            source,
            status: status.as_u16(),
            status_text,
            body,
        }));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| AppError::upstream_unreachable(source, e))?;
    let value: Value = serde_json::from_slice(&bytes).map_err(|e| {
        AppError::invalid_payload(
            source,
            PayloadIssues::form(format!("Response body is not valid JSON: {}", e)),
        )
    })?;

    debug!("{} 返回 {} 字节", source.label(), bytes.len());

    unwrap_envelope(value).map_err(|issues| {
        warn!("⚠️ {} 返回的数据未通过校验: {}", source.label(), issues);
        AppError::invalid_payload(source, issues)
    })
}
