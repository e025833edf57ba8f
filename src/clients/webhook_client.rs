/// n8n Webhook 客户端
///
/// 所有请求都带 `x-api-key` 和 `Cache-Control: no-store`
use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use super::upstream::read_payload;
use crate::config::{require_pair, Config};
use crate::error::{AppError, AppResult, UpstreamSource};
use crate::models::Validate;

/// 一个已配置的 Webhook 地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookTarget {
    pub url: String,
    pub api_key: String,
}

impl WebhookTarget {
    /// 从配置中取出 Webhook 地址和 `N8N_API_KEY`
    ///
    /// # 参数
    /// - `var_name`: Webhook 地址对应的环境变量名
    /// - `url`: Webhook 地址
    pub fn resolve(
        config: &Config,
        var_name: &'static str,
        url: &Option<String>,
    ) -> AppResult<Self> {
        let (url, api_key) = require_pair((var_name, url), ("N8N_API_KEY", &config.n8n_api_key))?;
        Ok(Self { url, api_key })
    }
}

/// n8n 客户端
#[derive(Clone)]
pub struct WebhookClient {
    http: reqwest::Client,
}

impl WebhookClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET 请求
    pub async fn get<T>(&self, target: &WebhookTarget) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        debug!("调用 n8n webhook (GET): {}", target.url);
        let response = self
            .http
            .get(&target.url)
            .header("x-api-key", &target.api_key)
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(UpstreamSource::N8n, e))?;
        read_payload(response, UpstreamSource::N8n).await
    }

    /// POST JSON 请求
    pub async fn post<T, B>(&self, target: &WebhookTarget, body: &B) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
        B: Serialize + ?Sized,
    {
        debug!("调用 n8n webhook (POST): {}", target.url);
        let response = self
            .http
            .post(&target.url)
            .header("x-api-key", &target.api_key)
            .header(CACHE_CONTROL, "no-store")
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(UpstreamSource::N8n, e))?;
        read_payload(response, UpstreamSource::N8n).await
    }
}
