/// Modal API 客户端
///
/// 手动跟随重定向，保证每一跳都带上 `X-API-Key`
use reqwest::header::{ACCEPT, CACHE_CONTROL, LOCATION};
use reqwest::Url;
use serde::de::DeserializeOwned;
use tracing::debug;

use super::upstream::read_payload;
use crate::config::{require_pair, Config};
use crate::error::{AppError, AppResult, UpstreamError, UpstreamSource};
use crate::models::Validate;

/// 最多跟随的重定向次数
pub const MAX_REDIRECTS: usize = 20;

const MODAL_ACCEPT: &str =
    "application/json,text/html,application/xhtml+xml,application/xml,text/*;q=0.9,image/*;q=0.8,*/*;q=0.7";

/// 已配置的 Modal 服务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalTarget {
    /// 去掉末尾 `/` 的基础地址
    pub base_url: String,
    pub api_key: String,
}

impl ModalTarget {
    pub fn resolve(config: &Config) -> AppResult<Self> {
        let (base_url, api_key) = require_pair(
            ("MODAL_BASE_URL", &config.modal_base_url),
            ("MODAL_API_KEY", &config.modal_api_key),
        )?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    /// 重定向地址：以 `http` 开头的原样使用，否则拼在基础地址后
    fn follow(&self, location: &str) -> String {
        if location.starts_with("http") {
            location.to_string()
        } else {
            format!("{}{}", self.base_url, location)
        }
    }
}

/// Modal 客户端，底层 HTTP 客户端必须关闭自动重定向
#[derive(Clone)]
pub struct ModalClient {
    http: reqwest::Client,
}

impl ModalClient {
    pub fn new(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// GET `base_url + path?params`
    ///
    /// # 参数
    /// - `target`: Modal 服务
    /// - `path`: 以 `/` 开头的路径
    /// - `params`: 查询参数，会做 URL 编码
    pub async fn get<T>(
        &self,
        target: &ModalTarget,
        path: &str,
        params: &[(&str, &str)],
    ) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let mut parsed = Url::parse(&format!("{}{}", target.base_url, path))
            .map_err(|e| AppError::upstream_unreachable(UpstreamSource::Modal, e))?;
        if !params.is_empty() {
            parsed.query_pairs_mut().extend_pairs(params);
        }
        let mut url = parsed.to_string();
        let mut redirects = 0usize;

        loop {
            debug!("调用 Modal API: {}", url);
            let response = self
                .http
                .get(&url)
                .header("X-API-Key", &target.api_key)
                .header(ACCEPT, MODAL_ACCEPT)
                .header(CACHE_CONTROL, "no-store")
                .send()
                .await
                .map_err(|e| AppError::upstream_unreachable(UpstreamSource::Modal, e))?;

            let location = if response.status().is_redirection() {
                response
                    .headers()
                    .get(LOCATION)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            } else {
                None
            };

            match location {
                Some(location) => {
                    redirects += 1;
                    if redirects > MAX_REDIRECTS {
                        return Err(AppError::Upstream(UpstreamError::TooManyRedirects {
                            limit: MAX_REDIRECTS,
                        }));
                    }
                    url = target.follow(&location);
                    debug!("↪️ 重定向 #{} -> {}", redirects, url);
                }
                None => return read_payload(response, UpstreamSource::Modal).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trailing_slash_is_removed() {
        let config = Config {
            modal_base_url: Some("https://modal.example/".to_string()),
            modal_api_key: Some("key".to_string()),
            ..Config::default()
        };
        let target = ModalTarget::resolve(&config).unwrap();
        assert_eq!(target.base_url, "https://modal.example");
    }

    #[test]
    fn test_follow_relative_and_absolute() {
        let target = ModalTarget {
            base_url: "https://modal.example".to_string(),
            api_key: "key".to_string(),
        };
        assert_eq!(target.follow("/next?x=1"), "https://modal.example/next?x=1");
        assert_eq!(target.follow("https://other.example/a"), "https://other.example/a");
    }

    #[test]
    fn test_missing_modal_config() {
        let config = Config {
            modal_base_url: Some("https://modal.example".to_string()),
            ..Config::default()
        };
        let err = ModalTarget::resolve(&config).unwrap_err();
        assert_eq!(
            err.body().error,
            "Missing MODAL_BASE_URL or MODAL_API_KEY environment variables."
        );
    }
}
