/// 随机单词 API 客户端
///
/// 失败时不报错，由调用方回退到本地词库
use reqwest::header::CACHE_CONTROL;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// 单词 API 超时
pub const WORD_API_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct WordClient {
    http: reqwest::Client,
    url: String,
}

impl WordClient {
    pub fn new(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    /// 取一个随机单词
    ///
    /// # 返回
    /// 接受 `["word"]` 或 `"word"` 两种格式；任何失败都返回 `None`
    pub async fn random_word(&self) -> Option<String> {
        let response = match self
            .http
            .get(&self.url)
            .header(CACHE_CONTROL, "no-store")
            .timeout(WORD_API_TIMEOUT)
            .send()
            .await
        {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                warn!("⚠️ 单词 API 返回状态 {}，使用本地词库", response.status());
                return None;
            }
            Err(e) => {
                warn!("⚠️ 单词 API 调用失败，使用本地词库: {}", e);
                return None;
            }
        };

        let value: Value = match response.json().await {
            Ok(value) => value,
            Err(e) => {
                warn!("⚠️ 单词 API 返回内容无法解析: {}", e);
                return None;
            }
        };

        let word = extract_word(&value);
        debug!("单词 API 返回: {:?}", word);
        word
    }
}

/// 从 `["word"]` 或 `"word"` 中取出非空单词
pub fn extract_word(value: &Value) -> Option<String> {
    let candidate = match value {
        Value::Array(items) => items.first()?.as_str()?,
        Value::String(word) => word.as_str(),
        _ => return None,
    };
    let word = candidate.trim();
    (!word.is_empty()).then(|| word.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_word_shapes() {
        assert_eq!(extract_word(&json!(["lantern"])), Some("lantern".to_string()));
        assert_eq!(extract_word(&json!("ocean")), Some("ocean".to_string()));
        assert_eq!(extract_word(&json!([])), None);
        assert_eq!(extract_word(&json!({"word": "x"})), None);
        assert_eq!(extract_word(&json!([""])), None);
    }
}
