use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use std::fmt;

use crate::models::PayloadIssues;

/// 应用程序错误类型
#[derive(Debug)]
pub enum AppError {
    /// 配置错误
    Config(ConfigError),
    /// 上游服务错误
    Upstream(UpstreamError),
    /// 请求参数错误
    Validation(ValidationError),
    /// 博客业务错误
    Blog(BlogError),
    /// LLM 服务错误
    Llm(LlmError),
    /// 其他错误
    Other(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "配置错误: {}", e),
            AppError::Upstream(e) => write!(f, "上游错误: {}", e),
            AppError::Validation(e) => write!(f, "参数错误: {}", e),
            AppError::Blog(e) => write!(f, "博客错误: {}", e),
            AppError::Llm(e) => write!(f, "LLM错误: {}", e),
            AppError::Other(msg) => write!(f, "错误: {}", msg),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Upstream(e) => Some(e),
            AppError::Validation(e) => Some(e),
            AppError::Blog(e) => Some(e),
            AppError::Llm(e) => Some(e),
            AppError::Other(_) => None,
        }
    }
}

/// 配置错误
#[derive(Debug)]
pub enum ConfigError {
    /// 缺少必需的配置项
    Missing { names: Vec<String> },
    /// 配置值无法使用
    Invalid { message: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing { names } => {
                let noun = if names.len() > 1 { "variables" } else { "variable" };
                write!(f, "Missing {} environment {}.", names.join(" or "), noun)
            }
            ConfigError::Invalid { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ConfigError {}

/// 上游服务
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamSource {
    N8n,
    Modal,
    ChuckNorris,
    DadJoke,
    RandomJoke,
    WordApi,
}

impl UpstreamSource {
    /// 出现在错误信息中的名称
    pub fn label(self) -> &'static str {
        match self {
            UpstreamSource::N8n => "n8n",
            UpstreamSource::Modal => "Modal API",
            UpstreamSource::ChuckNorris => "Chuck Norris API",
            UpstreamSource::DadJoke => "Dad Jokes API",
            UpstreamSource::RandomJoke => "Random Joke API",
            UpstreamSource::WordApi => "Random Word API",
        }
    }

    fn responded_with_error(self) -> String {
        match self {
            UpstreamSource::N8n => "n8n webhook responded with an error.".to_string(),
            other => format!("{} responded with an error.", other.label()),
        }
    }

    fn unreachable(self) -> String {
        match self {
            UpstreamSource::N8n => "Failed to reach n8n webhook.".to_string(),
            UpstreamSource::ChuckNorris | UpstreamSource::DadJoke | UpstreamSource::RandomJoke => {
                "Failed to fetch joke.".to_string()
            }
            other => format!("Failed to reach {}.", other.label()),
        }
    }

    fn invalid_payload(self) -> String {
        format!("Invalid payload received from {}.", self.label())
    }
}

/// 上游服务错误
#[derive(Debug)]
pub enum UpstreamError {
    /// 网络不可达或读取响应失败
    Unreachable {
        source: UpstreamSource,
        message: String,
    },
    /// 上游返回非 2xx
    Status {
        source: UpstreamSource,
        status: u16,
        status_text: String,
        body: Option<String>,
    },
    /// 上游数据不符合约定格式
    InvalidPayload {
        source: UpstreamSource,
        issues: PayloadIssues,
    },
    /// 重定向次数超过上限
    TooManyRedirects { limit: usize },
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Unreachable { source, message } => {
                write!(f, "{} ({})", source.unreachable(), message)
            }
            UpstreamError::Status { source, status, .. } => {
                write!(f, "{} (status: {})", source.responded_with_error(), status)
            }
            UpstreamError::InvalidPayload { source, issues } => {
                write!(f, "{} ({})", source.invalid_payload(), issues)
            }
            UpstreamError::TooManyRedirects { limit } => {
                write!(f, "Too many redirects (limit: {})", limit)
            }
        }
    }
}

impl std::error::Error for UpstreamError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UpstreamError::InvalidPayload { issues, .. } => Some(issues),
            _ => None,
        }
    }
}

/// 请求参数错误
#[derive(Debug)]
pub enum ValidationError {
    /// 参数缺失或取值非法，message 直接返回给调用方
    Invalid { message: String },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Invalid { message } => write!(f, "{}", message),
        }
    }
}

impl std::error::Error for ValidationError {}

/// 博客业务错误
#[derive(Debug)]
pub enum BlogError {
    /// 文章不存在或对当前用户不可见
    NotFound { slug: String },
    /// 非作者尝试修改
    Forbidden { slug: String },
    /// 需要登录
    Unauthenticated,
    /// 已在润色中
    EnhancementInProgress { slug: String },
}

impl fmt::Display for BlogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlogError::NotFound { slug } => write!(f, "文章不存在: {}", slug),
            BlogError::Forbidden { slug } => write!(f, "无权修改文章: {}", slug),
            BlogError::Unauthenticated => write!(f, "需要登录"),
            BlogError::EnhancementInProgress { slug } => {
                write!(f, "文章正在润色中: {}", slug)
            }
        }
    }
}

impl std::error::Error for BlogError {}

/// LLM 服务错误
#[derive(Debug)]
pub enum LlmError {
    /// API 调用失败
    ApiCallFailed {
        model: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 返回内容为空
    EmptyContent { model: String },
}

impl fmt::Display for LlmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LlmError::ApiCallFailed { model, source } => {
                write!(f, "LLM API调用失败 (模型: {}): {}", model, source)
            }
            LlmError::EmptyContent { model } => {
                write!(f, "LLM返回内容为空 (模型: {})", model)
            }
        }
    }
}

impl std::error::Error for LlmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LlmError::ApiCallFailed { source, .. } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            _ => None,
        }
    }
}

// ========== 从常见错误类型转换 ==========

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(ConfigError::Invalid {
            message: format!("TOML解析失败: {}", err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 缺少配置项
    pub fn config_missing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AppError::Config(ConfigError::Missing {
            names: names.into_iter().map(Into::into).collect(),
        })
    }

    /// 配置值不可用
    pub fn config_invalid(message: impl Into<String>) -> Self {
        AppError::Config(ConfigError::Invalid {
            message: message.into(),
        })
    }

    /// 上游不可达
    pub fn upstream_unreachable(source: UpstreamSource, message: impl fmt::Display) -> Self {
        AppError::Upstream(UpstreamError::Unreachable {
            source,
            message: message.to_string(),
        })
    }

    /// 上游数据格式错误
    pub fn invalid_payload(source: UpstreamSource, issues: PayloadIssues) -> Self {
        AppError::Upstream(UpstreamError::InvalidPayload { source, issues })
    }

    /// 请求参数错误
    pub fn invalid_input(message: impl Into<String>) -> Self {
        AppError::Validation(ValidationError::Invalid {
            message: message.into(),
        })
    }

    /// 创建LLM API调用错误
    pub fn llm_api_failed(
        model: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::Llm(LlmError::ApiCallFailed {
            model: model.into(),
            source: Box::new(source),
        })
    }

    /// 对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream(e) => match e {
                UpstreamError::Status { status, .. } => mirror_upstream_status(*status),
                UpstreamError::TooManyRedirects { .. } => StatusCode::INTERNAL_SERVER_ERROR,
                UpstreamError::Unreachable { .. } | UpstreamError::InvalidPayload { .. } => {
                    StatusCode::BAD_GATEWAY
                }
            },
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Blog(e) => match e {
                BlogError::NotFound { .. } => StatusCode::NOT_FOUND,
                BlogError::Forbidden { .. } => StatusCode::FORBIDDEN,
                BlogError::Unauthenticated => StatusCode::UNAUTHORIZED,
                BlogError::EnhancementInProgress { .. } => StatusCode::CONFLICT,
            },
            AppError::Llm(_) => StatusCode::BAD_GATEWAY,
            AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回给调用方的 JSON 错误体
    pub fn body(&self) -> ErrorBody {
        match self {
            AppError::Config(e) => ErrorBody::new(e.to_string()),
            AppError::Upstream(e) => match e {
                UpstreamError::Unreachable { source, message } => {
                    ErrorBody::new(source.unreachable()).with_message(message.clone())
                }
                UpstreamError::Status {
                    source,
                    status,
                    status_text,
                    body,
                } => ErrorBody {
                    status: Some(*status),
                    // 只有 Modal 接口带 statusText
                    status_text: Some(status_text.clone())
                        .filter(|s| *source == UpstreamSource::Modal && !s.is_empty()),
                    body: body.clone(),
                    ..ErrorBody::new(source.responded_with_error())
                },
                UpstreamError::InvalidPayload { source, issues } => ErrorBody {
                    issues: Some(issues.clone()),
                    ..ErrorBody::new(source.invalid_payload())
                },
                UpstreamError::TooManyRedirects { .. } => ErrorBody::new("Too many redirects"),
            },
            AppError::Validation(e) => ErrorBody::new(e.to_string()),
            AppError::Blog(e) => match e {
                BlogError::NotFound { .. } => ErrorBody::new("Post not found."),
                BlogError::Forbidden { .. } => {
                    ErrorBody::new("Only the author can modify this post.")
                }
                BlogError::Unauthenticated => ErrorBody::new("Sign in required."),
                BlogError::EnhancementInProgress { .. } => {
                    ErrorBody::new("Post enhancement already in progress.")
                }
            },
            AppError::Llm(e) => ErrorBody::new("LLM request failed.").with_message(e.to_string()),
            AppError::Other(msg) => ErrorBody::new("Internal server error.").with_message(msg.clone()),
        }
    }
}

/// 上游状态码 >= 400 时原样透传，否则返回 502
pub fn mirror_upstream_status(status: u16) -> StatusCode {
    if status >= 400 {
        StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// JSON 错误体
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issues: Option<PayloadIssues>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            status: None,
            status_text: None,
            body: None,
            issues: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::warn!("⚠️ {}", self);
        } else {
            tracing::debug!("请求被拒绝: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
