use serde::Deserialize;
use std::path::Path;

use crate::error::{AppError, AppResult};

/// 指定 TOML 配置文件路径的环境变量
pub const CONFIG_FILE_ENV: &str = "HOMEWORK_HUB_CONFIG";

/// 程序配置
///
/// 加载顺序：默认值 → TOML 文件（可选）→ 环境变量。
/// 空字符串或只有空白的值视为未配置。
#[derive(Clone, Debug)]
pub struct Config {
    /// 监听地址
    pub bind_addr: String,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 上游请求超时（秒）
    pub request_timeout_secs: u64,
    // --- n8n ---
    pub n8n_api_key: Option<String>,
    pub n8n_math_word_problem_webhook_url: Option<String>,
    pub n8n_science_fact_webhook_url: Option<String>,
    pub n8n_paragraph_review_webhook_url: Option<String>,
    pub n8n_annotation_webhook_url: Option<String>,
    pub n8n_reading_webhook_url: Option<String>,
    // --- Modal ---
    pub modal_base_url: Option<String>,
    pub modal_api_key: Option<String>,
    // --- 公共 API ---
    pub random_word_api_url: String,
    pub chuck_norris_api_url: String,
    pub dad_joke_api_url: String,
    pub random_joke_api_url: String,
    /// 自定义拼写词库文件，每行一个单词
    pub spelling_word_list: Option<String>,
    // --- LLM 配置 ---
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: String,
    pub llm_model_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            verbose_logging: false,
            request_timeout_secs: 30,
            n8n_api_key: None,
            n8n_math_word_problem_webhook_url: None,
            n8n_science_fact_webhook_url: None,
            n8n_paragraph_review_webhook_url: None,
            n8n_annotation_webhook_url: None,
            n8n_reading_webhook_url: None,
            modal_base_url: None,
            modal_api_key: None,
            random_word_api_url: "https://random-word-api.herokuapp.com/word".to_string(),
            chuck_norris_api_url: "https://api.chucknorris.io/jokes/random".to_string(),
            dad_joke_api_url: "https://icanhazdadjoke.com/".to_string(),
            random_joke_api_url: "https://official-joke-api.appspot.com/random_joke".to_string(),
            spelling_word_list: None,
            llm_api_key: None,
            llm_api_base_url: "https://api.openai.com/v1".to_string(),
            llm_model_name: "gpt-4o-mini".to_string(),
        }
    }
}

/// TOML 配置文件，字段名与 `Config` 一致
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub bind_addr: Option<String>,
    pub verbose_logging: Option<bool>,
    pub request_timeout_secs: Option<u64>,
    pub n8n_api_key: Option<String>,
    pub n8n_math_word_problem_webhook_url: Option<String>,
    pub n8n_science_fact_webhook_url: Option<String>,
    pub n8n_paragraph_review_webhook_url: Option<String>,
    pub n8n_annotation_webhook_url: Option<String>,
    pub n8n_reading_webhook_url: Option<String>,
    pub modal_base_url: Option<String>,
    pub modal_api_key: Option<String>,
    pub random_word_api_url: Option<String>,
    pub chuck_norris_api_url: Option<String>,
    pub dad_joke_api_url: Option<String>,
    pub random_joke_api_url: Option<String>,
    pub spelling_word_list: Option<String>,
    pub llm_api_key: Option<String>,
    pub llm_api_base_url: Option<String>,
    pub llm_model_name: Option<String>,
}

/// 去掉首尾空白，空值视为未配置
fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn overlay(target: &mut Option<String>, value: Option<String>) {
    if let Some(v) = non_blank(value) {
        *target = Some(v);
    }
}

fn overlay_required(target: &mut String, value: Option<String>) {
    if let Some(v) = non_blank(value) {
        *target = v;
    }
}

impl Config {
    /// 只从环境变量加载（不读取配置文件）
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env(|name| std::env::var(name).ok());
        config
    }

    /// 完整加载：默认值 → `HOMEWORK_HUB_CONFIG` 指向的 TOML 文件 → 环境变量
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();
        if let Some(path) = non_blank(std::env::var(CONFIG_FILE_ENV).ok()) {
            config.apply_file(Self::read_file(Path::new(&path))?);
        }
        config.apply_env(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// 读取并解析 TOML 配置文件
    pub fn read_file(path: &Path) -> AppResult<FileConfig> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_invalid(format!("无法读取配置文件 {}: {}", path.display(), e))
        })?;
        Ok(toml::from_str(&content)?)
    }

    /// 用配置文件覆盖当前值
    pub fn apply_file(&mut self, file: FileConfig) {
        overlay_required(&mut self.bind_addr, file.bind_addr);
        if let Some(v) = file.verbose_logging {
            self.verbose_logging = v;
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
        overlay(&mut self.n8n_api_key, file.n8n_api_key);
        overlay(
            &mut self.n8n_math_word_problem_webhook_url,
            file.n8n_math_word_problem_webhook_url,
        );
        overlay(
            &mut self.n8n_science_fact_webhook_url,
            file.n8n_science_fact_webhook_url,
        );
        overlay(
            &mut self.n8n_paragraph_review_webhook_url,
            file.n8n_paragraph_review_webhook_url,
        );
        overlay(
            &mut self.n8n_annotation_webhook_url,
            file.n8n_annotation_webhook_url,
        );
        overlay(&mut self.n8n_reading_webhook_url, file.n8n_reading_webhook_url);
        overlay(&mut self.modal_base_url, file.modal_base_url);
        overlay(&mut self.modal_api_key, file.modal_api_key);
        overlay_required(&mut self.random_word_api_url, file.random_word_api_url);
        overlay_required(&mut self.chuck_norris_api_url, file.chuck_norris_api_url);
        overlay_required(&mut self.dad_joke_api_url, file.dad_joke_api_url);
        overlay_required(&mut self.random_joke_api_url, file.random_joke_api_url);
        overlay(&mut self.spelling_word_list, file.spelling_word_list);
        overlay(&mut self.llm_api_key, file.llm_api_key);
        overlay_required(&mut self.llm_api_base_url, file.llm_api_base_url);
        overlay_required(&mut self.llm_model_name, file.llm_model_name);
    }

    /// 用环境变量覆盖当前值
    ///
    /// # 参数
    /// - `lookup`: 按变量名取值，测试中可以传入固定表
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        overlay_required(&mut self.bind_addr, lookup("BIND_ADDR"));
        if let Some(v) = non_blank(lookup("VERBOSE_LOGGING")).and_then(|v| v.parse().ok()) {
            self.verbose_logging = v;
        }
        if let Some(v) = non_blank(lookup("REQUEST_TIMEOUT_SECS")).and_then(|v| v.parse().ok()) {
            self.request_timeout_secs = v;
        }
        overlay(&mut self.n8n_api_key, lookup("N8N_API_KEY"));
        overlay(
            &mut self.n8n_math_word_problem_webhook_url,
            lookup("N8N_MATH_WORD_PROBLEM_WEBHOOK_URL"),
        );
        overlay(
            &mut self.n8n_science_fact_webhook_url,
            lookup("N8N_SCIENCE_FACT_WEBHOOK_URL"),
        );
        overlay(
            &mut self.n8n_paragraph_review_webhook_url,
            lookup("N8N_PARAGRAPH_REVIEW_WEBHOOK_URL"),
        );
        overlay(
            &mut self.n8n_annotation_webhook_url,
            lookup("N8N_ANNOTATION_WEBHOOK_URL"),
        );
        overlay(&mut self.n8n_reading_webhook_url, lookup("N8N_READING_WEBHOOK_URL"));
        overlay(&mut self.modal_base_url, lookup("MODAL_BASE_URL"));
        overlay(&mut self.modal_api_key, lookup("MODAL_API_KEY"));
        overlay_required(&mut self.random_word_api_url, lookup("RANDOM_WORD_API_URL"));
        overlay_required(&mut self.chuck_norris_api_url, lookup("CHUCK_NORRIS_API_URL"));
        overlay_required(&mut self.dad_joke_api_url, lookup("DAD_JOKE_API_URL"));
        overlay_required(&mut self.random_joke_api_url, lookup("RANDOM_JOKE_API_URL"));
        overlay(&mut self.spelling_word_list, lookup("SPELLING_WORD_LIST"));
        overlay(&mut self.llm_api_key, lookup("LLM_API_KEY"));
        overlay_required(&mut self.llm_api_base_url, lookup("LLM_API_BASE_URL"));
        overlay_required(&mut self.llm_model_name, lookup("LLM_MODEL_NAME"));
    }
}

/// 一个必需的配置项：环境变量名 + 当前值
pub type Setting<'a> = (&'static str, &'a Option<String>);

/// 两个配置项必须同时存在
///
/// # 返回
/// 任一缺失时返回 `Missing A or B environment variables.`
pub fn require_pair(first: Setting<'_>, second: Setting<'_>) -> AppResult<(String, String)> {
    match (first.1, second.1) {
        (Some(a), Some(b)) => Ok((a.clone(), b.clone())),
        _ => Err(AppError::config_missing([first.0, second.0])),
    }
}

/// 单个必需的配置项
pub fn require(setting: Setting<'_>) -> AppResult<String> {
    setting
        .1
        .clone()
        .ok_or_else(|| AppError::config_missing([setting.0]))
}
