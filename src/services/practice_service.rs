//! 作业练习服务 - 业务能力层
//!
//! 本地生成的题目（四则运算、面积、拼写）直接调用生成器；
//! 其余题目转发到 n8n / Modal / 公开 API，并把响应校验成固定结构。
//! 每个转发接口都先检查配置，缺失时不会发出任何网络请求。

use rand::thread_rng;
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, info};

use crate::clients::upstream::build_http_client;
use crate::clients::{
    JokeClient, JokeKind, ModalClient, ModalTarget, WebhookClient, WebhookTarget, WordClient,
};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::generators::{area, arithmetic, spelling, RangeProfile, WordBank};
use crate::models::payloads::{
    CapitalQuestion, Joke, MeasurementProblem, MoneyProblem, ParagraphFeedback, PatternProblem,
    ReadingQuestion, ReadingQuestionView, ScienceFact, ScienceQuiz, SpellingWord, TimeProblem,
    WordAnnotation, WordProblem,
};
use crate::models::{ArithmeticQuestion, AreaQuestion, Difficulty, LengthUnit, Operation};

/// 钱币题支持的运算
pub const MONEY_OPERATIONS: [&str; 3] = ["count", "add", "subtract"];

/// 作业练习服务
pub struct PracticeService {
    config: Arc<Config>,
    webhook: WebhookClient,
    modal: ModalClient,
    jokes: JokeClient,
    words: WordClient,
    word_bank: Arc<WordBank>,
}

impl PracticeService {
    /// 创建服务
    ///
    /// `SPELLING_WORD_LIST` 配置了文件时在这里加载，否则使用内置词库
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let manual_redirects = build_http_client(config.request_timeout_secs, false)?;
        let public = build_http_client(config.request_timeout_secs, true)?;

        let word_bank = match &config.spelling_word_list {
            Some(path) => {
                let bank = WordBank::from_file(std::path::Path::new(path))?;
                let (easy, medium, hard) = bank.sizes();
                info!(
                    "📚 已加载自定义词库 {}: 简单 {} / 中等 {} / 困难 {}",
                    path, easy, medium, hard
                );
                Arc::new(bank)
            }
            None => Arc::new(WordBank::builtin().clone()),
        };

        Ok(Self {
            webhook: WebhookClient::new(manual_redirects.clone()),
            modal: ModalClient::new(manual_redirects),
            jokes: JokeClient::new(public.clone(), &config),
            words: WordClient::new(public, config.random_word_api_url.clone()),
            word_bank,
            config,
        })
    }

    // ========== 本地生成 ==========

    /// 四则运算题
    pub fn arithmetic(
        &self,
        operation: Operation,
        difficulty: Difficulty,
        profile: RangeProfile,
    ) -> ArithmeticQuestion {
        arithmetic::generate(operation, difficulty, profile, &mut thread_rng())
    }

    /// 面积题
    pub fn area(&self, difficulty: Difficulty, unit: LengthUnit) -> AreaQuestion {
        area::generate(difficulty, unit, &mut thread_rng())
    }

    /// 拼写测试单词
    ///
    /// # 参数
    /// - `requested`: 原样的 `difficulty` 参数，只认小写的 `easy` / `medium` / `hard`
    ///
    /// 先尝试单词 API；请求失败或单词难度与参数不一致时使用本地词库。
    /// 参数无法识别时 API 单词一定不一致，本地词库按混合难度抽取。
    pub async fn spelling_word(&self, requested: Option<&str>) -> SpellingWord {
        let requested = requested.filter(|raw| !raw.is_empty());
        let tier = requested.and_then(|raw| {
            Difficulty::ALL
                .into_iter()
                .find(|difficulty| difficulty.as_str() == raw)
        });

        if let Some(word) = self.words.random_word().await {
            let difficulty = spelling::classify(&word);
            match requested {
                Some(wanted) if wanted != difficulty.as_str() => {
                    debug!("单词 {} 难度为 {}，需要 {}，改用本地词库", word, difficulty, wanted);
                }
                _ => return SpellingWord { word, difficulty },
            }
        }
        self.word_bank.pick(tier, &mut thread_rng())
    }

    // ========== n8n ==========

    /// 应用题，参数已由调用方校验
    pub async fn word_problem(&self, grade: u8, difficulty: Difficulty) -> AppResult<WordProblem> {
        let target = WebhookTarget::resolve(
            &self.config,
            "N8N_MATH_WORD_PROBLEM_WEBHOOK_URL",
            &self.config.n8n_math_word_problem_webhook_url,
        )?;
        self.webhook
            .post(&target, &json!({ "grade": grade, "difficulty": difficulty }))
            .await
    }

    /// 科学小知识
    pub async fn science_fact(&self) -> AppResult<ScienceFact> {
        let target = WebhookTarget::resolve(
            &self.config,
            "N8N_SCIENCE_FACT_WEBHOOK_URL",
            &self.config.n8n_science_fact_webhook_url,
        )?;
        self.webhook.get(&target).await
    }

    /// 段落批改：先检查配置，再检查段落
    pub async fn paragraph_review(&self, paragraph: Option<&str>) -> AppResult<ParagraphFeedback> {
        let target = WebhookTarget::resolve(
            &self.config,
            "N8N_PARAGRAPH_REVIEW_WEBHOOK_URL",
            &self.config.n8n_paragraph_review_webhook_url,
        )?;
        let paragraph = paragraph
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                AppError::invalid_input("Paragraph parameter is required and cannot be empty.")
            })?;
        self.webhook
            .post(&target, &json!({ "paragraph": paragraph }))
            .await
    }

    /// 单词注释：先检查配置，再检查单词
    pub async fn spelling_annotation(&self, word: Option<&str>) -> AppResult<WordAnnotation> {
        let target = WebhookTarget::resolve(
            &self.config,
            "N8N_ANNOTATION_WEBHOOK_URL",
            &self.config.n8n_annotation_webhook_url,
        )?;
        let word = word
            .filter(|w| !w.is_empty())
            .ok_or_else(|| AppError::invalid_input("Word parameter is required."))?;
        self.webhook.post(&target, &json!({ "word": word })).await
    }

    /// 阅读理解，选项展开为数组
    pub async fn reading_comprehension(&self) -> AppResult<ReadingQuestionView> {
        let target = WebhookTarget::resolve(
            &self.config,
            "N8N_READING_WEBHOOK_URL",
            &self.config.n8n_reading_webhook_url,
        )?;
        let question: ReadingQuestion = self.webhook.get(&target).await?;
        Ok(question.into())
    }

    // ========== Modal ==========

    fn modal_target(&self) -> AppResult<ModalTarget> {
        ModalTarget::resolve(&self.config)
    }

    /// 找规律题
    pub async fn pattern(&self, kind: &str) -> AppResult<PatternProblem> {
        let target = self.modal_target()?;
        self.modal
            .get(&target, "/math/pattern", &[("type", kind)])
            .await
    }

    /// 时间题
    pub async fn time(&self, kind: &str) -> AppResult<TimeProblem> {
        let target = self.modal_target()?;
        self.modal.get(&target, "/math/time", &[("type", kind)]).await
    }

    /// 钱币题
    pub async fn money(&self, operation: &str) -> AppResult<MoneyProblem> {
        let target = self.modal_target()?;
        if !MONEY_OPERATIONS.contains(&operation) {
            return Err(AppError::invalid_input(
                "Operation must be 'count', 'add', or 'subtract'.",
            ));
        }
        self.modal
            .get(&target, "/math/money", &[("operation", operation)])
            .await
    }

    /// 单位换算题
    pub async fn measurement(
        &self,
        from_unit: Option<&str>,
        to_unit: Option<&str>,
        value: Option<&str>,
    ) -> AppResult<MeasurementProblem> {
        let target = self.modal_target()?;
        let (from_unit, to_unit) = match (non_empty(from_unit), non_empty(to_unit)) {
            (Some(from), Some(to)) => (from, to),
            _ => {
                return Err(AppError::invalid_input(
                    "from_unit and to_unit parameters are required.",
                ))
            }
        };

        let mut params = vec![("from_unit", from_unit), ("to_unit", to_unit)];
        if let Some(value) = non_empty(value) {
            if value.parse::<f64>().map(|v| !v.is_finite()).unwrap_or(true) {
                return Err(AppError::invalid_input("Value must be a number."));
            }
            params.push(("value", value));
        }

        self.modal
            .get(&target, "/measurement/convert", &params)
            .await
    }

    /// 科学小测验，固定 5 题
    pub async fn science_quiz(&self, topic: &str) -> AppResult<ScienceQuiz> {
        let target = self.modal_target()?;
        self.modal
            .get(&target, "/science/quiz", &[("topic", topic), ("count", "5")])
            .await
    }

    /// 首都题
    pub async fn capital(&self) -> AppResult<CapitalQuestion> {
        let target = self.modal_target()?;
        self.modal.get(&target, "/geography/capital", &[]).await
    }

    // ========== 公开 API ==========

    /// 笑话
    pub async fn joke(&self, kind: JokeKind) -> AppResult<Joke> {
        self.jokes.random(kind).await
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    fn service(config: Config) -> PracticeService {
        PracticeService::new(Arc::new(config)).unwrap()
    }

    #[tokio::test]
    async fn test_missing_n8n_config_short_circuits() {
        let svc = service(Config::default());
        let err = svc.science_fact().await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            err.body().error,
            "Missing N8N_SCIENCE_FACT_WEBHOOK_URL or N8N_API_KEY environment variables."
        );
    }

    #[tokio::test]
    async fn test_paragraph_review_checks_config_before_input() {
        let svc = service(Config::default());
        let err = svc.paragraph_review(Some("   ")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_paragraph_review_rejects_blank_when_configured() {
        let svc = service(Config {
            n8n_api_key: Some("key".to_string()),
            n8n_paragraph_review_webhook_url: Some("http://127.0.0.1:9/hook".to_string()),
            ..Config::default()
        });
        let err = svc.paragraph_review(Some("   ")).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            err.body().error,
            "Paragraph parameter is required and cannot be empty."
        );
    }

    #[tokio::test]
    async fn test_measurement_rejects_non_numeric_value() {
        let svc = service(Config {
            modal_base_url: Some("http://127.0.0.1:9".to_string()),
            modal_api_key: Some("key".to_string()),
            ..Config::default()
        });
        let err = svc
            .measurement(Some("cm"), Some("m"), Some("abc"))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_local_generators_are_exposed() {
        let svc = service(Config::default());
        let q = svc.arithmetic(Operation::Division, Difficulty::Easy, RangeProfile::Race);
        assert_eq!(q.num1, q.num2 * q.correct_answer);
        let a = svc.area(Difficulty::Hard, LengthUnit::Meters);
        assert_eq!(a.correct_answer, a.arrangement.unit_area());
    }
}
