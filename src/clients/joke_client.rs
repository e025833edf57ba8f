/// 笑话 API 客户端
///
/// 三个公开 API，按 `type` 参数选择
use phf::phf_map;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::upstream::read_payload;
use crate::config::Config;
use crate::error::{AppError, AppResult, UpstreamSource};
use crate::models::payloads::{ChuckNorrisJoke, DadJoke, Joke, RandomJoke};
use crate::models::Validate;

/// 笑话来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JokeKind {
    ChuckNorris,
    DadJoke,
    RandomJoke,
}

static JOKE_KINDS: phf::Map<&'static str, JokeKind> = phf_map! {
    "chuck-norris" => JokeKind::ChuckNorris,
    "dad-joke" => JokeKind::DadJoke,
    "random-joke" => JokeKind::RandomJoke,
};

impl JokeKind {
    /// 按查询参数解析，未知类型返回 400
    pub fn parse(value: &str) -> AppResult<Self> {
        JOKE_KINDS.get(value).copied().ok_or_else(|| {
            AppError::invalid_input(
                "Invalid joke type. Must be 'chuck-norris', 'dad-joke', or 'random-joke'.",
            )
        })
    }

    /// 返回给前端的类型名
    pub fn label(self) -> &'static str {
        match self {
            JokeKind::ChuckNorris => "Chuck Norris",
            JokeKind::DadJoke => "Dad Joke",
            JokeKind::RandomJoke => "Random Joke",
        }
    }

    fn source(self) -> UpstreamSource {
        match self {
            JokeKind::ChuckNorris => UpstreamSource::ChuckNorris,
            JokeKind::DadJoke => UpstreamSource::DadJoke,
            JokeKind::RandomJoke => UpstreamSource::RandomJoke,
        }
    }

    fn url(self, config: &Config) -> &str {
        match self {
            JokeKind::ChuckNorris => &config.chuck_norris_api_url,
            JokeKind::DadJoke => &config.dad_joke_api_url,
            JokeKind::RandomJoke => &config.random_joke_api_url,
        }
    }
}

/// 笑话客户端
#[derive(Clone)]
pub struct JokeClient {
    http: reqwest::Client,
    chuck_norris_url: String,
    dad_joke_url: String,
    random_joke_url: String,
}

impl JokeClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            chuck_norris_url: JokeKind::ChuckNorris.url(config).to_string(),
            dad_joke_url: JokeKind::DadJoke.url(config).to_string(),
            random_joke_url: JokeKind::RandomJoke.url(config).to_string(),
        }
    }

    async fn fetch<T>(&self, kind: JokeKind) -> AppResult<T>
    where
        T: DeserializeOwned + Validate,
    {
        let url = match kind {
            JokeKind::ChuckNorris => &self.chuck_norris_url,
            JokeKind::DadJoke => &self.dad_joke_url,
            JokeKind::RandomJoke => &self.random_joke_url,
        };
        debug!("获取笑话 ({}): {}", kind.label(), url);
        let response = self
            .http
            .get(url)
            .header(ACCEPT, "application/json")
            .header(CACHE_CONTROL, "no-store")
            .send()
            .await
            .map_err(|e| AppError::upstream_unreachable(kind.source(), e))?;
        read_payload(response, kind.source()).await
    }

    /// 获取一条笑话并统一格式
    pub async fn random(&self, kind: JokeKind) -> AppResult<Joke> {
        let joke = match kind {
            JokeKind::ChuckNorris => {
                let payload: ChuckNorrisJoke = self.fetch(kind).await?;
                Joke {
                    joke: payload.value,
                    setup: None,
                    punchline: None,
                    kind: kind.label().to_string(),
                }
            }
            JokeKind::DadJoke => {
                let payload: DadJoke = self.fetch(kind).await?;
                Joke {
                    joke: payload.joke,
                    setup: None,
                    punchline: None,
                    kind: kind.label().to_string(),
                }
            }
            JokeKind::RandomJoke => {
                let payload: RandomJoke = self.fetch(kind).await?;
                Joke {
                    joke: format!("{} {}", payload.setup, payload.punchline),
                    setup: Some(payload.setup),
                    punchline: Some(payload.punchline),
                    kind: kind.label().to_string(),
                }
            }
        };
        Ok(joke)
    }
}
