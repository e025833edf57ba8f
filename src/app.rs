use anyhow::{Context, Result};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::clients::LlmClient;
use crate::config::Config;
use crate::error::AppResult;
use crate::services::{BlogService, ContentEnhancer, PracticeService};
use crate::utils::logging::{log_routes, log_startup};

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    state: AppState,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        let config = Arc::new(config);
        let state = build_state(Arc::clone(&config)).context("初始化服务失败")?;

        Ok(Self { config, state })
    }

    /// 完整路由（包含中间件）
    pub fn router(&self) -> Router {
        api::router(self.state.clone())
    }

    /// 绑定地址并开始服务，收到 Ctrl+C 后优雅退出
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(&self.config.bind_addr)
            .await
            .with_context(|| format!("无法绑定地址 {}", self.config.bind_addr))?;

        log_routes();
        info!("✓ 服务已启动: http://{}", listener.local_addr()?);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("服务异常退出")?;

        info!("👋 服务已停止");
        Ok(())
    }
}

/// 根据配置创建所有服务
pub fn build_state(config: Arc<Config>) -> AppResult<AppState> {
    let practice = PracticeService::new(Arc::clone(&config))?;

    let enhancer: Option<Arc<dyn ContentEnhancer>> = match LlmClient::from_config(&config) {
        Ok(client) => {
            info!("🤖 文章润色使用模型: {}", client.model_name());
            Some(Arc::new(client))
        }
        Err(e) => {
            warn!("⚠️ {}，文章润色不可用", e);
            None
        }
    };

    Ok(AppState {
        practice: Arc::new(practice),
        blog: Arc::new(BlogService::new(enhancer)),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("⚠️ 无法监听 Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到退出信号，正在关闭...");
}
