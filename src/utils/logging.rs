/// 日志工具模块
///
/// 提供日志格式化和输出的辅助函数
use tracing::info;

use crate::config::Config;

/// 路由表，启动时打印
pub const ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/health"),
    ("GET", "/api/math/arithmetic"),
    ("GET", "/api/math/area"),
    ("GET", "/api/math/word-problem"),
    ("GET", "/api/math/pattern"),
    ("GET", "/api/math/time"),
    ("GET", "/api/math/money"),
    ("GET", "/api/measurement/convert"),
    ("GET", "/api/science/fact"),
    ("GET", "/api/science/quiz"),
    ("GET", "/api/geography/capital"),
    ("POST", "/api/ela/paragraph-review"),
    ("POST", "/api/ela/spelling-annotation"),
    ("GET", "/api/ela/reading-comprehension"),
    ("GET", "/api/ela/spelling-test"),
    ("GET", "/api/ela/joke"),
    ("GET/POST", "/api/blog/posts"),
    ("GET/PATCH/DELETE", "/api/blog/posts/{slug}"),
    ("POST", "/api/blog/posts/{slug}/enhance"),
];

/// 记录程序启动信息
///
/// # 参数
/// - `config`: 当前配置
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!(
        "🚀 homework_hub 启动 - {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("🌐 监听地址: {}", config.bind_addr);
    info!("⏱️ 上游超时: {} 秒", config.request_timeout_secs);
    info!("{}", "=".repeat(60));
    log_upstream_status("n8n", config.n8n_api_key.is_some());
    log_upstream_status(
        "Modal",
        config.modal_base_url.is_some() && config.modal_api_key.is_some(),
    );
    log_upstream_status("LLM", config.llm_api_key.is_some());
}

fn log_upstream_status(name: &str, configured: bool) {
    if configured {
        info!("✓ {} 已配置", name);
    } else {
        info!("⚠️ {} 未配置，相关接口将返回 500", name);
    }
}

/// 打印路由表
pub fn log_routes() {
    info!("📋 已注册 {} 个路由:", ROUTES.len());
    for (method, path) in ROUTES {
        info!("   {:<18} {}", method, path);
    }
    info!("{}", "─".repeat(60));
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
