//! # Homework Hub
//!
//! 个人博客（带 AI 润色）与儿童作业练习的后端服务
//!
//! ## 架构设计
//!
//! 本系统采用分层架构：
//!
//! ### ① 基础设施层（Infrastructure）
//! - `config` - 默认值 → TOML 文件 → 环境变量
//! - `logger` / `utils::logging` - tracing 日志与启动信息
//! - `error` - 统一错误类型，负责映射为 HTTP 状态码和 JSON 错误体
//!
//! ### ② 生成器层（Generators）
//! - `generators/` - 纯函数，随机源由调用方注入
//! - 四则运算、数格子面积、拼写词库
//!
//! ### ③ 客户端层（Clients）
//! - `clients/` - n8n、Modal、笑话 API、单词 API、LLM
//! - 状态码检查 → JSON 解析 → 字段校验 → 去信封
//!
//! ### ④ 业务能力层（Services）
//! - `PracticeService` - 作业练习：本地生成或转发上游
//! - `BlogService` - 文章增删改查、可见性规则、后台润色
//! - `PostFeed` - 把文章变更应用到某个访客看到的列表
//!
//! ### ⑤ 接口层（API）
//! - `api/` - axum 路由，只负责参数解析
//!
//! ## 模块结构

pub mod api;
pub mod app;
pub mod clients;
pub mod config;
pub mod error;
pub mod generators;
pub mod logger;
pub mod models;
pub mod services;
pub mod utils;

// 重新导出常用类型
pub use api::AppState;
pub use app::App;
pub use config::Config;
pub use error::{AppError, AppResult};
pub use generators::RangeProfile;
pub use models::{ArithmeticQuestion, Difficulty, Operation, Post, Viewer};
pub use services::{BlogService, PracticeService};
