use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// AI 润色状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnhancementStatus {
    #[default]
    None,
    Enhancing,
    Enhanced,
}

/// 博客文章
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub content: String,
    pub slug: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub is_published: bool,
    pub author_id: String,
    #[serde(default)]
    pub enhancement_status: EnhancementStatus,
}

impl Post {
    /// 未发布的文章只对作者可见
    pub fn is_visible_to(&self, viewer: &Viewer) -> bool {
        self.is_published || viewer.is(&self.author_id)
    }

    pub fn is_authored_by(&self, viewer: &Viewer) -> bool {
        viewer.is(&self.author_id)
    }
}

/// 发起请求的用户；匿名访客没有 id
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Viewer {
    pub user_id: Option<String>,
}

impl Viewer {
    pub fn anonymous() -> Self {
        Self { user_id: None }
    }

    pub fn user(id: impl Into<String>) -> Self {
        Self {
            user_id: Some(id.into()),
        }
    }

    pub fn is(&self, user_id: &str) -> bool {
        self.user_id.as_deref() == Some(user_id)
    }
}

/// 新建文章请求
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewPost {
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub is_published: bool,
}

/// 编辑文章请求；未给出的字段保持不变
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
    pub is_published: Option<bool>,
}
