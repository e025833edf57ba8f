//! 博客服务 - 业务能力层
//!
//! 文章保存在内存中（持久化由外部系统负责）。所有修改只允许作者执行，
//! 未发布的文章只对作者可见。每次修改都会广播一条 [`PostChange`]。

use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use super::post_feed::PostChange;
use crate::clients::LlmClient;
use crate::error::{AppError, AppResult, BlogError};
use crate::models::{EnhancementStatus, NewPost, Post, PostUpdate, Viewer};
use crate::utils::slug::{slugify, with_timestamp_suffix};
use crate::utils::truncate_text;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

const ENHANCE_SYSTEM_PROMPT: &str = "You are an editor for a personal blog. Improve the clarity, \
grammar and flow of the markdown post you are given while keeping the author's voice, meaning and \
markdown structure. Reply with the revised markdown only.";

/// 润色任务返回的 Future
pub type EnhanceFuture<'a> = Pin<Box<dyn Future<Output = anyhow::Result<String>> + Send + 'a>>;

/// 文章润色能力
pub trait ContentEnhancer: Send + Sync {
    fn enhance<'a>(&'a self, title: &'a str, content: &'a str) -> EnhanceFuture<'a>;
}

impl ContentEnhancer for LlmClient {
    fn enhance<'a>(&'a self, title: &'a str, content: &'a str) -> EnhanceFuture<'a> {
        Box::pin(async move {
            let prompt = format!("# {}\n\n{}", title, content);
            self.chat(&prompt, Some(ENHANCE_SYSTEM_PROMPT)).await
        })
    }
}

/// 已启动的润色任务
#[derive(Debug)]
pub struct EnhancementTicket {
    /// 状态已置为 `enhancing` 的文章
    pub post: Post,
    pub task: JoinHandle<()>,
}

/// 博客服务
pub struct BlogService {
    posts: Arc<RwLock<HashMap<String, Post>>>,
    changes: broadcast::Sender<PostChange>,
    enhancer: Option<Arc<dyn ContentEnhancer>>,
}

impl BlogService {
    /// 创建服务
    ///
    /// # 参数
    /// - `enhancer`: 未配置 LLM 时为 `None`，此时润色接口返回 500
    pub fn new(enhancer: Option<Arc<dyn ContentEnhancer>>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            posts: Arc::new(RwLock::new(HashMap::new())),
            changes,
            enhancer,
        }
    }

    /// 订阅文章变更
    pub fn subscribe(&self) -> broadcast::Receiver<PostChange> {
        self.changes.subscribe()
    }

    fn publish(&self, change: PostChange) {
        // 没有订阅者时发送失败，忽略即可
        let _ = self.changes.send(change);
    }

    /// 文章列表，最新的在前
    pub async fn list(&self, viewer: &Viewer) -> Vec<Post> {
        let posts = self.posts.read().await;
        let mut visible: Vec<Post> = posts
            .values()
            .filter(|post| post.is_visible_to(viewer))
            .cloned()
            .collect();
        visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        visible
    }

    /// 按 slug 获取文章，不可见视为不存在
    pub async fn get(&self, viewer: &Viewer, slug: &str) -> AppResult<Post> {
        let posts = self.posts.read().await;
        posts
            .get(slug)
            .filter(|post| post.is_visible_to(viewer))
            .cloned()
            .ok_or_else(|| not_found(slug))
    }

    /// 新建文章
    ///
    /// slug 由标题生成；已被占用时追加毫秒时间戳
    pub async fn create(&self, viewer: &Viewer, new_post: NewPost) -> AppResult<Post> {
        let author_id = viewer
            .user_id
            .clone()
            .ok_or(AppError::Blog(BlogError::Unauthenticated))?;

        let title = new_post.title.trim().to_string();
        let content = new_post.content.trim().to_string();
        if title.is_empty() || content.is_empty() {
            return Err(AppError::invalid_input("Title and content are required."));
        }

        let mut posts = self.posts.write().await;
        let base = slugify(&title);
        let mut slug = base.clone();
        let mut millis = Utc::now().timestamp_millis();
        while posts.contains_key(&slug) {
            slug = with_timestamp_suffix(&base, millis);
            millis += 1;
        }

        let post = Post {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title,
            subtitle: normalize_subtitle(new_post.subtitle),
            content,
            slug: slug.clone(),
            tags: normalize_tags(new_post.tags),
            is_published: new_post.is_published,
            author_id,
            enhancement_status: EnhancementStatus::None,
        };
        posts.insert(slug, post.clone());
        drop(posts);

        info!("📝 新建文章: {} ({})", post.title, post.slug);
        self.publish(PostChange::Inserted(post.clone()));
        Ok(post)
    }

    /// 编辑文章，slug 保持不变
    ///
    /// 所有字段校验通过后才会写回；润色进行中不允许修改正文
    pub async fn update(&self, viewer: &Viewer, slug: &str, update: PostUpdate) -> AppResult<Post> {
        let mut posts = self.posts.write().await;
        let current = authored_post(&mut posts, viewer, slug)?;

        if update.content.is_some() && current.enhancement_status == EnhancementStatus::Enhancing {
            return Err(AppError::Blog(BlogError::EnhancementInProgress {
                slug: slug.to_string(),
            }));
        }

        let mut post = current.clone();
        if let Some(title) = update.title {
            let title = title.trim().to_string();
            if title.is_empty() {
                return Err(AppError::invalid_input("Title cannot be empty."));
            }
            post.title = title;
        }
        if let Some(content) = update.content {
            let content = content.trim().to_string();
            if content.is_empty() {
                return Err(AppError::invalid_input("Content cannot be empty."));
            }
            post.content = content;
        }
        if update.subtitle.is_some() {
            post.subtitle = normalize_subtitle(update.subtitle);
        }
        if let Some(tags) = update.tags {
            post.tags = normalize_tags(tags);
        }
        if let Some(is_published) = update.is_published {
            post.is_published = is_published;
        }

        *current = post.clone();
        drop(posts);

        info!("✏️ 更新文章: {}", post.slug);
        self.publish(PostChange::Updated(post.clone()));
        Ok(post)
    }

    /// 删除文章
    pub async fn delete(&self, viewer: &Viewer, slug: &str) -> AppResult<()> {
        let mut posts = self.posts.write().await;
        let id = authored_post(&mut posts, viewer, slug)?.id;
        posts.remove(slug);
        drop(posts);

        info!("🗑️ 删除文章: {}", slug);
        self.publish(PostChange::Deleted { id });
        Ok(())
    }

    /// 启动 AI 润色
    ///
    /// 状态置为 `enhancing` 后立即返回，润色在后台任务中完成：
    /// 成功时替换正文并置为 `enhanced`，失败时恢复为 `none`。
    pub async fn start_enhancement(&self, viewer: &Viewer, slug: &str) -> AppResult<EnhancementTicket> {
        let enhancer = self
            .enhancer
            .clone()
            .ok_or_else(|| AppError::config_missing(["LLM_API_KEY"]))?;

        let mut posts = self.posts.write().await;
        let post = authored_post(&mut posts, viewer, slug)?;
        if post.enhancement_status == EnhancementStatus::Enhancing {
            return Err(AppError::Blog(BlogError::EnhancementInProgress {
                slug: slug.to_string(),
            }));
        }
        post.enhancement_status = EnhancementStatus::Enhancing;
        let snapshot = post.clone();
        drop(posts);

        self.publish(PostChange::Updated(snapshot.clone()));
        info!("✨ 开始润色文章: {}", slug);

        let store = Arc::clone(&self.posts);
        let changes = self.changes.clone();
        let (slug, title, content) = (
            snapshot.slug.clone(),
            snapshot.title.clone(),
            snapshot.content.clone(),
        );
        let id = snapshot.id;

        let task = tokio::spawn(async move {
            let result = enhancer.enhance(&title, &content).await;

            let mut posts = store.write().await;
            let Some(post) = posts.get_mut(&slug).filter(|post| post.id == id) else {
                warn!("⚠️ 润色完成时文章已被删除: {}", slug);
                return;
            };

            match result {
                Ok(enhanced) if !enhanced.trim().is_empty() => {
                    info!("✅ 润色完成: {} ({})", slug, truncate_text(&enhanced, 40));
                    post.content = enhanced;
                    post.enhancement_status = EnhancementStatus::Enhanced;
                }
                Ok(_) => {
                    warn!("⚠️ 润色结果为空，保留原文: {}", slug);
                    post.enhancement_status = EnhancementStatus::None;
                }
                Err(e) => {
                    warn!("⚠️ 润色失败 {}: {}", slug, e);
                    post.enhancement_status = EnhancementStatus::None;
                }
            }
            let _ = changes.send(PostChange::Updated(post.clone()));
        });

        Ok(EnhancementTicket {
            post: snapshot,
            task,
        })
    }
}

fn not_found(slug: &str) -> AppError {
    AppError::Blog(BlogError::NotFound {
        slug: slug.to_string(),
    })
}

/// 取出当前用户有权修改的文章
///
/// 不可见返回 404，可见但不是作者返回 403
fn authored_post<'a>(
    posts: &'a mut HashMap<String, Post>,
    viewer: &Viewer,
    slug: &str,
) -> AppResult<&'a mut Post> {
    let post = posts
        .get_mut(slug)
        .filter(|post| post.is_visible_to(viewer))
        .ok_or_else(|| not_found(slug))?;
    if !post.is_authored_by(viewer) {
        return Err(AppError::Blog(BlogError::Forbidden {
            slug: slug.to_string(),
        }));
    }
    Ok(post)
}

fn normalize_subtitle(subtitle: Option<String>) -> Option<String> {
    subtitle
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// 标签去空白、去重，保留首次出现的顺序
fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    let mut normalized: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        let tag = tag.trim().to_string();
        if !tag.is_empty() && !normalized.contains(&tag) {
            normalized.push(tag);
        }
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::post_feed::PostFeed;
    use axum::http::StatusCode;
    use tokio::sync::Notify;

    struct FixedEnhancer(Result<String, String>);

    impl ContentEnhancer for FixedEnhancer {
        fn enhance<'a>(&'a self, _title: &'a str, _content: &'a str) -> EnhanceFuture<'a> {
            let result = self.0.clone().map_err(|e| anyhow::anyhow!(e));
            Box::pin(async move { result })
        }
    }

    /// 收到放行信号后才返回结果
    struct GatedEnhancer {
        gate: Arc<Notify>,
    }

    impl ContentEnhancer for GatedEnhancer {
        fn enhance<'a>(&'a self, _title: &'a str, _content: &'a str) -> EnhanceFuture<'a> {
            Box::pin(async move {
                self.gate.notified().await;
                Ok("Polished content".to_string())
            })
        }
    }

    fn new_post(title: &str, published: bool) -> NewPost {
        NewPost {
            title: title.to_string(),
            subtitle: None,
            content: "Some content".to_string(),
            tags: vec![" rust ".to_string(), "rust".to_string(), "axum".to_string()],
            is_published: published,
        }
    }

    #[tokio::test]
    async fn test_unpublished_post_hidden_from_anonymous() {
        let blog = BlogService::new(None);
        let author = Viewer::user("author-1");
        blog.create(&author, new_post("Draft Post", false)).await.unwrap();
        blog.create(&author, new_post("Public Post", true)).await.unwrap();

        let anonymous = blog.list(&Viewer::anonymous()).await;
        assert_eq!(anonymous.len(), 1);
        assert_eq!(anonymous[0].slug, "public-post");

        let own = blog.list(&author).await;
        assert_eq!(own.len(), 2);

        let err = blog.get(&Viewer::anonymous(), "draft-post").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(blog.get(&author, "draft-post").await.is_ok());
    }

    #[tokio::test]
    async fn test_slug_collision_gets_timestamp_suffix() {
        let blog = BlogService::new(None);
        let author = Viewer::user("author-1");
        let first = blog.create(&author, new_post("Hello World", true)).await.unwrap();
        let second = blog.create(&author, new_post("Hello, World!", true)).await.unwrap();

        assert_eq!(first.slug, "hello-world");
        assert!(second.slug.starts_with("hello-world-"));
        let suffix = &second.slug["hello-world-".len()..];
        assert!(suffix.parse::<i64>().is_ok());
    }

    #[tokio::test]
    async fn test_tags_are_trimmed_and_deduped() {
        let blog = BlogService::new(None);
        let post = blog
            .create(&Viewer::user("a"), new_post("Tags", true))
            .await
            .unwrap();
        assert_eq!(post.tags, vec!["rust".to_string(), "axum".to_string()]);
    }

    #[tokio::test]
    async fn test_only_author_can_mutate() {
        let blog = BlogService::new(None);
        let author = Viewer::user("author-1");
        let other = Viewer::user("someone-else");
        blog.create(&author, new_post("Mine", true)).await.unwrap();

        let update = PostUpdate {
            title: Some("Stolen".to_string()),
            ..PostUpdate::default()
        };
        let err = blog.update(&other, "mine", update).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        let err = blog.delete(&other, "mine").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);

        blog.delete(&author, "mine").await.unwrap();
        assert!(blog.list(&author).await.is_empty());
    }

    #[tokio::test]
    async fn test_rejected_update_leaves_post_unchanged() {
        let blog = BlogService::new(None);
        let mut changes = blog.subscribe();
        let author = Viewer::user("a");
        blog.create(&author, new_post("Original", true)).await.unwrap();
        changes.recv().await.unwrap();

        let update = PostUpdate {
            title: Some("Changed".to_string()),
            content: Some("   ".to_string()),
            ..PostUpdate::default()
        };
        let err = blog.update(&author, "original", update).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);

        let post = blog.get(&author, "original").await.unwrap();
        assert_eq!(post.title, "Original");
        assert_eq!(post.content, "Some content");
        assert!(changes.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_content_edit_rejected_while_enhancing() {
        let gate = Arc::new(Notify::new());
        let enhancer: Arc<dyn ContentEnhancer> = Arc::new(GatedEnhancer {
            gate: Arc::clone(&gate),
        });
        let blog = BlogService::new(Some(enhancer));
        let author = Viewer::user("a");
        blog.create(&author, new_post("Busy", true)).await.unwrap();

        let ticket = blog.start_enhancement(&author, "busy").await.unwrap();

        let edit = PostUpdate {
            content: Some("Author edit".to_string()),
            ..PostUpdate::default()
        };
        let err = blog.update(&author, "busy", edit).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::CONFLICT);

        let retitle = PostUpdate {
            title: Some("Busy Post".to_string()),
            ..PostUpdate::default()
        };
        let post = blog.update(&author, "busy", retitle).await.unwrap();
        assert_eq!(post.enhancement_status, EnhancementStatus::Enhancing);

        gate.notify_one();
        ticket.task.await.unwrap();

        let post = blog.get(&author, "busy").await.unwrap();
        assert_eq!(post.title, "Busy Post");
        assert_eq!(post.content, "Polished content");
        assert_eq!(post.enhancement_status, EnhancementStatus::Enhanced);

        let edit = PostUpdate {
            content: Some("Author edit".to_string()),
            ..PostUpdate::default()
        };
        let post = blog.update(&author, "busy", edit).await.unwrap();
        assert_eq!(post.content, "Author edit");
    }

    #[tokio::test]
    async fn test_create_requires_identity_and_content() {
        let blog = BlogService::new(None);
        let err = blog
            .create(&Viewer::anonymous(), new_post("Anon", true))
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);

        let mut empty = new_post("   ", true);
        empty.content = String::new();
        let err = blog.create(&Viewer::user("a"), empty).await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enhancement_success_replaces_content() {
        let enhancer: Arc<dyn ContentEnhancer> =
            Arc::new(FixedEnhancer(Ok("Polished content".to_string())));
        let blog = BlogService::new(Some(enhancer));
        let author = Viewer::user("a");
        blog.create(&author, new_post("Polish Me", true)).await.unwrap();

        let ticket = blog.start_enhancement(&author, "polish-me").await.unwrap();
        assert_eq!(ticket.post.enhancement_status, EnhancementStatus::Enhancing);
        ticket.task.await.unwrap();

        let post = blog.get(&author, "polish-me").await.unwrap();
        assert_eq!(post.content, "Polished content");
        assert_eq!(post.enhancement_status, EnhancementStatus::Enhanced);
    }

    #[tokio::test]
    async fn test_enhancement_failure_resets_status() {
        let enhancer: Arc<dyn ContentEnhancer> =
            Arc::new(FixedEnhancer(Err("upstream down".to_string())));
        let blog = BlogService::new(Some(enhancer));
        let author = Viewer::user("a");
        blog.create(&author, new_post("Keep Me", true)).await.unwrap();

        let ticket = blog.start_enhancement(&author, "keep-me").await.unwrap();
        ticket.task.await.unwrap();

        let post = blog.get(&author, "keep-me").await.unwrap();
        assert_eq!(post.content, "Some content");
        assert_eq!(post.enhancement_status, EnhancementStatus::None);
    }

    #[tokio::test]
    async fn test_enhancement_requires_llm_config() {
        let blog = BlogService::new(None);
        let author = Viewer::user("a");
        blog.create(&author, new_post("No Key", true)).await.unwrap();
        let err = blog.start_enhancement(&author, "no-key").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.body().error, "Missing LLM_API_KEY environment variable.");
    }

    #[tokio::test]
    async fn test_changes_drive_post_feed() {
        let blog = BlogService::new(None);
        let mut changes = blog.subscribe();
        let mut feed = PostFeed::new(Viewer::anonymous(), blog.list(&Viewer::anonymous()).await);

        let author = Viewer::user("a");
        blog.create(&author, new_post("Visible", true)).await.unwrap();
        blog.create(&author, new_post("Hidden", false)).await.unwrap();
        blog.delete(&author, "visible").await.unwrap();

        for _ in 0..3 {
            let change = changes.recv().await.unwrap();
            feed.apply(change);
            if feed.posts().len() == 1 {
                assert_eq!(feed.posts()[0].slug, "visible");
            }
        }
        assert!(feed.posts().is_empty());
    }
}
