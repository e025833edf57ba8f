//! 文章列表的增量更新
//!
//! 订阅通道本身不在这里实现；这里只负责把一条变更应用到
//! 某个访客看到的列表上。

use uuid::Uuid;

use crate::models::{Post, Viewer};

/// 一条文章变更
#[derive(Debug, Clone, PartialEq)]
pub enum PostChange {
    Inserted(Post),
    Updated(Post),
    Deleted { id: Uuid },
}

/// 某个访客视角下的文章列表
#[derive(Debug, Clone)]
pub struct PostFeed {
    viewer: Viewer,
    posts: Vec<Post>,
}

impl PostFeed {
    /// 用初始列表创建，不可见的文章会被过滤掉
    pub fn new(viewer: Viewer, initial: Vec<Post>) -> Self {
        let posts = initial
            .into_iter()
            .filter(|post| post.is_visible_to(&viewer))
            .collect();
        Self { viewer, posts }
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    /// 应用一条变更
    ///
    /// - 新增：可见时插到最前面
    /// - 更新：原地替换；列表中没有则插到最前面；变为不可见则移除
    /// - 删除：按 id 移除
    pub fn apply(&mut self, change: PostChange) {
        match change {
            PostChange::Inserted(post) => {
                if post.is_visible_to(&self.viewer) {
                    self.posts.insert(0, post);
                }
            }
            PostChange::Updated(post) => {
                let position = self.posts.iter().position(|p| p.id == post.id);
                match (position, post.is_visible_to(&self.viewer)) {
                    (Some(index), true) => self.posts[index] = post,
                    (Some(index), false) => {
                        self.posts.remove(index);
                    }
                    (None, true) => self.posts.insert(0, post),
                    (None, false) => {}
                }
            }
            PostChange::Deleted { id } => self.posts.retain(|p| p.id != id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EnhancementStatus;
    use chrono::Utc;

    fn post(title: &str, author: &str, published: bool) -> Post {
        Post {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            title: title.to_string(),
            subtitle: None,
            content: "body".to_string(),
            slug: title.to_lowercase(),
            tags: Vec::new(),
            is_published: published,
            author_id: author.to_string(),
            enhancement_status: EnhancementStatus::None,
        }
    }

    #[test]
    fn test_insert_prepends_only_visible_posts() {
        let mut feed = PostFeed::new(Viewer::anonymous(), vec![post("A", "u1", true)]);
        feed.apply(PostChange::Inserted(post("Draft", "u1", false)));
        feed.apply(PostChange::Inserted(post("B", "u2", true)));

        let titles: Vec<_> = feed.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "A"]);
    }

    #[test]
    fn test_author_sees_own_draft() {
        let mut feed = PostFeed::new(Viewer::user("u1"), Vec::new());
        feed.apply(PostChange::Inserted(post("Draft", "u1", false)));
        assert_eq!(feed.posts().len(), 1);
    }

    #[test]
    fn test_update_replaces_in_place_or_prepends() {
        let first = post("A", "u1", true);
        let second = post("B", "u1", true);
        let mut feed = PostFeed::new(Viewer::anonymous(), vec![first.clone(), second.clone()]);

        let mut edited = second.clone();
        edited.title = "B2".to_string();
        feed.apply(PostChange::Updated(edited));
        assert_eq!(feed.posts()[1].title, "B2");

        feed.apply(PostChange::Updated(post("C", "u2", true)));
        assert_eq!(feed.posts()[0].title, "C");
        assert_eq!(feed.posts().len(), 3);
    }

    #[test]
    fn test_unpublish_removes_for_anonymous() {
        let original = post("A", "u1", true);
        let mut feed = PostFeed::new(Viewer::anonymous(), vec![original.clone()]);
        let mut hidden = original;
        hidden.is_published = false;
        feed.apply(PostChange::Updated(hidden));
        assert!(feed.posts().is_empty());
    }

    #[test]
    fn test_delete_by_id() {
        let a = post("A", "u1", true);
        let mut feed = PostFeed::new(Viewer::anonymous(), vec![a.clone(), post("B", "u1", true)]);
        feed.apply(PostChange::Deleted { id: a.id });
        assert_eq!(feed.posts().len(), 1);
        assert_eq!(feed.posts()[0].title, "B");
    }
}
