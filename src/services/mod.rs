pub mod blog_service;
pub mod envelope;
pub mod post_feed;
pub mod practice_service;

pub use blog_service::{BlogService, ContentEnhancer};
pub use post_feed::{PostChange, PostFeed};
pub use practice_service::PracticeService;
