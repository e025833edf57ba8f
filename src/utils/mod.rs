pub mod logging;
pub mod slug;

pub use logging::truncate_text;
pub use slug::slugify;
