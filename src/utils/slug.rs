use once_cell::sync::Lazy;
use regex::Regex;

static NON_ALNUM: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-z0-9]+").unwrap());

/// 标题转 slug：小写，非字母数字的连续字符替换为 `-`，去掉首尾 `-`
///
/// 结果为空时返回 `post`
pub fn slugify(title: &str) -> String {
    let lower = title.to_lowercase();
    let slug = NON_ALNUM.replace_all(&lower, "-");
    let slug = slug.trim_matches('-');
    if slug.is_empty() {
        "post".to_string()
    } else {
        slug.to_string()
    }
}

/// 带时间戳后缀的 slug，用于 slug 冲突时
pub fn with_timestamp_suffix(slug: &str, unix_millis: i64) -> String {
    format!("{}-{}", slug, unix_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello, World!"), "hello-world");
        assert_eq!(slugify("  Rust & Axum -- 2024 "), "rust-axum-2024");
    }

    #[test]
    fn test_slugify_empty_falls_back() {
        assert_eq!(slugify("!!!"), "post");
        assert_eq!(slugify("你好"), "post");
    }

    #[test]
    fn test_timestamp_suffix() {
        assert_eq!(with_timestamp_suffix("hello", 1700000000000), "hello-1700000000000");
    }
}
