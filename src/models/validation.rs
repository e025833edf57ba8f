//! 上游返回数据的校验
//!
//! 上游（n8n / Modal / 第三方 API）返回的 JSON 在反序列化成功之后，
//! 还需要满足字段级约束（非空字符串、数值范围等）。校验失败时以
//! `{formErrors, fieldErrors}` 的结构返回给调用方。

use serde::Serialize;
use std::collections::BTreeMap;

/// 校验问题汇总
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("payload failed validation: {}", self.summary())]
pub struct PayloadIssues {
    /// 整体性错误（如结构不匹配、JSON 解析失败）
    pub form_errors: Vec<String>,
    /// 按字段归类的错误
    pub field_errors: BTreeMap<String, Vec<String>>,
}

impl PayloadIssues {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只包含一条整体性错误
    pub fn form(message: impl Into<String>) -> Self {
        Self {
            form_errors: vec![message.into()],
            field_errors: BTreeMap::new(),
        }
    }

    /// 记录一条字段错误
    pub fn add_field(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.field_errors
            .entry(field.into())
            .or_default()
            .push(message.into());
    }

    /// 要求字符串非空（只含空白也算非空）
    pub fn require_text(&mut self, field: &str, value: &str, message: &str) {
        if value.is_empty() {
            self.add_field(field, message);
        }
    }

    /// 要求数值落在闭区间内
    pub fn require_range(&mut self, field: &str, value: i64, min: i64, max: i64) {
        if value < min || value > max {
            self.add_field(
                field,
                format!("{} must be between {} and {}", field, min, max),
            );
        }
    }

    pub fn is_empty(&self) -> bool {
        self.form_errors.is_empty() && self.field_errors.is_empty()
    }

    /// 没有任何问题时返回 Ok
    pub fn into_result(self) -> Result<(), PayloadIssues> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    /// 问题总数（用于挑选最接近的匹配）
    pub fn count(&self) -> usize {
        self.form_errors.len() + self.field_errors.values().map(Vec::len).sum::<usize>()
    }

    fn summary(&self) -> String {
        let mut parts: Vec<String> = self.form_errors.clone();
        for (field, messages) in &self.field_errors {
            parts.push(format!("{}: {}", field, messages.join(", ")));
        }
        parts.join("; ")
    }
}

/// 上游数据的字段级约束
pub trait Validate {
    fn validate(&self) -> Result<(), PayloadIssues>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_text_rejects_empty_only() {
        let mut issues = PayloadIssues::new();
        issues.require_text("fact", "", "Fact is required");
        issues.require_text("topic", "space", "Topic is required");
        issues.require_text("hint", " ", "Hint is required");

        assert_eq!(issues.count(), 1);
        assert_eq!(issues.field_errors["fact"], vec!["Fact is required"]);
        assert!(issues.into_result().is_err());
    }

    #[test]
    fn test_issues_serialize_in_flatten_shape() {
        let mut issues = PayloadIssues::form("Invalid input");
        issues.add_field("hour", "hour must be between 0 and 23");

        let json = serde_json::to_value(&issues).unwrap();
        assert_eq!(json["formErrors"][0], "Invalid input");
        assert_eq!(json["fieldErrors"]["hour"][0], "hour must be between 0 and 23");
    }
}
