//! 上游响应归一化
//!
//! n8n / Modal 既可能直接返回数据，也可能包一层 `{ "data": ... }`。
//! 两种形式都接受，并且都要通过字段级校验。

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{PayloadIssues, Validate};

/// 一次解析尝试的结果
enum Attempt<T> {
    Valid(T),
    /// 结构正确但字段校验失败
    Rejected(PayloadIssues),
    /// 结构都对不上
    Malformed(PayloadIssues),
}

fn attempt<T: DeserializeOwned + Validate>(value: Value) -> Attempt<T> {
    match serde_json::from_value::<T>(value) {
        Ok(parsed) => match parsed.validate() {
            Ok(()) => Attempt::Valid(parsed),
            Err(issues) => Attempt::Rejected(issues),
        },
        Err(e) => Attempt::Malformed(issues_from_serde(&e)),
    }
}

/// 把 serde 错误转换成校验问题
///
/// `missing field` 归到对应字段下，其余作为整体错误
pub fn issues_from_serde(err: &serde_json::Error) -> PayloadIssues {
    let message = err.to_string();
    if let Some(rest) = message.strip_prefix("missing field `") {
        if let Some(end) = rest.find('`') {
            let mut issues = PayloadIssues::new();
            issues.add_field(&rest[..end], "Required");
            return issues;
        }
    }
    PayloadIssues::form(message)
}

/// 解析上游数据，兼容裸数据和 `{data: ...}` 两种形式
///
/// # 返回
/// 第一个通过校验的结果；都失败时返回最接近的那次尝试的问题
pub fn unwrap_envelope<T: DeserializeOwned + Validate>(value: Value) -> Result<T, PayloadIssues> {
    let inner = match &value {
        Value::Object(map) => map.get("data").cloned(),
        _ => None,
    };

    let bare = match attempt::<T>(value) {
        Attempt::Valid(parsed) => return Ok(parsed),
        Attempt::Rejected(issues) => Failure::Rejected(issues),
        Attempt::Malformed(issues) => Failure::Malformed(issues),
    };

    let Some(inner) = inner else {
        return Err(bare.into_issues());
    };

    match (bare, attempt::<T>(inner)) {
        (_, Attempt::Valid(parsed)) => Ok(parsed),
        (_, Attempt::Rejected(issues)) => Err(issues),
        (Failure::Rejected(issues), Attempt::Malformed(_)) => Err(issues),
        (Failure::Malformed(mut bare), Attempt::Malformed(enveloped)) => {
            bare.form_errors.extend(enveloped.form_errors);
            for (field, messages) in enveloped.field_errors {
                for message in messages {
                    bare.add_field(format!("data.{}", field), message);
                }
            }
            Err(bare)
        }
    }
}

enum Failure {
    Rejected(PayloadIssues),
    Malformed(PayloadIssues),
}

impl Failure {
    fn into_issues(self) -> PayloadIssues {
        match self {
            Failure::Rejected(issues) | Failure::Malformed(issues) => issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::payloads::{ScienceFact, WordProblem};
    use serde_json::json;

    #[test]
    fn test_bare_and_enveloped_payloads_normalise_identically() {
        let bare = json!({"topic": "space", "fact": "The sun is a star."});
        let wrapped = json!({"data": {"topic": "space", "fact": "The sun is a star."}});

        let a: ScienceFact = unwrap_envelope(bare).unwrap();
        let b: ScienceFact = unwrap_envelope(wrapped).unwrap();
        assert_eq!(a.topic, b.topic);
        assert_eq!(a.fact, b.fact);
    }

    #[test]
    fn test_missing_field_is_reported_per_field() {
        let err = unwrap_envelope::<WordProblem>(json!({"word_problem": "x", "type": "add"}))
            .unwrap_err();
        assert_eq!(err.field_errors["solution"], vec!["Required".to_string()]);
    }

    #[test]
    fn test_enveloped_validation_failure_wins() {
        let err = unwrap_envelope::<ScienceFact>(json!({"data": {"topic": "space", "fact": ""}}))
            .unwrap_err();
        assert!(err.field_errors.contains_key("fact"));
        assert!(err.form_errors.is_empty());
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let err = unwrap_envelope::<ScienceFact>(json!(["not", "an", "object"])).unwrap_err();
        assert!(!err.is_empty());
    }
}
