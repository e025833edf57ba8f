//! 上游接口返回的数据结构
//!
//! 每个结构对应一个上游接口的响应；反序列化时忽略多余字段，
//! 再通过 [`Validate`] 检查字段约束。

use serde::{Deserialize, Serialize};

use super::validation::{PayloadIssues, Validate};
use super::Difficulty;

// ========== 数学 ==========

/// 应用题（n8n）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordProblem {
    pub word_problem: String,
    pub solution: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl Validate for WordProblem {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("word_problem", &self.word_problem, "Word problem is required");
        issues.require_text("solution", &self.solution, "Solution is required");
        issues.require_text("type", &self.kind, "Operation type is required");
        issues.into_result()
    }
}

/// 找规律题中的一项，可能是数字也可能是文字
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatternTerm {
    Number(serde_json::Number),
    Text(String),
}

/// 找规律题（Modal）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternProblem {
    pub pattern: Vec<PatternTerm>,
    pub answer: PatternTerm,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl Validate for PatternProblem {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        if self.pattern.is_empty() {
            issues.add_field("pattern", "Pattern is required");
        }
        issues.require_text("type", &self.kind, "Type is required");
        issues.into_result()
    }
}

/// 时间题（Modal）
///
/// 读钟题带有时、分、上下午；换算/计算题只有题干和答案，
/// 换算题可能附带小时数与分钟数。
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TimeProblem {
    Clock {
        problem: String,
        answer: String,
        hour: i64,
        minute: i64,
        period: String,
    },
    Arithmetic {
        problem: String,
        answer: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        hours: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        minutes: Option<f64>,
    },
}

/// 反序列化时的原始形状
#[derive(Deserialize)]
#[serde(untagged)]
enum TimeShape {
    Clock {
        problem: String,
        answer: String,
        hour: i64,
        minute: i64,
        period: String,
    },
    Arithmetic {
        problem: String,
        answer: String,
        #[serde(default)]
        hours: Option<f64>,
        #[serde(default)]
        minutes: Option<f64>,
    },
}

/// 依次尝试读钟题、计算题：读钟题字段不合法时按计算题处理，
/// 此时只保留题干和答案
impl<'de> Deserialize<'de> for TimeProblem {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let problem = match TimeShape::deserialize(deserializer)? {
            TimeShape::Clock {
                problem,
                answer,
                hour,
                minute,
                period,
            } => {
                let clock = TimeProblem::Clock {
                    problem,
                    answer,
                    hour,
                    minute,
                    period,
                };
                match clock.validate() {
                    Ok(()) => clock,
                    Err(_) => clock.into_arithmetic(),
                }
            }
            TimeShape::Arithmetic {
                problem,
                answer,
                hours,
                minutes,
            } => TimeProblem::Arithmetic {
                problem,
                answer,
                hours,
                minutes,
            },
        };
        Ok(problem)
    }
}

impl TimeProblem {
    fn into_arithmetic(self) -> Self {
        match self {
            TimeProblem::Clock {
                problem, answer, ..
            } => TimeProblem::Arithmetic {
                problem,
                answer,
                hours: None,
                minutes: None,
            },
            other => other,
        }
    }
}

impl Validate for TimeProblem {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        match self {
            TimeProblem::Clock {
                problem,
                answer,
                hour,
                minute,
                period,
            } => {
                issues.require_text("problem", problem, "Problem is required");
                issues.require_text("answer", answer, "Answer is required");
                issues.require_range("hour", *hour, 0, 23);
                issues.require_range("minute", *minute, 0, 59);
                issues.require_text("period", period, "Period is required");
            }
            TimeProblem::Arithmetic {
                problem, answer, ..
            } => {
                issues.require_text("problem", problem, "Problem is required");
                issues.require_text("answer", answer, "Answer is required");
            }
        }
        issues.into_result()
    }
}

/// 钱币题（Modal）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MoneyProblem {
    /// 数钱：给出钱币列表，答案附带以分计的金额
    Count {
        problem: String,
        items: Vec<String>,
        answer: String,
        answer_cents: i64,
    },
    /// 加减计算
    Calculation { problem: String, answer: String },
}

impl Validate for MoneyProblem {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        match self {
            MoneyProblem::Count {
                problem,
                items,
                answer,
                answer_cents,
            } => {
                issues.require_text("problem", problem, "Problem is required");
                if items.is_empty() {
                    issues.add_field("items", "At least one item is required");
                }
                issues.require_text("answer", answer, "Answer is required");
                if *answer_cents < 0 {
                    issues.add_field("answer_cents", "answer_cents cannot be negative");
                }
            }
            MoneyProblem::Calculation { problem, answer } => {
                issues.require_text("problem", problem, "Problem is required");
                issues.require_text("answer", answer, "Answer is required");
            }
        }
        issues.into_result()
    }
}

/// 单位换算题（Modal）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementProblem {
    pub problem: String,
    pub answer: String,
    pub value: f64,
    pub from_unit: String,
    pub to_unit: String,
}

impl Validate for MeasurementProblem {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("problem", &self.problem, "Problem is required");
        issues.require_text("answer", &self.answer, "Answer is required");
        issues.require_text("from_unit", &self.from_unit, "from_unit is required");
        issues.require_text("to_unit", &self.to_unit, "to_unit is required");
        issues.into_result()
    }
}

// ========== 科学 / 地理 ==========

/// 科学小知识（n8n）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceFact {
    pub topic: String,
    pub fact: String,
}

impl Validate for ScienceFact {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("topic", &self.topic, "Topic is required");
        issues.require_text("fact", &self.fact, "Fact is required");
        issues.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizItem {
    pub question: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub answer: String,
    pub explanation: String,
}

/// 科学测验（Modal）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScienceQuiz {
    pub topic: String,
    pub questions: Vec<QuizItem>,
}

impl Validate for ScienceQuiz {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("topic", &self.topic, "Topic is required");
        if self.questions.is_empty() {
            issues.add_field("questions", "At least one question is required");
        }
        for (idx, item) in self.questions.iter().enumerate() {
            let prefix = format!("questions.{}", idx);
            issues.require_text(&format!("{}.question", prefix), &item.question, "Question is required");
            issues.require_text(&format!("{}.type", prefix), &item.kind, "Type is required");
            issues.require_text(&format!("{}.answer", prefix), &item.answer, "Answer is required");
            issues.require_text(
                &format!("{}.explanation", prefix),
                &item.explanation,
                "Explanation is required",
            );
        }
        issues.into_result()
    }
}

/// 首都问答（Modal）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CapitalQuestion {
    pub country: String,
    pub capital: String,
    pub continent: String,
    pub hint: String,
}

impl Validate for CapitalQuestion {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("country", &self.country, "Country is required");
        issues.require_text("capital", &self.capital, "Capital is required");
        issues.require_text("continent", &self.continent, "Continent is required");
        issues.require_text("hint", &self.hint, "Hint is required");
        issues.into_result()
    }
}

// ========== 语文（ELA） ==========

/// 段落批改反馈（n8n）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParagraphFeedback {
    pub feedback: String,
}

impl Validate for ParagraphFeedback {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("feedback", &self.feedback, "Feedback is required");
        issues.into_result()
    }
}

/// 单词释义（n8n）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WordAnnotation {
    pub explanation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<String>,
}

impl Validate for WordAnnotation {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("explanation", &self.explanation, "Explanation is required");
        issues.into_result()
    }
}

/// 阅读理解选项键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChoiceKey {
    ChoiceA,
    ChoiceB,
    ChoiceC,
    ChoiceD,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReadingChoices {
    pub choice_a: String,
    pub choice_b: String,
    pub choice_c: String,
    pub choice_d: String,
}

impl ReadingChoices {
    pub fn get(&self, key: ChoiceKey) -> &str {
        match key {
            ChoiceKey::ChoiceA => &self.choice_a,
            ChoiceKey::ChoiceB => &self.choice_b,
            ChoiceKey::ChoiceC => &self.choice_c,
            ChoiceKey::ChoiceD => &self.choice_d,
        }
    }
}

/// 阅读理解题（n8n 原始结构）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingQuestion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub paragraph: String,
    pub question: String,
    pub choices: ReadingChoices,
    pub correct_answer: ChoiceKey,
}

impl Validate for ReadingQuestion {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        if let Some(id) = &self.id {
            issues.require_text("id", id, "id cannot be empty");
        }
        issues.require_text("paragraph", &self.paragraph, "Passage text is required");
        issues.require_text("question", &self.question, "Question is required");
        issues.require_text("choices.ChoiceA", &self.choices.choice_a, "ChoiceA is required");
        issues.require_text("choices.ChoiceB", &self.choices.choice_b, "ChoiceB is required");
        issues.require_text("choices.ChoiceC", &self.choices.choice_c, "ChoiceC is required");
        issues.require_text("choices.ChoiceD", &self.choices.choice_d, "ChoiceD is required");
        issues.into_result()
    }
}

/// 返回给页面的阅读理解题：选项拍平为数组，正确答案给出原文
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadingQuestionView {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub paragraph: String,
    pub question: String,
    pub choices: [String; 4],
    pub correct_answer: String,
    pub correct_answer_key: ChoiceKey,
}

impl From<ReadingQuestion> for ReadingQuestionView {
    fn from(question: ReadingQuestion) -> Self {
        let correct_answer = question.choices.get(question.correct_answer).to_string();
        let ReadingChoices {
            choice_a,
            choice_b,
            choice_c,
            choice_d,
        } = question.choices;
        Self {
            id: question.id,
            paragraph: question.paragraph,
            question: question.question,
            choices: [choice_a, choice_b, choice_c, choice_d],
            correct_answer,
            correct_answer_key: question.correct_answer,
        }
    }
}

/// 拼写测试单词
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellingWord {
    pub word: String,
    pub difficulty: Difficulty,
}

// ========== 笑话 ==========

/// api.chucknorris.io
#[derive(Debug, Clone, Deserialize)]
pub struct ChuckNorrisJoke {
    pub value: String,
}

impl Validate for ChuckNorrisJoke {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("value", &self.value, "Joke value is required");
        issues.into_result()
    }
}

/// icanhazdadjoke.com
#[derive(Debug, Clone, Deserialize)]
pub struct DadJoke {
    pub joke: String,
    #[serde(default)]
    pub status: Option<i64>,
}

impl Validate for DadJoke {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("joke", &self.joke, "Joke is required");
        issues.into_result()
    }
}

/// official-joke-api
#[derive(Debug, Clone, Deserialize)]
pub struct RandomJoke {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub setup: String,
    pub punchline: String,
    #[serde(default)]
    pub id: Option<i64>,
}

impl Validate for RandomJoke {
    fn validate(&self) -> Result<(), PayloadIssues> {
        let mut issues = PayloadIssues::new();
        issues.require_text("setup", &self.setup, "Setup is required");
        issues.require_text("punchline", &self.punchline, "Punchline is required");
        issues.into_result()
    }
}

/// 统一后的笑话
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Joke {
    pub joke: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub punchline: Option<String>,
    #[serde(rename = "type")]
    pub kind: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_time_problem_prefers_clock_shape() {
        let value = json!({
            "problem": "What time does the clock show?",
            "answer": "3:15 PM",
            "hour": 15,
            "minute": 15,
            "period": "PM"
        });
        let parsed: TimeProblem = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed, TimeProblem::Clock { hour: 15, .. }));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_time_problem_keeps_conversion_fields() {
        let value = json!({"problem": "How many minutes in 2 hours?", "answer": "120", "hours": 2});
        let parsed: TimeProblem = serde_json::from_value(value).unwrap();
        let back = serde_json::to_value(&parsed).unwrap();
        assert_eq!(back["hours"], 2.0);
        assert!(back.get("minutes").is_none());
    }

    #[test]
    fn test_clock_out_of_range_is_rejected() {
        let parsed = TimeProblem::Clock {
            problem: "p".into(),
            answer: "a".into(),
            hour: 24,
            minute: 60,
            period: "AM".into(),
        };
        let issues = parsed.validate().unwrap_err();
        assert!(issues.field_errors.contains_key("hour"));
        assert!(issues.field_errors.contains_key("minute"));
    }

    #[test]
    fn test_clock_with_bad_hour_falls_back_to_arithmetic() {
        let value = json!({
            "problem": "What time is it?",
            "answer": "1:00",
            "hour": 25,
            "minute": 0,
            "period": "AM"
        });
        let parsed: TimeProblem = serde_json::from_value(value).unwrap();
        assert_eq!(
            parsed,
            TimeProblem::Arithmetic {
                problem: "What time is it?".into(),
                answer: "1:00".into(),
                hours: None,
                minutes: None,
            }
        );
        assert!(parsed.validate().is_ok());

        let fractional = json!({
            "problem": "What time is it?",
            "answer": "1:00",
            "hour": 3.5,
            "minute": 0,
            "period": "AM"
        });
        let parsed: TimeProblem = serde_json::from_value(fractional).unwrap();
        assert!(matches!(parsed, TimeProblem::Arithmetic { .. }));
    }

    #[test]
    fn test_reading_question_flattens_choices() {
        let value = json!({
            "paragraph": "Mario jumped over the pipe.",
            "question": "What did Mario jump over?",
            "choices": {
                "ChoiceA": "A goomba",
                "ChoiceB": "A pipe",
                "ChoiceC": "A castle",
                "ChoiceD": "A cloud"
            },
            "correctAnswer": "ChoiceB"
        });
        let parsed: ReadingQuestion = serde_json::from_value(value).unwrap();
        let view = ReadingQuestionView::from(parsed);

        assert_eq!(view.correct_answer, "A pipe");
        assert_eq!(view.correct_answer_key, ChoiceKey::ChoiceB);
        assert_eq!(view.choices[3], "A cloud");

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["correctAnswerKey"], "ChoiceB");
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_pattern_terms_accept_numbers_and_text() {
        let value = json!({"pattern": [2, "4", 6.5], "answer": 8, "type": "number"});
        let parsed: PatternProblem = serde_json::from_value(value).unwrap();
        assert_eq!(parsed.pattern.len(), 3);
        assert!(matches!(parsed.pattern[1], PatternTerm::Text(_)));
        assert!(parsed.validate().is_ok());
    }

    #[test]
    fn test_money_count_shape_is_detected() {
        let value = json!({
            "problem": "Count the coins",
            "items": ["quarter", "dime"],
            "answer": "$0.35",
            "answer_cents": 35
        });
        let parsed: MoneyProblem = serde_json::from_value(value).unwrap();
        assert!(matches!(parsed, MoneyProblem::Count { answer_cents: 35, .. }));
    }
}
