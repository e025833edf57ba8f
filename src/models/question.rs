use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Difficulty;

/// 四则运算类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// 加法
    #[serde(alias = "add")]
    Addition,
    /// 减法
    #[serde(alias = "sub")]
    Subtraction,
    /// 乘法
    #[serde(alias = "mul")]
    Multiplication,
    /// 除法（只出整除题）
    #[serde(alias = "div")]
    Division,
}

impl Operation {
    pub const ALL: [Operation; 4] = [
        Operation::Addition,
        Operation::Subtraction,
        Operation::Multiplication,
        Operation::Division,
    ];

    /// 获取标准名称
    pub fn name(self) -> &'static str {
        match self {
            Operation::Addition => "addition",
            Operation::Subtraction => "subtraction",
            Operation::Multiplication => "multiplication",
            Operation::Division => "division",
        }
    }

    /// 获取运算符号
    pub fn symbol(self) -> &'static str {
        match self {
            Operation::Addition => "+",
            Operation::Subtraction => "−",
            Operation::Multiplication => "×",
            Operation::Division => "÷",
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "addition" | "add" | "+" => Ok(Operation::Addition),
            "subtraction" | "sub" | "-" => Ok(Operation::Subtraction),
            "multiplication" | "mul" | "x" | "*" => Ok(Operation::Multiplication),
            "division" | "div" | "/" => Ok(Operation::Division),
            other => Err(format!("unknown operation '{}'", other)),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// 一道四则运算选择题
///
/// 每次请求重新生成，不做持久化
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArithmeticQuestion {
    pub operation: Operation,
    pub difficulty: Difficulty,
    /// 第一个操作数（除法时为被除数）
    pub num1: u32,
    /// 第二个操作数（除法时为除数）
    pub num2: u32,
    pub correct_answer: u32,
    /// 已打乱顺序的四个选项，其中恰好一个是正确答案
    pub options: [u32; 4],
}

impl ArithmeticQuestion {
    /// 获取三个干扰项
    pub fn distractors(&self) -> Vec<u32> {
        self.options
            .iter()
            .copied()
            .filter(|&option| option != self.correct_answer)
            .collect()
    }

    /// 判断作答是否正确
    pub fn is_correct(&self, answer: u32) -> bool {
        answer == self.correct_answer
    }
}

impl fmt::Display for ArithmeticQuestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} = ?",
            self.num1,
            self.operation.symbol(),
            self.num2
        )
    }
}
