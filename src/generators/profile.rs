//! 四则运算的取值范围表
//!
//! 历史上存在两套难度表：竞速游戏使用的 `Race` 表（位数逐级增加），
//! 以及作业练习页使用的 `Homework` 表（范围更小）。两套都保留，
//! 默认使用 `Race`。

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use std::str::FromStr;

use crate::models::{Difficulty, Operation};

/// 难度表
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeProfile {
    #[default]
    Race,
    Homework,
}

impl FromStr for RangeProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "race" => Ok(RangeProfile::Race),
            "homework" => Ok(RangeProfile::Homework),
            other => Err(format!("unknown profile '{}'", other)),
        }
    }
}

/// 某一 (运算, 难度) 组合下的取值规则
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandRule {
    /// 加/减/乘：第一个操作数；除：除数
    pub first: RangeInclusive<u32>,
    /// 加/乘：第二个操作数；除：商；减：不使用（减数由被减数决定）
    pub second: RangeInclusive<u32>,
    /// 干扰项偏移区间
    pub offset_band: RangeInclusive<i64>,
}

const WIDE_BAND: RangeInclusive<i64> = -10..=9;
const NARROW_BAND: RangeInclusive<i64> = -3..=2;

impl RangeProfile {
    /// 查表
    pub fn rule(self, operation: Operation, difficulty: Difficulty) -> OperandRule {
        use Difficulty::*;
        use Operation::*;

        let (first, second) = match (self, operation, difficulty) {
            (RangeProfile::Race, Multiplication, Easy) => (2..=5, 2..=5),
            (RangeProfile::Race, Multiplication, Medium) => (5..=11, 5..=11),
            (RangeProfile::Race, Multiplication, Hard) => (10..=20, 10..=20),
            (RangeProfile::Race, Addition, Easy) => (10..=99, 10..=99),
            (RangeProfile::Race, Addition, Medium) => (100..=999, 100..=999),
            (RangeProfile::Race, Addition, Hard) => (1000..=9999, 1000..=9999),
            (RangeProfile::Race, Subtraction, Easy) => (10..=99, 0..=0),
            (RangeProfile::Race, Subtraction, Medium) => (10..=99, 0..=0),
            (RangeProfile::Race, Subtraction, Hard) => (100..=999, 0..=0),
            (RangeProfile::Race, Division, Easy) => (2..=5, 2..=5),
            (RangeProfile::Race, Division, Medium) => (5..=11, 5..=11),
            (RangeProfile::Race, Division, Hard) => (10..=20, 10..=20),

            (RangeProfile::Homework, Multiplication, Easy) => (2..=5, 2..=5),
            (RangeProfile::Homework, Multiplication, Medium) => (2..=10, 2..=10),
            (RangeProfile::Homework, Multiplication, Hard) => (2..=12, 2..=12),
            (RangeProfile::Homework, Addition, Easy) => (1..=20, 1..=20),
            (RangeProfile::Homework, Addition, Medium) => (10..=50, 10..=50),
            (RangeProfile::Homework, Addition, Hard) => (20..=100, 20..=100),
            (RangeProfile::Homework, Subtraction, Easy) => (1..=20, 0..=0),
            (RangeProfile::Homework, Subtraction, Medium) => (10..=50, 0..=0),
            (RangeProfile::Homework, Subtraction, Hard) => (20..=100, 0..=0),
            (RangeProfile::Homework, Division, Easy) => (2..=10, 2..=10),
            (RangeProfile::Homework, Division, Medium) => (2..=10, 2..=11),
            (RangeProfile::Homework, Division, Hard) => (2..=12, 2..=12),
        };

        let offset_band = match (self, operation) {
            (RangeProfile::Homework, Division) => NARROW_BAND,
            _ => WIDE_BAND,
        };

        OperandRule {
            first,
            second,
            offset_band,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplication_easy_is_two_to_five_in_both_profiles() {
        for profile in [RangeProfile::Race, RangeProfile::Homework] {
            let rule = profile.rule(Operation::Multiplication, Difficulty::Easy);
            assert_eq!(rule.first, 2..=5);
            assert_eq!(rule.second, 2..=5);
        }
    }

    #[test]
    fn test_only_homework_division_uses_narrow_band() {
        assert_eq!(
            RangeProfile::Homework
                .rule(Operation::Division, Difficulty::Hard)
                .offset_band,
            -3..=2
        );
        assert_eq!(
            RangeProfile::Race
                .rule(Operation::Division, Difficulty::Hard)
                .offset_band,
            -10..=9
        );
    }
}
