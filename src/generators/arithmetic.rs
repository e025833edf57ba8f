//! 四则运算选择题生成器
//!
//! 纯函数：给定运算、难度、难度表和随机源，返回一道带 4 个选项的题目。

use rand::Rng;

use super::distractors::{generate_distractors, shuffle_options};
use super::profile::RangeProfile;
use crate::models::{ArithmeticQuestion, Difficulty, Operation};

/// 生成一道四则运算题
///
/// # 参数
/// - `operation`: 运算类型
/// - `difficulty`: 难度
/// - `profile`: 使用的难度表
/// - `rng`: 随机源（测试时传入固定种子）
pub fn generate<R: Rng + ?Sized>(
    operation: Operation,
    difficulty: Difficulty,
    profile: RangeProfile,
    rng: &mut R,
) -> ArithmeticQuestion {
    let rule = profile.rule(operation, difficulty);

    let (num1, num2, correct_answer) = match operation {
        Operation::Addition => {
            let a = rng.gen_range(rule.first.clone());
            let b = rng.gen_range(rule.second.clone());
            (a, b, a + b)
        }
        Operation::Multiplication => {
            let a = rng.gen_range(rule.first.clone());
            let b = rng.gen_range(rule.second.clone());
            (a, b, a * b)
        }
        Operation::Subtraction => {
            let minuend = rng.gen_range(rule.first.clone());
            let subtrahend = if difficulty == Difficulty::Easy {
                no_borrow_subtrahend(minuend, rng)
            } else {
                rng.gen_range(0..minuend)
            };
            (minuend, subtrahend, minuend - subtrahend)
        }
        Operation::Division => {
            let divisor = rng.gen_range(rule.first.clone());
            let quotient = rng.gen_range(rule.second.clone());
            (divisor * quotient, divisor, quotient)
        }
    };

    let distractors = generate_distractors(correct_answer, rule.offset_band, rng);
    let options = shuffle_options(correct_answer, &distractors, rng);

    ArithmeticQuestion {
        operation,
        difficulty,
        num1,
        num2,
        correct_answer,
        options,
    }
}

/// 生成不需要借位的减数
///
/// 减数每一位都不大于被减数对应位，且减数严格小于被减数。
/// 把所有合法减数看成混合进制编号，直接均匀抽一个编号，
/// 最大编号恰好对应被减数本身，所以排除它即可。
fn no_borrow_subtrahend<R: Rng + ?Sized>(minuend: u32, rng: &mut R) -> u32 {
    let digits = decimal_digits(minuend);
    let total: u64 = digits.iter().map(|&d| u64::from(d) + 1).product();
    let mut index = rng.gen_range(0..total - 1);

    let mut subtrahend = 0u32;
    let mut place = 1u32;
    for &digit in &digits {
        let radix = u64::from(digit) + 1;
        // index % radix <= digit < 10
        subtrahend += (index % radix) as u32 * place;
        index /= radix;
        place = place.saturating_mul(10);
    }
    subtrahend
}

/// 十进制各位，低位在前
fn decimal_digits(mut value: u32) -> Vec<u32> {
    let mut digits = Vec::new();
    loop {
        digits.push(value % 10);
        value /= 10;
        if value == 0 {
            break;
        }
    }
    digits
}

/// 判断 `minuend - subtrahend` 是否需要借位
pub fn requires_borrow(minuend: u32, subtrahend: u32) -> bool {
    let (mut m, mut s) = (minuend, subtrahend);
    while s > 0 {
        if s % 10 > m % 10 {
            return true;
        }
        m /= 10;
        s /= 10;
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    const DRAWS: usize = 300;

    #[test]
    fn test_every_combination_yields_valid_options() {
        let mut rng = StdRng::seed_from_u64(42);
        for profile in [RangeProfile::Race, RangeProfile::Homework] {
            for operation in Operation::ALL {
                for difficulty in Difficulty::ALL {
                    for _ in 0..DRAWS {
                        let q = generate(operation, difficulty, profile, &mut rng);
                        let distractors = q.distractors();
                        let unique: HashSet<_> = distractors.iter().collect();

                        assert_eq!(distractors.len(), 3, "{:?}", q);
                        assert_eq!(unique.len(), 3, "{:?}", q);
                        assert!(distractors.iter().all(|&d| d > 0), "{:?}", q);
                        assert_eq!(
                            q.options.iter().filter(|&&o| o == q.correct_answer).count(),
                            1
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_operands_stay_within_rule() {
        let mut rng = StdRng::seed_from_u64(1);
        for profile in [RangeProfile::Race, RangeProfile::Homework] {
            for operation in Operation::ALL {
                for difficulty in Difficulty::ALL {
                    let rule = profile.rule(operation, difficulty);
                    for _ in 0..DRAWS {
                        let q = generate(operation, difficulty, profile, &mut rng);
                        match operation {
                            Operation::Addition => {
                                assert!(rule.first.contains(&q.num1));
                                assert!(rule.second.contains(&q.num2));
                                assert_eq!(q.correct_answer, q.num1 + q.num2);
                            }
                            Operation::Multiplication => {
                                assert!(rule.first.contains(&q.num1));
                                assert!(rule.second.contains(&q.num2));
                                assert_eq!(q.correct_answer, q.num1 * q.num2);
                            }
                            Operation::Subtraction => {
                                assert!(rule.first.contains(&q.num1));
                                assert!(q.num2 < q.num1);
                                assert_eq!(q.correct_answer, q.num1 - q.num2);
                                assert!(q.correct_answer >= 1);
                            }
                            Operation::Division => {
                                assert!(rule.first.contains(&q.num2));
                                assert!(rule.second.contains(&q.correct_answer));
                                assert_eq!(q.num1, q.num2 * q.correct_answer);
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_easy_division_matches_documented_example() {
        let mut rng = StdRng::seed_from_u64(2024);
        for _ in 0..DRAWS {
            let q = generate(
                Operation::Division,
                Difficulty::Easy,
                RangeProfile::default(),
                &mut rng,
            );
            assert!((2..=5).contains(&q.num2));
            assert!((2..=5).contains(&q.correct_answer));
            assert_eq!(q.num1, q.num2 * q.correct_answer);
            assert!(q.options.contains(&q.correct_answer));
        }
    }

    #[test]
    fn test_easy_subtraction_never_borrows() {
        let mut rng = StdRng::seed_from_u64(9);
        for profile in [RangeProfile::Race, RangeProfile::Homework] {
            for _ in 0..1000 {
                let q = generate(Operation::Subtraction, Difficulty::Easy, profile, &mut rng);
                assert!(!requires_borrow(q.num1, q.num2), "{:?}", q);
            }
        }
    }

    #[test]
    fn test_no_borrow_subtrahend_covers_all_candidates() {
        let mut rng = StdRng::seed_from_u64(4);
        let seen: HashSet<u32> = (0..2000)
            .map(|_| no_borrow_subtrahend(21, &mut rng))
            .collect();
        // 21 的合法减数：0,1,10,11,20（不含 21 本身）
        let expected: HashSet<u32> = [0, 1, 10, 11, 20].into_iter().collect();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_requires_borrow() {
        assert!(requires_borrow(42, 17));
        assert!(!requires_borrow(47, 12));
        assert!(!requires_borrow(5, 0));
    }
}
