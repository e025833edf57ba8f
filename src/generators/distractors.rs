//! 干扰项生成
//!
//! 在正确答案附近按偏移区间取值，去掉正确答案本身和非正数，
//! 再从候选中不放回地抽 3 个。这与"随机偏移 + 拒绝重复"的做法
//! 分布一致，但不会在候选不足时空转。

use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// 每道题的干扰项数量
pub const DISTRACTOR_COUNT: usize = 3;

/// 生成干扰项
///
/// # 参数
/// - `correct`: 正确答案
/// - `band`: 偏移区间（含两端）
/// - `rng`: 随机源
///
/// # 返回
/// 3 个互不相同、均为正数且不等于正确答案的值。候选不足 3 个时
/// 会对称地放宽区间直到足够。
pub fn generate_distractors<R: Rng + ?Sized>(
    correct: u32,
    band: RangeInclusive<i64>,
    rng: &mut R,
) -> Vec<u32> {
    let (mut low, mut high) = (*band.start(), *band.end());
    loop {
        let pool = candidate_pool(correct, low, high);
        if pool.len() >= DISTRACTOR_COUNT {
            return pool
                .choose_multiple(rng, DISTRACTOR_COUNT)
                .copied()
                .collect();
        }
        low -= 1;
        high += 1;
    }
}

fn candidate_pool(correct: u32, low: i64, high: i64) -> Vec<u32> {
    (low..=high)
        .filter(|&offset| offset != 0)
        .map(|offset| i64::from(correct) + offset)
        .filter(|&value| value > 0)
        .filter_map(|value| u32::try_from(value).ok())
        .collect()
}

/// 把正确答案和干扰项合并后打乱（Fisher-Yates）
pub fn shuffle_options<R: Rng + ?Sized>(correct: u32, distractors: &[u32], rng: &mut R) -> [u32; 4] {
    let mut options = [correct, 0, 0, 0];
    for (slot, value) in options[1..].iter_mut().zip(distractors) {
        *slot = *value;
    }
    options.shuffle(rng);
    options
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_distractors_are_distinct_positive_and_wrong() {
        let mut rng = StdRng::seed_from_u64(7);
        for correct in 1..200u32 {
            let distractors = generate_distractors(correct, -10..=9, &mut rng);
            let unique: HashSet<_> = distractors.iter().collect();
            assert_eq!(distractors.len(), DISTRACTOR_COUNT);
            assert_eq!(unique.len(), DISTRACTOR_COUNT);
            assert!(distractors.iter().all(|&d| d > 0 && d != correct));
            assert!(distractors
                .iter()
                .all(|&d| (i64::from(d) - i64::from(correct)).abs() <= 10));
        }
    }

    #[test]
    fn test_narrow_band_with_small_answer_still_terminates() {
        let mut rng = StdRng::seed_from_u64(11);
        // 偏移 -3..=2 且答案为 1 时只有 2 个候选，区间会被放宽
        let distractors = generate_distractors(1, -3..=2, &mut rng);
        assert_eq!(distractors.len(), DISTRACTOR_COUNT);
        assert!(distractors.iter().all(|&d| d > 1));
    }

    #[test]
    fn test_answer_two_with_narrow_band_uses_exact_pool() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut distractors = generate_distractors(2, -3..=2, &mut rng);
        distractors.sort_unstable();
        assert_eq!(distractors, vec![1, 3, 4]);
    }

    #[test]
    fn test_shuffle_keeps_every_option() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut options = shuffle_options(12, &[10, 14, 15], &mut rng);
        options.sort_unstable();
        assert_eq!(options, [10, 12, 14, 15]);
    }
}
