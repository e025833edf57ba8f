//! 拼写测试词库
//!
//! 按单词长度分为三档：3-5 个字母为简单，6-8 为中等，9 个及以上为困难。
//! 内置词库只在第一次使用时分档一次。

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;

use crate::error::{AppError, AppResult};
use crate::models::payloads::SpellingWord;
use crate::models::Difficulty;

/// 内置词库
const BUILTIN_WORDS: &[&str] = &[
    // 3-5
    "cat", "dog", "sun", "tree", "book", "milk", "frog", "jump", "rain", "star",
    "apple", "bread", "chair", "cloud", "dance", "eagle", "fruit", "grape", "house", "juice",
    "lemon", "mouse", "night", "ocean", "piano", "queen", "river", "snake", "tiger", "water",
    // 6-8
    "animal", "basket", "candle", "dragon", "finger", "garden", "island", "jungle", "kitten", "ladder",
    "market", "napkin", "orange", "pencil", "rabbit", "saddle", "turtle", "window", "balloon", "blanket",
    "chicken", "dolphin", "feather", "giraffe", "harvest", "journey", "kitchen", "lantern", "monster", "penguin",
    "airplane", "birthday", "calendar", "dinosaur", "elephant", "firework", "handsome", "mountain", "notebook", "umbrella",
    // 9+
    "adventure", "beautiful", "carpenter", "dangerous", "education", "fantastic", "geography", "happiness",
    "invisible", "important", "knowledge", "lightning", "magnifier", "neighbour", "orchestra", "paragraph",
    "quicksand", "recognize", "scientist", "telescope", "vegetable", "wonderful", "yesterday", "microscope",
    "playground", "strawberry", "thunderstorm", "understand", "basketball", "chocolate", "restaurant",
];

static BUILTIN_BANK: Lazy<WordBank> = Lazy::new(|| WordBank::from_words(BUILTIN_WORDS.iter().copied()));

/// 根据长度判断难度
pub fn classify(word: &str) -> Difficulty {
    match word.chars().count() {
        0..=5 => Difficulty::Easy,
        6..=8 => Difficulty::Medium,
        _ => Difficulty::Hard,
    }
}

/// 分档后的词库
#[derive(Debug, Clone, Default)]
pub struct WordBank {
    easy: Vec<String>,
    medium: Vec<String>,
    hard: Vec<String>,
}

impl WordBank {
    /// 内置词库（全局只分档一次）
    pub fn builtin() -> &'static WordBank {
        &BUILTIN_BANK
    }

    /// 从任意单词序列构建，少于 3 个字母或含非字母的词被丢弃
    pub fn from_words<'a>(words: impl IntoIterator<Item = &'a str>) -> Self {
        let mut bank = WordBank::default();
        for raw in words {
            let word = raw.trim().to_ascii_lowercase();
            if word.len() < 3 || !word.chars().all(|c| c.is_ascii_alphabetic()) {
                continue;
            }
            match classify(&word) {
                Difficulty::Easy => bank.easy.push(word),
                Difficulty::Medium => bank.medium.push(word),
                Difficulty::Hard => bank.hard.push(word),
            }
        }
        bank
    }

    /// 从文件加载，每行一个单词
    ///
    /// # 返回
    /// 任一档为空时返回配置错误，避免运行时抽不到词
    pub fn from_file(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AppError::config_invalid(format!(
                "无法读取词库文件 {}: {}",
                path.display(),
                e
            ))
        })?;
        let bank = Self::from_words(content.lines());
        if bank.easy.is_empty() || bank.medium.is_empty() || bank.hard.is_empty() {
            return Err(AppError::config_invalid(format!(
                "词库文件 {} 必须包含三个难度的单词",
                path.display()
            )));
        }
        Ok(bank)
    }

    fn bucket(&self, difficulty: Difficulty) -> &[String] {
        match difficulty {
            Difficulty::Easy => &self.easy,
            Difficulty::Medium => &self.medium,
            Difficulty::Hard => &self.hard,
        }
    }

    /// 各档单词数量 (easy, medium, hard)
    pub fn sizes(&self) -> (usize, usize, usize) {
        (self.easy.len(), self.medium.len(), self.hard.len())
    }

    /// 抽一个单词
    ///
    /// # 参数
    /// - `requested`: 指定难度；`None` 表示混合，三档等概率
    /// - `rng`: 随机源
    pub fn pick<R: Rng + ?Sized>(&self, requested: Option<Difficulty>, rng: &mut R) -> SpellingWord {
        let difficulty = requested.unwrap_or_else(|| {
            *Difficulty::ALL
                .choose(rng)
                .unwrap_or(&Difficulty::Medium)
        });

        // 自定义词库在加载时保证三档非空；这里兜底回到内置词库
        let word = self
            .bucket(difficulty)
            .choose(rng)
            .or_else(|| BUILTIN_BANK.bucket(difficulty).choose(rng))
            .cloned()
            .unwrap_or_default();

        SpellingWord { word, difficulty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_classify_boundaries() {
        assert_eq!(classify("cat"), Difficulty::Easy);
        assert_eq!(classify("apple"), Difficulty::Easy);
        assert_eq!(classify("animal"), Difficulty::Medium);
        assert_eq!(classify("elephant"), Difficulty::Medium);
        assert_eq!(classify("adventure"), Difficulty::Hard);
    }

    #[test]
    fn test_builtin_buckets_are_non_empty() {
        let (easy, medium, hard) = WordBank::builtin().sizes();
        assert!(easy > 0 && medium > 0 && hard > 0);
    }

    #[test]
    fn test_pick_respects_requested_difficulty() {
        let mut rng = StdRng::seed_from_u64(8);
        for difficulty in Difficulty::ALL {
            for _ in 0..50 {
                let picked = WordBank::builtin().pick(Some(difficulty), &mut rng);
                assert_eq!(picked.difficulty, difficulty);
                assert_eq!(classify(&picked.word), difficulty);
            }
        }
    }

    #[test]
    fn test_mixed_pick_covers_all_tiers() {
        let mut rng = StdRng::seed_from_u64(12);
        let mut seen = Vec::new();
        for _ in 0..100 {
            let picked = WordBank::builtin().pick(None, &mut rng);
            if !seen.contains(&picked.difficulty) {
                seen.push(picked.difficulty);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_from_words_filters_junk() {
        let bank = WordBank::from_words(["  Cat ", "ab", "don't", "rabbit", "telescope"]);
        assert_eq!(bank.sizes(), (1, 1, 1));
    }
}
