//! 本地题目生成器
//!
//! 所有生成器都是纯函数，随机源由调用方注入，测试时使用固定种子。

pub mod area;
pub mod arithmetic;
pub mod distractors;
pub mod profile;
pub mod spelling;

pub use profile::RangeProfile;
pub use spelling::WordBank;
