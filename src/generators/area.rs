//! 数格子求面积题生成器

use rand::Rng;

use crate::models::{Arrangement, AreaQuestion, Difficulty, LengthUnit, PlacedSquare};

/// 单个正方形的概率
const SINGLE_THRESHOLD: f64 = 0.4;
/// 单个 + 网格的累计概率，剩下的是组合图形
const GRID_THRESHOLD: f64 = 0.8;

/// 生成一道面积题
///
/// # 参数
/// - `difficulty`: 难度
/// - `unit`: 题干中使用的长度单位
/// - `rng`: 随机源
pub fn generate<R: Rng + ?Sized>(
    difficulty: Difficulty,
    unit: LengthUnit,
    rng: &mut R,
) -> AreaQuestion {
    let roll: f64 = rng.gen();
    let arrangement = if roll < SINGLE_THRESHOLD {
        single(difficulty, rng)
    } else if roll < GRID_THRESHOLD {
        grid(difficulty, rng)
    } else {
        composite(difficulty, rng)
    };

    let description = describe(&arrangement, difficulty, unit);
    AreaQuestion {
        correct_answer: arrangement.unit_area(),
        arrangement,
        difficulty,
        unit,
        description,
    }
}

fn single<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Arrangement {
    let size = match difficulty {
        Difficulty::Easy => rng.gen_range(2..=5),
        Difficulty::Medium => rng.gen_range(6..=10),
        Difficulty::Hard => rng.gen_range(11..=15),
    };
    Arrangement::Single { size }
}

fn grid<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Arrangement {
    let (rows, cols, square_size) = match difficulty {
        Difficulty::Easy => (rng.gen_range(2..=3), rng.gen_range(2..=3), 2),
        Difficulty::Medium => (
            rng.gen_range(2..=3),
            rng.gen_range(3..=4),
            rng.gen_range(2..=3),
        ),
        Difficulty::Hard => (
            rng.gen_range(3..=4),
            rng.gen_range(3..=4),
            rng.gen_range(3..=4),
        ),
    };
    Arrangement::Grid {
        rows,
        cols,
        square_size,
    }
}

fn composite<R: Rng + ?Sized>(difficulty: Difficulty, rng: &mut R) -> Arrangement {
    let squares = match difficulty {
        // L 形
        Difficulty::Easy => {
            let base = rng.gen_range(3..=4);
            vec![
                PlacedSquare { x: 0, y: 0, size: base },
                PlacedSquare { x: base, y: 0, size: base - 1 },
            ]
        }
        Difficulty::Medium => {
            let base = rng.gen_range(4..=5);
            vec![
                PlacedSquare { x: 0, y: 0, size: base },
                PlacedSquare { x: base, y: 0, size: base - 1 },
                PlacedSquare { x: 0, y: base, size: base - 2 },
            ]
        }
        Difficulty::Hard => {
            let s1 = rng.gen_range(4..=5);
            let s2 = rng.gen_range(3..=4);
            let s3 = rng.gen_range(2..=3);
            vec![
                PlacedSquare { x: 0, y: 0, size: s1 },
                PlacedSquare { x: s1, y: 0, size: s2 },
                PlacedSquare { x: 0, y: s1, size: s3 },
                PlacedSquare { x: s3, y: s1, size: s2 },
            ]
        }
    };
    Arrangement::Composite { squares }
}

fn describe(arrangement: &Arrangement, difficulty: Difficulty, unit: LengthUnit) -> String {
    let label = unit.label();
    match arrangement {
        Arrangement::Single { size } => format!(
            "Count all the small squares. This is a {size} {label} by {size} {label} square."
        ),
        Arrangement::Grid {
            rows,
            cols,
            square_size,
        } => format!(
            "Count all the small squares. There are {rows} rows and {cols} columns of larger squares, \
             and each larger square is {square_size} {label} by {square_size} {label} ({} small squares).",
            square_size * square_size
        ),
        Arrangement::Composite { .. } => {
            let shape = match difficulty {
                Difficulty::Easy => "this L-shaped arrangement",
                Difficulty::Medium => "this shape",
                Difficulty::Hard => "this complex shape",
            };
            format!(
                "Count all the small squares in {shape}. Each small square is 1 {label} by 1 {label}."
            )
        }
    }
}
