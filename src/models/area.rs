use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::Difficulty;

/// 长度单位
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Cm,
    Feet,
    Inches,
    Meters,
}

impl LengthUnit {
    /// 简写标签（用于题干）
    pub fn label(self) -> &'static str {
        match self {
            LengthUnit::Cm => "cm",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
            LengthUnit::Meters => "m",
        }
    }

    /// 完整名称
    pub fn full_name(self) -> &'static str {
        match self {
            LengthUnit::Cm => "centimeters",
            LengthUnit::Feet => "feet",
            LengthUnit::Inches => "inches",
            LengthUnit::Meters => "meters",
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cm" | "centimeters" => Ok(LengthUnit::Cm),
            "feet" | "ft" => Ok(LengthUnit::Feet),
            "inches" | "in" => Ok(LengthUnit::Inches),
            "meters" | "m" => Ok(LengthUnit::Meters),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// 组合图形中的一个正方形，坐标以单位格计
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSquare {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl PlacedSquare {
    pub fn area(&self) -> u32 {
        self.size * self.size
    }

    /// 两个正方形是否有重叠的单位格
    pub fn overlaps(&self, other: &PlacedSquare) -> bool {
        self.x < other.x + other.size
            && other.x < self.x + self.size
            && self.y < other.y + other.size
            && other.y < self.y + self.size
    }
}

/// 图形排布
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "arrangement", rename_all = "lowercase")]
pub enum Arrangement {
    /// 单个正方形
    Single { size: u32 },
    /// 若干行列的大正方形，每个大正方形由 square_size² 个小格组成
    Grid {
        rows: u32,
        cols: u32,
        square_size: u32,
    },
    /// L 形或不规则组合
    #[serde(rename = "custom")]
    Composite { squares: Vec<PlacedSquare> },
}

impl Arrangement {
    /// 单位格总数
    pub fn unit_area(&self) -> u32 {
        match self {
            Arrangement::Single { size } => size * size,
            Arrangement::Grid {
                rows,
                cols,
                square_size,
            } => rows * cols * square_size * square_size,
            Arrangement::Composite { squares } => squares.iter().map(PlacedSquare::area).sum(),
        }
    }
}

/// 数格子求面积题
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AreaQuestion {
    #[serde(flatten)]
    pub arrangement: Arrangement,
    pub difficulty: Difficulty,
    pub unit: LengthUnit,
    pub correct_answer: u32,
    pub description: String,
}
