//! Collectible Categories and Score
//!
//! Each category has a fixed point value. The score keeps the running total
//! plus one counter per category.

use std::fmt;
use serde::{Serialize, Deserialize};

/// Category of a collectible dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Category {
    /// 5 points
    Orange = 0,
    /// 4 points
    Red = 1,
    /// 3 points
    Purple = 2,
    /// 2 points
    Green = 3,
    /// 1 point
    Blue = 4,
}

impl Category {
    /// All categories, in draw order.
    pub const ALL: [Category; 5] = [
        Category::Orange,
        Category::Red,
        Category::Purple,
        Category::Green,
        Category::Blue,
    ];

    /// Points awarded when a collectible of this category is consumed.
    pub fn point_value(self) -> u32 {
        match self {
            Category::Orange => 5,
            Category::Red => 4,
            Category::Purple => 3,
            Category::Green => 2,
            Category::Blue => 1,
        }
    }

    /// Lowercase name, as used in asset paths and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Orange => "orange",
            Category::Red => "red",
            Category::Purple => "purple",
            Category::Green => "green",
            Category::Blue => "blue",
        }
    }

    /// Get from index (0-4).
    pub fn from_index(index: u8) -> Option<Self> {
        Self::ALL.get(index as usize).copied()
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Session score.
///
/// Handed out by value, so holders of a snapshot cannot reach engine state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    /// Sum of point values of all consumed collectibles
    pub total: u32,
    /// Orange dots consumed
    pub orange: u32,
    /// Red dots consumed
    pub red: u32,
    /// Purple dots consumed
    pub purple: u32,
    /// Green dots consumed
    pub green: u32,
    /// Blue dots consumed
    pub blue: u32,
}

impl Score {
    /// Account for one consumed collectible. Returns the points awarded.
    pub fn record(&mut self, category: Category) -> u32 {
        let points = category.point_value();
        self.total = self.total.saturating_add(points);
        let counter = self.counter_mut(category);
        *counter = counter.saturating_add(1);
        points
    }

    /// Number of consumed collectibles of a category.
    pub fn count(&self, category: Category) -> u32 {
        match category {
            Category::Orange => self.orange,
            Category::Red => self.red,
            Category::Purple => self.purple,
            Category::Green => self.green,
            Category::Blue => self.blue,
        }
    }

    /// Total number of consumed collectibles.
    pub fn consumed(&self) -> u32 {
        Category::ALL.iter().map(|c| self.count(*c)).sum()
    }

    fn counter_mut(&mut self, category: Category) -> &mut u32 {
        match category {
            Category::Orange => &mut self.orange,
            Category::Red => &mut self.red,
            Category::Purple => &mut self.purple,
            Category::Green => &mut self.green,
            Category::Blue => &mut self.blue,
        }
    }
}
