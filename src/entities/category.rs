// 🏷️ Category - fixed classification for the expense breakdown
//
// The set is closed: every aggregation iterates Category::ALL so each label
// appears in every breakdown, even with a zero sum. Colours are static
// display configuration and are not user-editable.

use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Sentinel used by filter forms to mean "no category restriction".
pub const ALL_CATEGORIES_LABEL: &str = "All";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Allowance,
    Food,
    Transport,
    Bills,
    Others,
}

impl Category {
    /// Every recognized category, in display order.
    pub const ALL: [Category; 5] = [
        Category::Allowance,
        Category::Food,
        Category::Transport,
        Category::Bills,
        Category::Others,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Allowance => "Allowance",
            Category::Food => "Food",
            Category::Transport => "Transport",
            Category::Bills => "Bills",
            Category::Others => "Others",
        }
    }

    /// Hex colour used for this category's bar.
    pub fn color_hex(&self) -> &'static str {
        match self {
            Category::Allowance => "#3DBE9F",
            Category::Food => "#7FD1B9",
            Category::Transport => "#A6E3D0",
            Category::Bills => "#9DE5F6",
            Category::Others => "#B2F7EF",
        }
    }

    /// Same colour as `color_hex`, split into channels for terminal backends.
    pub fn rgb(&self) -> (u8, u8, u8) {
        hex_to_rgb(self.color_hex())
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Category::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ValidationError::UnknownCategory(s.to_string()))
    }
}

/// Parses `#RRGGBB`. Malformed channels fall back to 0.
pub(crate) fn hex_to_rgb(hex: &str) -> (u8, u8, u8) {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|c| u8::from_str_radix(c, 16).ok())
            .unwrap_or(0)
    };
    (channel(0..2), channel(2..4), channel(4..6))
}
