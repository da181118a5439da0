//! Tier - the two role categories awarded by aggregation
//!
//! Rank 1 earns the "first" tier, ranks 2-6 earn the "other" tier. A streak
//! record that has never been awarded carries `Tier::None`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Role tier awarded to a ranked user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Rank 1 (the single top chatter)
    First,
    /// Ranks 2-6
    Other,
    /// No tier held
    #[default]
    None,
}

impl Tier {
    /// The tier awarded to a zero-based rank within the top 6
    #[inline]
    pub const fn for_rank(rank: usize) -> Self {
        if rank == 0 {
            Self::First
        } else {
            Self::Other
        }
    }

    /// Storage representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::First => "first",
            Self::Other => "other",
            Self::None => "none",
        }
    }

    /// Parse the storage representation; unknown strings map to `None`
    pub fn parse(s: &str) -> Self {
        match s {
            "first" => Self::First,
            "other" => Self::Other,
            _ => Self::None,
        }
    }

    /// Whether this tier is an actual award (not `None`)
    #[inline]
    pub const fn is_awarded(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
