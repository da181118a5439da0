//! Card renderer port - structured ranking data in, PNG bytes out
//!
//! Rendering is a pure function of its inputs apart from intentionally
//! randomized decorative elements, which are cosmetic only and never a
//! correctness property.

use crate::traits::repositories::RepoResult;
use crate::value_objects::{AggregationWindow, RoleColor, Snowflake, Tier};

/// One ranked user on the leaderboard card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingCardEntry {
    /// Zero-based rank
    pub rank: u32,
    pub user_id: Snowflake,
    pub display_name: String,
    pub count: i64,
    pub tier: Tier,
    /// Consecutive periods at this tier, shown as "(N in a row)" past 1
    pub streak: i32,
    /// Raw avatar image bytes, when the member has one
    pub avatar: Option<Vec<u8>>,
}

/// Everything the ranking card needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RankingCard {
    pub server_name: String,
    pub window: AggregationWindow,
    pub entries: Vec<RankingCardEntry>,
    pub first_role_name: String,
    pub first_role_color: RoleColor,
    pub other_role_name: String,
    pub other_role_color: RoleColor,
}

/// Everything the level card needs
#[derive(Debug, Clone, PartialEq)]
pub struct LevelCard {
    pub display_name: String,
    pub level: u32,
    pub xp: i64,
    pub xp_into_level: i64,
    pub xp_needed: i64,
    /// 0.0 ..= 1.0 progress toward the next level
    pub progress: f32,
    pub total_messages: i64,
    pub avatar: Option<Vec<u8>>,
}

/// Everything the fortune card needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FortuneCard {
    pub display_name: String,
    /// e.g. "No. 42 — Great Blessing"
    pub title: String,
    pub message: String,
}

pub trait CardRenderer: Send + Sync {
    /// Render the top-6 ranking card
    fn render_ranking(&self, card: &RankingCard) -> RepoResult<Vec<u8>>;

    /// Render a member's level card
    fn render_level(&self, card: &LevelCard) -> RepoResult<Vec<u8>>;

    /// Render a fortune-draw card
    fn render_fortune(&self, card: &FortuneCard) -> RepoResult<Vec<u8>>;
}
