//! Leaderboard service - paged views over the live counters
//!
//! Reads only; the ranking source is the live ActivityCounter snapshot, so
//! the board reflects activity since the last aggregation reset.

use tracing::instrument;

use tally_core::{Snowflake, UserCount};

use crate::dto::{LeaderboardEntryResponse, LeaderboardResponse};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Rows shown per page
pub const PAGE_SIZE: usize = 10;

/// Leaderboard service
pub struct LeaderboardService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LeaderboardService<'a> {
    /// Create a new LeaderboardService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// One page of the live leaderboard (one-based `page`). When `viewer`
    /// is given and lands off-page, their row is attached separately.
    #[instrument(skip(self))]
    pub async fn page(
        &self,
        server_id: Snowflake,
        page: u32,
        viewer: Option<Snowflake>,
    ) -> ServiceResult<LeaderboardResponse> {
        let mut counts = self.ctx.activity_repo().current_counts(server_id).await?;
        counts.sort_by(|a, b| b.count.cmp(&a.count));

        let total_users = counts.len() as u64;
        let total_pages = (counts.len().max(1)).div_ceil(PAGE_SIZE) as u32;
        let page = page.clamp(1, total_pages);

        let start = (page as usize - 1) * PAGE_SIZE;
        let entries: Vec<LeaderboardEntryResponse> = counts
            .iter()
            .enumerate()
            .skip(start)
            .take(PAGE_SIZE)
            .map(|(index, uc)| entry_at(index, uc))
            .collect();

        let viewer = viewer.and_then(|user_id| {
            let on_page = entries.iter().any(|e| e.user_id == user_id);
            if on_page {
                return None;
            }
            counts
                .iter()
                .enumerate()
                .find(|(_, uc)| uc.user_id == user_id)
                .map(|(index, uc)| entry_at(index, uc))
        });

        Ok(LeaderboardResponse {
            page,
            total_pages,
            total_users,
            entries,
            viewer,
        })
    }
}

fn entry_at(index: usize, uc: &UserCount) -> LeaderboardEntryResponse {
    LeaderboardEntryResponse {
        rank: index as u32 + 1,
        user_id: uc.user_id,
        count: uc.count,
    }
}
