//! Streak service - consecutive-period tier records

use tracing::{info, instrument};

use tally_core::{Snowflake, StreakRecord, Tier};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Streak service
pub struct StreakService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> StreakService<'a> {
    /// Create a new StreakService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Current streak record, defaulting to (none, 0)
    #[instrument(skip(self))]
    pub async fn get(&self, server_id: Snowflake, user_id: Snowflake) -> ServiceResult<StreakRecord> {
        Ok(self.ctx.streak_repo().get(server_id, user_id).await?)
    }

    /// Streak-or-reset advance; returns the new consecutive count
    #[instrument(skip(self))]
    pub async fn advance(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        tier: Tier,
    ) -> ServiceResult<i32> {
        Ok(self.ctx.streak_repo().advance(server_id, user_id, tier).await?)
    }

    /// Zero every streak in the server (admin command); returns rows affected
    #[instrument(skip(self))]
    pub async fn reset_all(&self, server_id: Snowflake) -> ServiceResult<u64> {
        let affected = self.ctx.streak_repo().reset_all(server_id).await?;
        info!(server_id = %server_id, affected, "All streaks reset");
        Ok(affected)
    }
}
