//! Activity service - the hot message-ingest path and log retention
//!
//! Ingest is gated: bot authors never count, unauthorized servers are
//! ignored outright, and authors holding an excluded role are skipped. The
//! ranking-time exclusion filter applies independently, so a role excluded
//! after some messages were counted still drops its holders from the
//! ranking.

use chrono::{Duration, Utc};
use tracing::{debug, info, instrument};

use crate::dto::MessageEventRequest;

use super::auth::AuthService;
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::registry::RegistryService;

/// Activity service
pub struct ActivityService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ActivityService<'a> {
    /// Create a new ActivityService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Handle one message-created event. Returns whether it was counted.
    #[instrument(skip(self, event), fields(server_id = %event.server_id, user_id = %event.user_id))]
    pub async fn record_message(&self, event: &MessageEventRequest) -> ServiceResult<bool> {
        if event.author_is_bot {
            return Ok(false);
        }

        // Locked servers produce no data at all
        let auth = AuthService::new(self.ctx);
        if !auth.is_authorized(event.server_id).await? {
            debug!("message from unauthorized server ignored");
            return Ok(false);
        }

        // Excluded authors are not counted
        let registry = RegistryService::new(self.ctx);
        if registry
            .is_excluded(event.server_id, &event.author_role_ids)
            .await?
        {
            debug!("message from excluded author ignored");
            return Ok(false);
        }

        self.ctx
            .activity_repo()
            .record_message(&event.to_record())
            .await?;
        Ok(true)
    }

    /// Delete message-log rows older than the retention horizon
    #[instrument(skip(self))]
    pub async fn prune_old_messages(&self, horizon_days: u32) -> ServiceResult<u64> {
        let cutoff = Utc::now() - Duration::days(i64::from(horizon_days));
        let removed = self.ctx.activity_repo().prune_older_than(cutoff).await?;
        if removed > 0 {
            info!(removed, horizon_days, "Pruned old message records");
        }
        Ok(removed)
    }
}
