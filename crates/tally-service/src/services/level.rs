//! Level service - the leveling mini-feature
//!
//! XP comes straight from lifetime message totals (5 XP per message); level
//! thresholds follow a power curve tuned so that roughly four years of very
//! active chatting lands at level 100.

use tokio::task;
use tracing::instrument;

use tally_core::{LevelCard, Snowflake};

use crate::dto::LevelResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// XP granted per counted message
pub const XP_PER_MESSAGE: i64 = 5;
const CURVE_BASE: f64 = 40.0;
const CURVE_EXPONENT: f64 = 2.5;

/// Total XP required to reach a level
pub fn xp_for_level(level: u32) -> i64 {
    (CURVE_BASE * f64::from(level).powf(CURVE_EXPONENT)).round() as i64
}

/// Level reached with a given XP total.
///
/// The epsilon keeps exact thresholds from flipping a level down when powf
/// lands a hair under the true value.
pub fn level_from_xp(xp: i64) -> u32 {
    if xp <= 0 {
        return 0;
    }
    ((xp as f64 / CURVE_BASE).powf(1.0 / CURVE_EXPONENT) + 1e-9).floor() as u32
}

/// Level service
pub struct LevelService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> LevelService<'a> {
    /// Create a new LevelService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Leveling summary for one member
    #[instrument(skip(self))]
    pub async fn level_info(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<LevelResponse> {
        let total_messages = self
            .ctx
            .activity_repo()
            .counter_for(server_id, user_id)
            .await?
            .map(|counter| counter.total)
            .unwrap_or(0);
        let xp = total_messages * XP_PER_MESSAGE;
        let level = level_from_xp(xp);

        let xp_for_current = xp_for_level(level);
        let xp_for_next = xp_for_level(level + 1);
        let xp_into_level = xp - xp_for_current;
        let xp_needed = xp_for_next - xp_for_current;
        let progress = if xp_needed > 0 {
            (xp_into_level as f32 / xp_needed as f32).clamp(0.0, 1.0)
        } else {
            0.0
        };
        let messages_to_next_level = (xp_for_next - xp + XP_PER_MESSAGE - 1) / XP_PER_MESSAGE;

        Ok(LevelResponse {
            user_id,
            level,
            xp,
            total_messages,
            xp_into_level,
            xp_needed,
            progress,
            messages_to_next_level: messages_to_next_level.max(0),
            card_png: None,
        })
    }

    /// Leveling summary plus the rendered level card
    #[instrument(skip(self))]
    pub async fn level_card(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<LevelResponse> {
        let info = self.level_info(server_id, user_id).await?;

        let member = self.ctx.membership().fetch_member(server_id, user_id).await?;
        let display_name = member
            .as_ref()
            .map(|m| m.display_name.clone())
            .unwrap_or_else(|| user_id.to_string());
        let avatar = match member.as_ref().and_then(|m| m.avatar_url.as_deref()) {
            Some(url) => self.ctx.membership().fetch_avatar(url).await.unwrap_or(None),
            None => None,
        };

        let card = LevelCard {
            display_name,
            level: info.level,
            xp: info.xp,
            xp_into_level: info.xp_into_level,
            xp_needed: info.xp_needed,
            progress: info.progress,
            total_messages: info.total_messages,
            avatar,
        };

        let renderer = self.ctx.renderer();
        let bytes = task::spawn_blocking(move || renderer.render_level(&card))
            .await
            .map_err(|e| ServiceError::internal(format!("render task failed: {e}")))??;

        Ok(info.with_card(&bytes))
    }
}
