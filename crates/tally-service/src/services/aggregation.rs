//! Aggregation & Ranking Engine
//!
//! Converts a time-windowed activity count into a deterministic top-6
//! ranking, reassigns the two tier roles, updates streaks, renders the
//! ranking card, and records a history snapshot. The step order is fixed:
//!
//! Validating -> Counting -> Filtering -> Ranking -> RevokingRoles ->
//! GrantingRoles -> Rendering -> WritingHistory -> Resetting -> Done
//!
//! There is no distributed rollback: role mutations already applied stay in
//! place when a later step fails. The one protected property is that the
//! live counters are wiped only after everything else (including the card
//! render) succeeded, so a failed run can be retried without losing a
//! period's worth of counted activity.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::{info, instrument, warn};

use tally_core::{
    AggregationHistory, AggregationWindow, DomainError, MemberProfile, RankingCard,
    RankingCardEntry, RoleConfig, RoleProfile, Snowflake, Tier, UserCount, WindowSpec,
};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::registry::RegistryService;

/// Fixed ranking cutoff: one "first" plus up to five "other"
pub const TOP_N: usize = 6;

/// Where an aggregation run takes its counts from.
///
/// The windowed message log is the canonical source for explicit-dates runs;
/// the live counters serve the quick "since last reset" command. The two are
/// separate, non-interchangeable modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSource {
    /// Scan the message log over a (possibly sentinel-bounded) window
    MessageLog(WindowSpec),
    /// Snapshot the live counters as they stand
    LiveCounters,
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct AggregationOutcome {
    pub history: AggregationHistory,
    /// Rendered ranking card (PNG bytes)
    pub card_png: Vec<u8>,
    /// Members skipped over per-member role-mutation failures
    pub skipped_members: u32,
}

impl AggregationOutcome {
    /// True when role updates were partially skipped; the run still counts
    /// as successful but is surfaced to the administrator as "completed
    /// with warnings"
    pub fn completed_with_warnings(&self) -> bool {
        self.skipped_members > 0
    }
}

/// Aggregation service
pub struct AggregationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AggregationService<'a> {
    /// Create a new AggregationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Run one aggregation cycle for a server.
    ///
    /// The run executes on its own task: once role state starts mutating,
    /// cancellation of the triggering request can no longer sever the
    /// history-write/counter-reset tail.
    #[instrument(skip(self))]
    pub async fn run_aggregation(
        &self,
        server_id: Snowflake,
        source: CountSource,
    ) -> ServiceResult<AggregationOutcome> {
        let ctx = self.ctx.clone();
        let handle = tokio::spawn(async move { run_detached(ctx, server_id, source).await });
        handle
            .await
            .map_err(|e| ServiceError::internal(format!("aggregation task failed: {e}")))?
    }
}

async fn run_detached(
    ctx: ServiceContext,
    server_id: Snowflake,
    source: CountSource,
) -> ServiceResult<AggregationOutcome> {
    // At most one in-flight run per server; later triggers queue here.
    let lock = ctx.aggregation_locks().for_server(server_id);
    let _guard = lock.lock().await;

    let run = Run {
        ctx: &ctx,
        server_id,
    };
    run.execute(source).await
}

struct Run<'a> {
    ctx: &'a ServiceContext,
    server_id: Snowflake,
}

/// Everything gathered by the read-only phase (steps 1-5)
struct RankingPlan {
    config: RoleConfig,
    first_role: RoleProfile,
    other_role: RoleProfile,
    window: AggregationWindow,
    ranking: Vec<UserCount>,
    members: Vec<MemberProfile>,
}

impl Run<'_> {
    async fn execute(&self, source: CountSource) -> ServiceResult<AggregationOutcome> {
        let plan = self.prepare(source).await?;
        self.apply(plan).await
    }

    /// Steps 1-5: preconditions, window resolution, counting, exclusion
    /// filtering, ranking. Entirely read-only; any failure here aborts with
    /// no side effects.
    async fn prepare(&self, source: CountSource) -> ServiceResult<RankingPlan> {
        // Step 1: configuration and live role resolution
        let registry = RegistryService::new(self.ctx);
        let config = registry
            .get_role_config(self.server_id)
            .await?
            .ok_or(DomainError::ConfigurationMissing(self.server_id))?;

        let first_role = self
            .ctx
            .membership()
            .fetch_role(self.server_id, config.first_role_id)
            .await?
            .ok_or(DomainError::RoleNotFound(config.first_role_id))?;
        let other_role = self
            .ctx
            .membership()
            .fetch_role(self.server_id, config.other_role_id)
            .await?
            .ok_or(DomainError::RoleNotFound(config.other_role_id))?;

        // Steps 2-3: window resolution and count retrieval
        let now = Utc::now();
        let last_aggregated_at = self
            .ctx
            .history_repo()
            .latest(self.server_id)
            .await?
            .map(|h| h.aggregated_at);

        let (window, counts) = match source {
            CountSource::MessageLog(spec) => {
                let window = spec.resolve(now, self.ctx.day_offset(), last_aggregated_at)?;
                let counts = self
                    .ctx
                    .activity_repo()
                    .count_in_window(self.server_id, &window)
                    .await?;
                (window, counts)
            }
            CountSource::LiveCounters => {
                // Live counters count "since last reset": stamp the window
                // from the previous aggregation (epoch when none).
                let start = last_aggregated_at.unwrap_or(DateTime::<Utc>::UNIX_EPOCH);
                let window = AggregationWindow::new(start, now)?;
                let counts = self.ctx.activity_repo().current_counts(self.server_id).await?;
                (window, counts)
            }
        };

        if counts.is_empty() {
            return Err(DomainError::NoActivity.into());
        }

        // Step 4: exclusion filter against live member role sets. Users who
        // already left the server have no role set to check; they stay in
        // the ranking and fail at grant time instead.
        let members = self.ctx.membership().list_members(self.server_id).await?;
        let exclusions = registry.get_exclusions(self.server_id).await?;
        let excluded_users: HashSet<Snowflake> = members
            .iter()
            .filter(|m| m.has_any_role(&exclusions))
            .map(|m| m.user_id)
            .collect();

        let mut ranking: Vec<UserCount> = counts
            .into_iter()
            .filter(|uc| !excluded_users.contains(&uc.user_id))
            .collect();

        // Step 5: stable sort by count descending. Ties keep the store's
        // encounter order; no secondary key.
        ranking.sort_by(|a, b| b.count.cmp(&a.count));
        ranking.truncate(TOP_N);

        if ranking.is_empty() {
            return Err(DomainError::NoEligibleUsers.into());
        }

        Ok(RankingPlan {
            config,
            first_role,
            other_role,
            window,
            ranking,
            members,
        })
    }

    /// Steps 6-11: the mutating tail. Per-member role failures are logged
    /// and skipped; everything else aborts the run in place (no rollback).
    async fn apply(&self, plan: RankingPlan) -> ServiceResult<AggregationOutcome> {
        let RankingPlan {
            config,
            first_role,
            other_role,
            window,
            ranking,
            members,
        } = plan;

        let top_ids: HashSet<Snowflake> = ranking.iter().map(|uc| uc.user_id).collect();
        let holders: Vec<&MemberProfile> = members
            .iter()
            .filter(|m| config.holds_tier_role(&m.role_ids))
            .collect();
        let mut skipped: u32 = 0;

        // Step 6: demotion streak resets, using pre-revocation holder state
        for member in &holders {
            if !top_ids.contains(&member.user_id) {
                self.ctx
                    .streak_repo()
                    .reset_to_zero(self.server_id, member.user_id)
                    .await?;
                info!(user_id = %member.user_id, "Streak reset (dropped out of top 6)");
            }
        }

        // Step 7: blanket revocation from every current holder, including
        // members about to regain a tier role
        let tier_roles = config.tier_roles();
        for member in &holders {
            match self
                .ctx
                .membership()
                .remove_roles(self.server_id, member.user_id, &tier_roles)
                .await
            {
                Ok(()) => {}
                Err(DomainError::PermissionDenied(reason)) => {
                    warn!(user_id = %member.user_id, %reason, "Role revoke refused, skipping member");
                    skipped += 1;
                }
                Err(DomainError::MemberNotFound) => {
                    warn!(user_id = %member.user_id, "Member left before revoke, skipping");
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Step 8: restore the first-tier role to its remembered color (no-op
        // when no customization was ever recorded). Must precede the grant so
        // the new holder appears in the restored color.
        if let Some(color) = self
            .ctx
            .role_color_repo()
            .original_color(self.server_id, config.first_role_id)
            .await?
        {
            match self
                .ctx
                .membership()
                .edit_role_color(self.server_id, config.first_role_id, color)
                .await
            {
                Ok(()) => info!(role_id = %config.first_role_id, %color, "First-tier color restored"),
                Err(DomainError::PermissionDenied(reason)) => {
                    warn!(role_id = %config.first_role_id, %reason, "Color restore refused");
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Step 9: grants, with the streak advancing only for members the
        // platform actually accepted
        let mut streaks: HashMap<Snowflake, i32> = HashMap::new();
        for (rank, entry) in ranking.iter().enumerate() {
            let tier = Tier::for_rank(rank);
            let role_id = if rank == 0 {
                config.first_role_id
            } else {
                config.other_role_id
            };

            match self
                .ctx
                .membership()
                .add_role(self.server_id, entry.user_id, role_id)
                .await
            {
                Ok(()) => {
                    let streak = self
                        .ctx
                        .streak_repo()
                        .advance(self.server_id, entry.user_id, tier)
                        .await?;
                    streaks.insert(entry.user_id, streak);
                }
                Err(DomainError::MemberNotFound) => {
                    warn!(user_id = %entry.user_id, "Ranked member left before grant, skipping");
                    skipped += 1;
                }
                Err(DomainError::PermissionDenied(reason)) => {
                    warn!(user_id = %entry.user_id, %reason, "Role grant refused, skipping member");
                    skipped += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }

        // Render before any irreversible bookkeeping: a render failure
        // leaves roles mutated but keeps counters and history untouched, so
        // the run is retryable with identical ranking input.
        let card = self
            .build_card(&first_role, &other_role, &window, &ranking, &members, &streaks)
            .await;
        let renderer = self.ctx.renderer();
        let card_png = tokio::task::spawn_blocking(move || renderer.render_ranking(&card))
            .await
            .map_err(|e| ServiceError::internal(format!("render task failed: {e}")))??;

        // Step 10: history reflects the ranking as computed, not the subset
        // that actually received roles
        let pairs: Vec<(Snowflake, i64)> =
            ranking.iter().map(|uc| (uc.user_id, uc.count)).collect();
        let history = AggregationHistory::from_ranking(self.server_id, Utc::now(), window, &pairs);
        self.ctx.history_repo().append(&history).await?;

        // Step 11: wipe the live counters, the one step deferred until full
        // success
        self.ctx.activity_repo().reset(self.server_id).await?;

        info!(
            server_id = %self.server_id,
            ranked = history.ranked.len(),
            skipped,
            "Aggregation completed"
        );

        Ok(AggregationOutcome {
            history,
            card_png,
            skipped_members: skipped,
        })
    }

    /// Assemble the renderer input. Avatar downloads are best-effort
    /// decoration; a failed fetch falls back to the placeholder tile.
    async fn build_card(
        &self,
        first_role: &RoleProfile,
        other_role: &RoleProfile,
        window: &AggregationWindow,
        ranking: &[UserCount],
        members: &[MemberProfile],
        streaks: &HashMap<Snowflake, i32>,
    ) -> RankingCard {
        let member_map: HashMap<Snowflake, &MemberProfile> =
            members.iter().map(|m| (m.user_id, m)).collect();

        let server_name = match self.ctx.membership().fetch_server(self.server_id).await {
            Ok(Some(profile)) => profile.name,
            _ => self.server_id.to_string(),
        };

        let mut entries = Vec::with_capacity(ranking.len());
        for (rank, entry) in ranking.iter().enumerate() {
            let member = member_map.get(&entry.user_id);
            let display_name = member
                .map(|m| m.display_name.clone())
                .unwrap_or_else(|| entry.user_id.to_string());

            let avatar = match member.and_then(|m| m.avatar_url.as_deref()) {
                Some(url) => match self.ctx.membership().fetch_avatar(url).await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        warn!(user_id = %entry.user_id, error = %e, "Avatar fetch failed");
                        None
                    }
                },
                None => None,
            };

            let tier = Tier::for_rank(rank);
            let streak = match streaks.get(&entry.user_id) {
                Some(streak) => *streak,
                None => self
                    .ctx
                    .streak_repo()
                    .get(self.server_id, entry.user_id)
                    .await
                    .map(|r| r.consecutive_count)
                    .unwrap_or(0),
            };

            entries.push(RankingCardEntry {
                rank: rank as u32,
                user_id: entry.user_id,
                display_name,
                count: entry.count,
                tier,
                streak,
                avatar,
            });
        }

        RankingCard {
            server_name,
            window: *window,
            entries,
            first_role_name: first_role.name.clone(),
            first_role_color: first_role.color,
            other_role_name: other_role.name.clone(),
            other_role_color: other_role.color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_warning_flag() {
        let window = AggregationWindow::new(Utc::now() - chrono::Duration::days(1), Utc::now())
            .unwrap();
        let history =
            AggregationHistory::from_ranking(Snowflake::new(1), Utc::now(), window, &[]);

        let clean = AggregationOutcome {
            history: history.clone(),
            card_png: vec![],
            skipped_members: 0,
        };
        assert!(!clean.completed_with_warnings());

        let warned = AggregationOutcome {
            history,
            card_png: vec![],
            skipped_members: 2,
        };
        assert!(warned.completed_with_warnings());
    }
}
