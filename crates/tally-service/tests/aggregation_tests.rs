//! Engine tests against in-memory fakes
//!
//! Exercises the aggregation pipeline end-to-end without a database or a
//! chat platform: fake repositories keep state in mutexes, the fake
//! membership gateway records every mutation in order, and the fake
//! renderer can be told to fail to probe the counters-reset-last property.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};

use tally_core::traits::{
    ActivityRepository, AuthRepository, CardRenderer, ExclusionRepository, HistoryRepository,
    MembershipGateway, RepoResult, RoleColorRepository, RoleConfigRepository, StreakRepository,
};
use tally_core::{
    ActivityCounter, AggregationHistory, AggregationWindow, AuthCode, DomainError, FortuneCard,
    LevelCard, MemberProfile, MessageRecord, RankingCard, RoleColor, RoleColorMemory, RoleConfig,
    RoleProfile, ServerAuthorization, ServerProfile, Snowflake, StreakRecord, Tier, UserCount,
    WindowBound, WindowSpec,
};
use tally_service::{
    ActivityService, AggregationService, CountSource, MessageEventRequest, RegistryService,
    ServiceContext, ServiceError, StreakService,
};

// ===========================================================================
// Fakes
// ===========================================================================

#[derive(Default)]
struct FakeActivityRepo {
    messages: Mutex<Vec<MessageRecord>>,
    // (server, user) -> (count, total), in first-insertion order
    counters: Mutex<Vec<(Snowflake, Snowflake, i64, i64)>>,
}

impl FakeActivityRepo {
    fn live_count(&self, server: Snowflake, user: Snowflake) -> i64 {
        self.counters
            .lock()
            .unwrap()
            .iter()
            .find(|(s, u, _, _)| *s == server && *u == user)
            .map(|(_, _, count, _)| *count)
            .unwrap_or(0)
    }
}

#[async_trait]
impl ActivityRepository for FakeActivityRepo {
    async fn record_message(&self, record: &MessageRecord) -> RepoResult<()> {
        let mut messages = self.messages.lock().unwrap();
        if messages
            .iter()
            .any(|m| m.server_id == record.server_id && m.message_id == record.message_id)
        {
            return Ok(());
        }
        messages.push(record.clone());

        let mut counters = self.counters.lock().unwrap();
        match counters
            .iter_mut()
            .find(|(s, u, _, _)| *s == record.server_id && *u == record.user_id)
        {
            Some(entry) => {
                entry.2 += 1;
                entry.3 += 1;
            }
            None => counters.push((record.server_id, record.user_id, 1, 1)),
        }
        Ok(())
    }

    async fn count_in_window(
        &self,
        server_id: Snowflake,
        window: &AggregationWindow,
    ) -> RepoResult<Vec<UserCount>> {
        let messages = self.messages.lock().unwrap();
        let mut per_user: Vec<(Snowflake, DateTime<Utc>, i64)> = Vec::new();
        for m in messages.iter() {
            if m.server_id != server_id || !window.contains(m.timestamp) {
                continue;
            }
            match per_user.iter_mut().find(|(u, _, _)| *u == m.user_id) {
                Some(entry) => {
                    entry.2 += 1;
                    if m.timestamp < entry.1 {
                        entry.1 = m.timestamp;
                    }
                }
                None => per_user.push((m.user_id, m.timestamp, 1)),
            }
        }
        per_user.sort_by_key(|(_, first_ts, _)| *first_ts);
        Ok(per_user
            .into_iter()
            .map(|(user_id, _, count)| UserCount::new(user_id, count))
            .collect())
    }

    async fn current_counts(&self, server_id: Snowflake) -> RepoResult<Vec<UserCount>> {
        Ok(self
            .counters
            .lock()
            .unwrap()
            .iter()
            .filter(|(s, _, count, _)| *s == server_id && *count > 0)
            .map(|(_, u, count, _)| UserCount::new(*u, *count))
            .collect())
    }

    async fn counter_for(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ActivityCounter>> {
        Ok(self
            .counters
            .lock()
            .unwrap()
            .iter()
            .find(|(s, u, _, _)| *s == server_id && *u == user_id)
            .map(|(s, u, count, total)| ActivityCounter {
                server_id: *s,
                user_id: *u,
                count: *count,
                total: *total,
                updated_at: Utc::now(),
            }))
    }

    async fn reset(&self, server_id: Snowflake) -> RepoResult<()> {
        for entry in self.counters.lock().unwrap().iter_mut() {
            if entry.0 == server_id {
                entry.2 = 0;
            }
        }
        Ok(())
    }

    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64> {
        let mut messages = self.messages.lock().unwrap();
        let before = messages.len();
        messages.retain(|m| m.timestamp >= cutoff);
        Ok((before - messages.len()) as u64)
    }
}

#[derive(Default)]
struct FakeRoleConfigRepo {
    configs: Mutex<HashMap<Snowflake, RoleConfig>>,
}

#[async_trait]
impl RoleConfigRepository for FakeRoleConfigRepo {
    async fn get(&self, server_id: Snowflake) -> RepoResult<Option<RoleConfig>> {
        Ok(self.configs.lock().unwrap().get(&server_id).cloned())
    }

    async fn set(&self, config: &RoleConfig) -> RepoResult<()> {
        self.configs
            .lock()
            .unwrap()
            .insert(config.server_id, config.clone());
        Ok(())
    }
}

#[derive(Default)]
struct FakeExclusionRepo {
    exclusions: Mutex<HashMap<Snowflake, Vec<Snowflake>>>,
}

#[async_trait]
impl ExclusionRepository for FakeExclusionRepo {
    async fn get(&self, server_id: Snowflake) -> RepoResult<Vec<Snowflake>> {
        Ok(self
            .exclusions
            .lock()
            .unwrap()
            .get(&server_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let mut map = self.exclusions.lock().unwrap();
        let set = map.entry(server_id).or_default();
        if set.contains(&role_id) {
            Ok(false)
        } else {
            set.push(role_id);
            Ok(true)
        }
    }

    async fn remove(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let mut map = self.exclusions.lock().unwrap();
        let set = map.entry(server_id).or_default();
        let before = set.len();
        set.retain(|id| *id != role_id);
        Ok(set.len() != before)
    }
}

#[derive(Default)]
struct FakeStreakRepo {
    records: Mutex<HashMap<(Snowflake, Snowflake), StreakRecord>>,
}

#[async_trait]
impl StreakRepository for FakeStreakRepo {
    async fn get(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<StreakRecord> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .get(&(server_id, user_id))
            .copied()
            .unwrap_or_else(|| StreakRecord::absent(server_id, user_id)))
    }

    async fn advance(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        tier: Tier,
    ) -> RepoResult<i32> {
        let mut records = self.records.lock().unwrap();
        let record = records
            .entry((server_id, user_id))
            .or_insert_with(|| StreakRecord::absent(server_id, user_id));
        *record = record.advanced(tier);
        Ok(record.consecutive_count)
    }

    async fn reset_to_zero(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<()> {
        let mut records = self.records.lock().unwrap();
        if let Some(record) = records.get_mut(&(server_id, user_id)) {
            *record = record.zeroed();
        }
        Ok(())
    }

    async fn reset_all(&self, server_id: Snowflake) -> RepoResult<u64> {
        let mut records = self.records.lock().unwrap();
        let mut affected = 0;
        for ((s, _), record) in records.iter_mut() {
            if *s == server_id {
                *record = record.zeroed();
                affected += 1;
            }
        }
        Ok(affected)
    }
}

#[derive(Default)]
struct FakeHistoryRepo {
    records: Mutex<Vec<AggregationHistory>>,
}

#[async_trait]
impl HistoryRepository for FakeHistoryRepo {
    async fn append(&self, history: &AggregationHistory) -> RepoResult<()> {
        self.records.lock().unwrap().push(history.clone());
        Ok(())
    }

    async fn latest(&self, server_id: Snowflake) -> RepoResult<Option<AggregationHistory>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.server_id == server_id)
            .max_by_key(|h| h.aggregated_at)
            .cloned())
    }

    async fn recent(
        &self,
        server_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<AggregationHistory>> {
        let mut records: Vec<_> = self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|h| h.server_id == server_id)
            .cloned()
            .collect();
        records.sort_by_key(|h| std::cmp::Reverse(h.aggregated_at));
        records.truncate(limit as usize);
        Ok(records)
    }
}

#[derive(Default)]
struct FakeAuthRepo {
    codes: Mutex<HashMap<String, AuthCode>>,
    authorized: Mutex<Vec<Snowflake>>,
}

#[async_trait]
impl AuthRepository for FakeAuthRepo {
    async fn insert_code(&self, code: &AuthCode) -> RepoResult<()> {
        self.codes
            .lock()
            .unwrap()
            .insert(code.code.clone(), code.clone());
        Ok(())
    }

    async fn redeem(&self, code: &str, server_id: Snowflake) -> RepoResult<()> {
        let mut codes = self.codes.lock().unwrap();
        let entry = codes.get_mut(code).ok_or(DomainError::InvalidCode)?;
        if entry.used {
            return Err(DomainError::CodeAlreadyUsed);
        }
        entry.used = true;
        entry.used_by = Some(server_id);
        self.authorized.lock().unwrap().push(server_id);
        Ok(())
    }

    async fn is_authorized(&self, server_id: Snowflake) -> RepoResult<bool> {
        Ok(self.authorized.lock().unwrap().contains(&server_id))
    }

    async fn list_authorizations(&self) -> RepoResult<Vec<ServerAuthorization>> {
        Ok(self
            .authorized
            .lock()
            .unwrap()
            .iter()
            .map(|server_id| ServerAuthorization {
                server_id: *server_id,
                authorized_at: Utc::now(),
                auth_code_used: String::new(),
            })
            .collect())
    }
}

#[derive(Default)]
struct FakeRoleColorRepo {
    colors: Mutex<HashMap<(Snowflake, Snowflake), RoleColor>>,
}

#[async_trait]
impl RoleColorRepository for FakeRoleColorRepo {
    async fn remember_if_absent(&self, memory: &RoleColorMemory) -> RepoResult<bool> {
        let mut colors = self.colors.lock().unwrap();
        let key = (memory.server_id, memory.role_id);
        if colors.contains_key(&key) {
            Ok(false)
        } else {
            colors.insert(key, memory.original_color);
            Ok(true)
        }
    }

    async fn original_color(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleColor>> {
        Ok(self.colors.lock().unwrap().get(&(server_id, role_id)).copied())
    }
}

/// Records every mutation in order so tests can assert step sequencing.
#[derive(Default)]
struct FakeMembership {
    members: Mutex<Vec<MemberProfile>>,
    roles: Mutex<Vec<RoleProfile>>,
    /// Users whose grants/revokes fail as if they left the server
    departed: Mutex<Vec<Snowflake>>,
    /// Ordered mutation log: "revoke:<user>", "grant:<user>:<role>", "color"
    ops: Mutex<Vec<String>>,
}

impl FakeMembership {
    fn add_member(&self, user_id: i64, role_ids: &[i64]) {
        let mut members = self.members.lock().unwrap();
        if members.iter().any(|m| m.user_id == Snowflake::new(user_id)) {
            return;
        }
        members.push(MemberProfile {
            user_id: Snowflake::new(user_id),
            display_name: format!("user-{user_id}"),
            role_ids: role_ids.iter().copied().map(Snowflake::new).collect(),
            avatar_url: None,
            bot: false,
        });
    }

    fn add_platform_role(&self, role_id: i64, name: &str) {
        self.roles.lock().unwrap().push(RoleProfile {
            id: Snowflake::new(role_id),
            name: name.to_string(),
            color: RoleColor::new(0x99AABB),
        });
    }

    fn mark_departed(&self, user_id: Snowflake) {
        self.departed.lock().unwrap().push(user_id);
        self.members.lock().unwrap().retain(|m| m.user_id != user_id);
    }

    fn ops(&self) -> Vec<String> {
        self.ops.lock().unwrap().clone()
    }

    fn grants(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter(|op| op.starts_with("grant:"))
            .collect()
    }

    fn role_ids_of(&self, user_id: Snowflake) -> Vec<Snowflake> {
        self.members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user_id == user_id)
            .map(|m| m.role_ids.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl MembershipGateway for FakeMembership {
    async fn fetch_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerProfile>> {
        Ok(Some(ServerProfile {
            id: server_id,
            name: "Fake Server".to_string(),
            icon_url: None,
        }))
    }

    async fn fetch_role(
        &self,
        _server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleProfile>> {
        Ok(self
            .roles
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.id == role_id)
            .cloned())
    }

    async fn list_members(&self, _server_id: Snowflake) -> RepoResult<Vec<MemberProfile>> {
        Ok(self.members.lock().unwrap().clone())
    }

    async fn fetch_member(
        &self,
        _server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberProfile>> {
        Ok(self
            .members
            .lock()
            .unwrap()
            .iter()
            .find(|m| m.user_id == user_id)
            .cloned())
    }

    async fn add_role(
        &self,
        _server_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()> {
        if self.departed.lock().unwrap().contains(&user_id) {
            return Err(DomainError::MemberNotFound);
        }
        self.ops
            .lock()
            .unwrap()
            .push(format!("grant:{user_id}:{role_id}"));
        let mut members = self.members.lock().unwrap();
        if let Some(member) = members.iter_mut().find(|m| m.user_id == user_id) {
            if !member.role_ids.contains(&role_id) {
                member.role_ids.push(role_id);
            }
        }
        Ok(())
    }

    async fn remove_roles(
        &self,
        _server_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<()> {
        if self.departed.lock().unwrap().contains(&user_id) {
            return Err(DomainError::MemberNotFound);
        }
        self.ops.lock().unwrap().push(format!("revoke:{user_id}"));
        let mut members = self.members.lock().unwrap();
        if let Some(member) = members.iter_mut().find(|m| m.user_id == user_id) {
            member.role_ids.retain(|id| !role_ids.contains(id));
        }
        Ok(())
    }

    async fn edit_role_color(
        &self,
        _server_id: Snowflake,
        _role_id: Snowflake,
        _color: RoleColor,
    ) -> RepoResult<()> {
        self.ops.lock().unwrap().push("color".to_string());
        Ok(())
    }

    async fn fetch_avatar(&self, _url: &str) -> RepoResult<Option<Vec<u8>>> {
        Ok(None)
    }
}

#[derive(Default)]
struct FakeRenderer {
    fail: AtomicBool,
    rendered: Mutex<Vec<RankingCard>>,
}

impl CardRenderer for FakeRenderer {
    fn render_ranking(&self, card: &RankingCard) -> RepoResult<Vec<u8>> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(DomainError::RenderFailure("fake render failure".to_string()));
        }
        self.rendered.lock().unwrap().push(card.clone());
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn render_level(&self, _card: &LevelCard) -> RepoResult<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }

    fn render_fortune(&self, _card: &FortuneCard) -> RepoResult<Vec<u8>> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

// ===========================================================================
// World
// ===========================================================================

const SERVER: Snowflake = Snowflake::new(1000);
const FIRST_ROLE: Snowflake = Snowflake::new(11);
const OTHER_ROLE: Snowflake = Snowflake::new(22);
const EXCLUDED_ROLE: Snowflake = Snowflake::new(33);

struct World {
    activity: Arc<FakeActivityRepo>,
    streaks: Arc<FakeStreakRepo>,
    history: Arc<FakeHistoryRepo>,
    auth: Arc<FakeAuthRepo>,
    colors: Arc<FakeRoleColorRepo>,
    membership: Arc<FakeMembership>,
    renderer: Arc<FakeRenderer>,
    ctx: ServiceContext,
}

impl World {
    fn new() -> Self {
        let activity = Arc::new(FakeActivityRepo::default());
        let role_config = Arc::new(FakeRoleConfigRepo::default());
        let exclusions = Arc::new(FakeExclusionRepo::default());
        let streaks = Arc::new(FakeStreakRepo::default());
        let history = Arc::new(FakeHistoryRepo::default());
        let auth = Arc::new(FakeAuthRepo::default());
        let colors = Arc::new(FakeRoleColorRepo::default());
        let membership = Arc::new(FakeMembership::default());
        let renderer = Arc::new(FakeRenderer::default());

        membership.add_platform_role(FIRST_ROLE.into_inner(), "Champion");
        membership.add_platform_role(OTHER_ROLE.into_inner(), "Top Chatter");

        let ctx = ServiceContext::builder()
            .activity_repo(activity.clone())
            .role_config_repo(role_config)
            .exclusion_repo(exclusions)
            .streak_repo(streaks.clone())
            .history_repo(history.clone())
            .auth_repo(auth.clone())
            .role_color_repo(colors.clone())
            .membership(membership.clone())
            .renderer(renderer.clone())
            .gif(None)
            .day_offset_hours(0)
            .build()
            .expect("context builds");

        Self {
            activity,
            streaks,
            history,
            auth,
            colors,
            membership,
            renderer,
            ctx,
        }
    }

    async fn configure_roles(&self) {
        RegistryService::new(&self.ctx)
            .set_role_config(SERVER, FIRST_ROLE, OTHER_ROLE)
            .await
            .unwrap();
    }

    async fn seed_messages(&self, counts: &[(i64, i64)]) {
        // Users appear in slice order; each user's first message keeps that
        // encounter order for tie-breaking. Message IDs are unique across
        // seeding calls so the redelivery guard never kicks in.
        use std::sync::atomic::AtomicI64;
        static NEXT_MESSAGE_ID: AtomicI64 = AtomicI64::new(1_000_000);

        let base = Utc.with_ymd_and_hms(2025, 5, 1, 10, 0, 0).unwrap();
        for (offset, (user_id, count)) in counts.iter().enumerate() {
            self.membership.add_member(*user_id, &[]);
            for i in 0..*count {
                let message_id = NEXT_MESSAGE_ID.fetch_add(1, Ordering::SeqCst);
                let ts = base + Duration::seconds(offset as i64) + Duration::minutes(i);
                self.activity
                    .record_message(&MessageRecord::new(
                        SERVER,
                        Snowflake::new(*user_id),
                        Snowflake::new(message_id),
                        ts,
                    ))
                    .await
                    .unwrap();
            }
        }
    }

    fn may_day_window(&self) -> CountSource {
        CountSource::MessageLog(WindowSpec::new(
            WindowBound::Date(chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
            WindowBound::Date(chrono::NaiveDate::from_ymd_opt(2025, 5, 1).unwrap()),
        ))
    }

    async fn run(&self) -> Result<tally_service::AggregationOutcome, ServiceError> {
        AggregationService::new(&self.ctx)
            .run_aggregation(SERVER, self.may_day_window())
            .await
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[tokio::test]
async fn top_six_shape_one_first_five_other() {
    let world = World::new();
    world.configure_roles().await;
    world
        .seed_messages(&[(1, 70), (2, 60), (3, 50), (4, 40), (5, 30), (6, 20), (7, 10), (8, 5)])
        .await;

    let outcome = world.run().await.unwrap();
    let ranked = &outcome.history.ranked;

    assert_eq!(ranked.len(), 6, "never more than 6 recipients");
    assert_eq!(ranked[0].tier, Tier::First);
    assert_eq!(ranked[0].user_id, Snowflake::new(1));
    assert!(ranked[1..].iter().all(|e| e.tier == Tier::Other));
    // Counts descend
    for pair in ranked.windows(2) {
        assert!(pair[0].count >= pair[1].count);
    }

    let grants = world.membership.grants();
    assert_eq!(grants.len(), 6);
    assert_eq!(
        grants.iter().filter(|g| g.ends_with(&FIRST_ROLE.to_string())).count(),
        1,
        "exactly one first-tier grant"
    );
    assert!(!outcome.completed_with_warnings());
}

#[tokio::test]
async fn render_failure_preserves_counters_and_history() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 50), (2, 30)]).await;

    world.renderer.fail.store(true, Ordering::SeqCst);
    let err = world.run().await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::RenderFailure(_))));

    // Counters untouched, no history written
    assert_eq!(world.activity.live_count(SERVER, Snowflake::new(1)), 50);
    assert!(world.history.latest(SERVER).await.unwrap().is_none());

    // Retry reproduces the identical ranking and completes
    world.renderer.fail.store(false, Ordering::SeqCst);
    let outcome = world.run().await.unwrap();
    assert_eq!(outcome.history.ranked[0].user_id, Snowflake::new(1));
    assert_eq!(outcome.history.ranked[0].count, 50);

    // Now the reset ran
    assert_eq!(world.activity.live_count(SERVER, Snowflake::new(1)), 0);
}

#[tokio::test]
async fn excluded_top_scorer_never_ranks() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 100), (2, 40), (3, 20)]).await;

    // User 1 holds the excluded role despite the top count
    RegistryService::new(&world.ctx)
        .add_exclusion(SERVER, EXCLUDED_ROLE)
        .await
        .unwrap();
    {
        let mut members = world.membership.members.lock().unwrap();
        members
            .iter_mut()
            .find(|m| m.user_id == Snowflake::new(1))
            .unwrap()
            .role_ids
            .push(EXCLUDED_ROLE);
    }

    let outcome = world.run().await.unwrap();
    let ranked = &outcome.history.ranked;

    assert!(ranked.iter().all(|e| e.user_id != Snowflake::new(1)));
    assert_eq!(ranked[0].user_id, Snowflake::new(2), "next-highest gets first");
    assert_eq!(ranked[0].tier, Tier::First);
}

#[tokio::test]
async fn all_excluded_is_no_eligible_users() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 10)]).await;

    RegistryService::new(&world.ctx)
        .add_exclusion(SERVER, EXCLUDED_ROLE)
        .await
        .unwrap();
    {
        let mut members = world.membership.members.lock().unwrap();
        members
            .iter_mut()
            .find(|m| m.user_id == Snowflake::new(1))
            .unwrap()
            .role_ids
            .push(EXCLUDED_ROLE);
    }

    let err = world.run().await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NoEligibleUsers)));
    assert!(world.membership.ops().is_empty(), "no side effects");
}

#[tokio::test]
async fn tie_break_keeps_encounter_order() {
    let world = World::new();
    world.configure_roles().await;
    // A and B tie at 50; A's first message precedes B's
    world.seed_messages(&[(1, 50), (2, 50), (3, 30)]).await;

    let outcome = world.run().await.unwrap();
    let ranked = &outcome.history.ranked;

    assert_eq!(ranked[0].user_id, Snowflake::new(1));
    assert_eq!(ranked[0].tier, Tier::First);
    assert_eq!(ranked[1].user_id, Snowflake::new(2));
    assert_eq!(ranked[1].tier, Tier::Other);
    assert_eq!(ranked[2].user_id, Snowflake::new(3));

    let first_grants = world
        .membership
        .grants()
        .iter()
        .filter(|g| g.ends_with(&FIRST_ROLE.to_string()))
        .count();
    assert_eq!(first_grants, 1, "exactly one of the tied pair gets first");
}

#[tokio::test]
async fn empty_window_is_no_activity_with_no_side_effects() {
    let world = World::new();
    world.configure_roles().await;
    // Seeded outside the queried window
    let far_future = Utc.with_ymd_and_hms(2025, 7, 1, 0, 0, 0).unwrap();
    world.membership.add_member(1, &[]);
    world
        .activity
        .record_message(&MessageRecord::new(
            SERVER,
            Snowflake::new(1),
            Snowflake::new(5),
            far_future,
        ))
        .await
        .unwrap();

    let err = world.run().await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NoActivity)));
    assert!(world.membership.ops().is_empty(), "no role mutations");
    assert!(world.history.latest(SERVER).await.unwrap().is_none());
}

#[tokio::test]
async fn missing_config_and_missing_role_abort_cleanly() {
    let world = World::new();
    world.seed_messages(&[(1, 10)]).await;

    let err = world.run().await.unwrap_err();
    assert!(matches!(
        err.as_domain(),
        Some(DomainError::ConfigurationMissing(_))
    ));

    // Configured but pointing at a role the platform no longer has
    RegistryService::new(&world.ctx)
        .set_role_config(SERVER, Snowflake::new(777), OTHER_ROLE)
        .await
        .unwrap();
    let err = world.run().await.unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::RoleNotFound(_))));
    assert!(world.membership.ops().is_empty());
}

#[tokio::test]
async fn demotion_resets_streak_count_but_keeps_tier() {
    let world = World::new();
    world.configure_roles().await;

    // User 9 held "other" with a streak of 3 but stays silent this period
    world.membership.add_member(9, &[OTHER_ROLE.into_inner()]);
    for _ in 0..3 {
        world
            .streaks
            .advance(SERVER, Snowflake::new(9), Tier::Other)
            .await
            .unwrap();
    }

    world.seed_messages(&[(1, 20), (2, 10)]).await;
    world.run().await.unwrap();

    let record = world.streaks.get(SERVER, Snowflake::new(9)).await.unwrap();
    assert_eq!(record.consecutive_count, 0, "demotion zeroes the count");
    assert_eq!(record.tier, Tier::Other, "tier label survives (known quirk)");

    // And the member was swept in the blanket revocation
    assert!(!world
        .membership
        .role_ids_of(Snowflake::new(9))
        .contains(&OTHER_ROLE));
}

#[tokio::test]
async fn blanket_revocation_covers_retained_winners() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 50), (2, 25)]).await;

    // User 1 already holds first from the previous period
    {
        let mut members = world.membership.members.lock().unwrap();
        members
            .iter_mut()
            .find(|m| m.user_id == Snowflake::new(1))
            .unwrap()
            .role_ids
            .push(FIRST_ROLE);
    }

    world.run().await.unwrap();

    let ops = world.membership.ops();
    let revoke_pos = ops.iter().position(|op| op == "revoke:1").unwrap();
    let grant_pos = ops
        .iter()
        .position(|op| op.starts_with("grant:1:"))
        .unwrap();
    assert!(
        revoke_pos < grant_pos,
        "prior holder is revoked before regaining the role"
    );
    assert!(world
        .membership
        .role_ids_of(Snowflake::new(1))
        .contains(&FIRST_ROLE));
}

#[tokio::test]
async fn color_restore_runs_between_revoke_and_grant() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 50), (2, 25)]).await;

    // A previously remembered original color
    world
        .colors
        .remember_if_absent(&RoleColorMemory {
            server_id: SERVER,
            role_id: FIRST_ROLE,
            original_color: RoleColor::new(0x123456),
            recorded_at: Utc::now(),
        })
        .await
        .unwrap();

    // Someone currently holds a tier role so a revoke is observable
    {
        let mut members = world.membership.members.lock().unwrap();
        members
            .iter_mut()
            .find(|m| m.user_id == Snowflake::new(2))
            .unwrap()
            .role_ids
            .push(OTHER_ROLE);
    }

    world.run().await.unwrap();

    let ops = world.membership.ops();
    let color_pos = ops.iter().position(|op| op == "color").unwrap();
    let last_revoke = ops.iter().rposition(|op| op.starts_with("revoke:")).unwrap();
    let first_grant = ops.iter().position(|op| op.starts_with("grant:")).unwrap();
    assert!(last_revoke < color_pos, "restore after revocation");
    assert!(color_pos < first_grant, "restore before the grants");
}

#[tokio::test]
async fn departed_member_is_skipped_with_warning() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 50), (2, 40), (3, 30)]).await;

    // User 2 leaves between counting and the grant sweep
    world.membership.mark_departed(Snowflake::new(2));

    let outcome = world.run().await.unwrap();

    assert_eq!(outcome.skipped_members, 1);
    assert!(outcome.completed_with_warnings());
    // History still records the ranking as computed
    assert_eq!(outcome.history.ranked.len(), 3);
    assert_eq!(outcome.history.ranked[1].user_id, Snowflake::new(2));
    // But the streak only advanced for members actually granted
    let record = world.streaks.get(SERVER, Snowflake::new(2)).await.unwrap();
    assert_eq!(record.consecutive_count, 0);
    let record = world.streaks.get(SERVER, Snowflake::new(1)).await.unwrap();
    assert_eq!(record.consecutive_count, 1);
}

#[tokio::test]
async fn live_counter_mode_ranks_from_counters() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 5), (2, 9)]).await;

    let outcome = AggregationService::new(&world.ctx)
        .run_aggregation(SERVER, CountSource::LiveCounters)
        .await
        .unwrap();

    assert_eq!(outcome.history.ranked[0].user_id, Snowflake::new(2));
    assert_eq!(outcome.history.ranked[0].count, 9);

    // Counters were wiped, so a second live run has nothing to rank
    let err = AggregationService::new(&world.ctx)
        .run_aggregation(SERVER, CountSource::LiveCounters)
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NoActivity)));
}

#[tokio::test]
async fn since_last_sentinel_resolves_from_history() {
    let world = World::new();
    world.configure_roles().await;
    world.seed_messages(&[(1, 5)]).await;

    // No prior aggregation: the sentinel must refuse
    let spec = WindowSpec::new(WindowBound::SinceLast, WindowBound::Today);
    let err = AggregationService::new(&world.ctx)
        .run_aggregation(SERVER, CountSource::MessageLog(spec))
        .await
        .unwrap_err();
    assert!(matches!(err.as_domain(), Some(DomainError::NoPriorAggregation)));

    // After a successful run the sentinel resolves
    world.run().await.unwrap();
    let latest = world.history.latest(SERVER).await.unwrap().unwrap();

    world.seed_messages(&[(4, 3)]).await;
    // Fresh message inside [last aggregation, today]
    world
        .activity
        .record_message(&MessageRecord::new(
            SERVER,
            Snowflake::new(4),
            Snowflake::new(9_999_999),
            Utc::now(),
        ))
        .await
        .unwrap();

    let outcome = AggregationService::new(&world.ctx)
        .run_aggregation(SERVER, CountSource::MessageLog(spec))
        .await
        .unwrap();
    assert_eq!(outcome.history.window.start, latest.aggregated_at);
}

#[tokio::test]
async fn streak_service_monotonicity_and_reset_all() {
    let world = World::new();
    let service = StreakService::new(&world.ctx);
    let user = Snowflake::new(5);

    for expected in 1..=4 {
        let count = service.advance(SERVER, user, Tier::First).await.unwrap();
        assert_eq!(count, expected);
    }
    // Switching tier restarts at 1
    assert_eq!(service.advance(SERVER, user, Tier::Other).await.unwrap(), 1);

    service.advance(SERVER, Snowflake::new(6), Tier::Other).await.unwrap();
    let affected = service.reset_all(SERVER).await.unwrap();
    assert_eq!(affected, 2);
    assert_eq!(service.get(SERVER, user).await.unwrap().consecutive_count, 0);
}

#[tokio::test]
async fn role_config_round_trip() {
    let world = World::new();
    let registry = RegistryService::new(&world.ctx);

    assert!(registry.get_role_config(SERVER).await.unwrap().is_none());
    registry
        .set_role_config(SERVER, FIRST_ROLE, OTHER_ROLE)
        .await
        .unwrap();

    let config = registry.get_role_config(SERVER).await.unwrap().unwrap();
    assert_eq!(config.first_role_id, FIRST_ROLE);
    assert_eq!(config.other_role_id, OTHER_ROLE);
}

#[tokio::test]
async fn ingest_gates_unauthorized_and_excluded_authors() {
    let world = World::new();
    let activity = ActivityService::new(&world.ctx);

    let event = MessageEventRequest {
        server_id: SERVER,
        user_id: Snowflake::new(1),
        message_id: Snowflake::new(1),
        timestamp: Utc::now(),
        author_role_ids: vec![],
        author_is_bot: false,
    };

    // Locked server: not counted
    assert!(!activity.record_message(&event).await.unwrap());

    // Unlock and count
    let code = AuthCode::mint();
    world.auth.insert_code(&code).await.unwrap();
    world.auth.redeem(&code.code, SERVER).await.unwrap();
    assert!(activity.record_message(&event).await.unwrap());

    // Excluded author: not counted
    RegistryService::new(&world.ctx)
        .add_exclusion(SERVER, EXCLUDED_ROLE)
        .await
        .unwrap();
    let excluded_event = MessageEventRequest {
        message_id: Snowflake::new(2),
        author_role_ids: vec![EXCLUDED_ROLE],
        ..event.clone()
    };
    assert!(!activity.record_message(&excluded_event).await.unwrap());

    // Bot author: not counted
    let bot_event = MessageEventRequest {
        message_id: Snowflake::new(3),
        author_is_bot: true,
        ..event
    };
    assert!(!activity.record_message(&bot_event).await.unwrap());

    assert_eq!(world.activity.live_count(SERVER, Snowflake::new(1)), 1);
}
