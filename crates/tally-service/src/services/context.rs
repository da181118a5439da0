//! Service context - dependency container for services
//!
//! Holds all repositories, the collaborator gateways, the in-process caches,
//! and the per-server aggregation locks. Cloning is cheap (everything is
//! behind an Arc), which is what lets an aggregation run detach onto its own
//! task.

use std::sync::Arc;

use chrono::FixedOffset;
use dashmap::DashMap;
use tokio::sync::Mutex;

use tally_core::traits::{
    ActivityRepository, AuthRepository, CardRenderer, ExclusionRepository, GifProvider,
    HistoryRepository, MembershipGateway, RoleColorRepository, RoleConfigRepository,
    StreakRepository,
};
use tally_core::{RoleConfig, Snowflake};

/// Read-through caches for the registry (role config + exclusions).
///
/// The cache is owned here, keyed by server, and refreshed on every write;
/// no other component holds registry state.
#[derive(Default)]
pub struct RegistryCache {
    configs: DashMap<Snowflake, RoleConfig>,
    exclusions: DashMap<Snowflake, Vec<Snowflake>>,
}

impl RegistryCache {
    pub fn config(&self, server_id: Snowflake) -> Option<RoleConfig> {
        self.configs.get(&server_id).map(|entry| entry.clone())
    }

    pub fn store_config(&self, config: RoleConfig) {
        self.configs.insert(config.server_id, config);
    }

    pub fn exclusions(&self, server_id: Snowflake) -> Option<Vec<Snowflake>> {
        self.exclusions.get(&server_id).map(|entry| entry.clone())
    }

    pub fn store_exclusions(&self, server_id: Snowflake, role_ids: Vec<Snowflake>) {
        self.exclusions.insert(server_id, role_ids);
    }
}

/// Positive cache of authorized servers (authorization is never revoked, so
/// a hit can be trusted for the process lifetime)
#[derive(Default)]
pub struct AuthCache {
    authorized: DashMap<Snowflake, ()>,
}

impl AuthCache {
    pub fn contains(&self, server_id: Snowflake) -> bool {
        self.authorized.contains_key(&server_id)
    }

    pub fn insert(&self, server_id: Snowflake) {
        self.authorized.insert(server_id, ());
    }
}

/// Per-server aggregation run locks: at most one in-flight run per server,
/// runs for different servers fully independent.
#[derive(Default)]
pub struct AggregationLocks {
    locks: DashMap<Snowflake, Arc<Mutex<()>>>,
}

impl AggregationLocks {
    pub fn for_server(&self, server_id: Snowflake) -> Arc<Mutex<()>> {
        self.locks
            .entry(server_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    activity_repo: Arc<dyn ActivityRepository>,
    role_config_repo: Arc<dyn RoleConfigRepository>,
    exclusion_repo: Arc<dyn ExclusionRepository>,
    streak_repo: Arc<dyn StreakRepository>,
    history_repo: Arc<dyn HistoryRepository>,
    auth_repo: Arc<dyn AuthRepository>,
    role_color_repo: Arc<dyn RoleColorRepository>,

    // Collaborators
    membership: Arc<dyn MembershipGateway>,
    renderer: Arc<dyn CardRenderer>,
    gif: Option<Arc<dyn GifProvider>>,

    // In-process state
    registry_cache: Arc<RegistryCache>,
    auth_cache: Arc<AuthCache>,
    aggregation_locks: Arc<AggregationLocks>,

    // Behavior settings
    day_offset: FixedOffset,
}

impl ServiceContext {
    /// Start building a context
    pub fn builder() -> ServiceContextBuilder {
        ServiceContextBuilder::default()
    }

    // === Repositories ===

    pub fn activity_repo(&self) -> &dyn ActivityRepository {
        self.activity_repo.as_ref()
    }

    pub fn role_config_repo(&self) -> &dyn RoleConfigRepository {
        self.role_config_repo.as_ref()
    }

    pub fn exclusion_repo(&self) -> &dyn ExclusionRepository {
        self.exclusion_repo.as_ref()
    }

    pub fn streak_repo(&self) -> &dyn StreakRepository {
        self.streak_repo.as_ref()
    }

    pub fn history_repo(&self) -> &dyn HistoryRepository {
        self.history_repo.as_ref()
    }

    pub fn auth_repo(&self) -> &dyn AuthRepository {
        self.auth_repo.as_ref()
    }

    pub fn role_color_repo(&self) -> &dyn RoleColorRepository {
        self.role_color_repo.as_ref()
    }

    // === Collaborators ===

    pub fn membership(&self) -> &dyn MembershipGateway {
        self.membership.as_ref()
    }

    /// Shared renderer handle (the render itself runs on a blocking thread)
    pub fn renderer(&self) -> Arc<dyn CardRenderer> {
        Arc::clone(&self.renderer)
    }

    /// GIF provider, when one is configured
    pub fn gif(&self) -> Option<&dyn GifProvider> {
        self.gif.as_deref()
    }

    // === In-process state ===

    pub fn registry_cache(&self) -> &RegistryCache {
        &self.registry_cache
    }

    pub fn auth_cache(&self) -> &AuthCache {
        &self.auth_cache
    }

    pub fn aggregation_locks(&self) -> &AggregationLocks {
        &self.aggregation_locks
    }

    // === Settings ===

    /// Fixed local offset used to resolve calendar-day window bounds
    pub fn day_offset(&self) -> FixedOffset {
        self.day_offset
    }
}

/// Builder for `ServiceContext`
#[derive(Default)]
pub struct ServiceContextBuilder {
    activity_repo: Option<Arc<dyn ActivityRepository>>,
    role_config_repo: Option<Arc<dyn RoleConfigRepository>>,
    exclusion_repo: Option<Arc<dyn ExclusionRepository>>,
    streak_repo: Option<Arc<dyn StreakRepository>>,
    history_repo: Option<Arc<dyn HistoryRepository>>,
    auth_repo: Option<Arc<dyn AuthRepository>>,
    role_color_repo: Option<Arc<dyn RoleColorRepository>>,
    membership: Option<Arc<dyn MembershipGateway>>,
    renderer: Option<Arc<dyn CardRenderer>>,
    gif: Option<Arc<dyn GifProvider>>,
    day_offset: Option<FixedOffset>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn activity_repo(mut self, repo: Arc<dyn ActivityRepository>) -> Self {
        self.activity_repo = Some(repo);
        self
    }

    pub fn role_config_repo(mut self, repo: Arc<dyn RoleConfigRepository>) -> Self {
        self.role_config_repo = Some(repo);
        self
    }

    pub fn exclusion_repo(mut self, repo: Arc<dyn ExclusionRepository>) -> Self {
        self.exclusion_repo = Some(repo);
        self
    }

    pub fn streak_repo(mut self, repo: Arc<dyn StreakRepository>) -> Self {
        self.streak_repo = Some(repo);
        self
    }

    pub fn history_repo(mut self, repo: Arc<dyn HistoryRepository>) -> Self {
        self.history_repo = Some(repo);
        self
    }

    pub fn auth_repo(mut self, repo: Arc<dyn AuthRepository>) -> Self {
        self.auth_repo = Some(repo);
        self
    }

    pub fn role_color_repo(mut self, repo: Arc<dyn RoleColorRepository>) -> Self {
        self.role_color_repo = Some(repo);
        self
    }

    pub fn membership(mut self, gateway: Arc<dyn MembershipGateway>) -> Self {
        self.membership = Some(gateway);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn CardRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn gif(mut self, provider: Option<Arc<dyn GifProvider>>) -> Self {
        self.gif = provider;
        self
    }

    /// Local offset in whole hours (e.g. 9 for UTC+9)
    pub fn day_offset_hours(mut self, hours: i32) -> Self {
        self.day_offset = FixedOffset::east_opt(hours * 3600);
        self
    }

    pub fn build(self) -> Result<ServiceContext, String> {
        Ok(ServiceContext {
            activity_repo: self.activity_repo.ok_or("activity_repo is required")?,
            role_config_repo: self.role_config_repo.ok_or("role_config_repo is required")?,
            exclusion_repo: self.exclusion_repo.ok_or("exclusion_repo is required")?,
            streak_repo: self.streak_repo.ok_or("streak_repo is required")?,
            history_repo: self.history_repo.ok_or("history_repo is required")?,
            auth_repo: self.auth_repo.ok_or("auth_repo is required")?,
            role_color_repo: self.role_color_repo.ok_or("role_color_repo is required")?,
            membership: self.membership.ok_or("membership gateway is required")?,
            renderer: self.renderer.ok_or("renderer is required")?,
            gif: self.gif,
            registry_cache: Arc::new(RegistryCache::default()),
            auth_cache: Arc::new(AuthCache::default()),
            aggregation_locks: Arc::new(AggregationLocks::default()),
            day_offset: self
                .day_offset
                .unwrap_or_else(|| FixedOffset::east_opt(0).expect("zero offset")),
        })
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("day_offset", &self.day_offset)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregation_locks_same_server_same_lock() {
        let locks = AggregationLocks::default();
        let a = locks.for_server(Snowflake::new(1));
        let b = locks.for_server(Snowflake::new(1));
        assert!(Arc::ptr_eq(&a, &b));

        let c = locks.for_server(Snowflake::new(2));
        assert!(!Arc::ptr_eq(&a, &c));
    }

    #[test]
    fn test_auth_cache() {
        let cache = AuthCache::default();
        assert!(!cache.contains(Snowflake::new(1)));
        cache.insert(Snowflake::new(1));
        assert!(cache.contains(Snowflake::new(1)));
    }

    #[test]
    fn test_registry_cache_round_trip() {
        let cache = RegistryCache::default();
        let server = Snowflake::new(9);
        assert!(cache.config(server).is_none());

        let config = RoleConfig::new(server, Snowflake::new(1), Snowflake::new(2));
        cache.store_config(config.clone());
        assert_eq!(cache.config(server), Some(config));

        cache.store_exclusions(server, vec![Snowflake::new(5)]);
        assert_eq!(cache.exclusions(server), Some(vec![Snowflake::new(5)]));
    }
}
