//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Connectivity failures surface as a typed
//! `DomainError::StoreUnavailable` from every method rather than scattered
//! connected-or-not checks.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{
    ActivityCounter, AggregationHistory, AuthCode, MessageRecord, RoleColorMemory, RoleConfig,
    ServerAuthorization, StreakRecord, UserCount,
};
use crate::error::DomainError;
use crate::value_objects::{AggregationWindow, RoleColor, Snowflake, Tier};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Activity Repository
// ============================================================================

#[async_trait]
pub trait ActivityRepository: Send + Sync {
    /// Record one counted message: bump the live counter (resettable `count`
    /// and lifetime `total`) and append to the message log. Increments for
    /// the same (server, user) key must never be lost under concurrent calls.
    async fn record_message(&self, record: &MessageRecord) -> RepoResult<()>;

    /// Tally the message log over a window (both bounds inclusive), grouped
    /// by user. Returned in encounter order: each user's first message in
    /// the window.
    async fn count_in_window(
        &self,
        server_id: Snowflake,
        window: &AggregationWindow,
    ) -> RepoResult<Vec<UserCount>>;

    /// Snapshot of the live counters, in counter-row creation order
    async fn current_counts(&self, server_id: Snowflake) -> RepoResult<Vec<UserCount>>;

    /// One user's counter row (live count plus lifetime total), if any
    async fn counter_for(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<ActivityCounter>>;

    /// Clear the resettable counters for a server. Idempotent; lifetime
    /// totals and the message log are untouched.
    async fn reset(&self, server_id: Snowflake) -> RepoResult<()>;

    /// Delete message-log rows older than the cutoff; returns rows removed
    async fn prune_older_than(&self, cutoff: DateTime<Utc>) -> RepoResult<u64>;
}

// ============================================================================
// Role-Config Repository
// ============================================================================

#[async_trait]
pub trait RoleConfigRepository: Send + Sync {
    /// Get the tier-role configuration for a server
    async fn get(&self, server_id: Snowflake) -> RepoResult<Option<RoleConfig>>;

    /// Fully replace the tier-role configuration for a server
    async fn set(&self, config: &RoleConfig) -> RepoResult<()>;
}

// ============================================================================
// Exclusion Repository
// ============================================================================

#[async_trait]
pub trait ExclusionRepository: Send + Sync {
    /// All excluded role IDs for a server
    async fn get(&self, server_id: Snowflake) -> RepoResult<Vec<Snowflake>>;

    /// Add a role to the exclusion set; false if already present
    async fn add(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool>;

    /// Remove a role from the exclusion set; false if absent
    async fn remove(&self, server_id: Snowflake, role_id: Snowflake) -> RepoResult<bool>;
}

// ============================================================================
// Streak Repository
// ============================================================================

#[async_trait]
pub trait StreakRepository: Send + Sync {
    /// Get the streak record, defaulting to (none, 0) when absent
    async fn get(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<StreakRecord>;

    /// Streak-or-reset: same stored tier increments the count, a different
    /// tier restarts at 1. Returns the new count.
    async fn advance(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        tier: Tier,
    ) -> RepoResult<i32>;

    /// Set the count to 0 while retaining the tier label (documented quirk)
    async fn reset_to_zero(&self, server_id: Snowflake, user_id: Snowflake) -> RepoResult<()>;

    /// Zero every record in the server; returns rows affected
    async fn reset_all(&self, server_id: Snowflake) -> RepoResult<u64>;
}

// ============================================================================
// History Repository
// ============================================================================

#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append one record for a completed run (records are never mutated)
    async fn append(&self, history: &AggregationHistory) -> RepoResult<()>;

    /// The most recent record for a server, if any
    async fn latest(&self, server_id: Snowflake) -> RepoResult<Option<AggregationHistory>>;

    /// Recent records for a server, newest first
    async fn recent(
        &self,
        server_id: Snowflake,
        limit: i64,
    ) -> RepoResult<Vec<AggregationHistory>>;
}

// ============================================================================
// Authorization Repository
// ============================================================================

#[async_trait]
pub trait AuthRepository: Send + Sync {
    /// Store a freshly minted code
    async fn insert_code(&self, code: &AuthCode) -> RepoResult<()>;

    /// Atomically mark the code used by this server and record the server
    /// authorization. Fails with `InvalidCode` when the code is unknown and
    /// `CodeAlreadyUsed` when it was spent before.
    async fn redeem(&self, code: &str, server_id: Snowflake) -> RepoResult<()>;

    /// Whether an authorization record exists for the server
    async fn is_authorized(&self, server_id: Snowflake) -> RepoResult<bool>;

    /// Every unlocked server, oldest authorization first (operator listing)
    async fn list_authorizations(&self) -> RepoResult<Vec<ServerAuthorization>>;
}

// ============================================================================
// Role-Color Memory Repository
// ============================================================================

#[async_trait]
pub trait RoleColorRepository: Send + Sync {
    /// Record the original color the first time only; false when a memory
    /// already exists (later customizations must not clobber it)
    async fn remember_if_absent(&self, memory: &RoleColorMemory) -> RepoResult<bool>;

    /// The remembered original color, if one was ever recorded
    async fn original_color(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleColor>>;
}
