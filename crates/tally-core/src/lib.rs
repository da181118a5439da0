//! # tally-core
//!
//! Domain layer containing entities, value objects, repository traits, and the
//! collaborator gateways (membership, GIF search, card rendering).
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    generate_auth_code, ActivityCounter, AggregationHistory, AuthCode, MemberProfile,
    MessageRecord, RankedEntry, RoleColorMemory, RoleConfig, RoleProfile, ServerAuthorization,
    ServerProfile, StreakRecord, UserCount, AUTH_CODE_LEN,
};
pub use error::DomainError;
pub use traits::{
    ActivityRepository, AuthRepository, CardRenderer, ExclusionRepository, FortuneCard,
    GifProvider, GifResult, HistoryRepository, LevelCard, MembershipGateway, RankingCard,
    RankingCardEntry, RepoResult, RoleColorRepository, RoleConfigRepository, StreakRepository,
};
pub use value_objects::{
    AggregationWindow, RoleColor, Snowflake, SnowflakeParseError, Tier, WindowBound, WindowSpec,
};
