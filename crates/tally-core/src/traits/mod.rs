//! Ports - traits implemented by the infrastructure layers

pub mod gateway;
pub mod renderer;
pub mod repositories;

pub use gateway::{GifProvider, GifResult, MembershipGateway};
pub use renderer::{CardRenderer, FortuneCard, LevelCard, RankingCard, RankingCardEntry};
pub use repositories::{
    ActivityRepository, AuthRepository, ExclusionRepository, HistoryRepository, RepoResult,
    RoleColorRepository, RoleConfigRepository, StreakRepository,
};
