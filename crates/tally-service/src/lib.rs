//! # tally-service
//!
//! Application layer containing business logic, services, and DTOs.

pub mod dto;
pub mod services;

// Re-export the service surface for the API layer
pub use dto::{
    AggregationResponse, CodeResponse, ExclusionChangeResponse, FortuneResponse, GifResponse,
    HealthResponse, LeaderboardEntryResponse, LeaderboardResponse, LevelResponse,
    MessageEventRequest, RankedEntryResponse, ReadinessResponse, RecordOutcomeResponse,
    RedeemCodeRequest, RoleConfigResponse, RunAggregationRequest, SetRoleColorRequest,
    SetRoleConfigRequest, StreakResetResponse,
};
pub use services::{
    ActivityService, AggregationOutcome, AggregationService, AuthService, CountSource,
    FortuneService, GifService, LeaderboardService, LevelService, RegistryService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, StreakService,
};
