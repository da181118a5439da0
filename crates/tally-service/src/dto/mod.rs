//! Data transfer objects for the command surface

mod requests;
mod responses;

pub use requests::{
    MessageEventRequest, RedeemCodeRequest, RunAggregationRequest, SetRoleColorRequest,
    SetRoleConfigRequest,
};
pub use responses::{
    AggregationResponse, CodeResponse, ExclusionChangeResponse, FortuneResponse, GifResponse,
    HealthResponse, LeaderboardEntryResponse, LeaderboardResponse, LevelResponse,
    RankedEntryResponse, ReadinessResponse, RecordOutcomeResponse, RoleConfigResponse,
    StreakResetResponse,
};
