//! Domain entities

pub mod activity;
pub mod auth;
pub mod history;
pub mod profile;
pub mod role_config;
pub mod streak;

pub use activity::{ActivityCounter, MessageRecord, UserCount};
pub use auth::{generate_auth_code, AuthCode, ServerAuthorization, AUTH_CODE_LEN};
pub use history::{AggregationHistory, RankedEntry};
pub use profile::{MemberProfile, RoleProfile, ServerProfile};
pub use role_config::{RoleColorMemory, RoleConfig};
pub use streak::StreakRecord;
