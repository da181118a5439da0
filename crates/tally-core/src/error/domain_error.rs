//! Domain errors - error types for the domain layer

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::value_objects::Snowflake;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Aggregation Precondition Errors (abort before any side effect)
    // =========================================================================
    #[error("Role configuration missing for server {0}")]
    ConfigurationMissing(Snowflake),

    #[error("Role not found: {0}")]
    RoleNotFound(Snowflake),

    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow {
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },

    #[error("No prior aggregation exists to resolve 'since-last'")]
    NoPriorAggregation,

    #[error("No chat activity in the requested window")]
    NoActivity,

    #[error("No eligible users remain after exclusion filtering")]
    NoEligibleUsers,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("Server {0} is not authorized")]
    NotAuthorized(Snowflake),

    #[error("Invalid authorization code")]
    InvalidCode,

    #[error("Authorization code has already been used")]
    CodeAlreadyUsed,

    // =========================================================================
    // Per-member / External Mutation Errors (recovered locally by the engine)
    // =========================================================================
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Member not found in server")]
    MemberNotFound,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    ValidationError(String),

    // =========================================================================
    // Collaborator Errors
    // =========================================================================
    #[error("Render failure: {0}")]
    RenderFailure(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Chat platform unavailable: {0}")]
    PlatformUnavailable(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Preconditions
            Self::ConfigurationMissing(_) => "CONFIGURATION_MISSING",
            Self::RoleNotFound(_) => "ROLE_NOT_FOUND",
            Self::InvalidWindow { .. } => "INVALID_WINDOW",
            Self::NoPriorAggregation => "NO_PRIOR_AGGREGATION",
            Self::NoActivity => "NO_ACTIVITY",
            Self::NoEligibleUsers => "NO_ELIGIBLE_USERS",

            // Authorization
            Self::NotAuthorized(_) => "SERVER_NOT_AUTHORIZED",
            Self::InvalidCode => "INVALID_CODE",
            Self::CodeAlreadyUsed => "CODE_ALREADY_USED",

            // Mutation
            Self::PermissionDenied(_) => "PERMISSION_DENIED",
            Self::MemberNotFound => "UNKNOWN_MEMBER",

            // Validation
            Self::ValidationError(_) => "VALIDATION_ERROR",

            // Collaborators
            Self::RenderFailure(_) => "RENDER_FAILURE",
            Self::StoreUnavailable(_) => "STORE_UNAVAILABLE",
            Self::PlatformUnavailable(_) => "PLATFORM_UNAVAILABLE",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is an aggregation precondition failure (no side effects
    /// were applied and the run may simply be re-issued with corrected input)
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::ConfigurationMissing(_)
                | Self::RoleNotFound(_)
                | Self::InvalidWindow { .. }
                | Self::NoPriorAggregation
                | Self::NoActivity
                | Self::NoEligibleUsers
        )
    }

    /// Check if this is an authorization-gate failure
    pub fn is_authorization(&self) -> bool {
        matches!(
            self,
            Self::NotAuthorized(_) | Self::InvalidCode | Self::CodeAlreadyUsed
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::ValidationError(_) | Self::InvalidWindow { .. })
    }

    /// Check if retrying the failed operation is safe and potentially useful
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable(_) | Self::PlatformUnavailable(_) | Self::RenderFailure(_)
        )
    }
}
