//! Collaborator gateways - the chat platform's membership API and GIF search
//!
//! The chat platform offers no transactional semantics; every mutation here
//! is best-effort, and callers decide which failures abort a run versus get
//! logged and skipped.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::entities::{MemberProfile, RoleProfile, ServerProfile};
use crate::traits::repositories::RepoResult;
use crate::value_objects::{RoleColor, Snowflake};

// ============================================================================
// Membership Gateway
// ============================================================================

#[async_trait]
pub trait MembershipGateway: Send + Sync {
    /// Fetch a server's profile (name, icon)
    async fn fetch_server(&self, server_id: Snowflake) -> RepoResult<Option<ServerProfile>>;

    /// Resolve a role, or None if it no longer exists
    async fn fetch_role(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<Option<RoleProfile>>;

    /// Full member sweep for a server, including each member's role set
    async fn list_members(&self, server_id: Snowflake) -> RepoResult<Vec<MemberProfile>>;

    /// One member's profile, or None if they are not in the server
    async fn fetch_member(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> RepoResult<Option<MemberProfile>>;

    /// Grant one role to one member. `MemberNotFound` when they left,
    /// `PermissionDenied` when the platform refuses.
    async fn add_role(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        role_id: Snowflake,
    ) -> RepoResult<()>;

    /// Revoke the listed roles from one member
    async fn remove_roles(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> RepoResult<()>;

    /// Change a role's display color
    async fn edit_role_color(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
        color: RoleColor,
    ) -> RepoResult<()>;

    /// Download an avatar image; None when the member has no avatar set
    async fn fetch_avatar(&self, url: &str) -> RepoResult<Option<Vec<u8>>>;
}

// ============================================================================
// GIF Provider
// ============================================================================

/// A single GIF search hit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GifResult {
    pub id: String,
    pub title: String,
    pub url: String,
    pub preview_url: Option<String>,
}

#[async_trait]
pub trait GifProvider: Send + Sync {
    /// Search GIFs by free-text query
    async fn search(&self, query: &str, limit: u8) -> RepoResult<Vec<GifResult>>;

    /// Look up one GIF by its provider ID (share-URL resolution)
    async fn by_id(&self, id: &str) -> RepoResult<Option<GifResult>>;
}
