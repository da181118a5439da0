//! Authorization service - the invite-code gate in front of every command
//!
//! Servers start locked. A bot administrator mints single-use 16-character
//! codes; redeeming one unlocks the redeeming server permanently. The
//! authorized set is cached in-process because authorization is never
//! revoked.

use tracing::{info, instrument};

use tally_core::{AuthCode, DomainError, ServerAuthorization, Snowflake};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Authorization service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Whether the server has been unlocked
    #[instrument(skip(self))]
    pub async fn is_authorized(&self, server_id: Snowflake) -> ServiceResult<bool> {
        if self.ctx.auth_cache().contains(server_id) {
            return Ok(true);
        }

        let authorized = self.ctx.auth_repo().is_authorized(server_id).await?;
        if authorized {
            self.ctx.auth_cache().insert(server_id);
        }
        Ok(authorized)
    }

    /// Fail with `NotAuthorized` unless the server has been unlocked
    pub async fn require_authorized(&self, server_id: Snowflake) -> ServiceResult<()> {
        if self.is_authorized(server_id).await? {
            Ok(())
        } else {
            Err(ServiceError::from(DomainError::NotAuthorized(server_id)))
        }
    }

    /// Mint and persist a fresh single-use code (bot administrator only;
    /// the caller enforces that)
    #[instrument(skip(self))]
    pub async fn generate_code(&self) -> ServiceResult<AuthCode> {
        let code = AuthCode::mint();
        self.ctx.auth_repo().insert_code(&code).await?;
        info!(created_at = %code.created_at, "Authorization code minted");
        Ok(code)
    }

    /// Atomically spend a code and unlock the server.
    ///
    /// `InvalidCode` for unknown codes, `CodeAlreadyUsed` for spent ones.
    #[instrument(skip(self, code))]
    pub async fn redeem_code(&self, code: &str, server_id: Snowflake) -> ServiceResult<()> {
        self.ctx.auth_repo().redeem(code, server_id).await?;
        self.ctx.auth_cache().insert(server_id);
        info!(server_id = %server_id, "Server authorized");
        Ok(())
    }

    /// Every unlocked server (operator listing)
    #[instrument(skip(self))]
    pub async fn list_authorizations(&self) -> ServiceResult<Vec<ServerAuthorization>> {
        Ok(self.ctx.auth_repo().list_authorizations().await?)
    }
}
