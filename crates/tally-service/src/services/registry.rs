//! Registry service - role configuration and exclusion sets
//!
//! Owns the read-through caches keyed by server: reads hit the cache first,
//! writes go to the store and refresh the cache in the same call.

use chrono::Utc;
use tracing::{info, instrument};

use tally_core::{DomainError, RoleColor, RoleColorMemory, RoleConfig, Snowflake};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// Registry service
pub struct RegistryService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RegistryService<'a> {
    /// Create a new RegistryService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get the tier-role configuration, read-through cached
    #[instrument(skip(self))]
    pub async fn get_role_config(&self, server_id: Snowflake) -> ServiceResult<Option<RoleConfig>> {
        if let Some(config) = self.ctx.registry_cache().config(server_id) {
            return Ok(Some(config));
        }

        let config = self.ctx.role_config_repo().get(server_id).await?;
        if let Some(config) = &config {
            self.ctx.registry_cache().store_config(config.clone());
        }
        Ok(config)
    }

    /// Fully replace the tier-role configuration
    #[instrument(skip(self))]
    pub async fn set_role_config(
        &self,
        server_id: Snowflake,
        first_role_id: Snowflake,
        other_role_id: Snowflake,
    ) -> ServiceResult<RoleConfig> {
        let config = RoleConfig::new(server_id, first_role_id, other_role_id);
        self.ctx.role_config_repo().set(&config).await?;
        self.ctx.registry_cache().store_config(config.clone());

        info!(
            server_id = %server_id,
            first_role_id = %first_role_id,
            other_role_id = %other_role_id,
            "Role config updated"
        );
        Ok(config)
    }

    /// All excluded role IDs, read-through cached
    #[instrument(skip(self))]
    pub async fn get_exclusions(&self, server_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        if let Some(role_ids) = self.ctx.registry_cache().exclusions(server_id) {
            return Ok(role_ids);
        }

        let role_ids = self.ctx.exclusion_repo().get(server_id).await?;
        self.ctx
            .registry_cache()
            .store_exclusions(server_id, role_ids.clone());
        Ok(role_ids)
    }

    /// Add a role to the exclusion set; false when already present
    #[instrument(skip(self))]
    pub async fn add_exclusion(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> ServiceResult<bool> {
        let added = self.ctx.exclusion_repo().add(server_id, role_id).await?;
        self.refresh_exclusions(server_id).await?;

        if added {
            info!(server_id = %server_id, role_id = %role_id, "Exclusion added");
        }
        Ok(added)
    }

    /// Remove a role from the exclusion set; false when absent
    #[instrument(skip(self))]
    pub async fn remove_exclusion(
        &self,
        server_id: Snowflake,
        role_id: Snowflake,
    ) -> ServiceResult<bool> {
        let removed = self.ctx.exclusion_repo().remove(server_id, role_id).await?;
        self.refresh_exclusions(server_id).await?;

        if removed {
            info!(server_id = %server_id, role_id = %role_id, "Exclusion removed");
        }
        Ok(removed)
    }

    /// True iff the given role set intersects the server's exclusion set
    #[instrument(skip(self, role_ids))]
    pub async fn is_excluded(
        &self,
        server_id: Snowflake,
        role_ids: &[Snowflake],
    ) -> ServiceResult<bool> {
        if role_ids.is_empty() {
            return Ok(false);
        }
        let exclusions = self.get_exclusions(server_id).await?;
        Ok(role_ids.iter().any(|id| exclusions.contains(id)))
    }

    /// Change the first-tier role's display color.
    ///
    /// The role's current color is captured into the color memory before the
    /// first customization; the next aggregation run restores it from there.
    #[instrument(skip(self))]
    pub async fn set_first_role_color(
        &self,
        server_id: Snowflake,
        color: RoleColor,
    ) -> ServiceResult<()> {
        let config = self
            .get_role_config(server_id)
            .await?
            .ok_or(DomainError::ConfigurationMissing(server_id))?;

        let role = self
            .ctx
            .membership()
            .fetch_role(server_id, config.first_role_id)
            .await?
            .ok_or(DomainError::RoleNotFound(config.first_role_id))?;

        let remembered = self
            .ctx
            .role_color_repo()
            .remember_if_absent(&RoleColorMemory {
                server_id,
                role_id: role.id,
                original_color: role.color,
                recorded_at: Utc::now(),
            })
            .await?;

        self.ctx
            .membership()
            .edit_role_color(server_id, role.id, color)
            .await?;

        info!(
            server_id = %server_id,
            role_id = %role.id,
            %color,
            remembered_original = remembered,
            "First-tier role color changed"
        );
        Ok(())
    }

    async fn refresh_exclusions(&self, server_id: Snowflake) -> ServiceResult<Vec<Snowflake>> {
        let role_ids = self.ctx.exclusion_repo().get(server_id).await?;
        self.ctx
            .registry_cache()
            .store_exclusions(server_id, role_ids.clone());
        Ok(role_ids)
    }
}
