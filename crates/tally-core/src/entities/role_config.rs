//! Role configuration - the two tier roles an aggregation run assigns

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{RoleColor, Snowflake, Tier};

/// Per-server tier-role configuration. At most one per server; fully replaced
/// on each admin update. Both roles are required for aggregation to proceed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleConfig {
    pub server_id: Snowflake,
    pub first_role_id: Snowflake,
    pub other_role_id: Snowflake,
    pub updated_at: DateTime<Utc>,
}

impl RoleConfig {
    pub fn new(server_id: Snowflake, first_role_id: Snowflake, other_role_id: Snowflake) -> Self {
        Self {
            server_id,
            first_role_id,
            other_role_id,
            updated_at: Utc::now(),
        }
    }

    /// The role ID that carries a given tier
    pub fn role_for(&self, tier: Tier) -> Option<Snowflake> {
        match tier {
            Tier::First => Some(self.first_role_id),
            Tier::Other => Some(self.other_role_id),
            Tier::None => None,
        }
    }

    /// Both tier role IDs, first then other
    #[inline]
    pub fn tier_roles(&self) -> [Snowflake; 2] {
        [self.first_role_id, self.other_role_id]
    }

    /// Whether a member role set includes either tier role
    pub fn holds_tier_role(&self, role_ids: &[Snowflake]) -> bool {
        role_ids
            .iter()
            .any(|id| *id == self.first_role_id || *id == self.other_role_id)
    }
}

/// Remembered original color of a tier role, captured the first time an
/// administrator customizes it so an aggregation run can restore it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleColorMemory {
    pub server_id: Snowflake,
    pub role_id: Snowflake,
    pub original_color: RoleColor,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RoleConfig {
        RoleConfig::new(Snowflake::new(1), Snowflake::new(10), Snowflake::new(20))
    }

    #[test]
    fn test_role_for_tier() {
        let cfg = config();
        assert_eq!(cfg.role_for(Tier::First), Some(Snowflake::new(10)));
        assert_eq!(cfg.role_for(Tier::Other), Some(Snowflake::new(20)));
        assert_eq!(cfg.role_for(Tier::None), None);
    }

    #[test]
    fn test_holds_tier_role() {
        let cfg = config();
        assert!(cfg.holds_tier_role(&[Snowflake::new(5), Snowflake::new(10)]));
        assert!(cfg.holds_tier_role(&[Snowflake::new(20)]));
        assert!(!cfg.holds_tier_role(&[Snowflake::new(5)]));
        assert!(!cfg.holds_tier_role(&[]));
    }
}
