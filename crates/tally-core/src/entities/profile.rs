//! Platform profiles - read-only views of external membership state
//!
//! These are snapshots fetched from the chat platform at aggregation time;
//! the platform remains the source of truth.

use serde::{Deserialize, Serialize};

use crate::value_objects::{RoleColor, Snowflake};

/// A server member as seen by the membership gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberProfile {
    pub user_id: Snowflake,
    pub display_name: String,
    pub role_ids: Vec<Snowflake>,
    pub avatar_url: Option<String>,
    pub bot: bool,
}

impl MemberProfile {
    /// Check if the member holds a specific role
    #[inline]
    pub fn has_role(&self, role_id: Snowflake) -> bool {
        self.role_ids.contains(&role_id)
    }

    /// Check if the member holds any role from a list
    pub fn has_any_role(&self, role_ids: &[Snowflake]) -> bool {
        self.role_ids.iter().any(|id| role_ids.contains(id))
    }
}

/// A role as seen by the membership gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleProfile {
    pub id: Snowflake,
    pub name: String,
    pub color: RoleColor,
}

/// A server as seen by the membership gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerProfile {
    pub id: Snowflake,
    pub name: String,
    pub icon_url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(role_ids: Vec<i64>) -> MemberProfile {
        MemberProfile {
            user_id: Snowflake::new(1),
            display_name: "tester".to_string(),
            role_ids: role_ids.into_iter().map(Snowflake::new).collect(),
            avatar_url: None,
            bot: false,
        }
    }

    #[test]
    fn test_has_role() {
        let m = member(vec![10, 20]);
        assert!(m.has_role(Snowflake::new(10)));
        assert!(!m.has_role(Snowflake::new(30)));
    }

    #[test]
    fn test_has_any_role() {
        let m = member(vec![10, 20]);
        assert!(m.has_any_role(&[Snowflake::new(99), Snowflake::new(20)]));
        assert!(!m.has_any_role(&[Snowflake::new(99)]));
        assert!(!m.has_any_role(&[]));
    }
}
