//! Streak record - consecutive aggregation periods at the same tier

use serde::{Deserialize, Serialize};

use crate::value_objects::{Snowflake, Tier};

/// Per (server, user) streak state, updated only by aggregation runs.
///
/// Note: `reset_to_zero` deliberately keeps the last tier label while setting
/// the count to 0, so `tier != None` with `count == 0` is a reachable state.
/// This reproduces observed upstream behavior; see DESIGN.md.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub server_id: Snowflake,
    pub user_id: Snowflake,
    pub tier: Tier,
    pub consecutive_count: i32,
}

impl StreakRecord {
    /// The default state for a user with no streak history
    pub fn absent(server_id: Snowflake, user_id: Snowflake) -> Self {
        Self {
            server_id,
            user_id,
            tier: Tier::None,
            consecutive_count: 0,
        }
    }

    /// Pure streak-or-reset rule: same tier increments, a different tier
    /// restarts the count at 1.
    pub fn advanced(&self, tier: Tier) -> Self {
        let consecutive_count = if self.tier == tier {
            self.consecutive_count + 1
        } else {
            1
        };
        Self {
            tier,
            consecutive_count,
            ..*self
        }
    }

    /// Count to 0, tier label retained (the documented quirk)
    pub fn zeroed(&self) -> Self {
        Self {
            consecutive_count: 0,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh() -> StreakRecord {
        StreakRecord::absent(Snowflake::new(1), Snowflake::new(2))
    }

    #[test]
    fn test_advance_same_tier_increments() {
        let mut record = fresh();
        for expected in 1..=4 {
            record = record.advanced(Tier::First);
            assert_eq!(record.consecutive_count, expected);
            assert_eq!(record.tier, Tier::First);
        }
    }

    #[test]
    fn test_advance_tier_switch_resets_to_one() {
        let mut record = fresh();
        record = record.advanced(Tier::First);
        record = record.advanced(Tier::First);
        assert_eq!(record.consecutive_count, 2);

        record = record.advanced(Tier::Other);
        assert_eq!(record.tier, Tier::Other);
        assert_eq!(record.consecutive_count, 1);
    }

    #[test]
    fn test_zeroed_keeps_tier_label() {
        let record = fresh().advanced(Tier::Other).advanced(Tier::Other);
        let zeroed = record.zeroed();
        assert_eq!(zeroed.consecutive_count, 0);
        assert_eq!(zeroed.tier, Tier::Other);
    }
}
