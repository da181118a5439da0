//! Value objects - immutable domain primitives

pub mod color;
pub mod snowflake;
pub mod tier;
pub mod window;

pub use color::RoleColor;
pub use snowflake::{Snowflake, SnowflakeParseError};
pub use tier::Tier;
pub use window::{AggregationWindow, WindowBound, WindowSpec};
