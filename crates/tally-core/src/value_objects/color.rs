//! Role color - 24-bit RGB color as used by chat-platform roles

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// 24-bit RGB role color (0xRRGGBB)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RoleColor(u32);

impl RoleColor {
    /// Create from a raw 0xRRGGBB value (top byte is discarded)
    #[inline]
    pub const fn new(value: u32) -> Self {
        Self(value & 0x00FF_FFFF)
    }

    /// Get the raw 0xRRGGBB value
    #[inline]
    pub const fn value(&self) -> u32 {
        self.0
    }

    /// Parse a hex color string, with or without a leading '#'
    pub fn from_hex(s: &str) -> Result<Self, DomainError> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if digits.len() != 6 {
            return Err(DomainError::ValidationError(format!(
                "invalid hex color: {s}"
            )));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::new)
            .map_err(|_| DomainError::ValidationError(format!("invalid hex color: {s}")))
    }

    /// Hex string without the leading '#'
    pub fn to_hex(&self) -> String {
        format!("{:06x}", self.0)
    }

    /// Red / green / blue components
    #[inline]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (
            ((self.0 >> 16) & 0xFF) as u8,
            ((self.0 >> 8) & 0xFF) as u8,
            (self.0 & 0xFF) as u8,
        )
    }
}

impl fmt::Display for RoleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl From<u32> for RoleColor {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        let c = RoleColor::from_hex("#FF5733").unwrap();
        assert_eq!(c.value(), 0xFF5733);
        assert_eq!(c.rgb(), (0xFF, 0x57, 0x33));

        let c = RoleColor::from_hex("ff5733").unwrap();
        assert_eq!(c.value(), 0xFF5733);
    }

    #[test]
    fn test_from_hex_invalid() {
        assert!(RoleColor::from_hex("#FFF").is_err());
        assert!(RoleColor::from_hex("zzzzzz").is_err());
        assert!(RoleColor::from_hex("").is_err());
    }

    #[test]
    fn test_to_hex_and_display() {
        let c = RoleColor::new(0x00FF00);
        assert_eq!(c.to_hex(), "00ff00");
        assert_eq!(c.to_string(), "#00ff00");
    }

    #[test]
    fn test_top_byte_discarded() {
        let c = RoleColor::new(0xFF123456);
        assert_eq!(c.value(), 0x123456);
    }
}
