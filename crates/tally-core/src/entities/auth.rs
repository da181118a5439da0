//! Authorization entities - single-use unlock codes and per-server grants

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::Snowflake;

/// Length of a generated authorization code
pub const AUTH_CODE_LEN: usize = 16;

/// Single-use authorization code minted by the bot administrator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthCode {
    pub code: String,
    pub created_at: DateTime<Utc>,
    pub used: bool,
    pub used_by: Option<Snowflake>,
}

impl AuthCode {
    /// Mint a fresh, unused code
    pub fn mint() -> Self {
        Self {
            code: generate_auth_code(),
            created_at: Utc::now(),
            used: false,
            used_by: None,
        }
    }
}

/// Exists iff the server has been unlocked with a code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerAuthorization {
    pub server_id: Snowflake,
    pub authorized_at: DateTime<Utc>,
    pub auth_code_used: String,
}

/// Generate a random 16-character alphanumeric authorization code
pub fn generate_auth_code() -> String {
    use rand::Rng;

    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..AUTH_CODE_LEN)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_auth_code() {
        let code1 = generate_auth_code();
        let code2 = generate_auth_code();

        assert_eq!(code1.len(), AUTH_CODE_LEN);
        assert_eq!(code2.len(), AUTH_CODE_LEN);
        assert!(code1.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_mint_is_unused() {
        let code = AuthCode::mint();
        assert!(!code.used);
        assert!(code.used_by.is_none());
        assert_eq!(code.code.len(), AUTH_CODE_LEN);
    }
}
