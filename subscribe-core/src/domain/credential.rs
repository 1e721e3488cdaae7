//! Password credential domain models

use serde::{Deserialize, Serialize};

/// Default Argon2id parameters
pub const DEFAULT_TIME_COST: u32 = 3;
pub const DEFAULT_MEMORY_COST: u32 = 65536; // 64 MiB
pub const DEFAULT_PARALLELISM: u32 = 4;
pub const DEFAULT_HASH_LEN: u32 = 32;

/// Salt length in bytes
pub const SALT_LEN: usize = 16;

/// Argon2id parameters for password hashing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Argon2Params {
    pub time_cost: u32,
    pub memory_cost: u32,
    pub parallelism: u32,
    pub hash_len: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            time_cost: DEFAULT_TIME_COST,
            memory_cost: DEFAULT_MEMORY_COST,
            parallelism: DEFAULT_PARALLELISM,
            hash_len: DEFAULT_HASH_LEN,
        }
    }
}

/// A salted password hash as stored with a login.
///
/// The parameters travel with the hash so changing the configured cost
/// does not lock out existing logins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PasswordCredential {
    /// Base64-encoded random salt
    pub salt: String,
    /// Hex-encoded Argon2id output
    pub hash: String,
    pub params: Argon2Params,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_params() {
        let params = Argon2Params::default();
        assert_eq!(params.memory_cost, 65536);
        assert_eq!(params.time_cost, 3);
        assert_eq!(params.hash_len, 32);
    }

    #[test]
    fn test_params_json_shape() {
        let json = serde_json::to_value(Argon2Params::default()).unwrap();
        assert_eq!(json["memoryCost"], 65536);
        assert_eq!(json["hashLen"], 32);
    }

    #[test]
    fn test_partial_params_fill_defaults() {
        let params: Argon2Params = serde_json::from_str(r#"{ "timeCost": 1 }"#).unwrap();
        assert_eq!(params.time_cost, 1);
        assert_eq!(params.memory_cost, DEFAULT_MEMORY_COST);
        assert_eq!(params.parallelism, DEFAULT_PARALLELISM);
    }
}
