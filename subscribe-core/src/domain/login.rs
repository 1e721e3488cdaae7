//! Login domain model

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::credential::PasswordCredential;

/// A local login created at signup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Login {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub credential: PasswordCredential,
    pub created_at: DateTime<Utc>,
}

impl Login {
    pub fn new(id: impl Into<String>, email: impl Into<String>, credential: PasswordCredential) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            credential,
            created_at: Utc::now(),
        }
    }
}

/// Signup form input
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub id: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::credential::Argon2Params;

    #[test]
    fn test_login_json_never_contains_credential() {
        let credential = PasswordCredential {
            salt: "c2FsdA==".to_string(),
            hash: "abcd".to_string(),
            params: Argon2Params::default(),
        };
        let login = Login::new("moon", "moon@example.com", credential);
        let json = serde_json::to_value(&login).unwrap();

        assert_eq!(json["id"], "moon");
        assert!(json.get("credential").is_none());
    }
}
