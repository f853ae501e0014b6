use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// Stored account
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Public view of a user, embedded in reviews and orders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    #[validate(length(min = 8, max = 128))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub first_name: String,
    #[serde(default)]
    #[validate(length(max = 150))]
    pub last_name: String,
}

impl RegisterRequest {
    /// Copy with surrounding whitespace stripped from the username
    pub fn normalized(&self) -> Self {
        Self {
            username: self.username.trim().to_string(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn register(username: &str, password: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
            first_name: String::new(),
            last_name: String::new(),
        }
    }

    #[test]
    fn register_request_validation() {
        assert!(register("alice", "long enough").validate().is_ok());
        assert!(register("", "long enough").validate().is_err());
        assert!(register("alice", "short").validate().is_err());
        assert!(register(&"a".repeat(151), "long enough").validate().is_err());
    }

    #[test]
    fn blank_usernames_fail_after_normalizing() {
        let req = register("   ", "long enough").normalized();
        assert_eq!(req.username, "");
        assert!(req.validate().is_err());

        let req = register("  erin ", "long enough").normalized();
        assert_eq!(req.username, "erin");
        assert!(req.validate().is_ok());
    }

    #[test]
    fn names_default_to_empty() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"username": "bob", "password": "hunter22!"}"#).unwrap();
        assert_eq!(req.first_name, "");
        assert_eq!(req.last_name, "");
    }
}
