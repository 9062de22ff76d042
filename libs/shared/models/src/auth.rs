use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub role: Option<String>,
    pub permissions: Option<Vec<String>>,
    pub iat: Option<u64>,
}

/// An authenticated service identity, injected into request extensions by
/// the auth middleware.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub role: Option<String>,
    pub permissions: Vec<String>,
    pub issued_at: Option<DateTime<Utc>>,
}

impl User {
    /// Admins and holders of the `"*"` wildcard pass every check.
    pub fn has_permission(&self, permission: &str) -> bool {
        if self.role.as_deref() == Some("admin") {
            return true;
        }
        self.permissions
            .iter()
            .any(|p| p == "*" || p == permission)
    }
}

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessTokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    pub user_id: String,
    pub role: Option<String>,
    pub permissions: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: &str, permissions: &[&str]) -> User {
        User {
            id: "test".to_string(),
            role: Some(role.to_string()),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            issued_at: None,
        }
    }

    #[test]
    fn test_admin_role_bypasses_permission_checks() {
        assert!(user("admin", &[]).has_permission("write:appointments"));
    }

    #[test]
    fn test_wildcard_grants_everything() {
        assert!(user("service", &["*"]).has_permission("read:patients"));
    }

    #[test]
    fn test_specific_permission_required_otherwise() {
        let bot = user("service", &["read:appointments", "write:appointments"]);
        assert!(bot.has_permission("write:appointments"));
        assert!(!bot.has_permission("write:professionals"));
    }
}
