//! Identity records handed out by the authentication backend.

use crate::error::{BrigadeError, Result};
use crate::role::RoleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// A staff member and the roles they may act under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub full_name: String,
    pub business_id: String,
    pub roles: BTreeSet<RoleId>,
}

impl User {
    pub fn has_role(&self, role: RoleId) -> bool {
        self.roles.contains(&role)
    }

    /// The only granted role, when exactly one is granted.
    pub fn sole_role(&self) -> Option<RoleId> {
        if self.roles.len() == 1 {
            self.roles.iter().next().copied()
        } else {
            None
        }
    }
}

/// The restaurant (tenant) a user works for. Read-only to the session core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Username/password pair submitted on the login screen.
#[derive(Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Rejects blank fields before any lookup happens.
    pub fn validate(&self) -> Result<()> {
        if self.username.trim().is_empty() {
            return Err(BrigadeError::validation("Username is required"));
        }
        if self.password.is_empty() {
            return Err(BrigadeError::validation("Password is required"));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// What a successful credential check yields: the user, their business and
/// an opaque token. The three always travel together, which is what keeps
/// "token present iff user present" true inside the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSeed {
    pub user: User,
    pub business: Business,
    pub token: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with(roles: &[RoleId]) -> User {
        User {
            id: "u-1".to_string(),
            username: "sam".to_string(),
            full_name: "Sam Porter".to_string(),
            business_id: "biz-001".to_string(),
            roles: roles.iter().copied().collect(),
        }
    }

    #[test]
    fn test_sole_role() {
        assert_eq!(user_with(&[RoleId::Chef]).sole_role(), Some(RoleId::Chef));
        assert_eq!(user_with(&[RoleId::Chef, RoleId::Waiter]).sole_role(), None);
        assert_eq!(user_with(&[]).sole_role(), None);
    }

    #[test]
    fn test_user_json_shape() {
        let user = user_with(&[RoleId::Waiter, RoleId::Admin]);
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(value["full_name"], "Sam Porter");
        assert_eq!(value["business_id"], "biz-001");
        assert_eq!(value["roles"], serde_json::json!(["admin", "waiter"]));
    }

    #[test]
    fn test_duplicate_roles_collapse() {
        let json = r#"{"id":"u-1","username":"sam","full_name":"Sam","business_id":"b",
            "roles":["chef","chef"]}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.sole_role(), Some(RoleId::Chef));
    }

    #[test]
    fn test_validate_credentials() {
        assert!(Credentials::new("admin", "123").validate().is_ok());
        assert!(Credentials::new("", "123").validate().unwrap_err().is_validation());
        assert!(Credentials::new("   ", "123").validate().unwrap_err().is_validation());
        assert!(Credentials::new("admin", "").validate().unwrap_err().is_validation());
    }

    #[test]
    fn test_debug_redacts_password() {
        let rendered = format!("{:?}", Credentials::new("admin", "hunter2"));
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
