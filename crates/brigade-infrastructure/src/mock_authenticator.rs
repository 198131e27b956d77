//! Static credential table for demos and offline development.

use brigade_core::error::{BrigadeError, Result};
use brigade_core::{Authenticator, Business, Credentials, RoleId, SessionSeed, User};
use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::time::Duration;

/// Password shared by every demo account.
pub const MOCK_PASSWORD: &str = "123";

const INVALID_CREDENTIALS: &str = "Invalid username or password";

static BUSINESS: Lazy<Business> = Lazy::new(|| Business {
    id: "biz-001".to_string(),
    name: "La Brigade".to_string(),
    address: Some("12 Rue du Marché".to_string()),
    phone: Some("+33 1 23 45 67 89".to_string()),
});

static ACCOUNTS: Lazy<HashMap<&'static str, User>> = Lazy::new(|| {
    [
        ("1", "admin", "Alice Admin", vec![RoleId::Admin]),
        ("2", "chef", "Carlos Chef", vec![RoleId::Chef]),
        ("3", "waiter", "Wendy Waiter", vec![RoleId::Waiter]),
        ("4", "cashier", "Cody Cashier", vec![RoleId::Cashier]),
        ("5", "manager", "Morgan Manager", vec![RoleId::Admin, RoleId::Cashier]),
        ("6", "all_roles", "Robin Allround", RoleId::all()),
    ]
    .into_iter()
    .map(|(id, username, full_name, roles)| {
        let user = User {
            id: id.to_string(),
            username: username.to_string(),
            full_name: full_name.to_string(),
            business_id: BUSINESS.id.clone(),
            roles: roles.into_iter().collect(),
        };
        (username, user)
    })
    .collect()
});

/// Authenticates against a fixed set of demo accounts.
///
/// | username    | roles                         |
/// |-------------|-------------------------------|
/// | `admin`     | admin                         |
/// | `chef`      | chef                          |
/// | `waiter`    | waiter                        |
/// | `cashier`   | cashier                       |
/// | `manager`   | admin, cashier                |
/// | `all_roles` | admin, chef, waiter, cashier  |
///
/// Every account uses [`MOCK_PASSWORD`]. Each successful login mints a fresh
/// `mock-<uuid>` token.
#[derive(Debug, Clone, Default)]
pub struct MockAuthenticator {
    latency: Duration,
}

impl MockAuthenticator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every verification, to mimic a network round trip.
    pub fn with_latency(latency: Duration) -> Self {
        Self { latency }
    }

    /// Usernames of the demo accounts, sorted.
    pub fn usernames() -> Vec<&'static str> {
        let mut names: Vec<_> = ACCOUNTS.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

#[async_trait::async_trait]
impl Authenticator for MockAuthenticator {
    async fn verify_credentials(&self, credentials: &Credentials) -> Result<SessionSeed> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let user = ACCOUNTS
            .get(credentials.username.trim())
            .filter(|_| credentials.password == MOCK_PASSWORD)
            .ok_or_else(|| {
                tracing::debug!(username = %credentials.username, "mock credentials rejected");
                BrigadeError::authentication(INVALID_CREDENTIALS)
            })?;

        Ok(SessionSeed {
            user: user.clone(),
            business: BUSINESS.clone(),
            token: format!("mock-{}", uuid::Uuid::new_v4()),
        })
    }

    async fn revoke(&self, token: &str) -> Result<()> {
        let token_prefix: String = token.chars().take(8).collect();
        tracing::debug!(%token_prefix, "mock token revoked");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_single_role_account() {
        let seed = MockAuthenticator::new()
            .verify_credentials(&Credentials::new("chef", "123"))
            .await
            .unwrap();

        assert_eq!(seed.user.username, "chef");
        assert_eq!(seed.user.sole_role(), Some(RoleId::Chef));
        assert_eq!(seed.business.id, "biz-001");
        assert_eq!(seed.user.business_id, seed.business.id);
        assert!(seed.token.starts_with("mock-"));
    }

    #[tokio::test]
    async fn test_multi_role_accounts() {
        let auth = MockAuthenticator::new();
        let manager = auth
            .verify_credentials(&Credentials::new("manager", "123"))
            .await
            .unwrap();
        assert_eq!(
            manager.user.roles.iter().copied().collect::<Vec<_>>(),
            vec![RoleId::Admin, RoleId::Cashier]
        );

        let all = auth
            .verify_credentials(&Credentials::new("all_roles", "123"))
            .await
            .unwrap();
        assert_eq!(all.user.roles.len(), 4);
    }

    #[tokio::test]
    async fn test_tokens_are_unique_per_login() {
        let auth = MockAuthenticator::new();
        let first = auth
            .verify_credentials(&Credentials::new("admin", "123"))
            .await
            .unwrap();
        let second = auth
            .verify_credentials(&Credentials::new("admin", "123"))
            .await
            .unwrap();
        assert_ne!(first.token, second.token);
    }

    #[tokio::test]
    async fn test_rejections() {
        let auth = MockAuthenticator::new();
        for (username, password) in [("admin", "wrong"), ("ghost", "123"), ("ADMIN", "123")] {
            let err = auth
                .verify_credentials(&Credentials::new(username, password))
                .await
                .unwrap_err();
            assert_eq!(err, BrigadeError::authentication("Invalid username or password"));
        }
    }

    #[test]
    fn test_usernames() {
        assert_eq!(
            MockAuthenticator::usernames(),
            vec!["admin", "all_roles", "cashier", "chef", "manager", "waiter"]
        );
    }
}
