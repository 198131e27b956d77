//! Authentication collaborator trait.

use crate::error::Result;
use crate::user::{Credentials, SessionSeed};
use async_trait::async_trait;

/// Verifies credentials on behalf of the session manager.
///
/// The manager only relies on this contract: given credentials, produce a
/// [`SessionSeed`] or a rejection. Whether that is a REST call or a static
/// table is up to the implementation.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Returns the user, business and token for valid credentials.
    ///
    /// Rejections should be `BrigadeError::Authentication` with a message
    /// suitable for the login screen.
    async fn verify_credentials(&self, credentials: &Credentials) -> Result<SessionSeed>;

    /// Tells the backend a token is void. Called in the background on logout;
    /// failures are logged and never reach the caller.
    async fn revoke(&self, _token: &str) -> Result<()> {
        Ok(())
    }
}
