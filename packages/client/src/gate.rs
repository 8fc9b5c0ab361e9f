use common::User;
use tracing::{debug, info, instrument};

use crate::api::ApiClient;
use crate::error::ClientError;

/// Outcome of the admin-area access check.
#[derive(Debug, Clone, PartialEq)]
pub enum Access {
    Granted(User),
    /// No usable session. Show the login screen.
    RedirectToLogin,
    /// Signed in, but not as an administrator.
    RedirectHome,
}

/// Decide whether the current session may enter the admin area.
///
/// Without a stored token nothing is sent. A token the backend rejects is
/// cleared and the caller is sent to login. Any other failure is returned
/// as an error with the token kept, so an unreachable backend is not
/// reported as a missing session.
#[instrument(skip(api))]
pub async fn check(api: &ApiClient) -> Result<Access, ClientError> {
    if !api.has_token()? {
        debug!("No session token");
        return Ok(Access::RedirectToLogin);
    }

    match api.me().await {
        Ok(user) if user.is_admin => {
            debug!(username = %user.username, "Admin session");
            Ok(Access::Granted(user))
        }
        Ok(user) => {
            info!(username = %user.username, "Non-admin session kept out of admin area");
            Ok(Access::RedirectHome)
        }
        Err(err) if err.is_auth_failure() => {
            info!("Session token rejected, clearing it");
            api.logout()?;
            Ok(Access::RedirectToLogin)
        }
        Err(err) => {
            debug!(error = %err, "Profile check failed");
            Err(err)
        }
    }
}
