//! Sign-in and sign-out with the persisted logged-in flag

use foodigram_storage::{KeyValueStore, IS_LOGGED_IN, SESSION_COOKIES};
use tracing::{debug, info, warn};

use crate::{Result, SessionClient, User};

/// Runs the auth sequences against the backend and records the outcome in
/// durable storage.
///
/// Besides the logged-in flag the session cookies are stored too, so a
/// later process can [`AuthFlow::resume`] without signing in again.
pub struct AuthFlow<S: KeyValueStore> {
    client: SessionClient,
    storage: S,
}

impl<S: KeyValueStore> AuthFlow<S> {
    pub fn new(client: SessionClient, storage: S) -> Self {
        Self { client, storage }
    }

    pub fn client(&self) -> &SessionClient {
        &self.client
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn into_storage(self) -> S {
        self.storage
    }

    /// Fetch CSRF, log in, then set the logged-in flag.
    ///
    /// The flag is written only after the backend accepted the credentials.
    pub async fn sign_in(&mut self, username: &str, password: &str) -> Result<User> {
        self.client.get_csrf().await?;
        let user = self.client.login(username, password).await?;
        self.storage.save_string(IS_LOGGED_IN, "true")?;
        self.save_cookies()?;
        info!(username = %user.username, "signed in");
        Ok(user)
    }

    /// Log out, then clear the logged-in flag.
    ///
    /// The flag is cleared even when the backend refuses, so the device never
    /// stays signed in on its own. The backend's error is still returned.
    pub async fn sign_out(&mut self) -> Result<()> {
        let outcome = self.client.logout().await;
        self.storage.remove(IS_LOGGED_IN)?;
        self.storage.remove(SESSION_COOKIES)?;

        match outcome {
            Ok(()) => {
                info!("signed out");
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "logout failed, local flag cleared anyway");
                Err(e)
            }
        }
    }

    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.storage.load_string(IS_LOGGED_IN)?.as_deref() == Some("true"))
    }

    /// Load stored session cookies into the client. Returns false when not
    /// signed in or when nothing was stored.
    pub fn resume(&self) -> Result<bool> {
        if !self.is_signed_in()? {
            return Ok(false);
        }
        match self.storage.load_string(SESSION_COOKIES)? {
            Some(cookies) => {
                self.client.import_cookies(&cookies);
                debug!("session resumed");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Store the client's current cookies; the backend may have refreshed them
    pub fn save_cookies(&mut self) -> Result<()> {
        if let Some(cookies) = self.client.export_cookies() {
            self.storage.save_string(SESSION_COOKIES, &cookies)?;
        }
        Ok(())
    }
}
