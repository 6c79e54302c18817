use log::debug;

use crate::diffuser::Diffuser;
use crate::error::{Error, Result};
use crate::models::{DeviceSnapshot, LoginResponse};
use crate::session;
use crate::{ACCOUNT_URL, AUTH_URL};

/// A Rituals user account: owns the credentials and, once authenticated,
/// the opaque hash that the device-listing endpoint keys on.
pub struct Account {
    email: String,
    password: String,
    account_hash: String,
    data: Option<LoginResponse>,
    session: Option<reqwest::Client>,
}

impl Account {
    /// Create an account from credentials. The session, if given, becomes
    /// the default transport for every call on this account and on the
    /// diffusers it discovers.
    pub fn new(
        email: impl Into<String>,
        password: impl Into<String>,
        session: Option<reqwest::Client>,
    ) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            account_hash: String::new(),
            data: None,
            session,
        }
    }

    /// Create an account from a previously obtained account hash, skipping
    /// authentication entirely.
    pub fn with_account_hash(
        account_hash: impl Into<String>,
        session: Option<reqwest::Client>,
    ) -> Self {
        Self {
            email: String::new(),
            password: String::new(),
            account_hash: account_hash.into(),
            data: None,
            session,
        }
    }

    /// The account email. After a successful [`authenticate`](Self::authenticate)
    /// this is the server's canonical form, which may differ in case from
    /// what was supplied.
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Opaque account identifier; empty until authenticated unless it was
    /// supplied at construction.
    pub fn account_hash(&self) -> &str {
        &self.account_hash
    }

    /// The last parsed login response, if any.
    pub fn data(&self) -> Option<&LoginResponse> {
        self.data.as_ref()
    }

    /// Authenticate with the stored session and the default login endpoint.
    pub async fn authenticate(&mut self) -> Result<()> {
        self.authenticate_with(None, None).await
    }

    /// Authenticate, optionally overriding the session and endpoint.
    ///
    /// A non-2xx response surfaces as [`Error::Http`]. A 2xx response whose
    /// `logged_id` is not 1 surfaces as [`Error::Auth`] with the server's
    /// message, and leaves the account untouched.
    pub async fn authenticate_with(
        &mut self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<()> {
        let session = session::resolve(session, self.session.as_ref())?;
        let url = url.unwrap_or(AUTH_URL);

        debug!("Authenticating account: {}", self.email);

        let params = [
            ("email", self.email.as_str()),
            ("password", self.password.as_str()),
        ];
        let response = session
            .post(url)
            .form(&params)
            .send()
            .await?
            .error_for_status()?;

        let response_text = response.text().await?;
        let login: LoginResponse = serde_json::from_str(&response_text)?;

        if login.logged_id != 1 {
            let message = login
                .error
                .unwrap_or_else(|| "login rejected by server".to_string());
            debug!("Authentication rejected: {}", message);
            return Err(Error::Auth(message));
        }

        // Both canonical values must be present before any state is committed.
        let account_hash = login
            .account_hash
            .clone()
            .ok_or_else(|| Error::Snapshot("login response missing account_hash".to_string()))?;
        let email = login
            .email
            .clone()
            .ok_or_else(|| Error::Snapshot("login response missing email".to_string()))?;

        self.account_hash = account_hash;
        self.email = email;
        self.data = Some(login);

        debug!("Authentication successful for {}", self.email);
        Ok(())
    }

    /// List every diffuser linked to this account, using the stored session
    /// and the default listing endpoint.
    pub async fn get_devices(&self) -> Result<Vec<Diffuser>> {
        self.get_devices_with(None, None).await
    }

    /// List every diffuser linked to this account.
    ///
    /// Devices come back in server order, each carrying its full snapshot
    /// and a handle to the resolved session for later calls. An empty
    /// account hash is not checked here; the server rejects it and the
    /// rejection surfaces as [`Error::Http`].
    pub async fn get_devices_with(
        &self,
        session: Option<&reqwest::Client>,
        url: Option<&str>,
    ) -> Result<Vec<Diffuser>> {
        let session = session::resolve(session, self.session.as_ref())?;
        let url = format!("{}/{}", url.unwrap_or(ACCOUNT_URL), self.account_hash);

        debug!("Fetching devices for account hash {}", self.account_hash);

        let response = session.get(&url).send().await?.error_for_status()?;
        let response_text = response.text().await?;
        let snapshots: Vec<DeviceSnapshot> = serde_json::from_str(&response_text)?;

        debug!("Found {} devices", snapshots.len());

        Ok(snapshots
            .into_iter()
            .map(|data| Diffuser::new(data, Some(session.clone())))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_creation() {
        let account = Account::new("user@example.com", "hunter2", None);
        assert_eq!(account.email(), "user@example.com");
        assert_eq!(account.account_hash(), "");
        assert!(account.data().is_none());
    }

    #[test]
    fn test_account_from_hash() {
        let account = Account::with_account_hash("deadbeef", None);
        assert_eq!(account.account_hash(), "deadbeef");
        assert_eq!(account.email(), "");
        assert!(account.data().is_none());
    }
}
