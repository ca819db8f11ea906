//! Cookie-session HTTP client

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, info, warn};
use url::Url;

use crate::{Follow, Profile, Result, SessionError, User, UserId};

/// Header the backend reads the CSRF token from
pub const CSRF_HEADER: &str = "X-CSRFToken";

#[derive(Debug, Deserialize)]
struct CsrfResponse {
    #[serde(rename = "csrfToken")]
    csrf_token: String,
}

#[derive(Debug, Deserialize)]
struct DetailBody {
    detail: String,
}

/// Client for the foodigram backend.
///
/// Cookies (session, csrftoken) live in a shared jar that can be exported
/// and re-imported across processes.
/// The CSRF token is held separately and attached to every mutating request.
/// Login, logout and CSRF refresh are serialized so one auth flow finishes
/// its cookie writes before the next starts.
#[derive(Debug, Clone)]
pub struct SessionClient {
    base: Url,
    http: reqwest::Client,
    jar: Arc<Jar>,
    csrf: Arc<RwLock<Option<String>>>,
    auth: Arc<Mutex<()>>,
}

impl SessionClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base = Url::parse(base_url)?;
        // so relative joins append instead of replacing the last segment
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let jar = Arc::new(Jar::default());
        let http = reqwest::Client::builder()
            .cookie_provider(Arc::clone(&jar))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base,
            http,
            jar,
            csrf: Arc::new(RwLock::new(None)),
            auth: Arc::new(Mutex::new(())),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// The CSRF token currently held, if any
    pub async fn csrf_token(&self) -> Option<String> {
        self.csrf.read().await.clone()
    }

    /// Cookies the backend set for the base URL, as a `Cookie` header value
    pub fn export_cookies(&self) -> Option<String> {
        self.jar
            .cookies(&self.base)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }

    /// Load cookies previously captured with [`SessionClient::export_cookies`]
    pub fn import_cookies(&self, header: &str) {
        for pair in header.split(';').map(str::trim).filter(|p| !p.is_empty()) {
            self.jar.add_cookie_str(pair, &self.base);
        }
        debug!("session cookies imported");
    }

    // ============== Auth ==============

    /// Fetch a CSRF token and hold it for subsequent mutating calls
    pub async fn get_csrf(&self) -> Result<String> {
        let _guard = self.auth.lock().await;
        self.fetch_csrf().await
    }

    /// Log in with the held CSRF token. Fails with
    /// [`SessionError::MissingCsrf`] without sending anything if none is held.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let _guard = self.auth.lock().await;

        if self.csrf.read().await.is_none() {
            warn!("login attempted without a CSRF token");
            return Err(SessionError::MissingCsrf);
        }

        let request = self
            .request(Method::POST, "auth/login/")
            .await?
            .json(&json!({ "username": username, "password": password }));
        let user: User = decode(&send(request).await?)?;

        // the backend rotates the token on login
        self.csrf.write().await.take();

        info!(user_id = user.id, username = %user.username, "logged in");
        Ok(user)
    }

    /// Log out, fetching a CSRF token first if none is held
    pub async fn logout(&self) -> Result<()> {
        let _guard = self.auth.lock().await;

        if self.csrf.read().await.is_none() {
            self.fetch_csrf().await?;
        }

        let request = self.request(Method::POST, "auth/logout/").await?;
        send(request).await?;

        self.csrf.write().await.take();
        info!("logged out");
        Ok(())
    }

    // ============== Profile ==============

    pub async fn me(&self) -> Result<User> {
        let request = self.request(Method::GET, "me/").await?;
        decode(&send(request).await?)
    }

    /// Merge `patch` into the signed-in user's preferences
    pub async fn update_preferences(&self, patch: &serde_json::Value) -> Result<Profile> {
        let token = self.ensure_csrf().await?;
        let request = self
            .mutation(Method::PATCH, "me/preferences/", &token)?
            .json(patch);
        decode(&send(request).await?)
    }

    // ============== Social graph ==============

    pub async fn followers(&self, user_id: UserId) -> Result<Vec<User>> {
        let request = self
            .request(Method::GET, &format!("users/{user_id}/followers/"))
            .await?;
        decode(&send(request).await?)
    }

    pub async fn followings(&self, user_id: UserId) -> Result<Vec<User>> {
        let request = self
            .request(Method::GET, &format!("users/{user_id}/followings/"))
            .await?;
        decode(&send(request).await?)
    }

    pub async fn follow_suggestions(&self, limit: u32) -> Result<Vec<User>> {
        let request = self
            .request(Method::GET, "suggestions/")
            .await?
            .query(&[("limit", limit)]);
        decode(&send(request).await?)
    }

    /// Ask to follow `following_id`; the edge starts out requested
    pub async fn request_follow(&self, following_id: UserId) -> Result<Follow> {
        let token = self.ensure_csrf().await?;
        let request = self
            .mutation(Method::POST, "follows/request/", &token)?
            .json(&json!({ "following_id": following_id }));
        decode(&send(request).await?)
    }

    /// Accept a pending request from `follower_id`
    pub async fn accept_follow(&self, follower_id: UserId) -> Result<Follow> {
        let token = self.ensure_csrf().await?;
        let request = self
            .mutation(Method::POST, "follows/accept/", &token)?
            .json(&json!({ "follower_id": follower_id }));
        decode(&send(request).await?)
    }

    pub async fn unfollow(&self, following_id: UserId) -> Result<()> {
        let token = self.ensure_csrf().await?;
        let request = self
            .mutation(Method::POST, "follows/unfollow/", &token)?
            .json(&json!({ "following_id": following_id }));
        send(request).await?;
        Ok(())
    }

    // ============== Internals ==============

    /// Caller must hold the auth lock
    async fn fetch_csrf(&self) -> Result<String> {
        let request = self.request(Method::GET, "auth/csrf/").await?;
        let body: CsrfResponse = decode(&send(request).await?)?;

        *self.csrf.write().await = Some(body.csrf_token.clone());
        debug!("csrf token refreshed");
        Ok(body.csrf_token)
    }

    /// The held token, fetched first if none is held. The value is taken
    /// under the auth lock so a concurrent login cannot clear it in between.
    async fn ensure_csrf(&self) -> Result<String> {
        let _guard = self.auth.lock().await;
        if let Some(token) = self.csrf.read().await.clone() {
            return Ok(token);
        }
        self.fetch_csrf().await
    }

    fn mutation(&self, method: Method, path: &str, token: &str) -> Result<RequestBuilder> {
        Ok(self.builder(method, path)?.header(CSRF_HEADER, token))
    }

    /// Mutating methods read the held token and refuse to go out without one
    async fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if method == Method::GET {
            return self.builder(method, path);
        }
        match self.csrf.read().await.as_deref() {
            Some(token) => self.mutation(method, path, token),
            None => {
                warn!(%method, path, "mutating request without a CSRF token");
                Err(SessionError::MissingCsrf)
            }
        }
    }

    fn builder(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base.join(path)?;
        debug!(%method, %url, "request");
        Ok(self
            .http
            .request(method, url)
            .header(ACCEPT, "application/json"))
    }
}

/// Send a request and return the body of a successful response
async fn send(request: RequestBuilder) -> Result<String> {
    let response = request.send().await?;
    let status = response.status();
    let body = response.text().await?;

    if status.is_success() {
        Ok(body)
    } else {
        warn!(status = status.as_u16(), "request rejected");
        Err(rejection(status, &body))
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T> {
    Ok(serde_json::from_str(body)?)
}

/// Pull a readable reason out of an error body: the `detail` field if there
/// is one, otherwise the status text
fn rejection(status: StatusCode, body: &str) -> SessionError {
    let detail = serde_json::from_str::<DetailBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| status.canonical_reason().unwrap_or_default().to_string());

    SessionError::Rejected {
        status: status.as_u16(),
        detail,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = SessionClient::new("http://localhost:8000/api", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8000/api/");
        assert_eq!(
            client.base_url().join("me/").unwrap().as_str(),
            "http://localhost:8000/api/me/"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = SessionClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(SessionError::InvalidUrl(_))));
    }

    #[test]
    fn test_rejection_reads_detail() {
        let err = rejection(StatusCode::BAD_REQUEST, r#"{"detail": "Invalid credentials"}"#);
        assert!(matches!(
            err,
            SessionError::Rejected { status: 400, ref detail } if detail == "Invalid credentials"
        ));
    }

    #[test]
    fn test_rejection_falls_back_to_status_text() {
        let err = rejection(StatusCode::FORBIDDEN, "<html>CSRF verification failed</html>");
        assert_eq!(err.user_message(), "Forbidden");
    }

    #[test]
    fn test_cookie_import_export() {
        let client = SessionClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        assert!(client.export_cookies().is_none());

        client.import_cookies("sessionid=abc; csrftoken=xyz");
        let exported = client.export_cookies().unwrap();
        assert!(exported.contains("sessionid=abc"));
        assert!(exported.contains("csrftoken=xyz"));
    }

    #[tokio::test]
    async fn test_fresh_client_holds_no_token() {
        let client = SessionClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        assert!(client.csrf_token().await.is_none());
    }

    #[tokio::test]
    async fn test_mutating_request_needs_token() {
        let client = SessionClient::new("http://localhost:8000", Duration::from_secs(5)).unwrap();
        assert!(client.request(Method::GET, "me/").await.is_ok());
        assert!(matches!(
            client.request(Method::PATCH, "me/preferences/").await,
            Err(SessionError::MissingCsrf)
        ));
        assert!(matches!(
            client.request(Method::POST, "follows/unfollow/").await,
            Err(SessionError::MissingCsrf)
        ));
    }
}
