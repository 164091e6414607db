use std::fmt;
use std::future::Future;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::{Call, FetchError};
use crate::helpers::time::{parse_expires, to_time_delta};
use crate::sources::request::ApiClient;

/// Value sent upstream as `Authorization` on refresh calls.
const REFRESH_AUTHORIZATION: &str = "null";

#[derive(Clone)]
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
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Token triple obtained from a login or a refresh. Always replaced as a whole.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// server expiry minus the refresh margin
    pub effective_expiry: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRequest<'a> {
    pub auth_type: &'a str,
    pub username: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthRefreshRequest<'a> {
    pub refresh_token: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OAuthResponse {
    pub access_token: String,
    pub expires: String,
    pub refresh_token: String,
}

/// What the balance fetcher needs from a session holder.
pub trait SessionProvider: Send {
    /// True iff a session exists and `now` is strictly before its effective expiry.
    fn is_valid(&self, now: DateTime<Utc>) -> bool;

    fn refresh(&mut self) -> impl Future<Output = Result<(), FetchError>> + Send;

    /// `Authorization` header value, `None` before the first login.
    fn bearer_header(&self) -> Option<String>;
}

#[derive(Debug)]
pub struct SessionManager {
    client: ApiClient,
    credentials: Credentials,
    margin: TimeDelta,
    session: Option<Session>,
}

impl SessionManager {
    pub fn new(client: ApiClient, credentials: Credentials, margin: std::time::Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client,
            credentials,
            margin: to_time_delta(margin)?,
            session: None,
        })
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub async fn login(&mut self) -> Result<&Session, FetchError> {
        info!("Authenticate using {}", self.credentials.username);

        let request = OAuthRequest {
            auth_type: "",
            username: &self.credentials.username,
            password: &self.credentials.password,
        };
        let url = self.client.endpoints().authenticate();
        let response: OAuthResponse = self.client.post(Call::Authenticate, &url, &request, None).await?;
        self.replace_session(response)
    }

    async fn refresh_session(&mut self) -> Result<&Session, FetchError> {
        info!("Refresh token");

        let current = self.session.as_ref().ok_or(FetchError::NoSession)?;
        let request = OAuthRefreshRequest {
            refresh_token: &current.refresh_token,
        };
        let url = self.client.endpoints().refresh();
        let response: OAuthResponse = self
            .client
            .post(Call::Refresh, &url, &request, Some(REFRESH_AUTHORIZATION))
            .await?;
        self.replace_session(response)
    }

    /// Builds the new session before touching the stored one, so a bad
    /// response leaves the previous session in place.
    fn replace_session(&mut self, response: OAuthResponse) -> Result<&Session, FetchError> {
        let session = session_from_response(response, self.margin)?;
        info!("Got token. Refresh after: {}", session.effective_expiry);
        Ok(&*self.session.insert(session))
    }
}

pub fn session_from_response(response: OAuthResponse, margin: TimeDelta) -> Result<Session, FetchError> {
    let expires = parse_expires(&response.expires)?;
    Ok(Session {
        access_token: response.access_token,
        refresh_token: response.refresh_token,
        effective_expiry: expires - margin,
    })
}

impl SessionProvider for SessionManager {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| now < session.effective_expiry)
    }

    async fn refresh(&mut self) -> Result<(), FetchError> {
        self.refresh_session().await.map(|_| ())
    }

    fn bearer_header(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| format!("Bearer {}", session.access_token))
    }
}
