// tests/common/mod.rs
pub use axum::Router;
pub use serde_json::json;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, Utc};
use http::StatusCode;
use httpmock::Method::{GET, POST};
use httpmock::{Mock, MockServer};

use crate::errors::{Call, FetchError, TransportError};
use crate::helpers::time::Clock;
use crate::sources::endpoints::Endpoints;
use crate::sources::request::ApiClient;
use crate::sources::session::{Credentials, SessionProvider};

pub const USER: &str = "jane";
pub const PASSWORD: &str = "secret";
pub const EXPIRES: &str = "2024-01-01T10:00:00.0000000Z";
pub const MARGIN: Duration = Duration::from_secs(10);

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn api_client(server: &MockServer) -> ApiClient {
    ApiClient::new(Duration::from_secs(5), Endpoints::new(&server.base_url())).expect("reqwest client")
}

pub fn credentials() -> Credentials {
    Credentials::new(USER, PASSWORD)
}

pub fn utc(value: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(value).unwrap().with_timezone(&Utc)
}

pub async fn mock_login<'a>(server: &'a MockServer, access_token: &str, expires: &str) -> Mock<'a> {
    let body = json!({"accessToken": access_token, "expires": expires, "refreshToken": "refresh-1"});
    server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/oauth/")
                .query_param("scope", "timechef")
                .json_body(json!({"authType": "", "username": USER, "password": PASSWORD}));
            then.status(200).json_body(body);
        })
        .await
}

pub async fn mock_me<'a>(server: &'a MockServer, sites: &[&str]) -> Mock<'a> {
    let sites: Vec<_> = sites.iter().map(|name| json!({"name": name})).collect();
    server
        .mock_async(|when, then| {
            when.method(GET).path("/api/oauth/me");
            then.status(200).json_body(json!({ "sites": sites }));
        })
        .await
}

pub async fn mock_balance<'a>(server: &'a MockServer, site: &str, solde: f64) -> Mock<'a> {
    let path = format!("/api/convive/{}/solde", site);
    server
        .mock_async(|when, then| {
            when.method(GET).path(path);
            then.status(200).json_body(json!({"siteName": site, "solde": solde}));
        })
        .await
}

/// Clock whose time only moves when a test says so.
#[derive(Debug, Clone)]
pub struct ManualClock(Arc<Mutex<DateTime<Utc>>>);

impl ManualClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self(Arc::new(Mutex::new(now)))
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

/// In-memory session double: no network, scripted refresh outcome.
#[derive(Debug)]
pub struct FakeSession {
    pub valid_until: DateTime<Utc>,
    pub token: String,
    pub refresh_succeeds: bool,
    pub refreshes: usize,
}

impl FakeSession {
    pub fn valid_until(valid_until: DateTime<Utc>) -> Self {
        Self {
            valid_until,
            token: "initial".into(),
            refresh_succeeds: true,
            refreshes: 0,
        }
    }
}

impl SessionProvider for FakeSession {
    fn is_valid(&self, now: DateTime<Utc>) -> bool {
        now < self.valid_until
    }

    async fn refresh(&mut self) -> Result<(), FetchError> {
        self.refreshes += 1;
        if !self.refresh_succeeds {
            return Err(FetchError::transport(
                Call::Refresh,
                TransportError::Status(StatusCode::UNAUTHORIZED),
            ));
        }
        self.valid_until = DateTime::<Utc>::MAX_UTC;
        self.token = format!("refreshed-{}", self.refreshes);
        Ok(())
    }

    fn bearer_header(&self) -> Option<String> {
        Some(format!("Bearer {}", self.token))
    }
}
