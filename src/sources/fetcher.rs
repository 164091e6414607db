use serde::Deserialize;
use tracing::{debug, info};

use crate::errors::{Call, FetchError};
use crate::helpers::time::{Clock, SystemClock};
use crate::sources::request::ApiClient;
use crate::sources::session::{Credentials, SessionManager, SessionProvider};

/// One balance reading.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    pub site: String,
    pub balance: f64,
}

/// Site of the account and the balance URL derived from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteBinding {
    pub site: String,
    pub balance_url: String,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    #[serde(default)]
    sites: Vec<MeResponseSite>,
}

#[derive(Debug, Deserialize)]
struct MeResponseSite {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SoldeResponse {
    site_name: String,
    solde: f64,
}

pub struct BalanceFetcher<S = SessionManager, C = SystemClock> {
    client: ApiClient,
    session: S,
    clock: C,
    site: SiteBinding,
}

impl BalanceFetcher {
    /// Logs in and resolves the account site. Any failure here leaves no fetcher behind.
    pub async fn connect(
        client: ApiClient,
        credentials: Credentials,
        margin: std::time::Duration,
    ) -> Result<Self, FetchError> {
        let mut session = SessionManager::new(client.clone(), credentials, margin)?;
        session.login().await?;
        Self::with_session(client, session, SystemClock).await
    }
}

impl<S: SessionProvider, C: Clock> BalanceFetcher<S, C> {
    /// Builds a fetcher over an already authenticated session.
    pub async fn with_session(client: ApiClient, session: S, clock: C) -> Result<Self, FetchError> {
        let site = resolve_site(&client, &session).await?;
        Ok(Self {
            client,
            session,
            clock,
            site,
        })
    }

    pub fn site(&self) -> &SiteBinding {
        &self.site
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub async fn fetch(&mut self) -> Result<FetchResult, FetchError> {
        if !self.session.is_valid(self.clock.now()) {
            self.session.refresh().await?;
        }

        let bearer = self.session.bearer_header().ok_or(FetchError::NoSession)?;
        let response: SoldeResponse = self
            .client
            .get(Call::Balance, &self.site.balance_url, Some(bearer.as_str()))
            .await?;
        debug!(site = %response.site_name, solde = response.solde, "balance fetched");

        Ok(FetchResult {
            site: response.site_name,
            balance: response.solde,
        })
    }
}

/// Resolves the account site once; the binding is kept for the fetcher's lifetime.
pub async fn resolve_site<S: SessionProvider>(client: &ApiClient, session: &S) -> Result<SiteBinding, FetchError> {
    let bearer = session.bearer_header().ok_or(FetchError::NoSession)?;
    let url = client.endpoints().who_am_i();
    let response: MeResponse = client.get(Call::WhoAmI, &url, Some(bearer.as_str())).await?;

    let site = response
        .sites
        .into_iter()
        .next()
        .map(|site| site.name)
        .ok_or(FetchError::NoSite)?;
    info!("Got site {}", site);

    Ok(SiteBinding {
        balance_url: client.endpoints().balance(&site),
        site,
    })
}
