use std::time::Duration;

use http::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::errors::{Call, FetchError, TransportError};
use crate::sources::endpoints::Endpoints;

/// HTTP client shared by the session manager and the balance fetcher.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    endpoints: Endpoints,
}

impl ApiClient {
    pub fn new(timeout: Duration, endpoints: Endpoints) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoints })
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub async fn get<R: DeserializeOwned>(
        &self,
        call: Call,
        url: &str,
        authorization: Option<&str>,
    ) -> Result<R, FetchError> {
        debug!(%call, url, "GET");
        self.send(call, self.client.get(url), authorization).await
    }

    /// POST `body` as JSON; reqwest sets `Content-Type: application/json`.
    pub async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        call: Call,
        url: &str,
        body: &B,
        authorization: Option<&str>,
    ) -> Result<R, FetchError> {
        debug!(%call, url, "POST");
        self.send(call, self.client.post(url).json(body), authorization).await
    }

    async fn send<R: DeserializeOwned>(
        &self,
        call: Call,
        mut request: RequestBuilder,
        authorization: Option<&str>,
    ) -> Result<R, FetchError> {
        request = request.header(ACCEPT, "application/json");
        if let Some(value) = authorization.filter(|value| !value.is_empty()) {
            request = request.header(AUTHORIZATION, value);
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::transport(call, TransportError::Send(e)))?;

        let status = response.status();
        if !status.is_success() {
            // drained so the connection can go back to the pool
            let _ = response.bytes().await;
            return Err(FetchError::transport(call, TransportError::Status(status)));
        }

        response
            .json::<R>()
            .await
            .map_err(|e| FetchError::transport(call, TransportError::Decode(e)))
    }
}
