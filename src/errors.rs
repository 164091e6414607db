use std::fmt;

use http::StatusCode;

/// Upstream calls performed against the Timechef API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Authenticate,
    Refresh,
    WhoAmI,
    Balance,
}

impl Call {
    pub fn as_str(&self) -> &'static str {
        match self {
            Call::Authenticate => "authenticate",
            Call::Refresh => "refresh",
            Call::WhoAmI => "who_am_i",
            Call::Balance => "balance",
        }
    }
}

impl fmt::Display for Call {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of a single HTTP exchange.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request failed: {0}")]
    Send(#[source] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("undecodable response body: {0}")]
    Decode(#[source] reqwest::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("{call} call failed: {source}")]
    Transport {
        call: Call,
        #[source]
        source: TransportError,
    },
    #[error("invalid token expiry {value:?}: {source}")]
    TimestampParse {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    /// Refresh (or an authenticated call) attempted before any login.
    #[error("no session: login has not succeeded yet")]
    NoSession,
    #[error("no site attached to the account")]
    NoSite,
    #[error("refresh margin {0:?} is out of range")]
    InvalidMargin(std::time::Duration),
}

impl FetchError {
    pub fn transport(call: Call, source: TransportError) -> Self {
        FetchError::Transport { call, source }
    }

    /// Stable label used for the failure counter.
    pub fn reason(&self) -> &'static str {
        match self {
            FetchError::Transport { call, .. } => call.as_str(),
            FetchError::TimestampParse { .. } => "timestamp",
            FetchError::NoSession => "no_session",
            FetchError::NoSite => "no_site",
            FetchError::InvalidMargin(_) => "margin",
        }
    }

    /// True when the failure comes from the OAuth exchange itself.
    pub fn is_auth(&self) -> bool {
        matches!(
            self,
            FetchError::Transport { call: Call::Authenticate | Call::Refresh, .. }
                | FetchError::TimestampParse { .. }
                | FetchError::NoSession
        )
    }
}
