/// Sources module
///
/// Timechef API access: endpoint URLs, the JSON request helper,
/// the OAuth session lifecycle and the balance fetcher built on top of it.

pub mod endpoints;
pub mod fetcher;
pub mod request;
pub mod session;

pub use fetcher::{BalanceFetcher, FetchResult, SiteBinding};
pub use session::{Credentials, Session, SessionManager, SessionProvider};
