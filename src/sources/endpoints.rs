pub const DEFAULT_BASE_URL: &str = "https://timechef.elior.com";

/// URLs of the Timechef API calls, rooted at a configurable base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl Endpoints {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
        }
    }

    // POST
    pub fn authenticate(&self) -> String {
        format!("{}/api/oauth/?scope=timechef", self.base_url)
    }

    // POST
    pub fn refresh(&self) -> String {
        format!("{}/api/oauth/refresh", self.base_url)
    }

    // GET
    pub fn who_am_i(&self) -> String {
        format!("{}/api/oauth/me", self.base_url)
    }

    // GET
    pub fn balance(&self, site: &str) -> String {
        format!("{}/api/convive/{}/solde", self.base_url, site)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn urls_match_upstream_layout() {
        let endpoints = Endpoints::new("http://127.0.0.1:8080/");
        assert_eq!(endpoints.authenticate(), "http://127.0.0.1:8080/api/oauth/?scope=timechef");
        assert_eq!(endpoints.refresh(), "http://127.0.0.1:8080/api/oauth/refresh");
        assert_eq!(endpoints.who_am_i(), "http://127.0.0.1:8080/api/oauth/me");
        assert_eq!(endpoints.balance("ABC123"), "http://127.0.0.1:8080/api/convive/ABC123/solde");
        assert_eq!(Endpoints::default().who_am_i(), "https://timechef.elior.com/api/oauth/me");
    }
}
