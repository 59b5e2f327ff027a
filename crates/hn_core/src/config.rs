use std::time::Duration;

pub const DEFAULT_GRAPHQL_ENDPOINT: &str = "https://arweave.net/graphql";
pub const HACKERNOON_WALLET: &str = "X8se6ANj4C-gpP_JH0ZbtJJEpyHBr0XQA-crCpbZGak";
pub const ARTICLES_PER_PAGE: usize = 100;
/// Enough of a HackerNoon page to cover `<head>` and the lead of the article.
pub const METADATA_BYTE_LIMIT: usize = 51_200;
pub const MAX_CONCURRENT_FETCHES: usize = 3;
pub const ENHANCE_DELAY: Duration = Duration::from_millis(500);

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub endpoint: String,
    pub owner: String,
    pub page_size: usize,
    /// Host the application is served from; drives gateway resolution.
    pub host: String,
    pub byte_limit: usize,
    pub max_concurrent: usize,
    pub enhance_delay: Duration,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GRAPHQL_ENDPOINT.to_string(),
            owner: HACKERNOON_WALLET.to_string(),
            page_size: ARTICLES_PER_PAGE,
            host: "localhost".to_string(),
            byte_limit: METADATA_BYTE_LIMIT,
            max_concurrent: MAX_CONCURRENT_FETCHES,
            enhance_delay: ENHANCE_DELAY,
        }
    }
}

impl FeedConfig {
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = owner.into();
        self
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.max_concurrent = max_concurrent.max(1);
        self
    }

    pub fn with_enhance_delay(mut self, delay: Duration) -> Self {
        self.enhance_delay = delay;
        self
    }

    pub fn resolver(&self) -> crate::GatewayResolver {
        crate::GatewayResolver::new(self.host.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_and_builders() {
        let config = FeedConfig::default();
        assert_eq!(config.page_size, 100);
        assert_eq!(config.byte_limit, 51_200);
        assert_eq!(config.enhance_delay, Duration::from_millis(500));

        let config = config
            .with_page_size(0)
            .with_max_concurrent(0)
            .with_enhance_delay(Duration::ZERO)
            .with_host("hackernoon.ar.io");
        assert_eq!(config.page_size, 1);
        assert_eq!(config.max_concurrent, 1);
        assert_eq!(config.enhance_delay, Duration::ZERO);
        assert_eq!(config.resolver().resolve("tx"), "https://arweave.net/tx");
    }
}
