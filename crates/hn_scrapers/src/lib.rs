pub mod scrapers;
pub mod cli;
pub mod enhance;
pub mod feed;
pub mod fetch;
pub mod graphql;
pub mod logging;
pub mod manager;

pub use cli::{handle_command, FeedArgs, FeedCommands, FeedContext};
pub use enhance::EnhancementTask;
pub use feed::{ArticleFeed, FeedStatus, LoadOutcome};
pub use fetch::{DocumentSource, GatewayClient};
pub use graphql::{GraphqlClient, TransactionSource};
pub use manager::MetadataManager;
pub use scrapers::{HackerNoonScraper, Scraper};

pub mod prelude {
    pub use super::feed::{ArticleFeed, FeedStatus, LoadOutcome};
    pub use super::manager::MetadataManager;
    pub use super::scrapers::Scraper;
    pub use hn_core::{Article, ArticleMetadata, Error, Result};
}
