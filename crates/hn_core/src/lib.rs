pub mod config;
pub mod display;
pub mod error;
pub mod gateway;
pub mod models;
pub mod search;
pub mod storage;
pub mod transform;
pub mod types;

pub use config::FeedConfig;
pub use display::ArticleView;
pub use error::Error;
pub use gateway::{resolve_gateway_url, GatewayResolver};
pub use models::ArticleMetadata;
pub use search::{filter_articles, MetadataSnapshot};
pub use storage::MetadataStore;
pub use types::{Article, ArweaveTag, PageInfo, RawTransaction, TransactionEdge, TransactionPage};

pub type Result<T> = std::result::Result<T, Error>;
