use clap::Parser;
use hn_core::config::{
    ARTICLES_PER_PAGE, DEFAULT_GRAPHQL_ENDPOINT, ENHANCE_DELAY, HACKERNOON_WALLET, MAX_CONCURRENT_FETCHES,
};
use hn_core::{FeedConfig, GatewayResolver, Result};
use hn_scrapers::cli::{handle_command, FeedArgs, FeedCommands, FeedContext};
use hn_scrapers::logging::init_logging;
use hn_scrapers::{ArticleFeed, GatewayClient, GraphqlClient, MetadataManager};
use hn_storage::ThemeStore;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(author, version, about = "Browse HackerNoon articles published on Arweave", long_about = None)]
pub struct Cli {
    /// Arweave GraphQL endpoint
    #[arg(long, default_value = DEFAULT_GRAPHQL_ENDPOINT)]
    endpoint: String,
    /// Wallet whose transactions make up the feed
    #[arg(long, default_value = HACKERNOON_WALLET)]
    owner: String,
    /// Host the app is served from, used to pick the article gateway
    #[arg(long, default_value = "localhost", conflicts_with = "origin")]
    host: String,
    /// Full origin URL, e.g. https://hackernoon.ar.io
    #[arg(long)]
    origin: Option<String>,
    #[arg(long, default_value_t = ARTICLES_PER_PAGE)]
    page_size: usize,
    /// Article pages fetched at once when enhancing
    #[arg(long, default_value_t = MAX_CONCURRENT_FETCHES)]
    concurrency: usize,
    /// Delay before `meta` starts fetching, in milliseconds
    #[arg(long, default_value_t = ENHANCE_DELAY.as_millis() as u64)]
    enhance_delay_ms: u64,
    /// Where preferences are stored
    #[arg(long)]
    config_dir: Option<PathBuf>,
    #[arg(short, long)]
    verbose: bool,
    #[arg(long, default_value = "memory")]
    storage: String,
    #[command(subcommand)]
    command: FeedCommands,
}

fn default_config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(dir).join("hn");
    }
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".config").join("hn"),
        None => PathBuf::from(".hn"),
    }
}

impl Cli {
    fn feed_config(&self) -> Result<FeedConfig> {
        let host = match &self.origin {
            Some(origin) => GatewayResolver::from_origin(origin)?.host().to_string(),
            None => self.host.clone(),
        };
        Ok(FeedConfig::default()
            .with_endpoint(self.endpoint.clone())
            .with_owner(self.owner.clone())
            .with_host(host)
            .with_page_size(self.page_size)
            .with_max_concurrent(self.concurrency)
            .with_enhance_delay(Duration::from_millis(self.enhance_delay_ms)))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let logger = init_logging(cli.verbose);

    let config = cli.feed_config()?;
    debug!("Using {:?}", config);
    let resolver = config.resolver();
    info!("🌐 Serving article pages from {}", resolver.gateway_host());

    let store = hn_storage::create_store(&cli.storage)?;
    let pages = GatewayClient::new(config.byte_limit)?;
    let metadata = MetadataManager::new(store, Arc::new(pages), resolver).with_max_concurrent(config.max_concurrent);
    let transactions = GraphqlClient::new(config.endpoint.clone())?;

    let ctx = FeedContext {
        feed: ArticleFeed::from_config(Arc::new(transactions), &config),
        metadata: Arc::new(metadata),
        themes: ThemeStore::new(cli.config_dir.clone().unwrap_or_else(default_config_dir)),
        config,
    };

    let loads_feed = matches!(cli.command, FeedCommands::Feed { .. } | FeedCommands::Search { .. });
    if let Err(e) = handle_command(FeedArgs { command: cli.command }, &ctx).await {
        if loads_feed && ctx.feed.is_empty().await {
            logger.error(&format!("Failed to load articles: {}", e));
            eprintln!("Could not load articles from {}. Run the command again to retry.", ctx.config.endpoint);
            std::process::exit(1);
        }
        return Err(e);
    }

    Ok(())
}
