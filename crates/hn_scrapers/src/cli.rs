use clap::{Args, Subcommand};
use hn_core::{ArticleMetadata, ArticleView, Error, FeedConfig, GatewayResolver, Result};
use hn_storage::{Theme, ThemeStore};
use std::sync::Arc;

use crate::enhance::EnhancementTask;
use crate::feed::ArticleFeed;
use crate::manager::MetadataManager;

const EXCERPT_CHARS: usize = 160;

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    #[command(subcommand)]
    pub command: FeedCommands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum FeedCommands {
    /// List the newest articles
    Feed {
        /// How many pages of transactions to load
        #[arg(long, default_value_t = 1)]
        pages: usize,
        /// Fetch each article page and show the extracted metadata
        #[arg(long)]
        enhance: bool,
    },
    /// Filter loaded articles by title, description, tags or cached metadata
    Search {
        term: String,
        #[arg(long, default_value_t = 1)]
        pages: usize,
        #[arg(long)]
        enhance: bool,
    },
    /// Print the metadata extracted from one article as JSON
    Meta { id: String },
    /// Print the gateway URL for a transaction id
    Resolve { id: String },
    /// Show or change the color theme
    Theme {
        #[command(subcommand)]
        action: Option<ThemeAction>,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum ThemeAction {
    Show,
    Toggle,
    Set { theme: Theme },
}

/// Everything the commands need, built once by the binary.
pub struct FeedContext {
    pub feed: ArticleFeed,
    pub metadata: Arc<MetadataManager>,
    pub themes: ThemeStore,
    pub config: FeedConfig,
}

impl FeedContext {
    fn resolver(&self) -> &GatewayResolver {
        self.metadata.resolver()
    }

    async fn load(&self, pages: usize, enhance: bool) -> Result<()> {
        self.feed.load_all(pages.max(1)).await?;
        if enhance {
            let ids: Vec<String> = self.feed.articles().await.into_iter().map(|a| a.id).collect();
            self.metadata.fetch_many(&ids).await;
        }
        Ok(())
    }

    /// One article's metadata, fetched after the configured delay. Ctrl-C
    /// drops the task, which cancels the fetch.
    async fn enhance(&self, id: &str) -> Result<Arc<ArticleMetadata>> {
        let task = EnhancementTask::spawn(self.metadata.clone(), id, self.config.enhance_delay);
        tokio::select! {
            metadata = task.wait() => {
                metadata.ok_or_else(|| Error::Scraping(format!("No metadata could be fetched for {}", id)))
            }
            _ = tokio::signal::ctrl_c() => Err(Error::Cancelled),
        }
    }

    async fn render(&self, articles: &[hn_core::Article]) {
        let snapshot = self.metadata.entries().await;
        for article in articles {
            let view = ArticleView::merge(article, snapshot.get(&article.id).map(|m| m.as_ref()), self.resolver());
            print_view(&view);
        }
    }
}

fn print_view(view: &ArticleView) {
    let marker = if view.enhanced { "✨" } else { "📰" };
    println!("{} {}", marker, view.title);

    let mut details = Vec::new();
    if let Some(author) = &view.author {
        details.push(author.clone());
    }
    if let Some(date) = &view.date {
        details.push(date.clone());
    }
    if let Some(minutes) = view.reading_time {
        details.push(format!("{} min read", minutes));
    }
    if !details.is_empty() {
        println!("   {}", details.join(" · "));
    }
    if let Some(excerpt) = view.excerpt(EXCERPT_CHARS) {
        println!("   {}", excerpt);
    }
    if !view.tags.is_empty() {
        println!("   #{}", view.tags.join(" #"));
    }
    println!("   {}", view.link);
}

pub async fn handle_command(args: FeedArgs, ctx: &FeedContext) -> Result<()> {
    match args.command {
        FeedCommands::Feed { pages, enhance } => {
            ctx.load(pages, enhance).await?;
            let articles = ctx.feed.articles().await;
            ctx.render(&articles).await;
            println!(
                "{} articles{}",
                articles.len(),
                if ctx.feed.has_more().await { ", more available" } else { "" }
            );
        }
        FeedCommands::Search { term, pages, enhance } => {
            ctx.load(pages, enhance).await?;
            let articles = ctx.feed.articles().await;
            let found = ctx.metadata.search(&articles, &term).await;
            ctx.render(&found).await;
            println!("{} of {} articles match {:?}", found.len(), articles.len(), term);
        }
        FeedCommands::Meta { id } => {
            let metadata = ctx.enhance(&id).await?;
            println!("{}", serde_json::to_string_pretty(metadata.as_ref())?);
        }
        FeedCommands::Resolve { id } => {
            println!("{}", ctx.resolver().resolve(&id));
        }
        FeedCommands::Theme { action } => match action.unwrap_or(ThemeAction::Show) {
            ThemeAction::Show => println!("{}", ctx.themes.load().await?),
            ThemeAction::Toggle => println!("{}", ctx.themes.toggle().await?),
            ThemeAction::Set { theme } => {
                ctx.themes.set(theme).await?;
                println!("{}", theme);
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manager::tests::MockSource;
    use clap::Parser;
    use hn_storage::InMemoryMetadataStore;
    use std::sync::atomic::Ordering;
    use std::time::{Duration, Instant};

    #[derive(Parser)]
    struct TestCli {
        #[command(subcommand)]
        command: FeedCommands,
    }

    #[test]
    fn test_parse_commands() {
        let cli = TestCli::parse_from(["hn", "search", "rust", "--pages", "3", "--enhance"]);
        match cli.command {
            FeedCommands::Search { term, pages, enhance } => {
                assert_eq!(term, "rust");
                assert_eq!(pages, 3);
                assert!(enhance);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let cli = TestCli::parse_from(["hn", "theme", "set", "light"]);
        assert!(matches!(
            cli.command,
            FeedCommands::Theme {
                action: Some(ThemeAction::Set { theme: Theme::Light })
            }
        ));

        assert!(TestCli::try_parse_from(["hn", "theme", "set", "sepia"]).is_err());
    }

    struct NoTransactions;

    #[async_trait::async_trait]
    impl crate::graphql::TransactionSource for NoTransactions {
        async fn fetch_page(&self, _: &str, _: Option<&str>, _: usize) -> Result<hn_core::TransactionPage> {
            Ok(hn_core::TransactionPage::default())
        }
    }

    fn context(delay: Duration, dir: &tempfile::TempDir) -> (FeedContext, Arc<MockSource>) {
        let source = Arc::new(MockSource::default());
        let config = FeedConfig::default().with_enhance_delay(delay);
        let metadata = MetadataManager::new(
            Arc::new(InMemoryMetadataStore::new()),
            source.clone(),
            config.resolver(),
        );
        let ctx = FeedContext {
            feed: ArticleFeed::from_config(Arc::new(NoTransactions), &config),
            metadata: Arc::new(metadata),
            themes: ThemeStore::new(dir.path()),
            config,
        };
        (ctx, source)
    }

    fn run(command: FeedCommands) -> FeedArgs {
        FeedArgs { command }
    }

    #[tokio::test]
    async fn test_meta_waits_for_configured_delay() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, source) = context(Duration::from_millis(50), &dir);

        let started = Instant::now();
        handle_command(run(FeedCommands::Meta { id: "tx1".to_string() }), &ctx)
            .await
            .unwrap();
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
        assert!(ctx.metadata.get("tx1").await.is_some());

        let err = handle_command(run(FeedCommands::Meta { id: "bad".to_string() }), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Scraping(_)));
        assert!(ctx.metadata.get("bad").await.is_none());
    }

    #[tokio::test]
    async fn test_theme_commands_persist() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _) = context(Duration::ZERO, &dir);

        let set = ThemeAction::Set { theme: Theme::Light };
        handle_command(run(FeedCommands::Theme { action: Some(set) }), &ctx).await.unwrap();
        assert_eq!(ctx.themes.load().await.unwrap(), Theme::Light);

        handle_command(run(FeedCommands::Theme { action: Some(ThemeAction::Toggle) }), &ctx)
            .await
            .unwrap();
        assert_eq!(ThemeStore::new(dir.path()).load().await.unwrap(), Theme::Dark);
    }

    #[test]
    fn test_feed_defaults_to_one_page() {
        let cli = TestCli::parse_from(["hn", "feed"]);
        assert!(matches!(cli.command, FeedCommands::Feed { pages: 1, enhance: false }));
    }
}
