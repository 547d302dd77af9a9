use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use catview::browser;
use catview::client::{CatalogClient, CatalogPage, ContentGateway};
use catview::config::Config;
use catview::models::Content;
use catview::query::{Query, QueryState};

#[derive(Parser)]
#[command(name = "catview")]
#[command(about = "Browse a remote content catalog from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive browser with search, filters and page navigation
    Browse {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Fetch one page of results and print it
    List {
        #[command(flatten)]
        filters: FilterArgs,
        /// 1-based page to fetch
        #[arg(short, long)]
        page: Option<u32>,
    },
    /// Fetch a single content item by id
    Show {
        #[arg(short, long)]
        id: String,
    },
}

#[derive(Args)]
struct FilterArgs {
    /// Free-text search term
    #[arg(long)]
    search: Option<String>,
    /// Restrict to one content type: video or article
    #[arg(long)]
    content_type: Option<String>,
    /// Restrict to one provider
    #[arg(long)]
    provider: Option<String>,
    /// Published on or after this date (YYYY-MM-DD)
    #[arg(long)]
    published_from: Option<String>,
    /// Published on or before this date (YYYY-MM-DD)
    #[arg(long)]
    published_to: Option<String>,
    /// Sort key: score, published_at, title or created_at
    #[arg(long)]
    sort_by: Option<String>,
    /// Sort direction: asc or desc
    #[arg(long)]
    sort_order: Option<String>,
    /// Items per page
    #[arg(long)]
    limit: Option<u32>,
}

impl FilterArgs {
    fn into_query(self) -> Result<Query> {
        let mut query = Query::default();

        if let Some(search) = self.search {
            let term = search.trim().to_lowercase();
            if !term.is_empty() {
                query.search = Some(term);
            }
        }
        if let Some(t) = self.content_type {
            query.content_type = Some(t.parse().map_err(anyhow::Error::msg)?);
        }
        query.provider = self.provider.filter(|p| !p.is_empty());
        query.published_from = self.published_from.map(parse_date).transpose()?;
        query.published_to = self.published_to.map(parse_date).transpose()?;
        if let Some(key) = self.sort_by {
            query.sort_by = key.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(order) = self.sort_order {
            query.sort_order = order.parse().map_err(anyhow::Error::msg)?;
        }
        if let Some(limit) = self.limit {
            query.limit = limit.max(1);
        }

        Ok(query)
    }
}

fn parse_date(value: String) -> Result<String> {
    chrono::NaiveDate::parse_from_str(&value, "%Y-%m-%d")
        .map(|d| d.format("%Y-%m-%d").to_string())
        .map_err(|_| anyhow::anyhow!("invalid date '{}': expected YYYY-MM-DD", value))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let client = CatalogClient::new(&config.base_url)?;

    match cli.command {
        Commands::Browse { filters } => {
            let state = QueryState::with_query(filters.into_query()?);
            browser::run_browser(client, state).await?;
        }
        Commands::List { filters, page } => {
            let mut query = filters.into_query()?;
            if let Some(page) = page {
                query.offset = (page.max(1) - 1) * query.limit;
            }
            match client.list_contents(&query).await {
                Ok(page) => print_page(&page),
                Err(e) => {
                    eprintln!("✗ {}", e.user_message());
                    std::process::exit(1);
                }
            }
        }
        Commands::Show { id } => match client.get_content(&id).await {
            Ok(content) => print_content(&content),
            Err(e) => {
                eprintln!("✗ {}", e.user_message());
                std::process::exit(1);
            }
        },
    }

    Ok(())
}

fn print_page(page: &CatalogPage) {
    for content in &page.items {
        println!(
            "{}  [{}] ★{:.1}  {}",
            content.published_at.format("%Y-%m-%d"),
            content.content_type.as_str(),
            content.score,
            content.title
        );
    }

    if page.items.is_empty() {
        println!("No content found");
    }

    if let Some(meta) = &page.meta {
        println!(
            "Page {} of {} ({} total)",
            meta.current_page, meta.total_pages, meta.total
        );
    }
}

fn print_content(content: &Content) {
    println!("{}", content.title);
    println!(
        "{} · {} · ★{:.1}",
        content.content_type.label(),
        content.provider,
        content.score
    );
    println!("Published: {}", content.published_at.format("%Y-%m-%d %H:%M"));
    println!(
        "Views: {}  Likes: {}",
        content.metrics.views, content.metrics.likes
    );
    if let Some(ref duration) = content.metrics.duration {
        println!("Duration: {duration}s");
    }
    if let Some(ref reading_time) = content.metrics.reading_time {
        println!("Reading time: {reading_time} min");
    }
    if !content.categories.is_empty() {
        println!("Categories: {}", content.categories.join(", "));
    }
}
