use std::{num::NonZeroUsize, path::PathBuf, process::ExitCode};

use anyhow::Context;
use clap::{Parser, Subcommand};
use best_stories::api::HackerNewsApi;
use best_stories::api::hacker_news::{Item, ItemId};
use best_stories::config::{Config, PathOpt, StrOpt, USizeOpt, item_ttl};
use best_stories::log::{Log, LogLevel};
use best_stories::net::Net;
use best_stories::stories::{BestStories, Lookup, StoriesError, StoryDto};
use best_stories::{ArcPath, Cancel};

const SCOPE: &str = "main";

/// Exit status when a request produced nothing to show.
const EXIT_NOT_FOUND: u8 = 2;
/// Exit status when the request was interrupted.
const EXIT_CANCELLED: u8 = 130;

#[derive(Parser)]
#[command(name = "best-stories")]
#[command(about = "Shows the best stories on Hacker News, ranked by score")]
struct Cli {
    /// Path to the configuration file
    /// [default: $HOME/.config/best-stories/config.toml]
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// How long fetched items stay cached, in minutes
    #[arg(long, global = true)]
    ttl_minutes: Option<NonZeroUsize>,
    /// Maximum number of item fetches in flight at once
    #[arg(long, global = true)]
    concurrency: Option<NonZeroUsize>,
    /// Minimum level of log messages echoed to stderr (info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<LogLevel>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the best stories, highest score first
    Stories {
        /// Maximum number of stories; zero or less shows none
        #[arg(short, long, default_value = "10", allow_negative_numbers = true)]
        limit: i64,
        /// Print a JSON array instead of text
        #[arg(long)]
        json: bool,
    },
    /// Show a single item
    Item {
        #[arg(required = true)]
        id: ItemId,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()?,
    };
    let config = Config::spawn(ArcPath::from(config_path.as_path()));
    if config_path.exists() {
        config.load().await?;
    } else {
        config.save().await?;
    }

    if let Some(minutes) = cli.ttl_minutes {
        config.set_usize(USizeOpt::ItemTtlMinutes, minutes.get()).await;
    }
    if let Some(concurrency) = cli.concurrency {
        config.set_usize(USizeOpt::MaxConcurrency, concurrency.get()).await;
    }
    if let Some(level) = cli.log_level {
        config.set_log_level(level).await;
    }

    let log = Log::spawn(config.log_level().await, config.path(PathOpt::LogDir).await).await?;
    let net = Net::spawn(config.clone(), log.clone()).await?;
    let api = HackerNewsApi::spawn(net, log.clone(), config.str(StrOpt::BaseUrl).await);

    let ttl = item_ttl(config.usize(USizeOpt::ItemTtlMinutes).await)
        .context("Invalid item TTL")?;
    let max_concurrency = NonZeroUsize::new(config.usize(USizeOpt::MaxConcurrency).await)
        .context("`max_concurrency` must be a positive integer")?;
    let stories = BestStories::new(
        api,
        log.clone(),
        ttl,
        max_concurrency,
    );

    let cancel = Cancel::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let status = match cli.command {
        Commands::Stories { limit, json } => {
            log.info(SCOPE, format!("Requesting up to {} best stories", limit));
            handle_stories_command(&stories, limit, json, &cancel).await
        }
        Commands::Item { id, json } => {
            log.info(SCOPE, format!("Requesting item {}", id));
            handle_item_command(&stories, id, json, &cancel).await
        }
    };

    log.flush().await?;
    status
}

/// `$HOME/.config/best-stories/config.toml`
fn default_config_path() -> anyhow::Result<PathBuf> {
    let home = std::env::var_os("HOME").context("HOME is not set; pass --config")?;
    Ok(PathBuf::from(home)
        .join(".config")
        .join("best-stories")
        .join("config.toml"))
}

/// Handle the stories command to display the ranked stories
async fn handle_stories_command(
    stories: &BestStories,
    limit: i64,
    json: bool,
    cancel: &Cancel,
) -> anyhow::Result<ExitCode> {
    let ranked = match stories.best_stories(limit, cancel).await {
        Ok(ranked) => ranked,
        Err(err) => return failure(err),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&ranked)?);
    } else {
        for (rank, story) in ranked.iter().enumerate() {
            print_story(rank + 1, story);
        }
    }

    if ranked.is_empty() {
        eprintln!("No stories found");
        return Ok(ExitCode::from(EXIT_NOT_FOUND));
    }
    Ok(ExitCode::SUCCESS)
}

/// Handle the item command to display one item
async fn handle_item_command(
    stories: &BestStories,
    id: ItemId,
    json: bool,
    cancel: &Cancel,
) -> anyhow::Result<ExitCode> {
    let item = match stories.item(id, cancel).await {
        Ok(Lookup::Found(item)) => item,
        Ok(Lookup::NotFound) => {
            eprintln!("Item {} not found", id);
            return Ok(ExitCode::from(EXIT_NOT_FOUND));
        }
        Ok(Lookup::Failed) => {
            eprintln!("Failed to fetch item {}", id);
            return Ok(ExitCode::FAILURE);
        }
        Err(err) => return failure(err),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&item)?);
    } else {
        print_item(&item);
    }
    Ok(ExitCode::SUCCESS)
}

fn failure(err: StoriesError) -> anyhow::Result<ExitCode> {
    eprintln!("{}", err);
    Ok(match err {
        StoriesError::Cancelled => ExitCode::from(EXIT_CANCELLED),
        StoriesError::Listing(_) => ExitCode::FAILURE,
    })
}

fn print_story(rank: usize, story: &StoryDto) {
    println!("{:>3}. {}", rank, story.title);
    println!(
        "     {} points by {} at {} | {} comments",
        story.score, story.posted_by, story.time, story.comment_count
    );
    if !story.uri.is_empty() {
        println!("     {}", story.uri);
    }
}

fn print_item(item: &Item) {
    let kind: String = item.kind.into();
    println!("{} {} [{}]", kind, item.id, item.title);
    println!("  by: {}", item.by);
    println!("  score: {}", item.score);
    println!("  comments: {}", item.descendants);
    if !item.url.is_empty() {
        println!("  url: {}", item.url);
    }
}
