//! webcrawlerapi command-line client
//!
//! Submits scrapes and crawls, waits for them, and prints results as JSON.

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use webcrawlerapi::config::{read_config, validate, Config};
use webcrawlerapi::{
    CrawlRequest, JobId, JobResult, ScrapeRequest, ScrapeType, WebcrawlerClient,
};

/// webcrawlerapi: scrape and crawl the web through the WebcrawlerAPI
///
/// Jobs are polled until they finish unless --no-wait is given.
/// Press Ctrl-C to stop waiting.
#[derive(Parser, Debug)]
#[command(name = "webcrawlerapi")]
#[command(version)]
#[command(about = "Command-line client for the WebcrawlerAPI", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// API key (overrides the config file)
    #[arg(long, value_name = "KEY")]
    api_key: Option<String>,

    /// API base URL (overrides the config file)
    #[arg(long, value_name = "URL")]
    base_path: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape a single page
    Scrape {
        /// Scraper to run
        #[arg(long)]
        crawler_id: String,

        /// Scraper input as JSON, e.g. '{"url":"https://example.com"}'
        #[arg(long, value_name = "JSON")]
        input: String,

        /// Print the scrape id instead of waiting for the result
        #[arg(long)]
        no_wait: bool,

        /// Log every polled status
        #[arg(long)]
        debug: bool,
    },

    /// Show the status of a scrape
    ScrapeStatus {
        /// Scrape id
        id: String,
    },

    /// Crawl a website
    Crawl {
        /// Start URL
        #[arg(long)]
        url: String,

        /// Output format: html, cleaned or markdown
        #[arg(long, value_parser = parse_scrape_type)]
        scrape_type: Option<ScrapeType>,

        /// Maximum number of pages
        #[arg(long)]
        items_limit: Option<u32>,

        /// Print the job id instead of waiting for the result
        #[arg(long)]
        no_wait: bool,
    },

    /// Show a crawl job and its items
    Job {
        /// Job id
        id: String,

        /// Poll until the job finishes
        #[arg(long)]
        wait: bool,
    },

    /// Download the content of a finished crawl's items
    Content {
        /// Job id
        job_id: String,

        /// Only this item
        #[arg(long, value_name = "ITEM_ID")]
        item: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = resolve_config(&cli)?;
    tracing::debug!("Using API at {}", config.api.base_path);

    let cancel = CancellationToken::new();
    spawn_interrupt_handler(cancel.clone());

    let client = WebcrawlerClient::from_config(&config)?;
    let poll_options = client.poll_options().clone().with_cancellation(cancel);
    let client = client.with_poll_options(poll_options);

    match cli.command {
        Command::Scrape {
            crawler_id,
            input,
            no_wait,
            debug,
        } => {
            let input = serde_json::from_str(&input).context("--input must be valid JSON")?;
            let request = ScrapeRequest::new(crawler_id, input).with_debug(debug);
            if no_wait {
                print_json(&client.scrape_async(&request).await?)
            } else {
                print_result(client.scrape_with_meta(&request).await?)
            }
        }
        Command::ScrapeStatus { id } => print_json(&client.get_scrape_result(&id).await?),
        Command::Crawl {
            url,
            scrape_type,
            items_limit,
            no_wait,
        } => {
            let request = CrawlRequest {
                scrape_type,
                items_limit,
                ..CrawlRequest::new(url)
            };
            if no_wait {
                print_json(&client.crawl_async(&request).await?)
            } else {
                print_result(client.crawl(&request).await?)
            }
        }
        Command::Job { id, wait } => {
            if wait {
                print_result(client.wait_for_job(&JobId::new(id)).await?)
            } else {
                print_json(&client.get_job(&id).await?)
            }
        }
        Command::Content { job_id, item } => handle_content(&client, &job_id, item.as_deref()).await,
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("webcrawlerapi=info,warn"),
            1 => EnvFilter::new("webcrawlerapi=debug,info"),
            2 => EnvFilter::new("webcrawlerapi=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file, if any, and applies command-line overrides
///
/// Validation runs once, after the overrides, so `--api-key` can supply a key
/// the file leaves out.
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, &cli.api_key) {
        (Some(path), _) => read_config(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        (None, Some(api_key)) => Config::with_api_key(api_key.clone()),
        (None, None) => bail!("either --config or --api-key is required"),
    };

    config.apply_overrides(cli.api_key.as_deref(), cli.base_path.as_deref());

    validate(&config)?;
    Ok(config)
}

/// Cancels in-flight polling on Ctrl-C
fn spawn_interrupt_handler(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, stopping");
            cancel.cancel();
        }
    });
}

async fn handle_content(
    client: &WebcrawlerClient,
    job_id: &str,
    item_id: Option<&str>,
) -> anyhow::Result<()> {
    let job = client.get_job(job_id).await?;

    let items = match item_id {
        Some(id) => vec![job
            .item(id)
            .ok_or_else(|| anyhow!("job {} has no item {}", job_id, id))?],
        None => job.job_items.iter().collect(),
    };

    for item in items {
        match client.get_content(item, &job).await? {
            Some(content) => {
                println!("==> {} <==", item.original_url);
                println!("{}", content);
            }
            None => tracing::warn!(
                "No content for {} (job {}, item {})",
                item.original_url,
                job.status,
                item.status
            ),
        }
    }

    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_result<T: Serialize>(result: JobResult<T>) -> anyhow::Result<()> {
    match result {
        JobResult::Done(payload) => print_json(&payload),
        JobResult::Failed {
            error_code,
            error_message,
            payload,
        } => {
            print_json(&payload)?;
            bail!("job failed with {}: {}", error_code, error_message)
        }
        JobResult::Pending => bail!("job has not finished"),
    }
}

fn parse_scrape_type(s: &str) -> Result<ScrapeType, String> {
    ScrapeType::from_api_str(s)
        .ok_or_else(|| format!("unknown scrape type '{}' (expected html, cleaned or markdown)", s))
}
