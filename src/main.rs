//! Themis-Crawler main entry point
//!
//! This is the command-line interface for the Themis assignment crawler.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::time::Instant;
use themis_crawler::auth::{Authenticator, Credentials};
use themis_crawler::config::{load_config_with_hash, Config};
use themis_crawler::output::{
    collect_statistics, format_profile, print_statistics, render_tree, write_markdown_tree,
};
use themis_crawler::session::{fetch_profile, Session, SessionConfig};
use themis_crawler::tree::{attach_dates, TreeBuilder};
use themis_crawler::ThemisError;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the login identifier
const USERNAME_VAR: &str = "THEMIS_USERNAME";

/// Environment variable holding the login secret
const PASSWORD_VAR: &str = "THEMIS_PASSWORD";

/// Optional environment file, relative to the working directory
const ENV_FILE: &str = ".env";

/// Themis-Crawler: maps the course and assignment tree of the Themis portal
///
/// Credentials are read from THEMIS_USERNAME and THEMIS_PASSWORD, either in
/// the environment or in a .env file in the working directory.
#[derive(Parser, Debug)]
#[command(name = "themis-crawler")]
#[command(version)]
#[command(about = "Crawls the Themis assignment tree", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Override the configured max depth
    #[arg(long, value_name = "N")]
    depth: Option<u32>,

    /// Override the configured start route
    #[arg(long, value_name = "ROUTE")]
    start: Option<String>,

    /// Skip the profile page
    #[arg(long)]
    no_profile: bool,

    /// Fetch tooltip dates for every discovered node
    #[arg(long)]
    dates: bool,

    /// Write the tree as markdown to this path
    #[arg(long, value_name = "PATH")]
    markdown: Option<PathBuf>,

    /// Validate config and show what would be crawled without logging in
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    apply_overrides(&mut config, &cli);

    if cli.dry_run {
        return handle_dry_run(&config);
    }

    match handle_crawl(&config, cli.markdown.clone()).await {
        Ok(()) => Ok(()),
        Err(e) => {
            report_error(&e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("themis_crawler=info,warn"),
            1 => EnvFilter::new("themis_crawler=debug,info"),
            2 => EnvFilter::new("themis_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Folds command-line overrides into the loaded configuration
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(depth) = cli.depth {
        config.crawler.max_depth = depth;
    }
    if let Some(start) = &cli.start {
        config.portal.start_route = start.clone();
    }
    if cli.no_profile {
        config.crawler.fetch_profile = false;
    }
    if cli.dates {
        config.crawler.fetch_dates = true;
    }
}

/// Handles the --dry-run mode: shows the resolved configuration
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Themis-Crawler Dry Run ===\n");

    println!("Portal:");
    println!("  Base URL: {}", config.portal.base_url);
    println!("  Login: {}", config.portal.login_url()?);
    println!("  Profile: {}", config.portal.profile_url()?);
    println!("  Start: {}", config.portal.start_url()?);

    println!("\nCrawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  On error: {:?}", config.crawler.on_error);
    println!("  Root pattern: {:?}", config.crawler.root_pattern);
    println!("  Fetch dates: {}", config.crawler.fetch_dates);
    println!("  Fetch profile: {}", config.crawler.fetch_profile);
    println!(
        "  Timeouts: {}s request, {}s connect",
        config.crawler.request_timeout_secs, config.crawler.connect_timeout_secs
    );

    println!("\nUser Agent:");
    println!(
        "  {}/{}",
        config.user_agent.crawler_name, config.user_agent.crawler_version
    );

    load_env_file();
    let credentials_present = std::env::var(USERNAME_VAR).is_ok_and(|v| !v.is_empty())
        && std::env::var(PASSWORD_VAR).is_ok_and(|v| !v.is_empty());
    println!(
        "\nCredentials: {}",
        if credentials_present {
            "present"
        } else {
            "missing"
        }
    );

    println!("\n✓ Configuration is valid");
    Ok(())
}

/// Loads a .env file from the working directory, if there is one
fn load_env_file() {
    load_env_file_at(Path::new(ENV_FILE));
}

/// Loads variables from `path`; returns whether the file was applied
///
/// A missing file is silently skipped, an unreadable one is logged.
fn load_env_file_at(path: &Path) -> bool {
    match dotenvy::from_path(path) {
        Ok(()) => {
            tracing::debug!("Loaded environment from {}", path.display());
            true
        }
        Err(e) if e.not_found() => false,
        Err(e) => {
            tracing::warn!("Ignoring unreadable {}: {}", path.display(), e);
            false
        }
    }
}

/// Reads credentials from the environment, after loading a .env file if any
fn load_credentials() -> Credentials {
    load_env_file();

    Credentials::new(
        std::env::var(USERNAME_VAR).unwrap_or_default(),
        std::env::var(PASSWORD_VAR).unwrap_or_default(),
    )
}

/// Handles the main crawl operation
async fn handle_crawl(config: &Config, markdown: Option<PathBuf>) -> Result<(), ThemisError> {
    let credentials = load_credentials();

    // Log in
    let session = Session::new(&SessionConfig::from_config(config)?)?;
    let session = Authenticator::new(session, config.portal.login_url()?)
        .authenticate(&credentials)
        .await?;

    if config.crawler.fetch_profile {
        let profile = fetch_profile(&session, &config.portal.profile_url()?).await?;
        println!("{}", format_profile(&profile));
    }

    // Stream discoveries to the log while the crawl runs
    let (sender, mut receiver) = mpsc::unbounded_channel();
    let progress = tokio::spawn(async move {
        while let Some(event) = receiver.recv().await {
            tracing::info!("Discovered {}", event);
        }
    });

    let started = Instant::now();
    let start_url = config.portal.start_url()?;
    let result = TreeBuilder::from_config(&session, &config.crawler)
        .events(sender)
        .build(&config.portal.start_route, start_url)
        .await;
    if let Err(e) = progress.await {
        tracing::warn!("Progress reporter stopped early: {}", e);
    }
    let mut tree = result?;

    if config.crawler.fetch_dates {
        attach_dates(&session, &mut tree).await?;
    }
    let elapsed = started.elapsed();

    println!("{}", render_tree(&tree));
    print_statistics(&collect_statistics(&tree, Some(elapsed)));

    let markdown_path = markdown.or_else(|| config.output.markdown_path.as_ref().map(PathBuf::from));
    if let Some(path) = markdown_path {
        write_markdown_tree(&tree, &path)?;
        println!("✓ Tree written to: {}", path.display());
    }

    Ok(())
}

/// Logs an error with its classification, URL and status
fn report_error(error: &ThemisError) {
    match (error.url(), error.status()) {
        (Some(url), Some(status)) => tracing::error!(
            "{:?} error at {} (HTTP {}): {}",
            error.kind(),
            url,
            status,
            error
        ),
        (Some(url), None) => tracing::error!("{:?} error at {}: {}", error.kind(), url, error),
        _ => tracing::error!("{:?} error: {}", error.kind(), error),
    }
}
