//! Code Search - keyboard-driven terminal front end for codesearch
//!
//! Searches a codesearch backend, walks the hits with the keyboard, and
//! opens them in a file view or on GitHub.

use anyhow::{Context, Result};
use clap::Parser;

use codesearch_tui::client::CodeSearchClient;
use codesearch_tui::config::Config;
use codesearch_tui::constants::{APP_BINARY_NAME, APP_NAME, APP_VERSION};
use codesearch_tui::search::{Filters, Route};
use codesearch_tui::{logging, tui};

/// Code Search - keyboard-driven terminal front end for codesearch
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Regular expression to search file contents for
    #[arg(value_name = "QUERY")]
    query: Option<String>,

    /// Only search files whose path matches this regular expression
    #[arg(short, long, value_name = "REGEX")]
    file: Option<String>,

    /// Skip files whose path matches this regular expression
    #[arg(short = 'x', long = "exclude-file", value_name = "REGEX")]
    exclude_file: Option<String>,

    /// Match case-insensitively
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Start from a query string or page URL (e.g. "?q=foo&i=true" or "/file/repo/a.rs#L3")
    #[arg(long, value_name = "URL")]
    params: Option<String>,

    /// Backend base URL (overrides config and CODESEARCH_BACKEND)
    #[arg(long, value_name = "URL")]
    backend: Option<String>,

    /// Write the default configuration file and exit
    #[arg(long)]
    init: bool,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// The page to open on startup.
    fn initial_route(&self) -> Route {
        let route = match self.params.as_deref() {
            Some(url) if url.starts_with('/') => Route::parse(url),
            Some(query) => Route::Search(Filters::from_query_string(query)),
            None => Route::default(),
        };

        let Route::Search(mut filters) = route else {
            return route;
        };
        if let Some(query) = &self.query {
            filters.query.clone_from(query);
        }
        if let Some(file) = &self.file {
            filters.file.clone_from(file);
        }
        if let Some(exclude_file) = &self.exclude_file {
            filters.exclude_file.clone_from(exclude_file);
        }
        if self.ignore_case {
            filters.case_insensitive = true;
        }
        Route::Search(filters)
    }
}

fn init_config() -> Result<()> {
    let path = Config::config_file_path()?;
    if Config::exists() {
        println!("Configuration already exists: {}", path.display());
        return Ok(());
    }
    Config::new().save()?;
    println!("Wrote default configuration to {}", path.display());
    println!();
    println!("Edit [backend] url, then run:");
    println!("  {APP_BINARY_NAME} <QUERY>");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.init {
        println!("{APP_NAME} v{APP_VERSION}");
        return init_config();
    }

    let mut config = Config::load()?;
    config.apply_env()?;
    config
        .override_backend(cli.backend.clone())
        .context("Invalid --backend")?;

    logging::init(&config.logging, &config.log_file()?, cli.verbose)?;
    tracing::info!(version = APP_VERSION, backend = %config.backend.url, "starting");

    let client = CodeSearchClient::new(&config.backend.url, config.backend.timeout())?;
    let mut app_state = tui::AppState::new(config, client)?;
    app_state.navigate(cli.initial_route());

    // Initialize TUI
    let mut terminal = tui::setup_terminal()?;

    // Run main TUI loop
    let result = tui::run_tui(&mut app_state, &mut terminal);

    // Restore terminal
    tui::restore_terminal(terminal)?;

    // Check for errors
    result?;
    tracing::info!("exiting");
    Ok(())
}
