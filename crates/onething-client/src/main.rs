//! Onething admin command-line client
//!
//! Drives the authenticated API client against a live backend: fetch the
//! CSRF token, check a login, or page through any slice-paginated list.

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    missing_docs,
    rust_2018_idioms
)]

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use onething_client::{ApiClient, Credentials};
use onething_core::{Config, SliceEnvelope, init_logging};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::info;

/// Command line interface for the Onething admin client
#[derive(Parser)]
#[command(
    name = "onething-admin",
    version = env!("CARGO_PKG_VERSION"),
    about = "Command-line client for the Onething admin backend"
)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error); overrides the config file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Enable structured JSON logging
    #[arg(long)]
    json: bool,

    /// Subcommand
    #[command(subcommand)]
    command: Commands,
}

/// Login flags shared by commands that need a session
#[derive(clap::Args)]
struct LoginArgs {
    /// Account name
    #[arg(short, long, env = "ONETHING_USERNAME")]
    username: Option<String>,

    /// Account password
    #[arg(short, long, env = "ONETHING_PASSWORD", hide_env_values = true)]
    password: Option<String>,
}

/// Available subcommands
#[derive(Subcommand)]
enum Commands {
    /// Fetch and print the CSRF token issued by the login page
    Csrf,

    /// Check that a login succeeds
    Login {
        /// Credentials
        #[command(flatten)]
        login: LoginArgs,
    },

    /// Fetch one page of a slice-paginated list
    List {
        /// List endpoint path, without the page segment
        #[arg(value_name = "PATH")]
        path: String,

        /// Zero-based page index
        #[arg(long, default_value_t = 0)]
        page: u32,

        /// Query parameter as key=value; repeatable
        #[arg(short, long = "query", value_name = "KEY=VALUE", value_parser = parse_query_pair)]
        query: Vec<(String, String)>,

        /// Credentials; the list is fetched anonymously when omitted
        #[command(flatten)]
        login: LoginArgs,
    },

    /// Show the resolved configuration
    Config {
        /// Print the configuration as TOML
        #[arg(short, long)]
        show: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists (for development convenience)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Note: .env file not loaded: {e}");
    }

    let cli = Cli::parse();

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(level) = &cli.log_level {
        config.logging.level.clone_from(level);
    }
    if cli.json {
        config.logging.format = "json".to_string();
    }
    init_logging(&config.logging)?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        base_url = %config.api.base_url,
        "onething-admin starting"
    );

    match cli.command {
        Commands::Csrf => print_csrf(&config).await,
        Commands::Login { login } => check_login(&config, &login).await,
        Commands::List {
            path,
            page,
            query,
            login,
        } => list_page(&config, &path, page, &query, &login).await,
        Commands::Config { show } => show_config(&config, show),
    }
}

/// Parse a `key=value` query argument
fn parse_query_pair(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

async fn print_csrf(config: &Config) -> Result<()> {
    let client = ApiClient::new(&config.api)?;
    match client.fetch_csrf_token().await? {
        Some(token) => println!("{token}"),
        None => bail!("backend did not issue a {} cookie", config.api.csrf_cookie),
    }
    Ok(())
}

async fn check_login(config: &Config, login: &LoginArgs) -> Result<()> {
    let client = ApiClient::new(&config.api)?;
    let Some(credentials) = credentials(login)? else {
        bail!("--username and --password are required");
    };
    sign_in(&client, &credentials).await?;
    println!("login succeeded for {}", credentials.username);
    client.logout().await?;
    Ok(())
}

async fn list_page(
    config: &Config,
    path: &str,
    page: u32,
    query: &[(String, String)],
    login: &LoginArgs,
) -> Result<()> {
    let client = ApiClient::new(&config.api)?;
    if let Some(credentials) = credentials(login)? {
        sign_in(&client, &credentials).await?;
    }

    let slice: SliceEnvelope<Value> = client
        .fetch_slice(path, page, query)
        .await
        .with_context(|| format!("failed to fetch {path} page {page}"))?;
    let view = slice.view();

    let rows: Vec<Value> = view
        .numbered()
        .map(|(number, item)| json!({ "no": number, "item": item }))
        .collect();
    let output = json!({
        "page": view.current_page(),
        "page_size": view.page_size(),
        "should_show_pagination": view.should_show_pagination(),
        "pagination": view.pagination_state(),
        "rows": rows,
    });

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn show_config(config: &Config, show: bool) -> Result<()> {
    if show {
        println!("{}", toml::to_string_pretty(config)?);
    } else {
        println!("configuration is valid");
    }
    Ok(())
}

fn credentials(login: &LoginArgs) -> Result<Option<Credentials>> {
    match (&login.username, &login.password) {
        (Some(username), Some(password)) => Ok(Some(Credentials::new(username, password))),
        (None, None) => Ok(None),
        _ => bail!("--username and --password must be given together"),
    }
}

async fn sign_in(client: &ApiClient, credentials: &Credentials) -> Result<()> {
    client.fetch_csrf_token().await?;
    client.login(credentials).await?;
    Ok(())
}
