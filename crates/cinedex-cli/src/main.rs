//! cinedex - terminal movie browser backed by the TMDB catalog.

/// Application configuration (TOML).
mod config;

use std::fs::{File, OpenOptions};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;
use url::Url;

use crate::config::{AppConfig, CatalogConfig, resolve_config_path, resolve_data_dir};
use cinedex_api::catalog::{
    CatalogClient, Category, LocalCatalogApi, MovieDetails, MovieSummary, poster_url,
};
use cinedex_tui::browser::location::Location;
use cinedex_tui::browser::run_browser;

/// Environment variable holding a v4 bearer token.
const TOKEN_ENV: &str = "TMDB_API_TOKEN";

/// Environment variable holding a v3 API key.
const API_KEY_ENV: &str = "TMDB_API_KEY";

/// Log file written while the browser owns the terminal.
const LOG_FILE_NAME: &str = "cinedex.log";

/// CLI argument parser.
#[derive(Parser)]
#[command(about, version)]
struct Cli {
    /// Override config/data directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Browse movies interactively via TUI.
    Browse(BrowseArgs),
    /// List one page of a movie category.
    List(ListArgs),
    /// List one page of popular movies.
    Popular(PageArgs),
    /// Search movies by title.
    Search(SearchArgs),
    /// Show the details of one movie.
    Details(DetailsArgs),
    /// Manage the config file.
    Config(ConfigCommand),
}

/// Arguments for the `browse` subcommand.
#[derive(clap::Args)]
struct BrowseArgs {
    /// Open the detail view of this movie.
    #[arg(long, conflicts_with = "location")]
    movie_id: Option<String>,

    /// Addressed view as a query string (e.g. "?movieId=603").
    #[arg(long)]
    location: Option<String>,
}

/// Arguments for the `list` subcommand.
#[derive(clap::Args)]
struct ListArgs {
    /// Category: popular, `top_rated`, `now_playing` or upcoming.
    #[arg(long, default_value = "popular")]
    category: Category,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `popular` subcommand.
#[derive(clap::Args)]
struct PageArgs {
    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "The Matrix").
    #[arg(long, required = true)]
    query: String,

    /// Page number.
    #[arg(long, default_value_t = 1)]
    page: u32,
}

/// Arguments for the `details` subcommand.
#[derive(clap::Args)]
struct DetailsArgs {
    /// TMDB movie ID.
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `config` subcommand.
#[derive(clap::Args)]
struct ConfigCommand {
    /// Config subcommand to run.
    #[command(subcommand)]
    command: ConfigSubcommands,
}

/// Available config subcommands.
#[derive(Subcommand)]
enum ConfigSubcommands {
    /// Write a config file with default values (keeps an existing one).
    Init,
    /// Print the effective configuration.
    Show,
}

/// Installs the global tracing subscriber.
///
/// With `log_file` set, output goes to that file without ANSI colors, so it
/// does not interfere with the TUI.
fn init_tracing(log_file: Option<File>) {
    let ansi = log_file.is_none();
    let writer = log_file.map_or_else(
        || BoxMakeWriter::new(std::io::stderr),
        |file| BoxMakeWriter::new(Mutex::new(file)),
    );
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    #[cfg(not(feature = "otel"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_ansi(ansi)
            .with_writer(writer);

        let otel_layer = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
            .ok()
            .and_then(|_| {
                let exporter = opentelemetry_otlp::SpanExporter::builder()
                    .with_http()
                    .build()
                    .ok()?;

                let tracer_provider = opentelemetry_sdk::trace::SdkTracerProvider::builder()
                    .with_simple_exporter(exporter)
                    .build();

                let tracer = opentelemetry::trace::TracerProvider::tracer(
                    &tracer_provider,
                    env!("CARGO_PKG_NAME"),
                );
                opentelemetry::global::set_tracer_provider(tracer_provider);

                Some(tracing_opentelemetry::layer().with_tracer(tracer))
            });

        tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .with(otel_layer)
            .init();
    }
}

/// Opens (appending) the browser log file in the data directory.
///
/// # Errors
///
/// Returns an error if the directory cannot be created or the file opened.
fn open_log_file(dir: Option<&PathBuf>) -> Result<File> {
    let data_dir = resolve_data_dir(dir)?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("failed to create directory {}", data_dir.display()))?;
    let path = data_dir.join(LOG_FILE_NAME);
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

/// Loads the config file for the given directory override.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file is invalid.
fn load_config(dir: Option<&PathBuf>) -> Result<AppConfig> {
    let path = resolve_config_path(dir)?;
    AppConfig::load(&path)
}

/// Reads a non-empty environment variable.
fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

/// Builds a `CatalogClient` from the config and the `TMDB_API_TOKEN` /
/// `TMDB_API_KEY` environment variables (token preferred).
///
/// # Errors
///
/// Returns an error if no credential is set, the base URL is invalid or the
/// client fails to build.
fn build_catalog_client(config: &CatalogConfig) -> Result<CatalogClient> {
    let mut builder = CatalogClient::builder()
        .user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ))
        .language(config.language.clone());

    builder = if let Some(token) = non_empty_env(TOKEN_ENV) {
        builder.bearer_token(token)
    } else if let Some(key) = non_empty_env(API_KEY_ENV) {
        builder.api_key(key)
    } else {
        anyhow::bail!("{TOKEN_ENV} or {API_KEY_ENV} environment variable is required");
    };

    if config.timeout_secs > 0 {
        builder = builder.timeout(Duration::from_secs(config.timeout_secs));
    }

    if let Some(base_url) = &config.base_url {
        let url = Url::parse(base_url)
            .with_context(|| format!("invalid catalog base_url: {base_url}"))?;
        builder = builder.base_url(url);
    }

    builder.build().context("failed to build catalog client")
}

/// Logs one page of movie summaries.
fn log_movies(movies: &[MovieSummary]) {
    tracing::info!("ID\tReleaseDate\tTitle");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}",
            movie.id,
            if movie.release_date.is_empty() {
                "-"
            } else {
                movie.release_date.as_str()
            },
            movie.title,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Runs the `browse` subcommand.
///
/// # Errors
///
/// Returns an error if the config or client cannot be set up, or the TUI fails.
async fn run_browse(args: BrowseArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let initial = match (args.movie_id, args.location) {
        (Some(movie_id), _) => Location::movie(movie_id),
        (None, Some(query)) => Location::from_query(&query),
        (None, None) => Location::list(),
    };

    run_browser(Arc::new(client), initial, config.browser.total_pages).await
}

/// Runs the `list` subcommand.
///
/// # Errors
///
/// Returns an error if the config or client cannot be set up.
#[instrument(skip_all)]
async fn run_list(args: &ListArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    tracing::info!("Category: {} (page {})", args.category.label(), args.page);
    let movies = client.list_by_category(args.category, args.page).await;
    log_movies(&movies);

    Ok(())
}

/// Runs the `popular` subcommand.
///
/// # Errors
///
/// Returns an error if the config or client cannot be set up.
#[instrument(skip_all)]
async fn run_popular(args: &PageArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let movies = client.list_popular(args.page).await;
    log_movies(&movies);

    Ok(())
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the config or client cannot be set up.
#[instrument(skip_all)]
async fn run_search(args: &SearchArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let movies = client.search(&args.query, args.page).await;
    log_movies(&movies);

    Ok(())
}

/// Runs the `details` subcommand.
///
/// # Errors
///
/// Returns an error if the config or client cannot be set up, or the
/// details request fails.
#[instrument(skip_all)]
async fn run_details(args: &DetailsArgs, dir: Option<&PathBuf>) -> Result<()> {
    let config = load_config(dir)?;
    let client = build_catalog_client(&config.catalog)?;

    let details: MovieDetails = client
        .details(&args.id)
        .await
        .with_context(|| format!("failed to fetch details for movie {}", args.id))?;

    let genres: Vec<&str> = details.genres.iter().map(|g| g.name.as_str()).collect();
    tracing::info!("ID:       {}", details.summary.id);
    tracing::info!("Title:    {}", details.summary.title);
    tracing::info!("Released: {}", details.summary.release_date);
    tracing::info!("Runtime:  {} minutes", details.runtime);
    tracing::info!("Genres:   {}", genres.join(", "));
    tracing::info!(
        "Poster:   {}",
        poster_url(&details.summary.poster_path).unwrap_or_else(|| String::from("-"))
    );
    tracing::info!("Overview: {}", details.summary.overview);

    Ok(())
}

/// Runs the `config init` subcommand.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be written.
fn run_config_init(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    if path.exists() {
        tracing::info!("Config already exists: {}", path.display());
        return Ok(());
    }
    AppConfig::default().save(&path)?;
    tracing::info!("Wrote default config: {}", path.display());
    Ok(())
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config file is invalid.
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let path = resolve_config_path(dir)?;
    let config = AppConfig::load(&path)?;
    tracing::info!("Config file: {}", path.display());
    tracing::info!("catalog.language:     {}", config.catalog.language);
    tracing::info!("catalog.timeout_secs: {}", config.catalog.timeout_secs);
    tracing::info!(
        "catalog.base_url:     {}",
        config.catalog.base_url.as_deref().unwrap_or("(default)")
    );
    tracing::info!("browser.total_pages:  {}", config.browser.total_pages);
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_file = match cli.command {
        Commands::Browse(_) => Some(open_log_file(cli.dir.as_ref())?),
        _ => None,
    };
    init_tracing(log_file);

    match cli.command {
        Commands::Browse(args) => run_browse(args, cli.dir.as_ref()).await,
        Commands::List(args) => run_list(&args, cli.dir.as_ref()).await,
        Commands::Popular(args) => run_popular(&args, cli.dir.as_ref()).await,
        Commands::Search(args) => run_search(&args, cli.dir.as_ref()).await,
        Commands::Details(args) => run_details(&args, cli.dir.as_ref()).await,
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Init => run_config_init(cli.dir.as_ref()),
            ConfigSubcommands::Show => run_config_show(cli.dir.as_ref()),
        },
    }
}
