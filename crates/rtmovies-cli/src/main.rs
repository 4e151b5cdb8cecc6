//! rtmovies - Rotten Tomatoes movie lookup CLI.

/// Application configuration (TOML).
mod config;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use tracing::instrument;
use tracing_subscriber::filter::EnvFilter;
#[cfg(not(feature = "otel"))]
use tracing_subscriber::fmt;
#[cfg(feature = "otel")]
use tracing_subscriber::layer::SubscriberExt;
#[cfg(feature = "otel")]
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::{API_KEY_ENV, ApiConfig, AppConfig, resolve_config_path};
use rtmovies_api::rotten_tomatoes::{DEFAULT_BASE_URL, LocalRtApi, RtClient, RtMovie};

/// Binary name used for shell completion scripts.
const BIN_NAME: &str = "rtmovies";

/// CLI argument parser.
#[derive(Parser)]
#[command(name = BIN_NAME, about, version)]
struct Cli {
    /// Override config directory.
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Search movies by title.
    Search(SearchArgs),
    /// Show details for a single movie.
    Movie(MovieArgs),
    /// List the current box office.
    BoxOffice(CountryArgs),
    /// List movies opening this week.
    Opening(CountryArgs),
    /// Manage the config file.
    Config(ConfigCommand),
    /// Print a shell completion script.
    Completion(CompletionArgs),
}

/// Arguments for the `search` subcommand.
#[derive(clap::Args)]
struct SearchArgs {
    /// Search query (e.g. "inception").
    #[arg(long, short, required = true)]
    query: String,
}

/// Arguments for the `movie` subcommand.
#[derive(clap::Args)]
struct MovieArgs {
    /// Rotten Tomatoes movie ID (e.g. "12897").
    #[arg(long, required = true)]
    id: String,
}

/// Arguments for the `box-office` and `opening` subcommands.
#[derive(clap::Args)]
struct CountryArgs {
    /// Country code (e.g. "us"). Falls back to `api.country` in config, then "us".
    #[arg(long, short)]
    country: Option<String>,
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
    /// Show the resolved configuration.
    Show,
    /// Store the API key in the config file.
    SetKey(SetKeyArgs),
}

/// Arguments for the `config set-key` subcommand.
#[derive(clap::Args)]
struct SetKeyArgs {
    /// Rotten Tomatoes API key.
    #[arg(long, required = true)]
    key: String,
}

/// Arguments for the `completion` subcommand.
#[derive(clap::Args)]
struct CompletionArgs {
    /// Target shell.
    #[arg(long, value_enum)]
    shell: Shell,
}

/// Formats an optional value, using `-` when absent.
fn or_dash<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| String::from("-"), |v| v.to_string())
}

/// Logs a movie list as a table.
fn report_movies(movies: &[RtMovie]) {
    tracing::info!("ID\t\tTitle\t\t\tYear\tRuntime\tCritics\tAudience");
    for movie in movies {
        tracing::info!(
            "{}\t{}\t{}\t{}\t{}\t{}",
            movie.id,
            movie.title,
            or_dash(movie.year),
            or_dash(movie.runtime),
            or_dash(movie.ratings.critics_score),
            movie.ratings.audience_score,
        );
    }
    tracing::info!("Total: {} movies", movies.len());
}

/// Logs the detail view of a single movie.
fn report_movie(movie: &RtMovie) {
    tracing::info!("ID: {}", movie.id);
    tracing::info!("Title: {}", movie.title);
    tracing::info!("Year: {}", or_dash(movie.year));
    tracing::info!("MPAA Rating: {}", movie.mpaa_rating);
    tracing::info!(
        "Runtime: {}",
        movie
            .runtime
            .map_or_else(|| String::from("-"), |r| format!("{r} min"))
    );
    tracing::info!(
        "Critics: {} ({})",
        or_dash(movie.ratings.critics_score),
        movie.ratings.critics_rating.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Audience: {} ({})",
        movie.ratings.audience_score,
        movie.ratings.audience_rating.as_deref().unwrap_or("-")
    );
    tracing::info!(
        "Consensus: {}",
        movie.critics_consensus.as_deref().unwrap_or("-")
    );
    tracing::info!("Synopsis: {}", movie.synopsis.as_deref().unwrap_or("-"));
    tracing::info!(
        "IMDb: {}",
        movie.alternate_ids.get("imdb").map_or("-", String::as_str)
    );

    if !movie.release_dates.is_empty() {
        tracing::info!("Release dates:");
        for (kind, date) in &movie.release_dates {
            tracing::info!("  {}: {}", kind, date);
        }
    }

    if !movie.abridged_cast.is_empty() {
        tracing::info!("Cast:");
        for actor in &movie.abridged_cast {
            if actor.characters.is_empty() {
                tracing::info!("  {}", actor.name);
            } else {
                tracing::info!("  {} as {}", actor.name, actor.characters.join(", "));
            }
        }
    }
}

/// Runs the `search` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
#[allow(clippy::future_not_send)]
async fn run_search<A: LocalRtApi>(api: &A, args: &SearchArgs) -> Result<()> {
    let movies = api
        .search_movies(&args.query)
        .await
        .context("Rotten Tomatoes search request failed")?;
    report_movies(&movies);
    Ok(())
}

/// Runs the `movie` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
#[allow(clippy::future_not_send)]
async fn run_movie<A: LocalRtApi>(api: &A, args: &MovieArgs) -> Result<()> {
    let movie = api
        .get_movie(&args.id)
        .await
        .context("Rotten Tomatoes movie request failed")?;
    report_movie(&movie);
    Ok(())
}

/// Runs the `box-office` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
#[allow(clippy::future_not_send)]
async fn run_box_office<A: LocalRtApi>(api: &A, country: &str) -> Result<()> {
    tracing::info!("Box office ({})", country);
    let movies = api
        .box_office(country)
        .await
        .context("Rotten Tomatoes box office request failed")?;
    report_movies(&movies);
    Ok(())
}

/// Runs the `opening` subcommand.
///
/// # Errors
///
/// Returns an error if the API request fails.
#[instrument(skip_all)]
#[allow(clippy::future_not_send)]
async fn run_opening<A: LocalRtApi>(api: &A, country: &str) -> Result<()> {
    tracing::info!("Opening this week ({})", country);
    let movies = api
        .opening_movies(country)
        .await
        .context("Rotten Tomatoes opening movies request failed")?;
    report_movies(&movies);
    Ok(())
}

/// Loads the config file for the given directory override.
///
/// # Errors
///
/// Returns an error if the path cannot be resolved or the file cannot be parsed.
fn load_config(dir: Option<&PathBuf>) -> Result<(PathBuf, AppConfig)> {
    let config_path = resolve_config_path(dir).context("failed to resolve config path")?;
    let config = AppConfig::load(&config_path).context("failed to load config")?;
    Ok((config_path, config))
}

/// Builds an `RtClient` from `RT_API_KEY` and the `[api]` config section.
///
/// # Errors
///
/// Returns an error if no API key is available, the config values are
/// invalid, or the client fails to build.
#[instrument(skip_all)]
fn build_client(api: &ApiConfig) -> Result<RtClient> {
    let api_key = api.resolve_api_key(std::env::var(API_KEY_ENV).ok())?;

    let mut builder = RtClient::builder().api_key(api_key).user_agent(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    ));
    if let Some(url) = api.parsed_base_url()? {
        builder = builder.base_url(url);
    }
    if let Some(timeout) = api.timeout()? {
        builder = builder.timeout(timeout);
    }

    builder
        .build()
        .context("failed to build Rotten Tomatoes client")
}

/// Runs the `config show` subcommand.
///
/// # Errors
///
/// Returns an error if the config cannot be loaded.
#[instrument(skip_all)]
fn run_config_show(dir: Option<&PathBuf>) -> Result<()> {
    let (config_path, config) = load_config(dir)?;
    let env_key_set = std::env::var(API_KEY_ENV).is_ok_and(|k| !k.is_empty());
    let key_source = if env_key_set {
        "set (from RT_API_KEY)"
    } else if config.api.api_key.as_deref().is_some_and(|k| !k.is_empty()) {
        "set (from config)"
    } else {
        "not set"
    };

    tracing::info!("Config file: {}", config_path.display());
    tracing::info!("API key: {}", key_source);
    tracing::info!(
        "Base URL: {}",
        config.api.base_url.as_deref().unwrap_or(DEFAULT_BASE_URL)
    );
    tracing::info!(
        "Timeout: {}",
        config
            .api
            .timeout_secs
            .map_or_else(|| String::from("default"), |s| format!("{s}s"))
    );
    tracing::info!("Country: {}", config.api.resolve_country(None));

    Ok(())
}

/// Runs the `config set-key` subcommand.
///
/// # Errors
///
/// Returns an error if the key is empty or the config cannot be saved.
#[instrument(skip_all)]
fn run_config_set_key(args: &SetKeyArgs, dir: Option<&PathBuf>) -> Result<()> {
    if args.key.is_empty() {
        bail!("API key must not be empty");
    }

    let (config_path, mut config) = load_config(dir)?;
    config.api.api_key = Some(args.key.clone());
    config.save(&config_path).context("failed to save config")?;
    tracing::info!("Saved API key to {}", config_path.display());

    Ok(())
}

/// Runs the `completion` subcommand.
fn run_completion(args: &CompletionArgs) {
    clap_complete::generate(
        args.shell,
        &mut Cli::command(),
        BIN_NAME,
        &mut std::io::stdout(),
    );
}

/// Entry point.
///
/// # Errors
///
/// Returns an error if subcommand execution fails.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    #[cfg(not(feature = "otel"))]
    {
        fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
            )
            .with_target(false)
            .init();
    }

    #[cfg(feature = "otel")]
    {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
        let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);

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

    let cli = Cli::parse();
    let dir = cli.dir.as_ref();
    match cli.command {
        Commands::Search(args) => {
            let (_, config) = load_config(dir)?;
            let client = build_client(&config.api)?;
            run_search(&client, &args).await
        }
        Commands::Movie(args) => {
            let (_, config) = load_config(dir)?;
            let client = build_client(&config.api)?;
            run_movie(&client, &args).await
        }
        Commands::BoxOffice(args) => {
            let (_, config) = load_config(dir)?;
            let client = build_client(&config.api)?;
            let country = config.api.resolve_country(args.country.as_deref());
            run_box_office(&client, &country).await
        }
        Commands::Opening(args) => {
            let (_, config) = load_config(dir)?;
            let client = build_client(&config.api)?;
            let country = config.api.resolve_country(args.country.as_deref());
            run_opening(&client, &country).await
        }
        Commands::Config(cmd) => match cmd.command {
            ConfigSubcommands::Show => run_config_show(dir),
            ConfigSubcommands::SetKey(args) => run_config_set_key(&args, dir),
        },
        Commands::Completion(args) => {
            run_completion(&args);
            Ok(())
        }
    }
}
