use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Datelike;
use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use watchlens::{
    analytics::{
        profile_names, require_profile, ExportConfig, ExportFormat, ExportManager, ProfileReport,
        SortOrder,
    },
    config::{AppConfig, ConfigManager},
    database::{default_database_path, SqliteCache},
    enrichment::{EnrichmentCache, NoCache},
    io::load_viewing_activity,
    utils::init_logging,
    CsfdClient, EnrichmentPipeline,
};

#[derive(Parser, Debug)]
#[command(name = "watchlens")]
#[command(about = "Viewing history analytics enriched with catalog metadata")]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[command(flatten)]
    analyze: AnalyzeArgs,

    /// Config file (defaults to the XDG config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(ClapArgs, Debug, Clone)]
struct AnalyzeArgs {
    /// ViewingActivity.csv export
    export_file: Option<PathBuf>,

    /// Profile to analyze
    #[arg(long, short)]
    profile: Option<String>,

    /// Always scrape, never read or write the enrichment cache
    #[arg(long)]
    no_cache: bool,

    /// Write the enriched title table to this file
    #[arg(long)]
    export: Option<PathBuf>,

    /// Export format (defaults to the export file extension, then CSV)
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Keep unresolved titles in the export
    #[arg(long)]
    include_unresolved: bool,

    #[arg(long, value_enum, default_value = "title")]
    sort: SortArg,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the profile names found in an export
    Profiles { export_file: PathBuf },
    /// Inspect or clear the enrichment cache
    #[command(subcommand)]
    Cache(CacheCommand),
}

#[derive(Debug, Subcommand)]
enum CacheCommand {
    /// List cached profiles
    List,
    /// Drop the cached titles of a profile
    Clear { profile: String },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for ExportFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum SortArg {
    Original,
    Title,
    Rating,
    Year,
}

impl From<SortArg> for SortOrder {
    fn from(sort: SortArg) -> Self {
        match sort {
            SortArg::Original => SortOrder::Original,
            SortArg::Title => SortOrder::ByTitle,
            SortArg::Rating => SortOrder::ByRating,
            SortArg::Year => SortOrder::ByYear,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match &cli.config {
        Some(path) => ConfigManager::with_path(path.clone())?,
        None => ConfigManager::new()?,
    };
    let config = config_manager.load_config()?;
    let _log_guard = init_logging(&config.log)?;

    tracing::info!("🎬 Starting watchlens");

    match cli.command {
        Some(Command::Profiles { export_file }) => list_profiles(&export_file, &config),
        Some(Command::Cache(command)) => run_cache_command(command, &config),
        None => run_analyze(cli.analyze, &config).await,
    }
}

fn list_profiles(export_file: &Path, config: &AppConfig) -> Result<()> {
    let events = load_viewing_activity(export_file, config.loader.min_duration())
        .with_context(|| format!("Failed to load {}", export_file.display()))?;

    for name in profile_names(&events) {
        println!("{}", name);
    }
    Ok(())
}

fn open_cache(config: &AppConfig) -> Result<SqliteCache> {
    let path = match &config.cache.database_path {
        Some(path) => path.clone(),
        None => default_database_path()?,
    };
    tracing::debug!("🗄️ Opening cache at {}", path.display());
    SqliteCache::new(&path).with_context(|| format!("Failed to open cache {}", path.display()))
}

fn run_cache_command(command: CacheCommand, config: &AppConfig) -> Result<()> {
    let cache = open_cache(config)?;
    match command {
        CacheCommand::List => {
            for profile in cache.cached_profiles()? {
                println!(
                    "{}\t{} titles\t{}",
                    profile.profile_name,
                    profile.title_count,
                    profile.cached_at.format("%Y-%m-%d %H:%M")
                );
            }
        }
        CacheCommand::Clear { profile } => {
            if cache.invalidate(&profile)? {
                println!("Cleared cached titles of '{}'", profile);
            } else {
                println!("No cached titles for '{}'", profile);
            }
        }
    }
    Ok(())
}

async fn run_analyze(args: AnalyzeArgs, config: &AppConfig) -> Result<()> {
    let export_file = args
        .export_file
        .context("Missing export file (usage: watchlens <export.csv> --profile <name>)")?;
    let profile = args.profile.context("Missing --profile <name>")?;

    let events = load_viewing_activity(&export_file, config.loader.min_duration())
        .with_context(|| format!("Failed to load {}", export_file.display()))?;
    let own = require_profile(&events, &profile)?;
    tracing::info!(
        "📊 {} sessions for '{}' out of {} in total",
        own.len(),
        profile,
        events.len()
    );

    let client = CsfdClient::new(&config.catalog)?;
    let pipeline = EnrichmentPipeline::from_config(client, &config.catalog);

    let sqlite_cache;
    let cache: &dyn EnrichmentCache = if args.no_cache || !config.cache.enabled {
        &NoCache
    } else {
        match open_cache(config) {
            Ok(opened) => {
                sqlite_cache = opened;
                &sqlite_cache
            }
            Err(e) => {
                tracing::warn!("⚠️ Cache unavailable, scraping without it: {:#}", e);
                &NoCache
            }
        }
    };

    let view = pipeline.enrich_profile(&own, &profile, cache).await;
    let report = ProfileReport::build(&events, &view, chrono::Local::now().year());
    print!("{}", report);

    if let Some(path) = args.export {
        let format = args
            .format
            .map(ExportFormat::from)
            .or_else(|| ExportFormat::from_path(&path))
            .unwrap_or(ExportFormat::Csv);
        let export_config = ExportConfig {
            format,
            include_unresolved: args.include_unresolved,
            sort_order: args.sort.into(),
            ..Default::default()
        };
        ExportManager::new()
            .export_to_file(&view.all_titles(), &export_config, &path)
            .with_context(|| format!("Failed to export to {}", path.display()))?;
    }

    Ok(())
}
