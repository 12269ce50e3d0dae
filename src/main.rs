use analytics::AnalyticsEngine;
use anyhow::Context;
use clap::{Parser, Subcommand};
use configuration::{Config, DataSettings, DataSourceKind, LoggingSettings};
use core_types::{PriceTable, SectorTable};
use database::{DbRepository, connect, load_frame, run_migrations};
use polars::prelude::DataFrame;
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

mod render;

/// The main entry point for the stock insights dashboard.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => configuration::load_config_from(path),
        None => configuration::load_config(),
    }
    .context("Failed to load configuration")?;

    // The guard flushes the log file when `main` returns.
    let _log_guard = init_tracing(&config.logging)?;

    let engine = AnalyticsEngine::with_limits(config.analysis.ranking_limits())?;
    let snapshot = load_snapshot(&config, cli.source, &engine).await?;

    // Execute the appropriate command
    run(&cli, &engine, &snapshot)
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Volatility, returns, sector performance and correlations of a stock universe.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the configuration file (defaults to ./config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the data source from the configuration file.
    #[arg(long, value_enum, global = true)]
    source: Option<DataSourceKind>,

    /// Print the raw report as JSON instead of tables.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank tickers by the standard deviation of their daily returns.
    Volatility,
    /// Cumulative return curves of the best performing tickers.
    Cumulative {
        /// Only show the last N points of each curve.
        #[arg(long)]
        tail: Option<usize>,
    },
    /// Average total return per sector.
    Sectors,
    /// Pairwise correlation of closing prices.
    Correlation,
    /// Top gainers and losers of one month.
    Movers {
        /// The month label to rank (e.g., "2024-03").
        #[arg(long)]
        month: String,
    },
    /// List the month labels accepted by `movers`.
    Months,
    /// Run every view that needs no month selection.
    Dashboard,
}

// ==============================================================================
// Startup
// ==============================================================================

/// Installs the global subscriber: stderr output plus an optional daily log file.
///
/// `RUST_LOG` wins over the configured level when it is set.
fn init_tracing(settings: &LoggingSettings) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&settings.level)
            .with_context(|| format!("Invalid log level '{}'", settings.level))?,
    };

    let (file_layer, guard) = match file_appender(settings)? {
        Some(appender) => {
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_ansi(false).with_writer(writer)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .try_init()
        .context("Failed to install the tracing subscriber")?;

    Ok(guard)
}

/// The daily rolling log file, or `None` when no log directory is configured.
fn file_appender(settings: &LoggingSettings) -> anyhow::Result<Option<RollingFileAppender>> {
    let Some(directory) = &settings.directory else {
        return Ok(None);
    };
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(settings.file_prefix.as_str())
        .build(directory)
        .with_context(|| format!("Failed to open log directory {}", directory.display()))?;
    Ok(Some(appender))
}

/// The immutable input of one invocation.
struct Snapshot {
    prices: PriceTable,
    sectors: SectorTable,
}

async fn load_snapshot(
    config: &Config,
    source: Option<DataSourceKind>,
    engine: &AnalyticsEngine,
) -> anyhow::Result<Snapshot> {
    let source = source.unwrap_or(config.data.source);
    tracing::info!(?source, "Loading price and sector data");

    let (prices, sectors) = match source {
        DataSourceKind::Csv => load_csv(&config.data)?,
        DataSourceKind::Database => {
            let pool = connect().await.context("Failed to connect to the database")?;
            run_migrations(&pool).await.context("Failed to run database migrations")?;
            let repo = DbRepository::new(pool);
            let prices = repo.get_stock_data().await.context("Failed to fetch stock_data")?;
            let sectors = repo.get_sector_data().await.context("Failed to fetch sector_data")?;
            (prices, sectors)
        }
    };

    let (prices, sectors) = engine
        .load_tables(&prices, &sectors)
        .context("Input tables are malformed")?;
    Ok(Snapshot { prices, sectors })
}

fn load_csv(data: &DataSettings) -> anyhow::Result<(DataFrame, DataFrame)> {
    let (Some(prices_path), Some(sectors_path)) = (&data.prices_csv, &data.sectors_csv) else {
        anyhow::bail!("data.prices_csv and data.sectors_csv must both be set for the csv source");
    };
    let prices = load_frame(prices_path).with_context(|| format!("Failed to read {}", prices_path.display()))?;
    let sectors = load_frame(sectors_path).with_context(|| format!("Failed to read {}", sectors_path.display()))?;
    Ok((prices, sectors))
}

// ==============================================================================
// Command Dispatch
// ==============================================================================

fn run(cli: &Cli, engine: &AnalyticsEngine, snapshot: &Snapshot) -> anyhow::Result<()> {
    let limits = engine.limits();
    let prepared = engine.prepare(&snapshot.prices);

    match &cli.command {
        Commands::Volatility => {
            let report = engine.volatility(&prepared);
            emit(cli.json, &report, || render::volatility(&report, limits.volatility_top_n))
        }
        Commands::Cumulative { tail } => {
            let report = engine.cumulative_returns(&prepared);
            emit(cli.json, &report, || render::cumulative(&report, limits.cumulative_top_n, *tail))
        }
        Commands::Sectors => {
            let report = engine.sector_returns(&prepared, &snapshot.sectors);
            emit(cli.json, &report, || render::sectors(&report))
        }
        Commands::Correlation => {
            let report = engine.correlation(&prepared);
            emit(cli.json, &report, || render::correlation(&report))
        }
        Commands::Movers { month } => {
            let report = engine.monthly_movers(&prepared, month);
            emit(cli.json, &report, || render::movers(&report, limits.movers_per_side))
        }
        Commands::Months => {
            let report = engine.available_months(&prepared);
            emit(cli.json, &report, || render::months(&report))
        }
        Commands::Dashboard => {
            let report = engine.dashboard(&snapshot.prices, &snapshot.sectors);
            emit(cli.json, &report, || {
                [
                    render::volatility(&report.volatility, limits.volatility_top_n),
                    render::cumulative(&report.cumulative_returns, limits.cumulative_top_n, None),
                    render::sectors(&report.sector_returns),
                    render::correlation(&report.correlation),
                    format!("Available months\n{}", render::months(&report.months)),
                ]
                .join("\n\n")
            })
        }
    }
}

fn emit<T: serde::Serialize>(json: bool, report: &T, text: impl FnOnce() -> String) -> anyhow::Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        println!("{}", text());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging_into(directory: Option<PathBuf>) -> LoggingSettings {
        LoggingSettings {
            directory,
            ..LoggingSettings::default()
        }
    }

    #[test]
    fn no_log_directory_means_no_file() {
        assert!(file_appender(&logging_into(None)).unwrap().is_none());
    }

    #[test]
    fn unusable_log_directory_is_an_error() {
        // A regular file cannot hold a log directory.
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let err = file_appender(&logging_into(Some(blocker.path().join("logs"))))
            .err()
            .unwrap();
        assert!(err.to_string().contains("Failed to open log directory"));
    }

    #[test]
    fn log_file_lands_in_the_configured_directory() {
        let directory = tempfile::tempdir().unwrap();
        let appender = file_appender(&logging_into(Some(directory.path().to_path_buf()))).unwrap();
        assert!(appender.is_some());
    }
}
