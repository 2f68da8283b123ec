use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gold_analytics::config::Config;
use gold_analytics::models::Granularity;
use gold_analytics::report::ReportFormat;

mod commands;

#[derive(Parser)]
#[command(
    name = "gold-analytics",
    version,
    about = "Trend, performance, segmentation and part-to-whole reports over the gold sales layer",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (TOML); environment variables are used otherwise
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding fact_sales.csv, dim_products.csv and dim_customers.csv
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format (text, json)
    #[arg(short, long, global = true)]
    format: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the configured format
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Clone, Copy, ValueEnum)]
enum GranularityArg {
    Month,
    Year,
}

impl From<GranularityArg> for Granularity {
    fn from(arg: GranularityArg) -> Self {
        match arg {
            GranularityArg::Month => Granularity::Month,
            GranularityArg::Year => Granularity::Year,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum SegmentTarget {
    Products,
    Customers,
}

#[derive(Subcommand)]
enum Commands {
    /// Sales, customers and quantity per month or year
    Trends {
        /// Period granularity
        #[arg(short, long, value_enum, default_value = "month")]
        granularity: GranularityArg,
    },

    /// Yearly running total of sales and running average price
    Cumulative,

    /// Yearly product sales against product average and prior year
    Performance,

    /// Product cost segments or customer VIP/Regular/New segments
    Segments {
        /// What to segment
        #[arg(value_enum)]
        target: SegmentTarget,

        /// List every product or customer with its segment instead of segment counts
        #[arg(long, default_value = "false")]
        detail: bool,
    },

    /// Share of each category in overall sales
    Contribution,

    /// Date coverage and headline measures
    Explore,

    /// Best (or worst) products by revenue
    Ranking {
        /// Number of products to show
        #[arg(short, long)]
        limit: Option<usize>,

        /// Show the lowest-revenue products instead
        #[arg(long, default_value = "false")]
        bottom: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::from_env()?,
    };
    if let Some(dir) = &cli.data_dir {
        config.data.sales_path = dir.join("fact_sales.csv");
        config.data.products_path = dir.join("dim_products.csv");
        config.data.customers_path = dir.join("dim_customers.csv");
    }
    if let Some(format) = &cli.format {
        config.report.format = format.clone();
    }
    if let Some(log_format) = &cli.log_format {
        config.logging.format = log_format.clone();
    }

    // Initialize tracing/logging
    setup_tracing(&config.logging.format, &config.logging.level, cli.verbose)?;

    config.validate().context("Invalid configuration")?;

    let format: ReportFormat = config
        .report
        .format
        .parse()
        .context("Invalid report format")?;

    tracing::debug!(config = ?config, "Configuration loaded");

    let warehouse = gold_analytics::storage::load_warehouse(&config.data)
        .context("Failed to load warehouse tables")?;
    let ctx = commands::Context::new(&warehouse, &config, format);

    let output = match cli.command {
        Commands::Trends { granularity } => {
            tracing::info!(granularity = %Granularity::from(granularity), "Starting trends command");
            commands::trends(&ctx, granularity.into())?
        }
        Commands::Cumulative => {
            tracing::info!("Starting cumulative command");
            commands::cumulative(&ctx)?
        }
        Commands::Performance => {
            tracing::info!("Starting performance command");
            commands::performance(&ctx)?
        }
        Commands::Segments { target, detail } => match target {
            SegmentTarget::Products => {
                tracing::info!(detail = %detail, "Starting product segments command");
                commands::product_segments(&ctx, detail)?
            }
            SegmentTarget::Customers => {
                tracing::info!(detail = %detail, "Starting customer segments command");
                commands::customer_segments(&ctx, detail)?
            }
        },
        Commands::Contribution => {
            tracing::info!("Starting contribution command");
            commands::contribution(&ctx)?
        }
        Commands::Explore => {
            tracing::info!("Starting explore command");
            commands::explore(&ctx)?
        }
        Commands::Ranking { limit, bottom } => {
            let limit = limit.unwrap_or(config.report.ranking_limit);
            tracing::info!(limit = %limit, bottom = %bottom, "Starting ranking command");
            commands::ranking(&ctx, limit, bottom)?
        }
    };

    print!("{output}");
    Ok(())
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = if verbose {
        tracing_subscriber::EnvFilter::new("gold_analytics=debug,info")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().or_else(|_| {
            tracing_subscriber::EnvFilter::try_new(format!("gold_analytics={level},warn"))
        })?
    };

    // Logs go to stderr so report output on stdout stays clean
    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    Ok(())
}
