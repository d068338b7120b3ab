//! Funding Insights - Startup Funding Dataset Explorer
//!
//! Interactive dashboard over a cleaned startup-funding CSV, plus headless
//! reports for the terminal.

mod charts;
mod config;
mod data;
mod gui;
mod query;
mod report;
mod views;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use config::AppConfig;
use data::{DataLoader, FundingTable};
use eframe::egui;
use gui::DashboardApp;
use query::{InvestorQueries, MarketQueries, Metric};
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};
use views::{InvestorTrail, Navigation, OverviewParams};

#[derive(Parser)]
#[command(name = "funding-insights", version, about = "Startup funding dataset explorer")]
struct Cli {
    /// Dataset CSV (overrides the configured data path)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a dashboard page to stdout
    Report {
        /// Emit JSON instead of tables
        #[arg(long, global = true)]
        json: bool,

        #[command(subcommand)]
        page: ReportCommand,
    },
    /// List selectable names
    List {
        #[arg(value_enum)]
        what: ListTarget,
    },
}

#[derive(Subcommand)]
enum ReportCommand {
    /// Overall analysis
    Overview {
        /// Metric for the month-on-month series
        #[arg(long, value_enum, default_value_t = MetricArg::Money)]
        metric: MetricArg,

        /// Metric for the sector breakdown
        #[arg(long, value_enum, default_value_t = MetricArg::Money)]
        sector_metric: MetricArg,
    },
    /// One startup's funding history
    Startup { name: String },
    /// One investor, optionally followed by a chain of similar investors
    Investor {
        name: String,

        #[arg(long = "similar")]
        similar: Vec<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MetricArg {
    Money,
    Count,
}

impl From<MetricArg> for Metric {
    fn from(arg: MetricArg) -> Self {
        match arg {
            MetricArg::Money => Metric::Money,
            MetricArg::Count => Metric::Count,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListTarget {
    Startups,
    Investors,
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("setting default subscriber failed")?;

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(path) = cli.data {
        config.data_path = path;
    }

    match cli.command {
        None => run_dashboard(config),
        Some(Commands::List { what }) => {
            let table = load_table(&config)?;
            let names = match what {
                ListTarget::Startups => MarketQueries::startup_names(table.records())?,
                ListTarget::Investors => InvestorQueries::vocabulary(&table)?,
            };
            for name in names {
                println!("{}", name);
            }
            Ok(())
        }
        Some(Commands::Report { json, page }) => {
            let table = load_table(&config)?;
            let navigation = match page {
                ReportCommand::Overview { metric, sector_metric } => Navigation::Overview(OverviewParams {
                    series_metric: metric.into(),
                    sector_metric: sector_metric.into(),
                }),
                ReportCommand::Startup { name } => Navigation::Startup(name),
                ReportCommand::Investor { name, similar } => {
                    let trail = similar
                        .into_iter()
                        .enumerate()
                        .fold(InvestorTrail::new(name), |trail, (depth, next)| trail.drill(depth, next));
                    Navigation::Investor(trail)
                }
            };

            let view = views::render(&table, &navigation, &config)
                .with_context(|| format!("failed to build {:?}", navigation))?;
            if json {
                println!("{}", report::render_json(&view)?);
            } else {
                print!("{}", report::render_text(&view));
            }
            Ok(())
        }
    }
}

fn load_table(config: &AppConfig) -> Result<FundingTable> {
    let loader = DataLoader::new(config.dataset.clone());
    loader
        .load(&config.data_path)
        .with_context(|| format!("failed to load dataset {}", config.data_path.display()))
}

fn run_dashboard(config: AppConfig) -> Result<()> {
    // A missing dataset is not fatal here; the user can open one from the panel.
    let table = if Path::new(&config.data_path).exists() {
        match load_table(&config) {
            Ok(table) => Some(table),
            Err(e) => {
                warn!("{:#}", e);
                None
            }
        }
    } else {
        warn!("dataset {} not found, starting empty", config.data_path.display());
        None
    };

    info!("starting dashboard");
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Startup Funding Analysis"),
        ..Default::default()
    };

    eframe::run_native(
        "Funding Insights",
        options,
        Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, config, table)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard failed: {}", e))
}
