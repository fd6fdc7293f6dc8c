mod analytics;
mod api;
mod db;
mod models;
mod settings;
mod tui;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::db::Database;
use crate::settings::Settings;

#[derive(Parser)]
#[command(name = "portfolio", about = "Project portfolio dashboard and tracking API")]
struct Cli {
    /// Log filter, e.g. `info` or `portfolio=debug`. Falls back to RUST_LOG.
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API
    Serve {
        /// Listen address, e.g. 0.0.0.0:5000
        #[arg(long)]
        addr: Option<String>,
    },
    /// Launch the terminal UI
    Tui,
    /// Show portfolio totals
    Status,
    /// Load the demonstration portfolio
    Seed,
    /// Delete every project
    Clear,
}

fn init_logging(level: Option<&str>) {
    let filter = level
        .and_then(|l| EnvFilter::try_new(l).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn print_status(db: &Database) -> Result<()> {
    let projects = db::project::list_projects(db, None)?;
    let stats = analytics::aggregate(&projects);
    let summary = analytics::summarize(&projects, Utc::now());

    println!("Projects:        {} ({} active)", stats.total_projects, stats.active_projects);
    println!("Total budget:    ${}", stats.total_budget);
    println!("Actual spend:    ${}", stats.total_actual_spend);
    println!("Avg R&D share:   {:.1}%", stats.avg_rd_percentage);
    println!("R&D tax credit:  ${}", analytics::total_tax_credit(&projects));
    println!(
        "Schedule:        {} completed, {} upcoming, {} on track, {} overdue",
        summary.completed, summary.upcoming, summary.on_track, summary.overdue
    );

    if !stats.stage_distribution.is_empty() {
        println!();
        for budget in analytics::budget_by_stage(&projects) {
            println!(
                "  {:<14} {:>3}  forecast ${:<12} actual ${}",
                budget.stage.as_str(),
                budget.count,
                budget.total_forecast,
                budget.total_actual
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The TUI owns the terminal, so it runs without a log subscriber.
    if !matches!(cli.command, Commands::Tui) {
        init_logging(cli.log_level.as_deref());
    }
    let settings = Settings::load();

    match cli.command {
        Commands::Serve { addr } => api::serve(&settings, addr).await?,
        Commands::Tui => tui::run(&settings)?,
        Commands::Status => print_status(&Database::open_default(&settings)?)?,
        Commands::Seed => {
            let db = Database::open_default(&settings)?;
            let count = db::seed::seed_projects(&db)?;
            let total = db::project::count_projects(&db)?;
            println!("Seeded {count} projects ({total} total)");
        }
        Commands::Clear => {
            let db = Database::open_default(&settings)?;
            let deleted = db::project::clear_projects(&db)?;
            tracing::info!(deleted, "cleared all projects");
            println!("Deleted {deleted} projects");
        }
    }

    Ok(())
}
