use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod charts;
mod config;
mod dashboard;
mod html;
mod loader;
mod metrics;
mod models;
mod report;
mod server;

use config::DashboardSettings;
use models::Dashboard;

#[derive(Parser)]
#[command(name = "sap-access-dashboard")]
#[command(about = "KPI dashboard for SAP access support tickets", long_about = None)]
struct Cli {
    /// Spreadsheet (xlsx/xls/xlsb/ods) or CSV export with the ticket records
    #[arg(long, global = true, default_value = config::DEFAULT_SOURCE)]
    file: PathBuf,
    /// Sheet holding the ticket records
    #[arg(long, global = true, default_value = config::DEFAULT_SHEET)]
    sheet: String,
    /// Incident type the dashboard is restricted to
    #[arg(long, global = true, default_value = config::DEFAULT_INCIDENT_TYPE)]
    incident_type: String,
    /// Number of branches shown in the distribution chart
    #[arg(long, global = true, default_value_t = config::DEFAULT_TOP_BRANCHES)]
    top_branches: usize,
    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the headline KPIs and the category breakdown
    Summary,
    /// Write a dashboard snapshot to a file
    Report {
        #[arg(long, value_enum, default_value_t = ReportFormat::Html)]
        format: ReportFormat,
        #[arg(long, default_value = "dashboard.html")]
        out: PathBuf,
        /// Category to drill into; defaults to the most frequent one
        #[arg(long)]
        category: Option<String>,
    },
    /// Serve the interactive dashboard over HTTP
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    Markdown,
    Html,
    Json,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = DashboardSettings {
        source: cli.file,
        sheet: cli.sheet,
        incident_type: cli.incident_type,
        top_branches: cli.top_branches,
    };

    let tickets = loader::load_tickets(&settings.source, &settings.sheet).with_context(|| {
        format!(
            "failed to load sheet '{}' from {}",
            settings.sheet,
            settings.source.display()
        )
    })?;

    match cli.command {
        Commands::Summary => {
            let dashboard = dashboard::build_dashboard(&tickets, &settings, None);
            match dashboard {
                Dashboard::Empty { title, message } => {
                    println!("{title}");
                    println!("{message}");
                }
                Dashboard::Populated(view) => {
                    println!("{}", view.title);
                    for tile in &view.tiles {
                        println!("- {}: {}", tile.label, tile.value);
                    }
                    println!("Tickets by category:");
                    for entry in &view.categories {
                        println!("- {}: {}", entry.label, entry.count);
                    }
                }
            }
        }
        Commands::Report {
            format,
            out,
            category,
        } => {
            let dashboard = dashboard::build_dashboard(&tickets, &settings, category.as_deref());
            let rendered = match format {
                ReportFormat::Markdown => report::render_markdown(&dashboard),
                ReportFormat::Html => {
                    html::render_page(&dashboard, &html::HtmlOptions::default())?
                }
                ReportFormat::Json => serde_json::to_string_pretty(&dashboard)?,
            };
            std::fs::write(&out, rendered)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Dashboard written to {}.", out.display());
        }
        Commands::Serve { bind } => {
            let state = server::AppState {
                settings,
                tickets: Arc::new(tickets),
            };
            println!("Serving dashboard on http://{bind}");
            server::run_server(&bind, state).await?;
        }
    }

    Ok(())
}
