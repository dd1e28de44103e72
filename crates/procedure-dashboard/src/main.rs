//! Medical Procedure Dashboard
//!
//! Loads a procedure billing spreadsheet and shows monthly volume, billed
//! amounts and the state, authorizer, evaluator and procedure breakdowns,
//! either as a one-shot summary, as CSV exports or in an interactive session.

mod charts;
mod config;
mod constants;
mod render;
mod reports;
mod session;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use procedure_core::{ColumnSchema, DashboardState, DashboardView, MonthFilter, load_workbook};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use charts::TextChartRenderer;
use config::FileConfig;
use session::Session;

#[derive(Parser, Debug)]
#[command(name = "procedure-dashboard")]
#[command(about = "Dashboard for medical procedure volume and billing spreadsheets")]
struct Args {
    /// Config file with column name overrides (default: ./dashboard.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the dashboard for a spreadsheet
    Summary {
        /// Spreadsheet to load (.xlsx, .xls, .ods)
        file: PathBuf,

        /// Month filter: "all" or 1-12
        #[arg(long, default_value = "all")]
        month: MonthFilter,

        /// Tab to show: overview, procedures or financial
        #[arg(long, default_value = "overview")]
        view: DashboardView,

        /// Print the aggregated views as JSON instead
        #[arg(long)]
        json: bool,
    },

    /// Write every view as CSV
    Export {
        /// Spreadsheet to load (.xlsx, .xls, .ods)
        file: PathBuf,

        /// Month filter: "all" or 1-12
        #[arg(long, default_value = "all")]
        month: MonthFilter,

        /// Output directory for generated CSV reports
        #[arg(short, long)]
        output_dir: Option<PathBuf>,
    },

    /// Interactive session (load, filter and switch tabs)
    Interactive {
        /// Spreadsheet to load on start
        file: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

/// Load a spreadsheet into a fresh state, failing on load errors
async fn load_state(file: &Path, schema: &ColumnSchema) -> Result<DashboardState> {
    let mut state = DashboardState::new();
    let ticket = state.begin_load();

    let workbook = load_workbook(file, schema)
        .await
        .with_context(|| format!("Could not load {}", file.display()))?;

    info!(
        sheet = %workbook.sheet_name,
        records = workbook.records.len(),
        "Spreadsheet loaded"
    );

    state.complete_load(ticket, Ok(workbook));
    Ok(state)
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = FileConfig::resolve(args.config.as_deref())?;

    match args.command {
        Command::Summary {
            file,
            month,
            view,
            json,
        } => {
            let mut state = load_state(&file, &config.columns).await?;
            state.set_month_filter(month);
            state.set_active_view(view);

            if json {
                println!("{}", serde_json::to_string_pretty(&*state.snapshot())?);
            } else {
                print!(
                    "{}",
                    render::render_dashboard(&mut state, &TextChartRenderer::default())
                );
            }
        }

        Command::Export {
            file,
            month,
            output_dir,
        } => {
            let mut state = load_state(&file, &config.columns).await?;
            state.set_month_filter(month);
            let snapshot = state.snapshot();

            let output_dir = config.output_dir(output_dir);
            println!("Generating reports for {} ({})...", file.display(), month.label());
            let written = reports::generate_all_reports(&output_dir, &snapshot)?;
            for path in &written {
                println!("  Generated: {}", path.display());
            }
            println!(
                "\n{} procedures, {} billed",
                snapshot.summary.total_procedures,
                procedure_core::format::format_brl(snapshot.summary.total_billed)
            );
        }

        Command::Interactive { file } => {
            Session::new(config.columns).run(file).await?;
        }
    }

    Ok(())
}
