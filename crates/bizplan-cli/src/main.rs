mod commands;
mod config;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::forecast::{ForecastArgs, ProjectionArgs, QuarterlyRevenueArgs};
use commands::lending::{AmortizeArgs, AssessLoanArgs};
use commands::planning::PlanArgs;
use commands::ratios::{DscrArgs, RatiosArgs};

/// Small-business forecasts, loan schedules and solvency ratios
#[derive(Parser)]
#[command(
    name = "bizplan",
    version,
    about = "Small-business forecasts, loan schedules and solvency ratios",
    long_about = "A CLI for small-business financial planning with decimal precision. \
                  Builds seasonality-adjusted profit forecasts, loan amortization \
                  schedules, DSCR risk assessments and key financial ratios."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,

    /// Assessment message table (YAML or JSON); the bundled table is used when omitted
    #[arg(long, global = true)]
    messages: Option<String>,

    /// Log computation details to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Seasonality-adjusted monthly, quarterly and annual profit forecast
    Forecast(ForecastArgs),
    /// Per-product revenue for each quarter
    QuarterlyRevenue(QuarterlyRevenueArgs),
    /// Multi-year P&L projection with DSCR
    Projection(ProjectionArgs),
    /// Fixed-payment loan amortization schedule
    Amortize(AmortizeArgs),
    /// DSCR risk assessment of a loan payment
    AssessLoan(AssessLoanArgs),
    /// Profitability, liquidity, leverage and coverage ratios
    Ratios(RatiosArgs),
    /// Debt service coverage ratio and risk tier
    Dscr(DscrArgs),
    /// Full plan: forecast, ratios and optional loan assessment
    Plan(PlanArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let messages = match config::load_messages(cli.messages.as_deref()) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    };

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Forecast(args) => commands::forecast::run_forecast(args),
        Commands::QuarterlyRevenue(args) => commands::forecast::run_quarterly_revenue(args),
        Commands::Projection(args) => commands::forecast::run_projection(args),
        Commands::Amortize(args) => commands::lending::run_amortize(args),
        Commands::AssessLoan(args) => commands::lending::run_assess_loan(args, &messages),
        Commands::Ratios(args) => commands::ratios::run_ratios(args),
        Commands::Dscr(args) => commands::ratios::run_dscr(args),
        Commands::Plan(args) => commands::planning::run_plan(args, &messages),
        Commands::Version => {
            println!("bizplan {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
