mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::amortize::{AmortizeArgs, SubjectToArgs};
use commands::brrrr::BrrrrArgs;
use commands::fix_flip::FixFlipArgs;
use commands::hold::HoldArgs;
use commands::scenarios::{CapitalEventsArgs, ConfidenceArgs, ExchangeArgs};
use commands::underwrite::UnderwriteArgs;

/// Real-estate deal underwriting calculations
#[derive(Parser)]
#[command(
    name = "deal",
    version,
    about = "Real-estate deal underwriting calculations",
    long_about = "A CLI for underwriting real-estate deals with decimal precision. \
                  Supports amortization schedules, headline metrics (NOI, cap rate, \
                  cash-on-cash, DSCR), Fix & Flip, BRRRR, long-hold IRR/MOIC, \
                  confidence intervals, 1031 exchanges, and capital-event forecasts."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly payment and amortization schedule for a new loan
    Amortize(AmortizeArgs),
    /// Remaining schedule of an existing loan assumed mid-term
    SubjectTo(SubjectToArgs),
    /// Headline underwriting metrics for a deal
    Underwrite(UnderwriteArgs),
    /// Fix & Flip MAO, projected profit, and ROI
    FixFlip(FixFlipArgs),
    /// BRRRR refinance and cash-out economics
    Brrrr(BrrrrArgs),
    /// Long-hold projection with IRR and MOIC
    Hold(HoldArgs),
    /// Parametric confidence interval around a metric
    Confidence(ConfidenceArgs),
    /// 1031 exchange deferred gain, boot, and deadlines
    Exchange1031(ExchangeArgs),
    /// Heuristic capital-expenditure forecast by property age
    CapitalEvents(CapitalEventsArgs),
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

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::amortize::run_amortize(args),
        Commands::SubjectTo(args) => commands::amortize::run_subject_to(args),
        Commands::Underwrite(args) => commands::underwrite::run_underwrite(args),
        Commands::FixFlip(args) => commands::fix_flip::run_fix_flip(args),
        Commands::Brrrr(args) => commands::brrrr::run_brrrr(args),
        Commands::Hold(args) => commands::hold::run_hold(args),
        Commands::Confidence(args) => commands::scenarios::run_confidence(args),
        Commands::Exchange1031(args) => commands::scenarios::run_exchange(args),
        Commands::CapitalEvents(args) => commands::scenarios::run_capital_events(args),
        Commands::Version => {
            println!("deal {}", env!("CARGO_PKG_VERSION"));
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
