mod commands;
mod input;
mod logging;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::compare::CompareArgs;
use commands::exit::ExitArgs;
use commands::mortgage::MortgageArgs;
use commands::plan::PlanArgs;
use commands::quote::QuoteArgs;

/// Off-plan property investment calculations
#[derive(Parser)]
#[command(
    name = "oroi",
    version,
    about = "Off-plan property investment calculations",
    long_about = "A CLI for projecting the returns of off-plan property purchases \
                  with decimal precision. Supports payment plans, yearly hold \
                  projections, exit scenarios, mortgages and multi-quote comparison."
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
    /// Full quote: payment plan, projection, hold analysis, exits, mortgage
    Quote(QuoteArgs),
    /// Profitability of reselling at given months after booking
    Exit(ExitArgs),
    /// Mortgage payment, fees and financing gap
    Mortgage(MortgageArgs),
    /// Payment plan schedule and balance check
    Plan(PlanArgs),
    /// Compare several quotes side by side
    Compare(CompareArgs),
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
    logging::init_tracing();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Quote(args) => commands::quote::run_quote(args),
        Commands::Exit(args) => commands::exit::run_exit(args),
        Commands::Mortgage(args) => commands::mortgage::run_mortgage(args),
        Commands::Plan(args) => commands::plan::run_plan(args),
        Commands::Compare(args) => commands::compare::run_compare(args),
        Commands::Version => {
            println!("oroi {}", env!("CARGO_PKG_VERSION"));
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
