pub mod commands;

use clap::{Args, Parser, Subcommand};
use landquote_core::{DbhPackage, DrainagePackage, PricingInput, ProjectFactor, StumpInput};
use rust_decimal::Decimal;
use std::process::ExitCode;

use commands::quote::{parse_factor, parse_stump, QuoteOptions};

#[derive(Debug, Parser)]
#[command(
    name = "landquote",
    about = "Land clearing estimate CLI",
    long_about = "Price forestry mulching, land clearing, stump grinding and drainage jobs against the configured rate table.",
    after_help = "Examples:\n  landquote mulch --acres 2.5 --package 6\n  landquote stump --stump 24x6x12 --stump 10x2x8\n  landquote estimate --input job.json\n  landquote config"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Price a JSON pricing input read from a file or stdin")]
    Estimate {
        #[arg(long, default_value = "-", help = "Path to the JSON input, or `-` for stdin")]
        input: String,
    },
    #[command(about = "Quote forestry mulching by acreage and DBH package")]
    Mulch {
        #[arg(long)]
        acres: Decimal,
        #[arg(long, help = "DBH package: 4, 6, 8 or 10 inches")]
        package: DbhPackage,
        #[command(flatten)]
        options: QuoteArgs,
    },
    #[command(name = "land-clear", about = "Quote land clearing from acreage, average DBH and height")]
    LandClear {
        #[arg(long)]
        acres: Decimal,
        #[arg(long, help = "Average trunk diameter in inches")]
        dbh: Decimal,
        #[arg(long, help = "Average vegetation height in feet")]
        height: Decimal,
        #[command(flatten)]
        options: QuoteArgs,
    },
    #[command(about = "Quote stump grinding for one or more stumps")]
    Stump {
        #[arg(
            long = "stump",
            required = true,
            value_parser = parse_stump,
            help = "DBHxABOVExBELOW in inches, repeat per stump"
        )]
        stumps: Vec<StumpInput>,
        #[command(flatten)]
        options: QuoteArgs,
    },
    #[command(about = "Quote drainage by linear footage")]
    Drainage {
        #[arg(long)]
        feet: Decimal,
        #[command(flatten)]
        options: QuoteArgs,
    },
    #[command(about = "Compute the checkout deposit for a drainage package")]
    Deposit {
        #[arg(long, help = "starter, standard or complete")]
        package: DrainagePackage,
        #[arg(long, help = "Deposit percentage, defaults to [checkout].deposit_pct")]
        pct: Option<Decimal>,
    },
    #[command(about = "List the project factor catalogue")]
    Factors,
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
}

#[derive(Debug, Args)]
struct QuoteArgs {
    #[arg(
        long = "factor",
        value_parser = parse_factor,
        help = "Catalogue factor name, or NAME=PCT; repeatable"
    )]
    factors: Vec<ProjectFactor>,
    #[arg(long, help = "Override the default transport hours for the service")]
    transport_hours: Option<Decimal>,
}

impl From<QuoteArgs> for QuoteOptions {
    fn from(args: QuoteArgs) -> Self {
        Self { factors: args.factors, transport_hours: args.transport_hours }
    }
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Estimate { input } => commands::estimate::run(&input),
        Command::Mulch { acres, package, options } => commands::quote::run(
            "mulch",
            PricingInput::forestry_mulching(acres, package),
            options.into(),
        ),
        Command::LandClear { acres, dbh, height, options } => commands::quote::run(
            "land-clear",
            PricingInput::land_clearing(acres, dbh, height),
            options.into(),
        ),
        Command::Stump { stumps, options } => {
            commands::quote::run("stump", PricingInput::stump_grinding(stumps), options.into())
        }
        Command::Drainage { feet, options } => {
            commands::quote::run("drainage", PricingInput::drainage(feet), options.into())
        }
        Command::Deposit { package, pct } => commands::deposit::run(package, pct),
        Command::Factors => commands::factors::run(),
        Command::Config => commands::config::run(),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}
