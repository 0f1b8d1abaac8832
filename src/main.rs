use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::error;
use num_bigint::BigInt;
use riskscore::{
    column::Column,
    deposit::{compute_required_deposit, DepositParams, DEFAULT_WEIGHT_COLUMN},
    filter::{filter_file, FilterConfig, DEFAULT_THRESHOLD},
    number::parse_fixed_point,
};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "riskscore")]
#[command(about = "Filter risk score tables and compute required deposits", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Keep rows whose score is at or above the threshold
    Filter(FilterArgs),

    /// Sum the weight column and compute the required deposit
    Deposit(DepositArgs),
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Input CSV file
    #[arg(short, long, default_value = "riskscore.csv")]
    input: PathBuf,

    /// Output CSV file, replaced if it exists
    #[arg(short, long, default_value = "filtered_riskscore.csv")]
    output: PathBuf,

    /// Rows with a score below this value are dropped
    #[arg(short, long, default_value_t = DEFAULT_THRESHOLD, env = "RISKSCORE_THRESHOLD")]
    threshold: f64,

    /// Score column: zero-based index, or a header name
    #[arg(long, default_value = "1")]
    score_column: Column,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct DepositArgs {
    /// Input CSV file, normally the output of `filter`
    #[arg(short, long, default_value = "filtered_riskscore.csv")]
    input: PathBuf,

    /// Offer limit in 10^18 fixed-point units, e.g. 24000000000000000000 or 24e18
    #[arg(
        long,
        default_value = "24000000000000000000",
        env = "RISKSCORE_OFFER_LIMIT",
        value_parser = parse_fixed_point
    )]
    offer_limit: BigInt,

    /// Token price in 10^18 fixed-point units, e.g. 22000e18
    #[arg(
        long,
        default_value = "22000000000000000000000",
        env = "RISKSCORE_TOKEN_PRICE",
        value_parser = parse_fixed_point
    )]
    token_price: BigInt,

    /// Zero-based index of the integer weight column
    #[arg(long, default_value_t = DEFAULT_WEIGHT_COLUMN)]
    weight_column: usize,

    /// Skip the first row instead of summing it
    #[arg(long)]
    skip_header: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Filter(args) => run_filter(args),
        Command::Deposit(args) => run_deposit(args),
    };

    if let Err(e) = result {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_filter(args: FilterArgs) -> anyhow::Result<()> {
    let config = FilterConfig {
        threshold: args.threshold,
        score_column: args.score_column,
    };

    let summary = filter_file(&args.input, &args.output, &config)
        .with_context(|| format!("Filtering '{}' failed", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Filtering complete. Output saved to {}.", args.output.display());
    println!("Rows kept (excluding header): {}", summary.rows_kept);
    println!("Rows filtered out: {}", summary.rows_filtered_out);
    println!("Rows skipped (non-numeric score): {}", summary.rows_unparseable);
    println!("Rows skipped (missing score): {}", summary.rows_malformed);

    Ok(())
}

fn run_deposit(args: DepositArgs) -> anyhow::Result<()> {
    let params = DepositParams {
        offer_limit: args.offer_limit,
        token_price: args.token_price,
        weight_column: args.weight_column,
        skip_header: args.skip_header,
    };

    let report = compute_required_deposit(&args.input, &params)
        .with_context(|| format!("Deposit calculation for '{}' failed", args.input.display()))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", report);
    }

    Ok(())
}
