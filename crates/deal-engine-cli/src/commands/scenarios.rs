use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_engine_core::scenarios::{confidence, exchange_1031, generate_capital_events};
use deal_engine_core::{ConfidenceLevel, DealState, Exchange1031Inputs, UncertaintyInputs};

use crate::input;

/// Arguments for confidence-interval analysis
#[derive(Args)]
pub struct ConfidenceArgs {
    /// Path to JSON input file (DealState with uncertainty populated)
    #[arg(long)]
    pub input: Option<String>,

    /// Standalone mode: the base metric value to band
    #[arg(long)]
    pub base: Option<Decimal>,

    /// Income uncertainty as a fraction (0.10 = ±10%)
    #[arg(long, default_value = "0")]
    pub income_uncertainty: Decimal,

    /// Expense uncertainty as a fraction
    #[arg(long, default_value = "0")]
    pub expense_uncertainty: Decimal,

    /// Confidence level: 80, 90, or 95
    #[arg(long, default_value = "95")]
    pub level: u32,
}

/// Arguments for 1031 exchange analysis
#[derive(Args)]
pub struct ExchangeArgs {
    /// Path to JSON input file (Exchange1031Inputs)
    #[arg(long)]
    pub input: Option<String>,

    /// Sale price of the relinquished property
    #[arg(long)]
    pub relinquished_value: Option<Decimal>,

    /// Adjusted basis of the relinquished property
    #[arg(long)]
    pub adjusted_basis: Option<Decimal>,

    /// Debt retired on the relinquished property
    #[arg(long, default_value = "0")]
    pub relinquished_debt: Decimal,

    /// Purchase price of the replacement property
    #[arg(long)]
    pub replacement_value: Option<Decimal>,

    /// New debt on the replacement property
    #[arg(long, default_value = "0")]
    pub replacement_debt: Decimal,

    /// Depreciation taken on the relinquished property
    #[arg(long, default_value = "0")]
    pub accumulated_depreciation: Decimal,

    /// Capital-gains tax rate as a fraction
    #[arg(long, default_value = "0.20")]
    pub capital_gains_rate: Decimal,

    /// Closing date of the relinquished sale (YYYY-MM-DD)
    #[arg(long)]
    pub closing_date: Option<NaiveDate>,
}

/// Arguments for the capital-event forecast
#[derive(Args)]
pub struct CapitalEventsArgs {
    /// Property age in years
    #[arg(long)]
    pub age: u32,

    /// Purchase price (cost basis for component estimates)
    #[arg(long)]
    pub price: Decimal,
}

pub fn run_confidence(args: ConfidenceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let level = parse_level(args.level)?;

    if let Some(base) = args.base {
        let inputs = UncertaintyInputs {
            income_uncertainty: args.income_uncertainty,
            expense_uncertainty: args.expense_uncertainty,
            confidence_level: level,
        };
        let result = confidence::with_confidence(base, &inputs);
        return Ok(serde_json::to_value(result)?);
    }

    let deal: DealState = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err(
            "--base <value> for a standalone band, or --input/stdin for a full deal".into(),
        );
    };

    let result = confidence::analyze_confidence(&deal)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_exchange(args: ExchangeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let inputs: Exchange1031Inputs = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        Exchange1031Inputs {
            relinquished_value: args
                .relinquished_value
                .ok_or("--relinquished-value is required (or provide --input)")?,
            adjusted_basis: args
                .adjusted_basis
                .ok_or("--adjusted-basis is required (or provide --input)")?,
            relinquished_debt: args.relinquished_debt,
            replacement_value: args
                .replacement_value
                .ok_or("--replacement-value is required (or provide --input)")?,
            replacement_debt: args.replacement_debt,
            accumulated_depreciation: args.accumulated_depreciation,
            capital_gains_rate: args.capital_gains_rate,
            closing_date: args
                .closing_date
                .ok_or("--closing-date is required (or provide --input)")?,
        }
    };

    let result = exchange_1031::analyze_exchange(&inputs)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_capital_events(args: CapitalEventsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let events = generate_capital_events(args.age, args.price);
    Ok(serde_json::to_value(events)?)
}

fn parse_level(level: u32) -> Result<ConfidenceLevel, Box<dyn std::error::Error>> {
    match level {
        80 => Ok(ConfidenceLevel::Eighty),
        90 => Ok(ConfidenceLevel::Ninety),
        95 => Ok(ConfidenceLevel::NinetyFive),
        other => Err(format!("Unsupported confidence level {other} (expected 80, 90, or 95)").into()),
    }
}
