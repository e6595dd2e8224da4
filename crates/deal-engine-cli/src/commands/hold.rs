use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_engine_core::scenarios::inflation;
use deal_engine_core::strategies::projection;
use deal_engine_core::DealState;

use crate::input;

/// Arguments for the long-hold projection.
///
/// The projection needs the full deal (income model, expenses, loans,
/// growth assumptions), so it only accepts structured input.
#[derive(Args)]
pub struct HoldArgs {
    /// Path to JSON input file (DealState with hold populated)
    #[arg(long)]
    pub input: Option<String>,

    /// Annual inflation rate as a fraction; restates the cash-flow
    /// stream and sale proceeds in today's dollars
    #[arg(long)]
    pub inflation: Option<Decimal>,
}

pub fn run_hold(args: HoldArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealState = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        return Err("--input <file.json> or stdin required for the hold projection".into());
    };

    let output = projection::analyze_hold(&deal)?;
    let real_terms = args
        .inflation
        .map(|rate| inflation::restate_hold_projection(&output.result, rate));

    let mut value = serde_json::to_value(output)?;
    if let Some(restated) = real_terms {
        if let Some(result) = value.get_mut("result").and_then(Value::as_object_mut) {
            result.insert("real_terms".into(), serde_json::to_value(restated)?);
        }
    }
    Ok(value)
}
