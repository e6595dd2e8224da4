use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_engine_core::strategies::brrrr;
use deal_engine_core::{BrrrrInputs, DealState, IncomeInputs, OperatingExpenseSpec};

use crate::input;

/// Arguments for BRRRR refinance analysis
#[derive(Args)]
pub struct BrrrrArgs {
    /// Path to JSON input file (DealState with brrrr populated)
    #[arg(long)]
    pub input: Option<String>,

    /// After-repair value at refinance
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Refinance loan-to-value as a fraction of ARV
    #[arg(long, default_value = "0.75")]
    pub refinance_ltv: Decimal,

    /// Annual rate on the refinance loan as a fraction
    #[arg(long)]
    pub refinance_rate: Option<Decimal>,

    /// Refinance term in months
    #[arg(long, default_value = "360")]
    pub refinance_term: u32,

    /// Total cash put into the deal before the refinance
    #[arg(long)]
    pub cash_invested: Option<Decimal>,

    /// Monthly rent after stabilization
    #[arg(long, default_value = "0")]
    pub monthly_rent: Decimal,

    /// Total monthly operating expenses after stabilization
    #[arg(long, default_value = "0")]
    pub monthly_expenses: Decimal,
}

pub fn run_brrrr(args: BrrrrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealState = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        DealState {
            brrrr: Some(BrrrrInputs {
                arv: args.arv.ok_or("--arv is required (or provide --input)")?,
                refinance_ltv: args.refinance_ltv,
                refinance_rate: args
                    .refinance_rate
                    .ok_or("--refinance-rate is required (or provide --input)")?,
                refinance_term_months: args.refinance_term,
                original_cash_invested: Some(
                    args.cash_invested
                        .ok_or("--cash-invested is required (or provide --input)")?,
                ),
            }),
            income: IncomeInputs {
                monthly_rent: args.monthly_rent,
                ..Default::default()
            },
            expenses: OperatingExpenseSpec {
                other_fixed: args.monthly_expenses,
                ..Default::default()
            },
            ..Default::default()
        }
    };

    let result = brrrr::analyze_brrrr(&deal)?;
    Ok(serde_json::to_value(result)?)
}
