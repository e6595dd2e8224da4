use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use deal_engine_core::strategies::fix_flip;
use deal_engine_core::{DealState, FixFlipInputs};

use crate::{commands, input};

/// Arguments for Fix & Flip analysis
#[derive(Args)]
pub struct FixFlipArgs {
    /// Path to JSON input file (DealState with fix_flip populated)
    #[arg(long)]
    pub input: Option<String>,

    /// After-repair value
    #[arg(long)]
    pub arv: Option<Decimal>,

    /// Purchase price (defaults to the maximum allowable offer)
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Target purchase fraction of ARV for the MAO rule
    #[arg(long, default_value = "0.70")]
    pub target_rate: Decimal,

    /// Rehab budget
    #[arg(long, default_value = "0")]
    pub rehab: Decimal,

    /// Monthly holding cost (taxes, insurance, utilities)
    #[arg(long, default_value = "0")]
    pub holding_cost: Decimal,

    /// Months to hold before resale
    #[arg(long, default_value = "6")]
    pub holding_months: u32,

    /// Selling costs as a fraction of ARV
    #[arg(long, default_value = "0.06")]
    pub selling_cost_rate: Decimal,

    /// Financing type (conventional, hard-money, cash, ...)
    #[arg(long, default_value = "hard-money")]
    pub financing: String,

    /// Flip loan amount (ignored for cash deals)
    #[arg(long, default_value = "0")]
    pub loan_amount: Decimal,

    /// Annual interest rate on the flip loan as a fraction
    #[arg(long, default_value = "0")]
    pub rate: Decimal,
}

pub fn run_fix_flip(args: FixFlipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealState = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        let inputs = FixFlipInputs {
            arv: args.arv.ok_or("--arv is required (or provide --input)")?,
            target_rate: args.target_rate,
            rehab_cost: args.rehab,
            holding_cost_monthly: args.holding_cost,
            holding_months: args.holding_months,
            selling_cost_rate: args.selling_cost_rate,
            loan_amount: args.loan_amount,
            annual_rate: args.rate,
        };
        let purchase_price = args
            .purchase_price
            .unwrap_or_else(|| fix_flip::maximum_allowable_offer(&inputs).max(dec!(0)));
        DealState {
            financing_type: commands::parse_financing(&args.financing)?,
            purchase_price,
            fix_flip: Some(inputs),
            ..Default::default()
        }
    };

    let result = fix_flip::analyze_fix_flip(&deal)?;
    Ok(serde_json::to_value(result)?)
}
