use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use deal_engine_core::metrics::headline;
use deal_engine_core::{
    AcquisitionCosts, DealState, IncomeInputs, LoanSpec, OperatingExpenseSpec,
};

use crate::{commands, input};

/// Arguments for headline deal underwriting.
///
/// A full `DealState` via `--input` or piped stdin drives every income
/// model; the flags cover the quick single-family rental case.
#[derive(Args)]
pub struct UnderwriteArgs {
    /// Path to JSON input file (DealState)
    #[arg(long)]
    pub input: Option<String>,

    /// Purchase price
    #[arg(long)]
    pub purchase_price: Option<Decimal>,

    /// Monthly rent
    #[arg(long)]
    pub monthly_rent: Option<Decimal>,

    /// Down payment
    #[arg(long, default_value = "0")]
    pub down_payment: Decimal,

    /// Closing costs
    #[arg(long, default_value = "0")]
    pub closing_costs: Decimal,

    /// New loan principal (omit for an all-cash deal)
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate as a fraction
    #[arg(long, default_value = "0")]
    pub rate: Decimal,

    /// Loan term in months
    #[arg(long, default_value = "360")]
    pub term_months: u32,

    /// Financing type (conventional, hard-money, private-loc, subject-to, hybrid, cash)
    #[arg(long, default_value = "conventional")]
    pub financing: String,

    /// Monthly property tax
    #[arg(long, default_value = "0")]
    pub property_tax: Decimal,

    /// Monthly insurance
    #[arg(long, default_value = "0")]
    pub insurance: Decimal,

    /// Vacancy rate as a fraction of effective income
    #[arg(long, default_value = "0")]
    pub vacancy_rate: Decimal,

    /// Management rate as a fraction of effective income
    #[arg(long, default_value = "0")]
    pub management_rate: Decimal,

    /// Maintenance rate as a fraction of effective income
    #[arg(long, default_value = "0")]
    pub maintenance_rate: Decimal,
}

pub fn run_underwrite(args: UnderwriteArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal: DealState = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        build_from_flags(&args)?
    };

    let result = headline::analyze(&deal)?;
    Ok(serde_json::to_value(result)?)
}

fn build_from_flags(args: &UnderwriteArgs) -> Result<DealState, Box<dyn std::error::Error>> {
    let loan = match args.loan_amount {
        Some(principal) => Some(LoanSpec {
            principal,
            annual_rate: args.rate,
            term_months: args.term_months,
            interest_only: false,
            io_period_months: None,
        }),
        None => None,
    };

    Ok(DealState {
        financing_type: commands::parse_financing(&args.financing)?,
        purchase_price: args
            .purchase_price
            .ok_or("--purchase-price is required (or provide --input)")?,
        loan,
        income: IncomeInputs {
            monthly_rent: args
                .monthly_rent
                .ok_or("--monthly-rent is required (or provide --input)")?,
            ..Default::default()
        },
        expenses: OperatingExpenseSpec {
            property_tax: args.property_tax,
            insurance: args.insurance,
            vacancy_rate: args.vacancy_rate,
            management_rate: args.management_rate,
            maintenance_rate: args.maintenance_rate,
            ..Default::default()
        },
        acquisition: AcquisitionCosts {
            down_payment: args.down_payment,
            closing_costs: args.closing_costs,
            ..Default::default()
        },
        ..Default::default()
    })
}
