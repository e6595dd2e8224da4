use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use deal_engine_core::amortization::{
    build_schedule, build_subject_to_schedule, loan_monthly_payment, subject_to_payment,
};
use deal_engine_core::{LoanSpec, SubjectToLoan};

use crate::input;

/// Arguments for a new-loan amortization schedule
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON input file (LoanSpec)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub loan_amount: Option<Decimal>,

    /// Annual interest rate as a fraction (0.065 = 6.5%)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in months
    #[arg(long)]
    pub term_months: Option<u32>,

    /// Interest-only loan (balloon at maturity)
    #[arg(long)]
    pub interest_only: bool,

    /// Interest-only period in months before re-amortization (hybrid loans)
    #[arg(long)]
    pub io_period: Option<u32>,

    /// Emit the full month-by-month schedule instead of the summary
    #[arg(long)]
    pub schedule: bool,
}

/// Arguments for a subject-to loan assumed mid-term
#[derive(Args)]
pub struct SubjectToArgs {
    /// Path to JSON input file (SubjectToLoan)
    #[arg(long)]
    pub input: Option<String>,

    /// Original note principal
    #[arg(long)]
    pub original_principal: Option<Decimal>,

    /// Annual interest rate as a fraction
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Original term in months
    #[arg(long)]
    pub original_term_months: Option<u32>,

    /// Payment stated by the seller (verified against the note terms)
    #[arg(long)]
    pub stated_payment: Option<Decimal>,

    /// Payments the seller has already made
    #[arg(long)]
    pub payments_made: Option<u32>,

    /// Cash paid to the seller at takeover
    #[arg(long, default_value = "0")]
    pub seller_payment: Decimal,

    /// Emit the full remaining schedule instead of the summary
    #[arg(long)]
    pub schedule: bool,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: LoanSpec = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        LoanSpec {
            principal: args
                .loan_amount
                .ok_or("--loan-amount is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            term_months: args
                .term_months
                .ok_or("--term-months is required (or provide --input)")?,
            interest_only: args.interest_only,
            io_period_months: args.io_period,
        }
    };

    let rows = build_schedule(&loan);
    if args.schedule {
        return Ok(serde_json::to_value(&rows)?);
    }

    let total_interest: Decimal = rows.iter().map(|r| r.interest).sum();
    let total_principal: Decimal = rows.iter().map(|r| r.principal).sum();
    let ending_balance = rows.last().map(|r| r.balance).unwrap_or(Decimal::ZERO);

    Ok(json!({
        "result": {
            "monthly_payment": loan_monthly_payment(&loan),
            "total_interest": total_interest,
            "total_principal": total_principal,
            "ending_balance": ending_balance,
            "rows": rows.len(),
        }
    }))
}

pub fn run_subject_to(args: SubjectToArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: SubjectToLoan = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(data) = input::stdin::read_stdin()? {
        serde_json::from_value(data)?
    } else {
        SubjectToLoan {
            original_principal: args
                .original_principal
                .ok_or("--original-principal is required (or provide --input)")?,
            annual_rate: args.rate.ok_or("--rate is required (or provide --input)")?,
            original_term_months: args
                .original_term_months
                .ok_or("--original-term-months is required (or provide --input)")?,
            stated_payment: args
                .stated_payment
                .ok_or("--stated-payment is required (or provide --input)")?,
            payments_made: args
                .payments_made
                .ok_or("--payments-made is required (or provide --input)")?,
            seller_payment: args.seller_payment,
        }
    };

    let rows = build_subject_to_schedule(&loan);
    if args.schedule {
        return Ok(serde_json::to_value(&rows)?);
    }

    let effective_payment = subject_to_payment(&loan);
    let starting_balance = rows.first().map(|r| r.balance + r.principal);
    let remaining_interest: Decimal = rows.iter().map(|r| r.interest).sum();

    Ok(json!({
        "result": {
            "effective_payment": effective_payment,
            "stated_payment": loan.stated_payment,
            "payment_overridden": effective_payment != loan.stated_payment,
            "starting_balance": starting_balance,
            "remaining_payments": rows.len(),
            "remaining_interest": remaining_interest,
        }
    }))
}
