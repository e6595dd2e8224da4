pub mod schedule;
pub mod subject_to;

pub use schedule::{
    build_schedule, monthly_payment, remaining_balance, AmortizationRow, MAX_SCHEDULE_ROWS,
};
pub use subject_to::{build_subject_to_schedule, subject_to_payment};

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{DealState, FinancingType, LoanSpec, Money};

/// Current monthly obligation on a new loan. Loans inside an IO window
/// (pure interest-only or the IO phase of a hybrid) pay interest only.
pub fn loan_monthly_payment(loan: &LoanSpec) -> Money {
    if loan.principal <= Decimal::ZERO || loan.term_months == 0 {
        return Decimal::ZERO;
    }
    if loan.interest_only || loan.io_period_months.is_some_and(|m| m > 0) {
        return loan.principal * loan.annual_rate / dec!(12);
    }
    monthly_payment(loan.principal, loan.annual_rate, loan.term_months, false)
}

/// Schedule for the deal's new institutional loan. Cash deals have no
/// loan and therefore an empty schedule, whatever `LoanSpec` was supplied.
pub fn deal_loan_schedule(deal: &DealState) -> Vec<AmortizationRow> {
    if deal.financing_type == FinancingType::Cash {
        return Vec::new();
    }
    deal.loan.as_ref().map(build_schedule).unwrap_or_default()
}

/// Sum of up to three simultaneous obligations: new institutional loan,
/// Subject-To assumed loan, and Hybrid second loan. Simple summation,
/// no seniority or waterfall logic.
pub fn total_monthly_debt_service(deal: &DealState) -> Money {
    let mut total = Decimal::ZERO;

    if deal.financing_type != FinancingType::Cash {
        if let Some(loan) = &deal.loan {
            total += loan_monthly_payment(loan);
        }
    }
    if let Some(assumed) = &deal.subject_to {
        if assumed.payments_made < assumed.original_term_months {
            total += subject_to_payment(assumed);
        }
    }
    if let Some(second) = &deal.hybrid_second {
        total += loan_monthly_payment(second);
    }

    total
}

/// Remaining principal on a new loan after `months_elapsed` payments,
/// honoring IO phases (interest-only never reduces principal).
pub fn loan_remaining_at(loan: &LoanSpec, months_elapsed: u32) -> Money {
    if loan.principal <= Decimal::ZERO || loan.term_months == 0 {
        return Decimal::ZERO;
    }
    if loan.interest_only {
        return loan.principal;
    }
    let io_months = loan.io_period_months.unwrap_or(0).min(loan.term_months);
    if months_elapsed <= io_months {
        return loan.principal;
    }
    remaining_balance(
        loan.principal,
        loan.annual_rate,
        loan.term_months - io_months,
        months_elapsed - io_months,
    )
}

/// Total outstanding debt across all obligations after `months_elapsed`
/// months of ownership. Used for levered exit proceeds.
pub fn total_remaining_debt_at(deal: &DealState, months_elapsed: u32) -> Money {
    let mut total = Decimal::ZERO;

    if deal.financing_type != FinancingType::Cash {
        if let Some(loan) = &deal.loan {
            total += loan_remaining_at(loan, months_elapsed);
        }
    }
    if let Some(assumed) = &deal.subject_to {
        total += remaining_balance(
            assumed.original_principal,
            assumed.annual_rate,
            assumed.original_term_months,
            assumed.payments_made.saturating_add(months_elapsed),
        );
    }
    if let Some(second) = &deal.hybrid_second {
        total += loan_remaining_at(second, months_elapsed);
    }

    total
}
