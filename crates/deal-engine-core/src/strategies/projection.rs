use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{total_monthly_debt_service, total_remaining_debt_at};
use crate::error::DealEngineError;
use crate::income::{gross_monthly_income, monthly_expenses};
use crate::metrics::cash_invested;
use crate::types::{
    with_metadata, CapitalEvent, ComputationOutput, DealState, Money, Rate,
};
use crate::DealResult;

const IRR_INITIAL_GUESS: Decimal = dec!(0.10);
const IRR_MAX_ITERATIONS: u32 = 100;
const IRR_TOLERANCE: Decimal = dec!(0.0001);
const IRR_MIN: Decimal = dec!(-0.99);
const IRR_MAX: Decimal = dec!(10.0);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldProjectionOutput {
    /// After-debt cash flow per projection year
    pub annual_cash_flows: Vec<Money>,
    pub terminal_value: Money,
    pub remaining_debt_at_exit: Money,
    /// Terminal value net of selling costs and outstanding debt
    pub net_sale_proceeds: Money,
    pub total_cash_flow: Money,
    pub cash_invested: Money,
    pub irr: Rate,
    pub moic: Decimal,
}

/// Newton-Raphson IRR on the NPV function.
///
/// 10% initial guess, at most 100 iterations, bounds of [−99%, 1000%]
/// against divergence. A vanishing derivative or iteration exhaustion
/// returns the best partial estimate rather than failing; the result is
/// deterministic for identical inputs.
pub fn true_irr(cash_flows: &[Money]) -> Rate {
    if cash_flows.len() < 2 {
        return Decimal::ZERO;
    }

    let mut rate = IRR_INITIAL_GUESS;
    for _ in 0..IRR_MAX_ITERATIONS {
        let one_plus_r = Decimal::ONE + rate;
        let mut npv = Decimal::ZERO;
        let mut dnpv = Decimal::ZERO;

        for (t, cf) in cash_flows.iter().enumerate() {
            let t_dec = Decimal::from(t as i64);
            let discount = one_plus_r.powd(t_dec);
            if discount.is_zero() {
                continue;
            }
            npv += cf / discount;
            if t > 0 {
                dnpv -= t_dec * cf / one_plus_r.powd(t_dec + Decimal::ONE);
            }
        }

        if npv.abs() < IRR_TOLERANCE {
            return rate;
        }
        if dnpv.is_zero() {
            return rate;
        }
        rate = (rate - npv / dnpv).clamp(IRR_MIN, IRR_MAX);
    }

    rate
}

/// Expected cost of the capital events scheduled in a given year.
pub fn probability_weighted_event_cost(events: &[CapitalEvent], year: u32) -> Money {
    events
        .iter()
        .filter(|e| e.year == year)
        .map(|e| e.estimated_cost * e.likelihood / dec!(100))
        .sum()
}

/// Project the deal over its hold period and solve IRR/MOIC on the
/// resulting cash-flow stream.
pub fn analyze_hold(deal: &DealState) -> DealResult<ComputationOutput<HoldProjectionOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let inputs = deal.hold.as_ref().ok_or_else(|| {
        DealEngineError::InsufficientData("Hold projection requires hold inputs".into())
    })?;

    if inputs.hold_years == 0 {
        warnings.push("Zero-year hold: IRR and MOIC reported as 0".into());
    }
    if inputs.hold_years as usize * 12 > crate::amortization::MAX_SCHEDULE_ROWS {
        warnings.push("Hold period exceeds 50 years; debt balances use the closed form".into());
    }

    let income = gross_monthly_income(deal);
    let expenses = monthly_expenses(&deal.expenses, income.effective);
    let base_annual_income = income.effective * dec!(12);
    let base_annual_expenses = expenses.total * dec!(12);
    let annual_debt_service = total_monthly_debt_service(deal) * dec!(12);

    // Income and expense growth are independent; appreciation is a
    // third, separate rate on the asset itself.
    let mut annual_cash_flows = Vec::with_capacity(inputs.hold_years as usize);
    let mut income_factor = Decimal::ONE;
    let mut expense_factor = Decimal::ONE;
    for year in 1..=inputs.hold_years {
        let cash_flow = base_annual_income * income_factor
            - base_annual_expenses * expense_factor
            - annual_debt_service
            - probability_weighted_event_cost(&deal.capital_events, year);
        annual_cash_flows.push(cash_flow);
        income_factor *= Decimal::ONE + inputs.income_growth;
        expense_factor *= Decimal::ONE + inputs.expense_growth;
    }

    let mut terminal_value = deal.purchase_price;
    for _ in 0..inputs.hold_years {
        terminal_value *= Decimal::ONE + inputs.appreciation_rate;
    }

    let exit_months = inputs.hold_years.saturating_mul(12);
    let remaining_debt_at_exit = total_remaining_debt_at(deal, exit_months);
    let net_sale_proceeds =
        terminal_value * (Decimal::ONE - inputs.selling_cost_rate) - remaining_debt_at_exit;

    let invested = cash_invested(deal);
    let total_cash_flow: Money = annual_cash_flows.iter().copied().sum();

    let (irr, moic) = if invested <= Decimal::ZERO || inputs.hold_years == 0 {
        if invested <= Decimal::ZERO {
            warnings.push("No cash invested: IRR and MOIC reported as 0".into());
        }
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        let mut stream = Vec::with_capacity(annual_cash_flows.len() + 1);
        stream.push(-invested);
        stream.extend_from_slice(&annual_cash_flows);
        if let Some(last) = stream.last_mut() {
            *last += net_sale_proceeds;
        }
        (
            true_irr(&stream),
            (total_cash_flow + net_sale_proceeds) / invested,
        )
    };

    let output = HoldProjectionOutput {
        annual_cash_flows,
        terminal_value,
        remaining_debt_at_exit,
        net_sale_proceeds,
        total_cash_flow,
        cash_invested: invested,
        irr,
        moic,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Long-Hold Projection (IRR / MOIC)",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}
