use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{loan_monthly_payment, monthly_payment};
use crate::error::DealEngineError;
use crate::income::{gross_monthly_income, monthly_expenses};
use crate::metrics::cash_invested;
use crate::types::{with_metadata, BrrrrInputs, ComputationOutput, DealState, Money};
use crate::DealResult;

/// Refinance closing costs are a flat 2% of the new loan.
const REFI_CLOSING_RATE: Decimal = dec!(0.02);

/// Hard investment-property LTV ceiling the flag reports against.
/// Informational only, never clamps the loan.
const INVESTMENT_LTV_CEILING: Decimal = dec!(0.75);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrrrrOutput {
    pub refinance_loan: Money,
    pub new_monthly_payment: Money,
    pub refinance_closing_costs: Money,
    /// Capital returned at refinance, floored at 0
    pub cash_out: Money,
    pub cash_left_in_deal: Money,
    /// false when the new loan exceeds the 75% investment ceiling
    pub within_ltv_limit: bool,
    pub original_cash_invested: Money,
    /// Cash flow recomputed with the post-refinance debt service
    pub post_refi_monthly_cash_flow: Money,
    pub post_refi_annual_cash_flow: Money,
}

/// Run the BRRRR refinance model.
pub fn analyze_brrrr(deal: &DealState) -> DealResult<ComputationOutput<BrrrrOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let inputs = deal.brrrr.as_ref().ok_or_else(|| {
        DealEngineError::InsufficientData("BRRRR analysis requires brrrr inputs".into())
    })?;
    validate(inputs)?;

    let refinance_loan = inputs.arv * inputs.refinance_ltv;
    let new_monthly_payment = monthly_payment(
        refinance_loan,
        inputs.refinance_rate,
        inputs.refinance_term_months,
        false,
    );
    let refinance_closing_costs = refinance_loan * REFI_CLOSING_RATE;

    let invested = inputs
        .original_cash_invested
        .unwrap_or_else(|| cash_invested(deal));
    let cash_out =
        (refinance_loan - invested - refinance_closing_costs).max(Decimal::ZERO);
    let cash_left_in_deal =
        (invested + refinance_closing_costs - refinance_loan).max(Decimal::ZERO);

    let within_ltv_limit = refinance_loan <= inputs.arv * INVESTMENT_LTV_CEILING;
    if !within_ltv_limit {
        warnings.push(format!(
            "Refinance loan {refinance_loan} exceeds the {}% investment-property ceiling",
            INVESTMENT_LTV_CEILING * dec!(100)
        ));
    }

    // The refinance retires the acquisition loan; assumed and second
    // liens survive it.
    let income = gross_monthly_income(deal);
    let expenses = monthly_expenses(&deal.expenses, income.effective);
    let mut post_debt_service = new_monthly_payment;
    if let Some(assumed) = &deal.subject_to {
        if assumed.payments_made < assumed.original_term_months {
            post_debt_service += crate::amortization::subject_to_payment(assumed);
        }
    }
    if let Some(second) = &deal.hybrid_second {
        post_debt_service += loan_monthly_payment(second);
    }

    let post_refi_monthly_cash_flow = income.effective - expenses.total - post_debt_service;
    let post_refi_annual_cash_flow = post_refi_monthly_cash_flow * dec!(12);

    if post_refi_monthly_cash_flow < Decimal::ZERO {
        warnings.push("Deal does not cash flow at the post-refinance debt service".into());
    }

    let output = BrrrrOutput {
        refinance_loan,
        new_monthly_payment,
        refinance_closing_costs,
        cash_out,
        cash_left_in_deal,
        within_ltv_limit,
        original_cash_invested: invested,
        post_refi_monthly_cash_flow,
        post_refi_annual_cash_flow,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "BRRRR Refinance / Cash-Out",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(inputs: &BrrrrInputs) -> DealResult<()> {
    if inputs.arv <= Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "brrrr.arv".into(),
            reason: "After-repair value must be positive".into(),
        });
    }
    if inputs.refinance_ltv <= Decimal::ZERO || inputs.refinance_ltv > Decimal::ONE {
        return Err(DealEngineError::InvalidInput {
            field: "brrrr.refinance_ltv".into(),
            reason: "Refinance LTV must be between 0 and 1".into(),
        });
    }
    if inputs.refinance_term_months == 0 {
        return Err(DealEngineError::InvalidInput {
            field: "brrrr.refinance_term_months".into(),
            reason: "Refinance term must be positive".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IncomeInputs, OperationType, PropertyType, Rate};
    use pretty_assertions::assert_eq;

    fn brrrr_deal(ltv: Rate) -> DealState {
        DealState {
            property_type: PropertyType::SingleFamily,
            operation_type: OperationType::Brrrr,
            purchase_price: dec!(120000),
            income: IncomeInputs {
                monthly_rent: dec!(1800),
                ..Default::default()
            },
            brrrr: Some(BrrrrInputs {
                arv: dec!(200000),
                refinance_ltv: ltv,
                refinance_rate: dec!(0.07),
                refinance_term_months: 360,
                original_cash_invested: Some(dec!(50000)),
            }),
            ..Default::default()
        }
    }

    #[test]
    fn ltv_constraint_scenario() {
        let out = analyze_brrrr(&brrrr_deal(dec!(0.80))).unwrap();
        assert_eq!(out.result.refinance_loan, dec!(160000.00));
        // 160000 > 200000 * 0.75 = 150000
        assert!(!out.result.within_ltv_limit);
        assert!(out.warnings.iter().any(|w| w.contains("ceiling")));
    }

    #[test]
    fn conforming_ltv_passes_the_flag() {
        let out = analyze_brrrr(&brrrr_deal(dec!(0.70))).unwrap().result;
        assert_eq!(out.refinance_loan, dec!(140000.00));
        assert!(out.within_ltv_limit);
    }

    #[test]
    fn cash_out_nets_invested_capital_and_closing() {
        let out = analyze_brrrr(&brrrr_deal(dec!(0.80))).unwrap().result;
        assert_eq!(out.refinance_closing_costs, dec!(3200.0000));
        // 160000 - 50000 - 3200
        assert_eq!(out.cash_out, dec!(106800.0000));
        assert_eq!(out.cash_left_in_deal, dec!(0));
    }

    #[test]
    fn shallow_refi_floors_cash_out_at_zero() {
        let mut deal = brrrr_deal(dec!(0.25));
        deal.brrrr.as_mut().unwrap().original_cash_invested = Some(dec!(60000));
        let out = analyze_brrrr(&deal).unwrap().result;
        // loan 50000 < 60000 invested + 1000 closing
        assert_eq!(out.cash_out, dec!(0));
        assert_eq!(out.cash_left_in_deal, dec!(11000.0000));
    }

    #[test]
    fn post_refi_cash_flow_uses_the_new_debt_service() {
        let out = analyze_brrrr(&brrrr_deal(dec!(0.70))).unwrap().result;
        let expected_payment = monthly_payment(dec!(140000.00), dec!(0.07), 360, false);
        assert_eq!(out.new_monthly_payment, expected_payment);
        assert_eq!(
            out.post_refi_monthly_cash_flow,
            dec!(1800) - expected_payment
        );
    }

    #[test]
    fn out_of_range_ltv_is_rejected() {
        assert!(analyze_brrrr(&brrrr_deal(dec!(1.2))).is_err());
        assert!(analyze_brrrr(&brrrr_deal(dec!(0))).is_err());
    }
}
