use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::total_monthly_debt_service;
use crate::error::DealEngineError;
use crate::income::{gross_monthly_income, monthly_expenses};
use crate::types::{
    with_metadata, ComputationOutput, DealState, Money, OperationType, Rate, ReservePolicy,
};
use crate::DealResult;

/// The full headline metric set for one underwriting pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwriteOutput {
    pub potential_monthly_income: Money,
    pub effective_monthly_income: Money,
    pub fixed_monthly_expenses: Money,
    pub variable_monthly_expenses: Money,
    pub total_monthly_expenses: Money,
    pub monthly_debt_service: Money,
    pub monthly_noi: Money,
    pub annual_noi: Money,
    pub monthly_cash_flow: Money,
    pub annual_cash_flow: Money,
    /// Annual NOI / purchase price, as a fraction
    pub cap_rate: Rate,
    pub cash_invested: Money,
    /// Annual cash flow / cash invested, as a fraction
    pub cash_on_cash: Rate,
    pub dscr: Decimal,
    pub break_even_rent: Money,
    pub break_even_occupancy: Decimal,
    pub gross_rent_multiplier: Decimal,
}

/// NOI excludes debt service by definition.
pub fn monthly_noi(effective_monthly_income: Money, total_monthly_expenses: Money) -> Money {
    effective_monthly_income - total_monthly_expenses
}

/// Annual NOI / purchase price. A non-positive price yields the 0
/// sentinel rather than an error.
pub fn cap_rate(annual_noi: Money, purchase_price: Money) -> Rate {
    if purchase_price <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual_noi / purchase_price
}

/// Annual cash flow / cash invested. Non-positive invested capital
/// yields 0, never NaN or infinity; callers distinguish "0% return"
/// from "nothing invested" via the reported `cash_invested`.
pub fn cash_on_cash(annual_cash_flow: Money, invested: Money) -> Rate {
    if invested <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    annual_cash_flow / invested
}

/// Monthly NOI / monthly debt service; 0 for an all-cash deal.
pub fn dscr(monthly_noi: Money, monthly_debt_service: Money) -> Decimal {
    if monthly_debt_service <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    monthly_noi / monthly_debt_service
}

/// Monthly income at which cash flow is exactly zero: fixed costs and
/// debt service grossed up for the variable expense share. A combined
/// variable share at or above 100% has no break-even; 0 is returned.
pub fn break_even_rent(
    monthly_debt_service: Money,
    fixed_monthly_expenses: Money,
    variable_rate_total: Rate,
) -> Money {
    if variable_rate_total >= Decimal::ONE {
        return Decimal::ZERO;
    }
    (monthly_debt_service + fixed_monthly_expenses) / (Decimal::ONE - variable_rate_total)
}

/// Break-even income restated as a fraction of the gross potential
/// ceiling. May exceed 1 for a deal that cannot break even at full
/// occupancy.
pub fn break_even_occupancy(break_even_monthly_rent: Money, potential_monthly_income: Money) -> Decimal {
    if potential_monthly_income <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    break_even_monthly_rent / potential_monthly_income
}

/// Purchase price / annual gross rent.
pub fn gross_rent_multiplier(purchase_price: Money, annual_gross_rent: Money) -> Decimal {
    if annual_gross_rent <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    purchase_price / annual_gross_rent
}

/// Total cash the buyer puts into the deal. The basis differs by
/// operation type: arbitrage deals have no purchase, so startup costs
/// replace down payment and closing.
pub fn cash_invested(deal: &DealState) -> Money {
    if deal.operation_type == OperationType::RentalArbitrage {
        let startup = deal.acquisition.arbitrage.clone().unwrap_or_default();
        return startup.deposit
            + startup.repair_estimate
            + startup.furniture
            + startup.other
            + deal.acquisition.rehab_cost;
    }

    let mut invested = deal.acquisition.down_payment
        + deal.acquisition.closing_costs
        + deal.acquisition.rehab_cost;

    if deal.operation_type == OperationType::ShortTermRental {
        invested += deal.acquisition.furniture_cost;
    }
    if let Some(assumed) = &deal.subject_to {
        invested += assumed.seller_payment;
    }

    invested
        + match deal.acquisition.reserves {
            ReservePolicy::None => Decimal::ZERO,
            ReservePolicy::FixedAmount(amount) => amount,
            ReservePolicy::MonthsOfCosts(months) => {
                let income = gross_monthly_income(deal);
                let expenses = monthly_expenses(&deal.expenses, income.effective);
                months * (expenses.total + total_monthly_debt_service(deal))
            }
        }
}

/// Run the full headline metric pass over a deal.
pub fn analyze(deal: &DealState) -> DealResult<ComputationOutput<UnderwriteOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    validate(deal, &mut warnings)?;

    let income = gross_monthly_income(deal);
    let expenses = monthly_expenses(&deal.expenses, income.effective);
    let debt_service = total_monthly_debt_service(deal);

    let noi = monthly_noi(income.effective, expenses.total);
    let annual_noi = noi * dec!(12);
    let monthly_cash_flow = noi - debt_service;
    let annual_cash_flow = monthly_cash_flow * dec!(12);

    let invested = cash_invested(deal);
    let be_rent = break_even_rent(
        debt_service,
        expenses.fixed,
        deal.expenses.percentage_total(),
    );

    if noi < Decimal::ZERO {
        warnings.push(format!(
            "Negative NOI ({noi}/month): operating costs exceed effective income"
        ));
    }
    if invested <= Decimal::ZERO {
        warnings.push("No cash invested: cash-on-cash reported as 0".into());
    }

    let output = UnderwriteOutput {
        potential_monthly_income: income.potential,
        effective_monthly_income: income.effective,
        fixed_monthly_expenses: expenses.fixed,
        variable_monthly_expenses: expenses.variable,
        total_monthly_expenses: expenses.total,
        monthly_debt_service: debt_service,
        monthly_noi: noi,
        annual_noi,
        monthly_cash_flow,
        annual_cash_flow,
        cap_rate: cap_rate(annual_noi, deal.purchase_price),
        cash_invested: invested,
        cash_on_cash: cash_on_cash(annual_cash_flow, invested),
        dscr: dscr(noi, debt_service),
        break_even_rent: be_rent,
        break_even_occupancy: break_even_occupancy(be_rent, income.potential),
        gross_rent_multiplier: gross_rent_multiplier(
            deal.purchase_price,
            income.potential * dec!(12),
        ),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Deal Underwriting (Headline Metrics)",
        deal,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(deal: &DealState, warnings: &mut Vec<String>) -> DealResult<()> {
    if let Some(loan) = &deal.loan {
        if !loan.interest_only && loan.term_months == 0 && loan.principal > Decimal::ZERO {
            return Err(DealEngineError::InvalidInput {
                field: "loan.term_months".into(),
                reason: "Amortizing loans require a positive term".into(),
            });
        }
        if loan.annual_rate < Decimal::ZERO {
            return Err(DealEngineError::InvalidInput {
                field: "loan.annual_rate".into(),
                reason: "Note rate cannot be negative".into(),
            });
        }
    }

    let pct = deal.expenses.percentage_total();
    if pct < Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "expenses".into(),
            reason: "Percentage-of-income rates cannot be negative".into(),
        });
    }
    if pct > Decimal::ONE {
        warnings.push(format!(
            "Combined expense rates are {:.1}% of income — deal cannot cash flow",
            pct * dec!(100)
        ));
    }
    if deal.purchase_price <= Decimal::ZERO
        && deal.operation_type != OperationType::RentalArbitrage
    {
        warnings.push("Purchase price is not positive: cap rate and GRM reported as 0".into());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AcquisitionCosts, ArbitrageStartup, FinancingType, IncomeInputs, LoanSpec,
        OperatingExpenseSpec, PropertyType, SubjectToLoan,
    };
    use pretty_assertions::assert_eq;

    /// 250k SFR buy-and-hold: 50k down, 200k at 6.5%/30y, $2,000 rent.
    fn sample_deal() -> DealState {
        DealState {
            property_type: PropertyType::SingleFamily,
            operation_type: OperationType::BuyAndHold,
            financing_type: FinancingType::Conventional,
            purchase_price: dec!(250000),
            loan: Some(LoanSpec {
                principal: dec!(200000),
                annual_rate: dec!(0.065),
                term_months: 360,
                interest_only: false,
                io_period_months: None,
            }),
            income: IncomeInputs {
                monthly_rent: dec!(2000),
                ..Default::default()
            },
            expenses: OperatingExpenseSpec {
                property_tax: dec!(208.33),
                insurance: dec!(100),
                maintenance_rate: dec!(0.0625),
                management_rate: dec!(0.10),
                vacancy_rate: dec!(0.05),
                ..Default::default()
            },
            acquisition: AcquisitionCosts {
                down_payment: dec!(50000),
                closing_costs: dec!(5000),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn buy_and_hold_sfr_scenario() {
        let out = analyze(&sample_deal()).unwrap().result;

        // fixed 308.33, variable 2000 * 0.2125 = 425
        assert_eq!(out.effective_monthly_income, dec!(2000));
        assert_eq!(out.fixed_monthly_expenses, dec!(308.33));
        assert_eq!(out.variable_monthly_expenses, dec!(425.0000));
        assert_eq!(out.monthly_noi, dec!(1266.6700));

        // payment on 200k at 6.5%/30y ~ 1264.14
        assert!((out.monthly_debt_service - dec!(1264.14)).abs() < dec!(0.05));
        assert!((out.monthly_cash_flow - dec!(2.53)).abs() < dec!(0.05));

        // cap rate = 15200.04 / 250000 ~ 6.08%
        assert!((out.cap_rate - dec!(0.0608)).abs() < dec!(0.0001));
        assert_eq!(out.cash_invested, dec!(55000));
        assert!(out.dscr > dec!(1.0) && out.dscr < dec!(1.01));

        // GRM = 250000 / 24000
        assert!((out.gross_rent_multiplier - dec!(10.4167)).abs() < dec!(0.0001));
    }

    #[test]
    fn cash_deal_zeroes_debt_metrics() {
        let mut deal = sample_deal();
        deal.financing_type = FinancingType::Cash;
        let out = analyze(&deal).unwrap().result;

        assert_eq!(out.monthly_debt_service, dec!(0));
        assert_eq!(out.dscr, dec!(0));
        assert_eq!(out.monthly_cash_flow, out.monthly_noi);
    }

    #[test]
    fn coc_sentinel_on_zero_invested() {
        let mut deal = sample_deal();
        deal.acquisition = AcquisitionCosts::default();
        let out = analyze(&deal).unwrap();

        assert_eq!(out.result.cash_invested, dec!(0));
        assert_eq!(out.result.cash_on_cash, dec!(0));
        assert!(out.warnings.iter().any(|w| w.contains("No cash invested")));
    }

    #[test]
    fn cap_rate_sentinel_on_zero_price() {
        assert_eq!(cap_rate(dec!(15000), dec!(0)), dec!(0));
        assert_eq!(cap_rate(dec!(15000), dec!(-1)), dec!(0));
    }

    #[test]
    fn arbitrage_invested_is_startup_basis() {
        let deal = DealState {
            operation_type: OperationType::RentalArbitrage,
            acquisition: AcquisitionCosts {
                down_payment: dec!(50000), // ignored for arbitrage
                rehab_cost: dec!(2000),
                arbitrage: Some(ArbitrageStartup {
                    deposit: dec!(3000),
                    repair_estimate: dec!(1500),
                    furniture: dec!(8000),
                    other: dec!(500),
                }),
                ..Default::default()
            },
            ..Default::default()
        };
        assert_eq!(cash_invested(&deal), dec!(15000));
    }

    #[test]
    fn str_furniture_and_seller_payment_count_toward_invested() {
        let mut deal = sample_deal();
        deal.operation_type = OperationType::ShortTermRental;
        deal.acquisition.furniture_cost = dec!(12000);
        deal.subject_to = Some(SubjectToLoan {
            original_principal: dec!(100000),
            annual_rate: dec!(0.04),
            original_term_months: 360,
            stated_payment: dec!(477.42),
            payments_made: 24,
            seller_payment: dec!(20000),
        });
        // STR operation books nightly; without a nightly model income is 0,
        // but the invested basis is what matters here.
        assert_eq!(cash_invested(&deal), dec!(87000));
    }

    #[test]
    fn reserves_in_months_scale_with_operating_costs() {
        let mut deal = sample_deal();
        deal.financing_type = FinancingType::Cash;
        deal.acquisition.reserves = ReservePolicy::MonthsOfCosts(dec!(6));
        // monthly cost = 308.33 + 425 = 733.33, no debt service
        assert_eq!(cash_invested(&deal), dec!(55000) + dec!(6) * dec!(733.3300));
    }

    #[test]
    fn break_even_math() {
        // (1264 + 308.33) / (1 - 0.2125)
        let rent = break_even_rent(dec!(1264), dec!(308.33), dec!(0.2125));
        assert!((rent - dec!(1996.61)).abs() < dec!(0.01));
        let occ = break_even_occupancy(rent, dec!(2000));
        assert!((occ - dec!(0.9983)).abs() < dec!(0.0001));

        // no break-even when variable share eats the whole dollar
        assert_eq!(break_even_rent(dec!(1000), dec!(300), dec!(1)), dec!(0));
    }

    #[test]
    fn overloaded_expense_rates_warn_but_compute() {
        let mut deal = sample_deal();
        deal.expenses.op_ex_rate = dec!(1.0);
        let out = analyze(&deal).unwrap();
        assert!(out.result.monthly_noi < Decimal::ZERO);
        assert!(out
            .warnings
            .iter()
            .any(|w| w.contains("cannot cash flow")));
    }

    #[test]
    fn negative_rate_is_rejected() {
        let mut deal = sample_deal();
        deal.loan.as_mut().unwrap().annual_rate = dec!(-0.01);
        assert!(analyze(&deal).is_err());
    }
}
