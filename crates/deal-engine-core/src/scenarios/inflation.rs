use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use serde::{Deserialize, Serialize};

use crate::strategies::HoldProjectionOutput;
use crate::types::{Money, Rate};

/// Compound a value forward: one entry per year, year 1 first.
pub fn project_inflated(value: Money, annual_rate: Rate, years: u32) -> Vec<Money> {
    let mut out = Vec::with_capacity(years as usize);
    let mut current = value;
    for _ in 0..years {
        current *= Decimal::ONE + annual_rate;
        out.push(current);
    }
    out
}

/// Deflate a nominal future amount back to today's dollars. A rate at
/// or below -100% has no meaningful deflator; 0 is returned.
pub fn real_value(nominal: Money, annual_rate: Rate, years: u32) -> Money {
    let base = Decimal::ONE + annual_rate;
    if base <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    nominal / base.powd(Decimal::from(years))
}

/// A hold projection restated in today's dollars.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealTermsProjection {
    pub inflation_rate: Rate,
    pub real_annual_cash_flows: Vec<Money>,
    /// Sale proceeds deflated from the exit year
    pub real_net_sale_proceeds: Money,
    pub real_total_return: Money,
}

/// Deflate a nominal hold projection year by year.
///
/// Cash flow for year `t` is divided by `(1+i)^t`; the sale proceeds
/// land in the final projection year. Nominal cash-on-cash figures
/// overstate long holds, so IRR and MOIC are left nominal and only the
/// dollar stream is restated.
pub fn restate_hold_projection(
    projection: &HoldProjectionOutput,
    inflation_rate: Rate,
) -> RealTermsProjection {
    let exit_year = projection.annual_cash_flows.len() as u32;

    let real_annual_cash_flows: Vec<Money> = projection
        .annual_cash_flows
        .iter()
        .enumerate()
        .map(|(i, cf)| real_value(*cf, inflation_rate, i as u32 + 1))
        .collect();
    let real_net_sale_proceeds =
        real_value(projection.net_sale_proceeds, inflation_rate, exit_year);
    let real_total_return =
        real_annual_cash_flows.iter().copied().sum::<Decimal>() + real_net_sale_proceeds;

    RealTermsProjection {
        inflation_rate,
        real_annual_cash_flows,
        real_net_sale_proceeds,
        real_total_return,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn projection_compounds_annually() {
        let values = project_inflated(dec!(100), dec!(0.10), 3);
        assert_eq!(values, vec![dec!(110.00), dec!(121.0000), dec!(133.100000)]);
    }

    #[test]
    fn zero_years_projects_nothing() {
        assert!(project_inflated(dec!(100), dec!(0.10), 0).is_empty());
    }

    #[test]
    fn real_value_inverts_the_projection() {
        let real = real_value(dec!(121), dec!(0.10), 2);
        assert!((real - dec!(100)).abs() < dec!(0.0001));
    }

    #[test]
    fn degenerate_rate_returns_zero() {
        assert_eq!(real_value(dec!(100), dec!(-1), 5), dec!(0));
    }

    fn flat_projection() -> HoldProjectionOutput {
        HoldProjectionOutput {
            annual_cash_flows: vec![dec!(12000); 3],
            terminal_value: dec!(100000),
            remaining_debt_at_exit: dec!(0),
            net_sale_proceeds: dec!(100000),
            total_cash_flow: dec!(36000),
            cash_invested: dec!(100000),
            irr: dec!(0.12),
            moic: dec!(1.36),
        }
    }

    #[test]
    fn restatement_deflates_each_year_at_its_own_horizon() {
        let real = restate_hold_projection(&flat_projection(), dec!(0.10));

        assert!((real.real_annual_cash_flows[0] - dec!(10909.0909)).abs() < dec!(0.01));
        assert!((real.real_annual_cash_flows[1] - dec!(9917.3554)).abs() < dec!(0.01));
        assert!((real.real_annual_cash_flows[2] - dec!(9015.7776)).abs() < dec!(0.01));

        // proceeds deflate from the exit year (year 3)
        assert!((real.real_net_sale_proceeds - dec!(75131.4801)).abs() < dec!(0.01));
        assert_eq!(
            real.real_total_return,
            real.real_annual_cash_flows.iter().copied().sum::<Decimal>()
                + real.real_net_sale_proceeds
        );
    }

    #[test]
    fn zero_inflation_restates_to_the_nominal_stream() {
        let nominal = flat_projection();
        let real = restate_hold_projection(&nominal, dec!(0));
        assert_eq!(real.real_annual_cash_flows, nominal.annual_cash_flows);
        assert_eq!(real.real_net_sale_proceeds, nominal.net_sale_proceeds);
    }
}
