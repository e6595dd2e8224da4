use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Money, OperatingExpenseSpec};

/// Monthly operating expenses, fixed and percentage-of-income.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseBreakdown {
    pub fixed: Money,
    pub variable: Money,
    pub total: Money,
}

/// Total monthly operating cost.
///
/// Variable costs are a share of *effective* income — the figure that
/// already reflects achieved occupancy — never of the theoretical
/// ceiling. The combined percentage is not clamped; above 100% it
/// simply drives NOI negative.
pub fn monthly_expenses(
    spec: &OperatingExpenseSpec,
    effective_monthly_income: Money,
) -> ExpenseBreakdown {
    let fixed = spec.fixed_monthly();
    let variable = (effective_monthly_income * spec.percentage_total()).max(Decimal::ZERO);
    ExpenseBreakdown {
        fixed,
        variable,
        total: fixed + variable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn spec() -> OperatingExpenseSpec {
        OperatingExpenseSpec {
            property_tax: dec!(250),
            insurance: dec!(100),
            utilities: dec!(0),
            hoa: dec!(0),
            other_fixed: dec!(50),
            maintenance_rate: dec!(0.05),
            vacancy_rate: dec!(0.05),
            management_rate: dec!(0.10),
            cap_ex_rate: dec!(0),
            op_ex_rate: dec!(0),
        }
    }

    #[test]
    fn variable_costs_come_off_effective_income() {
        let out = monthly_expenses(&spec(), dec!(1800));
        assert_eq!(out.fixed, dec!(400));
        assert_eq!(out.variable, dec!(360));
        assert_eq!(out.total, dec!(760));
    }

    #[test]
    fn zero_income_leaves_only_fixed_costs() {
        let out = monthly_expenses(&spec(), dec!(0));
        assert_eq!(out.variable, dec!(0));
        assert_eq!(out.total, dec!(400));
    }

    #[test]
    fn combined_rates_above_one_are_accepted() {
        let heavy = OperatingExpenseSpec {
            maintenance_rate: dec!(0.60),
            management_rate: dec!(0.50),
            ..Default::default()
        };
        let out = monthly_expenses(&heavy, dec!(1000));
        assert_eq!(out.variable, dec!(1100));
    }
}
