use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{LoanSpec, Money, Rate};

/// Schedules are materialized, never streamed; 600 rows (50 years)
/// bounds the computation.
pub const MAX_SCHEDULE_ROWS: usize = 600;

/// One period of an amortization schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationRow {
    /// 1-based payment number within the original note
    pub index: u32,
    pub payment: Money,
    pub interest: Money,
    pub principal: Money,
    /// Balance after this payment, clamped to a minimum of 0
    pub balance: Money,
    pub is_io_phase: bool,
}

/// Standard annuity payment `P·r·(1+r)^n / ((1+r)^n − 1)`.
///
/// Interest-only loans pay `P·r`; a zero rate degrades to straight-line
/// `P/n`. Degenerate inputs (non-positive loan, zero term) return 0.
pub fn monthly_payment(
    loan_amount: Money,
    annual_rate: Rate,
    term_months: u32,
    interest_only: bool,
) -> Money {
    if loan_amount <= Decimal::ZERO || term_months == 0 {
        return Decimal::ZERO;
    }
    let r = annual_rate / dec!(12);
    if interest_only {
        return loan_amount * r;
    }
    if r.is_zero() {
        return loan_amount / Decimal::from(term_months);
    }
    let factor = (Decimal::ONE + r).powd(Decimal::from(term_months));
    loan_amount * r * factor / (factor - Decimal::ONE)
}

/// Remaining principal after `payments_made` scheduled payments, via the
/// closed form `P·[(1+r)^n − (1+r)^k] / [(1+r)^n − 1]`. Never simulated.
pub fn remaining_balance(
    principal: Money,
    annual_rate: Rate,
    term_months: u32,
    payments_made: u32,
) -> Money {
    if principal <= Decimal::ZERO || term_months == 0 || payments_made >= term_months {
        return Decimal::ZERO;
    }
    let r = annual_rate / dec!(12);
    if r.is_zero() {
        let remaining = Decimal::from(term_months - payments_made);
        return principal * remaining / Decimal::from(term_months);
    }
    let one_plus_r = Decimal::ONE + r;
    let full = one_plus_r.powd(Decimal::from(term_months));
    let paid = one_plus_r.powd(Decimal::from(payments_made));
    (principal * (full - paid) / (full - Decimal::ONE)).max(Decimal::ZERO)
}

/// Build the row-by-row schedule for a new loan.
///
/// Three regimes: pure interest-only (flat payment, principal never
/// reduced), hybrid IO-then-amortizing (a freshly computed payment over
/// the remaining term once the IO window closes), and standard
/// amortizing. The final scheduled payment retires the exact remaining
/// balance so the schedule lands on 0 rather than drifting.
pub fn build_schedule(loan: &LoanSpec) -> Vec<AmortizationRow> {
    if loan.principal <= Decimal::ZERO || loan.term_months == 0 {
        return Vec::new();
    }

    let r = loan.annual_rate / dec!(12);
    let row_cap = (loan.term_months as usize).min(MAX_SCHEDULE_ROWS);

    if loan.interest_only {
        let payment = loan.principal * r;
        return (1..=row_cap as u32)
            .map(|index| AmortizationRow {
                index,
                payment,
                interest: payment,
                principal: Decimal::ZERO,
                balance: loan.principal,
                is_io_phase: true,
            })
            .collect();
    }

    let io_months = loan.io_period_months.unwrap_or(0).min(loan.term_months);
    let mut rows = Vec::with_capacity(row_cap);
    let mut balance = loan.principal;

    let io_payment = loan.principal * r;
    for index in 1..=io_months.min(row_cap as u32) {
        rows.push(AmortizationRow {
            index,
            payment: io_payment,
            interest: io_payment,
            principal: Decimal::ZERO,
            balance,
            is_io_phase: true,
        });
    }
    if rows.len() >= row_cap {
        return rows;
    }

    let amortizing_months = loan.term_months - io_months;
    let payment = monthly_payment(balance, loan.annual_rate, amortizing_months, false);

    for index in (io_months + 1)..=(row_cap as u32) {
        let interest = balance * r;
        let mut principal_part = payment - interest;
        let mut period_payment = payment;
        if index == loan.term_months || principal_part > balance {
            principal_part = balance;
            period_payment = interest + principal_part;
        }
        balance = (balance - principal_part).max(Decimal::ZERO);
        rows.push(AmortizationRow {
            index,
            payment: period_payment,
            interest,
            principal: principal_part,
            balance,
            is_io_phase: false,
        });
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CENT: Decimal = dec!(0.01);

    fn standard_loan() -> LoanSpec {
        LoanSpec {
            principal: dec!(200000),
            annual_rate: dec!(0.065),
            term_months: 360,
            interest_only: false,
            io_period_months: None,
        }
    }

    #[test]
    fn annuity_payment_200k_at_6_5_over_30y() {
        let pmt = monthly_payment(dec!(200000), dec!(0.065), 360, false);
        assert!((pmt - dec!(1264.14)).abs() < dec!(0.05), "pmt = {pmt}");
    }

    #[test]
    fn zero_rate_payment_is_straight_line_exact() {
        assert_eq!(
            monthly_payment(dec!(120000), dec!(0), 120, false),
            dec!(1000)
        );
    }

    #[test]
    fn interest_only_payment_is_rate_on_principal() {
        assert_eq!(
            monthly_payment(dec!(200000), dec!(0.06), 360, true),
            dec!(1000)
        );
    }

    #[test]
    fn degenerate_loans_pay_zero() {
        assert_eq!(monthly_payment(dec!(0), dec!(0.065), 360, false), dec!(0));
        assert_eq!(monthly_payment(dec!(-5), dec!(0.065), 360, false), dec!(0));
        assert_eq!(monthly_payment(dec!(200000), dec!(0.065), 0, false), dec!(0));
    }

    #[test]
    fn amortizing_schedule_conserves_principal_and_lands_on_zero() {
        let rows = build_schedule(&standard_loan());
        assert_eq!(rows.len(), 360);

        // powd rounding leaves sub-cent residue in the summed rows
        let total_principal: Decimal = rows.iter().map(|r| r.principal).sum();
        assert!(
            (total_principal - dec!(200000)).abs() < CENT,
            "total principal = {total_principal}"
        );
        assert_eq!(rows.last().unwrap().balance, dec!(0));
    }

    #[test]
    fn interest_only_schedule_is_flat() {
        let loan = LoanSpec {
            interest_only: true,
            term_months: 120,
            ..standard_loan()
        };
        let rows = build_schedule(&loan);
        assert_eq!(rows.len(), 120);
        let first_payment = rows[0].payment;
        for row in &rows {
            assert_eq!(row.principal, dec!(0));
            assert_eq!(row.payment, first_payment);
            assert_eq!(row.balance, dec!(200000));
            assert!(row.is_io_phase);
        }
    }

    #[test]
    fn hybrid_schedule_switches_regimes_and_retires_the_loan() {
        let loan = LoanSpec {
            io_period_months: Some(12),
            ..standard_loan()
        };
        let rows = build_schedule(&loan);
        assert_eq!(rows.len(), 360);

        for row in &rows[..12] {
            assert!(row.is_io_phase);
            assert_eq!(row.principal, dec!(0));
            assert_eq!(row.balance, dec!(200000));
        }

        // Post-IO payment re-amortizes the full balance over 348 months
        let expected = monthly_payment(dec!(200000), dec!(0.065), 348, false);
        assert!(!rows[12].is_io_phase);
        assert!((rows[12].payment - expected).abs() < CENT);
        assert_eq!(rows.last().unwrap().balance, dec!(0));
    }

    #[test]
    fn schedule_is_capped_at_600_rows() {
        let loan = LoanSpec {
            term_months: 720,
            ..standard_loan()
        };
        assert_eq!(build_schedule(&loan).len(), MAX_SCHEDULE_ROWS);
    }

    #[test]
    fn zero_principal_schedule_is_empty() {
        let loan = LoanSpec {
            principal: dec!(0),
            ..standard_loan()
        };
        assert!(build_schedule(&loan).is_empty());
    }

    #[test]
    fn remaining_balance_closed_form_matches_simulation() {
        let loan = standard_loan();
        let rows = build_schedule(&loan);
        let closed = remaining_balance(dec!(200000), dec!(0.065), 360, 60);
        assert!((closed - rows[59].balance).abs() < CENT);
    }

    #[test]
    fn remaining_balance_zero_rate_is_linear() {
        assert_eq!(
            remaining_balance(dec!(120000), dec!(0), 120, 30),
            dec!(90000)
        );
    }

    #[test]
    fn remaining_balance_boundaries() {
        let full = remaining_balance(dec!(200000), dec!(0.065), 360, 0);
        assert!((full - dec!(200000)).abs() < CENT);
        assert_eq!(remaining_balance(dec!(200000), dec!(0.065), 360, 360), dec!(0));
    }
}
