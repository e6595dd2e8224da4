use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Money, SubjectToLoan};

use super::schedule::{monthly_payment, remaining_balance, AmortizationRow, MAX_SCHEDULE_ROWS};

/// Payments that agree with the note within a cent are honored as typed.
const PAYMENT_TOLERANCE: Decimal = dec!(0.01);

/// The payment used for an assumed loan's remaining schedule.
///
/// The theoretical scheduled payment is recomputed from the original
/// note terms; a stated payment off by more than one cent is a typo and
/// the recomputed figure wins, so the schedule stays internally
/// consistent.
pub fn subject_to_payment(loan: &SubjectToLoan) -> Money {
    let scheduled = monthly_payment(
        loan.original_principal,
        loan.annual_rate,
        loan.original_term_months,
        false,
    );
    if (scheduled - loan.stated_payment).abs() > PAYMENT_TOLERANCE {
        scheduled
    } else {
        loan.stated_payment
    }
}

/// Remaining schedule of an existing loan assumed mid-term.
///
/// Starts at payment `payments_made + 1`. The balance at the assumption
/// point comes from the closed-form remaining-principal formula, not
/// from simulating prior payments.
pub fn build_subject_to_schedule(loan: &SubjectToLoan) -> Vec<AmortizationRow> {
    if loan.original_principal <= Decimal::ZERO
        || loan.original_term_months == 0
        || loan.payments_made >= loan.original_term_months
    {
        return Vec::new();
    }

    let r = loan.annual_rate / dec!(12);
    let payment = subject_to_payment(loan);
    let mut balance = remaining_balance(
        loan.original_principal,
        loan.annual_rate,
        loan.original_term_months,
        loan.payments_made,
    );

    let remaining_months = (loan.original_term_months - loan.payments_made) as usize;
    let row_cap = remaining_months.min(MAX_SCHEDULE_ROWS);
    let mut rows = Vec::with_capacity(row_cap);

    for offset in 0..row_cap as u32 {
        let index = loan.payments_made + offset + 1;
        let interest = balance * r;
        let mut principal_part = payment - interest;
        let mut period_payment = payment;
        if index == loan.original_term_months || principal_part > balance {
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

    const CENT: Decimal = dec!(0.01);

    fn assumed_loan() -> SubjectToLoan {
        SubjectToLoan {
            original_principal: dec!(200000),
            annual_rate: dec!(0.065),
            original_term_months: 360,
            stated_payment: dec!(1264.14),
            payments_made: 60,
            seller_payment: dec!(15000),
        }
    }

    #[test]
    fn stated_payment_within_a_cent_is_honored() {
        let scheduled = monthly_payment(dec!(200000), dec!(0.065), 360, false);
        let loan = SubjectToLoan {
            stated_payment: scheduled + dec!(0.005),
            ..assumed_loan()
        };
        assert_eq!(subject_to_payment(&loan), scheduled + dec!(0.005));
    }

    #[test]
    fn typo_payment_is_replaced_by_recomputed_figure() {
        let loan = SubjectToLoan {
            stated_payment: dec!(1500),
            ..assumed_loan()
        };
        let payment = subject_to_payment(&loan);
        assert!((payment - dec!(1264.14)).abs() < dec!(0.05), "payment = {payment}");
    }

    #[test]
    fn schedule_starts_mid_term_and_retires_the_note() {
        let loan = assumed_loan();
        let rows = build_subject_to_schedule(&loan);
        assert_eq!(rows.len(), 300);
        assert_eq!(rows.first().unwrap().index, 61);
        assert_eq!(rows.last().unwrap().index, 360);
        assert_eq!(rows.last().unwrap().balance, dec!(0));

        // Principal across the remaining rows equals the assumed balance
        let starting = remaining_balance(dec!(200000), dec!(0.065), 360, 60);
        let total_principal: Decimal = rows.iter().map(|r| r.principal).sum();
        assert!((total_principal - starting).abs() < CENT);
    }

    #[test]
    fn fully_paid_note_has_no_remaining_schedule() {
        let loan = SubjectToLoan {
            payments_made: 360,
            ..assumed_loan()
        };
        assert!(build_subject_to_schedule(&loan).is_empty());
    }
}
