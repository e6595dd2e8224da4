use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{Rate, SeasonalInputs};

/// Occupancy multiplier applied to effective income.
///
/// Two deliberately non-equivalent paths: when per-quarter ADR detail is
/// complete and non-zero, the multiplier for the quarter containing
/// `analysis_month` is used (the single-month path); otherwise the four
/// quarterly multipliers are averaged. Callers wanting the more precise
/// path must supply the full quarterly ADR set.
pub fn seasonal_factor(seasonal: Option<&SeasonalInputs>) -> Rate {
    let Some(s) = seasonal else {
        return Decimal::ONE;
    };

    if let Some(adr) = &s.quarterly_adr {
        if adr.iter().all(|v| *v > Decimal::ZERO) {
            return s.quarterly_occupancy[quarter_index(s.analysis_month)];
        }
    }

    s.quarterly_occupancy.iter().copied().sum::<Decimal>() / dec!(4)
}

fn quarter_index(month: u32) -> usize {
    match month.clamp(1, 12) {
        1..=3 => 0,
        4..=6 => 1,
        7..=9 => 2,
        _ => 3,
    }
}
