use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealEngineError;
use crate::metrics;
use crate::types::{
    with_metadata, ComputationOutput, ConfidenceLevel, DealState, MetricWithConfidence,
    UncertaintyInputs,
};
use crate::DealResult;

impl ConfidenceLevel {
    /// Two-sided normal z-score for the level.
    pub fn z_score(self) -> Decimal {
        match self {
            ConfidenceLevel::Eighty => dec!(1.28),
            ConfidenceLevel::Ninety => dec!(1.645),
            ConfidenceLevel::NinetyFive => dec!(1.96),
        }
    }
}

/// Independent income and expense uncertainty fractions combined by
/// root-sum-of-squares.
pub fn combined_uncertainty(income_uncertainty: Decimal, expense_uncertainty: Decimal) -> Decimal {
    (income_uncertainty * income_uncertainty + expense_uncertainty * expense_uncertainty)
        .sqrt()
        .unwrap_or(Decimal::ZERO)
}

/// Wrap a point metric in parametric (normal-approximation) bounds.
/// Symmetric by construction; never resampled.
pub fn with_confidence(base: Decimal, inputs: &UncertaintyInputs) -> MetricWithConfidence {
    let combined = combined_uncertainty(inputs.income_uncertainty, inputs.expense_uncertainty);
    let spread = inputs.confidence_level.z_score() * base.abs() * combined;
    MetricWithConfidence {
        low: base - spread,
        base,
        high: base + spread,
        standard_deviation: base.abs() * combined,
        confidence_level: inputs.confidence_level,
    }
}

/// The headline metrics most sensitive to input uncertainty, each with
/// its parametric bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnderwriteConfidence {
    pub cash_on_cash: MetricWithConfidence,
    pub monthly_noi: MetricWithConfidence,
    pub cap_rate: MetricWithConfidence,
}

/// Run the uncertainty model over a deal's headline metrics.
pub fn analyze_confidence(deal: &DealState) -> DealResult<ComputationOutput<UnderwriteConfidence>> {
    let start = Instant::now();

    let uncertainty = deal.uncertainty.as_ref().ok_or_else(|| {
        DealEngineError::InsufficientData(
            "Confidence analysis requires uncertainty inputs".into(),
        )
    })?;
    validate(uncertainty)?;

    let underwrite = metrics::analyze(deal)?;
    let warnings = underwrite.warnings.clone();
    let base = &underwrite.result;

    let output = UnderwriteConfidence {
        cash_on_cash: with_confidence(base.cash_on_cash, uncertainty),
        monthly_noi: with_confidence(base.monthly_noi, uncertainty),
        cap_rate: with_confidence(base.cap_rate, uncertainty),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Parametric Confidence Intervals (RSS + z-score)",
        uncertainty,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(inputs: &UncertaintyInputs) -> DealResult<()> {
    if inputs.income_uncertainty < Decimal::ZERO || inputs.expense_uncertainty < Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "uncertainty".into(),
            reason: "Uncertainty fractions cannot be negative".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AcquisitionCosts, IncomeInputs};

    #[test]
    fn z_scores_match_the_standard_table() {
        assert_eq!(ConfidenceLevel::Eighty.z_score(), dec!(1.28));
        assert_eq!(ConfidenceLevel::Ninety.z_score(), dec!(1.645));
        assert_eq!(ConfidenceLevel::NinetyFive.z_score(), dec!(1.96));
    }

    #[test]
    fn uncertainties_combine_by_root_sum_of_squares() {
        let combined = combined_uncertainty(dec!(0.03), dec!(0.04));
        assert!((combined - dec!(0.05)).abs() < dec!(0.0000001));
    }

    #[test]
    fn bounds_are_symmetric_around_the_base() {
        let inputs = UncertaintyInputs {
            income_uncertainty: dec!(0.03),
            expense_uncertainty: dec!(0.04),
            confidence_level: ConfidenceLevel::NinetyFive,
        };
        let m = with_confidence(dec!(100), &inputs);

        // spread = 1.96 * 100 * 0.05 = 9.8
        assert!((m.low - dec!(90.2)).abs() < dec!(0.0001));
        assert!((m.high - dec!(109.8)).abs() < dec!(0.0001));
        assert_eq!(m.base, dec!(100));
        assert!((m.standard_deviation - dec!(5)).abs() < dec!(0.0001));
        assert_eq!(m.high - m.base, m.base - m.low);
    }

    #[test]
    fn negative_base_keeps_low_below_high() {
        let inputs = UncertaintyInputs {
            income_uncertainty: dec!(0.10),
            expense_uncertainty: dec!(0),
            confidence_level: ConfidenceLevel::Ninety,
        };
        let m = with_confidence(dec!(-500), &inputs);
        assert!(m.low < m.base && m.base < m.high);
    }

    #[test]
    fn wider_level_widens_the_interval() {
        let narrow = UncertaintyInputs {
            income_uncertainty: dec!(0.05),
            expense_uncertainty: dec!(0.05),
            confidence_level: ConfidenceLevel::Eighty,
        };
        let wide = UncertaintyInputs {
            confidence_level: ConfidenceLevel::NinetyFive,
            ..narrow.clone()
        };
        let n = with_confidence(dec!(1000), &narrow);
        let w = with_confidence(dec!(1000), &wide);
        assert!(w.high - w.low > n.high - n.low);
    }

    #[test]
    fn deal_level_confidence_wraps_headline_metrics() {
        let deal = DealState {
            purchase_price: dec!(250000),
            income: IncomeInputs {
                monthly_rent: dec!(2000),
                ..Default::default()
            },
            acquisition: AcquisitionCosts {
                down_payment: dec!(50000),
                ..Default::default()
            },
            uncertainty: Some(UncertaintyInputs {
                income_uncertainty: dec!(0.05),
                expense_uncertainty: dec!(0.05),
                confidence_level: ConfidenceLevel::Ninety,
            }),
            ..Default::default()
        };
        let out = analyze_confidence(&deal).unwrap().result;
        assert_eq!(out.monthly_noi.base, dec!(2000));
        assert!(out.monthly_noi.low < out.monthly_noi.high);
    }

    #[test]
    fn missing_uncertainty_inputs_is_insufficient_data() {
        let deal = DealState::default();
        assert!(matches!(
            analyze_confidence(&deal),
            Err(DealEngineError::InsufficientData(_))
        ));
    }
}
