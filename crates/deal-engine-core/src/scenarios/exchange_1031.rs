use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DealEngineError;
use crate::types::{with_metadata, ComputationOutput, Exchange1031Inputs, Money};
use crate::DealResult;

/// Depreciation recapture is taxed at a flat 25%.
const RECAPTURE_RATE: Decimal = dec!(0.25);

/// IRC §1031 statutory windows from the relinquished closing.
const IDENTIFICATION_DAYS: i64 = 45;
const CLOSING_DAYS: i64 = 180;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exchange1031Output {
    pub realized_gain: Money,
    /// Value traded down and not rolled into the replacement
    pub cash_boot: Money,
    /// Debt relief not replaced on the new property
    pub mortgage_boot: Money,
    pub total_boot: Money,
    pub recognized_gain: Money,
    pub deferred_gain: Money,
    pub carryover_basis: Money,
    pub depreciation_recapture: Money,
    pub recapture_tax: Money,
    pub capital_gains_tax: Money,
    pub estimated_tax: Money,
    pub identification_deadline: NaiveDate,
    pub closing_deadline: NaiveDate,
}

/// Compute deferred-gain, boot, basis, and tax for a 1031 exchange.
pub fn analyze_exchange(
    inputs: &Exchange1031Inputs,
) -> DealResult<ComputationOutput<Exchange1031Output>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    validate(inputs)?;

    let realized_gain = inputs.relinquished_value - inputs.adjusted_basis;
    let cash_boot = (inputs.relinquished_value - inputs.replacement_value).max(Decimal::ZERO);
    let mortgage_boot = (inputs.relinquished_debt - inputs.replacement_debt).max(Decimal::ZERO);
    let total_boot = cash_boot + mortgage_boot;

    let recognized_gain = realized_gain.min(total_boot).max(Decimal::ZERO);
    let deferred_gain = realized_gain - recognized_gain;
    let carryover_basis = inputs.replacement_value - deferred_gain;

    let depreciation_recapture = recognized_gain.min(inputs.accumulated_depreciation);
    let recapture_tax = depreciation_recapture * RECAPTURE_RATE;
    let capital_gains_tax =
        (recognized_gain - depreciation_recapture) * inputs.capital_gains_rate;
    let estimated_tax = recapture_tax + capital_gains_tax;

    let identification_deadline = inputs.closing_date + Duration::days(IDENTIFICATION_DAYS);
    let closing_deadline = inputs.closing_date + Duration::days(CLOSING_DAYS);

    if realized_gain < Decimal::ZERO {
        warnings.push("Relinquished property sells at a loss: nothing to defer".into());
    }
    if total_boot > Decimal::ZERO {
        warnings.push(format!(
            "Exchange is partially taxable: {total_boot} of boot recognized"
        ));
    }

    let output = Exchange1031Output {
        realized_gain,
        cash_boot,
        mortgage_boot,
        total_boot,
        recognized_gain,
        deferred_gain,
        carryover_basis,
        depreciation_recapture,
        recapture_tax,
        capital_gains_tax,
        estimated_tax,
        identification_deadline,
        closing_deadline,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "1031 Exchange (Deferred Gain / Boot / Basis)",
        inputs,
        warnings,
        elapsed,
        output,
    ))
}

fn validate(inputs: &Exchange1031Inputs) -> DealResult<()> {
    if inputs.relinquished_value <= Decimal::ZERO {
        return Err(DealEngineError::InvalidInput {
            field: "exchange_1031.relinquished_value".into(),
            reason: "Relinquished value must be positive".into(),
        });
    }
    if inputs.capital_gains_rate < Decimal::ZERO || inputs.capital_gains_rate >= Decimal::ONE {
        return Err(DealEngineError::InvalidInput {
            field: "exchange_1031.capital_gains_rate".into(),
            reason: "Capital gains rate must be a fraction below 1".into(),
        });
    }
    Ok(())
}
