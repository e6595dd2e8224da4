use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::{ChannelMixModel, DealState, Money, NightlyModel, OperationType, PropertyType};

use super::seasonal::seasonal_factor;

/// Average bookable nights per month (365.25 / 12).
pub const AVAILABLE_NIGHTS_PER_MONTH: Decimal = dec!(30.44);

/// Monthly gross income, split into the 100%-occupancy ceiling and the
/// figure achieved after occupancy/seasonal adjustment.
///
/// Percentage-of-income operating costs must be computed from
/// `effective`, never `potential`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeBreakdown {
    pub potential: Money,
    pub effective: Money,
}

impl IncomeBreakdown {
    fn zero() -> Self {
        IncomeBreakdown {
            potential: Decimal::ZERO,
            effective: Decimal::ZERO,
        }
    }
}

/// Select and evaluate the active income model for the deal.
///
/// Dispatch is a pure function of `(PropertyType, OperationType)`:
/// STR/arbitrage operations and short-term-rental property both book
/// nightly; flips never collect interim rent; the remaining property
/// types use their own model.
pub fn gross_monthly_income(deal: &DealState) -> IncomeBreakdown {
    if deal.operation_type == OperationType::FixAndFlip {
        return IncomeBreakdown::zero();
    }

    let seasonal = seasonal_factor(deal.income.seasonal.as_ref());

    if matches!(
        deal.operation_type,
        OperationType::ShortTermRental | OperationType::RentalArbitrage
    ) || deal.property_type == PropertyType::ShortTermRental
    {
        return nightly_income(deal.income.nightly.as_ref(), seasonal);
    }

    match deal.property_type {
        PropertyType::SingleFamily => {
            let rent = deal.income.monthly_rent;
            IncomeBreakdown {
                potential: rent,
                effective: rent * seasonal,
            }
        }
        PropertyType::MultiFamily => {
            let rent: Money = deal.income.unit_rents.iter().copied().sum();
            IncomeBreakdown {
                potential: rent,
                effective: rent * seasonal,
            }
        }
        PropertyType::OfficeRetail => match &deal.income.commercial {
            Some(c) => {
                let potential = c.square_feet * c.annual_rent_per_sq_ft / dec!(12);
                IncomeBreakdown {
                    potential,
                    effective: potential * c.occupancy,
                }
            }
            None => IncomeBreakdown::zero(),
        },
        PropertyType::Land => {
            let extra = deal.income.extra_monthly_income.unwrap_or(Decimal::ZERO);
            IncomeBreakdown {
                potential: extra,
                effective: extra,
            }
        }
        PropertyType::Hotel => match &deal.income.hotel {
            Some(h) => {
                let potential =
                    Decimal::from(h.rooms) * h.average_daily_rate * AVAILABLE_NIGHTS_PER_MONTH;
                IncomeBreakdown {
                    potential,
                    effective: potential * h.occupancy * seasonal,
                }
            }
            None => IncomeBreakdown::zero(),
        },
        // already dispatched to the nightly model above
        PropertyType::ShortTermRental => IncomeBreakdown::zero(),
    }
}

fn nightly_income(model: Option<&NightlyModel>, seasonal: Decimal) -> IncomeBreakdown {
    let Some(m) = model else {
        return IncomeBreakdown::zero();
    };

    match &m.enhanced {
        Some(mix) => enhanced_nightly_income(m, mix, seasonal),
        None => {
            let potential = m.nightly_rate * AVAILABLE_NIGHTS_PER_MONTH + m.monthly_fees;
            let effective =
                m.nightly_rate * m.occupied_nights_per_month * seasonal + m.monthly_fees;
            IncomeBreakdown {
                potential,
                effective,
            }
        }
    }
}

/// Enhanced STR model: channel mix and commissions, dynamic weekend
/// pricing, and turnover-day loss folded into a net revenue per
/// available night.
fn enhanced_nightly_income(
    m: &NightlyModel,
    mix: &ChannelMixModel,
    seasonal: Decimal,
) -> IncomeBreakdown {
    let blended_commission =
        mix.airbnb_share * mix.airbnb_commission + mix.vrbo_share * mix.vrbo_commission;
    let adr_uplift = Decimal::ONE + mix.weekend_share * mix.weekend_premium;
    let net_rate = m.nightly_rate * adr_uplift * (Decimal::ONE - blended_commission);

    let bookable_nights =
        (m.occupied_nights_per_month - mix.turnover_days_per_month).max(Decimal::ZERO);

    let potential = m.nightly_rate * adr_uplift * AVAILABLE_NIGHTS_PER_MONTH + m.monthly_fees;
    let effective = net_rate * bookable_nights * seasonal + m.monthly_fees;

    IncomeBreakdown {
        potential,
        effective,
    }
}
