use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{CapitalEvent, CapitalEventCategory, Money, Rate};

/// Likelihood bounds: nothing is ever certain or impossible.
const MIN_LIKELIHOOD: Decimal = dec!(5);
const MAX_LIKELIHOOD: Decimal = dec!(95);

struct ComponentTemplate {
    description: &'static str,
    category: CapitalEventCategory,
    lifespan_years: u32,
    cost_rate: Rate,
}

/// Typical component lifespans with replacement cost as a fraction of
/// purchase price.
const COMPONENTS: &[ComponentTemplate] = &[
    ComponentTemplate {
        description: "Roof replacement",
        category: CapitalEventCategory::Roof,
        lifespan_years: 25,
        cost_rate: dec!(0.035),
    },
    ComponentTemplate {
        description: "HVAC replacement",
        category: CapitalEventCategory::Hvac,
        lifespan_years: 15,
        cost_rate: dec!(0.025),
    },
    ComponentTemplate {
        description: "Water heater replacement",
        category: CapitalEventCategory::Plumbing,
        lifespan_years: 10,
        cost_rate: dec!(0.006),
    },
    ComponentTemplate {
        description: "Electrical panel upgrade",
        category: CapitalEventCategory::Electrical,
        lifespan_years: 40,
        cost_rate: dec!(0.03),
    },
    ComponentTemplate {
        description: "Foundation repair",
        category: CapitalEventCategory::Structural,
        lifespan_years: 50,
        cost_rate: dec!(0.05),
    },
    ComponentTemplate {
        description: "Exterior paint",
        category: CapitalEventCategory::Exterior,
        lifespan_years: 8,
        cost_rate: dec!(0.01),
    },
];

/// Heuristic capital-expenditure forecast from property age and price.
///
/// Each component lands in its remaining-lifespan year (never sooner
/// than year 1) with a likelihood that rises with age, clamped to
/// [5, 95]. Costs scale linearly with purchase price.
pub fn generate_capital_events(property_age_years: u32, purchase_price: Money) -> Vec<CapitalEvent> {
    if purchase_price <= Decimal::ZERO {
        return Vec::new();
    }

    COMPONENTS
        .iter()
        .map(|c| {
            let year = if property_age_years >= c.lifespan_years {
                1
            } else {
                c.lifespan_years - property_age_years
            };
            let raw_likelihood = Decimal::from(property_age_years) * dec!(100)
                / Decimal::from(c.lifespan_years);
            CapitalEvent {
                year,
                description: c.description.to_string(),
                category: c.category,
                estimated_cost: purchase_price * c.cost_rate,
                likelihood: raw_likelihood.clamp(MIN_LIKELIHOOD, MAX_LIKELIHOOD),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_construction_gets_floor_likelihood_and_full_lifespans() {
        let events = generate_capital_events(0, dec!(300000));
        assert_eq!(events.len(), COMPONENTS.len());
        for event in &events {
            assert_eq!(event.likelihood, MIN_LIKELIHOOD);
        }
        let roof = events
            .iter()
            .find(|e| e.category == CapitalEventCategory::Roof)
            .unwrap();
        assert_eq!(roof.year, 25);
        assert_eq!(roof.estimated_cost, dec!(10500.000));
    }

    #[test]
    fn aged_out_components_land_in_year_one_at_the_cap() {
        let events = generate_capital_events(60, dec!(300000));
        for event in &events {
            assert_eq!(event.year, 1);
            assert_eq!(event.likelihood, MAX_LIKELIHOOD);
        }
    }

    #[test]
    fn likelihood_is_monotone_in_age() {
        let younger = generate_capital_events(10, dec!(300000));
        let older = generate_capital_events(20, dec!(300000));
        for (y, o) in younger.iter().zip(older.iter()) {
            assert!(o.likelihood >= y.likelihood);
            assert!(o.likelihood >= MIN_LIKELIHOOD && o.likelihood <= MAX_LIKELIHOOD);
        }
    }

    #[test]
    fn costs_scale_with_purchase_price() {
        let small = generate_capital_events(10, dec!(100000));
        let large = generate_capital_events(10, dec!(200000));
        for (s, l) in small.iter().zip(large.iter()) {
            assert_eq!(l.estimated_cost, s.estimated_cost * dec!(2));
        }
    }

    #[test]
    fn worthless_property_generates_nothing() {
        assert!(generate_capital_events(10, dec!(0)).is_empty());
    }
}
