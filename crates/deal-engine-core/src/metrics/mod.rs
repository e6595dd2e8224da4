pub mod headline;

pub use headline::{
    analyze, break_even_occupancy, break_even_rent, cap_rate, cash_invested, cash_on_cash, dscr,
    gross_rent_multiplier, monthly_noi, UnderwriteOutput,
};
