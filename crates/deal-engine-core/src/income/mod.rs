pub mod expenses;
pub mod model;
pub mod seasonal;

pub use expenses::{monthly_expenses, ExpenseBreakdown};
pub use model::{gross_monthly_income, IncomeBreakdown, AVAILABLE_NIGHTS_PER_MONTH};
pub use seasonal::seasonal_factor;
