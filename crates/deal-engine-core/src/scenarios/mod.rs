pub mod capital_events;
pub mod confidence;
pub mod exchange_1031;
pub mod inflation;

pub use capital_events::generate_capital_events;
pub use confidence::{analyze_confidence, with_confidence, UnderwriteConfidence};
pub use exchange_1031::{analyze_exchange, Exchange1031Output};
pub use inflation::{project_inflated, real_value, restate_hold_projection, RealTermsProjection};
