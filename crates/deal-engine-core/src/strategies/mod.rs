pub mod brrrr;
pub mod fix_flip;
pub mod projection;

pub use brrrr::{analyze_brrrr, BrrrrOutput};
pub use fix_flip::{analyze_fix_flip, FixFlipOutput};
pub use projection::{analyze_hold, true_irr, HoldProjectionOutput};
