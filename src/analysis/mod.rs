pub mod common_opponents;
pub mod head_to_head;
pub mod insights;
pub mod map_stats;
pub mod normalize;
pub mod player_stats;
pub mod recent_form;
pub mod records;
pub mod report;

pub use normalize::normalize;
pub use records::{Outcome, PlayerMapRecord, RawMapRecord};

/// Round half up (towards +inf) to `decimals` places.
pub(crate) fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}

pub(crate) fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
