pub mod estimate;
mod round;

pub use estimate::{REFERENCE_PI, UNDEFINED_ESTIMATE, difference_from_pi, is_undefined, ratio_estimate};
pub use round::Round;
