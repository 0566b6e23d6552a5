mod needle_dropper;

pub use needle_dropper::{DropOutcome, NeedleDropper};
