use crate::core::estimate::{difference_from_pi, ratio_estimate};
use std::fmt::{Display, Formatter, Result};

/// One committed batch of needle drops.
///
/// Rounds are built by the ledger, which assigns `round_number` and freezes
/// `cumulative_estimate` at write time. Fields are read-only from outside the
/// crate so a stored round cannot be edited in place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Round {
    round_number: u64,
    intersection_count: u64,
    trial_count: u64,
    cumulative_estimate: f64,
}

impl Round {
    pub(crate) fn new(
        round_number: u64,
        intersection_count: u64,
        trial_count: u64,
        cumulative_estimate: f64,
    ) -> Self {
        Self {
            round_number,
            intersection_count,
            trial_count,
            cumulative_estimate,
        }
    }

    #[inline]
    pub fn round_number(&self) -> u64 {
        self.round_number
    }

    #[inline]
    pub fn intersection_count(&self) -> u64 {
        self.intersection_count
    }

    #[inline]
    pub fn trial_count(&self) -> u64 {
        self.trial_count
    }

    #[inline]
    pub fn cumulative_estimate(&self) -> f64 {
        self.cumulative_estimate
    }

    /// Estimate from this round's counts alone.
    #[inline]
    pub fn round_estimate(&self) -> f64 {
        ratio_estimate(self.intersection_count, self.trial_count)
    }

    #[inline]
    pub fn difference_from_pi(&self) -> f64 {
        difference_from_pi(self.cumulative_estimate)
    }
}

impl Display for Round {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "round={}, hits={}, drops={}, round_pi={:.6}, cumulative_pi={:.6}",
            self.round_number,
            self.intersection_count,
            self.trial_count,
            self.round_estimate(),
            self.cumulative_estimate
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::estimate::is_undefined;

    #[test]
    fn round_estimate_uses_only_own_counts() {
        let r = Round::new(3, 7, 22, 3.5);
        assert!((r.round_estimate() - 22.0 / 7.0).abs() < 1e-12);
        assert_eq!(r.cumulative_estimate(), 3.5);
    }

    #[test]
    fn round_estimate_with_zero_hits_is_undefined() {
        let r = Round::new(1, 0, 10, f64::INFINITY);
        assert!(is_undefined(r.round_estimate()));
        assert!(r.difference_from_pi().is_infinite());
    }

    #[test]
    fn display_is_compact() {
        let r = Round::new(1, 5, 20, 4.0);
        assert_eq!(
            r.to_string(),
            "round=1, hits=5, drops=20, round_pi=4.000000, cumulative_pi=4.000000"
        );
    }
}
