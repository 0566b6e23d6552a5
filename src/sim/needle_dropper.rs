use std::io::{Error, ErrorKind};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Counts produced by one round of drops.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropOutcome {
    pub intersections: u64,
    pub trials: u64,
}

/// Drops needles on a floor ruled with parallel lines.
///
/// A needle of length `l` on lines spaced `t` apart (`l <= t`) crosses a line
/// with probability `2l / (pi t)`. At the default ratio `l / t = 0.5` that is
/// `1 / pi`, so `trials / intersections` estimates pi directly.
#[derive(Debug)]
pub struct NeedleDropper {
    seed: u64,
    rng: StdRng,
    needle_to_spacing: f64,
}

impl NeedleDropper {
    pub const DEFAULT_NEEDLE_TO_SPACING: f64 = 0.5;

    pub fn new(needle_to_spacing: f64, seed: u64) -> Result<Self, Error> {
        if !(needle_to_spacing > 0.0 && needle_to_spacing <= 1.0) {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "Needle length must be in (0, 1] line spacings",
            ));
        }
        Ok(Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            needle_to_spacing,
        })
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            rng: StdRng::seed_from_u64(seed),
            needle_to_spacing: Self::DEFAULT_NEEDLE_TO_SPACING,
        }
    }

    /// One drop; `true` when the needle crosses a line.
    pub fn drop_needle(&mut self) -> bool {
        // spacing normalised to 1: centre offset from nearest line in [0, 1/2]
        let centre = self.rng.random_range(0.0..=0.5);
        let half_reach = 0.5 * self.needle_to_spacing * self.random_sine();
        centre <= half_reach
    }

    pub fn drop_round(&mut self, needles: u64) -> Result<DropOutcome, Error> {
        if needles == 0 {
            return Err(Error::new(
                ErrorKind::InvalidInput,
                "A round needs at least one needle",
            ));
        }
        let intersections = (0..needles).filter(|_| self.drop_needle()).count() as u64;
        Ok(DropOutcome {
            intersections,
            trials: needles,
        })
    }

    pub fn restart(&mut self) {
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Sine of a uniform angle in [0, pi/2], drawn by rejection from the unit
    /// quarter disc so the estimate does not depend on pi itself.
    fn random_sine(&mut self) -> f64 {
        loop {
            let x: f64 = self.rng.random();
            let y: f64 = self.rng.random();
            let r2 = x * x + y * y;
            if r2 > 0.0 && r2 <= 1.0 {
                return y / r2.sqrt();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn ctor_guards() {
        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            let err = NeedleDropper::new(bad, 1).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidInput);
        }
        assert!(NeedleDropper::new(1.0, 1).is_ok());
    }

    #[test]
    fn empty_round_rejected() {
        let mut d = NeedleDropper::with_seed(3);
        assert_eq!(d.drop_round(0).unwrap_err().kind(), ErrorKind::InvalidInput);
    }

    #[test]
    fn same_seed_same_rounds() {
        let mut a = NeedleDropper::with_seed(42);
        let mut b = NeedleDropper::with_seed(42);
        for _ in 0..5 {
            assert_eq!(a.drop_round(500).unwrap(), b.drop_round(500).unwrap());
        }
    }

    #[test]
    fn restart_replays_sequence() {
        let mut d = NeedleDropper::with_seed(7);
        let first = d.drop_round(1000).unwrap();
        d.restart();
        assert_eq!(d.drop_round(1000).unwrap(), first);
        assert_eq!(d.seed(), 7);
    }

    #[test]
    fn intersections_never_exceed_trials() {
        let mut d = NeedleDropper::new(1.0, 11).unwrap();
        for n in [1, 2, 10, 333] {
            let o = d.drop_round(n).unwrap();
            assert_eq!(o.trials, n);
            assert!(o.intersections <= o.trials);
        }
    }

    #[test]
    fn half_length_needles_estimate_pi() {
        let mut d = NeedleDropper::with_seed(2024);
        let o = d.drop_round(200_000).unwrap();
        let est = o.trials as f64 / o.intersections as f64;
        assert!((est - PI).abs() < 0.05, "est={est}");
    }

    #[test]
    fn full_length_needles_cross_twice_as_often() {
        let mut d = NeedleDropper::new(1.0, 99).unwrap();
        let o = d.drop_round(200_000).unwrap();
        let est = 2.0 * o.trials as f64 / o.intersections as f64;
        assert!((est - PI).abs() < 0.05, "est={est}");
    }
}
