use std::fmt::{Display, Formatter, Result};

use crate::core::{Round, difference_from_pi, is_undefined};
use crate::ledger::Totals;

/// One line of the round history table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HistoryRow {
    pub round_number: u64,
    pub intersections: u64,
    pub trials: u64,
    pub round_estimate: f64,
    pub cumulative_estimate: f64,
    pub difference_from_pi: f64,
}

impl From<&Round> for HistoryRow {
    fn from(r: &Round) -> Self {
        Self {
            round_number: r.round_number(),
            intersections: r.intersection_count(),
            trials: r.trial_count(),
            round_estimate: r.round_estimate(),
            cumulative_estimate: r.cumulative_estimate(),
            difference_from_pi: r.difference_from_pi(),
        }
    }
}

pub const HISTORY_HEADER: &str = "round  hits   drops  round_pi   cumulative_pi  |pi - est|";

impl Display for HistoryRow {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        write!(
            f,
            "{:<6} {:<6} {:<6} {:<10.6} {:<14.6} {:.6}",
            self.round_number,
            self.intersections,
            self.trials,
            self.round_estimate,
            self.cumulative_estimate,
            self.difference_from_pi
        )
    }
}

pub fn history_rows<'a, I>(rounds: I) -> Vec<HistoryRow>
where
    I: IntoIterator<Item = &'a Round>,
{
    rounds.into_iter().map(HistoryRow::from).collect()
}

/// Ledger-wide figures shown above the history table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub rounds: usize,
    pub totals: Totals,
    pub estimate: f64,
}

impl Summary {
    pub fn new(rounds: usize, totals: Totals) -> Self {
        Self {
            rounds,
            totals,
            estimate: totals.estimate(),
        }
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        if self.rounds == 0 {
            return write!(f, "no rounds recorded");
        }
        if is_undefined(self.estimate) {
            return write!(
                f,
                "rounds={}, hits={}, drops={}, pi=undefined",
                self.rounds, self.totals.intersections, self.totals.trials
            );
        }
        write!(
            f,
            "rounds={}, hits={}, drops={}, pi~{:.6} (off by {:.6})",
            self.rounds,
            self.totals.intersections,
            self.totals.trials,
            self.estimate,
            difference_from_pi(self.estimate)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn row_carries_round_and_derived_values() {
        let r = Round::new(2, 10, 40, 4.0);
        let row = HistoryRow::from(&r);
        assert_eq!(row.round_number, 2);
        assert_eq!(row.round_estimate, 4.0);
        assert_eq!(row.cumulative_estimate, 4.0);
        assert!((row.difference_from_pi - (4.0 - std::f64::consts::PI)).abs() < 1e-12);
    }

    #[test]
    fn row_display_is_aligned() {
        let row = HistoryRow::from(&Round::new(1, 5, 20, 4.0));
        assert_eq!(
            row.to_string(),
            "1      5      20     4.000000   4.000000       0.858407"
        );
    }

    #[test]
    fn rows_keep_input_order() {
        let rounds = [Round::new(1, 5, 20, 4.0), Round::new(2, 10, 40, 4.0)];
        let rows = history_rows(rounds.iter().rev());
        assert_eq!(rows[0].round_number, 2);
        assert_eq!(rows[1].round_number, 1);
    }

    #[test]
    fn summary_display_variants() {
        assert_eq!(
            Summary::new(0, Totals::default()).to_string(),
            "no rounds recorded"
        );

        let t = Totals {
            intersections: 15,
            trials: 60,
        };
        assert_eq!(
            Summary::new(2, t).to_string(),
            "rounds=2, hits=15, drops=60, pi~4.000000 (off by 0.858407)"
        );

        let t = Totals {
            intersections: 0,
            trials: 60,
        };
        assert_eq!(
            Summary::new(1, t).to_string(),
            "rounds=1, hits=0, drops=60, pi=undefined"
        );
    }
}
