use log::{debug, info, warn};

use crate::core::{Round, ratio_estimate};
use crate::error::{LedgerError, Result};
use crate::store::RoundStore;

/// Summed counts over every committed round.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Totals {
    pub intersections: u64,
    pub trials: u64,
}

impl Totals {
    pub fn estimate(&self) -> f64 {
        ratio_estimate(self.intersections, self.trials)
    }

    /// `None` if either sum leaves the `u64` range.
    pub fn checked_add(self, intersections: u64, trials: u64) -> Option<Totals> {
        Some(Totals {
            intersections: self.intersections.checked_add(intersections)?,
            trials: self.trials.checked_add(trials)?,
        })
    }
}

/// First and last rounds of a ledger, for compact display.
///
/// `tail` never repeats a round already in `head`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeadTail<'a> {
    pub head: &'a [Round],
    pub tail: &'a [Round],
}

/// Ordered view over a [`RoundStore`] that numbers rounds and freezes the
/// running estimate of each one at write time.
///
/// The in-memory view is only ever replaced by a fresh scan of the store, never
/// patched in place.
pub struct SimulationLedger<S: RoundStore> {
    store: S,
    rounds: Vec<Round>,
}

impl<S: RoundStore> SimulationLedger<S> {
    /// Initializes `store` and loads every round already persisted in it.
    pub fn open(mut store: S) -> Result<Self> {
        store.initialize()?;
        let rounds = store.scan_all()?;
        info!("ledger opened with {} rounds", rounds.len());
        Ok(Self { store, rounds })
    }

    /// Running estimate if a round with these counts were appended now.
    ///
    /// Pure: reads the current view only. Yields the undefined sentinel when
    /// the summed intersections are zero.
    pub fn compute_cumulative_estimate(&self, new_intersections: u64, new_trials: u64) -> f64 {
        let totals = self.totals();
        ratio_estimate(
            totals.intersections.saturating_add(new_intersections),
            totals.trials.saturating_add(new_trials),
        )
    }

    /// Appends a round and returns the refreshed chronological view.
    ///
    /// Rejects zero counts, `intersections > trials` and counts that would
    /// overflow the running totals with [`LedgerError::InvalidInput`] before
    /// anything is written.
    ///
    /// If the append succeeds but re-reading the store fails, the error is
    /// returned while the store already holds the new round; the in-memory view
    /// stays at its previous state until [`reload`](Self::reload) succeeds or
    /// the ledger is reopened.
    pub fn add_round(&mut self, intersections: u64, trials: u64) -> Result<&[Round]> {
        validate_counts(intersections, trials)?;

        let estimate = self
            .totals()
            .checked_add(intersections, trials)
            .ok_or_else(|| LedgerError::InvalidInput("running totals would overflow".into()))?
            .estimate();
        let round = Round::new(self.next_round_number(), intersections, trials, estimate);

        self.store.append(&round)?;
        info!("{round}");

        self.reload().inspect_err(|e| {
            warn!(
                "round {} stored but view reload failed: {e}",
                round.round_number()
            );
        })
    }

    /// Replaces the in-memory view with a fresh scan of the store.
    pub fn reload(&mut self) -> Result<&[Round]> {
        self.rounds = self.store.scan_all()?;
        debug!("reloaded {} rounds", self.rounds.len());
        Ok(&self.rounds)
    }

    /// Deletes every round, in the store and in memory.
    pub fn clear_all(&mut self) -> Result<()> {
        self.store.clear()?;
        self.rounds.clear();
        info!("ledger cleared");
        Ok(())
    }

    pub fn all_rounds_chronological(&self) -> &[Round] {
        &self.rounds
    }

    pub fn all_rounds_reverse_chronological(&self) -> Vec<Round> {
        self.rounds.iter().rev().copied().collect()
    }

    /// The first `n` rounds, and the last `n` when there are more than `n`.
    ///
    /// With `n < len < 2n` the tail is shortened to start right after the head.
    pub fn head_and_tail(&self, n: usize) -> HeadTail<'_> {
        let total = self.rounds.len();
        let head_end = n.min(total);
        let tail: &[Round] = if total > n {
            &self.rounds[(total - n).max(head_end)..]
        } else {
            &[]
        };
        HeadTail {
            head: &self.rounds[..head_end],
            tail,
        }
    }

    pub fn totals(&self) -> Totals {
        self.rounds.iter().fold(Totals::default(), |acc, r| Totals {
            intersections: acc.intersections.saturating_add(r.intersection_count()),
            trials: acc.trials.saturating_add(r.trial_count()),
        })
    }

    pub fn latest(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn next_round_number(&self) -> u64 {
        self.rounds.len() as u64 + 1
    }
}

fn validate_counts(intersections: u64, trials: u64) -> Result<()> {
    if intersections == 0 {
        return Err(LedgerError::InvalidInput(
            "intersections must be >= 1".into(),
        ));
    }
    if trials == 0 {
        return Err(LedgerError::InvalidInput("trials must be >= 1".into()));
    }
    if intersections > trials {
        return Err(LedgerError::InvalidInput(format!(
            "intersections ({intersections}) cannot exceed trials ({trials})"
        )));
    }
    Ok(())
}
