use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::core::Round;
use crate::error::{LedgerError, Result};
use crate::store::RoundStore;

/// Non-durable [`RoundStore`] for ephemeral sessions and tests.
#[derive(Debug, Default)]
pub struct MemoryRoundStore {
    rounds: BTreeMap<u64, Round>,
}

impl MemoryRoundStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RoundStore for MemoryRoundStore {
    fn initialize(&mut self) -> Result<()> {
        Ok(())
    }

    fn append(&mut self, round: &Round) -> Result<()> {
        match self.rounds.entry(round.round_number()) {
            Entry::Occupied(_) => Err(LedgerError::ConstraintViolation {
                round_number: round.round_number(),
            }),
            Entry::Vacant(slot) => {
                slot.insert(*round);
                Ok(())
            }
        }
    }

    fn scan_all(&self) -> Result<Vec<Round>> {
        Ok(self.rounds.values().copied().collect())
    }

    fn clear(&mut self) -> Result<()> {
        self.rounds.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn behaves_like_an_ordered_store() {
        let mut s = MemoryRoundStore::new();
        s.initialize().unwrap();
        s.append(&Round::new(2, 10, 40, 4.0)).unwrap();
        s.append(&Round::new(1, 5, 20, 4.0)).unwrap();

        let got = s.scan_all().unwrap();
        assert_eq!(got[0].round_number(), 1);
        assert_eq!(got[1].round_number(), 2);

        let err = s.append(&Round::new(2, 1, 1, 1.0)).unwrap_err();
        assert!(matches!(
            err,
            LedgerError::ConstraintViolation { round_number: 2 }
        ));

        s.clear().unwrap();
        assert!(s.scan_all().unwrap().is_empty());
    }
}
