use crate::core::Round;
use crate::error::Result;

/// Durable, key-ordered collection of [`Round`]s.
///
/// Implementations keep no read cache: [`scan_all`](RoundStore::scan_all)
/// always reflects what is currently persisted.
pub trait RoundStore {
    /// Ensures the backing structure exists. Safe to call on every startup and
    /// never destroys existing rounds.
    fn initialize(&mut self) -> Result<()>;

    /// Writes one fully formed round.
    ///
    /// Fails with [`LedgerError::ConstraintViolation`](crate::error::LedgerError::ConstraintViolation)
    /// when a round with the same number is already stored.
    fn append(&mut self, round: &Round) -> Result<()>;

    /// Returns every stored round, ascending by round number.
    fn scan_all(&self) -> Result<Vec<Round>>;

    /// Removes every round and re-initializes the empty structure.
    fn clear(&mut self) -> Result<()>;
}
