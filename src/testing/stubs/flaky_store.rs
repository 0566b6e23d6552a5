use std::cell::Cell;

use rusqlite::ffi;

use crate::core::Round;
use crate::error::{LedgerError, Result};
use crate::store::{MemoryRoundStore, RoundStore};

/// In-memory store whose appends and scans can be switched to fail, for
/// exercising storage error paths.
#[derive(Debug, Default)]
pub struct FlakyStore {
    inner: MemoryRoundStore,
    fail_appends: Cell<bool>,
    fail_scans: Cell<bool>,
}

impl FlakyStore {
    pub fn fail_appends(&self, on: bool) {
        self.fail_appends.set(on);
    }

    pub fn fail_scans(&self, on: bool) {
        self.fail_scans.set(on);
    }

    fn injected() -> LedgerError {
        LedgerError::StorageUnavailable(rusqlite::Error::SqliteFailure(
            ffi::Error::new(ffi::SQLITE_IOERR),
            Some("injected failure".into()),
        ))
    }
}

impl RoundStore for FlakyStore {
    fn initialize(&mut self) -> Result<()> {
        self.inner.initialize()
    }

    fn append(&mut self, round: &Round) -> Result<()> {
        if self.fail_appends.get() {
            return Err(Self::injected());
        }
        self.inner.append(round)
    }

    fn scan_all(&self) -> Result<Vec<Round>> {
        if self.fail_scans.get() {
            return Err(Self::injected());
        }
        self.inner.scan_all()
    }

    fn clear(&mut self) -> Result<()> {
        self.inner.clear()
    }
}
