//! SQLite-backed round storage.
//!
//! The table layout matches the files written by earlier versions of the tool
//! (`intersections`, `total_needles`, `cumulative_pi`), so an existing
//! `buffon_needle.db` opens without migration.

use std::path::{Path, PathBuf};

use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, Row, params};

use crate::core::Round;
use crate::error::{LedgerError, Result};
use crate::store::RoundStore;

pub const DEFAULT_DB_PATH: &str = "buffon_needle.db";

const CREATE_ROUNDS: &str = "
    CREATE TABLE IF NOT EXISTS rounds (
        round_number INTEGER PRIMARY KEY,
        intersections INTEGER NOT NULL,
        total_needles INTEGER NOT NULL,
        cumulative_pi REAL NOT NULL
    )";

pub struct SqliteRoundStore {
    conn: Connection,
    path: Option<PathBuf>,
}

impl SqliteRoundStore {
    /// Opens (or creates) the database file at `path`. The `rounds` table is
    /// created by [`RoundStore::initialize`].
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        info!("opened round store at {}", path.display());
        Ok(Self {
            conn,
            path: Some(path.to_path_buf()),
        })
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self { conn, path: None })
    }

    /// File backing this store, `None` for an in-memory database.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl RoundStore for SqliteRoundStore {
    fn initialize(&mut self) -> Result<()> {
        self.conn.execute_batch(CREATE_ROUNDS)?;
        Ok(())
    }

    fn append(&mut self, round: &Round) -> Result<()> {
        let number = sql_integer("round_number", round.round_number())?;
        let hits = sql_integer("intersections", round.intersection_count())?;
        let drops = sql_integer("trials", round.trial_count())?;

        let inserted = self.conn.execute(
            "INSERT INTO rounds (round_number, intersections, total_needles, cumulative_pi)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                number,
                hits,
                drops,
                round.cumulative_estimate(),
            ],
        );

        match inserted {
            Ok(_) => {
                debug!("stored {round}");
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(LedgerError::ConstraintViolation {
                    round_number: round.round_number(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn scan_all(&self) -> Result<Vec<Round>> {
        let mut stmt = self.conn.prepare(
            "SELECT round_number, intersections, total_needles, cumulative_pi
             FROM rounds ORDER BY round_number ASC",
        )?;
        let rounds = stmt
            .query_map([], |row| {
                Ok(Round::new(
                    count_column(row, 0)?,
                    count_column(row, 1)?,
                    count_column(row, 2)?,
                    row.get(3)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rounds)
    }

    fn clear(&mut self) -> Result<()> {
        let tx = self.conn.transaction()?;
        tx.execute_batch("DROP TABLE IF EXISTS rounds")?;
        tx.execute_batch(CREATE_ROUNDS)?;
        tx.commit()?;
        info!("cleared round store");
        Ok(())
    }
}

fn sql_integer(column: &str, value: u64) -> Result<i64> {
    i64::try_from(value)
        .map_err(|_| LedgerError::InvalidInput(format!("{column} {value} is too large to store")))
}

/// Counts are stored as signed SQLite integers; a negative one is a corrupt row.
fn count_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let raw: i64 = row.get(idx)?;
    u64::try_from(raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Integer, Box::new(e)))
}
