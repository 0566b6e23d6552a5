mod memory_round_store;
mod round_store;
mod sqlite_round_store;

pub use memory_round_store::MemoryRoundStore;
pub use round_store::RoundStore;
pub use sqlite_round_store::{DEFAULT_DB_PATH, SqliteRoundStore};
