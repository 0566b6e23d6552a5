pub mod flaky_store;
pub mod scripted_driver;

pub use flaky_store::FlakyStore;
pub use scripted_driver::{Answer, ScriptedDriver};
