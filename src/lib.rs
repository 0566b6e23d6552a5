pub mod config;
pub mod core;
pub mod error;
pub mod ledger;
pub mod report;
pub mod sim;
pub mod store;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;
