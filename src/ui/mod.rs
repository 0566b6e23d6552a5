pub mod cli;
pub mod session;
pub mod types;
