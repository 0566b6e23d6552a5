mod simulation_ledger;

pub use simulation_ledger::{HeadTail, SimulationLedger, Totals};
