mod export;
mod history;

pub use export::{ExportFormat, default_export_path, export_rounds};
pub use history::{HISTORY_HEADER, HistoryRow, Summary, history_rows};
