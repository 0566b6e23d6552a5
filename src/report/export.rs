use std::fs::File;
use std::io::{BufWriter, Error, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString, IntoStaticStr};

use crate::core::{Round, is_undefined};
use crate::report::HistoryRow;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        self.into()
    }
}

/// Writes one row per round, oldest first.
pub fn export_rounds<P: AsRef<Path>>(
    rounds: &[Round],
    path: P,
    fmt: ExportFormat,
) -> Result<(), Error> {
    let mut w = BufWriter::new(File::create(path)?);
    match fmt {
        ExportFormat::Csv => write_delimited(&mut w, rounds, ',')?,
        ExportFormat::Tsv => write_delimited(&mut w, rounds, '\t')?,
        ExportFormat::Json => write_json(&mut w, rounds)?,
    }
    w.flush()
}

/// `buffon_rounds_<timestamp>.<ext>` inside `dir`.
pub fn default_export_path(dir: &Path, fmt: ExportFormat, now: DateTime<Local>) -> PathBuf {
    dir.join(format!(
        "buffon_rounds_{}.{}",
        now.format("%Y%m%d_%H%M%S"),
        fmt.extension()
    ))
}

fn write_delimited<W: Write>(w: &mut W, rounds: &[Round], delimiter: char) -> Result<(), Error> {
    writeln!(
        w,
        "round_number{d}intersections{d}trials{d}round_estimate{d}cumulative_estimate{d}difference_from_pi",
        d = delimiter
    )?;
    for row in rounds.iter().map(HistoryRow::from) {
        writeln!(
            w,
            "{}{d}{}{d}{}{d}{:.12}{d}{:.12}{d}{:.6}",
            row.round_number,
            row.intersections,
            row.trials,
            row.round_estimate,
            row.cumulative_estimate,
            row.difference_from_pi,
            d = delimiter
        )?;
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonRow {
    round_number: u64,
    intersections: u64,
    trials: u64,
    round_estimate: Option<f64>,
    cumulative_estimate: Option<f64>,
    difference_from_pi: Option<f64>,
}

fn defined(v: f64) -> Option<f64> {
    if is_undefined(v) { None } else { Some(v) }
}

impl From<HistoryRow> for JsonRow {
    fn from(row: HistoryRow) -> Self {
        Self {
            round_number: row.round_number,
            intersections: row.intersections,
            trials: row.trials,
            round_estimate: defined(row.round_estimate),
            cumulative_estimate: defined(row.cumulative_estimate),
            difference_from_pi: defined(row.difference_from_pi),
        }
    }
}

fn write_json<W: Write>(w: &mut W, rounds: &[Round]) -> Result<(), Error> {
    writeln!(w, "[")?;
    for (i, r) in rounds.iter().enumerate() {
        let line = serde_json::to_string(&JsonRow::from(HistoryRow::from(r)))?;
        let sep = if i + 1 == rounds.len() { "" } else { "," };
        writeln!(w, "  {line}{sep}")?;
    }
    writeln!(w, "]")?;
    Ok(())
}
