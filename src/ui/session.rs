//! Interactive loop over one ledger: prompt for an action, apply it, repeat.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Local;
use log::{info, warn};

use crate::config::SessionConfig;
use crate::core::Round;
use crate::error::LedgerError;
use crate::ledger::SimulationLedger;
use crate::report::{
    HISTORY_HEADER, HistoryRow, Summary, default_export_path, export_rounds, history_rows,
};
use crate::sim::NeedleDropper;
use crate::store::RoundStore;
use crate::ui::cli::drivers::PromptDriver;
use crate::ui::cli::wizard::prompt_choice;
use crate::ui::types::choices::{ActionChoice, ExportParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct Session<S: RoundStore, D: PromptDriver, W: Write> {
    ledger: SimulationLedger<S>,
    driver: D,
    out: W,
    config: SessionConfig,
    dropper: NeedleDropper,
}

impl<S: RoundStore, D: PromptDriver, W: Write> Session<S, D, W> {
    pub fn new(ledger: SimulationLedger<S>, driver: D, out: W, config: SessionConfig) -> Self {
        let seed = config.seed.unwrap_or_else(rand::random);
        info!("needle dropper seed {seed}");
        Self {
            ledger,
            driver,
            out,
            config,
            dropper: NeedleDropper::with_seed(seed),
        }
    }

    pub fn ledger(&self) -> &SimulationLedger<S> {
        &self.ledger
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Prompts until the user quits or an unrecoverable error occurs.
    pub fn run(&mut self) -> Result<()> {
        self.write_summary()?;
        loop {
            let action = prompt_choice::<ActionChoice, _>(&self.driver)?;
            if self.apply(action)? == Flow::Quit {
                return Ok(());
            }
        }
    }

    pub fn apply(&mut self, action: ActionChoice) -> Result<Flow> {
        match action {
            ActionChoice::AddRound(p) => self.record(p.intersections, p.trials)?,
            ActionChoice::DropNeedles(p) => {
                let outcome = self.dropper.drop_round(p.needles)?;
                writeln!(
                    self.out,
                    "Dropped {} needles, {} crossed a line.",
                    outcome.trials, outcome.intersections
                )?;
                if p.record {
                    self.record(outcome.intersections, outcome.trials)?;
                }
            }
            ActionChoice::ShowHistory(p) => self.write_history(p.full)?,
            ActionChoice::Export(p) => self.export(p)?,
            ActionChoice::ClearAll(p) => {
                if p.confirm {
                    self.ledger.clear_all().context("clearing rounds")?;
                    writeln!(self.out, "All rounds cleared.")?;
                } else {
                    writeln!(self.out, "Nothing cleared.")?;
                }
            }
            ActionChoice::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Bad counts are reported and skipped; storage failures end the session.
    fn record(&mut self, intersections: u64, trials: u64) -> Result<()> {
        let latest = match self.ledger.add_round(intersections, trials) {
            Ok(view) => view.last().copied(),
            Err(LedgerError::InvalidInput(msg)) => {
                warn!("round rejected: {msg}");
                writeln!(self.out, "✗ {msg}")?;
                return Ok(());
            }
            Err(e) => return Err(e).context("recording round"),
        };

        if let Some(r) = latest {
            writeln!(
                self.out,
                "Round {}: π ≈ {:.6} (this round {:.6})",
                r.round_number(),
                r.cumulative_estimate(),
                r.round_estimate()
            )?;
        }
        Ok(())
    }

    fn write_summary(&mut self) -> Result<()> {
        let summary = Summary::new(self.ledger.len(), self.ledger.totals());
        writeln!(self.out, "{summary}")?;
        Ok(())
    }

    fn write_rows(&mut self, rows: &[HistoryRow]) -> Result<()> {
        for row in rows {
            writeln!(self.out, "{row}")?;
        }
        Ok(())
    }

    fn write_history(&mut self, full: bool) -> Result<()> {
        self.write_summary()?;
        if self.ledger.is_empty() {
            return Ok(());
        }
        writeln!(self.out, "{HISTORY_HEADER}")?;

        if full {
            let rows = history_rows(&self.ledger.all_rounds_reverse_chronological());
            return self.write_rows(&rows);
        }

        let window = self.ledger.head_and_tail(self.config.history_window);
        let head = history_rows(window.head);
        let tail = history_rows(window.tail);
        let gap = match (window.head.last(), window.tail.first()) {
            (Some(h), Some(t)) => t.round_number() > h.round_number() + 1,
            _ => false,
        };

        self.write_rows(&head)?;
        if gap {
            writeln!(self.out, "...")?;
        }
        self.write_rows(&tail)
    }

    fn export(&mut self, p: ExportParams) -> Result<()> {
        let path = p
            .path
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| default_export_path(&self.config.export_dir, p.format, Local::now()));

        let rounds: &[Round] = self.ledger.all_rounds_chronological();
        export_rounds(rounds, &path, p.format)
            .with_context(|| format!("exporting to {}", path.display()))?;

        info!("exported {} rounds to {}", rounds.len(), path.display());
        writeln!(
            self.out,
            "Exported {} rounds to {}",
            rounds.len(),
            path.display()
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::ExportFormat;
    use crate::store::MemoryRoundStore;
    use crate::testing::{Answer, FlakyStore, ScriptedDriver};
    use crate::ui::types::choices::{
        ActionKind, AddRoundParams, ClearAllParams, DropNeedlesParams, HistoryParams,
    };
    use strum::IntoEnumIterator;
    use tempfile::TempDir;

    fn pick(kind: ActionKind) -> Answer {
        Answer::Select(ActionKind::iter().position(|k| k == kind).unwrap())
    }

    fn config() -> SessionConfig {
        SessionConfig {
            history_window: 2,
            seed: Some(17),
            ..SessionConfig::default()
        }
    }

    fn session(
        driver: ScriptedDriver,
    ) -> Session<MemoryRoundStore, ScriptedDriver, Vec<u8>> {
        let ledger = SimulationLedger::open(MemoryRoundStore::new()).unwrap();
        Session::new(ledger, driver, Vec::new(), config())
    }

    fn add(trials: u64, intersections: u64) -> ActionChoice {
        ActionChoice::AddRound(AddRoundParams {
            trials,
            intersections,
        })
    }

    fn text(s: Session<MemoryRoundStore, ScriptedDriver, Vec<u8>>) -> String {
        String::from_utf8(s.into_output()).unwrap()
    }

    #[test]
    fn scripted_run_adds_rounds_and_quits() {
        let driver = ScriptedDriver::new()
            .with("What next?", pick(ActionKind::AddRound))
            .with("Total number of sticks", Answer::U64(20))
            .with("Number of intersections", Answer::U64(5))
            .with("What next?", pick(ActionKind::AddRound))
            .with("Total number of sticks", Answer::U64(40))
            .with("Number of intersections", Answer::U64(10))
            .with("What next?", pick(ActionKind::Quit));

        let mut s = session(driver);
        s.run().unwrap();

        assert_eq!(s.ledger().len(), 2);
        let out = text(s);
        assert!(out.starts_with("no rounds recorded\n"));
        assert!(out.contains("Round 1: π ≈ 4.000000 (this round 4.000000)"));
        assert!(out.contains("Round 2: π ≈ 4.000000 (this round 4.000000)"));
    }

    #[test]
    fn run_stops_with_error_when_prompts_run_out() {
        let driver = ScriptedDriver::new().with("What next?", pick(ActionKind::AddRound));
        let mut s = session(driver);
        assert!(s.run().is_err());
        assert!(s.ledger().is_empty());
    }

    #[test]
    fn rejected_counts_are_reported_and_skipped() {
        let mut s = session(ScriptedDriver::new());
        assert_eq!(s.apply(add(10, 11)).unwrap(), Flow::Continue);
        assert!(s.ledger().is_empty());
        assert!(text(s).contains("✗ intersections (11) cannot exceed trials (10)"));
    }

    #[test]
    fn storage_failure_ends_the_session() {
        let ledger = SimulationLedger::open(FlakyStore::default()).unwrap();
        ledger.store().fail_appends(true);
        let mut s = Session::new(ledger, ScriptedDriver::new(), Vec::new(), config());

        let err = s.apply(add(20, 5)).unwrap_err();
        assert!(format!("{err:#}").contains("recording round"));
    }

    #[test]
    fn clear_needs_confirmation() {
        let mut s = session(ScriptedDriver::new());
        s.apply(add(20, 5)).unwrap();

        s.apply(ActionChoice::ClearAll(ClearAllParams { confirm: false }))
            .unwrap();
        assert_eq!(s.ledger().len(), 1);

        s.apply(ActionChoice::ClearAll(ClearAllParams { confirm: true }))
            .unwrap();
        assert!(s.ledger().is_empty());

        s.apply(add(9, 3)).unwrap();
        assert_eq!(s.ledger().latest().unwrap().round_number(), 1);

        let out = text(s);
        assert!(out.contains("Nothing cleared."));
        assert!(out.contains("All rounds cleared."));
    }

    #[test]
    fn dropped_needles_can_be_recorded_or_not() {
        let mut s = session(ScriptedDriver::new());
        s.apply(ActionChoice::DropNeedles(DropNeedlesParams {
            needles: 500,
            record: false,
        }))
        .unwrap();
        assert!(s.ledger().is_empty());

        s.apply(ActionChoice::DropNeedles(DropNeedlesParams {
            needles: 500,
            record: true,
        }))
        .unwrap();
        assert_eq!(s.ledger().len(), 1);
        assert_eq!(s.ledger().latest().unwrap().trial_count(), 500);
        assert!(text(s).contains("Dropped 500 needles"));
    }

    #[test]
    fn compact_history_marks_the_gap() {
        let mut s = session(ScriptedDriver::new());
        for i in 1..=5 {
            s.apply(add(3 * i, i)).unwrap();
        }
        s.apply(ActionChoice::ShowHistory(HistoryParams { full: false }))
            .unwrap();

        let out = text(s);
        let lines: Vec<&str> = out.lines().collect();
        let header = lines.iter().position(|l| *l == HISTORY_HEADER).unwrap();
        let body: Vec<&str> = lines[header + 1..]
            .iter()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(body, vec!["1", "2", "...", "4", "5"]);
    }

    #[test]
    fn full_history_is_newest_first() {
        let mut s = session(ScriptedDriver::new());
        for i in 1..=3 {
            s.apply(add(3 * i, i)).unwrap();
        }
        s.apply(ActionChoice::ShowHistory(HistoryParams { full: true }))
            .unwrap();

        let out = text(s);
        let lines: Vec<&str> = out.lines().collect();
        let header = lines.iter().position(|l| *l == HISTORY_HEADER).unwrap();
        let firsts: Vec<&str> = lines[header + 1..]
            .iter()
            .map(|l| l.split_whitespace().next().unwrap())
            .collect();
        assert_eq!(firsts, vec!["3", "2", "1"]);
        assert!(lines[header - 1].starts_with("rounds=3, hits=6, drops=18"));
    }

    #[test]
    fn export_writes_to_default_location() {
        let dir = TempDir::new().unwrap();
        let ledger = SimulationLedger::open(MemoryRoundStore::new()).unwrap();
        let cfg = SessionConfig {
            export_dir: dir.path().to_path_buf(),
            ..config()
        };
        let mut s = Session::new(ledger, ScriptedDriver::new(), Vec::new(), cfg);
        s.apply(add(20, 5)).unwrap();
        s.apply(ActionChoice::Export(ExportParams {
            format: ExportFormat::Tsv,
            path: None,
        }))
        .unwrap();

        let files: Vec<PathBuf> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().path())
            .collect();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].extension().and_then(|e| e.to_str()), Some("tsv"));
        let body = std::fs::read_to_string(&files[0]).unwrap();
        assert_eq!(body.lines().count(), 2);
    }

    #[test]
    fn export_to_explicit_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rounds.json");
        let mut s = session(ScriptedDriver::new());
        s.apply(add(20, 5)).unwrap();
        s.apply(ActionChoice::Export(ExportParams {
            format: ExportFormat::Json,
            path: Some(path.to_string_lossy().into_owned()),
        }))
        .unwrap();
        assert!(path.is_file());
        assert!(text(s).contains("Exported 1 rounds to"));
    }
}
