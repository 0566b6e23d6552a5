use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};

use anyhow::{Result, anyhow, bail};

use crate::ui::cli::drivers::PromptDriver;

#[derive(Debug, Clone, PartialEq)]
pub enum Answer {
    Bool(bool),
    Str(String),
    U64(u64),
    Select(usize),
}

/// Prompt driver that replays canned answers keyed by prompt title.
///
/// Answers for the same title are consumed in the order they were added. An
/// unscripted prompt is an error, which ends a session loop under test.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    answers: RefCell<HashMap<String, VecDeque<Answer>>>,
    u64_prompts: RefCell<HashMap<String, (u64, Option<u64>, Option<u64>)>>,
}

impl ScriptedDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(self, title: &str, answer: Answer) -> Self {
        self.answers
            .borrow_mut()
            .entry(title.to_string())
            .or_default()
            .push_back(answer);
        self
    }

    pub fn is_drained(&self) -> bool {
        self.answers.borrow().values().all(VecDeque::is_empty)
    }

    /// Default and bounds offered by the last integer prompt with this title.
    pub fn asked_u64(&self, title: &str) -> Option<(u64, Option<u64>, Option<u64>)> {
        self.u64_prompts.borrow().get(title).copied()
    }

    fn next(&self, title: &str) -> Result<Answer> {
        self.answers
            .borrow_mut()
            .get_mut(title)
            .and_then(VecDeque::pop_front)
            .ok_or_else(|| anyhow!("no scripted answer for '{title}'"))
    }
}

impl PromptDriver for ScriptedDriver {
    fn ask_bool(&self, title: &str, _help: &str, _default: bool) -> Result<bool> {
        match self.next(title)? {
            Answer::Bool(b) => Ok(b),
            other => bail!("'{title}' expects a bool, scripted {other:?}"),
        }
    }

    fn ask_string(&self, title: &str, _help: &str, _default: &str) -> Result<String> {
        match self.next(title)? {
            Answer::Str(s) => Ok(s),
            other => bail!("'{title}' expects a string, scripted {other:?}"),
        }
    }

    fn ask_u64(
        &self,
        title: &str,
        _help: &str,
        default: u64,
        min: Option<u64>,
        max: Option<u64>,
    ) -> Result<u64> {
        self.u64_prompts
            .borrow_mut()
            .insert(title.to_string(), (default, min, max));
        match self.next(title)? {
            Answer::U64(n) => Ok(n),
            other => bail!("'{title}' expects an integer, scripted {other:?}"),
        }
    }

    fn ask_select(
        &self,
        title: &str,
        _help: &str,
        options: &[String],
        _default: usize,
    ) -> Result<usize> {
        match self.next(title)? {
            Answer::Select(i) if i < options.len() => Ok(i),
            other => bail!("'{title}' has {} options, scripted {other:?}", options.len()),
        }
    }
}
