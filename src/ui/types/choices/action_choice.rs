use crate::report::ExportFormat;
use crate::ui::types::choices::{FieldSpec, UIChoice};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_trials() -> u64 {
    20
}

/// A third of the sticks, and never less than one.
pub fn default_intersections_for(trials: u64) -> u64 {
    (trials / 3).max(1)
}

fn default_intersections() -> u64 {
    default_intersections_for(default_trials())
}

fn default_needles() -> u64 {
    100
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct AddRoundParams {
    #[serde(default = "default_trials")]
    #[schemars(
        title = "Total number of sticks",
        description = "Needles dropped in this round",
        range(min = 1)
    )]
    pub trials: u64,

    #[serde(default = "default_intersections")]
    #[schemars(
        title = "Number of intersections",
        description = "Needles that landed across a line (at most the total)",
        range(min = 1)
    )]
    pub intersections: u64,
}

impl Default for AddRoundParams {
    fn default() -> Self {
        Self {
            trials: default_trials(),
            intersections: default_intersections(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct DropNeedlesParams {
    #[serde(default = "default_needles")]
    #[schemars(
        title = "Needles to drop",
        description = "Simulated drops in this round",
        range(min = 1)
    )]
    pub needles: u64,

    #[serde(default = "default_true")]
    #[schemars(
        title = "Record round",
        description = "Append the simulated counts to the ledger?"
    )]
    pub record: bool,
}

impl Default for DropNeedlesParams {
    fn default() -> Self {
        Self {
            needles: default_needles(),
            record: default_true(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct HistoryParams {
    #[serde(default = "default_false")]
    #[schemars(
        title = "Show all rounds",
        description = "List every round newest first instead of the first and last few"
    )]
    pub full: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ExportParams {
    #[serde(default)]
    #[schemars(title = "Format", description = "File format for the round history")]
    pub format: ExportFormat,

    #[serde(default)]
    #[schemars(
        title = "Output path",
        description = "Destination file (leave blank for a timestamped name)"
    )]
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ClearAllParams {
    #[serde(default = "default_false")]
    #[schemars(
        title = "Are you sure you want to clear all data?",
        description = "Every recorded round is deleted permanently"
    )]
    pub confirm: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, EnumDiscriminants)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(ActionKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum ActionChoice {
    #[strum_discriminants(strum(
        message = "Next Round",
        detailed_message = "Record intersections out of needles dropped by hand."
    ))]
    AddRound(AddRoundParams),

    #[strum_discriminants(strum(
        message = "Drop Needles",
        detailed_message = "Simulate a round of random drops."
    ))]
    DropNeedles(DropNeedlesParams),

    #[strum_discriminants(strum(
        message = "Rounds History",
        detailed_message = "Running estimate and per-round figures."
    ))]
    ShowHistory(HistoryParams),

    #[strum_discriminants(strum(
        message = "Export History",
        detailed_message = "Write every round to CSV, TSV or JSON."
    ))]
    Export(ExportParams),

    #[strum_discriminants(strum(
        message = "Clear All Data",
        detailed_message = "Delete every round and start over."
    ))]
    ClearAll(ClearAllParams),

    #[strum_discriminants(strum(message = "Quit"))]
    Quit,
}

fn params_json<T: Serialize>(p: T) -> Value {
    serde_json::to_value(p).unwrap_or_default()
}

impl UIChoice for ActionChoice {
    type Kind = ActionKind;

    fn schema() -> Schema {
        schema_for!(ActionChoice)
    }

    fn prompt_label() -> &'static str {
        "What next?"
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            ActionKind::AddRound => params_json(AddRoundParams::default()),
            ActionKind::DropNeedles => params_json(DropNeedlesParams::default()),
            ActionKind::ShowHistory => params_json(HistoryParams::default()),
            ActionKind::Export => params_json(ExportParams::default()),
            ActionKind::ClearAll => params_json(ClearAllParams::default()),
            ActionKind::Quit => Value::Null,
        }
    }

    fn refine_field(kind: Self::Kind, spec: &mut FieldSpec, answered: &Map<String, Value>) {
        if kind != ActionKind::AddRound || spec.name != "intersections" {
            return;
        }
        if let Some(trials) = answered.get("trials").and_then(Value::as_u64) {
            spec.max = Some(trials as f64);
            spec.default = Some(Value::from(default_intersections_for(trials)));
        }
    }

    fn from_parts(kind: Self::Kind, params: Value) -> anyhow::Result<Self> {
        Ok(match kind {
            ActionKind::AddRound => ActionChoice::AddRound(serde_json::from_value(params)?),
            ActionKind::DropNeedles => ActionChoice::DropNeedles(serde_json::from_value(params)?),
            ActionKind::ShowHistory => ActionChoice::ShowHistory(serde_json::from_value(params)?),
            ActionKind::Export => ActionChoice::Export(serde_json::from_value(params)?),
            ActionKind::ClearAll => ActionChoice::ClearAll(serde_json::from_value(params)?),
            ActionKind::Quit => ActionChoice::Quit,
        })
    }
}
