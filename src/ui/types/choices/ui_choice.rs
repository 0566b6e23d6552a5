use anyhow::Result;
use schemars::{JsonSchema, Schema};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::types::choices::FieldSpec;

/// Contract for any “choice enum” the wizard can prompt for.
pub trait UIChoice: Sized + Serialize + DeserializeOwned + JsonSchema {
    type Kind: Copy + Into<&'static str> + EnumMessage + IntoEnumIterator;

    /// JSON Schema for the whole tagged enum.
    fn schema() -> Schema;

    fn prompt_label() -> &'static str {
        "Choose a type:"
    }
    fn prompt_help() -> Option<&'static str> {
        Some("↑/↓ to navigate, ↵ to select")
    }

    /// Default `params` JSON for a given kind (usually from `*Params::default()`).
    fn default_params(kind: Self::Kind) -> Value;

    /// Adjusts a field's bounds or default from the fields answered before it.
    fn refine_field(_kind: Self::Kind, _spec: &mut FieldSpec, _answered: &Map<String, Value>) {}

    /// Build the typed enum from kind + params.
    fn from_parts(kind: Self::Kind, params: Value) -> Result<Self>;
}
