use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::path::Path;
use strum::{EnumMessage, IntoEnumIterator};

use crate::ui::cli::drivers::PromptDriver;
use crate::ui::types::choices::{FieldKind, FieldSpec, UIChoice, specs_for_kind};

const DIM_ITALIC: &str = "\x1b[2m\x1b[3m";
const RESET: &str = "\x1b[0m";

fn kind_text<K>(k: K) -> String
where
    K: Copy + Into<&'static str> + EnumMessage,
{
    let label = k.get_message().unwrap_or_else(|| k.into());
    match k.get_detailed_message() {
        Some(desc) if !desc.is_empty() && desc != label => {
            format!("{label}  {DIM_ITALIC}{desc}{RESET}")
        }
        _ => label.to_string(),
    }
}

/// Asks which variant of `C` to build, then one question per field of its
/// params, and assembles the typed value.
pub fn prompt_choice<C: UIChoice, D: PromptDriver>(driver: &D) -> Result<C> {
    let kinds: Vec<C::Kind> = C::Kind::iter().collect();
    let items: Vec<String> = kinds.iter().map(|k| kind_text(*k)).collect();

    let help = C::prompt_help().unwrap_or("");
    let selected = driver.ask_select(C::prompt_label(), help, &items, 0)?;
    let choice_kind = *kinds.get(selected).context("selection out of range")?;

    let key: &'static str = choice_kind.into();
    let schema = C::schema();
    let specs = specs_for_kind(&schema, key)?;

    let defaults = C::default_params(choice_kind);

    let mut params = Map::new();
    for mut s in specs {
        C::refine_field(choice_kind, &mut s, &params);
        if let Some(val) = prompt_field(driver, &s, &defaults)? {
            params.insert(s.name.clone(), val);
        }
    }

    C::from_parts(choice_kind, Value::Object(params))
}

/// `None` when an optional field is left blank.
fn prompt_field<D: PromptDriver>(
    driver: &D,
    s: &FieldSpec,
    defaults: &Value,
) -> Result<Option<Value>> {
    let init = s
        .default
        .clone()
        .filter(|v| !v.is_null())
        .or_else(|| defaults.get(&s.name).cloned().filter(|v| !v.is_null()));
    let help = s.description.as_deref().unwrap_or("");

    let val = match s.kind {
        FieldKind::Boolean => {
            let def = init.and_then(|v| v.as_bool()).unwrap_or(false);
            Value::Bool(driver.ask_bool(&s.title, help, def)?)
        }
        FieldKind::Integer => {
            let def = init.and_then(|v| v.as_u64()).unwrap_or(0);
            Value::from(driver.ask_u64(
                &s.title,
                help,
                def,
                s.min.map(|x| x as u64),
                s.max.map(|x| x as u64),
            )?)
        }
        FieldKind::Choice => {
            let def = init
                .as_ref()
                .and_then(|v| v.as_str())
                .and_then(|d| s.options.iter().position(|o| o == d))
                .unwrap_or(0);
            let picked = driver.ask_select(&s.title, help, &s.options, def)?;
            let option = s
                .options
                .get(picked)
                .with_context(|| format!("no option {picked} for {}", s.title))?;
            Value::String(option.clone())
        }
        FieldKind::String => {
            let def = init
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();

            let answered = if s.name == "path" {
                prompt_path_until_ok(driver, &s.title, help, &def)?
            } else {
                driver.ask_string(&s.title, help, &def)?
            };

            let answered = answered.trim();
            if answered.is_empty() && !s.required {
                return Ok(None);
            }
            Value::String(answered.to_string())
        }
    };
    Ok(Some(val))
}

/// Blank is accepted and means "use the default location".
fn validate_output_path(input: &str) -> Result<(), String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(());
    }
    let p = Path::new(trimmed);

    if p.is_dir() {
        return Err("Expected a file path, not a directory".into());
    }
    match p.parent() {
        Some(dir) if !dir.as_os_str().is_empty() && !dir.is_dir() => {
            Err(format!("Directory does not exist: {}", dir.display()))
        }
        _ => Ok(()),
    }
}

fn prompt_path_until_ok<D: PromptDriver>(
    driver: &D,
    title: &str,
    help: &str,
    default: &str,
) -> Result<String> {
    loop {
        let answer = driver.ask_string(title, help, default)?;
        match validate_output_path(&answer) {
            Ok(()) => return Ok(answer),
            Err(msg) => {
                eprintln!("✗ {}", msg);
            }
        }
    }
}
