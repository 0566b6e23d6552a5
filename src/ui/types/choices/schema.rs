use anyhow::{Context, Result, anyhow, bail};
use schemars::Schema;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Integer,
    Boolean,
    /// String restricted to `FieldSpec::options`.
    Choice,
}

#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub name: String,
    pub title: String,
    pub description: Option<String>,
    pub required: bool,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub options: Vec<String>,
}

/// Prompts needed to fill the `params` of the variant tagged `kind_key`, in
/// declaration order. A variant without params yields no fields.
pub fn specs_for_kind(root: &Schema, kind_key: &str) -> Result<Vec<FieldSpec>> {
    let root_obj = root.as_object().context("root schema is not an object")?;

    let alts = root_obj
        .get("oneOf")
        .or_else(|| root_obj.get("anyOf"))
        .and_then(|v| v.as_array())
        .context("missing oneOf/anyOf")?;

    for branch in alts {
        let bobj = branch.as_object().context("branch is not object")?;
        let Some(props) = bobj.get("properties").and_then(|v| v.as_object()) else {
            continue;
        };

        if !discriminant_matches(props, kind_key) {
            continue;
        }

        let Some(params_obj) = props
            .get("params")
            .and_then(|v| v.as_object())
            .and_then(|o| resolve_ref_obj(root_obj, o))
        else {
            return Ok(vec![]);
        };

        let Some(params_props) = params_obj.get("properties").and_then(|v| v.as_object()) else {
            return Ok(vec![]);
        };

        let required: Vec<String> = params_obj
            .get("required")
            .and_then(|v| v.as_array())
            .map(|a| {
                a.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default();

        let mut out = Vec::new();
        for (name, field_schema) in params_props {
            let prop = field_schema
                .as_object()
                .context("field schema not object")?;

            // title/description/default may sit next to the $ref
            let target = resolve_ref_obj(root_obj, prop)
                .ok_or_else(|| anyhow!("failed to resolve field $ref for '{name}'"))?;
            let lookup = |key: &str| prop.get(key).or_else(|| target.get(key));

            let title = lookup("title")
                .and_then(|v| v.as_str())
                .unwrap_or(name)
                .to_string();

            let description = lookup("description")
                .and_then(|v| v.as_str())
                .map(str::to_string);

            let default = lookup("default").cloned();

            let options = enum_options(target);
            let kind = if options.is_empty() {
                match detect_field_kind(target.get("type")) {
                    Some(k) => k,
                    None => continue,
                }
            } else {
                FieldKind::Choice
            };

            let min = target
                .get("minimum")
                .or_else(|| target.get("exclusiveMinimum"))
                .and_then(|v| v.as_f64());

            let max = target
                .get("maximum")
                .or_else(|| target.get("exclusiveMaximum"))
                .and_then(|v| v.as_f64());

            out.push(FieldSpec {
                name: name.clone(),
                title,
                description,
                required: required.iter().any(|r| r == name),
                kind,
                default,
                min,
                max,
                options,
            });
        }

        return Ok(out);
    }

    bail!("no branch found for type={kind_key}");
}

fn discriminant_matches(props: &Map<String, Value>, kind_key: &str) -> bool {
    let Some(tobj) = props.get("type").and_then(|v| v.as_object()) else {
        return false;
    };

    if tobj.get("const").and_then(|v| v.as_str()) == Some(kind_key) {
        return true;
    }
    if let Some(arr) = tobj.get("enum").and_then(|v| v.as_array()) {
        if arr.len() == 1 && arr[0].as_str() == Some(kind_key) {
            return true;
        }
    }
    false
}

/// Resolve a local $ref like "#/$defs/ExportFormat" against the root object.
/// Returns the object itself when it carries no $ref.
fn resolve_ref_obj<'a>(
    root_obj: &'a Map<String, Value>,
    obj: &'a Map<String, Value>,
) -> Option<&'a Map<String, Value>> {
    match obj.get("$ref") {
        Some(Value::String(r)) => {
            let path = r.strip_prefix("#/")?;
            let mut cur: &Map<String, Value> = root_obj;
            for raw_seg in path.split('/') {
                // JSON Pointer unescape (~1 => /, ~0 => ~)
                let seg = raw_seg.replace("~1", "/").replace("~0", "~");
                cur = cur.get(&seg)?.as_object()?;
            }
            Some(cur)
        }
        _ => Some(obj),
    }
}

fn enum_options(obj: &Map<String, Value>) -> Vec<String> {
    obj.get("enum")
        .and_then(|v| v.as_array())
        .map(|a| {
            a.iter()
                .filter_map(|v| v.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

fn kind_from_name(s: &str) -> Option<FieldKind> {
    match s {
        "string" => Some(FieldKind::String),
        "integer" => Some(FieldKind::Integer),
        "boolean" => Some(FieldKind::Boolean),
        _ => None,
    }
}

fn detect_field_kind(ty: Option<&Value>) -> Option<FieldKind> {
    match ty {
        Some(Value::String(s)) => kind_from_name(s),
        // unions like ["null","integer"] for Option<T>
        Some(Value::Array(arr)) => arr.iter().filter_map(|v| v.as_str()).find_map(kind_from_name),
        _ => None,
    }
}
