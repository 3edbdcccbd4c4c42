//! Compiled schema representation
//!
//! A [`SchemaDefinition`] wraps a draft-04 `jsonschema::Validator` with
//! `format` assertions enabled. Before compiling, the document is checked
//! for what this service requires beyond meta-schema validity:
//! - the root is an object declaring `type`, `$ref` or a combinator
//! - `$schema`, if present, names draft-04
//! - every `$ref` is local and points at a subschema
//! - no chain of `allOf`/`anyOf`/`oneOf`/`not`/`$ref` leads back to where
//!   it started, since such a cycle re-applies a schema to the same value
//!   without end

use std::collections::HashMap;
use std::fmt;

use jsonschema::{Draft, Validator};
use serde_json::{Map, Value};

/// Keywords of which the schema root must declare at least one.
const ROOT_KEYWORDS: [&str; 5] = ["type", "$ref", "allOf", "anyOf", "oneOf"];

/// Keywords whose subschemas apply to the value of the schema holding them.
const IN_PLACE_LISTS: [&str; 3] = ["allOf", "anyOf", "oneOf"];

/// Keywords holding a map of subschemas.
const SCHEMA_MAPS: [&str; 4] = ["properties", "patternProperties", "definitions", "dependencies"];

/// Keywords holding a single subschema.
const SCHEMA_SINGLES: [&str; 3] = ["additionalProperties", "additionalItems", "not"];

/// An immutable schema loaded under a logical name.
pub struct SchemaDefinition {
    name: String,
    validator: Validator,
}

impl fmt::Debug for SchemaDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaDefinition")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

impl SchemaDefinition {
    /// Checks and compiles a schema document.
    ///
    /// Returns a human-readable reason when the document is not a
    /// well-formed schema; the loader wraps it into a `SchemaMalformed`.
    pub fn from_value(name: impl Into<String>, value: &Value) -> Result<Self, String> {
        let root_obj = value
            .as_object()
            .ok_or_else(|| "schema root must be a JSON object".to_string())?;

        if let Some(dialect) = root_obj.get("$schema") {
            let dialect = dialect
                .as_str()
                .ok_or_else(|| "#: keyword '$schema' must be a string".to_string())?;
            if !dialect.contains("draft-04") {
                return Err(format!("#: unsupported schema dialect '{}'", dialect));
            }
        }

        if !ROOT_KEYWORDS.iter().any(|k| root_obj.contains_key(*k)) {
            return Err(
                "#: schema root must declare one of 'type', '$ref', 'allOf', 'anyOf', 'oneOf'"
                    .to_string(),
            );
        }

        check_in_place_cycles(value)?;

        let validator = jsonschema::options()
            .with_draft(Draft::Draft4)
            .should_validate_formats(true)
            .build(value)
            .map_err(|e| format!("invalid schema: {}", e))?;

        Ok(Self {
            name: name.into(),
            validator,
        })
    }

    /// Logical name the schema was loaded under
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn validator(&self) -> &Validator {
        &self.validator
    }
}

fn pointer_label(pointer: &str) -> String {
    format!("#{}", pointer)
}

/// Appends one segment to a JSON pointer, escaping `~` and `/`.
fn child_pointer(parent: &str, segment: &str) -> String {
    format!("{}/{}", parent, segment.replace('~', "~0").replace('/', "~1"))
}

/// Records the pointer of every subschema under `pointer`, itself included.
fn collect_subschemas(schema: &Value, pointer: String, out: &mut Vec<String>) {
    let Some(obj) = schema.as_object() else {
        return;
    };
    out.push(pointer.clone());

    for keyword in SCHEMA_MAPS {
        if let Some(Value::Object(map)) = obj.get(keyword) {
            let base = child_pointer(&pointer, keyword);
            for (key, sub) in map {
                collect_subschemas(sub, child_pointer(&base, key), out);
            }
        }
    }
    for keyword in SCHEMA_SINGLES {
        if let Some(sub) = obj.get(keyword) {
            collect_subschemas(sub, child_pointer(&pointer, keyword), out);
        }
    }
    for keyword in IN_PLACE_LISTS.iter().copied().chain(["items"]) {
        match obj.get(keyword) {
            Some(Value::Array(subs)) => {
                let base = child_pointer(&pointer, keyword);
                for (i, sub) in subs.iter().enumerate() {
                    collect_subschemas(sub, child_pointer(&base, &i.to_string()), out);
                }
            }
            Some(sub) if keyword == "items" => {
                collect_subschemas(sub, child_pointer(&pointer, keyword), out);
            }
            _ => {}
        }
    }
}

/// Subschemas applied to the same value as the schema at `pointer`.
fn in_place_targets(
    obj: &Map<String, Value>,
    pointer: &str,
    known: &HashMap<&str, Vec<String>>,
) -> Result<Vec<String>, String> {
    // A draft-04 `$ref` replaces every sibling keyword.
    if let Some(reference) = obj.get("$ref") {
        let reference = reference
            .as_str()
            .ok_or_else(|| format!("{}: '$ref' must be a string", pointer_label(pointer)))?;
        let target = reference.strip_prefix('#').ok_or_else(|| {
            format!(
                "{}: only local references are supported, found '{}'",
                pointer_label(pointer),
                reference
            )
        })?;
        if !known.contains_key(target) {
            return Err(format!(
                "{}: '$ref' {} does not point at a subschema",
                pointer_label(pointer),
                reference
            ));
        }
        return Ok(vec![target.to_string()]);
    }

    let mut targets = Vec::new();
    for keyword in IN_PLACE_LISTS {
        if let Some(Value::Array(subs)) = obj.get(keyword) {
            let base = child_pointer(pointer, keyword);
            targets.extend((0..subs.len()).map(|i| child_pointer(&base, &i.to_string())));
        }
    }
    if obj.get("not").is_some_and(Value::is_object) {
        targets.push(child_pointer(pointer, "not"));
    }
    Ok(targets)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Visit {
    Active,
    Done,
}

/// Rejects a schema in which following in-place applicators and
/// references returns to a subschema already being applied.
fn check_in_place_cycles(root: &Value) -> Result<(), String> {
    let mut pointers = Vec::new();
    collect_subschemas(root, String::new(), &mut pointers);

    let mut edges: HashMap<&str, Vec<String>> =
        pointers.iter().map(|p| (p.as_str(), Vec::new())).collect();
    for pointer in &pointers {
        let Some(Value::Object(obj)) = root.pointer(pointer) else {
            continue;
        };
        let targets = in_place_targets(obj, pointer, &edges)?;
        edges.insert(pointer.as_str(), targets);
    }

    let mut visits: HashMap<&str, Visit> = HashMap::new();
    for pointer in &pointers {
        visit(pointer, &edges, &mut visits)?;
    }
    Ok(())
}

fn visit<'a>(
    pointer: &'a str,
    edges: &'a HashMap<&'a str, Vec<String>>,
    visits: &mut HashMap<&'a str, Visit>,
) -> Result<(), String> {
    match visits.get(pointer) {
        Some(Visit::Done) => return Ok(()),
        Some(Visit::Active) => {
            return Err(format!(
                "{}: subschema is re-applied to the same value through a cycle",
                pointer_label(pointer)
            ))
        }
        None => {}
    }

    visits.insert(pointer, Visit::Active);
    for next in edges.get(pointer).into_iter().flatten() {
        visit(next, edges, visits)?;
    }
    visits.insert(pointer, Visit::Done);
    Ok(())
}
