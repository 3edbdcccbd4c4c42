//! Document validation against a compiled schema
//!
//! Validation semantics:
//! - Every failing keyword the validator reports is a leaf violation at
//!   the location of the offending value
//! - Leaves are grouped into a tree that mirrors the document: each object
//!   or array with failures beneath it becomes a composite
//! - The reported list is the flattened leaves of that tree
//!
//! Validation never fails: an invalid document yields errors, not `Err`.

use serde_json::Value;

use super::types::SchemaDefinition;
use super::violation::{ValidationError, Violation};

/// Validates a document, returning one entry per leaf violation. The result
/// is empty if and only if the document satisfies the schema.
pub fn validate(schema: &SchemaDefinition, document: &Value) -> Vec<ValidationError> {
    evaluate(schema, document)
        .map(Violation::flatten)
        .unwrap_or_default()
}

/// Validates a document, returning the unflattened violation tree.
pub fn evaluate(schema: &SchemaDefinition, document: &Value) -> Option<Violation> {
    let leaves: Vec<Located> = schema
        .validator()
        .iter_errors(document)
        .map(|error| Located::new(error.instance_path.to_string(), error.to_string()))
        .collect();
    group("", 0, leaves)
}

/// A leaf violation with its pointer split into segments.
struct Located {
    segments: Vec<String>,
    pointer: String,
    message: String,
}

impl Located {
    fn new(pointer: String, message: String) -> Self {
        let segments = pointer
            .split('/')
            .skip(1)
            .map(str::to_string)
            .collect();
        Self {
            segments,
            pointer,
            message,
        }
    }
}

enum Slot {
    Leaf(Violation),
    Child(String, Vec<Located>),
}

/// Builds the subtree for the location at `depth` segments below the root,
/// keeping siblings in the order they were first reported.
fn group(pointer: &str, depth: usize, leaves: Vec<Located>) -> Option<Violation> {
    let mut slots: Vec<Slot> = Vec::new();

    for leaf in leaves {
        let Some(segment) = leaf.segments.get(depth).cloned() else {
            slots.push(Slot::Leaf(Violation::leaf(leaf.pointer, leaf.message)));
            continue;
        };
        let existing = slots.iter_mut().find_map(|slot| match slot {
            Slot::Child(name, members) if *name == segment => Some(members),
            _ => None,
        });
        match existing {
            Some(members) => members.push(leaf),
            None => slots.push(Slot::Child(segment, vec![leaf])),
        }
    }

    let causes = slots
        .into_iter()
        .filter_map(|slot| match slot {
            Slot::Leaf(violation) => Some(violation),
            Slot::Child(segment, members) => {
                group(&format!("{}/{}", pointer, segment), depth + 1, members)
            }
        })
        .collect();
    Violation::collect(pointer, causes)
}
