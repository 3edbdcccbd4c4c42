//! Violation tree and its flattening into reportable errors
//!
//! A violation discovered at a composite location (an object missing two
//! required keys, an array with several bad items) carries the violations
//! that caused it. Only leaves are ever reported: a composite is replaced by
//! its causes, recursively.

use serde::{Deserialize, Serialize};

/// A single reportable violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// `$`-rooted dotted path into the document (e.g. `$.metadata.version`)
    pub location: String,
    /// Description of the violated constraint
    pub message: String,
}

impl ValidationError {
    pub fn new(location: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            location: location.into(),
            message: message.into(),
        }
    }
}

/// A node of the violation tree. Pointers are JSON pointers (`/a/0`, the
/// root is empty).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Most specific violation; reported as-is
    Leaf { pointer: String, message: String },
    /// Violation explained by its causes; never reported itself
    Composite {
        pointer: String,
        message: String,
        causes: Vec<Violation>,
    },
}

impl Violation {
    pub fn leaf(pointer: impl Into<String>, message: impl Into<String>) -> Self {
        Violation::Leaf {
            pointer: pointer.into(),
            message: message.into(),
        }
    }

    pub fn composite(
        pointer: impl Into<String>,
        message: impl Into<String>,
        causes: Vec<Violation>,
    ) -> Self {
        Violation::Composite {
            pointer: pointer.into(),
            message: message.into(),
            causes,
        }
    }

    /// Folds sibling violations found at one location: none is success, a
    /// single one stands for itself, several are grouped under a composite.
    pub fn collect(pointer: &str, mut causes: Vec<Violation>) -> Option<Violation> {
        match causes.len() {
            0 => None,
            1 => causes.pop(),
            n => Some(Violation::composite(
                pointer,
                format!("{} schema violations found", n),
                causes,
            )),
        }
    }

    pub fn pointer(&self) -> &str {
        match self {
            Violation::Leaf { pointer, .. } | Violation::Composite { pointer, .. } => pointer,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Violation::Leaf { message, .. } | Violation::Composite { message, .. } => message,
        }
    }

    /// Number of violations `flatten` reports for this tree.
    pub fn leaf_count(&self) -> usize {
        match self {
            Violation::Composite { causes, .. } if !causes.is_empty() => {
                causes.iter().map(Violation::leaf_count).sum()
            }
            _ => 1,
        }
    }

    /// Expands the tree into its leaves, depth first, causes in discovery
    /// order. A composite without causes is reported as a leaf. Identical
    /// leaves reached through distinct branches are all kept.
    pub fn flatten(self) -> Vec<ValidationError> {
        let mut errors = Vec::new();
        let mut worklist = vec![self];

        while let Some(violation) = worklist.pop() {
            match violation {
                Violation::Composite { causes, .. } if !causes.is_empty() => {
                    worklist.extend(causes.into_iter().rev());
                }
                Violation::Leaf { pointer, message }
                | Violation::Composite { pointer, message, .. } => {
                    errors.push(ValidationError::new(normalize_pointer(&pointer), message));
                }
            }
        }

        errors
    }
}

/// Rewrites a native pointer (`#`, `#/a/b`, `/a/b`) to the `$`-rooted dotted
/// path convention (`$`, `$.a.b`), unescaping `~1` and `~0`.
pub fn normalize_pointer(pointer: &str) -> String {
    let path = pointer.strip_prefix('#').unwrap_or(pointer);
    let mut location = String::from("$");
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        location.push('.');
        location.push_str(&segment.replace("~1", "/").replace("~0", "~"));
    }
    location
}
