//! Nested form-key binding.
//!
//! Form bodies are flat `key=value` pairs. Keys may address nested objects
//! and list elements (`orgs[0].orgName`); this module folds the pairs into a
//! JSON tree so the same serde DTOs serve both JSON and form requests.

use serde_json::{Map, Value};
use validation_demo_shared::{ErrorCode, ErrorEnvelope};

/// Highest list index a form key may address.
pub const MAX_FORM_INDEX: usize = 255;

/// A form key that cannot be bound to a JSON tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormPathError {
    /// Empty key or empty `a..b` segment.
    #[error("form key `{key}` has an empty segment")]
    EmptySegment {
        /// Offending key.
        key: String,
    },
    /// `[...]` without a closing bracket or with a non-numeric index.
    #[error("form key `{key}` has a malformed index")]
    MalformedIndex {
        /// Offending key.
        key: String,
    },
    /// Index above [`MAX_FORM_INDEX`].
    #[error("form key `{key}` addresses index {index}, above the limit of {max}", max = MAX_FORM_INDEX)]
    IndexTooLarge {
        /// Offending key.
        key: String,
        /// Requested index.
        index: usize,
    },
    /// Key uses a slot as a scalar and as a container, e.g. `orgs=1&orgs[0].orgId=2`.
    #[error("form key `{key}` conflicts with another key")]
    Conflict {
        /// Offending key.
        key: String,
    },
}

impl From<FormPathError> for ErrorEnvelope {
    fn from(error: FormPathError) -> Self {
        let key = match &error {
            FormPathError::EmptySegment { key }
            | FormPathError::MalformedIndex { key }
            | FormPathError::IndexTooLarge { key, .. }
            | FormPathError::Conflict { key } => key.clone(),
        };
        Self::expected(ErrorCode::new("http", "invalid_form_key"), error.to_string())
            .with_metadata("key", key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Key(String),
    Index(usize),
}

fn parse_key(key: &str) -> Result<Vec<Step>, FormPathError> {
    let empty = || FormPathError::EmptySegment { key: key.to_owned() };
    let malformed = || FormPathError::MalformedIndex { key: key.to_owned() };

    let mut steps = Vec::new();
    let mut rest = key;
    let mut expect_name = true;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix('[') {
            let (digits, tail) = after.split_once(']').ok_or_else(malformed)?;
            let index: usize = digits.parse().map_err(|_| malformed())?;
            if index > MAX_FORM_INDEX {
                return Err(FormPathError::IndexTooLarge {
                    key: key.to_owned(),
                    index,
                });
            }
            if steps.is_empty() {
                return Err(empty());
            }
            steps.push(Step::Index(index));
            rest = tail;
            expect_name = false;
            continue;
        }

        if !expect_name {
            rest = rest.strip_prefix('.').ok_or_else(malformed)?;
        }
        let end = rest.find(['.', '[']).unwrap_or(rest.len());
        let (name, tail) = rest.split_at(end);
        if name.is_empty() {
            return Err(empty());
        }
        steps.push(Step::Key(name.to_owned()));
        rest = tail;
        expect_name = false;
    }

    if steps.is_empty() {
        return Err(empty());
    }
    Ok(steps)
}

fn container_for(step: &Step) -> Value {
    match step {
        Step::Key(_) => Value::Object(Map::new()),
        Step::Index(_) => Value::Array(Vec::new()),
    }
}

fn slot<'a>(node: &'a mut Value, step: &Step, key: &str) -> Result<&'a mut Value, FormPathError> {
    let conflict = || FormPathError::Conflict { key: key.to_owned() };
    match step {
        Step::Key(name) => {
            if node.is_null() {
                *node = Value::Object(Map::new());
            }
            let map = node.as_object_mut().ok_or_else(conflict)?;
            Ok(map.entry(name.clone()).or_insert(Value::Null))
        },
        Step::Index(index) => {
            if node.is_null() {
                *node = Value::Array(Vec::new());
            }
            let items = node.as_array_mut().ok_or_else(conflict)?;
            if items.len() <= *index {
                items.resize(index + 1, Value::Null);
            }
            items.get_mut(*index).ok_or_else(conflict)
        },
    }
}

/// Fold form pairs into a JSON object.
///
/// Values stay strings; the DTO adapters parse numbers and dates. A repeated
/// key keeps its last value. List slots skipped by the keys are `null`.
pub fn pairs_to_json(pairs: &[(String, String)]) -> Result<Value, FormPathError> {
    let mut root = Value::Object(Map::new());
    for (key, value) in pairs {
        let steps = parse_key(key)?;
        let mut node = &mut root;
        for (position, step) in steps.iter().enumerate() {
            node = slot(node, step, key)?;
            if let Some(next) = steps.get(position + 1) {
                if node.is_string() {
                    return Err(FormPathError::Conflict { key: key.clone() });
                }
                if node.is_null() {
                    *node = container_for(next);
                }
            }
        }
        if node.is_object() || node.is_array() {
            return Err(FormPathError::Conflict { key: key.clone() });
        }
        *node = Value::String(value.clone());
    }
    Ok(root)
}
