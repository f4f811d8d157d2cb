//! Arbitrary-depth dot-notation flattening.
//!
//! Turns flat form data such as `user.name=John&user.country=USA` into
//! `{"user": {"name": "John", "country": "USA"}}`. The first value of each
//! key is used.

use serde_json::{Map, Value};
use thiserror::Error;

/// A key was used both as a leaf value and as a parent of nested keys.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DotNotationError {
    #[error("key '{key}' is assigned both a value and nested fields")]
    Conflict { key: String },
}

/// Build a nested JSON object from dotted keys.
///
/// Keys with an empty value list are skipped.
pub fn flatten_dot_notation<K, V>(
    values: impl IntoIterator<Item = (K, V)>,
) -> Result<Map<String, Value>, DotNotationError>
where
    K: AsRef<str>,
    V: AsRef<[String]>,
{
    let mut root = Map::new();

    for (key, list) in values {
        let key = key.as_ref();
        let Some(first) = list.as_ref().first() else {
            continue;
        };

        let mut segments: Vec<&str> = key.split('.').collect();
        let leaf = segments.pop().unwrap_or_default();

        let mut node = &mut root;
        for (depth, segment) in segments.iter().enumerate() {
            let child = node
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            node = match child {
                Value::Object(map) => map,
                _ => {
                    return Err(DotNotationError::Conflict {
                        key: segments[..=depth].join("."),
                    })
                }
            };
        }

        if node.get(leaf).is_some_and(Value::is_object) {
            return Err(DotNotationError::Conflict {
                key: key.to_string(),
            });
        }
        node.insert(leaf.to_string(), Value::String(first.clone()));
    }

    Ok(root)
}
