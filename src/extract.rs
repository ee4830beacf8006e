//! Description extraction from loosely-typed overview payloads
//!
//! The detail endpoint has no stable schema. It may answer with an object, an
//! array of objects, or nothing useful at all, and the description may sit
//! under one of a few well-known keys, under an arbitrary key, or one level
//! down in a nested object. [`extract_description`] applies a fixed fallback
//! order over [`OverviewPayload`] and never fails.

use serde_json::{Map, Value};

/// Keys that name the description directly, in lookup order
pub const DESCRIPTION_KEYS: [&str; 3] = ["description", "job_description", "full_description"];

/// Minimum length (exclusive, in characters) for an arbitrary string value
/// to be taken as a description
pub const MIN_FREEFORM_LEN: usize = 40;

/// Overview payload as returned by the detail endpoint
#[derive(Debug, Clone, Default, PartialEq)]
pub enum OverviewPayload {
    /// Nothing usable (missing, null, scalar, `{}` or an array without objects)
    #[default]
    Empty,
    /// A single JSON object
    Object(Map<String, Value>),
    /// An array; only its object elements are kept
    Sequence(Vec<Map<String, Value>>),
}

impl OverviewPayload {
    /// Whether the payload carries no data
    pub fn is_empty(&self) -> bool {
        matches!(self, OverviewPayload::Empty)
    }

    /// The object the extraction heuristics operate on
    fn working_object(&self) -> Option<&Map<String, Value>> {
        match self {
            OverviewPayload::Empty => None,
            OverviewPayload::Object(map) => Some(map),
            OverviewPayload::Sequence(items) => items.first(),
        }
    }
}

impl From<Value> for OverviewPayload {
    fn from(value: Value) -> Self {
        match value {
            Value::Object(map) if !map.is_empty() => OverviewPayload::Object(map),
            Value::Array(items) => {
                let objects: Vec<_> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(map) => Some(map),
                        _ => None,
                    })
                    .collect();
                if objects.is_empty() {
                    OverviewPayload::Empty
                } else {
                    OverviewPayload::Sequence(objects)
                }
            }
            _ => OverviewPayload::Empty,
        }
    }
}

impl From<Option<Value>> for OverviewPayload {
    fn from(value: Option<Value>) -> Self {
        value.map(OverviewPayload::from).unwrap_or_default()
    }
}

/// Locate a human-readable job description in an overview payload.
///
/// Lookup order, first hit wins:
/// 1. a non-blank string under one of [`DESCRIPTION_KEYS`]
/// 2. the first string value longer than [`MIN_FREEFORM_LEN`] characters
/// 3. a non-blank string under one of [`DESCRIPTION_KEYS`] inside a nested object
///
/// Returns the trimmed text, or an empty string when nothing matches.
pub fn extract_description(payload: &OverviewPayload) -> String {
    let Some(object) = payload.working_object() else {
        return String::new();
    };

    preferred_key(object)
        .or_else(|| long_freeform_value(object))
        .or_else(|| {
            object.values().find_map(|value| match value {
                Value::Object(nested) => preferred_key(nested),
                _ => None,
            })
        })
        .map(str::to_string)
        .unwrap_or_default()
}

fn preferred_key(object: &Map<String, Value>) -> Option<&str> {
    DESCRIPTION_KEYS.iter().find_map(|key| {
        object
            .get(*key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    })
}

fn long_freeform_value(object: &Map<String, Value>) -> Option<&str> {
    object.values().find_map(|value| {
        value
            .as_str()
            .map(str::trim)
            .filter(|text| text.chars().count() > MIN_FREEFORM_LEN)
    })
}
