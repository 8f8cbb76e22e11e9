//! List field normalization
//!
//! Resume list columns arrive in three shapes: a JSON array, a string
//! holding JSON, or free text. `FieldSource` names those shapes once at the
//! boundary and the `normalize_*` functions turn them into typed lists.
//!
//! Resolution order for text: JSON array parse, then comma split, then empty.

use log::debug;
use serde_json::Value;

use crate::json_helpers::{get_text_any, scalar_to_text};
use crate::model::{EducationEntry, ExperienceEntry, LanguageEntry};

/// Raw shape of a list-typed field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldSource {
    Absent,
    Text(String),
    List(Vec<Value>),
}

impl FieldSource {
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Null => FieldSource::Absent,
            Value::String(s) => FieldSource::Text(s.clone()),
            Value::Array(items) => FieldSource::List(items.clone()),
            other => {
                debug!("Ignoring non-list field value: {}", other);
                FieldSource::Absent
            }
        }
    }

    /// Resolve into a list of raw JSON items
    ///
    /// Text that parses as a JSON array is used as the array. Any other text
    /// (including JSON scalars) is split on commas into trimmed, non-empty
    /// string fragments.
    pub fn into_items(self) -> Vec<Value> {
        match self {
            FieldSource::Absent => Vec::new(),
            FieldSource::List(items) => items,
            FieldSource::Text(text) => match serde_json::from_str::<Value>(&text) {
                Ok(Value::Array(items)) => items,
                _ => {
                    debug!("Field is not a JSON list, splitting on commas");
                    split_commas(&text).into_iter().map(Value::String).collect()
                }
            },
        }
    }
}

/// Comma split with trimming; empty fragments are dropped
pub fn split_commas(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Plain string lists (skills, certifications)
pub fn normalize_strings(source: FieldSource) -> Vec<String> {
    source
        .into_items()
        .iter()
        .filter_map(|item| {
            scalar_to_text(item).or_else(|| get_text_any(item, &["name", "title"]))
        })
        .collect()
}

/// Languages; a bare string is `{ name, fluency: None }`
pub fn normalize_languages(source: FieldSource) -> Vec<LanguageEntry> {
    source
        .into_items()
        .iter()
        .filter_map(|item| {
            if let Some(name) = scalar_to_text(item) {
                return Some(LanguageEntry {
                    name,
                    fluency: None,
                });
            }
            if !item.is_object() {
                return None;
            }
            let name = get_text_any(item, &["name", "language"]).unwrap_or_default();
            let fluency = get_text_any(item, &["fluency", "level"]);
            if name.is_empty() && fluency.is_none() {
                return None;
            }
            Some(LanguageEntry { name, fluency })
        })
        .collect()
}

/// Education entries; a bare string becomes the degree
pub fn normalize_education(source: FieldSource) -> Vec<EducationEntry> {
    source
        .into_items()
        .iter()
        .filter_map(|item| {
            if let Some(degree) = scalar_to_text(item) {
                return Some(EducationEntry {
                    degree: Some(degree),
                    ..Default::default()
                });
            }
            if !item.is_object() {
                return None;
            }
            Some(EducationEntry {
                degree: get_text_any(item, &["degree"]),
                institution: get_text_any(item, &["institution", "school"]),
                start_date: get_text_any(item, &["start_date", "startDate"]),
                end_date: get_text_any(item, &["end_date", "endDate"]),
                description: get_text_any(item, &["description"]),
            })
        })
        .collect()
}

/// Experience entries; a bare string becomes the position
pub fn normalize_experience(source: FieldSource) -> Vec<ExperienceEntry> {
    source
        .into_items()
        .iter()
        .filter_map(|item| {
            if let Some(position) = scalar_to_text(item) {
                return Some(ExperienceEntry {
                    position: Some(position),
                    ..Default::default()
                });
            }
            if !item.is_object() {
                return None;
            }
            Some(ExperienceEntry {
                position: get_text_any(item, &["position", "title"]),
                company: get_text_any(item, &["company"]),
                start_date: get_text_any(item, &["start_date", "startDate"]),
                end_date: get_text_any(item, &["end_date", "endDate"]),
                description: get_text_any(item, &["description"]),
            })
        })
        .collect()
}
