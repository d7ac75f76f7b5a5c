//! Result projection.
//!
//! Maps connector rows onto the fields the query selected and nests them at
//! the query's response path. Row order and scalar values are passed
//! through untouched.

use serde_json::{Map, Value as JsonValue};

use crate::storage::ResultRow;
use crate::{Error, Result};

/// Sub-fields a Fetch selection may request.
pub const RECOGNIZED_FIELDS: [&str; 2] = ["beacon", "certainty"];

/// One selected sub-field: the row field it reads and the key it is
/// emitted under (the alias, if any).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedField {
    pub key: String,
    pub field: String,
}

impl SelectedField {
    pub fn new(key: impl Into<String>, field: impl Into<String>) -> Self {
        Self { key: key.into(), field: field.into() }
    }

    /// Unaliased selection of `field`.
    pub fn plain(field: impl Into<String>) -> Self {
        let field = field.into();
        Self { key: field.clone(), field }
    }

    pub fn is_recognized(&self) -> bool {
        RECOGNIZED_FIELDS.contains(&self.field.as_str())
    }
}

/// Response of one Fetch resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    /// Response tree, e.g. `{"Fetch": {"Things": [...]}}`.
    pub data: JsonValue,
    /// Number of rows placed at the response path.
    pub row_count: usize,
}

impl QueryResult {
    /// Value at a field path, e.g. `["Fetch", "Things"]`.
    pub fn get(&self, path: &[&str]) -> Option<&JsonValue> {
        path.iter().try_fold(&self.data, |node, key| node.get(*key))
    }
}

/// Project `rows` onto `selection` and nest the list under `path`.
///
/// Fails with `Error::UnknownField` if the selection names anything outside
/// `RECOGNIZED_FIELDS`. A selected field missing from a row becomes `null`.
pub fn project(rows: &[ResultRow], selection: &[SelectedField], path: &[String]) -> Result<QueryResult> {
    if let Some(unknown) = selection.iter().find(|f| !f.is_recognized()) {
        return Err(Error::UnknownField(unknown.field.clone()));
    }

    let list: Vec<JsonValue> = rows
        .iter()
        .map(|row| {
            let object: Map<String, JsonValue> = selection
                .iter()
                .map(|sel| (sel.key.clone(), row.get(&sel.field).cloned().unwrap_or(JsonValue::Null)))
                .collect();
            JsonValue::Object(object)
        })
        .collect();

    let data = path.iter().rev().fold(JsonValue::Array(list), |inner, key| {
        let mut wrapper = Map::new();
        wrapper.insert(key.clone(), inner);
        JsonValue::Object(wrapper)
    });

    Ok(QueryResult { data, row_count: rows.len() })
}
