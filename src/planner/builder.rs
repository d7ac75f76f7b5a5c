//! Fetch query builder.
//!
//! Reads the `where` filter of a parsed Fetch document and produces one class
//! search, one property search per property filter, and the operator/value
//! pairs that stay unresolved until plan assembly.

use chrono::{DateTime, Utc};

use crate::contextionary::{Keyword, SearchParams, SearchType};
use crate::execution::SelectedField;
use crate::model::{FilterValue, Kind, Operator};
use crate::query::ast::{Document, Field, InputValue};
use crate::{Error, Result};

const FETCH_FIELD: &str = "Fetch";

const VALUE_ARGUMENTS: [&str; 6] = [
    "valueString", "valueText", "valueInt", "valueBoolean", "valueNumber", "valueDate",
];

// ============================================================================
// Typed query
// ============================================================================

/// A Fetch query after validation.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchQuery {
    pub kind: Kind,
    pub class: ClassFilter,
    pub properties: Vec<PropertyFilter>,
    /// Requested sub-fields of the kind field, in selection order.
    pub selection: Vec<SelectedField>,
    /// Response path of the kind field, e.g. `["Fetch", "Things"]`.
    pub path: Vec<String>,
}

/// Approximate class name to resolve.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassFilter {
    pub name: String,
    pub certainty: f64,
    pub keywords: Vec<Keyword>,
}

/// Approximate property name to resolve, plus the comparison to forward.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyFilter {
    pub name: String,
    pub certainty: f64,
    pub keywords: Vec<Keyword>,
    pub operator: Operator,
    pub value: FilterValue,
}

impl FetchQuery {
    /// Extract the Fetch query from a parsed document.
    pub fn from_document(doc: &Document) -> Result<FetchQuery> {
        let fetch = single(&doc.selections, "query root")?;
        if fetch.name != FETCH_FIELD {
            return Err(invalid(format!("expected '{FETCH_FIELD}' at the query root, got '{}'", fetch.name)));
        }
        if !fetch.arguments.is_empty() {
            return Err(invalid(format!("'{FETCH_FIELD}' takes no arguments")));
        }

        let kind_field = single(&fetch.selections, FETCH_FIELD)?;
        let kind = Kind::from_field_name(&kind_field.name).ok_or_else(|| {
            invalid(format!("expected 'Things' or 'Actions' inside '{FETCH_FIELD}', got '{}'", kind_field.name))
        })?;

        if let Some(arg) = kind_field.arguments.iter().find(|a| a.name != "where") {
            return Err(invalid(format!("unknown argument '{}' on '{}'", arg.name, kind_field.name)));
        }
        let filter = kind_field
            .argument("where")
            .ok_or_else(|| invalid(format!("'{}' requires a 'where' argument", kind_field.name)))?;
        let filter = ObjectReader::new("where", filter, &["class", "properties"])?;

        let class = parse_class_filter(filter.required("class")?)?;
        let properties = match filter.get("properties") {
            Some(value) => value
                .as_list()
                .into_iter()
                .map(parse_property_filter)
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        let selection = parse_selection(kind_field)?;

        Ok(FetchQuery {
            kind,
            class,
            properties,
            selection,
            path: vec![fetch.response_key().to_string(), kind_field.response_key().to_string()],
        })
    }
}

// ============================================================================
// Search requests
// ============================================================================

/// Gateway requests for one Fetch, plus the comparisons held back for the plan.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequests {
    pub class: SearchParams,
    pub properties: Vec<SearchParams>,
    /// `matches[i]` belongs to `properties[i]`.
    pub matches: Vec<PendingMatch>,
}

/// Operator and value of a property filter, forwarded to the plan unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingMatch {
    pub operator: Operator,
    pub value: FilterValue,
}

/// Split a Fetch query into gateway requests.
pub fn build(query: &FetchQuery) -> SearchRequests {
    let class = SearchParams {
        search_type: SearchType::Class,
        name: query.class.name.clone(),
        certainty: query.class.certainty,
        keywords: query.class.keywords.clone(),
    };

    let (properties, matches) = query
        .properties
        .iter()
        .map(|p| {
            let params = SearchParams {
                search_type: SearchType::Property,
                name: p.name.clone(),
                certainty: p.certainty,
                keywords: p.keywords.clone(),
            };
            (params, PendingMatch { operator: p.operator, value: p.value.clone() })
        })
        .unzip();

    SearchRequests { class, properties, matches }
}

// ============================================================================
// Filter parsing
// ============================================================================

/// Sub-fields of the kind field, keyed by their response key.
///
/// Unknown fields fail here, before any gateway call. Repeating a key is
/// allowed only when it selects the same field.
fn parse_selection(kind_field: &Field) -> Result<Vec<SelectedField>> {
    let mut selection: Vec<SelectedField> = Vec::with_capacity(kind_field.selections.len());
    for f in &kind_field.selections {
        if !f.selections.is_empty() || !f.arguments.is_empty() {
            return Err(invalid(format!("field '{}' is a scalar and takes no arguments or selection", f.name)));
        }
        let selected = SelectedField::new(f.response_key(), f.name.as_str());
        if !selected.is_recognized() {
            return Err(Error::UnknownField(selected.field));
        }
        match selection.iter().find(|s| s.key == selected.key) {
            Some(prev) if prev.field == selected.field => {}
            Some(prev) => {
                return Err(invalid(format!(
                    "response key '{}' selects both '{}' and '{}'",
                    selected.key, prev.field, selected.field
                )));
            }
            None => selection.push(selected),
        }
    }
    if selection.is_empty() {
        return Err(invalid(format!("'{}' must select at least one field", kind_field.name)));
    }
    Ok(selection)
}

fn parse_class_filter(value: &InputValue) -> Result<ClassFilter> {
    let obj = ObjectReader::new("class", value, &["name", "certainty", "keywords"])?;
    Ok(ClassFilter {
        name: obj.string("name")?,
        certainty: obj.unit_interval("certainty")?,
        keywords: parse_keywords(obj.get("keywords"))?,
    })
}

fn parse_property_filter(value: &InputValue) -> Result<PropertyFilter> {
    let mut allowed = vec!["name", "certainty", "keywords", "operator"];
    allowed.extend(VALUE_ARGUMENTS);
    let obj = ObjectReader::new("properties", value, &allowed)?;

    let operator = match obj.required("operator")? {
        InputValue::Enum(name) => Operator::from_name(name)
            .ok_or_else(|| invalid(format!("unknown operator '{name}'")))?,
        other => return Err(invalid(format!("operator must be an enum value, got {}", other.type_name()))),
    };

    let mut present = VALUE_ARGUMENTS.iter().filter_map(|&k| obj.get(k).map(|v| (k, v)));
    let (key, raw) = present
        .next()
        .ok_or_else(|| invalid(format!("property filter needs one of {}", VALUE_ARGUMENTS.join(", "))))?;
    if let Some((other, _)) = present.next() {
        return Err(invalid(format!("property filter has both '{key}' and '{other}'")));
    }

    Ok(PropertyFilter {
        name: obj.string("name")?,
        certainty: obj.unit_interval("certainty")?,
        keywords: parse_keywords(obj.get("keywords"))?,
        operator,
        value: parse_filter_value(key, raw)?,
    })
}

fn parse_keywords(value: Option<&InputValue>) -> Result<Vec<Keyword>> {
    let Some(value) = value else { return Ok(Vec::new()) };
    value
        .as_list()
        .into_iter()
        .map(|item| {
            let obj = ObjectReader::new("keywords", item, &["value", "weight"])?;
            Ok(Keyword {
                keyword: obj.string("value")?,
                weight: obj.unit_interval("weight")?,
            })
        })
        .collect()
}

fn parse_filter_value(key: &str, raw: &InputValue) -> Result<FilterValue> {
    let mismatch = || invalid(format!("'{key}' does not accept a {} value", raw.type_name()));
    match (key, raw) {
        ("valueString", InputValue::String(s)) => Ok(FilterValue::String(s.clone())),
        ("valueText", InputValue::String(s)) => Ok(FilterValue::Text(s.clone())),
        ("valueInt", InputValue::Int(i)) => Ok(FilterValue::Int(*i)),
        ("valueBoolean", InputValue::Boolean(b)) => Ok(FilterValue::Bool(*b)),
        ("valueNumber", v) => v.as_float().map(FilterValue::Number).ok_or_else(mismatch),
        ("valueDate", InputValue::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|d| FilterValue::Date(d.with_timezone(&Utc)))
            .map_err(|e| invalid(format!("'{key}' is not an RFC 3339 date: {e}"))),
        _ => Err(mismatch()),
    }
}

// ============================================================================
// Helpers
// ============================================================================

fn invalid(msg: String) -> Error {
    Error::InvalidQuery(msg)
}

fn single<'a>(fields: &'a [Field], parent: &str) -> Result<&'a Field> {
    match fields {
        [one] => Ok(one),
        [] => Err(invalid(format!("{parent} selects nothing"))),
        [_, second, ..] => Err(invalid(format!(
            "{parent} must select exactly one field, found extra '{}'",
            second.name
        ))),
    }
}

/// Typed access to an input object; `null` fields count as absent.
struct ObjectReader<'a> {
    what: &'static str,
    fields: &'a [(String, InputValue)],
}

impl<'a> ObjectReader<'a> {
    fn new(what: &'static str, value: &'a InputValue, allowed: &[&str]) -> Result<Self> {
        let fields = value
            .as_object()
            .ok_or_else(|| invalid(format!("'{what}' must be an object, got {}", value.type_name())))?;
        if let Some((key, _)) = fields.iter().find(|(k, _)| !allowed.contains(&k.as_str())) {
            return Err(invalid(format!("unknown field '{key}' in '{what}'")));
        }
        Ok(Self { what, fields })
    }

    fn get(&self, key: &str) -> Option<&'a InputValue> {
        self.fields
            .iter()
            .find(|(k, v)| k == key && *v != InputValue::Null)
            .map(|(_, v)| v)
    }

    fn required(&self, key: &str) -> Result<&'a InputValue> {
        self.get(key)
            .ok_or_else(|| invalid(format!("'{}' requires field '{key}'", self.what)))
    }

    fn string(&self, key: &str) -> Result<String> {
        let value = self.required(key)?;
        value
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| invalid(format!("'{}.{key}' must be a string, got {}", self.what, value.type_name())))
    }

    /// A number within [0, 1].
    fn unit_interval(&self, key: &str) -> Result<f64> {
        let value = self.required(key)?;
        let n = value
            .as_float()
            .ok_or_else(|| invalid(format!("'{}.{key}' must be a number, got {}", self.what, value.type_name())))?;
        if !(0.0..=1.0).contains(&n) {
            return Err(invalid(format!("'{}.{key}' must be within [0, 1], got {n}", self.what)));
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query;
    use pretty_assertions::assert_eq;

    fn fetch(query_text: &str) -> Result<FetchQuery> {
        FetchQuery::from_document(&query::parse(query_text)?)
    }

    const SINGLE_PROP: &str = r#"{
        Fetch {
            Things(where: {
                class: { name: "bestclass", certainty: 0.8, keywords: [{value: "foo", weight: 0.9}] },
                properties: {
                    name: "bestproperty", certainty: 0.8,
                    keywords: [{value: "bar", weight: 0.9}],
                    operator: Equal, valueString: "some-value"
                },
            }) { beacon certainty }
        }
    }"#;

    #[test]
    fn test_single_property_query() {
        let q = fetch(SINGLE_PROP).unwrap();
        assert_eq!(q.kind, Kind::Thing);
        assert_eq!(q.path, ["Fetch", "Things"]);
        assert_eq!(q.selection, vec![SelectedField::plain("beacon"), SelectedField::plain("certainty")]);
        assert_eq!(q.class, ClassFilter {
            name: "bestclass".into(),
            certainty: 0.8,
            keywords: vec![Keyword::new("foo", 0.9)],
        });
        assert_eq!(q.properties, vec![PropertyFilter {
            name: "bestproperty".into(),
            certainty: 0.8,
            keywords: vec![Keyword::new("bar", 0.9)],
            operator: Operator::Equal,
            value: FilterValue::String("some-value".into()),
        }]);
    }

    #[test]
    fn test_build_orders_class_first() {
        let requests = build(&fetch(SINGLE_PROP).unwrap());
        assert_eq!(requests.class.search_type, SearchType::Class);
        assert_eq!(requests.properties, vec![
            SearchParams::new(SearchType::Property, "bestproperty", 0.8).with_keyword("bar", 0.9),
        ]);
        assert_eq!(requests.class, SearchParams::new(SearchType::Class, "bestclass", 0.8).with_keyword("foo", 0.9));
        assert_eq!(requests.matches, vec![PendingMatch {
            operator: Operator::Equal,
            value: FilterValue::String("some-value".into()),
        }]);
    }

    #[test]
    fn test_property_list_keeps_declaration_order() {
        let q = fetch(r#"{ Fetch { Actions(where: {
            class: { name: "Move", certainty: 0.5 },
            properties: [
                { name: "speed", certainty: 0.6, operator: GreaterThan, valueNumber: 3 },
                { name: "done", certainty: 0.7, operator: Equal, valueBoolean: true },
                { name: "at", certainty: 0.9, operator: LessThan, valueDate: "2019-01-02T03:04:05Z" },
                { name: "count", certainty: 1, operator: NotEqual, valueInt: -2 },
                { name: "notes", certainty: 0, operator: Equal, valueText: "long" },
            ]
        }) { beacon } } }"#).unwrap();

        assert_eq!(q.kind, Kind::Action);
        assert_eq!(q.path, ["Fetch", "Actions"]);
        let requests = build(&q);
        let names: Vec<_> = requests.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["speed", "done", "at", "count", "notes"]);

        let values: Vec<_> = requests.matches.iter().map(|m| m.value.clone()).collect();
        let date = DateTime::parse_from_rfc3339("2019-01-02T03:04:05Z").unwrap().with_timezone(&Utc);
        assert_eq!(values, vec![
            FilterValue::Number(3.0),
            FilterValue::Bool(true),
            FilterValue::Date(date),
            FilterValue::Int(-2),
            FilterValue::Text("long".into()),
        ]);
        assert!(requests.class.keywords.is_empty());
    }

    #[test]
    fn test_no_property_filters() {
        let q = fetch(r#"{ Fetch { Things(where: { class: { name: "City", certainty: 0.5 } }) { beacon } } }"#).unwrap();
        let requests = build(&q);
        assert!(requests.properties.is_empty());
        assert!(requests.matches.is_empty());
    }

    #[test]
    fn test_alias_changes_response_path() {
        let q = fetch(r#"{ f: Fetch { cities: Things(where: { class: { name: "City", certainty: 0.5 } }) { beacon } } }"#).unwrap();
        assert_eq!(q.path, ["f", "cities"]);
    }

    #[test]
    fn test_sub_field_aliases_kept() {
        let q = fetch(r#"{ Fetch { Things(where: { class: { name: "City", certainty: 0.5 } }) {
            ref: beacon score: certainty beacon ref: beacon
        } } }"#).unwrap();
        assert_eq!(q.selection, vec![
            SelectedField::new("ref", "beacon"),
            SelectedField::new("score", "certainty"),
            SelectedField::plain("beacon"),
        ]);
    }

    #[test]
    fn test_rejects_conflicting_response_keys() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 } }) { x: beacon x: certainty } } }"#);
    }

    #[test]
    fn test_rejects_unknown_selection_field() {
        let err = fetch(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 } }) { beacon n: name } } }"#)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownField(ref f) if f == "name"));
    }

    fn assert_invalid(query_text: &str) {
        match fetch(query_text) {
            Err(Error::InvalidQuery(_)) => {}
            other => panic!("expected InvalidQuery for {query_text}, got {other:?}"),
        }
    }

    #[test]
    fn test_rejects_two_values() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 },
            properties: { name: "p", certainty: 0.5, operator: Equal, valueString: "a", valueInt: 1 } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_missing_value() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 },
            properties: { name: "p", certainty: 0.5, operator: Equal } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_unknown_operator() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 },
            properties: { name: "p", certainty: 0.5, operator: Like, valueString: "a" } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_out_of_range_certainty() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 1.5 } }) { beacon } } }"#);
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5,
            keywords: [{value: "k", weight: -0.1}] } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_missing_class() {
        assert_invalid(r#"{ Fetch { Things(where: { properties: { name: "p", certainty: 0.5, operator: Equal, valueString: "a" } }) { beacon } } }"#);
        assert_invalid(r#"{ Fetch { Things { beacon } } }"#);
    }

    #[test]
    fn test_rejects_value_type_mismatch() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 },
            properties: { name: "p", certainty: 0.5, operator: Equal, valueInt: "7" } }) { beacon } } }"#);
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5 },
            properties: { name: "p", certainty: 0.5, operator: Equal, valueDate: "yesterday" } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_wrong_root_and_kind() {
        assert_invalid(r#"{ Get { Things(where: { class: { name: "C", certainty: 0.5 } }) { beacon } } }"#);
        assert_invalid(r#"{ Fetch { Places(where: { class: { name: "C", certainty: 0.5 } }) { beacon } } }"#);
    }

    #[test]
    fn test_rejects_unknown_filter_field() {
        assert_invalid(r#"{ Fetch { Things(where: { class: { name: "C", certainty: 0.5, limit: 3 } }) { beacon } } }"#);
    }
}
