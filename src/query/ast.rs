//! Query AST for the GraphQL subset used by Fetch documents.

/// A parsed document: the root selection set.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub selections: Vec<Field>,
}

/// A selected field with its arguments and sub-selection.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub alias: Option<String>,
    pub name: String,
    pub arguments: Vec<Argument>,
    pub selections: Vec<Field>,
    /// Byte offset of the field name in the source.
    pub position: usize,
}

impl Field {
    /// Key under which this field appears in the response.
    pub fn response_key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.name)
    }

    pub fn argument(&self, name: &str) -> Option<&InputValue> {
        self.arguments.iter().find(|a| a.name == name).map(|a| &a.value)
    }
}

/// `name: value` pair in a field's argument list.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    pub name: String,
    pub value: InputValue,
}

/// Literal input value.
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Null,
    Int(i64),
    Float(f64),
    String(String),
    Boolean(bool),
    Enum(String),
    List(Vec<InputValue>),
    /// Object fields in source order.
    Object(Vec<(String, InputValue)>),
}

impl InputValue {
    pub fn type_name(&self) -> &'static str {
        match self {
            InputValue::Null => "null",
            InputValue::Int(_) => "Int",
            InputValue::Float(_) => "Float",
            InputValue::String(_) => "String",
            InputValue::Boolean(_) => "Boolean",
            InputValue::Enum(_) => "Enum",
            InputValue::List(_) => "List",
            InputValue::Object(_) => "Object",
        }
    }

    /// Numeric value; ints coerce to floats as in GraphQL `Float` inputs.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            InputValue::Float(f) => Some(*f),
            InputValue::Int(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            InputValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&[(String, InputValue)]> {
        match self {
            InputValue::Object(fields) => Some(fields),
            _ => None,
        }
    }

    /// List input coercion: a non-list value is a one-element list.
    pub fn as_list(&self) -> Vec<&InputValue> {
        match self {
            InputValue::List(items) => items.iter().collect(),
            InputValue::Null => Vec::new(),
            other => vec![other],
        }
    }
}
