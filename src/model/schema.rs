//! Local schema: the `Things` and `Actions` collections and their classes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Top-level schema category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Thing,
    Action,
}

impl Kind {
    /// Collection name as it appears in queries and responses (`Things`).
    pub fn field_name(&self) -> &'static str {
        match self {
            Kind::Thing => "Things",
            Kind::Action => "Actions",
        }
    }

    /// Lower-case path segment used inside beacons (`things`).
    pub fn beacon_segment(&self) -> &'static str {
        match self {
            Kind::Thing => "things",
            Kind::Action => "actions",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Kind> {
        match name {
            "Things" => Some(Kind::Thing),
            "Actions" => Some(Kind::Action),
            _ => None,
        }
    }

    pub fn from_beacon_segment(segment: &str) -> Option<Kind> {
        match segment {
            "things" => Some(Kind::Thing),
            "actions" => Some(Kind::Action),
            _ => None,
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.field_name())
    }
}

/// Full local schema. Either collection may be absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Schema {
    pub actions: Option<SemanticSchema>,
    pub things: Option<SemanticSchema>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_things(mut self, things: SemanticSchema) -> Self {
        self.things = Some(things);
        self
    }

    pub fn with_actions(mut self, actions: SemanticSchema) -> Self {
        self.actions = Some(actions);
        self
    }

    /// The collection for a given kind, if present.
    pub fn collection(&self, kind: Kind) -> Option<&SemanticSchema> {
        match kind {
            Kind::Thing => self.things.as_ref(),
            Kind::Action => self.actions.as_ref(),
        }
    }
}

/// One collection of classes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SemanticSchema {
    pub classes: Vec<Class>,
}

impl SemanticSchema {
    pub fn new(classes: impl IntoIterator<Item = Class>) -> Self {
        Self { classes: classes.into_iter().collect() }
    }

    pub fn class(&self, name: &str) -> Option<&Class> {
        self.classes.iter().find(|c| c.class == name)
    }
}

/// A class and its properties, in declaration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Class {
    pub class: String,
    #[serde(default)]
    pub properties: Vec<Property>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self { class: name.into(), properties: Vec::new() }
    }

    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }
}

/// A property with one or more declared type tokens.
///
/// A token is a primitive (`string`), a local class (`City`) or a network
/// class on another peer (`OtherInstance/City`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub name: String,
    pub data_type: SmallVec<[String; 1]>,
}

impl Property {
    pub fn new(name: impl Into<String>, data_type: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into_iter().map(Into::into).collect(),
        }
    }
}
