//! JSON Schema nodes for OpenAPI 3.0.1.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value as Json;

/// Prefix of `$ref` pointers into `components.schemas`.
pub const SCHEMA_PREFIX: &str = "#/components/schemas/";

/// JSON Schema `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
    /// A type forced through a `type=` directive that is not a JSON type name.
    Other(String),
}

impl SchemaType {
    pub fn parse(name: &str) -> Self {
        match name {
            "string" => SchemaType::String,
            "integer" => SchemaType::Integer,
            "number" => SchemaType::Number,
            "boolean" => SchemaType::Boolean,
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            other => SchemaType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            SchemaType::String => "string",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Other(name) => name,
        }
    }
}

impl Serialize for SchemaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Format reported by the type classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Int32,
    Int64,
    Float,
    Double,
    String,
    Boolean,
    DateTime,
    Uuid,
    Object,
    Map,
    Array,
    /// Marker for enumerable types; never emitted, consumed by the schema builder.
    Enum,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Int32 => "int32",
            Format::Int64 => "int64",
            Format::Float => "float",
            Format::Double => "double",
            Format::String => "string",
            Format::Boolean => "boolean",
            Format::DateTime => "date-time",
            Format::Uuid => "uuid",
            Format::Object => "object",
            Format::Map => "map",
            Format::Array => "array",
            Format::Enum => "enum",
        }
    }
}

/// A JSON Schema node.
///
/// A node with `reference` set is a pure pointer and carries nothing else.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonSchema {
    #[serde(rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<JsonSchema>>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: BTreeMap<String, JsonSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_properties: Option<Box<JsonSchema>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<Json>,
    #[serde(skip_serializing_if = "is_false")]
    pub read_only: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub nullable: bool,
    #[serde(rename = "enum", skip_serializing_if = "Vec::is_empty")]
    pub enum_values: Vec<Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum: Option<serde_json::Number>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_items: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_properties: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_properties: Option<i64>,
}

impl JsonSchema {
    /// A `$ref`-only node pointing at a registered definition.
    pub fn reference(key: &str) -> Self {
        Self {
            reference: Some(format!("{SCHEMA_PREFIX}{key}")),
            ..Self::default()
        }
    }

    /// A node with the given type and format.
    pub fn typed(schema_type: SchemaType, format: Format) -> Self {
        Self {
            schema_type: Some(schema_type),
            format: Some(format.as_str().to_string()),
            ..Self::default()
        }
    }

    /// An empty object node, ready to receive properties.
    pub fn object() -> Self {
        Self {
            schema_type: Some(SchemaType::Object),
            ..Self::default()
        }
    }

    pub fn is_reference(&self) -> bool {
        self.reference.as_deref().is_some_and(|r| !r.is_empty())
    }

    /// Whether the node's current type is `ty`.
    pub fn is_type(&self, ty: &SchemaType) -> bool {
        self.schema_type.as_ref() == Some(ty)
    }

    /// The deepest node reachable through `items`.
    pub fn latest_mut(&mut self) -> &mut JsonSchema {
        if self.items.is_none() {
            return self;
        }
        match self.items.as_deref_mut() {
            Some(items) => items.latest_mut(),
            None => unreachable!("items checked above"),
        }
    }
}

/// Render a bound as a JSON number, keeping integral values integral.
pub(crate) fn bound(value: f64) -> Option<serde_json::Number> {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        Some(serde_json::Number::from(value as i64))
    } else {
        serde_json::Number::from_f64(value)
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(b: &bool) -> bool {
    !*b
}
