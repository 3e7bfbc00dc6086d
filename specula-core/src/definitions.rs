//! Schema builder and definition registry.
//!
//! [`Definitions`] walks [`Reflect`] values into [`JsonSchema`] nodes. Named
//! types (structs and enum-like types) are never inlined: they are registered
//! once under a stable key and every occurrence becomes a `$ref`.

use std::collections::BTreeMap;

use tracing::debug;

use crate::classify::classify;
use crate::model::{ParamIn, Response};
use crate::reflect::{with_element, Field, Reflect, TypeInfo, Value};
use crate::schema::{Format, JsonSchema, SchemaType};
use crate::tags::{apply_directives, field_name, parse_directives};

/// Registry of named schemas and shared responses.
#[derive(Debug, Default, Clone)]
pub struct Definitions {
    schemas: BTreeMap<String, JsonSchema>,
    responses: BTreeMap<u16, Response>,
}

impl Definitions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered schemas, keyed by definition name.
    pub fn schemas(&self) -> &BTreeMap<String, JsonSchema> {
        &self.schemas
    }

    pub fn schema(&self, key: &str) -> Option<&JsonSchema> {
        self.schemas.get(key)
    }

    /// Shared responses, keyed by status code.
    pub fn responses(&self) -> &BTreeMap<u16, Response> {
        &self.responses
    }

    pub(crate) fn add_response(&mut self, code: u16, response: Response) {
        self.responses.insert(code, response);
    }

    /// Build the schema node of a value.
    ///
    /// # Panics
    ///
    /// When a type's value view contradicts its descriptor, or when a
    /// definition cannot be built (see [`Definitions::add_definition`]).
    pub fn gen_schema(&mut self, value: &dyn Reflect) -> JsonSchema {
        if let Value::Optional { inner, zero } = value.reflect() {
            let mut schema = with_element(inner, zero, |v| self.gen_schema(v));
            if !schema.is_reference() {
                schema.nullable = true;
            }
            return schema;
        }

        let info = value.type_info();
        match classify(&info) {
            (SchemaType::Array, _) => {
                let Value::Seq { first, zero } = value.reflect() else {
                    panic!("specula: `{}` is classified as an array but is not a sequence", info.name);
                };
                JsonSchema {
                    schema_type: Some(SchemaType::Array),
                    items: Some(Box::new(with_element(first, zero, |v| self.gen_schema(v)))),
                    ..JsonSchema::default()
                }
            }
            (SchemaType::Object, Format::Map) => {
                let Value::Map { first, zero } = value.reflect() else {
                    panic!("specula: `{}` is classified as a map but is not a map", info.name);
                };
                JsonSchema {
                    schema_type: Some(SchemaType::Object),
                    additional_properties: Some(Box::new(with_element(first, zero, |v| {
                        self.gen_schema(v)
                    }))),
                    ..JsonSchema::default()
                }
            }
            (SchemaType::Object, _) => JsonSchema::reference(&self.add_definition(value)),
            (schema_type, format) => {
                let mut schema = JsonSchema::typed(schema_type, format);
                if let Value::Scalar(scalar) = value.reflect() {
                    if !scalar.is_zero() {
                        schema.example = Some(scalar.to_json());
                    }
                }
                schema
            }
        }
    }

    /// Register the definition of a named type and return its key.
    ///
    /// A key is derived at most once; later calls return it without
    /// re-walking the type, which is also what stops recursive types.
    ///
    /// # Panics
    ///
    /// When the type is a scalar without a declared value set.
    pub fn add_definition(&mut self, value: &dyn Reflect) -> String {
        match value.shim() {
            Some(shim) => self.define(shim.as_ref()),
            None => self.define(value),
        }
    }

    fn define(&mut self, value: &dyn Reflect) -> String {
        let info = value.type_info();
        let key = value
            .schema_name()
            .unwrap_or_else(|| info.name.to_string());
        if self.schemas.contains_key(&key) {
            return key;
        }

        // Placeholder first: fields referring back to this type see the key.
        self.schemas.insert(key.clone(), JsonSchema::default());

        let mut schema = match value.reflect() {
            Value::Struct(fields) => {
                let mut schema = JsonSchema::object();
                self.handle_struct(fields, &mut schema);
                schema
            }
            Value::Scalar(_) => match value.enum_values() {
                Some(values) => {
                    let plain = TypeInfo {
                        enumerable: false,
                        ..info
                    };
                    JsonSchema {
                        schema_type: Some(classify(&plain).0),
                        enum_values: values,
                        ..JsonSchema::default()
                    }
                }
                None => panic!("specula: `{key}` is not enumerable and cannot be a definition"),
            },
            _ => panic!("specula: `{key}` cannot be registered as a definition"),
        };

        if let Some(description) = value.description() {
            schema.description = Some(description);
        }

        debug!(key = %key, "registered schema definition");
        self.schemas.insert(key.clone(), schema);
        key
    }

    fn handle_struct(&mut self, fields: Vec<Field<'_>>, schema: &mut JsonSchema) {
        for field in fields {
            let (name, has_tag) = field_name(&field, ParamIn::Body);
            if name == "-" {
                continue;
            }
            if field.embedded && !has_tag {
                if let Value::Struct(inner) = field.value.reflect() {
                    self.handle_struct(inner, schema);
                    continue;
                }
            }

            let directives = parse_directives(&field.tags);
            let mut property = if directives.contains_key("type") {
                JsonSchema::default()
            } else {
                self.gen_schema(field.value)
            };

            if directives.contains_key("required") {
                schema.required.push(name.to_string());
            }
            if !property.is_reference() {
                apply_directives(&mut property, &field.value.type_info(), &directives);
            }

            schema.properties.insert(name.to_string(), property);
        }
    }
}
