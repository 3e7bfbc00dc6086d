//! Operation assembler: parameter, body and response declarations for one route.

use std::collections::BTreeMap;

use crate::classify::{classify, is_valid_schema};
use crate::definitions::Definitions;
use crate::model::{
    ExternalDocs, Header, MediaType, Method, Operation, ParamIn, Parameter, RequestBody,
    Response, SecurityRequirement,
};
use crate::reflect::{with_indirect, Field, Kind, Reflect, TypeInfo, Value};
use crate::schema::{Format, JsonSchema, SchemaType};
use crate::tags::{apply_directives, field_name, parse_directives};

const MULTIPART: &str = "multipart/form-data";

/// A declared route: method, raw path template and its operation.
#[derive(Debug, Clone)]
pub struct Api {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) operation: Operation,
    pub(crate) security: Vec<SecurityRequirement>,
    pub(crate) response_content_types: Vec<String>,
}

impl Api {
    pub(crate) fn new(method: Method, path: String, response_content_types: Vec<String>) -> Self {
        Self {
            method,
            path,
            operation: Operation::default(),
            security: Vec::new(),
            response_content_types,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn operation(&self) -> &Operation {
        &self.operation
    }
}

/// Chained declaration of one route's documentation.
///
/// Returned by the route methods of [`ApiRoot`](crate::ApiRoot) and
/// [`GroupBuilder`](crate::GroupBuilder).
pub struct ApiBuilder<'a> {
    api: &'a mut Api,
    defs: &'a mut Definitions,
}

impl<'a> ApiBuilder<'a> {
    pub(crate) fn new(api: &'a mut Api, defs: &'a mut Definitions) -> Self {
        Self { api, defs }
    }

    // ── Parameters ──────────────────────────────────────────────────────────

    /// Path parameters are always required.
    pub fn add_param_path(&mut self, value: &dyn Reflect, name: &str, desc: &str) -> &mut Self {
        self.add_params(value, ParamIn::Path, name, desc, true, false)
    }

    /// Expand the fields of a struct into path parameters.
    pub fn add_param_path_nested(&mut self, value: &dyn Reflect) -> &mut Self {
        self.add_params(value, ParamIn::Path, "", "", true, true)
    }

    pub fn add_param_query(
        &mut self,
        value: &dyn Reflect,
        name: &str,
        desc: &str,
        required: bool,
    ) -> &mut Self {
        self.add_params(value, ParamIn::Query, name, desc, required, false)
    }

    pub fn add_param_query_nested(&mut self, value: &dyn Reflect) -> &mut Self {
        self.add_params(value, ParamIn::Query, "", "", false, true)
    }

    pub fn add_param_form(
        &mut self,
        value: &dyn Reflect,
        name: &str,
        desc: &str,
        required: bool,
    ) -> &mut Self {
        self.add_params(value, ParamIn::FormData, name, desc, required, false)
    }

    pub fn add_param_form_nested(&mut self, value: &dyn Reflect) -> &mut Self {
        self.add_params(value, ParamIn::FormData, "", "", false, true)
    }

    pub fn add_param_header(
        &mut self,
        value: &dyn Reflect,
        name: &str,
        desc: &str,
        required: bool,
    ) -> &mut Self {
        self.add_params(value, ParamIn::Header, name, desc, required, false)
    }

    pub fn add_param_header_nested(&mut self, value: &dyn Reflect) -> &mut Self {
        self.add_params(value, ParamIn::Header, "", "", false, true)
    }

    /// Declare the request body for one content type.
    ///
    /// # Panics
    ///
    /// When the value has no schema shape, or when a body was already
    /// declared for `content_type`.
    pub fn add_param_body(
        &mut self,
        value: &dyn Reflect,
        content_type: &str,
        desc: &str,
        required: bool,
    ) -> &mut Self {
        if !is_valid_schema(&value.type_info()) {
            panic!("specula: invalid body parameter `{}`", value.type_info().name);
        }

        let body = self.request_body(desc, required);
        if body.content.contains_key(content_type) {
            panic!("specula: request body already declared for content type `{content_type}`");
        }

        let schema = with_indirect(value, |v| self.defs.gen_schema(v));
        self.request_body(desc, required).content.insert(
            content_type.to_string(),
            MediaType {
                schema: Some(schema),
            },
        );
        self
    }

    /// Declare a file upload field of a `multipart/form-data` body.
    pub fn add_param_file(&mut self, name: &str, desc: &str, required: bool) -> &mut Self {
        let body = self.request_body("", required);
        let media = body
            .content
            .entry(MULTIPART.to_string())
            .or_insert_with(|| MediaType {
                schema: Some(JsonSchema::object()),
            });
        let schema = media.schema.get_or_insert_with(JsonSchema::object);

        let file = JsonSchema {
            schema_type: Some(SchemaType::String),
            format: Some("binary".to_string()),
            description: (!desc.is_empty()).then(|| desc.to_string()),
            ..JsonSchema::default()
        };
        schema.properties.insert(name.to_string(), file);
        if required && !schema.required.iter().any(|r| r == name) {
            schema.required.push(name.to_string());
        }
        self
    }

    // ── Responses ───────────────────────────────────────────────────────────

    /// Declare a response.
    ///
    /// `schema` is documented once per response content type. `header` is a
    /// struct whose fields become response headers.
    pub fn add_response(
        &mut self,
        code: u16,
        desc: &str,
        schema: Option<&dyn Reflect>,
        header: Option<&dyn Reflect>,
    ) -> &mut Self {
        let response = build_response(
            self.defs,
            desc,
            schema,
            header,
            &self.api.response_content_types,
        );
        self.api
            .operation
            .responses
            .insert(code.to_string(), response);
        self
    }

    /// Point a status code at a shared response.
    pub fn add_response_ref(&mut self, code: u16) -> &mut Self {
        self.api
            .operation
            .responses
            .insert(code.to_string(), Response::reference(code));
        self
    }

    /// Content types used by responses declared after this call.
    pub fn set_response_content_type(&mut self, types: &[&str]) -> &mut Self {
        self.api.response_content_types = types.iter().map(|t| t.to_string()).collect();
        self
    }

    // ── Metadata ────────────────────────────────────────────────────────────

    pub fn set_operation_id(&mut self, id: &str) -> &mut Self {
        self.api.operation.operation_id = id.to_string();
        self
    }

    pub fn set_summary(&mut self, summary: &str) -> &mut Self {
        self.api.operation.summary = summary.to_string();
        self
    }

    pub fn set_description(&mut self, desc: &str) -> &mut Self {
        self.api.operation.description = desc.to_string();
        self
    }

    pub fn set_deprecated(&mut self) -> &mut Self {
        self.api.operation.deprecated = true;
        self
    }

    pub fn set_external_docs(&mut self, desc: &str, url: &str) -> &mut Self {
        self.api.operation.external_docs = Some(ExternalDocs {
            description: desc.to_string(),
            url: url.to_string(),
        });
        self
    }

    /// Require all the named schemes together (one requirement object).
    ///
    /// Names are checked against the declared schemes when the document is built.
    pub fn set_security(&mut self, names: &[&str]) -> &mut Self {
        if !names.is_empty() {
            self.api.security.push(requirement(names));
        }
        self
    }

    /// Require schemes with explicit scopes.
    pub fn set_security_with_scope(&mut self, scopes: &[(&str, &[&str])]) -> &mut Self {
        if !scopes.is_empty() {
            self.api.security.push(scoped_requirement(scopes));
        }
        self
    }

    // ── Internals ───────────────────────────────────────────────────────────

    fn request_body(&mut self, desc: &str, required: bool) -> &mut RequestBody {
        self.api
            .operation
            .request_body
            .get_or_insert_with(|| RequestBody {
                description: desc.to_string(),
                required,
                content: BTreeMap::new(),
            })
    }

    fn add_params(
        &mut self,
        value: &dyn Reflect,
        location: ParamIn,
        name: &str,
        desc: &str,
        required: bool,
        nested: bool,
    ) -> &mut Self {
        let info = value.type_info();
        if !is_valid_param(&info, nested, false) {
            panic!(
                "specula: invalid {} param `{}`",
                location.as_str(),
                info.name
            );
        }

        let defs = &mut *self.defs;
        let operation = &mut self.api.operation;
        with_indirect(value, |v| {
            let info = v.type_info();
            match classify(&info) {
                (SchemaType::Object, Format::Object) => {
                    let Value::Struct(fields) = v.reflect() else {
                        panic!("specula: `{}` is classified as a struct but has no fields", info.name);
                    };
                    handle_param_struct(defs, fields, location, operation);
                }
                (schema_type, format) => {
                    let shaped = schema_type == SchemaType::Array || format == Format::Enum;
                    let schema = if shaped {
                        defs.gen_schema(v)
                    } else {
                        JsonSchema::typed(schema_type, format)
                    };
                    let parameter = Parameter {
                        name: operation.rename(name),
                        location,
                        description: desc.to_string(),
                        required,
                        schema: Some(schema),
                    };
                    operation.parameters.push(parameter);
                }
            }
        });
        self
    }
}

/// One requirement object naming every scheme with no scopes.
pub(crate) fn requirement(names: &[&str]) -> SecurityRequirement {
    names
        .iter()
        .map(|name| (name.to_string(), Vec::new()))
        .collect()
}

pub(crate) fn scoped_requirement(scopes: &[(&str, &[&str])]) -> SecurityRequirement {
    scopes
        .iter()
        .map(|(name, scopes)| {
            (
                name.to_string(),
                scopes.iter().map(|s| s.to_string()).collect(),
            )
        })
        .collect()
}

pub(crate) fn build_response(
    defs: &mut Definitions,
    desc: &str,
    schema: Option<&dyn Reflect>,
    header: Option<&dyn Reflect>,
    content_types: &[String],
) -> Response {
    let mut response = Response {
        description: desc.to_string(),
        ..Response::default()
    };

    if let Some(value) = schema {
        let schema = with_indirect(value, |v| defs.gen_schema(v));
        for content_type in content_types {
            response.content.insert(
                content_type.clone(),
                MediaType {
                    schema: Some(schema.clone()),
                },
            );
        }
    }

    if let Some(value) = header {
        with_indirect(value, |v| {
            if let Value::Struct(fields) = v.reflect() {
                handle_response_headers(defs, fields, &mut response.headers);
            }
        });
    }

    response
}

fn handle_response_headers(
    defs: &mut Definitions,
    fields: Vec<Field<'_>>,
    headers: &mut BTreeMap<String, Header>,
) {
    for field in fields {
        let (name, _) = field_name(&field, ParamIn::Header);
        if name == "-" {
            continue;
        }
        if field.embedded {
            if let Value::Struct(inner) = field.value.reflect() {
                handle_response_headers(defs, inner, headers);
                continue;
            }
        }

        let directives = parse_directives(&field.tags);
        let mut schema = defs.gen_schema(field.value);
        if !schema.is_reference() {
            apply_directives(&mut schema, &field.value.type_info(), &directives);
        }
        let description = schema.description.take().unwrap_or_default();
        headers.insert(
            name.to_string(),
            Header {
                description,
                schema: Some(schema),
            },
        );
    }
}

fn handle_param_struct(
    defs: &mut Definitions,
    fields: Vec<Field<'_>>,
    location: ParamIn,
    operation: &mut Operation,
) {
    for field in fields {
        if field.embedded {
            if let Value::Struct(inner) = field.value.reflect() {
                handle_param_struct(defs, inner, location, operation);
                continue;
            }
        }

        let (name, _) = field_name(&field, location);
        if name == "-" {
            continue;
        }
        let info = field.value.type_info();
        if !is_valid_param(&info, false, false) {
            panic!(
                "specula: field `{}` of type `{}` cannot be a {} param",
                field.name,
                info.name,
                location.as_str()
            );
        }

        let directives = parse_directives(&field.tags);
        let mut schema = defs.gen_schema(field.value);
        if !schema.is_reference() {
            apply_directives(&mut schema, &info, &directives);
        }

        let parameter = Parameter {
            name: operation.rename(name),
            location,
            description: String::new(),
            required: directives.contains_key("required"),
            schema: Some(schema),
        };
        operation.parameters.push(parameter);
    }
}

/// Whether a value of this type can be bound as a parameter.
///
/// Plain parameters are scalars or sequences of scalars, behind at most one
/// optional. Nested declarations take a struct whose fields are expanded.
fn is_valid_param(info: &TypeInfo, nested: bool, inner: bool) -> bool {
    match info.kind {
        Kind::Optional => !inner && info.elem().is_some_and(|e| is_valid_param(&e, nested, true)),
        Kind::Seq => info.elem().is_some_and(|e| is_valid_param(&e, nested, true)),
        Kind::Struct => nested && !inner,
        Kind::Map | Kind::Other => false,
        _ => !nested || inner,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflect::type_info_of;

    #[test]
    fn scalar_and_sequence_params() {
        assert!(is_valid_param(&type_info_of::<i64>(), false, false));
        assert!(is_valid_param(&type_info_of::<Option<String>>(), false, false));
        assert!(is_valid_param(&type_info_of::<Vec<u32>>(), false, false));
        assert!(!is_valid_param(&type_info_of::<Option<Option<i32>>>(), false, false));
        assert!(!is_valid_param(&type_info_of::<BTreeMap<String, i32>>(), false, false));
    }

    #[test]
    fn nested_params_need_a_struct() {
        assert!(!is_valid_param(&type_info_of::<i64>(), true, false));
        assert!(is_valid_param(&TypeInfo::new("Filter", Kind::Struct), true, false));
        assert!(!is_valid_param(&TypeInfo::new("Filter", Kind::Struct), false, false));
    }

    #[test]
    fn scopes_build_one_requirement() {
        let req = scoped_requirement(&[("oauth", &["read", "write"]), ("key", &[])]);
        assert_eq!(req["oauth"], vec!["read".to_string(), "write".to_string()]);
        assert!(req["key"].is_empty());
        assert_eq!(requirement(&["a", "b"]).len(), 2);
    }
}
