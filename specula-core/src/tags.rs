//! Field annotation parsing and directive application.
//!
//! Two annotations carry directives:
//!
//! - `swagger`: `;`-separated, each entry a bare flag or `key=value`.
//! - `validate`: `,`-separated validator rules. `dive` switches to child mode
//!   (keyed rules get a `child_` prefix), `keys` and `endkeys` bracket keys
//!   mode (`keys_` prefix).
//!
//! Both fold into one [`Directives`] map.

use std::collections::BTreeMap;

use serde_json::Value as Json;
use tracing::debug;

use crate::convert::convert;
use crate::model::ParamIn;
use crate::reflect::{Field, FieldTags, TypeInfo};
use crate::schema::{bound, JsonSchema, SchemaType};

/// Directive name → argument (`""` for bare flags).
pub type Directives = BTreeMap<String, String>;

/// Parse both directive annotations of a field.
pub fn parse_directives(tags: &FieldTags) -> Directives {
    let mut directives = Directives::new();
    parse_swagger(tags.swagger, &mut directives);
    parse_validate(tags.validate, &mut directives);
    directives
}

fn parse_swagger(annotation: &str, out: &mut Directives) {
    for entry in annotation.split(';') {
        if entry.is_empty() {
            continue;
        }
        match entry.split_once('=') {
            Some((key, value)) => out.insert(key.to_string(), value.to_string()),
            None => out.insert(entry.to_string(), String::new()),
        };
    }
}

/// Scan state of the `validate` rule list.
#[derive(Default)]
struct ScanMode {
    child: bool,
    keys: bool,
}

impl ScanMode {
    fn key(&self, key: &str) -> String {
        let mut key = key.to_string();
        if self.child {
            key = format!("child_{key}");
        }
        if self.keys {
            key = format!("keys_{key}");
        }
        key
    }
}

fn parse_validate(annotation: &str, out: &mut Directives) {
    let mut mode = ScanMode::default();
    for rule in annotation.split(',') {
        if rule.is_empty() {
            continue;
        }
        if let Some((key, value)) = rule.split_once('=') {
            out.insert(mode.key(key), value.to_string());
            continue;
        }
        match rule {
            "dive" => mode.child = true,
            "keys" => mode.keys = true,
            "endkeys" => mode.keys = false,
            flag => {
                out.insert(flag.to_string(), String::new());
            }
        }
    }
}

/// Resolve the name a field is documented under for a binding location.
///
/// Returns the name and whether it came from an annotation. `"-"` means the
/// field is suppressed.
pub fn field_name(field: &Field<'_>, location: ParamIn) -> (&'static str, bool) {
    if field.tags.swagger == "-" {
        return ("-", false);
    }

    let name = match location {
        ParamIn::Query => field.tags.query,
        ParamIn::FormData => field.tags.form,
        ParamIn::Body | ParamIn::Header | ParamIn::Path => {
            field.tags.json.split(',').next().unwrap_or("").trim()
        }
    };

    if name.is_empty() {
        (field.name, false)
    } else {
        (name, true)
    }
}

/// Apply directive effects to a freshly built field schema.
///
/// `info` describes the field's declared type and drives literal conversion.
///
/// # Panics
///
/// When an `example` literal cannot be converted to the field's type.
pub fn apply_directives(schema: &mut JsonSchema, info: &TypeInfo, directives: &Directives) {
    if let Some(desc) = directives.get("desc") {
        schema.description = Some(desc.clone());
    }

    if let Some(min) = directives.get("min").and_then(|v| v.parse::<f64>().ok()) {
        let count = min as i64;
        if schema.is_type(&SchemaType::Array) {
            schema.min_items = Some(count);
        } else if schema.is_type(&SchemaType::Object) {
            schema.min_properties = Some(count);
        } else if schema.is_type(&SchemaType::String) {
            schema.min_length = Some(count);
        } else {
            schema.minimum = bound(min);
        }
    }
    if let Some(max) = directives.get("max").and_then(|v| v.parse::<f64>().ok()) {
        let count = max as i64;
        if schema.is_type(&SchemaType::Array) {
            schema.max_items = Some(count);
        } else if schema.is_type(&SchemaType::Object) {
            schema.max_properties = Some(count);
        } else if schema.is_type(&SchemaType::String) {
            schema.max_length = Some(count);
        } else {
            schema.maximum = bound(max);
        }
    }

    if let Some(len) = directives.get("minLen").and_then(|v| v.parse::<i64>().ok()) {
        schema.min_length = Some(len);
    }
    if let Some(len) = directives.get("maxLen").and_then(|v| v.parse::<i64>().ok()) {
        schema.max_length = Some(len);
    }

    if let Some(len) = directives.get("child_max").and_then(|v| v.parse::<i64>().ok()) {
        if let Some(values) = schema.additional_properties.as_deref_mut() {
            values.max_length = Some(len);
        }
    }

    if directives.contains_key("readOnly") {
        schema.read_only = true;
    }
    if directives.contains_key("nullable") || directives.contains_key("omitempty") {
        schema.nullable = true;
    }

    if let Some(ty) = directives.get("type") {
        schema.schema_type = Some(SchemaType::parse(ty));
        schema.reference = None;
    }
    if let Some(format) = directives.get("format") {
        schema.format = Some(format.clone());
    }

    // enum and default land on the innermost items node of arrays, so convert
    // them against the innermost element type.
    let element = info.innermost();
    if let Some(list) = directives.get("enum") {
        schema.enum_values = list
            .split(',')
            .filter_map(|literal| match convert(&element, literal) {
                Ok(value) => Some(value),
                Err(err) => {
                    debug!(literal, error = %err, "dropping unconvertible enum literal");
                    None
                }
            })
            .collect();
    }
    if let Some(literal) = directives.get("default") {
        schema.default = convert(&element, literal).ok();
    }

    if let Some(literal) = directives.get("example") {
        match convert(info, literal) {
            Ok(value) => schema.example = Some(value),
            Err(err) => panic!("specula: invalid example '{literal}': {err}"),
        }
    }

    if schema.is_type(&SchemaType::Array) {
        move_to_items(schema);
    }
}

/// Relocate element-level constraints from an array node to its innermost items.
fn move_to_items(schema: &mut JsonSchema) {
    let minimum = schema.minimum.take();
    let maximum = schema.maximum.take();
    let min_length = schema.min_length.take();
    let max_length = schema.max_length.take();
    let enum_values: Vec<Json> = std::mem::take(&mut schema.enum_values);
    let default = schema.default.take();

    let Some(items) = schema.items.as_deref_mut() else {
        return;
    };
    let items = items.latest_mut();
    if items.is_reference() {
        return;
    }
    items.minimum = minimum;
    items.maximum = maximum;
    items.min_length = min_length;
    items.max_length = max_length;
    items.enum_values = enum_values;
    items.default = default;
}
