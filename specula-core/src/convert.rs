//! Conversion of annotation literals into typed JSON values.

use serde_json::Value as Json;

use crate::classify::classify;
use crate::reflect::{Kind, TypeInfo};
use crate::schema::{Format, SchemaType};

/// A literal could not be converted to the target type.
#[derive(Debug)]
pub enum ConvertError {
    Integer {
        literal: String,
        source: std::num::ParseIntError,
    },
    Float {
        literal: String,
    },
    Boolean {
        literal: String,
    },
    Document(serde_json::Error),
    NotAnObject {
        literal: String,
    },
}

impl std::fmt::Display for ConvertError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvertError::Integer { literal, source } => {
                write!(f, "invalid integer literal '{literal}': {source}")
            }
            ConvertError::Float { literal } => write!(f, "invalid number literal '{literal}'"),
            ConvertError::Boolean { literal } => write!(f, "invalid boolean literal '{literal}'"),
            ConvertError::Document(err) => write!(f, "invalid JSON document: {err}"),
            ConvertError::NotAnObject { literal } => {
                write!(f, "expected a JSON object, got '{literal}'")
            }
        }
    }
}

impl std::error::Error for ConvertError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvertError::Integer { source, .. } => Some(source),
            ConvertError::Document(err) => Some(err),
            _ => None,
        }
    }
}

/// Convert `literal` into a value of the type described by `info`.
pub fn convert(info: &TypeInfo, literal: &str) -> Result<Json, ConvertError> {
    if info.kind == Kind::Optional {
        if let Some(inner) = info.elem() {
            return convert(&inner, literal);
        }
    }

    match classify(info) {
        (SchemaType::Integer, Format::Int32) => literal
            .parse::<i32>()
            .map(Json::from)
            .map_err(|source| ConvertError::Integer {
                literal: literal.to_string(),
                source,
            }),
        (SchemaType::Integer, Format::Int64) => literal
            .parse::<i64>()
            .map(Json::from)
            .map_err(|source| ConvertError::Integer {
                literal: literal.to_string(),
                source,
            }),
        (SchemaType::Number, Format::Float) => {
            // Go through the f32 text form so 0.1 stays 0.1 instead of its widened bits.
            let narrow = literal.parse::<f32>().map_err(|_| float_error(literal))?;
            let wide = narrow
                .to_string()
                .parse::<f64>()
                .map_err(|_| float_error(literal))?;
            number(wide).ok_or_else(|| float_error(literal))
        }
        (SchemaType::Number, Format::Double) => {
            let wide = literal.parse::<f64>().map_err(|_| float_error(literal))?;
            number(wide).ok_or_else(|| float_error(literal))
        }
        (SchemaType::Boolean, Format::Boolean) => parse_bool(literal)
            .map(Json::Bool)
            .ok_or_else(|| ConvertError::Boolean {
                literal: literal.to_string(),
            }),
        (SchemaType::Array, Format::Array) => match info.elem() {
            Some(elem) => literal
                .split(',')
                .map(|part| convert(&elem, part))
                .collect::<Result<Vec<_>, _>>()
                .map(Json::Array),
            None => Ok(Json::String(literal.to_string())),
        },
        (SchemaType::Object, Format::Object) => {
            let doc: Json = serde_json::from_str(literal).map_err(ConvertError::Document)?;
            if doc.is_object() {
                Ok(doc)
            } else {
                Err(ConvertError::NotAnObject {
                    literal: literal.to_string(),
                })
            }
        }
        _ => Ok(Json::String(literal.to_string())),
    }
}

fn number(value: f64) -> Option<Json> {
    serde_json::Number::from_f64(value).map(Json::Number)
}

fn float_error(literal: &str) -> ConvertError {
    ConvertError::Float {
        literal: literal.to_string(),
    }
}

fn parse_bool(literal: &str) -> Option<bool> {
    match literal {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
